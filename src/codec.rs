use std::io::{Read, Write};

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::bits::{CodeReader, CodeWriter, BITS_PER_BYTE, CODE_BITS};
use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::word::validate_text;

/// What a pack run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackSummary {
    pub input_bytes: usize,
    pub codes: usize,
    pub output_bytes: usize,
    /// Zero bits filling out the last byte
    pub padding_bits: usize,
}

impl PackSummary {
    /// Output size over input size, `None` for empty input.
    pub fn ratio(&self) -> Option<f64> {
        (self.input_bytes > 0).then(|| self.output_bytes as f64 / self.input_bytes as f64)
    }
}

/// What an unpack run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpackSummary {
    pub codes: usize,
    pub output_bytes: usize,
}

/// Greedy longest-match tokenizer writing one code per token.
#[derive(Debug, Clone, Copy)]
pub struct Encoder<'d> {
    dictionary: &'d Dictionary,
}

impl<'d> Encoder<'d> {
    pub fn new(dictionary: &'d Dictionary) -> Self {
        Self { dictionary }
    }

    /// Encode all of `text` into `out`.
    ///
    /// The whole text is checked before the first byte is written, so an
    /// illegal character leaves `out` untouched.
    pub fn encode<W: Write>(&self, text: &[u8], out: W) -> Result<PackSummary> {
        validate_text(text)?;

        let mut writer = CodeWriter::new(out);
        let mut pos = 0;
        let mut codes = 0;

        while pos < text.len() {
            let (code, len) =
                self.dictionary
                    .best_code(&text[pos..])
                    .ok_or(Error::IllegalChar {
                        byte: text[pos],
                        offset: pos,
                    })?;
            trace!("{} <- \"{}\"", code, text[pos..pos + len].escape_ascii());

            writer.write_code(code)?;
            pos += len;
            codes += 1;
        }

        writer.flush_bits()?;
        let output_bytes = writer.bytes_written();
        writer.into_inner()?;

        let summary = PackSummary {
            input_bytes: text.len(),
            codes,
            output_bytes,
            padding_bits: output_bytes * BITS_PER_BYTE - codes * CODE_BITS,
        };
        debug!("packed {:?}", summary);
        Ok(summary)
    }

    pub fn encode_to_vec(&self, text: &[u8]) -> Result<(Vec<u8>, PackSummary)> {
        let mut out = Vec::with_capacity(text.len());
        let summary = self.encode(text, &mut out)?;
        Ok((out, summary))
    }
}

/// Turns codes back into dictionary words.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'d> {
    dictionary: &'d Dictionary,
}

impl<'d> Decoder<'d> {
    pub fn new(dictionary: &'d Dictionary) -> Self {
        Self { dictionary }
    }

    /// Decode codes from `input` into `out` until the input runs out.
    ///
    /// # Errors
    /// [`Error::UnknownCode`] for a code past the end of the dictionary, which
    /// means the stream is corrupt or was packed with a different word list.
    pub fn decode<R: Read, W: Write>(&self, input: R, mut out: W) -> Result<UnpackSummary> {
        let mut summary = UnpackSummary::default();

        for code in CodeReader::new(input) {
            let code = code?;
            let word = self.dictionary.word_of(code).ok_or(Error::UnknownCode {
                code,
                len: self.dictionary.len(),
            })?;
            trace!("{} -> {:?}", code, word);

            out.write_all(word.as_bytes())?;
            summary.codes += 1;
            summary.output_bytes += word.len();
        }

        out.flush()?;
        debug!("unpacked {:?}", summary);
        Ok(summary)
    }

    pub fn decode_to_vec(&self, input: &[u8]) -> Result<(Vec<u8>, UnpackSummary)> {
        let mut out = Vec::with_capacity(input.len() * 2);
        let summary = self.decode(input, &mut out)?;
        Ok((out, summary))
    }
}
