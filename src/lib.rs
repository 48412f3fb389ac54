//! Dictionary text compression with fixed 9-bit codes.
//!
//! Text is split greedily into the longest words a [`Dictionary`] knows, and
//! each word is written as its 9-bit code. Every legal single character is in
//! every dictionary, so any text made of tab, newline, carriage return and
//! printable ASCII can be packed.
//!
//! ```
//! use wordpack::{pack, unpack, Dictionary};
//!
//! let dict = Dictionary::from_reader(&b"3 the\n2 an\n"[..]).unwrap();
//! let packed = pack(b"the answer", &dict).unwrap();
//! assert_eq!(unpack(&packed, &dict).unwrap(), b"the answer");
//! ```

pub mod bits;
pub mod codec;
pub mod dictionary;
pub mod error;
pub mod word;

use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::Path;

use log::info;

pub use codec::{Decoder, Encoder, PackSummary, UnpackSummary};
pub use dictionary::{Dictionary, DEFAULT_WORD_FILE};
pub use error::{Error, Result};
pub use word::Word;

pub fn pack(text: &[u8], dictionary: &Dictionary) -> Result<Vec<u8>> {
    Encoder::new(dictionary).encode_to_vec(text).map(|(out, _)| out)
}

pub fn unpack(packed: &[u8], dictionary: &Dictionary) -> Result<Vec<u8>> {
    Decoder::new(dictionary).decode_to_vec(packed).map(|(out, _)| out)
}

/// Pack one file into another.
///
/// The input is read and packed in memory first; `output` is only created once
/// packing has succeeded.
pub fn pack_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    dictionary: &Dictionary,
) -> Result<PackSummary> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let text = read(input)?;
    let (packed, summary) = Encoder::new(dictionary).encode_to_vec(&text)?;
    write(output, &packed)?;

    info!(
        "packed {} ({} bytes) into {} ({} bytes)",
        input.display(),
        summary.input_bytes,
        output.display(),
        summary.output_bytes
    );
    Ok(summary)
}

/// Unpack one file into another.
///
/// A stream that does not decode leaves `output` uncreated.
pub fn unpack_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    dictionary: &Dictionary,
) -> Result<UnpackSummary> {
    let (input, output) = (input.as_ref(), output.as_ref());

    let file = File::open(input).map_err(|source| Error::Open {
        path: input.to_path_buf(),
        source,
    })?;
    let mut text = Vec::new();
    let summary = Decoder::new(dictionary).decode(BufReader::new(file), &mut text)?;
    write(output, &text)?;

    info!(
        "unpacked {} ({} codes) into {} ({} bytes)",
        input.display(),
        summary.codes,
        output.display(),
        summary.output_bytes
    );
    Ok(summary)
}

fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(contents)
        .and_then(|()| file.flush())
        .map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
}
