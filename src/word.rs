//! Dictionary words and the legal character set.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Error, Result};

/// Longest word a dictionary may hold.
pub const WORD_MAX: usize = 20;

/// Tab, newline, carriage return and printable ASCII.
pub fn is_legal(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | b'\r' | b' '..=b'~')
}

/// Every legal character, control characters first.
pub fn legal_chars() -> impl Iterator<Item = u8> + Clone {
    [b'\t', b'\n', b'\r'].into_iter().chain(b' '..=b'~')
}

/// Fail on the first illegal byte of `text`.
pub fn validate_text(text: &[u8]) -> Result<()> {
    match text.iter().position(|&b| !is_legal(b)) {
        Some(offset) => Err(Error::IllegalChar {
            byte: text[offset],
            offset,
        }),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("word of {0} characters is longer than {max}", max = WORD_MAX)]
    TooLong(usize),
    #[error("invalid character code: {0:x}")]
    IllegalChar(u8),
}

/// An immutable run of legal characters, at most [`WORD_MAX`] long.
///
/// Words order lexicographically by byte, shorter words first when one is a
/// prefix of the other.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word {
    bytes: Box<[u8]>,
}

impl Word {
    pub fn new(bytes: &[u8]) -> std::result::Result<Self, WordError> {
        if bytes.len() > WORD_MAX {
            return Err(WordError::TooLong(bytes.len()));
        }
        if let Some(&byte) = bytes.iter().find(|&&b| !is_legal(b)) {
            return Err(WordError::IllegalChar(byte));
        }
        Ok(Self {
            bytes: bytes.into(),
        })
    }

    /// For bytes the caller has already checked.
    pub(crate) fn from_legal(bytes: &[u8]) -> Self {
        debug_assert!(bytes.len() <= WORD_MAX && bytes.iter().all(|&b| is_legal(b)));
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.bytes.escape_ascii())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Legal characters are all ASCII
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

impl TryFrom<String> for Word {
    type Error = WordError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Word::new(value.as_bytes())
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.to_string()
    }
}

impl AsRef<[u8]> for Word {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
