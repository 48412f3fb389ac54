//! Error types for the codec.
//!
//! Every failure is fatal to the run that hit it. The variants are grouped the
//! same way the failures are detected: opening and reading resources,
//! validating word lists and input text, and resolving codes read back from a
//! compressed stream.

use std::path::PathBuf;

use thiserror::Error;

use crate::dictionary::Origin;

#[derive(Debug, Error)]
pub enum Error {
    /// A named file could not be opened or created
    #[error("Can't open file: {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A named file was opened but could not be written
    #[error("Can't write file: {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing a stream failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A byte outside tab, newline, carriage return and `' '..='~'`
    #[error("Invalid character code: {byte:x} at offset {offset}")]
    IllegalChar { byte: u8, offset: usize },

    /// A word-list line that is not `<length> <word>`
    #[error("Invalid word file: line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    /// A declared word length outside `1..=WORD_MAX`
    #[error("Invalid word file: line {line}: word length {length} outside 1..={max}")]
    WordLength { line: usize, length: usize, max: usize },

    /// A word containing an illegal byte
    #[error("Invalid word file: line {line}: invalid character code: {byte:x}")]
    IllegalWordChar { line: usize, byte: u8 },

    /// More custom words than the code space has room for
    #[error("Invalid word file: more than {max} words")]
    CapacityExceeded { max: usize },

    /// The same word inserted twice
    #[error("Invalid word file: {word:?} from {second} duplicates {first}")]
    DuplicateWord {
        word: String,
        first: Origin,
        second: Origin,
    },

    /// A table that is not strictly sorted or does not fit the code space
    #[error("Invalid dictionary table: {0}")]
    InvalidTable(String),

    /// A code wider than the format's code width
    #[error("code {0} does not fit in {bits} bits", bits = crate::bits::CODE_BITS)]
    CodeOutOfRange(u16),

    /// A code read back that names no dictionary entry
    #[error("Unknown code {code} for a dictionary of {len} words")]
    UnknownCode { code: u16, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
