//! Fixed-width code I/O over byte streams.
//!
//! Codes are [`CODE_BITS`] wide and packed low-bit-first: the first code
//! occupies the low bits of the first byte, and whatever does not fit carries
//! over into the low bits of the next one. The last byte of a stream is padded
//! with zeros in its high bits. Because the padding is always narrower than a
//! code, a reader that runs out of input before collecting a full code has
//! simply reached the end of the stream.

use std::io::{ErrorKind, Read, Write};

use bitvec::prelude::*;

use crate::error::{Error, Result};

pub const BITS_PER_BYTE: usize = 8;

/// Width of every code in a compressed stream.
pub const CODE_BITS: usize = 9;

/// Number of distinct codes, and so the largest possible dictionary.
pub const CODE_LIMIT: usize = 1 << CODE_BITS;

/// Bits that have been produced but not written yet, or read but not consumed
/// yet.
///
/// A writer keeps fewer than 8 bits here between calls. A reader may hold up
/// to 8 (one whole byte it has not started on).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingBits {
    bits: BitVec<u8, Lsb0>,
}

impl PendingBits {
    pub fn new() -> Self {
        Self {
            bits: BitVec::with_capacity(CODE_BITS + BITS_PER_BYTE),
        }
    }

    pub fn bit_count(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Append the `count` low bits of `value` behind the bits already held.
    fn push(&mut self, value: u16, count: usize) {
        self.bits
            .extend_from_bitslice(&value.view_bits::<Lsb0>()[..count]);
    }

    /// Remove the oldest `count` bits and return them as an integer, oldest
    /// bit in the least significant position.
    fn take(&mut self, count: usize) -> u16 {
        let value = self.bits[..count].load_le::<u16>();
        self.bits.drain(..count);
        value
    }

    /// Everything still held, zero-filled up to a whole byte.
    fn drain_byte(&mut self) -> u8 {
        let byte = match self.bits.len().min(BITS_PER_BYTE) {
            0 => 0,
            count => self.take(count) as u8,
        };
        self.bits.clear();
        byte
    }
}

/// Writes codes to a byte sink.
///
/// Call [`CodeWriter::flush_bits`] (or [`CodeWriter::into_inner`], which does
/// it for you) after the last code, otherwise the final partial byte is lost.
#[derive(Debug)]
pub struct CodeWriter<W: Write> {
    inner: W,
    pending: PendingBits,
    bytes_written: usize,
}

impl<W: Write> CodeWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            pending: PendingBits::new(),
            bytes_written: 0,
        }
    }

    /// Write one code, emitting every byte it completes.
    ///
    /// # Errors
    /// [`Error::CodeOutOfRange`] if `code` does not fit in [`CODE_BITS`], or an
    /// I/O error from the sink.
    pub fn write_code(&mut self, code: u16) -> Result<()> {
        if usize::from(code) >= CODE_LIMIT {
            return Err(Error::CodeOutOfRange(code));
        }

        self.pending.push(code, CODE_BITS);

        // A code is wider than a byte, so this can run twice when leftover
        // bits from earlier codes add up to a whole byte.
        while self.pending.bit_count() >= BITS_PER_BYTE {
            let byte = self.pending.take(BITS_PER_BYTE) as u8;
            self.emit(byte)?;
        }

        Ok(())
    }

    /// Write out any pending bits in the low positions of one last byte.
    pub fn flush_bits(&mut self) -> Result<()> {
        if !self.pending.is_empty() {
            let byte = self.pending.drain_byte();
            self.emit(byte)?;
        }
        Ok(())
    }

    pub fn pending(&self) -> &PendingBits {
        &self.pending
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Flush pending bits and the sink, then hand the sink back.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush_bits()?;
        self.inner.flush()?;
        Ok(self.inner)
    }

    fn emit(&mut self, byte: u8) -> Result<()> {
        self.inner.write_all(&[byte])?;
        self.bytes_written += 1;
        Ok(())
    }
}

/// Reads codes from a byte source.
///
/// Reads one byte at a time; wrap files in a [`std::io::BufReader`].
#[derive(Debug)]
pub struct CodeReader<R: Read> {
    inner: R,
    pending: PendingBits,
}

impl<R: Read> CodeReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: PendingBits::new(),
        }
    }

    /// Read the next code.
    ///
    /// Returns `Ok(None)` once fewer than [`CODE_BITS`] bits are left before
    /// the end of the input, which includes the zero padding at the end of a
    /// well-formed stream.
    pub fn read_code(&mut self) -> Result<Option<u16>> {
        while self.pending.bit_count() < CODE_BITS {
            match self.next_byte()? {
                Some(byte) => self.pending.push(u16::from(byte), BITS_PER_BYTE),
                None => return Ok(None),
            }
        }

        Ok(Some(self.pending.take(CODE_BITS)))
    }

    pub fn pending(&self) -> &PendingBits {
        &self.pending
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.inner.read_exact(&mut byte) {
            Ok(()) => Ok(Some(byte[0])),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl<R: Read> Iterator for CodeReader<R> {
    type Item = Result<u16>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_code().transpose()
    }
}
