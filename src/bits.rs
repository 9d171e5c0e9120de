//! Bit-addressable cursor over a byte slice.
//!
//! Bits are addressed in MSB-first order: bit 0 is the high bit of the first byte.

use crate::errors::DecodeError;

/// Read-only bit view over a byte buffer with a movable read position.
#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn total_bits(&self) -> usize {
        self.data.len() * 8
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Bits left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.total_bits().saturating_sub(self.position)
    }

    /// Fails with [DecodeError::OutOfRange] unless `width` bits fit at `start`.
    pub fn check_window(&self, start: usize, width: usize) -> Result<(), DecodeError> {
        if start
            .checked_add(width)
            .map_or(true, |end| end > self.total_bits())
        {
            return Err(DecodeError::OutOfRange {
                position: start,
                width,
                total_bits: self.total_bits(),
            });
        }

        Ok(())
    }

    /// Reads `count` bits starting at `start` as an unsigned value (max 64 bits). MSB-first.
    ///
    /// Works a byte at a time: each step takes as many bits as remain in the
    /// current byte, so an aligned 32-bit read touches exactly four bytes.
    pub fn read_bits_at(&self, start: usize, count: usize) -> Result<u64, DecodeError> {
        if count > 64 {
            return Err(DecodeError::TooManyBitsRead);
        }

        self.check_window(start, count)?;

        let mut value = 0u64;
        let mut pos = start;
        let mut left = count;

        while left > 0 {
            let byte = self.data[pos / 8];
            let available = 8 - pos % 8;
            let take = available.min(left);
            let chunk = (byte >> (available - take)) & low_mask(take);

            value = (value << take) | chunk as u64;
            pos += take;
            left -= take;
        }

        Ok(value)
    }

    /// Reads `count` whole bytes starting at bit `start`, which need not be byte-aligned.
    pub fn read_bytes_at(&self, start: usize, count: usize) -> Result<Vec<u8>, DecodeError> {
        let width = count
            .checked_mul(8)
            .ok_or(DecodeError::OutOfRange {
                position: start,
                width: usize::MAX,
                total_bits: self.total_bits(),
            })?;
        self.check_window(start, width)?;

        if start % 8 == 0 {
            let first = start / 8;
            return Ok(self.data[first..first + count].to_vec());
        }

        (0..count)
            .map(|i| self.read_bits_at(start + i * 8, 8).map(|b| b as u8))
            .collect()
    }

    pub fn advance(&mut self, n: usize) {
        self.position += n;
    }

    /// Moves the cursor back `n` bits; fails rather than wrapping below bit 0.
    pub fn rewind(&mut self, n: usize) -> Result<(), DecodeError> {
        if n > self.position {
            return Err(DecodeError::CursorUnderflow {
                position: self.position,
                width: n,
            });
        }

        self.position -= n;
        Ok(())
    }
}

fn low_mask(n: usize) -> u8 {
    ((1u16 << n) - 1) as u8
}
