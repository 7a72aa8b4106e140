use super::error::ReplayError;
use super::layout;

/// Sequential little-endian reader over a complete replay buffer.
///
/// The cursor only moves forward, and only when a read succeeds.
pub struct ReplayReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ReplayReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn require_len(&self, needed: usize) -> Result<(), ReplayError> {
        if self.remaining() < needed {
            return Err(ReplayError::OutOfBounds {
                offset: self.pos,
                needed,
                actual: self.remaining(),
            });
        }
        Ok(())
    }

    /// Borrow `length` bytes unmodified and advance past them.
    pub fn read_raw(&mut self, length: usize) -> Result<&'a [u8], ReplayError> {
        self.require_len(length)?;
        let bytes = &self.data[self.pos..self.pos + length];
        self.pos += length;
        Ok(bytes)
    }

    /// Read `width` bytes (1..=8) as an unsigned little-endian integer.
    pub fn read_fixed(&mut self, width: usize) -> Result<u64, ReplayError> {
        if !(layout::BYTE_WIDTH..=layout::LONG_WIDTH).contains(&width) {
            return Err(ReplayError::InvalidWidth {
                offset: self.pos,
                width,
            });
        }
        let bytes = self.read_raw(width)?;
        Ok(bytes
            .iter()
            .rev()
            .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte)))
    }

    pub fn read_u8(&mut self) -> Result<u8, ReplayError> {
        let bytes = self.read_raw(layout::BYTE_WIDTH)?;
        Ok(bytes[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, ReplayError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16, ReplayError> {
        let bytes = self.read_raw(layout::SHORT_WIDTH)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReplayError> {
        let bytes = self.read_raw(layout::INT_WIDTH)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReplayError> {
        let bytes = self.read_raw(layout::LONG_WIDTH)?;
        let mut buf = [0u8; layout::LONG_WIDTH];
        buf.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(buf))
    }

    /// Read an unsigned LEB128 value.
    pub fn read_uleb128(&mut self) -> Result<u64, ReplayError> {
        let start = self.pos;
        let mut cursor = start;
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = *self
                .data
                .get(cursor)
                .ok_or(ReplayError::OutOfBounds {
                    offset: start,
                    needed: cursor - start + 1,
                    actual: self.data.len() - start,
                })?;
            cursor += 1;

            let chunk = u64::from(byte & layout::ULEB_DATA_MASK);
            if shift > layout::ULEB_MAX_SHIFT || (shift == layout::ULEB_MAX_SHIFT && chunk > 1) {
                return Err(ReplayError::UlebOverflow { offset: start });
            }
            value |= chunk << shift;
            if byte & layout::ULEB_CONTINUATION == 0 {
                break;
            }
            shift += 7;
        }
        self.pos = cursor;
        Ok(value)
    }

    /// Read a marker-prefixed string: `0x00` is absent, `0x0b` is followed by
    /// a ULEB128 byte length and the text.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn read_optional_string(&mut self) -> Result<Option<String>, ReplayError> {
        let start = self.pos;
        let result = self.read_optional_string_at_cursor();
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn read_optional_string_at_cursor(&mut self) -> Result<Option<String>, ReplayError> {
        let offset = self.pos;
        match self.read_u8()? {
            layout::STRING_ABSENT => Ok(None),
            layout::STRING_PRESENT => {
                let length = self.read_uleb128()?;
                let length = usize::try_from(length).unwrap_or(usize::MAX);
                let bytes = self.read_raw(length)?;
                Ok(Some(String::from_utf8_lossy(bytes).into_owned()))
            }
            value => Err(ReplayError::MalformedMarker { offset, value }),
        }
    }
}

/// Number of bytes `value` occupies when ULEB128-encoded.
///
/// # Examples
/// ```
/// use osrgraph_core::uleb128_len;
///
/// assert_eq!(uleb128_len(0), 1);
/// assert_eq!(uleb128_len(127), 1);
/// assert_eq!(uleb128_len(128), 2);
/// ```
pub fn uleb128_len(value: u64) -> usize {
    let bits = (u64::BITS - value.leading_zeros()).max(1) as usize;
    bits.div_ceil(7)
}
