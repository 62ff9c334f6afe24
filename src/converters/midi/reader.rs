use crate::converters::midi::MalformedError;

/// Longest variable-length quantity allowed in a Standard MIDI File
const MAX_VLQ_BYTES: usize = 4;

/// Bounded cursor over a byte slice
///
/// Every read is checked against `end`; running past it yields
/// [`MalformedError::UnexpectedEof`] with the absolute offset of the failed read.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
        }
    }

    /// Absolute offset of the next byte to be read
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.end
    }

    pub fn read_u8(&mut self) -> Result<u8, MalformedError> {
        if self.pos >= self.end {
            return Err(MalformedError::UnexpectedEof { offset: self.pos });
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Ok(v)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, MalformedError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, MalformedError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a 4-byte chunk tag such as `MThd`
    pub fn read_tag(&mut self) -> Result<[u8; 4], MalformedError> {
        let bytes = self.read_bytes(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], MalformedError> {
        if n > self.remaining() {
            return Err(MalformedError::UnexpectedEof { offset: self.pos });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), MalformedError> {
        self.read_bytes(n).map(|_| ())
    }

    /// Split off the next `len` bytes as their own reader and step past them.
    ///
    /// Offsets reported by the returned reader stay absolute.
    pub fn take(&mut self, len: usize) -> Result<ByteReader<'a>, MalformedError> {
        let start = self.pos;
        self.skip(len)?;
        Ok(ByteReader {
            data: self.data,
            pos: start,
            end: start + len,
        })
    }

    /// Read a MIDI variable-length quantity
    ///
    /// Seven bits per byte, most significant first; a set high bit means
    /// another byte follows. At most four bytes are consumed.
    pub fn read_vlq(&mut self) -> Result<u32, MalformedError> {
        let start = self.pos;
        let mut value = 0u32;
        for _ in 0..MAX_VLQ_BYTES {
            let byte = self.read_u8()?;
            value = (value << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(MalformedError::VlqTooLong { offset: start })
    }
}
