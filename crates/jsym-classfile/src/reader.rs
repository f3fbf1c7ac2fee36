use crate::error::{Error, Result};

/// Big-endian cursor over class file bytes.
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(Error::UnexpectedEof)?;
        let slice = self.bytes.get(self.pos..end).ok_or(Error::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn read_u1(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub(crate) fn read_u2(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn read_u4(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub(crate) fn read_u8(&mut self) -> Result<u64> {
        let high = u64::from(self.read_u4()?);
        let low = u64::from(self.read_u4()?);
        Ok((high << 32) | low)
    }

    pub(crate) fn ensure_empty(&self) -> Result<()> {
        match self.bytes.len() - self.pos {
            0 => Ok(()),
            rest => Err(Error::TrailingBytes(rest)),
        }
    }
}
