use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};

use crate::{ClassFileError, Result};

type Endian = BigEndian;

/// Big-endian primitive reads over a fully buffered class file. Running off
/// the end of the buffer reports `Truncated` with the offset the failing
/// read started at; the cursor is unspecified afterwards and the parse
/// aborts.
pub struct RawReader<'a> {
    r: Cursor<&'a [u8]>,
}

impl<'a> RawReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { r: Cursor::new(buf) }
    }

    pub fn read_u1(&mut self) -> Result<u8> {
        let pos = self.pos();
        self.r.read_u8().map_err(|_| ClassFileError::Truncated(pos))
    }

    pub fn read_u2(&mut self) -> Result<u16> {
        let pos = self.pos();
        self.r
            .read_u16::<Endian>()
            .map_err(|_| ClassFileError::Truncated(pos))
    }

    pub fn read_u4(&mut self) -> Result<u32> {
        let pos = self.pos();
        self.r
            .read_u32::<Endian>()
            .map_err(|_| ClassFileError::Truncated(pos))
    }

    /// Reads `n` bytes into an owned buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        let pos = self.pos();
        let mut buf = vec![0u8; n];
        self.r
            .read_exact(&mut buf)
            .map_err(|_| ClassFileError::Truncated(pos))?;
        Ok(buf)
    }

    pub fn pos(&self) -> usize {
        self.r.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.r.get_ref().len().saturating_sub(self.pos())
    }

    pub fn eof(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod raw_reader_tests {
    use super::*;

    #[test]
    fn it_should_read_big_endian_integers() {
        let mut r = RawReader::new(&[0x12, 0x34, 0x56, 0x78, 0x9A]);
        assert_eq!(r.read_u4().unwrap(), 0x12345678);
        assert_eq!(r.read_u1().unwrap(), 0x9A);
        assert!(r.eof());
    }

    #[test]
    fn it_should_track_position_and_remaining() {
        let mut r = RawReader::new(&[0x00, 0x01, 0x02, 0x03]);
        assert_eq!(r.pos(), 0);
        assert_eq!(r.remaining(), 4);
        r.read_u2().unwrap();
        assert_eq!(r.pos(), 2);
        assert_eq!(r.remaining(), 2);
        assert!(!r.eof());
    }

    #[test]
    fn it_should_fail_if_there_is_not_enough_data() {
        let mut r = RawReader::new(&[0xCA, 0xFE, 0xBA]);
        assert_eq!(r.read_u4(), Err(ClassFileError::Truncated(0)));
    }

    #[test]
    fn it_should_report_the_offset_the_read_started_at() {
        let mut r = RawReader::new(&[0x01, 0x02, 0x03]);
        r.read_u2().unwrap();
        assert_eq!(r.read_bytes(4), Err(ClassFileError::Truncated(2)));
    }
}
