//! Input capability: the encoder reads its input twice, so it must either
//! rewind the source or hold a copy of it.

use std::fs::File;
use std::io::{self, Read, Seek};

use crate::error::CodecError;

/// Object-safe union of `Read` and `Seek`.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

pub enum InputSource<'a> {
    /// Rewound to its starting position for the second pass.
    Seekable(&'a mut dyn ReadSeek),
    /// Buffered in memory before the first pass.
    Stream(&'a mut dyn Read),
}

impl<'a> InputSource<'a> {
    pub fn seekable<R: Read + Seek>(reader: &'a mut R) -> Self {
        InputSource::Seekable(reader)
    }

    pub fn stream<R: Read>(reader: &'a mut R) -> Self {
        InputSource::Stream(reader)
    }

    /// Regular files are seekable; pipes, sockets and devices are not.
    pub fn from_file(file: &'a mut File) -> io::Result<Self> {
        if file.metadata()?.is_file() {
            Ok(InputSource::Seekable(file))
        } else {
            Ok(InputSource::Stream(file))
        }
    }

    pub fn is_seekable(&self) -> bool {
        matches!(self, InputSource::Seekable(_))
    }
}

/// Read the whole stream into memory, failing once it grows past `limit`.
pub(crate) fn spool(reader: &mut dyn Read, limit: u64) -> Result<Vec<u8>, CodecError> {
    let mut data = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut data)?;
    if data.len() as u64 > limit {
        return Err(CodecError::InputTooLarge { limit });
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_capability() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        assert!(InputSource::seekable(&mut cursor).is_seekable());
        let mut slice: &[u8] = &[1, 2, 3];
        assert!(!InputSource::stream(&mut slice).is_seekable());
    }

    #[test]
    fn test_regular_file_is_seekable() {
        let mut file = tempfile::tempfile().unwrap();
        assert!(InputSource::from_file(&mut file).unwrap().is_seekable());
    }

    #[test]
    fn test_spool_within_limit() {
        let mut slice: &[u8] = b"abcdef";
        assert_eq!(spool(&mut slice, 6).unwrap(), b"abcdef".to_vec());
    }

    #[test]
    fn test_spool_over_limit() {
        let mut slice: &[u8] = b"abcdef";
        assert!(matches!(
            spool(&mut slice, 5),
            Err(CodecError::InputTooLarge { limit: 5 })
        ));
    }
}
