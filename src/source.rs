use std::io::prelude::*;
use std::io::SeekFrom;

use crate::Error;

/// Positional, exact-length reads over whatever holds the audio file.
pub trait ByteSource {
    fn len(&self) -> u64;

    /// Reads exactly `length` bytes starting at `position`.
    fn read_at(&mut self, position: u64, length: usize) -> Result<Vec<u8>, Error>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Adapts any `Read + Seek` (files, cursors) into a [`ByteSource`].
pub struct Source<T: Read + Seek> {
    inner: T,
    len: u64,
}

impl<T: Read + Seek> Source<T> {
    pub fn new(mut inner: T) -> Result<Source<T>, Error> {
        let len = inner.seek(SeekFrom::End(0))?;
        Ok(Source { inner, len })
    }
}

impl<T: Read + Seek> ByteSource for Source<T> {
    fn len(&self) -> u64 {
        self.len
    }

    fn read_at(&mut self, position: u64, length: usize) -> Result<Vec<u8>, Error> {
        if position > self.len {
            return Err(Error::InvalidArgument("read beyond size"));
        }
        let available = self.len - position;
        if (length as u64) > available {
            return Err(Error::UnexpectedEndOfData {
                wanted: length as u64,
                available,
            });
        }

        self.inner.seek(SeekFrom::Start(position))?;
        let mut vec = vec![0; length];
        self.inner.read_exact(&mut vec)?;
        Ok(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_at_test() {
        let mut s = Source::new(Cursor::new(b"abcdef".to_vec())).unwrap();
        assert_eq!(s.len(), 6);
        assert_eq!(s.read_at(2, 3).unwrap(), b"cde".to_vec());
        assert_eq!(s.read_at(6, 0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn short_read_test() {
        let mut s = Source::new(Cursor::new(b"abc".to_vec())).unwrap();
        match s.read_at(1, 5) {
            Err(Error::UnexpectedEndOfData { wanted, available }) => {
                assert_eq!((wanted, available), (5, 2))
            }
            x => panic!("expected end of data, got {:?}", x),
        }
    }

    #[test]
    fn empty_source_test() {
        let mut s = Source::new(Cursor::new(Vec::new())).unwrap();
        assert!(s.is_empty());
        assert!(s.read_at(0, 3).is_err());
        match s.read_at(3, 3) {
            Err(Error::InvalidArgument(m)) => assert!(m.contains("beyond size")),
            x => panic!("expected invalid argument, got {:?}", x),
        }
    }
}
