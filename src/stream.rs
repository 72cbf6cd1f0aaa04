//! Byte streams that views are serialized to and deserialized from

use crate::{Error, Result};
use bytes::{Bytes, BytesMut};
use std::io::Write;

/// A sequential source of bytes
pub trait ByteSource {
    /// Bytes left to read
    fn remaining(&self) -> usize;

    /// The next `n` bytes, without consuming them
    fn peek(&self, n: usize) -> Result<&[u8]>;

    /// Skip `n` bytes
    fn advance(&mut self, n: usize) -> Result<()>;

    /// Read exactly `n` bytes
    ///
    /// Fails without consuming anything if fewer than `n` bytes remain.
    fn read(&mut self, n: usize) -> Result<Vec<u8>> {
        let out = self.peek(n)?.to_vec();
        self.advance(n)?;
        Ok(out)
    }
}

/// A sequential sink of bytes
pub trait ByteSink {
    /// Write all of `bytes`, returning how many were written
    fn write(&mut self, bytes: &[u8]) -> Result<usize>;
}

fn check_available(requested: usize, available: usize) -> Result<()> {
    if requested > available {
        return Err(Error::UnexpectedEof {
            requested,
            available,
        });
    }
    Ok(())
}

impl<'a> ByteSource for &'a [u8] {
    fn remaining(&self) -> usize {
        self.len()
    }

    fn peek(&self, n: usize) -> Result<&[u8]> {
        check_available(n, self.len())?;
        Ok(&self[..n])
    }

    fn advance(&mut self, n: usize) -> Result<()> {
        check_available(n, self.len())?;
        let data: &'a [u8] = *self;
        *self = &data[n..];
        Ok(())
    }
}

impl ByteSource for Bytes {
    fn remaining(&self) -> usize {
        self.len()
    }

    fn peek(&self, n: usize) -> Result<&[u8]> {
        check_available(n, self.len())?;
        Ok(&self[..n])
    }

    fn advance(&mut self, n: usize) -> Result<()> {
        check_available(n, self.len())?;
        let _ = self.split_to(n);
        Ok(())
    }
}

impl ByteSink for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}

impl ByteSink for BytesMut {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.extend_from_slice(bytes);
        Ok(bytes.len())
    }
}

/// Adapts any `std::io::Write` into a [`ByteSink`]
pub struct IoSink<W: Write> {
    inner: W,
}

impl<W: Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        IoSink { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ByteSink for IoSink<W> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.inner.write_all(bytes)?;
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source_reads_in_order() {
        let data = [1u8, 2, 3, 4, 5];
        let mut source: &[u8] = &data;
        assert_eq!(source.read(2).unwrap(), vec![1, 2]);
        assert_eq!(source.remaining(), 3);
        assert_eq!(source.read(3).unwrap(), vec![3, 4, 5]);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn test_short_read_consumes_nothing() {
        let data = [1u8, 2, 3];
        let mut source: &[u8] = &data;
        assert!(matches!(
            source.read(4),
            Err(Error::UnexpectedEof {
                requested: 4,
                available: 3
            })
        ));
        assert_eq!(source.remaining(), 3);

        let mut bytes = Bytes::from_static(&[9, 8]);
        assert!(bytes.read(3).is_err());
        assert_eq!(bytes.read(2).unwrap(), vec![9, 8]);
    }

    #[test]
    fn test_peek_then_advance() {
        let data = [1u8, 2, 3];
        let mut source: &[u8] = &data;
        assert_eq!(source.peek(2).unwrap(), &[1, 2]);
        assert_eq!(source.remaining(), 3);
        source.advance(2).unwrap();
        assert_eq!(source.peek(1).unwrap(), &[3]);
        assert!(source.advance(2).is_err());
        assert_eq!(source.remaining(), 1);

        let mut bytes = Bytes::from_static(&[7, 6, 5]);
        assert_eq!(bytes.peek(3).unwrap(), &[7, 6, 5]);
        bytes.advance(1).unwrap();
        assert_eq!(bytes.read(2).unwrap(), vec![6, 5]);
    }

    #[test]
    fn test_sinks() {
        let mut vec = Vec::new();
        assert_eq!(ByteSink::write(&mut vec, &[1, 2]).unwrap(), 2);
        let mut buf = BytesMut::new();
        assert_eq!(ByteSink::write(&mut buf, &[3]).unwrap(), 1);
        let mut io = IoSink::new(Vec::new());
        ByteSink::write(&mut io, &[4, 5, 6]).unwrap();
        assert_eq!(vec, vec![1, 2]);
        assert_eq!(&buf[..], &[3]);
        assert_eq!(io.into_inner(), vec![4, 5, 6]);
    }
}
