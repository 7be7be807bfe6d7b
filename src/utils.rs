#[cfg(feature = "std")]
use std::io::{Read, Write};

use crate::error::{Error, Result};

#[inline(always)]
#[cold]
pub const fn cold() {}

#[inline(always)]
pub const fn unlikely(b: bool) -> bool {
    if b {
        cold();
    }
    b
}

/// Byte sink for the encoder.
pub trait Writer: Sized {
    fn write_one(self, v: u8) -> Result<Self>;
    fn write_many(self, v: &[u8]) -> Result<Self>;
    fn written(&self) -> usize;
}

/// Writes into a caller-provided slice, shrinking it from the front.
pub struct BytesMut<'a> {
    buf: &'a mut [u8],
    written: usize,
}

impl<'a> BytesMut<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, written: 0 }
    }
}

impl<'a> Writer for BytesMut<'a> {
    #[inline]
    fn write_one(self, v: u8) -> Result<Self> {
        if let Some((first, tail)) = self.buf.split_first_mut() {
            *first = v;
            Ok(Self { buf: tail, written: self.written + 1 })
        } else {
            cold();
            Err(Error::OutputBufferTooSmall { size: self.written, required: self.written + 1 })
        }
    }

    #[inline]
    fn write_many(self, v: &[u8]) -> Result<Self> {
        if unlikely(v.len() > self.buf.len()) {
            let size = self.written + self.buf.len();
            return Err(Error::OutputBufferTooSmall { size, required: self.written + v.len() });
        }
        let (head, tail) = self.buf.split_at_mut(v.len());
        head.copy_from_slice(v);
        Ok(Self { buf: tail, written: self.written + v.len() })
    }

    #[inline]
    fn written(&self) -> usize {
        self.written
    }
}

#[cfg(feature = "std")]
pub struct GenericWriter<W> {
    writer: W,
    written: usize,
}

#[cfg(feature = "std")]
impl<W: Write> GenericWriter<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }
}

#[cfg(feature = "std")]
impl<W: Write> Writer for GenericWriter<W> {
    fn write_one(mut self, v: u8) -> Result<Self> {
        self.writer.write_all(&[v])?;
        self.written += 1;
        Ok(self)
    }

    fn write_many(mut self, v: &[u8]) -> Result<Self> {
        self.writer.write_all(v)?;
        self.written += v.len();
        Ok(self)
    }

    fn written(&self) -> usize {
        self.written
    }
}

/// Byte source for the decoder.
pub trait Source {
    fn read_u8(&mut self) -> Result<u8>;
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]>;
    /// Number of bytes consumed so far.
    fn offset(&self) -> usize;
}

/// Reads from an in-memory slice.
#[derive(Copy, Clone, Debug)]
pub struct Bytes<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Bytes<'a> {
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Bytes that haven't been consumed yet.
    pub const fn remaining(&self) -> &'a [u8] {
        self.data
    }
}

impl<'a> Source for Bytes<'a> {
    #[inline]
    fn read_u8(&mut self) -> Result<u8> {
        if let Some((&v, tail)) = self.data.split_first() {
            self.data = tail;
            self.offset += 1;
            Ok(v)
        } else {
            cold();
            Err(Error::UnexpectedBufferEnd)
        }
    }

    #[inline]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        if unlikely(self.data.len() < N) {
            return Err(Error::UnexpectedBufferEnd);
        }
        let (head, tail) = self.data.split_at(N);
        let mut out = [0; N];
        out.copy_from_slice(head);
        self.data = tail;
        self.offset += N;
        Ok(out)
    }

    #[inline]
    fn offset(&self) -> usize {
        self.offset
    }
}

/// Reads from any `std::io::Read`, never past the end marker.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoReader<R> {
    reader: R,
    offset: usize,
}

#[cfg(feature = "std")]
impl<R: Read> IoReader<R> {
    pub const fn new(reader: R) -> Self {
        Self { reader, offset: 0 }
    }

    pub const fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(feature = "std")]
impl<R: Read> Source for IoReader<R> {
    fn read_u8(&mut self) -> Result<u8> {
        let [v] = self.read_array::<1>()?;
        Ok(v)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0; N];
        self.reader.read_exact(&mut out)?;
        self.offset += N;
        Ok(out)
    }

    fn offset(&self) -> usize {
        self.offset
    }
}
