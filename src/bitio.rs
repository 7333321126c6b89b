//! Bit-level stream packing and unpacking.
//!
//! Bits are packed most-significant-bit first. The writer pads a trailing
//! partial byte with zero bits on the low end when it is finished.

use std::io::{self, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::codebook::Code;

/// Packs single bits into bytes on an underlying sink.
pub struct BitSink<W: Write> {
    inner: BitWriter<W, BigEndian>,
    bits_written: u64,
}

impl<W: Write> BitSink<W> {
    pub fn new(sink: W) -> Self {
        Self {
            inner: BitWriter::endian(sink, BigEndian),
            bits_written: 0,
        }
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.inner.write_bit(bit)?;
        self.bits_written += 1;
        Ok(())
    }

    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for bit in code.bits() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Zero-pad the final partial byte, flush, and hand back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.byte_align()?;
        let mut sink = self.inner.into_writer();
        sink.flush()?;
        Ok(sink)
    }
}

/// Reads single bits, forward only, from an underlying source.
pub struct BitSource<R: Read> {
    inner: BitReader<R, BigEndian>,
    bits_read: u64,
}

impl<R: Read> BitSource<R> {
    pub fn new(source: R) -> Self {
        Self {
            inner: BitReader::endian(source, BigEndian),
            bits_read: 0,
        }
    }

    /// Next bit, or `None` once the source is exhausted.
    pub fn read_bit(&mut self) -> io::Result<Option<bool>> {
        match self.inner.read_bit() {
            Ok(bit) => {
                self.bits_read += 1;
                Ok(Some(bit))
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// True when no bits of the current byte remain buffered.
    pub fn is_aligned(&self) -> bool {
        self.inner.byte_aligned()
    }
}
