//! Owned read buffer passed between the request, the transport and the client.

use bytes::{Bytes, BytesMut};
use std::fmt;
use std::io::{self, Read};

/// Default capacity for one body read.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 32 * 1024;

/// Fixed-capacity byte buffer plus the number of bytes filled.
///
/// An `IoBuffer` is never shared: it moves into the transport for a read,
/// comes back filled, and then moves into the `did_receive_data`
/// notification.
pub struct IoBuffer {
    buf: BytesMut,
    filled: usize,
}

impl IoBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: BytesMut::zeroed(capacity),
            filled: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// The whole writable region, regardless of how much is filled.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.buf[..]
    }

    /// Record how many bytes a writer placed at the front of the buffer.
    ///
    /// # Panics
    /// If `n` exceeds the capacity.
    pub fn set_filled(&mut self, n: usize) {
        assert!(
            n <= self.capacity(),
            "filled {} bytes into a {} byte buffer",
            n,
            self.capacity()
        );
        self.filled = n;
    }

    /// Copy as much of `src` as fits, returning the count copied.
    pub fn fill_from(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.capacity());
        self.buf[..n].copy_from_slice(&src[..n]);
        self.filled = n;
        n
    }

    /// Perform one read from `reader`, retrying on `Interrupted`.
    /// `Ok(0)` means end of stream.
    pub fn fill_from_reader<R: Read + ?Sized>(&mut self, reader: &mut R) -> io::Result<usize> {
        loop {
            match reader.read(&mut self.buf[..]) {
                Ok(n) => {
                    self.set_filled(n);
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// The filled bytes.
    pub fn data(&self) -> &[u8] {
        &self.buf[..self.filled]
    }

    /// Convert the filled bytes into `Bytes` without copying.
    pub fn freeze(self) -> Bytes {
        let mut buf = self.buf;
        buf.truncate(self.filled);
        buf.freeze()
    }
}

impl fmt::Debug for IoBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IoBuffer")
            .field("filled", &self.filled)
            .field("capacity", &self.capacity())
            .finish()
    }
}
