//! Fixed-capacity byte FIFO with element-size quantization.
//!
//! [`Fifo`] is the buffering primitive on both sides of the driver: a
//! circular buffer over raw bytes that accepts and returns only whole
//! multiples of a configured element size. It is plain data with no
//! interior mutability; keeping the foreground and interrupt contexts
//! from touching it at the same time is the owner's job (see
//! [`SharedUartDma`](crate::SharedUartDma)).
//!
//! ## Quantization
//!
//! The element size `E` is the smallest unit the FIFO will move. Both
//! [`enqueue()`](Fifo::enqueue) and [`dequeue()`](Fifo::dequeue) first
//! clamp the request to the space/data available, then round the clamped
//! length *down* to a multiple of `E`. A caller therefore never observes
//! a partially stored record: either whole elements move, or nothing
//! does, and the returned count says which. With the default `E = 1`
//! the FIFO is a plain byte ring.

/// A fixed-capacity circular byte buffer that moves data in whole
/// elements only.
///
/// # Type Parameters
///
/// - `N`: Storage capacity in bytes. Must be > 0.
/// - `E`: Element size in bytes (defaults to 1). Must be > 0. A capacity
///   that is a multiple of `E` makes full use of the storage; any
///   remainder below one element can never be filled.
pub struct Fifo<const N: usize, const E: usize = 1> {
    buf: [u8; N],
    /// Write position: offset where the next byte goes in.
    head: usize,
    /// Read position: offset of the oldest stored byte.
    tail: usize,
    /// Bytes currently stored. Always a multiple of `E`.
    filled: usize,
}

impl<const N: usize, const E: usize> Fifo<N, E> {
    /// Create an empty FIFO with zeroed storage.
    ///
    /// # Panics
    ///
    /// `N` and `E` must both be nonzero.
    pub const fn new() -> Self {
        assert!(N > 0, "FIFO needs at least one byte of storage");
        assert!(E > 0, "element size must be nonzero");

        Fifo {
            buf: [0; N],
            head: 0,
            tail: 0,
            filled: 0,
        }
    }

    /// Append bytes from `src`, whole elements only.
    ///
    /// The accepted length is `min(src.len(), free())` rounded down to a
    /// multiple of `E`; a partial trailing element is dropped. Returns
    /// the number of bytes actually stored, which may be less than
    /// `src.len()` (0 when the FIFO is full or the request is below one
    /// element). A short count is not an error.
    pub fn enqueue(&mut self, src: &[u8]) -> usize {
        let len = Self::quantize(src.len().min(N - self.filled));
        if len == 0 {
            return 0;
        }

        // At most two contiguous copies: up to the end of storage, then
        // the wrapped remainder from the start.
        let first = len.min(N - self.head);
        self.buf[self.head..self.head + first].copy_from_slice(&src[..first]);
        self.buf[..len - first].copy_from_slice(&src[first..len]);

        self.head = (self.head + len) % N;
        self.filled += len;
        len
    }

    /// Remove the oldest bytes into `dst`, whole elements only.
    ///
    /// Mirror of [`enqueue()`](Fifo::enqueue): the request is clamped to
    /// `len()`, rounded down to a multiple of `E`, and copied out in at
    /// most two segments. Returns the number of bytes written to `dst`;
    /// 0 when the FIFO is empty or `dst` is shorter than one element,
    /// in which case `dst` is left untouched.
    pub fn dequeue(&mut self, dst: &mut [u8]) -> usize {
        let len = Self::quantize(dst.len().min(self.filled));
        if len == 0 {
            return 0;
        }

        let first = len.min(N - self.tail);
        dst[..first].copy_from_slice(&self.buf[self.tail..self.tail + first]);
        dst[first..len].copy_from_slice(&self.buf[..len - first]);

        self.tail = (self.tail + len) % N;
        self.filled -= len;
        len
    }

    /// Round `len` down to a whole number of elements.
    const fn quantize(len: usize) -> usize {
        len - len % E
    }

    /// Total storage capacity in bytes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Element size in bytes, the smallest unit accepted or returned.
    pub const fn element_size(&self) -> usize {
        E
    }

    /// Bytes currently stored.
    pub const fn len(&self) -> usize {
        self.filled
    }

    /// Free space in bytes.
    pub const fn free(&self) -> usize {
        N - self.filled
    }

    /// `true` when nothing is stored.
    pub const fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// `true` when no further byte fits.
    pub const fn is_full(&self) -> bool {
        self.filled == N
    }
}
