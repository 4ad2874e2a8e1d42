//! Bounded `core::fmt` sink for the formatted-send path.

use core::fmt;

/// A [`fmt::Write`] sink over a fixed-size buffer that truncates instead
/// of failing.
///
/// Formatting into a full buffer is not an error here: the overflow is
/// dropped and `write_str` keeps returning `Ok`, so one oversized line
/// costs its tail rather than poisoning the whole `write!` chain.
/// [`len()`](FmtBuf::len) tells the caller how much survived.
///
/// Used by [`UartDma::send_fmt`](crate::UartDma::send_fmt), but also
/// handy on its own for building fixed-size text records.
pub struct FmtBuf<const N: usize> {
    buf: [u8; N],
    used: usize,
}

impl<const N: usize> FmtBuf<N> {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        FmtBuf {
            buf: [0; N],
            used: 0,
        }
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.used]
    }

    /// Number of bytes written, excluding anything truncated.
    pub const fn len(&self) -> usize {
        self.used
    }

    /// `true` if nothing has been written.
    pub const fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Forget the contents, keeping the storage.
    pub fn clear(&mut self) {
        self.used = 0;
    }
}

impl<const N: usize> fmt::Write for FmtBuf<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let take = s.len().min(N - self.used);
        self.buf[self.used..self.used + take].copy_from_slice(&s.as_bytes()[..take]);
        self.used += take;
        Ok(())
    }
}
