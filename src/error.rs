//! Status types shared across the driver.

/// Errors reported by [`UartDma`](crate::UartDma) and
/// [`SharedUartDma`](crate::SharedUartDma).
///
/// Capacity exhaustion is deliberately not in this list. A full transmit
/// buffer or an empty receive buffer shows up as a short byte count from
/// [`send`](crate::UartDma::send) / [`receive`](crate::UartDma::receive),
/// which callers are expected to check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The engine reported a transmit transfer outstanding when the
    /// driver's bookkeeping said the direction was idle.
    TxBusy,
    /// The engine rejected a receive arm the driver believed was safe
    /// to start.
    RxBusy,
    /// [`SharedUartDma::init`](crate::SharedUartDma::init) was called on
    /// an instance that already holds a driver.
    AlreadyInit,
    /// The shared instance has not been given a driver yet.
    NotInit,
}

/// Shorthand result type used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
