//! The boundary between the driver and the hardware transfer engine.
//!
//! The driver never touches registers. Everything it needs from the
//! DMA/serial hardware is captured by [`TransferEngine`]: start one
//! transmit transfer, arm one receive transfer, and (out of band)
//! deliver a completion event to
//! [`UartDma::on_event`](crate::UartDma::on_event). A HAL implements
//! this trait next to its interrupt plumbing; the test suite implements
//! it in software.

/// Returned by an engine that already has a transfer of the requested
/// direction outstanding.
///
/// The driver only starts a transfer when its own bookkeeping says the
/// direction is idle, so `Busy` means driver and engine disagree about
/// hardware state. It surfaces as [`Error::TxBusy`](crate::Error::TxBusy)
/// or [`Error::RxBusy`](crate::Error::RxBusy) rather than being treated
/// as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Busy;

/// Completion notification tag, delivered by the platform's interrupt
/// handler to [`UartDma::on_event`](crate::UartDma::on_event).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferEvent {
    /// The outstanding transmit transfer finished; the bytes it was
    /// reading are free to reuse.
    TxIdle,
    /// The outstanding receive transfer finished; the armed slot holds
    /// one new byte.
    RxIdle,
}

/// One DMA-capable serial transfer engine (one hardware unit).
///
/// ## Contract
///
/// - At most one transfer per direction may be outstanding. A second
///   `start_*` call in the same direction before the matching completion
///   event must return [`Busy`] instead of silently dropping the request.
/// - [`start_send`](TransferEngine::start_send) latches the address and
///   length of `src`; the caller keeps those bytes untouched and in
///   place until [`TransferEvent::TxIdle`] arrives.
///   [`UartDma`](crate::UartDma) guarantees this for its own scratch.
/// - [`start_receive`](TransferEngine::start_receive) arms a transfer
///   into `dst`; the engine must have stored the received bytes there by
///   the time it raises [`TransferEvent::RxIdle`]. This driver always
///   arms exactly one byte at a time.
/// - Neither call blocks. Completion is reported asynchronously through
///   the interrupt handler.
pub trait TransferEngine {
    /// Start one transmit transfer over the bytes of `src`.
    fn start_send(&mut self, src: &[u8]) -> Result<(), Busy>;

    /// Arm one receive transfer into `dst`.
    fn start_receive(&mut self, dst: &mut [u8]) -> Result<(), Busy>;
}
