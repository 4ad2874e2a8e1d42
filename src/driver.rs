//! Buffered, interrupt-driven send and receive over one transfer engine.
//!
//! [`UartDma`] turns a [`TransferEngine`] that moves one chunk at a time
//! into a byte stream with buffering on both sides. The foreground talks
//! to the FIFOs; the completion interrupt keeps the hardware fed.
//!
//! ```text
//! foreground                                 interrupt context
//! ──────────                                 ─────────────────
//! send() ──► tx FIFO ──dequeue──► tx scratch ──► engine.start_send()
//!                ▲                                      │
//!                └────────── on_event(TxIdle) ◄─────────┘
//!
//! receive() ◄── rx FIFO ◄──enqueue── slot A / slot B ◄── wire
//!                   ▲                                     │
//!                   └──────── on_event(RxIdle), re-arm ◄──┘
//! ```
//!
//! ## Transmit
//!
//! `send` queues bytes and, when no transfer is in flight, immediately
//! hands the first chunk (up to `DMA` bytes) to the engine. Every
//! [`TxIdle`](TransferEvent::TxIdle) completion dequeues the next chunk
//! and resubmits, until the FIFO runs dry and the driver goes idle.
//! This is plain draining of a buffer larger than one transfer, not a
//! retry mechanism.
//!
//! ## Receive
//!
//! Reception never stops once armed. [`start()`](UartDma::start) arms a
//! one-byte transfer into one of two landing slots; every
//! [`RxIdle`](TransferEvent::RxIdle) completion arms the *other* slot
//! first and only then moves the landed byte into the receive FIFO. The
//! wire keeps running with no regard for software state, so the gap
//! between completion and the next arm has to stay under one symbol
//! period; arming before copying keeps that gap to a few instructions.
//!
//! Arming is a separate step from construction because the engine
//! latches the address of the armed slot inside the driver: the driver
//! moves to the place it will live first, then `start` points the
//! hardware at it.
//!
//! ## Contexts
//!
//! All methods take `&mut self`, so on a single instance the borrow
//! checker already rules out foreground/interrupt overlap. To actually
//! share one driver between a `main` loop and an interrupt handler, put
//! it in a [`SharedUartDma`](crate::SharedUartDma), which runs every
//! call inside a critical section.

use core::fmt::{self, Write};

use crate::engine::{Busy, TransferEngine, TransferEvent};
use crate::error::{Error, Result};
use crate::fifo::Fifo;
use crate::fmt::FmtBuf;

/// Formatting scratch size in bytes for [`UartDma::send_fmt`]. Longer
/// lines are truncated.
pub const FMT_SCRATCH: usize = 256;

/// Which single-byte landing slot the hardware is receiving into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    A,
    B,
}

impl Slot {
    fn other(self) -> Slot {
        match self {
            Slot::A => Slot::B,
            Slot::B => Slot::A,
        }
    }

    fn index(self) -> usize {
        match self {
            Slot::A => 0,
            Slot::B => 1,
        }
    }
}

/// Buffered full-duplex driver over one [`TransferEngine`].
///
/// # Type Parameters
///
/// - `E`: The transfer engine.
/// - `TX`: Transmit FIFO capacity in bytes.
/// - `RX`: Receive FIFO capacity in bytes. Size it for the worst burst
///   the foreground can be late for: one byte lands roughly every
///   87 µs at 115 200 baud.
/// - `DMA`: Transmit scratch size in bytes, i.e. the largest chunk
///   handed to the engine in one transfer.
pub struct UartDma<E: TransferEngine, const TX: usize, const RX: usize, const DMA: usize> {
    engine: E,
    /// Outbound bytes waiting for a transfer. Fed by `send`, drained by
    /// the completion path.
    tx_fifo: Fifo<TX>,
    /// Inbound bytes waiting for the application. Fed by the completion
    /// path, drained by `receive`.
    rx_fifo: Fifo<RX>,
    /// Scratch the hardware reads from. The engine owns it from
    /// `start_send` until the matching `TxIdle`.
    tx_dma: [u8; DMA],
    /// Bytes sitting in `tx_dma` that the engine has not accepted yet.
    /// Nonzero only after the engine rejected a start.
    tx_staged: usize,
    /// `true` while a transmit transfer is armed or about to be.
    tx_active: bool,
    /// The two single-byte landing slots for the ping-pong receive.
    rx_slots: [u8; 2],
    /// The slot the hardware is currently receiving into.
    armed: Slot,
    /// Set when a re-arm was rejected: `armed` names a slot with no
    /// transfer behind it, so the next completion carries no byte of
    /// ours.
    rx_stale: bool,
    /// Received bytes dropped because `rx_fifo` was full when they
    /// landed.
    rx_overruns: u32,
}

impl<E: TransferEngine, const TX: usize, const RX: usize, const DMA: usize>
    UartDma<E, TX, RX, DMA>
{
    /// Take ownership of the engine.
    ///
    /// The driver comes up with both directions idle and nothing armed.
    /// Move it to wherever it will live, then call
    /// [`start()`](UartDma::start) to begin reception.
    ///
    /// # Panics
    ///
    /// `TX`, `RX` and `DMA` must all be nonzero.
    pub fn new(engine: E) -> Self {
        assert!(DMA > 0, "transmit scratch must hold at least one byte");

        UartDma {
            engine,
            tx_fifo: Fifo::new(),
            rx_fifo: Fifo::new(),
            tx_dma: [0; DMA],
            tx_staged: 0,
            tx_active: false,
            rx_slots: [0; 2],
            armed: Slot::A,
            rx_stale: false,
            rx_overruns: 0,
        }
    }

    /// Begin perpetual reception by arming the first one-byte transfer.
    ///
    /// Call once, after the driver sits in the place it will occupy
    /// while transfers run. The engine latches the address of a landing
    /// slot inside the driver, so arming and then moving the driver
    /// would leave the hardware pointing at the driver's old location.
    /// [`SharedUartDma::init`](crate::SharedUartDma::init) sequences
    /// this correctly for the `static` case.
    ///
    /// From a successful `start` until [`release()`](UartDma::release)
    /// there is always either a receive transfer outstanding or an
    /// [`on_event()`](UartDma::on_event) call about to arm one.
    ///
    /// Returns [`Error::RxBusy`] if the engine already had a receive
    /// transfer outstanding; the driver is unchanged and the call may
    /// be retried.
    pub fn start(&mut self) -> Result<()> {
        self.arm(Slot::A)
    }

    /// Queue bytes for transmission and make sure the line is moving.
    ///
    /// Whatever fits into the transmit FIFO is accepted; the rest is the
    /// caller's to retry once completions have freed space. If no
    /// transfer was in flight, the first chunk is handed to the engine
    /// before this returns.
    ///
    /// Returns the number of bytes accepted, possibly 0.
    /// `Err(Error::TxBusy)` means the engine contradicted the driver's
    /// idle bookkeeping; the accepted bytes stay buffered and drain on
    /// the next completion event.
    pub fn send(&mut self, bytes: &[u8]) -> Result<usize> {
        let accepted = self.tx_fifo.enqueue(bytes);
        if !self.tx_active {
            self.pump()?;
        }
        Ok(accepted)
    }

    /// Format into a bounded scratch buffer and send the result.
    ///
    /// Formatted text beyond [`FMT_SCRATCH`] bytes is cut off, and like
    /// [`send()`](UartDma::send) the transmit FIFO may accept fewer
    /// bytes than were formatted. The returned count is what was
    /// actually queued.
    pub fn send_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<usize> {
        let mut line = FmtBuf::<FMT_SCRATCH>::new();
        // FmtBuf itself never errors; truncation is silent.
        let _ = line.write_fmt(args);
        self.send(line.as_bytes())
    }

    /// Drain buffered received bytes into `dst`.
    ///
    /// Never blocks. Returns how many bytes were copied, 0 when nothing
    /// has arrived yet. Bytes keep landing from the interrupt path in
    /// between calls; poll often enough that the backlog stays clear of
    /// `RX` or [`rx_overruns()`](UartDma::rx_overruns) starts ticking.
    pub fn receive(&mut self, dst: &mut [u8]) -> usize {
        self.rx_fifo.dequeue(dst)
    }

    /// Single completion entry point for the interrupt context.
    ///
    /// Call with the direction tag the hardware reported. Bounded work
    /// only: at most one FIFO copy and one engine start per call. A
    /// spurious [`TxIdle`](TransferEvent::TxIdle) while the transmit
    /// side is idle is harmless. After a re-arm failed with
    /// [`Error::RxBusy`], the next [`RxIdle`](TransferEvent::RxIdle)
    /// only restores the arm; the slot content is stale and is not
    /// delivered.
    pub fn on_event(&mut self, event: TransferEvent) -> Result<()> {
        match event {
            TransferEvent::TxIdle => self.pump(),
            TransferEvent::RxIdle => self.rotate_rx(),
        }
    }

    /// Hand the next chunk of buffered bytes to the engine, or go idle
    /// if there are none.
    fn pump(&mut self) -> Result<()> {
        if self.tx_staged == 0 {
            self.tx_staged = self.tx_fifo.dequeue(&mut self.tx_dma);
        }
        if self.tx_staged == 0 {
            self.tx_active = false;
            return Ok(());
        }

        self.tx_active = true;
        match self.engine.start_send(&self.tx_dma[..self.tx_staged]) {
            Ok(()) => {
                // The scratch belongs to the hardware until TxIdle.
                self.tx_staged = 0;
                Ok(())
            }
            // The chunk stays staged; whichever transfer the engine
            // still considers outstanding will retry it on completion.
            Err(Busy) => Err(Error::TxBusy),
        }
    }

    /// One byte landed in the armed slot: re-arm the other slot, then
    /// move the byte into the receive FIFO.
    fn rotate_rx(&mut self) -> Result<()> {
        if self.rx_stale {
            // The previous re-arm was rejected, so this completion
            // ended some other transfer and the pending slot holds no
            // fresh byte. Arm it now; there is nothing to deliver.
            let retry = self.arm(self.armed);
            self.rx_stale = retry.is_err();
            return retry;
        }

        let completed = self.armed;

        // Re-arm before touching the landed byte; the copy can wait,
        // the wire cannot.
        let rearm = self.arm(completed.other());
        self.rx_stale = rearm.is_err();

        let byte = [self.rx_slots[completed.index()]];
        if self.rx_fifo.enqueue(&byte) == 0 {
            // Receive FIFO full. The byte is gone, same as a UART
            // overrun; the counter makes it visible.
            self.rx_overruns = self.rx_overruns.saturating_add(1);
        }
        rearm
    }

    /// Arm a one-byte receive transfer into `slot`.
    fn arm(&mut self, slot: Slot) -> Result<()> {
        self.armed = slot;
        let i = slot.index();
        self.engine
            .start_receive(&mut self.rx_slots[i..i + 1])
            .map_err(|_| Error::RxBusy)
    }

    /// `true` while a transmit transfer is armed or about to be.
    pub fn tx_active(&self) -> bool {
        self.tx_active
    }

    /// Free space in the transmit FIFO right now.
    pub fn tx_free(&self) -> usize {
        self.tx_fifo.free()
    }

    /// Bytes waiting in the receive FIFO right now.
    pub fn rx_available(&self) -> usize {
        self.rx_fifo.len()
    }

    /// Received bytes dropped so far because the receive FIFO was full
    /// when they landed. Saturates.
    pub fn rx_overruns(&self) -> u32 {
        self.rx_overruns
    }

    /// Shared access to the engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Exclusive access to the engine.
    ///
    /// Starting transfers behind the driver's back breaks its
    /// one-outstanding-per-direction bookkeeping.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Tear down the driver and hand the engine back.
    ///
    /// Any still-armed receive transfer is the engine's to finish or
    /// cancel; bytes left in the FIFOs are dropped.
    pub fn release(self) -> E {
        self.engine
    }
}
