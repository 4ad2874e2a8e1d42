//! Sharing one driver between the foreground and an interrupt handler.
//!
//! [`UartDma`] itself is a plain `&mut self` value; Rust will not let a
//! `main` loop and an interrupt handler both hold it. [`SharedUartDma`]
//! is the two-context wrapper: a `static`-placeable cell that runs every
//! driver call inside a [`critical_section`], so a completion interrupt
//! can never observe a half-updated FIFO, and a `send` can never lose
//! the race between its idle check and the kick.
//!
//! On bare metal the critical section is provided by the platform crate
//! (for single-core Cortex-M, the `cortex-m` crate's
//! `critical-section-single-core` feature); the test suite uses the
//! `critical-section` crate's own `std` implementation.
//!
//! ## Usage
//!
//! ```ignore
//! use uart_dma::{SharedUartDma, TransferEvent};
//!
//! // One shared instance per hardware port.
//! static CONSOLE: SharedUartDma<UartEngine, 512, 64, 32> = SharedUartDma::new();
//!
//! // main, once clocks, pins and DMA channels are up:
//! CONSOLE.init(engine)?;
//! CONSOLE.send(b"boot\r\n")?;
//!
//! // in the UART/DMA interrupt handler:
//! let _ = CONSOLE.on_event(TransferEvent::TxIdle);
//! ```

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;

use crate::driver::UartDma;
use crate::engine::{TransferEngine, TransferEvent};
use crate::error::{Error, Result};

/// A [`UartDma`] behind a critical section, for use from exactly one
/// foreground caller plus one interrupt dispatcher.
///
/// Starts out empty so it can live in a `static`;
/// [`init()`](SharedUartDma::init) installs the driver and starts
/// reception. Every other method enters a critical section, locates the
/// driver, and forwards to the [`UartDma`] method of the same name.
/// Calls before `init` return [`Error::NotInit`].
pub struct SharedUartDma<E: TransferEngine, const TX: usize, const RX: usize, const DMA: usize> {
    inner: Mutex<RefCell<Option<UartDma<E, TX, RX, DMA>>>>,
}

impl<E: TransferEngine, const TX: usize, const RX: usize, const DMA: usize>
    SharedUartDma<E, TX, RX, DMA>
{
    /// An empty shared instance.
    pub const fn new() -> Self {
        SharedUartDma {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Build the driver around `engine`, install it, start reception.
    ///
    /// [`UartDma::start`] runs only after the driver sits in its final
    /// place inside this cell, because the engine latches the address
    /// of a landing slot; arming a driver that still has a move ahead
    /// of it would hand the hardware a dead location.
    ///
    /// Fails with [`Error::AlreadyInit`] if a driver is already
    /// installed and with [`Error::RxBusy`] if the engine rejects the
    /// first arm. In both cases the offered engine is dropped and the
    /// port stays as it was.
    pub fn init(&self, engine: E) -> Result<()> {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            if slot.is_some() {
                return Err(Error::AlreadyInit);
            }

            let dev = slot.insert(UartDma::new(engine));
            match dev.start() {
                Ok(()) => Ok(()),
                Err(e) => {
                    *slot = None;
                    Err(e)
                }
            }
        })
    }

    /// [`UartDma::send`] under the critical section.
    pub fn send(&self, bytes: &[u8]) -> Result<usize> {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            let dev = slot.as_mut().ok_or(Error::NotInit)?;
            dev.send(bytes)
        })
    }

    /// [`UartDma::send_fmt`] under the critical section.
    pub fn send_fmt(&self, args: fmt::Arguments<'_>) -> Result<usize> {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            let dev = slot.as_mut().ok_or(Error::NotInit)?;
            dev.send_fmt(args)
        })
    }

    /// [`UartDma::receive`] under the critical section.
    pub fn receive(&self, dst: &mut [u8]) -> Result<usize> {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            let dev = slot.as_mut().ok_or(Error::NotInit)?;
            Ok(dev.receive(dst))
        })
    }

    /// [`UartDma::on_event`] under the critical section.
    ///
    /// This is the call to make from the interrupt handler. It returns
    /// [`Error::NotInit`] when the interrupt fires before `init` has
    /// run, which is worth surfacing: it means the hardware was started
    /// before the driver.
    pub fn on_event(&self, event: TransferEvent) -> Result<()> {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            let dev = slot.as_mut().ok_or(Error::NotInit)?;
            dev.on_event(event)
        })
    }

    /// Run `f` directly on the driver inside the critical section.
    ///
    /// Escape hatch for anything without a forwarding method, such as
    /// the introspection accessors.
    pub fn with<R>(&self, f: impl FnOnce(&mut UartDma<E, TX, RX, DMA>) -> R) -> Result<R> {
        critical_section::with(|cs| {
            let mut slot = self.inner.borrow_ref_mut(cs);
            let dev = slot.as_mut().ok_or(Error::NotInit)?;
            Ok(f(dev))
        })
    }
}
