//! Scripted in-memory transfer engine for the test suite.

use heapless::{Deque, Vec};

use crate::engine::{Busy, TransferEngine};

const SENT_CAP: usize = 512;
const CHUNKS_CAP: usize = 64;
const SCRIPT_CAP: usize = 64;
const ARMS_CAP: usize = 64;

/// Software stand-in for the DMA serial hardware.
///
/// Records everything the driver asks of it and plays back a
/// pre-scripted inbound byte stream. Timing is collapsed: transmitted
/// bytes go straight into the [`sent`](MockEngine::sent) transcript at
/// `start_send`, and a scripted byte lands in the armed slot the moment
/// `start_receive` runs. Completion events are *not* generated here;
/// tests deliver them by calling `on_event` themselves after
/// [`complete_tx()`](MockEngine::complete_tx) /
/// [`complete_rx()`](MockEngine::complete_rx), which is what makes
/// interleavings deterministic.
///
/// Like the hardware, the mock refuses a second transfer in a direction
/// that already has one outstanding, so a driver that ever double-arms
/// fails its test immediately.
pub struct MockEngine {
    /// Every transmitted byte, in order.
    pub sent: Vec<u8, SENT_CAP>,
    /// Length of each transmit transfer, in order.
    pub chunk_lens: Vec<usize, CHUNKS_CAP>,
    /// Bytes the wire will deliver, one per armed receive. Script them
    /// all before the driver is built so every arm finds its byte.
    pub rx_script: Deque<u8, SCRIPT_CAP>,
    /// Address each receive transfer was armed at, in order.
    pub armed_at: Vec<usize, ARMS_CAP>,
    /// Reject the next `start_send` with [`Busy`] (one-shot).
    pub reject_next_send: bool,
    /// Reject the next `start_receive` with [`Busy`] (one-shot).
    pub reject_next_receive: bool,
    tx_outstanding: bool,
    rx_outstanding: bool,
}

impl MockEngine {
    pub fn new() -> Self {
        MockEngine {
            sent: Vec::new(),
            chunk_lens: Vec::new(),
            rx_script: Deque::new(),
            armed_at: Vec::new(),
            reject_next_send: false,
            reject_next_receive: false,
            tx_outstanding: false,
            rx_outstanding: false,
        }
    }

    /// Queue bytes the wire will deliver, one per armed receive.
    pub fn script_rx(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.rx_script.push_back(b).expect("rx script overflow");
        }
    }

    /// Hardware finished the outstanding transmit transfer. Call right
    /// before delivering the matching `TxIdle` event.
    pub fn complete_tx(&mut self) {
        assert!(self.tx_outstanding, "no transmit transfer outstanding");
        self.tx_outstanding = false;
    }

    /// Hardware finished the outstanding receive transfer. Call right
    /// before delivering the matching `RxIdle` event.
    pub fn complete_rx(&mut self) {
        assert!(self.rx_outstanding, "no receive transfer outstanding");
        self.rx_outstanding = false;
    }
}

impl TransferEngine for MockEngine {
    fn start_send(&mut self, src: &[u8]) -> Result<(), Busy> {
        if self.reject_next_send {
            self.reject_next_send = false;
            return Err(Busy);
        }
        if self.tx_outstanding {
            return Err(Busy);
        }

        self.tx_outstanding = true;
        self.chunk_lens.push(src.len()).expect("chunk transcript overflow");
        self.sent
            .extend_from_slice(src)
            .expect("sent transcript overflow");
        Ok(())
    }

    fn start_receive(&mut self, dst: &mut [u8]) -> Result<(), Busy> {
        assert_eq!(dst.len(), 1, "this driver arms single-byte receives");

        if self.reject_next_receive {
            self.reject_next_receive = false;
            return Err(Busy);
        }
        if self.rx_outstanding {
            return Err(Busy);
        }

        self.rx_outstanding = true;
        self.armed_at
            .push(dst.as_ptr() as usize)
            .expect("arm transcript overflow");
        if let Some(b) = self.rx_script.pop_front() {
            dst[0] = b;
        }
        Ok(())
    }
}
