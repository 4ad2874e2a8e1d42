//! Integration tests exercising the full driver stack in software.
//!
//! The pattern mirrors how the driver runs on hardware: a foreground
//! context calls into a [`SharedUartDma`](crate::SharedUartDma) while a
//! simulated interrupt context delivers completion events for a
//! scripted engine.
//!
//! ```text
//! foreground: send()/receive()         "ISR": on_event(..)
//!           └────────► SharedUartDma ◄────────┘
//!                           │
//!                      MockEngine (scripted wire)
//! ```

#[cfg(test)]
mod tests {
    use crate::engine::TransferEvent;
    use crate::mock::MockEngine;
    use crate::shared::SharedUartDma;

    fn tx_event<const TX: usize, const RX: usize, const DMA: usize>(
        port: &SharedUartDma<MockEngine, TX, RX, DMA>,
    ) {
        port.with(|dev| dev.engine_mut().complete_tx()).unwrap();
        port.on_event(TransferEvent::TxIdle).unwrap();
    }

    fn rx_event<const TX: usize, const RX: usize, const DMA: usize>(
        port: &SharedUartDma<MockEngine, TX, RX, DMA>,
    ) {
        port.with(|dev| dev.engine_mut().complete_rx()).unwrap();
        port.on_event(TransferEvent::RxIdle).unwrap();
    }

    // ---------------------------------------------------------------
    // Echo console: both directions live at once
    // ---------------------------------------------------------------
    #[test]
    fn echo_console_session() {
        let mut eng = MockEngine::new();
        eng.script_rx(b"go\r");
        let port: SharedUartDma<MockEngine, 32, 8, 4> = SharedUartDma::new();
        port.init(eng).unwrap();

        // Prompt goes out first
        assert_eq!(port.send(b"> "), Ok(2));
        tx_event(&port);

        // Three bytes trickle in; the foreground echoes each one back
        let mut line = [0u8; 8];
        let mut got = 0;
        for _ in 0..3 {
            rx_event(&port);

            let n = port.receive(&mut line[got..]).unwrap();
            assert_eq!(n, 1, "one completion delivers one byte");
            assert_eq!(port.send(&line[got..got + n]), Ok(1));
            got += n;

            tx_event(&port);
        }

        assert_eq!(&line[..got], b"go\r");
        port.with(|dev| {
            assert_eq!(&dev.engine().sent[..], &b"> go\r"[..]);
            assert_eq!(
                dev.engine().armed_at.len(),
                4,
                "one arm at init plus one per completion"
            );
            assert!(!dev.tx_active());
            assert_eq!(dev.rx_overruns(), 0);
        })
        .unwrap();
    }

    // ---------------------------------------------------------------
    // Transmit back-pressure: caller retries, ISR drains
    // ---------------------------------------------------------------
    #[test]
    fn backpressure_retry_loop() {
        let port: SharedUartDma<MockEngine, 8, 8, 4> = SharedUartDma::new();
        port.init(MockEngine::new()).unwrap();

        let payload = b"the quick brown fox!"; // 20 bytes, FIFO holds 8
        let mut offset = 0;
        let mut rounds = 0;
        while offset < payload.len() {
            offset += port.send(&payload[offset..]).unwrap();
            if port.with(|dev| dev.tx_active()).unwrap() {
                tx_event(&port);
            }
            rounds += 1;
            assert!(rounds < 64, "retry loop failed to make progress");
        }

        // Everything is accepted; drain what is still buffered
        while port.with(|dev| dev.tx_active()).unwrap() {
            tx_event(&port);
        }

        port.with(|dev| {
            assert_eq!(&dev.engine().sent[..], &payload[..]);
            assert_eq!(dev.tx_free(), 8);
        })
        .unwrap();
    }

    // ---------------------------------------------------------------
    // Receive burst against a slow reader: bounded loss, order kept
    // ---------------------------------------------------------------
    #[test]
    fn burst_reception_with_slow_reader() {
        let mut eng = MockEngine::new();
        eng.script_rx(b"0123456789");
        let port: SharedUartDma<MockEngine, 8, 4, 4> = SharedUartDma::new();
        port.init(eng).unwrap();

        // Six bytes land before the foreground gets around to reading;
        // the 4-byte FIFO keeps the oldest four.
        for _ in 0..6 {
            rx_event(&port);
        }

        let mut buf = [0u8; 8];
        assert_eq!(port.receive(&mut buf), Ok(4));
        assert_eq!(&buf[..4], b"0123");
        port.with(|dev| assert_eq!(dev.rx_overruns(), 2)).unwrap();

        // The reader has caught up; the rest of the burst survives
        for _ in 0..4 {
            rx_event(&port);
        }
        assert_eq!(port.receive(&mut buf), Ok(4));
        assert_eq!(&buf[..4], b"6789", "post-overrun bytes stay in order");
        port.with(|dev| assert_eq!(dev.rx_overruns(), 2)).unwrap();
    }

    // ---------------------------------------------------------------
    // Formatted logging drains through chunked transfers
    // ---------------------------------------------------------------
    #[test]
    fn formatted_lines_drain_fully() {
        let port: SharedUartDma<MockEngine, 64, 8, 16> = SharedUartDma::new();
        port.init(MockEngine::new()).unwrap();

        assert_eq!(
            port.send_fmt(format_args!("tick {} at {}ms\r\n", 7, 1250)),
            Ok(18)
        );
        assert_eq!(port.send_fmt(format_args!("temp {}C\r\n", 36)), Ok(10));

        while port.with(|dev| dev.tx_active()).unwrap() {
            tx_event(&port);
        }

        port.with(|dev| {
            assert_eq!(
                &dev.engine().sent[..],
                &b"tick 7 at 1250ms\r\ntemp 36C\r\n"[..]
            );
            assert!(
                dev.engine().chunk_lens.iter().all(|&len| len <= 16),
                "no transfer may exceed the scratch size"
            );
        })
        .unwrap();
    }
}
