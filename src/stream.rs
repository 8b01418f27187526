//! The timed transmission loop.
//!
//! While running, each tick reads the clock, re-encodes the packet in
//! place, hands it to the UDP sink, and sleeps for `1/rate` seconds. A
//! failed send is reported and the loop moves on to the next tick with a
//! fresh timestamp; nothing is queued or retried. Cancellation is
//! observed between the sleep and the next encode.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::clock::{Clock, WallClock};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::packet::{self, PACKET_LEN};
use crate::scale::GeoCodes;
use crate::sink::UdpSink;

/// Single-task loop that re-renders and re-sends the packet at the
/// configured rate.
///
/// Owns the packet buffer and overwrites it each tick; the position
/// codes are scaled once from the session configuration. Dropping the
/// loop releases the transport socket.
pub struct StreamLoop {
    config: SessionConfig,
    codes: GeoCodes,
    sink: UdpSink,
    clock: Arc<dyn Clock>,
    buf: [u8; PACKET_LEN],
    packets_sent: u64,
}

impl StreamLoop {
    /// Create a loop driven by the system wall clock.
    pub fn new(config: SessionConfig, sink: UdpSink) -> Self {
        Self::with_clock(config, sink, Arc::new(WallClock::new()))
    }

    /// Create a loop driven by the given clock.
    pub fn with_clock(config: SessionConfig, sink: UdpSink, clock: Arc<dyn Clock>) -> Self {
        let codes = config.geo_codes();
        Self {
            config,
            codes,
            sink,
            clock,
            buf: [0u8; PACKET_LEN],
            packets_sent: 0,
        }
    }

    /// Number of packets successfully handed to the transport.
    pub fn packets_sent(&self) -> u64 {
        self.packets_sent
    }

    /// Run until `cancel` fires.
    ///
    /// Timestamps are non-decreasing across ticks and sends are issued
    /// in tick order.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<()> {
        let period = self.config.tick_period();
        tracing::info!(
            sink = %self.sink.name(),
            rate = self.config.rate,
            "streaming KLV packets"
        );

        loop {
            let timestamp = self.clock.now_micros();
            packet::encode_into(
                &mut self.buf,
                &self.config.mission_id,
                &self.config.platform,
                &self.codes,
                timestamp,
            );

            match self.sink.send(&self.buf).await {
                Ok(()) => self.packets_sent += 1,
                Err(e) => tracing::warn!("send failed, continuing: {e}"),
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(period) => {}
            }
        }

        tracing::info!(
            packets = self.packets_sent,
            bytes = self.sink.bytes_written(),
            "stream loop terminated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::packet::UAS_LDS_KEY;
    use std::net::{SocketAddr, SocketAddrV4};
    use tokio::net::UdpSocket;

    async fn loopback_receiver() -> (UdpSocket, SocketAddrV4) {
        let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = match receiver.local_addr().unwrap() {
            SocketAddr::V4(addr) => addr,
            other => panic!("unexpected address family: {other}"),
        };
        (receiver, addr)
    }

    #[tokio::test]
    async fn test_loop_sends_fixed_packets() {
        let (receiver, addr) = loopback_receiver().await;

        let config = SessionConfig {
            address: *addr.ip(),
            port: addr.port(),
            rate: 500.0,
            ..SessionConfig::default()
        };
        let sink = UdpSink::connect(config.destination()).await.unwrap();
        let clock = Arc::new(ManualClock::new(1_000_000));

        let cancel = CancellationToken::new();
        let loop_cancel = cancel.clone();
        let mut stream = StreamLoop::with_clock(config, sink, clock.clone());
        let task = tokio::spawn(async move {
            stream.run(loop_cancel).await.unwrap();
            stream
        });

        let mut buf = [0u8; 128];
        let mut last_timestamp = 0u64;
        for i in 0..3 {
            clock.advance_micros(2_000);
            let (n, _) = receiver.recv_from(&mut buf).await.unwrap();
            assert_eq!(n, PACKET_LEN, "packet {i} has wrong length");
            assert_eq!(&buf[0..16], &UAS_LDS_KEY);

            let mut ts_bytes = [0u8; 8];
            ts_bytes.copy_from_slice(&buf[19..27]);
            let timestamp = u64::from_be_bytes(ts_bytes);
            assert!(timestamp >= last_timestamp, "timestamps went backwards");
            last_timestamp = timestamp;
        }

        cancel.cancel();
        let stream = task.await.unwrap();
        assert!(stream.packets_sent() >= 3);
    }

    #[tokio::test]
    async fn test_static_fields_stable_across_ticks() {
        let (receiver, addr) = loopback_receiver().await;

        let config = SessionConfig {
            address: *addr.ip(),
            port: addr.port(),
            rate: 1_000.0,
            ..SessionConfig::default()
        };
        let sink = UdpSink::connect(config.destination()).await.unwrap();
        let clock = Arc::new(ManualClock::new(42));

        let cancel = CancellationToken::new();
        let loop_cancel = cancel.clone();
        let mut stream = StreamLoop::with_clock(config, sink, clock.clone());
        let task = tokio::spawn(async move { stream.run(loop_cancel).await });

        let mut first = [0u8; PACKET_LEN];
        let mut second = [0u8; PACKET_LEN];
        receiver.recv_from(&mut first).await.unwrap();
        clock.advance_micros(1_000);
        receiver.recv_from(&mut second).await.unwrap();
        cancel.cancel();
        task.await.unwrap().unwrap();

        // Everything but the timestamp and checksum is identical.
        assert_eq!(first[0..19], second[0..19]);
        assert_eq!(first[27..76], second[27..76]);
    }
}
