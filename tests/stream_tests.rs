//! End-to-end tests: configuration through packet bytes on the wire.

use std::net::{SocketAddr, SocketAddrV4};
use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;

use klvgen::checksum::running_checksum;
use klvgen::clock::WallClock;
use klvgen::config::SessionConfig;
use klvgen::packet::{self, CHECKSUM_RANGE, PACKET_LEN, UAS_LDS_KEY};
use klvgen::sink::UdpSink;
use klvgen::stream::StreamLoop;

#[test]
fn default_configuration_produces_expected_bytes() {
    let config = SessionConfig::default();
    config.validate().unwrap();

    let pkt = packet::encode(
        &config.mission_id,
        &config.platform,
        &config.geo_codes(),
        1_234_567_890,
    );

    assert_eq!(pkt.len(), 78);
    assert_eq!(
        &pkt[0..16],
        &[
            0x06, 0x0E, 0x2B, 0x34, 0x02, 0x0B, 0x01, 0x01, 0x0E, 0x01, 0x03, 0x01, 0x01, 0x00,
            0x00, 0x00
        ]
    );
    assert_eq!(pkt[16], 0x3D);
    assert_eq!(&pkt[17..19], &[0x02, 0x08]);
    assert_eq!(&pkt[71..74], &[0x41, 0x01, 0x02]);
}

#[test]
fn excessive_rate_rejected_before_any_transport() {
    let config = SessionConfig {
        rate: 1_000_001.0,
        ..SessionConfig::default()
    };
    // The binary exits on this error without opening a socket or
    // sending a packet.
    assert!(config.validate().is_err());
}

#[test]
fn overlong_mission_id_truncated_but_still_twelve_bytes_on_wire() {
    let config = SessionConfig {
        mission_id: "Operation Redwing Extended".to_string(),
        ..SessionConfig::default()
    }
    .normalized();

    assert_eq!(config.mission_id.len(), 12);

    let pkt = packet::encode(
        &config.mission_id,
        &config.platform,
        &config.geo_codes(),
        0,
    );
    assert_eq!(&pkt[27..29], &[0x03, 0x0C]);
    assert_eq!(&pkt[29..41], b"Operation Re");
}

#[tokio::test]
async fn streamed_packets_decode_on_loopback() {
    let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = match receiver.local_addr().unwrap() {
        SocketAddr::V4(addr) => addr,
        other => panic!("unexpected address family: {other}"),
    };

    let config = session_for(addr);
    config.validate().unwrap();

    let sink = UdpSink::connect(config.destination()).await.unwrap();
    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();
    let mut stream = StreamLoop::with_clock(config, sink, Arc::new(WallClock::new()));
    let task = tokio::spawn(async move {
        stream.run(loop_cancel).await.unwrap();
        stream
    });

    let mut buf = [0u8; 256];
    let mut last_timestamp = 0u64;
    for _ in 0..3 {
        let (n, _) = receiver.recv_from(&mut buf).await.unwrap();
        assert_eq!(n, PACKET_LEN);
        assert_eq!(&buf[0..16], &UAS_LDS_KEY);

        // A standard-conformant receiver verifies the trailing sum over
        // bytes 0..=75.
        let stored = u16::from_be_bytes([buf[76], buf[77]]);
        assert_eq!(stored, running_checksum(&buf[..CHECKSUM_RANGE]));

        let mut ts_bytes = [0u8; 8];
        ts_bytes.copy_from_slice(&buf[19..27]);
        let timestamp = u64::from_be_bytes(ts_bytes);
        assert!(timestamp >= last_timestamp);
        // Wall clock: after 2020-01-01 in microseconds.
        assert!(timestamp > 1_577_836_800_000_000);
        last_timestamp = timestamp;
    }

    cancel.cancel();
    let stream = task.await.unwrap();
    assert!(stream.packets_sent() >= 3);
}

fn session_for(addr: SocketAddrV4) -> SessionConfig {
    SessionConfig {
        address: *addr.ip(),
        port: addr.port(),
        rate: 200.0,
        ..SessionConfig::default()
    }
}
