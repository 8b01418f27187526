//! Local Data Set packet assembly.
//!
//! Every packet is exactly [`PACKET_LEN`] (78) bytes:
//!
//! | Offset | Len | Field |
//! |---|---|---|
//! | 0  | 16 | Universal Key |
//! | 16 | 1  | Set length, 0x3D (BER short form) |
//! | 17 | 10 | Timestamp item (tag 0x02, len 0x08, 8-byte value) |
//! | 27 | 14 | Mission ID item (tag 0x03, len 0x0C, 12-byte ASCII) |
//! | 41 | 14 | Platform item (tag 0x0A, len 0x0C, 12-byte ASCII) |
//! | 55 | 6  | Latitude item (tag 0x0D, len 0x04) |
//! | 61 | 6  | Longitude item (tag 0x0E, len 0x04) |
//! | 67 | 4  | Altitude item (tag 0x0F, len 0x02) |
//! | 71 | 3  | LDS version item (tag 0x41, len 0x01, value 0x02) |
//! | 74 | 4  | Checksum item (tag 0x01, len 0x02, sum over bytes 0..=75) |
//!
//! Multi-byte values are big-endian and text is null-padded. Fields are
//! laid down through [`LocalSetWriter`], a typed appender, so the layout
//! above is encoded once in [`encode_into`] rather than scattered over
//! manual offset arithmetic.

use crate::checksum::running_checksum;
use crate::scale::GeoCodes;

/// Total packet length in bytes.
pub const PACKET_LEN: usize = 78;

/// UAS LDS Universal Key identifying the metadata set.
pub const UAS_LDS_KEY: [u8; 16] = [
    0x06, 0x0E, 0x2B, 0x34, 0x02, 0x0B, 0x01, 0x01, 0x0E, 0x01, 0x03, 0x01, 0x01, 0x00, 0x00, 0x00,
];

/// Set length byte: count of bytes following it (61, BER short form).
pub const SET_LENGTH: u8 = 0x3D;

/// LDS version code for the ST 601.2 revision of the standard.
pub const LDS_VERSION: u8 = 0x02;

/// Wire width of the mission ID and platform text fields.
pub const TEXT_FIELD_LEN: usize = 12;

/// Number of leading bytes covered by the trailing checksum.
pub const CHECKSUM_RANGE: usize = PACKET_LEN - 2;

// Tag/length pairs, in set order. Lengths are BER short form.
const TIMESTAMP_TAG_LEN: [u8; 2] = [0x02, 0x08];
const MISSION_TAG_LEN: [u8; 2] = [0x03, 0x0C];
const PLATFORM_TAG_LEN: [u8; 2] = [0x0A, 0x0C];
const LATITUDE_TAG_LEN: [u8; 2] = [0x0D, 0x04];
const LONGITUDE_TAG_LEN: [u8; 2] = [0x0E, 0x04];
const ALTITUDE_TAG_LEN: [u8; 2] = [0x0F, 0x02];
const VERSION_TAG_LEN: [u8; 2] = [0x41, 0x01];
const CHECKSUM_TAG_LEN: [u8; 2] = [0x01, 0x02];

/// Typed appender over the fixed-size packet buffer.
///
/// Integer appends are big-endian (network order); text appends are
/// null-padded to [`TEXT_FIELD_LEN`]. The writer tracks its own cursor,
/// so callers never touch byte offsets.
pub struct LocalSetWriter<'a> {
    buf: &'a mut [u8; PACKET_LEN],
    pos: usize,
}

impl<'a> LocalSetWriter<'a> {
    /// Start writing at the beginning of `buf`.
    pub fn new(buf: &'a mut [u8; PACKET_LEN]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Append raw bytes.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    /// Append a single byte.
    pub fn put_u8(&mut self, value: u8) {
        self.buf[self.pos] = value;
        self.pos += 1;
    }

    /// Append a u16 in network byte order.
    pub fn put_u16(&mut self, value: u16) {
        self.put_bytes(&value.to_be_bytes());
    }

    /// Append an i32 in network byte order.
    pub fn put_i32(&mut self, value: i32) {
        self.put_bytes(&value.to_be_bytes());
    }

    /// Append a u64 in network byte order.
    pub fn put_u64(&mut self, value: u64) {
        self.put_bytes(&value.to_be_bytes());
    }

    /// Append ASCII text null-padded to [`TEXT_FIELD_LEN`] bytes.
    ///
    /// Input longer than the field is cut at the field width.
    pub fn put_ascii_padded(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let n = bytes.len().min(TEXT_FIELD_LEN);
        self.buf[self.pos..self.pos + n].copy_from_slice(&bytes[..n]);
        self.buf[self.pos + n..self.pos + TEXT_FIELD_LEN].fill(0);
        self.pos += TEXT_FIELD_LEN;
    }

    /// Compute the running checksum over everything written so far and
    /// append it. The checksum bytes never feed their own computation.
    pub fn put_checksum(&mut self) {
        let sum = running_checksum(&self.buf[..self.pos]);
        self.put_u16(sum);
    }
}

/// Render one packet into `buf`.
///
/// Deterministic given its inputs; the checksum is a function of the
/// other 76 bytes. The position codes are precomputed per session, so
/// between ticks only the timestamp and checksum change.
pub fn encode_into(
    buf: &mut [u8; PACKET_LEN],
    mission_id: &str,
    platform: &str,
    codes: &GeoCodes,
    timestamp_micros: u64,
) {
    let mut w = LocalSetWriter::new(buf);
    w.put_bytes(&UAS_LDS_KEY);
    w.put_u8(SET_LENGTH);
    w.put_bytes(&TIMESTAMP_TAG_LEN);
    w.put_u64(timestamp_micros);
    w.put_bytes(&MISSION_TAG_LEN);
    w.put_ascii_padded(mission_id);
    w.put_bytes(&PLATFORM_TAG_LEN);
    w.put_ascii_padded(platform);
    w.put_bytes(&LATITUDE_TAG_LEN);
    w.put_i32(codes.latitude);
    w.put_bytes(&LONGITUDE_TAG_LEN);
    w.put_i32(codes.longitude);
    w.put_bytes(&ALTITUDE_TAG_LEN);
    w.put_u16(codes.altitude);
    w.put_bytes(&VERSION_TAG_LEN);
    w.put_u8(LDS_VERSION);
    w.put_bytes(&CHECKSUM_TAG_LEN);
    debug_assert_eq!(w.position(), CHECKSUM_RANGE);
    w.put_checksum();
    debug_assert_eq!(w.position(), PACKET_LEN);
}

/// Render one packet into a fresh buffer.
pub fn encode(
    mission_id: &str,
    platform: &str,
    codes: &GeoCodes,
    timestamp_micros: u64,
) -> [u8; PACKET_LEN] {
    let mut buf = [0u8; PACKET_LEN];
    encode_into(&mut buf, mission_id, platform, codes, timestamp_micros);
    buf
}
