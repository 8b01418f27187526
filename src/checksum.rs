//! MISB running checksum.
//!
//! The Local Data Set trailer carries a 16-bit running sum rather than a
//! CRC: even-indexed bytes (0-based) weigh in as the high byte of a
//! 16-bit word, odd-indexed bytes as the low byte, accumulated with
//! wraparound addition.

/// Calculate the 16-bit running checksum over `data`.
///
/// Byte at index `i` is shifted left by `8 * ((i + 1) % 2)` bits before
/// being added mod 65536. For a packet this is applied to everything
/// except the two trailing checksum bytes themselves.
pub fn running_checksum(data: &[u8]) -> u16 {
    let mut sum: u16 = 0;
    for (i, &byte) in data.iter().enumerate() {
        sum = sum.wrapping_add((byte as u16) << (8 * ((i + 1) % 2)));
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(running_checksum(&[]), 0);
    }

    #[test]
    fn test_byte_weighting() {
        // Index 0 is the high byte of a 16-bit word, index 1 the low byte.
        assert_eq!(running_checksum(&[0x01]), 0x0100);
        assert_eq!(running_checksum(&[0x00, 0x01]), 0x0001);
        assert_eq!(running_checksum(&[0x01, 0x02]), 0x0102);
        assert_eq!(running_checksum(&[0x01, 0x02, 0x03, 0x04]), 0x0406);
    }

    #[test]
    fn test_wraparound() {
        assert_eq!(running_checksum(&[0xFF, 0xFF, 0x00, 0x01]), 0x0000);
        assert_eq!(running_checksum(&[0xFF, 0x00, 0x02, 0x00]), 0x0100);
    }

    #[test]
    fn test_deterministic() {
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(running_checksum(&data), running_checksum(&data));
    }

    #[test]
    fn test_single_byte_change_alters_sum() {
        let data: Vec<u8> = (0..78).map(|i| (i * 7) as u8).collect();
        let base = running_checksum(&data);
        for i in 0..data.len() {
            let mut altered = data.clone();
            altered[i] ^= 0x5A;
            assert_ne!(running_checksum(&altered), base, "invariant at byte {i}");
        }
    }
}
