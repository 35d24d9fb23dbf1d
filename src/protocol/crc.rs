use crc::{Crc, CRC_16_IBM_3740};

/// CRC-16/CCITT-FALSE: poly 0x1021, init 0xFFFF, no reflection, no final XOR.
const CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

pub fn crc16_ccitt(data: &[u8]) -> u16 {
    CRC.checksum(data)
}

/// Checksum value for tag `63`: four uppercase hex digits, zero padded.
///
/// Each character up to U+00FF enters the register as a single byte equal to
/// its code point. Characters above U+00FF enter as their UTF-8 bytes.
pub fn compute_checksum(input: &str) -> String {
    let mut digest = CRC.digest();
    let mut buf = [0u8; 4];
    for c in input.chars() {
        match u8::try_from(c) {
            Ok(b) => digest.update(&[b]),
            Err(_) => digest.update(c.encode_utf8(&mut buf).as_bytes()),
        }
    }
    format!("{:04X}", digest.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bitwise reference used to cross-check the table-driven crate.
    fn crc16_bitwise(data: &[u8]) -> u16 {
        let mut reg: u16 = 0xFFFF;
        for &b in data {
            reg ^= (b as u16) << 8;
            for _ in 0..8 {
                reg = if reg & 0x8000 != 0 {
                    (reg << 1) ^ 0x1021
                } else {
                    reg << 1
                };
            }
        }
        reg
    }

    #[test]
    fn test_crc_check_value() {
        assert_eq!(crc16_ccitt(b"123456789"), 0x29B1);
        assert_eq!(compute_checksum("123456789"), "29B1");
    }

    #[test]
    fn test_crc_empty() {
        assert_eq!(compute_checksum(""), "FFFF");
    }

    #[test]
    fn test_payload_prefix_vector() {
        let prefix = "00020101021126390016A00000067701011101061234560205001005303KES5802KE5904Acme6304";
        assert_eq!(compute_checksum(prefix), "AFD3");
    }

    #[test]
    fn test_matches_bitwise_reference() {
        let inputs: [&[u8]; 4] = [
            b"A",
            b"000201010211",
            b"5303KES5802KE",
            b"\x00\xff\x10\x21",
        ];
        for data in inputs {
            assert_eq!(crc16_ccitt(data), crc16_bitwise(data));
        }
    }

    #[test]
    fn test_always_four_uppercase_hex() {
        for s in ["", "A", "0", "hello world", "6304"] {
            let c = compute_checksum(s);
            assert_eq!(c.len(), 4);
            assert!(c.chars().all(|ch| ch.is_ascii_digit() || ('A'..='F').contains(&ch)));
            assert_eq!(c, compute_checksum(s));
        }
        // 0x0125 keeps its leading zero
        assert_eq!(
            compute_checksum("00020101021126300016A00000067701011103066543215303KES5802KE5910Mama Mboga6304"),
            "0125"
        );
    }

    #[test]
    fn test_latin1_char_is_one_code_unit() {
        assert_eq!(compute_checksum("\u{e9}"), format!("{:04X}", crc16_bitwise(&[0xE9])));
        assert_eq!(compute_checksum("é"), "8DF7");
        assert_eq!(
            compute_checksum("Café"),
            format!("{:04X}", crc16_bitwise(&[b'C', b'a', b'f', 0xE9]))
        );
        assert_eq!(compute_checksum("Café"), "1050");
    }

    #[test]
    fn test_wide_char_uses_utf8_bytes() {
        // U+20AC is 0xE2 0x82 0xAC in UTF-8
        assert_eq!(
            compute_checksum("€"),
            format!("{:04X}", crc16_bitwise(&[0xE2, 0x82, 0xAC]))
        );
        assert_eq!(compute_checksum("€"), "0B51");
        assert_eq!(compute_checksum("aé€"), "12D1");
    }
}
