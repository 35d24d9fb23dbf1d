pub mod crc;
pub mod payload;
pub mod tags;
pub mod tlv;

pub use crc::compute_checksum;
pub use payload::{DecodedPayment, Payload};
pub use tlv::TlvField;
