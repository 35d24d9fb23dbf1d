//! Merchant-presented QR payloads for M-PESA paybill, till and phone payments.
//!
//! ```
//! use mpesa_qr::payment::{build_payload, PaymentKind};
//!
//! let payload = build_payload(PaymentKind::Till, "12345", "", "").unwrap();
//! assert!(payload.starts_with("000201010211"));
//! ```

pub mod config;
pub mod error;
pub mod payment;
pub mod protocol;

pub use error::PayloadError;
pub use payment::{build_payload, MerchantInfo, PaymentKind, PaymentRequest, PaymentTarget};
pub use protocol::{compute_checksum, DecodedPayment, Payload};
