/// Tags and fixed values of the merchant-presented payload.
/// Every tag is two decimal digits.

// Top-level fields, in emission order
pub const TAG_FORMAT_INDICATOR: &str = "00";
pub const TAG_POINT_OF_INITIATION: &str = "01";
pub const TAG_MERCHANT_ACCOUNT: &str = "26";
pub const TAG_CURRENCY: &str = "53";
pub const TAG_COUNTRY: &str = "58";
pub const TAG_MERCHANT_NAME: &str = "59";
pub const TAG_CHECKSUM: &str = "63";

// Sub-tags inside the merchant account template (tag 26)
pub const SUB_GUID: &str = "00";
pub const SUB_PAYBILL: &str = "01";
pub const SUB_ACCOUNT_REF: &str = "02";
pub const SUB_TILL: &str = "03";
pub const SUB_PHONE: &str = "04";

// Fixed values
pub const FORMAT_INDICATOR: &str = "01";
/// Static code, reusable for any number of payments.
pub const POINT_OF_INITIATION_STATIC: &str = "11";
pub const SCHEME_GUID: &str = "A000000677010111";
pub const CURRENCY_KES: &str = "KES";
pub const COUNTRY_KE: &str = "KE";

/// Checksum header appended before the CRC is computed.
pub const CHECKSUM_HEADER: &str = "6304";
pub const CHECKSUM_LEN: usize = 4;

/// Largest value a two-digit length can declare.
pub const MAX_VALUE_LEN: usize = 99;

/// Helper type for tags
pub type Tag = &'static str;
