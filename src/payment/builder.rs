use serde::Serialize;
use tracing::debug;

use super::{MerchantInfo, PaymentKind, PaymentTarget};
use crate::error::{PayloadError, Result};
use crate::protocol::crc::compute_checksum;
use crate::protocol::tags::*;
use crate::protocol::tlv::{encode_all, TlvField};

/// One generation request, exactly as the form collected it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    pub kind: PaymentKind,
    /// Free-form number; separators are stripped.
    pub number: String,
    /// Paybill account reference, used verbatim. May be empty.
    pub account_number: String,
    /// Merchant display name, used verbatim. May be empty.
    pub business_name: String,
}

impl PaymentRequest {
    pub fn new(kind: PaymentKind, number: impl Into<String>) -> Self {
        Self {
            kind,
            number: number.into(),
            account_number: String::new(),
            business_name: String::new(),
        }
    }

    pub fn with_account(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = account_number.into();
        self
    }

    pub fn with_business_name(mut self, business_name: impl Into<String>) -> Self {
        self.business_name = business_name.into();
        self
    }

    pub fn build(&self) -> Result<String> {
        build_payload(
            self.kind,
            &self.number,
            &self.account_number,
            &self.business_name,
        )
    }
}

/// Build the complete payload string for a payment request.
pub fn build_payload(
    kind: PaymentKind,
    raw_number: &str,
    raw_account_number: &str,
    raw_business_name: &str,
) -> Result<String> {
    let target = PaymentTarget::from_input(kind, raw_number, raw_account_number)?;
    let merchant = MerchantInfo::new(raw_business_name);
    assemble(&target, &merchant)
}

/// Assemble the TLV sequence for a validated target and append its checksum.
///
/// Layout:
/// ```text
/// 00 02 "01" | 01 02 "11" | 26 LL [00 16 GUID, 01|03|04 LL number, (02 LL account)]
/// | 53 03 "KES" | 58 02 "KE" | (59 LL name) | 63 04 CRC
/// ```
pub fn assemble(target: &PaymentTarget, merchant: &MerchantInfo) -> Result<String> {
    let mut account = vec![
        TlvField::new(SUB_GUID, SCHEME_GUID)?,
        TlvField::new(target.kind().sub_tag(), target.identifier())?,
    ];
    if let Some(account_ref) = target.account_ref() {
        check_text(SUB_ACCOUNT_REF, account_ref)?;
        account.push(TlvField::new(SUB_ACCOUNT_REF, account_ref)?);
    }

    let mut fields = vec![
        TlvField::new(TAG_FORMAT_INDICATOR, FORMAT_INDICATOR)?,
        TlvField::new(TAG_POINT_OF_INITIATION, POINT_OF_INITIATION_STATIC)?,
        TlvField::template(TAG_MERCHANT_ACCOUNT, &account)?,
        TlvField::new(TAG_CURRENCY, CURRENCY_KES)?,
        TlvField::new(TAG_COUNTRY, COUNTRY_KE)?,
    ];
    if let Some(name) = &merchant.name {
        check_text(TAG_MERCHANT_NAME, name)?;
        fields.push(TlvField::new(TAG_MERCHANT_NAME, name.as_str())?);
    }

    let mut payload = encode_all(&fields);
    payload.push_str(CHECKSUM_HEADER);
    let checksum = compute_checksum(&payload);
    payload.push_str(&checksum);

    debug!(
        "Built {} payload for {} ({} chars, crc={})",
        target.kind(),
        target.identifier(),
        payload.len(),
        checksum
    );
    Ok(payload)
}

/// Free text must be printable ASCII so that the length prefix, the
/// checksum input and the QR byte stream all agree on what a character is.
fn check_text(tag: Tag, value: &str) -> Result<()> {
    match value.chars().find(|c| !(' '..='~').contains(c)) {
        Some(ch) => Err(PayloadError::UnsupportedCharacter { tag, ch }),
        None => Ok(()),
    }
}
