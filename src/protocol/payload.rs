use serde::Serialize;

use super::crc::compute_checksum;
use super::tags::*;
use super::tlv::{find, parse_all, TlvField};
use crate::error::{PayloadError, Result};
use crate::payment::{MerchantInfo, PaymentKind, PaymentTarget};

/// A payload string split into its top-level fields.
#[derive(Debug, Clone)]
pub struct Payload {
    raw: String,
    pub fields: Vec<TlvField>,
}

/// What a payload asks the payer to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedPayment {
    pub target: PaymentTarget,
    pub merchant: MerchantInfo,
    pub currency: String,
    pub country: String,
    pub checksum: String,
}

impl Payload {
    /// Parse a payload and verify its trailing checksum.
    pub fn parse(raw: &str) -> Result<Self> {
        let payload = Self::parse_unchecked(raw)?;
        let computed = compute_checksum(payload.signed_part());
        let expected = payload.checksum();
        if !computed.eq_ignore_ascii_case(expected) {
            return Err(PayloadError::ChecksumMismatch {
                expected: expected.to_string(),
                computed,
            });
        }
        Ok(payload)
    }

    /// Parse the field structure without comparing the checksum.
    pub fn parse_unchecked(raw: &str) -> Result<Self> {
        let fields = parse_all(raw)?;
        match fields.last() {
            Some(last)
                if last.tag == TAG_CHECKSUM
                    && last.value.len() == CHECKSUM_LEN
                    && last.value.is_ascii() => {}
            _ => {
                return Err(PayloadError::Malformed(format!(
                    "payload must end with tag {} carrying {} characters",
                    TAG_CHECKSUM, CHECKSUM_LEN
                )))
            }
        }
        Ok(Self {
            raw: raw.to_string(),
            fields,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Everything the checksum covers, up to and including `6304`.
    pub fn signed_part(&self) -> &str {
        &self.raw[..self.raw.len() - CHECKSUM_LEN]
    }

    pub fn checksum(&self) -> &str {
        &self.raw[self.raw.len() - CHECKSUM_LEN..]
    }

    pub fn field(&self, tag: &str) -> Option<&TlvField> {
        find(&self.fields, tag)
    }

    fn required(&self, tag: &str) -> Result<&TlvField> {
        self.field(tag)
            .ok_or_else(|| PayloadError::Malformed(format!("missing tag {}", tag)))
    }

    /// Read the payment target and merchant details back out.
    pub fn decode(&self) -> Result<DecodedPayment> {
        let account = self.required(TAG_MERCHANT_ACCOUNT)?.children()?;

        let guid = find(&account, SUB_GUID).map(|f| f.value.as_str());
        if guid != Some(SCHEME_GUID) {
            return Err(PayloadError::Malformed(format!(
                "unknown scheme identifier {:?}",
                guid.unwrap_or("")
            )));
        }

        let (kind, number) = account
            .iter()
            .find_map(|f| PaymentKind::from_sub_tag(&f.tag).map(|k| (k, f.value.clone())))
            .ok_or_else(|| PayloadError::Malformed("no paybill, till or phone number".into()))?;

        let target = match kind {
            PaymentKind::Paybill => PaymentTarget::Paybill {
                business_short_code: number,
                account_ref: find(&account, SUB_ACCOUNT_REF).map(|f| f.value.clone()),
            },
            PaymentKind::Till => PaymentTarget::Till { till_number: number },
            PaymentKind::Phone => PaymentTarget::Phone { msisdn: number },
        };

        Ok(DecodedPayment {
            target,
            merchant: MerchantInfo {
                name: self.field(TAG_MERCHANT_NAME).map(|f| f.value.clone()),
            },
            currency: self.required(TAG_CURRENCY)?.value.clone(),
            country: self.required(TAG_COUNTRY)?.value.clone(),
            checksum: self.checksum().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::build_payload;

    #[test]
    fn test_roundtrip_paybill() {
        let raw = build_payload(PaymentKind::Paybill, "123456", "00100", "Acme").unwrap();
        let payload = Payload::parse(&raw).unwrap();
        assert_eq!(payload.as_str(), raw);
        assert_eq!(payload.checksum(), "AFD3");

        let decoded = payload.decode().unwrap();
        assert_eq!(
            decoded.target,
            PaymentTarget::Paybill {
                business_short_code: "123456".into(),
                account_ref: Some("00100".into()),
            }
        );
        assert_eq!(decoded.merchant.name.as_deref(), Some("Acme"));
        assert_eq!(decoded.currency, "KES");
        assert_eq!(decoded.country, "KE");
    }

    #[test]
    fn test_decode_phone_without_name() {
        let raw = build_payload(PaymentKind::Phone, "0712345678", "", "").unwrap();
        let decoded = Payload::parse(&raw).unwrap().decode().unwrap();
        assert_eq!(decoded.target.kind(), PaymentKind::Phone);
        assert_eq!(decoded.target.identifier(), "254712345678");
        assert_eq!(decoded.merchant, MerchantInfo::default());
    }

    #[test]
    fn test_lowercase_checksum_accepted() {
        let raw = "00020101021126300016A00000067701011101061234565303KES5802KE6304b73b";
        assert!(Payload::parse(raw).is_ok());
    }

    #[test]
    fn test_checksum_mismatch_on_corrupt() {
        let raw = build_payload(PaymentKind::Till, "12345", "", "").unwrap();
        // Change the till number without fixing the checksum
        let corrupt = raw.replace("12345", "12346");
        match Payload::parse(&corrupt) {
            Err(PayloadError::ChecksumMismatch { expected, .. }) => assert_eq!(expected, "DA44"),
            other => panic!("expected checksum mismatch, got {:?}", other),
        }
        assert!(Payload::parse_unchecked(&corrupt).is_ok());
    }

    #[test]
    fn test_missing_checksum_field() {
        assert!(matches!(
            Payload::parse("000201010211"),
            Err(PayloadError::Malformed(_))
        ));
        assert!(matches!(
            Payload::parse("0002016303ABC"),
            Err(PayloadError::Malformed(_))
        ));
        assert!(Payload::parse("").is_err());
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        let body = "00020101021126300016A00000067701019901061234565303KES5802KE6304";
        let raw = format!("{}{}", body, compute_checksum(body));
        let payload = Payload::parse(&raw).unwrap();
        assert!(matches!(payload.decode(), Err(PayloadError::Malformed(_))));
    }
}
