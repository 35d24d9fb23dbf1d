pub mod builder;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PayloadError, Result};
use crate::protocol::tags::{Tag, SUB_PAYBILL, SUB_PHONE, SUB_TILL};

pub use builder::{build_payload, PaymentRequest};

/// Kenyan country calling code.
const COUNTRY_PREFIX: &str = "254";

/// Payment method selected by the merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Paybill,
    Till,
    Phone,
}

impl PaymentKind {
    pub const ALL: [PaymentKind; 3] = [Self::Paybill, Self::Till, Self::Phone];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paybill => "paybill",
            Self::Till => "till",
            Self::Phone => "phone",
        }
    }

    /// Sub-tag carrying the number inside the merchant account template.
    pub fn sub_tag(&self) -> Tag {
        match self {
            Self::Paybill => SUB_PAYBILL,
            Self::Till => SUB_TILL,
            Self::Phone => SUB_PHONE,
        }
    }

    pub fn from_sub_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.sub_tag() == tag)
    }

    /// Check already-cleaned digits against the pattern for this kind.
    ///
    /// - paybill: exactly 6 digits
    /// - till: 5 or 6 digits
    /// - phone: `2547XXXXXXXX`, `07XXXXXXXX` or `7XXXXXXXX`
    pub fn is_valid(&self, digits: &str) -> bool {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match self {
            Self::Paybill => digits.len() == 6,
            Self::Till => matches!(digits.len(), 5 | 6),
            Self::Phone => {
                let subscriber = match digits.len() {
                    12 => digits.strip_prefix(COUNTRY_PREFIX),
                    10 => digits.strip_prefix('0'),
                    9 => Some(digits),
                    _ => None,
                };
                subscriber.is_some_and(|s| s.len() == 9 && s.starts_with('7'))
            }
        }
    }

    fn format_hint(&self) -> &'static str {
        match self {
            Self::Paybill => "a paybill number has exactly 6 digits",
            Self::Till => "a till number has 5 or 6 digits",
            Self::Phone => "use 07XXXXXXXX, 2547XXXXXXXX or 7XXXXXXXX",
        }
    }

    /// Bring cleaned digits into the form carried in the payload.
    ///
    /// Phone numbers become `254`-prefixed; paybill and till are unchanged.
    pub fn normalize(&self, digits: &str) -> String {
        match self {
            Self::Paybill | Self::Till => digits.to_string(),
            Self::Phone => {
                if digits.starts_with(COUNTRY_PREFIX) {
                    digits.to_string()
                } else if let Some(rest) = digits.strip_prefix('0') {
                    format!("{}{}", COUNTRY_PREFIX, rest)
                } else if digits.len() == 9 {
                    format!("{}{}", COUNTRY_PREFIX, digits)
                } else {
                    digits.to_string()
                }
            }
        }
    }

    /// Clean, validate and normalize a raw number as typed by the user.
    pub fn parse_number(&self, raw: &str) -> Result<String> {
        if raw.trim().is_empty() {
            return Err(PayloadError::EmptyInput { kind: *self });
        }
        let digits = clean_digits(raw);
        if !self.is_valid(&digits) {
            return Err(PayloadError::InvalidFormat {
                kind: *self,
                hint: self.format_hint(),
            });
        }
        let normalized = self.normalize(&digits);
        if normalized != digits {
            debug!("Normalized {} number {} -> {}", self, digits, normalized);
        }
        Ok(normalized)
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "paybill" => Ok(Self::Paybill),
            "till" => Ok(Self::Till),
            "phone" => Ok(Self::Phone),
            other => Err(format!(
                "unknown payment type '{}', expected paybill, till or phone",
                other
            )),
        }
    }
}

/// Strip every character that is not an ASCII digit.
pub fn clean_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Where the money goes. The identifier is always decimal digits only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaymentTarget {
    Paybill {
        business_short_code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        account_ref: Option<String>,
    },
    Till {
        till_number: String,
    },
    Phone {
        msisdn: String,
    },
}

impl PaymentTarget {
    /// Build a target from raw user input.
    ///
    /// The account reference is kept verbatim and only used for paybill;
    /// an empty one is treated as absent.
    pub fn from_input(kind: PaymentKind, raw_number: &str, raw_account: &str) -> Result<Self> {
        let number = kind.parse_number(raw_number)?;
        Ok(match kind {
            PaymentKind::Paybill => Self::Paybill {
                business_short_code: number,
                account_ref: (!raw_account.is_empty()).then(|| raw_account.to_string()),
            },
            PaymentKind::Till => {
                if !raw_account.is_empty() {
                    debug!("Ignoring account reference for till payment");
                }
                Self::Till { till_number: number }
            }
            PaymentKind::Phone => {
                if !raw_account.is_empty() {
                    debug!("Ignoring account reference for phone payment");
                }
                Self::Phone { msisdn: number }
            }
        })
    }

    pub fn kind(&self) -> PaymentKind {
        match self {
            Self::Paybill { .. } => PaymentKind::Paybill,
            Self::Till { .. } => PaymentKind::Till,
            Self::Phone { .. } => PaymentKind::Phone,
        }
    }

    /// The normalized number.
    pub fn identifier(&self) -> &str {
        match self {
            Self::Paybill {
                business_short_code,
                ..
            } => business_short_code,
            Self::Till { till_number } => till_number,
            Self::Phone { msisdn } => msisdn,
        }
    }

    pub fn account_ref(&self) -> Option<&str> {
        match self {
            Self::Paybill { account_ref, .. } => account_ref.as_deref(),
            _ => None,
        }
    }
}

/// Optional merchant display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MerchantInfo {
    pub name: Option<String>,
}

impl MerchantInfo {
    /// Empty input means no name.
    pub fn new(raw_name: &str) -> Self {
        Self {
            name: (!raw_name.is_empty()).then(|| raw_name.to_string()),
        }
    }
}
