use std::fmt;
use std::str::FromStr;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transaction attributes a rule expression may reference.
///
/// The set is closed: the rule-evaluation service only knows how to extract
/// these attributes from a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum Field {
    TransactionId,
    SenderAccount,
    ReceiverAccount,
    Amount,
    Timestamp,
    TransactionType,
    MerchantCategory,
    Location,
    DeviceUsed,
    PaymentChannel,
    IpAddress,
    DeviceHash,
    Time,
}

impl Field {
    /// Every field, in wire declaration order.
    pub const ALL: [Field; 13] = [
        Field::TransactionId,
        Field::SenderAccount,
        Field::ReceiverAccount,
        Field::Amount,
        Field::Timestamp,
        Field::TransactionType,
        Field::MerchantCategory,
        Field::Location,
        Field::DeviceUsed,
        Field::PaymentChannel,
        Field::IpAddress,
        Field::DeviceHash,
        Field::Time,
    ];

    /// The upper-case name used both in expressions and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::TransactionId => "TRANSACTION_ID",
            Field::SenderAccount => "SENDER_ACCOUNT",
            Field::ReceiverAccount => "RECEIVER_ACCOUNT",
            Field::Amount => "AMOUNT",
            Field::Timestamp => "TIMESTAMP",
            Field::TransactionType => "TRANSACTION_TYPE",
            Field::MerchantCategory => "MERCHANT_CATEGORY",
            Field::Location => "LOCATION",
            Field::DeviceUsed => "DEVICE_USED",
            Field::PaymentChannel => "PAYMENT_CHANNEL",
            Field::IpAddress => "IP_ADDRESS",
            Field::DeviceHash => "DEVICE_HASH",
            Field::Time => "TIME",
        }
    }

    /// Exact (already upper-cased) lookup.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// Names of every field, in declaration order.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Field::ALL.iter().map(|f| f.as_str()).collect()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by [`Field::from_str`] for names outside the whitelist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown name '{0}'")]
pub struct UnknownName(pub String);

impl FromStr for Field {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::from_name(&s.to_ascii_uppercase()).ok_or_else(|| UnknownName(s.to_owned()))
    }
}
