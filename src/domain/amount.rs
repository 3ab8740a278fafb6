use crate::error::GatewayError;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A strictly positive monetary amount (`Monto`).
///
/// Wraps `rust_decimal::Decimal` so the scale typed by the operator survives
/// untouched: the gateway signs over the exact text it receives, so `10.50`
/// must not turn into `10.5` between the signature and the request body.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, GatewayError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(GatewayError::Validation(
                "Amount must be positive".to_string(),
            ))
        }
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = GatewayError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Amount {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map_err(|e| GatewayError::Validation(format!("invalid amount '{s}': {e}")))?
            .try_into()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// The gateway expects every field as a JSON string.
impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}
