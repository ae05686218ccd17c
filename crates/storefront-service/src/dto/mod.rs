//! Request and response payloads.
//!
//! Each operation has its own payload types: list items, details,
//! create/replace bodies (POST, PUT) and partial-update bodies (PATCH).

mod auth_dto;
mod category_dto;
mod product_dto;

pub use auth_dto::*;
pub use category_dto::*;
pub use product_dto::*;

use bigdecimal::BigDecimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Simple message response.
#[derive(Debug, Clone, serde::Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Marks a present field as `Some`, so `null` becomes `Some(None)` and an
/// absent field stays `None` through `#[serde(default)]`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DecimalInput {
    Text(String),
    Number(serde_json::Number),
}

/// Reads a decimal from a JSON string or number without a float round trip.
pub(crate) fn deserialize_price<'de, D>(deserializer: D) -> Result<BigDecimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match DecimalInput::deserialize(deserializer)? {
        DecimalInput::Text(text) => text,
        DecimalInput::Number(number) => number.to_string(),
    };
    BigDecimal::from_str(raw.trim()).map_err(|_| D::Error::custom("A valid number is required."))
}

pub(crate) fn deserialize_optional_price<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_price(deserializer).map(Some)
}

/// Renders a price with its two decimal places, as stored.
#[must_use]
pub fn format_price(price: &BigDecimal) -> String {
    price.with_scale(2).to_string()
}
