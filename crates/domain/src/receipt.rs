use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Receipt language. Anything other than `en` prints German.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    De,
    En,
}

impl Language {
    pub fn order_label(&self) -> &'static str {
        match self {
            Self::En => "Order #: ",
            Self::De => "Bestellung #: ",
        }
    }

    pub fn thank_you(&self) -> &'static str {
        match self {
            Self::En => "Thank you!",
            Self::De => "Vielen Dank!",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
        }
    }
}

impl From<&str> for Language {
    fn from(value: &str) -> Self {
        match value {
            "en" => Self::En,
            _ => Self::De,
        }
    }
}

impl From<String> for Language {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    /// Must be positive; not checked here
    pub quantity: u32,
    #[serde(alias = "price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

impl ReceiptItem {
    pub fn new(name: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// `None` when the product does not fit in a `Decimal`
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Order data for one printed receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    #[serde(default = "default_order_number")]
    pub order_number: String,
    #[serde(default)]
    pub items: Vec<ReceiptItem>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub language: Language,
}

fn default_order_number() -> String {
    "N/A".to_string()
}

impl ReceiptRequest {
    pub fn new(order_number: impl Into<String>, items: Vec<ReceiptItem>, total: Decimal) -> Self {
        Self {
            order_number: order_number.into(),
            items,
            total,
            language: Language::default(),
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Line total of every item, in order. Fails if any of them overflows.
    pub fn line_totals(&self) -> Result<Vec<Decimal>, DomainError> {
        self.items
            .iter()
            .map(|item| {
                item.line_total().ok_or_else(|| {
                    DomainError::InvalidRequest(format!(
                        "line total of {}x {} is out of range",
                        item.quantity, item.name
                    ))
                })
            })
            .collect()
    }
}

/// Fixed receipt text that does not come from the order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLayout {
    #[serde(default = "default_store_name")]
    pub store_name: String,
    #[serde(default = "default_separator")]
    pub separator: String,
    #[serde(default = "default_feed_lines")]
    pub feed_lines: u8,
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_store_name() -> String {
    "YELOEAT".to_string()
}
fn default_separator() -> String {
    "==================".to_string()
}
fn default_feed_lines() -> u8 {
    3
}
fn default_encoding() -> String {
    "UTF-8".to_string()
}

impl Default for ReceiptLayout {
    fn default() -> Self {
        Self {
            store_name: default_store_name(),
            separator: default_separator(),
            feed_lines: default_feed_lines(),
            encoding: default_encoding(),
        }
    }
}
