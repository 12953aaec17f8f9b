use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config;
use crate::error::{ConsoleError, Result};

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// A catalog entry as exchanged with the remote admin API.
///
/// Keys the remote sends that are not modelled here are kept in `extra`, so
/// a product read from the API serializes back to the same payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub category: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(rename = "imageUrl", default, deserialize_with = "nullable")]
    pub image_url: String,
    #[serde(rename = "imagesUrl", default, deserialize_with = "nullable")]
    pub images_url: Vec<String>,
    #[serde(default, deserialize_with = "nullable", serialize_with = "whole_number::serialize")]
    pub price: f64,
    #[serde(default, deserialize_with = "nullable", serialize_with = "whole_number::serialize")]
    pub origin_price: f64,
    #[serde(default, deserialize_with = "nullable")]
    pub unit: String,
    #[serde(default, with = "bool_as_int")]
    pub is_enabled: bool,
    #[serde(
        rename = "storageNum",
        default,
        deserialize_with = "nullable",
        serialize_with = "whole_number::serialize"
    )]
    pub storage_num: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    /// The blank template a create form starts from.
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            category: String::new(),
            content: String::new(),
            description: String::new(),
            image_url: String::new(),
            images_url: Vec::new(),
            price: 0.0,
            origin_price: 0.0,
            unit: config::DEFAULT_UNIT.to_string(),
            is_enabled: false,
            storage_num: 0.0,
            extra: serde_json::Map::new(),
        }
    }

    /// Gallery images for the detail view. Empty when the product has none.
    pub fn gallery(&self) -> &[String] {
        &self.images_url
    }

    pub fn availability(&self) -> Availability {
        if self.is_enabled {
            Availability::InStock {
                unit: self.unit.clone(),
            }
        } else {
            Availability::SoldOut
        }
    }

    /// Apply a single form edit.
    ///
    /// The input is fully validated before anything is written, so a
    /// rejected edit leaves the product untouched.
    pub fn apply(&mut self, field: ProductField, input: FieldInput) -> Result<()> {
        match field {
            ProductField::Price | ProductField::OriginPrice | ProductField::StorageNum => {
                let value = match input {
                    FieldInput::Text(raw) => coerce_number(field, &raw)?,
                    other => return Err(mismatch(field, &other)),
                };
                match field {
                    ProductField::Price => self.price = value,
                    ProductField::OriginPrice => self.origin_price = value,
                    _ => self.storage_num = value,
                }
            }
            ProductField::IsEnabled => match input {
                FieldInput::Checked(checked) => self.is_enabled = checked,
                other => return Err(mismatch(field, &other)),
            },
            ProductField::ImagesUrl => {
                self.images_url = match input {
                    FieldInput::List(urls) => urls,
                    FieldInput::Text(raw) => raw
                        .lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(str::to_string)
                        .collect(),
                    other => return Err(mismatch(field, &other)),
                };
            }
            _ => {
                let text = match input {
                    FieldInput::Text(raw) => raw,
                    other => return Err(mismatch(field, &other)),
                };
                match field {
                    ProductField::Title => self.title = text,
                    ProductField::Category => self.category = text,
                    ProductField::Content => self.content = text,
                    ProductField::Description => self.description = text,
                    ProductField::ImageUrl => self.image_url = text,
                    _ => self.unit = text,
                }
            }
        }
        Ok(())
    }
}

impl Default for Product {
    fn default() -> Self {
        Self::empty()
    }
}

/// Stock display state shown in the detail view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    InStock { unit: String },
    SoldOut,
}

/// Body of `GET .../admin/products`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Request envelope used by create and update.
#[derive(Debug, Serialize)]
pub struct ProductPayload<'a> {
    pub data: &'a Product,
}

// ---------------------------------------------------------------------------
// ProductField / FieldInput
// ---------------------------------------------------------------------------

/// Editable product fields, named by their wire keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Title,
    Category,
    Content,
    Description,
    ImageUrl,
    ImagesUrl,
    Price,
    OriginPrice,
    Unit,
    IsEnabled,
    StorageNum,
}

impl ProductField {
    pub const ALL: [ProductField; 11] = [
        ProductField::Title,
        ProductField::Category,
        ProductField::Content,
        ProductField::Description,
        ProductField::ImageUrl,
        ProductField::ImagesUrl,
        ProductField::Price,
        ProductField::OriginPrice,
        ProductField::Unit,
        ProductField::IsEnabled,
        ProductField::StorageNum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ProductField::Title => "title",
            ProductField::Category => "category",
            ProductField::Content => "content",
            ProductField::Description => "description",
            ProductField::ImageUrl => "imageUrl",
            ProductField::ImagesUrl => "imagesUrl",
            ProductField::Price => "price",
            ProductField::OriginPrice => "origin_price",
            ProductField::Unit => "unit",
            ProductField::IsEnabled => "is_enabled",
            ProductField::StorageNum => "storageNum",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProductField {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        if s == "id" {
            return Err(ConsoleError::InvalidField {
                field: s.to_string(),
                reason: "the product id is not editable".to_string(),
            });
        }
        ProductField::ALL
            .iter()
            .copied()
            .find(|f| f.name() == s)
            .ok_or_else(|| ConsoleError::UnknownField(s.to_string()))
    }
}

/// Raw value coming from a form control.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// Text typed into an input or chosen from a select.
    Text(String),
    /// Checked state of a checkbox.
    Checked(bool),
    /// A list of values (image URLs).
    List(Vec<String>),
}

impl From<&str> for FieldInput {
    fn from(s: &str) -> Self {
        FieldInput::Text(s.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(s: String) -> Self {
        FieldInput::Text(s)
    }
}

impl From<bool> for FieldInput {
    fn from(b: bool) -> Self {
        FieldInput::Checked(b)
    }
}

impl From<Vec<String>> for FieldInput {
    fn from(v: Vec<String>) -> Self {
        FieldInput::List(v)
    }
}

/// Number-input coercion: blank reads as zero, anything else must parse.
fn coerce_number(field: ProductField, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(ConsoleError::InvalidField {
            field: field.name().to_string(),
            reason: format!("'{}' is not a number", raw),
        }),
    }
}

fn mismatch(field: ProductField, input: &FieldInput) -> ConsoleError {
    let kind = match input {
        FieldInput::Text(_) => "text",
        FieldInput::Checked(_) => "checked state",
        FieldInput::List(_) => "list",
    };
    ConsoleError::InvalidField {
        field: field.name().to_string(),
        reason: format!("does not accept a {}", kind),
    }
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Whole-valued amounts go out as JSON integers (`1200`, not `1200.0`), so an
/// unedited product is sent back exactly as the remote returned it.
mod whole_number {
    use serde::Serializer;

    // Largest integer an f64 holds exactly.
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_EXACT {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }
}

/// `is_enabled` travels as `1`/`0`; booleans and numeric strings are accepted
/// on read.
mod bool_as_int {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            Value::String(s) => matches!(s.trim(), "1" | "true"),
            _ => false,
        })
    }
}
