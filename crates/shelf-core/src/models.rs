//! Core data models used throughout the catalog pipeline.
//!
//! Products are immutable from the pipeline's point of view: every stage
//! filters or reorders them and never mutates a field.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Product identifier as sent by the product service (numeric or textual).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Num(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Num(n) => write!(f, "{}", n),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ProductId {
    fn from(n: i64) -> Self {
        ProductId::Num(n)
    }
}

/// A single catalog entry.
///
/// `price` is in the smallest currency unit. Missing or `null` numeric
/// fields decode as `0`. The legacy `image` alias and `modelId` are carried
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub price: u64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub like_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<serde_json::Value>,
}

impl Product {
    /// Minimal constructor used by tests and the in-memory gateway.
    pub fn new(id: i64, name: &str, brand: &str, price: u64) -> Self {
        Self {
            id: ProductId::Num(id),
            name: name.to_string(),
            brand: brand.to_string(),
            price,
            image_url: None,
            like_count: 0,
            image: None,
            model_id: None,
        }
    }

    pub fn with_likes(mut self, like_count: u64) -> Self {
        self.like_count = like_count;
        self
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

/// One filterable dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Brand,
    Color,
    Price,
    Size,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Brand, Facet::Color, Facet::Price, Facet::Size];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Brand => "brand",
            Facet::Color => "color",
            Facet::Price => "price",
            Facet::Size => "size",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "brand" => Ok(Facet::Brand),
            "color" => Ok(Facet::Color),
            "price" => Ok(Facet::Price),
            "size" => Ok(Facet::Size),
            other => anyhow::bail!("Unknown facet: '{}'. Use brand, color, price, or size.", other),
        }
    }
}

/// One set of selected labels per facet.
///
/// `size` is modeled for the wire format but no panel populates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSelection {
    #[serde(default)]
    pub brand: BTreeSet<String>,
    #[serde(default)]
    pub color: BTreeSet<String>,
    #[serde(default)]
    pub price: BTreeSet<String>,
    #[serde(default)]
    pub size: BTreeSet<String>,
}

impl FacetSelection {
    pub fn get(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Brand => &self.brand,
            Facet::Color => &self.color,
            Facet::Price => &self.price,
            Facet::Size => &self.size,
        }
    }

    pub fn get_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Brand => &mut self.brand,
            Facet::Color => &mut self.color,
            Facet::Price => &mut self.price,
            Facet::Size => &mut self.size,
        }
    }

    /// True when no facet has any selected label.
    pub fn is_empty(&self) -> bool {
        Facet::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    pub fn clear(&mut self) {
        for facet in Facet::ALL {
            self.get_mut(facet).clear();
        }
    }
}

/// Field a product list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Keep the order the last fetch or filter returned.
    #[default]
    None,
    Name,
    LikeCount,
    Price,
}

impl FromStr for SortField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "none" => Ok(SortField::None),
            "name" => Ok(SortField::Name),
            "likeCount" | "like_count" | "likes" => Ok(SortField::LikeCount),
            "price" => Ok(SortField::Price),
            other => anyhow::bail!(
                "Unknown sort field: '{}'. Use none, name, likeCount, or price.",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => anyhow::bail!("Unknown sort order: '{}'. Use asc or desc.", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortState {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }
}
