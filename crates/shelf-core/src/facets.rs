//! Facet code table.
//!
//! Translates the human-readable labels shown in the filter panels into the
//! canonical codes the product service understands. Translation is total:
//! a label with no table entry resolves to a fallback code instead of an
//! error, and no label ever produces an empty code.
//!
//! | Facet | Known label | Unknown label |
//! |-------|-------------|---------------|
//! | brand | table lookup | `"Others"` |
//! | color | table lookup (UPPER_SNAKE) | label upper-cased |
//! | price | `~` normalized to `" - "` | same |
//! | size  | trimmed label | same |

use std::collections::BTreeMap;

use crate::models::{Facet, FacetSelection};

/// Code used for any brand outside the table, and for blank labels.
pub const FALLBACK_CODE: &str = "Others";

/// Canonical request body for the filter endpoint: only non-empty facets.
pub type FacetMap = BTreeMap<Facet, Vec<String>>;

/// Known brand labels and their wire codes.
pub const BRAND_CODES: &[(&str, &str)] = &[
    ("나이키", "Nike"),
    ("아디다스", "Adidas"),
    ("뉴발란스", "NewBalance"),
    ("컨버스", "Converse"),
    ("반스", "Vans"),
    ("푸마", "Puma"),
    ("아식스", "Asics"),
    ("리복", "Reebok"),
    ("살로몬", "Salomon"),
    ("호카", "Hoka"),
    ("기타", FALLBACK_CODE),
];

/// Known color labels and their wire codes.
pub const COLOR_CODES: &[(&str, &str)] = &[
    ("블랙", "BLACK"),
    ("화이트", "WHITE"),
    ("그레이", "GRAY"),
    ("라이트 그레이", "LIGHT_GRAY"),
    ("차콜", "CHARCOAL"),
    ("네이비", "NAVY"),
    ("블루", "BLUE"),
    ("스카이 블루", "SKY_BLUE"),
    ("베이지", "BEIGE"),
    ("브라운", "BROWN"),
    ("다크 브라운", "DARK_BROWN"),
    ("레드", "RED"),
    ("핑크", "PINK"),
    ("그린", "GREEN"),
    ("카키", "KHAKI"),
    ("옐로우", "YELLOW"),
    ("오렌지", "ORANGE"),
    ("퍼플", "PURPLE"),
];

/// Price bucket labels offered by the price panel.
pub const PRICE_BUCKETS: &[&str] = &[
    "10만원 이하",
    "10만원 - 20만원",
    "20만원 - 30만원",
    "30만원 - 40만원",
    "40만원 이상",
];

fn lookup(table: &[(&str, &'static str)], label: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, code)| *code)
}

/// Translate one facet label into its canonical code.
pub fn translate(facet: Facet, label: &str) -> String {
    let label = label.trim();
    if label.is_empty() {
        return FALLBACK_CODE.to_string();
    }
    match facet {
        Facet::Brand => lookup(BRAND_CODES, label)
            .unwrap_or(FALLBACK_CODE)
            .to_string(),
        Facet::Color => match lookup(COLOR_CODES, label) {
            Some(code) => code.to_string(),
            None => label.to_uppercase(),
        },
        Facet::Price => normalize_price_label(label),
        Facet::Size => label.to_string(),
    }
}

/// Rewrite `~`-separated bucket labels (`"10만원~20만원"`) to the
/// `" - "` form the service expects.
fn normalize_price_label(label: &str) -> String {
    if !label.contains('~') {
        return label.to_string();
    }
    label
        .split('~')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Translate a whole selection into the filter request body.
///
/// Facets with no selected labels are dropped, so an all-empty selection
/// yields an empty map: no remote filtering requested. Blank labels are
/// skipped and duplicate codes collapse to one entry.
pub fn translate_facet_map(selection: &FacetSelection) -> FacetMap {
    let mut map = FacetMap::new();
    for facet in Facet::ALL {
        let mut codes: Vec<String> = Vec::new();
        for label in selection.get(facet) {
            if label.trim().is_empty() {
                continue;
            }
            let code = translate(facet, label);
            if !codes.contains(&code) {
                codes.push(code);
            }
        }
        if !codes.is_empty() {
            map.insert(facet, codes);
        }
    }
    map
}

/// Inclusive price range parsed from a bucket code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBucket {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl PriceBucket {
    /// Parse `"10만원 - 20만원"`, `"40만원 이상"`, `"10만원 이하"`,
    /// `"10만원 미만"`, or plain `"100000 - 200000"`.
    pub fn parse(code: &str) -> Option<Self> {
        let code = normalize_price_label(code.trim());
        if let Some((lo, hi)) = code.split_once(" - ") {
            return Some(Self {
                min: Some(parse_amount(lo)?),
                max: Some(parse_amount(hi)?),
            });
        }
        if let Some(lo) = code.strip_suffix("이상") {
            return Some(Self {
                min: Some(parse_amount(lo)?),
                max: None,
            });
        }
        if let Some(hi) = code.strip_suffix("이하") {
            return Some(Self {
                min: None,
                max: Some(parse_amount(hi)?),
            });
        }
        if let Some(hi) = code.strip_suffix("미만") {
            return Some(Self {
                min: None,
                max: Some(parse_amount(hi)?.saturating_sub(1)),
            });
        }
        None
    }

    pub fn contains(&self, price: u64) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

/// `"10만원"` → 100000, `"150,000원"` → 150000.
fn parse_amount(text: &str) -> Option<u64> {
    let text = text.trim().trim_end_matches('원').replace(',', "");
    let text = text.trim();
    match text.strip_suffix('만') {
        Some(man) => man.trim().parse::<u64>().ok()?.checked_mul(10_000),
        None => text.parse::<u64>().ok(),
    }
}
