//! Search predicate: case-insensitive substring match on product name.
//!
//! Brand is not searched. Applied client-side after sorting, with no
//! network round trip.

use crate::models::Product;

/// True when `term` occurs in `product.name`, ignoring case.
/// An empty (or all-whitespace) term matches everything.
pub fn matches(product: &Product, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    product.name.to_lowercase().contains(&term.to_lowercase())
}

/// Keep only the products matching `term`, in their current order.
pub fn apply_search(products: &[Product], term: &str) -> Vec<Product> {
    products
        .iter()
        .filter(|p| matches(p, term))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Product> {
        vec![
            Product::new(1, "Air Max 90", "나이키", 179000),
            Product::new(2, "Gel-Kayano", "아식스", 209000),
            Product::new(3, "AIR Force 1", "나이키", 139000),
            Product::new(4, "Samba OG", "아디다스", 139000),
        ]
    }

    #[test]
    fn test_empty_term_matches_all() {
        for p in catalog() {
            assert!(matches(&p, ""));
            assert!(matches(&p, "   "));
        }
    }

    #[test]
    fn test_case_insensitive_substring() {
        let hits = apply_search(&catalog(), "air");
        let ids: Vec<String> = hits.iter().map(|p| p.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_brand_is_not_searched() {
        assert!(apply_search(&catalog(), "나이키").is_empty());
    }

    #[test]
    fn test_reapplying_is_idempotent() {
        let once = apply_search(&catalog(), "a");
        let twice = apply_search(&once, "a");
        assert_eq!(once, twice);
    }
}
