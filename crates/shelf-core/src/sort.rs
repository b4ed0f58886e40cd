//! Comparator factory.
//!
//! [`compare_by`] builds an ordering over products for a sort field and
//! direction. Sorting goes through [`sort_products`], which uses the
//! standard library's stable sort: products that compare equal keep their
//! input order in both directions.

use std::cmp::Ordering;

use icu_collator::{CaseFirst, CaseLevel, Collator, CollatorOptions, Strength};

use crate::models::{Product, SortField, SortOrder, SortState};

/// Build a comparator for `field` in `order`.
///
/// `desc` reverses the ascending result, so ties stay ties. `SortField::None`
/// treats every pair as equal, which leaves a stable sort as the identity.
pub fn compare_by(field: SortField, order: SortOrder) -> impl Fn(&Product, &Product) -> Ordering {
    let names = (field == SortField::Name).then(NameOrder::new);
    move |a, b| {
        let asc = match (field, &names) {
            (SortField::None, _) => Ordering::Equal,
            (SortField::Name, Some(names)) => names.compare(&a.name, &b.name),
            (SortField::Name, None) => compare_names(&a.name, &b.name),
            (SortField::LikeCount, _) => a.like_count.cmp(&b.like_count),
            (SortField::Price, _) => a.price.cmp(&b.price),
        };
        match order {
            SortOrder::Asc => asc,
            SortOrder::Desc => asc.reverse(),
        }
    }
}

/// Root-locale name collation.
///
/// Accents and case are secondary to the base letters, so `Éclair` sorts
/// next to `eclair` rather than after `z`. Names that differ only in case
/// order lowercase-first.
pub struct NameOrder {
    collator: Option<Collator>,
}

impl NameOrder {
    pub fn new() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);
        options.case_level = Some(CaseLevel::On);
        options.case_first = Some(CaseFirst::LowerFirst);
        let collator = match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(e) => {
                tracing::warn!(error = ?e, "name collator unavailable, comparing code points");
                None
            }
        };
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a
                .to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| b.cmp(a)),
        }
    }
}

impl Default for NameOrder {
    fn default() -> Self {
        Self::new()
    }
}

/// One-off name comparison. Sorting builds a single [`NameOrder`] instead.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    NameOrder::new().compare(a, b)
}

/// Reorder `products` in place according to `state`.
pub fn sort_products(products: &mut [Product], state: SortState) {
    if state.field == SortField::None {
        return;
    }
    products.sort_by(compare_by(state.field, state.order));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(products: &[Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    fn liked(id: i64, likes: u64) -> Product {
        Product::new(id, &format!("p{}", id), "나이키", 0).with_likes(likes)
    }

    #[test]
    fn test_like_count_desc_keeps_tie_order() {
        let mut list = vec![liked(1, 5), liked(2, 20), liked(3, 5)];
        sort_products(&mut list, SortState::new(SortField::LikeCount, SortOrder::Desc));
        assert_eq!(ids(&list), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_equal_prices_stable_both_directions() {
        let base = vec![
            Product::new(1, "a", "b", 100),
            Product::new(2, "b", "b", 50),
            Product::new(3, "c", "b", 100),
            Product::new(4, "d", "b", 50),
        ];

        let mut asc = base.clone();
        sort_products(&mut asc, SortState::new(SortField::Price, SortOrder::Asc));
        assert_eq!(ids(&asc), vec!["2", "4", "1", "3"]);

        let mut desc = base;
        sort_products(&mut desc, SortState::new(SortField::Price, SortOrder::Desc));
        assert_eq!(ids(&desc), vec!["1", "3", "2", "4"]);
    }

    #[test]
    fn test_desc_reverses_distinct_ranking() {
        let base = vec![
            Product::new(1, "Charlie", "b", 300).with_likes(2),
            Product::new(2, "alpha", "b", 100).with_likes(9),
            Product::new(3, "Bravo", "b", 200).with_likes(4),
        ];
        for field in [SortField::Name, SortField::Price, SortField::LikeCount] {
            let mut asc = base.clone();
            sort_products(&mut asc, SortState::new(field, SortOrder::Asc));
            let mut desc = base.clone();
            sort_products(&mut desc, SortState::new(field, SortOrder::Desc));
            let mut reversed = ids(&asc);
            reversed.reverse();
            assert_eq!(ids(&desc), reversed, "field {:?}", field);
        }
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let mut list = vec![
            Product::new(1, "zebra", "b", 0),
            Product::new(2, "Apple", "b", 0),
            Product::new(3, "mango", "b", 0),
        ];
        sort_products(&mut list, SortState::new(SortField::Name, SortOrder::Asc));
        assert_eq!(ids(&list), vec!["2", "3", "1"]);
        assert_eq!(compare_names("a", "A"), Ordering::Less);
        assert_eq!(compare_names("Same", "Same"), Ordering::Equal);
    }

    #[test]
    fn test_accented_names_sort_with_base_letter() {
        let mut list = vec![
            Product::new(1, "Zebra", "b", 0),
            Product::new(2, "Éclair", "b", 0),
            Product::new(3, "Fig", "b", 0),
        ];
        sort_products(&mut list, SortState::new(SortField::Name, SortOrder::Asc));
        assert_eq!(ids(&list), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_mixed_case_and_accents_order() {
        let names = ["fig", "Apple", "éclair", "apple", "Eclair", "zebra"];
        let mut list: Vec<Product> = names
            .iter()
            .enumerate()
            .map(|(i, name)| Product::new(i as i64, name, "b", 0))
            .collect();
        sort_products(&mut list, SortState::new(SortField::Name, SortOrder::Asc));
        let sorted: Vec<&str> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(sorted, vec!["apple", "Apple", "Eclair", "éclair", "fig", "zebra"]);
    }

    #[test]
    fn test_none_is_identity() {
        let mut list = vec![liked(3, 1), liked(1, 9), liked(2, 4)];
        sort_products(&mut list, SortState::new(SortField::None, SortOrder::Desc));
        assert_eq!(ids(&list), vec!["3", "1", "2"]);
        let cmp = compare_by(SortField::None, SortOrder::Asc);
        assert_eq!(cmp(&list[0], &list[1]), Ordering::Equal);
    }
}
