//! Terminal rendering for catalog views.
//!
//! Product listings go to **stdout**; notices go to **stderr** so stdout
//! stays parseable for scripts.

use std::io::Write;

use shelf_core::catalog::FilterPhase;
use shelf_core::events::CatalogView;
use shelf_core::facets::{translate, BRAND_CODES, COLOR_CODES, PRICE_BUCKETS};
use shelf_core::models::{Facet, SortField, SortOrder};

/// Print a view as text (or pretty JSON when `json` is set).
pub fn print_view(view: &CatalogView, json: bool) {
    if let Some(notice) = &view.notice {
        let _ = writeln!(std::io::stderr().lock(), "notice: {}", notice);
    }

    if json {
        match serde_json::to_string_pretty(&view.to_json()) {
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("Failed to encode view: {}", e),
        }
        return;
    }

    println!("{}", summary_line(view));
    if view.products.is_empty() {
        println!("No products.");
        return;
    }
    for (i, p) in view.products.iter().enumerate() {
        println!(
            "{}. {} / {}  {}  ♥ {}",
            i + 1,
            p.brand,
            p.name,
            format_won(p.price),
            group_digits(p.like_count)
        );
        println!("    id: {}", p.id);
    }
}

fn summary_line(view: &CatalogView) -> String {
    let phase = match view.phase {
        FilterPhase::Idle => "all products",
        FilterPhase::Filtering => "filtering",
        FilterPhase::Filtered => "filtered",
    };
    let mut line = format!("{} ({} shown)", phase, group_digits(view.products.len() as u64));
    if view.sort.field != SortField::None {
        let field = match view.sort.field {
            SortField::Name => "name",
            SortField::LikeCount => "likeCount",
            SortField::Price => "price",
            SortField::None => "none",
        };
        let order = match view.sort.order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        line.push_str(&format!(", sorted by {} {}", field, order));
    }
    if !view.search_term.is_empty() {
        line.push_str(&format!(", search \"{}\"", view.search_term));
    }
    line
}

/// Print the facet code table.
pub fn print_facet_table() {
    println!("brand (unknown labels → Others)");
    for (label, _) in BRAND_CODES {
        println!("  {:<14} {}", label, translate(Facet::Brand, label));
    }
    println!();
    println!("color (unknown labels → UPPER-CASED label)");
    for (label, _) in COLOR_CODES {
        println!("  {:<14} {}", label, translate(Facet::Color, label));
    }
    println!();
    println!("price");
    for label in PRICE_BUCKETS {
        println!("  {:<14} {}", label, translate(Facet::Price, label));
    }
}

/// Group digits in thousands: `1234567` becomes `1,234,567`.
pub fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let head = match digits.len() % 3 {
        0 => 3,
        r => r,
    };
    let mut out = digits[..head].to_string();
    let mut rest = &digits[head..];
    while !rest.is_empty() {
        out.push(',');
        out.push_str(&rest[..3]);
        rest = &rest[3..];
    }
    out
}

/// Price as shown on the storefront: `90000` becomes `90,000원`.
pub fn format_won(price: u64) -> String {
    format!("{}원", group_digits(price))
}
