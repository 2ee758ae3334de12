//! Packaging-unit normalization.
//!
//! Every variant of a product draws from one stock pool measured in
//! grams-equivalent (millilitres count as grams). A unit label is free text;
//! this module turns it into the pool quantity one unit of that variant
//! consumes.
//!
//! Labels that carry no mass or volume ("1 Dozen", "1 pc") resolve to 0. Such
//! variants are not stock-tracked: they always report zero available units.

/// Labels recognized verbatim after lower-casing and trimming.
const CANONICAL_UNITS: &[(&str, u64)] = &[
    ("1kg", 1000),
    ("1 kg", 1000),
    ("500gm", 500),
    ("500 gm", 500),
    ("500g", 500),
    ("500 g", 500),
    ("250gm", 250),
    ("250 gm", 250),
    ("250g", 250),
    ("250 g", 250),
    ("1 litre", 1000),
    ("1litre", 1000),
    ("1 l", 1000),
    ("1l", 1000),
    ("500ml", 500),
    ("500 ml", 500),
];

/// Grams-equivalent of one unit of `unit`, or 0 when the label cannot be
/// stock-tracked.
///
/// Falls back to `<integer><suffix>` (optional whitespace between) where the
/// suffix is one of `kg`, `l` (×1000) or `g`, `gm`, `ml` (×1).
pub fn grams_equivalent(unit: &str) -> u64 {
    let normalized = unit.trim().to_lowercase();

    if let Some((_, grams)) = CANONICAL_UNITS.iter().find(|(label, _)| *label == normalized) {
        return *grams;
    }

    parse_measure(&normalized).unwrap_or(0)
}

/// Whether stock for this unit can be tracked against the grams pool.
pub fn is_stock_tracked(unit: &str) -> bool {
    grams_equivalent(unit) > 0
}

fn parse_measure(unit: &str) -> Option<u64> {
    let digits_end = unit
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unit.len());
    if digits_end == 0 {
        return None;
    }

    let (digits, suffix) = unit.split_at(digits_end);
    let value: u64 = digits.parse().ok()?;
    let factor = match suffix.trim_start() {
        "kg" | "l" => 1000,
        "g" | "gm" | "ml" => 1,
        _ => return None,
    };

    value.checked_mul(factor)
}
