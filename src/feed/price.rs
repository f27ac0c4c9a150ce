use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

fn parse(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match Decimal::from_str(raw) {
        Ok(d) => Some(d),
        Err(e) => {
            debug!(value = raw, error = %e, "unparseable price");
            None
        }
    }
}

/// Two decimals at most, no trailing zeros: `19.50` -> `19.5`, `20.00` -> `20`.
/// Missing or malformed input yields an empty string.
pub fn format_price(raw: Option<&str>) -> String {
    raw.and_then(parse)
        .map(|d| {
            d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .normalize()
                .to_string()
        })
        .unwrap_or_default()
}

/// The list price shown next to `price`: the compare-at price when it is a real
/// markup over the selling price, otherwise the selling price itself.
pub fn full_price(price: &str, compare_at: Option<&str>) -> String {
    let compare_at = format_price(compare_at);
    match (parse(&compare_at), parse(price)) {
        (Some(c), Some(p)) if c > p => compare_at,
        _ => price.to_string(),
    }
}

/// Percentage off, truncated toward zero. `None` unless both prices are
/// positive and `full_price` exceeds `price`.
pub fn compute_discount(price: &str, full_price: &str) -> Option<String> {
    let price = parse(price)?;
    let full = parse(full_price)?;
    if price <= Decimal::ZERO || full <= Decimal::ZERO || full <= price {
        return None;
    }
    let pct = ((full - price) / full * Decimal::ONE_HUNDRED).trunc();
    Some(pct.normalize().to_string())
}
