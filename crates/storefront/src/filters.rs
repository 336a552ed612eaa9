//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a 0-5 rating as five stars, e.g. `3.6` becomes `"★★★★☆"`.
///
/// Usage in templates: `{{ rating.rate|stars }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn stars(rate: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(star_string(&rate.to_string()))
}

const MAX_STARS: usize = 5;

fn star_string(rate: &str) -> String {
    let filled = Decimal::from_str(rate.trim())
        .ok()
        .map(|r| r.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|r| usize::try_from(r.mantissa()).ok())
        .unwrap_or(0)
        .min(MAX_STARS);

    "★".repeat(filled) + &"☆".repeat(MAX_STARS - filled)
}
