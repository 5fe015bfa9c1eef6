use std::cmp::Ordering;

use super::error::SushiError;
use super::requests::{CreateSushiRequest, SushiQueryParams};
use super::types::Sushi;
use crate::filters::SortBy;

/// Applies list query parameters to a set of items.
///
/// Search is a case-insensitive substring match on the name; the type
/// filter keeps only items of the selected type. The result is sorted
/// according to `params.sort_by`.
pub fn filter_sushi(items: &[Sushi], params: &SushiQueryParams) -> Vec<Sushi> {
    let needle = params.search.as_deref().map(str::to_lowercase);

    let mut filtered: Vec<Sushi> = items
        .iter()
        .filter(|item| {
            needle
                .as_deref()
                .is_none_or(|n| item.name.to_lowercase().contains(n))
                && params.sushi_type.is_none_or(|t| item.sushi_type == t)
        })
        .cloned()
        .collect();

    sort_sushi(&mut filtered, params.sort_by);
    filtered
}

/// Sorts items in place. Name sorting is case-insensitive; ties fall back
/// to the id so the order is stable across fetches.
pub fn sort_sushi(items: &mut [Sushi], sort_by: SortBy) {
    items.sort_by(|a, b| {
        let primary = match sort_by {
            SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortBy::Price => a.price.total_cmp(&b.price),
        };
        if primary != Ordering::Equal {
            return primary;
        }
        a.id.cmp(&b.id)
    });
}

/// Validates a create request before it is sent.
///
/// Prices are numeric with at most two decimals and never negative. Every
/// descriptive field is required for both nigiri and rolls.
pub fn validate_sushi(request: &CreateSushiRequest) -> Result<(), SushiError> {
    if request.name.trim().is_empty() {
        return Err(SushiError::EmptyName);
    }
    if request.image.trim().is_empty() {
        return Err(SushiError::EmptyImage);
    }
    if !is_valid_price(request.price) {
        return Err(SushiError::InvalidPrice(request.price.to_string()));
    }
    if request.fish.trim().is_empty() {
        return Err(SushiError::EmptyFish);
    }
    if request
        .fish_type
        .as_deref()
        .is_none_or(|f| f.trim().is_empty())
    {
        return Err(SushiError::MissingFishType);
    }
    if request.pieces.is_none_or(|p| p == 0) {
        return Err(SushiError::MissingPieces);
    }
    Ok(())
}

fn is_valid_price(price: f64) -> bool {
    if !price.is_finite() || price < 0.0 {
        return false;
    }
    let cents = price * 100.0;
    (cents - cents.round()).abs() < 1e-6
}
