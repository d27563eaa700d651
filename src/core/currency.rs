//! Canonical form of `Country-Currency` descriptions

use crate::core::error::{FxError, FxResult};

/// Normalizes a `Country-Currency` description for matching and querying.
///
/// The input is trimmed and must contain exactly one dash with non-empty
/// text on both sides. Each space separated word of each part gets its
/// first letter upper-cased; the rest of the word is left untouched.
pub fn normalize_currency_text(currency: &str) -> FxResult<String> {
    let trimmed = currency.trim();
    if trimmed.is_empty() {
        return Err(FxError::invalid("Currency input cannot be null or empty."));
    }

    let parts: Vec<&str> = trimmed.split('-').collect();
    if parts.len() != 2 || parts.iter().any(|part| part.is_empty()) {
        return Err(FxError::invalid(
            "Currency input must consist of exactly two parts separated by a dash.",
        ));
    }

    Ok(parts
        .iter()
        .map(|part| capitalize_words(part))
        .collect::<Vec<_>>()
        .join("-"))
}

fn capitalize_words(part: &str) -> String {
    part.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
