//! # Slug Normalizer
//!
//! Turns arbitrary labels into URL-safe, collision-resistant
//! identifiers. Total function: any input (empty, all-punctuation,
//! multi-byte) produces a valid (possibly empty) slug, and running it
//! over its own output is a no-op.

use unicode_normalization::UnicodeNormalization;

/// Maximum slug length in characters.
pub const MAX_SLUG_LEN: usize = 80;

/// Normalizes `value` into a slug: trim, lowercase, NFKD-decompose,
/// collapse every run of non-letter/non-digit characters into a single
/// hyphen, strip edge hyphens, truncate to [`MAX_SLUG_LEN`].
///
/// Truncation happens after collapsing, so a cut can never leave a
/// dangling trailing hyphen.
pub fn slugify(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_hyphen = false;

    for ch in value.trim().to_lowercase().nfkd() {
        if ch.is_alphanumeric() {
            // A pending hyphen is only emitted between two keepable
            // characters, which trims leading separators for free.
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    if out.chars().count() > MAX_SLUG_LEN {
        out = out.chars().take(MAX_SLUG_LEN).collect();
        while out.ends_with('-') {
            out.pop();
        }
    }
    out
}

/// Resolves a board key: explicit key wins, else the fallback name,
/// both slugified. Empty result means the caller must reject.
pub fn normalize_board_key(key: &str, fallback_name: &str) -> String {
    let trimmed = key.trim();
    if !trimmed.is_empty() {
        return slugify(trimmed);
    }
    if !fallback_name.is_empty() {
        return slugify(fallback_name);
    }
    String::new()
}
