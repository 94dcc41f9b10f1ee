//! Pre-flight input validation.
//!
//! The only hard gate in the pipeline: everything after it is best-effort.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationFailure;
use crate::lexicon::phrases::DOMAIN_KEYWORDS;
use crate::models::ParseOptions;

pub const MIN_INPUT_BYTES: usize = 120;
pub const MAX_INPUT_BYTES: usize = 1_000_000;

/// Distinct domain keywords required before parsing is attempted.
pub const MIN_KEYWORD_HITS: usize = 3;
pub const MIN_KEYWORD_HITS_STRICT: usize = 5;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").unwrap());

const MARKUP_TAG_LIMIT: usize = 10;

pub fn validate(text: &str, options: &ParseOptions) -> Result<(), ValidationFailure> {
    if text.trim().len() < MIN_INPUT_BYTES {
        return Err(ValidationFailure::TooShort);
    }
    if text.len() > MAX_INPUT_BYTES {
        return Err(ValidationFailure::TooLong);
    }

    let trimmed = text.trim_start().to_lowercase();
    if trimmed.starts_with("<!doctype") || trimmed.starts_with("<html") {
        return Err(ValidationFailure::LooksLikeMarkup);
    }
    if TAG_RE.find_iter(text).take(MARKUP_TAG_LIMIT + 1).count() > MARKUP_TAG_LIMIT {
        return Err(ValidationFailure::LooksLikeMarkup);
    }

    let floor = if options.strict {
        MIN_KEYWORD_HITS_STRICT
    } else {
        MIN_KEYWORD_HITS
    };
    let lower = text.to_lowercase();
    let hits = DOMAIN_KEYWORDS.iter().filter(|kw| lower.contains(*kw)).count();
    if hits < floor {
        return Err(ValidationFailure::NotAStatement);
    }

    Ok(())
}
