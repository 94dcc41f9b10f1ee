//! Transaction classifier.
//!
//! Walks the priority-ordered category table; the first category with any
//! matching pattern wins. Confidence is a coarse diagnostic and never drives
//! control flow.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::categories::CATEGORY_TABLE;
use crate::models::{ClassifiedTransaction, RawTransactionBlock, TransactionCategory};
use crate::splitter;

pub const CONFIDENCE_PATTERN_HIT: f64 = 0.9;
pub const CONFIDENCE_ROUTE_FALLBACK: f64 = 0.6;
pub const CONFIDENCE_UNCLASSIFIED: f64 = 0.3;

static ROUTE_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{3}\s*[-–]\s*[A-Z]{3}\b").unwrap());

/// Award bookings show up as a leading negative amount with no description.
pub fn is_award_shape(block: &RawTransactionBlock) -> bool {
    let first = match block.lines().next() {
        Some(line) => line,
        None => return false,
    };
    match splitter::parse_header_line(first) {
        Some(h) => h.description.is_empty() && h.miles.unwrap_or(0) < 0,
        None => false,
    }
}

pub fn classify(block: RawTransactionBlock) -> ClassifiedTransaction {
    let lower = block.text.to_lowercase();

    for entry in CATEGORY_TABLE {
        let mut hit = entry.patterns.iter().any(|p| lower.contains(p));
        // Award bookings are also recognized structurally, at the same
        // priority slot as the award keywords.
        if !hit && entry.category == TransactionCategory::AwardRedemption {
            hit = is_award_shape(&block);
        }
        if hit {
            return ClassifiedTransaction {
                block,
                category: entry.category,
                confidence: CONFIDENCE_PATTERN_HIT,
            };
        }
    }

    // No category matched; a route-shaped token still suggests flight earning
    // with a partner.
    if ROUTE_TOKEN_RE.is_match(&block.text) {
        return ClassifiedTransaction {
            block,
            category: TransactionCategory::FlightPartner,
            confidence: CONFIDENCE_ROUTE_FALLBACK,
        };
    }

    ClassifiedTransaction {
        block,
        category: TransactionCategory::Other,
        confidence: CONFIDENCE_UNCLASSIFIED,
    }
}
