//! Text normalizer.
//!
//! Copy-extracted statement text frequently splits one logical transaction
//! across many raw lines: the date on one line, the description on the next,
//! each amount on its own line. This module rejoins those fragments so that
//! downstream stages see one transaction (or one status-event trigger line)
//! per line.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dates;
use crate::lexicon::phrases::{
    ACTIVITY_DATE_LINE_RE, BOILERPLATE_RES, DETAIL_SECTION_KEYWORDS, FRAGMENT_JOINS,
};
use crate::splitter;

/// Share of stand-alone token lines above which a document is considered
/// fragmented.
const STANDALONE_RATIO_THRESHOLD: f64 = 0.2;

/// A line consisting only of amount tokens. Bare numbers need a sign so that
/// years and flight numbers don't qualify.
static AMOUNTS_ONLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:[+-][\d.,]+(?:\s*(?:miles|meilen|millas|miglia|milhas|mijlen?|xp|uxp))?|[\d.,]+\s*(?:miles|meilen|millas|miglia|milhas|mijlen?|xp|uxp))\s*)+$",
    )
    .unwrap()
});

static ROUTE_TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]{3}\s*[-–]\s*[A-Z]{3}").unwrap());
static FLIGHT_NUMBER_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{2}\s?\d{1,4}\b").unwrap());

fn is_boilerplate(line: &str) -> bool {
    BOILERPLATE_RES.iter().any(|re| re.is_match(line))
}

fn is_amounts_only(line: &str) -> bool {
    AMOUNTS_ONLY_RE.is_match(line)
}

/// Text that begins a new segment/detail block inside a transaction.
fn starts_new_detail(line: &str) -> bool {
    if ROUTE_TOKEN_RE.is_match(line) || FLIGHT_NUMBER_TOKEN_RE.is_match(line) {
        return true;
    }
    let lower = line.to_lowercase();
    DETAIL_SECTION_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Heuristic consulted by the orchestrator: well-formed texts skip
/// normalization entirely.
pub fn needs_normalization(text: &str) -> bool {
    for (left, right) in FRAGMENT_JOINS {
        if text.contains(&format!("{left}\n{right}")) {
            return true;
        }
    }

    let mut total = 0usize;
    let mut standalone = 0usize;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        total += 1;
        if dates::is_standalone_date(line)
            || is_amounts_only(line)
            || ACTIVITY_DATE_LINE_RE.is_match(line)
        {
            standalone += 1;
        }
    }
    total > 0 && (standalone as f64 / total as f64) >= STANDALONE_RATIO_THRESHOLD
}

/// Collapse fragmented raw text into one transaction per line.
pub fn normalize(text: &str) -> String {
    let text = join_known_fragments(text);

    let mut out: Vec<String> = Vec::new();
    let mut buf: Vec<String> = Vec::new();
    let mut buf_has_amounts = false;

    let flush = |buf: &mut Vec<String>, has_amounts: &mut bool, out: &mut Vec<String>| {
        if !buf.is_empty() {
            out.push(buf.join(" "));
            buf.clear();
        }
        *has_amounts = false;
    };

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || is_boilerplate(line) {
            continue;
        }

        if splitter::parse_header_line(line).is_some() {
            // Already a complete transaction line.
            flush(&mut buf, &mut buf_has_amounts, &mut out);
            out.push(line.to_string());
        } else if dates::is_standalone_date(line) {
            flush(&mut buf, &mut buf_has_amounts, &mut out);
            buf.push(line.to_string());
        } else if ACTIVITY_DATE_LINE_RE.is_match(line) {
            flush(&mut buf, &mut buf_has_amounts, &mut out);
            out.push(line.to_string());
        } else if is_amounts_only(line) {
            buf.push(line.to_string());
            buf_has_amounts = true;
        } else {
            // Continuation text. Once the buffer holds amounts, text that
            // looks like a new segment or detail section closes it so that
            // each segment keeps its own block.
            if buf_has_amounts && starts_new_detail(line) {
                flush(&mut buf, &mut buf_has_amounts, &mut out);
            }
            buf.push(line.to_string());
        }
    }
    flush(&mut buf, &mut buf_has_amounts, &mut out);

    out.join("\n")
}

fn join_known_fragments(text: &str) -> String {
    // Trim per-line whitespace first so "X \n Y" still matches the table.
    let mut result = text
        .replace("\r\n", "\n")
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    for (left, right) in FRAGMENT_JOINS {
        let split = format!("{left}\n{right}");
        let joined = format!("{left} {right}");
        while result.contains(&split) {
            result = result.replace(&split, &joined);
        }
    }
    result
}
