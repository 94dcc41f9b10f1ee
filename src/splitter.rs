//! Transaction splitter.
//!
//! Partitions normalized text into raw transaction blocks anchored on
//! transaction-header lines. Two states: outside any block, or inside one.
//! A header line always flushes the previous block and starts a new one;
//! any other non-boilerplate line is appended to the current block.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::dates;
use crate::lexicon::phrases::{ACTIVITY_DATE_MARKER_RE, BOILERPLATE_RES};
use crate::models::RawTransactionBlock;

/// The parsed shape of a transaction-header line: a leading date, an optional
/// description, and one or more trailing amount tokens.
#[derive(Debug, Clone)]
pub struct HeaderLine {
    pub date: NaiveDate,
    pub description: String,
    pub miles: Option<i64>,
    pub xp: Option<i64>,
    pub uxp: Option<i64>,
}

static TRAILING_UNIT_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([+-]?[\d.,]+)\s*(miles|meilen|millas|miglia|milhas|mijlen|mijl|xp|uxp)\s*$")
        .unwrap()
});

static TRAILING_BARE_SIGNED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([+-][\d.,]+)\s*$").unwrap());

#[derive(Clone, Copy)]
enum AmountUnit {
    Miles,
    Xp,
    Uxp,
}

fn trailing_unit_amount(rest: &str) -> Option<(AmountUnit, i64, usize)> {
    let caps = TRAILING_UNIT_AMOUNT_RE.captures(rest)?;
    let value = dates::parse_amount(&caps[1])?;
    let unit = match caps[2].to_lowercase().as_str() {
        "xp" => AmountUnit::Xp,
        "uxp" => AmountUnit::Uxp,
        _ => AmountUnit::Miles,
    };
    Some((unit, value, caps.get(0).unwrap().start()))
}

fn trailing_bare_signed(rest: &str) -> Option<(i64, usize)> {
    let caps = TRAILING_BARE_SIGNED_RE.captures(rest)?;
    let value = dates::parse_amount(&caps[1])?;
    Some((value, caps.get(0).unwrap().start()))
}

/// Parse a line as a transaction header. Returns `None` when the line does
/// not carry both a leading date and at least one amount token, which is what
/// separates header lines from continuation text.
pub fn parse_header_line(line: &str) -> Option<HeaderLine> {
    let line = line.trim();
    let (date, consumed) = dates::match_leading_date(line)?;
    let mut rest = line[consumed..].trim().to_string();

    let mut miles: Option<i64> = None;
    let mut xp: Option<i64> = None;
    let mut uxp: Option<i64> = None;

    // Strip amount tokens off the tail, right to left, until none remain.
    loop {
        if let Some((unit, value, start)) = trailing_unit_amount(&rest) {
            match unit {
                AmountUnit::Xp => xp = xp.or(Some(value)),
                AmountUnit::Uxp => uxp = uxp.or(Some(value)),
                AmountUnit::Miles => miles = miles.or(Some(value)),
            }
            rest.truncate(start);
            rest = rest.trim_end().to_string();
            continue;
        }
        if miles.is_none() {
            if let Some((value, start)) = trailing_bare_signed(&rest) {
                miles = Some(value);
                rest.truncate(start);
                rest = rest.trim_end().to_string();
                continue;
            }
        }
        break;
    }

    if miles.is_none() && xp.is_none() && uxp.is_none() {
        return None;
    }

    Some(HeaderLine {
        date,
        description: rest.trim().to_string(),
        miles,
        xp,
        uxp,
    })
}

fn is_boilerplate(line: &str, member_name: Option<&str>) -> bool {
    if let Some(name) = member_name {
        if !name.is_empty() && line.eq_ignore_ascii_case(name) {
            return true;
        }
    }
    BOILERPLATE_RES.iter().any(|re| re.is_match(line))
}

/// Split normalized text into raw transaction blocks. `member_name` filters
/// footer repeats of the member's name that PDF extraction interleaves with
/// transaction text.
pub fn split_blocks(text: &str, member_name: Option<&str>) -> Vec<RawTransactionBlock> {
    let mut blocks: Vec<RawTransactionBlock> = Vec::new();
    let mut current: Option<(Vec<String>, NaiveDate, usize)> = None;

    let flush = |current: &mut Option<(Vec<String>, NaiveDate, usize)>,
                 blocks: &mut Vec<RawTransactionBlock>| {
        if let Some((lines, posting_date, source_line)) = current.take() {
            let text = lines.join("\n");
            let activity_date = find_activity_date(&text);
            blocks.push(RawTransactionBlock {
                text,
                posting_date,
                activity_date,
                source_line,
            });
        }
    };

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_boilerplate(line, member_name) {
            continue;
        }

        if let Some(header) = parse_header_line(line) {
            flush(&mut current, &mut blocks);
            current = Some((vec![line.to_string()], header.date, idx + 1));
        } else if let Some((lines, _, _)) = &mut current {
            lines.push(line.to_string());
        }
        // Lines before the first header belong to the document header region
        // and are not transaction content.
    }
    flush(&mut current, &mut blocks);

    blocks
}

/// True when the block text carries an activity-date marker at all, parseable
/// or not.
pub fn has_activity_marker(text: &str) -> bool {
    text.lines().any(|line| ACTIVITY_DATE_MARKER_RE.is_match(line))
}

/// Re-scan assembled block text for an activity-date marker
/// ("on/op/le/am/el/il/em <date>").
pub fn find_activity_date(text: &str) -> Option<NaiveDate> {
    for line in text.lines() {
        if let Some(caps) = ACTIVITY_DATE_MARKER_RE.captures(line) {
            let tail = caps[2].trim().to_string();
            if let Some(date) = dates::parse_statement_date(&tail) {
                return Some(date);
            }
            // The marker capture can overrun into trailing tokens; retry on
            // shrinking token prefixes.
            let tokens: Vec<&str> = tail.split_whitespace().collect();
            for end in (1..tokens.len()).rev() {
                if let Some(date) = dates::parse_statement_date(&tokens[..end].join(" ")) {
                    return Some(date);
                }
            }
        }
    }
    None
}
