//! Header parser.
//!
//! Extracts document-level metadata: language, member identity, status tier,
//! running totals and export date. Never fails; absent fields default.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dates;
use crate::lexicon;
use crate::lexicon::phrases::{totals_pattern, EXPORT_DATE_RES, MEMBER_NUMBER_RES};
use crate::models::{Language, ParseOptions, ParsedHeader, StatusTier};

/// Member identity is only searched this deep into the document.
const IDENTITY_SCAN_CHARS: usize = 500;

static TIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(explorer|silver|gold|platinum)\b").unwrap());

/// Lowercase particles allowed inside a member name ("J. van der Berg").
const NAME_PARTICLES: &[&str] = &[
    "van", "der", "den", "de", "du", "da", "das", "dos", "del", "della", "di", "von", "le", "la",
];

/// Tokens that disqualify a line from being a member name.
const NAME_EXCLUSIONS: &[&str] = &[
    "miles",
    "meilen",
    "millas",
    "miglia",
    "milhas",
    "statement",
    "relevé",
    "overzicht",
    "übersicht",
    "extracto",
    "estratto",
    "extrato",
    "balance",
    "solde",
    "saldo",
    "meilenstand",
    "explorer",
    "silver",
    "gold",
    "platinum",
    "page",
    "pagina",
    "seite",
    "página",
    "xp",
];

pub fn parse_header(text: &str, options: &ParseOptions, warnings: &mut Vec<String>) -> ParsedHeader {
    let language = options
        .language_hint
        .unwrap_or_else(|| lexicon::detect_language(text));

    let (total_miles, total_xp, total_uxp) = parse_totals(text, language);

    let mut head_end = text.len().min(IDENTITY_SCAN_CHARS);
    while !text.is_char_boundary(head_end) {
        head_end -= 1;
    }
    let head = &text[..head_end];
    let tier = TIER_RE
        .captures(head)
        .and_then(|c| StatusTier::from_str(&c[1]))
        .unwrap_or(StatusTier::Explorer);

    let member_name = find_member_name(head);
    let member_number = MEMBER_NUMBER_RES
        .iter()
        .find_map(|re| re.captures(head).map(|c| c[1].to_string()));

    let export_date = parse_export_date(text, warnings)
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    ParsedHeader {
        member_name,
        member_number,
        tier,
        total_miles,
        total_xp,
        total_uxp,
        export_date,
        language,
    }
}

/// Try the detected language's totals pattern first, then the remaining
/// languages in declaration order.
fn parse_totals(text: &str, language: Language) -> (i64, i64, i64) {
    let ordered = std::iter::once(language).chain(Language::ALL.into_iter().filter(|l| *l != language));
    for lang in ordered {
        if let Some(caps) = totals_pattern(lang).captures(text) {
            let miles = dates::parse_amount(&caps[1]).unwrap_or(0);
            let xp = dates::parse_amount(&caps[2]).unwrap_or(0);
            let uxp = caps
                .get(3)
                .and_then(|m| dates::parse_amount(m.as_str()))
                .unwrap_or(0);
            return (miles, xp, uxp);
        }
    }
    (0, 0, 0)
}

fn parse_export_date(text: &str, warnings: &mut Vec<String>) -> Option<chrono::NaiveDate> {
    for line in text.lines() {
        for re in EXPORT_DATE_RES.iter() {
            if let Some(caps) = re.captures(line.trim()) {
                let tail = caps[1].trim();
                if let Some(date) = dates::parse_statement_date(tail) {
                    return Some(date);
                }
                let tokens: Vec<&str> = tail.split_whitespace().collect();
                for end in (1..tokens.len()).rev() {
                    if let Some(date) = dates::parse_statement_date(&tokens[..end].join(" ")) {
                        return Some(date);
                    }
                }
                warnings.push(format!("unparseable export date: {tail}"));
            }
        }
    }
    None
}

fn find_member_name(head: &str) -> Option<String> {
    head.lines()
        .map(str::trim)
        .find(|line| looks_like_name(line))
        .map(|line| line.to_string())
}

fn looks_like_name(line: &str) -> bool {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 2 || tokens.len() > 4 || line.len() > 40 {
        return false;
    }
    let lower = line.to_lowercase();
    if NAME_EXCLUSIONS.iter().any(|kw| lower.contains(kw)) {
        return false;
    }
    tokens.iter().all(|token| {
        if NAME_PARTICLES.contains(&token.to_lowercase().as_str()) {
            return true;
        }
        let mut chars = token.chars();
        let first_upper = chars.next().map(|c| c.is_uppercase()).unwrap_or(false);
        first_upper && token.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '\'' | '-'))
    })
}
