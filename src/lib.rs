//! Offline loyalty-statement parsing.
//!
//! Converts raw, copy-extracted statement text into a structured ledger of
//! flight segments, mileage activities and qualification-cycle status events.
//! Seven languages, six date shapes, no network: the whole pipeline is a pure
//! function from text to an immutable result plus diagnostics.
//!
//! The result shape is field-compatible with the LLM-based extraction path,
//! so downstream consumers are parser-agnostic.
//!
//! ```no_run
//! use skyledger::{parse_statement, ParseOptions};
//!
//! let text = std::fs::read_to_string("statement.txt").unwrap();
//! let result = parse_statement(&text, &ParseOptions::default()).unwrap();
//! println!("{} flights, {} activities", result.flights.len(), result.activities.len());
//! ```

pub mod activity;
pub mod classifier;
pub mod convert;
pub mod dates;
pub mod error;
pub mod flight;
pub mod header;
pub mod lexicon;
pub mod models;
pub mod normalizer;
pub mod splitter;
pub mod validator;

pub use error::{StatementError, ValidationFailure};
pub use models::{
    ActivityEntry, CycleStart, FlightSegment, Language, MonthlySummary, ParseMetadata,
    ParseOptions, ParsedHeader, ReconciliationReport, StatementParseResult, StatusEvent,
    StatusEventKind, StatusTier, TransactionCategory,
};

use chrono::{Datelike, NaiveDate};

use models::ClassifiedTransaction;

/// Parse one statement. The validator is the only hard gate; once it passes,
/// parsing is best-effort and always returns a (possibly incomplete) ledger
/// with its warnings rather than failing.
pub fn parse_statement(
    text: &str,
    options: &ParseOptions,
) -> Result<StatementParseResult, StatementError> {
    let started = std::time::Instant::now();

    validator::validate(text, options)?;
    let mut warnings: Vec<String> = Vec::new();

    let normalized;
    let working = if normalizer::needs_normalization(text) {
        if options.debug {
            log::debug!("input looks fragmented, normalizing");
        }
        normalized = normalizer::normalize(text);
        normalized.as_str()
    } else {
        text
    };

    let header = header::parse_header(working, options, &mut warnings);
    if options.debug {
        log::debug!("detected language: {}", header.language.as_str());
    }

    let blocks = splitter::split_blocks(working, header.member_name.as_deref());
    if blocks.is_empty() {
        return Err(StatementError::Parse(
            "the text contains no recognizable transaction lines — the copy may be incomplete"
                .to_string(),
        ));
    }
    if options.debug {
        log::debug!("split {} transaction blocks", blocks.len());
    }

    let classified: Vec<ClassifiedTransaction> =
        blocks.into_iter().map(classifier::classify).collect();

    let mut flights: Vec<FlightSegment> = Vec::new();
    let mut activities: Vec<ActivityEntry> = Vec::new();
    let mut status_events: Vec<StatusEvent> = Vec::new();

    for c in &classified {
        if c.confidence <= classifier::CONFIDENCE_UNCLASSIFIED {
            warnings.push(format!(
                "unclassified transaction at line {}",
                c.block.source_line
            ));
        }
        if c.block.activity_date.is_none() && splitter::has_activity_marker(&c.block.text) {
            warnings.push(format!(
                "unparseable activity date at line {}, using sentinel",
                c.block.source_line
            ));
        }

        if c.category.is_status_event() {
            status_events.push(activity::parse_status_event(c));
        } else if c.category.is_flight() {
            let segments = flight::parse_segments(c);
            if segments.is_empty() {
                // Flight phrasing without a recoverable route still carries
                // miles; keep it as a plain ledger entry.
                if let Some(entry) = activity::parse_activity(c) {
                    activities.push(entry);
                }
            } else {
                flights.extend(segments);
            }
        } else if let Some(entry) = activity::parse_activity(c) {
            activities.push(entry);
        }
    }

    convert::assign_ids(&mut activities);
    let monthly_summaries = convert::monthly_summaries(&flights, &activities);
    let bonus_xp_by_month = convert::bonus_xp_by_month(&activities);
    let reconciliation = convert::reconcile(&header, &flights, &activities, &status_events);
    if reconciliation.suggested_correction.is_some() {
        warnings.push(format!(
            "balance differs from parsed total by {} miles",
            reconciliation.difference
        ));
    }
    let cycle_start = derive_cycle_start(&status_events, &header);

    for warning in &warnings {
        log::warn!("{warning}");
    }

    let meta = ParseMetadata {
        elapsed_ms: started.elapsed().as_millis() as u64,
        language: header.language,
        tokens_used: 0,
    };

    Ok(StatementParseResult {
        flights,
        activities,
        status_events,
        monthly_summaries,
        bonus_xp_by_month,
        cycle_start,
        header,
        reconciliation,
        warnings,
        meta,
    })
}

/// The qualification cycle restarts the month after the most recent
/// counter-deduction; surplus events at that boundary roll into the new
/// cycle.
fn derive_cycle_start(events: &[StatusEvent], header: &ParsedHeader) -> Option<CycleStart> {
    let deduction = events
        .iter()
        .filter(|e| {
            matches!(
                e.kind,
                StatusEventKind::XpDeduction | StatusEventKind::UxpDeduction
            )
        })
        .max_by_key(|e| (e.date, e.kind == StatusEventKind::XpDeduction))?;

    let (year, month) = if deduction.date.month() == 12 {
        (deduction.date.year() + 1, 1)
    } else {
        (deduction.date.year(), deduction.date.month() + 1)
    };

    let boundary = NaiveDate::from_ymd_opt(deduction.date.year(), deduction.date.month(), 1)?;
    let rollover_xp = events
        .iter()
        .filter(|e| e.kind == StatusEventKind::XpSurplus && e.date >= boundary)
        .map(|e| e.xp)
        .sum();
    let rollover_uxp = events
        .iter()
        .filter(|e| e.kind == StatusEventKind::UxpSurplus && e.date >= boundary)
        .map(|e| e.uxp)
        .sum();

    Some(CycleStart {
        month: format!("{year:04}-{month:02}"),
        starting_tier: deduction.status_reached.unwrap_or(header.tier),
        rollover_xp,
        rollover_uxp,
    })
}
