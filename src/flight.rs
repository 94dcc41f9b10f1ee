//! Flight segment parser.
//!
//! Extracts one or more flight legs from a classified flight block. The
//! extraction layer frequently places the numeric values or the activity-date
//! marker on a line after the route line, so each segment resolves its values
//! through a bounded look-ahead that stops at the next segment.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::classifier::is_award_shape;
use crate::dates;
use crate::lexicon::phrases::{ACTIVITY_DATE_LINE_RE, CABIN_PHRASES, SAF_PHRASES};
use crate::lexicon::{TRANSAVIA_CARRIER, UXP_ELIGIBLE_CARRIERS};
use crate::models::{ClassifiedTransaction, FlightSegment};
use crate::splitter;

/// How many lines after a route line are searched for values.
pub const VALUE_LOOKAHEAD_LINES: usize = 4;

static ROUTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Z]{3})\s*[-–]\s*([A-Z]{3})\b").unwrap());
static FLIGHT_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Z]{2})\s?(\d{1,4})\b").unwrap());
static AMOUNT_UNIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([+-]?[\d.,]+)\s*(miles|meilen|millas|miglia|milhas|mijlen|mijl|xp|uxp)\b")
        .unwrap()
});

#[derive(Default)]
struct PendingValues {
    miles: Option<i64>,
    xp: Option<i64>,
    uxp: Option<i64>,
}

impl PendingValues {
    fn absorb_line(&mut self, line: &str) {
        for caps in AMOUNT_UNIT_RE.captures_iter(line) {
            let Some(value) = dates::parse_amount(&caps[1]) else {
                continue;
            };
            match caps[2].to_lowercase().as_str() {
                "xp" => self.xp = self.xp.or(Some(value)),
                "uxp" => self.uxp = self.uxp.or(Some(value)),
                _ => self.miles = self.miles.or(Some(value)),
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.miles.is_none() && self.xp.is_none() && self.uxp.is_none()
    }
}

fn is_saf_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    SAF_PHRASES.iter().any(|p| lower.contains(p))
}

struct SegmentStart {
    origin: String,
    destination: String,
    flight_number: String,
    carrier: String,
}

/// A segment line is a route token followed by either a flight number or the
/// Transavia marker.
fn match_segment_start(line: &str) -> Option<SegmentStart> {
    let route = ROUTE_RE.captures(line)?;
    let route_end = route.get(0).unwrap().end();
    let tail = &line[route_end..];

    if let Some(num) = FLIGHT_NUMBER_RE.captures(tail) {
        return Some(SegmentStart {
            origin: route[1].to_string(),
            destination: route[2].to_string(),
            flight_number: format!("{}{}", &num[1], &num[2]),
            carrier: num[1].to_string(),
        });
    }
    if line.to_lowercase().contains("transavia") {
        // The no-flight-number carrier variant: empty flight number, never a
        // placeholder.
        return Some(SegmentStart {
            origin: route[1].to_string(),
            destination: route[2].to_string(),
            flight_number: String::new(),
            carrier: TRANSAVIA_CARRIER.to_string(),
        });
    }
    None
}

fn find_cabin(lines: &[&str]) -> Option<String> {
    for line in lines {
        let lower = line.to_lowercase();
        for phrase in CABIN_PHRASES {
            if lower.contains(phrase) {
                return Some(phrase.to_string());
            }
        }
    }
    None
}

/// Parse all flight segments out of one classified flight block.
pub fn parse_segments(classified: &ClassifiedTransaction) -> Vec<FlightSegment> {
    let block = &classified.block;
    let award = is_award_shape(block);
    let lines: Vec<&str> = block.lines().collect();
    let block_header = lines.first().and_then(|l| splitter::parse_header_line(l));

    let mut segments: Vec<FlightSegment> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        if is_saf_line(line) {
            // A fuel-bonus line is never a segment; it tops up the previous
            // one. Several bonus lines can apply to one segment.
            let mut values = PendingValues::default();
            values.absorb_line(line);
            if let Some(last) = segments.last_mut() {
                last.saf_miles += values.miles.unwrap_or(0);
                last.saf_xp += values.xp.unwrap_or(0);
                if UXP_ELIGIBLE_CARRIERS.contains(&last.carrier.as_str()) {
                    last.saf_uxp += values.uxp.unwrap_or(0);
                }
            } else {
                log::debug!("fuel-bonus line without a preceding segment: {line}");
            }
            continue;
        }

        let Some(start) = match_segment_start(line) else {
            continue;
        };

        let mut values = PendingValues::default();
        values.absorb_line(line);
        let mut segment_date = None;

        let window_end = (idx + 1 + VALUE_LOOKAHEAD_LINES).min(lines.len());
        let mut cabin_window = vec![*line];
        for next in &lines[idx + 1..window_end] {
            if match_segment_start(next).is_some() || is_saf_line(next) {
                break;
            }
            if let Some(caps) = ACTIVITY_DATE_LINE_RE.captures(next) {
                if segment_date.is_none() {
                    segment_date = dates::parse_statement_date(caps[2].trim());
                }
                continue;
            }
            values.absorb_line(next);
            cabin_window.push(*next);
        }

        // Single-segment blocks often keep their values on the transaction
        // header line instead of the route line.
        if values.is_empty() && segments.is_empty() {
            if let Some(h) = &block_header {
                values.miles = h.miles;
                values.xp = h.xp;
                values.uxp = h.uxp;
            }
        }

        let uxp_eligible = UXP_ELIGIBLE_CARRIERS.contains(&start.carrier.as_str());
        segments.push(FlightSegment {
            origin: start.origin,
            destination: start.destination,
            flight_number: start.flight_number,
            carrier: start.carrier,
            date: segment_date
                .or(block.activity_date)
                .unwrap_or(block.posting_date),
            miles: values.miles.unwrap_or(0),
            xp: values.xp.unwrap_or(0),
            uxp: if uxp_eligible { values.uxp.unwrap_or(0) } else { 0 },
            saf_miles: 0,
            saf_xp: 0,
            saf_uxp: 0,
            cabin: find_cabin(&cabin_window),
            revenue: !award,
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawTransactionBlock, TransactionCategory};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn classified(text: &str) -> ClassifiedTransaction {
        let block_text = text.to_string();
        let activity_date = crate::splitter::find_activity_date(&block_text);
        ClassifiedTransaction {
            block: RawTransactionBlock {
                text: block_text,
                posting_date: d(2025, 3, 12),
                activity_date,
                source_line: 1,
            },
            category: TransactionCategory::FlightEarning,
            confidence: 0.9,
        }
    }

    #[test]
    fn test_single_segment_values_from_header_line() {
        let c = classified(
            "12 Mar 2025 Miles earned on flight +2,500 Miles +15 XP +15 UXP\n\
             AMS-JFK KL 641\n\
             on 2 Mar 2025",
        );
        let segments = parse_segments(&c);
        assert_eq!(segments.len(), 1);
        let s = &segments[0];
        assert_eq!(s.origin, "AMS");
        assert_eq!(s.destination, "JFK");
        assert_eq!(s.flight_number, "KL641");
        assert_eq!(s.carrier, "KL");
        assert_eq!(s.miles, 2500);
        assert_eq!(s.xp, 15);
        assert_eq!(s.uxp, 15);
        assert_eq!(s.date, d(2025, 3, 2));
        assert!(s.revenue);
    }

    #[test]
    fn test_multi_leg_trip() {
        let c = classified(
            "12 Mar 2025 Miles earned on flight +4,100 Miles +25 XP\n\
             AMS-JFK KL 641 +2,500 Miles +15 XP\n\
             on 2 Mar 2025\n\
             JFK-AMS KL 642 +1,600 Miles +10 XP\n\
             on 9 Mar 2025",
        );
        let segments = parse_segments(&c);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].miles, 2500);
        assert_eq!(segments[0].date, d(2025, 3, 2));
        assert_eq!(segments[1].miles, 1600);
        assert_eq!(segments[1].date, d(2025, 3, 9));
    }

    #[test]
    fn test_uxp_zeroed_for_ineligible_carrier() {
        let c = classified(
            "12 Mar 2025 Partner flight +900 Miles +5 XP +5 UXP\n\
             CDG-FCO AZ 318",
        );
        let segments = parse_segments(&c);
        assert_eq!(segments.len(), 1);
        // Raw text claims 5 UXP but AZ is not UXP-eligible.
        assert_eq!(segments[0].uxp, 0);
        assert_eq!(segments[0].xp, 5);
    }

    #[test]
    fn test_transavia_marker_segment() {
        let c = classified(
            "12 Mar 2025 Transavia flight +500 Miles +2 XP\n\
             AMS-ALC Transavia",
        );
        let segments = parse_segments(&c);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].flight_number, "");
        assert_eq!(segments[0].carrier, "HV");
        assert_eq!(segments[0].uxp, 0);
    }

    #[test]
    fn test_saf_bonus_folds_into_previous_segment() {
        let c = classified(
            "13 Mar 2025 Miles earned on flight +2,000 Miles +10 XP\n\
             AMS-CDG AF 1381\n\
             Sustainable Aviation Fuel bonus +500 Miles +5 XP\n\
             Sustainable Aviation Fuel bonus +100 Miles +1 XP",
        );
        let segments = parse_segments(&c);
        assert_eq!(segments.len(), 1);
        let s = &segments[0];
        assert_eq!(s.miles, 2000);
        assert_eq!(s.saf_miles, 600);
        assert_eq!(s.saf_xp, 6);
    }

    #[test]
    fn test_award_block_forces_revenue_false() {
        let c = classified(
            "5 Apr 2025 -30,000 Miles\n\
             AMS-LIS KL 1693 +0 Miles +0 XP",
        );
        let segments = parse_segments(&c);
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].revenue);
    }

    #[test]
    fn test_lookahead_stops_at_next_segment() {
        let c = classified(
            "12 Mar 2025 Miles earned on flight +0 Miles +0 XP\n\
             AMS-JFK KL 641\n\
             JFK-AMS KL 642 +1,600 Miles +10 XP",
        );
        let segments = parse_segments(&c);
        assert_eq!(segments.len(), 2);
        // First segment must not steal the second segment's values.
        assert_eq!(segments[0].miles, 0);
        assert_eq!(segments[1].miles, 1600);
    }

    #[test]
    fn test_cabin_detected() {
        let c = classified(
            "12 Mar 2025 Miles earned on flight +2,500 Miles +15 XP\n\
             AMS-JFK KL 641 Business",
        );
        let segments = parse_segments(&c);
        assert_eq!(segments[0].cabin.as_deref(), Some("business"));
    }
}
