//! Data model for the statement parsing pipeline.
//!
//! Each pipeline stage consumes the previous stage's record type and produces
//! its own. The result types serialize with camelCase field names so the
//! output is interchangeable with the LLM-based extraction path.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Supported statement languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Fr,
    Nl,
    De,
    Es,
    It,
    Pt,
}

impl Language {
    /// All supported languages, in detection tie-break order.
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Fr,
        Language::Nl,
        Language::De,
        Language::Es,
        Language::It,
        Language::Pt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
            Self::Nl => "nl",
            Self::De => "de",
            Self::Es => "es",
            Self::It => "it",
            Self::Pt => "pt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Self::En),
            "fr" => Some(Self::Fr),
            "nl" => Some(Self::Nl),
            "de" => Some(Self::De),
            "es" => Some(Self::Es),
            "it" => Some(Self::It),
            "pt" => Some(Self::Pt),
            _ => None,
        }
    }
}

/// Status tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTier {
    Explorer,
    Silver,
    Gold,
    Platinum,
}

impl StatusTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explorer => "explorer",
            Self::Silver => "silver",
            Self::Gold => "gold",
            Self::Platinum => "platinum",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "explorer" => Some(Self::Explorer),
            "silver" => Some(Self::Silver),
            "gold" => Some(Self::Gold),
            "platinum" => Some(Self::Platinum),
            _ => None,
        }
    }
}

/// Transaction categories, declared in classification priority order.
///
/// The classifier walks this order top to bottom and the first category with
/// a matching pattern wins, so a more specific category must sit above any
/// broader one that could also match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionCategory {
    FlightEarning,
    FlightPartner,
    TransaviaFlight,
    AwardRedemption,
    Upgrade,
    Subscription,
    CardSpend,
    CardBonus,
    TransferIn,
    TransferOut,
    Hotel,
    Shopping,
    CarRental,
    Taxi,
    XpCounterReset,
    XpSurplus,
    Donation,
    Adjustment,
    Partner,
    Other,
}

impl TransactionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlightEarning => "flight_earning",
            Self::FlightPartner => "flight_partner",
            Self::TransaviaFlight => "transavia_flight",
            Self::AwardRedemption => "award_redemption",
            Self::Upgrade => "upgrade",
            Self::Subscription => "subscription",
            Self::CardSpend => "card_spend",
            Self::CardBonus => "card_bonus",
            Self::TransferIn => "transfer_in",
            Self::TransferOut => "transfer_out",
            Self::Hotel => "hotel",
            Self::Shopping => "shopping",
            Self::CarRental => "car_rental",
            Self::Taxi => "taxi",
            Self::XpCounterReset => "xp_counter_reset",
            Self::XpSurplus => "xp_surplus",
            Self::Donation => "donation",
            Self::Adjustment => "adjustment",
            Self::Partner => "partner",
            Self::Other => "other",
        }
    }

    /// Categories whose blocks are scanned for flight segments.
    pub fn is_flight(&self) -> bool {
        matches!(
            self,
            Self::FlightEarning | Self::FlightPartner | Self::TransaviaFlight
        )
    }

    /// Categories that produce qualification-cycle status events.
    pub fn is_status_event(&self) -> bool {
        matches!(self, Self::XpCounterReset | Self::XpSurplus)
    }

    /// Categories dated to the posting date because the balance moves at
    /// booking time, not travel time.
    pub fn uses_posting_date(&self) -> bool {
        matches!(self, Self::AwardRedemption | Self::Upgrade)
    }
}

/// One transaction's raw text span, produced by the splitter.
#[derive(Debug, Clone)]
pub struct RawTransactionBlock {
    pub text: String,
    pub posting_date: NaiveDate,
    pub activity_date: Option<NaiveDate>,
    pub source_line: usize,
}

impl RawTransactionBlock {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// A raw block tagged with a category by the classifier.
#[derive(Debug, Clone)]
pub struct ClassifiedTransaction {
    pub block: RawTransactionBlock,
    pub category: TransactionCategory,
    pub confidence: f64,
}

/// One flight leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSegment {
    pub origin: String,
    pub destination: String,
    /// Empty for Transavia-marker segments, never a placeholder number.
    pub flight_number: String,
    pub carrier: String,
    pub date: NaiveDate,
    pub miles: i64,
    pub xp: i64,
    pub uxp: i64,
    pub saf_miles: i64,
    pub saf_xp: i64,
    pub saf_uxp: i64,
    pub cabin: Option<String>,
    pub revenue: bool,
}

/// A non-flight ledger line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: String,
    pub date: NaiveDate,
    pub category: TransactionCategory,
    pub description: String,
    pub miles: i64,
    pub xp: i64,
}

/// Qualification-cycle boundary event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEventKind {
    XpDeduction,
    XpSurplus,
    StatusReached,
    UxpDeduction,
    UxpSurplus,
}

/// A qualification-cycle boundary marker. Never also an [`ActivityEntry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    pub date: NaiveDate,
    pub kind: StatusEventKind,
    pub xp: i64,
    pub uxp: i64,
    pub status_reached: Option<StatusTier>,
}

/// Document-level metadata, extracted once per parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedHeader {
    pub member_name: Option<String>,
    pub member_number: Option<String>,
    pub tier: StatusTier,
    pub total_miles: i64,
    pub total_xp: i64,
    pub total_uxp: i64,
    pub export_date: NaiveDate,
    pub language: Language,
}

/// Balance sanity check produced at the end of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub header_balance: i64,
    pub parsed_total: i64,
    /// `header_balance - parsed_total`.
    pub difference: i64,
    /// `YYYY-MM` of the oldest parsed transaction, if any.
    pub oldest_month: Option<String>,
    pub suggested_correction: Option<ActivityEntry>,
}

/// Per-month aggregate for legacy consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// `YYYY-MM`.
    pub month: String,
    pub miles_earned: i64,
    pub miles_spent: i64,
    pub xp: i64,
    pub flight_count: usize,
    pub activity_count: usize,
}

/// Qualification-cycle start setting derived from the most recent
/// counter-deduction event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStart {
    /// `YYYY-MM`; the month after the deduction.
    pub month: String,
    pub starting_tier: StatusTier,
    pub rollover_xp: i64,
    pub rollover_uxp: i64,
}

/// Parse run metadata. `tokens_used` is always zero here; the field exists
/// for shape parity with the LLM extraction path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseMetadata {
    pub elapsed_ms: u64,
    pub language: Language,
    pub tokens_used: u64,
}

/// Options accepted by [`crate::parse_statement`].
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Emit per-stage debug logging.
    pub debug: bool,
    /// Skip language detection and use this language.
    pub language_hint: Option<Language>,
    /// Raise the validator's domain-keyword floor.
    pub strict: bool,
}

/// Complete result of one parse invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementParseResult {
    pub flights: Vec<FlightSegment>,
    pub activities: Vec<ActivityEntry>,
    pub status_events: Vec<StatusEvent>,
    pub monthly_summaries: Vec<MonthlySummary>,
    pub bonus_xp_by_month: std::collections::BTreeMap<String, i64>,
    pub cycle_start: Option<CycleStart>,
    pub header: ParsedHeader,
    pub reconciliation: ReconciliationReport,
    pub warnings: Vec<String>,
    pub meta: ParseMetadata,
}

impl StatementParseResult {
    /// JSON rendering with the exact field shape the LLM extraction path
    /// produces, so consumers can treat either source interchangeably.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(StatusTier::Explorer < StatusTier::Silver);
        assert!(StatusTier::Silver < StatusTier::Gold);
        assert!(StatusTier::Gold < StatusTier::Platinum);
    }

    #[test]
    fn test_language_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::from_str(lang.as_str()), Some(lang));
        }
    }

    #[test]
    fn test_flight_categories() {
        assert!(TransactionCategory::FlightEarning.is_flight());
        assert!(TransactionCategory::TransaviaFlight.is_flight());
        assert!(!TransactionCategory::AwardRedemption.is_flight());
        assert!(!TransactionCategory::Hotel.is_flight());
    }

    #[test]
    fn test_posting_date_categories() {
        assert!(TransactionCategory::AwardRedemption.uses_posting_date());
        assert!(TransactionCategory::Upgrade.uses_posting_date());
        assert!(!TransactionCategory::FlightEarning.uses_posting_date());
        assert!(!TransactionCategory::Hotel.uses_posting_date());
    }
}
