//! Phrase-level lexicon: fragment joins, boilerplate, markers and the
//! per-language header patterns.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Language;

/// Phrase pairs the text extraction layer is known to split across lines.
/// The normalizer rejoins `"{left}\n{right}"` into `"{left} {right}"` before
/// any line-oriented processing.
pub const FRAGMENT_JOINS: &[(&str, &str)] = &[
    // Sustainable-fuel bonus phrasing, all languages
    ("Sustainable", "Aviation Fuel"),
    ("Sustainable Aviation", "Fuel"),
    ("Carburant d'aviation", "durable"),
    ("Carburant", "durable"),
    ("Duurzame", "vliegtuigbrandstof"),
    ("Nachhaltiger", "Flugtreibstoff"),
    ("Combustible", "sostenible"),
    ("Carburante", "sostenibile"),
    ("Combustível", "sustentável"),
    // Qualification-cycle phrasing
    ("XP counter", "reset"),
    ("XP", "counter reset"),
    ("compteur XP", "remis à zéro"),
    ("remise à zéro", "du compteur"),
    ("XP-teller", "gereset"),
    ("XP-Zähler", "zurückgesetzt"),
    ("contador de XP", "reiniciado"),
    ("contatore XP", "azzerato"),
    ("contador de XP", "zerado"),
    ("carried", "over"),
    // Brands and compound nouns
    ("Air", "France"),
    ("American", "Express"),
    ("welcome", "bonus"),
    ("prime de", "bienvenue"),
    ("car", "rental"),
    ("location de", "voiture"),
];

/// Page and banner boilerplate dropped before block splitting.
pub static BOILERPLATE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(page|pagina|seite|página|pág\.?)\s*\d+(\s*(of|sur|van|von|de|di)\s*\d+)?$",
        r"(?i)^(miles )?(statement|relevé|overzicht|übersicht|extracto|estratto|extrato)( de miles| van miles| der meilen)?$",
        r"(?i)^(explorer|silver|gold|platinum)$",
        r"(?i)^(member|membre|lid|mitglied|socio|associado)\s*:.*$",
        r"^[-=_]{3,}$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Activity-date marker: "on/op/le/am/el/il/em <date>", optionally with the
/// date on the same line.
pub static ACTIVITY_DATE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(on|op|le|am|el|il|em)\s+([\d\p{L}][\d\s./\-\p{L},]*\d{4})").unwrap()
});

/// A line that is nothing but an activity-date marker.
pub static ACTIVITY_DATE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(on|op|le|am|el|il|em)\s+([\d\p{L}][\d\s./\-\p{L},]*\d{4})\s*$").unwrap()
});

/// Sustainable-fuel bonus line markers.
pub const SAF_PHRASES: &[&str] = &[
    "sustainable aviation fuel",
    "saf bonus",
    "carburant d'aviation durable",
    "carburant durable",
    "duurzame vliegtuigbrandstof",
    "nachhaltiger flugtreibstoff",
    "combustible sostenible",
    "carburante sostenibile",
    "combustível sustentável",
    "combustivel sustentavel",
];

/// Explicit status-reached phrasing with the tier token nearby.
pub static STATUS_REACHED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(explorer|silver|gold|platinum)\s+(status reached|statut atteint|status bereikt|status erreicht|nivel alcanzado|estado alcanzado|status raggiunto|status atingido)",
    )
    .unwrap()
});

/// Rollover phrasing that marks a surplus event.
pub const ROLLOVER_PHRASES: &[&str] = &[
    "carried over",
    "surplus",
    "reporté",
    "reporte",
    "overgedragen",
    "overschot",
    "übertragen",
    "überschuss",
    "excedente",
    "eccedenza",
];

/// Detail-section keywords that start a new segment/detail block inside a
/// transaction while normalizing.
pub const DETAIL_SECTION_KEYWORDS: &[&str] = &[
    "transavia",
    "sustainable aviation fuel",
    "economy",
    "premium economy",
    "business",
    "la première",
    "cabin",
    "cabine",
    "kabine",
];

/// Cabin names recognized near a flight segment.
pub const CABIN_PHRASES: &[&str] = &[
    "premium economy",
    "economy",
    "business",
    "first",
    "la première",
    "la premiere",
    "économique",
    "economique",
    "affaires",
    "turista",
    "económica",
    "economica",
];

/// Per-language header-totals pattern: captures miles, XP and optional UXP.
pub fn totals_pattern(language: Language) -> &'static Lazy<Regex> {
    static EN: Lazy<Regex> = Lazy::new(|| totals_re("balance"));
    static FR: Lazy<Regex> = Lazy::new(|| totals_re("solde"));
    static NL: Lazy<Regex> = Lazy::new(|| totals_re("saldo"));
    static DE: Lazy<Regex> = Lazy::new(|| totals_re("meilenstand|kontostand"));
    static ES: Lazy<Regex> = Lazy::new(|| totals_re("saldo"));
    static IT: Lazy<Regex> = Lazy::new(|| totals_re("saldo"));
    static PT: Lazy<Regex> = Lazy::new(|| totals_re("saldo"));
    match language {
        Language::En => &EN,
        Language::Fr => &FR,
        Language::Nl => &NL,
        Language::De => &DE,
        Language::Es => &ES,
        Language::It => &IT,
        Language::Pt => &PT,
    }
}

fn totals_re(balance_word: &str) -> Regex {
    Regex::new(&format!(
        r"(?i)(?:{balance_word})\s*:?\s*([\d.,\s]+?)\s*(?:miles|meilen|millas|miglia|milhas|mijl(?:en)?)\s*[·•|,;-]?\s*([\d.,]+)\s*XP(?:\s*[·•|,;-]?\s*([\d.,]+)\s*UXP)?",
    ))
    .unwrap()
}

/// Export-date labels, tried in sequence; the captured tail is date-parsed.
pub static EXPORT_DATE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)exported on\s+(.+)$",
        r"(?i)statement date\s*:?\s+(.+)$",
        r"(?i)exporté le\s+(.+)$",
        r"(?i)date du relevé\s*:?\s+(.+)$",
        r"(?i)geëxporteerd op\s+(.+)$",
        r"(?i)exportiert am\s+(.+)$",
        r"(?i)stand vom\s+(.+)$",
        r"(?i)exportado el\s+(.+)$",
        r"(?i)esportato il\s+(.+)$",
        r"(?i)exportado em\s+(.+)$",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Member-number labels across languages, plus the label-free fallback.
pub static MEMBER_NUMBER_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:member(?:ship)? number|numéro de membre|lidmaatschapsnummer|mitgliedsnummer|número de socio|numero socio|número de associado)\s*:?\s*(\d{8,12})",
        r"\b(\d{10})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Per-language indicator keywords scored during language detection.
pub fn language_indicators(language: Language) -> &'static [&'static str] {
    match language {
        Language::En => &["statement", "balance", "earned", "flight", "miles expire"],
        Language::Fr => &["relevé", "solde", "gagnés", "vol", "cumulés"],
        Language::Nl => &["overzicht", "saldo", "verdiend", "vlucht", "behaald"],
        Language::De => &["übersicht", "meilenstand", "verdient", "flug", "kontostand"],
        Language::Es => &["extracto", "saldo", "ganadas", "vuelo", "acumuladas"],
        Language::It => &["estratto", "saldo", "guadagnate", "volo", "accumulate"],
        Language::Pt => &["extrato", "saldo", "ganhas", "voo", "acumuladas"],
    }
}

/// Domain keywords the validator counts before parsing starts.
pub const DOMAIN_KEYWORDS: &[&str] = &[
    "miles",
    "meilen",
    "millas",
    "miglia",
    "milhas",
    "mijl",
    "xp",
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
    "flight",
    "vol",
    "vlucht",
    "flug",
    "vuelo",
    "volo",
    "voo",
];
