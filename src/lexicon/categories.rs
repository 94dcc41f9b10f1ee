//! Category keyword table.
//!
//! One entry per transaction category, in classification priority order.
//! Patterns are lowercase substrings covering all seven statement languages;
//! matching is case-insensitive on the caller's side.

use crate::models::TransactionCategory;

pub struct CategoryPatterns {
    pub category: TransactionCategory,
    pub patterns: &'static [&'static str],
}

/// Priority-ordered classification table. First category with any matching
/// pattern wins; order is the tie-break, not pattern specificity.
pub const CATEGORY_TABLE: &[CategoryPatterns] = &[
    CategoryPatterns {
        category: TransactionCategory::FlightEarning,
        patterns: &[
            "earned on flight",
            "miles earned on your flight",
            "sur votre vol",
            "gagnés sur le vol",
            "op uw vlucht",
            "verdiend op vlucht",
            "auf ihrem flug",
            "flugmeilen",
            "en su vuelo",
            "millas de vuelo",
            "sul suo volo",
            "miglia di volo",
            "no seu voo",
            "milhas de voo",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::FlightPartner,
        patterns: &[
            "partner flight",
            "partner airline",
            "vol partenaire",
            "compagnie partenaire",
            "partnervlucht",
            "partnerflug",
            "partnerairline",
            "vuelo de socio",
            "aerolínea asociada",
            "volo partner",
            "compagnia partner",
            "voo parceiro",
            "companhia parceira",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::TransaviaFlight,
        patterns: &["transavia"],
    },
    CategoryPatterns {
        category: TransactionCategory::AwardRedemption,
        patterns: &[
            "award ticket",
            "reward ticket",
            "billet prime",
            "award-ticket",
            "prämienticket",
            "billete de premio",
            "biglietto premio",
            "bilhete prêmio",
            "bilhete premio",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::Upgrade,
        patterns: &[
            "upgrade",
            "surclassement",
            "mejora de cabina",
            "passaggio di classe",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::Subscription,
        patterns: &[
            "subscription",
            "abonnement",
            "suscripción",
            "suscripcion",
            "abbonamento",
            "assinatura",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::CardSpend,
        patterns: &[
            "card purchase",
            "credit card",
            "american express",
            "amex",
            "carte de crédit",
            "achats par carte",
            "creditcard",
            "kreditkarte",
            "kartenumsatz",
            "tarjeta de crédito",
            "compras con tarjeta",
            "carta di credito",
            "cartão de crédito",
            "cartao de credito",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::CardBonus,
        patterns: &[
            "welcome bonus",
            "anniversary bonus",
            "annual bonus",
            "prime de bienvenue",
            "welkomstbonus",
            "jubileumbonus",
            "willkommensbonus",
            "jahresbonus",
            "bono de bienvenida",
            "bonus di benvenuto",
            "bônus de boas-vindas",
            "bonus de boas-vindas",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::TransferIn,
        patterns: &[
            "transfer from",
            "points transferred in",
            "transfert depuis",
            "overdracht van",
            "übertragung von",
            "transferencia desde",
            "trasferimento da",
            "transferência de",
            "transferencia de",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::TransferOut,
        patterns: &[
            "transfer to",
            "points transferred out",
            "transfert vers",
            "overdracht naar",
            "übertragung an",
            "transferencia a ",
            "trasferimento a ",
            "transferência para",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::Hotel,
        patterns: &["hotel", "hôtel", "accor", "marriott", "hilton"],
    },
    CategoryPatterns {
        category: TransactionCategory::Shopping,
        patterns: &[
            "shopping",
            "online mall",
            "boutique",
            "winkelen",
            "einkaufen",
            "compras",
            "acquisti",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::CarRental,
        patterns: &[
            "car rental",
            "location de voiture",
            "autohuur",
            "mietwagen",
            "alquiler de coche",
            "autonoleggio",
            "aluguel de carro",
            "hertz",
            "sixt",
            "avis budget",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::Taxi,
        patterns: &["taxi", "táxi", "uber"],
    },
    CategoryPatterns {
        category: TransactionCategory::XpCounterReset,
        patterns: &[
            "xp counter reset",
            "xp counter deduction",
            "uxp counter reset",
            "status reached",
            "compteur xp remis à zéro",
            "remise à zéro du compteur",
            "statut atteint",
            "xp-teller gereset",
            "xp-teller op nul",
            "status bereikt",
            "xp-zähler zurückgesetzt",
            "status erreicht",
            "contador de xp reiniciado",
            "nivel alcanzado",
            "contatore xp azzerato",
            "status raggiunto",
            "contador de xp zerado",
            "status atingido",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::XpSurplus,
        patterns: &[
            "xp surplus",
            "uxp surplus",
            "carried over",
            "surplus xp",
            "xp reporté",
            "xp-overschot",
            "overgedragen",
            "xp-überschuss",
            "übertragen",
            "excedente de xp",
            "eccedenza xp",
            "excedente de uxp",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::Donation,
        patterns: &[
            "donation",
            "don de miles",
            "donatie",
            "spende",
            "donación",
            "donacion",
            "donazione",
            "doação",
            "doacao",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::Adjustment,
        patterns: &[
            "adjustment",
            "correction",
            "ajustement",
            "correctie",
            "korrektur",
            "ajuste",
            "rettifica",
            "regularização",
            "regularizacao",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::Partner,
        patterns: &[
            "partner",
            "partenaire",
            "socio",
            "parceiro",
            "parceria",
        ],
    },
    CategoryPatterns {
        category: TransactionCategory::Other,
        patterns: &[],
    },
];
