use serde::{Deserialize, Serialize};

/// Number of facets scored in every survey
pub const FACET_COUNT: usize = 8;

/// Highest score a facet can receive
pub const MAX_SCORE: u8 = 5;

/// One of the eight financial-wellbeing dimensions, in question order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    MidTermGoals,
    Pension,
    EmergencyFund,
    ShortTermGoals,
    SmallReserves,
    Debts,
    Lifestyle,
    Confidence,
}

impl Facet {
    /// All facets in declaration order. Index `i` here is question `i + 1`.
    pub const ALL: [Facet; FACET_COUNT] = [
        Facet::MidTermGoals,
        Facet::Pension,
        Facet::EmergencyFund,
        Facet::ShortTermGoals,
        Facet::SmallReserves,
        Facet::Debts,
        Facet::Lifestyle,
        Facet::Confidence,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Facet> {
        Self::ALL.get(index).copied()
    }

    /// Short title used in listings and as the chart label
    pub fn title(self) -> &'static str {
        match self {
            Facet::MidTermGoals => "Mid-term goals",
            Facet::Pension => "Pension",
            Facet::EmergencyFund => "Cushion",
            Facet::ShortTermGoals => "Short goals",
            Facet::SmallReserves => "Small reserves",
            Facet::Debts => "Debts",
            Facet::Lifestyle => "Lifestyle",
            Facet::Confidence => "Confidence",
        }
    }

    /// The question asked for this facet
    pub fn question(self) -> &'static str {
        match self {
            Facet::MidTermGoals => "1) Is there enough for your mid-term goals? (0–5)",
            Facet::Pension => "2) Are you taking care of your future pension? (0–5)",
            Facet::EmergencyFund => "3) Do you have a safety cushion? (0–5)",
            Facet::ShortTermGoals => "4) Do you have small goals (within a year)? (0–5)",
            Facet::SmallReserves => "5) Do you keep a reserve for small expenses? (0–5)",
            Facet::Debts => "6) Are you free of debt (besides a mortgage)? (0–5)",
            Facet::Lifestyle => "7) Is there enough for lifestyle (pleasures, way of life)? (0–5)",
            Facet::Confidence => "8) Overall confidence in your financial situation? (0–5)",
        }
    }

    /// One concrete action for the weekly checklist
    pub fn checklist_action(self) -> &'static str {
        match self {
            Facet::MidTermGoals => "Define 1–2 goals for 6–18 months and set up an autopayment.",
            Facet::Pension => "Set up a 3–5% autopayment to a long-term account.",
            Facet::EmergencyFund => "Open a separate account for the cushion.",
            Facet::ShortTermGoals => "Formulate a goal for 3–6 months and break it into steps.",
            Facet::SmallReserves => "Create a pocket for small unexpected expenses.",
            Facet::Debts => "List your debts and pick the snowball or avalanche method.",
            Facet::Lifestyle => "Plan 1–2 treats within a fixed limit.",
            Facet::Confidence => "Take one small step today that raises your confidence.",
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Chart labels, positionally aligned with response indices
pub fn chart_labels() -> Vec<String> {
    Facet::ALL.iter().map(|f| f.title().to_string()).collect()
}
