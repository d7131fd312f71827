//! Advisory text and the weekly checklist.
//!
//! Tips come from [`ADVICE_RULES`], walked in priority order. That order is
//! independent of the weakest-facet ranking, which only drives the checklist.

use crate::facets::Facet;
use crate::scoring::{band, weakest, Band, ResponseSet};

/// Upper bound on tips appended to the advisory paragraph
pub const MAX_TIPS: usize = 3;

/// Closing line of every checklist
pub const CLOSING_REMINDER: &str = "— Set up autopay/reminders to keep the rhythm.";

const TIPS_HEADING: &str = "What will help right now:";

/// Checklist lines besides the closing reminder
const MAX_CHECKLIST_ITEMS: usize = 3;

/// A facet-specific tip, triggered when any listed facet scores at or
/// below `threshold`.
#[derive(Debug, Clone, Copy)]
pub struct AdviceRule {
    pub facets: &'static [Facet],
    pub threshold: u8,
    pub tip: &'static str,
}

impl AdviceRule {
    pub fn triggered(&self, responses: &ResponseSet) -> bool {
        self.facets
            .iter()
            .any(|&f| responses.get(f) <= self.threshold)
    }
}

/// Rule table in priority order.
pub const ADVICE_RULES: &[AdviceRule] = &[
    AdviceRule {
        facets: &[Facet::EmergencyFund],
        threshold: 2,
        tip: "Cushion: aim for 1–2 monthly incomes, move a fixed % right after payday.",
    },
    AdviceRule {
        facets: &[Facet::Pension],
        threshold: 2,
        tip: "Pension: a 3–5% autopayment to a long-term account lets compound interest work.",
    },
    AdviceRule {
        facets: &[Facet::Debts],
        threshold: 2,
        tip: "Debts: keep a register, choose snowball or avalanche, fix the monthly payment.",
    },
    AdviceRule {
        facets: &[Facet::SmallReserves],
        threshold: 2,
        tip: "Small reserves: a separate pocket for unexpected spending.",
    },
    AdviceRule {
        facets: &[Facet::Lifestyle],
        threshold: 2,
        tip: "Lifestyle: plan treats within a limit, it is easier to stay on course.",
    },
    AdviceRule {
        facets: &[Facet::MidTermGoals, Facet::ShortTermGoals],
        threshold: 2,
        tip: "Goals: split them into 3–6–12 months and set up automatic transfers.",
    },
];

fn band_message(band: Band) -> &'static str {
    match band {
        Band::Critical => {
            "A normal start: focus on the basics. Minimal extra spending, \
             a simple tracking sheet and a small cushion."
        }
        Band::Low => {
            "There is quick room for growth. Pick 1–2 steps for the week \
             (for example, move 5% of income to a reserve right away)."
        }
        Band::Middle => {
            "The base is already there. Add structure: automatic transfers to goals \
             and control over leaks."
        }
        Band::Good => {
            "A great foundation! Think about diversification and protection \
             (insurance, tax-advantaged accounts, taxes)."
        }
        Band::Excellent => {
            "Very cool! Polish the details: portfolio tuning, automatic top-ups, \
             a quarterly financial check-up."
        }
    }
}

/// Every triggered tip, in rule priority order
pub fn tips(responses: &ResponseSet) -> Vec<&'static str> {
    ADVICE_RULES
        .iter()
        .filter(|rule| rule.triggered(responses))
        .map(|rule| rule.tip)
        .collect()
}

/// Band paragraph followed by at most [`MAX_TIPS`] bulleted tips.
pub fn advisory(avg: f64, responses: &ResponseSet) -> String {
    let mut msg = band_message(band(avg)).to_string();
    let tips = tips(responses);
    if !tips.is_empty() {
        msg.push_str("\n\n");
        msg.push_str(TIPS_HEADING);
        for tip in tips.iter().take(MAX_TIPS) {
            msg.push_str("\n• ");
            msg.push_str(tip);
        }
    }
    msg
}

/// One action line per weakest facet (at most three), then [`CLOSING_REMINDER`].
pub fn checklist(responses: &ResponseSet, k: usize) -> Vec<String> {
    let mut items: Vec<String> = weakest(responses, k.min(MAX_CHECKLIST_ITEMS))
        .into_iter()
        .map(|f| format!("— {}: {}", f.title(), f.checklist_action()))
        .collect();
    items.push(CLOSING_REMINDER.to_string());
    items
}
