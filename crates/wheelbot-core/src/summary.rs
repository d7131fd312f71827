use serde::Serialize;

use crate::advice::{advisory, checklist};
use crate::facets::Facet;
use crate::scoring::{average, band, weakest, Band, ResponseSet};

/// Facets listed in the "weakest areas" block
const WEAKEST_COUNT: usize = 3;

/// Everything the user gets back as text once the survey is complete.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub average: f64,
    pub band: Band,
    /// Weakest facets with their scores, lowest first
    pub weakest: Vec<(Facet, u8)>,
    pub advisory: String,
    pub checklist: Vec<String>,
}

impl Summary {
    pub fn build(responses: &ResponseSet) -> Self {
        let avg = average(responses);
        Self {
            average: avg,
            band: band(avg),
            weakest: weakest(responses, WEAKEST_COUNT)
                .into_iter()
                .map(|f| (f, responses.get(f)))
                .collect(),
            advisory: advisory(avg, responses),
            checklist: checklist(responses, WEAKEST_COUNT),
        }
    }

    pub fn weakest_lines(&self) -> Vec<String> {
        self.weakest
            .iter()
            .map(|(facet, score)| format!("- {} → {}", facet.title(), score))
            .collect()
    }

    /// Plain-text completion message
    pub fn to_text(&self) -> String {
        format!(
            "Done!\n\n\
             Average score: {:.2} / 5\n\
             Interpretation: {}\n\n\
             Three weakest areas:\n{}\n\n\
             {}\n\n\
             Checklist for the week:\n{}",
            self.average,
            self.band.label(),
            self.weakest_lines().join("\n"),
            self.advisory,
            self.checklist.join("\n"),
        )
    }
}
