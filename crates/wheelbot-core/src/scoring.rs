use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::facets::{Facet, FACET_COUNT, MAX_SCORE};

/// A completed assessment: one score in `0..=5` per facet, in facet order.
///
/// Construction is the only place length and range are checked, so every
/// scoring function below is infallible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct ResponseSet([u8; FACET_COUNT]);

impl ResponseSet {
    pub fn new(values: [u8; FACET_COUNT]) -> Result<Self, ScoreError> {
        for (index, &value) in values.iter().enumerate() {
            if value > MAX_SCORE {
                return Err(ScoreError::OutOfRange {
                    index,
                    value,
                    max: MAX_SCORE,
                });
            }
        }
        Ok(Self(values))
    }

    /// Build from a slice, rejecting anything but exactly eight values.
    pub fn from_slice(values: &[u8]) -> Result<Self, ScoreError> {
        let array: [u8; FACET_COUNT] =
            values.try_into().map_err(|_| ScoreError::WrongLength {
                expected: FACET_COUNT,
                got: values.len(),
            })?;
        Self::new(array)
    }

    pub fn get(&self, facet: Facet) -> u8 {
        self.0[facet.index()]
    }

    pub fn values(&self) -> &[u8; FACET_COUNT] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Facet, u8)> + '_ {
        Facet::ALL.iter().map(move |&f| (f, self.get(f)))
    }
}

impl TryFrom<Vec<u8>> for ResponseSet {
    type Error = ScoreError;

    fn try_from(values: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

impl From<ResponseSet> for Vec<u8> {
    fn from(set: ResponseSet) -> Self {
        set.0.to_vec()
    }
}

/// Arithmetic mean of the eight scores
pub fn average(responses: &ResponseSet) -> f64 {
    let total: u32 = responses.0.iter().map(|&v| u32::from(v)).sum();
    f64::from(total) / FACET_COUNT as f64
}

/// Qualitative bucket for an average score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Critical,
    Low,
    Middle,
    Good,
    Excellent,
}

impl Band {
    pub const ALL: [Band; 5] = [
        Band::Critical,
        Band::Low,
        Band::Middle,
        Band::Good,
        Band::Excellent,
    ];

    /// Half-open intervals `[lower, upper)` on the half points.
    pub fn from_average(avg: f64) -> Band {
        if avg < 1.5 {
            Band::Critical
        } else if avg < 2.5 {
            Band::Low
        } else if avg < 3.5 {
            Band::Middle
        } else if avg < 4.5 {
            Band::Good
        } else {
            Band::Excellent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Band::Critical => "Critical state",
            Band::Low => "Lower level",
            Band::Middle => "Middle level",
            Band::Good => "Good level",
            Band::Excellent => "Excellent level",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

pub fn band(avg: f64) -> Band {
    Band::from_average(avg)
}

/// The `k` lowest-scoring facets, ascending by score. Equal scores keep
/// facet declaration order.
pub fn weakest(responses: &ResponseSet, k: usize) -> Vec<Facet> {
    let mut ranked: Vec<Facet> = Facet::ALL.to_vec();
    // sort_by_key is stable
    ranked.sort_by_key(|&f| responses.get(f));
    ranked.truncate(k);
    ranked
}
