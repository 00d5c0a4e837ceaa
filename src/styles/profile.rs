use serde::{Deserialize, Serialize};

use crate::error::StyleError;

/// Raw style definition as written in settings files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StyleConfig {
    pub multipliers: Vec<u32>,
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
}

/// Allowed beat multipliers for a style and how likely each one is.
///
/// Multipliers are kept sorted ascending. Weights, when present, line up
/// with the multipliers and sum to one.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditingStyleProfile {
    multipliers: Vec<u32>,
    weights: Option<Vec<f64>>,
}

impl EditingStyleProfile {
    pub fn new(multipliers: Vec<u32>, weights: Option<Vec<f64>>) -> Result<Self, StyleError> {
        if multipliers.is_empty() {
            return Err(StyleError::NoMultipliers);
        }
        if multipliers.contains(&0) {
            return Err(StyleError::ZeroMultiplier);
        }

        // An empty weight vector means "uniform"
        let weights = weights.filter(|w| !w.is_empty());

        let Some(weights) = weights else {
            let mut multipliers = multipliers;
            multipliers.sort_unstable();
            return Ok(Self {
                multipliers,
                weights: None,
            });
        };

        if weights.len() != multipliers.len() {
            return Err(StyleError::WeightLength {
                expected: multipliers.len(),
                actual: weights.len(),
            });
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(StyleError::InvalidWeight);
        }

        let mut pairs: Vec<(u32, f64)> = multipliers.into_iter().zip(weights).collect();
        pairs.sort_by_key(|(multiplier, _)| *multiplier);

        let sum: f64 = pairs.iter().map(|(_, w)| w).sum();
        let (multipliers, weights): (Vec<u32>, Vec<f64>) = pairs.into_iter().unzip();
        let weights = if sum > 0.0 {
            Some(weights.into_iter().map(|w| w / sum).collect())
        } else {
            None
        };

        Ok(Self {
            multipliers,
            weights,
        })
    }

    /// Build from a trusted table: sorted, non-zero multipliers and
    /// matching non-negative weights.
    pub(crate) fn from_table(multipliers: &[u32], weights: &[f64]) -> Self {
        let sum: f64 = weights.iter().sum();
        Self {
            multipliers: multipliers.to_vec(),
            weights: Some(weights.iter().map(|w| w / sum).collect()),
        }
    }

    pub fn uniform(multipliers: Vec<u32>) -> Result<Self, StyleError> {
        Self::new(multipliers, None)
    }

    pub fn multipliers(&self) -> &[u32] {
        &self.multipliers
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Smallest configured multiplier, used when nothing else fits.
    pub fn smallest_multiplier(&self) -> u32 {
        self.multipliers.first().copied().unwrap_or(1)
    }
}

impl TryFrom<StyleConfig> for EditingStyleProfile {
    type Error = StyleError;

    fn try_from(config: StyleConfig) -> Result<Self, Self::Error> {
        Self::new(config.multipliers, config.weights)
    }
}
