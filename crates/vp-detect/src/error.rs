use std::fmt;

use serde::{Deserialize, Serialize};

/// Which sampled direction a failure belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStage {
    First,
    Second,
}

impl fmt::Display for SearchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStage::First => f.write_str("first"),
            SearchStage::Second => f.write_str("second"),
        }
    }
}

/// Errors returned by the vanishing point detector.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VpDetectError {
    #[error("insufficient lines for the {stage} direction ({available} usable, need 2)")]
    InsufficientLines { stage: SearchStage, available: usize },

    #[error("no non-degenerate sample for the {stage} direction after {draws} draws")]
    DegenerateInput { stage: SearchStage, draws: usize },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),
}
