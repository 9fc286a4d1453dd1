//! Qualitative labels for momentum scores.
//!
//! | Score | Status | Label |
//! |-------|--------|-------|
//! | ≤ -50 | struggling | Struggling |
//! | -49 ..= -11 | struggling | Falling Behind |
//! | -10 ..= 10 | maintaining | Maintaining |
//! | 11 ..= 50 | excelling | Progressing |
//! | > 50 | excelling | Excelling |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse status tag derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumStatus {
    Struggling,
    Maintaining,
    Excelling,
}

impl MomentumStatus {
    pub fn from_score(score: i32) -> Self {
        if score < -10 {
            MomentumStatus::Struggling
        } else if score <= 10 {
            MomentumStatus::Maintaining
        } else {
            MomentumStatus::Excelling
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MomentumStatus::Struggling => "struggling",
            MomentumStatus::Maintaining => "maintaining",
            MomentumStatus::Excelling => "excelling",
        }
    }
}

impl fmt::Display for MomentumStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A score together with everything shown next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MomentumScore {
    pub value: i32,
    pub status: MomentumStatus,
}

impl MomentumScore {
    pub fn new(value: i32) -> Self {
        Self {
            value,
            status: MomentumStatus::from_score(value),
        }
    }

    /// Display text for the score.
    pub fn label(&self) -> &'static str {
        match self.value {
            v if v <= -50 => "Struggling",
            v if v < -10 => "Falling Behind",
            v if v <= 10 => "Maintaining",
            v if v <= 50 => "Progressing",
            _ => "Excelling",
        }
    }

    /// Progress-bar fill percentage, `(score + 100) / 2` clamped to 0..=100.
    pub fn progress_fill(&self) -> f64 {
        ((f64::from(self.value) + 100.0) / 2.0).clamp(0.0, 100.0)
    }
}

impl Default for MomentumScore {
    fn default() -> Self {
        Self::new(0)
    }
}

impl fmt::Display for MomentumScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+} ({})", self.value, self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_boundaries() {
        let cases = [
            (-100, "Struggling", MomentumStatus::Struggling),
            (-50, "Struggling", MomentumStatus::Struggling),
            (-49, "Falling Behind", MomentumStatus::Struggling),
            (-11, "Falling Behind", MomentumStatus::Struggling),
            (-10, "Maintaining", MomentumStatus::Maintaining),
            (0, "Maintaining", MomentumStatus::Maintaining),
            (10, "Maintaining", MomentumStatus::Maintaining),
            (11, "Progressing", MomentumStatus::Excelling),
            (50, "Progressing", MomentumStatus::Excelling),
            (51, "Excelling", MomentumStatus::Excelling),
            (100, "Excelling", MomentumStatus::Excelling),
        ];
        for (value, label, status) in cases {
            let score = MomentumScore::new(value);
            assert_eq!(score.label(), label, "label for {value}");
            assert_eq!(score.status, status, "status for {value}");
        }
    }

    #[test]
    fn progress_fill_maps_range_to_percent() {
        assert_eq!(MomentumScore::new(-100).progress_fill(), 0.0);
        assert_eq!(MomentumScore::new(0).progress_fill(), 50.0);
        assert_eq!(MomentumScore::new(100).progress_fill(), 100.0);
        assert_eq!(MomentumScore::new(17).progress_fill(), 58.5);
    }

    #[test]
    fn default_is_neutral() {
        let score = MomentumScore::default();
        assert_eq!(score.status, MomentumStatus::Maintaining);
        assert_eq!(score.to_string(), "+0 (Maintaining)");
    }
}
