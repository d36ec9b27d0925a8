use serde::{Deserialize, Serialize};
use std::fmt;

use crate::issues::Severity;

/// Totals per severity level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityTally {
    pub ok: u64,
    pub info: u64,
    pub warn: u64,
    pub error: u64,
}

impl SeverityTally {
    pub fn add(&mut self, severity: Severity, count: u64) {
        let slot = match severity {
            Severity::Ok => &mut self.ok,
            Severity::Info => &mut self.info,
            Severity::Warn => &mut self.warn,
            Severity::Error => &mut self.error,
        };
        *slot = slot.saturating_add(count);
    }

    pub fn get(&self, severity: Severity) -> u64 {
        match severity {
            Severity::Ok => self.ok,
            Severity::Info => self.info,
            Severity::Warn => self.warn,
            Severity::Error => self.error,
        }
    }

    pub fn merge(&mut self, other: &SeverityTally) {
        for severity in Severity::ALL {
            self.add(severity, other.get(severity));
        }
    }

    pub fn total(&self) -> u64 {
        Severity::ALL
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(self.get(*s)))
    }

    /// Health score from 0 to 100. Ok and info count fully, warnings count
    /// half, errors count nothing. An empty tally scores 100.
    pub fn score(&self) -> u8 {
        let total = u128::from(self.total());
        if total == 0 {
            return 100;
        }
        let healthy = u128::from(self.ok) + u128::from(self.info);
        let points = healthy * 100 + u128::from(self.warn) * 50;
        // Bounded by 100 since every term is at most its share of total.
        u8::try_from(points / total).unwrap_or(100)
    }

    pub fn grade(&self) -> Grade {
        Grade::from_score(self.score())
    }
}

/// Letter grade for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            50..=59 => Grade::E,
            _ => Grade::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
