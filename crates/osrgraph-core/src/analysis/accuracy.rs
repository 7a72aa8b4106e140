use std::fmt;

use serde::{Serialize, Serializer};

use crate::ReplayRecord;
use crate::diagnostics::Diagnostic;

const WEIGHT_300: u64 = 300;
const WEIGHT_100: u64 = 100;
const WEIGHT_50: u64 = 50;

/// Hit accuracy in `[0, 1]`, or `Undefined` when nothing was judged.
///
/// Serializes as a number; `Undefined` becomes `-1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Accuracy {
    Defined(f64),
    Undefined,
}

impl Accuracy {
    pub const UNDEFINED_SENTINEL: i64 = -1;

    pub fn value(self) -> Option<f64> {
        match self {
            Accuracy::Defined(value) => Some(value),
            Accuracy::Undefined => None,
        }
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accuracy::Defined(value) => write!(f, "{value}"),
            Accuracy::Undefined => write!(f, "{}", Self::UNDEFINED_SENTINEL),
        }
    }
}

impl Serialize for Accuracy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Accuracy::Defined(value) => serializer.serialize_f64(*value),
            Accuracy::Undefined => serializer.serialize_i64(Self::UNDEFINED_SENTINEL),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyOutcome {
    pub accuracy: Accuracy,
    pub diagnostic: Option<Diagnostic>,
}

/// Standard-mode accuracy from the hit counts alone.
///
/// Geki and katu counts are ignored; the weights are 300/100/50 against a
/// perfect 300 per object.
///
/// # Examples
/// ```
/// use osrgraph_core::{Accuracy, HitCounts, derive_accuracy_from_counts};
///
/// let counts = HitCounts { count_300: 1, count_100: 1, ..HitCounts::default() };
/// let outcome = derive_accuracy_from_counts(&counts);
/// assert_eq!(outcome.accuracy, Accuracy::Defined(400.0 / 600.0));
/// ```
pub fn derive_accuracy_from_counts(counts: &crate::HitCounts) -> AccuracyOutcome {
    let n300 = u64::from(counts.count_300);
    let n100 = u64::from(counts.count_100);
    let n50 = u64::from(counts.count_50);
    let nmiss = u64::from(counts.count_miss);

    let total = n300 + n100 + n50 + nmiss;
    if total == 0 {
        return AccuracyOutcome {
            accuracy: Accuracy::Undefined,
            diagnostic: Some(Diagnostic::UndefinedAccuracy),
        };
    }

    let earned = WEIGHT_300 * n300 + WEIGHT_100 * n100 + WEIGHT_50 * n50;
    let possible = WEIGHT_300 * total;
    AccuracyOutcome {
        accuracy: Accuracy::Defined(earned as f64 / possible as f64),
        diagnostic: None,
    }
}

pub fn derive_accuracy(record: &ReplayRecord) -> AccuracyOutcome {
    derive_accuracy_from_counts(&record.counts)
}
