use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Costs closer than this compare as equal.
pub const SAMENESS_THRESHOLD: f64 = 1e-9;

/// Scalar edge/path cost.
///
/// `Eq`, `Ord` and `Hash` are exact (IEEE total order) so weights can be part
/// of an edge's identity. Search code ranks costs with [`ScalarWeight::compare`],
/// which treats values within [`SAMENESS_THRESHOLD`] as ties.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScalarWeight(f64);

impl ScalarWeight {
    pub const ZERO: ScalarWeight = ScalarWeight(0.0);
    pub const ONE: ScalarWeight = ScalarWeight(1.0);
    pub const NON_VIABLE: ScalarWeight = ScalarWeight(f64::INFINITY);

    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn merge(self, other: ScalarWeight) -> ScalarWeight {
        if !self.is_viable() || !other.is_viable() {
            return Self::NON_VIABLE;
        }
        ScalarWeight(self.0 + other.0)
    }

    pub fn subtract(self, other: ScalarWeight) -> ScalarWeight {
        ScalarWeight(self.0 - other.0)
    }

    pub fn is_viable(self) -> bool {
        !(self.0.is_nan() || self.0 == f64::INFINITY)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0.0
    }

    pub fn compare(self, other: ScalarWeight) -> Ordering {
        if self.same_as(other) {
            return Ordering::Equal;
        }
        self.0.total_cmp(&other.0)
    }

    pub fn same_as(self, other: ScalarWeight) -> bool {
        if !self.is_viable() || !other.is_viable() {
            return self.is_viable() == other.is_viable();
        }
        (self.0 - other.0).abs() <= SAMENESS_THRESHOLD
    }
}

impl Default for ScalarWeight {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for ScalarWeight {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl PartialEq for ScalarWeight {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for ScalarWeight {}

impl PartialOrd for ScalarWeight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScalarWeight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for ScalarWeight {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for ScalarWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
