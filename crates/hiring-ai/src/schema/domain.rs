use serde::{Deserialize, Serialize};

use super::Feature;

/// Display label paired with the code the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub code: i64,
    pub label: &'static str,
}

pub const GENDER_CHOICES: &[Choice] = &[
    Choice {
        code: 0,
        label: "Female",
    },
    Choice {
        code: 1,
        label: "Male",
    },
];

pub const EDUCATION_CHOICES: &[Choice] = &[
    Choice {
        code: 1,
        label: "High School",
    },
    Choice {
        code: 2,
        label: "Bachelor's",
    },
    Choice {
        code: 3,
        label: "Master's",
    },
    Choice {
        code: 4,
        label: "PhD",
    },
];

pub const STRATEGY_CHOICES: &[Choice] = &[
    Choice {
        code: 1,
        label: "Direct Application",
    },
    Choice {
        code: 2,
        label: "Referral",
    },
    Choice {
        code: 3,
        label: "Headhunter",
    },
];

/// Value shape of a feature as collected from a user or a dataset cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Any real number.
    Continuous,
    /// Whole number without a fixed code table.
    Count,
    /// Whole number drawn from a fixed code table.
    Choice(&'static [Choice]),
}

impl FieldKind {
    pub fn is_whole(&self) -> bool {
        !matches!(self, FieldKind::Continuous)
    }

    /// Whether a whole value converts to an `i64` code without saturating.
    pub fn fits_code(value: f64) -> bool {
        value >= i64::MIN as f64 && value < i64::MAX as f64
    }

    pub fn choices(&self) -> &'static [Choice] {
        match self {
            FieldKind::Choice(choices) => choices,
            _ => &[],
        }
    }

    pub fn label_for(&self, code: i64) -> Option<&'static str> {
        self.choices()
            .iter()
            .find(|choice| choice.code == code)
            .map(|choice| choice.label)
    }
}

/// Documented value range for a feature. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: Option<f64>,
}

impl Domain {
    pub const fn between(min: f64, max: f64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: f64) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }

    pub fn describe(&self) -> String {
        match self.max {
            Some(max) => format!("{}-{}", trim_number(self.min), trim_number(max)),
            None => format!(">= {}", trim_number(self.min)),
        }
    }
}

fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Whether front-ends hold values to the documented domains.
///
/// The trained model accepts any number, so `Permissive` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainPolicy {
    #[default]
    Permissive,
    Enforced,
}

/// A value that falls outside its feature's documented domain.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainViolation {
    pub feature: Feature,
    pub value: f64,
}

impl DomainViolation {
    pub fn expected(&self) -> String {
        let kind = self.feature.kind();
        if kind.choices().is_empty() {
            self.feature.domain().describe()
        } else {
            let codes: Vec<String> = kind
                .choices()
                .iter()
                .map(|choice| choice.code.to_string())
                .collect();
            format!("one of {}", codes.join(", "))
        }
    }
}

impl std::fmt::Display for DomainViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} must be {} (got {})",
            self.feature.label(),
            self.expected(),
            self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_bounds_are_inclusive() {
        let domain = Domain::between(20.0, 50.0);
        assert!(domain.contains(20.0));
        assert!(domain.contains(50.0));
        assert!(!domain.contains(19.5));
        assert!(!domain.contains(50.1));
        assert!(Domain::at_least(0.0).contains(1_000.0));
    }

    #[test]
    fn choice_lookup_maps_codes_to_labels() {
        let kind = FieldKind::Choice(EDUCATION_CHOICES);
        assert_eq!(kind.label_for(4), Some("PhD"));
        assert_eq!(kind.label_for(5), None);
        assert!(FieldKind::Continuous.choices().is_empty());
    }

    #[test]
    fn describes_open_and_closed_ranges() {
        assert_eq!(Domain::between(0.0, 100.0).describe(), "0-100");
        assert_eq!(Domain::at_least(0.0).describe(), ">= 0");
    }
}
