use std::fmt;

use crate::error::EnergyError;

/// Priority a recommendation is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Numeric weight used for ranking.
    pub fn score(self) -> f64 {
        match self {
            Self::High => 1.0,
            Self::Medium => 0.5,
            Self::Low => 0.25,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        };
        f.write_str(label)
    }
}

/// Expected effect of applying a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    /// Numeric weight used for ranking.
    pub fn score(self) -> f64 {
        match self {
            Self::High => 1.0,
            Self::Medium => 0.5,
            Self::Low => 0.25,
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        };
        f.write_str(label)
    }
}

/// An immutable, data-only optimization recommendation.
///
/// The advisor producing these lives in the presentation layer; the core
/// only defines the validated record it hands around.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    title: String,
    description: String,
    priority: Priority,
    impact: Impact,
    estimated_savings: f64,
    category: String,
}

impl Recommendation {
    /// Fallback category when none is given.
    pub const DEFAULT_CATEGORY: &str = "GENERAL";

    /// Creates a validated recommendation.
    ///
    /// A negative estimated saving is clamped to zero and an empty
    /// category falls back to [`DEFAULT_CATEGORY`](Self::DEFAULT_CATEGORY).
    ///
    /// # Errors
    ///
    /// Returns [`EnergyError::InvalidParameter`] for an empty title or
    /// description.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        impact: Impact,
        estimated_savings: f64,
        category: impl Into<String>,
    ) -> Result<Self, EnergyError> {
        let title = title.into();
        if title.is_empty() {
            return Err(EnergyError::InvalidParameter(
                "recommendation title must not be empty".to_string(),
            ));
        }
        let description = description.into();
        if description.is_empty() {
            return Err(EnergyError::InvalidParameter(
                "recommendation description must not be empty".to_string(),
            ));
        }
        let category = category.into();
        Ok(Self {
            title,
            description,
            priority,
            impact,
            estimated_savings: estimated_savings.max(0.0),
            category: if category.is_empty() {
                Self::DEFAULT_CATEGORY.to_string()
            } else {
                category
            },
        })
    }

    /// Short headline.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Full description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Assigned priority.
    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Expected impact.
    pub fn impact(&self) -> Impact {
        self.impact
    }

    /// Estimated savings, never negative.
    pub fn estimated_savings(&self) -> f64 {
        self.estimated_savings
    }

    /// Grouping category.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Mean of the priority and impact weights.
    pub fn overall_score(&self) -> f64 {
        (self.priority.score() + self.impact.score()) / 2.0
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - impact: {} | savings: {:.2} kWh",
            self.priority, self.title, self.impact, self.estimated_savings
        )
    }
}
