use std::fmt;
use std::str::FromStr;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

use super::field::UnknownName;

/// The declared type of a rule. Selects the grammar entry point and the
/// structural constraints the expression must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RuleCategory {
    /// A single comparison, e.g. `AMOUNT > 1000`.
    Threshold,
    /// An aggregate compared against a literal, e.g. `COUNT(AMOUNT) > 5`.
    Pattern,
    /// Comparisons combined with AND / OR / NOT.
    Composite,
}

impl RuleCategory {
    pub const ALL: [RuleCategory; 3] = [
        RuleCategory::Threshold,
        RuleCategory::Pattern,
        RuleCategory::Composite,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RuleCategory::Threshold => "THRESHOLD",
            RuleCategory::Pattern => "PATTERN",
            RuleCategory::Composite => "COMPOSITE",
        }
    }

    /// A valid expression for this category, used in error messages.
    #[must_use]
    pub const fn example(self) -> &'static str {
        match self {
            RuleCategory::Threshold => "AMOUNT > 1000",
            RuleCategory::Pattern => "COUNT(AMOUNT) > 5",
            RuleCategory::Composite => "AMOUNT > 100 AND TIME = 'night'",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleCategory {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        RuleCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == upper)
            .ok_or_else(|| UnknownName(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_category() {
        assert_eq!("threshold".parse(), Ok(RuleCategory::Threshold));
        assert_eq!(" PATTERN ".parse(), Ok(RuleCategory::Pattern));
        assert_eq!("Composite".parse(), Ok(RuleCategory::Composite));
        assert!("ML".parse::<RuleCategory>().is_err());
    }

    #[test]
    fn display() {
        assert_eq!(RuleCategory::Pattern.to_string(), "PATTERN");
    }
}
