// Probe Level Domain Model

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Intensity tier requested of a probe
///
/// Ordered: `Basic < Extended < Thorough`. Higher levels run the checks of the
/// lower levels plus more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProbeLevel {
    /// Lightweight check, just enough to see the system is up
    Basic,
    /// Heavier check, exercises more of the system
    Extended,
    /// Returns extra diagnostic values about the system
    Thorough,
}

impl ProbeLevel {
    pub const ALL: [ProbeLevel; 3] = [ProbeLevel::Basic, ProbeLevel::Extended, ProbeLevel::Thorough];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeLevel::Basic => "BASIC",
            ProbeLevel::Extended => "EXTENDED",
            ProbeLevel::Thorough => "THOROUGH",
        }
    }

    /// Lenient parsing for request parameters
    ///
    /// Accepts a level name (any case) or a number from 1 to 3 where 1 is Basic and
    /// 3 is Thorough. Missing, empty or unknown input falls back to `default`.
    ///
    /// # Example
    /// ```text
    /// assert_eq!(ProbeLevel::parse_or(Some("2"), ProbeLevel::Basic), ProbeLevel::Extended);
    /// assert_eq!(ProbeLevel::parse_or(Some("bogus"), ProbeLevel::Basic), ProbeLevel::Basic);
    /// ```
    pub fn parse_or(input: Option<&str>, default: ProbeLevel) -> ProbeLevel {
        match input.map(str::trim) {
            None | Some("") => default,
            Some(raw) => raw.parse().unwrap_or(default),
        }
    }
}

impl FromStr for ProbeLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1" | "BASIC" => Ok(ProbeLevel::Basic),
            "2" | "EXTENDED" => Ok(ProbeLevel::Extended),
            "3" | "THOROUGH" => Ok(ProbeLevel::Thorough),
            _ => Err(DomainError::InvalidLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProbeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(ProbeLevel::Basic < ProbeLevel::Extended);
        assert!(ProbeLevel::Extended < ProbeLevel::Thorough);
        assert_eq!(ProbeLevel::ALL.iter().max(), Some(&ProbeLevel::Thorough));
    }

    #[test]
    fn test_parse_numeric_and_named() {
        assert_eq!("1".parse::<ProbeLevel>().unwrap(), ProbeLevel::Basic);
        assert_eq!("3".parse::<ProbeLevel>().unwrap(), ProbeLevel::Thorough);
        assert_eq!("extended".parse::<ProbeLevel>().unwrap(), ProbeLevel::Extended);
        assert_eq!("THOROUGH".parse::<ProbeLevel>().unwrap(), ProbeLevel::Thorough);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!("0".parse::<ProbeLevel>().is_err());
        assert!("4".parse::<ProbeLevel>().is_err());
        assert!("deep".parse::<ProbeLevel>().is_err());
    }

    #[test]
    fn test_parse_or_falls_back_to_default() {
        let default = ProbeLevel::Extended;
        assert_eq!(ProbeLevel::parse_or(None, default), default);
        assert_eq!(ProbeLevel::parse_or(Some(""), default), default);
        assert_eq!(ProbeLevel::parse_or(Some("nonsense"), default), default);
        assert_eq!(ProbeLevel::parse_or(Some("1"), default), ProbeLevel::Basic);
    }
}
