use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Normalized identifier for a carrier.
///
/// Derived from the carrier's display name by trimming surrounding
/// whitespace and lowercasing, so `" UPS "` and `"ups"` map to the same code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CarrierCode(String);

impl CarrierCode {
    /// Derives a carrier code from a display name.
    pub fn from_name(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the normalized code is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CarrierCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CarrierCode {
    fn from(s: &str) -> Self {
        Self::from_name(s)
    }
}

impl AsRef<str> for CarrierCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Shipment urgency, from 1 (top priority) to 5 (least priority).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(1);
    pub const LOWEST: Priority = Priority(5);

    /// Creates a priority, returning `None` outside of `1..=5`.
    pub fn new(value: i64) -> Option<Self> {
        (1..=5).contains(&value).then(|| Self(value as u8))
    }

    /// Returns the numeric priority.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Priority {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("priority must be between 1 and 5, got {value}"))
    }
}

impl From<Priority> for i64 {
    fn from(priority: Priority) -> Self {
        i64::from(priority.0)
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Package size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxType {
    Small,
    Medium,
    Big,
}

impl BoxType {
    /// All accepted box types, smallest first.
    pub const ALL: [BoxType; 3] = [BoxType::Small, BoxType::Medium, BoxType::Big];

    /// Returns the wire name of the box type.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoxType::Small => "small",
            BoxType::Medium => "medium",
            BoxType::Big => "big",
        }
    }
}

impl FromStr for BoxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BoxType::ALL
            .into_iter()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| format!("unknown box type: {s}"))
    }
}

impl std::fmt::Display for BoxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrier_code_is_trimmed_and_lowercased() {
        assert_eq!(CarrierCode::from_name("  FedEx ").as_str(), "fedex");
        assert_eq!(CarrierCode::from_name("UPS"), CarrierCode::from_name("ups "));
    }

    #[test]
    fn carrier_code_serializes_as_plain_string() {
        let json = serde_json::to_string(&CarrierCode::from_name("UPS")).unwrap();
        assert_eq!(json, "\"ups\"");
    }

    #[test]
    fn priority_accepts_only_one_to_five() {
        assert!(Priority::new(0).is_none());
        assert_eq!(Priority::new(1), Some(Priority::HIGHEST));
        assert_eq!(Priority::new(5), Some(Priority::LOWEST));
        assert!(Priority::new(6).is_none());
        assert!(Priority::new(-1).is_none());
    }

    #[test]
    fn priority_rejects_out_of_range_json() {
        assert!(serde_json::from_str::<Priority>("7").is_err());
        assert_eq!(serde_json::from_str::<Priority>("3").unwrap().value(), 3);
    }

    #[test]
    fn box_type_parses_wire_names() {
        assert_eq!("medium".parse::<BoxType>().unwrap(), BoxType::Medium);
        assert!("huge".parse::<BoxType>().is_err());
        assert!("Medium".parse::<BoxType>().is_err());
        assert_eq!(serde_json::to_string(&BoxType::Big).unwrap(), "\"big\"");
    }
}
