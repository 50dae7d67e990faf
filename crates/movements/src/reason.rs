//! Reason codes attached to OUT movements.
//!
//! The seven predefined reasons form a fixed, versionless enumeration known at
//! compile time; free-text reasons are plain strings subject to the
//! length/non-blank constraint. There is no dynamic registration path.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Maximum length (in characters) of a free-text reason.
pub const MAX_REASON_LEN: usize = 100;

/// Predefined stock-out reason enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    Transferred,
    Given,
    Expired,
    Lost,
    Used,
    Damaged,
    Other,
}

impl ReasonCode {
    pub const ALL: [ReasonCode; 7] = [
        ReasonCode::Transferred,
        ReasonCode::Given,
        ReasonCode::Expired,
        ReasonCode::Lost,
        ReasonCode::Used,
        ReasonCode::Damaged,
        ReasonCode::Other,
    ];

    /// Canonical label, used as the literal grouping key in breakdowns.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReasonCode::Transferred => "TRANSFERRED",
            ReasonCode::Given => "GIVEN",
            ReasonCode::Expired => "EXPIRED",
            ReasonCode::Lost => "LOST",
            ReasonCode::Used => "USED",
            ReasonCode::Damaged => "DAMAGED",
            ReasonCode::Other => "OTHER",
        }
    }

    /// Case-sensitive exact match against the canonical labels.
    pub fn parse(s: &str) -> Option<ReasonCode> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl core::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason attached to an OUT movement: a predefined code, or free text when
/// no predefined code applies.
///
/// Serialized as the bare label string; predefined labels round-trip back to
/// `Predefined`. Grouping in breakdowns uses `label()`, so two distinct
/// free-text reasons never merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reason {
    Predefined(ReasonCode),
    Custom(String),
}

impl Reason {
    /// Literal grouping key.
    pub fn label(&self) -> &str {
        match self {
            Reason::Predefined(code) => code.as_str(),
            Reason::Custom(text) => text,
        }
    }

    pub fn is_predefined(&self) -> bool {
        matches!(self, Reason::Predefined(_))
    }

    /// Classify a raw string: predefined labels become `Predefined`,
    /// everything else `Custom`.
    pub fn from_label(label: impl Into<String>) -> Self {
        let label = label.into();
        match ReasonCode::parse(&label) {
            Some(code) => Reason::Predefined(code),
            None => Reason::Custom(label),
        }
    }
}

impl From<ReasonCode> for Reason {
    fn from(code: ReasonCode) -> Self {
        Reason::Predefined(code)
    }
}

impl core::fmt::Display for Reason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Reason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Reason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Reason::from_label(s))
    }
}

/// Is `text` acceptable as a reason at the data layer?
///
/// Any non-blank string of at most 100 characters passes; predefined labels
/// satisfy this rule too, so validation does not special-case the enumeration.
pub fn validate_reason(text: &str) -> bool {
    !text.trim().is_empty() && text.chars().count() <= MAX_REASON_LEN
}

/// Is `code` one of the seven predefined labels (case-sensitive)?
///
/// Free text is valid `Reason` input at the data layer but fails this check;
/// callers choose which rule applies to their use case.
pub fn validate_reason_type(code: &str) -> bool {
    ReasonCode::parse(code).is_some()
}
