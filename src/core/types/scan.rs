//! Scan request/response types shared between sessions and the transport

use super::value::ValueType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// First-scan strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindMode {
    /// Match the encoded pattern exactly
    #[default]
    Exact,
    /// Enumerate every aligned address of the type, no value constraint
    Unknown,
}

impl FindMode {
    /// Whether this mode needs a non-empty scan value
    pub const fn requires_pattern(&self) -> bool {
        matches!(self, FindMode::Exact)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            FindMode::Exact => "exact",
            FindMode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FindMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrowing comparison applied to a prior result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    Exact,
    Changed,
    Unchanged,
    Increased,
    Decreased,
}

impl FilterMode {
    /// Whether this mode compares against an explicit scan value.
    /// The relative modes compare a result's stored value against its
    /// current live value and carry no pattern.
    pub const fn requires_pattern(&self) -> bool {
        matches!(self, FilterMode::Exact)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            FilterMode::Exact => "exact",
            FilterMode::Changed => "changed",
            FilterMode::Unchanged => "unchanged",
            FilterMode::Increased => "increased",
            FilterMode::Decreased => "decreased",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single matched address with its value as little-endian hex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanMatch {
    pub address: u64,
    #[serde(rename = "value")]
    pub value_hex: String,
}

/// Parameters for a first-scan request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub pattern: String,
    pub address_ranges: Vec<(u64, u64)>,
    pub find_mode: FindMode,
    pub value_type: ValueType,
    pub align: u32,
    pub session_id: String,
    pub do_suspend: bool,
}

/// Parameters for a narrowing filter request against an existing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub pattern: String,
    pub value_type: ValueType,
    pub session_id: String,
    pub filter_mode: FilterMode,
    pub do_suspend: bool,
}

/// Result set returned by a scan or filter request.
///
/// `found` is the true match count; `matches` is capped server-side and
/// `is_truncated` is set whenever the cap was exceeded. Callers must not
/// assume `matches.len() == found`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOutcome {
    pub matches: Vec<ScanMatch>,
    pub found: u64,
    pub is_truncated: bool,
}
