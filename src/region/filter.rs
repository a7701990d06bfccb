//! Tri-state protection filtering for memory regions

use crate::core::types::{ClientError, ClientResult, MemoryRegion, Protection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Per-permission-bit filter state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    /// The region must NOT have the permission
    Deny,
    /// The permission does not matter
    Ignore,
    /// The region must have the permission
    Require,
}

impl TriState {
    /// Evaluates this state against a single permission bit
    pub const fn allows(&self, bit: bool) -> bool {
        match self {
            TriState::Deny => !bit,
            TriState::Ignore => true,
            TriState::Require => bit,
        }
    }

    /// Symbol used in the panel's compact form: `-`, `*`, `+`
    pub const fn symbol(&self) -> char {
        match self {
            TriState::Deny => '-',
            TriState::Ignore => '*',
            TriState::Require => '+',
        }
    }

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '-' => Some(TriState::Deny),
            '*' => Some(TriState::Ignore),
            '+' => Some(TriState::Require),
            _ => None,
        }
    }
}

/// Protection filter over the three permission bits.
///
/// Each bit is evaluated independently and the results are AND-combined;
/// toggling one bit's state never changes another bit's evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionFilter {
    pub read: TriState,
    pub write: TriState,
    pub execute: TriState,
}

impl ProtectionFilter {
    pub const fn new(read: TriState, write: TriState, execute: TriState) -> Self {
        ProtectionFilter {
            read,
            write,
            execute,
        }
    }

    /// Accept every region regardless of protection
    pub const fn any() -> Self {
        ProtectionFilter::new(TriState::Ignore, TriState::Ignore, TriState::Ignore)
    }

    /// Checks a region's protection against this filter
    pub fn matches(&self, protection: Protection) -> bool {
        self.read.allows(protection.read)
            && self.write.allows(protection.write)
            && self.execute.allows(protection.execute)
    }

    /// Filters a region list down to the matching regions
    pub fn apply<'a>(&self, regions: &'a [MemoryRegion]) -> Vec<&'a MemoryRegion> {
        regions
            .iter()
            .filter(|region| self.matches(region.protection))
            .collect()
    }

    /// Count of matching regions
    pub fn count(&self, regions: &[MemoryRegion]) -> usize {
        regions
            .iter()
            .filter(|region| self.matches(region.protection))
            .count()
    }
}

/// The panel's scan default: readable, writability irrelevant, not executable
impl Default for ProtectionFilter {
    fn default() -> Self {
        ProtectionFilter::new(TriState::Require, TriState::Ignore, TriState::Deny)
    }
}

/// Compact `r+w*x-` form used by the panel and the CLI
impl fmt::Display for ProtectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r{}w{}x{}",
            self.read.symbol(),
            self.write.symbol(),
            self.execute.symbol()
        )
    }
}

impl FromStr for ProtectionFilter {
    type Err = ClientError;

    fn from_str(s: &str) -> ClientResult<Self> {
        let chars: Vec<char> = s.chars().collect();
        let parse_err = || ClientError::InvalidPattern(format!("protection filter '{}'", s));

        if chars.len() != 6 || chars[0] != 'r' || chars[2] != 'w' || chars[4] != 'x' {
            return Err(parse_err());
        }
        let read = TriState::from_symbol(chars[1]).ok_or_else(parse_err)?;
        let write = TriState::from_symbol(chars[3]).ok_or_else(parse_err)?;
        let execute = TriState::from_symbol(chars[5]).ok_or_else(parse_err)?;
        Ok(ProtectionFilter::new(read, write, execute))
    }
}
