//! Memory region and module records reported by the service

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access permissions of a memory region.
///
/// Parsed from the service's `rwx`-style protection strings. A region
/// with no permissions at all is reported as `---`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Protection {
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl Protection {
    pub const fn new(read: bool, write: bool, execute: bool) -> Self {
        Protection {
            read,
            write,
            execute,
        }
    }

    /// Parses a protection string such as `rw-`, `r-x` or `rwxp`.
    ///
    /// Any character beyond the three permission letters (e.g. the
    /// private/shared suffix on Linux maps) is ignored. Total: unknown
    /// strings simply yield the bits they do contain.
    pub fn parse(s: &str) -> Self {
        let lower = s.to_ascii_lowercase();
        Protection {
            read: lower.contains('r'),
            write: lower.contains('w'),
            execute: lower.contains('x'),
        }
    }
}

impl FromStr for Protection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Protection::parse(s))
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            if self.read { 'r' } else { '-' },
            if self.write { 'w' } else { '-' },
            if self.execute { 'x' } else { '-' },
        )
    }
}

/// A memory region snapshot reported by the service.
///
/// Immutable once read; enumeration results are request-scoped and the
/// core never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRegion {
    pub start: u64,
    pub end: u64,
    pub protection: Protection,
    pub file_path: Option<String>,
}

impl MemoryRegion {
    pub fn new(start: u64, end: u64, protection: Protection) -> Self {
        MemoryRegion {
            start,
            end,
            protection,
            file_path: None,
        }
    }

    /// Region size in bytes
    pub fn size(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// True when the region lies fully inside `[start, end]`
    pub fn contained_in(&self, start: u64, end: u64) -> bool {
        self.start >= start && self.end <= end
    }
}

/// A binary image loaded into the target process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleImage {
    pub base: u64,
    pub size: u64,
    pub path: String,
    pub is_64bit: bool,
}

impl ModuleImage {
    /// Final path component, e.g. `MyApp` for `/var/.../MyApp.app/MyApp`
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protection_parse() {
        assert_eq!(Protection::parse("rw-"), Protection::new(true, true, false));
        assert_eq!(Protection::parse("r-x"), Protection::new(true, false, true));
        assert_eq!(Protection::parse("---"), Protection::new(false, false, false));
        // private-mapping suffix is ignored
        assert_eq!(Protection::parse("rwxp"), Protection::new(true, true, true));
        assert_eq!(Protection::parse("RW-"), Protection::new(true, true, false));
    }

    #[test]
    fn test_protection_display() {
        assert_eq!(Protection::new(true, true, false).to_string(), "rw-");
        assert_eq!(Protection::new(false, false, false).to_string(), "---");
        assert_eq!(Protection::new(true, false, true).to_string(), "r-x");
    }

    #[test]
    fn test_region_size_and_containment() {
        let region = MemoryRegion::new(0x1000, 0x2000, Protection::parse("rw-"));
        assert_eq!(region.size(), 0x1000);
        assert!(region.contained_in(0x0, 0x7FFFFFFFFFFFFF));
        assert!(region.contained_in(0x1000, 0x2000));
        assert!(!region.contained_in(0x1800, 0x3000));
        assert!(!region.contained_in(0x0, 0x1800));
    }

    #[test]
    fn test_module_name() {
        let module = ModuleImage {
            base: 0x100000000,
            size: 0x4000,
            path: "/private/var/containers/Bundle/App.app/App".to_string(),
            is_64bit: true,
        };
        assert_eq!(module.name(), "App");
    }
}
