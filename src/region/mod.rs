//! Region classification against tri-state protection filters

mod filter;

pub use filter::{ProtectionFilter, TriState};
