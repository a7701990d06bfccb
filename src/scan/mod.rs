//! Stateful scan-then-filter search protocol
//!
//! Each scan tab owns one [`ScanSession`]; sessions in different tabs
//! run their scan/filter cycles independently and never share state.

mod patch;
mod session;

pub use patch::PatchReport;
pub use session::{ScanSession, DEFAULT_RANGE_END};
