//! The external memory-access contract
//!
//! Everything the core knows about the target process arrives through
//! [`MemoryAccess`]; the production implementation speaks HTTP to the
//! inspection service, and tests substitute an in-memory oracle. One
//! invocation of any workflow awaits its requests strictly in sequence;
//! the contract carries no cancellation primitive, and timeouts belong
//! to the transport.

mod http;
mod wire;

pub use http::HttpMemoryAccess;
pub use wire::{AppInfo, DirEntry, EntryKind, RegionRecord};

use crate::core::types::{
    Address, ClientResult, FilterRequest, MemoryRegion, ModuleImage, ProcessId, ScanOutcome,
    ScanRequest,
};

/// Request/response contract of the remote memory-access service.
///
/// `read_memory` distinguishes an unreadable range (`Ok(None)`) from a
/// transport failure (`Err`); the service signals the former with an
/// empty body.
#[allow(async_fn_in_trait)]
pub trait MemoryAccess {
    /// Attaches the service to the given process
    async fn open_process(&self, pid: ProcessId) -> ClientResult<()>;

    /// Lists the target's memory regions
    async fn enumerate_regions(&self) -> ClientResult<Vec<MemoryRegion>>;

    /// Reads `size` bytes at `address`; `None` marks an unreadable range
    async fn read_memory(&self, address: u64, size: u64) -> ClientResult<Option<Vec<u8>>>;

    /// Writes raw bytes at `address`
    async fn write_memory(&self, address: u64, bytes: &[u8]) -> ClientResult<()>;

    /// First scan over the given ranges; creates/replaces the server-side
    /// result set identified by the request's session id
    async fn scan(&self, request: &ScanRequest) -> ClientResult<ScanOutcome>;

    /// Narrows the existing result set identified by the session id
    async fn filter(&self, request: &FilterRequest) -> ClientResult<ScanOutcome>;

    /// Lists the binary images loaded in the target
    async fn enumerate_modules(&self) -> ClientResult<Vec<ModuleImage>>;

    /// Fetches application metadata (bundle root path and friends)
    async fn fetch_app_info(&self, pid: ProcessId) -> ClientResult<AppInfo>;

    /// Lists one level of a directory on the target device
    async fn explore_directory(&self, path: &str) -> ClientResult<Vec<DirEntry>>;

    /// Reads a whole file from the target device
    async fn read_file(&self, path: &str) -> ClientResult<Vec<u8>>;

    /// Resolves a symbolic address expression (e.g. `libFoo.dylib+0x10`)
    async fn resolve_address(&self, expression: &str) -> ClientResult<u64>;
}

/// Parses a user-entered address, asking the service to resolve anything
/// that is not plain hex.
pub async fn resolve_address_input<M: MemoryAccess>(
    access: &M,
    input: &str,
) -> ClientResult<u64> {
    match Address::parse_hex(input) {
        Ok(address) => Ok(address.as_u64()),
        Err(_) => access.resolve_address(input).await,
    }
}
