//! Shared in-memory mock of the remote memory-access contract
#![allow(dead_code)]

use memprobe::core::types::{
    ClientError, ClientResult, FilterRequest, MemoryRegion, ModuleImage, ProcessId, ScanOutcome,
    ScanRequest,
};
use memprobe::remote::{AppInfo, DirEntry, EntryKind, MemoryAccess};
use std::collections::HashMap;
use std::sync::Mutex;

/// Scripted oracle standing in for the inspection service.
///
/// State is configured up front; every remote call is recorded so tests
/// can assert on exactly which requests were (or were not) issued.
#[derive(Default)]
pub struct MockMemoryAccess {
    pub regions: Vec<MemoryRegion>,
    pub modules: Vec<ModuleImage>,
    pub app_info: Option<AppInfo>,
    pub files: HashMap<String, Vec<u8>>,
    pub directories: HashMap<String, Vec<DirEntry>>,
    pub symbols: HashMap<String, u64>,

    /// Memory blocks keyed by base address
    blocks: Vec<(u64, Vec<u8>)>,
    /// Ranges that read back as unreadable (empty response)
    unreadable: Vec<(u64, u64)>,
    /// Addresses whose writes fail
    failing_writes: Vec<u64>,

    pub fail_open_process: bool,
    pub fail_enumerate: bool,
    pub fail_scan: bool,
    pub fail_filter: bool,

    pub scan_response: Option<ScanOutcome>,
    pub filter_response: Option<ScanOutcome>,

    pub opened: Mutex<Vec<ProcessId>>,
    pub scan_requests: Mutex<Vec<ScanRequest>>,
    pub filter_requests: Mutex<Vec<FilterRequest>>,
    pub writes: Mutex<Vec<(u64, Vec<u8>)>>,
    pub reads: Mutex<Vec<(u64, u64)>>,
}

impl MockMemoryAccess {
    pub fn new() -> Self {
        MockMemoryAccess::default()
    }

    pub fn add_block(&mut self, base: u64, bytes: Vec<u8>) {
        self.blocks.push((base, bytes));
    }

    pub fn mark_unreadable(&mut self, start: u64, end: u64) {
        self.unreadable.push((start, end));
    }

    pub fn fail_write_at(&mut self, address: u64) {
        self.failing_writes.push(address);
    }

    pub fn add_directory(&mut self, path: &str, entries: Vec<DirEntry>) {
        self.directories.insert(path.to_string(), entries);
    }

    pub fn add_file(&mut self, path: &str, bytes: Vec<u8>) {
        self.files.insert(path.to_string(), bytes);
    }

    pub fn file_entry(name: &str) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            item_type: EntryKind::File,
            size: None,
        }
    }

    pub fn dir_entry(name: &str) -> DirEntry {
        DirEntry {
            name: name.to_string(),
            item_type: EntryKind::Directory,
            size: None,
        }
    }
}

impl MemoryAccess for MockMemoryAccess {
    async fn open_process(&self, pid: ProcessId) -> ClientResult<()> {
        if self.fail_open_process {
            return Err(ClientError::OpenProcessFailed {
                pid,
                reason: "scripted failure".to_string(),
            });
        }
        self.opened.lock().unwrap().push(pid);
        Ok(())
    }

    async fn enumerate_regions(&self) -> ClientResult<Vec<MemoryRegion>> {
        if self.fail_enumerate {
            return Err(ClientError::status("/enumregions", 500));
        }
        Ok(self.regions.clone())
    }

    async fn read_memory(&self, address: u64, size: u64) -> ClientResult<Option<Vec<u8>>> {
        self.reads.lock().unwrap().push((address, size));

        // a range reads as unreadable only when fully inside a marked span
        let end = address.saturating_add(size);
        if self
            .unreadable
            .iter()
            .any(|&(start, stop)| address >= start && end <= stop)
        {
            return Ok(None);
        }

        for (base, bytes) in &self.blocks {
            let block_end = base + bytes.len() as u64;
            if address >= *base && end <= block_end {
                let offset = (address - base) as usize;
                return Ok(Some(bytes[offset..offset + size as usize].to_vec()));
            }
        }
        Ok(None)
    }

    async fn write_memory(&self, address: u64, bytes: &[u8]) -> ClientResult<()> {
        if self.failing_writes.contains(&address) {
            return Err(ClientError::write_failed(
                format!("0x{:x}", address),
                "scripted failure",
            ));
        }
        self.writes.lock().unwrap().push((address, bytes.to_vec()));
        Ok(())
    }

    async fn scan(&self, request: &ScanRequest) -> ClientResult<ScanOutcome> {
        if self.fail_scan {
            return Err(ClientError::status("/memoryscan", 500));
        }
        self.scan_requests.lock().unwrap().push(request.clone());
        Ok(self.scan_response.clone().unwrap_or_default())
    }

    async fn filter(&self, request: &FilterRequest) -> ClientResult<ScanOutcome> {
        if self.fail_filter {
            return Err(ClientError::status("/memoryfilter", 500));
        }
        self.filter_requests.lock().unwrap().push(request.clone());
        Ok(self.filter_response.clone().unwrap_or_default())
    }

    async fn enumerate_modules(&self) -> ClientResult<Vec<ModuleImage>> {
        Ok(self.modules.clone())
    }

    async fn fetch_app_info(&self, pid: ProcessId) -> ClientResult<AppInfo> {
        self.app_info
            .clone()
            .ok_or(ClientError::AppInfoUnavailable(pid))
    }

    async fn explore_directory(&self, path: &str) -> ClientResult<Vec<DirEntry>> {
        self.directories
            .get(path)
            .cloned()
            .ok_or_else(|| ClientError::status("/exploredirectory", 400))
    }

    async fn read_file(&self, path: &str) -> ClientResult<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ClientError::status("/readfile", 400))
    }

    async fn resolve_address(&self, expression: &str) -> ClientResult<u64> {
        self.symbols
            .get(expression)
            .copied()
            .ok_or_else(|| ClientError::InvalidAddress(expression.to_string()))
    }
}
