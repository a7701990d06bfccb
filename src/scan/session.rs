//! Per-tab scan/filter session state machine

use crate::codec::encode_value;
use crate::core::types::{
    Address, AddressRange, ClientError, ClientResult, FilterMode, FilterRequest, FindMode,
    MemoryRegion, ScanMatch, ScanOutcome, ScanRequest, ValueType,
};
use crate::region::ProtectionFilter;
use crate::remote::MemoryAccess;
use crate::scan::PatchReport;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Upper bound of the default scan range, matching the service's
/// canonical user-space ceiling.
pub const DEFAULT_RANGE_END: u64 = 0x7FFF_FFFF_FFFF_FF;

/// Mutable state of one scan tab.
///
/// A session is created when its tab opens, is exclusively owned by that
/// tab, and moves between two phases: *configuring* (`is_first_scan`),
/// where ranges, data type, and alignment are free to change, and
/// *scanned*, where only the value, filter mode, and selection may
/// change until [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct ScanSession {
    id: String,
    value: String,
    value_type: ValueType,
    find_mode: FindMode,
    filter_mode: FilterMode,
    align: u32,
    address_ranges: Vec<AddressRange>,
    protection: ProtectionFilter,
    do_suspend: bool,

    results: Vec<ScanMatch>,
    result_count: u64,
    is_truncated: bool,
    is_first_scan: bool,
    is_loading: bool,
    selected: BTreeMap<usize, u64>,
}

impl ScanSession {
    /// Creates a session with the panel's defaults: int32, exact find,
    /// 4-byte alignment, full user-space range, `r+w*x-` protection.
    pub fn new(id: impl Into<String>) -> Self {
        ScanSession {
            id: id.into(),
            value: "0".to_string(),
            value_type: ValueType::Int32,
            find_mode: FindMode::Exact,
            filter_mode: FilterMode::Exact,
            align: 4,
            address_ranges: vec![(0, DEFAULT_RANGE_END)],
            protection: ProtectionFilter::default(),
            do_suspend: false,
            results: Vec::new(),
            result_count: 0,
            is_truncated: false,
            is_first_scan: true,
            is_loading: false,
            selected: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn find_mode(&self) -> FindMode {
        self.find_mode
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter_mode
    }

    pub fn align(&self) -> u32 {
        self.align
    }

    pub fn address_ranges(&self) -> &[AddressRange] {
        &self.address_ranges
    }

    pub fn protection(&self) -> ProtectionFilter {
        self.protection
    }

    pub fn results(&self) -> &[ScanMatch] {
        &self.results
    }

    /// True match count reported by the service; may exceed
    /// `results().len()` when the result list was truncated
    pub fn result_count(&self) -> u64 {
        self.result_count
    }

    pub fn is_truncated(&self) -> bool {
        self.is_truncated
    }

    pub fn is_first_scan(&self) -> bool {
        self.is_first_scan
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The scan value may change at any time
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn set_find_mode(&mut self, mode: FindMode) {
        self.find_mode = mode;
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        self.filter_mode = mode;
    }

    pub fn set_protection(&mut self, filter: ProtectionFilter) {
        self.protection = filter;
    }

    pub fn set_do_suspend(&mut self, do_suspend: bool) {
        self.do_suspend = do_suspend;
    }

    /// Data type is frozen once the first scan has run
    pub fn set_value_type(&mut self, value_type: ValueType) -> ClientResult<()> {
        if !self.is_first_scan {
            return Err(ClientError::SessionLocked("data type"));
        }
        self.value_type = value_type;
        Ok(())
    }

    /// Alignment is frozen once the first scan has run
    pub fn set_align(&mut self, align: u32) -> ClientResult<()> {
        if !self.is_first_scan {
            return Err(ClientError::SessionLocked("alignment"));
        }
        self.align = align;
        Ok(())
    }

    /// Address ranges are frozen once the first scan has run
    pub fn set_address_ranges(&mut self, ranges: Vec<AddressRange>) -> ClientResult<()> {
        if !self.is_first_scan {
            return Err(ClientError::SessionLocked("address ranges"));
        }
        self.address_ranges = ranges;
        Ok(())
    }

    /// Returns to the configuring phase, discarding the result set
    pub fn reset(&mut self) {
        self.value.clear();
        self.find_mode = FindMode::Exact;
        self.is_first_scan = true;
        self.results.clear();
        self.result_count = 0;
        self.is_truncated = false;
        self.selected.clear();
    }

    /// Runs the first scan: encode the pattern, enumerate regions, apply
    /// the protection filter, intersect with the configured ranges, and
    /// issue one scan request.
    ///
    /// On success the session enters the scanned phase with the returned
    /// result set. On failure the phase and results are left untouched;
    /// only the loading flag clears.
    pub async fn first_scan<M: MemoryAccess>(&mut self, access: &M) -> ClientResult<()> {
        if self.is_loading {
            return Err(ClientError::SessionBusy);
        }
        if !self.is_first_scan {
            return Err(ClientError::SessionLocked("scan parameters"));
        }
        if self.value.is_empty() && self.find_mode.requires_pattern() {
            return Err(ClientError::PatternRequired(self.find_mode.to_string()));
        }

        let pattern = if self.value.is_empty() {
            String::new()
        } else {
            encode_value(&self.value, self.value_type)?
        };

        self.is_loading = true;
        let result = self.run_first_scan(access, pattern).await;
        self.is_loading = false;

        let outcome = result?;
        debug!(
            session = %self.id,
            found = outcome.found,
            truncated = outcome.is_truncated,
            "first scan complete"
        );
        self.apply_outcome(outcome);
        self.is_first_scan = false;
        Ok(())
    }

    async fn run_first_scan<M: MemoryAccess>(
        &self,
        access: &M,
        pattern: String,
    ) -> ClientResult<ScanOutcome> {
        let regions = access.enumerate_regions().await?;
        let address_ranges = self.intersect_ranges(&regions);

        let request = ScanRequest {
            pattern,
            address_ranges,
            find_mode: self.find_mode,
            value_type: self.value_type,
            // a zero stride is a malformed request, not "every byte"
            align: self.align.max(1),
            session_id: self.id.clone(),
            do_suspend: self.do_suspend,
        };
        access.scan(&request).await
    }

    /// Narrows the existing result set with the session's filter mode.
    ///
    /// References the server-side set by session id; address ranges are
    /// not re-sent. Monotonic narrowing is expected of the service but
    /// not enforced here: whatever set comes back replaces the results.
    pub async fn next_filter<M: MemoryAccess>(&mut self, access: &M) -> ClientResult<()> {
        if self.is_loading {
            return Err(ClientError::SessionBusy);
        }
        if self.is_first_scan {
            return Err(ClientError::NoScanResults);
        }
        if self.value.is_empty() && self.filter_mode.requires_pattern() {
            return Err(ClientError::PatternRequired(self.filter_mode.to_string()));
        }

        let pattern = if self.value.is_empty() {
            String::new()
        } else {
            encode_value(&self.value, self.value_type)?
        };

        let request = FilterRequest {
            pattern,
            value_type: self.value_type,
            session_id: self.id.clone(),
            filter_mode: self.filter_mode,
            do_suspend: self.do_suspend,
        };

        self.is_loading = true;
        let result = access.filter(&request).await;
        self.is_loading = false;

        let outcome = result?;
        debug!(
            session = %self.id,
            mode = %self.filter_mode,
            found = outcome.found,
            "filter complete"
        );
        self.apply_outcome(outcome);
        Ok(())
    }

    fn apply_outcome(&mut self, outcome: ScanOutcome) {
        self.results = outcome.matches;
        self.result_count = outcome.found;
        self.is_truncated = outcome.is_truncated;
        self.selected.clear();
    }

    /// Regions that pass the protection filter and lie fully inside one
    /// of the configured address ranges, as scan ranges
    fn intersect_ranges(&self, regions: &[MemoryRegion]) -> Vec<AddressRange> {
        regions
            .iter()
            .filter(|region| self.protection.matches(region.protection))
            .filter(|region| {
                self.address_ranges
                    .iter()
                    .any(|&(start, end)| region.contained_in(start, end))
            })
            .map(|region| (region.start, region.end))
            .collect()
    }

    /// Toggles membership of one `(index, address)` result row in the
    /// selection; independent of the session phase
    pub fn toggle_select(&mut self, index: usize, address: u64) {
        if self.selected.remove(&index).is_none() {
            self.selected.insert(index, address);
        }
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    /// Selected result indices in ascending order
    pub fn selected_indices(&self) -> Vec<usize> {
        self.selected.keys().copied().collect()
    }

    /// Addresses of the selected result rows
    pub fn selected_addresses(&self) -> Vec<u64> {
        self.selected.values().copied().collect()
    }

    /// Writes the encoded `value` to every selected address.
    ///
    /// Fire-and-forget per address: an individual write failure is
    /// logged and recorded, and the remaining writes proceed. There is
    /// no rollback.
    pub async fn patch<M: MemoryAccess>(
        &self,
        access: &M,
        value: &str,
    ) -> ClientResult<PatchReport> {
        let encoded = encode_value(value, self.value_type)?;
        // the regex path carries raw text; patch it as its UTF-8 bytes
        let pattern_hex = if self.value_type == ValueType::Regex {
            hex::encode(encoded.as_bytes())
        } else {
            encoded
        };
        let bytes = hex::decode(&pattern_hex)
            .map_err(|_| ClientError::InvalidPattern(pattern_hex.clone()))?;

        let mut report = PatchReport::default();
        for address in self.selected.values().copied() {
            match access.write_memory(address, &bytes).await {
                Ok(()) => {
                    debug!(address = %Address::new(address), "patched");
                    report.written.push(address);
                }
                Err(error) => {
                    warn!(
                        address = %Address::new(address),
                        %error,
                        "patch write failed; continuing"
                    );
                    report.failed.push((address, error));
                }
            }
        }
        Ok(report)
    }
}
