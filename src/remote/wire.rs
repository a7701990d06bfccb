//! Wire DTOs for the memory-access service
//!
//! Field names match the service's JSON verbatim; conversions into the
//! crate's core types happen at this boundary and nowhere else.

use crate::core::types::{
    ClientError, ClientResult, FilterMode, FilterRequest, FindMode, MemoryRegion, ModuleImage,
    Protection, ScanMatch, ScanOutcome, ScanRequest, ValueType,
};
use serde::{Deserialize, Serialize};

/// One region line from `/enumregions`; addresses are unprefixed hex
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionRecord {
    pub start_address: String,
    pub end_address: String,
    pub protection: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

impl RegionRecord {
    pub fn into_region(self) -> ClientResult<MemoryRegion> {
        let start = u64::from_str_radix(&self.start_address, 16)
            .map_err(|_| ClientError::InvalidAddress(self.start_address.clone()))?;
        let end = u64::from_str_radix(&self.end_address, 16)
            .map_err(|_| ClientError::InvalidAddress(self.end_address.clone()))?;
        Ok(MemoryRegion {
            start,
            end,
            protection: Protection::parse(&self.protection),
            file_path: self.file_path,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RegionsResponse {
    #[serde(default)]
    pub regions: Vec<RegionRecord>,
}

#[derive(Debug, Serialize)]
pub struct OpenProcessBody {
    pub pid: i32,
}

#[derive(Debug, Serialize)]
pub struct WriteMemoryBody {
    pub address: u64,
    pub buffer: Vec<u8>,
}

/// `/memoryscan` request body
#[derive(Debug, Serialize)]
pub struct ScanBody {
    pub pattern: String,
    pub address_ranges: Vec<(u64, u64)>,
    pub find_type: FindMode,
    pub data_type: ValueType,
    pub scan_id: String,
    pub align: u32,
    pub return_as_json: bool,
    pub do_suspend: bool,
}

impl From<&ScanRequest> for ScanBody {
    fn from(request: &ScanRequest) -> Self {
        ScanBody {
            pattern: request.pattern.clone(),
            address_ranges: request.address_ranges.clone(),
            find_type: request.find_mode,
            data_type: request.value_type,
            scan_id: request.session_id.clone(),
            align: request.align,
            return_as_json: true,
            do_suspend: request.do_suspend,
        }
    }
}

/// `/memoryfilter` request body
#[derive(Debug, Serialize)]
pub struct FilterBody {
    pub pattern: String,
    pub data_type: ValueType,
    pub scan_id: String,
    pub filter_method: FilterMode,
    pub return_as_json: bool,
    pub do_suspend: bool,
}

impl From<&FilterRequest> for FilterBody {
    fn from(request: &FilterRequest) -> Self {
        FilterBody {
            pattern: request.pattern.clone(),
            data_type: request.value_type,
            scan_id: request.session_id.clone(),
            filter_method: request.filter_mode,
            return_as_json: true,
            do_suspend: request.do_suspend,
        }
    }
}

/// Response shape shared by `/memoryscan` and `/memoryfilter`
#[derive(Debug, Deserialize)]
pub struct ScanResponseBody {
    #[serde(default)]
    pub matched_addresses: Vec<ScanMatch>,
    pub found: u64,
    pub is_rounded: bool,
}

impl From<ScanResponseBody> for ScanOutcome {
    fn from(body: ScanResponseBody) -> Self {
        ScanOutcome {
            matches: body.matched_addresses,
            found: body.found,
            is_truncated: body.is_rounded,
        }
    }
}

/// One module line from `/enummodule`
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleRecord {
    pub base: u64,
    pub size: i64,
    #[serde(default)]
    pub is_64bit: bool,
    pub modulename: String,
}

impl From<ModuleRecord> for ModuleImage {
    fn from(record: ModuleRecord) -> Self {
        ModuleImage {
            base: record.base,
            size: record.size.max(0) as u64,
            path: record.modulename,
            is_64bit: record.is_64bit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ModulesResponse {
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
}

/// Application metadata from `/appinfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppInfo {
    #[serde(rename = "BundlePath")]
    pub bundle_path: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct AppInfoResponse {
    pub info: AppInfo,
}

#[derive(Debug, Serialize)]
pub struct ExploreDirectoryBody {
    pub path: String,
    pub max_depth: i32,
}

#[derive(Debug, Serialize)]
pub struct ReadFileBody {
    pub path: String,
}

/// Kind of a directory listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry from `/exploredirectory`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub item_type: EntryKind,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveAddrResponse {
    pub address: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_record_conversion() {
        let record = RegionRecord {
            start_address: "1000".to_string(),
            end_address: "2000".to_string(),
            protection: "rw-".to_string(),
            file_path: Some("/usr/lib/libfoo.dylib".to_string()),
        };
        let region = record.into_region().unwrap();
        assert_eq!(region.start, 0x1000);
        assert_eq!(region.end, 0x2000);
        assert!(region.protection.read && region.protection.write);
        assert!(!region.protection.execute);

        let bad = RegionRecord {
            start_address: "xyz!".to_string(),
            end_address: "2000".to_string(),
            protection: "r--".to_string(),
            file_path: None,
        };
        assert!(bad.into_region().is_err());
    }

    #[test]
    fn test_scan_body_wire_names() {
        let request = ScanRequest {
            pattern: "64000000".to_string(),
            address_ranges: vec![(0x1000, 0x2000)],
            find_mode: FindMode::Exact,
            value_type: ValueType::Int32,
            align: 4,
            session_id: "Scan 1".to_string(),
            do_suspend: false,
        };
        let body = ScanBody::from(&request);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["pattern"], "64000000");
        assert_eq!(json["find_type"], "exact");
        assert_eq!(json["data_type"], "int32");
        assert_eq!(json["scan_id"], "Scan 1");
        assert_eq!(json["align"], 4);
        assert_eq!(json["return_as_json"], true);
        assert_eq!(json["address_ranges"][0][0], 0x1000);
    }

    #[test]
    fn test_scan_response_parsing() {
        let body: ScanResponseBody = serde_json::from_str(
            r#"{"matched_addresses":[{"address":4096,"value":"64000000"}],"found":1,"is_rounded":false}"#,
        )
        .unwrap();
        let outcome = ScanOutcome::from(body);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.found, 1);
        assert!(!outcome.is_truncated);

        // matched_addresses may be omitted entirely
        let body: ScanResponseBody =
            serde_json::from_str(r#"{"found":0,"is_rounded":false}"#).unwrap();
        assert!(body.matched_addresses.is_empty());
    }

    #[test]
    fn test_app_info_keeps_extra_fields() {
        let response: AppInfoResponse = serde_json::from_str(
            r#"{"info":{"BundlePath":"/var/App.app","AppName":"App"}}"#,
        )
        .unwrap();
        assert_eq!(response.info.bundle_path, "/var/App.app");
        assert_eq!(response.info.extra["AppName"], "App");
    }

    #[test]
    fn test_dir_entry_kinds() {
        let entries: Vec<DirEntry> = serde_json::from_str(
            r#"[{"name":"Info.plist","item_type":"file","size":1024},
                {"name":"Frameworks","item_type":"directory"}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].item_type, EntryKind::File);
        assert_eq!(entries[1].item_type, EntryKind::Directory);
        assert_eq!(entries[1].size, None);
    }
}
