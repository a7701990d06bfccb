//! HTTP implementation of the memory-access contract

use super::wire::{
    AppInfo, AppInfoResponse, DirEntry, ExploreDirectoryBody, FilterBody, ModulesResponse,
    OpenProcessBody, ReadFileBody, RegionsResponse, ResolveAddrResponse, ScanBody,
    ScanResponseBody, WriteMemoryBody,
};
use super::MemoryAccess;
use crate::config::Config;
use crate::core::types::{
    ClientError, ClientResult, FilterRequest, MemoryRegion, ModuleImage, ProcessId, ScanOutcome,
    ScanRequest,
};
use std::time::Duration;
use tracing::debug;

/// Client for the inspection service's HTTP endpoints
#[derive(Debug, Clone)]
pub struct HttpMemoryAccess {
    base_url: String,
    http: reqwest::Client,
}

impl HttpMemoryAccess {
    /// Creates a client for `http://<host>:<port>` with the transport's
    /// default timeout behavior
    pub fn new(host: &str, port: u16) -> Self {
        HttpMemoryAccess {
            base_url: format!("http://{}:{}", host, port),
            http: reqwest::Client::new(),
        }
    }

    /// Creates a client from configuration, applying the configured
    /// request timeout to the transport
    pub fn from_config(config: &Config) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.server.timeout_secs))
            .build()?;
        Ok(HttpMemoryAccess {
            base_url: format!("http://{}:{}", config.server.host, config.server.port),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check_status(endpoint: &str, response: &reqwest::Response) -> ClientResult<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::status(endpoint, response.status().as_u16()))
        }
    }
}

impl MemoryAccess for HttpMemoryAccess {
    async fn open_process(&self, pid: ProcessId) -> ClientResult<()> {
        let response = self
            .http
            .post(self.url("/openprocess"))
            .json(&OpenProcessBody { pid })
            .send()
            .await?;

        if response.status().is_success() {
            debug!(pid, "opened process");
            Ok(())
        } else {
            Err(ClientError::OpenProcessFailed {
                pid,
                reason: format!("status {}", response.status().as_u16()),
            })
        }
    }

    async fn enumerate_regions(&self) -> ClientResult<Vec<MemoryRegion>> {
        let response = self.http.get(self.url("/enumregions")).send().await?;
        Self::check_status("/enumregions", &response)?;

        let body: RegionsResponse = response.json().await?;
        let regions = body
            .regions
            .into_iter()
            .map(|record| record.into_region())
            .collect::<ClientResult<Vec<_>>>()?;
        debug!(count = regions.len(), "enumerated regions");
        Ok(regions)
    }

    async fn read_memory(&self, address: u64, size: u64) -> ClientResult<Option<Vec<u8>>> {
        let response = self
            .http
            .get(self.url("/readmemory"))
            .query(&[("address", address), ("size", size)])
            .send()
            .await?;
        Self::check_status("/readmemory", &response)?;

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            // empty body signals an unreadable range, not an error
            Ok(None)
        } else {
            Ok(Some(bytes.to_vec()))
        }
    }

    async fn write_memory(&self, address: u64, bytes: &[u8]) -> ClientResult<()> {
        let response = self
            .http
            .post(self.url("/writememory"))
            .json(&WriteMemoryBody {
                address,
                buffer: bytes.to_vec(),
            })
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ClientError::write_failed(
                format!("0x{:x}", address),
                format!("status {}", response.status().as_u16()),
            ))
        }
    }

    async fn scan(&self, request: &ScanRequest) -> ClientResult<ScanOutcome> {
        let response = self
            .http
            .post(self.url("/memoryscan"))
            .json(&ScanBody::from(request))
            .send()
            .await?;
        Self::check_status("/memoryscan", &response)?;

        let body: ScanResponseBody = response.json().await?;
        Ok(body.into())
    }

    async fn filter(&self, request: &FilterRequest) -> ClientResult<ScanOutcome> {
        let response = self
            .http
            .post(self.url("/memoryfilter"))
            .json(&FilterBody::from(request))
            .send()
            .await?;
        Self::check_status("/memoryfilter", &response)?;

        let body: ScanResponseBody = response.json().await?;
        Ok(body.into())
    }

    async fn enumerate_modules(&self) -> ClientResult<Vec<ModuleImage>> {
        let response = self.http.get(self.url("/enummodule")).send().await?;
        Self::check_status("/enummodule", &response)?;

        let body: ModulesResponse = response.json().await?;
        Ok(body.modules.into_iter().map(ModuleImage::from).collect())
    }

    async fn fetch_app_info(&self, pid: ProcessId) -> ClientResult<AppInfo> {
        let response = self
            .http
            .get(self.url("/appinfo"))
            .query(&[("pid", pid)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::AppInfoUnavailable(pid));
        }
        let body: AppInfoResponse = response.json().await?;
        Ok(body.info)
    }

    async fn explore_directory(&self, path: &str) -> ClientResult<Vec<DirEntry>> {
        let response = self
            .http
            .post(self.url("/exploredirectory"))
            .json(&ExploreDirectoryBody {
                path: path.to_string(),
                max_depth: 1,
            })
            .send()
            .await?;
        Self::check_status("/exploredirectory", &response)?;

        Ok(response.json().await?)
    }

    async fn read_file(&self, path: &str) -> ClientResult<Vec<u8>> {
        let response = self
            .http
            .post(self.url("/readfile"))
            .json(&ReadFileBody {
                path: path.to_string(),
            })
            .send()
            .await?;
        Self::check_status("/readfile", &response)?;

        Ok(response.bytes().await?.to_vec())
    }

    async fn resolve_address(&self, expression: &str) -> ClientResult<u64> {
        let response = self
            .http
            .get(self.url("/resolveaddr"))
            .query(&[("query", expression)])
            .send()
            .await?;
        Self::check_status("/resolveaddr", &response)?;

        let body: ResolveAddrResponse = response.json().await?;
        Ok(body.address)
    }
}
