//! Whole-region memory dump workflow

use super::archive::ArchiveBuilder;
use crate::core::types::{Address, ClientResult, ProcessId};
use crate::region::ProtectionFilter;
use crate::remote::MemoryAccess;
use tracing::{info, warn};

/// Finished region dump: archive bytes plus a suggested file name
#[derive(Debug)]
pub struct MemoryDump {
    pub archive: Vec<u8>,
    pub file_name: String,
    pub entry_count: usize,
}

/// Dumps every region matching `filter` into a zip archive.
///
/// Regions are read strictly in sequence. A region that fails to read
/// is logged and skipped; the dump still succeeds with the entries that
/// worked. Failing to open the process aborts before any archive
/// exists. `progress` receives fractions in `[0, 1]` and always reaches
/// 1.0 on success.
pub async fn dump_memory<M, F>(
    access: &M,
    pid: ProcessId,
    filter: &ProtectionFilter,
    mut progress: F,
) -> ClientResult<MemoryDump>
where
    M: MemoryAccess,
    F: FnMut(f32),
{
    progress(0.0);
    access.open_process(pid).await?;

    let regions = access.enumerate_regions().await?;
    let surviving = filter.apply(&regions);
    let total = surviving.len();
    info!(pid, total, filter = %filter, "starting region dump");

    let directory = format!("pid_{}_dump", pid);
    let mut archive = ArchiveBuilder::new();

    for (index, region) in surviving.into_iter().enumerate() {
        match access.read_memory(region.start, region.size()).await {
            Ok(Some(bytes)) => {
                let name = format!(
                    "{}/{}-{}_{}.bin",
                    directory,
                    Address::new(region.start),
                    Address::new(region.end),
                    region.protection
                );
                archive.add_entry(&name, &bytes)?;
            }
            Ok(None) => {
                warn!(
                    start = %Address::new(region.start),
                    "region unreadable, skipping"
                );
            }
            Err(error) => {
                warn!(
                    start = %Address::new(region.start),
                    %error,
                    "region read failed, skipping"
                );
            }
        }
        progress((index + 1) as f32 / total as f32);
    }

    if total == 0 {
        progress(1.0);
    }

    let entry_count = archive.entry_count();
    info!(pid, entry_count, "region dump complete");
    Ok(MemoryDump {
        archive: archive.finish()?,
        file_name: format!("memory_dump_{}.zip", pid),
        entry_count,
    })
}
