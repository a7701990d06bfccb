//! Application-bundle dump workflow
//!
//! Copies the bundle's static file tree, re-captures every loaded image
//! belonging to the bundle from live memory, neutralizes the
//! encryption-info marker, and packages the result so it can be
//! repackaged as a distributable application archive.

use super::archive::ArchiveBuilder;
use super::image::{clear_crypt_id, find_encryption_info};
use crate::core::types::{Address, ClientError, ClientResult, ModuleImage, ProcessId};
use crate::remote::{EntryKind, MemoryAccess};
use tracing::{debug, info, warn};

/// Root folder inside the archive, fixed by the repackaging convention
const PAYLOAD_ROOT: &str = "Payload";

/// Extension of a repackaged distribution archive
const PACKAGE_EXTENSION: &str = "ipa";

/// Finished bundle dump: archive bytes plus a suggested file name
#[derive(Debug)]
pub struct BundleDump {
    pub archive: Vec<u8>,
    pub file_name: String,
    pub bundle_name: String,
    pub entry_count: usize,
}

/// Dumps the application bundle of `pid` into a zip archive.
///
/// Static files contribute the first half of reported progress, loaded
/// images the second half. Individual file or image failures are logged
/// and skipped; only a missing bundle path aborts the workflow.
pub async fn dump_app<M, F>(access: &M, pid: ProcessId, mut progress: F) -> ClientResult<BundleDump>
where
    M: MemoryAccess,
    F: FnMut(f32),
{
    progress(0.0);

    let app_info = access.fetch_app_info(pid).await?;
    let bundle_path = app_info.bundle_path;
    if bundle_path.is_empty() {
        return Err(ClientError::AppInfoUnavailable(pid));
    }
    let bundle_name = bundle_path
        .rsplit('/')
        .next()
        .unwrap_or(bundle_path.as_str())
        .to_string();
    info!(pid, bundle = %bundle_name, "starting bundle dump");

    let mut archive = ArchiveBuilder::new();

    copy_bundle_tree(access, &mut archive, &bundle_path, &bundle_name, |fraction| {
        progress(fraction * 0.5)
    })
    .await;

    let modules = access.enumerate_modules().await?;
    let total = modules.len();
    for (index, module) in modules.iter().enumerate() {
        if module.path.starts_with(&bundle_path) {
            match capture_module(access, module).await {
                Ok(bytes) => {
                    let relative = &module.path[bundle_path.len()..];
                    let entry = format!("{}/{}{}", PAYLOAD_ROOT, bundle_name, relative);
                    archive.add_entry(&entry, &bytes)?;
                    debug!(module = %module.path, "image captured");
                }
                Err(error) => {
                    warn!(module = %module.path, %error, "image dump failed, skipping");
                }
            }
        }
        progress(0.5 + ((index + 1) as f32 / total as f32) * 0.5);
    }
    if total == 0 {
        progress(1.0);
    }

    let entry_count = archive.entry_count();
    info!(pid, entry_count, "bundle dump complete");
    Ok(BundleDump {
        archive: archive.finish()?,
        file_name: format!("{}.{}", bundle_stem(&bundle_name), PACKAGE_EXTENSION),
        bundle_name,
        entry_count,
    })
}

/// Copies the bundle's static file tree under `Payload/<bundle_name>/`.
///
/// Only top-level entries advance the progress fraction; nested
/// directories are walked without reporting, like the panel does.
/// Failures are logged and skipped, never fatal.
async fn copy_bundle_tree<M, F>(
    access: &M,
    archive: &mut ArchiveBuilder,
    bundle_path: &str,
    bundle_name: &str,
    mut progress: F,
) where
    M: MemoryAccess,
    F: FnMut(f32),
{
    let entries = match access.explore_directory(bundle_path).await {
        Ok(entries) => entries,
        Err(error) => {
            warn!(path = %bundle_path, %error, "bundle root listing failed");
            return;
        }
    };

    let total = entries.len();
    for (index, entry) in entries.into_iter().enumerate() {
        let src = format!("{}/{}", bundle_path, entry.name);
        let dest = format!("{}/{}", bundle_name, entry.name);
        match entry.item_type {
            EntryKind::File => copy_file(access, archive, &src, &dest).await,
            EntryKind::Directory => copy_directory(access, archive, src, dest).await,
        }
        progress((index + 1) as f32 / total as f32);
    }
    if total == 0 {
        progress(1.0);
    }
}

/// Iterative walk of one directory subtree (recursion would force the
/// futures to box)
async fn copy_directory<M: MemoryAccess>(
    access: &M,
    archive: &mut ArchiveBuilder,
    src: String,
    dest: String,
) {
    let mut pending = vec![(src, dest)];
    while let Some((src_dir, dest_dir)) = pending.pop() {
        let children = match access.explore_directory(&src_dir).await {
            Ok(children) => children,
            Err(error) => {
                warn!(path = %src_dir, %error, "directory listing failed, skipping");
                continue;
            }
        };
        for child in children {
            let src = format!("{}/{}", src_dir, child.name);
            let dest = format!("{}/{}", dest_dir, child.name);
            match child.item_type {
                EntryKind::File => copy_file(access, archive, &src, &dest).await,
                EntryKind::Directory => pending.push((src, dest)),
            }
        }
    }
}

async fn copy_file<M: MemoryAccess>(
    access: &M,
    archive: &mut ArchiveBuilder,
    src: &str,
    dest: &str,
) {
    match access.read_file(src).await {
        Ok(bytes) => {
            let entry = format!("{}/{}", PAYLOAD_ROOT, dest);
            if let Err(error) = archive.add_entry(&entry, &bytes) {
                warn!(path = %src, %error, "archive entry failed, skipping");
            }
        }
        Err(error) => {
            warn!(path = %src, %error, "file read failed, skipping");
        }
    }
}

/// Reads one loaded image from live memory and neutralizes its
/// encryption marker.
///
/// When an encryption-info command is present, the cryptid field is
/// zeroed and the encrypted byte range is replaced with a fresh read of
/// the already-decrypted live pages. A failed re-read keeps the
/// original bytes for that range; the capture still succeeds.
async fn capture_module<M: MemoryAccess>(
    access: &M,
    module: &ModuleImage,
) -> ClientResult<Vec<u8>> {
    let mut data = access
        .read_memory(module.base, module.size)
        .await?
        .ok_or_else(|| ClientError::read_failed(Address::new(module.base), "image unreadable"))?;

    if let Some(info) = find_encryption_info(&data) {
        clear_crypt_id(&mut data, &info);

        let section_base = module.base + info.crypt_offset;
        match access.read_memory(section_base, info.crypt_size).await {
            Ok(Some(decrypted)) => {
                splice(&mut data, info.crypt_offset as usize, &decrypted);
                debug!(
                    module = %module.name(),
                    size = info.crypt_size,
                    "decrypted section spliced"
                );
            }
            Ok(None) => {
                warn!(
                    module = %module.name(),
                    "decrypted section unreadable, keeping encrypted bytes"
                );
            }
            Err(error) => {
                warn!(
                    module = %module.name(),
                    %error,
                    "decrypted section read failed, keeping encrypted bytes"
                );
            }
        }
    }
    Ok(data)
}

/// Copies `replacement` over `data` starting at `offset`, clamped to the
/// buffer
fn splice(data: &mut [u8], offset: usize, replacement: &[u8]) {
    if offset >= data.len() {
        return;
    }
    let end = (offset + replacement.len()).min(data.len());
    data[offset..end].copy_from_slice(&replacement[..end - offset]);
}

/// Bundle name without its `.app`-style extension
fn bundle_stem(bundle_name: &str) -> &str {
    match bundle_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => bundle_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_stem() {
        assert_eq!(bundle_stem("MyApp.app"), "MyApp");
        assert_eq!(bundle_stem("My.App.app"), "My.App");
        assert_eq!(bundle_stem("NoExtension"), "NoExtension");
        assert_eq!(bundle_stem(".hidden"), ".hidden");
    }

    #[test]
    fn test_splice_clamps_to_buffer() {
        let mut data = vec![1u8; 8];
        splice(&mut data, 4, &[9, 9]);
        assert_eq!(data, [1, 1, 1, 1, 9, 9, 1, 1]);

        // replacement running past the end is truncated
        let mut data = vec![1u8; 8];
        splice(&mut data, 6, &[9, 9, 9, 9]);
        assert_eq!(data, [1, 1, 1, 1, 1, 1, 9, 9]);

        // offset past the end is a no-op
        let mut data = vec![1u8; 4];
        splice(&mut data, 10, &[9]);
        assert_eq!(data, [1, 1, 1, 1]);
    }
}
