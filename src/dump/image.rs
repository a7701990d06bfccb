//! Loaded binary-image header inspection
//!
//! Walks a captured Mach-O image's load-command table looking for the
//! encryption-info command. Zeroing that command's cryptid field is the
//! patch downstream repackaging tools recognize as "already decrypted";
//! the command itself stays in place.

/// 32-bit Mach-O magic (little-endian)
pub const MH_MAGIC: u32 = 0xfeed_face;
/// 64-bit Mach-O magic (little-endian)
pub const MH_MAGIC_64: u32 = 0xfeed_facf;

const LC_ENCRYPTION_INFO: u32 = 0x21;
const LC_ENCRYPTION_INFO_64: u32 = 0x2c;

const HEADER_SIZE_32: usize = 28;
const HEADER_SIZE_64: usize = 32;
const NCMDS_OFFSET: usize = 16;

/// Location of an encryption-info command inside a captured image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptionInfo {
    /// Byte offset of the 4-byte cryptid field within the image buffer
    pub cryptid_offset: usize,
    /// File offset of the encrypted byte range
    pub crypt_offset: u64,
    /// Length of the encrypted byte range
    pub crypt_size: u64,
}

/// Finds the encryption-info load command in a captured image.
///
/// Returns `None` for buffers that are not Mach-O or carry no such
/// command. A truncated or malformed command table stops the walk and
/// yields whatever was found before the damage. When several commands
/// are present the last one wins.
pub fn find_encryption_info(image: &[u8]) -> Option<EncryptionInfo> {
    let magic = read_u32(image, 0)?;
    let is_64bit = match magic {
        MH_MAGIC_64 => true,
        MH_MAGIC => false,
        _ => return None,
    };

    let ncmds = read_u32(image, NCMDS_OFFSET)?;
    let mut offset = if is_64bit {
        HEADER_SIZE_64
    } else {
        HEADER_SIZE_32
    };

    let mut found = None;
    for _ in 0..ncmds {
        let (cmd, cmdsize) = match (read_u32(image, offset), read_u32(image, offset + 4)) {
            (Some(cmd), Some(size)) => (cmd, size as usize),
            _ => break,
        };
        // a zero cmdsize would spin the walk in place
        if cmdsize == 0 {
            break;
        }

        if cmd == LC_ENCRYPTION_INFO || cmd == LC_ENCRYPTION_INFO_64 {
            match (read_u32(image, offset + 8), read_u32(image, offset + 12)) {
                (Some(crypt_offset), Some(crypt_size)) => {
                    found = Some(EncryptionInfo {
                        cryptid_offset: offset + 16,
                        crypt_offset: crypt_offset as u64,
                        crypt_size: crypt_size as u64,
                    });
                }
                _ => break,
            }
        }
        offset += cmdsize;
    }
    found
}

/// Zeroes the 4-byte cryptid field in place, marking the image as
/// unencrypted for downstream tooling
pub fn clear_crypt_id(image: &mut [u8], info: &EncryptionInfo) {
    if let Some(field) = image.get_mut(info.cryptid_offset..info.cryptid_offset + 4) {
        field.fill(0);
    }
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let slice = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes(slice.try_into().ok()?))
}
