//! Byte-range access to a file's single data block.

use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;

use crate::config::*;
use crate::error::{FsError, Result};
use crate::image::Image;
use crate::structs::Inode;

fn now_secs() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

/// Reads from `offset` into `buffer`, stopping at the end of the file.
/// Returns the number of bytes read; 0 when `offset` is at or past the end.
pub fn fread(image: &Image, inode: &Inode, offset: usize, buffer: &mut [u8]) -> Result<usize> {
    if inode.directory {
        return Err(FsError::IsADirectory);
    }
    let size = (inode.size as usize).min(BLOCK_SIZE);
    if offset >= size {
        return Ok(0);
    }
    let len = buffer.len().min(size - offset);
    let block = image.block(inode.data)?;
    buffer[..len].copy_from_slice(&block[offset..offset + len]);
    Ok(len)
}

/// Writes `buffer` at `offset`. The whole range must fit in the data block.
/// The file grows to `offset + buffer.len()` if that is past its end.
pub fn fwrite(image: &mut Image, inode: &mut Inode, offset: usize, buffer: &[u8]) -> Result<usize> {
    if inode.directory {
        return Err(FsError::IsADirectory);
    }
    let end = offset
        .checked_add(buffer.len())
        .filter(|&end| end <= BLOCK_SIZE)
        .ok_or_else(|| {
            warn!("write of {} bytes at {} does not fit one block", buffer.len(), offset);
            FsError::WriteOutOfBounds { offset, len: buffer.len() }
        })?;
    if buffer.is_empty() {
        return Ok(0);
    }

    let block = image.block_mut(inode.data)?;
    block[offset..end].copy_from_slice(buffer);
    inode.size = inode.size.max(end as u64);
    inode.last_modified = now_secs();
    Ok(buffer.len())
}
