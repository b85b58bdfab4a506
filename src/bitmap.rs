//! Inode and data-block availability bitmaps.
//! Each slot is one little-endian word, 1 = allocated and 0 = free, in both maps.
//! Slot 0 of each map is reserved: inode 0 names the root, block 0 holds it.

use log::debug;

use crate::config::*;
use crate::error::{FsError, Resource, Result};
use crate::image::Image;
use crate::layout::Region;

const FREE: u32 = 0;
const ALLOCATED: u32 = 1;

fn map_of(image: &Image, kind: Resource) -> (Region, u32) {
    match kind {
        Resource::Inodes => (image.layout().inode_bitmap, image.num_inodes()),
        Resource::Blocks => (image.layout().block_bitmap, image.num_blocks()),
    }
}

fn slot_offset(image: &Image, kind: Resource, index: u32) -> Result<usize> {
    let (region, total) = map_of(image, kind);
    if index >= total {
        return Err(FsError::InvalidIndex { kind, index });
    }
    Ok(region.start + index as usize * BITMAP_ENTRY_SIZE)
}

/// Claim the first free slot from index 1 upward.
fn set_first_fit(image: &mut Image, kind: Resource) -> Result<u32> {
    let (region, total) = map_of(image, kind);
    for index in 1..total {
        let offset = region.start + index as usize * BITMAP_ENTRY_SIZE;
        if image.word(offset) == FREE {
            image.set_word(offset, ALLOCATED);
            debug!("allocated {} slot {}", kind, index);
            return Ok(index);
        }
    }
    Err(FsError::ResourceExhausted(kind))
}

fn set_at(image: &mut Image, kind: Resource, index: u32, value: u32) -> Result<()> {
    let offset = slot_offset(image, kind, index)?;
    image.set_word(offset, value);
    Ok(())
}

/// Clears both maps and marks the reserved slots.
/// Only called when formatting a fresh image.
pub(crate) fn init_bitmaps(image: &mut Image) -> Result<()> {
    let layout = *image.layout();
    image.region_mut(layout.inode_bitmap).fill(0);
    image.region_mut(layout.block_bitmap).fill(0);
    set_at(image, Resource::Inodes, ROOT_INODE, ALLOCATED)?;
    set_at(image, Resource::Blocks, ROOT_BLOCK, ALLOCATED)?;
    Ok(())
}

pub fn alloc_inode_id(image: &mut Image) -> Result<u32> {
    set_first_fit(image, Resource::Inodes)
}

pub fn alloc_data_block(image: &mut Image) -> Result<u32> {
    set_first_fit(image, Resource::Blocks)
}

/// Releases an inode slot. No double-free detection: the caller must hold `ino`.
pub fn free_inode_id(image: &mut Image, ino: u32) -> Result<()> {
    if ino == ROOT_INODE {
        return Err(FsError::InvalidIndex { kind: Resource::Inodes, index: ino });
    }
    set_at(image, Resource::Inodes, ino, FREE)
}

/// Releases a data block. Same contract as `free_inode_id`.
pub fn free_data_block(image: &mut Image, block: u32) -> Result<()> {
    if block == ROOT_BLOCK {
        return Err(FsError::InvalidIndex { kind: Resource::Blocks, index: block });
    }
    set_at(image, Resource::Blocks, block, FREE)
}

pub fn is_allocated(image: &Image, kind: Resource, index: u32) -> Result<bool> {
    let offset = slot_offset(image, kind, index)?;
    Ok(image.word(offset) == ALLOCATED)
}

/// Number of slots still available for allocation.
pub fn count_free(image: &Image, kind: Resource) -> u32 {
    let (region, total) = map_of(image, kind);
    (1..total)
        .filter(|&i| image.word(region.start + i as usize * BITMAP_ENTRY_SIZE) == FREE)
        .count() as u32
}
