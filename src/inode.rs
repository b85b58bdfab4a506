//! Inode table: fixed-size records at `inode_table.start + ino * INODE_SIZE`.

use log::debug;

use crate::bitmap::*;
use crate::config::*;
use crate::error::{FsError, Resource, Result};
use crate::image::Image;
use crate::structs::Inode;

fn record_range(image: &Image, ino: u32) -> Result<core::ops::Range<usize>> {
    if ino >= image.num_inodes() {
        return Err(FsError::InvalidIndex { kind: Resource::Inodes, index: ino });
    }
    let start = image.layout().inode_offset(ino);
    Ok(start..start + INODE_SIZE)
}

/// Reads the record for `ino` whether or not it is allocated.
pub fn get_inode(image: &Image, ino: u32) -> Result<Inode> {
    let range = record_range(image, ino)?;
    Ok(Inode::decode(&image.as_bytes()[range]))
}

pub fn write_inode(image: &mut Image, ino: u32, inode: &Inode) -> Result<()> {
    let range = record_range(image, ino)?;
    let table = image.layout().inode_table;
    let buf = image.region_mut(table);
    inode.encode(&mut buf[range.start - table.start..range.end - table.start]);
    Ok(())
}

/// Reads `ino` and checks that it is in use.
/// Directory entries only ever point at allocated records, so a free one means
/// the entry is stale.
pub fn get_allocated(image: &Image, ino: u32) -> Result<Inode> {
    if ino == ROOT_INODE || !is_allocated(image, Resource::Inodes, ino)? {
        return Err(FsError::NotFound);
    }
    get_inode(image, ino)
}

/// Clears the allocated flag of every record.
pub(crate) fn init_inodes(image: &mut Image) -> Result<()> {
    for ino in 0..image.num_inodes() {
        let mut inode = get_inode(image, ino)?;
        inode.used = false;
        write_inode(image, ino, &inode)?;
    }
    Ok(())
}

/// Fills the record of a freshly allocated `ino` and gives it one zeroed data block.
/// On failure the record is left untouched.
pub fn populate(image: &mut Image, ino: u32, directory: bool) -> Result<Inode> {
    let block = alloc_data_block(image)?;
    image.block_mut(block)?.fill(0);

    let inode = Inode {
        used: true,
        id: rand::random::<u32>() % MAX_RANDOM_ID,
        size: 0,
        data: block,
        directory,
        links_cnt: if directory { DIR_LINKS } else { FILE_LINKS },
        last_accessed: 0,
        last_modified: 0,
    };
    if let Err(e) = write_inode(image, ino, &inode) {
        free_data_block(image, block)?;
        return Err(e);
    }
    debug!("inode {} -> block {} (directory: {})", ino, block, directory);
    Ok(inode)
}

/// Allocates an inode slot and populates it. Nothing stays allocated on failure.
pub fn alloc_inode(image: &mut Image, directory: bool) -> Result<(u32, Inode)> {
    let ino = alloc_inode_id(image)?;
    match populate(image, ino, directory) {
        Ok(inode) => Ok((ino, inode)),
        Err(e) => {
            free_inode_id(image, ino)?;
            Err(e)
        }
    }
}

/// Marks the record free and releases its slot and data block.
/// The record's other fields are left as they were.
pub fn free_inode(image: &mut Image, ino: u32) -> Result<()> {
    let mut inode = get_allocated(image, ino)?;
    inode.used = false;
    write_inode(image, ino, &inode)?;
    free_data_block(image, inode.data)?;
    free_inode_id(image, ino)?;
    debug!("released inode {} and block {}", ino, inode.data);
    Ok(())
}
