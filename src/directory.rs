//! Directory entry arrays. A directory owns one data block holding up to
//! `NUM_ENTRY_PER_BLOCK` entries, scanned from slot 0 to the first sentinel.

use log::debug;

use crate::config::*;
use crate::error::{FsError, Result};
use crate::image::Image;
use crate::structs::DirEntry;

fn entry_at(block: &[u8], slot: usize) -> DirEntry {
    let off = slot * DIR_ENTRY_SIZE;
    DirEntry::decode(&block[off..off + DIR_ENTRY_SIZE])
}

fn put_entry(block: &mut [u8], slot: usize, entry: &DirEntry) {
    let off = slot * DIR_ENTRY_SIZE;
    entry.encode(&mut block[off..off + DIR_ENTRY_SIZE]);
}

/// Live entries with their slots, in storage order, up to the sentinel.
fn live_entries(block: &[u8]) -> impl Iterator<Item = (usize, DirEntry)> + '_ {
    (0..NUM_ENTRY_PER_BLOCK)
        .map(move |slot| (slot, entry_at(block, slot)))
        .take_while(|(_, e)| !e.is_sentinel())
        .filter(|(_, e)| e.is_live())
}

/// Finds the first live entry named `name`.
pub fn dir_lookup(image: &Image, dir_block: u32, name: &str) -> Result<Option<DirEntry>> {
    let block = image.block(dir_block)?;
    Ok(live_entries(block).find(|(_, e)| e.name_eq(name)).map(|(_, e)| e))
}

/// Stores `entry` in the first hole or sentinel slot.
/// Does not check for duplicates; callers look the name up first.
pub fn dir_add_entry(image: &mut Image, dir_block: u32, entry: &DirEntry) -> Result<()> {
    let block = image.block_mut(dir_block)?;
    let slot = (0..NUM_ENTRY_PER_BLOCK)
        .find(|&slot| !entry_at(block, slot).is_live())
        .ok_or(FsError::DirectoryFull)?;
    put_entry(block, slot, entry);
    debug!("block {} slot {}: {} -> inode {}", dir_block, slot, entry.name(), entry.inode_id);
    Ok(())
}

/// Clears the name of the entry called `name`, leaving a hole.
/// Returns the inode number it pointed at.
pub fn dir_rm_entry(image: &mut Image, dir_block: u32, name: &str) -> Result<u32> {
    let block = image.block_mut(dir_block)?;
    let (slot, mut entry) = live_entries(block)
        .find(|(_, e)| e.name_eq(name))
        .ok_or(FsError::NotFound)?;
    entry.name = [0; MAX_NAME_LEN];
    put_entry(block, slot, &entry);
    Ok(entry.inode_id as u32)
}

pub fn dir_is_empty(image: &Image, dir_block: u32) -> Result<bool> {
    Ok(live_entries(image.block(dir_block)?).next().is_none())
}

pub fn read_dir(image: &Image, dir_block: u32) -> Result<Vec<DirEntry>> {
    Ok(live_entries(image.block(dir_block)?).map(|(_, e)| e).collect())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::layout::Layout;

    fn names(image: &Image, block: u32) -> Vec<String> {
        read_dir(image, block).unwrap().iter().map(|e| e.name()).collect()
    }

    #[test]
    fn test_add_and_lookup() {
        let mut image = Image::zeroed(Layout::STANDARD);
        dir_add_entry(&mut image, 2, &DirEntry::new(4, "a").unwrap()).unwrap();
        dir_add_entry(&mut image, 2, &DirEntry::new(5, "b").unwrap()).unwrap();
        assert_eq!(dir_lookup(&image, 2, "b").unwrap().unwrap().inode_id, 5);
        assert!(dir_lookup(&image, 2, "c").unwrap().is_none());
        assert_eq!(names(&image, 2), vec!["a", "b"]);
    }

    #[test]
    fn test_first_match_wins() {
        let mut image = Image::zeroed(Layout::STANDARD);
        dir_add_entry(&mut image, 1, &DirEntry::new(4, "dup").unwrap()).unwrap();
        dir_add_entry(&mut image, 1, &DirEntry::new(9, "dup").unwrap()).unwrap();
        assert_eq!(dir_lookup(&image, 1, "dup").unwrap().unwrap().inode_id, 4);
    }

    #[test]
    fn test_hole_is_skipped_and_reused() {
        let mut image = Image::zeroed(Layout::STANDARD);
        for (i, n) in ["a", "b", "c"].iter().enumerate() {
            dir_add_entry(&mut image, 1, &DirEntry::new(i as u32 + 1, n).unwrap()).unwrap();
        }
        assert_eq!(dir_rm_entry(&mut image, 1, "b").unwrap(), 2);
        // The scan must go past the hole to reach "c".
        assert_eq!(dir_lookup(&image, 1, "c").unwrap().unwrap().inode_id, 3);
        assert_eq!(names(&image, 1), vec!["a", "c"]);

        dir_add_entry(&mut image, 1, &DirEntry::new(7, "d").unwrap()).unwrap();
        assert_eq!(names(&image, 1), vec!["a", "d", "c"]);
    }

    #[test]
    fn test_remove_missing() {
        let mut image = Image::zeroed(Layout::STANDARD);
        assert!(matches!(dir_rm_entry(&mut image, 1, "x"), Err(FsError::NotFound)));
        assert!(dir_is_empty(&image, 1).unwrap());
    }

    #[test]
    fn test_directory_full() {
        let mut image = Image::zeroed(Layout::STANDARD);
        for i in 0..NUM_ENTRY_PER_BLOCK {
            let name = format!("f{}", i);
            dir_add_entry(&mut image, 3, &DirEntry::new(1, &name).unwrap()).unwrap();
        }
        assert!(matches!(
            dir_add_entry(&mut image, 3, &DirEntry::new(1, "extra").unwrap()),
            Err(FsError::DirectoryFull)
        ));
        assert_eq!(read_dir(&image, 3).unwrap().len(), NUM_ENTRY_PER_BLOCK);
        assert!(!dir_is_empty(&image, 3).unwrap());
    }
}
