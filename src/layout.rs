//! Byte offsets of the four on-disk regions.
//! Regions are contiguous and block aligned, in this order:
//! inode bitmap, inode table, block bitmap, data blocks.

use crate::config::*;

const fn blocks_for(bytes: usize) -> usize {
    (bytes + BLOCK_SIZE - 1) / BLOCK_SIZE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    pub len: usize,
}

impl Region {
    pub const fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub num_inodes: usize,
    pub num_data_blocks: usize,
    pub inode_bitmap: Region,
    pub inode_table: Region,
    pub block_bitmap: Region,
    pub data: Region,
}

impl Layout {
    /// Layout derived from the compiled constants.
    pub const STANDARD: Layout = Layout::compute(NUM_INODES, NUM_DATA_BLOCKS);

    pub const fn compute(num_inodes: usize, num_data_blocks: usize) -> Self {
        let inode_bitmap = Region {
            start: 0,
            len: blocks_for(num_inodes * BITMAP_ENTRY_SIZE) * BLOCK_SIZE,
        };
        let inode_table = Region {
            start: inode_bitmap.end(),
            len: blocks_for(num_inodes * INODE_SIZE) * BLOCK_SIZE,
        };
        let block_bitmap = Region {
            start: inode_table.end(),
            len: blocks_for(num_data_blocks * BITMAP_ENTRY_SIZE) * BLOCK_SIZE,
        };
        let data = Region {
            start: block_bitmap.end(),
            len: num_data_blocks * BLOCK_SIZE,
        };
        Layout {
            num_inodes,
            num_data_blocks,
            inode_bitmap,
            inode_table,
            block_bitmap,
            data,
        }
    }

    /// Total image size in bytes.
    pub const fn total_size(&self) -> usize {
        self.data.end()
    }

    pub const fn inode_offset(&self, ino: u32) -> usize {
        self.inode_table.start + ino as usize * INODE_SIZE
    }

    pub const fn block_offset(&self, block: u32) -> usize {
        self.data.start + block as usize * BLOCK_SIZE
    }
}
