//! imgfs keeps a whole hierarchical filesystem in one flat image file.
//! For simplicity, every file and directory owns exactly one data block,
//! and the whole image is rewritten after each mutation.
//!
//! Image layout, in block-aligned regions:
//! - Inode Bitmap
//! - Inode Table
//! - Block Bitmap
//! - Data Blocks (block 0 holds the root directory)
//!
//! Layers (from bottom to top):
//! 1. Store: the backing file the image is loaded from and flushed to.
//! 2. Image: the single owned buffer plus region offsets.
//! 3. Bitmap/Inode: allocation and fixed-size metadata records.
//! 4. Directory/Path: entry arrays and path resolution.
//! 5. File: byte-range access inside a file's block.
//! 6. FileSystem/Bridge: the operations a host dispatcher calls.

mod config;
mod error;
mod layout;
mod store;
mod structs;
mod image;
mod bitmap;
mod inode;
mod directory;
mod path;
mod file;
mod fs;
mod bridge;
pub mod logging;

pub use config::*;
pub use error::{FsError as Error, Resource, Result};
pub use layout::{Layout, Region};
pub use store::{BackingStore, FileStore};
pub use structs::*;
pub use image::Image;
pub use bitmap::{alloc_data_block, alloc_inode_id, count_free, free_data_block, free_inode_id, is_allocated};
pub use inode::{alloc_inode, free_inode, get_allocated, get_inode, populate, write_inode};
pub use directory::*;
pub use path::*;
pub use file::*;
pub use fs::*;
pub use bridge::*;
