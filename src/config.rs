pub const BLOCK_SIZE: usize = 4096;
pub const NUM_INODES: usize = 100;
pub const BLOCKS_PER_INODE: usize = 1;
pub const NUM_DATA_BLOCKS: usize = NUM_INODES * BLOCKS_PER_INODE;

pub const INODE_SIZE: usize = 30; // Packed inode record, see structs::Inode
pub const BITMAP_ENTRY_SIZE: usize = 4; // One u32 word per slot

pub const ROOT_INODE: u32 = 0; // Reserved slot, the root has no inode record
pub const ROOT_BLOCK: u32 = 0; // Data block holding the root directory

pub const MAX_NAME_LEN: usize = 14; // Visible characters in a directory entry name
pub const DIR_ENTRY_SIZE: usize = 16; // Name field + inode number
pub const NUM_ENTRY_PER_BLOCK: usize = BLOCK_SIZE / DIR_ENTRY_SIZE;

pub const DIR_LINKS: u32 = 2;
pub const FILE_LINKS: u32 = 1;
pub const DIR_MODE: u32 = libc::S_IFDIR as u32 | 0o777;
pub const FILE_MODE: u32 = libc::S_IFREG as u32 | 0o666;

pub const WELCOME_NAME: &str = "Welcome";
pub const WELCOME_TEXT: &[u8] = b"Welcome To Our File System!!!\n";
pub const WELCOME_ID: u32 = 1;
pub const MAX_RANDOM_ID: u32 = 5000; // Diagnostic identifiers are drawn from 0..MAX_RANDOM_ID

pub const DEFAULT_IMAGE_PATH: &str = "MyFileSystem";
