//! On-disk records. Both are packed little-endian with no padding.

use crate::config::*;
use crate::error::{FsError, Resource, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Regular,
    Directory,
}

/// Inode record, `INODE_SIZE` bytes:
/// used(1) id(4) size(8) data(4) directory(1) links(4) atime(4) mtime(4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Inode {
    pub used: bool,
    pub id: u32,
    pub size: u64,
    pub data: u32, // Index into the data block region
    pub directory: bool,
    pub links_cnt: u32,
    pub last_accessed: u32,
    pub last_modified: u32,
}

fn u32_at(buf: &[u8], at: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&buf[at..at + 4]);
    u32::from_le_bytes(b)
}

fn u64_at(buf: &[u8], at: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&buf[at..at + 8]);
    u64::from_le_bytes(b)
}

impl Inode {
    pub fn ftype(&self) -> FileType {
        if self.directory {
            FileType::Directory
        } else {
            FileType::Regular
        }
    }

    pub fn decode(buf: &[u8]) -> Self {
        Inode {
            used: buf[0] != 0,
            id: u32_at(buf, 1),
            size: u64_at(buf, 5),
            data: u32_at(buf, 13),
            directory: buf[17] != 0,
            links_cnt: u32_at(buf, 18),
            last_accessed: u32_at(buf, 22),
            last_modified: u32_at(buf, 26),
        }
    }

    pub fn encode(&self, buf: &mut [u8]) {
        buf[0] = self.used as u8;
        buf[1..5].copy_from_slice(&self.id.to_le_bytes());
        buf[5..13].copy_from_slice(&self.size.to_le_bytes());
        buf[13..17].copy_from_slice(&self.data.to_le_bytes());
        buf[17] = self.directory as u8;
        buf[18..22].copy_from_slice(&self.links_cnt.to_le_bytes());
        buf[22..26].copy_from_slice(&self.last_accessed.to_le_bytes());
        buf[26..30].copy_from_slice(&self.last_modified.to_le_bytes());
    }
}

/// Directory entry, `DIR_ENTRY_SIZE` bytes: NUL-padded name then a u16 inode number.
/// An empty name with inode 0 ends the directory, an empty name with a
/// non-zero inode is a hole left by removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    pub name: [u8; MAX_NAME_LEN],
    pub inode_id: u16,
}

impl DirEntry {
    pub const NULL: Self = Self {
        name: [0; MAX_NAME_LEN],
        inode_id: 0,
    };

    pub fn new(inode_id: u32, name: &str) -> Result<Self> {
        let bytes = name.as_bytes();
        if matches!(bytes, b"" | b"." | b"..") || bytes.contains(&b'/') || bytes.contains(&0) {
            return Err(FsError::InvalidPath);
        }
        if bytes.len() > MAX_NAME_LEN {
            return Err(FsError::NameTooLong);
        }
        let inode_id =
            u16::try_from(inode_id).map_err(|_| FsError::ResourceExhausted(Resource::Inodes))?;
        let mut arr = [0; MAX_NAME_LEN];
        arr[..bytes.len()].copy_from_slice(bytes);
        Ok(Self { name: arr, inode_id })
    }

    pub fn decode(buf: &[u8]) -> Self {
        let mut name = [0; MAX_NAME_LEN];
        name.copy_from_slice(&buf[..MAX_NAME_LEN]);
        let inode_id = u16::from_le_bytes([buf[MAX_NAME_LEN], buf[MAX_NAME_LEN + 1]]);
        Self { name, inode_id }
    }

    pub fn encode(&self, buf: &mut [u8]) {
        buf[..MAX_NAME_LEN].copy_from_slice(&self.name);
        buf[MAX_NAME_LEN..DIR_ENTRY_SIZE].copy_from_slice(&self.inode_id.to_le_bytes());
    }

    /// Name bytes without the padding.
    pub fn name_bytes(&self) -> &[u8] {
        let end = self.name.iter().position(|&c| c == 0).unwrap_or(MAX_NAME_LEN);
        &self.name[..end]
    }

    pub fn name(&self) -> String {
        String::from_utf8_lossy(self.name_bytes()).into_owned()
    }

    pub fn name_eq(&self, name: &str) -> bool {
        !name.is_empty() && self.name_bytes() == name.as_bytes()
    }

    pub fn is_sentinel(&self) -> bool {
        self.name[0] == 0 && self.inode_id == 0
    }

    pub fn is_hole(&self) -> bool {
        self.name[0] == 0 && self.inode_id != 0
    }

    pub fn is_live(&self) -> bool {
        self.name[0] != 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_inode_layout() {
        let inode = Inode {
            used: true,
            id: 0x0102_0304,
            size: 30,
            data: 7,
            directory: false,
            links_cnt: 1,
            last_accessed: 0,
            last_modified: 0xAABB_CCDD,
        };
        let mut buf = [0u8; INODE_SIZE];
        inode.encode(&mut buf);
        assert_eq!(buf[0], 1);
        assert_eq!(&buf[1..5], &[4, 3, 2, 1]);
        assert_eq!(buf[5], 30);
        assert_eq!(buf[13], 7);
        assert_eq!(buf[17], 0);
        assert_eq!(&buf[26..30], &[0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(Inode::decode(&buf), inode);
    }

    #[test]
    fn test_dir_entry_names() {
        assert!(DirEntry::new(3, "abcdefghijklmn").is_ok());
        assert!(matches!(DirEntry::new(3, "abcdefghijklmno"), Err(FsError::NameTooLong)));
        assert!(matches!(DirEntry::new(3, ""), Err(FsError::InvalidPath)));
        assert!(matches!(DirEntry::new(3, "a/b"), Err(FsError::InvalidPath)));
        assert!(matches!(DirEntry::new(3, "."), Err(FsError::InvalidPath)));
        assert!(matches!(DirEntry::new(3, ".."), Err(FsError::InvalidPath)));
        assert!(DirEntry::new(3, "...").is_ok());

        let e = DirEntry::new(3, "readme").unwrap();
        assert!(e.name_eq("readme"));
        assert!(!e.name_eq("read"));
        assert!(!e.name_eq("readme2"));
        assert!(e.is_live());
    }

    #[test]
    fn test_sentinel_and_hole() {
        assert!(DirEntry::NULL.is_sentinel());
        let mut e = DirEntry::new(5, "gone").unwrap();
        e.name = [0; MAX_NAME_LEN];
        assert!(e.is_hole());
        assert!(!e.is_sentinel());
        assert!(!e.is_live());
    }
}
