use log::{debug, info};

use crate::bitmap::{count_free, init_bitmaps};
use crate::config::*;
use crate::directory::{dir_add_entry, dir_is_empty, dir_lookup, dir_rm_entry, read_dir};
use crate::error::{FsError, Resource, Result};
use crate::file::{fread, fwrite};
use crate::image::Image;
use crate::inode::{alloc_inode, free_inode, get_allocated, init_inodes, write_inode};
use crate::layout::Layout;
use crate::path::{classify, dir_block_of, resolve, split};
use crate::store::BackingStore;
use crate::structs::{DirEntry, FileType, Inode};

/// Attributes reported for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr {
    pub ino: u32,
    pub kind: FileType,
    pub mode: u32,
    pub nlink: u32,
    pub size: u64,
    pub blocks: u64,
    pub atime: u32,
    pub mtime: u32,
}

/// A mounted image together with the store it is flushed to.
/// Every mutating call rewrites the whole image before returning.
#[derive(Debug)]
pub struct FileSystem<S: BackingStore> {
    store: S,
    image: Image,
}

impl<S: BackingStore> FileSystem<S> {
    /// Restores the image held by `store`, or formats a new one if it is empty.
    pub fn open(store: S) -> Result<Self> {
        match Image::load(&store, Layout::STANDARD)? {
            Some(image) => Ok(Self { store, image }),
            None => Self::format(store),
        }
    }

    /// Builds a fresh image with a welcome file in the root and writes it out.
    pub fn format(store: S) -> Result<Self> {
        let mut image = Image::zeroed(Layout::STANDARD);
        init_bitmaps(&mut image)?;
        init_inodes(&mut image)?;

        let (ino, mut inode) = alloc_inode(&mut image, false)?;
        inode.id = WELCOME_ID;
        fwrite(&mut image, &mut inode, 0, WELCOME_TEXT)?;
        inode.last_modified = 0;
        write_inode(&mut image, ino, &inode)?;
        dir_add_entry(&mut image, ROOT_BLOCK, &DirEntry::new(ino, WELCOME_NAME)?)?;

        image.flush(&store)?;
        info!("formatted {} byte image", image.as_bytes().len());
        Ok(Self { store, image })
    }

    pub fn flush(&self) -> Result<()> {
        self.image.flush(&self.store)
    }

    /// Inode number of `path`.
    pub fn lookup(&self, path: &str) -> Result<u32> {
        resolve(&self.image, path)
    }

    pub fn classify(&self, path: &str) -> Result<FileType> {
        classify(&self.image, path)
    }

    /// Copy of an allocated inode record.
    pub fn get_inode(&self, ino: u32) -> Result<Inode> {
        get_allocated(&self.image, ino)
    }

    pub fn attributes(&self, path: &str) -> Result<Attr> {
        let ino = resolve(&self.image, path)?;
        if ino == ROOT_INODE {
            return Ok(Attr {
                ino,
                kind: FileType::Directory,
                mode: DIR_MODE,
                nlink: DIR_LINKS,
                size: 0,
                blocks: 0,
                atime: 0,
                mtime: 0,
            });
        }
        let inode = get_allocated(&self.image, ino)?;
        let (mode, nlink, size) = match inode.ftype() {
            FileType::Directory => (DIR_MODE, DIR_LINKS, 0),
            FileType::Regular => (FILE_MODE, FILE_LINKS, inode.size),
        };
        Ok(Attr {
            ino,
            kind: inode.ftype(),
            mode,
            nlink,
            size,
            blocks: (size + 512) / 512,
            atime: inode.last_accessed,
            mtime: inode.last_modified,
        })
    }

    /// Names in the directory at `path`, in storage order.
    pub fn list(&self, path: &str) -> Result<Vec<String>> {
        let ino = resolve(&self.image, path)?;
        let block = dir_block_of(&self.image, ino)?;
        Ok(read_dir(&self.image, block)?.iter().map(DirEntry::name).collect())
    }

    pub fn mkdir(&mut self, path: &str) -> Result<u32> {
        self.create_entry(path, true)
    }

    pub fn create(&mut self, path: &str) -> Result<u32> {
        self.create_entry(path, false)
    }

    fn create_entry(&mut self, path: &str, directory: bool) -> Result<u32> {
        let (parent, name) = split(path)?;
        if !directory && path.ends_with('/') {
            return Err(FsError::NotADirectory);
        }
        // Rejects bad names before anything is allocated.
        DirEntry::new(ROOT_INODE, name)?;
        let parent_block = dir_block_of(&self.image, resolve(&self.image, parent)?)?;
        if dir_lookup(&self.image, parent_block, name)?.is_some() {
            return Err(FsError::AlreadyExists);
        }

        let (ino, _) = alloc_inode(&mut self.image, directory)?;
        let added = DirEntry::new(ino, name)
            .and_then(|entry| dir_add_entry(&mut self.image, parent_block, &entry));
        if let Err(e) = added {
            free_inode(&mut self.image, ino)?;
            return Err(e);
        }

        debug!("created {} as inode {}", path, ino);
        self.flush()?;
        Ok(ino)
    }

    /// Removes an empty directory.
    pub fn rmdir(&mut self, path: &str) -> Result<()> {
        let (parent, name) = split(path)?;
        let parent_block = dir_block_of(&self.image, resolve(&self.image, parent)?)?;
        let entry = dir_lookup(&self.image, parent_block, name)?.ok_or(FsError::NotFound)?;
        let ino = entry.inode_id as u32;
        let block = dir_block_of(&self.image, ino)?;
        if !dir_is_empty(&self.image, block)? {
            return Err(FsError::NotEmpty);
        }
        self.remove_entry(parent_block, name, ino)
    }

    /// Removes a regular file.
    pub fn unlink(&mut self, path: &str) -> Result<()> {
        let (parent, name) = split(path)?;
        let parent_block = dir_block_of(&self.image, resolve(&self.image, parent)?)?;
        let entry = dir_lookup(&self.image, parent_block, name)?.ok_or(FsError::NotFound)?;
        let ino = entry.inode_id as u32;
        if get_allocated(&self.image, ino)?.directory {
            return Err(FsError::IsADirectory);
        }
        self.remove_entry(parent_block, name, ino)
    }

    fn remove_entry(&mut self, parent_block: u32, name: &str, ino: u32) -> Result<()> {
        dir_rm_entry(&mut self.image, parent_block, name)?;
        free_inode(&mut self.image, ino)?;
        debug!("removed {} (inode {})", name, ino);
        self.flush()
    }

    /// Checks that `path` names a regular file. File handles are not tracked.
    pub fn open_file(&self, path: &str) -> Result<u32> {
        let ino = resolve(&self.image, path)?;
        if ino == ROOT_INODE || get_allocated(&self.image, ino)?.directory {
            return Err(FsError::IsADirectory);
        }
        Ok(ino)
    }

    pub fn read(&self, path: &str, offset: usize, buf: &mut [u8]) -> Result<usize> {
        let ino = self.open_file(path)?;
        let inode = get_allocated(&self.image, ino)?;
        fread(&self.image, &inode, offset, buf)
    }

    pub fn write(&mut self, path: &str, offset: usize, buf: &[u8]) -> Result<usize> {
        let ino = self.open_file(path)?;
        let mut inode = get_allocated(&self.image, ino)?;
        let written = fwrite(&mut self.image, &mut inode, offset, buf)?;
        write_inode(&mut self.image, ino, &inode)?;
        self.flush()?;
        Ok(written)
    }

    pub fn free_inodes(&self) -> u32 {
        count_free(&self.image, Resource::Inodes)
    }

    pub fn free_blocks(&self) -> u32 {
        count_free(&self.image, Resource::Blocks)
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn dump(&self) -> String {
        let l = self.image.layout();
        format!(
            "image {} bytes | inode bitmap @{} inode table @{} block bitmap @{} data @{} | \
             free inodes {}/{} free blocks {}/{}",
            l.total_size(),
            l.inode_bitmap.start,
            l.inode_table.start,
            l.block_bitmap.start,
            l.data.start,
            self.free_inodes(),
            l.num_inodes,
            self.free_blocks(),
            l.num_data_blocks,
        )
    }
}
