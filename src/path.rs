//! Path resolution and manipulation utilities.

use log::debug;

use crate::config::*;
use crate::directory::dir_lookup;
use crate::error::{FsError, Result};
use crate::image::Image;
use crate::inode::get_allocated;
use crate::structs::FileType;

fn components(path: &str) -> Result<impl Iterator<Item = &str>> {
    if !path.starts_with('/') {
        return Err(FsError::InvalidPath);
    }
    Ok(path.split('/').filter(|s| !s.is_empty()))
}

/// Splits a path into its parent path and final component.
/// `"/docs/readme"` gives `("/docs", "readme")`, `"/a"` gives `("/", "a")`.
pub fn split(path: &str) -> Result<(&str, &str)> {
    if !path.starts_with('/') {
        return Err(FsError::InvalidPath);
    }
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(0) if trimmed.len() > 1 => Ok(("/", &trimmed[1..])),
        Some(i) if i + 1 < trimmed.len() => Ok((&trimmed[..i], &trimmed[i + 1..])),
        _ => Err(FsError::InvalidPath),
    }
}

/// Data block holding the entries of directory `ino`.
pub fn dir_block_of(image: &Image, ino: u32) -> Result<u32> {
    if ino == ROOT_INODE {
        return Ok(ROOT_BLOCK);
    }
    let inode = get_allocated(image, ino)?;
    if !inode.directory {
        return Err(FsError::NotADirectory);
    }
    Ok(inode.data)
}

/// Resolves a path to an inode number.
/// Never mutates the image. Intermediate components must be directories,
/// and so must the last one when the path ends in `/`.
pub fn resolve(image: &Image, path: &str) -> Result<u32> {
    let mut parts = components(path)?.peekable();
    let mut current_ino = ROOT_INODE;
    let mut current_block = ROOT_BLOCK;

    while let Some(name) = parts.next() {
        let entry = dir_lookup(image, current_block, name)?.ok_or(FsError::NotFound)?;
        current_ino = entry.inode_id as u32;
        if parts.peek().is_some() {
            current_block = dir_block_of(image, current_ino)?;
        }
    }
    if path.len() > 1 && path.ends_with('/') {
        dir_block_of(image, current_ino)?;
    }
    debug!("resolved {} -> inode {}", path, current_ino);
    Ok(current_ino)
}

/// Kind of the entry at `path`. The root is always a directory.
pub fn classify(image: &Image, path: &str) -> Result<FileType> {
    let ino = resolve(image, path)?;
    if ino == ROOT_INODE {
        return Ok(FileType::Directory);
    }
    Ok(get_allocated(image, ino)?.ftype())
}
