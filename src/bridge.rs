//! Entry points for a filesystem-bridge dispatcher.
//! Every call takes a slash-rooted path and reports failure as a negative errno.
//! Calls take `&mut self`, so a dispatcher must serialize them.

use log::warn;

use crate::error::FsError;
use crate::fs::{Attr, FileSystem};
use crate::store::BackingStore;

pub type BridgeResult<T> = core::result::Result<T, i32>;

fn to_errno(op: &str, path: &str, e: FsError) -> i32 {
    warn!("{} {}: {}", op, path, e);
    -e.errno()
}

pub struct Bridge<S: BackingStore> {
    fs: FileSystem<S>,
}

impl<S: BackingStore> Bridge<S> {
    pub fn new(fs: FileSystem<S>) -> Self {
        Bridge { fs }
    }

    pub fn fs(&self) -> &FileSystem<S> {
        &self.fs
    }

    pub fn into_inner(self) -> FileSystem<S> {
        self.fs
    }

    pub fn getattr(&self, path: &str) -> BridgeResult<Attr> {
        self.fs.attributes(path).map_err(|e| to_errno("getattr", path, e))
    }

    /// Directory listing, led by `.` and `..`.
    pub fn readdir(&self, path: &str) -> BridgeResult<Vec<String>> {
        let names = self.fs.list(path).map_err(|e| to_errno("readdir", path, e))?;
        let mut out = Vec::with_capacity(names.len() + 2);
        out.push(".".to_string());
        out.push("..".to_string());
        out.extend(names);
        Ok(out)
    }

    pub fn mkdir(&mut self, path: &str) -> BridgeResult<()> {
        self.fs.mkdir(path).map(|_| ()).map_err(|e| to_errno("mkdir", path, e))
    }

    pub fn rmdir(&mut self, path: &str) -> BridgeResult<()> {
        self.fs.rmdir(path).map_err(|e| to_errno("rmdir", path, e))
    }

    pub fn create(&mut self, path: &str) -> BridgeResult<()> {
        self.fs.create(path).map(|_| ()).map_err(|e| to_errno("create", path, e))
    }

    /// Validates that `path` resolves to a file. No handle is kept.
    pub fn open(&self, path: &str) -> BridgeResult<()> {
        self.fs.open_file(path).map(|_| ()).map_err(|e| to_errno("open", path, e))
    }

    pub fn read(&self, path: &str, buf: &mut [u8], offset: usize) -> BridgeResult<usize> {
        self.fs.read(path, offset, buf).map_err(|e| to_errno("read", path, e))
    }

    pub fn write(&mut self, path: &str, buf: &[u8], offset: usize) -> BridgeResult<usize> {
        self.fs.write(path, offset, buf).map_err(|e| to_errno("write", path, e))
    }

    pub fn unlink(&mut self, path: &str) -> BridgeResult<()> {
        self.fs.unlink(path).map_err(|e| to_errno("unlink", path, e))
    }
}
