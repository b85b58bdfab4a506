use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::error::Result;

/// The object an image is loaded from and flushed to.
/// Its length is either 0 (fresh) or exactly one image.
pub trait BackingStore: Send + Sync {
    /// Returns the current length of the store in bytes.
    fn len(&self) -> Result<u64>;

    /// Reads `buf.len()` bytes starting at offset 0.
    fn read_image(&self, buf: &mut [u8]) -> Result<()>;

    /// Rewrites the store from offset 0 with `buf`.
    fn write_image(&self, buf: &[u8]) -> Result<()>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// A host file holding the image.
pub struct FileStore {
    inner: Mutex<File>,
}

impl FileStore {
    /// Opens `path` read-write, creating an empty file if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        Ok(FileStore { inner: Mutex::new(file) })
    }

    fn file(&self) -> std::sync::MutexGuard<'_, File> {
        // A poisoned lock still guards a valid handle.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BackingStore for FileStore {
    fn len(&self) -> Result<u64> {
        Ok(self.file().metadata()?.len())
    }

    fn read_image(&self, buf: &mut [u8]) -> Result<()> {
        let mut file = self.file();
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(buf)?;
        Ok(())
    }

    fn write_image(&self, buf: &[u8]) -> Result<()> {
        let mut file = self.file();
        file.seek(SeekFrom::Start(0))?;
        file.write_all(buf)?;
        file.flush()?;
        Ok(())
    }
}

impl<T: BackingStore + ?Sized> BackingStore for std::sync::Arc<T> {
    fn len(&self) -> Result<u64> {
        (**self).len()
    }

    fn read_image(&self, buf: &mut [u8]) -> Result<()> {
        (**self).read_image(buf)
    }

    fn write_image(&self, buf: &[u8]) -> Result<()> {
        (**self).write_image(buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("img")).unwrap();
        assert!(store.is_empty().unwrap());

        store.write_image(b"0123456789").unwrap();
        assert_eq!(store.len().unwrap(), 10);
        store.write_image(b"abc").unwrap();
        // Rewrites start at 0 and never shrink the file.
        let mut buf = [0u8; 10];
        store.read_image(&mut buf).unwrap();
        assert_eq!(&buf, b"abc3456789");
    }
}
