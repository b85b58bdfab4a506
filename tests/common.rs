//! Common utilities for tests
#![allow(unused)]

use std::sync::{Arc, Mutex};

use imgfs::{BackingStore, Error, FileSystem, Result};

pub const ORANGE: &str = "\x1b[38;5;214m";
pub const RESET: &str = "\x1b[0m";

/// Provides a macro for logging messages during tests.
/// e.g. log!("placeholder") -> println!("[test] placeholder");
#[macro_export]
macro_rules! log {
    ($msg:expr) => {
        println!("{}[test] {}{}", crate::common::ORANGE, $msg, crate::common::RESET)
    };
    ($msg:expr, $($arg:tt)*) => {
        println!("{}[test] {}{}", crate::common::ORANGE, format!($msg, $($arg)*), crate::common::RESET)
    };
}

/// In-memory backing store. Clones share the same bytes, so a test can
/// reopen what a dropped file system flushed.
#[derive(Debug, Clone, Default)]
pub struct RamStore {
    inner: Arc<Mutex<Vec<u8>>>,
    writes: Arc<Mutex<usize>>,
}

impl RamStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        RamStore {
            inner: Arc::new(Mutex::new(bytes)),
            writes: Arc::default(),
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.inner.lock().unwrap().clone()
    }

    /// Number of whole-image rewrites so far.
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl BackingStore for RamStore {
    fn len(&self) -> Result<u64> {
        Ok(self.inner.lock().unwrap().len() as u64)
    }

    fn read_image(&self, buf: &mut [u8]) -> Result<()> {
        let data = self.inner.lock().unwrap();
        buf.copy_from_slice(&data[..buf.len()]);
        Ok(())
    }

    fn write_image(&self, buf: &[u8]) -> Result<()> {
        let mut data = self.inner.lock().unwrap();
        if data.len() < buf.len() {
            data.resize(buf.len(), 0);
        }
        data[..buf.len()].copy_from_slice(buf);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

/// A freshly formatted file system and a handle on its store.
pub fn fresh() -> (FileSystem<RamStore>, RamStore) {
    let store = RamStore::new();
    let fs = FileSystem::open(store.clone()).unwrap();
    (fs, store)
}
