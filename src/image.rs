//! The in-memory image and its persistence.
//! Every other module works on offsets into the one buffer owned here;
//! nothing keeps a copy of on-disk state.

use log::{debug, info, warn};

use crate::config::*;
use crate::error::{FsError, Resource, Result};
use crate::layout::{Layout, Region};
use crate::store::BackingStore;

pub struct Image {
    bytes: Box<[u8]>,
    layout: Layout,
}

impl Image {
    /// A zero-filled image of `layout.total_size()` bytes.
    pub fn zeroed(layout: Layout) -> Self {
        Image {
            bytes: vec![0u8; layout.total_size()].into_boxed_slice(),
            layout,
        }
    }

    /// Reads a whole image from `store`.
    /// Returns `None` if the store is empty, and fails with `FormatMismatch`
    /// if its length is not exactly one image.
    pub fn load(store: &impl BackingStore, layout: Layout) -> Result<Option<Self>> {
        let found = store.len()?;
        if found == 0 {
            return Ok(None);
        }
        let expected = layout.total_size() as u64;
        if found != expected {
            warn!("refusing to load image: store holds {} bytes, expected {}", found, expected);
            return Err(FsError::FormatMismatch { expected, found });
        }
        let mut image = Image::zeroed(layout);
        store.read_image(&mut image.bytes)?;
        info!("restored {} byte image", found);
        Ok(Some(image))
    }

    /// Rewrites the whole image to `store`.
    pub fn flush(&self, store: &impl BackingStore) -> Result<()> {
        store.write_image(&self.bytes)?;
        debug!("flushed {} bytes", self.bytes.len());
        Ok(())
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn region(&self, region: Region) -> &[u8] {
        &self.bytes[region.start..region.end()]
    }

    pub fn region_mut(&mut self, region: Region) -> &mut [u8] {
        &mut self.bytes[region.start..region.end()]
    }

    pub fn num_inodes(&self) -> u32 {
        self.layout.num_inodes as u32
    }

    pub fn num_blocks(&self) -> u32 {
        self.layout.num_data_blocks as u32
    }

    fn check_block(&self, block: u32) -> Result<usize> {
        if block >= self.num_blocks() {
            return Err(FsError::InvalidIndex { kind: Resource::Blocks, index: block });
        }
        Ok(self.layout.block_offset(block))
    }

    /// The data block at `block`, `BLOCK_SIZE` bytes.
    pub fn block(&self, block: u32) -> Result<&[u8]> {
        let start = self.check_block(block)?;
        Ok(&self.bytes[start..start + BLOCK_SIZE])
    }

    pub fn block_mut(&mut self, block: u32) -> Result<&mut [u8]> {
        let start = self.check_block(block)?;
        Ok(&mut self.bytes[start..start + BLOCK_SIZE])
    }

    /// Little-endian word at an absolute byte offset.
    pub(crate) fn word(&self, offset: usize) -> u32 {
        let mut b = [0u8; BITMAP_ENTRY_SIZE];
        b.copy_from_slice(&self.bytes[offset..offset + BITMAP_ENTRY_SIZE]);
        u32::from_le_bytes(b)
    }

    pub(crate) fn set_word(&mut self, offset: usize, value: u32) {
        self.bytes[offset..offset + BITMAP_ENTRY_SIZE].copy_from_slice(&value.to_le_bytes());
    }
}

impl core::fmt::Debug for Image {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Image")
            .field("len", &self.bytes.len())
            .field("layout", &self.layout)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Mutex;

    struct VecStore(Mutex<Vec<u8>>);

    impl BackingStore for VecStore {
        fn len(&self) -> Result<u64> {
            Ok(self.0.lock().unwrap().len() as u64)
        }

        fn read_image(&self, buf: &mut [u8]) -> Result<()> {
            buf.copy_from_slice(&self.0.lock().unwrap()[..buf.len()]);
            Ok(())
        }

        fn write_image(&self, buf: &[u8]) -> Result<()> {
            *self.0.lock().unwrap() = buf.to_vec();
            Ok(())
        }
    }

    #[test]
    fn test_empty_store_loads_nothing() {
        let store = VecStore(Mutex::new(Vec::new()));
        assert!(Image::load(&store, Layout::STANDARD).unwrap().is_none());
    }

    #[test]
    fn test_flush_then_load() {
        let store = VecStore(Mutex::new(Vec::new()));
        let mut image = Image::zeroed(Layout::STANDARD);
        image.block_mut(4).unwrap()[..3].copy_from_slice(b"abc");
        image.set_word(8, 0xdead_beef);
        image.flush(&store).unwrap();

        let loaded = Image::load(&store, Layout::STANDARD).unwrap().unwrap();
        assert_eq!(loaded.as_bytes(), image.as_bytes());
        assert_eq!(loaded.word(8), 0xdead_beef);
    }

    #[test]
    fn test_length_mismatch() {
        let store = VecStore(Mutex::new(vec![0u8; 4096]));
        let err = Image::load(&store, Layout::STANDARD).unwrap_err();
        assert!(matches!(err, FsError::FormatMismatch { found: 4096, .. }));
    }

    #[test]
    fn test_block_bounds() {
        let image = Image::zeroed(Layout::STANDARD);
        assert_eq!(image.block(NUM_DATA_BLOCKS as u32 - 1).unwrap().len(), BLOCK_SIZE);
        assert!(matches!(
            image.block(NUM_DATA_BLOCKS as u32),
            Err(FsError::InvalidIndex { kind: Resource::Blocks, .. })
        ));
    }
}
