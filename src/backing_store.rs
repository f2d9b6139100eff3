use crate::error::{Error, Result};
use crate::{FrameData, SIZE_FRAME, SIZE_STORE, SIZE_TABLE};
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// The `BackingStore` holds the canonical content of every logical page. It is read once at
/// startup from a fixed-size image and never written afterwards. Conceptually this is the disk or
/// swap space pages are demand-loaded from.
#[derive(Debug)]
pub struct BackingStore {
    pages: Vec<FrameData>,
}

impl BackingStore {
    /// Load the image at `path`, seeking to each page in turn and reading it into its own buffer.
    ///
    /// # Errors
    ///
    /// Fails with `Error::BackingStore` if the file is missing or its length is not exactly one
    /// image.
    pub fn build(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| Error::BackingStore(format!("cannot open {}: {}", path.display(), e)))?;
        let size_bytes = file.metadata()?.len();
        if size_bytes != SIZE_STORE as u64 {
            return Err(Error::BackingStore(format!(
                "{} holds {} bytes, expected {}",
                path.display(),
                size_bytes,
                SIZE_STORE
            )));
        }

        let mut reader = BufReader::new(file);
        let mut pages = vec![[0u8; SIZE_FRAME]; SIZE_TABLE];
        for (seek_multiplier, page) in pages.iter_mut().enumerate() {
            reader.seek(SeekFrom::Start((SIZE_FRAME * seek_multiplier) as u64))?;
            reader.read_exact(page)?;
        }
        debug!("loaded backing store from {}", path.display());
        Ok(Self { pages })
    }

    /// Build a store from an in-memory image.
    ///
    /// # Errors
    ///
    /// Fails with `Error::BackingStore` unless `image` is exactly one image long.
    pub fn from_bytes(image: Vec<u8>) -> Result<Self> {
        if image.len() != SIZE_STORE {
            return Err(Error::BackingStore(format!(
                "image holds {} bytes, expected {}",
                image.len(),
                SIZE_STORE
            )));
        }
        let mut pages = vec![[0u8; SIZE_FRAME]; SIZE_TABLE];
        for (page, chunk) in pages.iter_mut().zip(image.chunks_exact(SIZE_FRAME)) {
            page.copy_from_slice(chunk);
        }
        Ok(Self { pages })
    }

    pub fn page_data(&self, page: u8) -> &FrameData {
        &self.pages[page as usize]
    }
}
