use std::fs::File;
use std::ops::{Deref, Range};
use std::path::Path;

use memmap2::Mmap;

use crate::error::{Error, Result};

enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
}

/// Read-only view over a whole input, either memory mapped or held in memory.
pub struct MappedBuffer {
    backing: Backing,
}

impl MappedBuffer {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let io_err = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(io_err)?;
        let len = file.metadata().map_err(io_err)?.len();
        if len == 0 {
            return Ok(Self::from_vec(Vec::new()));
        }
        // SAFETY: the mapping is read-only and the file is not expected to be
        // truncated while the run is in progress.
        let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
        Ok(Self {
            backing: Backing::Mapped(mmap),
        })
    }

    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            backing: Backing::Owned(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Mapped(mmap) => mmap,
            Backing::Owned(bytes) => bytes,
        }
    }

    pub fn span(&self, range: Range<usize>) -> Option<&[u8]> {
        self.as_bytes().get(range)
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.backing, Backing::Mapped(_))
    }
}

impl Deref for MappedBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}
