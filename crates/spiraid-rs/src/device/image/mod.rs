#[cfg(test)]
mod image_tests;

use memmap2::{MmapMut, MmapOptions};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Value of never-written FRAM cells.
pub const ERASED: u8 = 0xFF;

enum Backing {
    Memory(Vec<u8>),
    Mapped {
        path: PathBuf,
        _file: File,
        map: MmapMut,
    },
}

/// Image is the cell array behind one FRAM, held in memory or in a mapped file.
pub struct Image {
    backing: Backing,
    /// True when the image was created by this open and holds only erased cells.
    pub fresh: bool,
}

impl Image {
    #[must_use]
    pub fn in_memory(len: usize) -> Self {
        Self {
            backing: Backing::Memory(vec![ERASED; len]),
            fresh: true,
        }
    }

    /// Opens `path` as a persistent image of exactly `len` bytes.
    /// A new or empty file is filled with the erased value.
    ///
    /// # Errors
    /// Returns an error if the image cannot be created, resized or mapped.
    pub fn open_prealloc(path: impl AsRef<Path>, len: usize) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let existed = path.exists();

        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let prev_len = file.metadata().map(|m| m.len()).unwrap_or(0);
        let len_u64 = u64::try_from(len)
            .map_err(|_| anyhow::anyhow!("image length {len} exceeds file size range"))?;
        file.set_len(len_u64)?;

        // SAFETY: the file is opened read/write, owned by this Image and sized to `len` above.
        let mut map = unsafe { MmapOptions::new().len(len).map_mut(&file)? };

        let fresh = !existed || prev_len == 0;
        if fresh {
            map.fill(ERASED);
            map.flush()?;
        } else if prev_len < len_u64 {
            let grown = usize::try_from(prev_len).unwrap_or(len);
            map[grown..].fill(ERASED);
        }

        tracing::debug!(path = %path.display(), len, fresh, "opened channel image");
        Ok(Self {
            backing: Backing::Mapped {
                path,
                _file: file,
                map,
            },
            fresh,
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::Memory(_) => None,
            Backing::Mapped { path, .. } => Some(path.as_path()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.memory().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn memory(&self) -> &[u8] {
        match &self.backing {
            Backing::Memory(mem) => mem.as_slice(),
            Backing::Mapped { map, .. } => &map[..],
        }
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        match &mut self.backing {
            Backing::Memory(mem) => mem.as_mut_slice(),
            Backing::Mapped { map, .. } => &mut map[..],
        }
    }

    /// Copies cells starting at `off` into `buf`; returns the number of bytes copied.
    pub fn read_at(&self, off: usize, buf: &mut [u8]) -> usize {
        let mem = self.memory();
        if off >= mem.len() {
            return 0;
        }
        let end = off.saturating_add(buf.len()).min(mem.len());
        let src = &mem[off..end];
        let n = src.len();
        buf[..n].copy_from_slice(src);
        n
    }

    pub fn write_at(&mut self, off: usize, data: &[u8]) -> usize {
        let mem = self.memory_mut();
        if off >= mem.len() {
            return 0;
        }
        let end = off.saturating_add(data.len()).min(mem.len());
        let dst = &mut mem[off..end];
        let n = dst.len();
        dst.copy_from_slice(&data[..n]);
        n
    }

    /// Flushes a mapped image to its file. In-memory images are a no-op.
    ///
    /// # Errors
    /// Returns an error if the mapping cannot be synced.
    pub fn flush(&self) -> anyhow::Result<()> {
        if let Backing::Mapped { map, .. } = &self.backing {
            map.flush()?;
        }
        Ok(())
    }
}
