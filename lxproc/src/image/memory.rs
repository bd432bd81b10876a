use std::{
    fs::File,
    io::Read,
    os::unix::fs::FileExt,
    path::{Path, PathBuf},
};

use log::{debug, info};
use memmap2::Mmap;
use object::{Object, ObjectSegment};

use crate::error::{Error, Result};

/// How much of an unmappable core (`/proc/kcore`) is read to find its
/// program headers.
const HEADER_PREFIX: u64 = 1 << 20;

#[derive(Debug)]
enum Backing {
    Mapped(Mmap),
    Owned(Vec<u8>),
    File(File),
}

/// A kernel virtual address range and where its bytes live in the backing.
#[derive(Debug, Clone, Copy)]
struct Segment {
    vaddr: u64,
    offset: u64,
    len: u64,
}

impl Segment {
    fn contains(&self, addr: u64, len: u64) -> bool {
        addr >= self.vaddr
            && addr
                .checked_add(len)
                .is_some_and(|end| end <= self.vaddr.saturating_add(self.len))
    }
}

#[derive(Debug)]
pub struct Memory {
    backing: Backing,
    segments: Vec<Segment>,
}

impl Memory {
    /// Opens an ELF core (`vmcore`, `/proc/kcore`) and maps its `PT_LOAD`
    /// segments by virtual address.
    pub fn open_core(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| io_error(path, source))?;

        // SAFETY: the core is opened read-only and never written by this process.
        let (backing, segments) = match unsafe { Mmap::map(&file) } {
            Ok(map) if !map.is_empty() => {
                let segments = core_segments(path, &map)?;
                (Backing::Mapped(map), segments)
            }
            _ => {
                debug!("{} cannot be mapped, reading through the file", path.display());
                let mut prefix = Vec::new();
                (&file)
                    .take(HEADER_PREFIX)
                    .read_to_end(&mut prefix)
                    .map_err(|source| io_error(path, source))?;
                let segments = core_segments(path, &prefix)?;
                (Backing::File(file), segments)
            }
        };

        info!(
            "opened core {} with {} loadable segments",
            path.display(),
            segments.len()
        );
        Ok(Self { backing, segments })
    }

    /// Maps a flat dump so that its first byte sits at `base`.
    pub fn open_raw(path: impl AsRef<Path>, base: u64) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| io_error(path, source))?;
        // SAFETY: as in `open_core`.
        let map = unsafe { Mmap::map(&file) }.map_err(|source| io_error(path, source))?;

        info!(
            "opened raw dump {} ({:#x} bytes at {base:#x})",
            path.display(),
            map.len()
        );
        let segment = Segment {
            vaddr: base,
            offset: 0,
            len: map.len() as u64,
        };
        Ok(Self {
            backing: Backing::Mapped(map),
            segments: vec![segment],
        })
    }

    /// An in-memory image whose first byte sits at `base`.
    pub fn from_bytes(base: u64, data: Vec<u8>) -> Self {
        let segment = Segment {
            vaddr: base,
            offset: 0,
            len: data.len() as u64,
        };
        Self {
            backing: Backing::Owned(data),
            segments: vec![segment],
        }
    }

    /// Reads must fall inside a single segment.
    pub fn read(&self, addr: u64, buf: &mut [u8]) -> Result<()> {
        let len = buf.len();
        let unreadable = || Error::Unreadable { addr, len };

        let segment = self
            .segments
            .iter()
            .find(|s| s.contains(addr, len as u64))
            .ok_or_else(unreadable)?;
        let offset = segment.offset + (addr - segment.vaddr);

        match &self.backing {
            Backing::Mapped(map) => copy_from(map, offset, buf).ok_or_else(unreadable),
            Backing::Owned(data) => copy_from(data, offset, buf).ok_or_else(unreadable),
            Backing::File(file) => file.read_exact_at(buf, offset).map_err(|e| {
                debug!("pread of {len} bytes at {offset:#x} failed: {e}");
                unreadable()
            }),
        }
    }

    /// Reads the part of `buf` that the segment holding `addr` covers and
    /// returns how many bytes that was.
    pub fn read_prefix(&self, addr: u64, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let segment = self
            .segments
            .iter()
            .find(|s| s.contains(addr, 1))
            .ok_or(Error::Unreadable {
                addr,
                len: buf.len(),
            })?;
        let available = segment.vaddr.saturating_add(segment.len) - addr;
        let len = usize::try_from(available).map_or(buf.len(), |n| n.min(buf.len()));
        self.read(addr, &mut buf[..len])?;
        Ok(len)
    }
}

fn copy_from(data: &[u8], offset: u64, buf: &mut [u8]) -> Option<()> {
    let start = usize::try_from(offset).ok()?;
    let src = data.get(start..start.checked_add(buf.len())?)?;
    buf.copy_from_slice(src);
    Some(())
}

fn core_segments(path: &Path, data: &[u8]) -> Result<Vec<Segment>> {
    let elf = object::File::parse(data).map_err(|source| Error::Object {
        path: path.to_path_buf(),
        source,
    })?;

    let mut segments = Vec::new();
    for segment in elf.segments() {
        let (offset, len) = segment.file_range();
        if len == 0 {
            continue;
        }
        debug!(
            "segment {:#x}-{:#x} at file offset {offset:#x}",
            segment.address(),
            segment.address().wrapping_add(len)
        );
        segments.push(Segment {
            vaddr: segment.address(),
            offset,
            len,
        });
    }
    Ok(segments)
}

fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: PathBuf::from(path),
        source,
    }
}
