use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::error::Result;

/// Fixed-width integer output with explicit byte order.
///
/// Every method writes exactly the number of bytes its name states.  Values
/// are masked to that width; callers that care about overflow must check
/// before calling.
pub trait ByteWriter: Write {
    /// Writes the low 8 bits of `value`.
    fn put_u8(&mut self, value: u32) -> io::Result<()> {
        self.write_u8(value as u8)
    }

    /// Writes the low 16 bits of `value`, most significant byte first.
    fn put_u16_be(&mut self, value: u32) -> io::Result<()> {
        self.write_u16::<BigEndian>(value as u16)
    }

    /// Writes `value`, most significant byte first.
    fn put_u32_be(&mut self, value: u32) -> io::Result<()> {
        self.write_u32::<BigEndian>(value)
    }

    /// Writes the low 16 bits of `value`, least significant byte first.
    fn put_u16_le(&mut self, value: u32) -> io::Result<()> {
        self.write_u16::<LittleEndian>(value as u16)
    }

    /// Writes `value`, least significant byte first.
    fn put_u32_le(&mut self, value: u32) -> io::Result<()> {
        self.write_u32::<LittleEndian>(value)
    }

    /// Writes `bytes` verbatim.
    fn put_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)
    }
}

impl<W: Write + ?Sized> ByteWriter for W {}

/// A buffered output file.
///
/// The underlying handle is closed when the sink is dropped, whether or not
/// [`finish`](#method.finish) was reached.  An atomic sink writes into a
/// temporary file next to its destination; the destination is only replaced
/// by `finish`, and the temporary file is deleted if the sink is dropped
/// first.
pub struct Sink {
    path: PathBuf,
    inner: SinkInner,
}

enum SinkInner {
    Direct(BufWriter<File>),
    Atomic(BufWriter<NamedTempFile>),
}

impl Sink {
    /// Creates (or truncates) the file at `path` and writes into it directly.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Sink> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Sink {
            path,
            inner: SinkInner::Direct(BufWriter::new(file)),
        })
    }

    /// Opens a temporary file in the directory of `path`; `finish` renames it
    /// over `path`.
    pub fn create_atomic<P: AsRef<Path>>(path: P) -> Result<Sink> {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir)?;
        Ok(Sink {
            path,
            inner: SinkInner::Atomic(BufWriter::new(temp)),
        })
    }

    /// Returns the destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes all buffered data and closes the file, moving it into place
    /// for an atomic sink.
    pub fn finish(self) -> Result<()> {
        match self.inner {
            SinkInner::Direct(writer) => {
                let file = writer.into_inner().map_err(|err| err.into_error())?;
                file.sync_all()?;
            }
            SinkInner::Atomic(writer) => {
                let temp = writer.into_inner().map_err(|err| err.into_error())?;
                temp.as_file().sync_all()?;
                temp.persist(&self.path).map_err(|err| err.error)?;
            }
        }
        Ok(())
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.inner {
            SinkInner::Direct(ref mut writer) => writer.write(buf),
            SinkInner::Atomic(ref mut writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner {
            SinkInner::Direct(ref mut writer) => writer.flush(),
            SinkInner::Atomic(ref mut writer) => writer.flush(),
        }
    }
}

/// A writer that accepts `remaining` bytes and then fails every write, for
/// exercising errors partway through a file.
#[cfg(test)]
pub(crate) struct FailingWriter<W> {
    pub(crate) inner: W,
    pub(crate) remaining: usize,
}

#[cfg(test)]
impl<W: Write> Write for FailingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            return Err(io::Error::new(io::ErrorKind::Other, "device full"));
        }
        let limit = buf.len().min(self.remaining);
        let written = self.inner.write(&buf[..limit])?;
        self.remaining -= written;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
