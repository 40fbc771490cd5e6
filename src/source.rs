use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use memmap2::Mmap;

use crate::config::SourceKind;

/// Forward-only cursor over the lines of one input.
///
/// The returned slice has its `\n` / `\r\n` terminator removed and stays
/// valid until the next call. Once `None` is returned the source is spent;
/// open a new one to read the input again.
pub trait RecordSource {
    fn next_line(&mut self) -> io::Result<Option<&[u8]>>;
}

/// Line reader over any `BufRead`, reusing one buffer for every line.
pub struct LineSource<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::with_capacity(256),
        }
    }
}

impl<R: BufRead> RecordSource for LineSource<R> {
    fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(trim_newline(&self.buf)))
    }
}

/// Lines sliced straight out of a read-only mapping of the file.
pub struct MappedSource {
    // `None` for zero-length files, which cannot be mapped on every platform.
    mmap: Option<Mmap>,
    offset: usize,
}

impl MappedSource {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Self {
                mmap: None,
                offset: 0,
            });
        }
        // SAFETY: the mapping is only read, and inputs are not modified while
        // they are being aggregated.
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Self {
            mmap: Some(mmap),
            offset: 0,
        })
    }
}

impl RecordSource for MappedSource {
    fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        let Some(mmap) = &self.mmap else {
            return Ok(None);
        };
        let start = self.offset;
        if start >= mmap.len() {
            return Ok(None);
        }
        let end = mmap[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map(|pos| start + pos)
            .unwrap_or(mmap.len());
        self.offset = end + 1;
        Ok(Some(trim_newline(&mmap[start..end])))
    }
}

/// A file-backed source of either kind.
pub enum InputSource {
    Buffered(LineSource<BufReader<File>>),
    Mapped(MappedSource),
}

impl RecordSource for InputSource {
    fn next_line(&mut self) -> io::Result<Option<&[u8]>> {
        match self {
            InputSource::Buffered(source) => source.next_line(),
            InputSource::Mapped(source) => source.next_line(),
        }
    }
}

/// Opens a fresh, independent source over `path`.
pub fn open_source(path: &Path, kind: SourceKind) -> io::Result<InputSource> {
    match kind {
        SourceKind::Buffered => {
            let file = File::open(path)?;
            Ok(InputSource::Buffered(LineSource::new(BufReader::new(file))))
        }
        SourceKind::Mapped => MappedSource::open(path).map(InputSource::Mapped),
    }
}

#[inline]
fn trim_newline(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
