//! Byte-level file content comparison.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use treecmp_core::CompareError;

/// Decides whether two files of equal size hold the same bytes.
///
/// The engine only calls this after it has established that both files are
/// readable and have the same length. Errors carry the path of the file that
/// failed.
pub trait ContentComparer: Send + Sync {
    /// Return `true` if both files have identical contents.
    fn contents_equal(&self, first: &Path, second: &Path) -> Result<bool, CompareError>;
}

/// Streams both files in fixed-size chunks and stops at the first mismatch.
#[derive(Debug, Clone, Copy)]
pub struct ByteComparer {
    chunk_size: usize,
}

impl ByteComparer {
    /// Create a comparer reading `chunk_size` bytes at a time.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Bytes read from each file per step.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for ByteComparer {
    fn default() -> Self {
        Self::new(64 * 1024)
    }
}

impl ContentComparer for ByteComparer {
    fn contents_equal(&self, first: &Path, second: &Path) -> Result<bool, CompareError> {
        let mut first_file = File::open(first).map_err(|e| CompareError::io(first, e))?;
        let mut second_file = File::open(second).map_err(|e| CompareError::io(second, e))?;

        let mut first_buf = vec![0u8; self.chunk_size];
        let mut second_buf = vec![0u8; self.chunk_size];

        loop {
            let first_len = fill(&mut first_file, &mut first_buf).map_err(|e| CompareError::io(first, e))?;
            let second_len = fill(&mut second_file, &mut second_buf).map_err(|e| CompareError::io(second, e))?;

            if first_len != second_len || first_buf[..first_len] != second_buf[..second_len] {
                return Ok(false);
            }
            if first_len == 0 {
                return Ok(true);
            }
        }
    }
}

/// Read until `buf` is full or the reader is exhausted.
fn fill(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
