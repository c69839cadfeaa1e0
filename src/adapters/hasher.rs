use crate::domain::Fingerprint;
use crate::error::ScanError;
use crate::ports::HashingPort;
use memmap2::MmapOptions;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Streams a file through SHA-256. Files at or above the mmap threshold are
/// mapped instead of read through a buffer.
pub struct Sha256Hasher {
    mmap_threshold: u64,
}

impl Sha256Hasher {
    pub fn new() -> Self {
        Self {
            mmap_threshold: 64 * 1024 * 1024,
        }
    }

    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }

    fn hash_with_mmap(&self, file: &File) -> io::Result<Fingerprint> {
        // The mapping is read-only and dropped before the file handle.
        let mmap = unsafe { MmapOptions::new().map(file)? };
        let mut hasher = Sha256::new();
        hasher.update(&mmap[..]);
        Ok(Fingerprint::from_bytes(hasher.finalize().into()))
    }

    fn hash_with_buffered_io(&self, file: File) -> io::Result<Fingerprint> {
        let mut reader = BufReader::new(file);
        let mut buffer = [0; 8192];
        let mut hasher = Sha256::new();

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(Fingerprint::from_bytes(hasher.finalize().into()))
    }

    fn hash_open_file(&self, file: File) -> io::Result<Fingerprint> {
        let file_size = file.metadata()?.len();
        if file_size >= self.mmap_threshold && file_size > 0 {
            self.hash_with_mmap(&file)
        } else {
            self.hash_with_buffered_io(file)
        }
    }
}

impl Default for Sha256Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl HashingPort for Sha256Hasher {
    fn hash_file(&self, path: &Path) -> Result<Fingerprint, ScanError> {
        let file = File::open(path).map_err(|e| ScanError::hash(path, &e))?;
        self.hash_open_file(file).map_err(|e| ScanError::hash(path, &e))
    }
}
