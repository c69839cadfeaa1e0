use crate::domain::{DirEntry, EntryKind, Fingerprint, ScanEvent};
use crate::error::ScanError;
use std::io;
use std::path::Path;

pub trait FileSystemPort {
    /// Classify a path, following symbolic links.
    fn stat(&self, path: &Path) -> io::Result<EntryKind>;
    /// Direct children of a directory, classified without following links.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

pub trait HashingPort {
    fn hash_file(&self, path: &Path) -> Result<Fingerprint, ScanError>;
}

pub trait EventPort {
    fn emit(&self, event: &ScanEvent);
}

pub trait ProgressPort {
    fn start(&self, target: &Path);
    fn update(&self, processed: u64);
    fn finish(&self);
}
