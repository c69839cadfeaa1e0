use crate::domain::{DirEntry, EntryKind};
use crate::ports::FileSystemPort;
use log::debug;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

pub struct FileSystemAdapter;

impl FileSystemAdapter {
    pub fn new() -> Self {
        Self
    }

    fn classify(metadata: &Metadata) -> EntryKind {
        let file_type = metadata.file_type();
        if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File {
                size: metadata.len(),
            }
        } else {
            EntryKind::Other
        }
    }

    /// An entry unlinked between readdir and lstat is skipped, not fatal to
    /// the listing.
    fn classify_entry(
        path: PathBuf,
        metadata: io::Result<Metadata>,
    ) -> io::Result<Option<DirEntry>> {
        match metadata {
            Ok(metadata) => Ok(Some(DirEntry::new(path, Self::classify(&metadata)))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} vanished during listing", path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

impl Default for FileSystemAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemPort for FileSystemAdapter {
    fn stat(&self, path: &Path) -> io::Result<EntryKind> {
        let metadata = fs::metadata(path)?;
        Ok(Self::classify(&metadata))
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            // DirEntry::metadata does not traverse symlinks.
            if let Some(entry) = Self::classify_entry(entry.path(), entry.metadata())? {
                entries.push(entry);
            }
        }

        entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(entries)
    }
}
