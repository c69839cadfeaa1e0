use crate::error::ScanError;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::path::{Path, PathBuf};

/// SHA-256 digest of a file's full content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Outcome of offering a path to the [`Registry`].
#[derive(Debug, PartialEq, Eq)]
pub enum Registration<'a> {
    Inserted,
    Duplicate(&'a Path),
}

/// Maps a fingerprint's hex form to the first path seen with it.
///
/// Entries are never replaced or removed, so the registry only grows over a run.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<String, PathBuf>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, fingerprint: &Fingerprint, path: &Path) -> Registration<'_> {
        match self.entries.entry(fingerprint.to_hex()) {
            Entry::Occupied(entry) => Registration::Duplicate(entry.into_mut().as_path()),
            Entry::Vacant(entry) => {
                entry.insert(path.to_path_buf());
                Registration::Inserted
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a stat or directory listing says about a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File { size: u64 },
    /// Symlinks (when not followed), sockets, devices, fifos.
    Other,
}

impl EntryKind {
    /// Only non-empty regular files are hashed.
    pub fn is_candidate(&self) -> bool {
        matches!(self, EntryKind::File { size } if *size > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Everything the engine reports to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    DuplicateFound {
        path: PathBuf,
        original: PathBuf,
        fingerprint: Fingerprint,
    },
    FileError(ScanError),
    DirectoryError(ScanError),
    ScanSummary {
        target: PathBuf,
        count: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub target: PathBuf,
    pub processed: usize,
    /// Listing, hash and nested stat errors absorbed during the walk.
    pub errors: usize,
}

impl ScanResult {
    pub fn new(target: PathBuf) -> Self {
        Self {
            target,
            processed: 0,
            errors: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub results: Vec<ScanResult>,
    pub failures: Vec<ScanError>,
    pub unique_fingerprints: usize,
}

impl RunReport {
    pub fn total_processed(&self) -> usize {
        self.results.iter().map(|r| r.processed).sum()
    }

    pub fn recovered_errors(&self) -> usize {
        self.results.iter().map(|r| r.errors).sum()
    }

    /// A run fails when a target could not be classified. In strict mode any
    /// error absorbed mid-walk also fails it.
    pub fn is_success(&self, strict: bool) -> bool {
        self.failures.is_empty() && (!strict || self.recovered_errors() == 0)
    }

    pub fn exit_code(&self, strict: bool) -> i32 {
        if self.is_success(strict) { 0 } else { 1 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub targets: Vec<PathBuf>,
    pub verbose: bool,
    pub color: bool,
    pub format: OutputFormat,
    pub progress: bool,
    pub strict: bool,
    pub mmap_threshold: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            verbose: false,
            color: true,
            format: OutputFormat::Text,
            progress: false,
            strict: false,
            mmap_threshold: 64 * 1024 * 1024,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_targets(mut self, targets: Vec<PathBuf>) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_mmap_threshold(mut self, threshold: u64) -> Self {
        self.mmap_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCause;

    fn fingerprint(byte: u8) -> Fingerprint {
        Fingerprint::from_bytes([byte; 32])
    }

    #[test]
    fn test_fingerprint_hex_is_lowercase_and_full_width() {
        let mut bytes = [0u8; 32];
        bytes[0] = 0xAB;
        bytes[31] = 0x01;
        let hex = Fingerprint::from_bytes(bytes).to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.starts_with("ab00"));
        assert!(hex.ends_with("01"));
    }

    #[test]
    fn test_registry_first_seen_wins() {
        let mut registry = Registry::new();
        let fp = fingerprint(7);

        assert_eq!(registry.register(&fp, Path::new("/d/a.txt")), Registration::Inserted);
        assert_eq!(
            registry.register(&fp, Path::new("/d/b.txt")),
            Registration::Duplicate(Path::new("/d/a.txt"))
        );
        assert_eq!(
            registry.register(&fp, Path::new("/d/c.txt")),
            Registration::Duplicate(Path::new("/d/a.txt"))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_distinct_fingerprints() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        registry.register(&fingerprint(1), Path::new("a"));
        registry.register(&fingerprint(2), Path::new("b"));
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.register(&fingerprint(3), Path::new("c")),
            Registration::Inserted
        );
    }

    #[test]
    fn test_candidate_requires_nonempty_regular_file() {
        assert!(EntryKind::File { size: 1 }.is_candidate());
        assert!(!EntryKind::File { size: 0 }.is_candidate());
        assert!(!EntryKind::Directory.is_candidate());
        assert!(!EntryKind::Other.is_candidate());
    }

    #[test]
    fn test_exit_code_policy() {
        let mut report = RunReport::default();
        report.results.push(ScanResult {
            target: PathBuf::from("/d"),
            processed: 3,
            errors: 1,
        });
        assert_eq!(report.exit_code(false), 0);
        assert_eq!(report.exit_code(true), 1);

        report.failures.push(ScanError::Stat {
            path: PathBuf::from("/missing"),
            cause: ErrorCause::NotFound,
        });
        assert_eq!(report.exit_code(false), 1);
        assert_eq!(report.total_processed(), 3);
    }
}
