use crate::domain::{
    DirEntry, EntryKind, Registration, Registry, RunReport, ScanConfig, ScanEvent, ScanResult,
};
use crate::error::ScanError;
use crate::ports::{EventPort, FileSystemPort, HashingPort, ProgressPort};
use log::{debug, trace};
use std::path::Path;
use std::vec;

/// Walks targets depth-first, hashing every non-empty regular file and
/// reporting paths whose fingerprint is already in the registry.
pub struct TraversalEngine<F, H, E, P> {
    filesystem: F,
    hasher: H,
    events: E,
    progress: P,
}

impl<F, H, E, P> TraversalEngine<F, H, E, P>
where
    F: FileSystemPort,
    H: HashingPort,
    E: EventPort,
    P: ProgressPort,
{
    pub fn new(filesystem: F, hasher: H, events: E, progress: P) -> Self {
        Self {
            filesystem,
            hasher,
            events,
            progress,
        }
    }

    /// Scan every configured target against one registry, in argument order.
    pub fn run(&self, config: &ScanConfig) -> RunReport {
        let mut registry = Registry::new();
        let mut report = RunReport::default();

        for target in &config.targets {
            match self.scan_target(target, &mut registry) {
                Ok(result) => {
                    self.events.emit(&ScanEvent::ScanSummary {
                        target: result.target.clone(),
                        count: result.processed,
                    });
                    report.results.push(result);
                }
                Err(err) => report.failures.push(err),
            }
        }

        report.unique_fingerprints = registry.len();
        report
    }

    /// Scan one target. Only a failure to classify the target itself is
    /// returned as an error; everything below it is reported and absorbed.
    pub fn scan_target(
        &self,
        target: &Path,
        registry: &mut Registry,
    ) -> Result<ScanResult, ScanError> {
        let kind = match self.filesystem.stat(target) {
            Ok(kind) => kind,
            Err(e) => {
                let err = ScanError::stat(target, &e);
                self.events.emit(&ScanEvent::DirectoryError(err.clone()));
                return Err(err);
            }
        };

        debug!("scanning {} ({:?})", target.display(), kind);
        self.progress.start(target);

        let mut result = ScanResult::new(target.to_path_buf());
        match kind {
            EntryKind::Directory => self.walk_directory(target, registry, &mut result),
            kind => self.process_candidate(target, kind, registry, &mut result),
        }

        self.progress.finish();
        debug!(
            "finished {}: {} processed, {} errors",
            target.display(),
            result.processed,
            result.errors
        );
        Ok(result)
    }

    fn walk_directory(&self, root: &Path, registry: &mut Registry, result: &mut ScanResult) {
        // Each frame holds the not-yet-visited children of one directory.
        let mut stack: Vec<vec::IntoIter<DirEntry>> = Vec::new();
        if let Some(children) = self.list_children(root, result) {
            stack.push(children);
        }

        while let Some(children) = stack.last_mut() {
            let Some(entry) = children.next() else {
                stack.pop();
                continue;
            };

            if entry.kind != EntryKind::Directory {
                self.process_candidate(&entry.path, entry.kind, registry, result);
                continue;
            }

            match self.filesystem.stat(&entry.path) {
                Ok(EntryKind::Directory) => {
                    if let Some(grandchildren) = self.list_children(&entry.path, result) {
                        stack.push(grandchildren);
                    }
                }
                Ok(kind) => self.process_candidate(&entry.path, kind, registry, result),
                Err(e) => {
                    let err = ScanError::stat(&entry.path, &e);
                    self.report_error(ScanEvent::DirectoryError(err), result);
                }
            }
        }
    }

    fn list_children(
        &self,
        dir: &Path,
        result: &mut ScanResult,
    ) -> Option<vec::IntoIter<DirEntry>> {
        match self.filesystem.list_dir(dir) {
            Ok(children) => {
                trace!("{}: {} entries", dir.display(), children.len());
                Some(children.into_iter())
            }
            Err(e) => {
                let err = ScanError::listing(dir, &e);
                self.report_error(ScanEvent::DirectoryError(err), result);
                None
            }
        }
    }

    fn process_candidate(
        &self,
        path: &Path,
        kind: EntryKind,
        registry: &mut Registry,
        result: &mut ScanResult,
    ) {
        if !kind.is_candidate() {
            trace!("skipping {} ({:?})", path.display(), kind);
            return;
        }

        let fingerprint = match self.hasher.hash_file(path) {
            Ok(fingerprint) => fingerprint,
            Err(err) => {
                self.report_error(ScanEvent::FileError(err), result);
                return;
            }
        };

        if let Registration::Duplicate(original) = registry.register(&fingerprint, path) {
            self.events.emit(&ScanEvent::DuplicateFound {
                path: path.to_path_buf(),
                original: original.to_path_buf(),
                fingerprint,
            });
        }

        result.processed += 1;
        self.progress.update(result.processed as u64);
    }

    fn report_error(&self, event: ScanEvent, result: &mut ScanResult) {
        result.errors += 1;
        self.events.emit(&event);
    }
}
