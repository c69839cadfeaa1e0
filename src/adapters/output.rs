use crate::domain::ScanEvent;
use crate::error::ScanError;
use crate::ports::EventPort;
use console::style;
use indicatif::ProgressBar;
use serde::Serialize;
use std::cell::RefCell;
use std::path::Path;
use std::sync::Arc;

/// Runs `write` with the spinner, if any, cleared from the terminal.
fn print_around(progress: Option<&Arc<ProgressBar>>, write: impl FnOnce()) {
    match progress {
        Some(bar) => bar.suspend(write),
        None => write(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Fail,
    Status,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub stream: Stream,
    pub tone: Tone,
    pub text: String,
}

impl Line {
    fn new(stream: Stream, tone: Tone, text: String) -> Self {
        Self { stream, tone, text }
    }
}

/// Plain text renderer: duplicate paths on stdout, diagnostics on stderr.
pub struct ConsoleOutputAdapter {
    program: String,
    verbose: bool,
    progress: Option<Arc<ProgressBar>>,
}

impl ConsoleOutputAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            verbose: false,
            progress: None,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_progress_bar(mut self, bar: Arc<ProgressBar>) -> Self {
        self.progress = Some(bar);
        self
    }

    pub fn progress_bar(&self) -> Option<&Arc<ProgressBar>> {
        self.progress.as_ref()
    }

    pub fn render(&self, event: &ScanEvent) -> Vec<Line> {
        match event {
            ScanEvent::DuplicateFound {
                path,
                original,
                fingerprint,
            } => {
                let mut lines = vec![Line::new(
                    Stream::Stdout,
                    Tone::Plain,
                    path.display().to_string(),
                )];
                if self.verbose {
                    lines.push(Line::new(
                        Stream::Stderr,
                        Tone::Status,
                        format!("-> duplicates {} {}", original.display(), fingerprint),
                    ));
                }
                lines
            }
            ScanEvent::FileError(err) | ScanEvent::DirectoryError(err) => {
                vec![Line::new(Stream::Stderr, Tone::Fail, err.to_string())]
            }
            ScanEvent::ScanSummary { target, count } => {
                if !self.verbose {
                    return Vec::new();
                }
                let noun = if *count == 1 { "file" } else { "files" };
                vec![Line::new(
                    Stream::Stderr,
                    Tone::Success,
                    format!(
                        "{}: processed {} {} in {}",
                        self.program,
                        count,
                        noun,
                        target.display()
                    ),
                )]
            }
        }
    }
}

impl EventPort for ConsoleOutputAdapter {
    fn emit(&self, event: &ScanEvent) {
        let lines = self.render(event);
        if lines.is_empty() {
            return;
        }

        print_around(self.progress.as_ref(), || {
            for line in lines {
                match line.stream {
                    Stream::Stdout => println!("{}", line.text),
                    Stream::Stderr => {
                        let styled = style(line.text).for_stderr();
                        let styled = match line.tone {
                            Tone::Plain => styled,
                            Tone::Fail => styled.red(),
                            Tone::Status => styled.cyan(),
                            Tone::Success => styled.green(),
                        };
                        eprintln!("{}", styled);
                    }
                }
            }
        });
    }
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum JsonEvent {
    Duplicate {
        path: String,
        original: String,
        fingerprint: String,
    },
    FileError {
        kind: &'static str,
        path: String,
        cause: String,
    },
    DirectoryError {
        kind: &'static str,
        path: String,
        cause: String,
    },
    Summary {
        target: String,
        count: usize,
    },
}

fn lossy(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl JsonEvent {
    fn error_parts(err: &ScanError) -> (&'static str, String, String) {
        (err.kind_str(), lossy(err.path()), err.cause().to_string())
    }

    fn from_event(event: &ScanEvent) -> Self {
        match event {
            ScanEvent::DuplicateFound {
                path,
                original,
                fingerprint,
            } => JsonEvent::Duplicate {
                path: lossy(path),
                original: lossy(original),
                fingerprint: fingerprint.to_hex(),
            },
            ScanEvent::FileError(err) => {
                let (kind, path, cause) = Self::error_parts(err);
                JsonEvent::FileError { kind, path, cause }
            }
            ScanEvent::DirectoryError(err) => {
                let (kind, path, cause) = Self::error_parts(err);
                JsonEvent::DirectoryError { kind, path, cause }
            }
            ScanEvent::ScanSummary { target, count } => JsonEvent::Summary {
                target: lossy(target),
                count: *count,
            },
        }
    }
}

/// One JSON object per event on stdout.
pub struct JsonOutputAdapter {
    progress: Option<Arc<ProgressBar>>,
}

impl JsonOutputAdapter {
    pub fn new() -> Self {
        Self { progress: None }
    }

    pub fn with_progress_bar(mut self, bar: Arc<ProgressBar>) -> Self {
        self.progress = Some(bar);
        self
    }

    pub fn to_json_line(&self, event: &ScanEvent) -> serde_json::Result<String> {
        serde_json::to_string(&JsonEvent::from_event(event))
    }
}

impl Default for JsonOutputAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPort for JsonOutputAdapter {
    fn emit(&self, event: &ScanEvent) {
        match self.to_json_line(event) {
            Ok(line) => print_around(self.progress.as_ref(), || println!("{}", line)),
            Err(e) => log::warn!("failed to serialize event {:?}: {}", event, e),
        }
    }
}

/// Keeps every emitted event in memory, in emission order.
#[derive(Default)]
pub struct RecordingEventSink {
    events: RefCell<Vec<ScanEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ScanEvent> {
        self.events.borrow().clone()
    }

    pub fn duplicates(&self) -> Vec<(std::path::PathBuf, std::path::PathBuf)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ScanEvent::DuplicateFound { path, original, .. } => {
                    Some((path.clone(), original.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<ScanError> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ScanEvent::FileError(err) | ScanEvent::DirectoryError(err) => Some(err.clone()),
                _ => None,
            })
            .collect()
    }
}

impl EventPort for RecordingEventSink {
    fn emit(&self, event: &ScanEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

impl<E: EventPort + ?Sized> EventPort for &E {
    fn emit(&self, event: &ScanEvent) {
        (**self).emit(event)
    }
}

impl<E: EventPort + ?Sized> EventPort for Box<E> {
    fn emit(&self, event: &ScanEvent) {
        (**self).emit(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Fingerprint;
    use crate::error::ErrorCause;
    use std::path::PathBuf;

    fn duplicate() -> ScanEvent {
        ScanEvent::DuplicateFound {
            path: PathBuf::from("/d/b.txt"),
            original: PathBuf::from("/d/a.txt"),
            fingerprint: Fingerprint::from_bytes([0; 32]),
        }
    }

    #[test]
    fn test_duplicate_is_path_only_when_quiet() {
        let lines = ConsoleOutputAdapter::new("dupes").render(&duplicate());
        assert_eq!(
            lines,
            vec![Line::new(Stream::Stdout, Tone::Plain, "/d/b.txt".to_string())]
        );
    }

    #[test]
    fn test_verbose_duplicate_names_original_and_fingerprint() {
        let lines = ConsoleOutputAdapter::new("dupes")
            .with_verbose(true)
            .render(&duplicate());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].stream, Stream::Stderr);
        assert_eq!(
            lines[1].text,
            format!("-> duplicates /d/a.txt {}", "0".repeat(64))
        );
    }

    #[test]
    fn test_summary_only_in_verbose_mode() {
        let summary = ScanEvent::ScanSummary {
            target: PathBuf::from("/d"),
            count: 1,
        };
        assert!(ConsoleOutputAdapter::new("dupes").render(&summary).is_empty());

        let lines = ConsoleOutputAdapter::new("dupes")
            .with_verbose(true)
            .render(&summary);
        assert_eq!(lines[0].text, "dupes: processed 1 file in /d");
        assert_eq!(lines[0].tone, Tone::Success);

        let empty = ScanEvent::ScanSummary {
            target: PathBuf::from("/e"),
            count: 0,
        };
        let lines = ConsoleOutputAdapter::new("dupes")
            .with_verbose(true)
            .render(&empty);
        assert_eq!(lines[0].text, "dupes: processed 0 files in /e");
    }

    #[test]
    fn test_errors_go_to_stderr() {
        let event = ScanEvent::DirectoryError(ScanError::Listing {
            path: PathBuf::from("/d/locked"),
            cause: ErrorCause::PermissionDenied,
        });
        let lines = ConsoleOutputAdapter::new("dupes").render(&event);
        assert_eq!(
            lines,
            vec![Line::new(
                Stream::Stderr,
                Tone::Fail,
                "/d/locked: permission denied".to_string()
            )]
        );
    }

    #[test]
    fn test_json_lines_are_tagged() {
        let adapter = JsonOutputAdapter::new();
        let line = adapter.to_json_line(&duplicate()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["event"], "duplicate");
        assert_eq!(value["original"], "/d/a.txt");

        let error = ScanEvent::FileError(ScanError::Hash {
            path: PathBuf::from("/d/x"),
            cause: ErrorCause::NotFound,
        });
        let value: serde_json::Value =
            serde_json::from_str(&adapter.to_json_line(&error).unwrap()).unwrap();
        assert_eq!(value["event"], "file_error");
        assert_eq!(value["kind"], "hash");
        assert_eq!(value["cause"], "no such file or directory");
    }
}
