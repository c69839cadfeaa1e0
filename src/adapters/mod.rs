pub mod filesystem;
pub mod hasher;
pub mod output;
pub mod progress;

pub use filesystem::FileSystemAdapter;
pub use hasher::Sha256Hasher;
pub use output::{ConsoleOutputAdapter, JsonOutputAdapter, RecordingEventSink};
pub use progress::ProgressBarAdapter;
