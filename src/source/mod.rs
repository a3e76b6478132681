mod file;
mod traits;

pub use file::{parse_events, FileEventSource};
pub use traits::{EventSource, SourceError, SourceResult};
