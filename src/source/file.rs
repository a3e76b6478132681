use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{EventSource, SourceError, SourceResult};
use crate::domain::RawEvent;

/// Events read from a JSON file in GitHub API format.
#[derive(Debug, Clone)]
pub struct FileEventSource {
    path: PathBuf,
}

impl FileEventSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventSource for FileEventSource {
    async fn load_events(&self) -> SourceResult<Vec<RawEvent>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        let events = parse_events(&contents)?;
        debug!("loaded {} events from {}", events.len(), self.path.display());
        Ok(events)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse a JSON array of events. Elements that are not objects are skipped
/// with a warning. An event without an id is given `#<index>`, its position
/// in the array, so it keeps its own expansion state.
pub fn parse_events(contents: &str) -> SourceResult<Vec<RawEvent>> {
    let document: Value = serde_json::from_str(contents)?;
    let items = match document {
        Value::Array(items) => items,
        other => return Err(SourceError::NotASequence(json_kind(&other))),
    };

    let mut events = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            warn!("skipping event #{}: expected an object, found {}", index, json_kind(&item));
            continue;
        }
        match serde_json::from_value::<RawEvent>(item) {
            Ok(mut event) => {
                if event.id.is_empty() {
                    event.id = format!("#{}", index);
                }
                events.push(event);
            }
            Err(e) => warn!("skipping event #{}: {}", index, e),
        }
    }
    Ok(events)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Timeline;
    use std::io::Write;

    const SAMPLE: &str = r#"[
        {
            "id": "101",
            "type": "PushEvent",
            "actor": {"login": "octocat", "avatar_url": "https://a/1.png"},
            "repo": {"name": "octo/repo"},
            "payload": {"commits": []},
            "created_at": "2024-06-15T09:00:00Z"
        },
        42,
        {"id": 102, "type": "WatchEvent"}
    ]"#;

    #[test]
    fn parse_skips_non_objects() {
        let events = parse_events(SAMPLE).expect("sample parses");
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["101", "102"]);
        assert_eq!(events[0].actor.login, "octocat");
        assert_eq!(events[1].repo.name, "");
    }

    #[test]
    fn null_and_mistyped_fields_keep_the_event() {
        let events = parse_events(
            r#"[
                {"id": "1", "type": "PushEvent", "created_at": null},
                {"id": "2", "type": "ForkEvent", "actor": null},
                {"id": "3", "type": "WatchEvent", "created_at": 1718000000},
                {"id": "4", "type": "WatchEvent"}
            ]"#,
        )
        .expect("events parse");
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert_eq!(events[0].created_at, "");
        assert_eq!(events[1].actor.login, "");
        assert_eq!(events[2].created_at, "1718000000");
    }

    #[test]
    fn missing_ids_are_filled_from_position() {
        let events = parse_events(r#"[{"type": "PushEvent"}, 7, {"id": null}, {"id": "x"}]"#)
            .expect("events parse");
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["#0", "#2", "x"]);
    }

    #[test]
    fn id_less_events_expand_independently() {
        let events = parse_events(
            r#"[
                {"type": "IssueCommentEvent", "payload": {"comment": {"body": "first"}}},
                {"type": "IssueCommentEvent", "payload": {"comment": {"body": "second"}}}
            ]"#,
        )
        .expect("events parse");
        let mut timeline = Timeline::new(events);
        let first = timeline.events()[0].id.clone();
        timeline.toggle_expanded(&first);

        let now = chrono::Utc::now();
        let flags: Vec<_> = timeline.records(now).iter().map(|r| r.is_expanded).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn parse_rejects_non_array_document() {
        let err = parse_events(r#"{"id": "1"}"#).unwrap_err();
        assert!(matches!(err, SourceError::NotASequence("an object")));
    }

    #[test]
    fn parse_reports_malformed_json() {
        assert!(matches!(parse_events("[{"), Err(SourceError::Parse(_))));
    }

    #[test]
    fn empty_array_is_empty_list() {
        assert!(parse_events("[]").expect("empty array parses").is_empty());
    }

    #[tokio::test]
    async fn file_source_reads_events() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write sample");

        let source = FileEventSource::new(file.path());
        let events = source.load_events().await.expect("load events");
        assert_eq!(events.len(), 2);
        assert_eq!(source.describe(), file.path().display().to_string());
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = FileEventSource::new(dir.path().join("missing.json"));
        let err = source.load_events().await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
