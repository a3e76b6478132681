use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::describe::{detail_blocks, DetailBlock};
use crate::domain::{parse_timestamp, RawEvent};
use crate::facets::{apply_filter, compute_groups, EventGroup, FilterState};
use crate::stats::ActivityStats;
use crate::taxonomy::{self, Tone};

/// Per-event expanded/collapsed flags. Unknown ids are collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashMap<String, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    pub fn toggle(mut self, id: &str) -> Self {
        let next = !self.is_expanded(id);
        self.expanded.insert(id.to_string(), next);
        self
    }

    pub fn set(mut self, id: &str, expanded: bool) -> Self {
        self.expanded.insert(id.to_string(), expanded);
        self
    }

    pub fn collapse_all() -> Self {
        Self::default()
    }
}

/// Everything the presentation layer needs to draw one timeline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRecord {
    pub id: String,
    pub raw_type: String,
    pub icon: &'static str,
    pub tone: Tone,
    pub label: &'static str,
    pub actor: String,
    pub repo: String,
    pub relative_date: String,
    pub description: String,
    pub detail_blocks: Vec<DetailBlock>,
    pub is_expanded: bool,
    pub needs_expansion: bool,
}

pub fn render_record(event: &RawEvent, expansion: &ExpansionState, now: DateTime<Utc>) -> RenderRecord {
    let spec = taxonomy::lookup(&event.event_type);
    let payload = event.decoded_payload();
    let is_expanded = expansion.is_expanded(&event.id);
    let detail_blocks = detail_blocks(&payload, is_expanded);

    RenderRecord {
        id: event.id.clone(),
        raw_type: event.event_type.clone(),
        icon: spec.icon,
        tone: spec.tone,
        label: spec.label,
        actor: event.actor_name().to_string(),
        repo: event.repo.name.clone(),
        relative_date: relative_date(&event.created_at, now),
        description: (spec.describe)(&payload, &event.repo.name),
        needs_expansion: detail_blocks.iter().any(DetailBlock::needs_expansion),
        detail_blocks,
        is_expanded,
    }
}

/// Render records for `events`, in the order given.
pub fn assemble<'a, I>(events: I, expansion: &ExpansionState, now: DateTime<Utc>) -> Vec<RenderRecord>
where
    I: IntoIterator<Item = &'a RawEvent>,
{
    events
        .into_iter()
        .map(|event| render_record(event, expansion, now))
        .collect()
}

/// "3 hours ago" style age of `created_at` relative to `now`. Input that is
/// not a timestamp comes back unchanged.
pub fn relative_date(created_at: &str, now: DateTime<Utc>) -> String {
    let Some(then) = parse_timestamp(created_at) else {
        return created_at.to_string();
    };

    let secs = (now - then).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }
    let (amount, unit) = match secs {
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 7 * 86_400 => (s / 86_400, "day"),
        s if s < 30 * 86_400 => (s / (7 * 86_400), "week"),
        s if s < 365 * 86_400 => (s / (30 * 86_400), "month"),
        s => (s / (365 * 86_400), "year"),
    };
    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}

/// One timeline view: an event list plus the filter and expansion state that
/// belong to it alone.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    events: Vec<RawEvent>,
    groups: Vec<EventGroup>,
    filter: FilterState,
    expansion: ExpansionState,
}

impl Timeline {
    pub fn new(events: Vec<RawEvent>) -> Self {
        let mut timeline = Self::default();
        timeline.set_events(events);
        timeline
    }

    /// Replace the event list. Facets are rebuilt; selections are kept and
    /// simply match nothing if their group disappeared.
    pub fn set_events(&mut self, events: Vec<RawEvent>) {
        self.groups = compute_groups(&events);
        self.events = events;
    }

    pub fn events(&self) -> &[RawEvent] {
        &self.events
    }

    pub fn groups(&self) -> &[EventGroup] {
        &self.groups
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn visible(&self) -> Vec<&RawEvent> {
        apply_filter(&self.events, &self.filter, &self.groups)
    }

    pub fn records(&self, now: DateTime<Utc>) -> Vec<RenderRecord> {
        assemble(self.visible(), &self.expansion, now)
    }

    /// `{facets, stats, events}` document for the non-interactive dump.
    pub fn export(&self, now: DateTime<Utc>) -> serde_json::Value {
        serde_json::json!({
            "facets": self.groups,
            "stats": ActivityStats::from_events(&self.events),
            "events": self.records(now),
        })
    }

    pub fn no_matches(&self) -> bool {
        self.filter.no_matches(&self.visible())
    }

    pub fn toggle_filter(&mut self, representative: &str) {
        self.filter = std::mem::take(&mut self.filter).toggle(representative);
    }

    pub fn clear_filter(&mut self) {
        self.filter = FilterState::clear();
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        self.expansion = std::mem::take(&mut self.expansion).toggle(id);
    }

    pub fn expand_visible(&mut self) {
        let ids: Vec<String> = self.visible().iter().map(|e| e.id.clone()).collect();
        let mut expansion = std::mem::take(&mut self.expansion);
        for id in &ids {
            expansion = expansion.set(id, true);
        }
        self.expansion = expansion;
    }

    pub fn collapse_all(&mut self) {
        self.expansion = ExpansionState::collapse_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn events() -> Vec<RawEvent> {
        serde_json::from_value(json!([
            {
                "id": "1",
                "type": "PushEvent",
                "actor": {"login": "octocat"},
                "repo": {"name": "a/b"},
                "payload": {"commits": [{"sha": "1111111aaa", "message": "one"}]},
                "created_at": "2024-06-15T09:00:00Z"
            },
            {
                "id": "2",
                "type": "IssueCommentEvent",
                "repo": {"name": "a/b"},
                "payload": {"issue": {"number": 3}, "comment": {"body": "q".repeat(500)}},
                "created_at": "not a date"
            },
            {
                "id": "3",
                "type": "ForkEvent",
                "repo": {"name": "c/d"},
                "payload": {"forkee": {"full_name": "me/d"}},
                "created_at": "2024-06-13T12:00:00Z"
            }
        ]))
        .unwrap()
    }

    #[test]
    fn relative_date_buckets() {
        let now = now();
        assert_eq!(relative_date("2024-06-15T11:59:30Z", now), "just now");
        assert_eq!(relative_date("2024-06-15T11:59:00Z", now), "1 minute ago");
        assert_eq!(relative_date("2024-06-15T11:15:00Z", now), "45 minutes ago");
        assert_eq!(relative_date("2024-06-15T09:00:00Z", now), "3 hours ago");
        assert_eq!(relative_date("2024-06-14T12:00:00Z", now), "1 day ago");
        assert_eq!(relative_date("2024-06-01T12:00:00Z", now), "2 weeks ago");
        assert_eq!(relative_date("2024-03-15T12:00:00Z", now), "3 months ago");
        assert_eq!(relative_date("2022-06-15T12:00:00Z", now), "2 years ago");
    }

    #[test]
    fn relative_date_fails_soft() {
        assert_eq!(relative_date("not a date", now()), "not a date");
        assert_eq!(relative_date("", now()), "");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        assert_eq!(relative_date("2024-06-16T12:00:00Z", now()), "just now");
    }

    #[test]
    fn expansion_defaults_to_collapsed_and_is_per_event() {
        let state = ExpansionState::new();
        assert!(!state.is_expanded("1"));
        let state = state.toggle("1");
        assert!(state.is_expanded("1"));
        assert!(!state.is_expanded("2"));
        let state = state.toggle("1");
        assert!(!state.is_expanded("1"));
    }

    #[test]
    fn assemble_builds_records_in_order() {
        let events = events();
        let records = assemble(&events, &ExpansionState::new(), now());
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        let push = &records[0];
        assert_eq!(push.label, "Push");
        assert_eq!(push.icon, "↑");
        assert_eq!(push.actor, "octocat");
        assert_eq!(push.relative_date, "3 hours ago");
        assert_eq!(push.description, "Pushed 1 commit(s) to a/b");
        assert_eq!(push.detail_blocks.len(), 1);
        assert!(!push.needs_expansion);

        let comment = &records[1];
        assert_eq!(comment.relative_date, "not a date");
        assert!(comment.needs_expansion);
        assert!(!comment.is_expanded);

        assert_eq!(records[2].description, "Forked c/d to me/d");
    }

    #[test]
    fn assemble_reflects_expansion_without_mutating_input() {
        let events = events();
        let before = events.clone();
        let expansion = ExpansionState::new().toggle("2");
        let records = assemble(&events, &expansion, now());
        assert!(records[1].is_expanded);
        assert!(!records[0].is_expanded);
        assert_eq!(events, before);
    }

    #[test]
    fn assemble_is_idempotent() {
        let events = events();
        let expansion = ExpansionState::new().toggle("1");
        assert_eq!(
            assemble(&events, &expansion, now()),
            assemble(&events, &expansion, now())
        );
    }

    #[test]
    fn empty_input_assembles_nothing() {
        assert!(assemble(&[], &ExpansionState::new(), now()).is_empty());
        let timeline = Timeline::new(vec![]);
        assert!(timeline.groups().is_empty());
        assert!(timeline.records(now()).is_empty());
        assert!(!timeline.no_matches());
    }

    #[test]
    fn timeline_filters_and_reports_no_matches() {
        let mut timeline = Timeline::new(events());
        timeline.toggle_filter("ForkEvent");
        let ids: Vec<_> = timeline.visible().iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, vec!["3"]);

        timeline.set_events(events().into_iter().take(2).collect());
        assert!(timeline.visible().is_empty());
        assert!(timeline.no_matches());

        timeline.clear_filter();
        assert_eq!(timeline.visible().len(), 2);
    }

    #[test]
    fn export_carries_facets_stats_and_events() {
        let timeline = Timeline::new(events());
        let doc = timeline.export(now());
        assert_eq!(doc["facets"].as_array().map(Vec::len), Some(3));
        assert_eq!(doc["stats"]["total_events"], 3);
        assert_eq!(doc["stats"]["distinct_repos"], 2);
        assert_eq!(doc["stats"]["most_active_repository"], "a/b");
        assert_eq!(doc["events"][0]["id"], "1");
        assert_eq!(doc["events"][2]["description"], "Forked c/d to me/d");
    }

    #[test]
    fn timelines_do_not_share_state() {
        let mut left = Timeline::new(events());
        let right = Timeline::new(events());
        left.toggle_filter("PushEvent");
        left.toggle_expanded("1");
        assert!(right.filter().is_empty());
        assert!(!right.expansion().is_expanded("1"));
    }

    #[test]
    fn expand_visible_then_collapse_all() {
        let mut timeline = Timeline::new(events());
        timeline.toggle_filter("PushEvent");
        timeline.expand_visible();
        assert!(timeline.expansion().is_expanded("1"));
        assert!(!timeline.expansion().is_expanded("3"));
        timeline.collapse_all();
        assert!(!timeline.expansion().is_expanded("1"));
    }
}
