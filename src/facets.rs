//! Label-based grouping of events into filter facets, and the filter itself.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::domain::RawEvent;
use crate::taxonomy::{self, Tone};

/// One filter facet: every raw type sharing a taxonomy label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventGroup {
    pub label: &'static str,
    pub icon: &'static str,
    pub tone: Tone,
    /// First raw type seen under this label; stands in for the whole group.
    pub representative_type: String,
    pub member_types: BTreeSet<String>,
    /// Events across all member types.
    pub count: usize,
}

/// Group `events` by label, most frequent first. Equal counts keep the order
/// in which their labels were first seen.
pub fn compute_groups(events: &[RawEvent]) -> Vec<EventGroup> {
    let mut groups: Vec<EventGroup> = Vec::new();
    let mut by_label: HashMap<&'static str, usize> = HashMap::new();

    for event in events {
        let spec = taxonomy::lookup(&event.event_type);
        let idx = *by_label.entry(spec.label).or_insert_with(|| {
            groups.push(EventGroup {
                label: spec.label,
                icon: spec.icon,
                tone: spec.tone,
                representative_type: event.event_type.clone(),
                member_types: BTreeSet::new(),
                count: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[idx];
        group.member_types.insert(event.event_type.clone());
        group.count += 1;
    }

    // `sort_by` is stable, which keeps first-seen order among ties.
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// Events whose type belongs to a selected group, in input order. An empty
/// selection shows everything.
pub fn apply_filter<'a>(
    events: &'a [RawEvent],
    selected: &FilterState,
    groups: &[EventGroup],
) -> Vec<&'a RawEvent> {
    if selected.is_empty() {
        return events.iter().collect();
    }

    let targets: BTreeSet<&str> = groups
        .iter()
        .filter(|group| selected.contains(&group.representative_type))
        .flat_map(|group| group.member_types.iter().map(String::as_str))
        .collect();

    events
        .iter()
        .filter(|event| targets.contains(event.event_type.as_str()))
        .collect()
}

/// Selected group representatives. Empty means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    selected: BTreeSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `representative` if it is not selected, deselect it otherwise.
    pub fn toggle(mut self, representative: &str) -> Self {
        if !self.selected.remove(representative) {
            self.selected.insert(representative.to_string());
        }
        self
    }

    pub fn clear() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, representative: &str) -> bool {
        self.selected.contains(representative)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// A filter is active but nothing passed it.
    pub fn no_matches(&self, filtered: &[&RawEvent]) -> bool {
        !self.is_empty() && filtered.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for FilterState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, event_type: &str) -> RawEvent {
        RawEvent {
            id: id.to_string(),
            event_type: event_type.to_string(),
            ..RawEvent::default()
        }
    }

    fn sample() -> Vec<RawEvent> {
        vec![
            event("1", "WatchEvent"),
            event("2", "PushEvent"),
            event("3", "ForkEvent"),
            event("4", "PushEvent"),
            event("5", "StarEvent"),
            event("6", "MysteryEvent"),
            event("7", "PushEvent"),
            event("8", "OtherMysteryEvent"),
        ]
    }

    fn ids(events: &[&RawEvent]) -> Vec<String> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn groups_sorted_by_count() {
        let events = vec![event("1", "PushEvent"), event("2", "ForkEvent"), event("3", "PushEvent")];
        let groups = compute_groups(&events);
        let summary: Vec<_> = groups.iter().map(|g| (g.label, g.count)).collect();
        assert_eq!(summary, vec![("Push", 2), ("Fork", 1)]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let events = vec![
            event("1", "ForkEvent"),
            event("2", "ReleaseEvent"),
            event("3", "GollumEvent"),
        ];
        let labels: Vec<_> = compute_groups(&events).iter().map(|g| g.label).collect();
        assert_eq!(labels, vec!["Fork", "Release", "Wiki"]);
    }

    #[test]
    fn shared_labels_collapse_into_one_group() {
        let groups = compute_groups(&sample());
        let star = groups.iter().find(|g| g.label == "Star").unwrap();
        assert_eq!(star.representative_type, "WatchEvent");
        assert_eq!(star.count, 2);
        assert_eq!(
            star.member_types.iter().collect::<Vec<_>>(),
            vec!["StarEvent", "WatchEvent"]
        );

        let fallback = groups.iter().find(|g| g.label == "Activity").unwrap();
        assert_eq!(fallback.representative_type, "MysteryEvent");
        assert_eq!(fallback.count, 2);
    }

    #[test]
    fn groups_partition_the_raw_types() {
        let events = sample();
        let groups = compute_groups(&events);
        let distinct: BTreeSet<String> = events.iter().map(|e| e.event_type.clone()).collect();

        let mut union = BTreeSet::new();
        let mut total = 0;
        for group in &groups {
            for member in &group.member_types {
                assert!(union.insert(member.clone()), "{member} in two groups");
            }
            total += group.count;
        }
        assert_eq!(union, distinct);
        assert_eq!(total, events.len());
    }

    #[test]
    fn empty_input_gives_no_groups() {
        assert!(compute_groups(&[]).is_empty());
    }

    #[test]
    fn empty_selection_is_identity() {
        let events = sample();
        let groups = compute_groups(&events);
        let filtered = apply_filter(&events, &FilterState::new(), &groups);
        assert_eq!(filtered.len(), events.len());
        assert!(filtered.iter().zip(&events).all(|(a, b)| std::ptr::eq(*a, b)));
    }

    #[test]
    fn selection_expands_to_member_types() {
        let events = sample();
        let groups = compute_groups(&events);
        let selected = FilterState::new().toggle("WatchEvent");
        assert_eq!(ids(&apply_filter(&events, &selected, &groups)), vec!["1", "5"]);
    }

    #[test]
    fn union_of_selections_is_a_superset() {
        let events = sample();
        let groups = compute_groups(&events);
        let push = FilterState::new().toggle("PushEvent");
        let both = push.clone().toggle("ForkEvent");

        let narrow = ids(&apply_filter(&events, &push, &groups));
        let wide = ids(&apply_filter(&events, &both, &groups));
        assert!(narrow.iter().all(|id| wide.contains(id)));
        assert_eq!(wide, vec!["2", "3", "4", "7"]);
    }

    #[test]
    fn stale_representative_matches_nothing() {
        let pushes = vec![event("1", "PushEvent")];
        let selected = FilterState::new().toggle("PushEvent");

        let forks = vec![event("2", "ForkEvent"), event("3", "ForkEvent")];
        let groups = compute_groups(&forks);
        let filtered = apply_filter(&forks, &selected, &groups);
        assert!(filtered.is_empty());
        assert!(selected.no_matches(&filtered));

        let groups = compute_groups(&pushes);
        assert_eq!(apply_filter(&pushes, &selected, &groups).len(), 1);
    }

    #[test]
    fn toggle_is_an_involution() {
        let state: FilterState = ["PushEvent", "ForkEvent"].into_iter().collect();
        for t in ["PushEvent", "WatchEvent", ""] {
            assert_eq!(state.clone().toggle(t).toggle(t), state);
        }
    }

    #[test]
    fn clear_empties_selection() {
        let state = FilterState::new().toggle("PushEvent");
        assert_eq!(state.len(), 1);
        assert!(FilterState::clear().is_empty());
        assert!(!FilterState::clear().no_matches(&[]));
    }

    #[test]
    fn recomputation_is_idempotent() {
        let events = sample();
        assert_eq!(compute_groups(&events), compute_groups(&events));
    }
}
