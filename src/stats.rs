//! Aggregate numbers shown in the status bar and the JSON dump.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::RawEvent;
use crate::taxonomy;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActivityStats {
    pub total_events: usize,
    /// Per taxonomy label, most frequent first. Ties keep first-seen order.
    pub by_label: Vec<(&'static str, usize)>,
    pub distinct_repos: usize,
    pub most_active_repository: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
    /// Consecutive calendar days (UTC) with activity, ending on the day of
    /// `last_activity`.
    pub streak_days: u32,
}

impl ActivityStats {
    pub fn from_events(events: &[RawEvent]) -> Self {
        if events.is_empty() {
            return Self::default();
        }

        let mut by_label: Vec<(&'static str, usize)> = Vec::new();
        let mut repo_order: Vec<&str> = Vec::new();
        let mut repo_counts: HashMap<&str, usize> = HashMap::new();
        let mut days: BTreeSet<NaiveDate> = BTreeSet::new();
        let mut last_activity: Option<DateTime<Utc>> = None;

        for event in events {
            let label = taxonomy::lookup(&event.event_type).label;
            match by_label.iter_mut().find(|(l, _)| *l == label) {
                Some((_, count)) => *count += 1,
                None => by_label.push((label, 1)),
            }

            let repo = event.repo.name.as_str();
            if !repo.is_empty() {
                let count = repo_counts.entry(repo).or_insert(0);
                if *count == 0 {
                    repo_order.push(repo);
                }
                *count += 1;
            }

            if let Some(ts) = event.timestamp() {
                days.insert(ts.date_naive());
                last_activity = Some(last_activity.map_or(ts, |prev| prev.max(ts)));
            }
        }

        by_label.sort_by(|a, b| b.1.cmp(&a.1));

        // Strictly greater keeps the first-seen repository on ties.
        let mut most_active: Option<(&str, usize)> = None;
        for repo in &repo_order {
            let count = repo_counts[repo];
            if most_active.map_or(true, |(_, best)| count > best) {
                most_active = Some((*repo, count));
            }
        }

        Self {
            total_events: events.len(),
            by_label,
            distinct_repos: repo_order.len(),
            most_active_repository: most_active.map(|(repo, _)| repo.to_string()),
            streak_days: last_activity.map_or(0, |last| streak(&days, last.date_naive())),
            last_activity,
        }
    }
}

fn streak(days: &BTreeSet<NaiveDate>, last: NaiveDate) -> u32 {
    let mut count = 0;
    let mut day = last;
    while days.contains(&day) {
        count += 1;
        day -= Duration::days(1);
    }
    count
}
