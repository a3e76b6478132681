use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{lenient, Payload};
use crate::taxonomy;

/// One activity record as delivered by the producer (GitHub events API shape).
///
/// Every field is optional on the wire. Missing, `null` or mistyped fields
/// deserialize to their defaults so a sparse record still lands in the
/// timeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    #[serde(deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    pub event_type: String,
    #[serde(deserialize_with = "lenient::or_default")]
    pub actor: Actor,
    #[serde(deserialize_with = "lenient::or_default")]
    pub repo: Repo,
    pub payload: Option<serde_json::Value>,
    #[serde(deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(deserialize_with = "lenient::optional")]
    pub public: Option<bool>,
    #[serde(deserialize_with = "lenient::optional")]
    pub org: Option<Org>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Actor {
    #[serde(deserialize_with = "lenient::string")]
    pub login: String,
    #[serde(deserialize_with = "lenient::optional")]
    pub display_login: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub avatar_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repo {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(deserialize_with = "lenient::optional")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Org {
    #[serde(deserialize_with = "lenient::string")]
    pub login: String,
}

impl RawEvent {
    pub fn kind(&self) -> EventKind {
        taxonomy::lookup(&self.event_type).kind
    }

    /// Typed view of the payload for this event's kind.
    pub fn decoded_payload(&self) -> Payload {
        Payload::decode(self.kind(), self.payload.as_ref())
    }

    /// Parsed `created_at`, or `None` when it is not a recognizable timestamp.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn actor_name(&self) -> &str {
        self.actor
            .display_login
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.actor.login)
    }
}

/// Accepts RFC 3339 (`2024-05-01T12:00:00Z`) and offset-less ISO-8601, which
/// is read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    Push,
    PullRequest,
    Issues,
    Create,
    Delete,
    Fork,
    Watch,
    Star,
    Release,
    IssueComment,
    CommitComment,
    PullRequestReview,
    PullRequestReviewComment,
    PullRequestReviewThread,
    Gollum,
    Member,
    Public,
    Sponsorship,
    Other,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Push => "Push",
            Self::PullRequest => "PullRequest",
            Self::Issues => "Issues",
            Self::Create => "Create",
            Self::Delete => "Delete",
            Self::Fork => "Fork",
            Self::Watch => "Watch",
            Self::Star => "Star",
            Self::Release => "Release",
            Self::IssueComment => "IssueComment",
            Self::CommitComment => "CommitComment",
            Self::PullRequestReview => "PullRequestReview",
            Self::PullRequestReviewComment => "PullRequestReviewComment",
            Self::PullRequestReviewThread => "PullRequestReviewThread",
            Self::Gollum => "Gollum",
            Self::Member => "Member",
            Self::Public => "Public",
            Self::Sponsorship => "Sponsorship",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
