use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{lenient, EventKind};

/// Typed view over an event's untyped payload.
///
/// Each variant only declares the fields the renderer reads, and every field
/// is optional. A field with the wrong shape decodes to `None` on its own and
/// leaves its siblings intact. A payload that is absent or not an object
/// decodes to `Empty`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Push(PushPayload),
    PullRequest(PullRequestPayload),
    Issues(IssuesPayload),
    Ref(RefPayload),
    Fork(ForkPayload),
    Star(StarPayload),
    Release(ReleasePayload),
    IssueComment(IssueCommentPayload),
    CommitComment(CommitCommentPayload),
    Review(ReviewPayload),
    ReviewComment(ReviewCommentPayload),
    Gollum(GollumPayload),
    Member(MemberPayload),
    Sponsorship(SponsorshipPayload),
    Generic(GenericPayload),
    Empty,
}

impl Payload {
    pub fn decode(kind: EventKind, raw: Option<&serde_json::Value>) -> Self {
        let Some(raw) = raw.filter(|value| value.is_object()) else {
            return Self::Empty;
        };

        let decoded = match kind {
            EventKind::Push => parse(raw).map(Self::Push),
            EventKind::PullRequest => parse(raw).map(Self::PullRequest),
            EventKind::Issues => parse(raw).map(Self::Issues),
            EventKind::Create | EventKind::Delete => parse(raw).map(Self::Ref),
            EventKind::Fork => parse(raw).map(Self::Fork),
            EventKind::Watch | EventKind::Star => parse(raw).map(Self::Star),
            EventKind::Release => parse(raw).map(Self::Release),
            EventKind::IssueComment => parse(raw).map(Self::IssueComment),
            EventKind::CommitComment => parse(raw).map(Self::CommitComment),
            EventKind::PullRequestReview => parse(raw).map(Self::Review),
            EventKind::PullRequestReviewComment | EventKind::PullRequestReviewThread => {
                parse(raw).map(Self::ReviewComment)
            }
            EventKind::Gollum => parse(raw).map(Self::Gollum),
            EventKind::Member => parse(raw).map(Self::Member),
            EventKind::Sponsorship => parse(raw).map(Self::Sponsorship),
            EventKind::Public | EventKind::Other => parse(raw).map(Self::Generic),
        };

        decoded.unwrap_or_else(|err| {
            tracing::debug!("payload for {} did not match its shape: {}", kind, err);
            Self::Empty
        })
    }

    /// The `action` field, for variants that carry one.
    pub fn action(&self) -> Option<&str> {
        let action = match self {
            Self::PullRequest(p) => &p.action,
            Self::Issues(p) => &p.action,
            Self::Star(p) => &p.action,
            Self::Release(p) => &p.action,
            Self::IssueComment(p) => &p.action,
            Self::CommitComment(p) => &p.action,
            Self::Review(p) => &p.action,
            Self::ReviewComment(p) => &p.action,
            Self::Member(p) => &p.action,
            Self::Sponsorship(p) => &p.action,
            Self::Generic(p) => &p.action,
            Self::Push(_) | Self::Ref(_) | Self::Fork(_) | Self::Gollum(_) | Self::Empty => {
                return None
            }
        };
        action.as_deref().filter(|a| !a.is_empty())
    }
}

fn parse<T: DeserializeOwned>(raw: &serde_json::Value) -> serde_json::Result<T> {
    T::deserialize(raw)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PushPayload {
    #[serde(rename = "ref", deserialize_with = "lenient::optional")]
    pub ref_name: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub size: Option<u64>,
    #[serde(deserialize_with = "lenient::list")]
    pub commits: Option<Vec<Commit>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Commit {
    #[serde(deserialize_with = "lenient::optional")]
    pub sha: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub author: Option<CommitAuthor>,
    #[serde(deserialize_with = "lenient::optional")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommitAuthor {
    #[serde(deserialize_with = "lenient::optional")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PullRequestPayload {
    #[serde(deserialize_with = "lenient::optional")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub number: Option<u64>,
    #[serde(deserialize_with = "lenient::optional")]
    pub pull_request: Option<PullRequest>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    #[serde(deserialize_with = "lenient::number")]
    pub number: Option<u64>,
    #[serde(deserialize_with = "lenient::optional")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub body: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub merged: Option<bool>,
    #[serde(deserialize_with = "lenient::optional")]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IssuesPayload {
    #[serde(deserialize_with = "lenient::optional")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub issue: Option<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Issue {
    #[serde(deserialize_with = "lenient::number")]
    pub number: Option<u64>,
    #[serde(deserialize_with = "lenient::optional")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub body: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub html_url: Option<String>,
    /// Present when the issue is actually a pull request.
    #[serde(deserialize_with = "lenient::optional")]
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RefPayload {
    #[serde(rename = "ref", deserialize_with = "lenient::optional")]
    pub ref_name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub ref_type: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub master_branch: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForkPayload {
    #[serde(deserialize_with = "lenient::optional")]
    pub forkee: Option<Forkee>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Forkee {
    #[serde(deserialize_with = "lenient::optional")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarPayload {
    #[serde(deserialize_with = "lenient::optional")]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReleasePayload {
    #[serde(deserialize_with = "lenient::optional")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub release: Option<Release>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Release {
    #[serde(deserialize_with = "lenient::optional")]
    pub tag_name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub body: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub html_url: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub prerelease: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct IssueCommentPayload {
    #[serde(deserialize_with = "lenient::optional")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub issue: Option<Issue>,
    #[serde(deserialize_with = "lenient::optional")]
    pub comment: Option<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Comment {
    #[serde(deserialize_with = "lenient::optional")]
    pub body: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub html_url: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub commit_id: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub path: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub user: Option<UserRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserRef {
    #[serde(deserialize_with = "lenient::optional")]
    pub login: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommitCommentPayload {
    #[serde(deserialize_with = "lenient::optional")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub comment: Option<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReviewPayload {
    #[serde(deserialize_with = "lenient::optional")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub pull_request: Option<PullRequest>,
    #[serde(deserialize_with = "lenient::optional")]
    pub review: Option<Review>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Review {
    #[serde(deserialize_with = "lenient::optional")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub body: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReviewCommentPayload {
    #[serde(deserialize_with = "lenient::optional")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub pull_request: Option<PullRequest>,
    #[serde(deserialize_with = "lenient::optional")]
    pub comment: Option<Comment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GollumPayload {
    #[serde(deserialize_with = "lenient::list")]
    pub pages: Option<Vec<WikiPage>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WikiPage {
    #[serde(deserialize_with = "lenient::optional")]
    pub page_name: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MemberPayload {
    #[serde(deserialize_with = "lenient::optional")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub member: Option<UserRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SponsorshipPayload {
    #[serde(deserialize_with = "lenient::optional")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient::optional")]
    pub sponsorship: Option<Sponsorship>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Sponsorship {
    #[serde(deserialize_with = "lenient::optional")]
    pub sponsor: Option<UserRef>,
    #[serde(deserialize_with = "lenient::optional")]
    pub sponsorable: Option<UserRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenericPayload {
    #[serde(deserialize_with = "lenient::optional")]
    pub action: Option<String>,
}
