//! Human-readable descriptions and detail blocks for events.
//!
//! The per-type functions here are the `describe` entries of the taxonomy
//! table. None of them can fail: absent fields render as `""`, `"Updated"`
//! or another literal fallback.

use serde::Serialize;

use crate::domain::*;
use crate::taxonomy;
use crate::text::{
    capitalize, first_line, linkify, needs_expansion, truncate, Segment, BODY_LINE_LIMIT,
    DEFAULT_MAX_LENGTH,
};

/// Commits shown while a push is collapsed.
pub const COMMIT_PREVIEW: usize = 3;
/// Collapsed width of a commit subject line.
pub const COMMIT_MESSAGE_MAX: usize = 72;
const SHORT_SHA: usize = 7;

pub fn describe(raw_type: &str, payload: &Payload, repo_name: &str) -> String {
    (taxonomy::lookup(raw_type).describe)(payload, repo_name)
}

pub fn describe_event(event: &RawEvent) -> String {
    describe(&event.event_type, &event.decoded_payload(), &event.repo.name)
}

/// Actor-first sentence, e.g. `"octocat pushed 2 commit(s) to a/b"`.
pub fn summary(event: &RawEvent) -> String {
    let description = describe_event(event);
    let mut chars = description.chars();
    let sentence = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };
    match event.actor_name() {
        "" => capitalize(&sentence),
        actor => format!("{} {}", actor, sentence),
    }
}

fn action_or_updated(payload: &Payload) -> String {
    payload
        .action()
        .map(capitalize)
        .unwrap_or_else(|| "Updated".to_string())
}

fn number_text(number: Option<u64>) -> String {
    number.map(|n| n.to_string()).unwrap_or_default()
}

/// Join the non-empty words with single spaces.
fn sentence(words: &[&str]) -> String {
    words
        .iter()
        .filter(|w| !w.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn push(payload: &Payload, repo: &str) -> String {
    let count = match payload {
        Payload::Push(p) => p.commits.as_ref().map_or(0, Vec::len),
        _ => 0,
    };
    format!("Pushed {} commit(s) to {}", count, repo)
}

pub fn pull_request(payload: &Payload, repo: &str) -> String {
    let (action, number) = match payload {
        Payload::PullRequest(p) => {
            let pr = p.pull_request.as_ref();
            let merged = pr.and_then(|pr| pr.merged).unwrap_or(false);
            let action = if p.action.as_deref() == Some("closed") && merged {
                "Merged".to_string()
            } else {
                action_or_updated(payload)
            };
            (action, p.number.or_else(|| pr.and_then(|pr| pr.number)))
        }
        _ => (action_or_updated(payload), None),
    };
    format!("{} pull request #{} in {}", action, number_text(number), repo)
}

pub fn issue(payload: &Payload, repo: &str) -> String {
    let number = match payload {
        Payload::Issues(p) => p.issue.as_ref().and_then(|i| i.number),
        _ => None,
    };
    format!(
        "{} issue #{} in {}",
        action_or_updated(payload),
        number_text(number),
        repo
    )
}

pub fn create(payload: &Payload, repo: &str) -> String {
    let (ref_type, ref_name) = ref_parts(payload);
    let ref_type = ref_type.unwrap_or("repository");
    if ref_type == "repository" {
        return format!("Created repository {}", repo);
    }
    sentence(&["Created", ref_type, ref_name.unwrap_or(""), "in", repo])
}

pub fn delete(payload: &Payload, repo: &str) -> String {
    let (ref_type, ref_name) = ref_parts(payload);
    sentence(&[
        "Deleted",
        ref_type.unwrap_or("ref"),
        ref_name.unwrap_or(""),
        "in",
        repo,
    ])
}

fn ref_parts(payload: &Payload) -> (Option<&str>, Option<&str>) {
    match payload {
        Payload::Ref(p) => (
            p.ref_type.as_deref().filter(|s| !s.is_empty()),
            p.ref_name.as_deref(),
        ),
        _ => (None, None),
    }
}

pub fn fork(payload: &Payload, repo: &str) -> String {
    let target = match payload {
        Payload::Fork(p) => p
            .forkee
            .as_ref()
            .and_then(|f| f.full_name.as_deref())
            .unwrap_or(""),
        _ => "",
    };
    format!("Forked {} to {}", repo, target)
}

pub fn watch(payload: &Payload, repo: &str) -> String {
    if payload.action() == Some("started") {
        format!("Starred {}", repo)
    } else {
        format!("Unstarred {}", repo)
    }
}

pub fn star(payload: &Payload, repo: &str) -> String {
    if payload.action() == Some("created") {
        format!("Starred {}", repo)
    } else {
        format!("Unstarred {}", repo)
    }
}

pub fn release(payload: &Payload, repo: &str) -> String {
    let tag = match payload {
        Payload::Release(p) => p
            .release
            .as_ref()
            .and_then(|r| r.tag_name.as_deref().or(r.name.as_deref()))
            .unwrap_or(""),
        _ => "",
    };
    let action = action_or_updated(payload);
    sentence(&[action.as_str(), "release", tag, "in", repo])
}

pub fn issue_comment(payload: &Payload, repo: &str) -> String {
    let (subject, number) = match payload {
        Payload::IssueComment(p) => {
            let issue = p.issue.as_ref();
            let subject = if issue.is_some_and(|i| i.pull_request.is_some()) {
                "pull request"
            } else {
                "issue"
            };
            (subject, issue.and_then(|i| i.number))
        }
        _ => ("issue", None),
    };
    format!(
        "{} {} #{} in {}",
        comment_verb(payload),
        subject,
        number_text(number),
        repo
    )
}

fn comment_verb(payload: &Payload) -> &'static str {
    match payload.action() {
        Some("edited") => "Edited a comment on",
        Some("deleted") => "Deleted a comment on",
        _ => "Commented on",
    }
}

pub fn commit_comment(payload: &Payload, repo: &str) -> String {
    let sha = match payload {
        Payload::CommitComment(p) => p
            .comment
            .as_ref()
            .and_then(|c| c.commit_id.as_deref())
            .map(short_sha)
            .unwrap_or_default(),
        _ => String::new(),
    };
    sentence(&["Commented on commit", sha.as_str(), "in", repo])
}

pub fn review(payload: &Payload, repo: &str) -> String {
    let (state, number) = match payload {
        Payload::Review(p) => (
            p.review.as_ref().and_then(|r| r.state.as_deref()),
            p.pull_request.as_ref().and_then(|pr| pr.number),
        ),
        _ => (None, None),
    };
    let verb = match state.map(str::to_ascii_lowercase).as_deref() {
        Some("approved") => "Approved",
        Some("changes_requested") => "Requested changes on",
        _ => "Reviewed",
    };
    format!("{} pull request #{} in {}", verb, number_text(number), repo)
}

pub fn review_comment(payload: &Payload, repo: &str) -> String {
    let number = match payload {
        Payload::ReviewComment(p) => p.pull_request.as_ref().and_then(|pr| pr.number),
        _ => None,
    };
    format!(
        "{} a review of pull request #{} in {}",
        comment_verb(payload),
        number_text(number),
        repo
    )
}

pub fn review_thread(payload: &Payload, repo: &str) -> String {
    let number = match payload {
        Payload::ReviewComment(p) => p.pull_request.as_ref().and_then(|pr| pr.number),
        _ => None,
    };
    format!(
        "{} a review thread on pull request #{} in {}",
        action_or_updated(payload),
        number_text(number),
        repo
    )
}

pub fn wiki(payload: &Payload, repo: &str) -> String {
    let pages = match payload {
        Payload::Gollum(p) => p.pages.as_ref().map_or(0, Vec::len),
        _ => 0,
    };
    format!("Updated {} wiki page(s) in {}", pages, repo)
}

pub fn member(payload: &Payload, repo: &str) -> String {
    let login = match payload {
        Payload::Member(p) => p
            .member
            .as_ref()
            .and_then(|m| m.login.as_deref())
            .unwrap_or(""),
        _ => "",
    };
    let action = action_or_updated(payload);
    sentence(&[action.as_str(), "member", login, "in", repo])
}

pub fn visibility(_payload: &Payload, repo: &str) -> String {
    format!("Made {} public", repo)
}

pub fn sponsorship(payload: &Payload, _repo: &str) -> String {
    let sponsorable = match payload {
        Payload::Sponsorship(p) => p
            .sponsorship
            .as_ref()
            .and_then(|s| s.sponsorable.as_ref())
            .and_then(|u| u.login.as_deref())
            .unwrap_or(""),
        _ => "",
    };
    if sponsorable.is_empty() {
        format!("{} sponsorship", action_or_updated(payload))
    } else {
        format!("{} sponsorship for {}", action_or_updated(payload), sponsorable)
    }
}

pub fn activity(_payload: &Payload, repo: &str) -> String {
    sentence(&["Activity in", repo])
}

fn short_sha(sha: &str) -> String {
    sha.chars().take(SHORT_SHA).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBody {
    pub segments: Vec<Segment>,
    pub needs_expansion: bool,
}

impl TextBody {
    /// `None` for blank text: a block never carries an empty body.
    fn from_text(text: Option<&str>, expanded: bool) -> Option<Self> {
        let text = text.map(str::trim).filter(|t| !t.is_empty())?;
        Some(Self {
            segments: linkify(text, expanded, DEFAULT_MAX_LENGTH),
            needs_expansion: needs_expansion(text, BODY_LINE_LIMIT),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitLine {
    pub sha: String,
    pub message: Vec<Segment>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Issue,
    PullRequest,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issue => "Issue",
            Self::PullRequest => "Pull request",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum DetailBlock {
    Commits {
        commits: Vec<CommitLine>,
        total: usize,
        expandable: bool,
    },
    Comment {
        body: TextBody,
    },
    Review {
        state: Option<String>,
        body: Option<TextBody>,
    },
    Subject {
        subject: SubjectKind,
        number: Option<u64>,
        title: String,
        body: Option<TextBody>,
    },
    Release {
        name: String,
        body: Option<TextBody>,
    },
}

impl DetailBlock {
    /// Whether expanding the owning event would reveal more of this block.
    pub fn needs_expansion(&self) -> bool {
        match self {
            Self::Commits { expandable, .. } => *expandable,
            Self::Comment { body } => body.needs_expansion,
            Self::Review { body, .. }
            | Self::Subject { body, .. }
            | Self::Release { body, .. } => body.as_ref().is_some_and(|b| b.needs_expansion),
        }
    }
}

/// Type-specific detail blocks for `payload`, in their collapsed or expanded
/// form. A sub-renderer whose payload field is absent contributes nothing.
pub fn detail_blocks(payload: &Payload, expanded: bool) -> Vec<DetailBlock> {
    let block = match payload {
        Payload::Push(p) => p.commits.as_deref().and_then(|c| commits_block(c, expanded)),
        Payload::PullRequest(p) => p.pull_request.as_ref().map(|pr| DetailBlock::Subject {
            subject: SubjectKind::PullRequest,
            number: pr.number.or(p.number),
            title: pr.title.clone().unwrap_or_default(),
            body: TextBody::from_text(pr.body.as_deref(), expanded),
        }),
        Payload::Issues(p) => p.issue.as_ref().map(|issue| DetailBlock::Subject {
            subject: SubjectKind::Issue,
            number: issue.number,
            title: issue.title.clone().unwrap_or_default(),
            body: TextBody::from_text(issue.body.as_deref(), expanded),
        }),
        Payload::IssueComment(p) => comment_block(p.comment.as_ref(), expanded),
        Payload::CommitComment(p) => comment_block(p.comment.as_ref(), expanded),
        Payload::ReviewComment(p) => comment_block(p.comment.as_ref(), expanded),
        Payload::Review(p) => p.review.as_ref().and_then(|review| {
            let state = review
                .state
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_string);
            let body = TextBody::from_text(review.body.as_deref(), expanded);
            (state.is_some() || body.is_some()).then_some(DetailBlock::Review { state, body })
        }),
        Payload::Release(p) => p.release.as_ref().and_then(|release| {
            let name = release
                .name
                .as_deref()
                .or(release.tag_name.as_deref())
                .unwrap_or("")
                .to_string();
            let body = TextBody::from_text(release.body.as_deref(), expanded);
            (!name.is_empty() || body.is_some()).then_some(DetailBlock::Release { name, body })
        }),
        _ => None,
    };
    block.into_iter().collect()
}

fn comment_block(comment: Option<&Comment>, expanded: bool) -> Option<DetailBlock> {
    let body = TextBody::from_text(comment?.body.as_deref(), expanded)?;
    Some(DetailBlock::Comment { body })
}

fn commits_block(commits: &[Commit], expanded: bool) -> Option<DetailBlock> {
    if commits.is_empty() {
        return None;
    }
    let expandable = commits.len() > COMMIT_PREVIEW
        || commits.iter().any(|c| {
            first_line(c.message.as_deref().unwrap_or("")).chars().count() > COMMIT_MESSAGE_MAX
        });
    let shown = if expanded {
        commits.len()
    } else {
        COMMIT_PREVIEW
    };
    let lines = commits
        .iter()
        .take(shown)
        .map(|commit| {
            let subject = first_line(commit.message.as_deref().unwrap_or(""));
            let message = if expanded {
                linkify(subject, true, COMMIT_MESSAGE_MAX)
            } else {
                linkify(&truncate(subject, COMMIT_MESSAGE_MAX), true, COMMIT_MESSAGE_MAX)
            };
            CommitLine {
                sha: short_sha(commit.sha.as_deref().unwrap_or("")),
                message,
                author: commit
                    .author
                    .as_ref()
                    .and_then(|a| a.name.clone())
                    .filter(|name| !name.is_empty()),
            }
        })
        .collect();
    Some(DetailBlock::Commits {
        commits: lines,
        total: commits.len(),
        expandable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(kind: EventKind, raw: serde_json::Value) -> Payload {
        Payload::decode(kind, Some(&raw))
    }

    #[test]
    fn watch_started_and_stopped() {
        let started = payload(EventKind::Watch, json!({"action": "started"}));
        assert_eq!(describe("WatchEvent", &started, "a/b"), "Starred a/b");
        let stopped = payload(EventKind::Watch, json!({"action": "stopped"}));
        assert_eq!(describe("WatchEvent", &stopped, "a/b"), "Unstarred a/b");
    }

    #[test]
    fn push_counts_commits_with_zero_default() {
        let two = payload(
            EventKind::Push,
            json!({"commits": [{"sha": "1"}, {"sha": "2"}]}),
        );
        assert_eq!(describe("PushEvent", &two, "a/b"), "Pushed 2 commit(s) to a/b");
        assert_eq!(
            describe("PushEvent", &Payload::Empty, "a/b"),
            "Pushed 0 commit(s) to a/b"
        );
    }

    #[test]
    fn lifecycle_events_default_action_and_number() {
        let opened = payload(
            EventKind::PullRequest,
            json!({"action": "opened", "number": 7}),
        );
        assert_eq!(
            describe("PullRequestEvent", &opened, "a/b"),
            "Opened pull request #7 in a/b"
        );
        assert_eq!(
            describe("PullRequestEvent", &Payload::Empty, "a/b"),
            "Updated pull request # in a/b"
        );
        assert_eq!(
            describe("IssuesEvent", &Payload::Empty, "a/b"),
            "Updated issue # in a/b"
        );
        let closed = payload(
            EventKind::Issues,
            json!({"action": "closed", "issue": {"number": 12}}),
        );
        assert_eq!(describe("IssuesEvent", &closed, "a/b"), "Closed issue #12 in a/b");
    }

    #[test]
    fn merged_pull_request_reads_merged() {
        let merged = payload(
            EventKind::PullRequest,
            json!({"action": "closed", "pull_request": {"number": 3, "merged": true}}),
        );
        assert_eq!(
            describe("PullRequestEvent", &merged, "a/b"),
            "Merged pull request #3 in a/b"
        );
    }

    #[test]
    fn fork_names_target_or_empty() {
        let forked = payload(EventKind::Fork, json!({"forkee": {"full_name": "me/b"}}));
        assert_eq!(describe("ForkEvent", &forked, "a/b"), "Forked a/b to me/b");
        assert_eq!(describe("ForkEvent", &Payload::Empty, "a/b"), "Forked a/b to ");
    }

    #[test]
    fn create_and_delete_refs() {
        let branch = payload(
            EventKind::Create,
            json!({"ref": "feature", "ref_type": "branch"}),
        );
        assert_eq!(
            describe("CreateEvent", &branch, "a/b"),
            "Created branch feature in a/b"
        );
        assert_eq!(
            describe("CreateEvent", &Payload::Empty, "a/b"),
            "Created repository a/b"
        );
        let tag = payload(EventKind::Delete, json!({"ref": "v1", "ref_type": "tag"}));
        assert_eq!(describe("DeleteEvent", &tag, "a/b"), "Deleted tag v1 in a/b");
    }

    #[test]
    fn review_state_picks_verb() {
        let approved = payload(
            EventKind::PullRequestReview,
            json!({"review": {"state": "APPROVED"}, "pull_request": {"number": 9}}),
        );
        assert_eq!(
            describe("PullRequestReviewEvent", &approved, "a/b"),
            "Approved pull request #9 in a/b"
        );
    }

    #[test]
    fn unknown_type_uses_activity_fallback() {
        assert_eq!(
            describe("SomethingNewEvent", &Payload::Empty, "a/b"),
            "Activity in a/b"
        );
    }

    #[test]
    fn summary_leads_with_actor() {
        let event: RawEvent = serde_json::from_value(json!({
            "id": "1",
            "type": "WatchEvent",
            "actor": {"login": "octocat"},
            "repo": {"name": "a/b"},
            "payload": {"action": "started"}
        }))
        .unwrap();
        assert_eq!(summary(&event), "octocat starred a/b");
    }

    #[test]
    fn detail_blocks_absent_fields_render_nothing() {
        assert!(detail_blocks(&Payload::Empty, false).is_empty());
        let no_comment = payload(EventKind::IssueComment, json!({"action": "created"}));
        assert!(detail_blocks(&no_comment, false).is_empty());
        let blank_comment = payload(
            EventKind::IssueComment,
            json!({"comment": {"body": "   "}}),
        );
        assert!(detail_blocks(&blank_comment, true).is_empty());
        let empty_push = payload(EventKind::Push, json!({"commits": []}));
        assert!(detail_blocks(&empty_push, false).is_empty());
    }

    #[test]
    fn commit_list_previews_until_expanded() {
        let commits: Vec<_> = (0..5)
            .map(|i| json!({"sha": format!("abcdef123{i}"), "message": format!("change {i}\n\nbody")}))
            .collect();
        let push = payload(EventKind::Push, json!({ "commits": commits }));

        let collapsed = detail_blocks(&push, false);
        let [DetailBlock::Commits { commits, total, expandable }] = collapsed.as_slice() else {
            panic!("expected commits block");
        };
        assert_eq!(commits.len(), COMMIT_PREVIEW);
        assert_eq!(*total, 5);
        assert!(*expandable);
        assert_eq!(commits[0].sha, "abcdef1");
        assert_eq!(commits[0].message, vec![Segment::text("change 0")]);

        let expanded = detail_blocks(&push, true);
        let [DetailBlock::Commits { commits, .. }] = expanded.as_slice() else {
            panic!("expected commits block");
        };
        assert_eq!(commits.len(), 5);
    }

    #[test]
    fn long_comment_is_truncated_until_expanded() {
        let body = "z".repeat(300);
        let comment = payload(EventKind::IssueComment, json!({"comment": {"body": body}}));

        let collapsed = detail_blocks(&comment, false);
        assert!(collapsed[0].needs_expansion());
        let DetailBlock::Comment { body: text } = &collapsed[0] else {
            panic!("expected comment block");
        };
        assert_eq!(
            text.segments,
            vec![Segment::text(format!("{}...", "z".repeat(DEFAULT_MAX_LENGTH)))]
        );

        let expanded = detail_blocks(&comment, true);
        let DetailBlock::Comment { body: text } = &expanded[0] else {
            panic!("expected comment block");
        };
        assert_eq!(text.segments, vec![Segment::text("z".repeat(300))]);
        assert!(expanded[0].needs_expansion());
    }

    #[test]
    fn pull_request_subject_carries_title_and_body() {
        let pr = payload(
            EventKind::PullRequest,
            json!({"number": 4, "pull_request": {"title": "Add docs", "body": "See https://x.io"}}),
        );
        let blocks = detail_blocks(&pr, false);
        assert_eq!(
            blocks,
            vec![DetailBlock::Subject {
                subject: SubjectKind::PullRequest,
                number: Some(4),
                title: "Add docs".to_string(),
                body: Some(TextBody {
                    segments: vec![
                        Segment::text("See "),
                        Segment::Link {
                            display: "https://x.io".to_string(),
                            target: "https://x.io".to_string(),
                        },
                    ],
                    needs_expansion: false,
                }),
            }]
        );
    }

    #[test]
    fn review_block_needs_state_or_body() {
        let bare = payload(EventKind::PullRequestReview, json!({"review": {}}));
        assert!(detail_blocks(&bare, false).is_empty());
        let stated = payload(
            EventKind::PullRequestReview,
            json!({"review": {"state": "commented"}}),
        );
        assert_eq!(
            detail_blocks(&stated, false),
            vec![DetailBlock::Review {
                state: Some("commented".to_string()),
                body: None
            }]
        );
    }

    #[test]
    fn malformed_sibling_fields_do_not_blank_the_event() {
        let pr = payload(
            EventKind::PullRequest,
            json!({"action": "opened", "number": "42", "pull_request": {"title": "T", "body": "B"}}),
        );
        assert_eq!(
            describe("PullRequestEvent", &pr, "a/b"),
            "Opened pull request #42 in a/b"
        );
        assert_eq!(detail_blocks(&pr, false).len(), 1);

        let push = payload(
            EventKind::Push,
            json!({"commits": [{"sha": "abcdef0123", "message": "fix"}, null]}),
        );
        assert_eq!(describe("PushEvent", &push, "a/b"), "Pushed 1 commit(s) to a/b");
        assert_eq!(detail_blocks(&push, false).len(), 1);
    }
}
