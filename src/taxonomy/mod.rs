use serde::Serialize;

use crate::describe;
use crate::domain::{EventKind, Payload};

/// Presentation color class for a descriptor; resolved to a terminal color by
/// [`crate::theme::tone_color`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Green,
    Purple,
    Yellow,
    Cyan,
    Blue,
    Red,
    Magenta,
    Muted,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Yellow => "yellow",
            Self::Cyan => "cyan",
            Self::Blue => "blue",
            Self::Red => "red",
            Self::Magenta => "magenta",
            Self::Muted => "muted",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TaxonomyDescriptor {
    pub raw_type: &'static str,
    pub kind: EventKind,
    pub icon: &'static str,
    pub tone: Tone,
    /// Grouping key: raw types sharing a label form one filter facet.
    pub label: &'static str,
    pub describe: fn(&Payload, &str) -> String,
}

impl TaxonomyDescriptor {
    pub fn is_default(&self) -> bool {
        std::ptr::eq(self, &DEFAULT)
    }
}

pub static DEFAULT: TaxonomyDescriptor = TaxonomyDescriptor {
    raw_type: "default",
    kind: EventKind::Other,
    icon: "•",
    tone: Tone::Muted,
    label: "Activity",
    describe: describe::activity,
};

static REGISTRY: &[TaxonomyDescriptor] = &[
    TaxonomyDescriptor {
        raw_type: "PushEvent",
        kind: EventKind::Push,
        icon: "↑",
        tone: Tone::Green,
        label: "Push",
        describe: describe::push,
    },
    TaxonomyDescriptor {
        raw_type: "PullRequestEvent",
        kind: EventKind::PullRequest,
        icon: "⇄",
        tone: Tone::Purple,
        label: "Pull Request",
        describe: describe::pull_request,
    },
    TaxonomyDescriptor {
        raw_type: "IssuesEvent",
        kind: EventKind::Issues,
        icon: "◎",
        tone: Tone::Yellow,
        label: "Issue",
        describe: describe::issue,
    },
    TaxonomyDescriptor {
        raw_type: "CreateEvent",
        kind: EventKind::Create,
        icon: "+",
        tone: Tone::Cyan,
        label: "Create",
        describe: describe::create,
    },
    TaxonomyDescriptor {
        raw_type: "DeleteEvent",
        kind: EventKind::Delete,
        icon: "−",
        tone: Tone::Red,
        label: "Delete",
        describe: describe::delete,
    },
    TaxonomyDescriptor {
        raw_type: "ForkEvent",
        kind: EventKind::Fork,
        icon: "⑂",
        tone: Tone::Blue,
        label: "Fork",
        describe: describe::fork,
    },
    TaxonomyDescriptor {
        raw_type: "WatchEvent",
        kind: EventKind::Watch,
        icon: "★",
        tone: Tone::Yellow,
        label: "Star",
        describe: describe::watch,
    },
    TaxonomyDescriptor {
        raw_type: "StarEvent",
        kind: EventKind::Star,
        icon: "★",
        tone: Tone::Yellow,
        label: "Star",
        describe: describe::star,
    },
    TaxonomyDescriptor {
        raw_type: "ReleaseEvent",
        kind: EventKind::Release,
        icon: "◆",
        tone: Tone::Magenta,
        label: "Release",
        describe: describe::release,
    },
    TaxonomyDescriptor {
        raw_type: "IssueCommentEvent",
        kind: EventKind::IssueComment,
        icon: "✎",
        tone: Tone::Blue,
        label: "Comment",
        describe: describe::issue_comment,
    },
    TaxonomyDescriptor {
        raw_type: "CommitCommentEvent",
        kind: EventKind::CommitComment,
        icon: "✎",
        tone: Tone::Cyan,
        label: "Commit Comment",
        describe: describe::commit_comment,
    },
    TaxonomyDescriptor {
        raw_type: "PullRequestReviewEvent",
        kind: EventKind::PullRequestReview,
        icon: "✓",
        tone: Tone::Green,
        label: "Review",
        describe: describe::review,
    },
    TaxonomyDescriptor {
        raw_type: "PullRequestReviewCommentEvent",
        kind: EventKind::PullRequestReviewComment,
        icon: "✎",
        tone: Tone::Purple,
        label: "Review Comment",
        describe: describe::review_comment,
    },
    TaxonomyDescriptor {
        raw_type: "PullRequestReviewThreadEvent",
        kind: EventKind::PullRequestReviewThread,
        icon: "✎",
        tone: Tone::Purple,
        label: "Review Comment",
        describe: describe::review_thread,
    },
    TaxonomyDescriptor {
        raw_type: "GollumEvent",
        kind: EventKind::Gollum,
        icon: "☰",
        tone: Tone::Muted,
        label: "Wiki",
        describe: describe::wiki,
    },
    TaxonomyDescriptor {
        raw_type: "MemberEvent",
        kind: EventKind::Member,
        icon: "☺",
        tone: Tone::Cyan,
        label: "Member",
        describe: describe::member,
    },
    TaxonomyDescriptor {
        raw_type: "PublicEvent",
        kind: EventKind::Public,
        icon: "◉",
        tone: Tone::Green,
        label: "Visibility",
        describe: describe::visibility,
    },
    TaxonomyDescriptor {
        raw_type: "SponsorshipEvent",
        kind: EventKind::Sponsorship,
        icon: "♥",
        tone: Tone::Magenta,
        label: "Sponsorship",
        describe: describe::sponsorship,
    },
];

pub fn registry() -> &'static [TaxonomyDescriptor] {
    REGISTRY
}

/// Descriptor for `raw_type`, or [`DEFAULT`] when the type is not registered.
pub fn lookup(raw_type: &str) -> &'static TaxonomyDescriptor {
    REGISTRY
        .iter()
        .find(|spec| spec.raw_type == raw_type)
        .unwrap_or(&DEFAULT)
}

/// Distinct labels in table order, `DEFAULT`'s last.
pub fn labels() -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = Vec::new();
    for spec in REGISTRY.iter().chain(std::iter::once(&DEFAULT)) {
        if !labels.contains(&spec.label) {
            labels.push(spec.label);
        }
    }
    labels
}
