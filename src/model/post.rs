// PostRecord — the unit of the aggregated corpus.
//
// Every collector, primary or secondary, emits these. A record is created
// once, stamped with its source, and never mutated afterwards; dedup and
// sampling operate on owned lists of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies which platform a post came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Reddit,
    YouTube,
    Quora,
    Threads,
    Instagram,
}

impl SourceId {
    /// All secondary sources, in display order. Reddit is the primary
    /// platform and is harvested separately, so it is not listed here.
    pub const SECONDARY: [SourceId; 4] = [
        SourceId::YouTube,
        SourceId::Quora,
        SourceId::Threads,
        SourceId::Instagram,
    ];
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceId::Reddit => "reddit",
            SourceId::YouTube => "youtube",
            SourceId::Quora => "quora",
            SourceId::Threads => "threads",
            SourceId::Instagram => "instagram",
        };
        f.write_str(s)
    }
}

impl FromStr for SourceId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reddit" => Ok(SourceId::Reddit),
            "youtube" => Ok(SourceId::YouTube),
            "quora" => Ok(SourceId::Quora),
            "threads" => Ok(SourceId::Threads),
            "instagram" => Ok(SourceId::Instagram),
            other => Err(format!("unknown source: {other}")),
        }
    }
}

/// A single collected post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRecord {
    pub source: SourceId,
    pub title: String,
    pub body: String,
    pub author: String,
    /// Canonical URL. May be empty for platforms that expose no stable
    /// link, in which case `canonical_id` falls back to a composite key.
    pub url: String,
    /// Platform engagement score (upvotes, view-derived rank, etc).
    pub score: i64,
    pub created_at: DateTime<Utc>,
    /// The community this post was harvested from, when known
    /// (subreddit name for primary posts).
    pub community: Option<String>,
}

impl PostRecord {
    /// The identity used to deduplicate this post across retrieval
    /// strategies, time windows, and sources within one run.
    pub fn canonical_id(&self) -> String {
        if !self.url.is_empty() {
            self.url.clone()
        } else {
            format!("{}:{}:{}", self.source, self.author, self.title)
        }
    }

    /// Title and body concatenated — the text fed to term extraction.
    pub fn full_text(&self) -> String {
        if self.body.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.body)
        }
    }
}

/// Collapse newlines and runs of whitespace. Collector text arrives with
/// markdown line breaks and padding that would pollute the term bank.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
