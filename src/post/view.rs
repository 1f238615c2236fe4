//! Client-facing JSON shapes.

use std::fmt;

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use super::Post;
use crate::error::VillageError;
use crate::village::{ElderId, ElderRelationship, PostId, StudentId};

/// Role shown for automated posts.
pub const AUTOMATED_ROLE: &str = "Portfoliyo";

/// A post rendered for a chat client.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub post_id: PostId,
    pub author_id: Option<ElderId>,
    pub student_id: StudentId,
    pub author: String,
    pub role: String,
    pub timestamp: String,
    pub date: String,
    pub time: String,
    pub text: String,
    pub sms: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_sequence_id: Option<String>,
}

impl PostView {
    /// Renders `post` in the time zone `tz`.
    ///
    /// `author` is the author's relationship to the post's student, if the
    /// post has an author.
    #[must_use]
    pub fn from_post<Tz>(post: &Post, author: Option<&ElderRelationship>, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let (author_name, role) = match author {
            Some(rel) => (
                rel.elder.display_name().to_string(),
                rel.description_or_role().to_string(),
            ),
            None => (String::new(), AUTOMATED_ROLE.to_string()),
        };
        let local = post.timestamp.with_timezone(tz);

        Self {
            post_id: post.id,
            author_id: post.author,
            student_id: post.student,
            author: author_name,
            role,
            timestamp: local.to_rfc3339(),
            date: format_date(&local),
            time: format_time(&local),
            text: post.html_text.clone(),
            sms: post.is_sms(),
            author_sequence_id: None,
        }
    }

    /// Echoes the client's sequence id so it can match optimistic posts.
    #[must_use]
    pub fn with_sequence_id(mut self, sequence_id: impl Into<String>) -> Self {
        self.author_sequence_id = Some(sequence_id.into());
        self
    }
}

/// `M/D/YYYY` without zero padding.
fn format_date<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    format!("{}/{}/{}", dt.month(), dt.day(), dt.year())
}

/// `3 p.m.`, `3:04 p.m.`, `noon` or `midnight`.
fn format_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String {
    let (hour, minute) = (dt.hour(), dt.minute());
    match (hour, minute) {
        (0, 0) => return "midnight".to_string(),
        (12, 0) => return "noon".to_string(),
        _ => {}
    }
    let meridiem = if hour < 12 { "a.m." } else { "p.m." };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    if minute == 0 {
        format!("{hour12} {meridiem}")
    } else {
        format!("{hour12}:{minute:02} {meridiem}")
    }
}

/// Response body for post submission.
///
/// Serializes as `{"success": true, "posts": [...]}` or
/// `{"success": false, "error": "..."}`.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<PostView>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PostResponse {
    /// A successful submission.
    #[must_use]
    pub fn ok(posts: Vec<PostView>) -> Self {
        Self {
            success: true,
            posts: Some(posts),
            error: None,
        }
    }

    /// A rejected submission.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            posts: None,
            error: Some(message.into()),
        }
    }

    /// Maps a failed post to a response, if the failure is user-facing.
    ///
    /// Non-validation errors are not the submitter's fault and yield `None`.
    #[must_use]
    pub fn from_error(err: &VillageError) -> Option<Self> {
        err.user_message().map(Self::error)
    }
}
