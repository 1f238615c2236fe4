//! Posts in a student's village.
//!
//! - [`limits`]: SMS length budget and the post length check.
//! - [`service`]: the post-creation workflow (validate, render, notify).
//! - [`view`]: JSON shapes returned to clients.

pub mod limits;
pub mod service;
pub mod view;

pub use limits::{
    char_limit_for_prefix, check_post_length, post_char_limit, post_char_limit_with,
    text_notification_prefix, SMS_LENGTH_LIMIT,
};
pub use service::{PostOptions, PostService};
pub use view::{PostResponse, PostView};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::village::{ElderId, PostId, StudentId};

/// A message posted in a student's village.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post identifier.
    pub id: PostId,
    /// Author; `None` for automated messages.
    pub author: Option<ElderId>,
    /// The student in whose village this was posted.
    pub student: StudentId,
    /// When the post was created.
    pub timestamp: DateTime<Utc>,
    /// The text as entered.
    pub original_text: String,
    /// The rendered text with nametags.
    pub html_text: String,
    /// Received via SMS.
    pub from_sms: bool,
    /// Sent to at least one phone.
    pub to_sms: bool,
}

impl Post {
    /// Post was either received from or sent by SMS.
    #[must_use]
    pub const fn is_sms(&self) -> bool {
        self.from_sms || self.to_sms
    }

    /// Whether this is an automated message.
    #[must_use]
    pub const fn is_automated(&self) -> bool {
        self.author.is_none()
    }
}
