//! SMS length budget for posts.
//!
//! A post that notifies elders by SMS is sent as `"<author>: <text>"`, so the
//! room left for the text depends on who wrote it.

use crate::error::ValidationError;
use crate::village::ElderRelationship;

/// Maximum length of a single SMS body.
pub const SMS_LENGTH_LIMIT: usize = 160;

/// The prefix for texts sent out from this elder/student relationship.
#[must_use]
pub fn text_notification_prefix(relationship: &ElderRelationship) -> String {
    prefix_for_name(relationship.name_or_role())
}

/// Formats the SMS prefix for an arbitrary display name.
#[must_use]
pub fn prefix_for_name(name: &str) -> String {
    format!("{name}: ")
}

/// Max length for posts from this relationship under the default
/// [`SMS_LENGTH_LIMIT`].
///
/// With a custom `VillageConfig`, use [`post_char_limit_with`] or
/// `PostService::char_limit`.
#[must_use]
pub fn post_char_limit(relationship: &ElderRelationship) -> usize {
    post_char_limit_with(relationship, SMS_LENGTH_LIMIT)
}

/// Max length for posts from this relationship within `sms_length_limit`.
#[must_use]
pub fn post_char_limit_with(relationship: &ElderRelationship, sms_length_limit: usize) -> usize {
    char_limit_for_prefix(&text_notification_prefix(relationship), sms_length_limit)
}

/// Characters left in an SMS of `sms_length_limit` after `prefix`.
#[must_use]
pub fn char_limit_for_prefix(prefix: &str, sms_length_limit: usize) -> usize {
    sms_length_limit.saturating_sub(prefix.chars().count())
}

/// Rejects text longer than `limit` characters.
///
/// # Errors
///
/// Returns `ValidationError::PostTooLong` carrying the limit.
pub fn check_post_length(text: &str, limit: usize) -> Result<(), ValidationError> {
    if text.chars().count() > limit {
        return Err(ValidationError::PostTooLong { limit });
    }
    Ok(())
}
