//! Post creation workflow.
//!
//! Validates the length budget, renders mentions against the village, and
//! hands an SMS to every mentioned elder who can receive one.

use chrono::Utc;
use tracing::{debug, warn};

use super::limits::{
    char_limit_for_prefix, check_post_length, post_char_limit_with, prefix_for_name,
    text_notification_prefix,
};
use super::Post;
use crate::config::VillageConfig;
use crate::error::{ValidationError, VillageResult};
use crate::highlight::HighlightEngine;
use crate::sms::{SmsGateway, SmsMessage};
use crate::village::{ElderRelationship, PostId, StudentId};

/// Options for [`PostService::create_post`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostOptions {
    notify: bool,
    from_sms: bool,
    to_sms: bool,
}

impl Default for PostOptions {
    fn default() -> Self {
        Self {
            notify: true,
            from_sms: false,
            to_sms: false,
        }
    }
}

impl PostOptions {
    /// Creates default options: notify mentioned elders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether mentioned elders get an SMS (default: true).
    #[must_use]
    pub const fn notify(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }

    /// Marks the post as received by SMS. Such posts skip the length check.
    #[must_use]
    pub const fn from_sms(mut self, from_sms: bool) -> Self {
        self.from_sms = from_sms;
        self
    }

    /// Marks the post as already sent by SMS.
    #[must_use]
    pub const fn to_sms(mut self, to_sms: bool) -> Self {
        self.to_sms = to_sms;
        self
    }
}

/// Creates posts and fans them out by SMS.
#[derive(Debug)]
pub struct PostService<G> {
    config: VillageConfig,
    gateway: G,
}

impl<G: SmsGateway> PostService<G> {
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(gateway: G) -> Self {
        Self::with_config(gateway, VillageConfig::default())
    }

    /// Creates a service with an explicit configuration.
    #[must_use]
    pub const fn with_config(gateway: G, config: VillageConfig) -> Self {
        Self { config, gateway }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &VillageConfig {
        &self.config
    }

    /// The SMS gateway.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// SMS prefix for posts by `author`, or by the system when `None`.
    #[must_use]
    pub fn prefix_for(&self, author: Option<&ElderRelationship>) -> String {
        match author {
            Some(rel) => text_notification_prefix(rel),
            None => prefix_for_name(&self.config.automated_author),
        }
    }

    /// Max post length for `author` under the configured SMS budget.
    #[must_use]
    pub fn char_limit(&self, author: Option<&ElderRelationship>) -> usize {
        let budget = self.config.sms_length_limit;
        match author {
            Some(rel) => post_char_limit_with(rel, budget),
            None => char_limit_for_prefix(&self.prefix_for(None), budget),
        }
    }

    /// Checks that `text` fits the author's SMS budget.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::PostTooLong` when it does not.
    pub fn validate(
        &self,
        author: Option<&ElderRelationship>,
        text: &str,
    ) -> Result<(), ValidationError> {
        check_post_length(text, self.char_limit(author))
    }

    /// Creates a post in `student`'s village.
    ///
    /// `village` is the snapshot of the student's elder relationships used
    /// for mention lookup and SMS fan-out. Gateway failures are logged and
    /// do not fail the post.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the author belongs to a different
    /// village or the text exceeds the author's limit.
    pub fn create_post(
        &self,
        student: StudentId,
        village: &[ElderRelationship],
        author: Option<&ElderRelationship>,
        text: &str,
        options: PostOptions,
    ) -> VillageResult<Post> {
        if let Some(rel) = author {
            if rel.student != student {
                return Err(ValidationError::RelationshipNotInVillage {
                    relationship: rel.id,
                    student,
                }
                .into());
            }
        }
        if !options.from_sms {
            if let Err(err) = self.validate(author, text) {
                warn!(%student, error = %err, "rejected post");
                return Err(err.into());
            }
        }

        let rendered = HighlightEngine::new(village).render(text);
        let mut post = Post {
            id: PostId::new(),
            author: author.map(|rel| rel.elder.id),
            student,
            timestamp: Utc::now(),
            original_text: text.to_string(),
            html_text: String::new(),
            from_sms: options.from_sms,
            to_sms: options.to_sms,
        };

        if options.notify && !rendered.mentioned().is_empty() {
            let body = format!("{}{}", self.prefix_for(author), post.original_text);
            for rel in village {
                if !rendered.mentioned().contains(&rel.id) || !rel.is_textable() {
                    continue;
                }
                let Some(phone) = rel.elder.phone.as_deref() else {
                    continue;
                };
                match self.gateway.send(&SmsMessage::new(phone, body.as_str())) {
                    Ok(()) => post.to_sms = true,
                    Err(err) => {
                        warn!(relationship = %rel.id, error = %err, "could not notify elder");
                    }
                }
            }
        }

        debug!(
            post = %post.id,
            %student,
            mentioned = rendered.mentioned().len(),
            to_sms = post.to_sms,
            "created post"
        );
        let (html, _) = rendered.into_parts();
        post.html_text = html;
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sms::InMemoryGateway;
    use crate::village::Elder;

    struct Fixture {
        student: StudentId,
        fred: ElderRelationship,
        mom: ElderRelationship,
        teacher: ElderRelationship,
        service: PostService<Arc<InMemoryGateway>>,
        gateway: Arc<InMemoryGateway>,
    }

    impl Fixture {
        fn new() -> Self {
            let student = StudentId::new();
            let fred = ElderRelationship::new(
                student,
                Elder::new("Teacher").with_name("Fred").with_email("fred@example.com"),
            );
            let mom = ElderRelationship::new(
                student,
                Elder::new("Parent").with_phone("+15551234567"),
            )
            .with_description("Mom");
            let teacher = ElderRelationship::new(
                student,
                Elder::new("Teacher").with_name("Ms. Doe").with_phone("+15550000000").inactive(),
            );
            let gateway = Arc::new(InMemoryGateway::new());
            let service = PostService::new(Arc::clone(&gateway));
            Self {
                student,
                fred,
                mom,
                teacher,
                service,
                gateway,
            }
        }

        fn village(&self) -> Vec<ElderRelationship> {
            vec![self.fred.clone(), self.mom.clone(), self.teacher.clone()]
        }
    }

    #[test]
    fn creates_post_with_rendered_text() {
        let fx = Fixture::new();
        let post = fx
            .service
            .create_post(fx.student, &fx.village(), Some(&fx.fred), "hello\nthere", PostOptions::new())
            .unwrap();

        assert_eq!(post.original_text, "hello\nthere");
        assert_eq!(post.html_text, "hello<br>there");
        assert_eq!(post.author, Some(fx.fred.elder.id));
        assert!(!post.is_sms());
        assert!(fx.gateway.sent().is_empty());
    }

    #[test]
    fn notifies_mentioned_elders_with_phones() {
        let fx = Fixture::new();
        let post = fx
            .service
            .create_post(fx.student, &fx.village(), Some(&fx.fred), "@mom see you at 3", PostOptions::new())
            .unwrap();

        assert!(post.to_sms);
        let sent = fx.gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "+15551234567");
        assert_eq!(sent[0].body, "Fred: @mom see you at 3");
    }

    #[test]
    fn skips_inactive_and_phoneless_elders() {
        let fx = Fixture::new();
        let post = fx
            .service
            .create_post(fx.student, &fx.village(), Some(&fx.mom), "@all hi", PostOptions::new())
            .unwrap();

        // Fred has no phone and Ms. Doe is inactive.
        assert_eq!(fx.gateway.sent().len(), 1);
        assert_eq!(fx.gateway.sent()[0].body, "Mom: @all hi");
        assert!(post.html_text.contains("nametag all me"));
    }

    #[test]
    fn notify_false_sends_nothing() {
        let fx = Fixture::new();
        let post = fx
            .service
            .create_post(
                fx.student,
                &fx.village(),
                Some(&fx.fred),
                "@mom hi",
                PostOptions::new().notify(false),
            )
            .unwrap();
        assert!(!post.to_sms);
        assert!(fx.gateway.sent().is_empty());
        assert!(post.html_text.contains("nametag"));
    }

    #[test]
    fn rejects_post_over_limit() {
        let fx = Fixture::new();
        let err = fx
            .service
            .create_post(fx.student, &fx.village(), Some(&fx.fred), &"a".repeat(160), PostOptions::new())
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.user_message().as_deref(),
            Some("Posts are limited to 154 characters.")
        );
    }

    #[test]
    fn sms_posts_skip_length_check() {
        let fx = Fixture::new();
        let post = fx
            .service
            .create_post(
                fx.student,
                &fx.village(),
                Some(&fx.mom),
                &"a".repeat(160),
                PostOptions::new().from_sms(true),
            )
            .unwrap();
        assert!(post.from_sms);
        assert!(post.is_sms());
    }

    #[test]
    fn automated_posts_use_configured_author() {
        let fx = Fixture::new();
        assert_eq!(fx.service.prefix_for(None), "Portfoliyo: ");
        assert_eq!(fx.service.char_limit(None), 148);

        let post = fx
            .service
            .create_post(fx.student, &fx.village(), None, "@mom reminder", PostOptions::new())
            .unwrap();
        assert!(post.is_automated());
        assert_eq!(fx.gateway.sent()[0].body, "Portfoliyo: @mom reminder");
    }

    #[test]
    fn rejects_author_from_other_village() {
        let fx = Fixture::new();
        let stranger = ElderRelationship::new(StudentId::new(), Elder::new("Parent"));
        let err = fx
            .service
            .create_post(fx.student, &fx.village(), Some(&stranger), "hi", PostOptions::new())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn gateway_failure_does_not_fail_post() {
        let fx = Fixture::new();
        fx.gateway.reject("+15551234567");
        let post = fx
            .service
            .create_post(fx.student, &fx.village(), Some(&fx.fred), "@mom hi", PostOptions::new())
            .unwrap();
        assert!(!post.to_sms);
        assert!(fx.gateway.sent().is_empty());
    }

    #[test]
    fn config_changes_limit() {
        let fx = Fixture::new();
        let service = PostService::with_config(
            InMemoryGateway::new(),
            VillageConfig {
                sms_length_limit: 20,
                ..VillageConfig::default()
            },
        );
        assert_eq!(service.char_limit(Some(&fx.fred)), 14);
        assert_eq!(
            service.char_limit(Some(&fx.fred)),
            crate::post::post_char_limit_with(&fx.fred, 20)
        );
        assert_eq!(
            fx.service.char_limit(Some(&fx.fred)),
            crate::post::post_char_limit(&fx.fred)
        );
        assert!(service.validate(Some(&fx.fred), &"x".repeat(15)).is_err());
    }
}
