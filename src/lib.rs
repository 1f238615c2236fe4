//! # village - mentions and SMS fan-out for parent-teacher messaging
//!
//! A student's *village* is the set of elders (parents, relatives, school
//! staff) connected to that student. Posts in a village can mention elders
//! with `@alias`; mentioned elders with phones receive the post by SMS.
//!
//! ## Core Concepts
//!
//! - **ElderRelationship**: a snapshot of one elder's connection to one student
//! - **AliasIndex**: every name, phone, email and role an elder can be mentioned by
//! - **HighlightEngine**: escapes post text and wraps resolved mentions in nametags
//! - **PostService**: validates the SMS budget, renders, and notifies
//!
//! ## Usage
//!
//! ```rust
//! use village::{Elder, ElderRelationship, InMemoryGateway, PostOptions, PostService, StudentId};
//!
//! let student = StudentId::new();
//! let teacher = ElderRelationship::new(student, Elder::new("Teacher").with_name("Fred"));
//! let mom = ElderRelationship::new(student, Elder::new("Parent").with_phone("+15551234567"))
//!     .with_description("Mom");
//! let village = vec![teacher.clone(), mom];
//!
//! let service = PostService::new(InMemoryGateway::new());
//! let post = service
//!     .create_post(student, &village, Some(&teacher), "@mom conference at 3", PostOptions::new())
//!     .unwrap();
//!
//! assert!(post.to_sms);
//! assert_eq!(service.gateway().sent()[0].body, "Fred: @mom conference at 3");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod highlight;
pub mod post;
pub mod sms;
pub mod village;

// Re-export primary types at crate root for convenience
pub use config::{DispatcherConfig, VillageConfig};
pub use error::{DispatchError, SmsError, ValidationError, VillageError, VillageResult};
pub use highlight::{
    normalize, process_text, AliasIndex, HighlightEngine, MentionMatch, RenderResult,
};
pub use post::{
    check_post_length, post_char_limit, text_notification_prefix, Post, PostOptions,
    PostResponse, PostService, PostView,
};
pub use sms::{InMemoryGateway, SmsDispatcher, SmsGateway, SmsMessage};
pub use village::{Elder, ElderId, ElderRelationship, PostId, RelationshipId, StudentId};
