//! `@mention` highlighting for post text.
//!
//! A post is rendered in the context of one student's village:
//!
//! 1. [`AliasIndex::build`] maps every normalized alias of every elder
//!    (name, phone, email, description or role, and `all`) to the
//!    relationships it names.
//! 2. [`render`] escapes the text, scans it for `@tokens`, wraps each token
//!    that resolves in nametag markup, and collects the mentioned
//!    relationships for SMS fan-out.
//!
//! ```
//! use village::highlight::HighlightEngine;
//! use village::{Elder, ElderRelationship, StudentId};
//!
//! let student = StudentId::new();
//! let dad = ElderRelationship::new(student, Elder::new("Parent").with_name("John"));
//! let engine = HighlightEngine::new([&dad]);
//!
//! let result = engine.render("thanks @john.");
//! assert!(result.mentioned().contains(&dad.id));
//! assert!(result.html().ends_with("@john</b>."));
//! ```

pub mod alias;
pub mod render;
pub mod scanner;

pub use alias::{normalize, AliasIndex, ALL_ALIAS};
pub use render::{escape_html, find_mentions, render, MentionMatch, RenderResult};
pub use scanner::{scan, MentionScanner, MentionToken};

use crate::village::ElderRelationship;

/// Renders post text for a single village snapshot.
#[derive(Debug, Clone)]
pub struct HighlightEngine {
    index: AliasIndex,
}

impl HighlightEngine {
    /// Builds the alias index for the given relationships.
    #[must_use]
    pub fn new<'a, I>(relationships: I) -> Self
    where
        I: IntoIterator<Item = &'a ElderRelationship>,
    {
        Self {
            index: AliasIndex::build(relationships),
        }
    }

    /// Wraps an existing index.
    #[must_use]
    pub const fn from_index(index: AliasIndex) -> Self {
        Self { index }
    }

    /// The alias index in use.
    #[must_use]
    pub const fn index(&self) -> &AliasIndex {
        &self.index
    }

    /// Renders `text`; see [`render`].
    #[must_use]
    pub fn render(&self, text: &str) -> RenderResult {
        render(text, &self.index)
    }
}

/// Builds a fresh index from `relationships` and renders `text` against it.
#[must_use]
pub fn process_text<'a, I>(text: &str, relationships: I) -> RenderResult
where
    I: IntoIterator<Item = &'a ElderRelationship>,
{
    HighlightEngine::new(relationships).render(text)
}
