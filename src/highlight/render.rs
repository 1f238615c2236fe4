//! Mention resolution and HTML rendering.

use std::collections::BTreeSet;
use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use super::alias::{normalize, AliasIndex, ALL_ALIAS};
use super::scanner::scan;
use crate::village::RelationshipId;

/// Escapes the five HTML-significant characters.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// A mention that resolved against the alias index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MentionMatch {
    /// The mention as written, `@` included, trailing dots excluded.
    pub literal: String,
    /// Byte span of `literal` in the escaped text.
    pub span: Range<usize>,
    /// Normalized alias used for the lookup.
    pub alias: String,
    /// Relationships the alias resolved to.
    pub relationships: BTreeSet<RelationshipId>,
}

impl MentionMatch {
    /// Whether this is the village-wide `@all` mention.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.alias == ALL_ALIAS
    }
}

/// Rendered post text plus the relationships it mentions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    html: String,
    mentioned: BTreeSet<RelationshipId>,
    matches: Vec<MentionMatch>,
}

impl RenderResult {
    /// The HTML-safe rendered text.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Every relationship mentioned anywhere in the text.
    #[must_use]
    pub const fn mentioned(&self) -> &BTreeSet<RelationshipId> {
        &self.mentioned
    }

    /// Resolved mentions in text order.
    #[must_use]
    pub fn matches(&self) -> &[MentionMatch] {
        &self.matches
    }

    /// Consumes the result, returning `(html, mentioned)`.
    #[must_use]
    pub fn into_parts(self) -> (String, BTreeSet<RelationshipId>) {
        (self.html, self.mentioned)
    }
}

/// Finds resolvable mentions in already-escaped text.
///
/// Trailing dots are dropped from each candidate before lookup so that a
/// mention can end a sentence; internal dots (as in email addresses) stay.
#[must_use]
pub fn find_mentions(escaped: &str, index: &AliasIndex) -> Vec<MentionMatch> {
    let mut found = Vec::new();
    for token in scan(escaped) {
        let name = token.candidate.trim_end_matches('.');
        if name.is_empty() {
            continue;
        }
        let alias = normalize(name);
        let Some(relationships) = index.get(&alias) else {
            continue;
        };
        let span = token.start..token.start + 1 + name.len();
        found.push(MentionMatch {
            literal: escaped[span.clone()].to_string(),
            span,
            alias,
            relationships: relationships.clone(),
        });
    }
    found
}

/// Inline markup for one resolved mention.
fn nametag(mention: &MentionMatch, index: &AliasIndex) -> String {
    let user_ids = mention
        .relationships
        .iter()
        .filter_map(|id| index.elder_for(*id))
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let class = if mention.is_all() { "nametag all me" } else { "nametag" };
    format!(
        r#"<b class="{class}" data-user-id="{user_ids}">{}</b>"#,
        mention.literal
    )
}

/// Renders raw post text against a village's alias index.
///
/// The text is escaped first, resolved mentions are wrapped in nametag
/// markup, and newlines become `<br>`. Unresolved `@tokens` pass through.
#[must_use]
pub fn render(text: &str, index: &AliasIndex) -> RenderResult {
    let escaped = escape_html(text);
    let matches = find_mentions(&escaped, index);

    let mut html = String::with_capacity(escaped.len());
    let mut mentioned = BTreeSet::new();
    let mut cursor = 0;
    for mention in &matches {
        html.push_str(&escaped[cursor..mention.span.start]);
        html.push_str(&nametag(mention, index));
        cursor = mention.span.end;
        mentioned.extend(mention.relationships.iter().copied());
    }
    html.push_str(&escaped[cursor..]);
    let html = html.replace('\n', "<br>");

    debug!(
        mentions = matches.len(),
        mentioned = mentioned.len(),
        "rendered post text"
    );

    RenderResult {
        html,
        mentioned,
        matches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::village::{Elder, ElderRelationship, StudentId};

    fn village() -> (ElderRelationship, ElderRelationship, AliasIndex) {
        let student = StudentId::new();
        let john = ElderRelationship::new(
            student,
            Elder::new("Parent").with_name("John").with_email("a.b@example.com"),
        )
        .with_description("Dad");
        let mary = ElderRelationship::new(
            student,
            Elder::new("Teacher").with_name("Mary Ann").with_phone("+15551234567"),
        );
        let index = AliasIndex::build([&john, &mary]);
        (john, mary, index)
    }

    fn tag(rel: &ElderRelationship, literal: &str) -> String {
        format!(
            r#"<b class="nametag" data-user-id="{}">{literal}</b>"#,
            rel.elder.id
        )
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_single_mention() {
        let (john, _, index) = village();
        let result = render("hi @John", &index);
        assert_eq!(result.html(), format!("hi {}", tag(&john, "@John")));
        assert_eq!(result.mentioned(), &BTreeSet::from([john.id]));
    }

    #[test]
    fn test_adjacent_mentions() {
        let (john, mary, index) = village();
        let result = render("@john @maryann", &index);
        assert_eq!(
            result.html(),
            format!("{} {}", tag(&john, "@john"), tag(&mary, "@maryann"))
        );
        assert_eq!(result.mentioned().len(), 2);
    }

    #[test]
    fn test_trailing_dots_are_not_highlighted() {
        let (john, _, index) = village();
        let result = render("thanks @john.", &index);
        assert_eq!(result.html(), format!("thanks {}.", tag(&john, "@john")));

        let result = render("@john...", &index);
        assert_eq!(result.html(), format!("{}...", tag(&john, "@john")));
        assert_eq!(result.matches()[0].span, 0..5);
    }

    #[test]
    fn test_internal_dot_alias() {
        let (john, _, index) = village();
        let result = render("@a.b@example.com", &index);
        assert_eq!(result.html(), tag(&john, "@a.b@example.com"));
        assert_eq!(result.matches()[0].alias, "a.b@example.com");
    }

    #[test]
    fn test_all_alias() {
        let (john, mary, index) = village();
        let result = render("@all meeting at 5", &index);
        assert_eq!(result.mentioned(), &BTreeSet::from([john.id, mary.id]));
        assert!(result.html().starts_with(r#"<b class="nametag all me" data-user-id=""#));
        assert!(result.html().contains(&john.elder.id.to_string()));
        assert!(result.html().contains(&mary.elder.id.to_string()));
        assert!(result.html().ends_with("\">@all</b> meeting at 5"));
    }

    #[test]
    fn test_all_alias_user_ids_follow_relationship_order() {
        let (john, mary, index) = village();
        let result = render("@ALL", &index);
        let (first, second) = if john.id < mary.id { (&john, &mary) } else { (&mary, &john) };
        assert_eq!(
            result.html(),
            format!(
                r#"<b class="nametag all me" data-user-id="{},{}">@ALL</b>"#,
                first.elder.id, second.elder.id
            )
        );
    }

    #[test]
    fn test_no_match_passthrough() {
        let (_, _, index) = village();
        let result = render("@nobody <b>\nbye", &index);
        assert_eq!(result.html(), "@nobody &lt;b&gt;<br>bye");
        assert!(result.mentioned().is_empty());

        let empty = AliasIndex::default();
        let result = render("@nobody", &empty);
        assert_eq!(result.html(), "@nobody");
        assert!(result.mentioned().is_empty());
    }

    #[test]
    fn test_bare_dots_never_match() {
        let (_, _, index) = village();
        let result = render("@. @..", &index);
        assert_eq!(result.html(), "@. @..");
        assert!(result.matches().is_empty());
    }

    #[test]
    fn test_no_break_space_is_part_of_the_alias() {
        let (_, _, index) = village();
        let result = render("@john\u{a0}hi", &index);
        assert_eq!(result.html(), "@john\u{a0}hi");
        assert!(result.mentioned().is_empty());

        let result = render("x\u{2028}@john", &index);
        assert!(result.matches().is_empty());
    }

    #[test]
    fn test_phone_and_role_aliases() {
        let (john, mary, index) = village();
        let result = render("@5551234567 and @+15551234567 and @dad", &index);
        assert_eq!(result.matches().len(), 3);
        assert_eq!(result.mentioned(), &BTreeSet::from([john.id, mary.id]));
    }

    #[test]
    fn test_newlines_become_breaks_after_rewriting() {
        let (john, _, index) = village();
        let result = render("line one\n@john\nline three", &index);
        assert_eq!(
            result.html(),
            format!("line one<br>{}<br>line three", tag(&john, "@john"))
        );
    }

    #[test]
    fn test_escaping_happens_before_scanning() {
        let (_, _, index) = village();
        // The apostrophe escapes to `&#39;`, whose `;` ends the candidate.
        let result = render("@john's", &index);
        assert_eq!(result.html(), "@john&#39;s");
        assert!(result.mentioned().is_empty());

        let (john, _, index) = village();
        let result = render("<@john>", &index);
        assert!(result.mentioned().is_empty());
        let result = render("(@john)", &index);
        assert_eq!(result.html(), format!("({})", tag(&john, "@john")));
    }

    #[test]
    fn test_spans_are_reported_against_escaped_text() {
        let (john, mary, index) = village();
        let text = "a & b @john & @maryann";
        let escaped = escape_html(text);
        let result = render(text, &index);
        let spans: Vec<_> = result.matches().iter().map(|m| m.span.clone()).collect();
        assert_eq!(&escaped[spans[0].clone()], "@john");
        assert_eq!(&escaped[spans[1].clone()], "@maryann");
        assert_eq!(
            result.html(),
            format!(
                "a &amp; b {} &amp; {}",
                tag(&john, "@john"),
                tag(&mary, "@maryann")
            )
        );
    }

    #[test]
    fn test_render_is_repeatable() {
        let (_, _, index) = village();
        let first = render("@john @all @x", &index);
        let second = render("@john @all @x", &index);
        assert_eq!(first, second);
    }
}
