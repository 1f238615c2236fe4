//! Single-pass scanner for `@mention` tokens.
//!
//! A token starts at the beginning of the text or right after one ASCII whitespace,
//! `(` or `[` character. It is an `@` followed by the shortest non-empty run
//! of non-whitespace characters that is followed by end-of-text, whitespace,
//! or one of `,;:)]?`. That terminator is only peeked at, so a single
//! delimiter between two mentions can close the first and open the second.

/// A raw mention token found in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MentionToken<'a> {
    /// Byte offset of the `@`.
    pub start: usize,
    /// Byte offset just past the candidate alias.
    pub end: usize,
    /// Text between the `@` and `end`; never empty.
    pub candidate: &'a str,
}

impl<'a> MentionToken<'a> {
    /// The token as written, `@` included.
    #[must_use]
    pub fn as_str(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// ASCII whitespace including vertical tab; no-break and other Unicode
/// spaces count as part of an alias.
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

fn opens_mention(c: char) -> bool {
    is_space(c) || matches!(c, '(' | '[')
}

fn closes_mention(c: char) -> bool {
    is_space(c) || matches!(c, ',' | ';' | ':' | ')' | ']' | '?')
}

/// Iterator over non-overlapping mention tokens, left to right.
#[derive(Debug, Clone)]
pub struct MentionScanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> MentionScanner<'a> {
    /// Creates a scanner over `text`.
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Tries to read a token whose `@` sits at byte offset `at`.
    fn token_at(&self, at: usize) -> Option<MentionToken<'a>> {
        let rest = self.text.get(at..)?.strip_prefix('@')?;
        let mut chars = rest.char_indices();
        let (_, first) = chars.next()?;
        if is_space(first) {
            return None;
        }

        let mut len = first.len_utf8();
        for (idx, c) in chars {
            if closes_mention(c) {
                break;
            }
            len = idx + c.len_utf8();
        }

        let start = at;
        let end = at + 1 + len;
        Some(MentionToken {
            start,
            end,
            candidate: &self.text[start + 1..end],
        })
    }
}

impl<'a> Iterator for MentionScanner<'a> {
    type Item = MentionToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            if self.pos == 0 {
                if let Some(token) = self.token_at(0) {
                    self.pos = token.end;
                    return Some(token);
                }
            }

            let c = self.text[self.pos..].chars().next()?;
            let after = self.pos + c.len_utf8();
            if opens_mention(c) {
                if let Some(token) = self.token_at(after) {
                    self.pos = token.end;
                    return Some(token);
                }
            }
            self.pos = after;
        }
        None
    }
}

/// Scans `text` for mention tokens.
#[must_use]
pub fn scan(text: &str) -> MentionScanner<'_> {
    MentionScanner::new(text)
}
