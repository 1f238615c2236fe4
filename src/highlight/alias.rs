//! Per-village alias table.

use std::collections::{BTreeSet, HashMap};

use crate::village::{ElderId, ElderRelationship, RelationshipId};

/// Alias that resolves to every elder in the village.
pub const ALL_ALIAS: &str = "all";

/// Normalizes an alias for lookup: lower-case, spaces removed.
///
/// Used identically for index keys and for mention candidates.
///
/// ```
/// use village::highlight::normalize;
///
/// assert_eq!(normalize("Mary Ann"), "maryann");
/// ```
#[must_use]
pub fn normalize(alias: &str) -> String {
    alias.to_lowercase().replace(' ', "")
}

/// Strips one leading `+` and then one leading `1` from a phone number.
///
/// Lets US numbers be mentioned without the country code.
fn phone_without_country_code(phone: &str) -> &str {
    let phone = phone.strip_prefix('+').unwrap_or(phone);
    phone.strip_prefix('1').unwrap_or(phone)
}

/// Mapping from normalized alias to the relationships it names.
///
/// Built fresh from a snapshot of one student's relationships; it reflects
/// exactly that snapshot and is never cached.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    by_alias: HashMap<String, BTreeSet<RelationshipId>>,
    elders: HashMap<RelationshipId, ElderId>,
}

impl AliasIndex {
    /// Builds the index for a village.
    ///
    /// Each relationship is reachable through its elder's name, phone (as
    /// stored and without `+1`), email, its description-or-role, and
    /// [`ALL_ALIAS`]. Missing fields are skipped.
    #[must_use]
    pub fn build<'a, I>(relationships: I) -> Self
    where
        I: IntoIterator<Item = &'a ElderRelationship>,
    {
        let mut index = Self::default();
        for rel in relationships {
            let elder = &rel.elder;
            let mut candidates: Vec<&str> = Vec::with_capacity(5);
            if let Some(name) = elder.name.as_deref().filter(|n| !n.is_empty()) {
                candidates.push(name);
            }
            if let Some(phone) = elder.phone.as_deref() {
                candidates.push(phone);
                candidates.push(phone_without_country_code(phone));
            }
            if let Some(email) = elder.email.as_deref() {
                candidates.push(email);
            }
            candidates.push(rel.description_or_role());

            for candidate in candidates {
                index.insert(&normalize(candidate), rel.id);
            }
            index.insert(ALL_ALIAS, rel.id);
            index.elders.insert(rel.id, elder.id);
        }
        index
    }

    fn insert(&mut self, alias: &str, id: RelationshipId) {
        // An empty alias would let a bare `@` or `@.` highlight.
        if alias.is_empty() {
            return;
        }
        self.by_alias.entry(alias.to_string()).or_default().insert(id);
    }

    /// Looks up an already-normalized alias.
    #[must_use]
    pub fn get(&self, normalized: &str) -> Option<&BTreeSet<RelationshipId>> {
        self.by_alias.get(normalized).filter(|ids| !ids.is_empty())
    }

    /// Normalizes `alias` and looks it up.
    #[must_use]
    pub fn resolve(&self, alias: &str) -> Option<&BTreeSet<RelationshipId>> {
        self.get(&normalize(alias))
    }

    /// The elder on the far side of a relationship.
    #[must_use]
    pub fn elder_for(&self, id: RelationshipId) -> Option<ElderId> {
        self.elders.get(&id).copied()
    }

    /// Whether the normalized alias is present.
    #[must_use]
    pub fn contains(&self, normalized: &str) -> bool {
        self.get(normalized).is_some()
    }

    /// Number of distinct aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    /// True when the village has no relationships.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }

    /// Iterates aliases in no particular order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.by_alias.keys().map(String::as_str)
    }
}
