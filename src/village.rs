//! Village membership snapshots.
//!
//! A village is the set of elders connected to one student. The types here are
//! read-only snapshots handed in by the data-access layer; nothing in this
//! crate mutates or persists them.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Creates a nil ID (for testing or sentinel values).
            #[must_use]
            pub const fn nil() -> Self {
                Self(Uuid::nil())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_id!(
    /// Identifier of an elder profile.
    ElderId
);
uuid_id!(
    /// Identifier of one elder-to-student relationship.
    RelationshipId
);
uuid_id!(
    /// Identifier of a student profile.
    StudentId
);
uuid_id!(
    /// Identifier of a post.
    PostId
);

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// An adult with a support relationship to one or more students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elder {
    /// Profile identifier.
    pub id: ElderId,
    /// Display name.
    pub name: Option<String>,
    /// Phone number, E.164-ish (`+15551234567`).
    pub phone: Option<String>,
    /// Login email.
    pub email: Option<String>,
    /// Generic role ("Parent", "Math Teacher"); used when nothing better exists.
    pub role: String,
    /// Inactive elders never receive SMS.
    pub is_active: bool,
}

impl Elder {
    /// Creates an active elder with only a role.
    #[must_use]
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            id: ElderId::new(),
            name: None,
            phone: None,
            email: None,
            role: role.into(),
            is_active: true,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Marks the elder inactive.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Best human-readable identifier: name, then email, then phone.
    #[must_use]
    pub fn display_name(&self) -> &str {
        non_empty(self.name.as_deref())
            .or_else(|| non_empty(self.email.as_deref()))
            .or_else(|| non_empty(self.phone.as_deref()))
            .unwrap_or("")
    }
}

/// One elder's connection to one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElderRelationship {
    /// Relationship identifier.
    pub id: RelationshipId,
    /// The student whose village this relationship belongs to.
    pub student: StudentId,
    /// The elder side of the relationship.
    pub elder: Elder,
    /// Free-text description of the relationship ("Mom", "Coach").
    pub description: Option<String>,
}

impl ElderRelationship {
    /// Creates a relationship without a description.
    #[must_use]
    pub fn new(student: StudentId, elder: Elder) -> Self {
        Self {
            id: RelationshipId::new(),
            student,
            elder,
            description: None,
        }
    }

    /// Sets the relationship description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The description if non-empty, otherwise the elder's role.
    #[must_use]
    pub fn description_or_role(&self) -> &str {
        non_empty(self.description.as_deref()).unwrap_or(&self.elder.role)
    }

    /// The elder's name if set, otherwise [`Self::description_or_role`].
    #[must_use]
    pub fn name_or_role(&self) -> &str {
        non_empty(self.elder.name.as_deref()).unwrap_or_else(|| self.description_or_role())
    }

    /// Whether an SMS notification can be delivered to this elder.
    #[must_use]
    pub fn is_textable(&self) -> bool {
        self.elder.is_active && non_empty(self.elder.phone.as_deref()).is_some()
    }
}
