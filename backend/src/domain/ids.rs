//! Strongly typed entity identifiers.
//!
//! Every record is keyed by a UUID v4. Wrapping each in its own newtype keeps a
//! stall id from being passed where a horse id is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of a user account.
    UserId
);
define_entity_id!(
    /// Identifier of a horse.
    HorseId
);
define_entity_id!(
    /// Identifier of a stall.
    StallId
);
define_entity_id!(
    /// Identifier of a stable.
    StableId
);
define_entity_id!(
    /// Identifier of a staff member.
    StaffId
);
define_entity_id!(
    /// Identifier of an expense or income entry.
    ExpenseId
);
define_entity_id!(
    /// Identifier of a scheduled event.
    EventId
);
define_entity_id!(
    /// Identifier of a horse activity log entry.
    HorseActivityId
);
