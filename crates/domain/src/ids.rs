use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ids minted by the game server for players and other subjects.
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(self) -> Uuid {
                self.0
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
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

/// Ids assigned by the world API, which numbers its rows.
macro_rules! define_numeric_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Player identity (the game server's account uuid)
define_id!(PlayerId);

// World hierarchy
define_numeric_id!(DomainId);
define_numeric_id!(TownId);
define_numeric_id!(DistrictId);
define_numeric_id!(StructureId);
define_numeric_id!(StreetId);
define_numeric_id!(LocationId);

// Accounts
define_numeric_id!(UserId);

// Item catalogue
define_numeric_id!(ItemBlueprintId);
define_numeric_id!(EnchantmentDefinitionId);
define_numeric_id!(MaterialRefId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&TownId::new(7)).expect("serialize");
        assert_eq!(json, "7");

        let back: TownId = serde_json::from_str("7").expect("deserialize");
        assert_eq!(back, TownId::new(7));
    }

    #[test]
    fn player_ids_round_trip_through_uuid() {
        let uuid = Uuid::new_v4();
        let id = PlayerId::from_uuid(uuid);
        assert_eq!(id.to_uuid(), uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }
}
