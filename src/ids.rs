//! Identifier types.
//!
//! Classes, subclasses, spells, spell lists, features and characters are
//! all named by interned string identifiers. Each uses `Arc<str>` for
//! cheap cloning and fast comparison, and serializes as a plain string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            /// Create a new identifier from a string slice.
            pub fn from_str(s: &str) -> Self {
                Self(Arc::from(s))
            }

            /// Get the string representation of this identifier.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                self.0.as_ref().serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Ok($name::from(s))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from_str(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(Arc::from(s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

interned_id!(
    /// Identifier of a character class (e.g. `"Wizard"`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzcast::ClassId;
    ///
    /// let wizard = ClassId::from_str("Wizard");
    /// let wizard2: ClassId = "Wizard".into();
    /// assert_eq!(wizard, wizard2);
    /// assert_eq!(wizard.as_str(), "Wizard");
    /// ```
    ClassId
);

interned_id!(
    /// Identifier of a subclass (e.g. `"MartialSpellblade"`).
    SubclassId
);

interned_id!(
    /// Identifier of a single spell.
    SpellId
);

interned_id!(
    /// Identifier of a spell list (a class list, an expanded list, ...).
    SpellListId
);

interned_id!(
    /// Identifier of a feature definition in the feature catalog.
    FeatureId
);

interned_id!(
    /// Identity of a character; keys the level-up session store.
    CharacterId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id1 = SpellId::from_str("FireBolt");
        let id2 = SpellId::from_str("FireBolt");
        assert_eq!(id1, id2);
        assert_eq!(id1.as_str(), "FireBolt");
    }

    #[test]
    fn test_id_from_string() {
        let id: ClassId = String::from("Cleric").into();
        assert_eq!(id.as_str(), "Cleric");
        assert_eq!(id.to_string(), "Cleric");
    }

    #[test]
    fn test_id_ordering() {
        let bard = ClassId::from_str("Bard");
        let wizard = ClassId::from_str("Wizard");
        assert!(bard < wizard);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = FeatureId::from_str("BonusCantripsDruid");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"BonusCantripsDruid\"");

        let back: FeatureId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
