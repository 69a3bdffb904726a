//! Newtype names used when building expressions.
//!
//! A repository name, a project space and an editor name are all plain strings
//! on the wire, but mixing them up produces an expression that silently asks
//! the executor for the wrong thing. Each gets its own newtype so the builders
//! in [`crate::expression`] only accept the right kind of name.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new name, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or_else(|| {
                    format!("{} must not be empty", stringify!($name))
                })
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Names a source repository as configured for the executor
    /// (e.g. `"myRepo"`, `"internal"`).
    ///
    /// Resolving the name to storage is the executor's job; here it is only
    /// the label of a leaf expression.
    RepositoryName
}

string_id! {
    /// Names the project space a translation produces (e.g. `"public"`).
    ProjectSpace
}

string_id! {
    /// Names an editor applied by an edit node (e.g. `"scrubber"`, `"renamer"`).
    EditorName
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_names_are_rejected() {
        assert!(RepositoryName::new("").is_none());
        assert!(ProjectSpace::new(String::new()).is_none());
        assert!(EditorName::new("").is_none());
    }

    #[test]
    fn display_matches_inner_value() {
        let repo = RepositoryName::new("myRepo").unwrap();
        assert_eq!(repo.to_string(), "myRepo");
        assert_eq!(repo.as_str(), "myRepo");
    }

    #[test]
    fn deserialize_rejects_empty_string() {
        assert!(serde_json::from_str::<ProjectSpace>("\"\"").is_err());
        let space: ProjectSpace = serde_json::from_str("\"public\"").unwrap();
        assert_eq!(space.as_str(), "public");
    }
}
