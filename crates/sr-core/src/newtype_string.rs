//! Macro for defining strongly-typed SQL identifier newtypes.
//!
//! Every identifier is non-empty and free of backticks. Each newtype also
//! names the characters it accepts: schema names are backtick-quoted in
//! generated SQL, table names are emitted bare.

/// Define a validated SQL identifier newtype.
///
/// Generates:
/// - The struct with `Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize`
/// - Custom `Deserialize` (rejects invalid identifiers)
/// - `new()` (returns `CoreResult`), `as_str()`, `into_inner()`
/// - `Display`, `AsRef<str>`, `Deref<Target=str>`, `Borrow<str>`
/// - `TryFrom<String>`, `TryFrom<&str>`
/// - `PartialEq<str>`, `PartialEq<&str>`
macro_rules! define_identifier {
    (
        $(#[$meta:meta])*
        $vis:vis struct $Name:ident($kind:literal, $is_valid_char:path, $charset:literal);
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        $vis struct $Name(String);

        impl<'de> serde::Deserialize<'de> for $Name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $Name::new(s).map_err(serde::de::Error::custom)
            }
        }

        impl $Name {
            /// Create a new identifier, rejecting empty names, names
            /// containing a backtick, and characters outside the charset.
            pub fn new(name: impl Into<String>) -> $crate::error::CoreResult<Self> {
                let s = name.into();
                if s.is_empty() {
                    return Err($crate::error::CoreError::InvalidIdentifier {
                        kind: $kind,
                        name: s,
                        reason: "must not be empty",
                    });
                }
                if s.contains('`') {
                    return Err($crate::error::CoreError::InvalidIdentifier {
                        kind: $kind,
                        name: s,
                        reason: "must not contain a backtick",
                    });
                }
                if !s.chars().all($is_valid_char) {
                    return Err($crate::error::CoreError::InvalidIdentifier {
                        kind: $kind,
                        name: s,
                        reason: $charset,
                    });
                }
                Ok(Self(s))
            }

            /// Return the underlying name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $Name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $Name {
            fn as_ref(&self) -> &str { &self.0 }
        }

        impl std::ops::Deref for $Name {
            type Target = str;
            fn deref(&self) -> &str { &self.0 }
        }

        impl std::borrow::Borrow<str> for $Name {
            fn borrow(&self) -> &str { &self.0 }
        }

        impl TryFrom<String> for $Name {
            type Error = $crate::error::CoreError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                $Name::new(s)
            }
        }

        impl TryFrom<&str> for $Name {
            type Error = $crate::error::CoreError;
            fn try_from(s: &str) -> Result<Self, Self::Error> {
                $Name::new(s)
            }
        }

        impl PartialEq<str> for $Name {
            fn eq(&self, other: &str) -> bool { self.0 == other }
        }

        impl PartialEq<&str> for $Name {
            fn eq(&self, other: &&str) -> bool { self.0 == *other }
        }
    };
}

pub(crate) use define_identifier;
