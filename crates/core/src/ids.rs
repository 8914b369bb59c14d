use std::fmt;

use serde::Serialize;

/// Declares a transparent integer identifier for a record model.
///
/// Identifiers are ordered so that batch results keyed by them iterate
/// deterministically.
#[macro_export]
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Returns the raw database identifier.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

record_id!(
    /// Identifier of a party (person, company or team) in the contact directory.
    PartyId
);

/// Reference to a record that owns a notification thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ThreadRef {
    pub model: &'static str,
    pub id: u64,
}

impl ThreadRef {
    pub fn new(model: &'static str, id: u64) -> Self {
        Self { model, id }
    }
}

impl fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.model, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_id_serializes_as_plain_integer() {
        let value = serde_json::to_value(PartyId(7)).expect("serialize id");
        assert_eq!(value, serde_json::json!(7));
    }

    #[test]
    fn thread_ref_displays_model_and_id() {
        assert_eq!(
            ThreadRef::new("sports.patient.injury", 3).to_string(),
            "sports.patient.injury,3"
        );
    }
}
