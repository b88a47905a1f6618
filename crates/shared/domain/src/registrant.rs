use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// A registrant's contact identifier in normalized form (trimmed, lower-cased).
///
/// Uniqueness of admissions is defined on this value, so `" Ada@Example.org "` and
/// `"ada@example.org"` are the same registrant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for Identifier {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

impl From<&str> for Identifier {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> Self {
        identifier.0
    }
}

impl Deref for Identifier {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One registration submission.
///
/// Every field except `identifier` is opaque to admission control. Once admitted a
/// registrant is never updated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrant {
    pub identifier: String,
    pub full_name: String,
    pub phone_number: String,
    pub year_of_study: String,
    pub department: String,
    pub previous_experience: Option<String>,
    pub writing_samples: Option<String>,
    pub motivation: String,
    pub ideas: String,
}

impl Registrant {
    /// Normalizes the identifier in place and returns it.
    pub fn normalize_identifier(&mut self) -> Identifier {
        let identifier = Identifier::normalize(&self.identifier);
        identifier.as_str().clone_into(&mut self.identifier);
        identifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(identifier: &str) -> Registrant {
        Registrant {
            identifier: identifier.to_owned(),
            full_name: "Ada Lovelace".to_owned(),
            phone_number: "+44 20 0000 0000".to_owned(),
            year_of_study: "2".to_owned(),
            department: "Mathematics".to_owned(),
            previous_experience: None,
            writing_samples: Some("https://example.org/notes".to_owned()),
            motivation: "Analytical engines".to_owned(),
            ideas: "Poetical science".to_owned(),
        }
    }

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(Identifier::normalize("  Ada@Example.ORG\t").as_str(), "ada@example.org");
        assert_eq!(Identifier::from("ADA@example.org"), Identifier::from(" ada@EXAMPLE.org "));
    }

    #[test]
    fn normalization_handles_unicode_case() {
        assert_eq!(Identifier::normalize("ÉLISE@ÉCOLE.FR").as_str(), "élise@école.fr");
    }

    #[test]
    fn registrant_identifier_is_rewritten() {
        let mut registrant = sample("  Ada@Example.org ");
        let identifier = registrant.normalize_identifier();
        assert_eq!(identifier.as_str(), "ada@example.org");
        assert_eq!(registrant.identifier, "ada@example.org");
    }

    #[test]
    fn identifier_deserializes_normalized() {
        let identifier: Identifier = serde_json::from_str("\" Ada@Example.org \"").unwrap();
        assert_eq!(&*identifier, "ada@example.org");
    }
}
