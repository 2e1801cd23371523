use crate::core::Named;
use crate::utils::error::{ConfigError, Result};
use std::fmt;

/// Non-empty identifier of a configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InternalName(String);

impl InternalName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::missing("configuration object", "internalName"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InternalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InternalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The identity triple every configuration object carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedEntity {
    internal_name: InternalName,
    pub display_name: String,
    pub description: String,
}

impl NamedEntity {
    pub fn new(internal_name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            internal_name: InternalName::new(internal_name)?,
            display_name: String::new(),
            description: String::new(),
        })
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn internal_name(&self) -> &str {
        self.internal_name.as_str()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Named for NamedEntity {
    fn internal_name(&self) -> &str {
        self.internal_name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_name_is_kept_verbatim() {
        let entity = NamedEntity::new("ensembl_gene_id")
            .unwrap()
            .with_display_name("Ensembl Gene ID")
            .with_description("stable identifier");

        assert_eq!(entity.internal_name(), "ensembl_gene_id");
        assert_eq!(entity.display_name(), "Ensembl Gene ID");
        assert_eq!(entity.description(), "stable identifier");
    }

    #[test]
    fn test_empty_name_is_rejected() {
        assert!(matches!(
            NamedEntity::new(""),
            Err(ConfigError::MissingField { .. })
        ));
        assert!(InternalName::new("   ").is_err());
    }

    #[test]
    fn test_display_and_description_may_be_empty() {
        let entity = NamedEntity::new("x").unwrap();
        assert_eq!(entity.display_name(), "");
        assert_eq!(entity.description(), "");
    }
}
