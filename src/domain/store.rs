use crate::utils::error::{ConfigError, Result};
use indexmap::IndexMap;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// XML attribute names shared by the configuration objects.
pub mod keys {
    pub const INTERNAL_NAME: &str = "internalName";
    pub const DISPLAY_NAME: &str = "displayName";
    pub const DESCRIPTION: &str = "description";

    pub const FIELD: &str = "field";
    pub const VALUE: &str = "value";
    pub const HANDLER: &str = "handler";
    pub const TABLE_CONSTRAINT: &str = "tableConstraint";
    pub const KEY: &str = "key";
    pub const TYPE: &str = "type";
    pub const QUALIFIER: &str = "qualifier";
    pub const LEGAL_QUALIFIERS: &str = "legal_qualifiers";
    pub const HIDDEN: &str = "hidden";
    pub const REF: &str = "ref";
    pub const IS_SELECTABLE: &str = "isSelectable";
    pub const VALUE_CONDITION: &str = "valueCondition";

    pub const MAX_LENGTH: &str = "maxLength";
    pub const MAX_SELECT: &str = "maxSelect";
    pub const SOURCE: &str = "source";
    pub const HOMEPAGE_URL: &str = "homepageURL";
    pub const LINKOUT_URL: &str = "linkoutURL";

    pub const POINTER_DATASET: &str = "pointerDataset";
    pub const POINTER_INTERFACE: &str = "pointerInterface";
    pub const POINTER_ATTRIBUTE: &str = "pointerAttribute";
    pub const POINTER_FILTER: &str = "pointerFilter";
    pub const OTHER_FILTERS: &str = "otherFilters";

    pub const DATASET: &str = "dataset";
    pub const VISIBLE: &str = "visible";
    pub const VERSION: &str = "version";
    pub const MODIFIED: &str = "modified";
    pub const OUT_FORMATS: &str = "outFormats";
    pub const FILTER_SET_NAME: &str = "filterSetName";
}

/// Ordered bag of the string attributes an object carries beyond its name.
///
/// The schema is the fixed, per-type list of known attribute titles; it sets
/// emission order whether or not a value was ever assigned. Keys outside the
/// schema are kept too and follow it in first-set order.
///
/// Required keys hold a non-blank value for the lifetime of the store: they
/// can be reassigned but never blanked or removed.
#[derive(Debug, Clone)]
pub struct AttributeValueStore {
    schema: &'static [&'static str],
    required: &'static [&'static str],
    values: IndexMap<String, String>,
}

impl AttributeValueStore {
    pub fn new(schema: &'static [&'static str]) -> Self {
        Self {
            schema,
            required: &[],
            values: IndexMap::new(),
        }
    }

    pub fn with_required(mut self, required: &'static [&'static str]) -> Self {
        self.required = required;
        self
    }

    pub fn schema(&self) -> &'static [&'static str] {
        self.schema
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.required.contains(&key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Unset and empty both read as `None`.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        if self.is_required(key) && value.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: key.to_string(),
                value,
                reason: "required attribute cannot be blank".to_string(),
            });
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    /// Assignment for keys outside the required set. A refused value is
    /// logged and the previous one kept.
    pub(crate) fn set_optional(&mut self, key: &str, value: impl Into<String>) {
        if let Err(e) = self.set(key, value) {
            tracing::warn!("{}", e);
        }
    }

    pub fn remove(&mut self, key: &str) -> Result<Option<String>> {
        if self.is_required(key) {
            return Err(ConfigError::InvalidValue {
                field: key.to_string(),
                value: self.get(key).unwrap_or_default().to_string(),
                reason: "required attribute cannot be removed".to_string(),
            });
        }
        Ok(self.values.shift_remove(key))
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Schema titles first, then any extra keys.
    pub fn titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = self.schema.to_vec();
        titles.extend(
            self.values
                .keys()
                .map(String::as_str)
                .filter(|k| !self.schema.contains(k)),
        );
        titles
    }

    /// Assigned `(title, value)` pairs in title order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        let known = self
            .schema
            .iter()
            .filter_map(move |k| self.values.get_key_value(*k))
            .map(|(k, v)| (k.as_str(), v.as_str()));
        let extra = self
            .values
            .iter()
            .filter(move |(k, _)| !self.schema.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()));
        known.chain(extra)
    }

    /// Parse a numeric attribute; unset, empty, or malformed values fall back
    /// to `default`, malformed ones with a warning.
    pub fn parse_or<T>(&self, key: &str, default: T) -> T
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        match self.get_non_empty(key) {
            None => default,
            Some(raw) => match raw.trim().parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    tracing::warn!(
                        "attribute {}='{}' is not a number, using default {}",
                        key,
                        raw,
                        default
                    );
                    default
                }
            },
        }
    }

    /// `"true"` (any case) is true; everything else, including unset, is false.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

impl PartialEq for AttributeValueStore {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for AttributeValueStore {}

impl Hash for AttributeValueStore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for (key, value) in self.iter() {
            key.hash(state);
            value.hash(state);
        }
    }
}

/// Typed getter/setter pairs over an `attributes: AttributeValueStore` field.
macro_rules! store_accessors {
    ($($getter:ident, $setter:ident => $key:expr;)*) => {
        $(
            pub fn $getter(&self) -> Option<&str> {
                self.attributes.get($key)
            }

            pub fn $setter(&mut self, value: impl Into<String>) {
                self.attributes.set_optional($key, value);
            }
        )*
    };
}

pub(crate) use store_accessors;
