use serde::{Deserialize, Serialize};

/// A free-text name paired with an external authority or gazetteer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct KeyedName {
    pub name: String,
    pub key: Option<String>,
}

impl KeyedName {
    #[must_use]
    pub fn new(name: impl Into<String>, key: Option<String>) -> Self {
        Self {
            name: name.into(),
            key,
        }
    }

    /// Both parts present, or nothing.
    #[must_use]
    pub fn complete(name: Option<String>, key: Option<String>) -> Option<Self> {
        Some(Self::new(name?, Some(key?)))
    }
}

impl std::fmt::Display for KeyedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.key.as_deref().unwrap_or("None"))
    }
}

impl From<KeyedName> for String {
    fn from(value: KeyedName) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for KeyedName {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for KeyedName {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = s
            .rsplit_once(" (")
            .ok_or_else(|| crate::Error::InvalidKeyedName(s.to_string()))?;
        let key = rest
            .strip_suffix(')')
            .ok_or_else(|| crate::Error::InvalidKeyedName(s.to_string()))?;

        let key = if key == "None" { None } else { Some(key.to_string()) };
        Ok(Self::new(name, key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Document-local anchor (`xml:id`).
    pub id: String,
    pub key: String,
    pub forename: String,
    pub surname: String,
    pub full_name: String,
}

impl Person {
    #[must_use]
    pub fn new(id: String, key: String, forename: String, surname: String) -> Self {
        let full_name = format!("{forename} {surname}");
        Self {
            id,
            key,
            forename,
            surname,
            full_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub key: String,
    pub name: String,
}

/// Normalized description of one source document plus its decoded triples.
///
/// Built once by the metadata extractor, enriched once with `triples`, then
/// written out unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: String,
    pub repository: String,
    pub title: String,
    pub language: String,
    pub support: String,
    pub extent: String,
    pub origin_date: String,
    pub origin_place: KeyedName,
    pub sender: String,
    pub receiver: String,
    pub body_text: String,
    pub persons: Vec<Person>,
    pub places: Vec<Place>,
    #[serde(default)]
    pub triples: Vec<String>,
}

impl DocumentRecord {
    #[must_use]
    pub fn with_triples(mut self, triples: Vec<String>) -> Self {
        self.triples = triples;
        self
    }
}
