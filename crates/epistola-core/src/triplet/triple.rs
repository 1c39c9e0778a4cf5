use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static CANONICAL: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"^<([^<>;]*); ([^<>;]*)> <([^<>;]*)> <([^<>;]*); ([^<>;]*)>$")
});

/// A typed subject-relation-object triple decoded from a generated sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub head: String,
    pub head_type: String,
    pub relation: String,
    pub tail: String,
    pub tail_type: String,
}

impl Triple {
    #[must_use]
    pub fn new(
        head: impl Into<String>,
        head_type: impl Into<String>,
        relation: impl Into<String>,
        tail: impl Into<String>,
        tail_type: impl Into<String>,
    ) -> Self {
        Self {
            head: head.into(),
            head_type: head_type.into(),
            relation: relation.into(),
            tail: tail.into(),
            tail_type: tail_type.into(),
        }
    }

    /// `<head; head_type> <relation> <tail; tail_type>`, the form used for
    /// deduplication and output.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<{}; {}> <{}> <{}; {}>",
            self.head, self.head_type, self.relation, self.tail, self.tail_type
        )
    }
}

impl std::str::FromStr for Triple {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pattern = CANONICAL
            .as_ref()
            .map_err(|e| crate::Error::InvalidTriple(e.to_string()))?;
        let captures = pattern
            .captures(s)
            .ok_or_else(|| crate::Error::InvalidTriple(s.to_string()))?;

        Ok(Self::new(
            &captures[1],
            &captures[2],
            &captures[3],
            &captures[4],
            &captures[5],
        ))
    }
}
