use serde::{Deserialize, Serialize};

use crate::record::KeyedName;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrespondentPolicy {
    /// Sender and receiver are reported together or not at all.
    #[default]
    BothOrNeither,
    /// Whichever role was found is reported; the other stays empty.
    KeepAvailable,
}

impl std::str::FromStr for CorrespondentPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "both_or_neither" => Ok(Self::BothOrNeither),
            "keep_available" => Ok(Self::KeepAvailable),
            _ => Err(crate::Error::InvalidConfig {
                key: "correspondent_policy".into(),
                value: s.to_string(),
            }),
        }
    }
}

/// The `sent` and `received` roles of a letter, each present only when both
/// its name and authority key were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correspondence {
    pub sender: Option<KeyedName>,
    pub receiver: Option<KeyedName>,
}

impl Correspondence {
    /// Renders `(sender, receiver)` under the given policy.
    #[must_use]
    pub fn resolve(self, policy: CorrespondentPolicy) -> (String, String) {
        match (self.sender, self.receiver, policy) {
            (Some(sender), Some(receiver), _) => (sender.to_string(), receiver.to_string()),
            (None, None, _) => (String::new(), String::new()),
            (sender, receiver, CorrespondentPolicy::KeepAvailable) => (
                sender.map(|s| s.to_string()).unwrap_or_default(),
                receiver.map(|r| r.to_string()).unwrap_or_default(),
            ),
            (sender, _, CorrespondentPolicy::BothOrNeither) => {
                tracing::warn!(
                    missing = if sender.is_some() { "received" } else { "sent" },
                    "only one correspondent role found, dropping both"
                );
                (String::new(), String::new())
            }
        }
    }
}
