use serde::{Deserialize, Serialize};

use crate::Snowflake;

/// A reaction on a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reaction {
    /// Times this emoji has been used to react.
    pub count: u32,
    /// Whether the current user reacted with this emoji.
    pub me: bool,
    /// The emoji itself.
    pub emoji: Emoji,
}

/// A unicode or custom emoji. Unicode emoji have no ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Emoji {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Snowflake>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub animated: bool,
}
