use serde::{Deserialize, Serialize};

use crate::Snowflake;

/// File-name prefix that marks an attachment as a spoiler.
pub const ATTACHMENT_SPOILER_PREFIX: &str = "SPOILER_";

/// A file attached to a persisted message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    /// Attachment ID.
    pub id: Snowflake,
    /// Name of the file, including the spoiler prefix when tagged.
    #[serde(deserialize_with = "super::nullable")]
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
    /// Source URL.
    #[serde(deserialize_with = "super::nullable")]
    pub url: String,
    /// Proxied URL.
    #[serde(deserialize_with = "super::nullable")]
    pub proxy_url: String,
    /// Height, for images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Width, for images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
}

impl Attachment {
    /// True when the file name carries the spoiler prefix.
    pub fn spoiler_tag(&self) -> bool {
        self.filename.starts_with(ATTACHMENT_SPOILER_PREFIX)
    }
}
