//! Request parameter types for the channel message routes.

use std::fmt;
use std::io::{Cursor, Read};

use parking_lot::RwLock;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::model::{Embed, Message};
use crate::Snowflake;

/// Fewest messages a bulk delete accepts.
pub const BULK_DELETE_MIN: usize = 2;
/// Most messages a bulk delete accepts.
pub const BULK_DELETE_MAX: usize = 100;
/// Most messages a single list call returns.
const LIST_LIMIT_MAX: u32 = 100;

/// Query filter for listing channel messages.
///
/// `around`, `before` and `after` are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetChannelMessagesParams {
    /// Messages around this ID.
    pub around: Option<Snowflake>,
    /// Messages before this ID.
    pub before: Option<Snowflake>,
    /// Messages after this ID.
    pub after: Option<Snowflake>,
    /// Max number of messages to return (1-100).
    pub limit: Option<u32>,
}

impl GetChannelMessagesParams {
    /// Reject combinations the service refuses.
    pub fn validate(&self) -> Result<()> {
        let anchors = [self.around, self.before, self.after]
            .iter()
            .filter(|anchor| anchor.is_some())
            .count();
        if anchors > 1 {
            return Err(Error::InvalidFilter(
                "around, before and after are mutually exclusive",
            ));
        }
        if let Some(limit) = self.limit {
            if limit == 0 || limit > LIST_LIMIT_MAX {
                return Err(Error::InvalidFilter("limit must be between 1 and 100"));
            }
        }
        Ok(())
    }

    /// Encode as a query string, `?` included, or an empty string when
    /// nothing is set.
    pub fn query_string(&self) -> String {
        let pairs = [
            ("around", self.around.map(|id| id.to_string())),
            ("before", self.before.map(|id| id.to_string())),
            ("after", self.after.map(|id| id.to_string())),
            ("limit", self.limit.map(|limit| limit.to_string())),
        ];

        let mut query = String::new();
        for (key, value) in pairs {
            if let Some(value) = value {
                query.push(if query.is_empty() { '?' } else { '&' });
                query.push_str(key);
                query.push('=');
                query.push_str(&value);
            }
        }
        query
    }
}

/// A file to upload alongside a new message.
pub struct CreateChannelMessageFileParams {
    /// Source of the file bytes, drained while encoding.
    pub reader: Box<dyn Read + Send>,
    /// File name shown in the client.
    pub file_name: String,
    /// Hide the file behind a spoiler.
    pub spoiler_tag: bool,
}

impl CreateChannelMessageFileParams {
    /// Upload the contents of `reader` as `file_name`.
    pub fn new(reader: impl Read + Send + 'static, file_name: impl Into<String>) -> Self {
        Self {
            reader: Box::new(reader),
            file_name: file_name.into(),
            spoiler_tag: false,
        }
    }

    /// Upload an in-memory buffer.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>, file_name: impl Into<String>) -> Self {
        Self::new(Cursor::new(bytes.into()), file_name)
    }

    /// Mark this file as a spoiler.
    pub fn spoiler(mut self) -> Self {
        self.spoiler_tag = true;
        self
    }
}

impl fmt::Debug for CreateChannelMessageFileParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateChannelMessageFileParams")
            .field("file_name", &self.file_name)
            .field("spoiler_tag", &self.spoiler_tag)
            .finish_non_exhaustive()
    }
}

/// An unpersisted message draft.
///
/// Files travel as separate multipart parts and are never part of the
/// JSON document. The two spoiler fields are instructions for the encoder.
#[derive(Debug, Default, Serialize)]
pub struct CreateChannelMessageParams {
    /// Text content.
    pub content: String,
    /// Correlation token echoed back in the created message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Snowflake>,
    /// Text-to-speech.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub tts: bool,
    /// Embedded rich content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,

    /// Files to upload.
    #[serde(skip)]
    pub files: Vec<CreateChannelMessageFileParams>,

    /// Wrap the whole content in spoiler markers.
    #[serde(skip)]
    pub spoiler_tag_content: bool,
    /// Mark every file as a spoiler.
    #[serde(skip)]
    pub spoiler_tag_all_attachments: bool,
}

impl CreateChannelMessageParams {
    /// A plain text draft.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Attach a file.
    pub fn with_file(mut self, file: CreateChannelMessageFileParams) -> Self {
        self.files.push(file);
        self
    }

    /// A draft the service would reject for having nothing to show.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.embed.is_none() && self.files.is_empty()
    }
}

/// Fields to change on an existing message. Omitted fields stay as they
/// are on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EditMessageParams {
    /// New text content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New embed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<Embed>,
}

/// IDs of messages to delete in one call.
///
/// Collecting is safe from several tasks at once. Duplicates are kept;
/// the service counts them once.
#[derive(Debug, Default)]
pub struct BulkDeleteMessagesParams {
    messages: RwLock<Vec<Snowflake>>,
}

impl BulkDeleteMessagesParams {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a list of IDs. Not validated until [`Self::valid`].
    pub fn from_ids(ids: impl IntoIterator<Item = Snowflake>) -> Self {
        Self {
            messages: RwLock::new(ids.into_iter().collect()),
        }
    }

    fn too_many(count: usize) -> Result<()> {
        if count > BULK_DELETE_MAX {
            return Err(Error::TooManyMessages {
                count,
                limit: BULK_DELETE_MAX,
            });
        }
        Ok(())
    }

    fn too_few(count: usize) -> Result<()> {
        if count < BULK_DELETE_MIN {
            return Err(Error::TooFewMessages {
                count,
                minimum: BULK_DELETE_MIN,
            });
        }
        Ok(())
    }

    /// Check the 2..=100 cardinality bound.
    pub fn valid(&self) -> Result<()> {
        let count = self.messages.read().len();
        Self::too_many(count)?;
        Self::too_few(count)
    }

    /// Queue a message for deletion. The message must have an ID.
    pub fn add_message(&self, message: &Message) -> Result<()> {
        let id = message
            .id()
            .filter(|id| !id.is_empty())
            .ok_or(Error::MissingSnowflake("message id"))?;
        self.add_id(id)
    }

    /// Queue an ID for deletion, refusing to grow past the maximum.
    pub fn add_id(&self, id: Snowflake) -> Result<()> {
        if id.is_empty() {
            return Err(Error::MissingSnowflake("message id"));
        }
        let mut messages = self.messages.write();
        Self::too_many(messages.len() + 1)?;
        messages.push(id);
        Ok(())
    }

    /// Number of queued IDs.
    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    /// A copy of the queued IDs.
    pub fn ids(&self) -> Vec<Snowflake> {
        self.messages.read().clone()
    }
}

impl Serialize for BulkDeleteMessagesParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let messages = self.messages.read();
        let mut state = serializer.serialize_struct("BulkDeleteMessagesParams", 1)?;
        state.serialize_field("messages", &*messages)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_empty() {
        assert_eq!(GetChannelMessagesParams::default().query_string(), "");
    }

    #[test]
    fn test_query_string_pairs() {
        let params = GetChannelMessagesParams {
            before: Some(Snowflake::new(42)),
            limit: Some(50),
            ..Default::default()
        };
        assert_eq!(params.query_string(), "?before=42&limit=50");
    }

    #[test]
    fn test_filter_validation() {
        let both = GetChannelMessagesParams {
            around: Some(Snowflake::new(1)),
            after: Some(Snowflake::new(2)),
            ..Default::default()
        };
        assert!(matches!(both.validate(), Err(Error::InvalidFilter(_))));

        let zero = GetChannelMessagesParams {
            limit: Some(0),
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let max = GetChannelMessagesParams {
            limit: Some(100),
            ..Default::default()
        };
        assert!(max.validate().is_ok());

        let over = GetChannelMessagesParams {
            limit: Some(101),
            ..Default::default()
        };
        assert!(over.validate().is_err());
    }

    #[test]
    fn test_draft_json_omits_files_and_directives() {
        let mut draft = CreateChannelMessageParams::from_content("hello")
            .with_file(CreateChannelMessageFileParams::from_bytes(b"x".to_vec(), "a.txt"));
        draft.spoiler_tag_content = true;
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json, serde_json::json!({"content": "hello"}));
    }

    #[test]
    fn test_edit_params_omit_unset() {
        let params = EditMessageParams {
            content: Some("edited".into()),
            embed: None,
        };
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"content":"edited"}"#
        );
        assert_eq!(
            serde_json::to_string(&EditMessageParams::default()).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_bulk_delete_serializes_ids_as_strings() {
        let params = BulkDeleteMessagesParams::from_ids([Snowflake::new(1), Snowflake::new(2)]);
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"messages":["1","2"]}"#
        );
    }

    #[test]
    fn test_add_id_rejects_unassigned() {
        let params = BulkDeleteMessagesParams::new();
        assert!(matches!(
            params.add_id(Snowflake::default()),
            Err(Error::MissingSnowflake(_))
        ));
        assert!(params.is_empty());
    }
}
