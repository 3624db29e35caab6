//! The message entity.
//!
//! [`MessageData`] is the plain wire representation. [`Message`] wraps it
//! in a reader/writer lock so a cache and a caller can hold the same
//! entity at once, and keeps the derived spoiler flags next to it. Locks
//! are only ever taken to snapshot or to merge, never across a request.

use std::any::Any;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Attachment, Embed, Reaction, User};
use crate::error::{Error, Result};
use crate::Snowflake;

const SPOILER_MARKER: &str = "||";

/// Kinds of messages the service generates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
#[allow(missing_docs)]
pub enum MessageType {
    #[default]
    Default,
    RecipientAdd,
    RecipientRemove,
    Call,
    ChannelNameChange,
    ChannelIconChange,
    ChannelPinnedMessage,
    GuildMemberJoin,
    /// A type this crate does not know about.
    Unknown(u16),
}

impl From<u16> for MessageType {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::Default,
            1 => Self::RecipientAdd,
            2 => Self::RecipientRemove,
            3 => Self::Call,
            4 => Self::ChannelNameChange,
            5 => Self::ChannelIconChange,
            6 => Self::ChannelPinnedMessage,
            7 => Self::GuildMemberJoin,
            other => Self::Unknown(other),
        }
    }
}

impl From<MessageType> for u16 {
    fn from(value: MessageType) -> Self {
        match value {
            MessageType::Default => 0,
            MessageType::RecipientAdd => 1,
            MessageType::RecipientRemove => 2,
            MessageType::Call => 3,
            MessageType::ChannelNameChange => 4,
            MessageType::ChannelIconChange => 5,
            MessageType::ChannelPinnedMessage => 6,
            MessageType::GuildMemberJoin => 7,
            MessageType::Unknown(other) => other,
        }
    }
}

/// Rich presence activity types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
#[allow(missing_docs)]
pub enum MessageActivityType {
    #[default]
    Join,
    Spectate,
    Listen,
    JoinRequest,
    Unknown(u16),
}

impl From<u16> for MessageActivityType {
    fn from(value: u16) -> Self {
        match value {
            1 => Self::Join,
            2 => Self::Spectate,
            3 => Self::Listen,
            5 => Self::JoinRequest,
            other => Self::Unknown(other),
        }
    }
}

impl From<MessageActivityType> for u16 {
    fn from(value: MessageActivityType) -> Self {
        match value {
            MessageActivityType::Join => 1,
            MessageActivityType::Spectate => 2,
            MessageActivityType::Listen => 3,
            MessageActivityType::JoinRequest => 5,
            MessageActivityType::Unknown(other) => other,
        }
    }
}

/// Rich presence activity attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageActivity {
    /// Activity type.
    #[serde(rename = "type")]
    pub kind: MessageActivityType,
    /// Party ID from the rich presence event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub party_id: Option<String>,
}

/// Rich presence application attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct MessageApplication {
    pub id: Snowflake,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(deserialize_with = "super::nullable")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(deserialize_with = "super::nullable")]
    pub name: String,
}

/// Spoiler state derived from content and attachments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpoilerFlags {
    /// The whole content is wrapped in `||` markers.
    pub content: bool,
    /// There is at least one attachment and every one is spoiler-tagged.
    pub all_attachments: bool,
}

/// Compute the spoiler flags of a message.
///
/// Content shorter than four bytes can never carry both markers.
pub fn derive_spoiler_flags(content: &str, attachments: &[Attachment]) -> SpoilerFlags {
    let content = content.len() >= 2 * SPOILER_MARKER.len()
        && content.starts_with(SPOILER_MARKER)
        && content.ends_with(SPOILER_MARKER);
    let all_attachments = !attachments.is_empty() && attachments.iter().all(Attachment::spoiler_tag);

    SpoilerFlags {
        content,
        all_attachments,
    }
}

/// Plain message fields as sent and received on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageData {
    /// Message ID, `None` until persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Snowflake>,
    /// Channel the message lives in.
    pub channel_id: Snowflake,
    /// Author; absent for some webhook payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    /// Text content.
    #[serde(deserialize_with = "super::nullable")]
    pub content: String,
    /// When the message was sent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// When the message was last edited.
    pub edited_timestamp: Option<DateTime<Utc>>,
    /// Text-to-speech.
    pub tts: bool,
    /// Whether the message mentions everyone.
    pub mention_everyone: bool,
    /// Mentioned users, in wire order.
    #[serde(deserialize_with = "super::nullable")]
    pub mentions: Vec<User>,
    /// Mentioned role IDs.
    #[serde(deserialize_with = "super::nullable")]
    pub mention_roles: Vec<Snowflake>,
    #[serde(deserialize_with = "super::nullable")]
    #[allow(missing_docs)]
    pub attachments: Vec<Attachment>,
    #[serde(deserialize_with = "super::nullable")]
    #[allow(missing_docs)]
    pub embeds: Vec<Embed>,
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "super::nullable")]
    #[allow(missing_docs)]
    pub reactions: Vec<Reaction>,
    /// Correlation token echoed back by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<Snowflake>,
    /// Pin state.
    pub pinned: bool,
    /// Set when a webhook generated the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<Snowflake>,
    /// Message type discriminant.
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub activity: Option<MessageActivity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub application: Option<MessageApplication>,
}

impl MessageData {
    /// The entire content is wrapped in spoiler markers.
    pub fn spoiler_tag_content(&self) -> bool {
        self.spoiler_flags().content
    }

    /// Every attachment is spoiler-tagged (and there is at least one).
    pub fn spoiler_tag_all_attachments(&self) -> bool {
        self.spoiler_flags().all_attachments
    }

    /// Both derived flags, computed from the current fields.
    pub fn spoiler_flags(&self) -> SpoilerFlags {
        derive_spoiler_flags(&self.content, &self.attachments)
    }

    /// Overwrite every field with `source`'s.
    ///
    /// The nonce and author are kept when `source` has none.
    fn merge_from(&mut self, source: &MessageData) {
        self.id = source.id;
        self.channel_id = source.channel_id;
        self.content.clone_from(&source.content);
        self.timestamp = source.timestamp;
        self.edited_timestamp = source.edited_timestamp;
        self.tts = source.tts;
        self.mention_everyone = source.mention_everyone;
        self.mention_roles.clone_from(&source.mention_roles);
        self.pinned = source.pinned;
        self.webhook_id = source.webhook_id;
        self.kind = source.kind;
        self.activity.clone_from(&source.activity);
        self.application.clone_from(&source.application);

        if source.author.is_some() {
            self.author.clone_from(&source.author);
        }
        if source.nonce.is_some() {
            self.nonce = source.nonce;
        }

        self.mentions.clone_from(&source.mentions);
        self.attachments.clone_from(&source.attachments);
        self.embeds.clone_from(&source.embeds);
        self.reactions.clone_from(&source.reactions);
    }
}

/// Lock payload: the fields plus the flags derived from them.
struct Entity {
    data: MessageData,
    flags: SpoilerFlags,
}

impl Entity {
    fn new(data: MessageData) -> Self {
        let flags = data.spoiler_flags();
        Self { data, flags }
    }

    fn update_internals(&mut self) {
        self.flags = self.data.spoiler_flags();
    }
}

/// Produces a wholly independent copy.
pub trait DeepCopier {
    /// Copy every field, recursively, with no shared ownership.
    fn deep_copy(&self) -> Self
    where
        Self: Sized;
}

/// Merges an entity's state into an existing entity of the same kind.
pub trait Copier {
    /// Copy this entity over `other`.
    ///
    /// Fails with [`Error::UnsupportedType`] and leaves `other` untouched
    /// when `other` is not the same kind of entity.
    fn copy_over_to(&self, other: &dyn Any) -> Result<()>;
}

/// A chat message with interior reader/writer locking.
pub struct Message {
    inner: RwLock<Entity>,
}

impl Message {
    /// An empty, unpersisted message.
    pub fn new() -> Self {
        Self::from_data(MessageData::default())
    }

    /// A draft message for `channel_id` carrying `content`.
    pub fn with_content(channel_id: Snowflake, content: impl Into<String>) -> Self {
        Self::from_data(MessageData {
            channel_id,
            content: content.into(),
            ..Default::default()
        })
    }

    /// Wrap decoded data, recomputing the derived flags.
    pub fn from_data(data: MessageData) -> Self {
        Self {
            inner: RwLock::new(Entity::new(data)),
        }
    }

    /// Take the shared lock.
    pub fn read(&self) -> MappedRwLockReadGuard<'_, MessageData> {
        RwLockReadGuard::map(self.inner.read(), |entity| &entity.data)
    }

    /// Apply a local change under the exclusive lock. Derived flags are
    /// recomputed before the lock is released.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut MessageData) -> R) -> R {
        let mut entity = self.inner.write();
        let out = f(&mut entity.data);
        entity.update_internals();
        out
    }

    /// Recompute the derived spoiler flags from content and attachments.
    pub fn update_internals(&self) {
        self.inner.write().update_internals();
    }

    /// A consistent copy of the current fields.
    pub fn snapshot(&self) -> MessageData {
        self.inner.read().data.clone()
    }

    /// Unwrap the plain data.
    pub fn into_data(self) -> MessageData {
        self.inner.into_inner().data
    }

    /// Message ID, if persisted.
    pub fn id(&self) -> Option<Snowflake> {
        self.inner.read().data.id
    }

    /// Channel ID.
    pub fn channel_id(&self) -> Snowflake {
        self.inner.read().data.channel_id
    }

    /// Text content.
    pub fn content(&self) -> String {
        self.inner.read().data.content.clone()
    }

    /// The derived flags as last recomputed.
    pub fn spoiler_flags(&self) -> SpoilerFlags {
        self.inner.read().flags
    }

    /// See [`MessageData::spoiler_tag_content`].
    pub fn spoiler_tag_content(&self) -> bool {
        self.inner.read().flags.content
    }

    /// See [`MessageData::spoiler_tag_all_attachments`].
    pub fn spoiler_tag_all_attachments(&self) -> bool {
        self.inner.read().flags.all_attachments
    }
}

impl Default for Message {
    fn default() -> Self {
        Self::new()
    }
}

impl From<MessageData> for Message {
    fn from(data: MessageData) -> Self {
        Self::from_data(data)
    }
}

impl DeepCopier for Message {
    fn deep_copy(&self) -> Self {
        Self::from_data(self.snapshot())
    }
}

impl Clone for Message {
    fn clone(&self) -> Self {
        self.deep_copy()
    }
}

impl Copier for Message {
    fn copy_over_to(&self, other: &dyn Any) -> Result<()> {
        let target = other
            .downcast_ref::<Message>()
            .ok_or(Error::UnsupportedType("argument given is not a Message"))?;

        if std::ptr::eq(self, target) {
            return Ok(());
        }

        // Acquire both locks in address order so that two copies running in
        // opposite directions cannot deadlock.
        let (source, mut dest) = if (self as *const Self) < (target as *const Self) {
            let source = self.inner.read();
            let dest = target.inner.write();
            (source, dest)
        } else {
            let dest = target.inner.write();
            let source = self.inner.read();
            (source, dest)
        };

        dest.data.merge_from(&source.data);
        dest.update_internals();
        tracing::trace!(id = ?dest.data.id, channel = %dest.data.channel_id, "merged message state");
        Ok(())
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("data", &self.inner.read().data)
            .finish()
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.inner.read().data.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Message {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        MessageData::deserialize(deserializer).map(Self::from_data)
    }
}
