//! # chanline-rest
//!
//! Client-side resource model for the channel message entity of the
//! Discord REST API.
//!
//! ## Features
//!
//! - Rate-limit bucket keys derived from the channel major parameter, with
//!   deletions kept in their own bucket
//! - JSON or `multipart/form-data` payload encoding for message drafts,
//!   including spoiler tagging of content and attachments
//! - A lock-guarded [`Message`] entity with deep copy and field-level
//!   merge of server responses
//! - Resource operations (list, fetch, create, edit, delete, bulk delete)
//!   written against small transport capability traits
//!
//! ## Quick Start
//!
//! ```rust
//! use chanline_rest::{BucketKey, CreateChannelMessageParams, Snowflake, Verb};
//!
//! let channel = Snowflake::new(81384788765712384);
//! let create = BucketKey::channel_messages(channel, Verb::Create);
//! let delete = BucketKey::channel_messages(channel, Verb::Delete);
//! assert_ne!(create, delete);
//!
//! let mut draft = CreateChannelMessageParams::from_content("hi");
//! draft.spoiler_tag_content = true;
//! let payload = draft.prepare().expect("encodes");
//! assert_eq!(payload.content_type, chanline_rest::payload::CONTENT_TYPE_JSON);
//! ```
//!
//! The HTTP transport itself is not part of this crate: implement
//! [`Getter`], [`Poster`], [`Patcher`] and [`Deleter`] for your client.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod bucket;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod params;
pub mod payload;
pub mod resource;
pub mod snowflake;
pub mod transport;

pub use self::bucket::{BucketKey, Verb};
pub use self::error::{EncodeError, Error, ErrorKind, Result, TransportError};
pub use self::model::{
    derive_spoiler_flags, Attachment, Copier, DeepCopier, Embed, EmbedAuthor, EmbedField,
    EmbedFooter, EmbedImage, EmbedProvider, EmbedThumbnail, EmbedVideo, Emoji, Message,
    MessageActivity, MessageActivityType, MessageApplication, MessageData, MessageType, Reaction,
    SpoilerFlags, User, ATTACHMENT_SPOILER_PREFIX,
};
pub use self::params::{
    BulkDeleteMessagesParams, CreateChannelMessageFileParams, CreateChannelMessageParams,
    EditMessageParams, GetChannelMessagesParams, BULK_DELETE_MAX, BULK_DELETE_MIN,
};
pub use self::payload::Payload;
pub use self::resource::{
    bulk_delete_messages, create_channel_message, delete_message, edit_message,
    get_channel_message, get_channel_messages, MessageDeleter, MessageSender, MessageUpdater,
};
pub use self::snowflake::Snowflake;
pub use self::transport::{Deleter, Getter, Patcher, Poster, Request, Response, Transport};
