//! Wire entities of the channel message resource.
//!
//! This module is split into logical submodules:
//! - [`user`]: message authors and mentioned users
//! - [`attachment`]: uploaded files, including the spoiler file-name marker
//! - [`embed`]: rich embeds and their parts
//! - [`reaction`]: reactions and their emoji
//! - [`message`]: message payload data, the lock-guarded entity and the
//!   copy traits

mod attachment;
mod embed;
mod message;
mod reaction;
mod user;

pub use attachment::{Attachment, ATTACHMENT_SPOILER_PREFIX};
pub use embed::{
    Embed, EmbedAuthor, EmbedField, EmbedFooter, EmbedImage, EmbedProvider, EmbedThumbnail,
    EmbedVideo,
};
pub use message::{
    derive_spoiler_flags, Copier, DeepCopier, Message, MessageActivity, MessageActivityType,
    MessageApplication, MessageData, MessageType, SpoilerFlags,
};
pub use reaction::{Emoji, Reaction};
pub use user::User;

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like an absent field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
