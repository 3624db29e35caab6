//! Persistence verbs on the [`Message`] entity.
//!
//! Each verb snapshots what it needs under the shared lock, releases it,
//! performs the request, and merges the server's answer back under the
//! exclusive lock. No lock is held while a request is in flight.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Copier, Message};
use crate::params::{CreateChannelMessageParams, EditMessageParams};
use crate::transport::{Deleter, Patcher, Poster};
use crate::Snowflake;

/// Creates channel messages.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Post `params` to `channel_id`.
    async fn create_channel_message(
        &self,
        channel_id: Snowflake,
        params: CreateChannelMessageParams,
    ) -> Result<Message>;
}

/// Pushes a message's local state to the service.
#[async_trait]
pub trait MessageUpdater: Send + Sync {
    /// Edit the persisted copy of `message` to match its local content and
    /// first embed.
    async fn update_message(&self, message: &Message) -> Result<Message>;
}

/// Deletes channel messages.
#[async_trait]
pub trait MessageDeleter: Send + Sync {
    /// Delete `message_id` in `channel_id`.
    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> Result<()>;
}

#[async_trait]
impl<T: Poster + ?Sized> MessageSender for T {
    async fn create_channel_message(
        &self,
        channel_id: Snowflake,
        params: CreateChannelMessageParams,
    ) -> Result<Message> {
        super::create_channel_message(self, channel_id, params).await
    }
}

#[async_trait]
impl<T: Patcher + ?Sized> MessageUpdater for T {
    async fn update_message(&self, message: &Message) -> Result<Message> {
        let (channel_id, message_id, params) = {
            let data = message.read();
            let params = EditMessageParams {
                content: Some(data.content.clone()),
                embed: data.embeds.first().cloned(),
            };
            (data.channel_id, data.id.unwrap_or_default(), params)
        };
        super::edit_message(self, channel_id, message_id, &params).await
    }
}

#[async_trait]
impl<T: Deleter + ?Sized> MessageDeleter for T {
    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake) -> Result<()> {
        super::delete_message(self, channel_id, message_id).await
    }
}

impl Message {
    fn create_params(&self) -> (Snowflake, CreateChannelMessageParams) {
        let data = self.read();
        let params = CreateChannelMessageParams {
            content: data.content.clone(),
            nonce: data.nonce,
            tts: data.tts,
            embed: data.embeds.first().cloned(),
            ..Default::default()
        };
        (data.channel_id, params)
    }

    /// Post this message to its channel and merge the created message back
    /// into `self`.
    pub async fn send<S: MessageSender + ?Sized>(&self, client: &S) -> Result<Message> {
        let (channel_id, params) = self.create_params();
        let created = client.create_channel_message(channel_id, params).await?;
        created.copy_over_to(self)?;
        debug!(channel = %channel_id, id = ?created.id(), "sent message");
        Ok(created)
    }

    /// Push local content to the persisted message and merge the service's
    /// answer back into `self`.
    pub async fn update<U: MessageUpdater + ?Sized>(&self, client: &U) -> Result<Message> {
        let updated = client.update_message(self).await?;
        updated.copy_over_to(self)?;
        Ok(updated)
    }

    /// Persist whatever the entity currently holds: create it when it has
    /// no ID yet, edit it otherwise.
    pub async fn save_to_discord<T>(&self, client: &T) -> Result<()>
    where
        T: MessageSender + MessageUpdater + ?Sized,
    {
        match self.id() {
            Some(id) if !id.is_empty() => self.update(client).await?,
            _ => self.send(client).await?,
        };
        Ok(())
    }

    /// Delete the persisted message. The entity is stale afterwards.
    pub async fn delete_from_discord<D: MessageDeleter + ?Sized>(&self, client: &D) -> Result<()> {
        let (channel_id, id) = {
            let data = self.read();
            (data.channel_id, data.id)
        };
        let id = id
            .filter(|id| !id.is_empty())
            .ok_or(Error::MissingSnowflake("message id"))?;
        client.delete_message(channel_id, id).await
    }

    /// Send `reply` into this message's channel.
    pub async fn respond<S: MessageSender + ?Sized>(
        &self,
        client: &S,
        reply: &Message,
    ) -> Result<Message> {
        let channel_id = self.channel_id();
        reply.mutate(|data| data.channel_id = channel_id);
        reply.send(client).await
    }

    /// Reply with plain text in this message's channel.
    pub async fn respond_string<S: MessageSender + ?Sized>(
        &self,
        client: &S,
        content: impl Into<String>,
    ) -> Result<Message> {
        let params = CreateChannelMessageParams::from_content(content);
        client
            .create_channel_message(self.channel_id(), params)
            .await
    }
}
