//! Endpoint paths for the channel message routes.
//!
//! Paths are relative to the API base URL; query strings are appended by
//! the caller.

use crate::Snowflake;

/// `/channels/{channel.id}/messages`
pub fn channel_messages(channel_id: Snowflake) -> String {
    format!("/channels/{}/messages", channel_id)
}

/// `/channels/{channel.id}/messages/{message.id}`
pub fn channel_message(channel_id: Snowflake, message_id: Snowflake) -> String {
    format!("/channels/{}/messages/{}", channel_id, message_id)
}

/// `/channels/{channel.id}/messages/bulk-delete`
pub fn channel_messages_bulk_delete(channel_id: Snowflake) -> String {
    format!("/channels/{}/messages/bulk-delete", channel_id)
}
