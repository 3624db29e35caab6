//! Resource operations on `/channels/{channel.id}/messages`.
//!
//! Each operation validates its identifiers, derives the bucket key, sends
//! one request through the caller's transport and decodes the response.
//! Nothing is retried here; retry policy belongs to the transport.
//!
//! | Operation | Method | Endpoint | Bucket |
//! |-----------|--------|----------|--------|
//! | [`get_channel_messages`] | GET | `/channels/{id}/messages` | messages |
//! | [`get_channel_message`] | GET | `/channels/{id}/messages/{id}` | messages |
//! | [`create_channel_message`] | POST | `/channels/{id}/messages` | messages |
//! | [`edit_message`] | PATCH | `/channels/{id}/messages/{id}` | messages |
//! | [`delete_message`] | DELETE | `/channels/{id}/messages/{id}` | messages (delete) |
//! | [`bulk_delete_messages`] | POST | `/channels/{id}/messages/bulk-delete` | messages (delete) |

mod entity;

pub use entity::{MessageDeleter, MessageSender, MessageUpdater};

use http::StatusCode;
use tracing::{debug, warn};

use crate::bucket::{BucketKey, Verb};
use crate::endpoint;
use crate::error::{EncodeError, Error, Result};
use crate::model::{Message, MessageData};
use crate::params::{
    BulkDeleteMessagesParams, CreateChannelMessageParams, EditMessageParams,
    GetChannelMessagesParams,
};
use crate::payload::CONTENT_TYPE_JSON;
use crate::transport::{Deleter, Getter, Patcher, Poster, Request, Response};
use crate::Snowflake;

fn require(id: Snowflake, name: &'static str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::MissingSnowflake(name));
    }
    Ok(())
}

fn expect_success(response: &Response) -> Result<()> {
    if response.status.is_success() {
        return Ok(());
    }
    Err(Error::UnexpectedStatus {
        got: response.status,
        wants: "2xx Success",
        body: response.body_text(),
    })
}

fn expect_no_content(response: &Response) -> Result<()> {
    if response.status == StatusCode::NO_CONTENT {
        return Ok(());
    }
    warn!(status = %response.status, "delete answered without 204 No Content");
    Err(Error::UnexpectedStatus {
        got: response.status,
        wants: "204 No Content",
        body: response.body_text(),
    })
}

fn decode_message(response: &Response) -> Result<Message> {
    expect_success(response)?;
    let data: MessageData = serde_json::from_slice(&response.body)?;
    Ok(Message::from_data(data))
}

/// List messages in a channel, newest first.
///
/// Requires `VIEW_CHANNEL`; without `READ_MESSAGE_HISTORY` the list is
/// empty.
pub async fn get_channel_messages<G: Getter + ?Sized>(
    client: &G,
    channel_id: Snowflake,
    params: Option<&GetChannelMessagesParams>,
) -> Result<Vec<Message>> {
    require(channel_id, "channel_id")?;
    let query = match params {
        Some(params) => {
            params.validate()?;
            params.query_string()
        }
        None => String::new(),
    };

    let request = Request::new(
        BucketKey::channel_messages(channel_id, Verb::List),
        endpoint::channel_messages(channel_id) + &query,
    );
    debug!(channel = %channel_id, bucket = %request.bucket, endpoint = %request.endpoint, "listing channel messages");

    let response = client.get(request).await?;
    expect_success(&response)?;
    let data: Vec<MessageData> = serde_json::from_slice(&response.body)?;
    Ok(data.into_iter().map(Message::from_data).collect())
}

/// Fetch a single message.
pub async fn get_channel_message<G: Getter + ?Sized>(
    client: &G,
    channel_id: Snowflake,
    message_id: Snowflake,
) -> Result<Message> {
    require(channel_id, "channel_id")?;
    require(message_id, "message_id")?;

    let request = Request::new(
        BucketKey::channel_messages(channel_id, Verb::Fetch),
        endpoint::channel_message(channel_id, message_id),
    );
    debug!(channel = %channel_id, message = %message_id, bucket = %request.bucket, "fetching channel message");

    let response = client.get(request).await?;
    decode_message(&response)
}

/// Post a new message, uploading any attached files.
pub async fn create_channel_message<P: Poster + ?Sized>(
    client: &P,
    channel_id: Snowflake,
    params: CreateChannelMessageParams,
) -> Result<Message> {
    require(channel_id, "channel_id")?;
    if params.is_empty() {
        return Err(Error::EmptyMessage);
    }

    let payload = params.prepare()?;
    let request = Request::new(
        BucketKey::channel_messages(channel_id, Verb::Create),
        endpoint::channel_messages(channel_id),
    )
    .with_body(payload.body, payload.content_type);
    debug!(channel = %channel_id, bucket = %request.bucket, "creating channel message");

    let response = client.post(request).await?;
    decode_message(&response)
}

/// Edit a message previously sent by the current user.
pub async fn edit_message<P: Patcher + ?Sized>(
    client: &P,
    channel_id: Snowflake,
    message_id: Snowflake,
    params: &EditMessageParams,
) -> Result<Message> {
    require(channel_id, "channel_id")?;
    require(message_id, "message_id")?;

    let body = serde_json::to_vec(params).map_err(EncodeError::from)?;
    let request = Request::new(
        BucketKey::channel_messages(channel_id, Verb::Edit),
        endpoint::channel_message(channel_id, message_id),
    )
    .with_body(body, CONTENT_TYPE_JSON);
    debug!(channel = %channel_id, message = %message_id, bucket = %request.bucket, "editing message");

    let response = client.patch(request).await?;
    decode_message(&response)
}

/// Delete a message. Succeeds only on `204 No Content`.
pub async fn delete_message<D: Deleter + ?Sized>(
    client: &D,
    channel_id: Snowflake,
    message_id: Snowflake,
) -> Result<()> {
    require(channel_id, "channel_id")?;
    require(message_id, "message_id")?;

    let request = Request::new(
        BucketKey::channel_messages(channel_id, Verb::Delete),
        endpoint::channel_message(channel_id, message_id),
    );
    debug!(channel = %channel_id, message = %message_id, bucket = %request.bucket, "deleting message");

    let response = client.delete(request).await?;
    expect_no_content(&response)
}

/// Delete 2 to 100 messages in one request. Succeeds only on
/// `204 No Content`.
///
/// The service refuses messages older than two weeks.
pub async fn bulk_delete_messages<P: Poster + ?Sized>(
    client: &P,
    channel_id: Snowflake,
    params: &BulkDeleteMessagesParams,
) -> Result<()> {
    require(channel_id, "channel_id")?;
    params.valid()?;

    let body = serde_json::to_vec(params).map_err(EncodeError::from)?;
    let request = Request::new(
        BucketKey::channel_messages(channel_id, Verb::BulkDelete),
        endpoint::channel_messages_bulk_delete(channel_id),
    )
    .with_body(body, CONTENT_TYPE_JSON);
    debug!(channel = %channel_id, count = params.len(), bucket = %request.bucket, "bulk deleting messages");

    let response = client.post(request).await?;
    expect_no_content(&response)
}
