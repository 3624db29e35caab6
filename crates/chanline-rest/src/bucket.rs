//! Rate-limit bucket keys.
//!
//! The API partitions rate limits by route and major parameter (here the
//! channel ID). Deletions on `/channels/{id}/messages` are limited
//! independently of every other verb on the same path, so they get a
//! bucket of their own. Mixing the two corrupts the transport's
//! bookkeeping and ends in spurious 429 responses.

use std::fmt;

use crate::Snowflake;

/// Operations on the channel messages route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// `GET /channels/{id}/messages`
    List,
    /// `GET /channels/{id}/messages/{id}`
    Fetch,
    /// `POST /channels/{id}/messages`
    Create,
    /// `PATCH /channels/{id}/messages/{id}`
    Edit,
    /// `DELETE /channels/{id}/messages/{id}`
    Delete,
    /// `POST /channels/{id}/messages/bulk-delete`
    BulkDelete,
}

impl Verb {
    /// True for verbs limited by the delete bucket.
    #[inline]
    pub fn is_delete(self) -> bool {
        matches!(self, Self::Delete | Self::BulkDelete)
    }
}

/// Identity of the rate limit a request is counted against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey(String);

impl BucketKey {
    /// Bucket for a verb on `/channels/{channel_id}/messages...`.
    pub fn channel_messages(channel_id: Snowflake, verb: Verb) -> Self {
        if verb.is_delete() {
            Self(format!("c:{}:m:delete", channel_id))
        } else {
            Self(format!("c:{}:m", channel_id))
        }
    }

    /// The key as sent to the transport.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANNEL: Snowflake = Snowflake::new(290926798626357250);

    #[test]
    fn test_non_delete_verbs_share_bucket() {
        let list = BucketKey::channel_messages(CHANNEL, Verb::List);
        for verb in [Verb::Fetch, Verb::Create, Verb::Edit] {
            assert_eq!(BucketKey::channel_messages(CHANNEL, verb), list);
        }
    }

    #[test]
    fn test_delete_verbs_share_separate_bucket() {
        let delete = BucketKey::channel_messages(CHANNEL, Verb::Delete);
        let bulk = BucketKey::channel_messages(CHANNEL, Verb::BulkDelete);
        assert_eq!(delete, bulk);
        assert_ne!(delete, BucketKey::channel_messages(CHANNEL, Verb::Create));
    }

    #[test]
    fn test_keyed_by_channel() {
        let other = Snowflake::new(1);
        assert_ne!(
            BucketKey::channel_messages(CHANNEL, Verb::Create),
            BucketKey::channel_messages(other, Verb::Create)
        );
        assert_ne!(
            BucketKey::channel_messages(CHANNEL, Verb::Delete),
            BucketKey::channel_messages(other, Verb::Delete)
        );
        assert!(BucketKey::channel_messages(CHANNEL, Verb::Edit)
            .as_str()
            .contains("290926798626357250"));
    }
}
