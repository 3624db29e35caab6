use serde::{Deserialize, Serialize};

use crate::Snowflake;

/// A user as embedded in message objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct User {
    pub id: Snowflake,
    #[serde(deserialize_with = "super::nullable")]
    pub username: String,
    #[serde(deserialize_with = "super::nullable")]
    pub discriminator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub bot: bool,
}

impl User {
    /// `username#discriminator`, or just the username for accounts without
    /// a discriminator.
    pub fn tag(&self) -> String {
        if self.discriminator.is_empty() || self.discriminator == "0" {
            self.username.clone()
        } else {
            format!("{}#{}", self.username, self.discriminator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag() {
        let mut user = User {
            username: "Nelly".into(),
            discriminator: "1337".into(),
            ..Default::default()
        };
        assert_eq!(user.tag(), "Nelly#1337");
        user.discriminator = "0".into();
        assert_eq!(user.tag(), "Nelly");
    }

    #[test]
    fn test_missing_fields_default() {
        let user: User = serde_json::from_str(r#"{"id":"80351110224678912"}"#).unwrap();
        assert_eq!(user.id.get(), 80351110224678912);
        assert!(user.username.is_empty());
        assert!(!user.bot);
    }
}
