// src/types/domain_types.rs
//! Domain-specific newtypes for type safety and validation.

use super::ValidationError;
use crate::constants::{RYVER_API_PATH, RYVER_HOST_SUFFIX};
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Name of a Ryver organization, the `<org>` in `https://<org>.ryver.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization(String);

impl Organization {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();

        if name.is_empty() {
            return Err(ValidationError::EmptyField("organization"));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ValidationError::InvalidOrganization {
                name,
                reason: "only ASCII letters, digits and '-' are allowed".to_string(),
            });
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The OData service root every endpoint is appended to.
    pub fn api_prefix(&self) -> Result<Url, ValidationError> {
        let raw = format!("https://{}.{}{}", self.0, RYVER_HOST_SUFFIX, RYVER_API_PATH);
        Url::parse(&raw).map_err(|e| ValidationError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Username and password for HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    user: String,
    password: String,
}

impl BasicCredentials {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let user = user.into();
        if user.is_empty() {
            return Err(ValidationError::EmptyField("user"));
        }
        Ok(Self {
            user,
            password: password.into(),
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// The pre-encoded `Authorization` header value.
    pub fn authorization_header(&self) -> String {
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.user, self.password));
        format!("Basic {}", token)
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact password in debug output
        f.debug_struct("BasicCredentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

/// An alternate display identity attached to an outgoing message or topic.
///
/// Independent of the authenticated user; the server shows `name` and
/// `avatar` in place of the sender's own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(rename = "displayName")]
    pub name: String,
    pub avatar: String,
}

impl Creator {
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            avatar: avatar.into(),
        }
    }

    /// The `createSource` block sent with a write.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "displayName": self.name,
            "avatar": self.avatar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_organization_prefix() {
        let org = Organization::new("acme").unwrap();
        assert_eq!(
            org.api_prefix().unwrap().as_str(),
            "https://acme.ryver.com/api/1/odata.svc/"
        );
    }

    #[test]
    fn test_invalid_organization() {
        assert!(Organization::new("").is_err());
        assert!(Organization::new("acme.evil.com/").is_err());
    }

    #[test]
    fn test_basic_header() {
        let creds = BasicCredentials::new("alice", "secret").unwrap();
        // base64("alice:secret")
        assert_eq!(creds.authorization_header(), "Basic YWxpY2U6c2VjcmV0");
        assert!(!format!("{:?}", creds).contains("secret"));
    }

    #[test]
    fn test_creator_json() {
        let creator = Creator::new("Bot", "https://example.com/a.png");
        assert_eq!(
            creator.to_json(),
            serde_json::json!({"displayName": "Bot", "avatar": "https://example.com/a.png"})
        );
    }
}
