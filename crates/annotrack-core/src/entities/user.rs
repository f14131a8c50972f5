use serde::{Deserialize, Serialize};

use crate::errors::{AnnotrackError, AnnotrackResult};
use crate::traits::{Patch, Payload};

/// Access level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permissions {
    #[default]
    Standard,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub api_key: String,
    #[serde(default)]
    pub permissions: Permissions,
}

impl User {
    /// A standard user with a freshly generated API key.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: uuid::Uuid::new_v4().simple().to_string(),
            permissions: Permissions::Standard,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.permissions == Permissions::Admin
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
}

impl Patch for UserPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.api_key.is_none() && self.permissions.is_none()
    }
}

impl Payload for User {
    const KIND: &'static str = "user";
    type Patch = UserPatch;

    fn merge(&self, patch: &UserPatch) -> Self {
        let mut next = self.clone();
        if let Some(name) = &patch.name {
            next.name = name.clone();
        }
        if let Some(api_key) = &patch.api_key {
            next.api_key = api_key.clone();
        }
        if let Some(permissions) = patch.permissions {
            next.permissions = permissions;
        }
        next
    }

    fn validate(&self) -> AnnotrackResult<()> {
        if self.name.trim().is_empty() {
            return Err(AnnotrackError::validation("user name must not be empty"));
        }
        if self.api_key.is_empty() {
            return Err(AnnotrackError::validation("user api_key must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_gets_distinct_keys() {
        let a = User::new("david");
        let b = User::new("david");
        assert_ne!(a.api_key, b.api_key);
        assert_eq!(a.permissions, Permissions::Standard);
        assert!(a.validate().is_ok());
    }

    #[test]
    fn merge_only_touches_set_fields() {
        let user = User::new("david");
        let patch = UserPatch {
            permissions: Some(Permissions::Admin),
            ..Default::default()
        };
        let merged = user.merge(&patch);
        assert_eq!(merged.name, "david");
        assert_eq!(merged.api_key, user.api_key);
        assert!(merged.is_admin());
        assert!(!user.is_admin(), "merge must not mutate the source payload");
    }

    #[test]
    fn unknown_permission_is_rejected_at_the_boundary() {
        let json = r#"{"name":"eve","api_key":"k","permissions":"root"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }

    #[test]
    fn blank_name_fails_validation() {
        let mut user = User::new("x");
        user.name = "   ".into();
        assert!(matches!(
            user.validate(),
            Err(AnnotrackError::ValidationError(_))
        ));
    }
}
