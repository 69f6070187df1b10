use std::fmt;

use crate::types::db::{app, user};

/// Registered account as seen by the service layer
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

/// Application that tokens are issued for
#[derive(Clone, PartialEq, Eq)]
pub struct App {
    pub id: i32,
    pub name: String,
    pub secret: String,
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            password_hash: model.pass_hash,
        }
    }
}

impl From<app::Model> for App {
    fn from(model: app::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            secret: model.secret,
        }
    }
}

// Hashes and secrets never reach the logs
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password_hash() {
        let user = User {
            id: 7,
            email: "user@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=4096,t=1,p=1$c2FsdA$aGFzaA".to_string(),
        };

        let debug_output = format!("{:?}", user);
        assert!(debug_output.contains("user@example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("argon2id"));
    }

    #[test]
    fn test_debug_redacts_app_secret() {
        let app = App {
            id: 1,
            name: "dashboard".to_string(),
            secret: "super-secret-signing-key".to_string(),
        };

        let debug_output = format!("{:?}", app);
        assert!(debug_output.contains("dashboard"));
        assert!(!debug_output.contains("super-secret-signing-key"));
    }
}
