//! User model
//!
//! Table: users

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::password::{hash_password, verify_password, PasswordError};

/// User entity
///
/// The identity every authentication strategy resolves to. Only `id` and
/// `check_password` matter to the policies; the rest is profile data.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, sqlx::FromRow)]
pub struct User {
    /// UUID v4, as a string
    pub id: String,

    /// Email address, used as the Basic auth username
    #[validate(email)]
    pub email: String,

    /// Hashed password (argon2 PHC string)
    #[serde(skip_serializing)]
    pub hashed_password: Option<String>,

    #[validate(length(max = 255))]
    pub first_name: Option<String>,

    #[validate(length(max = 255))]
    pub last_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a user with a fresh id and hashed password
    pub fn new(email: impl Into<String>, password: &str) -> Result<Self, PasswordError> {
        let now = Utc::now();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            hashed_password: Some(hash_password(password)?),
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Check a plaintext password against the stored hash
    ///
    /// Users without a password never match.
    pub fn check_password(&self, plaintext: &str) -> bool {
        if plaintext.is_empty() {
            return false;
        }
        match self.hashed_password.as_deref() {
            Some(hash) => verify_password(plaintext, hash),
            None => false,
        }
    }
}

/// New user creation parameters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,

    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl TryFrom<NewUser> for User {
    type Error = PasswordError;

    fn try_from(new: NewUser) -> Result<Self, Self::Error> {
        let mut user = User::new(new.email, &new.password)?;
        user.first_name = new.first_name;
        user.last_name = new.last_name;
        Ok(user)
    }
}
