use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Longest handle the `users` table accepts.
pub const MAX_HANDLE_LEN: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
    #[error("a username cannot be empty")]
    Empty,
    #[error("that username is too long, shorten it to a max of {} characters", MAX_HANDLE_LEN)]
    TooLong,
    #[error("a username cannot contain spaces")]
    Whitespace,
}

/// A user's unique login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(String);

impl Handle {
    /// Validate user-supplied input. Surrounding whitespace is dropped; any
    /// left inside is refused, since request answers split on it.
    pub fn parse(raw: &str) -> Result<Self, HandleError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(HandleError::Empty);
        }
        if trimmed.chars().count() > MAX_HANDLE_LEN {
            return Err(HandleError::TooLong);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(HandleError::Whitespace);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wrap a handle read back from the database, where the schema already
    /// enforced the length limit.
    pub fn from_stored(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Handle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Handle {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Handle {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Handle {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Pending,
    Friend,
}

impl ConnectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Friend => "friend",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ConnectionStatus::Pending),
            "friend" => Ok(ConnectionStatus::Friend),
            other => Err(format!("unknown connection status '{}'", other)),
        }
    }
}

/// An edge between two users. `requester` is whoever sent the request; once
/// accepted the edge is treated as undirected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub requester: Handle,
    pub target: Handle,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
}

impl Connection {
    pub fn involves(&self, handle: &str) -> bool {
        self.requester == handle || self.target == handle
    }

    /// The endpoint that is not `handle`. For an edge that does not involve
    /// `handle` this is the target.
    pub fn other(&self, handle: &str) -> &Handle {
        if self.target == handle {
            &self.requester
        } else {
            &self.target
        }
    }

    pub fn endpoints(&self) -> [&Handle; 2] {
        [&self.requester, &self.target]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub handle: Handle,
    pub email: String,
    pub created_at: DateTime<Utc>,
}
