use profnet_types::HandleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no such user: {0}")]
    UnknownUser(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    InvalidHandle(#[from] HandleError),
    #[error("sorry, {0} is taken")]
    HandleTaken(String),
    #[error("a password cannot be empty")]
    EmptyPassword,
    #[error("your passwords didn't match")]
    PasswordMismatch,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
