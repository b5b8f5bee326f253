use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use tracing::info;

use profnet_types::Handle;
use profnet_types::api::{LoginRequest, SignupRequest};

use crate::error::AccountError;
use crate::store::RecordStore;

/// Validate a requested handle and make sure nobody holds it yet. Lets the
/// console complain before asking for a password.
pub fn check_handle<S: RecordStore + ?Sized>(store: &S, raw: &str) -> Result<Handle, AccountError> {
    let handle = Handle::parse(raw)?;
    if store.user_exists(handle.as_str())? {
        return Err(AccountError::HandleTaken(handle.into_string()));
    }
    Ok(handle)
}

pub fn signup<S: RecordStore + ?Sized>(store: &S, req: &SignupRequest) -> Result<Handle, AccountError> {
    let handle = Handle::parse(&req.handle)?;
    if req.password.is_empty() {
        return Err(AccountError::EmptyPassword);
    }

    let password_hash = hash_password(&req.password)?;

    if !store.create_user(handle.as_str(), &password_hash, req.email.trim())? {
        return Err(AccountError::HandleTaken(handle.into_string()));
    }

    info!(handle = %handle, "User created");
    Ok(handle)
}

pub fn login<S: RecordStore + ?Sized>(store: &S, req: &LoginRequest) -> Result<Handle, AccountError> {
    let handle = req.handle.trim();
    let stored = store
        .password_hash(handle)?
        .ok_or(AccountError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&stored).map_err(|e| AccountError::Hash(e.to_string()))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AccountError::InvalidCredentials)?;

    info!(handle, "User logged in");
    Ok(Handle::from_stored(handle.to_string()))
}

pub fn change_password<S: RecordStore + ?Sized>(
    store: &S,
    handle: &Handle,
    new_password: &str,
    confirm: &str,
) -> Result<(), AccountError> {
    if new_password != confirm {
        return Err(AccountError::PasswordMismatch);
    }
    if new_password.is_empty() {
        return Err(AccountError::EmptyPassword);
    }

    let password_hash = hash_password(new_password)?;
    if !store.update_password(handle.as_str(), &password_hash)? {
        return Err(AccountError::InvalidCredentials);
    }

    info!(handle = %handle, "Password updated");
    Ok(())
}

/// Argon2id with a fresh random salt, in PHC string form.
fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AccountError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}
