pub mod api;
pub mod models;

pub use models::{Connection, ConnectionStatus, Handle, HandleError, Profile, MAX_HANDLE_LEN};
