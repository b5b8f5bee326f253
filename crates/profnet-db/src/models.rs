/// Database row types, mapped straight from SQLite rows.
/// Kept apart from the profnet-types models so the storage layer stays independent.

pub struct UserRow {
    pub handle: String,
    pub password: String,
    pub email: String,
    pub created_at: String,
}

pub struct ConnectionRow {
    pub requester: String,
    pub target: String,
    pub status: String,
    pub created_at: String,
}
