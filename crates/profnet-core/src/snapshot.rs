use profnet_types::{Connection, Handle, Profile};
use tracing::debug;

use crate::error::CoreError;
use crate::store::RecordStore;

/// What the session knows about the logged-in user: their profile, accepted
/// connections and incoming requests. Built in one go and never mutated;
/// the menu loop loads a new one on every refresh.
#[derive(Debug, Clone)]
pub struct Snapshot {
    profile: Profile,
    friends: Vec<Connection>,
    pending: Vec<Connection>,
}

impl Snapshot {
    pub fn load<S: RecordStore + ?Sized>(store: &S, handle: &str) -> Result<Self, CoreError> {
        let profile = store
            .profile(handle)?
            .ok_or_else(|| CoreError::UnknownUser(handle.to_string()))?;
        let friends = store.friend_edges(handle)?;
        let pending = store.pending_for(handle)?;

        debug!(
            handle,
            friends = friends.len(),
            pending = pending.len(),
            "Snapshot loaded"
        );
        Ok(Self {
            profile,
            friends,
            pending,
        })
    }

    pub fn handle(&self) -> &Handle {
        &self.profile.handle
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Accepted edges, as stored (either direction).
    pub fn friends(&self) -> &[Connection] {
        &self.friends
    }

    /// The other side of each accepted edge.
    pub fn friend_handles(&self) -> impl Iterator<Item = &Handle> {
        let me = self.handle().as_str();
        self.friends.iter().map(move |c| c.other(me))
    }

    pub fn is_friend(&self, handle: &str) -> bool {
        self.friend_handles().any(|h| h == handle)
    }

    pub fn pending(&self) -> &[Connection] {
        &self.pending
    }

    /// Who is waiting on an answer, oldest request first.
    pub fn pending_handles(&self) -> Vec<Handle> {
        self.pending.iter().map(|c| c.requester.clone()).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profnet_db::Database;

    fn store() -> Database {
        let db = Database::open_in_memory().unwrap();
        for h in ["me", "ann", "ben", "cal"] {
            db.create_user(h, "hash", "x@example.com").unwrap();
        }
        db
    }

    #[test]
    fn unknown_user_has_no_snapshot() {
        let db = store();
        let err = Snapshot::load(&db, "ghost").unwrap_err();
        assert!(matches!(err, CoreError::UnknownUser(h) if h == "ghost"));
    }

    #[test]
    fn friends_from_both_directions() {
        let db = store();
        db.insert_pending("me", "ann").unwrap();
        db.accept_request("me", "ann").unwrap();
        db.insert_pending("ben", "me").unwrap();
        db.accept_request("ben", "me").unwrap();
        db.insert_pending("cal", "me").unwrap();

        let snap = Snapshot::load(&db, "me").unwrap();
        let friends: Vec<&str> = snap.friend_handles().map(|h| h.as_str()).collect();
        assert_eq!(friends, vec!["ann", "ben"]);
        assert!(snap.is_friend("ben"));
        assert!(!snap.is_friend("cal"));
        assert_eq!(snap.pending_handles(), vec![Handle::from_stored("cal".into())]);
        assert!(snap.has_pending());
    }

    #[test]
    fn snapshot_does_not_follow_later_writes() {
        let db = store();
        let before = Snapshot::load(&db, "me").unwrap();
        db.insert_pending("ann", "me").unwrap();

        assert!(!before.has_pending());
        assert!(Snapshot::load(&db, "me").unwrap().has_pending());
    }
}
