//! Connection admission: who may send a friend request to whom.
//!
//! Every user gets [`FREE_CONNECTIONS`] requests that are admitted no matter
//! where the target sits in the graph. Once those are used up (counting
//! every edge the user is part of, pending or accepted), a request is only
//! admitted when the target turns up within [`REACH_ROUNDS`] rounds of
//! expansion over accepted edges, starting from the requester's friends.

use std::collections::HashSet;
use std::fmt;

use profnet_types::Handle;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::snapshot::Snapshot;
use crate::store::RecordStore;

pub const FREE_CONNECTIONS: i64 = 5;
pub const REACH_ROUNDS: usize = 3;

/// Why a request was admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    FreeSlot,
    WithinReach,
}

/// Why a request was turned down. None of these are errors; nothing is
/// written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    SelfRequest,
    UnknownUser,
    AlreadyFriends,
    /// A request between the two users is already waiting, in either direction.
    AlreadyPending,
    OutOfReach,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Refusal::SelfRequest => "you cannot send a friend request to yourself",
            Refusal::UnknownUser => "that user doesn't exist",
            Refusal::AlreadyFriends => "you are already friends",
            Refusal::AlreadyPending => "a friend request between you is already pending",
            Refusal::OutOfReach => "they are more than three connections away",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Sent(Route),
    Refused(Refusal),
}

/// Decide whether the snapshot's user may send a request to `target`, and
/// insert the pending edge if so. Any store failure aborts before the insert.
pub fn evaluate_request<S: RecordStore + ?Sized>(
    store: &S,
    snapshot: &Snapshot,
    target: &str,
) -> Result<Admission, CoreError> {
    let me = snapshot.handle();

    if *me == target {
        return Ok(Admission::Refused(Refusal::SelfRequest));
    }
    if !store.user_exists(target)? {
        return Ok(Admission::Refused(Refusal::UnknownUser));
    }
    if snapshot.is_friend(target) {
        return Ok(Admission::Refused(Refusal::AlreadyFriends));
    }
    if store.pending_between(me.as_str(), target)? {
        return Ok(Admission::Refused(Refusal::AlreadyPending));
    }

    let route = if free_connections_remaining(store, me.as_str())? > 0 {
        Route::FreeSlot
    } else {
        info!(from = %me, to = target, "Free connections used up, checking reach");
        if !reachable_set(store, snapshot)?.contains(target) {
            return Ok(Admission::Refused(Refusal::OutOfReach));
        }
        Route::WithinReach
    };

    // The pair index catches a request that raced past the checks above.
    if !store.insert_pending(me.as_str(), target)? {
        return Ok(Admission::Refused(Refusal::AlreadyPending));
    }

    info!(from = %me, to = target, ?route, "Friend request sent");
    Ok(Admission::Sent(route))
}

/// How many more requests `handle` may send without the reach check.
pub fn free_connections_remaining<S: RecordStore + ?Sized>(
    store: &S,
    handle: &str,
) -> Result<i64, CoreError> {
    let count = store.count_connections(handle)?;
    Ok(free_slots(count))
}

fn free_slots(count: i64) -> i64 {
    if count >= FREE_CONNECTIONS {
        0
    } else if count <= 0 {
        FREE_CONNECTIONS
    } else {
        FREE_CONNECTIONS - count
    }
}

/// Everyone the requester can reach in [`REACH_ROUNDS`] rounds.
///
/// The frontier for the next round is what this round discovered minus this
/// round's own frontier. There is no global visited set, so a user seen in
/// an earlier round can be expanded again.
pub fn reachable_set<S: RecordStore + ?Sized>(
    store: &S,
    snapshot: &Snapshot,
) -> Result<HashSet<Handle>, CoreError> {
    let me = snapshot.handle();

    let mut found: HashSet<Handle> = snapshot
        .friends()
        .iter()
        .flat_map(|c| c.endpoints())
        .filter(|h| *h != me)
        .cloned()
        .collect();
    let mut frontier = found.clone();

    for round in 1..=REACH_ROUNDS {
        if frontier.is_empty() {
            break;
        }

        let mut discovered = HashSet::new();
        for user in &frontier {
            for edge in store.friend_edges(user.as_str())? {
                for n in edge.endpoints() {
                    if n != me && n != user {
                        found.insert(n.clone());
                        discovered.insert(n.clone());
                    }
                }
            }
        }

        discovered.retain(|h| !frontier.contains(h));
        debug!(round, next = discovered.len(), total = found.len(), "Reach round done");
        frontier = discovered;
    }

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_slots_clamp() {
        assert_eq!(free_slots(-1), 5);
        assert_eq!(free_slots(0), 5);
        assert_eq!(free_slots(1), 4);
        assert_eq!(free_slots(4), 1);
        assert_eq!(free_slots(5), 0);
        assert_eq!(free_slots(12), 0);
    }

    #[test]
    fn refusal_messages() {
        assert_eq!(Refusal::UnknownUser.to_string(), "that user doesn't exist");
        assert!(Refusal::OutOfReach.to_string().contains("three"));
    }
}
