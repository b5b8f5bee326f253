mod common;

use common::{FlakyStore, db_with, snapshot};
use profnet_core::{Admission, CoreError, Route, Triage, TriageInputError, TriageStep, evaluate_request};
use profnet_types::Handle;

fn h(name: &str) -> Handle {
    Handle::from_stored(name.to_string())
}

#[test]
fn accept_then_reject_until_empty() {
    let db = db_with(&["me", "bob", "carol"]);
    db.insert_pending("bob", "me").unwrap();
    db.insert_pending("carol", "me").unwrap();

    let mut triage = Triage::new(&snapshot(&db, "me"));
    assert_eq!(triage.pending(), &[h("bob"), h("carol")]);

    assert_eq!(triage.apply(&db, "y bob").unwrap(), TriageStep::Accepted(h("bob")));
    assert_eq!(triage.pending(), &[h("carol")]);

    // bad input keeps the loop going
    assert_eq!(
        triage.apply(&db, "y bob").unwrap(),
        TriageStep::Invalid(TriageInputError::NotPending("bob".into()))
    );
    assert_eq!(
        triage.apply(&db, "yes carol please").unwrap(),
        TriageStep::Invalid(TriageInputError::WrongTokenCount(3))
    );
    assert!(!triage.is_done());

    assert_eq!(triage.apply(&db, "n carol").unwrap(), TriageStep::Rejected(h("carol")));
    assert!(triage.is_done());
    assert_eq!(triage.apply(&db, "y carol").unwrap(), TriageStep::Finished);

    let snap = snapshot(&db, "me");
    assert!(snap.is_friend("bob"));
    assert!(!snap.has_pending());
    assert_eq!(db.count_connections("carol").unwrap(), 0);

    // direction survives acceptance
    let edge = &snap.friends()[0];
    assert_eq!(edge.requester, h("bob"));
    assert_eq!(edge.target, h("me"));
}

#[test]
fn rejected_requester_can_ask_again() {
    let db = db_with(&["me", "carol"]);
    db.insert_pending("carol", "me").unwrap();

    let mut triage = Triage::new(&snapshot(&db, "me"));
    triage.apply(&db, "n carol").unwrap();

    let carol = snapshot(&db, "carol");
    assert_eq!(
        evaluate_request(&db, &carol, "me").unwrap(),
        Admission::Sent(Route::FreeSlot)
    );
}

#[test]
fn exit_leaves_requests_pending() {
    let db = db_with(&["me", "bob"]);
    db.insert_pending("bob", "me").unwrap();

    let mut triage = Triage::new(&snapshot(&db, "me"));
    assert_eq!(triage.apply(&db, "  exit ").unwrap(), TriageStep::Finished);
    assert!(snapshot(&db, "me").has_pending());
}

#[test]
fn nothing_pending_finishes_immediately() {
    let db = db_with(&["me"]);
    let mut triage = Triage::new(&snapshot(&db, "me"));
    assert!(triage.is_done());
    assert_eq!(triage.apply(&db, "y anyone").unwrap(), TriageStep::Finished);
}

#[test]
fn store_failure_keeps_handle_listed() {
    let db = db_with(&["me", "bob"]);
    db.insert_pending("bob", "me").unwrap();
    let snap = snapshot(&db, "me");

    let store = FlakyStore::new(db);
    store.fail_writes.set(true);
    let mut triage = Triage::new(&snap);

    assert!(matches!(triage.apply(&store, "y bob"), Err(CoreError::Store(_))));
    assert_eq!(triage.pending(), &[h("bob")]);

    store.fail_writes.set(false);
    assert_eq!(triage.apply(&store, "y bob").unwrap(), TriageStep::Accepted(h("bob")));
    assert!(snapshot(&store.inner, "me").is_friend("bob"));
}

#[test]
fn vanished_request_is_still_cleared_from_the_list() {
    let db = db_with(&["me", "bob"]);
    db.insert_pending("bob", "me").unwrap();
    let mut triage = Triage::new(&snapshot(&db, "me"));

    // bob's request disappears behind the list's back
    db.reject_request("bob", "me").unwrap();

    assert_eq!(triage.apply(&db, "y bob").unwrap(), TriageStep::Accepted(h("bob")));
    assert!(triage.is_done());
    assert!(!snapshot(&db, "me").is_friend("bob"));
}
