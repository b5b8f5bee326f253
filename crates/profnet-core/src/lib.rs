pub mod account;
pub mod admission;
pub mod error;
pub mod snapshot;
pub mod store;
pub mod triage;

pub use admission::{Admission, Refusal, Route, evaluate_request, free_connections_remaining};
pub use error::{AccountError, CoreError};
pub use snapshot::Snapshot;
pub use store::RecordStore;
pub use triage::{Triage, TriageCommand, TriageInputError, TriageStep};
