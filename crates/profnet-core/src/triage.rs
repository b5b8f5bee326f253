use profnet_types::Handle;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::CoreError;
use crate::snapshot::Snapshot;
use crate::store::RecordStore;

/// A validated answer to one pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageCommand {
    Exit,
    Accept(Handle),
    Reject(Handle),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TriageInputError {
    #[error("expected 2 parameters but got {0}; put a space between y/n and <username>")]
    WrongTokenCount(usize),
    #[error("the first parameter should be either 'y' (yes) or 'n' (no), not '{0}'")]
    UnknownDecision(String),
    #[error("'{0}' was not found; make sure what you typed matches the list exactly")]
    NotPending(String),
}

impl TriageCommand {
    /// Parse `exit` or `<y|n> <handle>`, where the handle must be one of
    /// `pending`. Matching is case-sensitive.
    pub fn parse(line: &str, pending: &[Handle]) -> Result<Self, TriageInputError> {
        let line = line.trim();
        if line == "exit" {
            return Ok(TriageCommand::Exit);
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let &[decision, handle] = tokens.as_slice() else {
            return Err(TriageInputError::WrongTokenCount(tokens.len()));
        };

        let accept = match decision {
            "y" => true,
            "n" => false,
            other => return Err(TriageInputError::UnknownDecision(other.to_string())),
        };

        let handle = pending
            .iter()
            .find(|h| h.as_str() == handle)
            .cloned()
            .ok_or_else(|| TriageInputError::NotPending(handle.to_string()))?;

        Ok(if accept {
            TriageCommand::Accept(handle)
        } else {
            TriageCommand::Reject(handle)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageStep {
    /// No requests left, or the user typed `exit`.
    Finished,
    Accepted(Handle),
    Rejected(Handle),
    /// Bad input; show the error and ask again.
    Invalid(TriageInputError),
}

/// One pass over the logged-in user's incoming requests. Holds the list as
/// displayed and drops handles from it as they are answered.
#[derive(Debug, Clone)]
pub struct Triage {
    me: Handle,
    pending: Vec<Handle>,
}

impl Triage {
    pub fn new(snapshot: &Snapshot) -> Self {
        Self {
            me: snapshot.handle().clone(),
            pending: snapshot.pending_handles(),
        }
    }

    pub fn pending(&self) -> &[Handle] {
        &self.pending
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty()
    }

    /// Apply one line of input. A store failure is returned as an error and
    /// leaves the list untouched, so the caller can report it and carry on.
    pub fn apply<S: RecordStore + ?Sized>(
        &mut self,
        store: &S,
        line: &str,
    ) -> Result<TriageStep, CoreError> {
        if self.pending.is_empty() {
            return Ok(TriageStep::Finished);
        }

        let command = match TriageCommand::parse(line, &self.pending) {
            Ok(command) => command,
            Err(e) => return Ok(TriageStep::Invalid(e)),
        };

        match command {
            TriageCommand::Exit => Ok(TriageStep::Finished),
            TriageCommand::Accept(handle) => {
                if !store.accept_request(handle.as_str(), self.me.as_str())? {
                    warn!(from = %handle, to = %self.me, "Request vanished before it was accepted");
                } else {
                    info!(from = %handle, to = %self.me, "Friend request accepted");
                }
                self.remove(&handle);
                Ok(TriageStep::Accepted(handle))
            }
            TriageCommand::Reject(handle) => {
                if !store.reject_request(handle.as_str(), self.me.as_str())? {
                    warn!(from = %handle, to = %self.me, "Request vanished before it was rejected");
                } else {
                    info!(from = %handle, to = %self.me, "Friend request rejected");
                }
                self.remove(&handle);
                Ok(TriageStep::Rejected(handle))
            }
        }
    }

    fn remove(&mut self, handle: &Handle) {
        self.pending.retain(|h| h != handle);
    }
}
