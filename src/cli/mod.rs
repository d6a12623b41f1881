//! CLI command implementations
//!
//! This module contains the implementation of all CLI subcommands.

pub mod accounts;
pub mod watch;

use std::path::Path;

use keyfob_core::error::{KeyfobError, PersistError};
use keyfob_core::persist::{self, PersistedState};
use tracing::warn;

/// Load state, degrading when the file is unreadable
///
/// A malformed state file produces a warning and the default state so
/// the CLI stays usable; I/O failures still propagate.
pub(crate) fn load_state_or_empty(path: &Path) -> Result<PersistedState, KeyfobError> {
    match persist::load(path) {
        Ok(state) => Ok(state),
        Err(PersistError::Malformed(err)) => {
            warn!(
                path = %path.display(),
                error = %err,
                "State file is unreadable, starting with an empty account list"
            );
            Ok(PersistedState::default())
        }
        Err(other) => Err(other.into()),
    }
}
