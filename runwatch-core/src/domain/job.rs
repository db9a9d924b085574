//! Job domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric identifier of a job in the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for JobId {
    fn from(id: i64) -> Self {
        JobId(id)
    }
}

/// A human-assigned job name together with the ids it resolved to
///
/// Names are not unique in a workspace, so a lookup may yield any number
/// of ids. Only an identity with exactly one id can be monitored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobIdentity {
    pub name: String,
    pub ids: Vec<JobId>,
}

impl JobIdentity {
    pub fn new(name: impl Into<String>, ids: Vec<JobId>) -> Self {
        Self {
            name: name.into(),
            ids,
        }
    }

    /// Returns the id when the name resolved to exactly one job
    pub fn single(&self) -> Option<JobId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }
}
