use std::{io, path::PathBuf};
use thiserror::Error;

/// Reasons a set of caches cannot be merged.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("at least two tickets are required, got {0}")]
    NotEnoughTickets(usize),

    #[error("ticket {ticket} holds no credential")]
    EmptyCache { ticket: usize },

    #[error("ticket {ticket} has an undecodable principal: {principal}")]
    MalformedPrincipal { ticket: usize, principal: String },

    /// The server principal is not `service/host@REALM`.
    #[error("ticket {ticket} has a malformed SPN: {spn}")]
    MalformedSpn { ticket: usize, spn: String },

    #[error("usernames are not the same: {}", .clients.join(", "))]
    MismatchedUser { clients: Vec<String> },

    #[error("multiple SPNs are the same: {}", .spns.join(", "))]
    DuplicateSpn { spns: Vec<String> },

    #[error("multiple hosts are different: {}", .hosts.join(", "))]
    MismatchedHost { hosts: Vec<String> },

    /// Records of different format versions cannot share one file.
    #[error("cache file format versions are different: {}", .versions.join(", "))]
    MismatchedVersion { versions: Vec<String> },

    /// A file's default principal block does not end where the master's
    /// does, so splicing it would corrupt the output.
    #[error("ticket {ticket} has a {actual} byte header, expected {expected}")]
    HeaderLengthMismatch {
        ticket: usize,
        expected: usize,
        actual: usize,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("merged cache {} is corrupt: {reason}", .path.display())]
    CorruptOutput { path: PathBuf, reason: String },
}

impl MergeError {
    pub(super) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
