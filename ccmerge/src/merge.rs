mod error;
mod event;
mod splicer;
mod validator;

pub use self::error::MergeError;
pub use self::event::{Check, EventSink, LogSink, MergeEvent};
pub use self::splicer::{splice, verify, write_atomic};
pub use self::validator::validate;
use crate::CredentialCache;
use std::{path::Path, slice::Iter};

// Bytes of a version 4 cache that precede the default principal's realm and
// name strings: magic and version (2), header length (2), the KDC time offset
// field (12), name type (4), component count (4), and the realm and name
// length prefixes (4 + 4), less the `@` of the unparsed name.
const DEFAULT_PRINCIPAL_OVERHEAD: usize = 31;

/// Number of bytes before the first credential record of a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLength(pub usize);

impl HeaderLength {
    /// Header length of a cache whose default principal unparses to
    /// `client`.
    pub fn for_client(client: &str) -> Self {
        Self(DEFAULT_PRINCIPAL_OVERHEAD + client.len())
    }
}

/// Loaded input caches in command-line order. The first one is the master
/// whose header ends up in the merged cache.
#[derive(Debug)]
pub struct TicketSet {
    caches: Vec<CredentialCache>,
}

impl TicketSet {
    pub fn new(caches: Vec<CredentialCache>) -> Result<Self, MergeError> {
        if caches.len() < 2 {
            return Err(MergeError::NotEnoughTickets(caches.len()));
        }
        Ok(Self { caches })
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }

    pub fn master(&self) -> &CredentialCache {
        &self.caches[0]
    }

    pub fn iter(&self) -> Iter<'_, CredentialCache> {
        self.caches.iter()
    }

    pub fn paths(&self) -> Vec<&Path> {
        self.caches.iter().map(|cache| cache.path.as_path()).collect()
    }

    /// Credentials the merged cache is expected to hold.
    pub fn credential_count(&self) -> usize {
        self.caches.iter().map(|cache| cache.credentials.len()).sum()
    }
}

/// Splices the validated caches and replaces `output` with the result,
/// returning the number of merged credentials.
///
/// The spliced bytes are parsed before anything is written, so a merge that
/// would not load again never touches `output`.
pub fn write_merged(
    tickets: &TicketSet,
    header_len: HeaderLength,
    output: &Path,
    events: &mut dyn EventSink,
) -> Result<usize, MergeError> {
    let data = splice(&tickets.paths(), header_len)?;
    let count = verify(output, &data, tickets.credential_count(), events)?;
    write_atomic(output, &data)?;
    Ok(count)
}

impl<'a> IntoIterator for &'a TicketSet {
    type Item = &'a CredentialCache;
    type IntoIter = Iter<'a, CredentialCache>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
