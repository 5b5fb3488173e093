use super::{EventSink, HeaderLength, MergeError, MergeEvent};
use crate::CredentialCache;
use std::{
    fs::{self, File},
    io::{self, ErrorKind, Read, Write},
    path::Path,
};
use tempfile::NamedTempFile;

/// Returns the master cache followed by the credential records of every
/// other cache.
///
/// The first `header_len` bytes of each non-master file are dropped without
/// being looked at.
pub fn splice<P: AsRef<Path>>(
    paths: &[P],
    header_len: HeaderLength,
) -> Result<Vec<u8>, MergeError> {
    let (master, others) = paths
        .split_first()
        .ok_or(MergeError::NotEnoughTickets(0))?;
    let master = master.as_ref();
    let mut data = fs::read(master).map_err(MergeError::io(master))?;

    for path in others {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(MergeError::io(path))?;
        skip(&mut file, header_len.0).map_err(MergeError::io(path))?;
        file.read_to_end(&mut data).map_err(MergeError::io(path))?;
    }
    Ok(data)
}

fn skip(reader: &mut impl Read, len: usize) -> io::Result<()> {
    let skipped = io::copy(&mut reader.by_ref().take(len as u64), &mut io::sink())?;
    if skipped < len as u64 {
        return Err(io::Error::new(
            ErrorKind::UnexpectedEof,
            format!("file ends after {} of {} header bytes", skipped, len),
        ));
    }
    Ok(())
}

/// Parses the spliced bytes destined for `output` and checks they hold
/// `expected` credentials, listing each one.
pub fn verify(
    output: &Path,
    data: &[u8],
    expected: usize,
    events: &mut dyn EventSink,
) -> Result<usize, MergeError> {
    let corrupt = |reason: String| MergeError::CorruptOutput {
        path: output.to_owned(),
        reason,
    };
    let merged = CredentialCache::parse(output, data).map_err(|e| corrupt(format!("{:#}", e)))?;
    if merged.credentials.len() != expected {
        return Err(corrupt(format!(
            "expected {} credentials, found {}",
            expected,
            merged.credentials.len()
        )));
    }
    for (i, credential) in merged.credentials.iter().enumerate() {
        events.emit(MergeEvent::MergedCredential {
            index: i + 1,
            client: credential.client.to_string(),
            server: credential.server.to_string(),
        });
    }
    Ok(merged.credentials.len())
}

/// Replaces `output` with `data` in a single rename, so a failure leaves any
/// previous file in place.
pub fn write_atomic(output: &Path, data: &[u8]) -> Result<(), MergeError> {
    let dir = match output.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(MergeError::io(dir))?;
    temp.write_all(data).map_err(MergeError::io(temp.path()))?;
    temp.as_file()
        .sync_all()
        .map_err(MergeError::io(temp.path()))?;
    temp.persist(output)
        .map_err(|e| MergeError::io(output)(e.error))?;
    Ok(())
}
