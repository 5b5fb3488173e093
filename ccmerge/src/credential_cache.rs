mod credential;
mod file_data;

pub use self::credential::{Credential, TaggedData, TicketTimes};
pub use self::file_data::FileFormatVersion;
use self::file_data::FileData;
use crate::{Error, Principal};
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

const FILE_PREFIX: &str = "FILE";

/// KDC time offset stored in the version 4 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdcOffset {
    pub seconds: i32,
    pub microseconds: i32,
}

/// A `FILE:` credential cache read fully into memory.
#[derive(Debug)]
pub struct CredentialCache {
    pub path: PathBuf,
    pub version: FileFormatVersion,
    pub kdc_offset: Option<KdcOffset>,
    pub default_principal: Principal,
    /// Byte offset of the first credential record.
    pub header_len: usize,
    pub credentials: Vec<Credential>,
}

impl CredentialCache {
    /// Maps a cache name to the file it lives in. `FILE:` is the only
    /// supported type; an unprefixed name is a path.
    pub fn resolve(name: &str) -> anyhow::Result<PathBuf> {
        if name.is_empty() {
            Err(Error::KRB5_CC_BADNAME)?
        }
        let residual = match name.split_once(':') {
            None => name,
            // Use `FILE` when prefix is a drive letter
            Some((p, _)) if p.len() == 1 && p.as_bytes()[0].is_ascii_alphabetic() => name,
            Some((FILE_PREFIX, residual)) => residual,
            Some(_) => Err(Error::KRB5_CC_UNKNOWN_TYPE)?,
        };
        if residual.is_empty() {
            Err(Error::KRB5_CC_BADNAME)?
        }
        Ok(PathBuf::from(residual))
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::KRB5_FCC_NOFILE)?,
            Err(e) => Err(e)?,
        };
        Self::parse(path, &data)
    }

    pub fn parse(path: impl Into<PathBuf>, data: &[u8]) -> anyhow::Result<Self> {
        let FileData {
            version,
            kdc_offset,
            default_principal,
            header_len,
            credentials,
        } = FileData::parse(data)?;
        Ok(Self {
            path: path.into(),
            version,
            kdc_offset,
            default_principal,
            header_len,
            credentials,
        })
    }

    /// First credential holding a real ticket, skipping configuration
    /// entries.
    pub fn first_ticket(&self) -> Option<&Credential> {
        self.credentials
            .iter()
            .find(|credential| !credential.is_config())
    }

    pub fn tickets(&self) -> impl Iterator<Item = &Credential> {
        self.credentials
            .iter()
            .filter(|credential| !credential.is_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_code(err: &anyhow::Error) -> Option<i32> {
        err.downcast_ref::<&Error>().map(|e| e.code)
    }

    #[test]
    fn resolves_file_names() {
        assert_eq!(
            CredentialCache::resolve("FILE:/tmp/krb5cc_1000").unwrap(),
            PathBuf::from("/tmp/krb5cc_1000")
        );
        assert_eq!(
            CredentialCache::resolve("alice.ccache").unwrap(),
            PathBuf::from("alice.ccache")
        );
        assert_eq!(
            CredentialCache::resolve("C:\\tickets\\alice.ccache").unwrap(),
            PathBuf::from("C:\\tickets\\alice.ccache")
        );
    }

    #[test]
    fn rejects_other_cache_types() {
        let err = CredentialCache::resolve("MEMORY:alice").unwrap_err();
        assert_eq!(error_code(&err), Some(Error::KRB5_CC_UNKNOWN_TYPE.code));
        let err = CredentialCache::resolve("KCM:1000").unwrap_err();
        assert_eq!(error_code(&err), Some(Error::KRB5_CC_UNKNOWN_TYPE.code));
    }

    #[test]
    fn rejects_empty_names() {
        for name in ["", "FILE:"] {
            let err = CredentialCache::resolve(name).unwrap_err();
            assert_eq!(error_code(&err), Some(Error::KRB5_CC_BADNAME.code));
        }
    }

    #[test]
    fn missing_file_is_no_cache() {
        let dir = tempfile::tempdir().unwrap();
        let err = CredentialCache::load(dir.path().join("absent.ccache")).unwrap_err();
        assert_eq!(error_code(&err), Some(Error::KRB5_FCC_NOFILE.code));
    }
}
