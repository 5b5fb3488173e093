pub mod credential_cache;
pub mod error;
pub mod logger;
pub mod merge;
pub mod principal;

pub use self::credential_cache::{
    Credential, CredentialCache, FileFormatVersion, KdcOffset, TaggedData, TicketTimes,
};
pub use self::error::Error;
pub use self::principal::{NameType, Principal, ServicePrincipal};

use std::process::ExitCode;

pub type Enctype = i32;
pub type Flags = i32;
type Timestamp = u32;

#[derive(Debug, Clone)]
pub struct Keyblock {
    pub enctype: Enctype,
    pub contents: Vec<u8>,
}

pub fn prefix_progname_to_error_if_needed(progname: &str, result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) if err.to_string().starts_with("Usage: ") => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{}: {:#}", progname, err);
            ExitCode::FAILURE
        }
    }
}
