use log::Level;
use std::fmt;

/// Consistency check that produced a [`MergeEvent::CheckFailed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    User,
    Spn,
    Host,
    Version,
    HeaderLength,
}

/// Something the merge engine wants the operator to know about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeEvent {
    SharedUser { username: String },
    SharedHost { host: String },
    TicketService { ticket: usize, service: String },
    ExtraCredentials { ticket: usize, count: usize },
    EmptyCache { ticket: usize },
    MalformedPrincipal { ticket: usize, principal: String },
    MalformedSpn { ticket: usize, spn: String },
    CheckFailed { check: Check },
    /// One line of the per-ticket listing that follows a failed check.
    Divergent {
        check: Check,
        ticket: usize,
        value: String,
    },
    MergedCredential {
        index: usize,
        client: String,
        server: String,
    },
}

impl MergeEvent {
    pub fn level(&self) -> Level {
        match self {
            Self::SharedUser { .. } | Self::SharedHost { .. } | Self::TicketService { .. } => {
                Level::Info
            }
            Self::ExtraCredentials { .. } => Level::Warn,
            Self::EmptyCache { .. }
            | Self::MalformedPrincipal { .. }
            | Self::MalformedSpn { .. }
            | Self::CheckFailed { .. } => Level::Error,
            Self::Divergent { .. } | Self::MergedCredential { .. } => Level::Debug,
        }
    }
}

impl fmt::Display for MergeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SharedUser { username } => write!(f, "{:<30}: {}", "User Name", username),
            Self::SharedHost { host } => write!(f, "{:<30}: {}", "Hostname", host),
            Self::TicketService { ticket, service } => {
                write!(f, "{:<30}: {}", format!("Service Of Ticket {}", ticket), service)
            }
            Self::ExtraCredentials { ticket, count } => write!(
                f,
                "Ticket {} holds {} credentials, only the first one is checked",
                ticket, count
            ),
            Self::EmptyCache { ticket } => write!(f, "Ticket {} holds no credential", ticket),
            Self::MalformedPrincipal { ticket, principal } => {
                write!(f, "Ticket {} has a principal that is not UTF-8: {}", ticket, principal)
            }
            Self::MalformedSpn { ticket, spn } => {
                write!(f, "SPN of ticket {} is not service/host@REALM: {}", ticket, spn)
            }
            Self::CheckFailed { check } => match check {
                Check::User => write!(f, "Usernames are not the same."),
                Check::Spn => write!(f, "Multiple SPNs are the same."),
                Check::Host => write!(f, "Multiple Hosts are different"),
                Check::Version => write!(f, "Cache file format versions are different"),
                Check::HeaderLength => write!(f, "Cache headers differ in length"),
            },
            Self::Divergent {
                check,
                ticket,
                value,
            } => match check {
                Check::User => write!(f, "Username {}: {}", ticket, value),
                Check::Spn => write!(f, "SPN {}: {}", ticket, value),
                Check::Host => write!(f, "Host for ticket {}: {}", ticket, value),
                Check::Version => write!(f, "Format version of ticket {}: {}", ticket, value),
                Check::HeaderLength => write!(f, "Header length of ticket {}: {}", ticket, value),
            },
            Self::MergedCredential {
                index,
                client,
                server,
            } => write!(f, "Credential {}: {} -> {}", index, client, server),
        }
    }
}

/// Receiver for [`MergeEvent`]s.
pub trait EventSink {
    fn emit(&mut self, event: MergeEvent);
}

impl EventSink for Vec<MergeEvent> {
    fn emit(&mut self, event: MergeEvent) {
        self.push(event);
    }
}

/// Forwards every event to the `log` facade at the event's level.
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: MergeEvent) {
        log::log!(event.level(), "{}", event);
    }
}
