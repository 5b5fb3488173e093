use super::{Check, EventSink, HeaderLength, MergeError, MergeEvent, TicketSet};
use crate::{CredentialCache, Flags, Principal, ServicePrincipal};
use std::collections::HashSet;

/// What the checks need from the first ticket of one cache.
#[derive(Debug)]
struct TicketInfo {
    client: String,
    username: String,
    spn: ServicePrincipal,
}

impl TicketInfo {
    fn read(
        ticket: usize,
        cache: &CredentialCache,
        events: &mut dyn EventSink,
    ) -> Result<Self, MergeError> {
        let Some(credential) = cache.first_ticket() else {
            events.emit(MergeEvent::EmptyCache { ticket });
            return Err(MergeError::EmptyCache { ticket });
        };
        let count = cache.tickets().count();
        if count > 1 {
            events.emit(MergeEvent::ExtraCredentials { ticket, count });
        }

        let client = unparse(ticket, &credential.client, 0, events)?;
        let username = unparse(
            ticket,
            &credential.client,
            Principal::UNPARSE_NO_REALM,
            events,
        )?;
        let server = unparse(ticket, &credential.server, 0, events)?;
        let spn = match ServicePrincipal::parse(&server) {
            Ok(spn) => spn,
            Err(_) => {
                events.emit(MergeEvent::MalformedSpn {
                    ticket,
                    spn: server.clone(),
                });
                return Err(MergeError::MalformedSpn {
                    ticket,
                    spn: server,
                });
            }
        };
        Ok(Self {
            client,
            username,
            spn,
        })
    }
}

fn unparse(
    ticket: usize,
    principal: &Principal,
    flags: Flags,
    events: &mut dyn EventSink,
) -> Result<String, MergeError> {
    principal.unparse_name(flags).map_err(|_| {
        events.emit(MergeEvent::MalformedPrincipal {
            ticket,
            principal: principal.to_string(),
        });
        MergeError::MalformedPrincipal {
            ticket,
            principal: principal.to_string(),
        }
    })
}

/// Checks that the caches can be spliced into one and returns the header
/// length shared by all of them.
///
/// The first ticket of every cache must have the same client principal, the
/// SPNs must be pairwise distinct, and every SPN must name the same host.
/// Every cache must also share the master's file format version and carry a
/// header of the length derived from the master's client.
pub fn validate(
    tickets: &TicketSet,
    events: &mut dyn EventSink,
) -> Result<HeaderLength, MergeError> {
    let infos = tickets
        .iter()
        .enumerate()
        .map(|(i, cache)| TicketInfo::read(i + 1, cache, &mut *events))
        .collect::<Result<Vec<_>, _>>()?;

    let clients: Vec<String> = infos.iter().map(|info| info.client.clone()).collect();
    if !all_equal(&clients) {
        report(events, Check::User, &clients);
        return Err(MergeError::MismatchedUser { clients });
    }

    let spns: Vec<String> = infos.iter().map(|info| info.spn.name.clone()).collect();
    if spns.iter().collect::<HashSet<_>>().len() != spns.len() {
        report(events, Check::Spn, &spns);
        return Err(MergeError::DuplicateSpn { spns });
    }

    let hosts: Vec<String> = infos.iter().map(|info| info.spn.host.clone()).collect();
    if !all_equal(&hosts) {
        report(events, Check::Host, &hosts);
        return Err(MergeError::MismatchedHost { hosts });
    }

    let master = tickets.master();
    let versions: Vec<String> = tickets
        .iter()
        .map(|cache| (cache.version as u8).to_string())
        .collect();
    if tickets.iter().any(|cache| cache.version != master.version) {
        report(events, Check::Version, &versions);
        return Err(MergeError::MismatchedVersion { versions });
    }

    let header_len = HeaderLength::for_client(&infos[0].client);
    let mismatch = tickets
        .iter()
        .enumerate()
        .find(|(_, cache)| cache.header_len != header_len.0);
    if let Some((i, cache)) = mismatch {
        let lengths: Vec<String> = tickets
            .iter()
            .map(|cache| cache.header_len.to_string())
            .collect();
        report(events, Check::HeaderLength, &lengths);
        return Err(MergeError::HeaderLengthMismatch {
            ticket: i + 1,
            expected: header_len.0,
            actual: cache.header_len,
        });
    }

    events.emit(MergeEvent::SharedUser {
        username: infos[0].username.clone(),
    });
    events.emit(MergeEvent::SharedHost {
        host: infos[0].spn.host.clone(),
    });
    for (i, info) in infos.iter().enumerate() {
        events.emit(MergeEvent::TicketService {
            ticket: i + 1,
            service: info.spn.service.clone(),
        });
    }
    Ok(header_len)
}

fn all_equal(values: &[String]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}

fn report(events: &mut dyn EventSink, check: Check, values: &[String]) {
    events.emit(MergeEvent::CheckFailed { check });
    for (i, value) in values.iter().enumerate() {
        events.emit(MergeEvent::Divergent {
            check,
            ticket: i + 1,
            value: value.clone(),
        });
    }
}
