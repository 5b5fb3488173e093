use crate::{Flags, Keyblock, Principal, Timestamp};

const CONFIG_REALM: &[u8] = b"X-CACHECONF:";
const CONFIG_PREFIX: &[u8] = b"krb5_ccache_conf_data";

/// One credential record as stored in the cache. Merging only looks at the
/// two principals; everything else is carried as read.
#[derive(Debug, Clone)]
pub struct Credential {
    pub client: Principal,
    pub server: Principal,
    pub keyblock: Keyblock,
    pub times: TicketTimes,
    pub is_skey: bool,
    pub ticket_flags: Flags,
    pub addresses: Vec<TaggedData>,
    pub authdata: Vec<TaggedData>,
    pub ticket: Vec<u8>,
    pub second_ticket: Vec<u8>,
}

impl Credential {
    // Entries removed in place keep their bytes but get these times.
    pub fn is_removed(&self) -> bool {
        self.times.authtime == -1 && self.times.endtime == 0
    }

    /// `krb5_ccache_conf_data/<key>[/<principal>]@X-CACHECONF:` entries hold a
    /// cache setting in their ticket field, not a ticket.
    pub fn is_config(&self) -> bool {
        self.server.realm == CONFIG_REALM
            && self
                .server
                .components
                .first()
                .is_some_and(|component| component == CONFIG_PREFIX)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TicketTimes {
    pub authtime: i32,
    pub starttime: i32,
    pub endtime: Timestamp,
    pub renew_till: Timestamp,
}

/// A typed blob: a host address (`addrtype`) or an authorization data
/// element (`ad_type`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedData {
    pub kind: u16,
    pub contents: Vec<u8>,
}
