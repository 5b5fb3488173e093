use crate::{Error, Flags};
use std::fmt;

const REALM_SEP: u8 = b'@';
const COMPONENT_SEP: u8 = b'/';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub realm: Vec<u8>,
    pub components: Vec<Vec<u8>>,
    pub name_type: NameType,
}

macro_rules! principal_flag {
    ($name:ident, $value:expr) => {
        pub const $name: Flags = $value;
    };
}

impl Principal {
    principal_flag!(UNPARSE_NO_REALM, 0x2);

    pub fn new(name_type: NameType, components: &[&str], realm: &str) -> Self {
        Self {
            realm: realm.as_bytes().to_owned(),
            components: components.iter().map(|c| c.as_bytes().to_owned()).collect(),
            name_type,
        }
    }

    pub fn unparse_name(&self, flags: Flags) -> anyhow::Result<String> {
        let mut name = self.components.join(&COMPONENT_SEP);
        if flags & Self::UNPARSE_NO_REALM == 0 {
            name = [name, self.realm.clone()].join(&REALM_SEP);
        }
        Ok(String::from_utf8(name)?)
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .components
            .iter()
            .map(|component| String::from_utf8_lossy(component))
            .collect::<Vec<_>>()
            .join("/");
        write!(f, "{}@{}", name, String::from_utf8_lossy(&self.realm))
    }
}

/// A service principal name split into its `service/host@REALM` parts.
///
/// Extra instance components after the host (`ldap/dc.corp.local/corp.local`)
/// stay part of the name but do not change the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePrincipal {
    /// Everything before the realm separator.
    pub name: String,
    pub service: String,
    pub host: String,
    pub realm: String,
}

impl ServicePrincipal {
    pub fn parse(spn: &str) -> anyhow::Result<Self> {
        let (name, realm) = spn
            .split_once(REALM_SEP as char)
            .ok_or(Error::KRB5_PARSE_MALFORMED)?;
        if realm.is_empty() || realm.contains(COMPONENT_SEP as char) {
            Err(Error::KRB5_PARSE_MALFORMED)?
        }
        let (service, instance) = name
            .split_once(COMPONENT_SEP as char)
            .ok_or(Error::KRB5_PARSE_MALFORMED)?;
        let host = instance
            .split(COMPONENT_SEP as char)
            .next()
            .unwrap_or_default();
        if service.is_empty() || host.is_empty() {
            Err(Error::KRB5_PARSE_MALFORMED)?
        }
        Ok(Self {
            name: name.to_owned(),
            service: service.to_owned(),
            host: host.to_owned(),
            realm: realm.to_owned(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameType(pub i32);

macro_rules! name_type {
    ($name_type:ident, $int:expr) => {
        pub const $name_type: NameType = NameType($int);
    };
}

impl NameType {
    // Name type not known
    name_type!(UNKNOWN, 0);
    // Just the name of the principal as in DCE, or for users
    name_type!(PRINCIPAL, 1);
    // Service and other unique instance (krbtgt)
    name_type!(SRV_INST, 2);
    // Service with host name as instance (telnet, rcommands)
    name_type!(SRV_HST, 3);
    // Windows 2000 UPN
    name_type!(ENTERPRISE_PRINCIPAL, 10);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparses_components_and_realm() {
        let principal = Principal::new(NameType::SRV_HST, &["cifs", "HOST1"], "CORP.LOCAL");
        assert_eq!(principal.unparse_name(0).unwrap(), "cifs/HOST1@CORP.LOCAL");
        assert_eq!(
            principal.unparse_name(Principal::UNPARSE_NO_REALM).unwrap(),
            "cifs/HOST1"
        );
        assert_eq!(principal.to_string(), "cifs/HOST1@CORP.LOCAL");
    }

    #[test]
    fn rejects_non_utf8_names() {
        let principal = Principal {
            realm: b"CORP.LOCAL".to_vec(),
            components: vec![vec![0xff, 0xfe]],
            name_type: NameType::PRINCIPAL,
        };
        assert!(principal.unparse_name(0).is_err());
    }

    #[test]
    fn parses_service_principal() {
        let spn = ServicePrincipal::parse("cifs/HOST1@REALM").unwrap();
        assert_eq!(spn.name, "cifs/HOST1");
        assert_eq!(spn.service, "cifs");
        assert_eq!(spn.host, "HOST1");
        assert_eq!(spn.realm, "REALM");
    }

    #[test]
    fn host_is_second_component() {
        let spn = ServicePrincipal::parse("ldap/dc01.corp.local/corp.local@CORP.LOCAL").unwrap();
        assert_eq!(spn.name, "ldap/dc01.corp.local/corp.local");
        assert_eq!(spn.host, "dc01.corp.local");
    }

    #[test]
    fn rejects_malformed_service_principals() {
        for spn in [
            "cifs@REALM",
            "cifs/HOST1",
            "cifs/HOST1@",
            "/HOST1@REALM",
            "cifs/@REALM",
            "cifs/HOST1@REALM/X",
        ] {
            let err = ServicePrincipal::parse(spn).unwrap_err();
            assert_eq!(
                err.downcast_ref::<&Error>().map(|e| e.code),
                Some(Error::KRB5_PARSE_MALFORMED.code),
                "{spn}"
            );
        }
    }
}
