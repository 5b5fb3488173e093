#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

/// Builds big-endian (version 3 or 4) `FILE:` caches for one client.
pub struct CacheBuilder {
    client: (Vec<&'static str>, &'static str),
    default_principal: Option<(Vec<&'static str>, &'static str)>,
    version: u8,
    header_tags: bool,
    credentials: Vec<Vec<u8>>,
}

impl CacheBuilder {
    pub fn new(user: &'static str, realm: &'static str) -> Self {
        Self {
            client: (vec![user], realm),
            default_principal: None,
            version: 4,
            header_tags: true,
            credentials: vec![],
        }
    }

    /// Client principal with an instance, e.g. `alice/admin@REALM`.
    pub fn with_instance(user: &'static str, instance: &'static str, realm: &'static str) -> Self {
        Self {
            client: (vec![user, instance], realm),
            default_principal: None,
            version: 4,
            header_tags: true,
            credentials: vec![],
        }
    }

    /// Leaves out the KDC time offset field of the header.
    pub fn without_header_tags(mut self) -> Self {
        self.header_tags = false;
        self
    }

    /// Version 3: no header fields and a doubled keyblock enctype. Call
    /// before adding tickets.
    pub fn version_3(mut self) -> Self {
        self.version = 3;
        self
    }

    /// Default principal written to the header instead of the client.
    pub fn default_principal(
        mut self,
        components: &[&'static str],
        realm: &'static str,
    ) -> Self {
        self.default_principal = Some((components.to_vec(), realm));
        self
    }

    pub fn ticket(self, spn: &'static str) -> Self {
        let (name, realm) = spn.split_once('@').unwrap();
        let components: Vec<&str> = name.split('/').collect();
        self.ticket_for(&components, realm)
    }

    pub fn ticket_for(mut self, server: &[&str], realm: &str) -> Self {
        let mut buf = vec![];
        principal(&mut buf, 1, &self.client.0, self.client.1);
        principal(&mut buf, 2, server, realm);
        buf.extend_from_slice(&18u16.to_be_bytes());
        if self.version == 3 {
            buf.extend_from_slice(&18u16.to_be_bytes());
        }
        data(&mut buf, &[0x5a; 32]);
        for time in [1_700_000_000u32, 1_700_000_000, 1_700_036_000, 1_700_604_800] {
            buf.extend_from_slice(&time.to_be_bytes());
        }
        buf.push(0);
        buf.extend_from_slice(&0x40e1_0000u32.to_be_bytes());
        buf.extend_from_slice(&0u32.to_be_bytes());
        buf.extend_from_slice(&0u32.to_be_bytes());
        let mut ticket = vec![0x61, 0x82, 0x04, 0x00];
        ticket.extend(server.join("/").bytes());
        data(&mut buf, &ticket);
        data(&mut buf, &[]);
        self.credentials.push(buf);
        self
    }

    pub fn header(&self) -> Vec<u8> {
        let mut buf = vec![5, self.version];
        if self.version == 4 {
            if self.header_tags {
                buf.extend_from_slice(&[0, 12, 0, 1, 0, 8, 0, 0, 0, 0, 0, 0, 0, 0]);
            } else {
                buf.extend_from_slice(&[0, 0]);
            }
        }
        let (components, realm) = self.default_principal.as_ref().unwrap_or(&self.client);
        principal(&mut buf, 1, components, realm);
        buf
    }

    pub fn body(&self) -> Vec<u8> {
        self.credentials.concat()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut buf = self.header();
        buf.extend(self.body());
        buf
    }

    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, self.build()).unwrap();
        path
    }
}

fn data(buf: &mut Vec<u8>, value: &[u8]) {
    buf.extend_from_slice(&(value.len() as u32).to_be_bytes());
    buf.extend_from_slice(value);
}

fn principal(buf: &mut Vec<u8>, name_type: i32, components: &[&str], realm: &str) {
    buf.extend_from_slice(&name_type.to_be_bytes());
    buf.extend_from_slice(&(components.len() as u32).to_be_bytes());
    data(buf, realm.as_bytes());
    for component in components {
        data(buf, component.as_bytes());
    }
}
