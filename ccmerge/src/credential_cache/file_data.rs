use super::{Credential, KdcOffset, TaggedData, TicketTimes};
use crate::{Enctype, Error, Keyblock, NameType, Principal};
use nom::{
    bytes::complete::{tag, take},
    combinator::map,
    multi::{length_count, length_data},
    number::{
        complete::{i32, u16, u32, u8},
        Endianness,
    },
    sequence::tuple,
    IResult,
};

const FILE_FIRST_BYTE: u8 = 5;
const FCC_TAG_DELTATIME: u16 = 1;

type Input<'a> = &'a [u8];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormatVersion {
    V1 = 1,
    V2,
    V3,
    V4,
}

impl TryFrom<u8> for FileFormatVersion {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            4 => Ok(Self::V4),
            _ => Err(Error::KRB5_CCACHE_BADVNO)?,
        }
    }
}

impl FileFormatVersion {
    // Versions 1 and 2 of the file format use native byte order for integer
    // representations.
    // Versions 3 and 4 always use big-endian byte order.
    fn endianness(self) -> Endianness {
        match self {
            Self::V1 | Self::V2 => Endianness::Native,
            Self::V3 | Self::V4 => Endianness::Big,
        }
    }
}

/// Everything read from one `FILE:` cache.
#[derive(Debug)]
pub(super) struct FileData {
    pub(super) version: FileFormatVersion,
    pub(super) kdc_offset: Option<KdcOffset>,
    pub(super) default_principal: Principal,
    pub(super) header_len: usize,
    pub(super) credentials: Vec<Credential>,
}

impl FileData {
    // After the two-byte version indicator, the file has three parts:
    // - the header (in version 4 only),
    // - the default principal name,
    // - and a sequence of credentials.
    //
    // There is no count of credentials or marker at the end of the sequence
    // of credentials; the sequence ends when the file ends.
    pub(super) fn parse(data: &[u8]) -> anyhow::Result<Self> {
        let (input, version) = read_version(data).map_err(format_error)?;
        let version = FileFormatVersion::try_from(version)?;
        let endianness = version.endianness();

        let (input, kdc_offset) = if version == FileFormatVersion::V4 {
            read_header(input, endianness).map_err(format_error)?
        } else {
            (input, None)
        };

        let (mut input, default_principal) =
            read_principal(input, version).map_err(format_error)?;
        let header_len = data.len() - input.len();

        let mut credentials = vec![];
        while !input.is_empty() {
            let (rest, credential) = read_credential(input, version).map_err(format_error)?;
            input = rest;
            if !credential.is_removed() {
                credentials.push(credential);
            }
        }

        Ok(Self {
            version,
            kdc_offset,
            default_principal,
            header_len,
            credentials,
        })
    }
}

fn format_error(_: nom::Err<nom::error::Error<Input<'_>>>) -> anyhow::Error {
    Error::KRB5_CC_FORMAT.into()
}

// The first byte of the file always has the value 5, and the value of the
// second byte contains the version number (1 through 4).
fn read_version(input: Input<'_>) -> IResult<Input<'_>, u8> {
    let (input, _) = tag(&[FILE_FIRST_BYTE][..])(input)?;
    u8(input)
}

// The header appears only in format version 4.
// It begins with a 16-bit integer giving the length of the entire header,
// followed by a sequence of fields.
// Each field consists of a 16-bit tag, a 16-bit length, and a value of the
// given length. Fields with unknown tags are skipped.
//
// The only defined field has tag 1, length 8, and holds two 32-bit integers
// giving the seconds and microseconds of the KDC time offset.
fn read_header(
    input: Input<'_>,
    endianness: Endianness,
) -> IResult<Input<'_>, Option<KdcOffset>> {
    let (input, mut fields) = length_data(u16(endianness))(input)?;
    let mut kdc_offset = None;
    while !fields.is_empty() {
        let (rest, field_tag) = u16(endianness)(fields)?;
        let (rest, value) = length_data(u16(endianness))(rest)?;
        if field_tag == FCC_TAG_DELTATIME {
            if value.len() != 8 {
                return Err(nom::Err::Failure(nom::error::Error::new(
                    value,
                    nom::error::ErrorKind::LengthValue,
                )));
            }
            let (_, (seconds, microseconds)) = tuple((i32(endianness), i32(endianness)))(value)?;
            kdc_offset = Some(KdcOffset {
                seconds,
                microseconds,
            });
        }
        fields = rest;
    }
    Ok((input, kdc_offset))
}

// principal ::=
//     name type (32 bits) [omitted in version 1]
//     count of components (32 bits) [includes realm in version 1]
//     realm (data)
//     component1 (data)
//     component2 (data)
//     ...
// data ::=
//     length (32 bits)
//     value (length bytes)
fn read_principal(input: Input<'_>, version: FileFormatVersion) -> IResult<Input<'_>, Principal> {
    let endianness = version.endianness();

    let (input, name_type) = if version == FileFormatVersion::V1 {
        (input, NameType::UNKNOWN)
    } else {
        let (input, name_type) = i32(endianness)(input)?;
        (input, NameType(name_type))
    };

    let (input, mut component_count) = u32(endianness)(input)?;
    if version == FileFormatVersion::V1 {
        component_count = component_count.saturating_sub(1);
    }

    let (mut input, realm) = read_data(input, endianness)?;

    let mut components = vec![];
    for _ in 0..component_count {
        let (rest, component) = read_data(input, endianness)?;
        components.push(component);
        input = rest;
    }

    let principal = Principal {
        realm,
        components,
        name_type,
    };
    Ok((input, principal))
}

fn read_data(input: Input<'_>, endianness: Endianness) -> IResult<Input<'_>, Vec<u8>> {
    let (input, data) = length_data(u32(endianness))(input)?;
    Ok((input, data.to_vec()))
}

// credential ::=
//     client (principal)
//     server (principal)
//     keyblock (keyblock)
//     authtime (32 bits)
//     starttime (32 bits)
//     endtime (32 bits)
//     renew_till (32 bits)
//     is_skey (1 byte, 0 or 1)
//     ticket_flags (32 bits)
//     addresses (addresses)
//     authdata (authdata)
//     ticket (data)
//     second_ticket (data)
fn read_credential(
    input: Input<'_>,
    version: FileFormatVersion,
) -> IResult<Input<'_>, Credential> {
    let endianness = version.endianness();

    let (input, client) = read_principal(input, version)?;
    let (input, server) = read_principal(input, version)?;
    let (input, keyblock) = read_keyblock(input, version)?;
    let (input, times) = read_ticket_times(input, endianness)?;
    let (input, is_skey) = u8(input)?;
    let (input, ticket_flags) = i32(endianness)(input)?;
    let (input, addresses) = read_tagged_list(input, endianness)?;
    let (input, authdata) = read_tagged_list(input, endianness)?;
    let (input, ticket) = read_data(input, endianness)?;
    let (input, second_ticket) = read_data(input, endianness)?;

    let credential = Credential {
        client,
        server,
        keyblock,
        times,
        is_skey: is_skey > 0,
        ticket_flags,
        addresses,
        authdata,
        ticket,
        second_ticket,
    };
    Ok((input, credential))
}

// keyblock ::=
//     enctype (16 bits) [repeated twice in version 3]
//     data
fn read_keyblock(input: Input<'_>, version: FileFormatVersion) -> IResult<Input<'_>, Keyblock> {
    let endianness = version.endianness();
    let (mut input, enctype) = u16(endianness)(input)?;
    if version == FileFormatVersion::V3 {
        (input, _) = take(2usize)(input)?;
    }
    let (input, contents) = read_data(input, endianness)?;
    let keyblock = Keyblock {
        enctype: Enctype::from(enctype),
        contents,
    };
    Ok((input, keyblock))
}

fn read_ticket_times(input: Input<'_>, endianness: Endianness) -> IResult<Input<'_>, TicketTimes> {
    let (input, authtime) = i32(endianness)(input)?;
    let (input, starttime) = i32(endianness)(input)?;
    let (input, endtime) = u32(endianness)(input)?;
    let (input, renew_till) = u32(endianness)(input)?;
    let ticket_times = TicketTimes {
        authtime,
        starttime,
        endtime,
        renew_till,
    };
    Ok((input, ticket_times))
}

// addresses ::= count (32 bits), then count * (addrtype (16 bits), data)
// authdata  ::= count (32 bits), then count * (ad_type (16 bits), data)
fn read_tagged_list(
    input: Input<'_>,
    endianness: Endianness,
) -> IResult<Input<'_>, Vec<TaggedData>> {
    let entry = map(
        tuple((u16(endianness), |input| read_data(input, endianness))),
        |(kind, contents)| TaggedData { kind, contents },
    );
    length_count(u32(endianness), entry)(input)
}
