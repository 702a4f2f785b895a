//! Unwrapping of MacBinary transport envelopes.
//!
//! A MacBinary file is a 128-byte header followed by the data fork and then
//! the resource fork, each padded out to a multiple of 128 bytes.

use byteorder::{BigEndian, ByteOrder};

use super::ostype::OSType;

/// The length of a MacBinary header, and the alignment of each fork:
const MACBINARY_BLOCK_LENGTH: usize = 128;

/// The longest file name a MacBinary header may declare:
const MAX_NAME_LENGTH: usize = 63;

const NAME_OFFSET: usize = 2;
const FILE_TYPE_OFFSET: usize = 65;
const CREATOR_OFFSET: usize = 69;
const DATA_LENGTH_OFFSET: usize = 83;
const RSRC_LENGTH_OFFSET: usize = 87;

/// The fields of a MacBinary header used to locate the forks.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MacBinaryHeader {
    /// The file name (at most 63 bytes, not NUL-terminated).
    pub name: Vec<u8>,
    /// The Finder file type.
    pub file_type: OSType,
    /// The Finder creator code.
    pub creator: OSType,
    /// Length of the data fork, in bytes, before padding.
    pub data_length: u32,
    /// Length of the resource fork, in bytes, before padding.
    pub rsrc_length: u32,
}

impl MacBinaryHeader {
    /// Parses the header at the start of `data`, or returns `None` if the
    /// buffer does not look like a MacBinary file.
    pub fn parse(data: &[u8]) -> Option<MacBinaryHeader> {
        if data.len() < MACBINARY_BLOCK_LENGTH {
            return None;
        }
        let name_length = data[1] as usize;
        if data[0] != 0 || name_length > MAX_NAME_LENGTH {
            return None;
        }
        Some(MacBinaryHeader {
            name: data[NAME_OFFSET..NAME_OFFSET + name_length].to_vec(),
            file_type: OSType::from_padded(
                &data[FILE_TYPE_OFFSET..FILE_TYPE_OFFSET + 4]),
            creator: OSType::from_padded(
                &data[CREATOR_OFFSET..CREATOR_OFFSET + 4]),
            data_length: BigEndian::read_u32(&data[DATA_LENGTH_OFFSET..]),
            rsrc_length: BigEndian::read_u32(&data[RSRC_LENGTH_OFFSET..]),
        })
    }
}

/// Rounds `length` up to the next multiple of the MacBinary block size.
fn padded(length: u32) -> u64 {
    let block = MACBINARY_BLOCK_LENGTH as u64;
    (u64::from(length) + block - 1) / block * block
}

/// Returns the resource fork stored in a MacBinary file.  If `data` is not
/// a MacBinary file, or its header points past the end of the buffer, the
/// whole buffer is returned unchanged so that the caller can treat it as a
/// raw resource fork.  A MacBinary file with no resource fork yields an
/// empty slice.
pub fn resource_fork(data: &[u8]) -> &[u8] {
    let header = match MacBinaryHeader::parse(data) {
        Some(header) => header,
        None => return data,
    };
    if header.rsrc_length == 0 {
        log::debug!("MacBinary file has an empty resource fork");
        return &[];
    }
    let rsrc_start = MACBINARY_BLOCK_LENGTH as u64 + padded(header.data_length);
    let rsrc_end = rsrc_start + padded(header.rsrc_length);
    if rsrc_end > data.len() as u64 {
        log::debug!("MacBinary header points past end of file; \
                     using raw bytes");
        return data;
    }
    let start = rsrc_start as usize;
    &data[start..start + header.rsrc_length as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(data_fork: &[u8], rsrc_fork: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; 128];
        out[1] = 4;
        out[2..6].copy_from_slice(b"Test");
        out[65..69].copy_from_slice(b"rsrc");
        out[69..73].copy_from_slice(b"RSED");
        BigEndian::write_u32(&mut out[83..87], data_fork.len() as u32);
        BigEndian::write_u32(&mut out[87..91], rsrc_fork.len() as u32);
        for fork in &[data_fork, rsrc_fork] {
            out.extend_from_slice(fork);
            while out.len() % 128 != 0 {
                out.push(0);
            }
        }
        out
    }

    #[test]
    fn parse_header_fields() {
        let file = envelope(b"hello", b"world");
        let header = MacBinaryHeader::parse(&file).expect("not MacBinary");
        assert_eq!(header.name, b"Test".to_vec());
        assert_eq!(header.file_type, OSType(*b"rsrc"));
        assert_eq!(header.creator, OSType(*b"RSED"));
        assert_eq!(header.data_length, 5);
        assert_eq!(header.rsrc_length, 5);
    }

    #[test]
    fn unwrap_resource_fork_after_padded_data_fork() {
        let data_fork = vec![0xAAu8; 130];
        let file = envelope(&data_fork, b"resource bytes");
        assert_eq!(file.len(), 128 + 256 + 128);
        assert_eq!(resource_fork(&file), b"resource bytes");
    }

    #[test]
    fn short_buffer_is_not_macbinary() {
        let data = vec![0u8; 127];
        assert_eq!(resource_fork(&data).len(), 127);
    }

    #[test]
    fn nonzero_first_byte_is_not_macbinary() {
        let mut file = envelope(b"", b"abc");
        file[0] = 1;
        assert_eq!(resource_fork(&file), &file[..]);
    }

    #[test]
    fn long_name_is_not_macbinary() {
        let mut file = envelope(b"", b"abc");
        file[1] = 64;
        assert!(MacBinaryHeader::parse(&file).is_none());
        assert_eq!(resource_fork(&file), &file[..]);
    }

    #[test]
    fn empty_resource_fork() {
        let file = envelope(b"data only", b"");
        assert!(resource_fork(&file).is_empty());
    }

    #[test]
    fn overlong_resource_fork_falls_back_to_whole_buffer() {
        let mut file = envelope(b"", b"abc");
        BigEndian::write_u32(&mut file[87..91], 1000);
        assert_eq!(resource_fork(&file), &file[..]);
    }
}
