use std::io;
use thiserror::Error;

use super::ostype::OSType;

/// Errors produced while decoding or encoding resource forks and icons.
#[derive(Debug, Error)]
pub enum Error {
    /// The fork header or map is inconsistent with the buffer.  Nothing in
    /// the fork can be trusted.
    #[error("malformed resource fork: {0}")]
    MalformedContainer(String),

    /// The resource uses a pixel depth, component layout or packing scheme
    /// that is not implemented.
    #[error("unsupported encoding: {0}")]
    UnsupportedEncoding(String),

    /// A declared length runs past the end of the available bytes.
    #[error("truncated resource at offset {offset:#x} (need {need} bytes, have {have})")]
    TruncatedResource {
        /// Offset at which the read started.
        offset: usize,
        /// Number of bytes the read needed.
        need: usize,
        /// Number of bytes actually left at that offset.
        have: usize,
    },

    /// The resources handed to the encoder cannot be stored in a fork.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// Reading or writing the underlying stream failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Shorthand for results carrying this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A per-resource failure that was skipped over while the rest of the fork
/// was processed.
#[derive(Debug)]
pub struct DecodeWarning {
    /// Type of the resource that was skipped.
    pub ostype: OSType,
    /// ID of the resource that was skipped.
    pub id: i16,
    /// Why the resource was skipped.
    pub error: Error,
}

impl DecodeWarning {
    pub(crate) fn new(ostype: OSType, id: i16, error: Error) -> DecodeWarning {
        log::warn!("skipping '{}' {}: {}", ostype, id, error);
        DecodeWarning { ostype, id, error }
    }
}

/// Slices `len` bytes at `offset`, or reports how far short the buffer is.
pub(crate) fn slice_at(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| data.get(offset..end))
        .ok_or(Error::TruncatedResource {
            offset,
            need: len,
            have: data.len().saturating_sub(offset),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_within_bounds() {
        let data = [1u8, 2, 3, 4];
        assert_eq!(slice_at(&data, 1, 2).unwrap(), &[2, 3]);
        assert_eq!(slice_at(&data, 4, 0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn slice_out_of_bounds() {
        let data = [1u8, 2, 3, 4];
        match slice_at(&data, 3, 2) {
            Err(Error::TruncatedResource { offset, need, have }) => {
                assert_eq!((offset, need, have), (3, 2, 1));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(slice_at(&data, usize::MAX, 2).is_err());
    }
}
