use super::ostype::{IconType, OSType};

/// The longest name that can be stored in a resource map, in bytes:
pub const MAX_NAME_LENGTH: usize = 255;

/// The largest data payload whose offset can still be encoded, in bytes:
pub const MAX_DATA_LENGTH: usize = 0xFF_FFFF;

/// One entry in a resource fork: a typed, numbered and optionally named
/// blob of bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resource {
    /// The resource type (e.g. `ICN#` or `clut`).
    pub ostype: OSType,
    /// The resource ID, unique within its type.
    pub id: i16,
    /// The resource name.  `None` is distinct from an empty name.
    pub name: Option<Vec<u8>>,
    /// The attribute byte from the reference list (locked, purgeable,
    /// etc.).  Carried through unchanged.
    pub attributes: u8,
    /// The raw resource data.
    pub data: Vec<u8>,
}

impl Resource {
    /// Creates an unnamed resource with the given type, ID and data payload.
    pub fn new(ostype: OSType, id: i16, data: Vec<u8>) -> Resource {
        Resource {
            ostype,
            id,
            name: None,
            attributes: 0,
            data,
        }
    }

    /// Returns this resource with the given name attached.
    pub fn with_name<N: Into<Vec<u8>>>(mut self, name: N) -> Resource {
        self.name = Some(name.into());
        self
    }

    /// Returns the resource name as text, if it has one.  Bytes outside
    /// ASCII are replaced.
    pub fn name_lossy(&self) -> Option<String> {
        self.name
            .as_ref()
            .map(|name| String::from_utf8_lossy(name).into_owned())
    }

    /// Returns the type of icon stored in this resource, or `None` if this
    /// resource is not an icon type supported by this library.
    pub fn icon_type(&self) -> Option<IconType> {
        IconType::from_ostype(self.ostype)
    }

    /// Returns the name as it will be stored in the name list: at most 255
    /// bytes, longer names being silently truncated.
    pub(crate) fn stored_name(&self) -> Option<&[u8]> {
        self.name
            .as_ref()
            .map(|name| &name[..name.len().min(MAX_NAME_LENGTH)])
    }

    /// Returns the encoded length of the resource within the data area,
    /// including its four-byte length prefix.
    pub fn total_length(&self) -> usize {
        4 + self.data.len()
    }
}
