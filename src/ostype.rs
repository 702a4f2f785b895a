use std::fmt;

/// A Macintosh OSType (also known as a ResType), used in resource forks to
/// identify the type of each resource.  Any four byte values are allowed,
/// including embedded zeros.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OSType(pub [u8; 4]);

impl OSType {
    /// Builds an OSType from an arbitrary byte string, padding with zero
    /// bytes or truncating so that exactly four bytes remain.
    ///
    /// # Examples
    /// ```
    /// use rsrcfork::OSType;
    /// assert_eq!(OSType::from_padded(b"PAT"), OSType(*b"PAT\0"));
    /// assert_eq!(OSType::from_padded(b"cicnX"), OSType(*b"cicn"));
    /// ```
    pub fn from_padded(bytes: &[u8]) -> OSType {
        let mut raw = [0u8; 4];
        let len = bytes.len().min(4);
        raw[..len].copy_from_slice(&bytes[..len]);
        OSType(raw)
    }

    /// Returns the raw four bytes of this OSType.
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for OSType {
    fn fmt(&self, out: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        let &OSType(raw) = self;
        for &byte in &raw {
            // Latin-1 maps every byte to a char, so this never fails.
            let character = char::from(byte);
            write!(out, "{}", character)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for OSType {
    type Err = String;

    fn from_str(input: &str) -> Result<OSType, String> {
        // Inverse of Display: each char must be a single Latin-1 byte.
        let mut raw = [0u8; 4];
        let mut len = 0;
        for ch in input.chars() {
            let byte = u8::try_from(u32::from(ch)).map_err(|_| {
                format!("OSType character {:?} is not Latin-1", ch)
            })?;
            if len < raw.len() {
                raw[len] = byte;
            }
            len += 1;
        }
        if len != 4 {
            Err(format!("OSType string must be 4 characters (was {})", len))
        } else {
            Ok(OSType(raw))
        }
    }
}

/// Types of icon resources that can be decoded as images.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IconType {
    /// `ICN#`: 32x32 1-bit icon, followed by a 1-bit mask.
    Mono_32x32,
    /// `ICON`: 32x32 1-bit icon with no mask.
    Plain_32x32,
    /// `ics#`: 16x16 1-bit icon, followed by a 1-bit mask.
    Mono_16x16,
    /// `SICN`: 16x16 1-bit small icon, optionally followed by a mask.
    Small_16x16,
    /// `cicn`: color icon of arbitrary size, with an embedded pixel map and
    /// color table.
    Color,
}

impl IconType {
    /// Get the icon type associated with the given OSType, if any.
    pub fn from_ostype(ostype: OSType) -> Option<IconType> {
        let OSType(raw_ostype) = ostype;
        match &raw_ostype {
            b"ICN#" => Some(IconType::Mono_32x32),
            b"ICON" => Some(IconType::Plain_32x32),
            b"ics#" => Some(IconType::Mono_16x16),
            b"SICN" => Some(IconType::Small_16x16),
            b"cicn" => Some(IconType::Color),
            _ => None,
        }
    }

    /// Get the OSType that represents this icon type.
    pub fn ostype(self) -> OSType {
        match self {
            IconType::Mono_32x32 => OSType(*b"ICN#"),
            IconType::Plain_32x32 => OSType(*b"ICON"),
            IconType::Mono_16x16 => OSType(*b"ics#"),
            IconType::Small_16x16 => OSType(*b"SICN"),
            IconType::Color => OSType(*b"cicn"),
        }
    }

    /// Returns the side length of this icon type, in pixels, or `None` for
    /// color icons, whose dimensions are stored in the resource itself.
    ///
    /// # Examples
    /// ```
    /// use rsrcfork::IconType;
    /// assert_eq!(IconType::Mono_32x32.size(), Some(32));
    /// assert_eq!(IconType::Small_16x16.size(), Some(16));
    /// assert_eq!(IconType::Color.size(), None);
    /// ```
    pub fn size(self) -> Option<u32> {
        match self {
            IconType::Mono_32x32 | IconType::Plain_32x32 => Some(32),
            IconType::Mono_16x16 | IconType::Small_16x16 => Some(16),
            IconType::Color => None,
        }
    }

    /// Returns the encoding used within the resource data for this icon
    /// type.
    pub fn encoding(self) -> Encoding {
        match self {
            IconType::Mono_32x32 |
            IconType::Plain_32x32 |
            IconType::Mono_16x16 |
            IconType::Small_16x16 => Encoding::Mono,
            IconType::Color => Encoding::Indexed,
        }
    }
}

/// Method of encoding an image within an icon resource.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Encoding {
    /// Resource data is a 1-bit image plane, optionally followed by a 1-bit
    /// mask plane of the same size.
    Mono,
    /// Resource data is a pixel map header, color table, palette-indexed
    /// pixel data and an optional 1-bit mask.
    Indexed,
}
