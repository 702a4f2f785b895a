//! Pulling every icon out of a (possibly MacBinary-wrapped) resource fork.

use super::clut::FallbackPalettes;
use super::error::{DecodeWarning, Result};
use super::fork::ResourceFork;
use super::icon::{decode_icon, IconPixels};
use super::macbinary::{self, MacBinaryHeader};
use super::ostype::OSType;

/// An icon decoded from a resource fork.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedIcon {
    /// Type of the resource the icon came from.
    pub ostype: OSType,
    /// ID of the resource the icon came from.
    pub id: i16,
    /// Name of the resource the icon came from, if any.
    pub name: Option<Vec<u8>>,
    /// The decoded pixels.
    pub pixels: IconPixels,
}

impl DecodedIcon {
    /// Returns a file name for this icon: `<type>_<id>_<width>.png`, with
    /// characters that are awkward in file names replaced by `_`.
    ///
    /// # Examples
    /// ```
    /// use rsrcfork::{DecodedIcon, OSType};
    /// use rsrcfork::icon::decode_mono;
    /// let icon = DecodedIcon {
    ///     ostype: OSType(*b"ICN#"),
    ///     id: 128,
    ///     name: None,
    ///     pixels: rsrcfork::IconPixels::Mono(decode_mono(&[0; 256], 32).unwrap()),
    /// };
    /// assert_eq!(icon.file_name(), "ICN#_128_32.png");
    /// ```
    pub fn file_name(&self) -> String {
        let ostype: String = self
            .ostype
            .to_string()
            .chars()
            .map(|ch| match ch {
                '/' | '\\' | ':' | '\0' => '_',
                ch if ch.is_control() => '_',
                ch => ch,
            })
            .collect();
        format!("{}_{}_{}.png", ostype, self.id, self.pixels.width())
    }
}

/// Everything recovered from one input file.
#[derive(Debug)]
pub struct Extraction {
    /// All resources in the fork.
    pub fork: ResourceFork,
    /// Every icon that decoded successfully, in fork order.
    pub icons: Vec<DecodedIcon>,
    /// Resources that were skipped, and why.
    pub warnings: Vec<DecodeWarning>,
}

/// Decodes every icon in a file.  The file may be a raw resource fork or a
/// MacBinary file.  A MacBinary file with an empty resource fork, or an
/// empty buffer, yields an empty extraction.
///
/// Fails only if the resource fork itself is malformed; a bad individual
/// resource is recorded in `warnings` and the rest are still decoded.
pub fn extract(data: &[u8]) -> Result<Extraction> {
    let (fork, mut warnings) = match MacBinaryHeader::parse(data) {
        // A raw fork whose data area starts below 64 KiB begins 00 00, which
        // reads as a MacBinary header with an empty name and no resource
        // fork.  MacBinary names are never empty.
        Some(ref header)
            if header.rsrc_length == 0 && header.name.is_empty() =>
        {
            log::debug!("treating nameless MacBinary header as a raw fork");
            ResourceFork::parse(data)?
        }
        _ => {
            let rsrc = macbinary::resource_fork(data);
            if rsrc.is_empty() {
                log::debug!("no resource fork");
                (ResourceFork::new(), Vec::new())
            } else {
                ResourceFork::parse(rsrc)?
            }
        }
    };
    let fallback = FallbackPalettes::from_fork(&fork, &mut warnings);
    let icons = extract_icons(&fork, &fallback, &mut warnings);
    log::debug!("extracted {} icon(s) with {} warning(s)",
                icons.len(),
                warnings.len());
    Ok(Extraction {
        fork,
        icons,
        warnings,
    })
}

/// Decodes every icon resource in `fork` using the given fallback
/// palettes.  Resources that fail to decode are recorded in `warnings`.
pub fn extract_icons(fork: &ResourceFork,
                     fallback: &FallbackPalettes,
                     warnings: &mut Vec<DecodeWarning>)
                     -> Vec<DecodedIcon> {
    let mut icons = Vec::new();
    for resource in &fork.resources {
        if resource.icon_type().is_none() {
            continue;
        }
        match decode_icon(resource, fallback) {
            Ok(pixels) => icons.push(DecodedIcon {
                ostype: resource.ostype,
                id: resource.id,
                name: resource.name.clone(),
                pixels,
            }),
            Err(error) => {
                warnings.push(DecodeWarning::new(resource.ostype,
                                                 resource.id,
                                                 error));
            }
        }
    }
    icons
}
