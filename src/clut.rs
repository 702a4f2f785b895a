//! Color tables (`clut` resources and the tables embedded in color icons).

use byteorder::{BigEndian, ByteOrder};
use std::collections::HashMap;

use super::error::{slice_at, DecodeWarning, Result};
use super::fork::ResourceFork;
use super::ostype::OSType;

/// The length of a color table header (seed, flags, size), in bytes:
pub const COLOR_TABLE_HEADER_LENGTH: usize = 8;

/// The length of one color table entry (value, red, green, blue), in bytes:
const COLOR_ENTRY_LENGTH: usize = 8;

/// An 8-bit-per-channel RGB color.
pub type Rgb = [u8; 3];

/// One entry of a color table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ColorEntry {
    /// The pixel value this entry describes.
    pub value: u16,
    /// The color, at 8-bit precision (the high byte of each 16-bit channel).
    pub rgb: Rgb,
}

/// An indexed palette.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColorTable {
    /// Identifies the table's contents.
    pub seed: u32,
    /// Table flags.  Bit 15 set means the table is indexed by position
    /// rather than by the stored values.
    pub flags: u16,
    /// The entries, in stored order.
    pub entries: Vec<ColorEntry>,
}

impl ColorTable {
    /// Parses the color table starting at `offset` in `data`.  The stored
    /// entry count is "count minus one", so a table with a count field of
    /// -1 is empty.
    pub fn parse(data: &[u8], offset: usize) -> Result<ColorTable> {
        let header = slice_at(data, offset, COLOR_TABLE_HEADER_LENGTH)?;
        let seed = BigEndian::read_u32(&header[0..]);
        let flags = BigEndian::read_u16(&header[4..]);
        let size = BigEndian::read_i16(&header[6..]);
        let count = (i32::from(size) + 1).max(0) as usize;
        let raw = slice_at(data,
                           offset + COLOR_TABLE_HEADER_LENGTH,
                           count * COLOR_ENTRY_LENGTH)?;
        let entries = raw
            .chunks_exact(COLOR_ENTRY_LENGTH)
            .map(|entry| ColorEntry {
                value: BigEndian::read_u16(&entry[0..]),
                rgb: [entry[2], entry[4], entry[6]],
            })
            .collect();
        Ok(ColorTable {
            seed,
            flags,
            entries,
        })
    }

    /// Returns the encoded length of the table, in bytes.
    pub fn total_length(&self) -> usize {
        COLOR_TABLE_HEADER_LENGTH + COLOR_ENTRY_LENGTH * self.entries.len()
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a lookup from stored value to color.  Values need not be
    /// sequential; when a value repeats, the last entry wins.
    pub fn to_lookup(&self) -> HashMap<u16, Rgb> {
        self.entries.iter().map(|entry| (entry.value, entry.rgb)).collect()
    }

    /// Returns the colors in stored order, ignoring their values.
    pub fn colors(&self) -> Vec<Rgb> {
        self.entries.iter().map(|entry| entry.rgb).collect()
    }
}

/// Palettes used for color icons whose embedded table lacks an entry,
/// keyed by pixel depth.
///
/// Built once per fork from its standalone `clut` resources, then passed
/// by reference into the rasterizer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FallbackPalettes {
    palettes: HashMap<u16, Vec<Rgb>>,
}

impl FallbackPalettes {
    /// Creates an empty set of fallback palettes.
    pub fn new() -> FallbackPalettes {
        FallbackPalettes { palettes: HashMap::new() }
    }

    /// Collects fallback palettes from the `clut` resources in a fork.  For
    /// each depth, the first table (in fork order) with exactly 2, 4, 16 or
    /// 256 entries is used for depth 1, 2, 4 or 8 respectively.  Depth 1
    /// defaults to black and white when no two-entry table exists.
    ///
    /// Tables that fail to parse are reported in `warnings`.
    pub fn from_fork(fork: &ResourceFork,
                     warnings: &mut Vec<DecodeWarning>)
                     -> FallbackPalettes {
        let mut fallback = FallbackPalettes::new();
        for resource in fork.resources_of_type(OSType(*b"clut")) {
            match ColorTable::parse(&resource.data, 0) {
                Ok(table) => {
                    if let Some(depth) = depth_for_count(table.len()) {
                        if !fallback.palettes.contains_key(&depth) {
                            log::debug!("using 'clut' {} as {}-bit fallback \
                                         palette",
                                        resource.id,
                                        depth);
                            fallback.insert(depth, table.colors());
                        }
                    }
                }
                Err(error) => {
                    warnings.push(DecodeWarning::new(resource.ostype,
                                                     resource.id,
                                                     error));
                }
            }
        }
        if !fallback.palettes.contains_key(&1) {
            fallback.insert(1, vec![[0, 0, 0], [255, 255, 255]]);
        }
        fallback
    }

    /// Sets the fallback palette for the given pixel depth.
    pub fn insert(&mut self, depth: u16, palette: Vec<Rgb>) {
        self.palettes.insert(depth, palette);
    }

    /// Returns the fallback palette for the given pixel depth, if any.
    pub fn get(&self, depth: u16) -> Option<&[Rgb]> {
        self.palettes.get(&depth).map(|palette| palette.as_slice())
    }
}

fn depth_for_count(count: usize) -> Option<u16> {
    match count {
        2 => Some(1),
        4 => Some(2),
        16 => Some(4),
        256 => Some(8),
        _ => None,
    }
}

/// Builds the raw bytes of a color table, e.g. for a `clut` resource.
pub fn encode_color_table(seed: u32, flags: u16, entries: &[ColorEntry]) -> Vec<u8> {
    let mut data = vec![0u8; COLOR_TABLE_HEADER_LENGTH +
                             COLOR_ENTRY_LENGTH * entries.len()];
    BigEndian::write_u32(&mut data[0..], seed);
    BigEndian::write_u16(&mut data[4..], flags);
    BigEndian::write_i16(&mut data[6..], (entries.len() as i32 - 1) as i16);
    for (index, entry) in entries.iter().enumerate() {
        let start = COLOR_TABLE_HEADER_LENGTH + index * COLOR_ENTRY_LENGTH;
        let raw = &mut data[start..start + COLOR_ENTRY_LENGTH];
        BigEndian::write_u16(&mut raw[0..], entry.value);
        for (channel, &level) in entry.rgb.iter().enumerate() {
            // Replicate the byte so 0xFF becomes 0xFFFF.
            raw[2 + 2 * channel] = level;
            raw[3 + 2 * channel] = level;
        }
    }
    data
}
