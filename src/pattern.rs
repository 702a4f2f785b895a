//! Builders for the raw data of pattern resources.

use byteorder::{BigEndian, WriteBytesExt};

use super::error::{Error, Result};
use super::ostype::OSType;
use super::resource::Resource;

/// The side length of a classic pattern, in pixels:
pub const PATTERN_SIZE: usize = 8;

/// The magic bytes at the start of a `ppat8` blob:
const PPAT8_MAGIC_LITERAL: &[u8; 6] = b"PPAT8\0";

/// The OSType of a 1-bit pattern resource.
pub const PATTERN_OSTYPE: OSType = OSType(*b"PAT ");

/// The OSType of a color pattern resource.
pub const COLOR_PATTERN_OSTYPE: OSType = OSType(*b"ppat");

/// Builds the data of a `PAT ` resource from its eight row bytes.
pub fn pattern_from_bytes(rows: &[u8]) -> Result<Vec<u8>> {
    if rows.len() != PATTERN_SIZE {
        return Err(Error::InvalidManifest(format!(
            "a pattern needs exactly 8 bytes (got {})",
            rows.len())));
    }
    Ok(rows.to_vec())
}

/// Builds the data of a `PAT ` resource from eight strings of eight `'0'`
/// or `'1'` characters.  The leftmost character is the most significant
/// bit.
///
/// # Examples
/// ```
/// use rsrcfork::pattern::pattern_from_rows;
/// let rows = ["10101010", "01010101", "10101010", "01010101",
///             "10101010", "01010101", "10101010", "01010101"];
/// assert_eq!(pattern_from_rows(&rows).unwrap(),
///            vec![0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55]);
/// ```
pub fn pattern_from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Vec<u8>> {
    if rows.len() != PATTERN_SIZE {
        return Err(Error::InvalidManifest(format!(
            "a pattern needs exactly 8 rows (got {})",
            rows.len())));
    }
    let mut data = Vec::with_capacity(PATTERN_SIZE);
    for row in rows {
        let row = row.as_ref();
        if row.len() != PATTERN_SIZE {
            return Err(Error::InvalidManifest(format!(
                "pattern row {:?} is not 8 characters long",
                row)));
        }
        let mut byte = 0u8;
        for (x, ch) in row.chars().enumerate() {
            match ch {
                '1' => byte |= 0x80u8 >> x,
                '0' => {}
                _ => {
                    return Err(Error::InvalidManifest(format!(
                        "pattern row {:?} may only contain '0' and '1'",
                        row)));
                }
            }
        }
        data.push(byte);
    }
    Ok(data)
}

/// Builds the data of a simple 8x8 indexed color pattern: the `PPAT8\0`
/// magic, width and height, the palette length, the RGBA palette, and one
/// palette index per pixel.
pub fn ppat8(palette: &[[u8; 4]],
             indices: &[[u8; PATTERN_SIZE]; PATTERN_SIZE])
             -> Result<Vec<u8>> {
    if palette.is_empty() || palette.len() > 256 {
        return Err(Error::InvalidManifest(format!(
            "a ppat8 palette needs 1 to 256 entries (got {})",
            palette.len())));
    }
    let mut data = Vec::with_capacity(PPAT8_MAGIC_LITERAL.len() + 6 +
                                      4 * palette.len() +
                                      PATTERN_SIZE * PATTERN_SIZE);
    data.extend_from_slice(PPAT8_MAGIC_LITERAL);
    data.write_u16::<BigEndian>(PATTERN_SIZE as u16)?;
    data.write_u16::<BigEndian>(PATTERN_SIZE as u16)?;
    data.write_u16::<BigEndian>(palette.len() as u16)?;
    for color in palette {
        data.extend_from_slice(color);
    }
    for row in indices {
        for &index in row {
            if index as usize >= palette.len() {
                return Err(Error::InvalidManifest(format!(
                    "pattern index {} out of palette range",
                    index)));
            }
            data.push(index);
        }
    }
    Ok(data)
}

/// Shorthand for a named `PAT ` resource built from row strings.
pub fn pattern_resource<S: AsRef<str>>(id: i16,
                                       name: &str,
                                       rows: &[S])
                                       -> Result<Resource> {
    let data = pattern_from_rows(rows)?;
    Ok(Resource::new(PATTERN_OSTYPE, id, data).with_name(name))
}

/// Shorthand for a named `ppat` resource holding a `ppat8` blob.
pub fn color_pattern_resource(id: i16,
                              name: &str,
                              palette: &[[u8; 4]],
                              indices: &[[u8; PATTERN_SIZE]; PATTERN_SIZE])
                              -> Result<Resource> {
    let data = ppat8(palette, indices)?;
    Ok(Resource::new(COLOR_PATTERN_OSTYPE, id, data).with_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_bytes_must_be_eight() {
        assert_eq!(pattern_from_bytes(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap(),
                   vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(matches!(pattern_from_bytes(&[0; 7]),
                         Err(Error::InvalidManifest(_))));
    }

    #[test]
    fn pattern_rows_are_validated() {
        let mut rows = vec!["00000000"; 8];
        rows[7] = "10000001";
        assert_eq!(pattern_from_rows(&rows[..]).unwrap()[7], 0x81);
        rows[3] = "1000000";
        assert!(pattern_from_rows(&rows[..]).is_err());
        rows[3] = "1000000x";
        assert!(pattern_from_rows(&rows[..]).is_err());
        assert!(pattern_from_rows(&rows[..7]).is_err());
    }

    #[test]
    fn ppat8_layout() {
        let palette = [[0, 0, 0, 255], [255, 255, 255, 255]];
        let mut indices = [[0u8; 8]; 8];
        indices[0][1] = 1;
        let data = ppat8(&palette, &indices).unwrap();
        assert_eq!(&data[0..12], b"PPAT8\0\0\x08\0\x08\0\x02");
        assert_eq!(&data[12..20], &[0, 0, 0, 255, 255, 255, 255, 255]);
        assert_eq!(data.len(), 20 + 64);
        assert_eq!(data[21], 1);
    }

    #[test]
    fn ppat8_rejects_out_of_range_index() {
        let mut indices = [[0u8; 8]; 8];
        indices[4][4] = 2;
        assert!(ppat8(&[[0; 4], [1; 4]], &indices).is_err());
        assert!(ppat8(&[], &[[0u8; 8]; 8]).is_err());
    }

    #[test]
    fn named_color_pattern_resource() {
        let resource = color_pattern_resource(129, "Dots", &[[9; 4]], &[[0; 8]; 8])
            .unwrap();
        assert_eq!(resource.ostype, COLOR_PATTERN_OSTYPE);
        assert_eq!(resource.data.len(), 12 + 4 + 64);
    }

    #[test]
    fn named_pattern_resource() {
        let resource = pattern_resource(128, "Gray", &["10101010"; 8]).unwrap();
        assert_eq!(resource.ostype, PATTERN_OSTYPE);
        assert_eq!(resource.name, Some(b"Gray".to_vec()));
        assert_eq!(resource.data, vec![0xAA; 8]);
    }
}
