use byteorder::{BigEndian, ByteOrder};

use super::error::{slice_at, Error, Result};

/// The length of a PixMap record, in bytes:
pub const PIXMAP_HEADER_LENGTH: usize = 50;

/// Describes the pixel buffer of a color icon.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PixMapHeader {
    /// Bytes per scan line (flag bits already masked off).
    pub row_bytes: u16,
    /// Bounding rectangle: top, left, bottom, right.
    pub bounds: [i16; 4],
    /// Packing scheme; only 0 (unpacked) is supported.
    pub pack_type: u16,
    /// Pixel type; 0 means indexed.
    pub pixel_type: u16,
    /// Bits per pixel.
    pub pixel_size: u16,
    /// Components per pixel.
    pub cmp_count: u16,
    /// Bits per component.
    pub cmp_size: u16,
    /// Offset of the color table within the resource, when it is one.
    pub table_offset: u32,
}

impl PixMapHeader {
    /// Reads the PixMap record at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<PixMapHeader> {
        let raw = slice_at(data, 0, PIXMAP_HEADER_LENGTH)?;
        Ok(PixMapHeader {
            row_bytes: BigEndian::read_u16(&raw[4..]) & 0x3FFF,
            bounds: [BigEndian::read_i16(&raw[6..]),
                     BigEndian::read_i16(&raw[8..]),
                     BigEndian::read_i16(&raw[10..]),
                     BigEndian::read_i16(&raw[12..])],
            pack_type: BigEndian::read_u16(&raw[16..]),
            pixel_type: BigEndian::read_u16(&raw[30..]),
            pixel_size: BigEndian::read_u16(&raw[32..]),
            cmp_count: BigEndian::read_u16(&raw[34..]),
            cmp_size: BigEndian::read_u16(&raw[36..]),
            table_offset: BigEndian::read_u32(&raw[42..]),
        })
    }

    /// Returns the width of the pixel map, in pixels (may be non-positive
    /// for a malformed header).
    pub fn width(&self) -> i32 {
        i32::from(self.bounds[3]) - i32::from(self.bounds[1])
    }

    /// Returns the height of the pixel map, in pixels (may be non-positive
    /// for a malformed header).
    pub fn height(&self) -> i32 {
        i32::from(self.bounds[2]) - i32::from(self.bounds[0])
    }

    /// Returns the effective bits per pixel; a zero depth is read as 1.
    pub fn depth(&self) -> u16 {
        if self.pixel_size == 0 {
            1
        } else {
            self.pixel_size
        }
    }

    /// Checks that this header describes an unpacked, single-component
    /// indexed pixel map of positive size, returning its width and height.
    pub fn validate(&self) -> Result<(u32, u32)> {
        let (width, height) = (self.width(), self.height());
        if width <= 0 || height <= 0 {
            return Err(Error::UnsupportedEncoding(format!(
                "pixel map has empty bounds ({}x{})",
                width, height)));
        }
        if self.cmp_count != 1 {
            return Err(Error::UnsupportedEncoding(format!(
                "{} color components per pixel",
                self.cmp_count)));
        }
        if self.pack_type != 0 {
            return Err(Error::UnsupportedEncoding(format!(
                "pack type {}",
                self.pack_type)));
        }
        let depth = self.depth();
        if !matches!(depth, 1 | 2 | 4 | 8) {
            return Err(Error::UnsupportedEncoding(format!(
                "{}-bit pixels",
                depth)));
        }
        let (width, height) = (width as u32, height as u32);
        if u32::from(self.row_bytes) * 8 < width * u32::from(depth) {
            return Err(Error::UnsupportedEncoding(format!(
                "row of {} bytes cannot hold {} {}-bit pixels",
                self.row_bytes, width, depth)));
        }
        Ok((width, height))
    }

    /// Writes this header as a PixMap record.
    pub fn encode(&self) -> [u8; PIXMAP_HEADER_LENGTH] {
        let mut raw = [0u8; PIXMAP_HEADER_LENGTH];
        BigEndian::write_u16(&mut raw[4..], self.row_bytes | 0x8000);
        for (index, &edge) in self.bounds.iter().enumerate() {
            BigEndian::write_i16(&mut raw[6 + 2 * index..], edge);
        }
        BigEndian::write_u16(&mut raw[16..], self.pack_type);
        // 72 dpi, as 16.16 fixed point.
        BigEndian::write_u32(&mut raw[22..], 0x0048_0000);
        BigEndian::write_u32(&mut raw[26..], 0x0048_0000);
        BigEndian::write_u16(&mut raw[30..], self.pixel_type);
        BigEndian::write_u16(&mut raw[32..], self.pixel_size);
        BigEndian::write_u16(&mut raw[34..], self.cmp_count);
        BigEndian::write_u16(&mut raw[36..], self.cmp_size);
        BigEndian::write_u32(&mut raw[42..], self.table_offset);
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(width: i16, height: i16, depth: u16, row_bytes: u16) -> PixMapHeader {
        PixMapHeader {
            row_bytes,
            bounds: [0, 0, height, width],
            pack_type: 0,
            pixel_type: 0,
            pixel_size: depth,
            cmp_count: 1,
            cmp_size: depth,
            table_offset: 0,
        }
    }

    #[test]
    fn parse_encoded_header() {
        let original = header(16, 12, 4, 8);
        let raw = original.encode();
        assert_eq!(&raw[4..6], b"\x80\x08");
        let parsed = PixMapHeader::parse(&raw).expect("parse failed");
        assert_eq!(parsed, original);
        assert_eq!(parsed.width(), 16);
        assert_eq!(parsed.height(), 12);
        assert_eq!(parsed.validate().unwrap(), (16, 12));
    }

    #[test]
    fn short_header_is_truncated() {
        assert!(matches!(PixMapHeader::parse(&[0u8; 49]),
                         Err(Error::TruncatedResource { .. })));
    }

    #[test]
    fn zero_depth_reads_as_one_bit() {
        let pixmap = header(8, 8, 0, 1);
        assert_eq!(pixmap.depth(), 1);
        assert!(pixmap.validate().is_ok());
    }

    #[test]
    fn rejects_unsupported_layouts() {
        let mut pixmap = header(8, 8, 4, 4);
        pixmap.cmp_count = 3;
        assert!(matches!(pixmap.validate(),
                         Err(Error::UnsupportedEncoding(_))));
        assert!(header(8, 8, 16, 16).validate().is_err());
        assert!(header(8, 8, 3, 4).validate().is_err());
        assert!(header(0, 8, 1, 2).validate().is_err());
        assert!(header(8, -1, 1, 2).validate().is_err());
        // Four bytes cannot hold sixteen 4-bit pixels.
        assert!(header(16, 8, 4, 4).validate().is_err());
        let mut packed = header(8, 8, 8, 8);
        packed.pack_type = 1;
        assert!(packed.validate().is_err());
    }
}
