//! Rasterizing icon resources into pixel buffers, and building them back
//! from pixels.

use std::collections::HashMap;

use super::clut::{encode_color_table, ColorEntry, ColorTable, FallbackPalettes,
                  Rgb, COLOR_TABLE_HEADER_LENGTH};
use super::error::{slice_at, Error, Result};
use super::image::{Image, PixelFormat};
use super::ostype::Encoding;
use super::pixmap::{PixMapHeader, PIXMAP_HEADER_LENGTH};
use super::resource::Resource;

/// A plane of 1-bit pixels.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BitPlane {
    width: u32,
    height: u32,
    bits: Box<[bool]>,
}

impl BitPlane {
    /// Creates a plane with every bit clear.
    pub fn new(width: u32, height: u32) -> BitPlane {
        BitPlane {
            width,
            height,
            bits: vec![false; (width * height) as usize].into_boxed_slice(),
        }
    }

    /// Unpacks a row-major, most-significant-bit-first plane.  `packed`
    /// must hold at least `row_bytes * height` bytes.
    fn unpack(packed: &[u8], width: u32, height: u32, row_bytes: usize) -> BitPlane {
        let mut plane = BitPlane::new(width, height);
        for y in 0..height {
            let row = &packed[y as usize * row_bytes..][..row_bytes];
            for x in 0..width {
                let byte = row[x as usize / 8];
                plane.set(x, y, (byte >> (7 - x % 8)) & 1 != 0);
            }
        }
        plane
    }

    /// Packs the plane most-significant-bit-first, padding each row to
    /// `row_bytes`.
    fn pack(&self, row_bytes: usize) -> Vec<u8> {
        let mut packed = vec![0u8; row_bytes * self.height as usize];
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    packed[y as usize * row_bytes + x as usize / 8] |=
                        0x80u8 >> (x % 8);
                }
            }
        }
        packed
    }

    /// Returns the width of the plane, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the plane, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the bit at the given coordinates.
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.bits[(y * self.width + x) as usize]
    }

    /// Sets the bit at the given coordinates.
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        self.bits[(y * self.width + x) as usize] = value;
    }
}

/// A decoded monochrome icon: a foreground plane (1 = black) and an
/// optional mask plane (1 = opaque).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonoIcon {
    /// The foreground bits.
    pub image: BitPlane,
    /// The mask bits, if the resource carried a mask.
    pub mask: Option<BitPlane>,
}

impl MonoIcon {
    /// Returns whether the pixel at the given coordinates is opaque.  With
    /// no mask, exactly the black pixels are opaque.
    pub fn is_opaque(&self, x: u32, y: u32) -> bool {
        match self.mask {
            Some(ref mask) => mask.get(x, y),
            None => self.image.get(x, y),
        }
    }

    /// Renders the icon as a grayscale-with-alpha image: black foreground,
    /// white background, transparency from the mask.
    pub fn to_image(&self) -> Image {
        let (width, height) = (self.image.width(), self.image.height());
        let mut image = Image::new(PixelFormat::GrayAlpha, width, height);
        for y in 0..height {
            for x in 0..width {
                let gray = if self.image.get(x, y) { 0 } else { 255 };
                let alpha = if self.is_opaque(x, y) { 255 } else { 0 };
                image.pixel_mut(x, y).copy_from_slice(&[gray, alpha]);
            }
        }
        image
    }
}

/// The pixels of a decoded icon resource.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum IconPixels {
    /// A 1-bit icon with optional mask.
    Mono(MonoIcon),
    /// A color icon, in RGBA format.
    Color(Image),
}

impl IconPixels {
    /// Returns the width of the icon, in pixels.
    pub fn width(&self) -> u32 {
        match *self {
            IconPixels::Mono(ref icon) => icon.image.width(),
            IconPixels::Color(ref image) => image.width(),
        }
    }

    /// Returns the height of the icon, in pixels.
    pub fn height(&self) -> u32 {
        match *self {
            IconPixels::Mono(ref icon) => icon.image.height(),
            IconPixels::Color(ref image) => image.height(),
        }
    }

    /// Renders the icon as an RGBA image.
    pub fn to_rgba(&self) -> Image {
        match *self {
            IconPixels::Mono(ref icon) => icon.to_image().to_rgba(),
            IconPixels::Color(ref image) => image.to_rgba(),
        }
    }
}

/// Decodes an icon resource.  Returns an error if the resource is not an
/// icon type supported by this library, or if its data is malformed.
pub fn decode_icon(resource: &Resource,
                   fallback: &FallbackPalettes)
                   -> Result<IconPixels> {
    let icon_type = resource.icon_type().ok_or_else(|| {
        Error::UnsupportedEncoding(format!("'{}' is not an icon type",
                                           resource.ostype))
    })?;
    match icon_type.encoding() {
        Encoding::Mono => {
            let size = icon_type.size().ok_or_else(|| {
                Error::UnsupportedEncoding(format!("'{}' has no fixed size",
                                                   resource.ostype))
            })?;
            decode_mono(&resource.data, size).map(IconPixels::Mono)
        }
        Encoding::Indexed => {
            decode_cicn(&resource.data, fallback).map(IconPixels::Color)
        }
    }
}

/// Decodes a square 1-bit icon of the given size.  The first plane is the
/// image; if a second full plane follows, it is the mask.
pub fn decode_mono(data: &[u8], size: u32) -> Result<MonoIcon> {
    let row_bytes = (size as usize + 7) / 8;
    let plane_length = row_bytes * size as usize;
    let image = slice_at(data, 0, plane_length)?;
    let mask = data.get(plane_length..2 * plane_length);
    Ok(MonoIcon {
        image: BitPlane::unpack(image, size, size, row_bytes),
        mask: mask.map(|mask| BitPlane::unpack(mask, size, size, row_bytes)),
    })
}

/// Encodes a 1-bit icon as resource data: the image plane, followed by the
/// mask plane if there is one.
pub fn encode_mono(icon: &MonoIcon) -> Vec<u8> {
    let row_bytes = (icon.image.width() as usize + 7) / 8;
    let mut data = icon.image.pack(row_bytes);
    if let Some(ref mask) = icon.mask {
        data.extend_from_slice(&mask.pack(row_bytes));
    }
    data
}

/// Returns the number of bytes in one row of a color icon's mask.
fn mask_row_bytes(width: u32) -> usize {
    (width as usize + 15) / 16 * 2
}

/// Extracts the `index`-th `depth`-bit sample from a row, most significant
/// bits first.
fn sample(row: &[u8], index: u32, depth: u16) -> u16 {
    let bit = index as usize * depth as usize;
    let shift = 8 - depth as usize - bit % 8;
    let mask = (1u16 << depth) - 1;
    (u16::from(row[bit / 8]) >> shift) & mask
}

/// Picks the color for a pixel value: the embedded table first, then the
/// fallback palette for this depth, then a gray ramp.
fn color_for(value: u16,
             depth: u16,
             table: &HashMap<u16, Rgb>,
             palette: Option<&[Rgb]>)
             -> Rgb {
    if let Some(&rgb) = table.get(&value) {
        return rgb;
    }
    if let Some(&rgb) = palette.and_then(|palette| palette.get(value as usize)) {
        return rgb;
    }
    let span = f64::from((1u32 << depth) - 1);
    let gray = (f64::from(value) / span * 255.0).round() as u8;
    [gray, gray, gray]
}

/// Decodes a `cicn` color icon into an RGBA image.
///
/// The resource holds a PixMap record, then a color table (at the offset
/// named in the PixMap if that lies within the resource, otherwise right
/// after the PixMap), then `rowBytes * height` bytes of pixel data, then an
/// optional 1-bit mask.  Without a mask every pixel is opaque.
pub fn decode_cicn(data: &[u8], fallback: &FallbackPalettes) -> Result<Image> {
    let header = PixMapHeader::parse(data)?;
    let (width, height) = header.validate()?;
    let depth = header.depth();

    let table_offset = header.table_offset as usize;
    let table_limit = data.len().saturating_sub(COLOR_TABLE_HEADER_LENGTH);
    let table_offset = if table_offset > 0 && table_offset < table_limit {
        table_offset
    } else {
        PIXMAP_HEADER_LENGTH
    };
    let table = ColorTable::parse(data, table_offset)?;
    let lookup = table.to_lookup();

    let row_bytes = header.row_bytes as usize;
    let pixel_offset = table_offset + table.total_length();
    let pixels = slice_at(data, pixel_offset, row_bytes * height as usize)?;
    let mask_row_bytes = mask_row_bytes(width);
    let mask = data
        .get(pixel_offset + pixels.len()..)
        .and_then(|rest| rest.get(..mask_row_bytes * height as usize))
        .map(|mask| BitPlane::unpack(mask, width, height, mask_row_bytes));
    log::trace!("cicn {}x{} at {} bits, {} table entries, mask: {}",
                width,
                height,
                depth,
                table.len(),
                mask.is_some());

    let palette = fallback.get(depth);
    let mut image = Image::new(PixelFormat::RGBA, width, height);
    for y in 0..height {
        let row = &pixels[y as usize * row_bytes..][..row_bytes];
        for x in 0..width {
            let [red, green, blue] =
                color_for(sample(row, x, depth), depth, &lookup, palette);
            let alpha = match mask {
                Some(ref mask) if !mask.get(x, y) => 0,
                _ => 255,
            };
            image.pixel_mut(x, y).copy_from_slice(&[red, green, blue, alpha]);
        }
    }
    Ok(image)
}

/// Encodes a `cicn` color icon in the layout read by
/// [`decode_cicn`](fn.decode_cicn.html).  `indices` holds one pixel value
/// per pixel, row by row.
pub fn encode_cicn(width: u16,
                   height: u16,
                   depth: u16,
                   table: &[ColorEntry],
                   indices: &[u8],
                   mask: Option<&BitPlane>)
                   -> Result<Vec<u8>> {
    if !matches!(depth, 1 | 2 | 4 | 8) {
        return Err(Error::InvalidManifest(format!("{}-bit pixels", depth)));
    }
    if width == 0 || height == 0 || width > 0x7FFF || height > 0x7FFF {
        return Err(Error::InvalidManifest(format!(
            "cannot encode a {}x{} color icon",
            width, height)));
    }
    let (w, h) = (u32::from(width), u32::from(height));
    if indices.len() != (w * h) as usize {
        return Err(Error::InvalidManifest(format!(
            "{} pixel values for a {}x{} icon",
            indices.len(), width, height)));
    }
    if let Some(&index) = indices.iter().find(|&&i| u32::from(i) >> depth != 0) {
        return Err(Error::InvalidManifest(format!(
            "pixel value {} does not fit in {} bits",
            index, depth)));
    }
    if let Some(mask) = mask {
        if mask.width() != w || mask.height() != h {
            return Err(Error::InvalidManifest(format!(
                "{}x{} mask for a {}x{} icon",
                mask.width(), mask.height(), width, height)));
        }
    }
    let row_bits = w as usize * depth as usize;
    let row_bytes = (row_bits + 15) / 16 * 2;
    if row_bytes > 0x3FFF {
        return Err(Error::InvalidManifest(format!(
            "rows of {} bytes are too long",
            row_bytes)));
    }
    let header = PixMapHeader {
        row_bytes: row_bytes as u16,
        bounds: [0, 0, height as i16, width as i16],
        pack_type: 0,
        pixel_type: 0,
        pixel_size: depth,
        cmp_count: 1,
        cmp_size: depth,
        table_offset: PIXMAP_HEADER_LENGTH as u32,
    };
    let mut data = header.encode().to_vec();
    data.extend_from_slice(&encode_color_table(0, 0, table));
    let mut pixels = vec![0u8; row_bytes * h as usize];
    for (position, &index) in indices.iter().enumerate() {
        let (x, y) = (position % w as usize, position / w as usize);
        let bit = x * depth as usize;
        let shift = 8 - depth as usize - bit % 8;
        pixels[y * row_bytes + bit / 8] |= index << shift;
    }
    data.extend_from_slice(&pixels);
    if let Some(mask) = mask {
        data.extend_from_slice(&mask.pack(mask_row_bytes(w)));
    }
    Ok(data)
}
