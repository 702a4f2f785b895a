/// A decoded icon image.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Image {
    pub(crate) format: PixelFormat,
    width: u32,
    height: u32,
    pub(crate) data: Box<[u8]>,
}

impl Image {
    /// Creates a new image with all pixel data set to zero (that is, fully
    /// transparent black).
    pub fn new(format: PixelFormat, width: u32, height: u32) -> Image {
        let data_bits = format.bits_per_pixel() * width * height;
        let data_bytes = (data_bits + 7) / 8;
        Image {
            format,
            width,
            height,
            data: vec![0u8; data_bytes as usize].into_boxed_slice(),
        }
    }

    /// Creates a copy of this image using the RGBA pixel format (that is,
    /// `foo.to_rgba().pixel_format()` will always return `PixelFormat::RGBA`).
    /// If the source image is already in RGBA format, this is equivalant to
    /// simply calling `clone()`.
    pub fn to_rgba(&self) -> Image {
        let rgba_data = match self.format {
            PixelFormat::RGBA => self.data.clone(),
            PixelFormat::GrayAlpha => gray_alpha_to_rgba(&self.data),
        };
        Image {
            format: PixelFormat::RGBA,
            width: self.width,
            height: self.height,
            data: rgba_data,
        }
    }

    /// Returns the format in which this image's pixel data is stored.
    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns a reference to the image's pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a mutable reference to the image's pixel data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Returns the channels of the pixel at the given coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let size = self.format.bytes_per_pixel() as usize;
        let start = (y * self.width + x) as usize * size;
        &self.data[start..start + size]
    }

    /// Returns the channels of the pixel at the given coordinates for
    /// writing.
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let size = self.format.bytes_per_pixel() as usize;
        let start = (y * self.width + x) as usize * size;
        &mut self.data[start..start + size]
    }
}

/// A format for storing pixel data in an image.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PixelFormat {
    /// 32-bit color with alpha channel.
    RGBA,
    /// 16-bit grayscale-with-alpha.
    GrayAlpha,
}

impl PixelFormat {
    /// Returns the number of bits needed to store a single pixel in this
    /// format.
    pub fn bits_per_pixel(self) -> u32 {
        match self {
            PixelFormat::RGBA => 32,
            PixelFormat::GrayAlpha => 16,
        }
    }

    /// Returns the number of bytes needed to store a single pixel in this
    /// format.
    pub fn bytes_per_pixel(self) -> u32 {
        self.bits_per_pixel() / 8
    }
}

/// Converts grayscale-with-alpha image data into RGBA.
fn gray_alpha_to_rgba(gray_alpha: &[u8]) -> Box<[u8]> {
    assert_eq!(gray_alpha.len() % 2, 0);
    let num_pixels = gray_alpha.len() / 2;
    let mut rgba = Vec::with_capacity(num_pixels * 4);
    for pixel in gray_alpha.chunks_exact(2) {
        rgba.push(pixel[0]);
        rgba.push(pixel[0]);
        rgba.push(pixel[0]);
        rgba.push(pixel[1]);
    }
    rgba.into_boxed_slice()
}
