use super::image::{Image, PixelFormat};
use std::io::{self, BufRead, Error, ErrorKind, Seek, Write};

impl Image {
    /// Reads an image from a PNG file.  Only RGBA and grayscale-with-alpha
    /// PNGs with 8-bit channels can be represented.
    pub fn read_png<R: BufRead + Seek>(input: R) -> io::Result<Image> {
        let mut decoder = png::Decoder::new(input);
        decoder.set_transformations(
            png::Transformations::STRIP_16 | png::Transformations::EXPAND,
        );
        let info = decoder.read_header_info()?;
        let (width, height) = (info.width, info.height);
        let mut reader = decoder.read_info()?;

        let (color_type, bit_depth) = reader.output_color_type();
        if bit_depth != png::BitDepth::Eight {
            return Err(Error::new(ErrorKind::InvalidData,
                                  "PNG does not have 8-bit channels"));
        }
        let pixel_format = match color_type {
            png::ColorType::Rgba => PixelFormat::RGBA,
            png::ColorType::GrayscaleAlpha => PixelFormat::GrayAlpha,
            other => {
                let msg = format!("unsupported PNG color type {:?}", other);
                return Err(Error::new(ErrorKind::InvalidData, msg));
            }
        };

        let mut image = Image::new(pixel_format, width, height);
        reader.next_frame(image.data_mut())?;
        reader.finish()?;
        Ok(image)
    }

    /// Writes the image to a PNG file.
    pub fn write_png<W: Write>(&self, output: W) -> io::Result<()> {
        let color_type = match self.format {
            PixelFormat::RGBA => png::ColorType::Rgba,
            PixelFormat::GrayAlpha => png::ColorType::GrayscaleAlpha,
        };
        let mut encoder = png::Encoder::new(output, self.width(), self.height());
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.data)?;
        writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::image::{Image, PixelFormat};
    use std::io::Cursor;

    #[test]
    fn png_round_trip() {
        let mut image = Image::new(PixelFormat::RGBA, 2, 2);
        image.pixel_mut(0, 1).copy_from_slice(&[10, 20, 30, 255]);
        let mut encoded: Vec<u8> = Vec::new();
        image.write_png(&mut encoded).expect("write failed");
        assert_eq!(&encoded[1..4], b"PNG");
        let decoded = Image::read_png(Cursor::new(encoded)).expect("read failed");
        assert_eq!(decoded, image);
    }
}
