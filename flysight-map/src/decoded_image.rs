//! Decoded tile images and the [`ImageDecoder`] boundary that produces them.

use crate::error::MapError;

/// An image that has been loaded into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Raw bytes of the image, in RGBA order.
    pub(crate) bytes: Vec<u8>,
    /// Width and height of the image.
    pub(crate) dimensions: (u32, u32),
}

impl DecodedImage {
    /// Decode an image from a byte slice.
    ///
    /// Attempts to guess the format of the image from the data. Non-RGBA images
    /// will be converted to RGBA.
    #[cfg(feature = "image")]
    pub fn new(bytes: &[u8]) -> Result<Self, MapError> {
        use image::GenericImageView;
        let decoded = image::load_from_memory(bytes)?;
        let bytes = decoded.to_rgba8();
        let dimensions = decoded.dimensions();

        Ok(Self {
            bytes: bytes.into_vec(),
            dimensions,
        })
    }

    /// Creates an image from raw RGBA bytes. Fails if the buffer length does not match the
    /// dimensions.
    pub fn from_raw(bytes: Vec<u8>, width: u32, height: u32) -> Result<Self, MapError> {
        if bytes.len() != width as usize * height as usize * 4 {
            return Err(MapError::Generic(format!(
                "invalid image buffer: {} bytes for {width}x{height}",
                bytes.len()
            )));
        }

        Ok(Self {
            bytes,
            dimensions: (width, height),
        })
    }

    /// RGBA pixel data.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Width of the image.
    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    /// Height of the image.
    pub fn height(&self) -> u32 {
        self.dimensions.1
    }
}

/// Converts encoded tile bytes into images the renderer can draw.
pub trait ImageDecoder: Send + Sync {
    /// Decodes the bytes, returning `None` if they are not a supported image.
    fn decode(&self, bytes: &[u8]) -> Option<DecodedImage>;
}

impl<F> ImageDecoder for F
where
    F: Fn(&[u8]) -> Option<DecodedImage> + Send + Sync,
{
    fn decode(&self, bytes: &[u8]) -> Option<DecodedImage> {
        self(bytes)
    }
}

/// Decoder for PNG and JPEG tiles using the `image` crate.
#[cfg(feature = "image")]
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterImageDecoder;

#[cfg(feature = "image")]
impl ImageDecoder for RasterImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Option<DecodedImage> {
        match DecodedImage::new(bytes) {
            Ok(image) => Some(image),
            Err(err) => {
                log::debug!("Failed to decode tile image: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn raw_buffer_must_match_dimensions() {
        let image = DecodedImage::from_raw(vec![0; 16], 2, 2).expect("valid buffer");
        assert_eq!((image.width(), image.height()), (2, 2));
        assert_matches!(
            DecodedImage::from_raw(vec![0; 15], 2, 2),
            Err(MapError::Generic(_))
        );
    }

    #[cfg(feature = "image")]
    #[test]
    fn garbage_is_not_an_image() {
        assert!(RasterImageDecoder.decode(b"definitely not a png").is_none());
    }

    #[cfg(feature = "image")]
    #[test]
    fn decodes_png() {
        let mut encoded = Vec::new();
        let source = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 255]));
        image::DynamicImage::ImageRgba8(source)
            .write_to(
                &mut std::io::Cursor::new(&mut encoded),
                image::ImageOutputFormat::Png,
            )
            .expect("png encoding");

        let decoded = RasterImageDecoder.decode(&encoded).expect("valid png");
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
        assert_eq!(&decoded.bytes()[0..4], &[10, 20, 30, 255]);
    }
}
