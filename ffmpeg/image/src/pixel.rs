/*!
    Mapping between pixel format tags and `image` pixel kinds.
*/

use image::{ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba};

use ffmpeg_types::PixelFormat;

/**
    An owned, tightly packed image of pixel kind `P`.
*/
pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;

/**
    A subpixel type that can be read from and written to raw frame bytes.
*/
pub trait FrameSample: image::Primitive {
    /**
        Decode packed frame bytes into samples.
    */
    fn from_frame_bytes(bytes: &[u8]) -> Vec<Self>;

    /**
        Encode samples into packed frame bytes.
    */
    fn to_frame_bytes(samples: &[Self]) -> Vec<u8>;
}

impl FrameSample for u8 {
    fn from_frame_bytes(bytes: &[u8]) -> Vec<Self> {
        bytes.to_vec()
    }

    fn to_frame_bytes(samples: &[Self]) -> Vec<u8> {
        samples.to_vec()
    }
}

/// 16-bit samples are little-endian, matching `PixelFormat::Gray16`.
impl FrameSample for u16 {
    fn from_frame_bytes(bytes: &[u8]) -> Vec<Self> {
        bytes
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect()
    }

    fn to_frame_bytes(samples: &[Self]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/**
    An `image` pixel kind with an exact frame layout.

    `FORMAT` is the only frame format the pixel kind converts from or to;
    its bytes-per-pixel fixes the packed row length.
*/
pub trait FramePixel: Pixel<Subpixel: FrameSample> {
    const FORMAT: PixelFormat;
}

impl FramePixel for Luma<u8> {
    const FORMAT: PixelFormat = PixelFormat::Gray8;
}

impl FramePixel for LumaA<u8> {
    const FORMAT: PixelFormat = PixelFormat::GrayAlpha8;
}

impl FramePixel for Luma<u16> {
    const FORMAT: PixelFormat = PixelFormat::Gray16;
}

impl FramePixel for Rgb<u8> {
    const FORMAT: PixelFormat = PixelFormat::Rgb24;
}

impl FramePixel for Rgba<u8> {
    const FORMAT: PixelFormat = PixelFormat::Rgba;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed_size<P: FramePixel>() -> Option<usize> {
        P::FORMAT.bytes_per_pixel()
    }

    fn pixel_size<P: FramePixel>() -> usize {
        P::CHANNEL_COUNT as usize * std::mem::size_of::<P::Subpixel>()
    }

    #[test]
    fn format_sizes_match_pixel_kinds() {
        assert_eq!(packed_size::<Luma<u8>>(), Some(pixel_size::<Luma<u8>>()));
        assert_eq!(packed_size::<LumaA<u8>>(), Some(pixel_size::<LumaA<u8>>()));
        assert_eq!(packed_size::<Luma<u16>>(), Some(pixel_size::<Luma<u16>>()));
        assert_eq!(packed_size::<Rgb<u8>>(), Some(pixel_size::<Rgb<u8>>()));
        assert_eq!(packed_size::<Rgba<u8>>(), Some(pixel_size::<Rgba<u8>>()));
    }

    #[test]
    fn u16_samples_are_little_endian() {
        let samples = u16::from_frame_bytes(&[0x34, 0x12, 0xff, 0x00]);
        assert_eq!(samples, vec![0x1234, 0x00ff]);
        assert_eq!(u16::to_frame_bytes(&samples), vec![0x34, 0x12, 0xff, 0x00]);
    }
}
