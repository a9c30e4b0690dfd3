/*!
    Conversion utilities between ffmpeg-next types and ffmpeg-types.
*/

use ffmpeg_next::format::Pixel;

use ffmpeg_types::{PixelFormat, Rational};

/**
    Convert ffmpeg_next::Rational to our Rational.
*/
pub fn rational_from_ffmpeg(r: ffmpeg_next::Rational) -> Rational {
    Rational::new(r.numerator(), r.denominator())
}

/**
    Convert our Rational to ffmpeg_next::Rational.
*/
pub fn rational_to_ffmpeg(r: Rational) -> ffmpeg_next::Rational {
    ffmpeg_next::Rational::new(r.num, r.den)
}

/**
    Convert ffmpeg_next pixel format to our PixelFormat.

    Returns `None` for every FFmpeg layout outside our closed set, including
    big-endian 16-bit grayscale.
*/
pub fn pixel_format_from_ffmpeg(format: Pixel) -> Option<PixelFormat> {
    match format {
        Pixel::GRAY8 => Some(PixelFormat::Gray8),
        Pixel::YA8 => Some(PixelFormat::GrayAlpha8),
        Pixel::GRAY16LE => Some(PixelFormat::Gray16),
        Pixel::RGB24 => Some(PixelFormat::Rgb24),
        Pixel::RGBA => Some(PixelFormat::Rgba),
        Pixel::BGR24 => Some(PixelFormat::Bgr24),
        Pixel::BGRA => Some(PixelFormat::Bgra),
        Pixel::YUV420P => Some(PixelFormat::Yuv420p),
        Pixel::YUV422P => Some(PixelFormat::Yuv422p),
        Pixel::YUV444P => Some(PixelFormat::Yuv444p),
        Pixel::NV12 => Some(PixelFormat::Nv12),
        _ => None,
    }
}

/**
    Convert our PixelFormat to FFmpeg's Pixel format.
*/
pub fn pixel_format_to_ffmpeg(format: PixelFormat) -> Pixel {
    match format {
        PixelFormat::Gray8 => Pixel::GRAY8,
        PixelFormat::GrayAlpha8 => Pixel::YA8,
        PixelFormat::Gray16 => Pixel::GRAY16LE,
        PixelFormat::Rgb24 => Pixel::RGB24,
        PixelFormat::Rgba => Pixel::RGBA,
        PixelFormat::Bgr24 => Pixel::BGR24,
        PixelFormat::Bgra => Pixel::BGRA,
        PixelFormat::Yuv420p => Pixel::YUV420P,
        PixelFormat::Yuv422p => Pixel::YUV422P,
        PixelFormat::Yuv444p => Pixel::YUV444P,
        PixelFormat::Nv12 => Pixel::NV12,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_FORMATS: [PixelFormat; 11] = [
        PixelFormat::Gray8,
        PixelFormat::GrayAlpha8,
        PixelFormat::Gray16,
        PixelFormat::Rgb24,
        PixelFormat::Rgba,
        PixelFormat::Bgr24,
        PixelFormat::Bgra,
        PixelFormat::Yuv420p,
        PixelFormat::Yuv422p,
        PixelFormat::Yuv444p,
        PixelFormat::Nv12,
    ];

    #[test]
    fn pixel_format_mapping_is_bidirectional() {
        for format in ALL_FORMATS {
            let pixel = pixel_format_to_ffmpeg(format);
            assert_eq!(pixel_format_from_ffmpeg(pixel), Some(format), "{format:?}");
        }
    }

    #[test]
    fn unmapped_ffmpeg_formats_are_none() {
        assert_eq!(pixel_format_from_ffmpeg(Pixel::GRAY16BE), None);
        assert_eq!(pixel_format_from_ffmpeg(Pixel::YUV420P10LE), None);
        assert_eq!(pixel_format_from_ffmpeg(Pixel::None), None);
    }

    #[test]
    fn rational_conversion() {
        let r = rational_to_ffmpeg(Rational::new(1001, 30000));
        assert_eq!(r.numerator(), 1001);
        assert_eq!(r.denominator(), 30000);
        assert_eq!(rational_from_ffmpeg(r), Rational::new(1001, 30000));
    }
}
