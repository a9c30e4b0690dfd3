/*!
    Pixel format tags.
*/

/**
    Video pixel formats.

    The packed formats with a fixed number of bytes per pixel can be copied
    row by row into typed image buffers. The rest are recognised so that they
    can be reported as unsupported instead of being lumped together with
    unknown tags.

    Conversions match on this enum without a wildcard arm, so it must stay
    exhaustive.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Packed grayscale, 8bpp
    Gray8,
    /// Packed grayscale with alpha, 16bpp
    GrayAlpha8,
    /// Packed grayscale, 16bpp, little-endian samples
    Gray16,
    /// Packed RGB, 24bpp
    Rgb24,
    /// Packed RGBA, 32bpp
    Rgba,
    /// Packed BGR, 24bpp
    Bgr24,
    /// Packed BGRA, 32bpp
    Bgra,
    /// Planar YUV 4:2:0, 12bpp (most common video format)
    Yuv420p,
    /// Planar YUV 4:2:2, 16bpp
    Yuv422p,
    /// Planar YUV 4:4:4, 24bpp
    Yuv444p,
    /// Semi-planar YUV 4:2:0, 12bpp
    Nv12,
}

impl PixelFormat {
    /**
        Bytes per pixel of a format that converts to a typed image buffer.

        Returns `None` for every format without an image counterpart, including
        packed BGR layouts and all planar layouts.
    */
    pub const fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            Self::Gray8 => Some(1),
            Self::GrayAlpha8 | Self::Gray16 => Some(2),
            Self::Rgb24 => Some(3),
            Self::Rgba => Some(4),
            Self::Bgr24 | Self::Bgra => None,
            Self::Yuv420p | Self::Yuv422p | Self::Yuv444p | Self::Nv12 => None,
        }
    }

    /**
        Returns true if this is a planar format.
    */
    pub const fn is_planar(self) -> bool {
        match self {
            Self::Yuv420p | Self::Yuv422p | Self::Yuv444p => true,
            Self::Nv12 => true, // semi-planar counts as planar
            Self::Gray8 | Self::GrayAlpha8 | Self::Gray16 => false,
            Self::Rgb24 | Self::Rgba | Self::Bgr24 | Self::Bgra => false,
        }
    }
}
