/*!
    Raw video frame data.
*/

use crate::PixelFormat;

/**
    A tightly packed raw video frame.

    This is the frame-ready form of an image: a pixel format tag, dimensions
    and the pixel bytes with no padding between rows. Sinks accept it as
    encoder input.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
    /// Pixel bytes, row-major, `stride() * height` long for packed formats.
    pub data: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel format of `data`.
    pub format: PixelFormat,
    /// Presentation timestamp in the consumer's time base (None = assign in order).
    pub pts: Option<i64>,
}

impl VideoFrame {
    /**
        Create a new frame without a timestamp.
    */
    pub fn new(data: Vec<u8>, width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            data,
            width,
            height,
            format,
            pts: None,
        }
    }

    /**
        Set the presentation timestamp.
    */
    pub fn with_pts(mut self, pts: i64) -> Self {
        self.pts = Some(pts);
        self
    }

    /**
        Bytes per row of the packed data, if the format is packed.
    */
    pub fn stride(&self) -> Option<usize> {
        self.format
            .bytes_per_pixel()
            .map(|bpp| self.width as usize * bpp)
    }

    /**
        Returns true if the frame has no pixels.
    */
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
