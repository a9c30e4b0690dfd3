/*!
    Read-only access to raw frame memory.
*/

use ffmpeg_next::util::frame::video::Video as VideoFrameFFmpeg;

use ffmpeg_transform::convert::pixel_format_from_ffmpeg;
use ffmpeg_types::{PixelFormat, VideoFrame};

/**
    A raw video frame the converter can read.

    Implementors expose the first plane only. For packed formats that is the
    whole image; planar formats are never copied.
*/
pub trait RawFrame {
    /**
        Pixel format of the frame, or `None` if the layout has no tag.
    */
    fn pixel_format(&self) -> Option<PixelFormat>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /**
        Bytes between the starts of consecutive rows.
    */
    fn stride(&self) -> usize;

    /**
        Bytes of the first plane, at least `stride * (height - 1) + row length` long.
    */
    fn data(&self) -> &[u8];
}

impl RawFrame for VideoFrameFFmpeg {
    fn pixel_format(&self) -> Option<PixelFormat> {
        pixel_format_from_ffmpeg(self.format())
    }

    fn width(&self) -> u32 {
        VideoFrameFFmpeg::width(self)
    }

    fn height(&self) -> u32 {
        VideoFrameFFmpeg::height(self)
    }

    fn stride(&self) -> usize {
        // Unallocated frames have no planes
        if self.planes() == 0 {
            return 0;
        }
        VideoFrameFFmpeg::stride(self, 0)
    }

    fn data(&self) -> &[u8] {
        if self.planes() == 0 {
            return &[];
        }
        VideoFrameFFmpeg::data(self, 0)
    }
}

impl RawFrame for VideoFrame {
    fn pixel_format(&self) -> Option<PixelFormat> {
        Some(self.format)
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stride(&self) -> usize {
        VideoFrame::stride(self).unwrap_or(self.width as usize)
    }

    fn data(&self) -> &[u8] {
        &self.data
    }
}

/**
    A borrowed frame over caller-owned memory, possibly with row padding.
*/
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
}

impl<'a> FrameView<'a> {
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
    ) -> Self {
        Self {
            data,
            width,
            height,
            stride,
            format,
        }
    }
}

impl RawFrame for FrameView<'_> {
    fn pixel_format(&self) -> Option<PixelFormat> {
        Some(self.format)
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn stride(&self) -> usize {
        self.stride
    }

    fn data(&self) -> &[u8] {
        self.data
    }
}
