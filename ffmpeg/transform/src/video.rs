/*!
    Video frame transformation.
*/

use ffmpeg_next::{
    format::Pixel,
    software::scaling::{context::Context as ScalerContext, flag::Flags as ScalerFlags},
    util::frame::video::Video as VideoFrameFFmpeg,
};
use tracing::debug;

use ffmpeg_types::{Error, PixelFormat, Result, VideoFrame};

use crate::convert::pixel_format_to_ffmpeg;

/**
    Scaling algorithm for video resizing.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScalingAlgorithm {
    /// Nearest neighbor - fastest, lowest quality.
    Nearest,
    /// Bilinear interpolation - fast, acceptable quality.
    #[default]
    Bilinear,
    /// Bicubic interpolation - moderate speed, good quality.
    Bicubic,
    /// Lanczos resampling - slowest, highest quality.
    Lanczos,
}

impl ScalingAlgorithm {
    fn to_ffmpeg_flags(self) -> ScalerFlags {
        match self {
            Self::Nearest => ScalerFlags::POINT,
            Self::Bilinear => ScalerFlags::BILINEAR,
            Self::Bicubic => ScalerFlags::BICUBIC,
            Self::Lanczos => ScalerFlags::LANCZOS,
        }
    }
}

/**
    Video frame transformer.

    Converts FFmpeg frames into a target pixel format and, optionally, a
    target size. The output frame is owned by the transformer and reused
    between calls.

    The scaler context is lazily initialized on first use and
    automatically reinitialized if the input format changes.
*/
pub struct VideoTransform {
    format: PixelFormat,
    size: Option<(u32, u32)>,
    algorithm: ScalingAlgorithm,
    /// Cached scaler context and the input format it was created for.
    scaler_state: Option<ScalerState>,
    output: VideoFrameFFmpeg,
}

struct ScalerState {
    context: ScalerContext,
    src_width: u32,
    src_height: u32,
    src_format: Pixel,
}

impl ScalerState {
    fn matches(&self, frame: &VideoFrameFFmpeg) -> bool {
        self.src_width == frame.width()
            && self.src_height == frame.height()
            && self.src_format == frame.format()
    }
}

impl VideoTransform {
    /**
        Create a transformer that converts to `format` and keeps the input size.
    */
    pub fn new(format: PixelFormat, algorithm: ScalingAlgorithm) -> Self {
        Self {
            format,
            size: None,
            algorithm,
            scaler_state: None,
            output: VideoFrameFFmpeg::empty(),
        }
    }

    /**
        Resize every frame to the given dimensions.
    */
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }

    /**
        Get the target pixel format.
    */
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /**
        Transform a video frame to the target format.

        The returned frame is borrowed from the transformer and is overwritten
        by the next call. The input frame's pts is carried over.
    */
    pub fn transform(&mut self, frame: &VideoFrameFFmpeg) -> Result<&VideoFrameFFmpeg> {
        if frame.width() == 0 || frame.height() == 0 {
            return Err(Error::invalid_data("input frame has zero dimensions"));
        }

        let state = match &mut self.scaler_state {
            Some(state) if state.matches(frame) => state,
            slot => {
                let (dst_width, dst_height) = self.size.unwrap_or((frame.width(), frame.height()));
                debug!(
                    src_format = ?frame.format(),
                    src_width = frame.width(),
                    src_height = frame.height(),
                    dst_format = ?self.format,
                    dst_width,
                    dst_height,
                    "initializing scaler"
                );

                let context = ScalerContext::get(
                    frame.format(),
                    frame.width(),
                    frame.height(),
                    pixel_format_to_ffmpeg(self.format),
                    dst_width,
                    dst_height,
                    self.algorithm.to_ffmpeg_flags(),
                )
                .map_err(|e| Error::codec(format!("failed to create scaler: {}", e)))?;

                // The scaler refuses output frames allocated for another geometry
                self.output = VideoFrameFFmpeg::empty();

                slot.insert(ScalerState {
                    context,
                    src_width: frame.width(),
                    src_height: frame.height(),
                    src_format: frame.format(),
                })
            }
        };

        state
            .context
            .run(frame, &mut self.output)
            .map_err(|e| Error::codec(format!("scaling failed: {}", e)))?;
        self.output.set_pts(frame.pts());

        Ok(&self.output)
    }
}

/**
    Copy a packed [`VideoFrame`] into a newly allocated FFmpeg frame.

    Rows are copied from the tightly packed source into the FFmpeg frame's
    (possibly padded) stride. Only packed formats are accepted.
*/
pub fn ffmpeg_frame_from_packed(frame: &VideoFrame) -> Result<VideoFrameFFmpeg> {
    let bytes_per_pixel = frame.format.bytes_per_pixel().ok_or_else(|| {
        Error::unsupported_format(format!(
            "pixel format {:?} is not a packed format",
            frame.format
        ))
    })?;

    if frame.is_empty() {
        return Err(Error::invalid_data("frame has zero dimensions"));
    }

    let row_len = frame.width as usize * bytes_per_pixel;
    let height = frame.height as usize;
    if frame.data.len() < row_len * height {
        return Err(Error::invalid_data(format!(
            "frame data is {} bytes, expected {}",
            frame.data.len(),
            row_len * height
        )));
    }

    let mut dst = VideoFrameFFmpeg::new(
        pixel_format_to_ffmpeg(frame.format),
        frame.width,
        frame.height,
    );

    let dst_stride = dst.stride(0);
    let dst_data = dst.data_mut(0);
    for (y, src_row) in frame.data.chunks_exact(row_len).take(height).enumerate() {
        let dst_start = y * dst_stride;
        dst_data[dst_start..dst_start + row_len].copy_from_slice(src_row);
    }

    dst.set_pts(frame.pts);
    Ok(dst)
}

impl std::fmt::Debug for VideoTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoTransform")
            .field("format", &self.format)
            .field("size", &self.size)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_frame(width: u32, height: u32) -> VideoFrame {
        let data = (0..width * height).map(|i| i as u8).collect();
        VideoFrame::new(data, width, height, PixelFormat::Gray8)
    }

    #[test]
    fn packed_frame_rows_land_on_stride() {
        let frame = gray_frame(3, 2).with_pts(7);
        let ffmpeg_frame = ffmpeg_frame_from_packed(&frame).unwrap();

        assert_eq!(ffmpeg_frame.format(), Pixel::GRAY8);
        assert_eq!(ffmpeg_frame.width(), 3);
        assert_eq!(ffmpeg_frame.height(), 2);
        assert_eq!(ffmpeg_frame.pts(), Some(7));

        let stride = ffmpeg_frame.stride(0);
        assert!(stride >= 3);
        let data = ffmpeg_frame.data(0);
        assert_eq!(&data[0..3], &[0, 1, 2]);
        assert_eq!(&data[stride..stride + 3], &[3, 4, 5]);
    }

    #[test]
    fn packed_frame_rejects_planar_formats() {
        let frame = VideoFrame::new(vec![0; 6], 2, 2, PixelFormat::Yuv420p);
        assert!(matches!(
            ffmpeg_frame_from_packed(&frame),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn packed_frame_rejects_short_data() {
        let frame = VideoFrame::new(vec![0; 5], 3, 2, PixelFormat::Gray8);
        assert!(matches!(
            ffmpeg_frame_from_packed(&frame),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn transform_rejects_empty_frames() {
        let mut transform = VideoTransform::new(PixelFormat::Rgb24, ScalingAlgorithm::default());
        assert!(transform.transform(&VideoFrameFFmpeg::empty()).is_err());
    }

    #[test]
    fn transform_converts_format_and_keeps_size() {
        let rgb = VideoFrame::new(vec![200; 4 * 4 * 3], 4, 4, PixelFormat::Rgb24);
        let input = ffmpeg_frame_from_packed(&rgb).unwrap();

        let mut transform = VideoTransform::new(PixelFormat::Rgba, ScalingAlgorithm::Nearest);
        let output = transform.transform(&input).unwrap();

        assert_eq!(output.format(), Pixel::RGBA);
        assert_eq!(output.width(), 4);
        assert_eq!(output.height(), 4);
    }

    #[test]
    fn transform_reinitializes_on_size_change() {
        let mut transform = VideoTransform::new(PixelFormat::Gray8, ScalingAlgorithm::Bilinear);

        let small = ffmpeg_frame_from_packed(&gray_frame(4, 4)).unwrap();
        assert_eq!(transform.transform(&small).unwrap().width(), 4);

        let large = ffmpeg_frame_from_packed(&gray_frame(8, 6)).unwrap();
        let output = transform.transform(&large).unwrap();
        assert_eq!(output.width(), 8);
        assert_eq!(output.height(), 6);
    }

    #[test]
    fn transform_resizes_to_target() {
        let input = ffmpeg_frame_from_packed(&gray_frame(8, 8)).unwrap();
        let mut transform =
            VideoTransform::new(PixelFormat::Gray8, ScalingAlgorithm::Bicubic).with_size(4, 2);

        let output = transform.transform(&input).unwrap();
        assert_eq!((output.width(), output.height()), (4, 2));
    }
}
