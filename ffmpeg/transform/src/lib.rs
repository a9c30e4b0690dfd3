/*!
    Pixel format mapping and frame rescaling for the ffmpeg image bridge.

    Sits between FFmpeg's frame types and the shared vocabulary in
    `ffmpeg-types`. Sources use it to bring decoded frames into a requested
    pixel format; sinks use it to bring packed input frames into the format
    an encoder expects.
*/

pub use ffmpeg_types::{Error, PixelFormat, Rational, Result, VideoFrame};

pub mod convert;
mod video;

pub use video::{ScalingAlgorithm, VideoTransform, ffmpeg_frame_from_packed};
