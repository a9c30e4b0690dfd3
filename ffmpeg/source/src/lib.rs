/*!
    Video file decoding into raw frames for the ffmpeg image bridge.

    This crate handles the input side: it opens a media file, decodes the best
    video stream and hands out decoder-owned frames already converted to the
    pixel format the caller asked for, together with their timestamps.
*/

pub use ffmpeg_next::util::frame::video::Video as DecodedFrame;
pub use ffmpeg_transform::ScalingAlgorithm;
pub use ffmpeg_types::{Error, PixelFormat, Rational, Result};

mod config;
mod source;

pub use config::SourceConfig;
pub use source::{Source, open, open_with_config};
