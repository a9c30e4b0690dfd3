/*!
    Raw frame encoding and muxing for the ffmpeg image bridge.

    This crate handles the output side: it takes packed raw frames, converts
    them to the encoder's pixel format, encodes them and writes the packets
    into a container file. Writing `None` finalizes the file; without it the
    container is left without a trailer.
*/

pub use ffmpeg_types::{CodecId, Error, PixelFormat, Rational, Result, VideoFrame};

mod config;
mod sink;

pub use config::{EncoderPreset, EncodingParams};
pub use sink::{FrameSink, Sink};
