/*!
    Shared types for the ffmpeg image bridge.

    This crate defines the vocabulary of the workspace: the types that cross crate
    boundaries. It has no dependency on FFmpeg, making it lightweight and enabling
    consumers to depend on it without pulling in FFmpeg bindings.
*/

mod codec;
mod error;
mod format;
mod frame;
mod rational;

pub use codec::CodecId;
pub use error::{Error, Result};
pub use format::PixelFormat;
pub use frame::VideoFrame;
pub use rational::Rational;
