/*!
    Encoding parameters.
*/

use ffmpeg_types::{CodecId, Error, PixelFormat, Rational, Result};

/**
    Encoder speed preset.

    Slower presets produce better compression (smaller files at same quality)
    but take longer to encode. Only codecs with an x264-style `preset` option
    honor it.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EncoderPreset {
    /// Fastest encoding, largest files.
    Ultrafast,
    /// Very fast encoding.
    Superfast,
    /// Fast encoding.
    Veryfast,
    /// Faster than default.
    Faster,
    /// Fast encoding, good for real-time.
    Fast,
    /// Default balance of speed and compression.
    #[default]
    Medium,
    /// Better compression, slower.
    Slow,
    /// Even better compression.
    Slower,
    /// Best compression, slowest.
    Veryslow,
}

impl EncoderPreset {
    /**
        Get the FFmpeg preset string.
    */
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ultrafast => "ultrafast",
            Self::Superfast => "superfast",
            Self::Veryfast => "veryfast",
            Self::Faster => "faster",
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
            Self::Slower => "slower",
            Self::Veryslow => "veryslow",
        }
    }
}

/**
    Parameters for encoding raw frames into a video file.

    Everything except the output size has a default: 30 fps, YUV 4:2:0
    encoder input, and a codec guessed from the output container.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct EncodingParams {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Frame rate; the encoder time base is its reciprocal.
    pub frame_rate: Rational,
    /// Codec to use (None = guess from the container).
    pub codec: Option<CodecId>,
    /// Pixel format the encoder receives.
    pub pixel_format: PixelFormat,
    /// Encoder speed preset (None = codec default).
    pub preset: Option<EncoderPreset>,
    /// Target bitrate in bits per second (None = codec default).
    pub bitrate: Option<u64>,
    /// Keyframe interval in frames (None = encoder default).
    pub keyframe_interval: Option<u32>,
    /// Container format name, e.g. "mp4" (None = guess from the file name).
    pub format_name: Option<String>,
}

impl EncodingParams {
    /**
        Create parameters for the given output size.
    */
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frame_rate: Rational::new(30, 1),
            codec: None,
            pixel_format: PixelFormat::Yuv420p,
            preset: None,
            bitrate: None,
            keyframe_interval: None,
            format_name: None,
        }
    }

    /**
        Set the frame rate.
    */
    pub fn with_frame_rate(mut self, frame_rate: Rational) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /**
        Set the codec.
    */
    pub fn with_codec(mut self, codec: CodecId) -> Self {
        self.codec = Some(codec);
        self
    }

    /**
        Set the pixel format the encoder receives.
    */
    pub fn with_pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = format;
        self
    }

    /**
        Set the encoder preset.
    */
    pub fn with_preset(mut self, preset: EncoderPreset) -> Self {
        self.preset = Some(preset);
        self
    }

    /**
        Set the target bitrate in bits per second.
    */
    pub fn with_bitrate(mut self, bitrate: u64) -> Self {
        self.bitrate = Some(bitrate);
        self
    }

    /**
        Set the keyframe interval in frames.
    */
    pub fn with_keyframe_interval(mut self, frames: u32) -> Self {
        self.keyframe_interval = Some(frames);
        self
    }

    /**
        Force a container format instead of guessing it from the file name.
    */
    pub fn with_format_name(mut self, name: impl Into<String>) -> Self {
        self.format_name = Some(name.into());
        self
    }

    /**
        Time base of encoded frames.
    */
    pub fn time_base(&self) -> Rational {
        self.frame_rate.invert()
    }

    /**
        Check the parameters before any FFmpeg state is created.
    */
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_data(format!(
                "output size {}x{} has a zero dimension",
                self.width, self.height
            )));
        }
        if self.frame_rate.num <= 0 || self.frame_rate.den <= 0 {
            return Err(Error::invalid_data(format!(
                "frame rate {}/{} is not positive",
                self.frame_rate.num, self.frame_rate.den
            )));
        }
        Ok(())
    }
}
