/*!
    Media sink implementation.
*/

use std::path::{Path, PathBuf};

use ffmpeg_next::{
    Dictionary, codec, codec::encoder::video::Encoder as VideoEncoderFFmpeg, ffi,
    format::context::Output as OutputContext, media::Type,
};
use tracing::{debug, trace, warn};

use ffmpeg_transform::convert::{pixel_format_to_ffmpeg, rational_to_ffmpeg};
use ffmpeg_transform::{ScalingAlgorithm, VideoTransform, ffmpeg_frame_from_packed};
use ffmpeg_types::{CodecId, Error, Result, VideoFrame};

use crate::config::EncodingParams;

/**
    Destination for raw video frames.

    Passing `None` to [`FrameSink::write`] is the end-of-stream sentinel: it
    flushes whatever the destination buffers and finalizes the output. A
    destination that never sees the sentinel is left incomplete.
*/
pub trait FrameSink {
    /**
        Consume one frame.
    */
    fn write_frame(&mut self, frame: &VideoFrame) -> Result<()>;

    /**
        Flush and finalize the output. Fails with [`Error::Finalized`] if
        called more than once.
    */
    fn finish(&mut self) -> Result<()>;

    /**
        Write a frame, or finalize on `None`.
    */
    fn write(&mut self, frame: Option<&VideoFrame>) -> Result<()> {
        match frame {
            Some(frame) => self.write_frame(frame),
            None => self.finish(),
        }
    }
}

/**
    Media sink for encoding raw frames into a video file.

    Frames are converted to the encoder's pixel format and size, encoded,
    and muxed into a container (MP4, MKV, AVI, etc.).
*/
pub struct Sink {
    path: PathBuf,
    output: OutputContext,
    encoder: VideoEncoderFFmpeg,
    stream_index: usize,
    encoder_time_base: ffmpeg_next::Rational,
    stream_time_base: ffmpeg_next::Rational,
    transform: VideoTransform,
    frame_count: i64,
    finalized: bool,
}

impl Sink {
    /**
        Create a sink that writes to a file.

        The header is written immediately; the trailer is written when the
        sink is finalized.
    */
    pub fn create<P: AsRef<Path>>(path: P, params: EncodingParams) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::codec(e.to_string()))?;
        params.validate()?;

        let path = path.as_ref();

        // Create output context
        let mut output = match params.format_name.as_deref() {
            Some(name) => ffmpeg_next::format::output_as(path, name),
            None => ffmpeg_next::format::output(path),
        }
        .map_err(|e| Error::codec(format!("failed to create output: {}", e)))?;

        // Find the codec
        let codec_id = match params.codec {
            Some(codec) => codec_id_to_ffmpeg(codec),
            None => output.format().codec(path, Type::Video),
        };
        if codec_id == codec::Id::None {
            return Err(Error::unsupported_format(format!(
                "no video codec for {}",
                path.display()
            )));
        }
        let codec = ffmpeg_next::encoder::find(codec_id).ok_or_else(|| {
            Error::unsupported_format(format!("encoder for {:?} not found", codec_id))
        })?;

        let global_header = output
            .format()
            .flags()
            .contains(ffmpeg_next::format::flag::Flags::GLOBAL_HEADER);

        // Create encoder context
        let mut encoder = codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()
            .map_err(|e| Error::codec(e.to_string()))?;

        encoder.set_width(params.width);
        encoder.set_height(params.height);
        encoder.set_format(pixel_format_to_ffmpeg(params.pixel_format));

        // Time base is inverse of frame rate for video
        let encoder_time_base = rational_to_ffmpeg(params.time_base());
        encoder.set_time_base(encoder_time_base);
        encoder.set_frame_rate(Some(rational_to_ffmpeg(params.frame_rate)));

        if let Some(gop) = params.keyframe_interval {
            encoder.set_gop(gop);
        }
        if let Some(bitrate) = params.bitrate {
            encoder.set_bit_rate(bitrate as usize);
        }
        if global_header {
            encoder.set_flags(codec::Flags::GLOBAL_HEADER);
        }

        let mut opts = Dictionary::new();
        if let Some(preset) = params.preset {
            opts.set("preset", preset.as_str());
        }

        // Open the encoder
        let encoder = encoder
            .open_with(opts)
            .map_err(|e| Error::codec(format!("failed to open encoder: {}", e)))?;

        let stream_index = {
            let mut stream = output
                .add_stream(codec)
                .map_err(|e| Error::codec(format!("failed to add video stream: {}", e)))?;
            stream.set_parameters(&encoder);
            stream.set_time_base(encoder_time_base);
            stream.index()
        };

        // Write header
        output
            .write_header()
            .map_err(|e| Error::codec(format!("failed to write header: {}", e)))?;

        // The muxer may pick its own stream time base while writing the header
        let stream_time_base = output
            .stream(stream_index)
            .map(|stream| stream.time_base())
            .ok_or_else(|| Error::codec("video stream missing after header"))?;

        debug!(
            path = %path.display(),
            codec = ?codec_id,
            width = params.width,
            height = params.height,
            pixel_format = ?params.pixel_format,
            "opened video sink"
        );

        Ok(Self {
            path: path.to_path_buf(),
            output,
            encoder,
            stream_index,
            encoder_time_base,
            stream_time_base,
            transform: VideoTransform::new(params.pixel_format, ScalingAlgorithm::Bicubic)
                .with_size(params.width, params.height),
            frame_count: 0,
            finalized: false,
        })
    }

    /**
        Number of frames sent to the encoder so far.
    */
    pub fn frames_written(&self) -> i64 {
        self.frame_count
    }

    /**
        Returns true once the end-of-stream sentinel has been written.
    */
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /**
        Receive all available packets from the encoder and mux them.
    */
    fn drain_packets(&mut self) -> Result<()> {
        let mut encoded = ffmpeg_next::Packet::empty();

        loop {
            match self.encoder.receive_packet(&mut encoded) {
                Ok(()) => {
                    encoded.set_stream(self.stream_index);
                    encoded.rescale_ts(self.encoder_time_base, self.stream_time_base);
                    encoded
                        .write_interleaved(&mut self.output)
                        .map_err(|e| Error::codec(format!("failed to write packet: {}", e)))?;
                }
                Err(ffmpeg_next::Error::Other { errno }) if errno == ffi::EAGAIN => break,
                Err(ffmpeg_next::Error::Eof) => break,
                Err(e) => return Err(Error::codec(e.to_string())),
            }
        }

        Ok(())
    }
}

impl FrameSink for Sink {
    /**
        Encode one frame.

        Frames without a pts are numbered in write order.
    */
    fn write_frame(&mut self, frame: &VideoFrame) -> Result<()> {
        if self.finalized {
            return Err(Error::Finalized);
        }

        let mut input = ffmpeg_frame_from_packed(frame)?;
        input.set_pts(Some(frame.pts.unwrap_or(self.frame_count)));

        let converted = self.transform.transform(&input)?;
        self.encoder
            .send_frame(converted)
            .map_err(|e| Error::codec(e.to_string()))?;
        self.frame_count += 1;
        trace!(frame = self.frame_count, "encoded frame");

        self.drain_packets()
    }

    /**
        Flush the encoder and write the container trailer.
    */
    fn finish(&mut self) -> Result<()> {
        if self.finalized {
            return Err(Error::Finalized);
        }
        // A failed flush is not retried
        self.finalized = true;

        self.encoder
            .send_eof()
            .map_err(|e| Error::codec(e.to_string()))?;
        self.drain_packets()?;

        self.output
            .write_trailer()
            .map_err(|e| Error::codec(format!("failed to write trailer: {}", e)))?;

        debug!(
            path = %self.path.display(),
            frames = self.frame_count,
            "finalized video sink"
        );
        Ok(())
    }
}

impl Drop for Sink {
    fn drop(&mut self) {
        if !self.finalized {
            warn!(
                path = %self.path.display(),
                frames = self.frame_count,
                "video sink dropped without end-of-stream; output is incomplete"
            );
        }
    }
}

/**
    Convert our CodecId to FFmpeg's codec ID.
*/
fn codec_id_to_ffmpeg(codec: CodecId) -> codec::Id {
    match codec {
        CodecId::H264 => codec::Id::H264,
        CodecId::H265 => codec::Id::HEVC,
        CodecId::Vp8 => codec::Id::VP8,
        CodecId::Vp9 => codec::Id::VP9,
        CodecId::Av1 => codec::Id::AV1,
        CodecId::Mpeg4 => codec::Id::MPEG4,
        CodecId::Mpeg2Video => codec::Id::MPEG2VIDEO,
        CodecId::Mjpeg => codec::Id::MJPEG,
        CodecId::Png => codec::Id::PNG,
        CodecId::RawVideo => codec::Id::RAWVIDEO,
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink")
            .field("path", &self.path)
            .field("stream_index", &self.stream_index)
            .field("frames_written", &self.frame_count)
            .field("finalized", &self.finalized)
            .finish_non_exhaustive()
    }
}
