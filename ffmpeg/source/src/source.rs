/*!
    Media source implementation.
*/

use std::path::{Path, PathBuf};

use ffmpeg_next::{
    codec::{self, decoder::Video as VideoDecoderFFmpeg},
    ffi,
    format::context::Input as InputContext,
    media::Type,
    util::frame::video::Video as VideoFrameFFmpeg,
};
use tracing::{debug, trace};

use ffmpeg_transform::VideoTransform;
use ffmpeg_transform::convert::rational_from_ffmpeg;
use ffmpeg_types::{Error, PixelFormat, Rational, Result};

use crate::config::SourceConfig;

/**
    A video source that produces decoded frames.

    Created by [`open`] or [`Source::open`]. Frames are pulled one at a time
    with [`Source::next_frame`]; the sequence is finite and cannot be
    restarted without opening the file again.
*/
pub struct Source {
    path: PathBuf,
    /// The FFmpeg input context.
    input: InputContext,
    decoder: VideoDecoderFFmpeg,
    stream_index: usize,
    time_base: Rational,
    /// Average frame rate, used when frames carry no timestamp.
    frame_rate: Option<Rational>,
    transform: VideoTransform,
    /// Scratch frame the decoder writes into.
    decoded: VideoFrameFFmpeg,
    frames_read: u64,
    eof_sent: bool,
    finished: bool,
}

impl Source {
    /**
        Open a media file and prepare its best video stream for decoding.

        # Example

        ```ignore
        let mut source = Source::open("video.mp4", SourceConfig::new(PixelFormat::Rgb24))?;
        while let Some((frame, seconds)) = source.next_frame()? {
            println!("{}x{} at {seconds:.3}s", frame.width(), frame.height());
        }
        source.close();
        ```
    */
    pub fn open<P: AsRef<Path>>(path: P, config: SourceConfig) -> Result<Self> {
        ffmpeg_next::init().map_err(|e| Error::codec(e.to_string()))?;

        let path = path.as_ref();
        let input = ffmpeg_next::format::input(path).map_err(|e| {
            if e.to_string().contains("No such file") {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    e.to_string(),
                ))
            } else {
                Error::codec(e.to_string())
            }
        })?;

        let (stream_index, time_base, frame_rate, parameters) = {
            let stream = input.streams().best(Type::Video).ok_or_else(|| {
                Error::invalid_data(format!("no video stream in {}", path.display()))
            })?;
            let rate = stream.avg_frame_rate();
            let frame_rate = (rate.numerator() > 0 && rate.denominator() > 0)
                .then(|| rational_from_ffmpeg(rate));
            (
                stream.index(),
                rational_from_ffmpeg(stream.time_base()),
                frame_rate,
                stream.parameters(),
            )
        };

        let decoder = codec::context::Context::from_parameters(parameters)
            .map_err(|e| Error::codec(e.to_string()))?
            .decoder()
            .video()
            .map_err(|e| Error::codec(e.to_string()))?;

        debug!(
            path = %path.display(),
            stream_index,
            width = decoder.width(),
            height = decoder.height(),
            pixel_format = ?config.pixel_format,
            "opened video source"
        );

        Ok(Self {
            path: path.to_path_buf(),
            input,
            decoder,
            stream_index,
            time_base,
            frame_rate,
            transform: VideoTransform::new(config.pixel_format, config.scaling),
            decoded: VideoFrameFFmpeg::empty(),
            frames_read: 0,
            eof_sent: false,
            finished: false,
        })
    }

    /**
        Pixel format of the frames this source produces.
    */
    pub fn pixel_format(&self) -> PixelFormat {
        self.transform.format()
    }

    /**
        Coded width of the video stream.
    */
    pub fn width(&self) -> u32 {
        self.decoder.width()
    }

    /**
        Coded height of the video stream.
    */
    pub fn height(&self) -> u32 {
        self.decoder.height()
    }

    /**
        Get the video stream time base.
    */
    pub fn time_base(&self) -> Rational {
        self.time_base
    }

    /**
        Average frame rate of the video stream, if the container reports one.
    */
    pub fn frame_rate(&self) -> Option<Rational> {
        self.frame_rate
    }

    /**
        Number of frames produced so far.
    */
    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    /**
        Decode the next frame.

        Returns `Ok(Some((frame, seconds)))` for each frame, `Ok(None)` once the
        stream is exhausted. The frame is owned by the source and is reused by
        the next call, which the borrow enforces.
    */
    pub fn next_frame(&mut self) -> Result<Option<(&VideoFrameFFmpeg, f64)>> {
        if !self.receive_decoded()? {
            return Ok(None);
        }

        let timestamp = match self.decoded.timestamp() {
            Some(ts) => self.time_base.seconds(ts),
            None => self
                .frame_rate
                .map_or(0.0, |rate| self.frames_read as f64 / rate.to_f64()),
        };
        self.frames_read += 1;
        trace!(frame = self.frames_read, timestamp, "decoded frame");

        let frame = self.transform.transform(&self.decoded)?;
        Ok(Some((frame, timestamp)))
    }

    /**
        Close the source and release decoder resources.

        Consuming `self` makes a second close impossible. Dropping the source
        releases the same resources without logging.
    */
    pub fn close(self) {
        debug!(
            path = %self.path.display(),
            frames = self.frames_read,
            "closed video source"
        );
    }

    /**
        Pull frames out of the decoder, feeding it packets as needed.

        Returns `false` once the decoder has been drained.
    */
    fn receive_decoded(&mut self) -> Result<bool> {
        if self.finished {
            return Ok(false);
        }

        loop {
            match self.decoder.receive_frame(&mut self.decoded) {
                Ok(()) => return Ok(true),
                Err(ffmpeg_next::Error::Other { errno }) if errno == ffi::EAGAIN => {
                    // Need more input
                    if self.eof_sent {
                        self.finished = true;
                        return Ok(false);
                    }
                }
                Err(ffmpeg_next::Error::Eof) => {
                    debug!(frames = self.frames_read, "video stream exhausted");
                    self.finished = true;
                    return Ok(false);
                }
                Err(e) => return Err(Error::codec(e.to_string())),
            }

            self.feed_decoder()?;
        }
    }

    /**
        Send the next packet of our stream to the decoder, or EOF at end of input.
    */
    fn feed_decoder(&mut self) -> Result<()> {
        loop {
            let Some((stream, packet)) = self.input.packets().next() else {
                self.eof_sent = true;
                return match self.decoder.send_eof() {
                    Ok(()) | Err(ffmpeg_next::Error::Eof) => Ok(()),
                    Err(e) => Err(Error::codec(e.to_string())),
                };
            };

            // Skip streams we don't want
            if stream.index() != self.stream_index {
                continue;
            }

            return self
                .decoder
                .send_packet(&packet)
                .map_err(|e| Error::codec(e.to_string()));
        }
    }
}

/**
    Open a media file producing RGB frames.

    This is a convenience function equivalent to `Source::open(path, SourceConfig::default())`.
*/
pub fn open<P: AsRef<Path>>(path: P) -> Result<Source> {
    Source::open(path, SourceConfig::default())
}

/**
    Open a media file with the given configuration.
*/
pub fn open_with_config<P: AsRef<Path>>(path: P, config: SourceConfig) -> Result<Source> {
    Source::open(path, config)
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source")
            .field("path", &self.path)
            .field("stream_index", &self.stream_index)
            .field("time_base", &self.time_base)
            .field("frames_read", &self.frames_read)
            .finish_non_exhaustive()
    }
}
