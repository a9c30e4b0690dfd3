/*!
    Writing images into a video file.
*/

use std::marker::PhantomData;
use std::path::Path;

use tracing::{debug, warn};

use ffmpeg_sink::{EncodingParams, FrameSink, Sink};
use ffmpeg_types::{Error, Result};

use crate::convert::image_to_frame;
use crate::pixel::{FramePixel, Image};

/**
    Encodes images of pixel kind `P` through a [`FrameSink`].

    Each image is turned into a raw frame tagged `P::FORMAT` and handed to
    the sink, which converts it to the encoder's format and size. Writing
    `None` finalizes the sink; it must happen exactly once.
*/
pub struct ImageWriter<P: FramePixel, S: FrameSink = Sink> {
    sink: S,
    frames_written: u64,
    finalized: bool,
    _pixel: PhantomData<fn(&P)>,
}

impl<P: FramePixel, S: FrameSink> ImageWriter<P, S> {
    /**
        Wrap an already opened sink.
    */
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            frames_written: 0,
            finalized: false,
            _pixel: PhantomData,
        }
    }

    /**
        Write an image, or finalize the output on `None`.

        Any write after finalizing fails with [`Error::Finalized`].
    */
    pub fn write(&mut self, image: Option<&Image<P>>) -> Result<()> {
        if self.finalized {
            return Err(Error::Finalized);
        }

        match image {
            Some(image) => {
                let frame = image_to_frame(image);
                self.sink.write(Some(&frame))?;
                self.frames_written += 1;
            }
            None => {
                self.finalized = true;
                self.sink.write(None)?;
                debug!(frames = self.frames_written, "image writer finalized");
            }
        }
        Ok(())
    }

    /**
        Number of images handed to the sink.
    */
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /**
        Returns true once `None` has been written.
    */
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /**
        Get the underlying sink.
    */
    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<P: FramePixel, S: FrameSink> Drop for ImageWriter<P, S> {
    fn drop(&mut self) {
        if !self.finalized {
            warn!(
                frames = self.frames_written,
                "image writer dropped without being finalized"
            );
        }
    }
}

impl<P: FramePixel, S: FrameSink + std::fmt::Debug> std::fmt::Debug for ImageWriter<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageWriter")
            .field("format", &P::FORMAT)
            .field("sink", &self.sink)
            .field("frames_written", &self.frames_written)
            .field("finalized", &self.finalized)
            .finish()
    }
}

/**
    Create a video file for writing images of pixel kind `P`.
*/
pub fn try_image_writer<P: FramePixel, Q: AsRef<Path>>(
    path: Q,
    params: EncodingParams,
) -> Result<ImageWriter<P>> {
    Sink::create(path, params).map(ImageWriter::new)
}

/**
    Create a video file for writing images of pixel kind `P`.

    # Panics

    Panics with the underlying error if the file or encoder cannot be set
    up. Use [`try_image_writer`] to handle the error instead.
*/
pub fn image_writer<P: FramePixel, Q: AsRef<Path>>(
    path: Q,
    params: EncodingParams,
) -> ImageWriter<P> {
    let path = path.as_ref();
    match try_image_writer(path, params) {
        Ok(writer) => writer,
        Err(e) => panic!("failed to open {} for writing: {}", path.display(), e),
    }
}
