/*!
    Reading video files as a sequence of images.
*/

use std::marker::PhantomData;
use std::path::Path;

use ffmpeg_source::{Source, SourceConfig};
use ffmpeg_types::{Error, Result};

use crate::convert::to_image;
use crate::pixel::{FramePixel, Image};

/**
    Decodes a video file into images of pixel kind `P`.

    The source is asked for `P::FORMAT`, so every decoded frame converts
    without a format mismatch. Iterating yields `(image, seconds)` pairs.
*/
pub struct ImageReader<P: FramePixel> {
    source: Source,
    _pixel: PhantomData<fn() -> P>,
}

impl<P: FramePixel> ImageReader<P> {
    /**
        Open a video file for reading.
    */
    pub fn open<Q: AsRef<Path>>(path: Q) -> Result<Self> {
        let source = Source::open(path, SourceConfig::new(P::FORMAT))?;
        Ok(Self {
            source,
            _pixel: PhantomData,
        })
    }

    /**
        Read the next image, or `None` at the end of the stream.
    */
    pub fn read(&mut self) -> Result<Option<Image<P>>> {
        Ok(self.read_with_time()?.map(|(image, _)| image))
    }

    /**
        Read the next image with its presentation time in seconds.
    */
    pub fn read_with_time(&mut self) -> Result<Option<(Image<P>, f64)>> {
        let Some((frame, seconds)) = self.source.next_frame()? else {
            return Ok(None);
        };

        let image = to_image::<P, _>(frame).ok_or_else(|| {
            Error::unsupported_format(format!(
                "decoded frame is {:?}, expected {:?}",
                frame.format(),
                P::FORMAT
            ))
        })?;
        Ok(Some((image, seconds)))
    }

    /**
        Get the underlying frame source.
    */
    pub fn source(&self) -> &Source {
        &self.source
    }

    /**
        Close the reader and release the decoder.
    */
    pub fn close(self) {
        self.source.close();
    }
}

impl<P: FramePixel> Iterator for ImageReader<P> {
    type Item = Result<(Image<P>, f64)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_with_time().transpose()
    }
}

impl<P: FramePixel> std::fmt::Debug for ImageReader<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageReader")
            .field("format", &P::FORMAT)
            .field("source", &self.source)
            .finish()
    }
}

/**
    Open a video file for reading images of pixel kind `P`.
*/
pub fn try_image_reader<P: FramePixel, Q: AsRef<Path>>(path: Q) -> Result<ImageReader<P>> {
    ImageReader::open(path)
}

/**
    Open a video file for reading images of pixel kind `P`.

    # Panics

    Panics with the underlying error if the file cannot be opened. Use
    [`try_image_reader`] to handle the error instead.
*/
pub fn image_reader<P: FramePixel, Q: AsRef<Path>>(path: Q) -> ImageReader<P> {
    let path = path.as_ref();
    match try_image_reader(path) {
        Ok(reader) => reader,
        Err(e) => panic!("failed to open {} for reading: {}", path.display(), e),
    }
}
