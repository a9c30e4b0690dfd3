/*!
    Conversion between FFmpeg video frames and `image` buffers.

    The core is a stride-aware row copy: a decoded frame may pad each row,
    an image buffer never does. [`to_dynamic_image`] picks the image kind
    from the frame's pixel format, [`to_image`] requires one kind chosen at
    compile time. Formats without an image counterpart give `None`.

    [`ImageReader`] and [`ImageWriter`] wrap a frame source and sink so a
    video file can be read or written as a sequence of images.

    # Example

    ```ignore
    use image::Rgb;

    let mut reader = ffmpeg_image::image_reader::<Rgb<u8>, _>("input.mp4");
    while let Some(image) = reader.read()? {
        println!("{}x{}", image.width(), image.height());
    }
    reader.close();
    ```
*/

pub use ffmpeg_sink::{EncodingParams, FrameSink, Sink};
pub use ffmpeg_source::{Source, SourceConfig};
pub use ffmpeg_types::{CodecId, Error, PixelFormat, Result, VideoFrame};

mod convert;
mod frame;
mod pixel;
mod reader;
mod writer;

pub use convert::{
    copy_rows, dynamic_image_to_frame, image_to_frame, save_frame, to_dynamic_image, to_image,
};
pub use frame::{FrameView, RawFrame};
pub use pixel::{FramePixel, FrameSample, Image};
pub use reader::{ImageReader, image_reader, try_image_reader};
pub use writer::{ImageWriter, image_writer, try_image_writer};
