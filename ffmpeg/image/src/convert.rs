/*!
    Frame to image conversion and back.
*/

use std::ops::Deref;
use std::path::Path;

use image::{DynamicImage, ImageBuffer, ImageError, ImageFormat, Luma, LumaA, Rgb, Rgba};
use tracing::debug;

use ffmpeg_types::{Error, PixelFormat, Result, VideoFrame};

use crate::frame::RawFrame;
use crate::pixel::{FramePixel, FrameSample, Image};

/**
    Copy `height` rows of `row_len` bytes out of a strided buffer.

    The result is tightly packed: `row_len * height` bytes. Row `y` is read
    from `src[y * src_stride..]`.

    `src_stride` must be at least `row_len`, and `src` must hold every row.
    A smaller stride would read overlapping rows; it is only checked in
    debug builds.
*/
pub fn copy_rows(src: &[u8], src_stride: usize, row_len: usize, height: usize) -> Vec<u8> {
    if row_len == 0 || height == 0 {
        return Vec::new();
    }
    debug_assert!(
        src_stride >= row_len,
        "source stride {src_stride} is shorter than row length {row_len}"
    );

    let mut output = Vec::with_capacity(row_len * height);
    for y in 0..height {
        let row_start = y * src_stride;
        output.extend_from_slice(&src[row_start..row_start + row_len]);
    }
    output
}

/**
    Packed bytes of a frame in `format`, or `None` if the format is not packed.
*/
fn packed_bytes<F: RawFrame + ?Sized>(frame: &F, format: PixelFormat) -> Option<Vec<u8>> {
    let bytes_per_pixel = format.bytes_per_pixel()?;
    let row_len = frame.width() as usize * bytes_per_pixel;
    Some(copy_rows(
        frame.data(),
        frame.stride(),
        row_len,
        frame.height() as usize,
    ))
}

/**
    Convert a frame into an image of pixel kind `P`.

    Returns `None` unless the frame's format is exactly `P::FORMAT`; no
    format conversion happens here. A frame with a zero dimension yields an
    empty image.
*/
pub fn to_image<P, F>(frame: &F) -> Option<Image<P>>
where
    P: FramePixel,
    F: RawFrame + ?Sized,
{
    let format = frame.pixel_format()?;
    if format != P::FORMAT {
        debug!(frame_format = ?format, image_format = ?P::FORMAT, "frame format mismatch");
        return None;
    }

    let bytes = packed_bytes(frame, format)?;
    ImageBuffer::from_raw(
        frame.width(),
        frame.height(),
        P::Subpixel::from_frame_bytes(&bytes),
    )
}

/**
    Convert a frame into whichever image kind matches its pixel format.

    Returns `None` for formats without an image counterpart (BGR orders and
    every planar YUV layout) and for FFmpeg layouts outside [`PixelFormat`].
*/
pub fn to_dynamic_image<F: RawFrame + ?Sized>(frame: &F) -> Option<DynamicImage> {
    let Some(format) = frame.pixel_format() else {
        debug!("frame has no known pixel format");
        return None;
    };

    match format {
        PixelFormat::Gray8 => to_image::<Luma<u8>, F>(frame).map(DynamicImage::ImageLuma8),
        PixelFormat::GrayAlpha8 => to_image::<LumaA<u8>, F>(frame).map(DynamicImage::ImageLumaA8),
        PixelFormat::Gray16 => to_image::<Luma<u16>, F>(frame).map(DynamicImage::ImageLuma16),
        PixelFormat::Rgb24 => to_image::<Rgb<u8>, F>(frame).map(DynamicImage::ImageRgb8),
        PixelFormat::Rgba => to_image::<Rgba<u8>, F>(frame).map(DynamicImage::ImageRgba8),
        PixelFormat::Bgr24
        | PixelFormat::Bgra
        | PixelFormat::Yuv420p
        | PixelFormat::Yuv422p
        | PixelFormat::Yuv444p
        | PixelFormat::Nv12 => {
            debug!(?format, planar = format.is_planar(), "no image kind for pixel format");
            None
        }
    }
}

/**
    Save a frame as a PNG file.

    Frames that cannot be converted are skipped and `Ok(())` is returned.
    Failing to write the file is an error.
*/
pub fn save_frame<Q, F>(path: Q, frame: &F) -> Result<()>
where
    Q: AsRef<Path>,
    F: RawFrame + ?Sized,
{
    let path = path.as_ref();
    let Some(image) = to_dynamic_image(frame) else {
        debug!(path = %path.display(), "frame not saved");
        return Ok(());
    };

    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(image_error)?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "saved frame"
    );
    Ok(())
}

/**
    Turn an image into frame-ready raw bytes.
*/
pub fn image_to_frame<P, C>(image: &ImageBuffer<P, C>) -> VideoFrame
where
    P: FramePixel,
    C: Deref<Target = [P::Subpixel]>,
{
    let len = image.width() as usize * image.height() as usize * P::CHANNEL_COUNT as usize;
    let data = P::Subpixel::to_frame_bytes(&image.as_raw()[..len]);
    VideoFrame::new(data, image.width(), image.height(), P::FORMAT)
}

/**
    Turn a dynamic image into frame-ready raw bytes.

    Returns `None` for image kinds without a frame format, such as 16-bit
    color or floating point images.
*/
pub fn dynamic_image_to_frame(image: &DynamicImage) -> Option<VideoFrame> {
    match image {
        DynamicImage::ImageLuma8(buffer) => Some(image_to_frame(buffer)),
        DynamicImage::ImageLumaA8(buffer) => Some(image_to_frame(buffer)),
        DynamicImage::ImageLuma16(buffer) => Some(image_to_frame(buffer)),
        DynamicImage::ImageRgb8(buffer) => Some(image_to_frame(buffer)),
        DynamicImage::ImageRgba8(buffer) => Some(image_to_frame(buffer)),
        other => {
            debug!(color = ?other.color(), "no frame format for image kind");
            None
        }
    }
}

fn image_error(error: ImageError) -> Error {
    match error {
        ImageError::IoError(e) => Error::Io(e),
        other => Error::image(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameView;

    const SUPPORTED: [PixelFormat; 5] = [
        PixelFormat::Gray8,
        PixelFormat::GrayAlpha8,
        PixelFormat::Gray16,
        PixelFormat::Rgb24,
        PixelFormat::Rgba,
    ];

    const UNSUPPORTED: [PixelFormat; 6] = [
        PixelFormat::Bgr24,
        PixelFormat::Bgra,
        PixelFormat::Yuv420p,
        PixelFormat::Yuv422p,
        PixelFormat::Yuv444p,
        PixelFormat::Nv12,
    ];

    fn dynamic_len(image: &DynamicImage) -> usize {
        image.as_bytes().len()
    }

    #[test]
    fn copy_rows_skips_padding() {
        let src: Vec<u8> = (0..16).collect();
        let packed = copy_rows(&src, 8, 3, 2);
        assert_eq!(packed, vec![0, 1, 2, 8, 9, 10]);
    }

    #[test]
    fn padded_frame_converts_to_packed_image() {
        let src: Vec<u8> = (0..16).collect();
        let frame = FrameView::new(&src, 3, 2, 8, PixelFormat::Gray8);

        let image = to_image::<Luma<u8>, _>(&frame).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.as_raw(), &vec![0, 1, 2, 8, 9, 10]);
    }

    #[test]
    fn output_size_is_exact_for_every_supported_format() {
        for format in SUPPORTED {
            let bpp = format.bytes_per_pixel().unwrap();
            for (width, height) in [(0, 0), (0, 5), (4, 0), (1, 1), (7, 3), (16, 9)] {
                let stride = width as usize * bpp + 5;
                let src = vec![0xab; stride * height as usize];
                let frame = FrameView::new(&src, width, height, stride, format);

                let image = to_dynamic_image(&frame).unwrap();
                assert_eq!(
                    dynamic_len(&image),
                    width as usize * height as usize * bpp,
                    "{format:?} {width}x{height}"
                );
            }
        }
    }

    #[test]
    fn unsupported_formats_yield_none() {
        for format in UNSUPPORTED {
            let src = vec![0; 64];
            let frame = FrameView::new(&src, 4, 4, 4, format);
            assert!(to_dynamic_image(&frame).is_none(), "{format:?}");
        }
    }

    #[test]
    fn zero_dimensions_give_empty_image() {
        let frame = FrameView::new(&[], 0, 10, 0, PixelFormat::Rgb24);
        let image = to_image::<Rgb<u8>, _>(&frame).unwrap();
        assert_eq!(image.dimensions(), (0, 10));
        assert!(image.as_raw().is_empty());
    }

    #[test]
    fn generic_conversion_rejects_other_formats() {
        let src = vec![0; 12];
        let frame = FrameView::new(&src, 2, 2, 6, PixelFormat::Rgb24);

        assert!(to_image::<Rgb<u8>, _>(&frame).is_some());
        assert!(to_image::<Rgba<u8>, _>(&frame).is_none());
        assert!(to_image::<Luma<u8>, _>(&frame).is_none());
    }

    #[test]
    fn gray16_keeps_sample_values() {
        let samples: [u16; 4] = [0, 1, 0x1234, u16::MAX];
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        let frame = FrameView::new(&bytes, 2, 2, 4, PixelFormat::Gray16);

        let image = to_image::<Luma<u16>, _>(&frame).unwrap();
        assert_eq!(image.as_raw(), &samples.to_vec());
        assert_eq!(image_to_frame(&image).data, bytes);
    }

    #[test]
    fn frame_image_frame_round_trip() {
        let data: Vec<u8> = (0..3 * 2 * 4).map(|i| (i * 7) as u8).collect();
        let frame = VideoFrame::new(data.clone(), 3, 2, PixelFormat::Rgba);

        let image = to_dynamic_image(&frame).unwrap();
        let back = dynamic_image_to_frame(&image).unwrap();

        assert_eq!(back.format, PixelFormat::Rgba);
        assert_eq!((back.width, back.height), (3, 2));
        assert_eq!(back.data, data);
    }

    #[test]
    fn dynamic_image_without_frame_format() {
        let image = DynamicImage::new_rgb16(2, 2);
        assert!(dynamic_image_to_frame(&image).is_none());
    }

    #[test]
    fn save_frame_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let src = vec![0x40; 4 * 3 * 3];
        let frame = FrameView::new(&src, 4, 3, 12, PixelFormat::Rgb24);

        save_frame(&path, &frame).unwrap();

        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (4, 3));
        assert_eq!(saved.into_rgb8().as_raw(), &src);
    }

    #[test]
    fn save_frame_skips_unsupported_formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let src = vec![0; 24];
        let frame = FrameView::new(&src, 4, 4, 4, PixelFormat::Yuv420p);

        save_frame(&path, &frame).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn save_frame_reports_write_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        let src = vec![0; 4];
        let frame = FrameView::new(&src, 2, 2, 2, PixelFormat::Gray8);

        assert!(save_frame(&path, &frame).is_err());
    }
}
