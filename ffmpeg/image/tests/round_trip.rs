use std::path::Path;

use ffmpeg_image::{
    CodecId, EncodingParams, Error, Source, SourceConfig, image_reader, image_writer, save_frame,
    to_dynamic_image, try_image_reader, try_image_writer,
};
use image::{GrayImage, Luma, Rgb, RgbImage};

const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn params() -> EncodingParams {
    EncodingParams::new(WIDTH, HEIGHT).with_codec(CodecId::Mpeg4)
}

fn write_gradient_video(path: &Path, frames: u8) {
    let mut writer = image_writer::<Rgb<u8>, _>(path, params());
    for i in 0..frames {
        let image = RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
            Rgb([(x * 4) as u8, (y * 5) as u8, i.wrapping_mul(60)])
        });
        writer.write(Some(&image)).unwrap();
    }
    writer.write(None).unwrap();
    assert_eq!(writer.frames_written(), frames as u64);
}

#[test]
fn written_images_read_back() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gradient.avi");
    write_gradient_video(&path, 3);

    let mut reader = image_reader::<Rgb<u8>, _>(&path);
    let mut count = 0;
    let mut last_time = -1.0;
    while let Some((image, seconds)) = reader.read_with_time().unwrap() {
        assert_eq!(image.dimensions(), (WIDTH, HEIGHT));
        assert_eq!(image.as_raw().len(), (WIDTH * HEIGHT * 3) as usize);
        assert!(seconds > last_time);
        last_time = seconds;
        count += 1;
    }
    assert_eq!(count, 3);

    // Exhausted readers stay exhausted
    assert!(reader.read().unwrap().is_none());
    reader.close();
}

#[test]
fn reader_iterates_in_requested_pixel_kind() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gray.avi");

    let mut writer = try_image_writer::<Luma<u8>, _>(&path, params()).unwrap();
    for shade in [16u8, 128, 235] {
        writer
            .write(Some(&GrayImage::from_pixel(WIDTH, HEIGHT, Luma([shade]))))
            .unwrap();
    }
    writer.write(None).unwrap();

    let reader = try_image_reader::<Luma<u8>, _>(&path).unwrap();
    let images: Vec<_> = reader.map(|item| item.unwrap().0).collect();
    assert_eq!(images.len(), 3);

    // Flat gray survives lossy coding closely
    let center = images[1].get_pixel(WIDTH / 2, HEIGHT / 2)[0];
    assert!(center.abs_diff(128) < 16, "center pixel {center}");
}

#[test]
fn decoded_frames_save_as_png() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("clip.avi");
    write_gradient_video(&video, 1);

    let mut source = Source::open(&video, SourceConfig::default()).unwrap();
    let (frame, _) = source.next_frame().unwrap().unwrap();
    let png = dir.path().join("frame.png");
    save_frame(&png, frame).unwrap();
    assert!(to_dynamic_image(frame).is_some());
    source.close();

    let saved = image::open(&png).unwrap();
    assert_eq!((saved.width(), saved.height()), (WIDTH, HEIGHT));
}

#[test]
fn missing_input_is_recoverable() {
    let result = try_image_reader::<Rgb<u8>, _>("/nonexistent/clip.avi");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
#[should_panic(expected = "failed to open")]
fn missing_input_is_fatal_in_plain_form() {
    image_reader::<Rgb<u8>, _>("/nonexistent/clip.avi");
}
