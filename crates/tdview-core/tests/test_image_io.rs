use ndarray::Array3;

use tdview_core::io::image_io::{save_display_image, scale_nearest, to_rgb_image};
use tdview_core::render::DisplayImage;

fn gradient(width: usize, height: usize) -> DisplayImage {
    Array3::from_shape_fn((height, width, 3), |(r, c, ch)| match ch {
        0 => (c * 40) as u8,
        1 => (r * 40) as u8,
        _ => 0,
    })
}

#[test]
fn test_rgb_image_layout() {
    let rgb = to_rgb_image(&gradient(3, 2)).unwrap();
    assert_eq!(rgb.dimensions(), (3, 2));
    assert_eq!(rgb.get_pixel(2, 1).0, [80, 40, 0]);
}

#[test]
fn test_nearest_scaling_repeats_pixels() {
    let rgb = to_rgb_image(&gradient(3, 2)).unwrap();
    let scaled = scale_nearest(&rgb, 2.0);
    assert_eq!(scaled.dimensions(), (6, 4));
    assert_eq!(scaled.get_pixel(4, 2), rgb.get_pixel(2, 1));
    assert_eq!(scaled.get_pixel(5, 3), rgb.get_pixel(2, 1));

    assert_eq!(scale_nearest(&rgb, 1.0), rgb);
}

#[test]
fn test_save_png_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.png");
    let image = gradient(5, 4);

    save_display_image(&image, 1.0, &path).unwrap();
    let loaded = image::open(&path).unwrap().to_rgb8();
    assert_eq!(loaded, to_rgb_image(&image).unwrap());
}

#[test]
fn test_save_zoomed_tiff() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("frame.tif");

    save_display_image(&gradient(4, 3), 3.0, &path).unwrap();
    let loaded = image::open(&path).unwrap();
    assert_eq!((loaded.width(), loaded.height()), (12, 9));
}
