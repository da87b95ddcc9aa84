use tdview_core::render::DisplayImage;

/// Convert a composed (height, width, 3) RGB image to an egui ColorImage.
pub fn display_to_color_image(image: &DisplayImage) -> egui::ColorImage {
    let (h, w, _) = image.dim();
    let mut pixels = Vec::with_capacity(h * w);

    for row in 0..h {
        for col in 0..w {
            pixels.push(egui::Color32::from_rgb(
                image[[row, col, 0]],
                image[[row, col, 1]],
                image[[row, col, 2]],
            ));
        }
    }

    egui::ColorImage {
        size: [w, h],
        pixels,
        source_size: Default::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixels_are_row_major() {
        let mut image = DisplayImage::zeros((2, 3, 3));
        image[[1, 2, 0]] = 200;
        image[[1, 2, 1]] = 100;

        let color = display_to_color_image(&image);
        assert_eq!(color.size, [3, 2]);
        assert_eq!(color.pixels[5], egui::Color32::from_rgb(200, 100, 0));
        assert_eq!(color.pixels[0], egui::Color32::from_rgb(0, 0, 0));
    }
}
