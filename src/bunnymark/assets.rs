//! Bunny sprite
//!
//! Loads a PNG when one is configured, otherwise paints a small bunny into
//! an image at startup so the benchmark runs with no asset files at all.

use std::path::Path;

use macroquad::prelude::*;

pub const BUNNY_WIDTH: u16 = 26;
pub const BUNNY_HEIGHT: u16 = 37;

/// Load the sprite texture, falling back to the built-in bunny.
pub async fn load_sprite(path: Option<&Path>) -> Texture2D {
    if let Some(path) = path {
        match load_texture(&path.to_string_lossy()).await {
            Ok(texture) => {
                texture.set_filter(FilterMode::Nearest);
                log::info!("loaded sprite {}", path.display());
                return texture;
            }
            Err(e) => log::warn!("failed to load sprite {}: {}, using built-in bunny", path.display(), e),
        }
    }
    let texture = Texture2D::from_image(&bunny_image());
    texture.set_filter(FilterMode::Nearest);
    texture
}

/// Paint the built-in bunny: two ears, a round head, a body, two eyes.
pub fn bunny_image() -> Image {
    let mut image = Image::gen_image_color(BUNNY_WIDTH, BUNNY_HEIGHT, BLANK);
    let fur = Color::from_rgba(245, 245, 245, 255);
    let inner_ear = Color::from_rgba(240, 170, 190, 255);
    let eye = Color::from_rgba(30, 30, 40, 255);

    for y in 0..BUNNY_HEIGHT as u32 {
        for x in 0..BUNNY_WIDTH as u32 {
            let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
            let color = if in_ellipse(fx, fy, 13.0, 28.0, 10.0, 8.5) || in_ellipse(fx, fy, 13.0, 19.0, 8.0, 7.0) {
                Some(fur)
            } else if in_ellipse(fx, fy, 8.5, 7.0, 1.2, 5.0) || in_ellipse(fx, fy, 17.5, 7.0, 1.2, 5.0) {
                Some(inner_ear)
            } else if in_ellipse(fx, fy, 8.5, 7.5, 2.8, 7.5) || in_ellipse(fx, fy, 17.5, 7.5, 2.8, 7.5) {
                Some(fur)
            } else {
                None
            };
            if let Some(color) = color {
                image.set_pixel(x, y, color);
            }
        }
    }

    image.set_pixel(10, 18, eye);
    image.set_pixel(16, 18, eye);
    image
}

fn in_ellipse(x: f32, y: f32, cx: f32, cy: f32, rx: f32, ry: f32) -> bool {
    let dx = (x - cx) / rx;
    let dy = (y - cy) / ry;
    dx * dx + dy * dy <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bunny_image_shape() {
        let image = bunny_image();
        assert_eq!(image.width(), BUNNY_WIDTH as usize);
        assert_eq!(image.height(), BUNNY_HEIGHT as usize);

        // Corners are transparent, the belly is opaque
        assert_eq!(image.get_pixel(0, 0).a, 0.0);
        assert_eq!(image.get_pixel(25, 36).a, 0.0);
        assert_eq!(image.get_pixel(13, 28).a, 1.0);
        // Gap between the ears
        assert_eq!(image.get_pixel(13, 2).a, 0.0);
    }
}
