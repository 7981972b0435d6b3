use image::RgbaImage;

use crate::types::SpriteImage;

impl SpriteImage {
    /// Hands the decoded buffer to the `image` crate, e.g. for PNG export.
    pub fn to_rgba8(&self) -> RgbaImage {
        RgbaImage::from_raw(self.size, self.size, self.pixels.clone())
            .expect("sprite buffer length matches its dimensions")
    }
}
