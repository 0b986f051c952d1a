use image::{Rgba, RgbaImage};

use crate::pgm::HeightGrid;

/// One pixel per height sample, `width = columns`, `height = rows`.
pub type PixelBuffer = RgbaImage;

/*
    The terrain engine reads the height of a pixel as

    height = R * 256 + G

    which is a two digit number in base 256. So R is the high byte and G the
    low byte of the 16 bit sample. B is unused and stays 0, A is fully opaque.
*/
pub fn height_to_rgba(sample: u16) -> Rgba<u8> {
    let high = (sample / 256) as u8;
    let low = (sample % 256) as u8;

    Rgba([high, low, 0, 255])
}

pub fn encode(grid: &HeightGrid) -> PixelBuffer {
    let (w, h) = grid.dimensions();
    let mut buffer = RgbaImage::new(w as u32, h as u32);

    for x in 0..w {
        for y in 0..h {
            buffer.put_pixel(x as u32, y as u32, height_to_rgba(grid.sample(x, y)));
        }
    }

    buffer
}
