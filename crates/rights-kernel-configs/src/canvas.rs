//! The shared pixel canvas.

use std::cmp::Ordering;
use std::fmt;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use rights_kernel_core::ItemPolicy;

use crate::error::{ConfigError, Result};

/// One grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub x: u32,
    pub y: u32,
}

impl Pixel {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Pixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color([u8; 3]);

impl Color {
    pub const WHITE: Color = Color([0xff, 0xff, 0xff]);

    pub fn parse(text: &str) -> Result<Self> {
        let digits = text
            .strip_prefix('#')
            .ok_or_else(|| ConfigError::InvalidColor(text.to_string()))?;
        let mut rgb = [0u8; 3];
        hex::decode_to_slice(digits, &mut rgb)
            .map_err(|_| ConfigError::InvalidColor(text.to_string()))?;
        Ok(Self(rgb))
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode(self.0))
    }
}

/// Pixels must lie on the canvas; they are ordered row by row.
#[derive(Debug, Clone, Copy)]
pub struct PixelPolicy {
    width: u32,
    height: u32,
}

impl PixelPolicy {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl ItemPolicy<Pixel> for PixelPolicy {
    fn insist_item(&self, pixel: &Pixel) -> std::result::Result<(), String> {
        if pixel.x >= self.width || pixel.y >= self.height {
            return Err(format!(
                "pixel {pixel} is outside the {}x{} canvas",
                self.width, self.height
            ));
        }
        Ok(())
    }

    fn compare(&self, left: &Pixel, right: &Pixel) -> Ordering {
        (left.y, left.x).cmp(&(right.y, right.x))
    }
}

/// Colours of every pixel, shared by a mint and all its descendants.
pub struct Canvas {
    width: u32,
    height: u32,
    cells: RwLock<Vec<Color>>,
}

impl Canvas {
    /// An all-white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: RwLock::new(vec![Color::WHITE; width as usize * height as usize]),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn policy(&self) -> PixelPolicy {
        PixelPolicy::new(self.width, self.height)
    }

    /// Every pixel, in policy order.
    pub fn pixels(&self) -> Vec<Pixel> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| Pixel::new(x, y)))
            .collect()
    }

    pub fn color_at(&self, pixel: Pixel) -> Result<Color> {
        let index = self.index(pixel)?;
        let cells = self
            .cells
            .read()
            .map_err(|e| ConfigError::Canvas(format!("lock poisoned: {e}")))?;
        Ok(cells[index])
    }

    pub(crate) fn set_color(&self, pixel: Pixel, color: Color) -> Result<()> {
        let index = self.index(pixel)?;
        let mut cells = self
            .cells
            .write()
            .map_err(|e| ConfigError::Canvas(format!("lock poisoned: {e}")))?;
        cells[index] = color;
        Ok(())
    }

    fn index(&self, pixel: Pixel) -> Result<usize> {
        if pixel.x >= self.width || pixel.y >= self.height {
            return Err(ConfigError::OutOfCanvas {
                x: pixel.x,
                y: pixel.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pixel.y as usize * self.width as usize + pixel.x as usize)
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_parse_and_display() {
        let color = Color::parse("#ff8000").unwrap();
        assert_eq!(color.rgb(), [0xff, 0x80, 0x00]);
        assert_eq!(color.to_string(), "#ff8000");
        assert!(Color::parse("ff8000").is_err());
        assert!(Color::parse("#ff80").is_err());
        assert!(Color::parse("#gg0000").is_err());
    }

    #[test]
    fn test_canvas_bounds() {
        let canvas = Canvas::new(3, 2);
        assert_eq!(canvas.pixels().len(), 6);
        assert_eq!(canvas.color_at(Pixel::new(2, 1)).unwrap(), Color::WHITE);
        assert!(matches!(
            canvas.color_at(Pixel::new(3, 0)),
            Err(ConfigError::OutOfCanvas { .. })
        ));
        assert!(canvas.policy().insist_item(&Pixel::new(0, 2)).is_err());
    }

    #[test]
    fn test_pixel_element_key_is_a_map() {
        let mut buf = Vec::new();
        ciborium::into_writer(&Pixel::new(1, 4), &mut buf).unwrap();
        // {"x": 1, "y": 4}
        assert_eq!(buf, vec![0xa2, 0x61, 0x78, 0x01, 0x61, 0x79, 0x04]);
    }

    proptest::proptest! {
        #[test]
        fn test_policy_and_canvas_agree_on_bounds(
            width in 1u32..16,
            height in 1u32..16,
            x in 0u32..32,
            y in 0u32..32,
        ) {
            let canvas = Canvas::new(width, height);
            let pixel = Pixel::new(x, y);
            let on_canvas = x < width && y < height;
            proptest::prop_assert_eq!(canvas.policy().insist_item(&pixel).is_ok(), on_canvas);
            proptest::prop_assert_eq!(canvas.color_at(pixel).is_ok(), on_canvas);
        }
    }
}
