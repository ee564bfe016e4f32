//! RGBA8 pixel surfaces.

/// A 2D RGBA pixel buffer (8 bits per channel, row-major).
///
/// A freshly created surface is fully transparent black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize * 4;
        Self {
            width,
            height,
            data: vec![0; size],
        }
    }

    /// Wrap existing RGBA bytes.
    ///
    /// Returns `None` when `data` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the surface, returning its RGBA bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// True when every byte is zero, i.e. the surface equals a new one.
    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Copy `src` into this surface with its origin placed at `(dx, dy)`.
    ///
    /// Offsets may be negative; anything outside either surface is clipped.
    /// Pixels are copied, not composited.
    pub fn draw(&mut self, src: &Surface, dx: i64, dy: i64) {
        let x_start = dx.max(0);
        let y_start = dy.max(0);
        let x_end = (dx + src.width as i64).min(self.width as i64);
        let y_end = (dy + src.height as i64).min(self.height as i64);
        if x_start >= x_end || y_start >= y_end {
            return;
        }

        let row_bytes = (x_end - x_start) as usize * 4;
        for y in y_start..y_end {
            let dst = self.offset(x_start as u32, y as u32);
            let src_off = src.offset((x_start - dx) as u32, (y - dy) as u32);
            self.data[dst..dst + row_bytes]
                .copy_from_slice(&src.data[src_off..src_off + row_bytes]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Surface {
        let mut s = Surface::new(width, height);
        for y in 0..height {
            for x in 0..width {
                s.put_pixel(x, y, [x as u8, y as u8, 7, 255]);
            }
        }
        s
    }

    #[test]
    fn test_new_is_blank() {
        let s = Surface::new(20, 20);
        assert_eq!(s.as_bytes().len(), 20 * 20 * 4);
        assert!(s.is_blank());
    }

    #[test]
    fn test_from_rgba_validates_length() {
        assert!(Surface::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(Surface::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_draw_negative_offset_selects_region() {
        let sheet = gradient(10, 4);
        let mut frame = Surface::new(4, 4);
        frame.draw(&sheet, -4, 0);

        assert_eq!(frame.pixel(0, 0), [4, 0, 7, 255]);
        assert_eq!(frame.pixel(3, 3), [7, 3, 7, 255]);
    }

    #[test]
    fn test_draw_clips_to_source() {
        // Source shorter and narrower than what remains of the destination.
        let sheet = gradient(6, 2);
        let mut frame = Surface::new(4, 4);
        frame.draw(&sheet, -4, 0);

        assert_eq!(frame.pixel(1, 1), [5, 1, 7, 255]);
        assert_eq!(frame.pixel(2, 0), [0, 0, 0, 0]);
        assert_eq!(frame.pixel(0, 2), [0, 0, 0, 0]);
    }

    #[test]
    fn test_draw_fully_outside_is_noop() {
        let sheet = gradient(4, 4);
        let mut frame = Surface::new(4, 4);
        frame.draw(&sheet, -4, 0);
        assert!(frame.is_blank());
        frame.draw(&sheet, 4, 4);
        assert!(frame.is_blank());
    }
}
