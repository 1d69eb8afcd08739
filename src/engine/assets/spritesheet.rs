//! Slicing a spritesheet image into equally sized frames.

use crate::engine::error::AssetError;

/// A rectangle inside a texture, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// UV rectangle `[u0, v0, u1, v1]` inside a texture of the given size.
    pub fn uv(&self, texture_width: u32, texture_height: u32) -> [f32; 4] {
        let w = texture_width as f32;
        let h = texture_height as f32;
        [
            self.x as f32 / w,
            self.y as f32 / h,
            (self.x + self.width) as f32 / w,
            (self.y + self.height) as f32 / h,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpritesheetConfig {
    pub frame_width: u32,
    pub frame_height: u32,
    /// Border around the whole sheet.
    pub margin: u32,
    /// Gap between neighbouring frames.
    pub spacing: u32,
    pub start_frame: usize,
    /// Last frame to keep, inclusive. `None` keeps everything after `start_frame`.
    pub end_frame: Option<usize>,
}

impl SpritesheetConfig {
    pub fn new(frame_width: u32, frame_height: u32) -> Self {
        Self {
            frame_width,
            frame_height,
            margin: 0,
            spacing: 0,
            start_frame: 0,
            end_frame: None,
        }
    }

    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_spacing(mut self, spacing: u32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn with_range(mut self, start_frame: usize, end_frame: Option<usize>) -> Self {
        self.start_frame = start_frame;
        self.end_frame = end_frame;
        self
    }

    /// Cuts a `width` x `height` image into frames, row by row. Kept frames are
    /// renumbered from zero. An empty result means the frame does not fit.
    pub fn slice(&self, width: u32, height: u32) -> Result<Vec<Frame>, AssetError> {
        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(AssetError::InvalidFrameSize {
                width: self.frame_width,
                height: self.frame_height,
            });
        }

        let overflow = || AssetError::FrameGeometry {
            frame_width: self.frame_width,
            frame_height: self.frame_height,
            margin: self.margin,
            spacing: self.spacing,
        };
        let columns = fit(width, self.frame_width, self.margin, self.spacing).ok_or_else(overflow)?;
        let rows = fit(height, self.frame_height, self.margin, self.spacing).ok_or_else(overflow)?;
        let total = columns as usize * rows as usize;
        if total == 0 {
            return Ok(Vec::new());
        }
        let last = self.end_frame.map_or(total - 1, |end| end.min(total - 1));

        let mut frames = Vec::new();
        for index in self.start_frame..=last {
            let column = (index % columns as usize) as u32;
            let row = (index / columns as usize) as u32;
            let x = offset(self.margin, column, self.frame_width, self.spacing).ok_or_else(overflow)?;
            let y = offset(self.margin, row, self.frame_height, self.spacing).ok_or_else(overflow)?;
            frames.push(Frame::new(x, y, self.frame_width, self.frame_height));
        }
        Ok(frames)
    }
}

/// How many frames fit along one axis, `None` if the geometry overflows.
fn fit(extent: u32, frame: u32, margin: u32, spacing: u32) -> Option<u32> {
    let step = frame.checked_add(spacing)?;
    let usable = extent.saturating_sub(margin.checked_mul(2)?).checked_add(spacing)?;
    Some(usable / step)
}

fn offset(margin: u32, cell: u32, frame: u32, spacing: u32) -> Option<u32> {
    let start = margin.checked_add(cell.checked_mul(frame.checked_add(spacing)?)?)?;
    start.checked_add(frame)?;
    Some(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn slices_row_major() {
        let frames = SpritesheetConfig::new(32, 48).slice(96, 96).unwrap();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[0], Frame::new(0, 0, 32, 48));
        assert_eq!(frames[2], Frame::new(64, 0, 32, 48));
        assert_eq!(frames[3], Frame::new(0, 48, 32, 48));
        assert_eq!(frames[5], Frame::new(64, 48, 32, 48));
    }

    #[test]
    fn honours_margin_and_spacing() {
        let config = SpritesheetConfig::new(16, 16).with_margin(1).with_spacing(2);
        // 1 + 16 + 2 + 16 + 1 = 36
        let frames = config.slice(36, 18).unwrap();
        assert_eq!(frames, vec![Frame::new(1, 1, 16, 16), Frame::new(19, 1, 16, 16)]);
    }

    #[test_case(0, None, 4 ; "everything")]
    #[test_case(1, None, 3 ; "skip first")]
    #[test_case(1, Some(2), 2 ; "middle pair")]
    #[test_case(0, Some(99), 4 ; "end clamped")]
    #[test_case(5, None, 0 ; "start past the end")]
    fn frame_range(start: usize, end: Option<usize>, expected: usize) {
        let config = SpritesheetConfig::new(8, 8).with_range(start, end);
        assert_eq!(config.slice(16, 16).unwrap().len(), expected);
    }

    #[test]
    fn range_is_renumbered_from_zero() {
        let frames = SpritesheetConfig::new(8, 8)
            .with_range(1, Some(2))
            .slice(16, 16)
            .unwrap();
        assert_eq!(frames[0], Frame::new(8, 0, 8, 8));
        assert_eq!(frames[1], Frame::new(0, 8, 8, 8));
    }

    #[test]
    fn oversized_frame_yields_nothing() {
        assert!(SpritesheetConfig::new(64, 64).slice(32, 32).unwrap().is_empty());
    }

    #[test]
    fn zero_sized_frame_is_an_error() {
        assert!(matches!(
            SpritesheetConfig::new(0, 16).slice(32, 32),
            Err(AssetError::InvalidFrameSize { .. })
        ));
    }

    #[test_case(SpritesheetConfig::new(8, 8).with_margin(u32::MAX / 2 + 1) ; "margin")]
    #[test_case(SpritesheetConfig::new(8, 8).with_spacing(u32::MAX) ; "spacing")]
    #[test_case(SpritesheetConfig::new(u32::MAX, 8).with_spacing(1) ; "frame plus spacing")]
    fn overflowing_geometry_is_an_error(config: SpritesheetConfig) {
        assert!(matches!(config.slice(16, 16), Err(AssetError::FrameGeometry { .. })));
    }

    #[test]
    fn uv_covers_frame() {
        let uv = Frame::new(16, 0, 16, 32).uv(64, 32);
        assert_eq!(uv, [0.25, 0.0, 0.5, 1.0]);
    }
}
