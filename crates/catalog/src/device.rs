//! Device families and canvas sizes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Target raster size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

/// Canvas orientation, derived from the aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Portrait when strictly taller than wide; squares count as landscape.
    pub fn orientation(&self) -> Orientation {
        if self.height > self.width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    pub fn is_portrait(&self) -> bool {
        self.orientation() == Orientation::Portrait
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A device family and the screenshot sizes App Store Connect accepts for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTarget {
    /// Device name, used as the top-level output directory.
    pub name: String,

    pub sizes: Vec<CanvasSize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation() {
        assert_eq!(CanvasSize::new(1284, 2778).orientation(), Orientation::Portrait);
        assert_eq!(CanvasSize::new(2778, 1284).orientation(), Orientation::Landscape);
        assert_eq!(CanvasSize::new(100, 100).orientation(), Orientation::Landscape);
    }

    #[test]
    fn test_display() {
        assert_eq!(CanvasSize::new(1242, 2688).to_string(), "1242x2688");
    }
}
