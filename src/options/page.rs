use serde::{Deserialize, Serialize};

use crate::fold::PageGeometry;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Source page size; every fold segment is derived from it.
pub struct PageOptions {
    /// Page width in source pixels.
    pub width_px: f32,
    /// Page height in source pixels.
    pub height_px: f32,
    /// Pixels per world unit.
    pub scale: f32,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            width_px: 2598.0,
            height_px: 3626.0,
            scale: 100.0,
        }
    }
}

impl PageOptions {
    /// World-space page geometry. A non-positive scale falls back to 1.
    #[must_use]
    pub fn geometry(&self) -> PageGeometry {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        PageGeometry::from_pixels(self.width_px.abs(), self.height_px.abs(), scale)
    }
}
