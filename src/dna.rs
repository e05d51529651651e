use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::render::Canvas;

/// one alpha-blended triangle. color is straight (un-premultiplied) 8-bit RGB.
///
/// genes are plain values: copying one into an offspring never aliases the parent,
/// and a mutation always swaps in a brand-new gene instead of editing this one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    pub rgb: [u8; 3],
    pub alpha: u8,
    pub points: [(f32, f32); 3], // each within [0, width) x [0, height)
}

impl Gene {
    /// uniformly random triangle on the canvas.
    ///
    /// `visible = false` gives a fully transparent gene (alpha 0), which is only
    /// used to seed the initial population. `visible = true` uses the canvas'
    /// visible alpha and is what mutation inserts.
    ///
    /// draw order is fixed so seeded runs replay exactly: red, green, blue,
    /// then x/y of each of the three vertices. alpha consumes no randomness.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, canvas: &Canvas, visible: bool) -> Self {
        profiling::scope!("Gene::random");
        let w = canvas.width() as f32;
        let h = canvas.height() as f32;

        let rgb = [rng.random::<u8>(), rng.random::<u8>(), rng.random::<u8>()];
        let alpha = if visible { canvas.visible_alpha() } else { 0 };

        let mut points = [(0.0, 0.0); 3];
        for point in &mut points {
            let x = rng.random_range(0.0..w);
            let y = rng.random_range(0.0..h);
            *point = (x, y);
        }

        Self { rgb, alpha, points }
    }

    /// a gene with alpha 0 never changes the raster
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.alpha > 0
    }

    /// unsigned triangle area in square pixels. zero for collinear vertices.
    #[inline]
    pub fn area(&self) -> f32 {
        crate::geom::polygon_area(&self.points)
    }
}
