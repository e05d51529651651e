// Fitness module organization
// the target image, the normalized score and the diagnostics derived from it

pub mod metrics;
pub mod sad;

pub use metrics::MetricsSnapshot;
pub use sad::{sad_rgb, sad_rgba_vs_rgb};

use image::RgbImage;
use std::path::Path;
use tiny_skia as sk;

use crate::error::{EvolveError, Result};
use crate::render::Canvas;
use crate::settings::Settings;

/// the image being approximated, paired with the canvas every genome is drawn on.
/// construction guarantees both share the same dimensions.
#[derive(Clone, Debug)]
pub struct Target {
    image: RgbImage,
    canvas: Canvas,
}

impl Target {
    pub fn new(image: RgbImage, canvas: Canvas) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(EvolveError::EmptyTarget);
        }
        if image.dimensions() != canvas.dimensions() {
            return Err(EvolveError::DimensionMismatch {
                expected: canvas.dimensions(),
                actual: image.dimensions(),
            });
        }
        Ok(Self { image, canvas })
    }

    /// canvas sized to the image, drawing parameters taken from the settings
    pub fn from_image(image: RgbImage, settings: &Settings) -> Result<Self> {
        let canvas = Canvas::from_settings(settings, image.width(), image.height())?;
        Self::new(image, canvas)
    }

    /// load any format the `image` crate decodes, flattened to 3-channel RGB
    pub fn open(path: &Path, settings: &Settings) -> Result<Self> {
        profiling::scope!("Target::open");
        let image = image::open(path)?.to_rgb8();
        Self::from_image(image, settings)
    }

    #[inline]
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    #[inline]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    #[inline]
    pub fn num_pixels(&self) -> usize {
        (self.image.width() as usize) * (self.image.height() as usize)
    }

    /// largest SAD any render can reach against this target
    #[inline]
    pub fn max_sad(&self) -> u64 {
        self.num_pixels() as u64 * metrics::FITNESS_CHANNELS * 255
    }

    /// SAD of a pixmap rendered on this target's canvas
    #[inline]
    pub fn sad_pixmap(&self, rendered: &sk::Pixmap) -> u64 {
        sad_rgba_vs_rgb(rendered.data(), self.image.as_raw(), self.image.width())
    }
}

/// normalized error in [0, 1]: total SAD over the largest possible SAD
#[inline]
pub fn normalized_error(sad: u64, max_sad: u64) -> f64 {
    if max_sad == 0 {
        return 0.0;
    }
    sad as f64 / max_sad as f64
}

/// 1 / (1 + error): zero error maps to 1, strictly decreasing in the error
#[inline]
pub fn fitness_from_error(error: f64) -> f64 {
    1.0 / (1.0 + error)
}

/// score an arbitrary RGB render against the target
pub fn score(rendered: &RgbImage, target: &Target) -> Result<f64> {
    profiling::scope!("score");
    if rendered.dimensions() != target.dimensions() {
        return Err(EvolveError::DimensionMismatch {
            expected: target.dimensions(),
            actual: rendered.dimensions(),
        });
    }
    let sad = sad_rgb(rendered.as_raw(), target.image().as_raw());
    Ok(fitness_from_error(normalized_error(sad, target.max_sad())))
}
