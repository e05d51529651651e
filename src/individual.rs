use image::RgbImage;
use rand::Rng;

use crate::dna::Gene;
use crate::error::Result;
use crate::fitness::{self, MetricsSnapshot, Target};
use crate::render::{Canvas, CpuRenderer};

/// one candidate approximation: an ordered triangle list plus its score.
///
/// fitness is computed exactly once, when the gene sequence is final, and both
/// fields stay read-only afterwards. a "mutated" individual is always a new value.
#[derive(Clone, Debug)]
pub struct Individual {
    genes: Vec<Gene>,
    fitness: f64,
}

impl Individual {
    /// score an explicit gene sequence against the target
    pub fn from_genes(genes: Vec<Gene>, target: &Target) -> Self {
        profiling::scope!("Individual::from_genes");
        let rendered = CpuRenderer::render_premul(&genes, target.canvas());
        let sad = target.sad_pixmap(&rendered);
        let fitness = fitness::fitness_from_error(fitness::normalized_error(sad, target.max_sad()));
        Self { genes, fitness }
    }

    /// `size` fully transparent random genes. every such individual scores the
    /// blank-background fitness; mutation is what makes triangles visible.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, size: usize, target: &Target) -> Self {
        profiling::scope!("Individual::random");
        let canvas = target.canvas();
        let genes = (0..size).map(|_| Gene::random(rng, canvas, false)).collect();
        Self::from_genes(genes, target)
    }

    /// uniform crossover followed by per-gene replacement mutation.
    ///
    /// every position draws a fair coin for `a` vs `b` first; only after the whole
    /// sequence is assembled does each position draw its mutation decision (and,
    /// when it fires, the fresh visible gene) in index order.
    ///
    /// `mutation_rate` must lie in [0, 1] (checked by `Settings::validate`).
    pub fn from_parents<R: Rng + ?Sized>(
        rng: &mut R,
        a: &Individual,
        b: &Individual,
        mutation_rate: f64,
        target: &Target,
    ) -> Self {
        profiling::scope!("Individual::from_parents");
        debug_assert_eq!(a.genes.len(), b.genes.len());

        let mut genes: Vec<Gene> = a
            .genes
            .iter()
            .zip(&b.genes)
            .map(|(ga, gb)| if rng.random_bool(0.5) { *ga } else { *gb })
            .collect();

        let canvas = target.canvas();
        for gene in &mut genes {
            if rng.random_bool(mutation_rate) {
                *gene = Gene::random(rng, canvas, true);
            }
        }

        Self::from_genes(genes, target)
    }

    #[inline]
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// cached score in (0, 1]
    #[inline]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// number of genes that actually paint something
    pub fn visible_count(&self) -> usize {
        self.genes.iter().filter(|g| g.is_visible()).count()
    }

    pub fn render(&self, canvas: &Canvas) -> RgbImage {
        CpuRenderer::render_rgb(&self.genes, canvas)
    }

    /// recompute the score against any target. errors when the target's canvas
    /// can't hold this genome's render, i.e. the dimensions differ.
    pub fn fitness_against(&self, target: &Target) -> Result<f64> {
        fitness::score(&self.render(target.canvas()), target)
    }

    /// SAD/px and PSNR of this individual's render
    pub fn metrics(&self, target: &Target) -> MetricsSnapshot {
        let rendered = CpuRenderer::render_premul(&self.genes, target.canvas());
        MetricsSnapshot::from_sad(target.sad_pixmap(&rendered), target.num_pixels())
    }
}
