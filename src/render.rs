use image::{Rgb, RgbImage};
use tiny_skia as sk;

use crate::dna::Gene;
use crate::error::{EvolveError, Result};
use crate::settings::Settings;

/// drawing surface shared by every individual of a run.
/// holds a pre-filled background so renders only clone it instead of allocating + filling.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    visible_alpha: u8,
    antialias: bool,
    blank: sk::Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32, visible_alpha: u8, antialias: bool) -> Result<Self> {
        profiling::scope!("Canvas::new");
        let mut blank = sk::Pixmap::new(width, height).ok_or(EvolveError::EmptyTarget)?;
        // opaque black background (a freshly created RGB image)
        blank.fill(sk::Color::BLACK);
        Ok(Self { width, height, visible_alpha, antialias, blank })
    }

    pub fn from_settings(settings: &Settings, width: u32, height: u32) -> Result<Self> {
        Self::new(width, height, settings.visible_alpha, settings.antialias)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn visible_alpha(&self) -> u8 {
        self.visible_alpha
    }

    #[inline]
    pub fn antialias(&self) -> bool {
        self.antialias
    }
}

pub struct CpuRenderer;

impl CpuRenderer {
    /// composite genes in order onto the blank canvas. later genes land on top.
    /// returns tiny-skia's premultiplied RGBA; the background is opaque so every
    /// pixel stays opaque and the RGB bytes equal the straight color.
    pub fn render_premul(genes: &[Gene], canvas: &Canvas) -> sk::Pixmap {
        profiling::scope!("render_premul");
        let mut pix = canvas.blank.clone();
        for gene in genes {
            draw_triangle(&mut pix, gene, canvas.antialias);
        }
        pix
    }

    /// full render as a 3-channel image (for export and external comparison)
    pub fn render_rgb(genes: &[Gene], canvas: &Canvas) -> RgbImage {
        profiling::scope!("render_rgb");
        pixmap_to_rgb(&Self::render_premul(genes, canvas))
    }
}

/// drop the alpha channel of an opaque pixmap
pub fn pixmap_to_rgb(pix: &sk::Pixmap) -> RgbImage {
    profiling::scope!("pixmap_to_rgb");
    let width = pix.width();
    let data = pix.data();
    RgbImage::from_fn(width, pix.height(), |x, y| {
        let idx = ((y * width + x) * 4) as usize;
        Rgb([data[idx], data[idx + 1], data[idx + 2]])
    })
}

fn draw_triangle(pix: &mut sk::Pixmap, gene: &Gene, antialias: bool) {
    profiling::scope!("draw_triangle");
    // transparent and zero-area triangles contribute nothing
    if !gene.is_visible() || crate::geom::is_degenerate(&gene.points) {
        return;
    }

    let [a, b, c] = gene.points;
    let mut pb = sk::PathBuilder::new();
    pb.move_to(a.0, a.1);
    pb.line_to(b.0, b.1);
    pb.line_to(c.0, c.1);
    pb.close();
    let Some(path) = pb.finish() else {
        return;
    };

    let mut paint = sk::Paint::default();
    paint.anti_alias = antialias;
    paint.set_color_rgba8(gene.rgb[0], gene.rgb[1], gene.rgb[2], gene.alpha);

    pix.fill_path(&path, &paint, sk::FillRule::Winding, sk::Transform::identity(), None);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(10, 10, 50, false).unwrap()
    }

    // covers every pixel center of a 10x10 canvas
    fn full_cover(rgb: [u8; 3], alpha: u8) -> Gene {
        Gene { rgb, alpha, points: [(0.0, 0.0), (20.0, 0.0), (0.0, 20.0)] }
    }

    #[test]
    fn test_zero_sized_canvas_rejected() {
        assert!(matches!(Canvas::new(0, 10, 50, false), Err(EvolveError::EmptyTarget)));
        assert!(matches!(Canvas::new(10, 0, 50, false), Err(EvolveError::EmptyTarget)));
    }

    #[test]
    fn test_empty_genome_renders_black() {
        let img = CpuRenderer::render_rgb(&[], &canvas());
        assert_eq!(img.dimensions(), (10, 10));
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_transparent_gene_changes_nothing() {
        let img = CpuRenderer::render_rgb(&[full_cover([255, 255, 255], 0)], &canvas());
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_opaque_gene_paints_its_color() {
        let img = CpuRenderer::render_rgb(&[full_cover([200, 100, 50], 255)], &canvas());
        assert!(img.pixels().all(|p| p.0 == [200, 100, 50]));
    }

    #[test]
    fn test_translucent_gene_blends_over_background() {
        let img = CpuRenderer::render_rgb(&[full_cover([255, 0, 0], 50)], &canvas());
        let px = img.get_pixel(5, 5).0;
        assert!((49..=51).contains(&px[0]), "red channel was {}", px[0]);
        assert_eq!(px[1], 0);
        assert_eq!(px[2], 0);
    }

    #[test]
    fn test_gene_order_matters() {
        let red = full_cover([255, 0, 0], 255);
        let blue = full_cover([0, 0, 255], 255);
        let canvas = canvas();
        let red_on_top = CpuRenderer::render_rgb(&[blue, red], &canvas);
        let blue_on_top = CpuRenderer::render_rgb(&[red, blue], &canvas);
        assert_ne!(red_on_top, blue_on_top);
        assert_eq!(red_on_top.get_pixel(3, 3).0, [255, 0, 0]);
        assert_eq!(blue_on_top.get_pixel(3, 3).0, [0, 0, 255]);
    }

    #[test]
    fn test_disjoint_genes_commute() {
        let left = Gene { rgb: [255, 0, 0], alpha: 255, points: [(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)] };
        let right = Gene { rgb: [0, 255, 0], alpha: 255, points: [(10.0, 10.0), (6.0, 10.0), (10.0, 6.0)] };
        let canvas = canvas();
        assert_eq!(
            CpuRenderer::render_rgb(&[left, right], &canvas),
            CpuRenderer::render_rgb(&[right, left], &canvas)
        );
    }

    #[test]
    fn test_degenerate_gene_renders_nothing() {
        let line = Gene { rgb: [255, 255, 255], alpha: 255, points: [(0.0, 0.0), (5.0, 5.0), (9.0, 9.0)] };
        let img = CpuRenderer::render_rgb(&[line], &canvas());
        assert!(img.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn test_render_keeps_pixmap_opaque() {
        let pix = CpuRenderer::render_premul(&[full_cover([10, 20, 30], 50)], &canvas());
        assert!(pix.data().chunks_exact(4).all(|p| p[3] == 255));
    }
}
