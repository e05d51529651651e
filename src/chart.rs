// end-of-run fitness chart: best / worst / mean / std-dev trajectories drawn with tiny-skia.
// tiny-skia has no text rendering, so the legend is color-keyed swatches in series order.

use tiny_skia as sk;

use crate::error::{EvolveError, Result};
use crate::stats::{GenerationStats, History};

pub const BEST_COLOR: [u8; 3] = [0, 128, 0]; // green
pub const WORST_COLOR: [u8; 3] = [220, 20, 20]; // red
pub const MEAN_COLOR: [u8; 3] = [30, 60, 220]; // blue
pub const STD_DEV_COLOR: [u8; 3] = [255, 165, 0]; // orange

#[derive(Clone, Copy, Debug)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub margin: f32,
    pub line_width: f32,
    pub grid_lines: u32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self { width: 800, height: 600, margin: 50.0, line_width: 2.0, grid_lines: 5 }
    }
}

/// one plotted series: its color and how to read its value out of a record
struct Series {
    color: [u8; 3],
    value: fn(&GenerationStats) -> f64,
}

fn best(s: &GenerationStats) -> f64 {
    s.best
}

fn worst(s: &GenerationStats) -> f64 {
    s.worst
}

fn mean(s: &GenerationStats) -> f64 {
    s.mean
}

fn std_dev(s: &GenerationStats) -> f64 {
    s.std_dev
}

const SERIES: [Series; 4] = [
    Series { color: BEST_COLOR, value: best },
    Series { color: WORST_COLOR, value: worst },
    Series { color: MEAN_COLOR, value: mean },
    Series { color: STD_DEV_COLOR, value: std_dev },
];

/// maps generation index / fitness value into pixel space of the plot area
#[derive(Clone, Copy, Debug)]
struct Plot {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Plot {
    fn new(style: &ChartStyle, history: &History) -> Self {
        let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
        for stats in &history.generations {
            for series in &SERIES {
                let v = (series.value)(stats);
                y_min = y_min.min(v);
                y_max = y_max.max(v);
            }
        }
        if !y_min.is_finite() || !y_max.is_finite() {
            (y_min, y_max) = (0.0, 1.0);
        }
        // flat data still needs a visible band
        if y_max - y_min < 1e-9 {
            y_min -= 0.05;
            y_max += 0.05;
        }
        let pad = (y_max - y_min) * 0.05;

        let x_min = history.generations.first().map_or(0.0, |s| s.generation as f64);
        let x_max = history.generations.last().map_or(1.0, |s| s.generation as f64);

        Self {
            left: style.margin,
            top: style.margin,
            right: style.width as f32 - style.margin,
            bottom: style.height as f32 - style.margin,
            x_min,
            x_max,
            y_min: y_min - pad,
            y_max: y_max + pad,
        }
    }

    fn x(&self, generation: f64) -> f32 {
        let span = self.x_max - self.x_min;
        if span <= 0.0 {
            return (self.left + self.right) * 0.5;
        }
        self.left + ((generation - self.x_min) / span) as f32 * (self.right - self.left)
    }

    fn y(&self, value: f64) -> f32 {
        let t = ((value - self.y_min) / (self.y_max - self.y_min)) as f32;
        self.bottom - t * (self.bottom - self.top)
    }
}

fn paint(rgb: [u8; 3]) -> sk::Paint<'static> {
    let mut paint = sk::Paint::default();
    paint.anti_alias = true;
    paint.set_color_rgba8(rgb[0], rgb[1], rgb[2], 255);
    paint
}

fn stroke_line(pix: &mut sk::Pixmap, from: (f32, f32), to: (f32, f32), rgb: [u8; 3], width: f32) {
    let mut pb = sk::PathBuilder::new();
    pb.move_to(from.0, from.1);
    pb.line_to(to.0, to.1);
    if let Some(path) = pb.finish() {
        let stroke = sk::Stroke { width, ..sk::Stroke::default() };
        pix.stroke_path(&path, &paint(rgb), &stroke, sk::Transform::identity(), None);
    }
}

fn fill_square(pix: &mut sk::Pixmap, center: (f32, f32), size: f32, rgb: [u8; 3]) {
    if let Some(rect) = sk::Rect::from_xywh(center.0 - size * 0.5, center.1 - size * 0.5, size, size) {
        pix.fill_rect(rect, &paint(rgb), sk::Transform::identity(), None);
    }
}

/// draw the chart for a run. an empty history yields just the axes.
pub fn render_chart(history: &History, style: &ChartStyle) -> Result<sk::Pixmap> {
    profiling::scope!("render_chart");
    let mut pix = sk::Pixmap::new(style.width, style.height).ok_or_else(|| {
        EvolveError::Chart(format!("can't allocate a {}x{} chart", style.width, style.height))
    })?;
    if style.margin * 2.0 >= style.width.min(style.height) as f32 {
        return Err(EvolveError::Chart(format!(
            "margin {} leaves no plot area in a {}x{} chart",
            style.margin, style.width, style.height
        )));
    }
    pix.fill(sk::Color::WHITE);

    let plot = Plot::new(style, history);

    // horizontal grid
    for i in 0..=style.grid_lines {
        let t = i as f32 / style.grid_lines.max(1) as f32;
        let y = plot.top + t * (plot.bottom - plot.top);
        stroke_line(&mut pix, (plot.left, y), (plot.right, y), [225, 225, 225], 1.0);
    }

    // axes
    stroke_line(&mut pix, (plot.left, plot.bottom), (plot.right, plot.bottom), [0, 0, 0], 1.5);
    stroke_line(&mut pix, (plot.left, plot.top), (plot.left, plot.bottom), [0, 0, 0], 1.5);

    for series in &SERIES {
        let points: Vec<(f32, f32)> = history
            .generations
            .iter()
            .map(|s| (plot.x(s.generation as f64), plot.y((series.value)(s))))
            .collect();
        match points.as_slice() {
            [] => {}
            [only] => fill_square(&mut pix, *only, style.line_width * 2.0, series.color),
            [first, rest @ ..] => {
                let mut pb = sk::PathBuilder::new();
                pb.move_to(first.0, first.1);
                for p in rest {
                    pb.line_to(p.0, p.1);
                }
                if let Some(path) = pb.finish() {
                    let stroke = sk::Stroke {
                        width: style.line_width,
                        line_join: sk::LineJoin::Round,
                        ..sk::Stroke::default()
                    };
                    pix.stroke_path(&path, &paint(series.color), &stroke, sk::Transform::identity(), None);
                }
            }
        }
    }

    // legend: best, worst, mean, std-dev from left to right, top-right corner
    let swatch = 12.0;
    for (i, series) in SERIES.iter().enumerate() {
        let x = plot.right - (SERIES.len() - i) as f32 * (swatch + 6.0);
        fill_square(&mut pix, (x, plot.top - swatch), swatch, series.color);
    }

    Ok(pix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(n: u64) -> History {
        let mut h = History::default();
        for g in 1..=n {
            let best = 0.5 + g as f64 * 0.01;
            h.push(GenerationStats::from_values(g, &[best, 0.5, 0.52]));
        }
        h
    }

    fn contains_color(pix: &sk::Pixmap, rgb: [u8; 3]) -> bool {
        pix.data().chunks_exact(4).any(|p| p[0] == rgb[0] && p[1] == rgb[1] && p[2] == rgb[2])
    }

    #[test]
    fn test_chart_has_requested_size() {
        let style = ChartStyle { width: 320, height: 200, ..ChartStyle::default() };
        let pix = render_chart(&history(10), &style).unwrap();
        assert_eq!((pix.width(), pix.height()), (320, 200));
    }

    #[test]
    fn test_every_series_is_drawn() {
        let pix = render_chart(&history(30), &ChartStyle::default()).unwrap();
        for color in [BEST_COLOR, WORST_COLOR, MEAN_COLOR, STD_DEV_COLOR] {
            assert!(contains_color(&pix, color), "missing series color {color:?}");
        }
    }

    #[test]
    fn test_empty_and_single_generation_histories() {
        assert!(render_chart(&History::default(), &ChartStyle::default()).is_ok());
        assert!(render_chart(&history(1), &ChartStyle::default()).is_ok());
    }

    #[test]
    fn test_margin_too_large_rejected() {
        let style = ChartStyle { width: 80, height: 80, margin: 40.0, ..ChartStyle::default() };
        assert!(matches!(render_chart(&history(3), &style), Err(EvolveError::Chart(_))));
    }

    #[test]
    fn test_zero_size_rejected() {
        let style = ChartStyle { width: 0, ..ChartStyle::default() };
        assert!(matches!(render_chart(&history(3), &style), Err(EvolveError::Chart(_))));
    }
}
