// triangle geometry helpers used by the renderer to skip shapes that can't cover a pixel

/// below this many square pixels a triangle is treated as degenerate
pub const DEGENERATE_AREA_EPSILON: f32 = 1e-6;

/// compute signed area of a polygon using the shoelace formula.
/// returns positive for CCW, negative for CW, zero for degenerate.
pub fn signed_area(pts: &[(f32, f32)]) -> f32 {
    if pts.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..pts.len() {
        let j = (i + 1) % pts.len();
        area += pts[i].0 * pts[j].1;
        area -= pts[j].0 * pts[i].1;
    }
    area * 0.5
}

/// absolute area in square pixels
#[inline]
pub fn polygon_area(points: &[(f32, f32)]) -> f32 {
    signed_area(points).abs()
}

/// collinear or coincident vertices (or non-finite coordinates)
#[inline]
pub fn is_degenerate(points: &[(f32, f32)]) -> bool {
    let area = polygon_area(points);
    !area.is_finite() || area < DEGENERATE_AREA_EPSILON
}
