//! Sum of Absolute Differences (SAD) / Manhattan distance over the RGB channels.
//! the rendered side is tiny-skia's RGBA (opaque, so premultiplied == straight);
//! the target side is packed 3-channel RGB. alpha never enters the sum.
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// rows handed to one rayon task at a time
#[cfg(feature = "parallel")]
const ROWS_PER_TASK: usize = 16;

#[inline]
fn sad_pixels_rgba_rgb(rendered_rgba: &[u8], target_rgb: &[u8]) -> u64 {
    rendered_rgba
        .chunks_exact(4)
        .zip(target_rgb.chunks_exact(3))
        .map(|(c, t)| {
            let r = (c[0] as i32 - t[0] as i32).unsigned_abs() as u64;
            let g = (c[1] as i32 - t[1] as i32).unsigned_abs() as u64;
            let b = (c[2] as i32 - t[2] as i32).unsigned_abs() as u64;
            r + g + b
        })
        .sum()
}

/// SAD between a rendered RGBA buffer and a packed RGB target of the same pixel count.
/// `width` is the row length in pixels, used to split work across threads.
#[cfg(not(feature = "parallel"))]
#[inline]
pub fn sad_rgba_vs_rgb(rendered_rgba: &[u8], target_rgb: &[u8], _width: u32) -> u64 {
    profiling::scope!("sad_rgba_vs_rgb");
    debug_assert_eq!(rendered_rgba.len() / 4, target_rgb.len() / 3);
    sad_pixels_rgba_rgb(rendered_rgba, target_rgb)
}

/// parallel variant: rows are summed in independent chunks, order-independent
/// because integer addition is associative.
#[cfg(feature = "parallel")]
#[inline]
pub fn sad_rgba_vs_rgb(rendered_rgba: &[u8], target_rgb: &[u8], width: u32) -> u64 {
    profiling::scope!("sad_rgba_vs_rgb");
    debug_assert_eq!(rendered_rgba.len() / 4, target_rgb.len() / 3);
    let width = (width as usize).max(1);
    rendered_rgba
        .par_chunks(width * 4 * ROWS_PER_TASK)
        .zip(target_rgb.par_chunks(width * 3 * ROWS_PER_TASK))
        .map(|(c, t)| sad_pixels_rgba_rgb(c, t))
        .sum()
}

/// SAD between two packed RGB buffers
#[inline]
pub fn sad_rgb(a: &[u8], b: &[u8]) -> u64 {
    profiling::scope!("sad_rgb");
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(&x, &y)| (x as i32 - y as i32).unsigned_abs() as u64)
        .sum()
}
