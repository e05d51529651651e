//─────────────────────────────────────────────────────────────────────────────
// resolution-invariant diagnostics (SAD/px, PSNR) logged alongside the score
//─────────────────────────────────────────────────────────────────────────────

/// channels compared by the fitness (RGB, alpha is never scored)
pub const FITNESS_CHANNELS: u64 = 3;
pub const FITNESS_CHANNELS_F64: f64 = 3.0;

/// 8-bit peak value
pub const PSNR_PEAK: f64 = 255.0;

/// PSNR (peak signal-to-noise ratio) in decibels.
/// higher PSNR = better quality. typical ranges:
///   - 30 dB = acceptable
///   - 35 dB = good
///   - 40+ dB = very good
#[inline]
pub fn psnr_from_mse(mse: f64, peak: f64) -> f64 {
    let mse = mse.max(1e-12);
    10.0 * ((peak * peak) / mse).log10()
}

/// snapshot of resolution-invariant metrics for one render.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub sad_per_px: f64,
    pub psnr: f64,
}

impl MetricsSnapshot {
    /// build metrics from raw SAD + pixel count.
    /// follows the "pseudo-MSE from SAD" convention: L1 per pixel per channel stands in for MSE.
    #[inline]
    pub fn from_sad(sad: u64, num_pixels: usize) -> Self {
        let n = (num_pixels as f64).max(1.0);
        let sad = sad as f64;
        let sad_per_px = sad / n;
        let pseudo_mse = sad / (n * FITNESS_CHANNELS_F64);
        let psnr = psnr_from_mse(pseudo_mse, PSNR_PEAK);
        Self { sad_per_px, psnr }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_match_has_huge_psnr() {
        let m = MetricsSnapshot::from_sad(0, 100);
        assert_eq!(m.sad_per_px, 0.0);
        assert!(m.psnr > 100.0);
    }

    #[test]
    fn test_worst_case_psnr() {
        // every channel off by 255: pseudo-mse = 255 => 10*log10(255) ≈ 24.07 dB
        let m = MetricsSnapshot::from_sad(100 * 3 * 255, 100);
        assert_eq!(m.sad_per_px, 765.0);
        assert!((m.psnr - 24.065).abs() < 0.01, "psnr was {}", m.psnr);
    }
}
