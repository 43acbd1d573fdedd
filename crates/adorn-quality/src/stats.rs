//! Grayscale statistics — brightness, contrast, and edge density buckets.

use adorn_core::{QualityBucket, QualitySignals};
use serde::Serialize;
use thiserror::Error;

// --- Bucket thresholds ---
// Mean brightness outside [DARK_MEAN, BRIGHT_MEAN] or RMS contrast below
// LOW_CONTRAST_RMS marks a capture as low quality; RMS contrast at or
// above HIGH_CONTRAST_RMS marks it high.
const DARK_MEAN: f64 = 60.0;
const BRIGHT_MEAN: f64 = 200.0;
const LOW_CONTRAST_RMS: f64 = 18.0;
const HIGH_CONTRAST_RMS: f64 = 45.0;

/// Neighbor-difference magnitude above which a pixel counts as an edge.
const EDGE_GRADIENT_THRESHOLD: i32 = 24;
/// Edge density at which complexity saturates to 1.0. A quarter of all
/// pixels on edges already reads as heavily cluttered.
const EDGE_DENSITY_SATURATION: f64 = 0.25;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("empty image: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },
    #[error("buffer length mismatch: {width}x{height} image needs {expected} bytes, got {actual}")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Summary statistics for one grayscale image, bucketed for the engine.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QualityReport {
    /// Average pixel brightness (0.0–255.0).
    pub mean_brightness: f64,
    /// RMS contrast (standard deviation of pixel values).
    pub rms_contrast: f64,
    /// Fraction of pixels sitting on a strong neighbor gradient, in [0,1].
    pub edge_density: f64,
    pub quality: QualityBucket,
    /// Scene complexity in [0,1], saturating at 25% edge pixels.
    pub complexity: f64,
}

impl QualityReport {
    /// The engine-facing subset of this report.
    pub fn signals(&self) -> QualitySignals {
        QualitySignals {
            quality: self.quality,
            complexity: self.complexity,
        }
    }
}

/// Analyze a grayscale buffer (`width` × `height` bytes, row-major).
///
/// Buffers longer than the image are allowed; the prefix is used. Edge
/// density uses forward neighbor differences, which catch single-pixel
/// texture that centered differences would cancel out.
pub fn assess(gray: &[u8], width: u32, height: u32) -> Result<QualityReport, StatsError> {
    if width == 0 || height == 0 {
        return Err(StatsError::EmptyImage { width, height });
    }
    let expected = width as usize * height as usize;
    if gray.len() < expected {
        return Err(StatsError::LengthMismatch {
            width,
            height,
            expected,
            actual: gray.len(),
        });
    }
    let gray = &gray[..expected];

    let n = gray.len() as f64;
    let mean = gray.iter().map(|&p| p as f64).sum::<f64>() / n;
    let variance = gray.iter().map(|&p| (p as f64 - mean).powi(2)).sum::<f64>() / n;
    let rms = variance.sqrt();

    let edge_density = edge_density(gray, width as usize, height as usize);
    let complexity = (edge_density / EDGE_DENSITY_SATURATION).clamp(0.0, 1.0);

    let quality = if mean < DARK_MEAN || mean > BRIGHT_MEAN || rms < LOW_CONTRAST_RMS {
        QualityBucket::Low
    } else if rms >= HIGH_CONTRAST_RMS {
        QualityBucket::High
    } else {
        QualityBucket::Medium
    };

    let report = QualityReport {
        mean_brightness: mean,
        rms_contrast: rms,
        edge_density,
        quality,
        complexity,
    };
    tracing::debug!(
        mean = report.mean_brightness,
        rms = report.rms_contrast,
        edges = report.edge_density,
        quality = ?report.quality,
        "image assessed"
    );
    Ok(report)
}

/// Fraction of pixels whose forward neighbor differences exceed the edge
/// threshold. Pixels on the last row/column have no forward neighbor and
/// are excluded from the denominator.
fn edge_density(gray: &[u8], width: usize, height: usize) -> f64 {
    if width < 2 || height < 2 {
        return 0.0;
    }
    let mut edges = 0usize;
    for y in 0..height - 1 {
        for x in 0..width - 1 {
            let here = gray[y * width + x] as i32;
            let right = gray[y * width + x + 1] as i32;
            let below = gray[(y + 1) * width + x] as i32;
            if (right - here).abs() + (below - here).abs() > EDGE_GRADIENT_THRESHOLD {
                edges += 1;
            }
        }
    }
    edges as f64 / ((width - 1) * (height - 1)) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_frame_is_low_quality() {
        // Zero contrast: nothing for the compositor to anchor against.
        let gray = vec![128u8; 64 * 64];
        let report = assess(&gray, 64, 64).unwrap();
        assert_eq!(report.quality, QualityBucket::Low);
        assert!(report.rms_contrast < 1e-9);
        assert!(report.complexity < 1e-9);
    }

    #[test]
    fn test_dark_frame_is_low_quality() {
        let gray = vec![10u8; 64 * 64];
        let report = assess(&gray, 64, 64).unwrap();
        assert_eq!(report.quality, QualityBucket::Low);
        assert!(report.mean_brightness < DARK_MEAN);
    }

    #[test]
    fn test_blown_out_frame_is_low_quality() {
        let gray = vec![250u8; 64 * 64];
        let report = assess(&gray, 64, 64).unwrap();
        assert_eq!(report.quality, QualityBucket::Low);
    }

    #[test]
    fn test_checkerboard_is_high_contrast_and_fully_complex() {
        let w = 64usize;
        let gray: Vec<u8> = (0..w * w)
            .map(|i| if (i / w + i % w) % 2 == 0 { 0 } else { 255 })
            .collect();
        let report = assess(&gray, w as u32, w as u32).unwrap();
        assert_eq!(report.quality, QualityBucket::High);
        assert!((report.edge_density - 1.0).abs() < 1e-9);
        assert!((report.complexity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_smooth_ramp_is_high_quality_but_flat() {
        // Full-range horizontal gradient: strong global contrast, no local
        // edges anywhere.
        let w = 256usize;
        let h = 32usize;
        let gray: Vec<u8> = (0..w * h).map(|i| (i % w) as u8).collect();
        let report = assess(&gray, w as u32, h as u32).unwrap();
        assert_eq!(report.quality, QualityBucket::High);
        assert!(report.complexity < 1e-9);
    }

    #[test]
    fn test_split_frame_is_medium_quality() {
        // Two flat halves at 100 and 140: rms 20, one edge row.
        let w = 64usize;
        let h = 64usize;
        let gray: Vec<u8> = (0..w * h)
            .map(|i| if i / w < h / 2 { 100 } else { 140 })
            .collect();
        let report = assess(&gray, w as u32, h as u32).unwrap();
        assert_eq!(report.quality, QualityBucket::Medium);
        assert!(report.edge_density < 0.05);
    }

    #[test]
    fn test_short_buffer_rejected() {
        let gray = vec![0u8; 10];
        let err = assess(&gray, 64, 64).unwrap_err();
        assert!(matches!(err, StatsError::LengthMismatch { expected: 4096, .. }));
    }

    #[test]
    fn test_longer_buffer_uses_prefix() {
        let mut gray = vec![128u8; 8 * 8];
        gray.extend([255u8; 100]);
        let report = assess(&gray, 8, 8).unwrap();
        assert!((report.mean_brightness - 128.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_image_rejected() {
        assert!(matches!(assess(&[], 0, 64), Err(StatsError::EmptyImage { .. })));
        assert!(matches!(assess(&[], 64, 0), Err(StatsError::EmptyImage { .. })));
    }

    #[test]
    fn test_signals_passthrough() {
        let w = 64usize;
        let gray: Vec<u8> = (0..w * w)
            .map(|i| if (i / w + i % w) % 2 == 0 { 0 } else { 255 })
            .collect();
        let report = assess(&gray, w as u32, w as u32).unwrap();
        let signals = report.signals();
        assert_eq!(signals.quality, report.quality);
        assert!((signals.complexity - report.complexity).abs() < 1e-12);
    }
}
