//! Chart rendering
//!
//! Renders the frequency-response comparison and the speed comparison as
//! PNG files via plotters. One line series per meter, series order and
//! colors follow registry order.

use std::path::Path;

use plotters::prelude::*;

use crate::bench::{SpeedResults, SweepResults};
use crate::error::{LoudbenchError, Result};

/// Plot a window of the frequency sweep.
///
/// `x_range` bounds the frequency axis; `y_range` fixes the loudness axis,
/// or is derived from the visible data when `None`.
pub fn plot_freq_response(
    results: &SweepResults,
    x_range: (f64, f64),
    y_range: Option<(f64, f64)>,
    title: &str,
    path: &Path,
) -> Result<()> {
    let (x0, x1) = x_range;
    let (y0, y1) = y_range.unwrap_or_else(|| auto_y_range(results, x0, x1));

    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Frequency (Hz)")
        .y_desc("Integrated loudness (LUFS)")
        .draw()
        .map_err(plot_err)?;

    for (idx, (name, values)) in results.series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points: Vec<(f64, f64)> = results
            .frequencies
            .iter()
            .copied()
            .zip(values.iter().copied())
            .filter(|&(f, v)| f >= x0 && f <= x1 && v.is_finite())
            .collect();

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(plot_err)?
            .label(name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;

    Ok(())
}

/// Plot mean RTF against signal duration, one line per meter.
pub fn plot_speed(results: &SpeedResults, path: &Path) -> Result<()> {
    let x1 = results
        .durations_secs
        .iter()
        .copied()
        .fold(0.0f64, f64::max);
    let y1 = results
        .mean_rtf
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .fold(1.0f64, f64::max)
        * 1.1;

    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Measurement speed", ("sans-serif", 28))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(0.0..x1 * 1.05, 0.0..y1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Signal duration (s)")
        .y_desc("Real-time factor")
        .draw()
        .map_err(plot_err)?;

    for (idx, name) in results.meters.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points: Vec<(f64, f64)> = results
            .durations_secs
            .iter()
            .copied()
            .zip(results.mean_rtf[idx].iter().copied())
            .filter(|&(_, v)| v.is_finite())
            .collect();

        chart
            .draw_series(LineSeries::new(points, color.stroke_width(2)))
            .map_err(plot_err)?
            .label(name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;

    Ok(())
}

/// Loudness range covering every finite point inside the frequency window,
/// padded by 1 LU; falls back to a generic meter range on empty windows.
fn auto_y_range(results: &SweepResults, x0: f64, x1: f64) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for (_, values) in &results.series {
        for (&f, &v) in results.frequencies.iter().zip(values.iter()) {
            if f >= x0 && f <= x1 && v.is_finite() {
                min = min.min(v);
                max = max.max(v);
            }
        }
    }

    if min.is_finite() && max.is_finite() && min < max {
        (min - 1.0, max + 1.0)
    } else {
        (-70.0, 0.0)
    }
}

fn plot_err<E: std::fmt::Display>(e: E) -> LoudbenchError {
    LoudbenchError::Plot {
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_sweep() -> SweepResults {
        SweepResults {
            frequencies: vec![100.0, 1000.0, 4000.0, 20000.0],
            gain_db: -6.0,
            series: vec![
                ("ebur128".to_string(), vec![-9.8, -9.7, -8.9, -6.2]),
                ("ffmpeg".to_string(), vec![-9.9, -9.7, -8.8, -6.5]),
            ],
        }
    }

    #[test]
    fn test_auto_y_range_pads_window_data() {
        let results = sample_sweep();
        let (y0, y1) = auto_y_range(&results, 500.0, 5000.0);
        // Visible points span -9.7..-8.8, padded by 1 LU each side
        assert!((y0 - (-10.7)).abs() < 1e-9);
        assert!((y1 - (-7.8)).abs() < 1e-9);
    }

    #[test]
    fn test_auto_y_range_empty_window() {
        let results = sample_sweep();
        assert_eq!(auto_y_range(&results, 50000.0, 60000.0), (-70.0, 0.0));
    }

    #[test]
    fn test_freq_response_renders_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sweep.png");

        plot_freq_response(&sample_sweep(), (100.0, 20000.0), None, "sweep", &path).unwrap();
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_speed_plot_renders_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("speed.png");

        let results = SpeedResults {
            durations_secs: vec![10.0, 30.0, 60.0],
            meters: vec!["ebur128".to_string(), "ffmpeg".to_string()],
            mean_elapsed: vec![vec![0.05, 0.14, 0.3], vec![2.0, 6.1, 12.5]],
            mean_rtf: vec![vec![200.0, 214.0, 200.0], vec![5.0, 4.9, 4.8]],
        };

        plot_speed(&results, &path).unwrap();
        assert!(path.exists());
    }
}
