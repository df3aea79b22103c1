use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use plotters::prelude::*;

use crate::color::ColorMap;
use crate::data::model::{ModuleSeries, RunMetricKey};

// ---------------------------------------------------------------------------
// Time-series chart (one per run × metric)
// ---------------------------------------------------------------------------

/// Output image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    pub width: u32,
    pub height: u32,
}

/// `<run>_<metric>.png`, with `:` in the metric replaced by `_`.
pub fn chart_file_name(key: &RunMetricKey) -> String {
    format!("{}_{}.png", key.run, key.metric.replace(':', "_"))
}

/// Axis range covering all finite values.
///
/// A single distinct value is padded so the axis is never empty; no finite
/// values at all gives `0..1`.
pub fn axis_range<I>(values: I) -> Range<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return 0.0..1.0;
    }
    if lo == hi {
        let pad = if lo == 0.0 { 0.5 } else { lo.abs() * 0.05 };
        return (lo - pad)..(hi + pad);
    }
    lo..hi
}

/// Render one chart into `outdir` and return the written path.
///
/// Existing files of the same name are overwritten.
pub fn render_chart(
    outdir: &Path,
    key: &RunMetricKey,
    series: &ModuleSeries,
    size: ChartSize,
) -> Result<PathBuf> {
    let path = outdir.join(chart_file_name(key));

    let mut buf = vec![0u8; size.width as usize * size.height as usize * 3];
    draw(&mut buf, key, series, size).with_context(|| format!("drawing chart {key}"))?;

    let img = image::RgbImage::from_raw(size.width, size.height, buf)
        .context("chart buffer does not match image size")?;
    img.save_with_format(&path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn draw(buf: &mut [u8], key: &RunMetricKey, series: &ModuleSeries, size: ChartSize) -> Result<()> {
    let root = BitMapBackend::with_buffer(buf, (size.width, size.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = axis_range(series.values().flatten().map(|&(t, _)| t));
    let y_range = axis_range(series.values().flatten().map(|&(_, v)| v));

    let mut chart = ChartBuilder::on(&root)
        .caption(key.to_string(), ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc("Time [s]")
        .y_desc(key.metric.as_str())
        .light_line_style(BLACK.mix(0.05))
        .draw()?;

    let colors = ColorMap::new(series.keys().map(String::as_str));
    for (module, points) in series {
        let color = colors.color_for(module);
        let finite = points
            .iter()
            .copied()
            .filter(|(t, v)| t.is_finite() && v.is_finite());

        chart
            .draw_series(LineSeries::new(finite, color.stroke_width(2)))?
            .label(module.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(("sans-serif", 12))
        .draw()?;

    root.present()?;
    Ok(())
}
