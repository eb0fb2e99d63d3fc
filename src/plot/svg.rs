//! SVG output for figures (`--save-dir`).

use std::path::{Path, PathBuf};

use log::info;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use thiserror::Error;

use crate::error::AppError;
use crate::plot::figure::{Figure, Palette, draw_figure};

/// Pixel size of a saved overview figure (two stacked panes).
pub const OVERVIEW_SIZE: (u32, u32) = (1000, 1100);
/// Pixel size of a saved fit figure.
pub const FIT_SIZE: (u32, u32) = (1000, 600);

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("failed to render plot: {0}")]
    Drawing(String),
    #[error("failed to create '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl<E: std::error::Error + Send + Sync + 'static> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(value: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Drawing(format!("{value:?}"))
    }
}

impl From<PlotError> for AppError {
    fn from(err: PlotError) -> Self {
        AppError::render(err.to_string())
    }
}

fn figure_size(figure: &Figure<'_>) -> (u32, u32) {
    match figure {
        Figure::Overview(_) => OVERVIEW_SIZE,
        Figure::Fit(_) => FIT_SIZE,
    }
}

/// Write `figure` into `dir` under [`Figure::file_name`], creating `dir` if
/// needed. Returns the written path.
pub fn save_figure_svg(dir: &Path, figure: &Figure<'_>) -> Result<PathBuf, PlotError> {
    std::fs::create_dir_all(dir).map_err(|source| PlotError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(figure.file_name());
    let palette = Palette::document();

    {
        let root = SVGBackend::new(&path, figure_size(figure)).into_drawing_area();
        root.fill(&palette.background)?;
        draw_figure::<_, PlotError>(&root, figure, &palette)?;
        root.present()?;
    }

    info!("saved '{}' to {}", figure.title(), path.display());
    Ok(path)
}

/// Render `figure` to an in-memory SVG document.
pub fn render_svg_string(figure: &Figure<'_>) -> Result<String, PlotError> {
    let palette = Palette::document();
    let mut out = String::new();
    {
        let root = SVGBackend::with_string(&mut out, figure_size(figure)).into_drawing_area();
        root.fill(&palette.background)?;
        draw_figure::<_, PlotError>(&root, figure, &palette)?;
        root.present()?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorBarSet, ModelKind, SampleSeries};
    use crate::plot::figure::{BaseChartData, FitChartData};

    fn has_text(svg: &str, text: &str) -> bool {
        svg.split(['<', '>']).any(|node| node.trim() == text)
    }

    fn series() -> SampleSeries {
        let time: Vec<f64> = (0..200).map(|i| i as f64 * 5e-4).collect();
        let voltage = time.iter().map(|t| 0.05 + 0.08 * (-(t - 0.05f64).powi(2) / 1e-4).exp()).collect();
        SampleSeries::new(time, voltage).unwrap()
    }

    #[test]
    fn overview_contains_both_passes() {
        let s = series();
        let bars = ErrorBarSet {
            points: vec![(0.0, 0.05), (0.05, 0.13)],
            magnitude: 0.01,
        };
        let slice = s.as_slice();
        let figure = Figure::Overview(BaseChartData {
            raw: slice,
            window: crate::domain::SeriesSlice {
                time: &slice.time[80..120],
                voltage: &slice.voltage[80..120],
            },
            error_bars: &bars,
        });

        let svg = render_svg_string(&figure).unwrap();
        assert_eq!(svg.split(['<', '>']).filter(|n| n.trim() == "Voltage vs. Time").count(), 2);
        // Rescaled pass labels y ticks with two decimals.
        assert!(has_text(&svg, "0.14"), "missing rescaled tick label");
    }

    #[test]
    fn plot_error_maps_to_render_exit_code() {
        let err = AppError::from(PlotError::Drawing("backend gone".into()));
        assert_eq!(err.exit_code(), crate::error::EXIT_RENDER);
        assert!(err.message().contains("backend gone"));
    }

    #[test]
    fn fit_figure_is_saved_under_model_name() {
        let dir = tempfile::tempdir().unwrap();
        let data: Vec<(f64, f64)> = (0..50).map(|i| (i as f64, (i as f64 - 25.0).abs())).collect();
        let figure = Figure::Fit(FitChartData {
            model: ModelKind::Lorentzian,
            curve: data.clone(),
            data,
        });

        let path = save_figure_svg(&dir.path().join("figs"), &figure).unwrap();
        assert!(path.ends_with("figure3_lorentz.svg"));
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.contains("Lorentz fit"));
        assert!(has_text(&svg, "fit"));
    }
}
