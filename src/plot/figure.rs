//! Figure descriptions and the backend-independent drawing routines.
//!
//! Every figure is drawn through Plotters onto a `DrawingArea`, so the same
//! code renders into the terminal (via `plotters-ratatui-backend`) and into SVG
//! files. The drawing functions are generic over the caller's error type; any
//! type constructible from a Plotters drawing error works.

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::{ErrorBarSet, ModelKind, SeriesSlice};
use crate::plot::axes::{AxisConfig, ResolvedAxis};

const OVERVIEW_TITLE: &str = "Voltage vs. Time";
const X_DESC: &str = "Time (s) ";
const Y_DESC: &str = "Voltage (V) ";

/// Colors and sizes for one rendering target.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: RGBColor,
    pub text: RGBColor,
    pub raw: RGBColor,
    pub window: RGBColor,
    pub fit: RGBColor,
    pub font_size: u32,
    pub margin: u32,
    /// Left and bottom label area sizes.
    pub label_area: (u32, u32),
    pub bar_width: u32,
    /// Draw circle markers at error-bar points. The ratatui backend maps
    /// circle radii incorrectly, so terminal rendering uses single pixels.
    pub circle_markers: bool,
}

impl Palette {
    pub fn terminal() -> Self {
        Self {
            background: BLACK,
            text: WHITE,
            raw: RGBColor(255, 0, 0),
            window: RGBColor(0, 255, 255),
            fit: RGBColor(255, 255, 0),
            font_size: 10,
            margin: 1,
            label_area: (6, 3),
            bar_width: 2,
            circle_markers: false,
        }
    }

    pub fn document() -> Self {
        Self {
            background: WHITE,
            text: BLACK,
            raw: RED,
            window: BLUE,
            fit: RGBColor(255, 127, 14),
            font_size: 14,
            margin: 10,
            label_area: (70, 45),
            bar_width: 10,
            circle_markers: true,
        }
    }
}

/// Data shared by both passes of the overview figure.
#[derive(Debug, Clone, Copy)]
pub struct BaseChartData<'a> {
    pub raw: SeriesSlice<'a>,
    pub window: SeriesSlice<'a>,
    pub error_bars: &'a ErrorBarSet,
}

/// A fitted curve drawn against the window it was fitted to.
#[derive(Debug, Clone, PartialEq)]
pub struct FitChartData {
    pub model: ModelKind,
    pub data: Vec<(f64, f64)>,
    pub curve: Vec<(f64, f64)>,
}

impl FitChartData {
    pub fn title(&self) -> &'static str {
        match self.model {
            ModelKind::Gaussian => "Gaussian Fit",
            ModelKind::Lorentzian => "Lorentz fit",
        }
    }
}

/// One of the three figures of an analysis run.
#[derive(Debug, Clone)]
pub enum Figure<'a> {
    /// Base chart twice: default axes on top, [`AxisConfig::rescaled`] below.
    Overview(BaseChartData<'a>),
    Fit(FitChartData),
}

impl Figure<'_> {
    pub fn title(&self) -> &'static str {
        match self {
            Figure::Overview(_) => OVERVIEW_TITLE,
            Figure::Fit(fit) => fit.title(),
        }
    }

    /// File name used when the figure is saved as SVG.
    pub fn file_name(&self) -> &'static str {
        match self {
            Figure::Overview(_) => "figure1_overview.svg",
            Figure::Fit(FitChartData { model: ModelKind::Gaussian, .. }) => "figure2_gauss.svg",
            Figure::Fit(FitChartData { model: ModelKind::Lorentzian, .. }) => "figure3_lorentz.svg",
        }
    }
}

/// Draw a whole figure onto `root`.
pub fn draw_figure<DB, E>(root: &DrawingArea<DB, Shift>, figure: &Figure<'_>, palette: &Palette) -> Result<(), E>
where
    DB: DrawingBackend,
    E: From<DrawingAreaErrorKind<DB::ErrorType>>,
{
    match figure {
        Figure::Overview(data) => {
            let panes = root.split_evenly((2, 1));
            draw_base_chart(&panes[0], data, &AxisConfig::default(), palette)?;
            draw_base_chart(&panes[1], data, &AxisConfig::rescaled(), palette)?;
        }
        Figure::Fit(fit) => draw_fit_chart(root, fit, palette)?,
    }
    Ok(())
}

/// The base chart: raw trace, windowed trace, and the error-bar overlay.
///
/// Only `axes` differs between calls; the draw calls are identical.
pub fn draw_base_chart<DB, E>(
    area: &DrawingArea<DB, Shift>,
    data: &BaseChartData<'_>,
    axes: &AxisConfig,
    palette: &Palette,
) -> Result<(), E>
where
    DB: DrawingBackend,
    E: From<DrawingAreaErrorKind<DB::ErrorType>>,
{
    let m = data.error_bars.magnitude;
    let x_axis = ResolvedAxis::resolve(axes.x_limits, axes.x_tick_step, None, data.raw.time.iter().copied());
    let y_axis = ResolvedAxis::resolve(
        axes.y_limits,
        axes.y_tick_step,
        axes.y_format,
        data.raw
            .voltage
            .iter()
            .copied()
            .chain(data.error_bars.points.iter().flat_map(|&(_, y)| [y - m, y + m])),
    );

    let font = ("sans-serif", palette.font_size).into_font().color(&palette.text);
    let mut chart = ChartBuilder::on(area)
        .caption(OVERVIEW_TITLE, font.clone())
        .margin(palette.margin)
        .set_label_area_size(LabelAreaPosition::Left, palette.label_area.0)
        .set_label_area_size(LabelAreaPosition::Bottom, palette.label_area.1)
        .build_cartesian_2d(x_axis.coord(), y_axis.coord())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .x_labels(x_axis.ticks.len())
        .y_labels(y_axis.ticks.len())
        .x_label_formatter(&|v| x_axis.format.format(*v))
        .y_label_formatter(&|v| y_axis.format.format(*v))
        .label_style(font.clone())
        .axis_style(&palette.text)
        .draw()?;

    chart.draw_series(LineSeries::new(data.raw.points(), &palette.raw))?;
    chart.draw_series(LineSeries::new(data.window.points(), &palette.window))?;

    let bar_color = palette.window;
    chart.draw_series(
        data.error_bars
            .points
            .iter()
            .map(|&(x, y)| ErrorBar::new_vertical(x, y - m, y, y + m, bar_color.stroke_width(1), palette.bar_width)),
    )?;
    if palette.circle_markers {
        chart.draw_series(
            data.error_bars
                .points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, bar_color.filled())),
        )?;
    } else {
        chart.draw_series(data.error_bars.points.iter().map(|&(x, y)| Pixel::new((x, y), bar_color)))?;
    }

    Ok(())
}

/// Fitted curve (labelled "fit") over the fitted window data.
pub fn draw_fit_chart<DB, E>(area: &DrawingArea<DB, Shift>, fit: &FitChartData, palette: &Palette) -> Result<(), E>
where
    DB: DrawingBackend,
    E: From<DrawingAreaErrorKind<DB::ErrorType>>,
{
    let x_axis = ResolvedAxis::resolve(None, None, None, fit.data.iter().map(|&(x, _)| x));
    let y_axis = ResolvedAxis::resolve(
        None,
        None,
        None,
        fit.data.iter().chain(fit.curve.iter()).map(|&(_, y)| y),
    );

    let font = ("sans-serif", palette.font_size).into_font().color(&palette.text);
    let mut chart = ChartBuilder::on(area)
        .caption(fit.title(), font.clone())
        .margin(palette.margin)
        .set_label_area_size(LabelAreaPosition::Left, palette.label_area.0)
        .set_label_area_size(LabelAreaPosition::Bottom, palette.label_area.1)
        .build_cartesian_2d(x_axis.coord(), y_axis.coord())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .x_labels(x_axis.ticks.len())
        .y_labels(y_axis.ticks.len())
        .x_label_formatter(&|v| x_axis.format.format(*v))
        .y_label_formatter(&|v| y_axis.format.format(*v))
        .label_style(font.clone())
        .axis_style(&palette.text)
        .draw()?;

    let fit_color = palette.fit;
    chart
        .draw_series(LineSeries::new(fit.curve.iter().copied(), &fit_color))?
        .label("fit")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &fit_color));
    chart.draw_series(LineSeries::new(fit.data.iter().copied(), &palette.window))?;

    chart
        .configure_series_labels()
        .label_font(font)
        .background_style(&palette.background)
        .border_style(&palette.text)
        .draw()?;

    Ok(())
}
