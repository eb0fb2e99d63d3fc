//! Ratatui widget that renders a [`Figure`] through Plotters.
//!
//! Plotters output is drawn into the Ratatui buffer by
//! `plotters-ratatui-backend`; the drawing code itself is shared with the SVG
//! path in `crate::plot::figure`.

use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::plot::{Figure, Palette, draw_figure};

pub struct FigureWidget<'a, 'f> {
    pub figure: &'a Figure<'f>,
}

impl Widget for FigureWidget<'_, '_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let figure = self.figure;
        let palette = Palette::terminal();
        let widget = widget_fn(move |root| draw_figure(&root, figure, &palette));

        widget.render(area, buf);
    }
}
