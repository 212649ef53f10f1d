//! Plotters-powered loan balance chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Render-only chart description; series and bounds are computed by the caller.
pub struct BalanceChart<'a> {
    /// Outstanding balance at each year end (year 0 = loan amount).
    pub balance: &'a [(f64, f64)],
    /// Cumulative interest paid at each year end.
    pub interest: &'a [(f64, f64)],
    /// X bounds (years).
    pub x_bounds: [f64; 2],
    /// Y bounds (dollars).
    pub y_bounds: [f64; 2],
    pub fmt_x: fn(f64) -> String,
    pub fmt_y: fn(f64) -> String,
}

impl Widget for BalanceChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("year")
                .y_desc("$")
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let balance_color = RGBColor(0, 255, 255); // cyan
            let interest_color = RGBColor(255, 255, 0); // yellow

            chart.draw_series(LineSeries::new(self.balance.iter().copied(), &balance_color))?;
            chart.draw_series(LineSeries::new(self.interest.iter().copied(), &interest_color))?;

            // Year-end markers. `Circle` radii are mis-scaled by the ratatui
            // backend, so use single pixels.
            chart.draw_series(
                self.balance
                    .iter()
                    .skip(1)
                    .map(|&(x, y)| Pixel::new((x, y), WHITE)),
            )?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
