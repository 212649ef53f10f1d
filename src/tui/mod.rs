//! Ratatui-based terminal UI.
//!
//! Slider-style settings for the five deal inputs plus the edition; every
//! change re-runs the engine and redraws the metrics, rating and balance chart.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use tracing::debug;

use crate::app::pipeline::{ValuationRun, run_valuation};
use crate::domain::{Edition, FinancingInputs, RatingTier};
use crate::error::AppError;
use crate::io::report::{ValuationReport, write_report_into};
use crate::report::{DISCLAIMER, fmt_money};

mod plotters_chart;

use plotters_chart::BalanceChart;

/// Directory `e` writes reports into.
const REPORT_DIR: &str = "reports";

/// Start the TUI.
pub fn run(inputs: FinancingInputs, edition: Edition) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(inputs, edition, PathBuf::from(REPORT_DIR));
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Price,
    Down,
    Rate,
    Term,
    Noi,
    Edition,
}

const FIELDS: [Field; 6] = [
    Field::Price,
    Field::Down,
    Field::Rate,
    Field::Term,
    Field::Noi,
    Field::Edition,
];

struct App {
    inputs: FinancingInputs,
    edition: Edition,
    selected: usize,
    status: String,
    report_dir: PathBuf,
    run: Option<ValuationRun>,
}

impl App {
    fn new(inputs: FinancingInputs, edition: Edition, report_dir: PathBuf) -> Self {
        let mut app = Self {
            inputs,
            edition,
            selected: 0,
            status: String::new(),
            report_dir,
            run: None,
        };
        app.recompute();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => self.selected = (self.selected + 1).min(FIELDS.len() - 1),
            KeyCode::Left => self.adjust(-1),
            KeyCode::Right => self.adjust(1),
            KeyCode::Char('c') => {
                self.edition = self.edition.next();
                self.status = format!("edition: {}", self.edition.display_name());
            }
            KeyCode::Char('e') => self.export_report(),
            _ => {}
        }
        false
    }

    fn adjust(&mut self, delta: i32) {
        let bounds = self.edition.bounds();
        let i = &mut self.inputs;
        match FIELDS[self.selected] {
            Field::Price => i.purchase_price = bounds.step_purchase_price(i.purchase_price, delta),
            Field::Down => i.down_payment_pct = bounds.step_down_payment_pct(i.down_payment_pct, delta),
            Field::Rate => {
                i.annual_interest_rate_pct = bounds.step_interest_rate_pct(i.annual_interest_rate_pct, delta)
            }
            Field::Term => i.loan_term_years = bounds.step_loan_term_years(i.loan_term_years, delta),
            Field::Noi => i.net_operating_income = bounds.step_noi(i.net_operating_income, delta),
            Field::Edition => {
                self.edition = self.edition.next();
                self.status = format!("edition: {}", self.edition.display_name());
                return;
            }
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        match run_valuation(&self.inputs) {
            Ok(run) => {
                debug!(rating = ?run.result.rating, profit = run.result.annual_profit, "recomputed");
                self.run = Some(run);
            }
            Err(err) => {
                self.status = err.to_string();
                self.run = None;
            }
        }
    }

    fn export_report(&mut self) {
        let Some(run) = &self.run else {
            self.status = "Nothing to export: inputs are invalid.".to_string();
            return;
        };
        let report = ValuationReport::from_run(run, self.edition);
        self.status = match write_report_into(&self.report_dir, &report) {
            Ok(path) => format!("Wrote report: {}", path.display()),
            Err(err) => format!("Report write failed: {err}"),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines = vec![Line::from(vec![
            Span::styled("hvcalc", Style::default().fg(Color::Cyan)),
            Span::raw(format!(" | {}", self.edition.display_name())),
        ])];

        match &self.run {
            Some(run) => {
                let tier = run.result.rating;
                lines.push(Line::from(vec![
                    Span::raw("Investment rating: "),
                    Span::styled(
                        tier.display_name(),
                        Style::default().fg(tier_color(tier)).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", tier.message(self.edition)),
                        Style::default().fg(Color::Gray),
                    ),
                ]));
            }
            None => lines.push(Line::from(Span::styled(
                "Investment rating: -",
                Style::default().fg(Color::Gray),
            ))),
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(44), Constraint::Min(0)])
            .split(area);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Min(0)])
            .split(columns[0]);

        self.draw_settings(frame, left[0]);
        self.draw_metrics(frame, left[1]);
        self.draw_chart(frame, columns[1]);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = FIELDS
            .iter()
            .map(|&field| ListItem::new(setting_label(field, &self.inputs, self.edition)))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Inputs").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_metrics(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Metrics").borders(Borders::ALL);
        let Some(run) = &self.run else {
            let msg = Paragraph::new("Inputs are invalid.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let lines: Vec<Line> = metric_rows(run, self.edition)
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label:<24}"), Style::default().fg(Color::Gray)),
                    Span::raw(format!("{value:>14}")),
                ])
            })
            .chain([
                Line::raw(""),
                Line::styled(DISCLAIMER, Style::default().fg(Color::DarkGray)),
            ])
            .collect();

        let p = Paragraph::new(Text::from(lines))
            .wrap(ratatui::widgets::Wrap { trim: true })
            .block(block);
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Loan balance (cyan) / cumulative interest (yellow)")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            return;
        };

        let series = chart_series(run);
        let (chart_rect, insets) = chart_layout(inner);
        let widget = BalanceChart {
            balance: &series.balance,
            interest: &series.interest,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_money,
        };

        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, inner, chart_rect, insets, series.x_bounds, series.y_bounds);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  c edition  e export report  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn tier_color(tier: RatingTier) -> Color {
    match tier {
        RatingTier::Excellent => Color::Green,
        RatingTier::Caution => Color::Yellow,
        RatingTier::Warning => Color::LightRed,
        RatingTier::Poor => Color::Red,
    }
}

fn setting_label(field: Field, inputs: &FinancingInputs, edition: Edition) -> String {
    match field {
        Field::Price => format!("Purchase price:  {}", fmt_money(inputs.purchase_price)),
        Field::Down => format!("Down payment:    {:.0}%", inputs.down_payment_pct),
        Field::Rate => format!("Interest rate:   {:.1}%", inputs.annual_interest_rate_pct),
        Field::Term => format!("Loan term:       {} years", inputs.loan_term_years),
        Field::Noi => format!("NOI:             {}", fmt_money(inputs.net_operating_income)),
        Field::Edition => format!("Edition:         {edition:?}"),
    }
}

/// Label/value rows for the metrics panel (same split as the CLI summary).
fn metric_rows(run: &ValuationRun, edition: Edition) -> Vec<(&'static str, String)> {
    let r = &run.result;
    let mut rows = vec![
        ("Down Payment", fmt_money(r.down_payment)),
        ("Loan Amount", fmt_money(r.loan_amount)),
        ("Monthly Payment", fmt_money(r.monthly_payment)),
        ("Annual Debt Service", fmt_money(r.annual_debt_service)),
    ];
    match edition {
        Edition::Valuation => {
            rows.push(("Capitalization Rate", format!("{:.2}%", r.cap_rate_pct)));
            rows.push(("Cash-on-Cash Return", format!("{:.2}%", r.cash_on_cash_return_pct)));
            rows.push(("DSCR", format!("{:.2}", r.debt_service_coverage_ratio)));
        }
        Edition::Financing => {
            rows.push(("Estimated Annual Profit", fmt_money(r.annual_profit)));
        }
    }
    rows
}

struct ChartSeries {
    balance: Vec<(f64, f64)>,
    interest: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

fn chart_series(run: &ValuationRun) -> ChartSeries {
    let (balance, interest) = crate::plot::balance_series(&run.schedule);

    let x_max = balance.last().map(|&(x, _)| x).unwrap_or(1.0).max(1.0);

    let mut y_max = balance
        .iter()
        .chain(&interest)
        .map(|&(_, y)| y)
        .fold(0.0_f64, f64::max);
    if !y_max.is_finite() || y_max <= 0.0 {
        y_max = 1.0;
    }
    let pad = y_max * 0.05;

    ChartSeries {
        balance,
        interest,
        x_bounds: [0.0, x_max],
        y_bounds: [-pad, y_max + pad],
    }
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

/// Compact dollar ticks: `$850k`, `$1.2M`.
fn fmt_axis_money(v: f64) -> String {
    let sign = if v < 0.0 { "-" } else { "" };
    let a = v.abs();
    if a >= 1_000_000.0 {
        format!("{sign}${:.1}M", a / 1_000_000.0)
    } else if a >= 1_000.0 {
        format!("{sign}${:.0}k", a / 1_000.0)
    } else {
        format!("{sign}${a:.0}")
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    let y = chart.y + chart.height;
    if y < inner.y + inner.height - 1 {
        for i in 0..ticks {
            let u = i as f64 / (ticks as f64 - 1.0);
            let label = fmt_axis_year(x_bounds[0] + u * (x_bounds[1] - x_bounds[0]));
            let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
            let start = x.saturating_sub((label.len() / 2) as u16);
            let width = label.len() as u16;
            frame.render_widget(Paragraph::new(label).style(style), Rect { x: start, y, width, height: 1 });
        }
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let label = fmt_axis_money(y_bounds[0] + u * (y_bounds[1] - y_bounds[0]));
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label.len() as u16);
        if start < inner.x {
            continue;
        }
        let width = label.len() as u16;
        frame.render_widget(Paragraph::new(label).style(style), Rect { x: start, y, width, height: 1 });
    }

    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        let x_label = Paragraph::new("year").alignment(Alignment::Center).style(style);
        frame.render_widget(x_label, x_rect);
    }
}
