//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - outstanding balance: `-` line
//! - year-end balances: `o`
//! - cumulative interest paid: `*`

use crate::domain::AmortizationPeriod;
use crate::report::fmt_money;

/// Render the loan balance (and cumulative interest) over the schedule.
pub fn render_balance_plot(schedule: &[AmortizationPeriod], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (balance, interest) = balance_series(schedule);
    let x_max = balance.last().map(|&(x, _)| x).unwrap_or(1.0).max(1.0);
    let (y_min, y_max) = y_range(&balance, &interest).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Curves first so the year markers overlay them.
    draw_curve(&mut grid, &balance, x_max, y_min, y_max, '-');
    draw_curve(&mut grid, &interest, x_max, y_min, y_max, '*');

    for &(x, y) in balance.iter().skip(1) {
        let col = map_x(x, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: year=[0, {x_max:.0}] | balance=[{}, {}] | o balance, * cumulative interest\n",
        fmt_money(y_min.max(0.0)),
        fmt_money(y_max),
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    out
}

/// `(year, balance)` and `(year, cumulative interest)`, both starting at year 0.
pub fn balance_series(schedule: &[AmortizationPeriod]) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let mut balance = Vec::with_capacity(schedule.len() + 1);
    let mut interest = Vec::with_capacity(schedule.len() + 1);

    let start = schedule.first().map(|p| p.beginning_balance).unwrap_or(0.0);
    balance.push((0.0, start));
    interest.push((0.0, 0.0));

    let mut cumulative = 0.0;
    for p in schedule {
        cumulative += p.interest_paid;
        balance.push((f64::from(p.year), p.ending_balance));
        interest.push((f64::from(p.year), cumulative));
    }

    (balance, interest)
}

fn y_range(a: &[(f64, f64)], b: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in a.iter().chain(b) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = (x / x_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_max: f64, y_min: f64, y_max: f64, ch: char) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        let col = map_x(x, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, ch);
        } else if grid[row][col] == ' ' {
            grid[row][col] = ch;
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish). Never overwrites non-blank cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::amortization_schedule;

    #[test]
    fn plot_golden_snapshot_zero_rate() {
        let schedule = amortization_schedule(100_000.0, 0.0, 4).unwrap();
        let txt = render_balance_plot(&schedule, 10, 5);
        let expected = concat!(
            "Plot: year=[0, 4] | balance=[$0, $105,000] | o balance, * cumulative interest\n",
            "-\n",
            " -o-\n",
            "    -o\n",
            "      -o\n",
            "********-o\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn plot_has_requested_size_and_markers() {
        let schedule = amortization_schedule(800_000.0, 5.0, 20).unwrap();
        let txt = render_balance_plot(&schedule, 60, 12);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 13);
        assert!(lines[0].starts_with("Plot: year=[0, 20]"));
        assert!(lines[1..].iter().all(|l| l.chars().count() <= 60));
        assert_eq!(txt.matches('o').count() - lines[0].matches('o').count(), 20);
        assert!(txt.contains('*'));
    }

    #[test]
    fn empty_schedule_does_not_panic() {
        let txt = render_balance_plot(&[], 3, 2);
        assert_eq!(txt.lines().count(), 6);
    }
}
