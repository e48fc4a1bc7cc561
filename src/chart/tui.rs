//! Interactive terminal histogram view.
//!
//! A one-shot bar-chart screen: the data is static, so the loop only redraws
//! on its tick and waits for `q`/`Esc` to dismiss.

use super::{BinnedSeries, HistogramConfig};
use crate::error::ReportError;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Terminal,
};
use std::io;
use std::time::Duration;

const SERIES_COLORS: [Color; 5] = [
    Color::Blue,
    Color::Red,
    Color::Green,
    Color::Yellow,
    Color::Magenta,
];

fn render_err<E: std::fmt::Display>(e: E) -> ReportError {
    ReportError::Render(e.to_string())
}

pub fn show_histogram(
    edges: &[f64],
    binned: &[BinnedSeries],
    cfg: &HistogramConfig,
) -> Result<(), ReportError> {
    enable_raw_mode().map_err(render_err)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(render_err)?;
    terminal.clear().ok();

    let res = event_loop(&mut terminal, edges, binned, cfg);

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    edges: &[f64],
    binned: &[BinnedSeries],
    cfg: &HistogramConfig,
) -> Result<(), ReportError> {
    loop {
        terminal
            .draw(|f| draw(f, edges, binned, cfg))
            .map_err(render_err)?;

        if event::poll(Duration::from_millis(100)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if matches!(k.code, KeyCode::Char('q') | KeyCode::Esc) {
                    return Ok(());
                }
            }
        }
    }
}

fn draw(f: &mut ratatui::Frame, edges: &[f64], binned: &[BinnedSeries], cfg: &HistogramConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(cfg.title.as_str()),
        )
        .bar_width(6)
        .bar_gap(1)
        .group_gap(2);

    let buckets = edges.len() - 1;
    for bucket in 0..buckets {
        let bars: Vec<Bar> = binned
            .iter()
            .enumerate()
            .map(|(idx, series)| {
                Bar::default()
                    .value(series.counts[bucket])
                    .style(Style::default().fg(SERIES_COLORS[idx % SERIES_COLORS.len()]))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(format!("{:.0}", edges[bucket])))
                .bars(&bars),
        );
    }
    f.render_widget(chart, chunks[0]);

    // Legend plus axis labels; the bar groups only carry bucket edges.
    let mut spans: Vec<Span> = vec![Span::raw(format!(
        "{} by {}   ",
        cfg.y_label, cfg.x_label
    ))];
    for (idx, series) in binned.iter().enumerate() {
        spans.push(Span::styled(
            format!("■ {}  ", series.label),
            Style::default().fg(SERIES_COLORS[idx % SERIES_COLORS.len()]),
        ));
    }
    spans.push(Span::raw("(q to close)"));
    let legend =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(legend, chunks[1]);
}
