use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use super::state::UiState;

/// Colors for one of the two themes.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub fg: Color,
    pub bg: Color,
    pub muted: Color,
    pub accent: Color,
    pub bar: Color,
    pub changed: Color,
}

impl Palette {
    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self {
                fg: Color::White,
                bg: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Yellow,
                bar: Color::LightBlue,
                changed: Color::LightRed,
            }
        } else {
            Self {
                fg: Color::Reset,
                bg: Color::Reset,
                muted: Color::Gray,
                accent: Color::Yellow,
                bar: Color::Blue,
                changed: Color::Red,
            }
        }
    }
}

/// Bar width and gap that fit `count` bars into `width` columns.
/// Falls back to one-column bars with no gap when space is short.
pub fn bar_layout(width: u16, count: usize) -> (u16, u16) {
    if count == 0 {
        return (1, 0);
    }
    let width = width as usize;
    let gaps = count - 1;
    if width >= count + gaps {
        return (((width - gaps) / count) as u16, 1);
    }
    ((width / count).max(1) as u16, 0)
}

/// Shift values so the smallest bar starts at zero when negatives are present.
fn bar_values(values: &[i64]) -> (Vec<u64>, u64) {
    let floor = values.iter().copied().min().unwrap_or(0).min(0);
    let shifted: Vec<u64> = values.iter().map(|v| v.abs_diff(floor)).collect();
    let max = shifted.iter().copied().max().unwrap_or(0).max(1);
    (shifted, max)
}

pub fn draw_bars(area: Rect, f: &mut Frame, state: &UiState, palette: Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} ({} values)", state.algorithm.label(), state.input.len()))
        .style(Style::default().fg(palette.fg).bg(palette.bg));

    let snapshot = &state.snapshot;
    let Some(current) = snapshot.current.as_ref() else {
        let msg = if state.fetching {
            "Fetching sorting steps…"
        } else {
            "No sorting data available. Press Enter to start sorting."
        };
        let inner_height = area.height.saturating_sub(2);
        let mut lines = vec![Line::from(""); (inner_height / 2) as usize];
        lines.push(Line::from(msg));
        let p = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    };

    let changed = snapshot.changed_indices();
    let (values, max) = bar_values(current);
    let (bar_width, bar_gap) = bar_layout(area.width.saturating_sub(2), values.len());
    let show_text = bar_width as usize
        >= current
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);

    let bars: Vec<Bar> = values
        .iter()
        .zip(current.iter())
        .enumerate()
        .map(|(i, (&v, raw))| {
            let color = if changed.contains(&i) {
                palette.changed
            } else {
                palette.bar
            };
            let text = if show_text {
                raw.to_string()
            } else {
                String::new()
            };
            Bar::default()
                .value(v)
                .text_value(text)
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(palette.bg).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(bar_gap)
        .max(max);
    f.render_widget(chart, area);
}
