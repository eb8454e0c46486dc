use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn keybind(key: &'static str, pad: usize, what: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(what),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame, log_path: Option<&std::path::Path>) {
    let mut lines = vec![
        Line::from("Keybinds:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("q", Style::default().fg(Color::Magenta)),
            Span::raw(" / "),
            Span::styled("Ctrl-C", Style::default().fg(Color::Magenta)),
            Span::raw("  Quit"),
        ]),
        keybind("Enter", 7, "Start sorting"),
        keybind("n", 11, "New random array"),
        keybind("↑/↓", 9, "Select algorithm"),
        keybind("←/→", 9, "Step backward / forward"),
        keybind("Home/End", 4, "First / last step"),
        keybind("space", 7, "Play until end / Pause"),
        keybind("+/-", 9, "Faster / slower"),
        keybind("d", 11, "Toggle dark mode"),
        keybind("s", 11, "Save run as JSON"),
        keybind("y", 11, "Copy current step to clipboard"),
        keybind("tab", 9, "Switch tabs"),
        keybind("?", 11, "Show this help"),
        Line::from(""),
        Line::from("Legend:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("█", Style::default().fg(Color::Blue)),
            Span::raw("  unchanged since previous step"),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("█", Style::default().fg(Color::Red)),
            Span::raw("  moved in this step"),
        ]),
    ];
    if let Some(path) = log_path {
        lines.push(Line::from(""));
        lines.push(Line::from("Log file:"));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(path.display().to_string(), Style::default().fg(Color::Cyan)),
        ]));
    }

    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
