use anyhow::Result;
use cnpj_lookup::{
    Cnpj, DisplayEntry, RecordView, RegistryClient, SearchSession, SearchState, NO_PARTNERS,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

/// Longest input accepted; room for a fully punctuated CNPJ plus stray spaces
const MAX_INPUT_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Submit,
    Quit,
}

pub struct App<C: RegistryClient> {
    pub input: String,
    pub session: SearchSession<C>,
    pub scroll: u16,
}

impl<C: RegistryClient> App<C> {
    pub fn new(client: C) -> Self {
        Self {
            input: String::new(),
            session: SearchSession::new(client),
            scroll: 0,
        }
    }

    pub fn state(&self) -> &SearchState {
        self.session.state()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyAction {
        if key.kind != KeyEventKind::Press {
            return KeyAction::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('c') if ctrl => KeyAction::Quit,
            KeyCode::Char('u') if ctrl => {
                self.input.clear();
                KeyAction::None
            }
            KeyCode::Enter => KeyAction::Submit,
            KeyCode::Backspace => {
                self.input.pop();
                KeyAction::None
            }
            KeyCode::Char(c) if !ctrl => {
                if self.input.chars().count() < MAX_INPUT_LEN {
                    self.input.push(c);
                }
                KeyAction::None
            }
            KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                KeyAction::None
            }
            KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                KeyAction::None
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                KeyAction::None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                KeyAction::None
            }
            _ => KeyAction::None,
        }
    }

    /// Blocking search. `on_request` runs right before the network call.
    pub fn submit_with<F: FnOnce(&Cnpj)>(&mut self, on_request: F) {
        self.scroll = 0;
        let input = self.input.clone();
        self.session.submit_with(&input, on_request);
    }
}

pub fn run_ui<C: RegistryClient>(app: &mut App<C>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, C: RegistryClient>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match app.handle_key(key) {
                KeyAction::Quit => return Ok(()),
                KeyAction::Submit => {
                    let input = app.input.clone();
                    app.submit_with(|cnpj| {
                        // Best effort: the search proceeds even if this frame fails
                        let _ = terminal.draw(|f| render_searching(f, &input, cnpj));
                    });
                }
                KeyAction::None => {}
            }
        }
    }
}

fn screen_chunks(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Input
            Constraint::Length(3), // Message
            Constraint::Min(0),    // Results
            Constraint::Length(3), // Status bar
        ])
        .split(area)
        .to_vec()
}

fn ui<C: RegistryClient>(f: &mut Frame, app: &App<C>) {
    let chunks = screen_chunks(f.size());

    render_header(f, chunks[0]);
    render_input(f, chunks[1], &app.input, true);
    render_message(f, chunks[2], app.state());

    match app.state().outcome() {
        Some(outcome) => render_results(f, chunks[3], &outcome.view, app.scroll),
        None => render_empty(f, chunks[3]),
    }

    render_status_bar(f, chunks[4], app.state());
}

/// Frame drawn while the request blocks
fn render_searching(f: &mut Frame, input: &str, cnpj: &Cnpj) {
    let chunks = screen_chunks(f.size());

    render_header(f, chunks[0]);
    render_input(f, chunks[1], input, false);

    let message = Paragraph::new(Line::from(Span::styled(
        format!(" Searching {}...", cnpj),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Yellow)));
    f.render_widget(message, chunks[2]);

    render_empty(f, chunks[3]);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "🏢 Brazil API CNPJ Lookup",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            "Enter a CNPJ to search for corresponding company information.",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_input(f: &mut Frame, area: Rect, input: &str, show_cursor: bool) {
    let mut spans = vec![
        Span::styled(" CNPJ: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(input.to_string()),
    ];
    if show_cursor {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }

    let input_box = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Accepts CNPJ with dots, slash, and dash or only numbers "),
    );

    f.render_widget(input_box, area);
}

fn render_message(f: &mut Frame, area: Rect, state: &SearchState) {
    let (text, color) = match state {
        SearchState::Failed(err) => (format!(" ❌ {}", err), Color::Red),
        SearchState::Presenting(_) => (" ✅ Data successfully found!".to_string(), Color::Green),
        _ => (" Type a CNPJ and press Enter".to_string(), Color::DarkGray),
    };

    let message = Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));

    f.render_widget(message, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let empty = Paragraph::new("").block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Company Information "),
    );
    f.render_widget(empty, area);
}

/// Rows `text` takes when word-wrapped to `width`, after `indent` leading spaces
fn wrapped_rows(indent: usize, text: &str, width: usize) -> usize {
    let width = width.max(1);
    let mut rows = 1;
    let mut current = indent;
    let mut first = true;

    for word in text.split_whitespace() {
        let len = word.chars().count();
        let needed = if first { current + len } else { current + 1 + len };
        if needed <= width {
            current = needed;
        } else if len <= width {
            rows += 1;
            current = len;
        } else {
            // Words longer than a row are broken across rows
            if current > 0 {
                rows += 1;
            }
            rows += (len - 1) / width;
            current = (len - 1) % width + 1;
        }
        first = false;
    }

    rows
}

/// Height of a bordered column holding `entries` at the given outer width
fn column_height(entries: &[DisplayEntry], outer_width: u16) -> u16 {
    let inner = outer_width.saturating_sub(2) as usize;
    let rows: usize = entries
        .iter()
        .map(|entry| {
            wrapped_rows(1, &format!("{}:", entry.label), inner) + wrapped_rows(3, &entry.value, inner)
        })
        .sum();

    // Borders plus one row of slack for wrap points that differ from ours
    (rows + 3).min(u16::MAX as usize) as u16
}

fn render_results(f: &mut Frame, area: Rect, view: &RecordView, scroll: u16) {
    let half = area.width / 2;
    let column_height = column_height(&view.company, half).max(column_height(&view.registration, half));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(column_height), Constraint::Min(0)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_column(f, columns[0], " Company Information ", &view.company);
    render_column(f, columns[1], " Address & Registration ", &view.registration);
    render_partners_and_activities(f, rows[1], view, scroll);
}

fn render_column(f: &mut Frame, area: Rect, title: &str, entries: &[DisplayEntry]) {
    let mut content = Vec::with_capacity(entries.len() * 2);
    for entry in entries {
        content.push(Line::from(Span::styled(
            format!(" {}:", entry.label),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        content.push(Line::from(format!("   {}", entry.value)));
    }

    let column = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title.to_string()),
        );

    f.render_widget(column, area);
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {}", title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

fn partner_and_activity_lines(view: &RecordView) -> Vec<Line<'static>> {
    let mut lines = vec![section_title("Partners")];

    if view.partners.is_empty() {
        lines.push(Line::from(format!(" {}", NO_PARTNERS)));
    }

    for partner in &view.partners {
        lines.push(Line::from(format!(" - Name: {} ({})", partner.name, partner.qualification)));
        if let Some(tax_id) = &partner.tax_id {
            lines.push(Line::from(Span::styled(
                format!("   - {}: {}", tax_id.kind.label(), tax_id.formatted),
                Style::default().fg(Color::Green),
            )));
        }
        lines.push(Line::from(format!(" - Age Group: {}", partner.age_group)));
        lines.push(Line::from(format!(" - Date of Entry: {}", partner.entry_date)));
        lines.push(Line::from(Span::styled(" ---", Style::default().fg(Color::DarkGray))));
    }

    lines.push(Line::from(""));
    lines.push(section_title("Activities"));
    lines.push(Line::from(Span::styled(" Main Activity:", Style::default().add_modifier(Modifier::BOLD))));
    lines.push(Line::from(format!(" - {}", view.main_activity)));

    if !view.secondary_activities.is_empty() {
        lines.push(Line::from(Span::styled(
            " Secondary Activities:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for activity in &view.secondary_activities {
            lines.push(Line::from(format!(" - {}", activity)));
        }
    }

    lines
}

fn render_partners_and_activities(f: &mut Frame, area: Rect, view: &RecordView, scroll: u16) {
    let paragraph = Paragraph::new(partner_and_activity_lines(view))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Partners & Activities "),
        );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, state: &SearchState) {
    let mut status_spans = vec![Span::styled(
        format!(" {} ", state.name()),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(outcome) = state.outcome() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Fetched {}", outcome.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")),
            Style::default().fg(Color::Green),
        ));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Search | "));
    status_spans.push(Span::styled("Ctrl+U", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Clear | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Scroll | "));
    status_spans.push(Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Fast | "));
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
