use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use gm_terminal::elapsed::{format_join_date, humanize_last_online};
use gm_terminal::feed;
use gm_terminal::player_fetch::country_code_from_path;
use gm_terminal::state::{
    apply_delta, AppState, Delta, PlayerProfile, ProviderCommand, RequestPhase, Screen,
};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: mpsc::Sender<ProviderCommand>,
}

impl App {
    fn new(cmd_tx: mpsc::Sender<ProviderCommand>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('?') => {
                self.state.help_overlay = !self.state.help_overlay;
                return;
            }
            KeyCode::Char('c') => {
                self.state.console_overlay = !self.state.console_overlay;
                return;
            }
            _ => {}
        }

        match self.state.screen {
            Screen::Roster => match key.code {
                KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
                KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
                KeyCode::Char('g') => self.state.select_first(),
                KeyCode::Char('G') => self.state.select_last(),
                KeyCode::Char('d') | KeyCode::Enter => self.open_selected_profile(),
                KeyCode::Char('r') => self.request_roster(true),
                _ => {}
            },
            Screen::Profile { .. } => match key.code {
                KeyCode::Char('b') | KeyCode::Esc => self.state.close_profile(),
                KeyCode::Char('r') => self.request_profile(true),
                _ => {}
            },
        }
    }

    fn request_roster(&mut self, announce: bool) {
        self.state.roster.begin();
        if self.cmd_tx.send(ProviderCommand::FetchRoster).is_err() {
            self.state.roster.fail("roster fetch unavailable");
            self.state.push_log("[WARN] Roster request failed to send");
        } else if announce {
            self.state.push_log("[INFO] Refetching grandmaster roster");
        }
    }

    fn open_selected_profile(&mut self) {
        let Some(username) = self.state.selected_username().map(str::to_string) else {
            self.state.push_log("[INFO] No player selected");
            return;
        };
        self.state.open_profile(username);
        self.request_profile(false);
    }

    /// Starts (or restarts) the whole two-step profile sequence for the
    /// open profile screen.
    fn request_profile(&mut self, announce: bool) {
        let Some(username) = self.state.open_username().map(str::to_string) else {
            return;
        };
        self.state.profile.begin();
        let cmd = ProviderCommand::FetchProfile {
            username: username.clone(),
        };
        if self.cmd_tx.send(cmd).is_err() {
            self.state.profile.fail("profile fetch unavailable");
            self.state.push_log("[WARN] Profile request failed to send");
        } else if announce {
            self.state.push_log(format!("[INFO] Refetching profile for {username}"));
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    feed::spawn_provider(tx, cmd_rx);

    let mut app = App::new(cmd_tx);
    app.request_roster(false);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        app.state.last_seen.tick();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match &app.state.screen {
        Screen::Roster => render_roster(frame, chunks[1], &app.state),
        Screen::Profile { username } => render_profile(frame, chunks[1], &app.state, username),
    }

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[2]);

    if app.state.console_overlay {
        render_console_overlay(frame, frame.size(), &app.state);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match &state.screen {
        Screen::Roster => format!(
            "GM TERMINAL | Grandmaster Roster | {} players",
            state.roster_players().len()
        ),
        Screen::Profile { username } => format!("GM TERMINAL | Profile | {username}"),
    };
    let line1 = format!("  _+_  {title}");
    let line2 = "  ( )".to_string();
    let line3 = "  /_\\".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::Roster => {
            "Enter/d Profile | j/k/↑/↓ Move | g/G Ends | r Refetch | c Console | ? Help | q Quit"
                .to_string()
        }
        Screen::Profile { .. } => {
            "b/Esc Back | r Refetch | c Console | ? Help | q Quit".to_string()
        }
    }
}

fn render_roster(frame: &mut Frame, area: Rect, state: &AppState) {
    match state.roster.phase {
        RequestPhase::Idle | RequestPhase::Loading => {
            render_status_panel(frame, area, "Loading grandmasters...");
        }
        RequestPhase::Error => {
            let message = state.roster.error.as_deref().unwrap_or("unknown error");
            render_error_panel(frame, area, message);
        }
        RequestPhase::Success => render_roster_rows(frame, area, state),
    }
}

fn render_roster_rows(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let widths = roster_columns();
    render_roster_header(frame, sections[0], &widths);

    let list_area = sections[1];
    let players = state.roster_players();
    if players.is_empty() {
        let empty = Paragraph::new("No grandmasters in the roster")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }
    if list_area.height == 0 {
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, players.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };

        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };

        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let rank = format!("#{}", idx + 1);
        render_cell_text(frame, cols[0], &rank, row_style);
        render_cell_text(frame, cols[1], &players[idx], row_style);
    }
}

fn roster_columns() -> [Constraint; 2] {
    [Constraint::Length(8), Constraint::Min(16)]
}

fn render_roster_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "Rank", style);
    render_cell_text(frame, cols[1], "Player", style);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn render_profile(frame: &mut Frame, area: Rect, state: &AppState, username: &str) {
    match state.profile.phase {
        RequestPhase::Idle | RequestPhase::Loading => {
            let message = format!("Loading profile for {username}...");
            render_status_panel(frame, area, &message);
        }
        RequestPhase::Error => {
            let message = state.profile.error.as_deref().unwrap_or("unknown error");
            render_error_panel(frame, area, message);
        }
        RequestPhase::Success => match &state.profile.data {
            Some(profile) => render_profile_card(frame, area, state, profile),
            None => render_error_panel(frame, area, "Profile not found"),
        },
    }
}

fn render_profile_card(frame: &mut Frame, area: Rect, state: &AppState, profile: &PlayerProfile) {
    let now_ms = Utc::now().timestamp_millis();

    let mut title_spans = vec![Span::styled(
        profile.username.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(name) = &profile.name {
        title_spans.push(Span::styled(
            format!("  {name}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    title_spans.push(badge(" [Grandmaster]", Color::Yellow));
    if profile.verified == Some(true) {
        title_spans.push(badge(" [Verified]", Color::Green));
    }
    if profile.is_streamer == Some(true) {
        title_spans.push(badge(" [Streamer]", Color::Magenta));
    }

    let last_seen = if state.last_seen.display().is_empty() {
        "-".to_string()
    } else {
        state.last_seen.display().to_string()
    };
    let country_text = match &state.country {
        Some(info) => format!("{} ({})", info.name, info.code),
        None => country_code_from_path(&profile.country)
            .map(|code| code.to_uppercase())
            .unwrap_or_else(|| "Unknown".to_string()),
    };

    let mut lines = vec![
        Line::from(title_spans),
        Line::raw(""),
        Line::from(vec![
            Span::styled(
                format!("{:<22}", "Time since last online"),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                last_seen,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  HH:MM:SS", Style::default().fg(Color::DarkGray)),
        ]),
        kv_line("Account status", profile.status.clone()),
        kv_line("Player ID", format!("#{}", profile.player_id)),
        kv_line("Member since", format_join_date(profile.joined)),
        kv_line(
            "Last online",
            humanize_last_online(now_ms, profile.last_online),
        ),
        kv_line("Followers", group_thousands(profile.followers)),
        kv_line("Country", country_text),
    ];

    if let Some(location) = &profile.location {
        lines.push(kv_line("Location", location.clone()));
    }
    if let Some(league) = &profile.league {
        lines.push(kv_line("League", league.clone()));
    }
    if let Some(fide) = profile.fide {
        lines.push(kv_line("FIDE rating", fide.to_string()));
    }

    if !profile.streaming_platforms.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Streaming platforms",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for platform in &profile.streaming_platforms {
            lines.push(Line::from(Span::styled(
                format!("  {platform}"),
                Style::default().fg(Color::Blue),
            )));
        }
    }

    lines.push(Line::raw(""));
    lines.push(kv_line("Profile URL", profile.url.clone()));

    let card = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Grandmaster Profile "));
    frame.render_widget(card, area);
}

fn badge(text: &str, color: Color) -> Span<'static> {
    Span::styled(
        text.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}

fn kv_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{label:<22}"),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw(value),
    ])
}

fn render_status_panel(frame: &mut Frame, area: Rect, message: &str) {
    let panel = Paragraph::new(message)
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn render_error_panel(frame: &mut Frame, area: Rect, message: &str) {
    let lines = vec![
        Line::from(Span::styled(
            "Error",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::raw(message.to_string()),
        Line::raw(""),
        Line::from(Span::styled(
            "Press r to try again",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn render_console_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let rect = overlay_rect(area, area.width.saturating_sub(8).max(20), 12);
    frame.render_widget(Clear, rect);

    let capacity = rect.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .take(capacity)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .map(|entry| Line::raw(entry.clone()))
        .collect();

    let console = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Console "));
    frame.render_widget(console, rect);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let rect = overlay_rect(area, 64, 10);
    frame.render_widget(Clear, rect);

    let lines = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::raw("Roster    j/k/↑/↓ move, g/G ends, Enter/d open profile"),
        Line::raw("Profile   b/Esc back, r refetch"),
        Line::raw("Anywhere  r refetch, c console, ? help, q quit"),
    ];
    let help = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Help "));
    frame.render_widget(help, rect);
}

fn overlay_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Window of rows to draw, keeping the selection roughly centered.
fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total <= visible {
        return (0, total);
    }
    let half = visible / 2;
    let start = selected.saturating_sub(half).min(total - visible);
    (start, start + visible)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
