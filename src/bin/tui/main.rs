mod app;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use house_rocket::engine::pricing::Markup;
use house_rocket::types::Season;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};

use app::{format_money, format_range, format_seasons, truncate, AppState, ConnectionStatus};

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(io::Error::other)?;

    let mut app = AppState::new(base_url);

    // Initial fetch before rendering
    app.refresh(&client).await;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut table_state = TableState::default();

    let result = run_loop(&mut terminal, &mut app, &client, &mut table_state).await;

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    client: &reqwest::Client,
    table_state: &mut TableState,
) -> io::Result<()> {
    let refresh_interval = Duration::from_secs(2);
    let mut last_tick = std::time::Instant::now();

    loop {
        terminal.draw(|f| render(f, app, table_state))?;

        let timeout = refresh_interval
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let season = match key.code {
                        KeyCode::Char('1') => Some(Season::Spring),
                        KeyCode::Char('2') => Some(Season::Summer),
                        KeyCode::Char('3') => Some(Season::Fall),
                        KeyCode::Char('4') => Some(Season::Winter),
                        _ => None,
                    };
                    if let Some(season) = season {
                        app.toggle_season(season);
                        table_state.select(None);
                        app.refresh(client).await;
                        last_tick = std::time::Instant::now();
                        continue;
                    }

                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            app.refresh(client).await;
                            last_tick = std::time::Instant::now();
                        }
                        KeyCode::Char('c') | KeyCode::Char('C') => {
                            app.clear_seasons();
                            table_state.select(None);
                            app.refresh(client).await;
                            last_tick = std::time::Instant::now();
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            let max = app.recommendations.candidates.len().saturating_sub(1);
                            let next = table_state.selected().map_or(0, |i| (i + 1).min(max));
                            table_state.select(Some(next));
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            let prev = table_state.selected().map_or(0, |i| i.saturating_sub(1));
                            table_state.select(Some(prev));
                        }
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= refresh_interval {
            app.refresh(client).await;
            last_tick = std::time::Instant::now();
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &AppState, table_state: &mut TableState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_body(f, app, table_state, chunks[1]);
    render_footer(f, chunks[2]);
}

fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_text, status_color) = match &app.status {
        ConnectionStatus::Connected => ("● connected".to_string(), Color::Green),
        ConnectionStatus::Connecting => ("◌ connecting".to_string(), Color::Yellow),
        ConnectionStatus::Error(e) => (format!("✗ {}", truncate(e, 40)), Color::Red),
    };

    let recs = &app.recommendations;
    let spans = vec![
        Span::styled(
            " House Rocket  ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(
            format!("{} to buy", recs.count),
            Style::default().fg(Color::White),
        ),
        Span::raw("  │  "),
        Span::styled(
            format!("profit {}", format_money(recs.total_profit)),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  │  "),
        Span::styled(
            format!("sell in: {}", format_seasons(&app.seasons)),
            Style::default().fg(Color::White),
        ),
    ];

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(paragraph, area);
}

fn render_body(f: &mut Frame, app: &AppState, table_state: &mut TableState, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
        .split(area);

    render_candidates_table(f, app, table_state, halves[0]);
    render_side_panel(f, app, halves[1]);
}

fn render_candidates_table(f: &mut Frame, app: &AppState, state: &mut TableState, area: Rect) {
    let header_cells = ["Id", "Zip", "Season", "Built", "Price", "Markup", "Sale", "Profit"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .recommendations
        .candidates
        .iter()
        .map(|c| {
            let sale_color = match c.markup {
                Markup::Undervalued => Color::LightGreen,
                Markup::Standard => Color::White,
            };
            Row::new(vec![
                Cell::from(c.id.to_string()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(c.zipcode.to_string()),
                Cell::from(c.season.to_string()).style(Style::default().fg(Color::Cyan)),
                Cell::from(c.year_built.to_string()),
                Cell::from(format_money(c.price)),
                Cell::from(c.markup.to_string()).style(Style::default().fg(sale_color)),
                Cell::from(format_money(c.sale_price)).style(Style::default().fg(sale_color)),
                Cell::from(format_money(c.profit)).style(Style::default().fg(Color::Green)),
            ])
        })
        .collect();

    let title = format!(
        " TO BUY ({} of {}) ",
        app.recommendations.returned, app.recommendations.count
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Min(10),
            Constraint::Length(11),
            Constraint::Min(10),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                title,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    f.render_stateful_widget(table, area, state);
}

fn render_side_panel(f: &mut Frame, app: &AppState, area: Rect) {
    let applied = &app.recommendations.applied;
    let label = Style::default().fg(Color::Yellow);

    let year_range = applied
        .year_built
        .map_or("—".to_string(), |r| format!("{:.0} – {:.0}", r.min, r.max));

    let lines = vec![
        Line::from(Span::styled("Applied filters", label.add_modifier(Modifier::BOLD))),
        Line::from(vec![Span::styled("built  ", label), Span::raw(year_range)]),
        Line::from(vec![Span::styled("price  ", label), Span::raw(format_range(applied.price))]),
        Line::from(vec![Span::styled("profit ", label), Span::raw(format_range(applied.profit))]),
        Line::raw(""),
        Line::from(Span::styled("Server", label.add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("rows     ", label),
            Span::raw(format!(
                "{} / {}",
                app.health.rows_normalized, app.health.rows_loaded
            )),
        ]),
        Line::from(vec![
            Span::styled("requests ", label),
            Span::raw(app.health.requests_served.to_string()),
        ]),
        Line::from(vec![
            Span::styled("uptime   ", label),
            Span::raw(format!("{}s", app.health.uptime_secs)),
        ]),
        Line::from(vec![
            Span::styled("updated  ", label),
            Span::raw(format!("{}s ago", app.last_refresh.elapsed().as_secs())),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                " SUMMARY ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
    );
    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let key = Style::default().fg(Color::Yellow);
    let line = Line::from(vec![
        Span::styled(" [q] ", key),
        Span::raw("quit  "),
        Span::styled("[r] ", key),
        Span::raw("refresh  "),
        Span::styled("[1-4] ", key),
        Span::raw("spring/summer/fall/winter  "),
        Span::styled("[c] ", key),
        Span::raw("all seasons  "),
        Span::styled("[↑↓ / j k] ", key),
        Span::raw("scroll  "),
        Span::styled("auto-refresh: 2s", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line).style(Style::default().fg(Color::White)), area);
}
