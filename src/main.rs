mod app;
mod config;
mod event;
mod input;
mod logging;
mod pattern;
mod report;
mod session;
mod stats;
mod store;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};

use app::{App, AppScreen};
use config::Config;
use event::{AppEvent, EventHandler};
use pattern::source::{FilePatternSource, PatternSource};
use stats::StatsAggregator;
use store::StatsSink;
use store::json_store::JsonStore;
use store::memory::MemoryStore;
use ui::components::pattern_display::PatternDisplay;
use ui::components::stats_table::StatsTable;
use ui::layout::{AppLayout, centered_rect};
use ui::theme::Theme;

const TICK_RATE: Duration = Duration::from_millis(50);

#[derive(Parser)]
#[command(
    name = "strokr",
    version,
    about = "Terminal trainer for keystroke and mouse-click patterns"
)]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Pattern file (name|pattern per line)")]
    patterns: Option<PathBuf>,

    #[arg(short, long, help = "Pause after a finished pattern, in milliseconds")]
    delay_ms: Option<u64>,

    #[arg(long, help = "Print stats and exit")]
    stats: bool,

    #[arg(long, help = "Do not read or write the stats file")]
    ephemeral: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!(
            "Ignoring unreadable config {}: {e}",
            Config::config_path().display()
        );
        Config::default()
    });
    // First run: leave an editable config behind.
    if !Config::config_path().exists()
        && let Err(e) = config.save()
    {
        eprintln!("Cannot write default config: {e:#}");
    }
    if let Some(theme) = cli.theme.clone() {
        config.theme = theme;
    }
    if let Some(delay) = cli.delay_ms {
        config.advance_delay_ms = delay;
    }
    config.validate(&Theme::available_themes());

    if let Err(e) = logging::init(&PathBuf::from(&config.log_file), &config.log_level) {
        eprintln!("Logging disabled: {e:#}");
    }
    info!(theme = %config.theme, delay_ms = config.advance_delay_ms, "starting");

    let sink: Box<dyn StatsSink> = if cli.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        let path = PathBuf::from(&config.stats_file);
        Box::new(
            JsonStore::new(path.clone())
                .with_context(|| format!("cannot prepare stats file {}", path.display()))?,
        )
    };
    let stats = StatsAggregator::new(sink);

    if cli.stats {
        print!("{}", report::stats_report(&stats));
        return Ok(());
    }

    let explicit = cli
        .patterns
        .or_else(|| config.patterns_file.as_ref().map(PathBuf::from));
    let patterns = FilePatternSource::with_standard_locations(explicit).load();

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        warn!(theme = %config.theme, "theme not found, using default");
        Theme::default()
    });
    let mut app = App::new(&config, theme, patterns, stats);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(TICK_RATE);

    let result = run_app(&mut terminal, &mut app, &events);

    // Persist whatever the running session has so far.
    app.session.stop(Instant::now());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let signal = match events.next()? {
            AppEvent::Key(key) => input::map_key(&key, app.in_session()),
            AppEvent::Mouse(mouse) => input::map_mouse(&mouse, app.in_session()),
            AppEvent::Tick | AppEvent::Resize(_, _) => None,
        };
        let now = Instant::now();
        if let Some(signal) = signal {
            app.handle_signal(signal, now);
        }
        app.tick(now);

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " strokr ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} patterns ", app.session.patterns().len()),
            Style::default().fg(colors.dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    match app.screen {
        AppScreen::Trainer => {
            let main = centered_rect(80, 80, layout.main);
            frame.render_widget(
                PatternDisplay::new(
                    &app.session,
                    app.feedback.as_ref(),
                    app.save_failed,
                    &app.theme,
                    Instant::now(),
                ),
                main,
            );
        }
        AppScreen::Stats => {
            frame.render_widget(StatsTable::new(app.session.stats(), &app.theme), layout.main);
        }
    }

    let hints = if app.in_session() {
        " [Esc] Stop  [Ctrl+C] Quit "
    } else if app.screen == AppScreen::Stats {
        " [Space] Train  [Esc] Back  [q] Quit "
    } else {
        " [Space] Train  [s] Stats  [q] Quit "
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        hints,
        Style::default().fg(colors.dim()),
    )));
    frame.render_widget(footer, layout.footer);
}
