use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};

use dhtkv_compare::{Histogram, differences, load_pair, load_values};

#[derive(Parser, Debug)]
#[command(
    name = "dhtkv-hist",
    about = "Histograma de latências (um arquivo) ou de diferenças pareadas (dois arquivos)"
)]
struct Args {
    a: PathBuf,
    b: Option<PathBuf>,
    /// Título do gráfico
    #[arg(long)]
    title: Option<String>,
}

struct App {
    title: String,
    source: String,
    samples: usize,
    histogram: Histogram,
}

impl App {
    fn load(args: Args) -> Result<Self> {
        let (values, default_title, source) = match &args.b {
            None => (
                load_values(&args.a)?,
                "Latency",
                args.a.display().to_string(),
            ),
            Some(b) => (
                differences(&load_pair(&args.a, b)?),
                "Latency Difference",
                format!("{} - {}", args.a.display(), b.display()),
            ),
        };

        Ok(Self {
            title: args.title.unwrap_or_else(|| default_title.to_string()),
            source,
            samples: values.len(),
            histogram: Histogram::new(&values),
        })
    }
}

fn main() -> Result<()> {
    let app = App::load(Args::parse())?;

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &app);

    // Restore Terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let size = f.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(size);

    // Header
    let header = Paragraph::new(format!(
        "{} amostras em {} bins | {} (q para sair)",
        app.samples,
        app.histogram.bins.len(),
        app.source
    ))
    .block(Block::default().borders(Borders::ALL).title("Routes"))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, chunks[0]);

    // Chart
    let bars: Vec<Bar> = app
        .histogram
        .bins
        .iter()
        .map(|bin| {
            Bar::default()
                .value(bin.count)
                .label(Line::from(format!("{:.0}", bin.start)))
                .style(Style::default().fg(Color::Yellow))
        })
        .collect();

    let bin_count = app.histogram.bins.len().max(1) as u16;
    let inner_width = chunks[1].width.saturating_sub(2);
    let bar_width = (inner_width / bin_count).saturating_sub(1).max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(app.title.as_str())
                .borders(Borders::ALL),
        )
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(app.histogram.max_count().max(1));

    f.render_widget(chart, chunks[1]);
}
