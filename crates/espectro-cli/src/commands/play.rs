//! Interactive playback with the live spectrum view.
//!
//! One cooperative tick loop drives everything: each pass polls the
//! keyboard, takes a spectrum snapshot, updates the dominant tracker, and
//! redraws. The loop runs at display cadence (~60 Hz) and each cycle
//! completes before the next starts; the audio callback only ever touches
//! the player's shared handles.

use clap::Args;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};
use std::collections::BTreeMap;
use std::io::stdout;
use std::path::PathBuf;
use std::time::Duration;

use espectro_analysis::bars::{DEFAULT_BAR_COUNT, DEFAULT_MAX_FREQ, DEFAULT_MIN_FREQ};
use espectro_analysis::{DisplayBar, DominantTracker, TimelineEntry, map_to_bars};
use espectro_config::BandLayout;
use espectro_core::{NoteLabel, note_gridlines};
use espectro_io::{OutputStream, Player, StreamConfig, decode_audio};

use crate::render::{SpectrumView, TimelineView, format_time};

#[derive(Args)]
pub struct PlayArgs {
    /// Audio file to play (mp3, wav, ogg, m4a, flac)
    input: PathBuf,

    /// Equalizer preset (factory or user preset name)
    #[arg(short, long)]
    preset: Option<String>,

    /// Band gain override, e.g. "mid=6" (repeatable)
    #[arg(long = "gain", value_parser = super::parse_band_gain)]
    gains: Vec<(String, f32)>,

    /// Output device name or index
    #[arg(long)]
    output_device: Option<String>,

    /// Initial volume (0.0 - 1.0)
    #[arg(long, default_value = "0.7")]
    volume: f32,
}

/// Application state for the play view.
struct PlayApp {
    player: Player,
    layout: BandLayout,
    gains: BTreeMap<String, f32>,
    /// Currently selected band index (for gain keys).
    selected_band: usize,
    tracker: DominantTracker,
    timeline: Vec<TimelineEntry>,
    bars: Vec<DisplayBar>,
    /// Gridline labels depend only on the fixed display range.
    gridlines: Vec<NoteLabel>,
    status: String,
    should_quit: bool,
}

impl PlayApp {
    fn new(player: Player, layout: BandLayout, gains: BTreeMap<String, f32>) -> Self {
        Self {
            player,
            layout,
            gains,
            selected_band: 0,
            tracker: DominantTracker::new(),
            timeline: Vec::new(),
            bars: Vec::new(),
            gridlines: note_gridlines(DEFAULT_MIN_FREQ, DEFAULT_MAX_FREQ),
            status: "space: play/pause | tab: band | +/-: gain | ←/→: seek | q: quit".to_string(),
            should_quit: false,
        }
    }

    /// One sample/track cycle: snapshot, bars, tracker, timeline.
    fn tick(&mut self) {
        let snapshot = self.player.snapshot();
        let mut bars = map_to_bars(
            &snapshot,
            DEFAULT_BAR_COUNT,
            DEFAULT_MIN_FREQ,
            DEFAULT_MAX_FREQ,
        );

        // Only a running transport feeds the timeline; a paused one keeps
        // the last spectrum on screen without emitting entries
        if self.player.is_playing()
            && let Some(entry) = self
                .tracker
                .update(&mut bars, self.player.position_seconds())
        {
            self.timeline.push(entry);
        }

        self.bars = bars;
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                self.player.toggle();
                if self.player.at_end() && self.player.is_playing() {
                    // Replay from the top after the track finished
                    self.player.seek(0.0);
                }
            }
            KeyCode::Left => self.player.seek_by(-5.0),
            KeyCode::Right => self.player.seek_by(5.0),
            KeyCode::Up => self.player.set_volume(self.player.volume() + 0.05),
            KeyCode::Down => self.player.set_volume(self.player.volume() - 0.05),
            KeyCode::Tab => {
                self.selected_band = (self.selected_band + 1) % self.layout.bands.len();
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_gain(1.0),
            KeyCode::Char('-') | KeyCode::Char('_') => self.adjust_gain(-1.0),
            KeyCode::Char('r') => self.reset_gains(),
            _ => {}
        }
    }

    fn adjust_gain(&mut self, delta_db: f32) {
        let Some(band) = self.layout.bands.get(self.selected_band) else {
            return;
        };
        let current = self.gains.get(&band.id).copied().unwrap_or(0.0);
        let target = (current + delta_db).clamp(-20.0, 20.0);

        match self.player.set_band_gain(&band.id, target) {
            Ok(()) => {
                self.gains.insert(band.id.clone(), target);
                self.status = format!("{} {:+.0} dB", band.label, target);
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn reset_gains(&mut self) {
        for band in &self.layout.bands {
            if self.player.set_band_gain(&band.id, 0.0).is_ok() {
                self.gains.insert(band.id.clone(), 0.0);
            }
        }
        self.status = "all bands flat".to_string();
    }
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    // Everything that can fail does so before the terminal is touched, so
    // a bad file or device never leaves a half-built pipeline behind
    let audio = decode_audio(&args.input)?;
    tracing::info!(
        file = %args.input.display(),
        duration = audio.duration_seconds(),
        "loaded audio file"
    );
    let layout = BandLayout::five_band();
    let gains = super::resolve_gains(&layout, args.preset.as_deref(), &args.gains)?;

    let player = Player::new(audio);
    player.configure_bands(&layout.to_specs(&gains)?)?;
    player.set_volume(args.volume.clamp(0.0, 1.0));

    let mut stream = OutputStream::new(StreamConfig {
        sample_rate: player.sample_rate(),
        output_device: args.output_device.clone(),
    })?;
    let channels = stream.channels() as usize;
    let callback_player = player.clone();
    stream.start(move |data| callback_player.fill(data, channels))?;
    player.play();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = PlayApp::new(player, layout, gains);

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Teardown is unconditional: terminal restored and stream stopped on
    // every exit path, success or error
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    stream.stop();
    app.player.pause();

    result
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut PlayApp,
) -> anyhow::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| draw_ui(f, app))?;

        if event::poll(Duration::from_millis(16))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key.code);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn draw_ui(frame: &mut Frame, app: &mut PlayApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Transport
            Constraint::Min(10),    // Spectrum
            Constraint::Length(4),  // Band gains
            Constraint::Length(8),  // Timeline
            Constraint::Length(3),  // Status bar
        ])
        .split(frame.area());

    draw_transport(frame, chunks[0], app);
    frame.render_widget(
        SpectrumView::new(&app.bars, &app.gridlines, DEFAULT_MIN_FREQ, DEFAULT_MAX_FREQ),
        chunks[1],
    );
    draw_bands(frame, chunks[2], app);
    frame.render_widget(
        TimelineView::new(&app.timeline, app.player.position_seconds()),
        chunks[3],
    );
    draw_status(frame, chunks[4], app);
}

fn draw_transport(frame: &mut Frame, area: Rect, app: &PlayApp) {
    let state = if app.player.is_playing() { "▶" } else { "⏸" };
    let text = format!(
        " {} {} / {}   vol {:.0}%",
        state,
        format_time(app.player.position_seconds()),
        format_time(app.player.duration_seconds()),
        app.player.volume() * 100.0,
    );
    let transport = Paragraph::new(text)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL).title(" espectro "));
    frame.render_widget(transport, area);
}

fn draw_bands(frame: &mut Frame, area: Rect, app: &PlayApp) {
    let mut line = String::new();
    for (i, band) in app.layout.bands.iter().enumerate() {
        let gain = app.gains.get(&band.id).copied().unwrap_or(0.0);
        let marker = if i == app.selected_band { ">" } else { " " };
        line.push_str(&format!("{marker}{}: {gain:+.0} dB   ", band.label));
    }

    let bands = Paragraph::new(line)
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL).title(" Equalizer "));
    frame.render_widget(bands, area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &PlayApp) {
    let status = Paragraph::new(app.status.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, area);
}
