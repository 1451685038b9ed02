//! Terminal spectrum rendering.
//!
//! [`SpectrumView`] draws the display bars as vertical columns with note
//! gridlines along the frequency axis; [`TimelineView`] lists the dominant
//! frequency entries captured so far. Both are pure consumers of the
//! analysis output and never touch playback state.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};

use espectro_analysis::{DisplayBar, TimelineEntry};
use espectro_core::{NoteLabel, frequency_to_note};

/// Eighth-block glyphs for sub-cell bar heights, empty to full.
const BLOCKS: [&str; 9] = [" ", "▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// Format seconds as `m:ss.s`.
pub fn format_time(seconds: f32) -> String {
    let minutes = (seconds / 60.0).floor() as u32;
    let rest = seconds - minutes as f32 * 60.0;
    format!("{minutes}:{rest:04.1}")
}

/// Human-readable form of one timeline entry's frequency, e.g. `A4 440 Hz`.
pub fn describe_frequency(freq_hz: f32) -> String {
    frequency_to_note(freq_hz).map_or_else(
        |_| format!("{freq_hz:.0} Hz"),
        |label| format!("{label} {freq_hz:.0} Hz"),
    )
}

/// The spectrum display: bars scaled by height, dominant bars highlighted,
/// note gridlines along the bottom axis.
pub struct SpectrumView<'a> {
    bars: &'a [DisplayBar],
    gridlines: &'a [NoteLabel],
    min_freq: f32,
    max_freq: f32,
}

impl<'a> SpectrumView<'a> {
    /// Create a view over the current frame's bars and the cached
    /// gridlines for the display range.
    pub fn new(
        bars: &'a [DisplayBar],
        gridlines: &'a [NoteLabel],
        min_freq: f32,
        max_freq: f32,
    ) -> Self {
        Self {
            bars,
            gridlines,
            min_freq,
            max_freq,
        }
    }

    /// Horizontal position of a frequency on the logarithmic axis.
    fn x_for_frequency(&self, freq_hz: f32, width: u16) -> u16 {
        let ratio = (freq_hz / self.min_freq).ln() / (self.max_freq / self.min_freq).ln();
        (ratio.clamp(0.0, 1.0) * (width.saturating_sub(1)) as f32) as u16
    }
}

impl Widget for SpectrumView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().title(" Spectrum ").borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 || inner.width == 0 || self.bars.is_empty() {
            return;
        }

        // Bottom row carries the note axis; the rest is the plot
        let plot_height = inner.height - 1;

        for x in 0..inner.width {
            let bar_idx = (x as usize * self.bars.len()) / inner.width as usize;
            let bar = &self.bars[bar_idx.min(self.bars.len() - 1)];

            let style = if bar.dominant {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };

            // Total column fill in eighths of a cell
            let eighths = (bar.height.clamp(0.0, 1.0) * plot_height as f32 * 8.0).round() as u32;
            for y in 0..plot_height {
                let cell = eighths.saturating_sub(u32::from(y) * 8).min(8) as usize;
                if cell == 0 {
                    continue;
                }
                let row = inner.y + plot_height - 1 - y;
                buf.set_string(inner.x + x, row, BLOCKS[cell], style);
            }
        }

        // Note gridlines, computed once per draw by the caller
        let axis_row = inner.y + inner.height - 1;
        let axis_style = Style::default().fg(Color::DarkGray);
        for label in self.gridlines {
            let x = self.x_for_frequency(label.frequency_hz, inner.width);
            let text = label.to_string();
            if u16::try_from(text.len()).is_ok_and(|w| x + w <= inner.width) {
                buf.set_string(inner.x + x, axis_row, &text, axis_style);
            }
        }
    }
}

/// The dominant-frequency timeline pane.
pub struct TimelineView<'a> {
    entries: &'a [TimelineEntry],
    position_seconds: f32,
}

impl<'a> TimelineView<'a> {
    /// Create a view over the captured entries at the current transport
    /// position.
    pub fn new(entries: &'a [TimelineEntry], position_seconds: f32) -> Self {
        Self {
            entries,
            position_seconds,
        }
    }
}

impl Widget for TimelineView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" Timeline ({} entries) ", self.entries.len());
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }

        if self.entries.is_empty() {
            buf.set_string(
                inner.x,
                inner.y,
                "press space to play - dominant notes appear here",
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        // Most recent entries, newest at the bottom
        let visible = inner.height as usize;
        let start = self.entries.len().saturating_sub(visible);
        for (row, entry) in self.entries[start..].iter().enumerate() {
            let notes = entry
                .frequencies_hz
                .iter()
                .map(|&f| describe_frequency(f))
                .collect::<Vec<_>>()
                .join(" · ");
            let line = format!("{:>7}  {}", format_time(entry.time_seconds), notes);

            let is_current = (entry.time_seconds - self.position_seconds).abs() < 0.5;
            let style = if is_current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if entry.time_seconds <= self.position_seconds {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            // Char-safe truncation: entries contain multi-byte separators
            let text: String = line.chars().take(inner.width as usize).collect();
            buf.set_string(inner.x, inner.y + row as u16, &text, style);
        }
    }
}
