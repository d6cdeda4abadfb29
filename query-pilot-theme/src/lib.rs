//! Style constants shared by every widget the TUI draws. Kept in one place
//! so the palette can change without touching rendering code.

use once_cell::sync::Lazy;
use ratatui::style::{Color, Modifier, Style};

struct Palette {
  background: Color,
  foreground: Color,
  accent: Color,
  border: Color,
  border_focused: Color,
  success: Color,
  warning: Color,
  error: Color,
  info: Color,
  muted: Color,
}

static PALETTE: Lazy<Palette> = Lazy::new(|| Palette {
  background: Color::Reset,
  foreground: Color::Gray,
  accent: Color::Cyan,
  border: Color::DarkGray,
  border_focused: Color::Cyan,
  success: Color::Green,
  warning: Color::Yellow,
  error: Color::Red,
  info: Color::Blue,
  muted: Color::DarkGray,
});

pub fn bg_primary() -> Style {
  Style::default().bg(PALETTE.background).fg(PALETTE.foreground)
}

pub fn title() -> Style {
  Style::default().fg(PALETTE.accent).add_modifier(Modifier::BOLD)
}

pub fn border_normal() -> Style {
  Style::default().fg(PALETTE.border)
}

pub fn border_focused() -> Style {
  Style::default().fg(PALETTE.border_focused)
}

pub fn header() -> Style {
  Style::default().fg(PALETTE.accent).add_modifier(Modifier::BOLD)
}

pub fn selected() -> Style {
  Style::default().fg(Color::Black).bg(PALETTE.accent)
}

pub fn success() -> Style {
  Style::default().fg(PALETTE.success)
}

pub fn warning() -> Style {
  Style::default().fg(PALETTE.warning)
}

pub fn error() -> Style {
  Style::default().fg(PALETTE.error).add_modifier(Modifier::BOLD)
}

pub fn info() -> Style {
  Style::default().fg(PALETTE.info)
}

pub fn muted() -> Style {
  Style::default().fg(PALETTE.muted)
}

pub fn busy() -> Style {
  Style::default().fg(PALETTE.warning).add_modifier(Modifier::SLOW_BLINK)
}

pub fn badge() -> Style {
  Style::default().fg(Color::Black).bg(PALETTE.info).add_modifier(Modifier::BOLD)
}
