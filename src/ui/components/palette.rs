//! Colors shared by the workspace panes

use ratatui::style::Color;

pub const BG_BASE: Color = Color::Rgb(10, 10, 10);
pub const BG_ELEVATED: Color = Color::Rgb(23, 23, 23);
pub const BG_USER_MESSAGE: Color = Color::Rgb(46, 16, 101);
pub const BG_ASSISTANT_MESSAGE: Color = Color::Rgb(32, 32, 32);

pub const BORDER_DEFAULT: Color = Color::Rgb(38, 38, 38);
pub const BORDER_FOCUSED: Color = Color::Rgb(168, 85, 247);

pub const ACCENT_PRIMARY: Color = Color::Rgb(168, 85, 247);
pub const ACCENT_ERROR: Color = Color::Rgb(239, 68, 68);
pub const ACCENT_SUCCESS: Color = Color::Rgb(34, 197, 94);

pub const TEXT_PRIMARY: Color = Color::Rgb(245, 245, 245);
pub const TEXT_SECONDARY: Color = Color::Rgb(190, 190, 190);
pub const TEXT_MUTED: Color = Color::Rgb(130, 130, 130);
pub const TEXT_FAINT: Color = Color::Rgb(90, 90, 90);
