//! Colours: one per source group, plus UI chrome, with palette variants.

use crate::Palette;
use ratatui::style::Color;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Theme {
    /// Fragment colours by source group, cycled when there are more groups.
    pub groups: [Color; 6],
    pub bg: Color,
    /// Borders, slot outlines.
    pub div_line: Color,
    pub main_fg: Color,
    pub title: Color,
    /// Slotted fragments while a submit is being rejected.
    pub reject: Color,
    /// Height marker for the loss threshold.
    pub danger: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::neon()
    }
}

impl Theme {
    /// Neon-on-dark defaults: cyan, pink, purple, yellow, green, blue.
    pub fn neon() -> Self {
        Self {
            groups: [
                rgb(0x22, 0xD3, 0xEE),
                rgb(0xF4, 0x72, 0xB6),
                rgb(0xC0, 0x84, 0xFC),
                rgb(0xFA, 0xCC, 0x15),
                rgb(0x4A, 0xDE, 0x80),
                rgb(0x60, 0xA5, 0xFA),
            ],
            bg: rgb(0x11, 0x18, 0x27),
            div_line: rgb(0xA8, 0x55, 0xF7),
            main_fg: rgb(0xE5, 0xE7, 0xEB),
            title: rgb(0xF4, 0x72, 0xB6),
            reject: rgb(0xEF, 0x44, 0x44),
            danger: rgb(0x7F, 0x1D, 0x1D),
        }
    }

    pub fn for_palette(palette: Palette) -> Self {
        let mut theme = Self::neon();
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => {
                theme.groups = [
                    rgb(0x00, 0xFF, 0xFF),
                    rgb(0xFF, 0x00, 0xFF),
                    rgb(0xFF, 0xFF, 0x00),
                    rgb(0x00, 0xFF, 0x00),
                    rgb(0xFF, 0x88, 0x00),
                    rgb(0x00, 0x88, 0xFF),
                ];
                theme.bg = Color::Black;
                theme.main_fg = Color::White;
            }
            Palette::Colorblind => {
                // Okabe-Ito; no red/green pairs.
                theme.groups = [
                    rgb(0x00, 0x72, 0xB2),
                    rgb(0xE6, 0x9F, 0x00),
                    rgb(0x56, 0xB4, 0xE9),
                    rgb(0xF0, 0xE4, 0x42),
                    rgb(0xCC, 0x79, 0xA7),
                    rgb(0x00, 0x9E, 0x73),
                ];
                theme.reject = rgb(0xD5, 0x5E, 0x00);
            }
        }
        theme
    }

    #[inline]
    pub fn group_color(&self, group: usize) -> Color {
        self.groups[group % self.groups.len()]
    }
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(r, g, b)
}

/// Parse hex colour "#RRGGBB" or "#RGB".
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let bad = || ThemeError::InvalidHex(s.to_string());
    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad());
    }
    let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| bad());
    match s.len() {
        6 => Ok(rgb(channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?)),
        3 => Ok(rgb(
            channel(&s[0..1])? * 17,
            channel(&s[1..2])? * 17,
            channel(&s[2..3])? * 17,
        )),
        _ => Err(bad()),
    }
}
