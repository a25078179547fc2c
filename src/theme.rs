//! Theme data model: built-in palettes and resolution from config.
//!
//! Two built-in palettes (dark and light) plus custom hex overrides from the
//! config file. The header toggle flips between the two built-ins.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

/// Which palette family is active; drives the header indicator and toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub mode: ThemeMode,

    // Explorer sidebar
    pub tree_bg: Color,
    pub tree_fg: Color,
    pub tree_selected_bg: Color,
    pub tree_selected_fg: Color,
    pub tree_active_fg: Color,
    pub tree_dir_fg: Color,
    pub tree_file_fg: Color,

    // Editor pane
    pub editor_bg: Color,
    pub editor_fg: Color,
    pub editor_line_nr_fg: Color,

    // Header and status bar
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Dialogs
    pub dialog_bg: Color,
    pub dialog_border_fg: Color,

    // Semantic colors (not configurable)
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    let text = Color::Rgb(205, 214, 244); // #cdd6f4
    let overlay0 = Color::Rgb(108, 112, 134); // #6c7086
    let blue = Color::Rgb(137, 180, 250); // #89b4fa
    ThemeColors {
        mode: ThemeMode::Dark,

        tree_bg: Color::Reset,
        tree_fg: text,
        tree_selected_bg: Color::Rgb(69, 71, 90), // #45475a (surface1)
        tree_selected_fg: text,
        tree_active_fg: Color::Rgb(250, 179, 135), // #fab387 (peach)
        tree_dir_fg: blue,
        tree_file_fg: text,

        editor_bg: Color::Reset,
        editor_fg: text,
        editor_line_nr_fg: overlay0,

        header_bg: Color::Rgb(24, 24, 37), // #181825 (mantle)
        header_fg: text,
        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: text,

        border_fg: Color::Rgb(88, 91, 112), // #585b70 (surface2)
        border_focused_fg: blue,

        dialog_bg: Color::Rgb(49, 50, 68), // #313244 (surface0)
        dialog_border_fg: blue,

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8
        warning_fg: Color::Rgb(249, 226, 175), // #f9e2af
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1
        info_fg: blue,
        accent_fg: Color::Rgb(203, 166, 247), // #cba6f7
        dim_fg: overlay0,
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    let text = Color::Rgb(76, 79, 105); // #4c4f69
    let overlay0 = Color::Rgb(156, 160, 176); // #9ca0b0
    let blue = Color::Rgb(30, 102, 245); // #1e66f5
    ThemeColors {
        mode: ThemeMode::Light,

        tree_bg: Color::Reset,
        tree_fg: text,
        tree_selected_bg: Color::Rgb(204, 208, 218), // #ccd0da
        tree_selected_fg: text,
        tree_active_fg: Color::Rgb(254, 100, 11), // #fe640b (peach)
        tree_dir_fg: blue,
        tree_file_fg: text,

        editor_bg: Color::Reset,
        editor_fg: text,
        editor_line_nr_fg: overlay0,

        header_bg: Color::Rgb(230, 233, 239), // #e6e9ef (mantle)
        header_fg: text,
        status_bg: Color::Rgb(239, 241, 245), // #eff1f5
        status_fg: text,

        border_fg: Color::Rgb(172, 176, 190), // #acb0be
        border_focused_fg: blue,

        dialog_bg: Color::Rgb(230, 233, 239),
        dialog_border_fg: blue,

        error_fg: Color::Rgb(210, 15, 57),
        warning_fg: Color::Rgb(223, 142, 29),
        success_fg: Color::Rgb(64, 160, 43),
        info_fg: blue,
        accent_fg: Color::Rgb(136, 57, 239),
        dim_fg: overlay0,
    }
}

/// Built-in palette for `mode`.
pub fn builtin(mode: ThemeMode) -> ThemeColors {
    match mode {
        ThemeMode::Dark => dark_theme(),
        ThemeMode::Light => light_theme(),
    }
}

// ── Color parsing ────────────────────────────────────────────────────────────

/// Parse a hex color string like `"#aabbcc"` into a `ratatui::style::Color`.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

// ── Theme resolution ─────────────────────────────────────────────────────────

/// Resolve the final `ThemeColors` from config.
///
/// - `"dark"` (default) and unknown values: dark palette
/// - `"light"`: light palette
/// - `"custom"`: dark palette with custom hex values on top
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref().unwrap_or("dark") {
        "light" => light_theme(),
        "custom" => {
            let mut theme = dark_theme();
            if let Some(custom) = &config.custom {
                apply_custom_colors(&mut theme, custom);
            }
            theme
        }
        _ => dark_theme(),
    }
}

/// Apply custom hex color overrides; malformed values keep the palette color.
fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    let overrides: [(&Option<String>, &mut Color); 17] = [
        (&custom.tree_bg, &mut theme.tree_bg),
        (&custom.tree_fg, &mut theme.tree_fg),
        (&custom.tree_selected_bg, &mut theme.tree_selected_bg),
        (&custom.tree_selected_fg, &mut theme.tree_selected_fg),
        (&custom.tree_active_fg, &mut theme.tree_active_fg),
        (&custom.tree_dir_fg, &mut theme.tree_dir_fg),
        (&custom.tree_file_fg, &mut theme.tree_file_fg),
        (&custom.editor_bg, &mut theme.editor_bg),
        (&custom.editor_fg, &mut theme.editor_fg),
        (&custom.editor_line_nr_fg, &mut theme.editor_line_nr_fg),
        (&custom.header_bg, &mut theme.header_bg),
        (&custom.header_fg, &mut theme.header_fg),
        (&custom.status_bg, &mut theme.status_bg),
        (&custom.status_fg, &mut theme.status_fg),
        (&custom.border_fg, &mut theme.border_fg),
        (&custom.dialog_bg, &mut theme.dialog_bg),
        (&custom.dialog_border_fg, &mut theme.dialog_border_fg),
    ];
    for (value, slot) in overrides {
        if let Some(color) = value.as_deref().and_then(parse_hex_color) {
            *slot = color;
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color_valid() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#1a1b26"), Some(Color::Rgb(26, 27, 38)));
        assert_eq!(parse_hex_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_resolve_schemes() {
        let light = resolve_theme(&ThemeConfig {
            scheme: Some("light".to_string()),
            custom: None,
        });
        assert_eq!(light.mode, ThemeMode::Light);
        assert_eq!(light.tree_dir_fg, Color::Rgb(30, 102, 245));

        let fallback = resolve_theme(&ThemeConfig {
            scheme: Some("neon".to_string()),
            custom: None,
        });
        assert_eq!(fallback.mode, ThemeMode::Dark);
        assert_eq!(resolve_theme(&ThemeConfig::default()).mode, ThemeMode::Dark);
    }

    #[test]
    fn test_resolve_custom_overrides() {
        let config = ThemeConfig {
            scheme: Some("custom".to_string()),
            custom: Some(ThemeColorsConfig {
                tree_bg: Some("#1a1b26".to_string()),
                header_fg: Some("#c0caf5".to_string()),
                dialog_bg: Some("#zzzzzz".to_string()),
                ..Default::default()
            }),
        };
        let theme = resolve_theme(&config);
        assert_eq!(theme.tree_bg, Color::Rgb(26, 27, 38));
        assert_eq!(theme.header_fg, Color::Rgb(192, 202, 245));
        // malformed value keeps the dark default
        assert_eq!(theme.dialog_bg, dark_theme().dialog_bg);
        assert_eq!(theme.tree_dir_fg, Color::Rgb(137, 180, 250));
    }

    #[test]
    fn test_mode_toggle() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggled().label(), "dark");
        assert_eq!(builtin(ThemeMode::Light).mode, ThemeMode::Light);
    }
}
