//! Built-in palettes and resolution from config.

use ratatui::style::Color;

use crate::config::{ThemeColorsConfig, ThemeConfig};

/// All runtime colors used in the UI.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // List panel
    pub list_fg: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub dir_fg: Color,
    pub other_fg: Color,
    pub hidden_fg: Color,
    pub guide_fg: Color,

    // Preview panel
    pub preview_fg: Color,
    pub heading_fg: Color,
    pub field_fg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    pub border_fg: Color,
    pub border_focused_fg: Color,

    // Semantic colors (not configurable)
    pub error_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        list_fg: Color::Rgb(205, 214, 244),     // #cdd6f4 (text)
        selected_bg: Color::Rgb(69, 71, 90),    // #45475a (surface1)
        selected_fg: Color::Rgb(205, 214, 244), // #cdd6f4
        dir_fg: Color::Rgb(137, 180, 250),      // #89b4fa (blue)
        other_fg: Color::Rgb(250, 179, 135),    // #fab387 (peach)
        hidden_fg: Color::Rgb(108, 112, 134),   // #6c7086 (overlay0)
        guide_fg: Color::Rgb(88, 91, 112),      // #585b70 (surface2)

        preview_fg: Color::Rgb(205, 214, 244),
        heading_fg: Color::Rgb(137, 180, 250),
        field_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),

        border_fg: Color::Rgb(88, 91, 112),
        border_focused_fg: Color::Rgb(137, 180, 250),

        error_fg: Color::Rgb(243, 139, 168),  // #f38ba8 (red)
        accent_fg: Color::Rgb(203, 166, 247), // #cba6f7 (mauve)
        dim_fg: Color::Rgb(108, 112, 134),
    }
}

/// Light theme using Catppuccin Latte palette.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        list_fg: Color::Rgb(76, 79, 105),        // #4c4f69 (text)
        selected_bg: Color::Rgb(204, 208, 218),  // #ccd0da (surface1)
        selected_fg: Color::Rgb(76, 79, 105),
        dir_fg: Color::Rgb(30, 102, 245),        // #1e66f5 (blue)
        other_fg: Color::Rgb(254, 100, 11),      // #fe640b (peach)
        hidden_fg: Color::Rgb(156, 160, 176),    // #9ca0b0 (overlay0)
        guide_fg: Color::Rgb(172, 176, 190),     // #acb0be (surface2)

        preview_fg: Color::Rgb(76, 79, 105),
        heading_fg: Color::Rgb(30, 102, 245),
        field_fg: Color::Rgb(64, 160, 43), // #40a02b (green)

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),

        border_fg: Color::Rgb(172, 176, 190),
        border_focused_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),   // #d20f39 (red)
        accent_fg: Color::Rgb(136, 57, 239), // #8839ef (mauve)
        dim_fg: Color::Rgb(156, 160, 176),
    }
}

/// Parse `"#aabbcc"` (the `#` is optional). Returns `None` for malformed input.
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

/// `"light"`, `"custom"` (dark plus overrides), anything else is dark.
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

fn apply_custom_colors(theme: &mut ThemeColors, custom: &ThemeColorsConfig) {
    let overrides = [
        (&custom.list_fg, &mut theme.list_fg),
        (&custom.selected_bg, &mut theme.selected_bg),
        (&custom.selected_fg, &mut theme.selected_fg),
        (&custom.dir_fg, &mut theme.dir_fg),
        (&custom.other_fg, &mut theme.other_fg),
        (&custom.hidden_fg, &mut theme.hidden_fg),
        (&custom.preview_fg, &mut theme.preview_fg),
        (&custom.status_bg, &mut theme.status_bg),
        (&custom.status_fg, &mut theme.status_fg),
        (&custom.border_fg, &mut theme.border_fg),
    ];
    for (hex, slot) in overrides {
        if let Some(color) = hex.as_deref().and_then(parse_hex_color) {
            *slot = color;
        }
    }
}
