//! Theme data model: built-in palettes and resolution from config.

use ratatui::style::Color;

use crate::config::ThemeConfig;

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the UI.
///
/// Constructed from a config-level `ThemeConfig` via `resolve_theme()`.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Folder tree and file list
    pub pane_fg: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub cursor_bg: Color,
    pub folder_fg: Color,
    pub file_fg: Color,
    pub header_fg: Color,

    // Status bar and tab strip
    pub status_bg: Color,
    pub status_fg: Color,
    pub tab_active_bg: Color,
    pub tab_fg: Color,

    // Borders & chrome
    pub border_fg: Color,
    pub border_focused_fg: Color,
    pub divider_fg: Color,

    // Dialogs
    pub dialog_bg: Color,
    pub dialog_border_fg: Color,

    // Semantic colors
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme using Catppuccin Mocha palette.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        pane_fg: Color::Rgb(205, 214, 244),        // #cdd6f4 (text)
        selected_bg: Color::Rgb(69, 71, 90),       // #45475a (surface1)
        selected_fg: Color::Rgb(205, 214, 244),    // #cdd6f4
        cursor_bg: Color::Rgb(49, 50, 68),         // #313244 (surface0)
        folder_fg: Color::Rgb(137, 180, 250),      // #89b4fa (blue)
        file_fg: Color::Rgb(205, 214, 244),        // #cdd6f4
        header_fg: Color::Rgb(203, 166, 247),      // #cba6f7 (mauve)

        status_bg: Color::Rgb(30, 30, 46), // #1e1e2e (base)
        status_fg: Color::Rgb(205, 214, 244),
        tab_active_bg: Color::Rgb(69, 71, 90),
        tab_fg: Color::Rgb(166, 173, 200), // #a6adc8 (subtext0)

        border_fg: Color::Rgb(88, 91, 112),           // #585b70 (surface2)
        border_focused_fg: Color::Rgb(137, 180, 250), // #89b4fa (blue)
        divider_fg: Color::Rgb(88, 91, 112),

        dialog_bg: Color::Rgb(49, 50, 68), // #313244 (surface0)
        dialog_border_fg: Color::Rgb(137, 180, 250),

        error_fg: Color::Rgb(243, 139, 168),   // #f38ba8 (red)
        warning_fg: Color::Rgb(249, 226, 175), // #f9e2af (yellow)
        success_fg: Color::Rgb(166, 227, 161), // #a6e3a1 (green)
        accent_fg: Color::Rgb(203, 166, 247),  // #cba6f7 (mauve)
        dim_fg: Color::Rgb(108, 112, 134),     // #6c7086 (overlay0)
    }
}

/// Light theme, Catppuccin Latte.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        pane_fg: Color::Rgb(76, 79, 105),       // #4c4f69 (text)
        selected_bg: Color::Rgb(204, 208, 218), // #ccd0da (surface1)
        selected_fg: Color::Rgb(76, 79, 105),
        cursor_bg: Color::Rgb(230, 233, 239), // #e6e9ef (mantle)
        folder_fg: Color::Rgb(30, 102, 245),  // #1e66f5 (blue)
        file_fg: Color::Rgb(76, 79, 105),
        header_fg: Color::Rgb(136, 57, 239), // #8839ef (mauve)

        status_bg: Color::Rgb(239, 241, 245), // #eff1f5 (base)
        status_fg: Color::Rgb(76, 79, 105),
        tab_active_bg: Color::Rgb(204, 208, 218),
        tab_fg: Color::Rgb(108, 111, 133), // #6c6f85 (subtext0)

        border_fg: Color::Rgb(172, 176, 190), // #acb0be (surface2)
        border_focused_fg: Color::Rgb(30, 102, 245),
        divider_fg: Color::Rgb(172, 176, 190),

        dialog_bg: Color::Rgb(230, 233, 239),
        dialog_border_fg: Color::Rgb(30, 102, 245),

        error_fg: Color::Rgb(210, 15, 57),    // #d20f39 (red)
        warning_fg: Color::Rgb(223, 142, 29), // #df8e1d (yellow)
        success_fg: Color::Rgb(64, 160, 43),  // #40a02b (green)
        accent_fg: Color::Rgb(136, 57, 239),
        dim_fg: Color::Rgb(156, 160, 176), // #9ca0b0 (overlay0)
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        dark_theme()
    }
}

// ── Resolution ───────────────────────────────────────────────────────────────

/// Build the runtime palette from the `[theme]` config section.
///
/// Unknown schemes fall back to dark.
pub fn resolve_theme(config: &ThemeConfig) -> ThemeColors {
    match config.scheme.as_deref().unwrap_or("dark") {
        "light" => light_theme(),
        "dark" => dark_theme(),
        other => {
            tracing::warn!(scheme = other, "unknown theme scheme, using dark");
            dark_theme()
        }
    }
}
