//! UI theme definitions.
//!
//! Colours follow the website: a dark olive base with a gold accent.

use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

/// Theme configuration for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Get the egui Visuals for this theme.
    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Palette::DARK.apply(Visuals::dark()),
            Theme::Light => Palette::LIGHT.apply(Visuals::light()),
        }
    }

    /// The other theme.
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Dark => write!(f, "Dark"),
            Theme::Light => write!(f, "Light"),
        }
    }
}

/// Site colours for one theme.
struct Palette {
    base: Color32,
    panel: Color32,
    card: Color32,
    hover: Color32,
    text: Color32,
    text_weak: Color32,
    /// Gold
    accent: Color32,
    /// Selection fill strength
    accent_alpha: f32,
    /// Text on an accent-filled widget
    on_accent: Color32,
    border: Color32,
}

impl Palette {
    const DARK: Palette = Palette {
        base: Color32::from_rgb(20, 26, 12),
        panel: Color32::from_rgb(33, 44, 19),
        card: Color32::from_rgb(43, 58, 19),
        hover: Color32::from_rgb(58, 80, 26),
        text: Color32::from_rgb(242, 240, 230),
        text_weak: Color32::from_rgb(165, 175, 155),
        accent: Color32::from_rgb(243, 186, 25),
        accent_alpha: 0.4,
        on_accent: Color32::from_rgb(20, 26, 12),
        border: Color32::from_rgb(95, 115, 76),
    };

    const LIGHT: Palette = Palette {
        base: Color32::from_rgb(250, 249, 244),
        panel: Color32::from_rgb(255, 255, 252),
        card: Color32::from_rgb(240, 241, 234),
        hover: Color32::from_rgb(228, 232, 218),
        text: Color32::from_rgb(43, 58, 19),
        text_weak: Color32::from_rgb(95, 115, 76),
        accent: Color32::from_rgb(221, 167, 23),
        accent_alpha: 0.25,
        on_accent: Color32::WHITE,
        border: Color32::from_rgb(165, 175, 155),
    };

    fn apply(&self, mut visuals: Visuals) -> Visuals {
        visuals.window_fill = self.panel;
        visuals.panel_fill = self.panel;
        visuals.faint_bg_color = self.card;
        visuals.extreme_bg_color = self.base;
        visuals.selection.bg_fill = self.accent.linear_multiply(self.accent_alpha);
        visuals.selection.stroke.color = self.accent;
        visuals.hyperlink_color = self.accent;

        let widgets = &mut visuals.widgets;
        for (style, fill, text) in [
            (&mut widgets.noninteractive, self.card, self.text),
            (&mut widgets.inactive, self.card, self.text_weak),
            (&mut widgets.hovered, self.hover, self.text),
            (&mut widgets.active, self.accent, self.on_accent),
        ] {
            style.bg_fill = fill;
            style.weak_bg_fill = fill;
            style.fg_stroke.color = text;
        }
        widgets.noninteractive.bg_stroke.color = self.border;
        widgets.inactive.bg_stroke.color = self.border;

        visuals
    }
}

/// Inline status colours shared by both themes.
pub mod status_colors {
    use egui::Color32;

    pub const ERROR: Color32 = Color32::from_rgb(220, 70, 50);
    pub const SUCCESS: Color32 = Color32::from_rgb(95, 160, 70);
    pub const MUTED: Color32 = Color32::from_rgb(140, 140, 130);
}

/// Series colours for comparison charts, cycled per route.
pub const CHART_COLORS: [Color32; 6] = [
    Color32::from_rgb(0xf3, 0xba, 0x19),
    Color32::from_rgb(0x5f, 0x73, 0x4c),
    Color32::from_rgb(0xdd, 0xa7, 0x17),
    Color32::from_rgb(0x2b, 0x3a, 0x13),
    Color32::from_rgb(0xa5, 0xaf, 0x9b),
    Color32::from_rgb(0x3a, 0x50, 0x1a),
];

/// Chart colour for the route at `index`.
pub fn chart_color(index: usize) -> Color32 {
    CHART_COLORS[index % CHART_COLORS.len()]
}

/// Map marker colour.
pub const MARKER_COLOR: Color32 = Color32::from_rgb(0x3a, 0x50, 0x1a);

/// Route trace colour.
pub const TRACE_COLOR: Color32 = Color32::from_rgb(0xf3, 0xba, 0x19);
