use ratatui::style::Color;

/// Runtime theme for the carousel view
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub grey0: Color,
    pub grey1: Color,
    pub grey2: Color,

    // Semantic colors
    pub focused: Color,
    pub unreachable: Color,
    pub snapping: Color,
    pub resting: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Material dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            grey0: Color::Rgb(0x7c, 0x6f, 0x64),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            focused: Color::Rgb(0xd8, 0xa6, 0x57),
            unreachable: Color::Rgb(0x5a, 0x52, 0x4c),
            snapping: Color::Rgb(0xe7, 0x8a, 0x4e),
            resting: Color::Rgb(0xa9, 0xb6, 0x65),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
        }
    }
}

impl Theme {
    /// Blend `color` toward the background by `opacity` (0 = background, 1 = color)
    ///
    /// Non-RGB colors are returned unchanged, or the background below half opacity.
    pub fn fade(&self, color: Color, opacity: f64) -> Color {
        let t = opacity.clamp(0.0, 1.0);
        match (color, self.bg0) {
            (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) => {
                let mix = |c: u8, base: u8| (base as f64 + (c as f64 - base as f64) * t).round() as u8;
                Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
            }
            _ if t < 0.5 => self.bg0,
            _ => color,
        }
    }
}
