// File: crates/candle-render-skia/src/theme.rs
// Summary: Light/Dark theming; resolves candle, path and marker style tags to colors.

use skia_safe as skia;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub grid: skia::Color,
    pub axis_line: skia::Color,
    pub axis_label: skia::Color,
    /// Primary series drawn as a plain line.
    pub average_line: skia::Color,
    /// `close-above-open` tag: price went up.
    pub candle_up: skia::Color,
    /// `open-above-close` tag: price went down.
    pub candle_down: skia::Color,
    /// Overlay strokes, picked by the `candlestick-series-N` tag.
    pub overlays: [skia::Color; 4],
    pub marker: skia::Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 18, 18, 20),
            grid: skia::Color::from_argb(255, 40, 40, 45),
            axis_line: skia::Color::from_argb(255, 180, 180, 190),
            axis_label: skia::Color::from_argb(255, 235, 235, 245),
            average_line: skia::Color::from_argb(255, 64, 160, 255),
            candle_up: skia::Color::from_argb(255, 40, 200, 120),
            candle_down: skia::Color::from_argb(255, 220, 80, 80),
            overlays: [
                skia::Color::from_argb(255, 255, 200, 60),
                skia::Color::from_argb(255, 180, 120, 255),
                skia::Color::from_argb(255, 96, 156, 255),
                skia::Color::from_argb(255, 255, 140, 190),
            ],
            marker: skia::Color::from_argb(255, 255, 230, 70),
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 250, 250, 252),
            grid: skia::Color::from_argb(255, 230, 230, 235),
            axis_line: skia::Color::from_argb(255, 60, 60, 70),
            axis_label: skia::Color::from_argb(255, 20, 20, 30),
            average_line: skia::Color::from_argb(255, 32, 120, 200),
            candle_up: skia::Color::from_argb(255, 20, 160, 90),
            candle_down: skia::Color::from_argb(255, 200, 60, 60),
            overlays: [
                skia::Color::from_argb(255, 210, 140, 0),
                skia::Color::from_argb(255, 120, 60, 200),
                skia::Color::from_argb(255, 40, 120, 200),
                skia::Color::from_argb(255, 200, 70, 130),
            ],
            marker: skia::Color::from_argb(255, 30, 120, 240),
        }
    }

    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark",
            background: skia::Color::from_argb(255, 0x00, 0x2b, 0x36), // base03
            grid: skia::Color::from_argb(255, 0x07, 0x36, 0x42),       // base02
            axis_line: skia::Color::from_argb(255, 0x93, 0xa1, 0xa1),  // base1
            axis_label: skia::Color::from_argb(255, 0xee, 0xe8, 0xd5), // base2
            average_line: skia::Color::from_argb(255, 0x26, 0x8b, 0xd2), // blue
            candle_up: skia::Color::from_argb(255, 0x2a, 0xa1, 0x98),
            candle_down: skia::Color::from_argb(255, 0xdc, 0x32, 0x2f),
            overlays: [
                skia::Color::from_argb(255, 0xb5, 0x89, 0x00), // yellow
                skia::Color::from_argb(255, 0x6c, 0x71, 0xc4), // violet
                skia::Color::from_argb(255, 0xcb, 0x4b, 0x16), // orange
                skia::Color::from_argb(255, 0xd3, 0x36, 0x82), // magenta
            ],
            marker: skia::Color::from_argb(255, 0x85, 0x99, 0x00),
        }
    }

    /// Body and wick color for a candle direction tag.
    pub fn candle(&self, direction_class: &str) -> skia::Color {
        match direction_class {
            "open-above-close" => self.candle_down,
            _ => self.candle_up,
        }
    }

    /// Stroke for a series path from its style tags.
    pub fn stroke(&self, classes: &[String]) -> skia::Color {
        if classes.iter().any(|c| c == "candlestick-average-line") {
            return self.average_line;
        }
        classes
            .iter()
            .find_map(|c| c.strip_prefix("candlestick-series-")?.parse::<usize>().ok())
            .map(|i| self.overlays[i % self.overlays.len()])
            .unwrap_or(self.average_line)
    }

    /// Marker fill; `buy` and `sell` reuse the candle colors.
    pub fn marker(&self, style_class: &str) -> skia::Color {
        match style_class {
            "buy" => self.candle_up,
            "sell" => self.candle_down,
            _ => self.marker,
        }
    }
}

impl Default for Theme {
    fn default() -> Self { Self::dark() }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::dark(), Theme::light(), Theme::solarized_dark()]
}

/// Find a theme by its `name`, falling back to dark.
pub fn find(name: &str) -> Theme {
    presets().into_iter().find(|t| t.name.eq_ignore_ascii_case(name)).unwrap_or_else(Theme::dark)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_style_tags() {
        let t = Theme::dark();
        assert_eq!(t.candle("open-above-close"), t.candle_down);
        assert_eq!(t.candle("close-above-open"), t.candle_up);
        assert_eq!(t.stroke(&["candlestick-average-line".into(), "candlestick-series-0".into()]), t.average_line);
        assert_eq!(t.stroke(&["candlestick-series-5".into()]), t.overlays[1]);
        assert_eq!(t.marker("sell"), t.candle_down);
        assert_eq!(find("LIGHT").name, "light");
        assert_eq!(find("nope").name, "dark");
    }
}
