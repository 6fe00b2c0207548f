//! Static SVG rendering for countdown badges.

mod color;

pub use color::{ColorSource, RandomColorSource, Rgb, PASTEL_RANGE};

use crate::countdown::CountdownResult;

pub const DEFAULT_WIDTH: u32 = 300;
pub const DEFAULT_HEIGHT: u32 = 160;

const EVENT_FONT_SIZE: u32 = 30;
const COUNTDOWN_FONT_SIZE: u32 = 36;

/// Background for the error badge: a pale red instead of a random pastel.
const ERROR_BACKGROUND: &str = "rgb(255,214,214)";

/// Renders countdown badges as standalone SVG documents.
///
/// The renderer is a pure function of its inputs apart from the background
/// color, which comes from the injected [`ColorSource`].
pub struct SvgRenderer {
    width: u32,
    height: u32,
    colors: Box<dyn ColorSource>,
}

impl SvgRenderer {
    pub fn new(width: u32, height: u32, colors: Box<dyn ColorSource>) -> Self {
        Self {
            width,
            height,
            colors,
        }
    }

    /// Renders the badge for a formatted countdown.
    ///
    /// Two centered bold text lines on a random pastel rectangle; fonts and
    /// vertical offsets are fixed. No external resources are referenced.
    pub fn render(&self, result: &CountdownResult) -> String {
        let width = self.width;
        let height = self.height;
        let center = width / 2;
        let background = self.colors.pastel();
        let phrase = escape_text(&result.phrase);
        let countdown = escape_text(&result.countdown);

        format!(
            r#"<svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">
  <rect width="100%" height="100%" fill="{background}" />
  <style>
    .event {{
      font-family: 'Hiragino Sans', 'Meiryo', sans-serif;
      font-size: {EVENT_FONT_SIZE}px;
      font-weight: bold;
      fill: #333333;
      text-anchor: middle;
    }}
    .countdown {{
      font-family: 'Hiragino Sans', 'Meiryo', sans-serif;
      font-size: {COUNTDOWN_FONT_SIZE}px;
      font-weight: bold;
      fill: #333333;
      text-anchor: middle;
    }}
  </style>
  <text x="{center}" y="45" class="event">{phrase}</text>
  <text x="{center}" y="120" class="countdown">{countdown}</text>
</svg>"#
        )
    }

    /// Renders the fixed error-state badge shown when the URL cannot be
    /// parsed: three lines of usage instructions on a pale red background.
    pub fn render_error(&self) -> String {
        let width = self.width;
        let height = self.height;
        let center = width / 2;

        format!(
            r#"<svg width="{width}" height="{height}" xmlns="http://www.w3.org/2000/svg">
  <rect width="100%" height="100%" fill="{ERROR_BACKGROUND}" />
  <style>
    .hint {{
      font-family: 'Hiragino Sans', 'Meiryo', sans-serif;
      font-size: 16px;
      fill: #662222;
      text-anchor: middle;
    }}
  </style>
  <text x="{center}" y="55" class="hint">Invalid URL format.</text>
  <text x="{center}" y="85" class="hint">Use /YYYYMMDD/event-name</text>
  <text x="{center}" y="115" class="hint">or /event-name/YYYYMMDD</text>
</svg>"#
        )
    }
}

/// Escapes the XML text-node metacharacters.
///
/// The label is attacker-controlled free text ending up inside an XML
/// document, so `&`, `<` and `>` must not pass through verbatim.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}
