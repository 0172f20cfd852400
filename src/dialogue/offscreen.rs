//! Off-screen detection. Release groups italicise lines spoken by someone
//! who is not in frame, so the presence of the italic tag is the signal.

use super::Caption;
use super::filter::LiteralMarker;

#[derive(Debug, Clone)]
pub struct OffscreenMarker {
    italic: LiteralMarker,
}

impl OffscreenMarker {
    pub fn new(italic_marker: &str) -> Self {
        Self { italic: LiteralMarker::new(italic_marker) }
    }

    /// Must be called on text that still has its markup
    pub fn is_offscreen(&self, raw_text: &str) -> bool {
        self.italic.is_in(raw_text)
    }

    pub fn mark(&self, caption: &mut Caption) {
        caption.offscreen = self.is_offscreen(&caption.fulltext);
    }
}
