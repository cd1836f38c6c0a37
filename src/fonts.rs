//! Font loading. Missing or broken fonts only degrade what gets drawn.

use std::path::Path;

use rusttype::Font;

/// Fonts tried, in order, when no label font is configured or it fails.
const SYSTEM_FALLBACKS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Clone, Default)]
pub struct FontBook {
    label: Option<Font<'static>>,
    symbol: Option<Font<'static>>,
}

impl FontBook {
    /// A book without fonts; text is skipped.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(label_path: Option<&Path>, symbol_path: Option<&Path>) -> Self {
        let label = label_path
            .and_then(load_font)
            .or_else(|| SYSTEM_FALLBACKS.iter().map(Path::new).find_map(load_font));
        if label.is_none() {
            log::warn!("No usable label font found, dial labels will not be drawn");
        }

        let symbol = symbol_path.and_then(load_font);
        if symbol_path.is_some() && symbol.is_none() {
            log::warn!("Falling back to the label font for marker symbols");
        }

        Self { label, symbol }
    }

    pub fn label(&self) -> Option<&Font<'static>> {
        self.label.as_ref()
    }

    /// The symbol font, or the label font when no symbol font loaded.
    pub fn symbol(&self) -> Option<&Font<'static>> {
        self.symbol.as_ref().or(self.label.as_ref())
    }
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("label", &self.label.is_some())
            .field("symbol", &self.symbol.is_some())
            .finish()
    }
}

fn load_font(path: &Path) -> Option<Font<'static>> {
    let data = match fs_err::read(path) {
        Ok(data) => data,
        Err(e) => {
            log::debug!("Skipping font: {}", e);
            return None;
        }
    };
    let font = Font::try_from_vec(data);
    match &font {
        Some(_) => log::debug!("Loaded font {}", path.display()),
        None => log::warn!("{} is not a usable font file", path.display()),
    }
    font
}
