use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::{error, info, warn};

const LOGO_FILE: &str = "logo.png";
const BACKGROUND_FILE: &str = "background.png";
const FONT_MEDIUM_FILE: &str = "font-medium.ttf";
const FONT_BOLD_FILE: &str = "font-bold.ttf";
const FONT_THIN_FILE: &str = "font-thin.ttf";

/// An image file kept as raw bytes plus its intrinsic pixel size; embedded
/// into the SVG as a base64 data URI.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    bytes: Vec<u8>,
    pub width: i64,
    pub height: i64,
    mime: &'static str,
}

impl ImageAsset {
    pub fn from_bytes(bytes: Vec<u8>, mime: &'static str) -> Option<Self> {
        let size = imagesize::blob_size(&bytes).ok()?;
        Some(Self {
            bytes,
            width: size.width as i64,
            height: size.height as i64,
            mime,
        })
    }

    pub fn load(path: &Path) -> Option<Self> {
        let bytes = std::fs::read(path).ok()?;
        let mime = match path.extension().and_then(|e| e.to_str()) {
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            _ => "image/png",
        };
        Self::from_bytes(bytes, mime)
    }

    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Static render inputs, loaded once per renderer instance and read-only
/// afterwards. Every field is optional; missing assets degrade with a log
/// line, never an error.
#[derive(Debug, Clone, Default)]
pub struct RenderAssets {
    pub logo: Option<ImageAsset>,
    pub background: Option<ImageAsset>,
    pub font_medium: Option<Vec<u8>>,
    pub font_bold: Option<Vec<u8>>,
    pub font_thin: Option<Vec<u8>>,
}

impl RenderAssets {
    /// No assets at all; renders fall back to the flat background color and
    /// whatever fonts the host system provides.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn load_dir(dir: &Path) -> Self {
        let logo = ImageAsset::load(&dir.join(LOGO_FILE));
        if logo.is_none() {
            error!("failed to load logo from {}", dir.join(LOGO_FILE).display());
        }

        let background = ImageAsset::load(&dir.join(BACKGROUND_FILE));
        if background.is_none() {
            warn!(
                "failed to load background from {}",
                dir.join(BACKGROUND_FILE).display()
            );
        }

        let assets = Self {
            logo,
            background,
            font_medium: load_font(dir, FONT_MEDIUM_FILE),
            font_bold: load_font(dir, FONT_BOLD_FILE),
            font_thin: load_font(dir, FONT_THIN_FILE),
        };

        if assets.font_medium.is_some() {
            info!("loaded custom fonts from {}", dir.display());
        }
        assets
    }

    /// Raw font files for the text measurer and the rasterizer font database.
    pub fn font_data(&self) -> Vec<Vec<u8>> {
        [&self.font_medium, &self.font_bold, &self.font_thin]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

fn load_font(dir: &Path, file: &str) -> Option<Vec<u8>> {
    let path = dir.join(file);
    match std::fs::read(&path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!("failed to load font {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // PNG signature plus an IHDR declaring a 3x2 image; enough for size
    // probing, no pixel data needed.
    fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
        bytes
    }

    #[test]
    fn from_bytes_reads_intrinsic_size() {
        let asset = ImageAsset::from_bytes(png_header(3, 2), "image/png").unwrap();
        assert_eq!((asset.width, asset.height), (3, 2));
        assert!(asset.data_uri().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn missing_files_degrade_to_none() {
        let assets = RenderAssets::load_dir(Path::new("/nonexistent/assets"));
        assert!(assets.logo.is_none());
        assert!(assets.background.is_none());
        assert!(assets.font_data().is_empty());
    }
}
