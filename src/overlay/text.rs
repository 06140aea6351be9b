use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::color::Color;
use crate::foundation::error::{ClipError, ClipResult};

/// Environment variable naming a label font file.
pub const LABEL_FONT_ENV: &str = "ETHOCLIP_LABEL_FONT";

/// Raw bytes of the font labels are shaped and drawn with.
#[derive(Clone)]
pub struct LabelFont {
    bytes: Arc<Vec<u8>>,
    index: u32,
    origin: String,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("origin", &self.origin)
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl LabelFont {
    pub fn from_bytes(bytes: Vec<u8>, origin: impl Into<String>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            index: 0,
            origin: origin.into(),
        }
    }

    pub fn from_file(path: &Path) -> ClipResult<Self> {
        use anyhow::Context as _;
        let bytes = std::fs::read(path)
            .with_context(|| format!("read label font '{}'", path.display()))?;
        Ok(Self::from_bytes(bytes, path.display().to_string()))
    }

    /// The system sans-serif face, if the font database has any face at all.
    pub fn system_sans_serif() -> Option<Self> {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        let id = pick_sans_face(&db)?;
        db.with_face_data(id, |data, index| Self {
            bytes: Arc::new(data.to_vec()),
            index,
            origin: "system sans-serif".to_owned(),
        })
    }

    /// Resolve the label font: `configured`, else `$ETHOCLIP_LABEL_FONT`, else the system
    /// sans-serif face. An unreadable configured file is an error; no font at all is `None`.
    pub fn resolve(configured: Option<&Path>) -> ClipResult<Option<Self>> {
        if let Some(path) = configured {
            return Self::from_file(path).map(Some);
        }
        if let Some(path) = std::env::var_os(LABEL_FONT_ENV).map(PathBuf::from) {
            return Self::from_file(&path).map(Some);
        }
        Ok(Self::system_sans_serif())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub(crate) fn font_data(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.bytes.as_ref().clone()),
            self.index,
        )
    }
}

/// Common sans faces tried when the generic family maps to a face that is not installed.
const SANS_FALLBACKS: &[&str] = &["DejaVu Sans", "Liberation Sans", "Arial", "Helvetica"];

/// Generic sans-serif, then [`SANS_FALLBACKS`], then any loaded face.
pub(crate) fn pick_sans_face(db: &usvg::fontdb::Database) -> Option<usvg::fontdb::ID> {
    use usvg::fontdb::{Family, Query};

    let query = |family: Family<'_>| {
        db.query(&Query {
            families: &[family],
            ..Default::default()
        })
    };
    query(Family::SansSerif)
        .or_else(|| SANS_FALLBACKS.iter().find_map(|name| query(Family::Name(name))))
        .or_else(|| db.faces().next().map(|face| face.id))
}

/// RGBA8 brush color used by Parley label layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LabelBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Color> for LabelBrush {
    fn from(c: Color) -> Self {
        let [r, g, b, a] = c.to_rgba8();
        Self { r, g, b, a }
    }
}

/// Parley layout contexts with the label font registered once.
pub struct LabelTextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<LabelBrush>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl std::fmt::Debug for LabelTextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelTextEngine")
            .field("family_name", &self.family_name)
            .finish()
    }
}

impl LabelTextEngine {
    pub fn new(font: &LabelFont) -> ClipResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
        // A collection registers one family per face; shape with the face glyphs are drawn from.
        let family_id = families
            .iter()
            .find(|(_, faces)| faces.iter().any(|info| info.index() == font.index))
            .or_else(|| families.first())
            .map(|(id, _)| *id)
            .ok_or_else(|| {
                ClipError::configuration(format!(
                    "no font families registered from label font '{}'",
                    font.origin()
                ))
            })?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ClipError::configuration("label font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font: font.font_data(),
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shape `text` on a single line.
    pub fn layout(
        &mut self,
        text: &str,
        size_px: f32,
        brush: LabelBrush,
    ) -> ClipResult<parley::Layout<LabelBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ClipError::validation("label size must be finite and > 0"));
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<LabelBrush> = builder.build(text);
        layout.break_all_lines(None);
        layout.align(
            None,
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_database_has_no_sans_face() {
        assert!(pick_sans_face(&usvg::fontdb::Database::new()).is_none());
    }

    #[test]
    fn system_lookup_finds_a_face_whenever_fonts_are_installed() {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        let faces = db.faces().count();
        assert_eq!(pick_sans_face(&db).is_some(), faces > 0);
        assert_eq!(LabelFont::system_sans_serif().is_some(), faces > 0, "{faces} faces loaded");
    }

    #[test]
    fn engine_registers_the_indexed_face() {
        let Some(font) = LabelFont::system_sans_serif() else {
            eprintln!("skipping: no system fonts installed");
            return;
        };
        let engine = LabelTextEngine::new(&font).unwrap();
        assert!(!engine.family_name().is_empty());
        assert_eq!(engine.font().index, font.index);
    }
}
