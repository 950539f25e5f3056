//! Font discovery and per-locale face selection.
//!
//! CJK locales share one multi-face collection; the face index for each
//! script is detected once, when the registry is built, by scanning the
//! collection's family names. Everything else uses the default bold face
//! unless a dedicated file is configured for the locale.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ab_glyph::{FontArc, FontVec};
use storefront_catalog::LanguageEntry;
use storefront_common::{FontConfig, StorefrontError, StorefrontResult};

/// Bold faces commonly present on Linux systems, used when looking for a
/// usable default.
pub const COMMON_BOLD_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
];

/// First existing entry of [`COMMON_BOLD_FONTS`].
pub fn locate_common_bold_font() -> Option<PathBuf> {
    COMMON_BOLD_FONTS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

/// Writing system of a locale, as far as font selection is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Latin,
    Japanese,
    Korean,
    SimplifiedChinese,
    TraditionalChinese,
    Thai,
    Devanagari,
}

impl Script {
    pub fn for_locale(code: &str) -> Self {
        let lower = code.to_ascii_lowercase();
        let primary = lower.split(['-', '_']).next().unwrap_or("");
        match primary {
            "ja" => Self::Japanese,
            "ko" => Self::Korean,
            "th" => Self::Thai,
            "hi" | "mr" | "ne" => Self::Devanagari,
            "zh" => {
                if lower.contains("hant") || lower.ends_with("-tw") || lower.ends_with("-hk") {
                    Self::TraditionalChinese
                } else {
                    Self::SimplifiedChinese
                }
            }
            _ => Self::Latin,
        }
    }

    /// Collection family-name marker and canonical locale for CJK scripts.
    pub fn cjk_marker(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Japanese => Some(("JP", "ja")),
            Self::Korean => Some(("KR", "ko")),
            Self::SimplifiedChinese => Some(("SC", "zh-Hans")),
            Self::TraditionalChinese => Some(("TC", "zh-Hant")),
            _ => None,
        }
    }

    pub fn is_cjk(&self) -> bool {
        self.cjk_marker().is_some()
    }
}

const CJK_SCRIPTS: [Script; 4] = [
    Script::Japanese,
    Script::Korean,
    Script::SimplifiedChinese,
    Script::TraditionalChinese,
];

/// Assign collection faces to CJK locales from `(index, family)` pairs.
///
/// `Mono` families are skipped and the first match per script wins.
pub fn assign_cjk_faces<'a>(
    families: impl IntoIterator<Item = (u32, &'a str)>,
) -> BTreeMap<String, u32> {
    let mut indices = BTreeMap::new();
    for (index, family) in families {
        if family.contains("Mono") {
            continue;
        }
        for script in CJK_SCRIPTS {
            if let Some((marker, locale)) = script.cjk_marker() {
                if family.contains(marker) && !indices.contains_key(locale) {
                    indices.insert(locale.to_string(), index);
                }
            }
        }
    }
    indices
}

/// Family name of every face in a font file (single face or collection).
pub fn family_names(data: &[u8]) -> Vec<(u32, String)> {
    let count = ttf_parser::fonts_in_collection(data).unwrap_or(1);
    (0..count)
        .filter_map(|index| {
            let face = ttf_parser::Face::parse(data, index).ok()?;
            let family = face
                .names()
                .into_iter()
                .filter(|name| name.name_id == ttf_parser::name_id::FAMILY)
                .find_map(|name| name.to_string())?;
            Some((index, family))
        })
        .collect()
}

/// Where a locale's face comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Default,
    Collection { path: PathBuf, index: u32 },
    File { path: PathBuf, index: u32 },
}

/// Resolves and caches the face used for each locale.
pub struct FontRegistry {
    default_face: FontArc,
    default_path: PathBuf,
    cjk_collection: PathBuf,
    cjk_indices: BTreeMap<String, u32>,
    overrides: BTreeMap<String, (PathBuf, u32)>,
    cache: RefCell<BTreeMap<String, FontArc>>,
}

impl FontRegistry {
    /// Load the default face and scan the CJK collection.
    ///
    /// A missing default face is fatal. A missing collection only matters
    /// once a CJK locale is rendered.
    pub fn from_config(config: &FontConfig) -> StorefrontResult<Self> {
        let default_face = load_face(&config.latin_bold, 0)?;

        let cjk_indices = match std::fs::read(&config.cjk_collection) {
            Ok(data) => {
                let families = family_names(&data);
                let indices =
                    assign_cjk_faces(families.iter().map(|(i, name)| (*i, name.as_str())));
                tracing::info!(
                    collection = %config.cjk_collection.display(),
                    faces = families.len(),
                    "CJK font indices detected: {:?}",
                    indices
                );
                indices
            }
            Err(e) => {
                tracing::warn!(
                    collection = %config.cjk_collection.display(),
                    "CJK font collection unavailable: {}",
                    e
                );
                BTreeMap::new()
            }
        };

        let overrides = config
            .overrides
            .iter()
            .map(|(locale, path)| (locale.clone(), (path.clone(), 0)))
            .collect();

        Ok(Self {
            default_face,
            default_path: config.latin_bold.clone(),
            cjk_collection: config.cjk_collection.clone(),
            cjk_indices,
            overrides,
            cache: RefCell::new(BTreeMap::new()),
        })
    }

    /// Registry with a single face for every locale.
    pub fn with_default_face(face: FontArc) -> Self {
        Self {
            default_face: face,
            default_path: PathBuf::new(),
            cjk_collection: PathBuf::new(),
            cjk_indices: BTreeMap::new(),
            overrides: BTreeMap::new(),
            cache: RefCell::new(BTreeMap::new()),
        }
    }

    /// Apply per-language overrides declared in the catalog.
    ///
    /// An override without a path picks a face index in the CJK collection.
    pub fn apply_language_overrides(&mut self, languages: &[LanguageEntry]) {
        for language in languages {
            let Some(font) = &language.font else {
                continue;
            };
            let index = font.index.unwrap_or(0);
            match &font.path {
                Some(path) => {
                    self.overrides
                        .insert(language.code.clone(), (path.clone(), index));
                }
                None => {
                    self.cjk_indices.insert(language.code.clone(), index);
                }
            }
            self.cache.borrow_mut().remove(&language.code);
        }
    }

    /// Detected collection face per CJK locale.
    pub fn cjk_indices(&self) -> &BTreeMap<String, u32> {
        &self.cjk_indices
    }

    pub fn default_path(&self) -> &Path {
        &self.default_path
    }

    /// Where the face for `locale` would be loaded from.
    pub fn source_for(&self, locale: &str) -> StorefrontResult<FontSource> {
        if let Some((path, index)) = self.overrides.get(locale) {
            return Ok(FontSource::File {
                path: path.clone(),
                index: *index,
            });
        }

        if let Some(index) = self.cjk_indices.get(locale) {
            return Ok(FontSource::Collection {
                path: self.cjk_collection.clone(),
                index: *index,
            });
        }

        let script = Script::for_locale(locale);
        if let Some((marker, canonical)) = script.cjk_marker() {
            return match self.cjk_indices.get(canonical) {
                Some(index) => Ok(FontSource::Collection {
                    path: self.cjk_collection.clone(),
                    index: *index,
                }),
                None if !self.cjk_collection.is_file() => Err(StorefrontError::FontNotFound {
                    path: self.cjk_collection.clone(),
                }),
                None => Err(StorefrontError::font(format!(
                    "no {marker} face in {} for locale {locale}",
                    self.cjk_collection.display()
                ))),
            };
        }

        if matches!(script, Script::Thai | Script::Devanagari) {
            tracing::warn!(
                locale,
                "No dedicated font configured for {:?}; glyphs may be missing",
                script
            );
        }
        Ok(FontSource::Default)
    }

    /// Face for `locale`, loading and caching it on first use.
    pub fn font_for(&self, locale: &str) -> StorefrontResult<FontArc> {
        if let Some(face) = self.cache.borrow().get(locale) {
            return Ok(face.clone());
        }

        let face = match self.source_for(locale)? {
            FontSource::Default => self.default_face.clone(),
            FontSource::Collection { path, index } | FontSource::File { path, index } => {
                load_face(&path, index)?
            }
        };
        self.cache
            .borrow_mut()
            .insert(locale.to_string(), face.clone());
        Ok(face)
    }
}

impl std::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRegistry")
            .field("default_path", &self.default_path)
            .field("cjk_collection", &self.cjk_collection)
            .field("cjk_indices", &self.cjk_indices)
            .field("overrides", &self.overrides)
            .finish()
    }
}

/// Load one face from a font file or collection.
pub fn load_face(path: &Path, index: u32) -> StorefrontResult<FontArc> {
    let data = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StorefrontError::FontNotFound {
            path: path.to_path_buf(),
        },
        _ => StorefrontError::font(format!("cannot read {}: {e}", path.display())),
    })?;
    let face = FontVec::try_from_vec_and_index(data, index).map_err(|e| {
        StorefrontError::font(format!("{} (face {index}): {e}", path.display()))
    })?;
    Ok(FontArc::new(face))
}
