use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::config::FontConfig;
use crate::error::Error;
use crate::text::is_right_to_left;

/// Which face of the report's fixed font set a piece of text is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontRole {
    Regular,
    Bold,
    Arabic,
}

impl FontRole {
    pub const ALL: [FontRole; 3] = [FontRole::Regular, FontRole::Bold, FontRole::Arabic];
}

enum FaceSource {
    /// One of the PDF standard 14 fonts, WinAnsi-encoded, not embedded.
    Standard {
        base_font: &'static str,
        widths_1000: Vec<f32>,
    },
    TrueType {
        data: Vec<u8>,
        face_index: u32,
        ascender_ratio: f32,
    },
}

pub struct FontFace {
    family: String,
    source: FaceSource,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.source {
            FaceSource::Standard { .. } => "standard",
            FaceSource::TrueType { .. } => "truetype",
        };
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("kind", &kind)
            .finish()
    }
}

impl FontFace {
    fn standard(base_font: &'static str, bold: bool) -> Self {
        Self {
            family: base_font.to_string(),
            source: FaceSource::Standard {
                base_font,
                widths_1000: helvetica_widths(bold),
            },
        }
    }

    fn truetype(family: &str, data: Vec<u8>, face_index: u32) -> Option<Self> {
        let face = Face::parse(&data, face_index).ok()?;
        let ascender_ratio = face.ascender() as f32 / face.units_per_em() as f32;
        Some(Self {
            family: family.to_string(),
            source: FaceSource::TrueType {
                data,
                face_index,
                ascender_ratio,
            },
        })
    }

    pub fn ascender_ratio(&self) -> f32 {
        match &self.source {
            FaceSource::Standard { .. } => 0.718,
            FaceSource::TrueType { ascender_ratio, .. } => *ascender_ratio,
        }
    }

    /// Advance width of `text` at `font_size`, in points.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = match &self.source {
            FaceSource::Standard { widths_1000, .. } => text
                .chars()
                .map(|ch| {
                    let b = char_to_winansi(ch).unwrap_or(b'?');
                    if b >= 32 { widths_1000[(b - 32) as usize] } else { 0.0 }
                })
                .sum(),
            FaceSource::TrueType {
                data, face_index, ..
            } => match Face::parse(data, *face_index) {
                Ok(face) => {
                    let upem = face.units_per_em() as f32;
                    let notdef = face
                        .glyph_hor_advance(ttf_parser::GlyphId(0))
                        .unwrap_or(0) as f32;
                    text.chars()
                        .map(|ch| {
                            face.glyph_index(ch)
                                .and_then(|gid| face.glyph_hor_advance(gid))
                                .map(|adv| adv as f32)
                                .unwrap_or(notdef)
                                / upem
                                * 1000.0
                        })
                        .sum()
                }
                Err(_) => text.chars().count() as f32 * 556.0,
            },
        };
        units * font_size / 1000.0
    }

    fn has_glyph(&self, ch: char) -> bool {
        match &self.source {
            FaceSource::Standard { .. } => char_to_winansi(ch).is_some(),
            FaceSource::TrueType {
                data, face_index, ..
            } => Face::parse(data, *face_index)
                .ok()
                .and_then(|f| f.glyph_index(ch))
                .is_some(),
        }
    }
}

/// The fixed set of faces every report is drawn with. Loaded once at
/// startup and shared read-only by concurrent renders.
#[derive(Debug)]
pub struct FontSet {
    regular: FontFace,
    bold: FontFace,
    arabic: FontFace,
}

impl FontSet {
    /// Latin-only set over the standard Helvetica faces; needs no font files.
    /// Arabic text drawn with it is measured but has no glyphs.
    pub fn standard() -> Self {
        Self {
            regular: FontFace::standard("Helvetica", false),
            bold: FontFace::standard("Helvetica-Bold", true),
            arabic: FontFace::standard("Helvetica", false),
        }
    }

    /// Locate and load the three faces. An Arabic-capable face is required;
    /// missing Latin faces fall back to Helvetica.
    pub fn load(config: &FontConfig) -> Result<Self, Error> {
        let t0 = std::time::Instant::now();
        let mut index: Option<FontLookup> = None;
        let mut lookup = |families: &[String], bold: bool| -> Option<(String, PathBuf, u32)> {
            let index = index.get_or_insert_with(|| scan_font_dirs(&config.font_dirs));
            families.iter().find_map(|family| {
                find_font_file(index, family, bold).map(|(p, i)| (family.clone(), p, i))
            })
        };

        let arabic = match &config.arabic_path {
            Some(path) => load_face_file(path, "Arabic")?,
            None => lookup(&config.arabic_families, false)
                .and_then(|(family, path, idx)| load_face(&family, &path, idx))
                .ok_or_else(|| {
                    Error::ResourceUnavailable(format!(
                        "no Arabic-capable font found (tried {})",
                        config.arabic_families.join(", ")
                    ))
                })?,
        };
        if !arabic.has_glyph('\u{0628}') {
            return Err(Error::ResourceUnavailable(format!(
                "font {} has no Arabic glyphs",
                arabic.family
            )));
        }
        if !arabic.has_glyph('\u{FE91}') {
            log::warn!(
                "Font {} lacks Arabic presentation forms; joined letters may render as missing glyphs",
                arabic.family
            );
        }

        let regular = match &config.regular_path {
            Some(path) => load_face_file(path, "Regular")?,
            None => lookup(&config.latin_families, false)
                .and_then(|(family, path, idx)| load_face(&family, &path, idx))
                .unwrap_or_else(|| {
                    log::warn!("No Latin font found, using Helvetica");
                    FontFace::standard("Helvetica", false)
                }),
        };
        let bold = match &config.bold_path {
            Some(path) => load_face_file(path, "Bold")?,
            None => lookup(&config.latin_families, true)
                .and_then(|(family, path, idx)| load_face(&family, &path, idx))
                .unwrap_or_else(|| {
                    log::warn!("No bold Latin font found, using Helvetica-Bold");
                    FontFace::standard("Helvetica-Bold", true)
                }),
        };

        log::info!(
            "Fonts loaded in {:.1}ms: regular={}, bold={}, arabic={}",
            t0.elapsed().as_secs_f64() * 1000.0,
            regular.family,
            bold.family,
            arabic.family,
        );
        Ok(Self {
            regular,
            bold,
            arabic,
        })
    }

    pub fn face(&self, role: FontRole) -> &FontFace {
        match role {
            FontRole::Regular => &self.regular,
            FontRole::Bold => &self.bold,
            FontRole::Arabic => &self.arabic,
        }
    }

    /// Arabic text gets the Arabic face regardless of weight.
    pub fn select(&self, text: &str, bold: bool) -> FontRole {
        if is_right_to_left(text) {
            FontRole::Arabic
        } else if bold {
            FontRole::Bold
        } else {
            FontRole::Regular
        }
    }

    pub fn text_width(&self, role: FontRole, text: &str, font_size: f32) -> f32 {
        self.face(role).text_width(text, font_size)
    }
}

fn load_face(family: &str, path: &Path, face_index: u32) -> Option<FontFace> {
    let data = std::fs::read(path)
        .map_err(|e| log::warn!("Cannot read font {}: {e}", path.display()))
        .ok()?;
    let face = FontFace::truetype(family, data, face_index)?;
    log::debug!("Loaded font {family} from {}", path.display());
    Some(face)
}

fn load_face_file(path: &Path, role: &str) -> Result<FontFace, Error> {
    let family = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(role)
        .to_string();
    let data = std::fs::read(path).map_err(|e| {
        Error::ResourceUnavailable(format!("{role} font {}: {e}", path.display()))
    })?;
    FontFace::truetype(&family, data, 0).ok_or_else(|| {
        Error::ResourceUnavailable(format!(
            "{role} font {} is not a TrueType/OpenType file",
            path.display()
        ))
    })
}

/// (lowercase family name, bold) -> (file path, face index within TTC)
type FontLookup = HashMap<(String, bool), (PathBuf, u32)>;

fn font_family_name(face: &Face) -> Option<String> {
    for name in face.names() {
        if name.name_id == ttf_parser::name_id::FAMILY
            && name.is_unicode()
            && let Some(s) = name.to_string()
        {
            return Some(s);
        }
    }
    None
}

fn read_font_style(data: &[u8], face_index: u32) -> Option<(String, bool)> {
    let face = Face::parse(data, face_index).ok()?;
    if face.is_italic() {
        return None;
    }
    let family = font_family_name(&face)?;
    Some((family, face.is_bold()))
}

fn font_directories(extra: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = extra.to_vec();

    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(&home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf" | "otf" | "ttc")
    )
}

fn is_font_collection(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc"))
}

/// Walk the font directories (configured ones first) and index every face.
/// The first face seen for a (family, bold) pair wins.
fn scan_font_dirs(extra: &[PathBuf]) -> FontLookup {
    let t0 = std::time::Instant::now();
    let mut index = FontLookup::new();
    let mut files_scanned = 0u32;
    let mut visited: HashSet<PathBuf> = HashSet::new();

    // reversed so that popping visits the configured directories first
    let mut stack: Vec<PathBuf> = font_directories(extra).into_iter().rev().collect();
    while let Some(dir) = stack.pop() {
        if !visited.insert(dir.clone()) {
            continue;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };

        let mut subdirs = Vec::new();
        let mut font_files = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                subdirs.push(path);
            } else if is_font_file(&path) {
                font_files.push(path);
            }
        }
        font_files.sort();
        subdirs.sort();
        stack.extend(subdirs.into_iter().rev());

        for file_path in font_files {
            files_scanned += 1;
            let Ok(file) = std::fs::File::open(&file_path) else {
                continue;
            };
            let Ok(data) = (unsafe { Mmap::map(&file) }) else {
                continue;
            };
            let face_count = if is_font_collection(&file_path) {
                ttf_parser::fonts_in_collection(&data).unwrap_or(1)
            } else {
                1
            };
            for face_idx in 0..face_count {
                if let Some((family, bold)) = read_font_style(&data, face_idx) {
                    index
                        .entry((family.to_lowercase(), bold))
                        .or_insert((file_path.clone(), face_idx));
                }
            }
        }
    }

    log::info!(
        "Font scan: {:.1}ms, {} files parsed → {} entries",
        t0.elapsed().as_secs_f64() * 1000.0,
        files_scanned,
        index.len(),
    );
    index
}

/// Falls back to the regular variant when the bold one is not installed.
fn find_font_file(index: &FontLookup, family: &str, bold: bool) -> Option<(PathBuf, u32)> {
    let key = family.to_lowercase();
    index
        .get(&(key.clone(), bold))
        .or_else(|| if bold { index.get(&(key, false)) } else { None })
        .cloned()
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x85 => '\u{2026}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        _ => byte as char,
    }
}

/// Map a single Unicode char to its WinAnsi byte, if it has one.
fn char_to_winansi(c: char) -> Option<u8> {
    match c as u32 {
        0x0020..=0x007E => Some(c as u8),
        0x00A0..=0x00FF => Some(c as u8),
        _ => (0x80u8..=0x9F).find(|&b| winansi_to_char(b) == c),
    }
}

/// Convert text to WinAnsi bytes; characters outside the code page become `?`.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars().map(|c| char_to_winansi(c).unwrap_or(b'?')).collect()
}

/// Encode UTF-8 text as big-endian 2-byte glyph IDs for CIDFont content streams.
pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for ch in text.chars() {
        let gid = char_to_gid.get(&ch).copied().unwrap_or(0);
        out.push((gid >> 8) as u8);
        out.push((gid & 0xFF) as u8);
    }
    out
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi chars 32..=255.
fn helvetica_widths(bold: bool) -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,                          // space
            33..=47 => 333.0,                     // punctuation
            48..=57 => 556.0,                     // digits
            58..=64 => 333.0,                     // more punctuation
            73 | 74 => 278.0,                     // I J (narrow uppercase)
            77 => 833.0,                          // M (wide)
            65..=90 => if bold { 722.0 } else { 667.0 },
            91..=96 => 333.0,                     // brackets etc.
            102 | 105 | 106 | 108 | 116 => 278.0, // narrow lowercase: f i j l t
            109 | 119 => if bold { 889.0 } else { 833.0 },
            97..=122 => if bold { 611.0 } else { 556.0 },
            _ => 556.0,
        })
        .collect()
}

/// A face registered in one output document.
pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    char_to_gid: Option<HashMap<char, u16>>,
}

impl FontEntry {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// Embed a TrueType/OpenType font as a CIDFont (Type0 composite) with Identity-H encoding.
/// The font data is subsetted to only include glyphs used in the document.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font_name: &str,
    font_data: &[u8],
    face_index: u32,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<HashMap<char, u16>> {
    let face = Face::parse(font_data, face_index).ok()?;
    let descriptor_ref = alloc();
    let data_ref = alloc();

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut missing = 0usize;
    // sorted so the subset's glyph order does not depend on hash order
    let mut chars: Vec<char> = used_chars.iter().copied().collect();
    chars.sort_unstable();
    for ch in chars {
        match face.glyph_index(ch) {
            Some(gid) => {
                char_to_gid.insert(ch, remapper.remap(gid.0));
            }
            None => missing += 1,
        }
    }
    if missing > 0 {
        log::warn!("{font_name}: {missing} character(s) have no glyph and render as .notdef");
    }

    let subset_data = subsetter::subset(font_data, face_index, &remapper)
        .unwrap_or_else(|e| {
            log::warn!("Font subsetting failed for {font_name}: {e}, embedding full font");
            font_data.to_vec()
        });

    let data_len = i32::try_from(subset_data.len()).ok()?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name = font_name.replace(' ', "");

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let cid_font_ref = alloc();
    let system_info = pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info);
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        let mut gid_widths: Vec<(u16, f32)> = char_to_gid
            .iter()
            .filter_map(|(&ch, &new_gid)| {
                face.glyph_index(ch)
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .map(|adv| (new_gid, adv as f32 / units * 1000.0))
            })
            .collect();
        gid_widths.sort_by_key(|&(gid, _)| gid);
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    // ToUnicode maps presentation forms back to themselves, which text
    // extraction tools normalise to the base letters.
    let tounicode_ref = alloc();
    let cmap_name = format!("{}-UTF16", ps_name);
    let mut cmap = pdf_writer::types::UnicodeCmap::new(
        Name(cmap_name.as_bytes()),
        pdf_writer::types::SystemInfo {
            registry: pdf_writer::Str(b"Adobe"),
            ordering: pdf_writer::Str(b"Identity"),
            supplement: 0,
        },
    );
    let mut pairs: Vec<(u16, char)> = char_to_gid.iter().map(|(&ch, &gid)| (gid, ch)).collect();
    pairs.sort_unstable();
    for (new_gid, ch) in pairs {
        cmap.pair(new_gid, ch);
    }
    let cmap_data = cmap.finish();
    pdf.stream(tounicode_ref, cmap_data.as_slice());

    pdf.type0_font(font_ref)
        .base_font(Name(ps_name.as_bytes()))
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_font_ref)
        .to_unicode(tounicode_ref);

    Some(char_to_gid)
}

/// Write `face` into `pdf` under `pdf_name`. TrueType faces that fail to
/// embed degrade to Helvetica.
pub(crate) fn register_font(
    pdf: &mut Pdf,
    face: &FontFace,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &HashSet<char>,
) -> FontEntry {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();

    let char_to_gid = match &face.source {
        FaceSource::TrueType {
            data, face_index, ..
        } => embed_truetype(pdf, font_ref, &face.family, data, *face_index, used_chars, alloc),
        FaceSource::Standard { .. } => None,
    };

    if char_to_gid.is_none() {
        let base_font = match &face.source {
            FaceSource::Standard { base_font, .. } => *base_font,
            FaceSource::TrueType { .. } => {
                log::warn!("Embedding {} failed, using Helvetica", face.family);
                "Helvetica"
            }
        };
        pdf.type1_font(font_ref)
            .base_font(Name(base_font.as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    log::debug!(
        "register_font: {} as {pdf_name} ({} chars) → {:.1}ms",
        face.family,
        used_chars.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    FontEntry {
        pdf_name,
        font_ref,
        char_to_gid,
    }
}
