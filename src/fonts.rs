use std::collections::{HashMap, HashSet};
use std::path::Path;

use memmap2::Mmap;
use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::Error;

/// Millimetres per PostScript point.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Width source for the layout engine. Implementations must be deterministic:
/// the same text, weight and size always measure the same.
pub trait FontMetrics {
    /// Advance width of `text` in millimetres.
    fn text_width(&self, text: &str, bold: bool, font_size: f32) -> Result<f32, Error>;
}

impl<F> FontMetrics for F
where
    F: Fn(&str, bool, f32) -> Result<f32, Error>,
{
    fn text_width(&self, text: &str, bold: bool, font_size: f32) -> Result<f32, Error> {
        self(text, bold, font_size)
    }
}

fn check_font_size(text: &str, font_size: f32) -> Result<(), Error> {
    if !font_size.is_finite() || font_size <= 0.0 {
        return Err(Error::measure(text, font_size, "font size must be a positive number"));
    }
    Ok(())
}

/// Helvetica advance widths (1000 units/em) for ASCII 32..=126.
#[rustfmt::skip]
static HELVETICA: [u16; 95] = [
    // sp   !    "    #    $    %    &    '    (    )    *    +    ,    -    .    /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // :    ;    <    =    >    ?    @
    278, 278, 584, 584, 584, 556, 1015,
    // A-M
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    // N-Z
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [    \    ]    ^    _    `
    278, 278, 278, 469, 556, 333,
    // a-m
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    // n-z
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // {    |    }    ~
    334, 260, 334, 584,
];

/// Helvetica-Bold advance widths (1000 units/em) for ASCII 32..=126.
#[rustfmt::skip]
static HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// Helvetica widths for Latin-1 0xA0..=0xFF.
#[rustfmt::skip]
static HELVETICA_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica-Bold widths for Latin-1 0xA0..=0xFF.
#[rustfmt::skip]
static HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// Advance width of `ch` as drawn through WinAnsi encoding. Characters the
/// encoding cannot draw measure zero, matching `to_winansi_bytes` dropping them.
fn helvetica_width_1000(ch: char, bold: bool) -> f32 {
    let (ascii, latin1) = if bold {
        (&HELVETICA_BOLD, &HELVETICA_BOLD_LATIN1)
    } else {
        (&HELVETICA, &HELVETICA_LATIN1)
    };
    let width = match winansi_code(ch) {
        Some(code @ 0x20..=0x7E) => ascii[code as usize - 0x20],
        Some(code @ 0xA0..=0xFF) => latin1[code as usize - 0xA0],
        Some(0x95) => 350, // bullet
        Some(0x96) => 556, // en dash
        Some(0x85 | 0x97 | 0x99) => 1000, // ellipsis, em dash, trademark
        Some(0x80) => 556, // euro
        Some(0x91 | 0x92) => if bold { 278 } else { 222 },
        Some(0x93 | 0x94) => if bold { 500 } else { 333 },
        _ => 0,
    };
    width as f32
}

/// A TrueType/OpenType face mapped from disk.
pub struct TrueTypeFont {
    name: String,
    data: Mmap,
    face_index: u32,
}

impl TrueTypeFont {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = std::fs::File::open(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?;
        let data = unsafe { Mmap::map(&file) }?;
        let face = Face::parse(&data, 0)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        let name = font_family_name(&face).unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "Embedded".to_string())
        });
        log::debug!("Loaded font face {name} from {}", path.display());
        Ok(Self {
            name,
            data,
            face_index: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn face(&self) -> Result<Face<'_>, ttf_parser::FaceParsingError> {
        Face::parse(&self.data, self.face_index)
    }

    fn width_1000(face: &Face, ch: char) -> f32 {
        let units = face.units_per_em() as f32;
        face.glyph_index(ch)
            .and_then(|gid| face.glyph_hor_advance(gid))
            .map(|adv| adv as f32 / units * 1000.0)
            .unwrap_or(0.0)
    }
}

fn font_family_name(face: &Face) -> Option<String> {
    face.names()
        .into_iter()
        .find(|name| name.name_id == ttf_parser::name_id::FAMILY && name.is_unicode())
        .and_then(|name| name.to_string())
}

pub enum FontSource {
    /// PDF base-14 Helvetica; nothing is embedded.
    Helvetica,
    TrueType(TrueTypeFont),
}

/// The single sans-serif family used for the whole document, regular and bold.
pub struct FontSet {
    pub regular: FontSource,
    pub bold: FontSource,
}

impl Default for FontSet {
    fn default() -> Self {
        Self {
            regular: FontSource::Helvetica,
            bold: FontSource::Helvetica,
        }
    }
}

impl FontSet {
    /// Load a TrueType pair. A missing bold face falls back to the regular one.
    pub fn from_files(regular: &Path, bold: Option<&Path>) -> Result<Self, Error> {
        let regular_font = TrueTypeFont::open(regular)?;
        let bold_font = TrueTypeFont::open(bold.unwrap_or(regular))?;
        Ok(Self {
            regular: FontSource::TrueType(regular_font),
            bold: FontSource::TrueType(bold_font),
        })
    }

    pub(crate) fn source(&self, bold: bool) -> &FontSource {
        if bold { &self.bold } else { &self.regular }
    }
}

impl FontMetrics for FontSet {
    fn text_width(&self, text: &str, bold: bool, font_size: f32) -> Result<f32, Error> {
        check_font_size(text, font_size)?;
        let width_1000: f32 = match self.source(bold) {
            FontSource::Helvetica => text.chars().map(|ch| helvetica_width_1000(ch, bold)).sum(),
            FontSource::TrueType(font) => {
                let face = font
                    .face()
                    .map_err(|e| Error::measure(text, font_size, e.to_string()))?;
                text.chars()
                    .map(|ch| TrueTypeFont::width_1000(&face, ch))
                    .sum()
            }
        };
        let width = width_1000 * font_size / 1000.0 * PT_TO_MM;
        if !width.is_finite() {
            return Err(Error::measure(text, font_size, "measured width is not finite"));
        }
        Ok(width)
    }
}

pub(crate) struct FontEntry {
    pub(crate) pdf_name: String,
    pub(crate) font_ref: Ref,
    pub(crate) char_to_gid: Option<HashMap<char, u16>>,
}

impl FontEntry {
    pub(crate) fn encode(&self, text: &str) -> Vec<u8> {
        match &self.char_to_gid {
            Some(map) => encode_as_gids(text, map),
            None => to_winansi_bytes(text),
        }
    }
}

/// WinAnsi (Windows-1252) code for `ch`, if the encoding has one.
fn winansi_code(ch: char) -> Option<u8> {
    match ch as u32 {
        0x0020..=0x007E | 0x00A0..=0x00FF => Some(ch as u8),
        0x2022 => Some(0x95),
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2026 => Some(0x85),
        0x20AC => Some(0x80),
        0x2122 => Some(0x99),
        _ => None,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Unmappable characters are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars().filter_map(winansi_code).collect()
}

pub(crate) fn encode_as_gids(text: &str, char_to_gid: &HashMap<char, u16>) -> Vec<u8> {
    text.chars()
        .filter_map(|ch| char_to_gid.get(&ch))
        .flat_map(|gid| gid.to_be_bytes())
        .collect()
}

pub(crate) fn register_font(
    pdf: &mut Pdf,
    source: &FontSource,
    bold: bool,
    pdf_name: String,
    alloc: &mut impl FnMut() -> Ref,
    used_chars: &HashSet<char>,
) -> FontEntry {
    let t0 = std::time::Instant::now();
    let font_ref = alloc();

    let char_to_gid = match source {
        FontSource::TrueType(font) => {
            embed_truetype(pdf, font_ref, font, used_chars, alloc).or_else(|| {
                log::warn!("Embedding {} failed — using Helvetica", font.name());
                None
            })
        }
        FontSource::Helvetica => None,
    };

    if char_to_gid.is_none() {
        let base: &[u8] = if bold { b"Helvetica-Bold" } else { b"Helvetica" };
        pdf.type1_font(font_ref)
            .base_font(Name(base))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    log::debug!(
        "register_font: {pdf_name} bold={bold} ({} glyphs) → {:.1}ms",
        used_chars.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );

    FontEntry {
        pdf_name,
        font_ref,
        char_to_gid,
    }
}

/// Embed a TrueType face as a Type0 font with Identity-H encoding, subsetted
/// to `used_chars`. Returns the char → subset glyph id map.
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    font: &TrueTypeFont,
    used_chars: &HashSet<char>,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<HashMap<char, u16>> {
    let face = font.face().ok()?;
    let descriptor_ref = alloc();
    let data_ref = alloc();

    let units = face.units_per_em() as f32;
    let scale = |v: i16| v as f32 / units * 1000.0;
    let bb = face.global_bounding_box();
    let bbox = Rect::new(scale(bb.x_min), scale(bb.y_min), scale(bb.x_max), scale(bb.y_max));
    let cap_height = face.capital_height().map(scale).unwrap_or(700.0);

    let mut remapper = subsetter::GlyphRemapper::new();
    let mut char_to_gid = HashMap::new();
    let mut gid_widths: Vec<(u16, f32)> = Vec::new();
    for &ch in used_chars {
        if let Some(gid) = face.glyph_index(ch) {
            let new_gid = remapper.remap(gid.0);
            char_to_gid.insert(ch, new_gid);
            gid_widths.push((new_gid, TrueTypeFont::width_1000(&face, ch)));
        }
    }
    gid_widths.sort_by_key(|&(gid, _)| gid);
    gid_widths.dedup_by_key(|&mut (gid, _)| gid);

    let subset_data = subsetter::subset(&font.data, font.face_index, &remapper)
        .unwrap_or_else(|e| {
            log::warn!("Font subsetting failed for {}: {e} — embedding full font", font.name());
            font.data.to_vec()
        });
    let data_len = i32::try_from(subset_data.len()).ok()?;
    pdf.stream(data_ref, &subset_data)
        .pair(Name(b"Length1"), data_len);

    let ps_name: String = font.name().chars().filter(|c| !c.is_whitespace()).collect();

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(scale(face.ascender()))
        .descent(scale(face.descender()))
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let system_info = || pdf_writer::types::SystemInfo {
        registry: pdf_writer::Str(b"Adobe"),
        ordering: pdf_writer::Str(b"Identity"),
        supplement: 0,
    };

    let cid_font_ref = alloc();
    {
        let mut cid = pdf.cid_font(cid_font_ref);
        cid.subtype(pdf_writer::types::CidFontType::Type2);
        cid.base_font(Name(ps_name.as_bytes()));
        cid.system_info(system_info());
        cid.font_descriptor(descriptor_ref);
        cid.default_width(0.0);
        cid.cid_to_gid_map_predefined(Name(b"Identity"));
        if !gid_widths.is_empty() {
            let mut w = cid.widths();
            for &(gid, width) in &gid_widths {
                w.consecutive(gid, [width]);
            }
        }
    }

    let tounicode_ref = alloc();
    let cmap_name = format!("{ps_name}-UTF16");
    let mut cmap = pdf_writer::types::UnicodeCmap::new(Name(cmap_name.as_bytes()), system_info());
    for (&ch, &new_gid) in &char_to_gid {
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
