//! Pixel fonts and text meshes.
//!
//! Glyphs are small cell bitmaps, written as rows of `#` (lit) and `.`
//! (empty). Laying out a string extrudes every lit cell into a box, so the
//! result is a solid, blocky text mesh that can be surface-sampled like any
//! other.
//!
//! # Font files
//!
//! ```json
//! {
//!   "columns": 4,
//!   "rows": 7,
//!   "advance": 5,
//!   "space_advance": 3,
//!   "glyphs": {
//!     "H": ["#..#", "#..#", "#..#", "####", "#..#", "#..#", "#..#"]
//!   }
//! }
//! ```
//!
//! Advances are measured in cells. Lowercase letters fall back to their
//! uppercase glyph when the font has no lowercase of its own.

use std::collections::BTreeMap;
use std::path::Path;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::MeshFieldConfig;
use crate::error::{FieldError, Result};
use crate::mesh::TriangleMesh;

/// A fixed-grid bitmap font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelFont {
    /// Glyph width in cells.
    pub columns: u32,
    /// Glyph height in cells.
    pub rows: u32,
    /// Pen advance per glyph, in cells.
    pub advance: u32,
    /// Pen advance for a space, in cells.
    pub space_advance: u32,
    /// Glyph bitmaps, one string per row, top row first.
    pub glyphs: BTreeMap<char, Vec<String>>,
}

/// Text sizing for [`PixelFont::layout`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    /// Glyph height.
    pub font_size: f32,
    /// Lines wrap before exceeding this width.
    pub max_width: f32,
    /// Baseline-to-baseline distance in multiples of `font_size`.
    pub line_spacing: f32,
    /// Extrusion depth. Zero gives flat, front-face-only text.
    pub depth: f32,
}

impl TextLayout {
    /// Size text relative to a viewport of `viewport` world units.
    pub fn for_viewport(viewport: Vec2, config: &MeshFieldConfig) -> Self {
        let font_size = viewport.min_element() * config.font_size_ratio;
        Self {
            font_size,
            max_width: viewport.x * config.max_width_ratio,
            line_spacing: config.line_spacing,
            depth: font_size * config.depth_ratio,
        }
    }
}

impl PixelFont {
    /// The built-in 4x7 font: `A`-`Z`, `0`-`9` and a little punctuation.
    pub fn builtin() -> Self {
        let glyphs = BUILTIN_GLYPHS
            .iter()
            .map(|(c, rows)| (*c, rows.iter().map(|r| r.to_string()).collect::<Vec<_>>()))
            .collect();
        Self {
            columns: 4,
            rows: 7,
            advance: 5,
            space_advance: 3,
            glyphs,
        }
    }

    /// Parse and validate a font document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let font: Self = serde_json::from_str(json)?;
        font.validate()?;
        Ok(font)
    }

    /// Read, parse and validate a font file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check that every glyph fits the declared grid.
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 || self.rows == 0 {
            return Err(FieldError::InvalidConfig("font grid must be non-empty".into()));
        }
        for (c, rows) in &self.glyphs {
            if rows.len() != self.rows as usize {
                return Err(FieldError::InvalidConfig(format!(
                    "glyph {c:?} has {} rows, expected {}",
                    rows.len(),
                    self.rows
                )));
            }
            if let Some(row) = rows.iter().find(|r| r.chars().any(|c| c != '#' && c != '.')) {
                return Err(FieldError::InvalidConfig(format!(
                    "glyph {c:?} row {row:?} may only contain '#' and '.'"
                )));
            }
            if let Some(row) = rows.iter().find(|r| r.len() > self.columns as usize) {
                return Err(FieldError::InvalidConfig(format!(
                    "glyph {c:?} row {row:?} is wider than {} columns",
                    self.columns
                )));
            }
        }
        Ok(())
    }

    /// Bitmap rows for `c`, falling back to uppercase.
    pub fn glyph(&self, c: char) -> Option<&[String]> {
        self.glyphs
            .get(&c)
            .or_else(|| self.glyphs.get(&c.to_ascii_uppercase()))
            .map(Vec::as_slice)
    }

    /// Whether cell `(col, row)` of a glyph is lit. Row 0 is the top.
    fn lit(rows: &[String], col: i32, row: i32) -> bool {
        if col < 0 || row < 0 {
            return false;
        }
        rows.get(row as usize)
            .and_then(|r| r.as_bytes().get(col as usize))
            .is_some_and(|b| *b == b'#')
    }

    /// Mesh for a single line with its baseline at `y = 0` and pen start at `x = 0`.
    pub fn line_mesh(&self, line: &str, font_size: f32, depth: f32) -> TriangleMesh {
        let cell = font_size / self.rows as f32;
        let mut mesh = TriangleMesh::new();
        let mut pen = 0.0;

        for c in line.chars() {
            if c == ' ' {
                pen += self.space_advance as f32 * cell;
                continue;
            }
            match self.glyph(c) {
                Some(rows) => self.extrude_glyph(&mut mesh, rows, pen, cell, depth),
                None => log::debug!("no glyph for {c:?}, leaving a gap"),
            }
            pen += self.advance as f32 * cell;
        }
        mesh
    }

    /// Width of the inked part of `line`.
    pub fn measure(&self, line: &str, font_size: f32) -> f32 {
        self.line_mesh(line, font_size, 0.0)
            .bounding_box()
            .map_or(0.0, |(lo, hi)| hi.x - lo.x)
    }

    /// Word-wrap `text`, stack the lines and centre the merged mesh on the origin.
    ///
    /// A word that alone exceeds `max_width` still gets a line of its own.
    pub fn layout(&self, text: &str, layout: &TextLayout) -> TriangleMesh {
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && self.measure(&candidate, layout.font_size) > layout.max_width {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }

        let step = layout.font_size * layout.line_spacing;
        let meshes: Vec<TriangleMesh> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let mut mesh = self.line_mesh(line, layout.font_size, layout.depth);
                mesh.translate(Vec3::new(0.0, -(i as f32) * step, 0.0));
                mesh
            })
            .collect();

        let mut merged = TriangleMesh::merge(&meshes);
        merged.center();
        log::debug!(
            "laid out {:?} as {} line(s), {} triangles",
            text,
            lines.len(),
            merged.triangle_count()
        );
        merged
    }

    fn extrude_glyph(&self, mesh: &mut TriangleMesh, rows: &[String], pen: f32, cell: f32, depth: f32) {
        let height = self.rows as i32;
        for row in 0..height {
            for col in 0..self.columns as i32 {
                if !Self::lit(rows, col, row) {
                    continue;
                }
                let x0 = pen + col as f32 * cell;
                let y0 = (height - 1 - row) as f32 * cell;
                let (x1, y1) = (x0 + cell, y0 + cell);
                let (zb, zf) = (0.0, depth);

                mesh.push_quad(
                    Vec3::new(x0, y0, zf),
                    Vec3::new(x1, y0, zf),
                    Vec3::new(x1, y1, zf),
                    Vec3::new(x0, y1, zf),
                );
                if depth <= 0.0 {
                    continue;
                }
                mesh.push_quad(
                    Vec3::new(x1, y0, zb),
                    Vec3::new(x0, y0, zb),
                    Vec3::new(x0, y1, zb),
                    Vec3::new(x1, y1, zb),
                );
                // Side walls only where the neighbouring cell is empty.
                if !Self::lit(rows, col - 1, row) {
                    mesh.push_quad(
                        Vec3::new(x0, y0, zb),
                        Vec3::new(x0, y0, zf),
                        Vec3::new(x0, y1, zf),
                        Vec3::new(x0, y1, zb),
                    );
                }
                if !Self::lit(rows, col + 1, row) {
                    mesh.push_quad(
                        Vec3::new(x1, y0, zf),
                        Vec3::new(x1, y0, zb),
                        Vec3::new(x1, y1, zb),
                        Vec3::new(x1, y1, zf),
                    );
                }
                if !Self::lit(rows, col, row - 1) {
                    mesh.push_quad(
                        Vec3::new(x0, y1, zf),
                        Vec3::new(x1, y1, zf),
                        Vec3::new(x1, y1, zb),
                        Vec3::new(x0, y1, zb),
                    );
                }
                if !Self::lit(rows, col, row + 1) {
                    mesh.push_quad(
                        Vec3::new(x0, y0, zb),
                        Vec3::new(x1, y0, zb),
                        Vec3::new(x1, y0, zf),
                        Vec3::new(x0, y0, zf),
                    );
                }
            }
        }
    }
}

impl Default for PixelFont {
    fn default() -> Self {
        Self::builtin()
    }
}

#[rustfmt::skip]
const BUILTIN_GLYPHS: &[(char, [&str; 7])] = &[
    ('A', [".##.", "#..#", "#..#", "####", "#..#", "#..#", "#..#"]),
    ('B', ["###.", "#..#", "#..#", "###.", "#..#", "#..#", "###."]),
    ('C', [".###", "#...", "#...", "#...", "#...", "#...", ".###"]),
    ('D', ["###.", "#..#", "#..#", "#..#", "#..#", "#..#", "###."]),
    ('E', ["####", "#...", "#...", "###.", "#...", "#...", "####"]),
    ('F', ["####", "#...", "#...", "###.", "#...", "#...", "#..."]),
    ('G', [".###", "#...", "#...", "#.##", "#..#", "#..#", ".###"]),
    ('H', ["#..#", "#..#", "#..#", "####", "#..#", "#..#", "#..#"]),
    ('I', ["####", ".#..", ".#..", ".#..", ".#..", ".#..", "####"]),
    ('J', ["..##", "...#", "...#", "...#", "...#", "#..#", ".##."]),
    ('K', ["#..#", "#.#.", "##..", "#...", "##..", "#.#.", "#..#"]),
    ('L', ["#...", "#...", "#...", "#...", "#...", "#...", "####"]),
    ('M', ["#..#", "####", "####", "#..#", "#..#", "#..#", "#..#"]),
    ('N', ["#...", "##..", "#.#.", "#..#", "#..#", "#..#", "#..#"]),
    ('O', [".##.", "#..#", "#..#", "#..#", "#..#", "#..#", ".##."]),
    ('P', ["####", "#..#", "#..#", "####", "#...", "#...", "#..."]),
    ('Q', [".##.", "#..#", "#..#", "#..#", "#.##", "#..#", ".###"]),
    ('R', ["###.", "#..#", "#..#", "###.", "##..", "#.#.", "#..#"]),
    ('S', [".###", "#...", "##..", "#.##", "...#", "#..#", ".###"]),
    ('T', ["####", ".#..", ".#..", ".#..", ".#..", ".#..", ".#.."]),
    ('U', ["#..#", "#..#", "#..#", "#..#", "#..#", "#..#", ".##."]),
    ('V', ["#..#", "#..#", "#..#", "#..#", "#..#", ".##.", ".##."]),
    ('W', ["#..#", "#..#", "#..#", "#..#", "####", "####", "#..#"]),
    ('X', ["#..#", "#..#", ".##.", ".##.", ".##.", "#..#", "#..#"]),
    ('Y', ["#..#", "#..#", "#..#", ".##.", ".#..", ".#..", ".#.."]),
    ('Z', ["####", "...#", "..#.", ".#..", "#...", "#...", "####"]),
    ('0', [".##.", "#..#", "#.##", "####", "##.#", "#..#", ".##."]),
    ('1', [".#..", "##..", ".#..", ".#..", ".#..", ".#..", "###."]),
    ('2', [".##.", "#..#", "...#", "..#.", ".#..", "#...", "####"]),
    ('3', ["###.", "...#", "...#", ".##.", "...#", "...#", "###."]),
    ('4', ["#..#", "#..#", "#..#", "####", "...#", "...#", "...#"]),
    ('5', ["####", "#...", "###.", "...#", "...#", "#..#", ".##."]),
    ('6', [".##.", "#...", "#...", "###.", "#..#", "#..#", ".##."]),
    ('7', ["####", "...#", "..#.", ".#..", ".#..", ".#..", ".#.."]),
    ('8', [".##.", "#..#", "#..#", ".##.", "#..#", "#..#", ".##."]),
    ('9', [".##.", "#..#", "#..#", ".###", "...#", "...#", ".##."]),
    ('.', ["....", "....", "....", "....", "....", "....", ".#.."]),
    ('!', [".#..", ".#..", ".#..", ".#..", ".#..", "....", ".#.."]),
    ('-', ["....", "....", "....", "####", "....", "....", "...."]),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(font_size: f32, max_width: f32) -> TextLayout {
        TextLayout {
            font_size,
            max_width,
            line_spacing: 1.2,
            depth: 0.0,
        }
    }

    #[test]
    fn test_builtin_is_valid() {
        let font = PixelFont::builtin();
        font.validate().unwrap();
        assert!(font.glyph('A').is_some());
        assert!(font.glyph('a').is_some());
        assert!(font.glyph('~').is_none());
    }

    #[test]
    fn test_flat_glyph_area() {
        // "L" has 10 lit cells; at font size 7 each cell is 1x1.
        let mesh = PixelFont::builtin().line_mesh("L", 7.0, 0.0);
        assert!((mesh.surface_area() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_extruded_cell_is_closed_box() {
        let font = PixelFont::from_json_str(
            r##"{ "columns": 1, "rows": 1, "advance": 2, "space_advance": 1,
                 "glyphs": { "X": ["#"] } }"##,
        )
        .unwrap();
        let mesh = font.line_mesh("X", 1.0, 1.0);
        assert_eq!(mesh.triangle_count(), 12);
        assert!((mesh.surface_area() - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_shared_walls_are_culled() {
        let font = PixelFont::from_json_str(
            r###"{ "columns": 2, "rows": 1, "advance": 3, "space_advance": 1,
                 "glyphs": { "X": ["##"] } }"###,
        )
        .unwrap();
        // 2x1x1 block: front+back 2 each, top+bottom 2 each, two end caps.
        let mesh = font.line_mesh("X", 1.0, 1.0);
        assert!((mesh.surface_area() - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_measure_ignores_trailing_advance() {
        let font = PixelFont::builtin();
        // "HH": 4 cells, 1 gap, 4 cells at cell size 1.
        assert!((font.measure("HH", 7.0) - 9.0).abs() < 1e-5);
        assert_eq!(font.measure("   ", 7.0), 0.0);
    }

    #[test]
    fn test_wraps_words_into_lines() {
        let font = PixelFont::builtin();
        // Each word is 14 wide; two words would be 32.
        let one_line = font.layout("HIH HIH", &flat(7.0, 100.0));
        let two_lines = font.layout("HIH HIH", &flat(7.0, 20.0));

        let (lo1, hi1) = one_line.bounding_box().unwrap();
        let (lo2, hi2) = two_lines.bounding_box().unwrap();
        assert!((hi1.x - lo1.x - 32.0).abs() < 1e-4);
        assert!((hi1.y - lo1.y - 7.0).abs() < 1e-4);
        assert!((hi2.x - lo2.x - 14.0).abs() < 1e-4);
        // second baseline sits 8.4 lower
        assert!((hi2.y - lo2.y - 15.4).abs() < 1e-4);
    }

    #[test]
    fn test_layout_is_centred() {
        let mesh = PixelFont::builtin().layout("SENPO STUDIOS", &flat(1.0, 3.0));
        let (lo, hi) = mesh.bounding_box().unwrap();
        assert!((lo + hi).length() < 1e-4);
    }

    #[test]
    fn test_long_word_keeps_own_line() {
        let font = PixelFont::builtin();
        let mesh = font.layout("WIDEWORD", &flat(7.0, 5.0));
        let (lo, hi) = mesh.bounding_box().unwrap();
        assert!((hi.y - lo.y - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_unknown_glyphs_give_empty_mesh() {
        let mesh = PixelFont::builtin().layout("~~~", &flat(1.0, 10.0));
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_builtin_matches_logo_letters() {
        let font = PixelFont::builtin();
        let rows = |c| font.glyph(c).unwrap().to_vec();
        assert_eq!(rows('S'), [".###", "#...", "##..", "#.##", "...#", "#..#", ".###"]);
        assert_eq!(rows('N'), ["#...", "##..", "#.#.", "#..#", "#..#", "#..#", "#..#"]);
        assert_eq!(rows('P'), ["####", "#..#", "#..#", "####", "#...", "#...", "#..."]);
        assert_eq!(rows('D'), ["###.", "#..#", "#..#", "#..#", "#..#", "#..#", "###."]);
    }

    #[test]
    fn test_rejects_foreign_cell_characters() {
        let err = PixelFont::from_json_str(
            r##"{ "columns": 2, "rows": 1, "advance": 3, "space_advance": 1,
                 "glyphs": { "X": ["é#"] } }"##,
        )
        .unwrap_err();
        assert!(matches!(err, FieldError::InvalidConfig(_)));

        let err = PixelFont::from_json_str(
            r##"{ "columns": 2, "rows": 1, "advance": 3, "space_advance": 1,
                 "glyphs": { "X": ["#x"] } }"##,
        )
        .unwrap_err();
        assert!(matches!(err, FieldError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_font() {
        let err = PixelFont::from_json_str(
            r####"{ "columns": 2, "rows": 2, "advance": 3, "space_advance": 1,
                 "glyphs": { "X": ["###", "##"] } }"####,
        )
        .unwrap_err();
        assert!(matches!(err, FieldError::InvalidConfig(_)));
    }
}
