//! Board diagrams: SVG generation and PNG rasterization.
//!
//! The board is drawn from the side to move's point of view, with file and
//! rank labels in the margin and a small marker in the top-right corner
//! showing whose turn it is.

use std::path::Path;

use chess_core::fen::parse_position;
use resvg::{tiny_skia, usvg};
use shakmaty::{Chess, Color, Piece, Position, Role, Square};

use crate::error::{Result, SheetError};

pub const IMAGE_SIZE: u32 = 390;
const MARGIN: f32 = 15.0;
const SQUARE: f32 = 45.0;

const LIGHT_SQUARE: &str = "#ffce9e";
const DARK_SQUARE: &str = "#d18b47";
const WHITE_TO_MOVE: &str = "#fafafa";
const BLACK_TO_MOVE: &str = "#000000";

// Piece outlines in a 45x45 cell. Every element is filled with the piece
// colour; `ACCENT` marks details drawn in the opposite colour.
const ACCENT: &str = "accent";

const PAWN: &[&str] = &[
    r#"<circle cx="22.5" cy="14" r="5"/>"#,
    r#"<path d="M18 21 h9 l3 12 h-15 z"/>"#,
    r#"<path d="M12 38 h21 v-5 h-21 z"/>"#,
];

const KNIGHT: &[&str] = &[
    r#"<path d="M12 38 h22 v-4 h-22 z"/>"#,
    r#"<path d="M15 34 c0-8 4-11 7-14 l-7 2 -3-4 8-9 2-3 2 3 c7 1 11 8 11 25 z"/>"#,
    r#"<circle class="accent" cx="21" cy="15" r="1.3"/>"#,
];

const BISHOP: &[&str] = &[
    r#"<path d="M10 38 h25 v-4 h-25 z"/>"#,
    r#"<path d="M15 34 c0-6 2-9 4-11 h7 c2 2 4 5 4 11 z"/>"#,
    r#"<ellipse cx="22.5" cy="17" rx="6" ry="7"/>"#,
    r#"<circle cx="22.5" cy="8" r="2.5"/>"#,
];

const ROOK: &[&str] = &[
    r#"<path d="M11 38 h23 v-4 h-23 z"/>"#,
    r#"<path d="M14 34 l1.5-18 h14 l1.5 18 z"/>"#,
    r#"<path d="M12 16 v-6 h4 v3 h4 v-3 h5 v3 h4 v-3 h4 v6 z"/>"#,
];

const QUEEN: &[&str] = &[
    r#"<path d="M10 38 h25 v-4 h-25 z"/>"#,
    r#"<path d="M11 34 l-2-18 7 10 2-14 4.5 13 4.5-13 2 14 7-10 -2 18 z"/>"#,
    r#"<circle cx="9" cy="15" r="2.2"/>"#,
    r#"<circle cx="16" cy="11" r="2.2"/>"#,
    r#"<circle cx="22.5" cy="10" r="2.2"/>"#,
    r#"<circle cx="29" cy="11" r="2.2"/>"#,
    r#"<circle cx="36" cy="15" r="2.2"/>"#,
];

const KING: &[&str] = &[
    r#"<path d="M10 38 h25 v-4 h-25 z"/>"#,
    r#"<path d="M11 34 c-4-8 2-14 11.5-10 c9.5-4 15.5 2 11.5 10 z"/>"#,
    r#"<path d="M21 6 h3 v4 h3 v3 h-3 v7 h-3 v-7 h-3 v-3 h3 z"/>"#,
];

// Stroked coordinate glyphs in a 6x8 box (descenders reach y=10). Drawn as
// paths so rasterizing needs no font database.
const FILE_GLYPHS: [&str; 8] = [
    "M5 3V8M5 5.5A2 2.5 0 0 0 1 5.5A2 2.5 0 0 0 5 5.5",
    "M1 0V8M1 5.5A2 2.5 0 0 0 5 5.5A2 2.5 0 0 0 1 5.5",
    "M5 3.8A2.2 2.5 0 1 0 5 7.2",
    "M5 0V8M5 5.5A2 2.5 0 0 0 1 5.5A2 2.5 0 0 0 5 5.5",
    "M1 5.5H5A2 2.5 0 1 0 4.6 7.3",
    "M5 0.5A1.8 1.8 0 0 0 2.5 2V8M1 3.5H4.5",
    "M5 3V9A1.8 1.8 0 0 1 1.4 9.5M5 5.5A2 2.5 0 0 0 1 5.5A2 2.5 0 0 0 5 5.5",
    "M1 0V8M1 5A2 2 0 0 1 5 5V8",
];

const RANK_GLYPHS: [&str; 8] = [
    "M1.5 2L3.5 0V8M1.5 8H5.5",
    "M1 2A2 2 0 1 1 4.5 3.8L1 8H5",
    "M1 1.2A2 1.9 0 1 1 3 4A2.1 2 0 1 1 1 7",
    "M4 8V0L1 5.5H5.5",
    "M5 0H1.5L1 3.5A2.2 2.2 0 1 1 1 7.5",
    "M4.5 0.5C2 1 1 3 1 5.5M1 5.5A2 2.5 0 0 0 5 5.5A2 2.5 0 0 0 1 5.5",
    "M1 0H5L2 8",
    "M3 4A1.8 2 0 1 1 3 0A1.8 2 0 1 1 3 4A2 2 0 1 1 3 8A2 2 0 1 1 3 4",
];

const GLYPH_WIDTH: f32 = 6.0;
const GLYPH_HEIGHT: f32 = 8.0;

fn shapes(role: Role) -> &'static [&'static str] {
    match role {
        Role::Pawn => PAWN,
        Role::Knight => KNIGHT,
        Role::Bishop => BISHOP,
        Role::Rook => ROOK,
        Role::Queen => QUEEN,
        Role::King => KING,
    }
}

fn colours(color: Color) -> (&'static str, &'static str) {
    match color {
        Color::White => ("#ffffff", "#000000"),
        Color::Black => ("#000000", "#ffffff"),
    }
}

/// Top-left corner of square `index` (a1 = 0, h8 = 63), with `bottom` at the bottom edge.
fn square_origin(index: u32, bottom: Color) -> (f32, f32) {
    let (file, rank) = ((index % 8) as f32, (index / 8) as f32);
    let (col, row) = match bottom {
        Color::White => (file, 7.0 - rank),
        Color::Black => (7.0 - file, rank),
    };
    (MARGIN + col * SQUARE, MARGIN + row * SQUARE)
}

/// Glyph path and top-left corner of every margin label: files above and
/// below the board, ranks left and right of it.
fn coordinate_labels(bottom: Color) -> Vec<(&'static str, f32, f32)> {
    let far = MARGIN + 8.0 * SQUARE;
    let across = (MARGIN - GLYPH_WIDTH) / 2.0;
    let down = (MARGIN - GLYPH_HEIGHT) / 2.0;
    let mut labels = Vec::with_capacity(32);

    for (file, glyph) in FILE_GLYPHS.iter().enumerate() {
        let (x, _) = square_origin(file as u32, bottom);
        let x = x + (SQUARE - GLYPH_WIDTH) / 2.0;
        labels.push((*glyph, x, down));
        labels.push((*glyph, x, far + down));
    }
    for (rank, glyph) in RANK_GLYPHS.iter().enumerate() {
        let (_, y) = square_origin(rank as u32 * 8, bottom);
        let y = y + (SQUARE - GLYPH_HEIGHT) / 2.0;
        labels.push((*glyph, across, y));
        labels.push((*glyph, far + across, y));
    }
    labels
}

fn piece_svg(piece: Piece, x: f32, y: f32) -> String {
    let (fill, accent) = colours(piece.color);
    let mut svg = format!(
        r#"<g transform="translate({x},{y})" fill="{fill}" stroke="{outline}" stroke-width="1.5" stroke-linejoin="round">"#,
        outline = "#000000",
    );
    for shape in shapes(piece.role) {
        if shape.contains(ACCENT) {
            svg.push_str(&shape.replace(r#"class="accent""#, &format!(r#"fill="{accent}" stroke="none""#)));
        } else {
            svg.push_str(shape);
        }
    }
    svg.push_str("</g>");
    svg
}

/// SVG for a position, oriented so the side to move is at the bottom.
pub fn position_svg(pos: &Chess) -> String {
    let turn = pos.turn();
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{IMAGE_SIZE}" height="{IMAGE_SIZE}" viewBox="0 0 {IMAGE_SIZE} {IMAGE_SIZE}">"#
    );

    for index in 0..64u32 {
        let square = Square::new(index);
        let (x, y) = square_origin(index, turn);
        let light = (index % 8 + index / 8) % 2 == 1;
        let fill = if light { LIGHT_SQUARE } else { DARK_SQUARE };
        svg.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{SQUARE}" height="{SQUARE}" fill="{fill}"/>"#
        ));
        if let Some(piece) = pos.board().piece_at(square) {
            svg.push_str(&piece_svg(piece, x, y));
        }
    }

    svg.push_str(
        r##"<g class="coord" fill="none" stroke="#000000" stroke-width="1.1" stroke-linecap="round" stroke-linejoin="round">"##,
    );
    for (glyph, x, y) in coordinate_labels(turn) {
        svg.push_str(&format!(
            r#"<path transform="translate({x},{y})" d="{glyph}"/>"#
        ));
    }
    svg.push_str("</g>");

    let marker = match turn {
        Color::White => WHITE_TO_MOVE,
        Color::Black => BLACK_TO_MOVE,
    };
    svg.push_str(&format!(
        r#"<polygon points="375,0 390,0 390,14 375,14" fill="{marker}" stroke="grey" stroke-width="3"/>"#
    ));
    svg.push_str("</svg>");
    svg
}

pub fn board_svg(fen: &str) -> Result<String> {
    Ok(position_svg(&parse_position(fen)?))
}

/// Rasterize the diagram for `fen` to a PNG file.
pub fn render_png(fen: &str, path: &Path) -> Result<()> {
    let svg = board_svg(fen)?;
    let tree = usvg::Tree::from_str(&svg, &usvg::Options::default())
        .map_err(|e| SheetError::Render(format!("invalid board SVG: {e}")))?;

    let mut pixmap = tiny_skia::Pixmap::new(IMAGE_SIZE, IMAGE_SIZE)
        .ok_or_else(|| SheetError::Render("could not allocate pixmap".into()))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .save_png(path)
        .map_err(|e| SheetError::Render(format!("failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::fen::STANDARD_START_FEN;

    #[test]
    fn test_square_orientation() {
        // a1 sits bottom-left for White, top-right for Black.
        assert_eq!(square_origin(0, Color::White), (15.0, 330.0));
        assert_eq!(square_origin(0, Color::Black), (330.0, 15.0));
        assert_eq!(square_origin(63, Color::White), (330.0, 15.0));
    }

    #[test]
    fn test_start_position_svg() {
        let svg = board_svg(STANDARD_START_FEN).unwrap();
        assert_eq!(svg.matches("<rect").count(), 64);
        // 32 pieces plus the coordinate group.
        assert_eq!(svg.matches("<g ").count(), 33);
        assert_eq!(svg.matches("<path transform=").count(), 32);
        assert!(svg.contains(r##"fill="#fafafa""##));
        assert!(svg.contains(r#"width="390""#));
    }

    #[test]
    fn test_black_to_move_marker() {
        let svg = board_svg("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1").unwrap();
        assert!(svg.contains(r##"points="375,0 390,0 390,14 375,14" fill="#000000""##));
    }

    #[test]
    fn test_coordinates_follow_orientation() {
        let white = coordinate_labels(Color::White);
        let black = coordinate_labels(Color::Black);
        assert_eq!(white.len(), 32);

        // File "a" (first two labels) sits under the left column for White
        // and the right column for Black; both copies share that column.
        assert_eq!((white[0].0, white[0].1), (FILE_GLYPHS[0], 34.5));
        assert_eq!(white[1].1, 34.5);
        assert_eq!(black[0].1, 349.5);
        assert_eq!((white[0].2, white[1].2), (3.5, 378.5));

        // Rank "1" is the bottom row for White and the top row for Black.
        let (glyph, x, y) = white[16];
        assert_eq!((glyph, x, y), (RANK_GLYPHS[0], 4.5, 348.5));
        assert_eq!(white[17].1, 379.5);
        assert_eq!(black[16].2, 33.5);
    }

    #[test]
    fn test_black_to_move_svg_flips_labels() {
        let white = board_svg(STANDARD_START_FEN).unwrap();
        let black = board_svg("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1").unwrap();
        let a_file = format!(r#"d="{}""#, FILE_GLYPHS[0]);
        assert!(white.contains(&format!(r#"translate(34.5,3.5)" {a_file}"#)));
        assert!(black.contains(&format!(r#"translate(349.5,3.5)" {a_file}"#)));
    }

    #[test]
    fn test_invalid_fen_is_rejected() {
        assert!(board_svg("not a fen").is_err());
    }

    #[test]
    fn test_render_png_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.png");
        render_png(STANDARD_START_FEN, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
