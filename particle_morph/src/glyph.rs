//! Built-in 5×7 bitmap font.
//!
//! Used both to rasterize text shapes for the particle field and to draw HUD
//! labels. ASCII letters are case-folded to capitals; full-width forms
//! (`，`, `！`, …) fold to their ASCII equivalents.

/// Rows per glyph.
pub const GLYPH_H: usize = 7;
/// Width of a regular glyph; wider glyphs carry their own width.
pub const GLYPH_W: usize = 5;

/// One glyph. Bit `width - 1 - col` of `rows[row]` is set when the
/// cell at (`col`, `row`) is lit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub width: usize,
    pub rows:  [u8; GLYPH_H],
}

impl Glyph {
    const fn narrow(rows: [u8; GLYPH_H]) -> Self {
        Glyph { width: GLYPH_W, rows }
    }

    pub fn is_set(&self, col: usize, row: usize) -> bool {
        col < self.width && row < GLYPH_H && self.rows[row] & (1 << (self.width - 1 - col)) != 0
    }

    pub fn is_blank(&self) -> bool {
        self.rows.iter().all(|&r| r == 0)
    }
}

/// Look up the glyph for `c`, or `None` if the font has no such character.
pub fn glyph(c: char) -> Option<Glyph> {
    let c = fold(c);
    let rows = match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ' ' => [0; GLYPH_H],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        '\'' => [0b00100, 0b00100, 0b01000, 0b00000, 0b00000, 0b00000, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        ':' => [0b00000, 0b01100, 0b01100, 0b00000, 0b01100, 0b01100, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '=' => [0b00000, 0b00000, 0b11111, 0b00000, 0b11111, 0b00000, 0b00000],
        '/' => [0b00001, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '♥' => {
            return Some(Glyph {
                width: 7,
                rows:  [0b0110110, 0b1111111, 0b1111111, 0b1111111, 0b0111110, 0b0011100, 0b0001000],
            });
        }
        _ => return None,
    };
    Some(Glyph::narrow(rows))
}

/// Glyph used for layout when `c` has none: same advance as a space.
pub fn glyph_or_blank(c: char) -> Glyph {
    glyph(c).unwrap_or(Glyph::narrow([0; GLYPH_H]))
}

/// Width of `text` in font cells, including one blank column between glyphs.
pub fn text_cells(text: &str) -> usize {
    let widths: usize = text.chars().map(|c| glyph_or_blank(c).width + 1).sum();
    widths.saturating_sub(1)
}

fn fold(c: char) -> char {
    match c {
        // Full-width ASCII block.
        '\u{FF01}'..='\u{FF5E}' => {
            char::from_u32(c as u32 - 0xFF01 + 0x21).unwrap_or(c).to_ascii_uppercase()
        }
        '\u{3000}' => ' ',
        '♡' | '❤' => '♥',
        _ => c.to_ascii_uppercase(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_digits_present() {
        for c in ('A'..='Z').chain('0'..='9') {
            let g = glyph(c).unwrap_or_else(|| panic!("missing {}", c));
            assert!(!g.is_blank(), "{} is blank", c);
        }
    }

    #[test]
    fn lowercase_folds() {
        assert_eq!(glyph('a'), glyph('A'));
        assert_eq!(glyph('z'), glyph('Z'));
    }

    #[test]
    fn full_width_folds() {
        assert_eq!(glyph('！'), glyph('!'));
        assert_eq!(glyph('，'), glyph(','));
        assert_eq!(glyph('Ａ'), glyph('A'));
    }

    #[test]
    fn heart_is_wide() {
        let g = glyph('♥').unwrap();
        assert_eq!(g.width, 7);
        assert!(g.is_set(3, 6));
        assert!(!g.is_set(0, 6));
    }

    #[test]
    fn unsupported_is_none() {
        assert!(glyph('我').is_none());
        assert!(glyph_or_blank('我').is_blank());
    }

    #[test]
    fn rows_fit_width() {
        for c in ('A'..='Z').chain('0'..='9').chain("!?.,'-:+=/()".chars()) {
            let g = glyph(c).unwrap();
            for r in g.rows {
                assert!((r as usize) < (1 << g.width), "{} row overflows", c);
            }
        }
    }

    #[test]
    fn text_cells_counts_gaps() {
        assert_eq!(text_cells(""), 0);
        assert_eq!(text_cells("A"), 5);
        assert_eq!(text_cells("AB"), 11);
        assert_eq!(text_cells("♥"), 7);
    }
}
