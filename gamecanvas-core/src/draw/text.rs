//! Bitmap font lookup.
//!
//! The font atlas is a fixed table of cells. ASCII and its full-width
//! forms share cells, followed by Japanese punctuation, kana and a handful of
//! symbols. Cell 0 is unused.

/// Cell drawn for characters the atlas doesn't cover.
pub const FALLBACK_GLYPH: u16 = 400;

/// Index of the cell at `first + (c - base)`.
#[allow(clippy::cast_possible_truncation)]
fn offset(c: char, base: char, first: u16) -> u16 {
    // Every range below spans fewer than 100 chars.
    first + (u32::from(c) - u32::from(base)) as u16
}

/// Atlas cell for `c`. `None` for characters that only take up space.
#[must_use]
pub fn glyph_index(c: char) -> Option<u16> {
    let cell = match c {
        '\n' | '\r' | ' ' | '\u{3000}' => return None,
        '!'..='~' => offset(c, '!', 1),
        '！'..='～' => offset(c, '！', 1),
        '、'..='〕' => offset(c, '、', 101),
        '〝' => 122,
        '〟' => 123,
        '〠' => 124,
        'ぁ'..='ゞ' => offset(c, 'ぁ', 125),
        '“' => 221,
        '”' => 222,
        '‘' => 223,
        '’' => 224,
        'ァ'..='ヿ' => offset(c, 'ァ', 225),
        '･' => 315,
        '①'..='⑳' => offset(c, '①', 330),
        '￥' => 325,
        '←'..='↓' => offset(c, '←', 326),
        'Ⅰ'..='Ⅹ' => offset(c, 'Ⅰ', 350),
        '∞' => 360,
        '≪' => 361,
        '≫' => 362,
        '√' => 363,
        '♪' => 364,
        '♭' => 365,
        '♯' => 366,
        '♂' => 367,
        '♀' => 368,
        '℃' => 369,
        '☆' => 370,
        '★' => 371,
        '○' => 372,
        '●' => 373,
        '◎' => 374,
        '◇' => 375,
        '◆' => 376,
        '□' => 377,
        '■' => 378,
        '△' => 379,
        '▲' => 380,
        '▽' => 381,
        '▼' => 382,
        '♠' | '♤' => 383,
        '♣' | '♧' => 384,
        '♥' | '♡' => 385,
        '♦' | '♢' => 386,
        '※' => 387,
        '…' => 388,
        '─' => 389,
        '│' => 390,
        '┌' => 391,
        '┐' => 392,
        '└' => 393,
        '┘' => 394,
        '├' => 395,
        '┤' => 396,
        '┬' => 397,
        '┴' => 398,
        '┼' => 399,
        _ => FALLBACK_GLYPH,
    };
    Some(cell)
}

/// A glyph placed relative to the string's origin.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub cell: u16,
    pub offset: ultraviolet::Vec2,
}

/// Lay out one line. UTF-16 unit `i` sits `i * advance` along x, whether or not
/// it draws anything. Characters outside the Basic Multilingual Plane are two
/// units wide and draw as two fallback glyphs.
pub fn layout_line(text: &str, advance: f32) -> impl Iterator<Item = PlacedGlyph> + '_ {
    text.encode_utf16().enumerate().filter_map(move |(i, unit)| {
        #[allow(clippy::cast_precision_loss)]
        let x = i as f32 * advance;
        // Lone surrogates aren't chars.
        let cell = char::from_u32(u32::from(unit)).map_or(Some(FALLBACK_GLYPH), glyph_index)?;
        Some(PlacedGlyph {
            cell,
            offset: ultraviolet::Vec2::new(x, 0.0),
        })
    })
}

/// Lay out text split on `\n`, each line `line_advance` below the previous.
pub fn layout_lines(
    text: &str,
    advance: f32,
    line_advance: f32,
) -> impl Iterator<Item = PlacedGlyph> + '_ {
    text.split('\n').enumerate().flat_map(move |(row, line)| {
        #[allow(clippy::cast_precision_loss)]
        let y = row as f32 * line_advance;
        layout_line(line, advance).map(move |glyph| PlacedGlyph {
            offset: glyph.offset + ultraviolet::Vec2::new(0.0, y),
            ..glyph
        })
    })
}

#[cfg(test)]
mod test {
    use super::{glyph_index, layout_line, layout_lines, FALLBACK_GLYPH};
    #[test]
    fn ascii() {
        assert_eq!(glyph_index('!'), Some(1));
        assert_eq!(glyph_index('A'), Some(33));
        assert_eq!(glyph_index('~'), Some(94));
    }
    #[test]
    fn full_width_shares_ascii_cells() {
        assert_eq!(glyph_index('Ａ'), glyph_index('A'));
        assert_eq!(glyph_index('～'), Some(94));
    }
    #[test]
    fn japanese() {
        assert_eq!(glyph_index('、'), Some(101));
        assert_eq!(glyph_index('〕'), Some(121));
        assert_eq!(glyph_index('ぁ'), Some(125));
        assert_eq!(glyph_index('あ'), Some(126));
        assert_eq!(glyph_index('ァ'), Some(225));
        // Ideographic zero falls inside the punctuation block.
        assert_eq!(glyph_index('〇'), Some(107));
        assert_eq!(glyph_index('○'), Some(372));
    }
    #[test]
    fn symbols() {
        assert_eq!(glyph_index('①'), Some(330));
        assert_eq!(glyph_index('⑳'), Some(349));
        assert_eq!(glyph_index('￥'), Some(325));
        assert_eq!(glyph_index('↓'), Some(329));
        assert_eq!(glyph_index('Ⅹ'), Some(359));
        assert_eq!(glyph_index('★'), Some(371));
        assert_eq!(glyph_index('♤'), Some(383));
        assert_eq!(glyph_index('┼'), Some(399));
    }
    #[test]
    fn blanks_and_fallback() {
        for blank in ['\n', '\r', ' ', '\u{3000}'] {
            assert_eq!(glyph_index(blank), None);
        }
        assert_eq!(glyph_index('é'), Some(FALLBACK_GLYPH));
        assert_eq!(glyph_index('😀'), Some(FALLBACK_GLYPH));
    }
    #[test]
    fn spaces_consume_advance() {
        let placed: Vec<_> = layout_line("A B", 10.0).collect();
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].offset.x, 0.0);
        assert_eq!(placed[1].offset.x, 20.0);
    }
    #[test]
    fn astral_characters_take_two_cells() {
        let placed: Vec<_> = layout_line("A😀B", 10.0).collect();
        let cells: Vec<_> = placed.iter().map(|g| g.cell).collect();
        assert_eq!(cells, vec![33, FALLBACK_GLYPH, FALLBACK_GLYPH, 34]);
        assert_eq!(placed[3].offset.x, 30.0);
        // Full-width forms are still one unit.
        assert_eq!(layout_line("Ａ!", 10.0).last().map(|g| g.offset.x), Some(10.0));
    }
    #[test]
    fn lines_stack() {
        let placed: Vec<_> = layout_lines("AB\nC", 10.0, 33.0).collect();
        assert_eq!(placed.len(), 3);
        assert_eq!(placed[2].cell, 35);
        assert_eq!(placed[2].offset.x, 0.0);
        assert_eq!(placed[2].offset.y, 33.0);
        assert_eq!(placed[1].offset.y, 0.0);
    }
}
