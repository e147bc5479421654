pub(crate) const GLYPH_WIDTH: i32 = 3;
pub(crate) const GLYPH_HEIGHT: i32 = 5;
/// Horizontal distance between consecutive characters.
pub(crate) const GLYPH_ADVANCE: i32 = GLYPH_WIDTH + 1;
pub(crate) const LINE_ADVANCE: i32 = GLYPH_HEIGHT + 1;

const FIRST_PRINTABLE: u32 = ' ' as u32;
const LAST_PRINTABLE: u32 = '~' as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Glyph {
    pub(crate) rows: [u8; GLYPH_HEIGHT as usize],
}

pub(crate) const BLANK_GLYPH: Glyph = Glyph {
    rows: [0, 0, 0, 0, 0],
};

// Printable ASCII, ' ' through '~'. Each row is three bits, MSB on the left.
const ASCII_GLYPH_ROWS: [[u8; GLYPH_HEIGHT as usize]; 95] = [
    [0b000, 0b000, 0b000, 0b000, 0b000], // ' '
    [0b010, 0b010, 0b010, 0b000, 0b010], // '!'
    [0b101, 0b101, 0b000, 0b000, 0b000], // '"'
    [0b101, 0b111, 0b101, 0b111, 0b101], // '#'
    [0b111, 0b110, 0b111, 0b011, 0b111], // '$'
    [0b101, 0b001, 0b010, 0b100, 0b101], // '%'
    [0b010, 0b101, 0b010, 0b101, 0b011], // '&'
    [0b010, 0b010, 0b000, 0b000, 0b000], // '\''
    [0b001, 0b010, 0b010, 0b010, 0b001], // '('
    [0b100, 0b010, 0b010, 0b010, 0b100], // ')'
    [0b000, 0b101, 0b010, 0b101, 0b000], // '*'
    [0b000, 0b010, 0b111, 0b010, 0b000], // '+'
    [0b000, 0b000, 0b000, 0b010, 0b100], // ','
    [0b000, 0b000, 0b111, 0b000, 0b000], // '-'
    [0b000, 0b000, 0b000, 0b000, 0b010], // '.'
    [0b001, 0b001, 0b010, 0b100, 0b100], // '/'
    [0b111, 0b101, 0b101, 0b101, 0b111], // '0'
    [0b010, 0b110, 0b010, 0b010, 0b111], // '1'
    [0b111, 0b001, 0b111, 0b100, 0b111], // '2'
    [0b111, 0b001, 0b111, 0b001, 0b111], // '3'
    [0b101, 0b101, 0b111, 0b001, 0b001], // '4'
    [0b111, 0b100, 0b111, 0b001, 0b111], // '5'
    [0b111, 0b100, 0b111, 0b101, 0b111], // '6'
    [0b111, 0b001, 0b010, 0b010, 0b010], // '7'
    [0b111, 0b101, 0b111, 0b101, 0b111], // '8'
    [0b111, 0b101, 0b111, 0b001, 0b111], // '9'
    [0b000, 0b010, 0b000, 0b010, 0b000], // ':'
    [0b000, 0b010, 0b000, 0b010, 0b100], // ';'
    [0b001, 0b010, 0b100, 0b010, 0b001], // '<'
    [0b000, 0b111, 0b000, 0b111, 0b000], // '='
    [0b100, 0b010, 0b001, 0b010, 0b100], // '>'
    [0b111, 0b001, 0b011, 0b000, 0b010], // '?'
    [0b111, 0b101, 0b111, 0b100, 0b111], // '@'
    [0b010, 0b101, 0b111, 0b101, 0b101], // 'A'
    [0b110, 0b101, 0b110, 0b101, 0b110], // 'B'
    [0b111, 0b100, 0b100, 0b100, 0b111], // 'C'
    [0b110, 0b101, 0b101, 0b101, 0b110], // 'D'
    [0b111, 0b100, 0b110, 0b100, 0b111], // 'E'
    [0b111, 0b100, 0b110, 0b100, 0b100], // 'F'
    [0b111, 0b100, 0b101, 0b101, 0b111], // 'G'
    [0b101, 0b101, 0b111, 0b101, 0b101], // 'H'
    [0b111, 0b010, 0b010, 0b010, 0b111], // 'I'
    [0b111, 0b001, 0b001, 0b101, 0b111], // 'J'
    [0b101, 0b101, 0b110, 0b101, 0b101], // 'K'
    [0b100, 0b100, 0b100, 0b100, 0b111], // 'L'
    [0b101, 0b111, 0b111, 0b101, 0b101], // 'M'
    [0b101, 0b111, 0b111, 0b111, 0b101], // 'N'
    [0b111, 0b101, 0b101, 0b101, 0b111], // 'O'
    [0b110, 0b101, 0b110, 0b100, 0b100], // 'P'
    [0b111, 0b101, 0b101, 0b111, 0b001], // 'Q'
    [0b110, 0b101, 0b110, 0b101, 0b101], // 'R'
    [0b111, 0b100, 0b111, 0b001, 0b111], // 'S'
    [0b111, 0b010, 0b010, 0b010, 0b010], // 'T'
    [0b101, 0b101, 0b101, 0b101, 0b111], // 'U'
    [0b101, 0b101, 0b101, 0b101, 0b010], // 'V'
    [0b101, 0b101, 0b111, 0b111, 0b101], // 'W'
    [0b101, 0b101, 0b010, 0b101, 0b101], // 'X'
    [0b101, 0b101, 0b010, 0b010, 0b010], // 'Y'
    [0b111, 0b001, 0b010, 0b100, 0b111], // 'Z'
    [0b110, 0b100, 0b100, 0b100, 0b110], // '['
    [0b100, 0b100, 0b010, 0b001, 0b001], // '\\'
    [0b011, 0b001, 0b001, 0b001, 0b011], // ']'
    [0b010, 0b101, 0b000, 0b000, 0b000], // '^'
    [0b000, 0b000, 0b000, 0b000, 0b111], // '_'
    [0b100, 0b010, 0b000, 0b000, 0b000], // '`'
    [0b000, 0b111, 0b001, 0b111, 0b111], // 'a'
    [0b100, 0b100, 0b110, 0b101, 0b110], // 'b'
    [0b000, 0b111, 0b100, 0b100, 0b111], // 'c'
    [0b001, 0b001, 0b111, 0b101, 0b111], // 'd'
    [0b000, 0b111, 0b110, 0b100, 0b111], // 'e'
    [0b011, 0b100, 0b110, 0b100, 0b100], // 'f'
    [0b000, 0b111, 0b101, 0b111, 0b001], // 'g'
    [0b100, 0b100, 0b110, 0b101, 0b101], // 'h'
    [0b010, 0b000, 0b010, 0b010, 0b010], // 'i'
    [0b001, 0b000, 0b001, 0b101, 0b010], // 'j'
    [0b100, 0b101, 0b110, 0b101, 0b101], // 'k'
    [0b100, 0b100, 0b100, 0b100, 0b111], // 'l'
    [0b000, 0b110, 0b111, 0b101, 0b101], // 'm'
    [0b000, 0b110, 0b101, 0b101, 0b101], // 'n'
    [0b000, 0b111, 0b101, 0b101, 0b111], // 'o'
    [0b000, 0b110, 0b101, 0b110, 0b100], // 'p'
    [0b000, 0b111, 0b101, 0b111, 0b001], // 'q'
    [0b000, 0b110, 0b101, 0b100, 0b100], // 'r'
    [0b000, 0b111, 0b110, 0b001, 0b111], // 's'
    [0b010, 0b111, 0b010, 0b010, 0b011], // 't'
    [0b000, 0b101, 0b101, 0b101, 0b111], // 'u'
    [0b000, 0b101, 0b101, 0b101, 0b010], // 'v'
    [0b000, 0b101, 0b101, 0b111, 0b010], // 'w'
    [0b000, 0b101, 0b010, 0b010, 0b101], // 'x'
    [0b000, 0b101, 0b101, 0b111, 0b001], // 'y'
    [0b000, 0b111, 0b001, 0b010, 0b111], // 'z'
    [0b011, 0b010, 0b110, 0b010, 0b011], // '{'
    [0b010, 0b010, 0b010, 0b010, 0b010], // '|'
    [0b110, 0b010, 0b011, 0b010, 0b110], // '}'
    [0b000, 0b011, 0b110, 0b000, 0b000], // '~'
];

/// Looks up the glyph for `ch`. Accented Latin letters fall back to their
/// base letter; anything else outside printable ASCII has no glyph.
pub(crate) fn glyph_for(ch: char) -> Option<Glyph> {
    let code = strip_accent(ch) as u32;
    if !(FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&code) {
        return None;
    }
    let rows = ASCII_GLYPH_ROWS[(code - FIRST_PRINTABLE) as usize];
    Some(Glyph { rows })
}

fn strip_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_lookup_covers_ascii_printable_range() {
        for code in 32u8..=126u8 {
            let ch = char::from(code);
            assert!(
                glyph_for(ch).is_some(),
                "missing glyph for ASCII code {code} ('{ch}')"
            );
        }
    }

    #[test]
    fn space_is_blank() {
        assert_eq!(glyph_for(' '), Some(BLANK_GLYPH));
    }

    #[test]
    fn accented_letters_use_base_glyph() {
        assert_eq!(glyph_for('ê'), glyph_for('e'));
        assert_eq!(glyph_for('ç'), glyph_for('c'));
        assert_eq!(glyph_for('ã'), glyph_for('a'));
    }

    #[test]
    fn control_and_symbol_characters_have_no_glyph() {
        assert!(glyph_for('\u{7f}').is_none());
        assert!(glyph_for('\n').is_none());
        assert!(glyph_for('\u{1f642}').is_none());
    }
}
