//! Static font-metric tables for the two PDF base fonts the table renderer uses.
//!
//! Widths come from the Adobe Helvetica / Helvetica-Bold AFM files and are stored in
//! thousandths of an em, exactly as the AFM lists them. The tables cover ASCII
//! 0x20..=0x7E (95 printable characters); anything else measures as the face's
//! average glyph width. Index = (char as usize) - 32.

// ────────────────────────────────────────────────────────────────────────────
// Font faces
// ────────────────────────────────────────────────────────────────────────────

/// The two standard-14 faces used in the document. Neither needs embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    /// Body cells.
    Helvetica,
    /// Header band.
    HelveticaBold,
}

impl FontFace {
    /// PDF `/BaseFont` name.
    pub fn base_font(self) -> &'static [u8] {
        match self {
            FontFace::Helvetica => b"Helvetica",
            FontFace::HelveticaBold => b"Helvetica-Bold",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Text styles
// ────────────────────────────────────────────────────────────────────────────

/// Face, size and line advance for one kind of cell text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size_pt: f32,
    pub leading_pt: f32,
}

impl TextStyle {
    /// Rendered width of `s` in points at this style's size.
    pub fn width_of(&self, s: &str) -> f32 {
        get_metrics(self.face).measure_str(s) * self.size_pt
    }
}

/// Header row: Helvetica-Bold 8pt on 10pt leading.
pub const HEADER_STYLE: TextStyle = TextStyle {
    face: FontFace::HelveticaBold,
    size_pt: 8.0,
    leading_pt: 10.0,
};

/// Body rows: Helvetica 7pt on 9pt leading.
pub const BODY_STYLE: TextStyle = TextStyle {
    face: FontFace::Helvetica,
    size_pt: 7.0,
    leading_pt: 9.0,
};

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font face.
///
/// `widths[i]` = AFM width of ASCII character `(i + 32)` in 1/1000 em.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [u16; 95],
    /// Fallback width for characters outside printable ASCII.
    pub average_char_width: u16,
}

impl FontMetricTable {
    /// Width of a single character in 1/1000 em.
    pub fn char_width(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        }
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        let thousandths: u32 = s.chars().map(|c| u32::from(self.char_width(c))).sum();
        thousandths as f32 / 1000.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        278,  278,  355,  556,  556,  889,  667,  191,  333,  333,  389,  584,  278,  333,  278,  278,
        // 0     1     2     3     4     5     6     7     8     9
        556,  556,  556,  556,  556,  556,  556,  556,  556,  556,
        // :     ;     <     =     >     ?     @
        278,  278,  584,  584,  584,  556, 1015,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        667,  667,  722,  722,  667,  611,  778,  722,  278,  500,  667,  556,  833,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        722,  778,  667,  778,  722,  667,  611,  722,  667,  944,  667,  667,  611,
        // [     \     ]     ^     _     `
        278,  278,  278,  469,  556,  333,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        556,  556,  500,  556,  556,  278,  556,  556,  222,  222,  500,  222,  833,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        556,  556,  556,  556,  333,  500,  278,  556,  500,  722,  500,  500,  500,
        // {     |     }     ~
        334,  260,  334,  584,
    ],
    average_char_width: 556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp    !     "     #     $     %     &     '     (     )     *     +     ,     -     .     /
        278,  333,  474,  556,  556,  889,  722,  238,  333,  333,  389,  584,  278,  333,  278,  278,
        // 0     1     2     3     4     5     6     7     8     9
        556,  556,  556,  556,  556,  556,  556,  556,  556,  556,
        // :     ;     <     =     >     ?     @
        333,  333,  584,  584,  584,  611,  975,
        // A     B     C     D     E     F     G     H     I     J     K     L     M
        722,  722,  722,  722,  667,  611,  778,  722,  278,  556,  722,  611,  833,
        // N     O     P     Q     R     S     T     U     V     W     X     Y     Z
        722,  778,  667,  778,  722,  667,  611,  722,  667,  944,  667,  667,  611,
        // [     \     ]     ^     _     `
        333,  278,  333,  584,  556,  333,
        // a     b     c     d     e     f     g     h     i     j     k     l     m
        556,  611,  556,  611,  556,  333,  611,  611,  278,  278,  556,  278,  889,
        // n     o     p     q     r     s     t     u     v     w     x     y     z
        611,  611,  611,  611,  389,  556,  333,  611,  556,  778,  556,  556,  500,
        // {     |     }     ~
        389,  280,  389,  584,
    ],
    average_char_width: 611,
};

/// Returns the static metric table for a given face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Helvetica => &HELVETICA_TABLE,
        FontFace::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
