//! Static font metrics and page geometry for the profile document.
//!
//! Widths are in em units (relative to font size), taken from the standard
//! Helvetica AFM. Only the base-14 Helvetica face is used, so no font program
//! is embedded in the PDF and these tables match what viewers render.
//! ASCII 0x20..=0x7E and Latin-1 0xA0..=0xFF each have a slot table; the
//! handful of WinAnsi extras the PDF writer maps are matched directly.

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Geometry of one document page, in PDF points (1/72 inch).
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub width_pt: f32,
    pub height_pt: f32,
    /// Applied on all four sides.
    pub padding_pt: f32,
    /// Line height as a multiple of font size.
    pub line_height: f32,
}

impl PageConfig {
    pub fn content_width(&self) -> f32 {
        self.width_pt - 2.0 * self.padding_pt
    }

    pub fn content_height(&self) -> f32 {
        self.height_pt - 2.0 * self.padding_pt
    }
}

/// A4 portrait with 30pt padding.
pub fn a4_page_config() -> PageConfig {
    PageConfig {
        width_pt: 595.28,
        height_pt: 841.89,
        padding_pt: 30.0,
        line_height: 1.2,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Character-width table for a font face.
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
    /// PostScript name written into the PDF font dictionary.
    pub base_font: &'static str,
    widths: [f32; 95],
    /// U+00A0..=U+00FF, index = code - 0xA0.
    latin1: [f32; 96],
    /// Width of anything the PDF writer replaces with `?`.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Width of `s` in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        match c {
            ' '..='~' => self.widths[code - 32],
            '\u{A0}'..='\u{FF}' => self.latin1[code - 0xA0],
            '\t' => self.space_width,
            '‚' | '‘' | '’' => 0.222,
            '„' | '“' | '”' => 0.333,
            '•' => 0.350,
            '€' | '–' => 0.556,
            '…' | '—' | '™' => 1.000,
            _ => self.average_char_width,
        }
    }

    /// Width of `s` in points at `size_pt`.
    pub fn width_pt(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_str(s) * size_pt
    }
}

/// Helvetica (regular), from the Adobe core font AFM.
pub static HELVETICA: FontMetricTable = FontMetricTable {
    base_font: "Helvetica",
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    #[rustfmt::skip]
    latin1: [
        // nbsp   ¡      ¢      £      ¤      ¥      ¦      §      ¨      ©      ª      «      ¬      shy    ®      ¯
        0.278, 0.333, 0.556, 0.556, 0.556, 0.556, 0.260, 0.556, 0.333, 0.737, 0.370, 0.556, 0.584, 0.333, 0.737, 0.333,
        // °      ±      ²      ³      ´      µ      ¶      ·      ¸      ¹      º      »      ¼      ½      ¾      ¿
        0.400, 0.584, 0.333, 0.333, 0.333, 0.556, 0.537, 0.278, 0.333, 0.333, 0.365, 0.556, 0.834, 0.834, 0.834, 0.611,
        // À      Á      Â      Ã      Ä      Å      Æ      Ç      È      É      Ê      Ë      Ì      Í      Î      Ï
        0.667, 0.667, 0.667, 0.667, 0.667, 0.667, 1.000, 0.722, 0.667, 0.667, 0.667, 0.667, 0.278, 0.278, 0.278, 0.278,
        // Ð      Ñ      Ò      Ó      Ô      Õ      Ö      ×      Ø      Ù      Ú      Û      Ü      Ý      Þ      ß
        0.722, 0.722, 0.778, 0.778, 0.778, 0.778, 0.778, 0.584, 0.778, 0.722, 0.722, 0.722, 0.722, 0.667, 0.667, 0.611,
        // à      á      â      ã      ä      å      æ      ç      è      é      ê      ë      ì      í      î      ï
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.889, 0.500, 0.556, 0.556, 0.556, 0.556, 0.278, 0.278, 0.278, 0.278,
        // ð      ñ      ò      ó      ô      õ      ö      ÷      ø      ù      ú      û      ü      ý      þ      ÿ
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.584, 0.611, 0.556, 0.556, 0.556, 0.556, 0.500, 0.556, 0.500,
    ],
    average_char_width: 0.556,
    space_width: 0.278,
};
