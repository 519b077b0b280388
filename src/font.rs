//! Bitmap fonts
//!
//! [XbmFont] draws fixed 8x8 glyphs from a sprite sheet held in XBM layout:
//! sixteen glyphs per sheet row, one bit per pixel, least significant bit
//! leftmost. As in the XBM sources the sheet stores ink as a cleared bit and
//! background as a set bit.
//!
//! [XbmFont]: struct.XbmFont.html

use crate::bitmap::Bitmap;
use crate::glyphs::GLYPHS;
use crate::Font;

/// Glyph width and height in pixels
pub const GLYPH_SIZE: i32 = 8;

const SHEET_COLS: usize = 16;
const SHEET_STRIDE: usize = SHEET_COLS;
pub(crate) const FIRST_CHAR: u8 = 32;
pub(crate) const LAST_CHAR: u8 = 127;

/// Built-in glyph sets
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
    Underline,
    Inverse,
    Thin,
    Shadow,
}

impl FontStyle {
    /// Every built-in style
    pub const ALL: [FontStyle; 7] = [
        FontStyle::Normal, FontStyle::Bold, FontStyle::Italic,
        FontStyle::Underline, FontStyle::Inverse, FontStyle::Thin,
        FontStyle::Shadow,
    ];
    fn apply(self, g: &[u8; 8]) -> [u8; 8] {
        let mut out = *g;
        for (y, row) in out.iter_mut().enumerate() {
            let r = g[y];
            *row = match self {
                FontStyle::Normal    => r,
                FontStyle::Bold      => r | (r << 1),
                FontStyle::Italic    => r << ((7 - y) / 3),
                FontStyle::Underline => if y == 7 { 0xFF } else { r },
                FontStyle::Inverse   => !r,
                FontStyle::Thin      => r & !(r << 1),
                FontStyle::Shadow    => r | if y > 0 { g[y-1] << 1 } else { 0 },
            };
        }
        out
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        FontStyle::Normal
    }
}

/// Fixed width 8x8 font
#[derive(Debug,Clone)]
pub struct XbmFont {
    style: FontStyle,
    sheet: Box<[u8]>,
}

impl Default for XbmFont {
    fn default() -> Self {
        Self::new(FontStyle::Normal)
    }
}

impl XbmFont {
    /// Build the sprite sheet for `style`
    pub fn new(style: FontStyle) -> Self {
        let rows = GLYPHS.len() / SHEET_COLS;
        let mut sheet = vec![0xFFu8; rows * 8 * SHEET_STRIDE];
        for (i, glyph) in GLYPHS.iter().enumerate() {
            let (col, row) = (i % SHEET_COLS, i / SHEET_COLS);
            for (y, bits) in style.apply(glyph).iter().enumerate() {
                sheet[(row * 8 + y) * SHEET_STRIDE + col] = !bits;
            }
        }
        XbmFont { style, sheet: sheet.into_boxed_slice() }
    }
    /// Glyph set in use
    pub fn style(&self) -> FontStyle {
        self.style
    }
    /// True if pixel (`gx`,`gy`) of the glyph for `c` is ink
    pub fn is_ink(&self, c: u8, gx: i32, gy: i32) -> bool {
        if !(FIRST_CHAR ..= LAST_CHAR).contains(&c) || !(0 .. 8).contains(&gx) || !(0 .. 8).contains(&gy) {
            return false;
        }
        let i = usize::from(c - FIRST_CHAR);
        let (col, row) = (i % SHEET_COLS, i / SHEET_COLS);
        let byte = self.sheet[(row * 8 + gy as usize) * SHEET_STRIDE + col];
        byte & (1 << gx) == 0
    }
    fn putc(&self, bmp: &mut Bitmap<'_>, x: i32, y: i32, c: u8) {
        for gy in 0 .. GLYPH_SIZE {
            for gx in 0 .. GLYPH_SIZE {
                if self.is_ink(c, gx, gy) {
                    bmp.putpixel(x + gx, y + gy);
                }
            }
        }
    }
}

impl Font for XbmFont {
    fn puts(&self, bmp: &mut Bitmap<'_>, x: i32, y: i32, text: &str) -> bool {
        let xs = x;
        let (mut x, mut y) = (x, y);
        for c in text.bytes() {
            match c {
                b'\n' => {
                    x = xs;
                    y += GLYPH_SIZE;
                }
                b'\t' => x += 4 * GLYPH_SIZE,
                b'\r' => x = xs,
                FIRST_CHAR ..= LAST_CHAR => {
                    self.putc(bmp, x, y, c);
                    x += GLYPH_SIZE;
                }
                _ => {}
            }
            if y > bmp.height() {
                break;
            }
        }
        true
    }
    fn width(&self) -> i32 {
        GLYPH_SIZE
    }
    fn height(&self) -> i32 {
        GLYPH_SIZE
    }
}

impl<'a> Bitmap<'a> {
    /// Replace the font; the previous one is dropped
    pub fn set_font(&mut self, font: Box<dyn Font>) {
        self.font = Some(font);
    }
    /// Go back to the default font
    pub fn reset_font(&mut self) {
        self.set_font(Box::new(XbmFont::default()));
    }
    /// Font in use, if any
    pub fn font(&self) -> Option<&dyn Font> {
        self.font.as_deref()
    }
    /// Detach the font from the bitmap
    pub fn take_font(&mut self) -> Option<Box<dyn Font>> {
        self.font.take()
    }
    /// Draw `text` at (x,y) with the pen
    ///
    /// Returns false if no font is attached
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let mut b = Bitmap::new(32, 16);
    ///     b.set_color(0xFF0000);
    ///     assert!(b.puts(0, 0, "Hi"));
    ///     assert!(b.take_font().is_some());
    ///     assert!(!b.puts(0, 0, "Hi"));
    ///
    pub fn puts(&mut self, x: i32, y: i32, text: &str) -> bool {
        match self.font.take() {
            Some(font) => {
                let ok = font.puts(self, x, y, text);
                if self.font.is_none() {
                    self.font = Some(font);
                }
                ok
            }
            None => false,
        }
    }
    /// Width in pixels `text` would occupy with the current font
    pub fn text_width(&self, text: &str) -> i32 {
        self.font().map_or(0, |f| f.text_width(text))
    }
    /// Height in pixels `text` would occupy with the current font
    pub fn text_height(&self, text: &str) -> i32 {
        self.font().map_or(0, |f| f.text_height(text))
    }
}
