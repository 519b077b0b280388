//! Software raster graphics
//!
//! Everything happens on the CPU in a plain RGBA byte buffer:
//!
//!    bmp = Bitmap::new(w, h)          -- pixels, pen, clip, font
//!    bmp.set_color(..)                -- pen used by every primitive
//!    bmp.line / circle / fill / ..    -- scan conversion, clipped
//!    dst.blit(.., &src, ..)           -- copying between bitmaps
//!    src.resample_blin(w, h)          -- new, rescaled bitmap
//!    Bitmap::load(..) / bmp.save(..)  -- BMP, PCX, PNG, JPEG
//!
//! A small example
//!
//!     use bitmap::Bitmap;
//!
//!     let mut bmp = Bitmap::new(10, 10);
//!     bmp.set_color(0xFF0000);
//!     bmp.fillrect(2, 2, 7, 7);
//!     assert_eq!(bmp.get_rgba(4, 4), 0xFFFF0000);
//!     assert_eq!(bmp.get(0, 0), 0x000000);
//!

pub mod bitmap;
pub mod blit;
pub mod bmp;
pub mod buffer;
pub mod clip;
pub mod codec;
pub mod color;
pub mod color_names;
pub mod error;
pub mod fill;
pub mod font;
pub mod glyphs;
pub mod imagecodec;
pub mod palette;
pub mod pcx;
pub mod raster;
pub mod resample;

pub use crate::bitmap::*;
pub use crate::buffer::*;
pub use crate::clip::*;
pub use crate::codec::*;
pub use crate::color::*;
pub use crate::error::*;
pub use crate::font::*;

/// Text drawing capability attached to a [Bitmap]
///
/// Dropping the font releases whatever it holds.
///
/// [Bitmap]: bitmap/struct.Bitmap.html
pub trait Font {
    /// Draw `text` with its top left corner at (x,y) using the bitmap pen
    fn puts(&self, bmp: &mut Bitmap<'_>, x: i32, y: i32, text: &str) -> bool;
    /// Horizontal advance of one glyph
    fn width(&self) -> i32;
    /// Height of one line
    fn height(&self) -> i32;

    /// Widest extent `puts` reaches on any line of `text`
    ///
    /// A tab advances four glyphs and a carriage return goes back to the
    /// start of the line.
    ///
    ///     use bitmap::{Font,XbmFont};
    ///
    ///     let f = XbmFont::default();
    ///     assert_eq!(f.text_width("ab\nabc"), 24);
    ///     assert_eq!(f.text_width("\tx"), 40);
    ///     assert_eq!(f.text_width("abc\rd"), 24);
    ///
    fn text_width(&self, text: &str) -> i32 {
        let (mut col, mut widest) = (0, 0);
        for c in text.bytes() {
            match c {
                b'\n' | b'\r' => col = 0,
                b'\t' => col += 4,
                font::FIRST_CHAR ..= font::LAST_CHAR => col += 1,
                _ => {}
            }
            widest = widest.max(col);
        }
        widest * self.width()
    }
    /// Number of lines in `text` times the line height
    ///
    ///     use bitmap::{Font,XbmFont};
    ///
    ///     let f = XbmFont::default();
    ///     assert_eq!(f.text_height("one"), 8);
    ///     assert_eq!(f.text_height("one\ntwo\n"), 24);
    ///
    fn text_height(&self, text: &str) -> i32 {
        (text.matches('\n').count() as i32 + 1) * self.height()
    }
}
