//! Bitmap
//!
//! A [Bitmap] is a fixed size RGBA image together with the drawing state read
//! by every primitive: the pen color, the clip rectangle and the font.
//!
//! Coordinates are `i32`; `(0,0)` is the top left pixel. Accessors that take
//! a coordinate but no clip ([get], [set], [pixel], ...) panic when the
//! coordinate lies outside the bitmap, callers are expected to bounds check.
//! [try_get] is the checked variant and [putpixel] silently ignores anything
//! outside the clip rectangle.
//!
//! [Bitmap]: struct.Bitmap.html
//! [get]: struct.Bitmap.html#method.get
//! [set]: struct.Bitmap.html#method.set
//! [pixel]: struct.Bitmap.html#method.pixel
//! [try_get]: struct.Bitmap.html#method.try_get
//! [putpixel]: struct.Bitmap.html#method.putpixel

use std::fmt;

use crate::buffer::RenderingBuffer;
use crate::buffer::BPP;
use crate::clip::Rectangle;
use crate::color::Rgba8;
use crate::font::XbmFont;
use crate::Font;

/// RGBA image with pen, clip rectangle and font
///
/// `Bitmap<'static>` owns its pixels; a bitmap made with [bind] borrows
/// them from the caller for `'a`.
///
/// [bind]: #method.bind
pub struct Bitmap<'a> {
    pub(crate) rbuf: RenderingBuffer<'a>,
    pub(crate) w: i32,
    pub(crate) h: i32,
    pub(crate) pen: Rgba8,
    pub(crate) clip: Rectangle,
    pub(crate) font: Option<Box<dyn Font>>,
}

impl fmt::Debug for Bitmap<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("w", &self.w)
            .field("h", &self.h)
            .field("pen", &self.pen)
            .field("clip", &self.clip)
            .field("bound", &self.rbuf.is_bound())
            .field("font", &self.font.is_some())
            .finish()
    }
}

fn check_dims(w: i32, h: i32) -> (usize, usize) {
    assert!(w >= 0 && h >= 0, "invalid bitmap size {}x{}", w, h);
    (w as usize, h as usize)
}

impl Bitmap<'static> {
    /// Create a zero-filled (transparent black) bitmap of `w` x `h` pixels
    ///
    /// The pen is opaque white, the clip covers the whole bitmap and the
    /// default font is attached.
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let b = Bitmap::new(10, 10);
    ///     assert_eq!(b.width(), 10);
    ///     assert_eq!(b.get_rgba(0,0), 0);
    ///     assert_eq!(b.color(), 0xFFFFFF);
    ///
    /// # Panics
    ///
    /// If either dimension is negative
    pub fn new(w: i32, h: i32) -> Self {
        let (uw, uh) = check_dims(w, h);
        Self::with_buffer(RenderingBuffer::new(uw, uh), w, h)
    }
    /// Take ownership of an RGBA byte vector of exactly `w * h * 4` bytes
    pub fn from_rgba(w: i32, h: i32, data: Vec<u8>) -> Option<Self> {
        if w < 0 || h < 0 {
            return None;
        }
        let rbuf = RenderingBuffer::from_vec(w as usize, h as usize, data)?;
        Some(Self::with_buffer(rbuf, w, h))
    }
}

impl<'a> Bitmap<'a> {
    fn with_buffer(rbuf: RenderingBuffer<'a>, w: i32, h: i32) -> Self {
        Bitmap {
            rbuf, w, h,
            pen: Rgba8::white(),
            clip: Rectangle::full(w, h),
            font: Some(Box::new(XbmFont::default())),
        }
    }
    /// Wrap caller owned RGBA memory
    ///
    /// The memory is never freed by the bitmap; dropping the bitmap (or
    /// calling [unbind]) only drops its font.
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let mut mem = vec![0u8; 2 * 2 * 4];
    ///     let mut b = Bitmap::bind(2, 2, &mut mem);
    ///     b.set(1, 1, 0x102030);
    ///     b.unbind();
    ///     assert_eq!(&mem[12..], &[0x10, 0x20, 0x30, 0xFF]);
    ///
    /// # Panics
    ///
    /// If `data` is shorter than `w * h * 4` bytes or a dimension is negative
    ///
    /// [unbind]: #method.unbind
    pub fn bind(w: i32, h: i32, data: &'a mut [u8]) -> Self {
        let (uw, uh) = check_dims(w, h);
        Self::with_buffer(RenderingBuffer::bind(uw, uh, data), w, h)
    }
    /// Release a bound bitmap, handing the memory back to the caller
    ///
    /// The font is dropped, the pixel memory is left alone
    pub fn unbind(self) {
        drop(self)
    }
    /// True if the pixel memory belongs to the caller
    pub fn is_bound(&self) -> bool {
        self.rbuf.is_bound()
    }
    /// Deep copy of pixels, pen and clip rectangle
    ///
    /// The font is not carried over; the copy starts out with its own
    /// default font so no font is ever owned twice.
    pub fn copy(&self) -> Bitmap<'static> {
        let mut out = Bitmap::with_buffer(self.rbuf.to_owned_buffer(), self.w, self.h);
        out.pen = self.pen;
        out.clip = self.clip;
        out
    }
    /// Width in pixels
    pub fn width(&self) -> i32 {
        self.w
    }
    /// Height in pixels
    pub fn height(&self) -> i32 {
        self.h
    }
    /// Raw RGBA bytes, row-major from the top row
    pub fn data(&self) -> &[u8] {
        self.rbuf.as_slice()
    }
    /// Raw RGBA bytes, mutable
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.rbuf.as_mut_slice()
    }
    /// Underlying Rendering Buffer
    pub fn buffer(&self) -> &RenderingBuffer<'a> {
        &self.rbuf
    }

    /// Current pen
    pub fn pen(&self) -> Rgba8 {
        self.pen
    }
    /// Replace the pen, including its alpha
    pub fn set_pen(&mut self, pen: Rgba8) {
        self.pen = pen;
    }
    /// Set the pen color from `0xRRGGBB`; the pen alpha is kept
    pub fn set_color(&mut self, c: u32) {
        let a = self.pen.a;
        self.pen = Rgba8::from_rgb(c);
        self.pen.a = a;
    }
    /// Set the pen color from components; the pen alpha is kept
    pub fn set_color_rgb(&mut self, r: u8, g: u8, b: u8) {
        self.pen.r = r;
        self.pen.g = g;
        self.pen.b = b;
    }
    /// Set the pen alpha
    pub fn set_alpha(&mut self, a: u8) {
        self.pen.a = a;
    }
    /// Pen color as `0xRRGGBB`
    pub fn color(&self) -> u32 {
        self.pen.to_rgb()
    }
    /// Pen alpha
    pub fn alpha(&self) -> u8 {
        self.pen.a
    }

    /// Restrict drawing to `[x0,x1) x [y0,y1)`
    ///
    /// Corners may come in any order; the result is clamped to the bitmap
    pub fn clip(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.clip = Rectangle::normalized(x0, y0, x1, y1, self.w, self.h);
    }
    /// Allow drawing on the whole bitmap again
    pub fn unclip(&mut self) {
        self.clip = Rectangle::full(self.w, self.h);
    }
    /// Active clip rectangle
    pub fn clip_rect(&self) -> Rectangle {
        self.clip
    }

    /// True if (x,y) is a pixel of the bitmap
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.w && y < self.h
    }
    #[inline]
    fn index(&self, x: i32, y: i32) -> (usize, usize) {
        assert!(self.in_bounds(x, y), "pixel ({},{}) outside {}x{} bitmap", x, y, self.w, self.h);
        (x as usize, y as usize)
    }
    /// Pixel at (x,y)
    ///
    /// # Panics
    ///
    /// If (x,y) is outside the bitmap
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Rgba8 {
        Rgba8::from_slice(&self.rbuf[self.index(x, y)])
    }
    /// Pixel at (x,y), or None outside the bitmap
    pub fn try_get(&self, x: i32, y: i32) -> Option<Rgba8> {
        if self.in_bounds(x, y) {
            Some(self.pixel(x, y))
        } else {
            None
        }
    }
    /// Pixel at (x,y) as `0xRRGGBB`
    pub fn get(&self, x: i32, y: i32) -> u32 {
        self.pixel(x, y).to_rgb()
    }
    /// Pixel at (x,y) as `0xAARRGGBB`
    pub fn get_rgba(&self, x: i32, y: i32) -> u32 {
        self.pixel(x, y).to_argb()
    }
    /// Store `c` at (x,y), ignoring the clip rectangle
    ///
    /// # Panics
    ///
    /// If (x,y) is outside the bitmap
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, c: Rgba8) {
        let i = self.index(x, y);
        self.rbuf[i].copy_from_slice(&c.to_bytes());
    }
    /// Store opaque `0xRRGGBB` at (x,y), ignoring the clip rectangle
    pub fn set(&mut self, x: i32, y: i32, c: u32) {
        self.set_pixel(x, y, Rgba8::from_rgb(c));
    }
    /// Store `0xAARRGGBB` at (x,y), ignoring the clip rectangle
    pub fn set_rgba(&mut self, x: i32, y: i32, c: u32) {
        self.set_pixel(x, y, Rgba8::from_argb(c));
    }
    /// Plot the pen at (x,y) if it lies inside the clip rectangle
    #[inline]
    pub fn putpixel(&mut self, x: i32, y: i32) {
        if self.clip.contains(x, y) {
            let pen = self.pen;
            self.set_pixel(x, y, pen);
        }
    }
    /// Fill a run of `n` pixels starting at (x,y) with the pen; the run
    /// must already lie inside the bitmap
    #[inline]
    pub(crate) fn span(&mut self, x: i32, y: i32, n: i32) {
        if n <= 0 {
            return;
        }
        let px = self.pen.to_bytes();
        let row = self.rbuf.row_mut(y as usize);
        let start = x as usize * BPP;
        for chunk in row[start .. start + n as usize * BPP].chunks_exact_mut(BPP) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Fill the whole bitmap with the pen, ignoring the clip rectangle
    pub fn clear(&mut self) {
        let px = self.pen.to_bytes();
        self.rbuf.fill(px);
    }
    /// Reverse the order of the scanlines in place
    pub fn flip_vertical(&mut self) {
        let h = self.rbuf.height();
        for y in 0 .. h / 2 {
            self.rbuf.swap_rows(y, h - 1 - y);
        }
    }
}
