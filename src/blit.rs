//! Copying between bitmaps
//!
//! Source rectangles are trimmed against the source bitmap and destination
//! rectangles against the destination clip rectangle before any pixel is
//! touched, so any combination of offsets and sizes is safe.
//!
//! Masked variants take the transparency key explicitly as `0xRRGGBB`;
//! source pixels whose red, green and blue match it are skipped. Alpha plays
//! no part in the comparison.

use crate::bitmap::Bitmap;
use crate::clip::Rectangle;
use crate::color::Rgba8;

/// Trimmed blit: destination x/y, source x/y, width and height
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
struct BlitRect {
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    w: i32,
    h: i32,
}

/// Trim one axis; returns (d, s, len)
fn trim_axis(d: i64, s: i64, len: i64, src_len: i64, c0: i64, c1: i64) -> (i64, i64, i64) {
    let (mut d, mut s, mut len) = (d, s, len);
    if s < 0 {
        d -= s;
        len += s;
        s = 0;
    }
    if d < c0 {
        let delta = c0 - d;
        s += delta;
        len -= delta;
        d = c0;
    }
    if s + len > src_len {
        len = src_len - s;
    }
    if d + len > c1 {
        len = c1 - d;
    }
    (d, s, len)
}

#[allow(clippy::too_many_arguments)]
fn trim(clip: Rectangle, src_w: i32, src_h: i32,
        dx: i32, dy: i32, sx: i32, sy: i32, w: i32, h: i32) -> Option<BlitRect> {
    let (dx, sx, w) = trim_axis(dx.into(), sx.into(), w.into(), src_w.into(), clip.x0.into(), clip.x1.into());
    let (dy, sy, h) = trim_axis(dy.into(), sy.into(), h.into(), src_h.into(), clip.y0.into(), clip.y1.into());
    if w <= 0 || h <= 0 {
        return None;
    }
    Some(BlitRect {
        dx: dx as i32, dy: dy as i32,
        sx: sx as i32, sy: sy as i32,
        w: w as i32, h: h as i32,
    })
}

/// Skip `k` destination steps of a scaled axis; returns (source, remainder)
fn advance(s: i64, num: i64, k: i64, sn: i64, dn: i64) -> (i64, i64) {
    let total = num + k * sn;
    (s + total / dn, total % dn)
}

/// Destination steps needed before the axis is inside both the clip and
/// the source
fn steps_to_enter(d: i64, s: i64, c0: i64, sn: i64, dn: i64) -> i64 {
    let for_clip = (c0 - d).max(0);
    let for_src = if s < 0 { (-s * dn + sn - 1) / sn } else { 0 };
    for_clip.max(for_src)
}

impl<'a> Bitmap<'a> {
    /// Copy the `w` x `h` block at (sx,sy) of `src` to (dx,dy)
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let mut src = Bitmap::new(4, 4);
    ///     src.set(3, 3, 0x123456);
    ///     let mut dst = Bitmap::new(4, 4);
    ///     dst.blit(-2, -2, &src, 0, 0, 4, 4);
    ///     assert_eq!(dst.get(1, 1), 0x123456);
    ///
    #[allow(clippy::too_many_arguments)]
    pub fn blit(&mut self, dx: i32, dy: i32, src: &Bitmap<'_>, sx: i32, sy: i32, w: i32, h: i32) {
        let r = match trim(self.clip, src.w, src.h, dx, dy, sx, sy, w, h) {
            Some(r) => r,
            None => return,
        };
        let n = r.w as usize * 4;
        let (ds, ss) = (r.dx as usize * 4, r.sx as usize * 4);
        for j in 0 .. r.h {
            let from = &src.rbuf.row((r.sy + j) as usize)[ss .. ss + n];
            self.rbuf.row_mut((r.dy + j) as usize)[ds .. ds + n].copy_from_slice(from);
        }
    }

    /// Like [blit], but source pixels matching `mask` (`0xRRGGBB`) are skipped
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let mut src = Bitmap::new(2, 1);
    ///     src.set(0, 0, 0xFF00FF);
    ///     src.set(1, 0, 0x00FF00);
    ///     let mut dst = Bitmap::new(2, 1);
    ///     dst.set_color(0x0000FF);
    ///     dst.clear();
    ///     dst.maskedblit(0, 0, &src, 0, 0, 2, 1, 0xFF00FF);
    ///     assert_eq!(dst.get(0, 0), 0x0000FF);
    ///     assert_eq!(dst.get(1, 0), 0x00FF00);
    ///
    /// [blit]: #method.blit
    #[allow(clippy::too_many_arguments)]
    pub fn maskedblit(&mut self, dx: i32, dy: i32, src: &Bitmap<'_>, sx: i32, sy: i32, w: i32, h: i32, mask: u32) {
        let r = match trim(self.clip, src.w, src.h, dx, dy, sx, sy, w, h) {
            Some(r) => r,
            None => return,
        };
        let key = Rgba8::from_rgb(mask);
        for j in 0 .. r.h {
            for i in 0 .. r.w {
                let p = src.pixel(r.sx + i, r.sy + j);
                if !p.rgb_eq(&key) {
                    self.set_pixel(r.dx + i, r.dy + j, p);
                }
            }
        }
    }

    /// Scale the `sw` x `sh` block at (sx,sy) of `src` onto the `dw` x `dh`
    /// block at (dx,dy)
    ///
    /// Source columns and rows are picked with integer error accumulators:
    /// destination column `i` reads source column `sx + floor(i * sw / dw)`.
    /// With `mask` set, matching source pixels are skipped as in
    /// [maskedblit]. Equal sizes fall back to [blit] / [maskedblit].
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let mut src = Bitmap::new(2, 2);
    ///     src.set(1, 1, 0xABCDEF);
    ///     let mut dst = Bitmap::new(4, 4);
    ///     dst.blit_ex(0, 0, 4, 4, &src, 0, 0, 2, 2, None);
    ///     assert_eq!(dst.get(2, 2), 0xABCDEF);
    ///     assert_eq!(dst.get(3, 3), 0xABCDEF);
    ///     assert_eq!(dst.get(1, 1), 0);
    ///
    /// [blit]: #method.blit
    /// [maskedblit]: #method.maskedblit
    #[allow(clippy::too_many_arguments)]
    pub fn blit_ex(&mut self, dx: i32, dy: i32, dw: i32, dh: i32,
                   src: &Bitmap<'_>, sx: i32, sy: i32, sw: i32, sh: i32,
                   mask: Option<u32>) {
        if dw <= 0 || dh <= 0 || sw <= 0 || sh <= 0 {
            return;
        }
        if sw == dw && sh == dh {
            match mask {
                Some(key) => self.maskedblit(dx, dy, src, sx, sy, sw, sh, key),
                None => self.blit(dx, dy, src, sx, sy, sw, sh),
            }
            return;
        }
        let c = self.clip;
        let (dx, dy, dw, dh) = (i64::from(dx), i64::from(dy), i64::from(dw), i64::from(dh));
        let (sw, sh) = (i64::from(sw), i64::from(sh));
        if dx >= c.x1.into() || dx + dw <= c.x0.into() || dy >= c.y1.into() || dy + dh <= c.y0.into() {
            return;
        }

        let ky = steps_to_enter(dy, sy.into(), c.y0.into(), sh, dh);
        let (mut sy, mut ynum) = advance(sy.into(), 0, ky, sh, dh);
        let kx = steps_to_enter(dx, sx.into(), c.x0.into(), sw, dw);
        let (sx0, xnum0) = advance(sx.into(), 0, kx, sw, dw);

        let key = mask.map(Rgba8::from_rgb);
        let (src_w, src_h) = (i64::from(src.w), i64::from(src.h));
        let y_end = (dy + dh).min(c.y1.into());
        let x_end = (dx + dw).min(c.x1.into());
        let mut y = dy + ky;
        while y < y_end && sy < src_h {
            let (mut sx, mut xnum) = (sx0, xnum0);
            let mut x = dx + kx;
            while x < x_end && sx < src_w {
                let p = src.pixel(sx as i32, sy as i32);
                if key.map_or(true, |k| !p.rgb_eq(&k)) {
                    self.set_pixel(x as i32, y as i32, p);
                }
                let s = advance(sx, xnum, 1, sw, dw);
                sx = s.0;
                xnum = s.1;
                x += 1;
            }
            let s = advance(sy, ynum, 1, sh, dh);
            sy = s.0;
            ynum = s.1;
            y += 1;
        }
    }
}
