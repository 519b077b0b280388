//! Scan converted primitives
//!
//! All primitives draw with the bitmap pen and never touch pixels outside the
//! clip rectangle. Outlines use integer only incremental algorithms:
//!
//! - [Bresenham's line algorithm](https://en.wikipedia.org/wiki/Bresenham%27s_line_algorithm)
//! - the midpoint circle criterion, evaluated row by row so that circles
//!   and rounded rectangles only visit the rows inside the clip
//! - Zingl's rectangle bound ellipse
//!   (see "A Rasterizing Algorithm for Drawing Curves", A. Zingl, 2012)
//!
//! Rectangle corners are inclusive: `fillrect(2,2,7,7)` covers 6x6 pixels.

use std::cmp::max;
use std::cmp::min;
use std::convert::TryInto;
use std::mem::swap;
use std::ops::Range;

use crate::bitmap::Bitmap;

/// Number of line segments used to approximate a bezier curve
pub const BEZIER_SEGMENTS: i32 = 20;

/// Largest `w` with `w * w <= n`, or -1 when `n` is negative
fn isqrt(n: i64) -> i64 {
    if n < 0 {
        return -1;
    }
    let mut w = (n as f64).sqrt() as i64;
    while w * w > n {
        w -= 1;
    }
    while (w + 1) * (w + 1) <= n {
        w += 1;
    }
    w
}

/// Steps `i` in `0..=n` for which `start + step * i` lies in `lo..hi`
fn steps_within(start: i64, step: i64, n: i64, lo: i32, hi: i32) -> Range<i64> {
    let (lo, hi) = (i64::from(lo), i64::from(hi));
    let (a, b) = if step > 0 {
        (lo - start, hi - start)
    } else {
        (start - hi + 1, start - lo + 1)
    };
    max(a, 0) .. min(b, n + 1)
}

/// Offset along the minor axis after `i` steps along the major one
#[inline]
fn minor_offset(i: i64, minor: i64, major: i64) -> i64 {
    if major == 0 {
        return 0;
    }
    let (i, minor, major) = (i128::from(i), i128::from(minor), i128::from(major));
    ((2 * i * minor + major) / (2 * major)) as i64
}

impl<'a> Bitmap<'a> {
    /// Plot the pen at a wide coordinate, dropping anything outside the clip
    #[inline]
    fn plot<T: TryInto<i32>>(&mut self, x: T, y: T) {
        if let (Ok(x), Ok(y)) = (x.try_into(), y.try_into()) {
            self.putpixel(x, y);
        }
    }

    /// True if the inclusive box [x0,x1]x[y0,y1] shares no pixel with the clip
    fn misses_clip(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> bool {
        let c = self.clip;
        c.is_empty()
            || x1 < i64::from(c.x0) || x0 >= i64::from(c.x1)
            || y1 < i64::from(c.y0) || y0 >= i64::from(c.y1)
    }

    /// Draw a line from (x0,y0) to (x1,y1), both end points included
    ///
    /// Every pixel of the line is visited exactly once and the same pixels
    /// are drawn whichever end the line starts from.
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let mut b = Bitmap::new(4, 4);
    ///     b.line(0, 0, 3, 3);
    ///     assert_eq!(b.get(2, 2), 0xFFFFFF);
    ///     assert_eq!(b.get(2, 1), 0);
    ///
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.wide_line(i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
    }

    /// Bresenham in closed form; only the steps inside the clip are walked
    fn wide_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64) {
        // Walk from the lower end so both directions give the same pixels
        let (x0, y0, x1, y1) = if (y0, x0) > (y1, x1) { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };
        if self.misses_clip(min(x0, x1), y0, max(x0, x1), y1) {
            return;
        }
        let dx = (x1 - x0).abs();
        let dy = y1 - y0;
        let sx = if x0 < x1 { 1 } else { -1 };
        let c = self.clip;
        if dx >= dy {
            for i in steps_within(x0, sx, dx, c.x0, c.x1) {
                self.plot(x0 + sx * i, y0 + minor_offset(i, dy, dx));
            }
        } else {
            for i in steps_within(y0, 1, dy, c.y0, c.y1) {
                self.plot(x0 + sx * minor_offset(i, dx, dy), y0 + i);
            }
        }
    }

    /// Outline of the rectangle with corners (x0,y0) and (x1,y1)
    pub fn rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.line(x0, y0, x1, y0);
        self.line(x1, y0, x1, y1);
        self.line(x1, y1, x0, y1);
        self.line(x0, y1, x0, y0);
    }

    /// Filled rectangle with corners (x0,y0) and (x1,y1) in any order
    pub fn fillrect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let (x0, x1) = (min(x0, x1), max(x0, x1));
        let (y0, y1) = (min(y0, y1), max(y0, y1));
        let c = self.clip;
        let (xa, xb) = (max(x0, c.x0), min(x1.saturating_add(1), c.x1));
        for y in max(y0, c.y0) .. min(y1.saturating_add(1), c.y1) {
            self.span(xa, y, xb - xa);
        }
    }

    /// Like [fillrect] but only pixels where `x + y` is even are drawn
    ///
    /// [fillrect]: #method.fillrect
    pub fn dithrect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let (x0, x1) = (min(x0, x1), max(x0, x1));
        let (y0, y1) = (min(y0, y1), max(y0, y1));
        let c = self.clip;
        for y in max(y0, c.y0) .. min(y1.saturating_add(1), c.y1) {
            for x in max(x0, c.x0) .. min(x1.saturating_add(1), c.x1) {
                if (x + y) & 1 == 0 {
                    self.putpixel(x, y);
                }
            }
        }
    }

    /// Circle of radius `r` centered on (x0,y0)
    pub fn circle(&mut self, x0: i32, y0: i32, r: i32) {
        let (x0, y0) = (i64::from(x0), i64::from(y0));
        self.round_box(x0, y0, x0, y0, i64::from(r), false);
    }

    /// Filled circle of radius `r` centered on (x0,y0)
    pub fn fillcircle(&mut self, x0: i32, y0: i32, r: i32) {
        let (x0, y0) = (i64::from(x0), i64::from(y0));
        self.round_box(x0, y0, x0, y0, i64::from(r), true);
    }

    /// The box [ix0,ix1]x[iy0,iy1] grown by `rad`, one row at a time
    ///
    /// A pixel at distance `d` from the box is part of the shape when
    /// `d * d <= rad * rad + rad`, the midpoint circle criterion. Outlines
    /// keep the shape pixels whose outward horizontal or vertical neighbour
    /// falls outside, which leaves an 8-connected ring. Only rows inside the
    /// clip are visited.
    fn round_box(&mut self, ix0: i64, iy0: i64, ix1: i64, iy1: i64, rad: i64, filled: bool) {
        if rad < 0 || self.misses_clip(ix0 - rad, iy0 - rad, ix1 + rad, iy1 + rad) {
            return;
        }
        let c = self.clip;
        let reach = rad * rad + rad;
        let half = |d: i64| isqrt(reach - d * d);
        for y in max(iy0 - rad, i64::from(c.y0)) .. min(iy1 + rad + 1, i64::from(c.y1)) {
            let dy = max(max(iy0 - y, y - iy1), 0);
            let w = half(dy);
            if filled {
                self.wide_hspan(ix0 - w, ix1 + w, y);
                continue;
            }
            let out = if y <= iy0 || y >= iy1 { half(dy + 1) } else { w };
            if out < 0 {
                self.wide_hspan(ix0 - w, ix1 + w, y);
            } else {
                let inner = min(w, out + 1);
                self.wide_hspan(ix1 + inner, ix1 + w, y);
                self.wide_hspan(ix0 - w, ix0 - inner, y);
            }
        }
    }

    /// Pen colored run from `xa` to `xb` inclusive on row `y`, clipped
    fn wide_hspan(&mut self, xa: i64, xb: i64, y: i64) {
        let c = self.clip;
        if y < i64::from(c.y0) || y >= i64::from(c.y1) {
            return;
        }
        let lo = max(min(xa, xb), i64::from(c.x0));
        let hi = min(max(xa, xb) + 1, i64::from(c.x1));
        if lo < hi {
            // lo, hi and y lie inside the clip here
            self.span(lo as i32, y as i32, (hi - lo) as i32);
        }
    }

    /// Ellipse inscribed in the rectangle with corners (x0,y0) and (x1,y1)
    ///
    /// There is no filled variant
    pub fn ellipse(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let (wx0, wy0, wx1, wy1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
        if self.misses_clip(min(wx0, wx1), min(wy0, wy1), max(wx0, wx1), max(wy0, wy1))
            || self.clip_inside_ellipse(wx0, wy0, wx1, wy1)
        {
            return;
        }
        let (mut x0, mut y0, mut x1, mut y1) = (i128::from(x0), i128::from(y0), i128::from(x1), i128::from(y1));
        let mut a = (x1 - x0).abs();
        let b = (y1 - y0).abs();
        let mut b1 = b & 1;
        let mut dx = 4 * (1 - a) * b * b;
        let mut dy = 4 * (b1 + 1) * a * a;
        let mut err = dx + dy + b1 * a * a;

        if x0 > x1 {
            x0 = x1;
            x1 += a;
        }
        if y0 > y1 {
            y0 = y1;
        }
        y0 += (b + 1) / 2;
        y1 = y0 - b1;
        a *= 8 * a;
        b1 = 8 * b * b;

        loop {
            self.plot(x1, y0);
            self.plot(x0, y0);
            self.plot(x0, y1);
            self.plot(x1, y1);
            let e2 = 2 * err;
            if e2 <= dy {
                y0 += 1;
                y1 -= 1;
                dy += a;
                err += dy;
            }
            if e2 >= dx || 2 * err > dy {
                x0 += 1;
                x1 -= 1;
                dx += b1;
                err += dx;
            }
            if x0 > x1 {
                break;
            }
        }
        // Flat ellipses stop early; finish the tips
        while y0 - y1 < b {
            self.plot(x0 - 1, y0);
            self.plot(x1 + 1, y0);
            y0 += 1;
            self.plot(x0 - 1, y1);
            self.plot(x1 + 1, y1);
            y1 -= 1;
        }
    }

    /// True if every clip pixel, pushed two pixels further out on both
    /// axes, is still inside the ellipse bounded by the given box
    ///
    /// The outline then cannot reach the clip.
    fn clip_inside_ellipse(&self, x0: i64, y0: i64, x1: i64, y1: i64) -> bool {
        let c = self.clip;
        let ra = (x1 - x0).abs() as f64 / 2.0;
        let rb = (y1 - y0).abs() as f64 / 2.0;
        if c.is_empty() || ra < 3.0 || rb < 3.0 {
            return false;
        }
        let (ex, ey) = ((x0 + x1) as f64 / 2.0, (y0 + y1) as f64 / 2.0);
        [(c.x0, c.y0), (c.x1 - 1, c.y0), (c.x0, c.y1 - 1), (c.x1 - 1, c.y1 - 1)]
            .iter()
            .all(|&(px, py)| {
                let u = ((f64::from(px) - ex).abs() + 2.0) / ra;
                let v = ((f64::from(py) - ey).abs() + 2.0) / rb;
                u * u + v * v < 1.0
            })
    }

    /// Rectangle with corners of radius `r`
    pub fn roundrect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, r: i32) {
        let (x0, y0, x1, y1, rad) = round_rect_params(x0, y0, x1, y1, r);
        self.round_box(x0 + rad, y0 + rad, x1 - rad, y1 - rad, rad, false);
    }

    /// Filled rectangle with corners of radius `r`
    pub fn fillroundrect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, r: i32) {
        let (x0, y0, x1, y1, rad) = round_rect_params(x0, y0, x1, y1, r);
        self.round_box(x0 + rad, y0 + rad, x1 - rad, y1 - rad, rad, true);
    }

    /// Quadratic bezier curve from (x0,y0) to (x2,y2) with control point (x1,y1)
    ///
    /// The curve is split into [BEZIER_SEGMENTS] straight lines; the last
    /// one always ends exactly on (x2,y2).
    ///
    /// [BEZIER_SEGMENTS]: constant.BEZIER_SEGMENTS.html
    pub fn bezier3(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (fx0, fy0) = (f64::from(x0), f64::from(y0));
        let (fx1, fy1) = (f64::from(x1), f64::from(y1));
        let (fx2, fy2) = (f64::from(x2), f64::from(y2));
        let (mut lx, mut ly) = (i64::from(x0), i64::from(y0));
        for i in 1 .. BEZIER_SEGMENTS {
            let t = f64::from(i) / f64::from(BEZIER_SEGMENTS);
            let u = 1.0 - t;
            let x = (u * u * fx0 + 2.0 * u * t * fx1 + t * t * fx2).round() as i64;
            let y = (u * u * fy0 + 2.0 * u * t * fy1 + t * t * fy2).round() as i64;
            self.wide_line(lx, ly, x, y);
            lx = x;
            ly = y;
        }
        self.wide_line(lx, ly, i64::from(x2), i64::from(y2));
    }
}

/// Sort the corners and keep the radius within half the shorter side
fn round_rect_params(x0: i32, y0: i32, x1: i32, y1: i32, r: i32) -> (i64, i64, i64, i64, i64) {
    let (mut x0, mut y0, mut x1, mut y1) = (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));
    if x0 > x1 {
        swap(&mut x0, &mut x1);
    }
    if y0 > y1 {
        swap(&mut y0, &mut y1);
    }
    let r = max(0, min(i64::from(r), min(x1 - x0, y1 - y0) / 2));
    (x0, y0, x1, y1, r)
}
