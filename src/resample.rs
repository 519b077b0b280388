//! Resampling
//!
//! Every resampler returns a new bitmap and leaves the source alone. All
//! four channels, alpha included, are filtered independently. Destination
//! pixel `(x,y)` samples the source at `(x * w / nw, y * h / nh)`, so pixel
//! centers line up at the top left corner.

use crate::bitmap::Bitmap;
use crate::color::Rgba8;

/// Source coordinate sampled by destination coordinate `d`
#[inline]
fn source_pos(d: i32, src_len: i32, dst_len: i32) -> f64 {
    f64::from(d) * f64::from(src_len) / f64::from(dst_len)
}

/// Radius of the triangle filter along one axis
///
/// One pixel when enlarging, widening with the reduction ratio but never
/// past the 4x4 neighbourhood
fn tent_radius(src_len: i32, dst_len: i32) -> f64 {
    (f64::from(src_len) / f64::from(dst_len)).max(1.0).min(2.0)
}

#[inline]
fn tent(d: f64, radius: f64) -> f64 {
    (1.0 - d.abs() / radius).max(0.0)
}

impl<'a> Bitmap<'a> {
    fn clamped(&self, x: i32, y: i32) -> Rgba8 {
        self.pixel(x.max(0).min(self.w - 1), y.max(0).min(self.h - 1))
    }

    fn resampled<F>(&self, nw: i32, nh: i32, sample: F) -> Bitmap<'static>
        where F: Fn(&Self, i32, i32) -> Rgba8
    {
        let mut out = Bitmap::new(nw.max(0), nh.max(0));
        out.set_pen(self.pen);
        if self.w == 0 || self.h == 0 {
            return out;
        }
        for y in 0 .. out.h {
            for x in 0 .. out.w {
                let p = sample(self, x, y);
                out.set_pixel(x, y, p);
            }
        }
        out
    }

    /// Nearest neighbour resampling to `nw` x `nh`
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let mut b = Bitmap::new(2, 1);
    ///     b.set(1, 0, 0xFF0000);
    ///     let r = b.resample(4, 2);
    ///     assert_eq!((r.width(), r.height()), (4, 2));
    ///     assert_eq!(r.get(1, 1), 0x000000);
    ///     assert_eq!(r.get(2, 1), 0xFF0000);
    ///
    pub fn resample(&self, nw: i32, nh: i32) -> Bitmap<'static> {
        let (w, h) = (i64::from(self.w), i64::from(self.h));
        let (dw, dh) = (i64::from(nw), i64::from(nh));
        self.resampled(nw, nh, |src, x, y| {
            let sx = i64::from(x) * w / dw;
            let sy = i64::from(y) * h / dh;
            src.pixel(sx as i32, sy as i32)
        })
    }

    /// Bilinear resampling to `nw` x `nh`, clamping at the edges
    pub fn resample_blin(&self, nw: i32, nh: i32) -> Bitmap<'static> {
        let (w, h) = (self.w, self.h);
        self.resampled(nw, nh, |src, x, y| {
            let gx = source_pos(x, w, nw);
            let gy = source_pos(y, h, nh);
            let (x0, y0) = (gx.floor(), gy.floor());
            let (fx, fy) = (gx - x0, gy - y0);
            let (x0, y0) = (x0 as i32, y0 as i32);
            let c00 = src.clamped(x0, y0).to_bytes();
            let c10 = src.clamped(x0 + 1, y0).to_bytes();
            let c01 = src.clamped(x0, y0 + 1).to_bytes();
            let c11 = src.clamped(x0 + 1, y0 + 1).to_bytes();
            let mut out = [0u8; 4];
            for i in 0 .. 4 {
                let top = f64::from(c00[i]) + (f64::from(c10[i]) - f64::from(c00[i])) * fx;
                let bot = f64::from(c01[i]) + (f64::from(c11[i]) - f64::from(c01[i])) * fx;
                out[i] = (top + (bot - top) * fy).round().max(0.0).min(255.0) as u8;
            }
            Rgba8::new(out[0], out[1], out[2], out[3])
        })
    }

    /// Resampling with a triangle filter over the 4x4 neighbourhood of the
    /// sample point, clamping at the edges
    ///
    /// Smoother than [resample_blin] when shrinking; the filter widens
    /// with the reduction ratio (up to two source pixels).
    ///
    /// [resample_blin]: #method.resample_blin
    pub fn resample_bcub(&self, nw: i32, nh: i32) -> Bitmap<'static> {
        let (w, h) = (self.w, self.h);
        let (rx, ry) = (tent_radius(w, nw.max(1)), tent_radius(h, nh.max(1)));
        self.resampled(nw, nh, |src, x, y| {
            let gx = source_pos(x, w, nw);
            let gy = source_pos(y, h, nh);
            let (x0, y0) = (gx.floor(), gy.floor());
            let (fx, fy) = (gx - x0, gy - y0);
            let (x0, y0) = (x0 as i32, y0 as i32);
            let mut sum = [0f64; 4];
            let mut denom = 0.0;
            for m in -1 ..= 2 {
                let wy = tent(f64::from(m) - fy, ry);
                if wy == 0.0 {
                    continue;
                }
                for n in -1 ..= 2 {
                    let wx = tent(f64::from(n) - fx, rx);
                    if wx == 0.0 {
                        continue;
                    }
                    let c = src.clamped(x0 + n, y0 + m).to_bytes();
                    let f = wx * wy;
                    for (s, &v) in sum.iter_mut().zip(c.iter()) {
                        *s += f64::from(v) * f;
                    }
                    denom += f;
                }
            }
            let mut out = [0u8; 4];
            for (o, s) in out.iter_mut().zip(sum.iter()) {
                *o = (s / denom).round().max(0.0).min(255.0) as u8;
            }
            Rgba8::new(out[0], out[1], out[2], out[3])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tent_radius_limits() {
        assert_eq!(tent_radius(10, 20), 1.0);
        assert_eq!(tent_radius(10, 10), 1.0);
        assert_eq!(tent_radius(15, 10), 1.5);
        assert_eq!(tent_radius(100, 10), 2.0);
    }

    #[test]
    fn bilinear_midpoint() {
        let mut b = Bitmap::new(2, 1);
        b.set_rgba(0, 0, 0x00000000);
        b.set_rgba(1, 0, 0xC8C8C8C8);
        let r = b.resample_blin(4, 1);
        assert_eq!(r.get_rgba(0, 0), 0x00000000);
        assert_eq!(r.get_rgba(1, 0), 0x64646464);
        assert_eq!(r.get_rgba(2, 0), 0xC8C8C8C8);
        // clamped past the right edge
        assert_eq!(r.get_rgba(3, 0), 0xC8C8C8C8);
    }

    #[test]
    fn empty_targets() {
        let b = Bitmap::new(3, 3);
        assert_eq!(b.resample(0, 5).width(), 0);
        assert_eq!(b.resample_blin(-1, 5).width(), 0);
        let e = Bitmap::new(0, 0);
        assert_eq!(e.resample_bcub(2, 2).get_rgba(1, 1), 0);
    }

    #[test]
    fn bcub_of_flat_image_is_flat() {
        let mut b = Bitmap::new(7, 5);
        b.set_color(0x336699);
        b.clear();
        for &(w, h) in &[(3, 2), (14, 10), (7, 5), (1, 1)] {
            let r = b.resample_bcub(w, h);
            for y in 0 .. h {
                for x in 0 .. w {
                    assert_eq!(r.get_rgba(x, y), 0xFF336699);
                }
            }
        }
    }
}
