//! Whole-bitmap color operations
//!
//! Palette reduction (error diffusion and ordered dithering), color
//! replacement, grayscale conversion and color counting. These work on every
//! pixel of the bitmap; the clip rectangle is not consulted. Alpha is never
//! changed.

use std::collections::HashSet;

use crate::bitmap::Bitmap;
use crate::color::{distance, Rgba8};

/// Spread of the ordered dither offsets, in channel units
const ORDERED_SPREAD: f64 = 64.0;

/// Entry of `palette` closest to `c` (`0xRRGGBB`); first one wins on ties
///
///     use bitmap::palette::nearest;
///     assert_eq!(nearest(&[0x000000, 0xFFFFFF], 0x707070), Some(0x000000));
///     assert_eq!(nearest(&[], 0x707070), None);
///
pub fn nearest(palette: &[u32], c: u32) -> Option<u32> {
    let mut best: Option<(u32, f64)> = None;
    for &p in palette {
        let d = distance(p, c);
        match best {
            Some((_, bd)) if bd <= d => {}
            _ => best = Some((p, d)),
        }
    }
    best.map(|(p, _)| p & 0xFFFFFF)
}

/// `n` x `n` Bayer threshold matrix, row-major, values `0 .. n*n`
fn bayer(n: usize) -> Vec<u32> {
    let mut m = vec![0u32];
    let mut size = 1;
    while size < n {
        let next = size * 2;
        let mut out = vec![0u32; next * next];
        for y in 0 .. size {
            for x in 0 .. size {
                let v = 4 * m[y * size + x];
                out[y * next + x] = v;
                out[y * next + x + size] = v + 2;
                out[(y + size) * next + x] = v + 3;
                out[(y + size) * next + x + size] = v + 1;
            }
        }
        m = out;
        size = next;
    }
    m
}

fn clamp_channel(v: i32) -> u8 {
    v.max(0).min(255) as u8
}

impl<'a> Bitmap<'a> {
    /// Reduce the bitmap to the colors of `palette` (`0xRRGGBB` entries)
    /// with Floyd-Steinberg error diffusion
    ///
    /// Each pixel is replaced by its nearest palette entry and the
    /// difference is spread over the unvisited neighbours: 7/16 right,
    /// 3/16 below left, 5/16 below, 1/16 below right. An empty palette
    /// leaves the bitmap untouched.
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let mut b = Bitmap::new(8, 8);
    ///     b.set_color(0x808080);
    ///     b.clear();
    ///     b.reduce_palette(&[0x000000, 0xFFFFFF]);
    ///     assert_eq!(b.count_colors(), 2);
    ///
    pub fn reduce_palette(&mut self, palette: &[u32]) {
        if palette.is_empty() {
            return;
        }
        let (w, h) = (self.w, self.h);
        for y in 0 .. h {
            for x in 0 .. w {
                let old = self.pixel(x, y);
                let c = match nearest(palette, old.to_rgb()) {
                    Some(c) => c,
                    None => return,
                };
                let mut new = Rgba8::from_rgb(c);
                new.a = old.a;
                self.set_pixel(x, y, new);
                let err = [
                    i32::from(old.r) - i32::from(new.r),
                    i32::from(old.g) - i32::from(new.g),
                    i32::from(old.b) - i32::from(new.b),
                ];
                if err == [0, 0, 0] {
                    continue;
                }
                self.diffuse(x + 1, y, err, 7);
                self.diffuse(x - 1, y + 1, err, 3);
                self.diffuse(x, y + 1, err, 5);
                self.diffuse(x + 1, y + 1, err, 1);
            }
        }
    }

    fn diffuse(&mut self, x: i32, y: i32, err: [i32; 3], weight: i32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let mut p = self.pixel(x, y);
        p.r = clamp_channel(i32::from(p.r) + err[0] * weight / 16);
        p.g = clamp_channel(i32::from(p.g) + err[1] * weight / 16);
        p.b = clamp_channel(i32::from(p.b) + err[2] * weight / 16);
        self.set_pixel(x, y, p);
    }

    /// Reduce to `palette` with a 4x4 ordered (Bayer) dither
    pub fn reduce_palette_ordered4(&mut self, palette: &[u32]) {
        self.reduce_palette_ordered(palette, 4);
    }

    /// Reduce to `palette` with an 8x8 ordered (Bayer) dither
    pub fn reduce_palette_ordered8(&mut self, palette: &[u32]) {
        self.reduce_palette_ordered(palette, 8);
    }

    fn reduce_palette_ordered(&mut self, palette: &[u32], n: usize) {
        if palette.is_empty() {
            return;
        }
        let matrix = bayer(n);
        let cells = (n * n) as f64;
        for y in 0 .. self.h {
            for x in 0 .. self.w {
                let t = matrix[(y as usize % n) * n + x as usize % n];
                let offset = ((f64::from(t) + 0.5) / cells - 0.5) * ORDERED_SPREAD;
                let old = self.pixel(x, y);
                let shift = |v: u8| (f64::from(v) + offset).round().max(0.0).min(255.0) as u32;
                let shifted = (shift(old.r) << 16) | (shift(old.g) << 8) | shift(old.b);
                if let Some(c) = nearest(palette, shifted) {
                    let mut new = Rgba8::from_rgb(c);
                    new.a = old.a;
                    self.set_pixel(x, y, new);
                }
            }
        }
    }

    /// Replace every pixel whose color is `from` with `to` (both `0xRRGGBB`)
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let mut b = Bitmap::new(2, 1);
    ///     b.set(0, 0, 0xFF00FF);
    ///     b.swap_color(0xFF00FF, 0x00FF00);
    ///     assert_eq!(b.get(0, 0), 0x00FF00);
    ///     assert_eq!(b.get(1, 0), 0x000000);
    ///
    pub fn swap_color(&mut self, from: u32, to: u32) {
        let from = Rgba8::from_rgb(from);
        let to = Rgba8::from_rgb(to);
        for px in self.rbuf.as_mut_slice().chunks_exact_mut(4) {
            if Rgba8::from_slice(px).rgb_eq(&from) {
                px[..3].copy_from_slice(&[to.r, to.g, to.b]);
            }
        }
    }

    /// Convert to shades of gray by luminance
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let mut b = Bitmap::new(1, 1);
    ///     b.set_rgba(0, 0, 0x80FF0000);
    ///     b.grayscale();
    ///     assert_eq!(b.get_rgba(0, 0), 0x804C4C4C);
    ///
    pub fn grayscale(&mut self) {
        for px in self.rbuf.as_mut_slice().chunks_exact_mut(4) {
            let l = 0.299 * f64::from(px[0]) + 0.587 * f64::from(px[1]) + 0.114 * f64::from(px[2]);
            let l = l.round().min(255.0) as u8;
            px[..3].copy_from_slice(&[l, l, l]);
        }
    }

    /// Number of distinct RGB values in the bitmap
    pub fn count_colors(&self) -> usize {
        self.rbuf.as_slice()
            .chunks_exact(4)
            .map(|px| Rgba8::from_slice(px).to_rgb())
            .collect::<HashSet<u32>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bayer_matrices_are_permutations() {
        for &n in &[2, 4, 8] {
            let mut m = bayer(n);
            assert_eq!(m.len(), n * n);
            m.sort_unstable();
            assert!(m.iter().enumerate().all(|(i, &v)| v as usize == i));
        }
        assert_eq!(bayer(2), vec![0, 2, 3, 1]);
    }

    #[test]
    fn palette_colors_are_kept() {
        let mut b = Bitmap::new(3, 3);
        b.set(1, 1, 0xFF0000);
        b.set(2, 0, 0x0000FF);
        let before = b.data().to_vec();
        b.reduce_palette(&[0x000000, 0xFF0000, 0x0000FF]);
        assert_eq!(b.data(), &before[..]);
    }

    /// Flat gray image reduced to `palette`, one channel per pixel
    fn dither_gray(w: i32, h: i32, gray: u8, palette: &[u32]) -> Vec<Vec<u8>> {
        let mut b = Bitmap::new(w, h);
        b.set_pen(Rgba8::new(gray, gray, gray, 255));
        b.clear();
        b.reduce_palette(palette);
        (0 .. h).map(|y| {
            (0 .. w).map(|x| {
                let p = b.pixel(x, y);
                assert!(p.r == p.g && p.g == p.b);
                p.r
            }).collect()
        }).collect()
    }

    #[test]
    fn floyd_steinberg_weights() {
        // (0,0) 100 -> 0, err 100: (1,0) 143, (0,1) 131, (1,1) 106
        // (1,0) 143 -> 255, err -112: (2,0) 51, (0,1) 110, (1,1) 71, (2,1) 93
        // (2,0) 51 -> 0, err 51: (1,1) 80, (2,1) 108
        // (0,1) 110 -> 0, err 110: (1,1) 128
        // (1,1) 128 -> 255, err -127: (2,1) 53
        // (2,1) 53 -> 0
        assert_eq!(dither_gray(3, 2, 100, &[0x000000, 0xFFFFFF]),
                   vec![vec![0, 255, 0], vec![0, 255, 0]]);
        assert_eq!(dither_gray(4, 3, 71, &[0x000000, 0xFFFFFF]),
                   vec![vec![0, 0, 0, 0], vec![0, 255, 0, 255], vec![0, 0, 255, 0]]);
        let levels = [0x000000, 0x555555, 0xAAAAAA, 0xFFFFFF];
        assert_eq!(dither_gray(3, 3, 23, &levels),
                   vec![vec![0, 0, 0], vec![0, 0x55, 0], vec![0, 0, 0x55]]);
    }

    #[test]
    fn empty_palette_is_noop() {
        let mut b = Bitmap::new(2, 2);
        b.set(0, 0, 0x123456);
        b.reduce_palette(&[]);
        b.reduce_palette_ordered4(&[]);
        assert_eq!(b.get(0, 0), 0x123456);
    }

    #[test]
    fn dithering_keeps_alpha() {
        let mut b = Bitmap::new(4, 4);
        b.set_pen(Rgba8::new(100, 100, 100, 7));
        b.clear();
        b.reduce_palette(&[0x000000, 0xFFFFFF]);
        assert!(b.data().chunks(4).all(|p| p[3] == 7));
        b.clear();
        b.reduce_palette_ordered8(&[0x000000, 0xFFFFFF]);
        assert!(b.data().chunks(4).all(|p| p[3] == 7));
    }

    #[test]
    fn ordered_dither_mixes_gray() {
        let mut b = Bitmap::new(8, 8);
        b.set_color(0x808080);
        b.clear();
        b.reduce_palette_ordered4(&[0x000000, 0xFFFFFF]);
        assert_eq!(b.count_colors(), 2);
    }

    #[test]
    fn count_colors_ignores_alpha() {
        let mut b = Bitmap::new(2, 2);
        b.set_rgba(0, 0, 0x10000000);
        assert_eq!(b.count_colors(), 1);
        b.set(1, 1, 0x010101);
        assert_eq!(b.count_colors(), 2);
    }
}
