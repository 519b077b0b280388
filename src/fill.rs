//! Flood fill
//!
//! Scanline flood fill driven by a work queue of seed points. Each seed is
//! widened to the full run of matching pixels on its row, the run is painted
//! and one new seed is queued for every matching run directly above and
//! below it.
//!
//! The fill works on the whole bitmap: the clip rectangle is not consulted.

use std::collections::VecDeque;

use crate::bitmap::Bitmap;
use crate::color::Rgba8;

impl<'a> Bitmap<'a> {
    /// Replace the 4-connected region of pixels matching the color at (x,y)
    /// with the pen
    ///
    /// Colors are compared on all four channels. Nothing happens if (x,y)
    /// is outside the bitmap or the region already has the pen color. Should
    /// the work queue fail to grow, the fill stops early and the region is
    /// left partially painted.
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let mut b = Bitmap::new(5, 5);
    ///     b.line(2, 0, 2, 4);
    ///     b.set_color(0x00FF00);
    ///     b.fill(0, 0);
    ///     assert_eq!(b.get(1, 4), 0x00FF00);
    ///     assert_eq!(b.get(2, 2), 0xFFFFFF);
    ///     assert_eq!(b.get(3, 0), 0x000000);
    ///
    pub fn fill(&mut self, x: i32, y: i32) {
        if !self.in_bounds(x, y) {
            return;
        }
        let source = self.pixel(x, y);
        let target = self.pen;
        if source == target {
            return;
        }
        let mut queue: VecDeque<(i32, i32)> = VecDeque::new();
        if queue.try_reserve(16).is_err() {
            log::warn!("flood fill: unable to allocate work queue");
            return;
        }
        queue.push_back((x, y));
        while let Some((x, y)) = queue.pop_front() {
            if self.pixel(x, y) != source {
                continue;
            }
            let mut w = x;
            while w > 0 && self.pixel(w - 1, y) == source {
                w -= 1;
            }
            let mut e = x;
            while e < self.w - 1 && self.pixel(e + 1, y) == source {
                e += 1;
            }
            for i in w ..= e {
                self.set_pixel(i, y, target);
            }
            for &ny in &[y - 1, y + 1] {
                if ny < 0 || ny >= self.h {
                    continue;
                }
                if !self.queue_runs(&mut queue, w, e, ny, source) {
                    log::warn!("flood fill: work queue exhausted, region left partially filled");
                    return;
                }
            }
        }
    }

    /// Queue the first pixel of every run matching `source` on row `y`
    /// between `w` and `e`; false if the queue could not grow
    fn queue_runs(&self, queue: &mut VecDeque<(i32, i32)>, w: i32, e: i32, y: i32, source: Rgba8) -> bool {
        let mut in_run = false;
        for i in w ..= e {
            let matches = self.pixel(i, y) == source;
            if matches && !in_run {
                if queue.len() == queue.capacity() && queue.try_reserve(queue.len()).is_err() {
                    return false;
                }
                queue.push_back((i, y));
            }
            in_run = matches;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::Bitmap;

    #[test]
    fn fill_same_color_is_noop() {
        let mut b = Bitmap::new(3, 3);
        b.set_pen(crate::Rgba8::new(0, 0, 0, 0));
        b.fill(1, 1);
        assert!(b.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn fill_outside_is_noop() {
        let mut b = Bitmap::new(3, 3);
        b.fill(-1, 1);
        b.fill(1, 3);
        assert!(b.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn fill_ignores_clip() {
        let mut b = Bitmap::new(4, 4);
        b.clip(0, 0, 1, 1);
        b.fill(0, 0);
        assert_eq!(b.get(3, 3), 0xFFFFFF);
    }
}
