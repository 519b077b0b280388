
extern crate bitmap;
use bitmap::Bitmap;
use proptest::prelude::*;

const BACKGROUND: u32 = 0x11223344;

/// Source with a distinct opaque color in every pixel
fn pattern(w: i32, h: i32) -> Bitmap<'static> {
    let mut b = Bitmap::new(w, h);
    for y in 0 .. h {
        for x in 0 .. w {
            b.set_rgba(x, y, 0xFF000000 | ((x as u32) << 8) | y as u32);
        }
    }
    b
}

fn target(w: i32, h: i32, clip: (i32, i32, i32, i32)) -> Bitmap<'static> {
    let mut b = Bitmap::new(w, h);
    b.set_pen(BACKGROUND.into());
    b.clear();
    b.clip(clip.0, clip.1, clip.2, clip.3);
    b
}

/// Pixel the destination should hold at (x,y) after a scaled copy
#[allow(clippy::too_many_arguments)]
fn expected(dst: &Bitmap, src: &Bitmap, x: i32, y: i32,
            (dx, dy, dw, dh): (i32, i32, i32, i32),
            (sx, sy, sw, sh): (i32, i32, i32, i32)) -> u32 {
    let c = dst.clip_rect();
    if !c.contains(x, y) || x < dx || y < dy || x >= dx + dw || y >= dy + dh {
        return BACKGROUND;
    }
    let u = sx + (x - dx) * sw / dw;
    let v = sy + (y - dy) * sh / dh;
    src.try_get(u, v).map_or(BACKGROUND, |p| p.to_argb())
}

#[test]
fn blit_onto_itself_sized_target() {
    let src = pattern(3, 3);
    let mut dst = target(3, 3, (0, 0, 3, 3));
    dst.blit(0, 0, &src, 0, 0, 3, 3);
    assert_eq!(dst.data(), src.data());
}

#[test]
fn blit_ex_downscale_picks_floor_columns() {
    let src = pattern(6, 1);
    let mut dst = target(3, 1, (0, 0, 3, 1));
    dst.blit_ex(0, 0, 3, 1, &src, 0, 0, 6, 1, None);
    assert_eq!(dst.get_rgba(0, 0), src.get_rgba(0, 0));
    assert_eq!(dst.get_rgba(1, 0), src.get_rgba(2, 0));
    assert_eq!(dst.get_rgba(2, 0), src.get_rgba(4, 0));
}

#[test]
fn blit_ex_with_mask() {
    let mut src = Bitmap::new(2, 2);
    src.set_color(0xFF00FF);
    src.clear();
    src.set(0, 0, 0x00FF00);
    let mut dst = target(4, 4, (0, 0, 4, 4));
    dst.blit_ex(0, 0, 4, 4, &src, 0, 0, 2, 2, Some(0xFF00FF));
    assert_eq!(dst.get(1, 1), 0x00FF00);
    assert_eq!(dst.get_rgba(2, 2), BACKGROUND);
    assert_eq!(dst.get_rgba(3, 0), BACKGROUND);
}

#[test]
fn degenerate_sizes_are_noops() {
    let src = pattern(4, 4);
    let mut dst = target(4, 4, (0, 0, 4, 4));
    let before = dst.data().to_vec();
    dst.blit(0, 0, &src, 0, 0, 0, 4);
    dst.blit(0, 0, &src, 0, 0, -3, 4);
    dst.blit_ex(0, 0, 0, 4, &src, 0, 0, 4, 4, None);
    dst.blit_ex(0, 0, 4, 4, &src, 0, 0, 4, -1, None);
    dst.blit(-100, -100, &src, 0, 0, 4, 4);
    dst.blit_ex(i32::MAX - 2, 0, 4, 4, &src, 0, 0, 2, 2, None);
    assert_eq!(dst.data(), &before[..]);
}

#[test]
fn blit_ex_extreme_ratios() {
    let src = pattern(1000, 1);
    let mut dst = target(3, 1, (0, 0, 3, 1));
    dst.blit_ex(0, 0, 3, 1, &src, 0, 0, 1000, 1, None);
    assert_eq!(dst.get_rgba(1, 0), src.get_rgba(333, 0));
    assert_eq!(dst.get_rgba(2, 0), src.get_rgba(666, 0));

    let dot = pattern(1, 1);
    let mut wide = target(1000, 2, (0, 0, 1000, 2));
    wide.blit_ex(-500, 0, 1500, 1, &dot, 0, 0, 1, 1, None);
    assert!((0 .. 1000).all(|x| wide.get_rgba(x, 0) == dot.get_rgba(0, 0)));
    assert!((0 .. 1000).all(|x| wide.get_rgba(x, 1) == BACKGROUND));
}

proptest! {
    #[test]
    fn blit_stays_inside_clip_and_source(
        (sw, sh) in (0 .. 10i32, 0 .. 10i32),
        (tw, th) in (1 .. 14i32, 1 .. 14i32),
        clip in (-4 .. 16i32, -4 .. 16i32, -4 .. 16i32, -4 .. 16i32),
        (dx, dy) in (-12 .. 16i32, -12 .. 16i32),
        (sx, sy) in (-12 .. 12i32, -12 .. 12i32),
        (w, h) in (-2 .. 20i32, -2 .. 20i32),
    ) {
        let src = pattern(sw, sh);
        let mut dst = target(tw, th, clip);
        dst.blit(dx, dy, &src, sx, sy, w, h);
        for y in 0 .. th {
            for x in 0 .. tw {
                let want = if w <= 0 || h <= 0 {
                    BACKGROUND
                } else {
                    expected(&dst, &src, x, y, (dx, dy, w, h), (sx, sy, w, h))
                };
                prop_assert_eq!(dst.get_rgba(x, y), want, "at ({},{})", x, y);
            }
        }
    }

    #[test]
    fn blit_ex_uses_floor_mapping(
        (sw, sh) in (1 .. 10i32, 1 .. 10i32),
        (tw, th) in (1 .. 14i32, 1 .. 14i32),
        clip in (-4 .. 16i32, -4 .. 16i32, -4 .. 16i32, -4 .. 16i32),
        (dx, dy) in (-12 .. 16i32, -12 .. 16i32),
        (dw, dh) in (1 .. 24i32, 1 .. 24i32),
        (sx, sy) in (-8 .. 10i32, -8 .. 10i32),
        (rw, rh) in (1 .. 14i32, 1 .. 14i32),
    ) {
        let src = pattern(sw, sh);
        let mut dst = target(tw, th, clip);
        dst.blit_ex(dx, dy, dw, dh, &src, sx, sy, rw, rh, None);
        for y in 0 .. th {
            for x in 0 .. tw {
                let want = expected(&dst, &src, x, y, (dx, dy, dw, dh), (sx, sy, rw, rh));
                prop_assert_eq!(dst.get_rgba(x, y), want, "at ({},{})", x, y);
            }
        }
    }
}
