
extern crate bitmap;
use bitmap::Bitmap;

fn noise(w: i32, h: i32) -> Bitmap<'static> {
    let mut b = Bitmap::new(w, h);
    let mut s: u32 = 0x2545_F491;
    for y in 0 .. h {
        for x in 0 .. w {
            s ^= s << 13;
            s ^= s >> 17;
            s ^= s << 5;
            b.set_rgba(x, y, s);
        }
    }
    b
}

#[test]
fn identity_resampling_is_exact() {
    let b = noise(9, 7);
    assert_eq!(b.resample(9, 7).data(), b.data());
    assert_eq!(b.resample_blin(9, 7).data(), b.data());
    assert_eq!(b.resample_bcub(9, 7).data(), b.data());
}

#[test]
fn sizes_follow_request() {
    let b = noise(5, 5);
    for r in &[b.resample(13, 2), b.resample_blin(13, 2), b.resample_bcub(13, 2)] {
        assert_eq!((r.width(), r.height()), (13, 2));
    }
}

#[test]
fn integer_upscale_keeps_sample_points() {
    let b = noise(4, 3);
    let n = b.resample(8, 6);
    let l = b.resample_blin(8, 6);
    let c = b.resample_bcub(8, 6);
    for y in 0 .. 3 {
        for x in 0 .. 4 {
            assert_eq!(n.get_rgba(2 * x, 2 * y), b.get_rgba(x, y));
            assert_eq!(n.get_rgba(2 * x + 1, 2 * y + 1), b.get_rgba(x, y));
            assert_eq!(l.get_rgba(2 * x, 2 * y), b.get_rgba(x, y));
            assert_eq!(c.get_rgba(2 * x, 2 * y), b.get_rgba(x, y));
        }
    }
}

#[test]
fn source_is_untouched() {
    let b = noise(6, 6);
    let before = b.data().to_vec();
    let _ = b.resample_bcub(3, 3);
    let _ = b.resample_blin(12, 1);
    assert_eq!(b.data(), &before[..]);
}

#[test]
fn downscale_averages() {
    let mut b = Bitmap::new(4, 1);
    b.set(0, 0, 0xFFFFFF);
    b.set(2, 0, 0xFFFFFF);
    let r = b.resample_bcub(2, 1);
    let v = r.get(0, 0) & 0xFF;
    assert!(v > 0 && v < 0xFF, "got {:#x}", v);
}
