
extern crate bitmap;
use bitmap::{Bitmap, Rgba8};

#[test]
fn create_fill_and_read_back() {
    let mut b = Bitmap::new(10, 10);
    b.set_color(0xFF0000);
    b.fillrect(2, 2, 7, 7);
    assert_eq!(b.get_rgba(4, 4), 0xFFFF0000);
    assert_eq!(b.get_rgba(0, 0), 0x00000000);
    assert_eq!(b.get(7, 7), 0xFF0000);
    assert_eq!(b.get(8, 8), 0);
    b.fillrect(9, 9, 8, 8);
    assert_eq!(b.get(9, 9), 0xFF0000);
}

#[test]
fn zero_sized_bitmaps() {
    let mut b = Bitmap::new(0, 0);
    assert!(b.data().is_empty());
    b.line(0, 0, 5, 5);
    b.fillcircle(0, 0, 3);
    b.fill(0, 0);
    b.clear();
    b.flip_vertical();
    assert_eq!(b.count_colors(), 0);
    let c = b.copy();
    assert_eq!((c.width(), c.height()), (0, 0));
}

#[test]
#[should_panic]
fn negative_size_panics() {
    let _ = Bitmap::new(-1, 4);
}

#[test]
fn bind_draws_into_caller_memory() {
    let mut mem = vec![0u8; 4 * 3 * 4];
    {
        let mut b = Bitmap::bind(4, 3, &mut mem);
        assert!(b.is_bound());
        b.set_color(0x0A0B0C);
        b.line(0, 2, 3, 2);
        b.unbind();
    }
    let last = &mem[2 * 16 ..];
    assert!(last.chunks(4).all(|p| p == [0x0A, 0x0B, 0x0C, 0xFF]));
    assert!(mem[.. 2 * 16].iter().all(|&v| v == 0));
}

#[test]
fn bind_ignores_extra_memory() {
    let mut mem = vec![7u8; 2 * 2 * 4 + 5];
    {
        let mut b = Bitmap::bind(2, 2, &mut mem);
        assert_eq!(b.data().len(), 16);
        b.set_pen(Rgba8::new(0, 0, 0, 0));
        b.clear();
    }
    assert!(mem[.. 16].iter().all(|&v| v == 0));
    assert!(mem[16 ..].iter().all(|&v| v == 7));
}

#[test]
#[should_panic]
fn bind_short_memory_panics() {
    let mut mem = vec![0u8; 15];
    let _ = Bitmap::bind(2, 2, &mut mem);
}

#[test]
fn copy_of_bound_bitmap_owns_its_pixels() {
    let mut mem = vec![0u8; 2 * 2 * 4];
    let mut b = Bitmap::bind(2, 2, &mut mem);
    b.set(0, 0, 0xFFFFFF);
    let mut c = b.copy();
    assert!(!c.is_bound());
    c.set(0, 0, 0x000000);
    assert_eq!(b.get(0, 0), 0xFFFFFF);
    assert!(c.puts(0, 0, "x"));
}

#[test]
fn pen_accessors() {
    let mut b = Bitmap::new(1, 1);
    b.set_color_rgb(1, 2, 3);
    b.set_alpha(4);
    assert_eq!(b.color(), 0x010203);
    assert_eq!(b.alpha(), 4);
    assert_eq!(b.pen(), Rgba8::new(1, 2, 3, 4));
    b.set_color(bitmap::atoi("navy"));
    assert_eq!(b.pen(), Rgba8::new(0, 0, 0x80, 4));
    b.clear();
    assert_eq!(b.get_rgba(0, 0), 0x04000080);
}

#[test]
fn data_mut_is_rgba_row_major() {
    let mut b = Bitmap::new(2, 2);
    b.data_mut()[12 .. 16].copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(b.get_rgba(1, 1), 0x04010203);
    assert_eq!(b.try_get(1, 1), Some(Rgba8::new(1, 2, 3, 4)));
    assert_eq!(b.buffer().row(1)[4 .. 8], [1, 2, 3, 4]);
}
