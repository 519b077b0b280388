//! Rendering buffer

use std::ops::Index;
use std::ops::IndexMut;

/// Bytes per pixel; pixels are always stored as R, G, B, A
pub const BPP: usize = 4;

/// Backing memory of a buffer
#[derive(Debug)]
enum Storage<'a> {
    /// Allocated and released by the buffer
    Owned(Vec<u8>),
    /// Memory belonging to the caller, never released here
    Bound(&'a mut [u8]),
}

/// Rendering Buffer
///
/// Data is stored as row-major order (C-format), top row first, with
/// four bytes per pixel in R, G, B, A order
#[derive(Debug)]
pub struct RenderingBuffer<'a> {
    data: Storage<'a>,
    /// Image Width in pixels
    width: usize,
    /// Image Height in pixels
    height: usize,
}

impl RenderingBuffer<'static> {
    /// Create a new zero-filled buffer of width x height pixels
    ///
    /// Panics if the byte size does not fit in a usize
    pub fn new(width: usize, height: usize) -> Self {
        let n = width.checked_mul(height)
            .and_then(|n| n.checked_mul(BPP))
            .expect("bitmap dimensions overflow");
        RenderingBuffer { width, height, data: Storage::Owned(vec![0u8; n]) }
    }
    /// Wrap an existing RGBA vector
    ///
    /// Returns None if the vector is not exactly width * height * 4 bytes
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        if width.checked_mul(height)?.checked_mul(BPP)? != data.len() {
            return None;
        }
        Some(RenderingBuffer { width, height, data: Storage::Owned(data) })
    }
}

impl<'a> RenderingBuffer<'a> {
    /// Wrap caller owned memory
    ///
    /// Only the first width * height * 4 bytes are used
    ///
    /// # Panics
    ///
    /// If `data` is too small for the requested dimensions
    pub fn bind(width: usize, height: usize, data: &'a mut [u8]) -> Self {
        let n = width * height * BPP;
        assert!(data.len() >= n, "bound buffer holds {} bytes, {} needed", data.len(), n);
        RenderingBuffer { width, height, data: Storage::Bound(&mut data[..n]) }
    }
    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }
    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }
    /// Size of underlying Rendering Buffer in bytes
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }
    /// True if the buffer holds no pixels
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// True if the memory is owned by the caller
    pub fn is_bound(&self) -> bool {
        matches!(self.data, Storage::Bound(_))
    }
    /// Raw pixel bytes
    pub fn as_slice(&self) -> &[u8] {
        match self.data {
            Storage::Owned(ref v) => v.as_slice(),
            Storage::Bound(ref s) => &s[..],
        }
    }
    /// Raw pixel bytes, mutable
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match self.data {
            Storage::Owned(ref mut v) => v.as_mut_slice(),
            Storage::Bound(ref mut s) => &mut s[..],
        }
    }
    /// Return slice holding row `i`
    pub fn row(&self, i: usize) -> &[u8] {
        debug_assert!(i < self.height);
        let stride = self.width * BPP;
        &self.as_slice()[i * stride .. (i + 1) * stride]
    }
    /// Return mutable slice holding row `i`
    pub fn row_mut(&mut self, i: usize) -> &mut [u8] {
        debug_assert!(i < self.height);
        let stride = self.width * BPP;
        &mut self.as_mut_slice()[i * stride .. (i + 1) * stride]
    }
    /// Swap two rows in place
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let stride = self.width * BPP;
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (top, bottom) = self.as_mut_slice().split_at_mut(hi * stride);
        top[lo * stride .. (lo + 1) * stride].swap_with_slice(&mut bottom[.. stride]);
    }
    /// Set every pixel to `px`
    pub fn fill(&mut self, px: [u8; BPP]) {
        for chunk in self.as_mut_slice().chunks_exact_mut(BPP) {
            chunk.copy_from_slice(&px);
        }
    }
    /// Deep copy into an owning buffer
    pub fn to_owned_buffer(&self) -> RenderingBuffer<'static> {
        RenderingBuffer {
            width: self.width,
            height: self.height,
            data: Storage::Owned(self.as_slice().to_vec()),
        }
    }
    fn offset(&self, index: (usize, usize)) -> usize {
        assert!(index.0 < self.width, "request {} >= {} width :: index", index.0, self.width);
        assert!(index.1 < self.height, "request {} >= {} height :: index", index.1, self.height);
        ((index.1 * self.width) + index.0) * BPP
    }
}

impl<'a> Index<(usize,usize)> for RenderingBuffer<'a> {
    type Output = [u8];
    fn index(&self, index: (usize, usize)) -> &[u8] {
        let i = self.offset(index);
        &self.as_slice()[i .. i + BPP]
    }
}
impl<'a> IndexMut<(usize,usize)> for RenderingBuffer<'a> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut [u8] {
        let i = self.offset(index);
        &mut self.as_mut_slice()[i .. i + BPP]
    }
}
