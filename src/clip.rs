//! Clipping Region

/// Rectangle
///
/// `x0`,`y0` are inclusive, `x1`,`y1` are exclusive
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq)]
pub struct Rectangle {
    /// Minimum x value
    pub x0: i32,
    /// Minimum y value
    pub y0: i32,
    /// Maximum x value, exclusive
    pub x1: i32,
    /// Maximum y value, exclusive
    pub y1: i32,
}

impl Rectangle {
    /// Create a new Rectangle
    ///
    /// Values are sorted before storing
    ///
    ///     use bitmap::Rectangle;
    ///
    ///     let r = Rectangle::new(10, 8, 2, 4);
    ///     assert_eq!(r, Rectangle { x0: 2, y0: 4, x1: 10, y1: 8 });
    ///
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let (x0, x1) = if x0 > x1 { (x1,x0) } else { (x0,x1) };
        let (y0, y1) = if y0 > y1 { (y1,y0) } else { (y0,y1) };
        Self { x0, y0, x1, y1 }
    }
    /// Rectangle covering a whole `w` x `h` image
    pub fn full(w: i32, h: i32) -> Self {
        Self { x0: 0, y0: 0, x1: w, y1: h }
    }
    /// Sort the corners and clamp them into `[0,w] x [0,h]`
    pub fn normalized(x0: i32, y0: i32, x1: i32, y1: i32, w: i32, h: i32) -> Self {
        let r = Self::new(x0, y0, x1, y1);
        Self {
            x0: r.x0.max(0).min(w),
            y0: r.y0.max(0).min(h),
            x1: r.x1.max(0).min(w),
            y1: r.y1.max(0).min(h),
        }
    }
    /// Width of the rectangle
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }
    /// Height of the rectangle
    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
    /// True if the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
    /// True if the point (x,y) lies inside
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}
