//! Colors
//!
//! Packed colors follow two layouts: `0xRRGGBB` where only the color matters
//! and `0xAARRGGBB` where alpha travels with it.

use crate::color_names::COLOR_NAMES;

/// Color as Red, Green, Blue, and Alpha
#[derive(Debug,Default,Copy,Clone,PartialEq,Eq,Hash)]
pub struct Rgba8 {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba8 {
    /// White Color (255,255,255,255)
    pub fn white() -> Self {
        Self::new(255,255,255,255)
    }
    /// Black Color (0,0,0,255)
    pub fn black() -> Self {
        Self::new(0,0,0,255)
    }
    /// Create new color
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba8 { r, g, b, a }
    }
    /// Create an opaque color from `0xRRGGBB`
    ///
    ///     use bitmap::Rgba8;
    ///     assert_eq!(Rgba8::from_rgb(0x102030), Rgba8::new(0x10,0x20,0x30,255));
    ///
    pub fn from_rgb(c: u32) -> Self {
        Self::new((c >> 16) as u8, (c >> 8) as u8, c as u8, 255)
    }
    /// Create a color from `0xAARRGGBB`
    pub fn from_argb(c: u32) -> Self {
        Self::new((c >> 16) as u8, (c >> 8) as u8, c as u8, (c >> 24) as u8)
    }
    /// Pack as `0xRRGGBB`, dropping alpha
    pub fn to_rgb(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
    /// Pack as `0xAARRGGBB`
    pub fn to_argb(self) -> u32 {
        (u32::from(self.a) << 24) | self.to_rgb()
    }
    /// Read a color from the first four bytes of an RGBA pixel
    #[inline]
    pub fn from_slice(p: &[u8]) -> Self {
        Self::new(p[0], p[1], p[2], p[3])
    }
    /// Bytes in buffer order
    #[inline]
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
    /// Compare red, green and blue, ignoring alpha
    #[inline]
    pub fn rgb_eq(&self, other: &Rgba8) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }
}

impl From<u32> for Rgba8 {
    /// Interprets the value as `0xAARRGGBB`
    fn from(c: u32) -> Rgba8 {
        Rgba8::from_argb(c)
    }
}
impl From<Rgba8> for u32 {
    fn from(c: Rgba8) -> u32 {
        c.to_argb()
    }
}

/// Parse a color description
///
/// Accepted forms, tried in order:
/// - `RGB(r,g,b)` with decimal components
/// - a color name such as `red` or `Light Goldenrod Yellow`
///   (case and white space are ignored)
/// - `#RGB`, `#RRGGBB`
/// - bare hexadecimal digits, optionally prefixed by `0x`
///
/// Anything else yields `0` (black); parsing never fails.
///
///     use bitmap::atoi;
///     assert_eq!(atoi("red"), 0xFF0000);
///     assert_eq!(atoi("#0fb"), 0x00FFBB);
///     assert_eq!(atoi("RGB(1,2,3)"), 0x010203);
///     assert_eq!(atoi("not-a-color"), 0);
///
pub fn atoi(text: &str) -> u32 {
    let text = text.trim();
    if let Some(c) = parse_rgb_function(text) {
        return c;
    }
    if let Some(c) = lookup_name(text) {
        return c;
    }
    parse_hex(text)
}

fn parse_rgb_function(text: &str) -> Option<u32> {
    match text.get(..3) {
        Some(p) if p.eq_ignore_ascii_case("rgb") => {}
        _ => return None,
    }
    let rest = text[3..].trim_start();
    let rest = rest.strip_prefix('(').unwrap_or(rest);
    let rest = rest.split(')').next().unwrap_or("");
    let mut c = [0u32; 3];
    for (slot, part) in c.iter_mut().zip(rest.split(',')) {
        let v = part.trim().parse::<i64>().unwrap_or(0);
        *slot = v.max(0).min(255) as u32;
    }
    Some((c[0] << 16) | (c[1] << 8) | c[2])
}

/// Look up a color by name; case and white space are ignored
///
///     use bitmap::color::lookup_name;
///     assert_eq!(lookup_name("Cornflower Blue"), Some(0x6495ED));
///     assert_eq!(lookup_name("EGA Brown"), Some(0xAA5500));
///     assert_eq!(lookup_name("nope"), None);
///
pub fn lookup_name(text: &str) -> Option<u32> {
    let key: String = text.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if key.is_empty() {
        return None;
    }
    COLOR_NAMES.binary_search_by(|&(name, _)| name.cmp(key.as_str()))
        .ok()
        .map(|i| COLOR_NAMES[i].1)
}

fn parse_hex(text: &str) -> u32 {
    let (digits, hash) = match text.strip_prefix('#') {
        Some(rest) => (rest, true),
        None => {
            let rest = text.strip_prefix("0x")
                .or_else(|| text.strip_prefix("0X"))
                .unwrap_or(text);
            (rest, false)
        }
    };
    let nibbles: Vec<u32> = digits.chars()
        .map_while(|c| c.to_digit(16))
        .take(8)
        .collect();
    if hash && nibbles.len() == 3 {
        return nibbles.iter().fold(0, |acc, &n| (acc << 8) | (n << 4) | n);
    }
    nibbles.iter().fold(0, |acc, &n| (acc << 4) | n)
}

fn channels(c: u32) -> [u32; 4] {
    [(c >> 24) & 0xFF, (c >> 16) & 0xFF, (c >> 8) & 0xFF, c & 0xFF]
}
fn pack(ch: [u32; 4]) -> u32 {
    (ch[0] << 24) | (ch[1] << 16) | (ch[2] << 8) | ch[3]
}

/// Linear interpolation between two packed colors
///
/// All four bytes are interpolated; `t <= 0` returns `c1` and `t >= 1`
/// returns `c2`
///
///     use bitmap::lerp;
///     assert_eq!(lerp(0x000000, 0xFF0080, 0.5), 0x7F0040);
///     assert_eq!(lerp(0x123456, 0xFFFFFF, -1.0), 0x123456);
///
pub fn lerp(c1: u32, c2: u32, t: f64) -> u32 {
    if t.is_nan() || t <= 0.0 {
        return c1;
    }
    if t >= 1.0 {
        return c2;
    }
    let (a, b) = (channels(c1), channels(c2));
    let mut out = [0u32; 4];
    for i in 0 .. 4 {
        let v = f64::from(a[i]) + (f64::from(b[i]) - f64::from(a[i])) * t;
        out[i] = v.max(0.0).min(255.0) as u32;
    }
    pack(out)
}

/// Scale red, green and blue by `adj`, clamping to 255
///
/// The alpha byte is kept as is
///
///     use bitmap::brightness;
///     assert_eq!(brightness(0x804020, 2.0), 0xFF8040);
///     assert_eq!(brightness(0xFF804020, 0.5), 0xFF402010);
///
pub fn brightness(c: u32, adj: f64) -> u32 {
    let mut ch = channels(c);
    let adj = adj.max(0.0);
    for v in ch[1..].iter_mut() {
        *v = (f64::from(*v) * adj).min(255.0) as u32;
    }
    pack(ch)
}

/// Euclidean distance between the RGB parts of two packed colors
pub fn distance(c1: u32, c2: u32) -> f64 {
    let (a, b) = (channels(c1), channels(c2));
    (1 .. 4)
        .map(|i| f64::from(a[i]) - f64::from(b[i]))
        .map(|d| d * d)
        .sum::<f64>()
        .sqrt()
}
