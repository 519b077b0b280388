//! ZSoft PCX, version 5
//!
//! 8 bits per plane, RLE encoded. One plane images carry a 256 color palette
//! after the pixel data (a 0x0C marker followed by 768 RGB bytes), three
//! plane images store each scanline as red, green and blue planes.
//!
//! The encoder always writes one plane. Its palette is built while encoding:
//! it is seeded from 128 randomly sampled pixels, grows with every new color
//! until 256 entries are in use and from then on maps unseen colors to the
//! nearest entry. No dithering is done.

use std::collections::HashMap;
use std::io::{BufReader, Read, Seek, SeekFrom, Write};

use crate::bitmap::Bitmap;
use crate::codec::{le_u16, read_vec};
use crate::error::CodecError;
use crate::palette::nearest;

const HEADER_LEN: usize = 128;
const MANUFACTURER: u8 = 0x0A;
const VERSION: u8 = 5;
const RLE: u8 = 1;
const PALETTE_MARKER: u8 = 0x0C;
const PALETTE_LEN: usize = 768;
const MAX_RUN: usize = 63;
const SEED_SAMPLES: usize = 128;
const DPI: u16 = 72;

/// Xorshift64 with shifts (13, 7, 17)
#[derive(Debug,Clone)]
struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    fn new() -> Self {
        Xorshift64 { state: Self::SEED }
    }
    fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }
    fn next_usize(&mut self, max: usize) -> usize {
        (self.next_u64() % max as u64) as usize
    }
}

/// Expands RLE packets, runs may span scanlines
struct RleReader<R> {
    inner: R,
    value: u8,
    left: usize,
}

impl<R: Read> RleReader<R> {
    fn new(inner: R) -> Self {
        RleReader { inner, value: 0, left: 0 }
    }
    fn byte(&mut self) -> Result<u8, CodecError> {
        let mut b = [0u8; 1];
        self.inner.read_exact(&mut b).map_err(CodecError::from_read)?;
        Ok(b[0])
    }
    fn fill(&mut self, out: &mut [u8]) -> Result<(), CodecError> {
        for o in out.iter_mut() {
            while self.left == 0 {
                let c = self.byte()?;
                if c & 0xC0 == 0xC0 {
                    self.left = usize::from(c & 0x3F);
                    self.value = self.byte()?;
                } else {
                    self.left = 1;
                    self.value = c;
                }
            }
            *o = self.value;
            self.left -= 1;
        }
        Ok(())
    }
}

pub(crate) fn decode<R: Read + Seek>(r: &mut R) -> Result<Bitmap<'static>, CodecError> {
    let hdr = read_vec(r, HEADER_LEN)?;
    if hdr[0] != MANUFACTURER {
        return Err(CodecError::BadMagic);
    }
    let (version, encoding, bpp, planes) = (hdr[1], hdr[2], hdr[3], hdr[65]);
    let (xmin, ymin) = (le_u16(&hdr, 4), le_u16(&hdr, 6));
    let (xmax, ymax) = (le_u16(&hdr, 8), le_u16(&hdr, 10));
    let bytes_per_line = usize::from(le_u16(&hdr, 66));
    log::debug!("pcx v{} window ({},{})-({},{}) planes {} bpl {}",
                version, xmin, ymin, xmax, ymax, planes, bytes_per_line);

    if version != VERSION || encoding != RLE || bpp != 8 {
        return Err(CodecError::Unsupported(
            format!("pcx version {} encoding {} depth {}", version, encoding, bpp)));
    }
    if planes != 1 && planes != 3 {
        return Err(CodecError::Unsupported(format!("pcx with {} planes", planes)));
    }
    if xmax < xmin || ymax < ymin {
        return Err(CodecError::Unsupported("pcx window".into()));
    }
    let w = usize::from(xmax - xmin) + 1;
    let h = usize::from(ymax - ymin) + 1;
    if bytes_per_line < w {
        return Err(CodecError::Unsupported(format!("pcx line of {} bytes for width {}", bytes_per_line, w)));
    }

    let planes = usize::from(planes);
    let line_len = bytes_per_line * planes;

    // A packet expands to at most MAX_RUN bytes, so a short stream cannot
    // hold the scanlines the header asks for
    let here = r.stream_position()?;
    let end = r.seek(SeekFrom::End(0))?;
    r.seek(SeekFrom::Start(here))?;
    let need = line_len as u64 * h as u64;
    if need > end.saturating_sub(here).saturating_mul(MAX_RUN as u64) {
        log::debug!("pcx needs {} bytes of scanlines, stream ends at {}", need, end);
        return Err(CodecError::Truncated);
    }

    let too_large = || CodecError::Unsupported(format!("pcx of {}x{} pixels", w, h));
    let raw_len = w.checked_mul(h)
        .and_then(|n| n.checked_mul(if planes == 1 { 1 } else { 4 }))
        .ok_or_else(too_large)?;
    let mut line = Vec::new();
    line.try_reserve_exact(line_len).map_err(|_| too_large())?;
    line.resize(line_len, 0);
    let mut raw = Vec::new();
    raw.try_reserve_exact(raw_len).map_err(|_| too_large())?;
    {
        let mut rle = RleReader::new(BufReader::new(&mut *r));
        for _ in 0 .. h {
            rle.fill(&mut line)?;
            if planes == 1 {
                raw.extend_from_slice(&line[.. w]);
            } else {
                for x in 0 .. w {
                    raw.extend_from_slice(&[
                        line[x],
                        line[bytes_per_line + x],
                        line[2 * bytes_per_line + x],
                        255,
                    ]);
                }
            }
        }
    }

    let pixels = if planes == 1 {
        r.seek(SeekFrom::End(-((PALETTE_LEN + 1) as i64))).map_err(|_| CodecError::Truncated)?;
        let pal = read_vec(r, PALETTE_LEN + 1)?;
        if pal[0] != PALETTE_MARKER {
            log::warn!("pcx: missing palette marker");
            return Err(CodecError::Unsupported("pcx without palette".into()));
        }
        let pal = &pal[1 ..];
        let mut px = Vec::new();
        raw.len().checked_mul(4)
            .and_then(|n| px.try_reserve_exact(n).ok())
            .ok_or_else(too_large)?;
        for &i in &raw {
            let i = usize::from(i) * 3;
            px.extend_from_slice(&[pal[i], pal[i + 1], pal[i + 2], 255]);
        }
        px
    } else {
        raw
    };
    Bitmap::from_rgba(w as i32, h as i32, pixels).ok_or(CodecError::Truncated)
}

/// Palette grown while encoding
struct PaletteBuilder {
    colors: Vec<u32>,
    index: HashMap<u32, u8>,
}

impl PaletteBuilder {
    fn new() -> Self {
        PaletteBuilder { colors: Vec::with_capacity(256), index: HashMap::new() }
    }
    /// Add `c` if there is room; true if it is in the palette afterwards
    fn insert(&mut self, c: u32) -> bool {
        if self.colors.iter().any(|&p| p == c) {
            return true;
        }
        if self.colors.len() == 256 {
            return false;
        }
        self.index.insert(c, self.colors.len() as u8);
        self.colors.push(c);
        true
    }
    fn lookup(&mut self, c: u32) -> u8 {
        if let Some(&i) = self.index.get(&c) {
            return i;
        }
        if self.insert(c) {
            return self.index[&c];
        }
        let i = nearest(&self.colors, c)
            .and_then(|n| self.colors.iter().position(|&p| p == n))
            .unwrap_or(0) as u8;
        self.index.insert(c, i);
        i
    }
}

fn rle_line(line: &[u8], out: &mut Vec<u8>) {
    let mut i = 0;
    while i < line.len() {
        let v = line[i];
        let n = line[i ..].iter().take(MAX_RUN).take_while(|&&b| b == v).count();
        if n > 1 || v & 0xC0 == 0xC0 {
            out.push(0xC0 | n as u8);
        }
        out.push(v);
        i += n;
    }
}

pub(crate) fn encode<W: Write>(bmp: &Bitmap<'_>, mut out: W) -> Result<(), CodecError> {
    let (w, h) = (bmp.width() as usize, bmp.height() as usize);
    if w == 0 || h == 0 || w > 0xFFFE || h > 0x1_0000 {
        return Err(CodecError::Unsupported(format!("pcx of {}x{} pixels", w, h)));
    }
    let bytes_per_line = (w + 1) & !1;

    let mut pal = PaletteBuilder::new();
    let mut rng = Xorshift64::new();
    for _ in 0 .. SEED_SAMPLES {
        let x = rng.next_usize(w) as i32;
        let y = rng.next_usize(h) as i32;
        pal.insert(bmp.get(x, y));
    }

    let mut hdr = vec![0u8; HEADER_LEN];
    hdr[.. 4].copy_from_slice(&[MANUFACTURER, VERSION, RLE, 8]);
    hdr[8 .. 10].copy_from_slice(&((w - 1) as u16).to_le_bytes());
    hdr[10 .. 12].copy_from_slice(&((h - 1) as u16).to_le_bytes());
    hdr[12 .. 14].copy_from_slice(&DPI.to_le_bytes());
    hdr[14 .. 16].copy_from_slice(&DPI.to_le_bytes());
    hdr[65] = 1;
    hdr[66 .. 68].copy_from_slice(&(bytes_per_line as u16).to_le_bytes());
    hdr[68 .. 70].copy_from_slice(&1u16.to_le_bytes());
    out.write_all(&hdr)?;

    let mut line = vec![0u8; bytes_per_line];
    let mut packed = Vec::with_capacity(bytes_per_line * 2);
    for y in 0 .. h {
        for (x, slot) in line[.. w].iter_mut().enumerate() {
            *slot = pal.lookup(bmp.get(x as i32, y as i32));
        }
        packed.clear();
        rle_line(&line, &mut packed);
        out.write_all(&packed)?;
    }
    log::debug!("pcx palette of {} colors", pal.colors.len());

    let mut tail = vec![0u8; PALETTE_LEN + 1];
    tail[0] = PALETTE_MARKER;
    for (rgb, &c) in tail[1 ..].chunks_exact_mut(3).zip(pal.colors.iter()) {
        rgb.copy_from_slice(&[(c >> 16) as u8, (c >> 8) as u8, c as u8]);
    }
    out.write_all(&tail)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn header(planes: u8, w: u16, h: u16, bpl: u16) -> Vec<u8> {
        let mut hdr = vec![0u8; HEADER_LEN];
        hdr[.. 4].copy_from_slice(&[MANUFACTURER, VERSION, RLE, 8]);
        hdr[8 .. 10].copy_from_slice(&(w - 1).to_le_bytes());
        hdr[10 .. 12].copy_from_slice(&(h - 1).to_le_bytes());
        hdr[65] = planes;
        hdr[66 .. 68].copy_from_slice(&bpl.to_le_bytes());
        hdr
    }

    #[test]
    fn rle_packets() {
        let mut out = Vec::new();
        rle_line(&[5, 5, 5, 7, 0xC3, 0xC3], &mut out);
        assert_eq!(out, vec![0xC3, 5, 7, 0xC2, 0xC3]);
        out.clear();
        rle_line(&[0xD0], &mut out);
        assert_eq!(out, vec![0xC1, 0xD0]);
        out.clear();
        rle_line(&[9; 70], &mut out);
        assert_eq!(out, vec![0xFF, 9, 0xC7, 9]);
    }

    #[test]
    fn runs_span_lines() {
        let mut r = RleReader::new(Cursor::new(vec![0xC4, 1, 2]));
        let mut a = [0u8; 3];
        let mut b = [0u8; 2];
        r.fill(&mut a).unwrap();
        r.fill(&mut b).unwrap();
        assert_eq!(a, [1, 1, 1]);
        assert_eq!(b, [1, 2]);
        assert!(matches!(r.fill(&mut b), Err(CodecError::Truncated)));
    }

    #[test]
    fn decode_three_planes() {
        let mut v = header(3, 1, 1, 2);
        v.extend_from_slice(&[0x11, 0, 0x22, 0, 0x33, 0]);
        let b = decode(&mut Cursor::new(v)).unwrap();
        assert_eq!(b.get_rgba(0, 0), 0xFF112233);
    }

    #[test]
    fn decode_one_plane() {
        let mut v = header(1, 2, 1, 2);
        v.extend_from_slice(&[0, 1]);
        v.push(PALETTE_MARKER);
        let mut pal = vec![0u8; PALETTE_LEN];
        pal[3 .. 6].copy_from_slice(&[0xAA, 0xBB, 0xCC]);
        v.extend_from_slice(&pal);
        let b = decode(&mut Cursor::new(v)).unwrap();
        assert_eq!(b.get(0, 0), 0x000000);
        assert_eq!(b.get(1, 0), 0xAABBCC);
    }

    #[test]
    fn decode_rejects() {
        let mut v = header(4, 1, 1, 2);
        v.extend_from_slice(&[0; 8]);
        assert!(matches!(decode(&mut Cursor::new(v)), Err(CodecError::Unsupported(_))));
        let mut v = header(3, 4, 1, 2);
        v.extend_from_slice(&[0; 24]);
        assert!(matches!(decode(&mut Cursor::new(v)), Err(CodecError::Unsupported(_))));
        let mut v = header(3, 1, 1, 2);
        v[1] = 3;
        assert!(matches!(decode(&mut Cursor::new(v)), Err(CodecError::Unsupported(_))));
        let v = header(3, 2, 2, 2);
        assert!(matches!(decode(&mut Cursor::new(v)), Err(CodecError::Truncated)));
        let mut v = header(1, 1, 1, 2);
        v.extend_from_slice(&[0, 0]);
        assert!(decode(&mut Cursor::new(v)).is_err());
    }

    #[test]
    fn huge_window_needs_matching_data() {
        let mut v = header(3, 0xFFFF, 0xFFFF, 0xFFFF);
        v.extend_from_slice(&[0xFF, 0, 0xFF, 0, 0xFF, 0]);
        assert!(matches!(decode(&mut Cursor::new(v)), Err(CodecError::Truncated)));

        // 63 bytes from a single packet is still accepted
        let mut v = header(1, 63, 1, 63);
        v.extend_from_slice(&[0xFF, 1]);
        v.push(PALETTE_MARKER);
        v.extend_from_slice(&[0x40; PALETTE_LEN]);
        let b = decode(&mut Cursor::new(v)).unwrap();
        assert_eq!(b.width(), 63);
        assert_eq!(b.get(62, 0), 0x404040);
    }

    #[test]
    fn palette_fills_then_falls_back() {
        let mut p = PaletteBuilder::new();
        for c in 0 .. 256u32 {
            assert_eq!(p.lookup(c * 0x10101), c as u8);
        }
        assert_eq!(p.colors.len(), 256);
        // full: an unseen color maps to the closest entry
        assert_eq!(p.lookup(0x010203), 2);
    }

    #[test]
    fn few_colors_survive_exactly() {
        let mut b = Bitmap::new(5, 3);
        b.set(0, 0, 0xFF0000);
        b.set(4, 2, 0x00FF00);
        b.set(2, 1, 0xC0C0C0);
        let mut out = Vec::new();
        encode(&b, &mut out).unwrap();
        assert_eq!(out[out.len() - PALETTE_LEN - 1], PALETTE_MARKER);
        let back = decode(&mut Cursor::new(out)).unwrap();
        assert_eq!((back.width(), back.height()), (5, 3));
        for y in 0 .. 3 {
            for x in 0 .. 5 {
                assert_eq!(back.get(x, y), b.get(x, y));
            }
        }
    }

    #[test]
    fn encode_rejects_empty() {
        let b = Bitmap::new(0, 3);
        assert!(encode(&b, Vec::new()).is_err());
    }
}
