//! Windows BMP
//!
//! Reads uncompressed 8 bit (palette) and 24 bit images with a
//! `BITMAPINFOHEADER` or later DIB header, writes 24 bit uncompressed.
//! Rows are stored bottom-up unless the height is negative, each row padded
//! to a multiple of four bytes.

use std::convert::TryFrom;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::bitmap::Bitmap;
use crate::codec::{le_i32, le_u16, le_u32, read_vec};
use crate::error::CodecError;

const FILE_HEADER_LEN: usize = 14;
const INFO_HEADER_LEN: usize = 40;
const PIXELS_PER_METER: i32 = 2835;

/// Bytes per row including padding
fn stride(w: usize, bpp: usize) -> usize {
    (w * bpp / 8 + 3) & !3
}

pub(crate) fn decode<R: Read + Seek>(r: &mut R) -> Result<Bitmap<'static>, CodecError> {
    let start = r.stream_position()?;
    let fh = read_vec(r, FILE_HEADER_LEN)?;
    if &fh[..2] != b"BM" {
        return Err(CodecError::BadMagic);
    }
    let data_offset = u64::from(le_u32(&fh, 10));

    let dib_len = le_u32(&read_vec(r, 4)?, 0) as usize;
    if dib_len < INFO_HEADER_LEN {
        return Err(CodecError::Unsupported(format!("bmp header of {} bytes", dib_len)));
    }
    let mut dib = vec![0; 4];
    dib.extend(read_vec(r, INFO_HEADER_LEN - 4)?);

    let width = le_i32(&dib, 4);
    let height = le_i32(&dib, 8);
    let bpp = le_u16(&dib, 14);
    let compression = le_u32(&dib, 16);
    let colors_used = le_u32(&dib, 32);
    log::debug!("bmp {}x{} bpp {} compression {}", width, height, bpp, compression);

    if compression != 0 {
        return Err(CodecError::Unsupported(format!("bmp compression {}", compression)));
    }
    if bpp != 8 && bpp != 24 {
        return Err(CodecError::Unsupported(format!("bmp depth {}", bpp)));
    }
    if width <= 0 || height == 0 || height == i32::MIN {
        return Err(CodecError::Unsupported(format!("bmp size {}x{}", width, height)));
    }
    let bottom_up = height > 0;
    let (w, h) = (width as usize, height.unsigned_abs() as usize);

    let palette = if bpp == 8 {
        let n = match colors_used {
            1 ..= 256 => colors_used as usize,
            _ => 256,
        };
        r.seek(SeekFrom::Start(start + (FILE_HEADER_LEN + dib_len) as u64))?;
        read_vec(r, n * 4)?
            .chunks_exact(4)
            .map(|q| [q[2], q[1], q[0]])
            .collect::<Vec<_>>()
    } else {
        Vec::new()
    };

    let too_large = || CodecError::Unsupported(format!("bmp of {}x{} pixels", w, h));
    let row_len = w.checked_mul(usize::from(bpp) / 8)
        .and_then(|n| n.checked_add(3))
        .map(|n| n & !3)
        .ok_or_else(too_large)?;
    let data_len = row_len.checked_mul(h).ok_or_else(too_large)?;

    // The header alone must not be able to trigger a large allocation
    let end = r.seek(SeekFrom::End(0))?;
    if (data_len as u64) > end.saturating_sub(start + data_offset) {
        log::debug!("bmp needs {} bytes of pixel data, stream ends at {}", data_len, end);
        return Err(CodecError::Truncated);
    }
    r.seek(SeekFrom::Start(start + data_offset))?;

    let out_len = w.checked_mul(h).and_then(|n| n.checked_mul(4)).ok_or_else(too_large)?;
    let mut row = Vec::new();
    row.try_reserve_exact(row_len).map_err(|_| too_large())?;
    row.resize(row_len, 0);
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(out_len).map_err(|_| too_large())?;
    for _ in 0 .. h {
        r.read_exact(&mut row).map_err(CodecError::from_read)?;
        if bpp == 8 {
            for &i in &row[.. w] {
                let [red, green, blue] = palette.get(usize::from(i)).copied().unwrap_or([0, 0, 0]);
                pixels.extend_from_slice(&[red, green, blue, 255]);
            }
        } else {
            for bgr in row[.. w * 3].chunks_exact(3) {
                pixels.extend_from_slice(&[bgr[2], bgr[1], bgr[0], 255]);
            }
        }
    }

    let mut bmp = Bitmap::from_rgba(width, height.abs(), pixels)
        .ok_or(CodecError::Truncated)?;
    if bottom_up {
        bmp.flip_vertical();
    }
    Ok(bmp)
}

pub(crate) fn encode<W: Write>(bmp: &Bitmap<'_>, mut out: W) -> Result<(), CodecError> {
    let (w, h) = (bmp.width() as usize, bmp.height() as usize);
    let row_len = stride(w, 24);
    let too_big = || CodecError::Unsupported(format!("bmp of {}x{} pixels", w, h));
    let image_len = row_len.checked_mul(h).ok_or_else(too_big)?;
    let file_len = u32::try_from(image_len + FILE_HEADER_LEN + INFO_HEADER_LEN)
        .map_err(|_| too_big())?;
    let image_len = image_len as u32;
    let data_offset = (FILE_HEADER_LEN + INFO_HEADER_LEN) as u32;

    let mut hdr = Vec::with_capacity(FILE_HEADER_LEN + INFO_HEADER_LEN);
    hdr.extend_from_slice(b"BM");
    hdr.extend_from_slice(&file_len.to_le_bytes());
    hdr.extend_from_slice(&0u32.to_le_bytes());
    hdr.extend_from_slice(&data_offset.to_le_bytes());
    hdr.extend_from_slice(&(INFO_HEADER_LEN as u32).to_le_bytes());
    hdr.extend_from_slice(&bmp.width().to_le_bytes());
    hdr.extend_from_slice(&bmp.height().to_le_bytes());
    hdr.extend_from_slice(&1u16.to_le_bytes());
    hdr.extend_from_slice(&24u16.to_le_bytes());
    hdr.extend_from_slice(&0u32.to_le_bytes());
    hdr.extend_from_slice(&image_len.to_le_bytes());
    hdr.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    hdr.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    hdr.extend_from_slice(&0u32.to_le_bytes());
    hdr.extend_from_slice(&0u32.to_le_bytes());
    out.write_all(&hdr)?;

    let mut row = vec![0u8; row_len];
    for y in (0 .. h).rev() {
        let src = bmp.buffer().row(y);
        for (d, s) in row.chunks_exact_mut(3).zip(src.chunks_exact(4)) {
            d.copy_from_slice(&[s[2], s[1], s[0]]);
        }
        out.write_all(&row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hand built 2x2 8 bit image with a two entry palette, bottom-up
    fn paletted() -> Vec<u8> {
        let mut v = Vec::new();
        v.extend_from_slice(b"BM");
        v.extend_from_slice(&(14 + 40 + 8 + 8u32).to_le_bytes());
        v.extend_from_slice(&0u32.to_le_bytes());
        v.extend_from_slice(&(14 + 40 + 8u32).to_le_bytes());
        v.extend_from_slice(&40u32.to_le_bytes());
        v.extend_from_slice(&2i32.to_le_bytes());
        v.extend_from_slice(&2i32.to_le_bytes());
        v.extend_from_slice(&1u16.to_le_bytes());
        v.extend_from_slice(&8u16.to_le_bytes());
        v.extend_from_slice(&[0u8; 16]);
        v.extend_from_slice(&2u32.to_le_bytes());
        v.extend_from_slice(&0u32.to_le_bytes());
        // palette, BGRX
        v.extend_from_slice(&[0x30, 0x20, 0x10, 0, 0xFF, 0xFF, 0xFF, 0]);
        // bottom row then top row, padded to 4 bytes
        v.extend_from_slice(&[1, 0, 0, 0]);
        v.extend_from_slice(&[0, 1, 0, 0]);
        v
    }

    #[test]
    fn stride_is_padded() {
        assert_eq!(stride(1, 24), 4);
        assert_eq!(stride(4, 24), 12);
        assert_eq!(stride(5, 8), 8);
    }

    #[test]
    fn decode_paletted() {
        let b = decode(&mut Cursor::new(paletted())).unwrap();
        assert_eq!((b.width(), b.height()), (2, 2));
        assert_eq!(b.get_rgba(0, 0), 0xFF102030);
        assert_eq!(b.get_rgba(1, 0), 0xFFFFFFFF);
        assert_eq!(b.get_rgba(0, 1), 0xFFFFFFFF);
        assert_eq!(b.get_rgba(1, 1), 0xFF102030);
    }

    #[test]
    fn encode_header_fields() {
        let mut out = Vec::new();
        encode(&Bitmap::new(3, 2), &mut out).unwrap();
        assert_eq!(out.len(), 54 + 12 * 2);
        assert_eq!(&out[..2], b"BM");
        assert_eq!(le_u32(&out, 2), 78);
        assert_eq!(le_u32(&out, 10), 54);
        assert_eq!(le_i32(&out, 18), 3);
        assert_eq!(le_u16(&out, 28), 24);
    }

    #[test]
    fn top_down_rows() {
        let mut src = Bitmap::new(2, 2);
        src.set(0, 0, 0xABCDEF);
        let mut out = Vec::new();
        encode(&src, &mut out).unwrap();
        // flip the stored rows and negate the height
        let (a, b) = out[54 ..].split_at(8);
        let mut flipped = out[.. 54].to_vec();
        flipped.extend_from_slice(b);
        flipped.extend_from_slice(a);
        flipped[22 .. 26].copy_from_slice(&(-2i32).to_le_bytes());
        let back = decode(&mut Cursor::new(flipped)).unwrap();
        assert_eq!(back.get(0, 0), 0xABCDEF);
        assert_eq!(back.get(0, 1), 0);
    }

    #[test]
    fn rejects_bad_input() {
        let mut v = paletted();
        v[28] = 16;
        assert!(matches!(decode(&mut Cursor::new(v)), Err(CodecError::Unsupported(_))));
        let mut v = paletted();
        v[30] = 1;
        assert!(matches!(decode(&mut Cursor::new(v)), Err(CodecError::Unsupported(_))));
        let mut v = paletted();
        v[0] = b'X';
        assert!(matches!(decode(&mut Cursor::new(v)), Err(CodecError::BadMagic)));
        let mut v = paletted();
        v.truncate(v.len() - 2);
        assert!(matches!(decode(&mut Cursor::new(v)), Err(CodecError::Truncated)));
        let mut v = paletted();
        v[18 .. 22].copy_from_slice(&0i32.to_le_bytes());
        assert!(matches!(decode(&mut Cursor::new(v)), Err(CodecError::Unsupported(_))));
    }

    #[test]
    fn huge_header_with_little_data_is_truncated() {
        let mut v = Vec::new();
        v.extend_from_slice(b"BM");
        v.extend_from_slice(&70u32.to_le_bytes());
        v.extend_from_slice(&0u32.to_le_bytes());
        v.extend_from_slice(&54u32.to_le_bytes());
        v.extend_from_slice(&40u32.to_le_bytes());
        v.extend_from_slice(&i32::MAX.to_le_bytes());
        v.extend_from_slice(&1i32.to_le_bytes());
        v.extend_from_slice(&1u16.to_le_bytes());
        v.extend_from_slice(&24u16.to_le_bytes());
        v.extend_from_slice(&[0u8; 24]);
        assert_eq!(v.len(), 54);
        v.extend_from_slice(&[0xAB; 16]);
        assert!(matches!(decode(&mut Cursor::new(v.clone())), Err(CodecError::Truncated)));

        // tall as well as wide; the byte count may not even fit a usize
        v[22 .. 26].copy_from_slice(&(-i32::MAX).to_le_bytes());
        assert!(matches!(decode(&mut Cursor::new(v.clone())),
                         Err(CodecError::Truncated) | Err(CodecError::Unsupported(_))));

        // pixel data offset past the end of the stream
        let mut v = paletted();
        v[10 .. 14].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(decode(&mut Cursor::new(v)), Err(CodecError::Truncated)));
    }
}
