//! Loading and saving bitmaps
//!
//! Loads sniff the first two bytes of the stream and rewind before handing
//! it to the decoder:
//!
//!    "BM"        BMP
//!    FF D8       JPEG
//!    0A          PCX
//!    otherwise   PNG
//!
//! Saves pick the format from the file extension. BMP and PCX are handled
//! here; PNG and JPEG go through the `image` crate and are only available
//! with the `png` / `jpeg` features.

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::bitmap::Bitmap;
use crate::error::CodecError;
use crate::{bmp, imagecodec, pcx};

/// File formats understood by [Bitmap::load] and [Bitmap::save]
///
/// [Bitmap::load]: ../bitmap/struct.Bitmap.html#method.load
/// [Bitmap::save]: ../bitmap/struct.Bitmap.html#method.save
#[derive(Debug,Copy,Clone,PartialEq,Eq)]
pub enum ImageFormat {
    Bmp,
    Pcx,
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Format named by the extension of `path`, ignoring case
    ///
    ///     use bitmap::ImageFormat;
    ///     assert_eq!(ImageFormat::from_path("a/b.JPG"), Some(ImageFormat::Jpeg));
    ///     assert_eq!(ImageFormat::from_path("noext"), None);
    ///
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "bmp" => Some(ImageFormat::Bmp),
            "pcx" => Some(ImageFormat::Pcx),
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }
    /// Short lower case name
    pub fn name(self) -> &'static str {
        match self {
            ImageFormat::Bmp => "bmp",
            ImageFormat::Pcx => "pcx",
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }
}

/// Guess the format of the stream from its first two bytes
///
/// The stream is left where it was
///
///     use std::io::Cursor;
///     use bitmap::{sniff, ImageFormat};
///
///     let mut c = Cursor::new(b"BM....".to_vec());
///     assert_eq!(sniff(&mut c).unwrap(), ImageFormat::Bmp);
///     assert_eq!(c.position(), 0);
///
pub fn sniff<R: Read + Seek>(r: &mut R) -> Result<ImageFormat, CodecError> {
    let pos = r.stream_position()?;
    let mut magic = Vec::with_capacity(2);
    r.by_ref().take(2).read_to_end(&mut magic)?;
    r.seek(SeekFrom::Start(pos))?;
    let format = match magic.as_slice() {
        [b'B', b'M'] => ImageFormat::Bmp,
        [0xFF, 0xD8] => ImageFormat::Jpeg,
        [0x0A, ..] => ImageFormat::Pcx,
        _ => ImageFormat::Png,
    };
    Ok(format)
}

#[inline]
pub(crate) fn le_u16(b: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([b[off], b[off + 1]])
}
#[inline]
pub(crate) fn le_u32(b: &[u8], off: usize) -> u32 {
    u32::from_le_bytes([b[off], b[off + 1], b[off + 2], b[off + 3]])
}
#[inline]
pub(crate) fn le_i32(b: &[u8], off: usize) -> i32 {
    le_u32(b, off) as i32
}

/// Read exactly `n` bytes; running out of input is [CodecError::Truncated]
///
/// [CodecError::Truncated]: ../error/enum.CodecError.html#variant.Truncated
pub(crate) fn read_vec<R: Read>(r: &mut R, n: usize) -> Result<Vec<u8>, CodecError> {
    let mut buf = vec![0u8; n];
    r.read_exact(&mut buf).map_err(CodecError::from_read)?;
    Ok(buf)
}

impl Bitmap<'static> {
    /// Load a bitmap from a file
    ///
    /// # Errors
    ///
    /// Any failure to open or decode the file; nothing is left allocated
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CodecError> {
        let path = path.as_ref();
        log::debug!("loading {}", path.display());
        let mut f = File::open(path)?;
        Self::load_file(&mut f)
    }
    /// Load a bitmap from an open file, starting at its current position
    pub fn load_file(f: &mut File) -> Result<Self, CodecError> {
        Self::load_reader(&mut BufReader::new(f))
    }
    /// Load a bitmap from any seekable stream, starting at its current
    /// position
    pub fn load_reader<R: Read + Seek>(r: &mut R) -> Result<Self, CodecError> {
        let format = sniff(r)?;
        log::debug!("sniffed {} stream", format.name());
        let res = match format {
            ImageFormat::Bmp => bmp::decode(r),
            ImageFormat::Pcx => pcx::decode(r),
            ImageFormat::Png => imagecodec::decode_png(r),
            ImageFormat::Jpeg => imagecodec::decode_jpeg(r),
        };
        if let Err(ref e) = res {
            log::warn!("{} decode failed: {}", format.name(), e);
        }
        res
    }
    /// Load a bitmap from an in-memory file image
    ///
    ///     use bitmap::Bitmap;
    ///
    ///     let mut bytes = Vec::new();
    ///     Bitmap::new(3, 2).write_bmp(&mut bytes).unwrap();
    ///     let b = Bitmap::load_memory(&bytes).unwrap();
    ///     assert_eq!((b.width(), b.height()), (3, 2));
    ///     assert!(Bitmap::load_memory(b"BMnonsense").is_err());
    ///
    pub fn load_memory(data: &[u8]) -> Result<Self, CodecError> {
        Self::load_reader(&mut Cursor::new(data))
    }
}

impl<'a> Bitmap<'a> {
    /// Save to `path`, choosing the format from its extension
    ///
    /// # Errors
    ///
    /// [UnknownExtension] when the extension names no supported format,
    /// otherwise whatever creating or encoding the file reports
    ///
    /// [UnknownExtension]: ../error/enum.CodecError.html#variant.UnknownExtension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CodecError> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path).ok_or_else(|| {
            let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
            CodecError::UnknownExtension(ext.unwrap_or_default())
        })?;
        log::debug!("saving {} as {}", path.display(), format.name());
        let mut out = BufWriter::new(File::create(path)?);
        self.write_format(&mut out, format)?;
        out.flush()?;
        Ok(())
    }
    /// Encode to any writer in the given format
    pub fn write_format<W: Write>(&self, w: W, format: ImageFormat) -> Result<(), CodecError> {
        match format {
            ImageFormat::Bmp => self.write_bmp(w),
            ImageFormat::Pcx => self.write_pcx(w),
            ImageFormat::Png => self.write_png(w),
            ImageFormat::Jpeg => self.write_jpeg(w),
        }
    }
    /// Encode as 24 bit uncompressed BMP; alpha is dropped
    pub fn write_bmp<W: Write>(&self, w: W) -> Result<(), CodecError> {
        bmp::encode(self, w)
    }
    /// Encode as 256 color RLE PCX; alpha is dropped
    pub fn write_pcx<W: Write>(&self, w: W) -> Result<(), CodecError> {
        pcx::encode(self, w)
    }
    /// Encode as RGBA PNG
    pub fn write_png<W: Write>(&self, w: W) -> Result<(), CodecError> {
        imagecodec::encode_png(self, w)
    }
    /// Encode as JPEG; alpha is dropped
    pub fn write_jpeg<W: Write>(&self, w: W) -> Result<(), CodecError> {
        imagecodec::encode_jpeg(self, w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sniffed(bytes: &[u8]) -> ImageFormat {
        sniff(&mut Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn sniff_magic() {
        assert_eq!(sniffed(b"BM"), ImageFormat::Bmp);
        assert_eq!(sniffed(&[0xFF, 0xD8, 0xFF]), ImageFormat::Jpeg);
        assert_eq!(sniffed(&[0x0A, 0x05]), ImageFormat::Pcx);
        assert_eq!(sniffed(&[0x0A]), ImageFormat::Pcx);
        assert_eq!(sniffed(b"\x89PNG"), ImageFormat::Png);
        assert_eq!(sniffed(b""), ImageFormat::Png);
    }

    #[test]
    fn sniff_rewinds_to_start_position() {
        let mut c = Cursor::new(b"xxBM".to_vec());
        c.set_position(2);
        assert_eq!(sniff(&mut c).unwrap(), ImageFormat::Bmp);
        assert_eq!(c.position(), 2);
    }

    #[test]
    fn little_endian_fields() {
        let b = [0x34, 0x12, 0x78, 0x56, 0xFF, 0xFF, 0xFF, 0xFF];
        assert_eq!(le_u16(&b, 0), 0x1234);
        assert_eq!(le_u32(&b, 0), 0x5678_1234);
        assert_eq!(le_i32(&b, 4), -1);
    }

    #[test]
    fn read_vec_reports_truncation() {
        let mut c = Cursor::new(vec![1u8, 2, 3]);
        assert!(matches!(read_vec(&mut c, 4), Err(CodecError::Truncated)));
    }

    #[test]
    fn save_rejects_unknown_extension() {
        let b = Bitmap::new(1, 1);
        match b.save("picture.tga") {
            Err(CodecError::UnknownExtension(e)) => assert_eq!(e, "tga"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(b.save("picture"), Err(CodecError::UnknownExtension(_))));
    }
}
