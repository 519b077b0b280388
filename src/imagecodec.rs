//! PNG and JPEG through the `image` crate
//!
//! Only pixel layout is handled here: decoded images are converted to 8 bit
//! RGBA, PNG is written as RGBA and JPEG as RGB. A format whose feature is
//! disabled reports [CodecError::Unavailable].
//!
//! [CodecError::Unavailable]: ../error/enum.CodecError.html#variant.Unavailable

use std::io::{Read, Seek, Write};

use crate::bitmap::Bitmap;
use crate::error::CodecError;

#[cfg(feature = "jpeg")]
const JPEG_QUALITY: u8 = 85;

#[cfg(any(feature = "png", feature = "jpeg"))]
fn decode<R: Read + Seek>(r: &mut R, format: image::ImageFormat) -> Result<Bitmap<'static>, CodecError> {
    use std::convert::TryFrom;
    use std::io::BufReader;

    let img = image::load(BufReader::new(r), format)?.to_rgba8();
    let (w, h) = img.dimensions();
    log::debug!("{:?} {}x{}", format, w, h);
    let too_big = || CodecError::Unsupported(format!("image of {}x{} pixels", w, h));
    let w = i32::try_from(w).map_err(|_| too_big())?;
    let h = i32::try_from(h).map_err(|_| too_big())?;
    Bitmap::from_rgba(w, h, img.into_raw()).ok_or(CodecError::Truncated)
}

#[cfg(feature = "png")]
pub(crate) fn decode_png<R: Read + Seek>(r: &mut R) -> Result<Bitmap<'static>, CodecError> {
    decode(r, image::ImageFormat::Png)
}
#[cfg(not(feature = "png"))]
pub(crate) fn decode_png<R: Read + Seek>(_: &mut R) -> Result<Bitmap<'static>, CodecError> {
    Err(CodecError::Unavailable("png"))
}

#[cfg(feature = "jpeg")]
pub(crate) fn decode_jpeg<R: Read + Seek>(r: &mut R) -> Result<Bitmap<'static>, CodecError> {
    decode(r, image::ImageFormat::Jpeg)
}
#[cfg(not(feature = "jpeg"))]
pub(crate) fn decode_jpeg<R: Read + Seek>(_: &mut R) -> Result<Bitmap<'static>, CodecError> {
    Err(CodecError::Unavailable("jpeg"))
}

#[cfg(feature = "png")]
pub(crate) fn encode_png<W: Write>(bmp: &Bitmap<'_>, out: W) -> Result<(), CodecError> {
    use image::codecs::png::PngEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    PngEncoder::new(out).write_image(bmp.data(),
                                     bmp.width() as u32,
                                     bmp.height() as u32,
                                     ExtendedColorType::Rgba8)?;
    Ok(())
}
#[cfg(not(feature = "png"))]
pub(crate) fn encode_png<W: Write>(_: &Bitmap<'_>, _: W) -> Result<(), CodecError> {
    Err(CodecError::Unavailable("png"))
}

#[cfg(feature = "jpeg")]
pub(crate) fn encode_jpeg<W: Write>(bmp: &Bitmap<'_>, out: W) -> Result<(), CodecError> {
    use image::codecs::jpeg::JpegEncoder;
    use image::{ExtendedColorType, ImageEncoder};

    let rgb: Vec<u8> = bmp.data()
        .chunks_exact(4)
        .flat_map(|p| p[.. 3].iter().copied())
        .collect();
    JpegEncoder::new_with_quality(out, JPEG_QUALITY).write_image(&rgb,
                                                                 bmp.width() as u32,
                                                                 bmp.height() as u32,
                                                                 ExtendedColorType::Rgb8)?;
    Ok(())
}
#[cfg(not(feature = "jpeg"))]
pub(crate) fn encode_jpeg<W: Write>(_: &Bitmap<'_>, _: W) -> Result<(), CodecError> {
    Err(CodecError::Unavailable("jpeg"))
}
