//! Luminosity-weighted tinting.
//!
//! Every channel of a visible pixel is pulled toward the tint color by an
//! amount that shrinks as the channel gets brighter:
//!
//! ```text
//! out = round((in - tint) * (in / 255) + tint)
//! ```
//!
//! Black takes the tint color exactly, white stays white, and the shading in
//! between is preserved. Alpha is never modified and fully transparent pixels
//! are skipped.

use crate::color::Rgb;
use crate::error::TintError;
use crate::surface::Surface;

/// Blend a single channel toward `tint`.
#[inline]
pub fn tint_channel(value: u8, tint: u8) -> u8 {
    let v = f64::from(value);
    let t = f64::from(tint);
    let out = ((v - t) * (v / 255.0) + t).round();
    out.clamp(0.0, 255.0) as u8
}

/// Tint a raw RGBA8 buffer in place.
pub fn tint_rgba(data: &mut [u8], color: Rgb) -> Result<(), TintError> {
    if data.len() % 4 != 0 {
        return Err(TintError::MisalignedBuffer(data.len()));
    }

    for px in data.chunks_exact_mut(4) {
        if px[3] == 0 {
            continue;
        }
        px[0] = tint_channel(px[0], color.r);
        px[1] = tint_channel(px[1], color.g);
        px[2] = tint_channel(px[2], color.b);
    }
    Ok(())
}

/// Tint a surface in place.
pub fn tint(surface: &mut Surface, color: Rgb) -> Result<(), TintError> {
    tint_rgba(surface.as_bytes_mut(), color)
}
