// Mask transform: turn painted color into painted opacity.
//
// Every pixel's four bytes `[R, G, B, A]` are read as a little-endian `u32`
// (`A << 24 | B << 16 | G << 8 | R`), shifted left by one byte and written
// back little-endian. The result is `[0, R, G, B]`: the blue byte lands in
// the alpha slot and the old alpha is dropped. Byte order is fixed here and
// does not depend on the host.

use crate::error::Error;
use crate::surface::RasterSurface;

/// Shift one pixel. `[R, G, B, A]` becomes `[0, R, G, B]`.
#[inline]
pub fn shift_pixel(px: [u8; 4]) -> [u8; 4] {
    (u32::from_le_bytes(px) << 8).to_le_bytes()
}

/// Derive a fresh mask surface from the Stroke Surface.
pub fn derive_mask(stroke: &RasterSurface) -> Result<RasterSurface, Error> {
    let mut out = RasterSurface::new(stroke.width(), stroke.height())?;
    derive_mask_into(stroke, &mut out)?;
    Ok(out)
}

/// Same as `derive_mask`, overwriting a reusable destination of equal size.
/// The stroke surface is only read.
pub fn derive_mask_into(stroke: &RasterSurface, dst: &mut RasterSurface) -> Result<(), Error> {
    if stroke.dimensions() != dst.dimensions() {
        return Err(Error::DimensionMismatch {
            op: "derive_mask",
            expected: stroke.dimensions(),
            actual: dst.dimensions(),
        });
    }
    for (src, out) in stroke.data().chunks_exact(4).zip(dst.data_mut().chunks_exact_mut(4)) {
        out.copy_from_slice(&shift_pixel([src[0], src[1], src[2], src[3]]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgba;

    #[test]
    fn blue_becomes_alpha() {
        assert_eq!(shift_pixel([0x11, 0x22, 0x33, 0x44]), [0x00, 0x11, 0x22, 0x33]);
        assert_eq!(shift_pixel(Rgba::WHITE.0), [0, 255, 255, 255]);
        assert_eq!(shift_pixel(Rgba::BLACK.0), [0, 0, 0, 0]);
        assert_eq!(shift_pixel([0, 0, 200, 0]), [0, 0, 0, 200]);
    }

    #[test]
    fn covers_every_pixel_in_order() {
        let bytes: Vec<u8> = (0..6 * 4).map(|b| b as u8).collect();
        let stroke = RasterSurface::from_rgba(3, 2, bytes.clone()).unwrap();
        let mask = derive_mask(&stroke).unwrap();
        assert_eq!(mask.dimensions(), (3, 2));
        for (i, px) in mask.data().chunks_exact(4).enumerate() {
            let src = &bytes[i * 4..i * 4 + 4];
            assert_eq!(px, &[0, src[0], src[1], src[2]]);
        }
    }

    #[test]
    fn stroke_is_left_untouched() {
        let stroke = RasterSurface::filled(4, 4, Rgba([1, 2, 3, 4])).unwrap();
        let before = stroke.clone();
        let mut dst = RasterSurface::filled(4, 4, Rgba([9, 9, 9, 9])).unwrap();
        derive_mask_into(&stroke, &mut dst).unwrap();
        assert_eq!(stroke, before);
        assert!(dst.data().chunks_exact(4).all(|p| p == [0, 1, 2, 3]));
    }

    #[test]
    fn mismatched_destination_is_rejected() {
        let stroke = RasterSurface::new(4, 4).unwrap();
        let mut dst = RasterSurface::new(4, 5).unwrap();
        assert!(matches!(
            derive_mask_into(&stroke, &mut dst),
            Err(Error::DimensionMismatch { op: "derive_mask", .. })
        ));
    }
}
