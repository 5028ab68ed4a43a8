// Brush rasterizer: one soft-edged disc per input sample, dabbed onto the
// Stroke Surface with source-over.
use crate::surface::RasterSurface;
use crate::types::{BrushSpec, MaskStyle, PaintMode, Stamp};

/// Shadow tail is cut once it falls below this coverage.
const MIN_COVERAGE: f32 = 1.0 / 512.0;

/// Build the stamp for a brush. The disc is centered on a pixel-grid corner;
/// each cell is sampled at its pixel center.
///
/// Blur behaves like a canvas shadow in the ink color drawn under the disc:
/// a Gaussian with sigma = blur / 2. We use the 1D edge profile
/// `0.5 * erfc((d - r) / (sigma * sqrt 2))`, which matches the 2D
/// convolution closely once r is a few sigma.
pub fn make_disc_stamp(spec: &BrushSpec) -> Stamp {
    let spec = spec.clamped();
    let radius = spec.diameter / 2.0;
    let sigma = spec.blur_radius / 2.0;
    let extent = (radius + 3.0 * sigma).ceil().max(1.0) as i32;
    let side = (2 * extent) as usize;

    let mut fill = Vec::with_capacity(side * side);
    let mut shadow = Vec::with_capacity(side * side);
    for ky in -extent..extent {
        for kx in -extent..extent {
            let dx = kx as f32 + 0.5;
            let dy = ky as f32 + 0.5;
            let d = (dx * dx + dy * dy).sqrt();

            fill.push(if d <= radius { 1.0 } else { 0.0 });

            let s = if sigma > 0.0 {
                0.5 * erfc((d - radius) / (sigma * std::f32::consts::SQRT_2))
            } else {
                0.0
            };
            shadow.push(if s < MIN_COVERAGE { 0.0 } else { s.min(1.0) });
        }
    }

    Stamp { extent, fill, shadow }
}

/// Dab a stamp centered at `(cx, cy)`: shadow first, then the hard disc.
/// Like a canvas shadow whose color carries the fill alpha, the shadow is
/// drawn at `opacity^2 * coverage`; the disc at `opacity`.
pub fn dab_stamp(surface: &mut RasterSurface, cx: i32, cy: i32, stamp: &Stamp, ink: [u8; 3], opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }
    let shadow_opacity = opacity * opacity;
    let side = stamp.side();
    let w = surface.width() as i32;
    let h = surface.height() as i32;

    for ky in 0..side {
        let sy = cy + ky - stamp.extent;
        if sy < 0 || sy >= h {
            continue;
        }
        for kx in 0..side {
            let sx = cx + kx - stamp.extent;
            if sx < 0 || sx >= w {
                continue;
            }
            let k = (ky * side + kx) as usize;
            let shadow = stamp.shadow[k];
            if shadow > 0.0 {
                surface.blend_pixel(sx, sy, ink, shadow_opacity * shadow);
            }
            if stamp.fill[k] > 0.0 {
                surface.blend_pixel(sx, sy, ink, opacity);
            }
        }
    }
}

/// Paint one disc for the given brush and mode. Convenience over
/// `make_disc_stamp` + `dab_stamp` when no stamp is cached.
pub fn paint_disc(
    surface: &mut RasterSurface,
    cx: i32,
    cy: i32,
    spec: &BrushSpec,
    mode: PaintMode,
    style: &MaskStyle,
) {
    let stamp = make_disc_stamp(spec);
    dab_stamp(surface, cx, cy, &stamp, style.ink(mode), spec.clamped().opacity);
}

/// Complementary error function (Abramowitz & Stegun 7.1.26, |err| < 1.5e-7).
fn erfc(x: f32) -> f32 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.327_591_1 * z);
    let poly = t
        * (0.254_829_6
            + t * (-0.284_496_74 + t * (1.421_413_8 + t * (-1.453_152_1 + t * 1.061_405_4))));
    let r = poly * (-z * z).exp();
    if x >= 0.0 { r } else { 2.0 - r }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::derive_mask;
    use crate::types::{MAX_BLUR_RADIUS, MAX_DIAMETER, Rgba};

    fn cleared(w: u32, h: u32, style: &MaskStyle) -> RasterSurface {
        RasterSurface::filled(w, h, style.background).unwrap()
    }

    fn alpha_at(mask: &RasterSurface, x: u32, y: u32) -> u8 {
        mask.pixel(x, y).unwrap().alpha()
    }

    #[test]
    fn small_hard_disc_on_4x4() {
        let style = MaskStyle::REVEAL;
        let spec = BrushSpec { diameter: 2.0, blur_radius: 0.0, opacity: 1.0 };
        let mut stroke = cleared(4, 4, &style);
        paint_disc(&mut stroke, 2, 2, &spec, PaintMode::Mark, &style);

        let mask = derive_mask(&stroke).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let inside = (1..=2).contains(&x) && (1..=2).contains(&y);
                let expected = if inside { 255 } else { 0 };
                assert_eq!(alpha_at(&mask, x, y), expected, "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn mask_alpha_follows_opacity() {
        let style = MaskStyle::REVEAL;
        for step in 0..=20 {
            let o = step as f32 / 20.0;
            let spec = BrushSpec { diameter: 4.0, blur_radius: 0.0, opacity: o };
            let mut stroke = cleared(8, 8, &style);
            paint_disc(&mut stroke, 4, 4, &spec, PaintMode::Mark, &style);
            let mask = derive_mask(&stroke).unwrap();

            let expected = (o * 255.0).round() as i32;
            let got = alpha_at(&mask, 4, 4) as i32;
            assert!((got - expected).abs() <= 1, "opacity {o}: got {got}, want {expected}");
            assert_eq!(alpha_at(&mask, 0, 0), 0);
            assert_eq!(alpha_at(&mask, 7, 7), 0);
        }
    }

    #[test]
    fn erase_removes_a_full_mark() {
        let style = MaskStyle::REVEAL;
        let spec = BrushSpec { diameter: 6.0, blur_radius: 0.0, opacity: 1.0 };
        let mut stroke = cleared(10, 10, &style);
        let before = stroke.clone();
        paint_disc(&mut stroke, 5, 5, &spec, PaintMode::Mark, &style);
        assert_ne!(stroke, before);
        paint_disc(&mut stroke, 5, 5, &spec, PaintMode::Erase, &style);
        assert_eq!(stroke, before);
    }

    #[test]
    fn repeated_full_opacity_dab_saturates() {
        let style = MaskStyle::CUT_OUT;
        let spec = BrushSpec { diameter: 9.0, blur_radius: 4.0, opacity: 1.0 };
        let stamp = make_disc_stamp(&spec);
        let mut stroke = cleared(20, 20, &style);
        dab_stamp(&mut stroke, 10, 10, &stamp, style.mark, 1.0);
        let once = stroke.clone();
        dab_stamp(&mut stroke, 10, 10, &stamp, style.mark, 1.0);
        assert_eq!(stroke.pixel(10, 10), once.pixel(10, 10));
        assert_eq!(stroke.pixel(10, 10), Some(Rgba::BLACK));
    }

    #[test]
    fn blur_softens_the_edge() {
        let style = MaskStyle::REVEAL;
        let hard = BrushSpec { diameter: 10.0, blur_radius: 0.0, opacity: 1.0 };
        let soft = BrushSpec { blur_radius: 6.0, ..hard };

        let mut a = cleared(32, 32, &style);
        let mut b = cleared(32, 32, &style);
        paint_disc(&mut a, 16, 16, &hard, PaintMode::Mark, &style);
        paint_disc(&mut b, 16, 16, &soft, PaintMode::Mark, &style);
        let (ma, mb) = (derive_mask(&a).unwrap(), derive_mask(&b).unwrap());

        // Just outside the radius: hard edge is empty, blurred edge is partial.
        assert_eq!(alpha_at(&ma, 22, 16), 0);
        let partial = alpha_at(&mb, 22, 16);
        assert!(partial > 0 && partial < 255, "got {partial}");
        // Falloff keeps decreasing outward.
        assert!(alpha_at(&mb, 24, 16) < partial);
        // Center is fully painted either way.
        assert_eq!(alpha_at(&ma, 16, 16), 255);
        assert_eq!(alpha_at(&mb, 16, 16), 255);
    }

    #[test]
    fn shadow_alpha_is_squared_by_opacity() {
        let style = MaskStyle::REVEAL;
        let spec = BrushSpec { diameter: 10.0, blur_radius: 6.0, opacity: 0.5 };
        let stamp = make_disc_stamp(&spec);
        let mut stroke = cleared(32, 32, &style);
        dab_stamp(&mut stroke, 16, 16, &stamp, style.mark, spec.opacity);

        // (22, 16) is outside the disc, so only the shadow reaches it.
        let k = (stamp.extent * stamp.side() + (22 - 16 + stamp.extent)) as usize;
        assert_eq!(stamp.fill[k], 0.0);
        let expected = (0.25 * stamp.shadow[k] * 255.0).round() as i32;
        let got = derive_mask(&stroke).unwrap().pixel(22, 16).unwrap().alpha() as i32;
        assert!((got - expected).abs() <= 1, "got {got}, want {expected}");
    }

    #[test]
    fn largest_brush_stamp_stays_small() {
        let spec = BrushSpec { diameter: 4096.0, blur_radius: 4096.0, opacity: 1.0 };
        let stamp = make_disc_stamp(&spec);
        let limit = (MAX_DIAMETER / 2.0 + 1.5 * MAX_BLUR_RADIUS).ceil() as i32;
        assert_eq!(stamp.extent, limit);
        assert_eq!(stamp.fill.len(), (stamp.side() * stamp.side()) as usize);

        let mut stroke = cleared(4, 4, &MaskStyle::REVEAL);
        dab_stamp(&mut stroke, 2, 2, &stamp, [255, 255, 255], 1.0);
        assert!(stroke.data().chunks_exact(4).all(|p| p == Rgba::WHITE.0));
    }

    #[test]
    fn dab_near_the_border_is_clipped() {
        let style = MaskStyle::REVEAL;
        let spec = BrushSpec { diameter: 8.0, blur_radius: 2.0, opacity: 1.0 };
        let mut stroke = cleared(5, 5, &style);
        paint_disc(&mut stroke, 0, 0, &spec, PaintMode::Mark, &style);
        paint_disc(&mut stroke, 4, 4, &spec, PaintMode::Mark, &style);
        assert_eq!(stroke.pixel(0, 0), Some(Rgba::WHITE));
        assert_eq!(stroke.pixel(4, 4), Some(Rgba::WHITE));
    }

    #[test]
    fn zero_opacity_changes_nothing() {
        let style = MaskStyle::REVEAL;
        let spec = BrushSpec { diameter: 8.0, blur_radius: 2.0, opacity: 0.0 };
        let mut stroke = cleared(8, 8, &style);
        let before = stroke.clone();
        paint_disc(&mut stroke, 4, 4, &spec, PaintMode::Mark, &style);
        assert_eq!(stroke, before);
    }

    #[test]
    fn erfc_matches_known_values() {
        assert!((erfc(0.0) - 1.0).abs() < 1e-5);
        assert!((erfc(1.0) - 0.157_299_2).abs() < 1e-5);
        assert!((erfc(-1.0) - 1.842_700_8).abs() < 1e-5);
        assert!(erfc(5.0) < 1e-6);
    }
}
