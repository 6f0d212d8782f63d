//! Color-space conversions for 8-bit RGB pixels.
//!
//! Two spaces are used by the color stage:
//! - **HSV** in the 8-bit convention: hue in half-degrees `[0, 180]`,
//!   saturation and value in `[0, 255]`. A hue of 180 is the same color as 0.
//! - **YCrCb** with BT.601 luma weights, used to equalize brightness without
//!   touching chroma.

/// Round and clamp a float into the u8 range.
#[inline]
pub fn saturate_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Convert RGB to 8-bit HSV `[h (0-180), s, v]`.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let s = if max > 0.0 { diff * 255.0 / max } else { 0.0 };

    let mut h = if diff == 0.0 {
        0.0
    } else if max == r {
        60.0 * (g - b) / diff
    } else if max == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }

    [saturate_u8(h / 2.0), saturate_u8(s), max as u8]
}

/// Convert 8-bit HSV `[h (0-180), s, v]` back to RGB.
pub fn hsv_to_rgb(hsv: [u8; 3]) -> [u8; 3] {
    let s = hsv[1] as f32 / 255.0;
    let v = hsv[2] as f32;
    if s == 0.0 {
        let v = hsv[2];
        return [v, v, v];
    }

    let mut h = hsv[0] as f32 / 30.0;
    if h >= 6.0 {
        h -= 6.0;
    }
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match sector as u8 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [saturate_u8(r), saturate_u8(g), saturate_u8(b)]
}

/// BT.601 luma of an RGB pixel.
#[inline]
pub fn luma(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(|c| c as f32);
    saturate_u8(0.299 * r + 0.587 * g + 0.114 * b)
}

/// Convert RGB to `[y, cr, cb]`.
pub fn rgb_to_ycrcb(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cr = (r - y) * 0.713 + 128.0;
    let cb = (b - y) * 0.564 + 128.0;
    [saturate_u8(y), saturate_u8(cr), saturate_u8(cb)]
}

/// Convert `[y, cr, cb]` back to RGB.
pub fn ycrcb_to_rgb(ycc: [u8; 3]) -> [u8; 3] {
    let y = ycc[0] as f32;
    let cr = ycc[1] as f32 - 128.0;
    let cb = ycc[2] as f32 - 128.0;
    [
        saturate_u8(y + 1.403 * cr),
        saturate_u8(y - 0.714 * cr - 0.344 * cb),
        saturate_u8(y + 1.773 * cb),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_primaries() {
        assert_eq!(rgb_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_to_hsv([0, 0, 255]), [120, 255, 255]);
    }

    #[test]
    fn hsv_gray_has_no_saturation() {
        let [h, s, v] = rgb_to_hsv([128, 128, 128]);
        assert_eq!(h, 0);
        assert_eq!(s, 0);
        assert_eq!(v, 128);
        assert_eq!(hsv_to_rgb([h, s, v]), [128, 128, 128]);
    }

    #[test]
    fn hsv_magenta_side_of_red() {
        // 340 degrees lands on 170 half-degrees
        assert_eq!(rgb_to_hsv([255, 0, 85]), [170, 255, 255]);
    }

    #[test]
    fn hsv_hue_180_is_red() {
        assert_eq!(hsv_to_rgb([180, 255, 255]), [255, 0, 0]);
        assert_eq!(hsv_to_rgb([0, 255, 255]), [255, 0, 0]);
    }

    #[test]
    fn hsv_round_trip_is_close() {
        for rgb in [[200, 40, 90], [10, 220, 130], [90, 90, 250], [255, 255, 0]] {
            let back = hsv_to_rgb(rgb_to_hsv(rgb));
            for i in 0..3 {
                let diff = (back[i] as i32 - rgb[i] as i32).abs();
                assert!(diff <= 4, "round trip of {rgb:?} drifted to {back:?}");
            }
        }
    }

    #[test]
    fn ycrcb_gray_is_neutral() {
        assert_eq!(rgb_to_ycrcb([100, 100, 100]), [100, 128, 128]);
        assert_eq!(ycrcb_to_rgb([100, 128, 128]), [100, 100, 100]);
    }

    #[test]
    fn ycrcb_round_trip_is_close() {
        for rgb in [[255, 0, 0], [12, 200, 77], [180, 180, 20]] {
            let back = ycrcb_to_rgb(rgb_to_ycrcb(rgb));
            for i in 0..3 {
                let diff = (back[i] as i32 - rgb[i] as i32).abs();
                assert!(diff <= 3, "round trip of {rgb:?} drifted to {back:?}");
            }
        }
    }

    #[test]
    fn luma_weights() {
        assert_eq!(luma([255, 255, 255]), 255);
        assert_eq!(luma([0, 0, 0]), 0);
        assert_eq!(luma([255, 0, 0]), 76);
    }

    #[test]
    fn saturate_clamps_and_rounds() {
        assert_eq!(saturate_u8(-4.0), 0);
        assert_eq!(saturate_u8(300.0), 255);
        assert_eq!(saturate_u8(127.5), 128);
    }
}
