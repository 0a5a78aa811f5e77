//! Colorspace conversion between RGB and the configurable working space.
//!
//! All conversions follow the 8-bit conventions of the OpenCV `cvtColor`
//! family: hue is stored halved in [0, 180), all other channels cover the
//! full [0, 255] range, and LUV goes through linear-RGB XYZ with the
//! standard D65 white point. Converting to or from `Rgb` returns an
//! unmodified copy.
//!
//! Unsupported colorspace names cannot be represented: the enum is the
//! whole configuration surface, so a bad name fails when the config is
//! deserialized, before any per-window work starts.
use crate::image::RgbImageU8;
use serde::{Deserialize, Serialize};

/// Working colorspace for feature extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    Rgb,
    Hsv,
    Luv,
    Hls,
    Yuv,
    YCrCb,
}

/// Convert an RGB image into the target working space.
pub fn to_color_space(img: &RgbImageU8, target: ColorSpace) -> RgbImageU8 {
    match target {
        ColorSpace::Rgb => img.clone(),
        ColorSpace::Hsv => map_pixels(img, rgb_to_hsv),
        ColorSpace::Luv => map_pixels(img, rgb_to_luv),
        ColorSpace::Hls => map_pixels(img, rgb_to_hls),
        ColorSpace::Yuv => map_pixels(img, rgb_to_yuv),
        ColorSpace::YCrCb => map_pixels(img, rgb_to_ycrcb),
    }
}

/// Convert an image in `source` space back to RGB.
pub fn to_rgb(img: &RgbImageU8, source: ColorSpace) -> RgbImageU8 {
    match source {
        ColorSpace::Rgb => img.clone(),
        ColorSpace::Hsv => map_pixels(img, hsv_to_rgb),
        ColorSpace::Luv => map_pixels(img, luv_to_rgb),
        ColorSpace::Hls => map_pixels(img, hls_to_rgb),
        ColorSpace::Yuv => map_pixels(img, yuv_to_rgb),
        ColorSpace::YCrCb => map_pixels(img, ycrcb_to_rgb),
    }
}

fn map_pixels(img: &RgbImageU8, f: fn([u8; 3]) -> [u8; 3]) -> RgbImageU8 {
    let mut out = RgbImageU8::new(img.w, img.h);
    for y in 0..img.h {
        let src = img.row(y);
        let dst = out.row_mut(y);
        for x in 0..img.w {
            let base = x * 3;
            let px = f([src[base], src[base + 1], src[base + 2]]);
            dst[base..base + 3].copy_from_slice(&px);
        }
    }
    out
}

#[inline]
fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Hue in degrees [0, 360) from normalized RGB and their min/max.
fn hue_deg(r: f32, g: f32, b: f32, max: f32, delta: f32) -> f32 {
    if delta <= 0.0 {
        return 0.0;
    }
    let h = if max == r {
        60.0 * (g - b) / delta
    } else if max == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

fn rgb_to_hsv([r8, g8, b8]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (r8 as f32, g8 as f32, b8 as f32);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let v = max;
    let s = if max <= 0.0 { 0.0 } else { 255.0 * delta / max };
    let h = hue_deg(r, g, b, max, delta) / 2.0;
    [clamp_u8(h), clamp_u8(s), clamp_u8(v)]
}

fn hsv_to_rgb([h8, s8, v8]: [u8; 3]) -> [u8; 3] {
    let h = h8 as f32 * 2.0;
    let s = s8 as f32 / 255.0;
    let v = v8 as f32;
    if s <= 0.0 {
        let g = clamp_u8(v);
        return [g, g, g];
    }
    let sector = h / 60.0;
    let i = sector.floor() as i32 % 6;
    let f = sector - sector.floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match i {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

fn rgb_to_hls([r8, g8, b8]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (
        r8 as f32 / 255.0,
        g8 as f32 / 255.0,
        b8 as f32 / 255.0,
    );
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;
    let s = if delta <= 0.0 {
        0.0
    } else if l < 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let h = hue_deg(r, g, b, max, delta) / 2.0;
    [clamp_u8(h), clamp_u8(l * 255.0), clamp_u8(s * 255.0)]
}

fn hls_to_rgb([h8, l8, s8]: [u8; 3]) -> [u8; 3] {
    let h = h8 as f32 * 2.0 / 360.0;
    let l = l8 as f32 / 255.0;
    let s = s8 as f32 / 255.0;
    if s <= 0.0 {
        let g = clamp_u8(l * 255.0);
        return [g, g, g];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let r = hue_component(p, q, h + 1.0 / 3.0);
    let g = hue_component(p, q, h);
    let b = hue_component(p, q, h - 1.0 / 3.0);
    [clamp_u8(r * 255.0), clamp_u8(g * 255.0), clamp_u8(b * 255.0)]
}

fn hue_component(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[inline]
fn luma(r: f32, g: f32, b: f32) -> f32 {
    0.299 * r + 0.587 * g + 0.114 * b
}

fn rgb_to_yuv([r8, g8, b8]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (r8 as f32, g8 as f32, b8 as f32);
    let y = luma(r, g, b);
    let u = 0.492 * (b - y) + 128.0;
    let v = 0.877 * (r - y) + 128.0;
    [clamp_u8(y), clamp_u8(u), clamp_u8(v)]
}

fn yuv_to_rgb([y8, u8, v8]: [u8; 3]) -> [u8; 3] {
    let y = y8 as f32;
    let u = u8 as f32 - 128.0;
    let v = v8 as f32 - 128.0;
    let r = y + v / 0.877;
    let b = y + u / 0.492;
    let g = (y - 0.299 * r - 0.114 * b) / 0.587;
    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

fn rgb_to_ycrcb([r8, g8, b8]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (r8 as f32, g8 as f32, b8 as f32);
    let y = luma(r, g, b);
    let cr = 0.713 * (r - y) + 128.0;
    let cb = 0.564 * (b - y) + 128.0;
    [clamp_u8(y), clamp_u8(cr), clamp_u8(cb)]
}

fn ycrcb_to_rgb([y8, cr8, cb8]: [u8; 3]) -> [u8; 3] {
    let y = y8 as f32;
    let cr = cr8 as f32 - 128.0;
    let cb = cb8 as f32 - 128.0;
    let r = y + 1.403 * cr;
    let b = y + 1.773 * cb;
    let g = (y - 0.299 * r - 0.114 * b) / 0.587;
    [clamp_u8(r), clamp_u8(g), clamp_u8(b)]
}

// D65 white point in u'v' coordinates.
const UN_PRIME: f32 = 0.197_939_43;
const VN_PRIME: f32 = 0.468_310_96;

fn rgb_to_luv([r8, g8, b8]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (
        r8 as f32 / 255.0,
        g8 as f32 / 255.0,
        b8 as f32 / 255.0,
    );
    let x = 0.412453 * r + 0.357580 * g + 0.180423 * b;
    let y = 0.212671 * r + 0.715160 * g + 0.072169 * b;
    let z = 0.019334 * r + 0.119193 * g + 0.950227 * b;

    let l = if y > 0.008856 {
        116.0 * y.cbrt() - 16.0
    } else {
        903.3 * y
    };
    let denom = x + 15.0 * y + 3.0 * z;
    let (u_prime, v_prime) = if denom > 0.0 {
        (4.0 * x / denom, 9.0 * y / denom)
    } else {
        (UN_PRIME, VN_PRIME)
    };
    let u = 13.0 * l * (u_prime - UN_PRIME);
    let v = 13.0 * l * (v_prime - VN_PRIME);

    [
        clamp_u8(255.0 / 100.0 * l),
        clamp_u8(255.0 / 354.0 * (u + 134.0)),
        clamp_u8(255.0 / 262.0 * (v + 140.0)),
    ]
}

fn luv_to_rgb([l8, u8, v8]: [u8; 3]) -> [u8; 3] {
    let l = l8 as f32 * 100.0 / 255.0;
    if l <= 0.0 {
        return [0, 0, 0];
    }
    let u = u8 as f32 * 354.0 / 255.0 - 134.0;
    let v = v8 as f32 * 262.0 / 255.0 - 140.0;

    let y = if l > 8.0 {
        let t = (l + 16.0) / 116.0;
        t * t * t
    } else {
        l / 903.3
    };
    let u_prime = u / (13.0 * l) + UN_PRIME;
    let v_prime = v / (13.0 * l) + VN_PRIME;
    if v_prime <= 0.0 {
        return [0, 0, 0];
    }
    let x = y * 9.0 * u_prime / (4.0 * v_prime);
    let z = y * (12.0 - 3.0 * u_prime - 20.0 * v_prime) / (4.0 * v_prime);

    let r = 3.240479 * x - 1.537150 * y - 0.498535 * z;
    let g = -0.969256 * x + 1.875991 * y + 0.041556 * z;
    let b = 0.055648 * x - 0.204043 * y + 1.057311 * z;
    [
        clamp_u8(r * 255.0),
        clamp_u8(g * 255.0),
        clamp_u8(b * 255.0),
    ]
}
