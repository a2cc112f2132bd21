//! The red-yellow-green ramp used by the continuous color policy.
//!
//! The 11 ColorBrewer `RdYlGn` anchors are linearly interpolated into a
//! 256-entry lookup table, which is then sampled at `n` evenly spaced
//! interior points. This reproduces the palette plotting libraries hand out
//! for `color_palette("RdYlGn", n)`.

const RD_YL_GN: [[u8; 3]; 11] = [
    [0xa5, 0x00, 0x26],
    [0xd7, 0x30, 0x27],
    [0xf4, 0x6d, 0x43],
    [0xfd, 0xae, 0x61],
    [0xfe, 0xe0, 0x8b],
    [0xff, 0xff, 0xbf],
    [0xd9, 0xef, 0x8b],
    [0xa6, 0xd9, 0x6a],
    [0x66, 0xbd, 0x63],
    [0x1a, 0x98, 0x50],
    [0x00, 0x68, 0x37],
];

const LUT_SIZE: usize = 256;

/// Interpolate the anchors at position `x` in `[0, 1]`.
fn interpolate(x: f64) -> [f64; 3] {
    let segments = (RD_YL_GN.len() - 1) as f64;
    let scaled = x.clamp(0.0, 1.0) * segments;
    let lower = (scaled.floor() as usize).min(RD_YL_GN.len() - 2);
    let t = scaled - lower as f64;

    let a = RD_YL_GN[lower];
    let b = RD_YL_GN[lower + 1];
    let mut out = [0.0; 3];
    for i in 0..3 {
        let (a, b) = (f64::from(a[i]) / 255.0, f64::from(b[i]) / 255.0);
        out[i] = a + t * (b - a);
    }
    out
}

fn to_hex(rgb: [f64; 3]) -> String {
    rgb.iter()
        .map(|c| format!("{:02x}", (c * 255.0).round() as u8))
        .collect()
}

/// Build an `n`-swatch palette as lowercase hex strings without `#`,
/// ordered from red (low coverage) to green (high coverage).
#[must_use]
pub fn rd_yl_gn(n: usize) -> Vec<String> {
    let lut: Vec<[f64; 3]> = (0..LUT_SIZE)
        .map(|i| interpolate(i as f64 / (LUT_SIZE - 1) as f64))
        .collect();

    (1..=n)
        .map(|i| {
            let x = i as f64 / (n + 1) as f64;
            let index = ((x * LUT_SIZE as f64) as usize).min(LUT_SIZE - 1);
            to_hex(lut[index])
        })
        .collect()
}
