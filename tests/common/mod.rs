#![allow(dead_code)]

use std::path::PathBuf;

use image::{Rgba, RgbaImage};

pub fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "seamcut_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

/// Index of the cell containing pixel `p` along one axis, or `None` inside a gutter.
fn cell_at(p: u32, count: u32, gutter: u32, extent: u32) -> Option<u32> {
    let cell = (f64::from(extent) - f64::from((count - 1) * gutter)) / f64::from(count);
    let period = cell + f64::from(gutter);
    let p = f64::from(p) + 0.5;
    let k = (p / period).floor();
    if k as u32 >= count - 1 {
        return Some(count - 1);
    }
    (p - k * period < cell).then_some(k as u32)
}

/// `rows × cols` contact sheet with white gutters of `gutter` px and textured cells.
pub fn contact_sheet(width: u32, height: u32, rows: u32, cols: u32, gutter: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        match (
            cell_at(y, rows, gutter, height),
            cell_at(x, cols, gutter, width),
        ) {
            (Some(r), Some(c)) => {
                let v = ((7 * x + 13 * y + 40 * (r * cols + c)) % 200 + 20) as u8;
                Rgba([v, v, v, 255])
            }
            _ => Rgba([255, 255, 255, 255]),
        }
    })
}
