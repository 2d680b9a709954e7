use image::GrayImage;

use crate::foundation::core::Axis;
use crate::foundation::error::SeamResult;
use crate::foundation::math::population_variance;
use crate::grid::options::ProfileSampling;

/// Per-position uniformity measurement along one axis.
///
/// `values.len()` equals the image extent along `axis`. Low values mean the line at that
/// position looks the same across its whole perpendicular extent.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VarianceProfile {
    /// Axis the positions run along.
    pub axis: Axis,
    /// One value per position.
    pub values: Vec<f64>,
}

impl VarianceProfile {
    /// Number of positions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` for a zero-extent axis.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Population variance of the intensities sampled across each line along `axis`.
///
/// For `Axis::Columns` every x gets the variance of `I(x, y_k)` over the sampled rows `y_k`;
/// for `Axis::Rows` every y gets the variance of `I(x_k, y)`.
pub fn variance_profile(
    image: &GrayImage,
    axis: Axis,
    sampling: &ProfileSampling,
) -> SeamResult<VarianceProfile> {
    let extent = axis.extent(image.width(), image.height());
    let perp = axis.perpendicular_extent(image.width(), image.height());
    if extent == 0 || perp == 0 {
        sampling.validate()?;
        return Ok(VarianceProfile {
            axis,
            values: vec![0.0; extent as usize],
        });
    }

    let positions = perpendicular_positions(perp, sampling)?;
    let mut samples = Vec::with_capacity(positions.len());
    let mut values = Vec::with_capacity(extent as usize);
    for p in 0..extent {
        samples.clear();
        for &q in &positions {
            let v = match axis {
                Axis::Columns => luma(image, p, q),
                Axis::Rows => luma(image, q, p),
            };
            samples.push(f64::from(v));
        }
        values.push(population_variance(&samples));
    }

    Ok(VarianceProfile { axis, values })
}

/// Population variance of every pixel on each full line along `axis`.
///
/// A gutter line is one intensity end to end, so its value is zero. A content line of one
/// solid colour still scores `p (1 - p) Δ²` from the gutter pixels `p` it crosses, which
/// keeps solid-cell sheets separable. This is the profile used by the projection strategy.
pub fn projection_profile(image: &GrayImage, axis: Axis) -> VarianceProfile {
    let extent = axis.extent(image.width(), image.height());
    let perp = axis.perpendicular_extent(image.width(), image.height());
    let mut line = Vec::with_capacity(perp as usize);
    let mut values = Vec::with_capacity(extent as usize);
    for p in 0..extent {
        line.clear();
        line.extend((0..perp).map(|q| {
            let v = match axis {
                Axis::Columns => luma(image, p, q),
                Axis::Rows => luma(image, q, p),
            };
            f64::from(v)
        }));
        values.push(population_variance(&line));
    }
    VarianceProfile { axis, values }
}

#[inline]
fn luma(image: &GrayImage, x: u32, y: u32) -> u8 {
    image.get_pixel(x, y)[0]
}

fn perpendicular_positions(perp: u32, sampling: &ProfileSampling) -> SeamResult<Vec<u32>> {
    Ok(sampling
        .fractions()?
        .into_iter()
        .map(|f| ((f * f64::from(perp)) as u32).min(perp - 1))
        .collect())
}

#[cfg(test)]
#[path = "../../tests/unit/grid/profile.rs"]
mod tests;
