//! Synthetic beam frames for tests and the demo camera
//!
//! Frames are rendered analytically and optionally perturbed with seeded
//! normal noise, so every run of a test sees the same pixels.

use ndarray::{Array2, Array3, Axis};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal, NormalError};

/// Elliptical Gaussian spot description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamSpec {
    /// Peak value above zero
    pub amplitude: f64,
    /// Centre as (x, y) = (column, row)
    pub center: (f64, f64),
    /// Standard deviation along the rotated x axis
    pub sigma_x: f64,
    /// Standard deviation along the rotated y axis
    pub sigma_y: f64,
    /// Counter-clockwise rotation of the sigma_x axis from +x
    pub angle_degrees: f64,
}

impl BeamSpec {
    /// Round spot with a single sigma
    pub fn round(amplitude: f64, center: (f64, f64), sigma: f64) -> Self {
        Self {
            amplitude,
            center,
            sigma_x: sigma,
            sigma_y: sigma,
            angle_degrees: 0.0,
        }
    }

    /// Value of the spot at pixel (x, y)
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let (sin_a, cos_a) = self.angle_degrees.to_radians().sin_cos();
        let dx = x - self.center.0;
        let dy = y - self.center.1;
        let u = dx * cos_a + dy * sin_a;
        let v = -dx * sin_a + dy * cos_a;
        let exponent = u * u / (2.0 * self.sigma_x * self.sigma_x)
            + v * v / (2.0 * self.sigma_y * self.sigma_y);
        self.amplitude * (-exponent).exp()
    }
}

/// Render one Gaussian spot into a (rows, cols) frame.
pub fn gaussian_beam(rows: usize, cols: usize, spec: &BeamSpec) -> Array2<f64> {
    Array2::from_shape_fn((rows, cols), |(row, col)| {
        spec.sample(col as f64, row as f64)
    })
}

/// Add seeded normal noise with the given mean and standard deviation.
pub fn add_gaussian_noise(
    frame: &mut Array2<f64>,
    mean: f64,
    std_dev: f64,
    seed: u64,
) -> Result<(), NormalError> {
    let normal = Normal::new(mean, std_dev)?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    frame
        .iter_mut()
        .for_each(|pixel| *pixel += normal.sample(&mut rng));
    Ok(())
}

/// Copy a mono frame into three identical color channels.
pub fn to_color(mono: &Array2<f64>) -> Array3<f64> {
    let (rows, cols) = mono.dim();
    let mut color = Array3::zeros((rows, cols, 3));
    for mut channel in color.axis_iter_mut(Axis(2)) {
        channel.assign(mono);
    }
    color
}
