//! Frame sources feeding the profiler loop

use std::f64::consts::PI;
use std::path::Path;

use log::info;
use profiler::synthetic::{add_gaussian_noise, gaussian_beam, to_color, BeamSpec};
use profiler::Frame;
use thiserror::Error;

/// Errors raised by frame sources
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Invalid source configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load image: {0}")]
    Image(#[from] image::ImageError),
}

/// Anything that can hand out camera frames one at a time
pub trait FrameSource {
    /// Produce the next frame
    fn next_frame(&mut self) -> Result<Frame, SourceError>;

    /// Human-readable identification of the source
    fn id_string(&self) -> String;
}

/// Parameters of the synthetic Gaussian camera
#[derive(Debug, Clone, PartialEq)]
pub struct DummyGaussianConfig {
    pub rows: usize,
    pub cols: usize,
    pub amplitude: f64,
    pub sigma_x: f64,
    pub sigma_y: f64,
    pub angle_degrees: f64,
    /// Constant level added under the beam
    pub pedestal: f64,
    /// Standard deviation of per-pixel read noise
    pub noise_std: f64,
    /// Radius of the circle the beam centre walks along
    pub wander_radius: f64,
    /// Frames per full turn of the wander circle
    pub wander_period: usize,
    /// Emit RGB frames instead of mono
    pub color: bool,
    pub seed: u64,
}

impl Default for DummyGaussianConfig {
    fn default() -> Self {
        Self {
            rows: 200,
            cols: 320,
            amplitude: 200.0,
            sigma_x: 12.0,
            sigma_y: 8.0,
            angle_degrees: 20.0,
            pedestal: 10.0,
            noise_std: 1.0,
            wander_radius: 20.0,
            wander_period: 50,
            color: false,
            seed: 0,
        }
    }
}

/// Synthetic camera producing a noisy Gaussian beam
#[derive(Debug, Clone)]
pub struct DummyGaussian {
    config: DummyGaussianConfig,
    frame_index: u64,
}

impl DummyGaussian {
    pub fn new(config: DummyGaussianConfig) -> Result<Self, SourceError> {
        if config.rows == 0 || config.cols == 0 {
            return Err(SourceError::InvalidConfig(format!(
                "frame size {}x{} is empty",
                config.cols, config.rows
            )));
        }
        if !(config.sigma_x > 0.0 && config.sigma_y > 0.0) {
            return Err(SourceError::InvalidConfig(format!(
                "beam sigmas must be positive, got {} and {}",
                config.sigma_x, config.sigma_y
            )));
        }
        if !(config.noise_std.is_finite() && config.noise_std >= 0.0) {
            return Err(SourceError::InvalidConfig(format!(
                "noise standard deviation must be non-negative, got {}",
                config.noise_std
            )));
        }
        Ok(Self {
            config,
            frame_index: 0,
        })
    }

    pub fn config(&self) -> &DummyGaussianConfig {
        &self.config
    }

    /// True beam centre (x, y) of frame number `index`
    pub fn center_at(&self, index: u64) -> (f64, f64) {
        let c = &self.config;
        let phase = if c.wander_period > 0 {
            2.0 * PI * (index % c.wander_period as u64) as f64 / c.wander_period as f64
        } else {
            0.0
        };
        (
            c.cols as f64 / 2.0 + c.wander_radius * phase.cos(),
            c.rows as f64 / 2.0 + c.wander_radius * phase.sin(),
        )
    }
}

impl FrameSource for DummyGaussian {
    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        let c = &self.config;
        let spec = BeamSpec {
            amplitude: c.amplitude,
            center: self.center_at(self.frame_index),
            sigma_x: c.sigma_x,
            sigma_y: c.sigma_y,
            angle_degrees: c.angle_degrees,
        };

        let mut data = gaussian_beam(c.rows, c.cols, &spec);
        if c.noise_std > 0.0 {
            add_gaussian_noise(
                &mut data,
                c.pedestal,
                c.noise_std,
                c.seed.wrapping_add(self.frame_index),
            )
            .map_err(|e| SourceError::InvalidConfig(e.to_string()))?;
        } else {
            data.mapv_inplace(|v| v + c.pedestal);
        }
        self.frame_index += 1;

        if c.color {
            Ok(Frame::Color(to_color(&data)))
        } else {
            Ok(Frame::Mono(data))
        }
    }

    fn id_string(&self) -> String {
        format!(
            "Dummy Gaussian {}x{} (sigma {:.1} x {:.1})",
            self.config.cols, self.config.rows, self.config.sigma_x, self.config.sigma_y
        )
    }
}

/// Repeats one image loaded from disk
#[derive(Debug, Clone)]
pub struct ImageFileSource {
    name: String,
    frame: Frame,
}

impl ImageFileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let img = image::open(path)?;
        let frame = Frame::from_image(&img);
        let (rows, cols) = frame.dim();
        info!(
            "Loaded {} ({}x{}, {})",
            path.display(),
            cols,
            rows,
            if frame.is_color() { "color" } else { "mono" }
        );
        Ok(Self {
            name: path.display().to_string(),
            frame,
        })
    }
}

impl FrameSource for ImageFileSource {
    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        Ok(self.frame.clone())
    }

    fn id_string(&self) -> String {
        format!("Image file {}", self.name)
    }
}
