//! Camera frames as seen by the analyzer
//!
//! Frames arrive either as single-channel intensity grids or as RGB grids.
//! Both are stored row-major with shape (rows, cols[, 3]); column index is
//! the x coordinate, row index is the y coordinate.

use image::DynamicImage;
use ndarray::{Array2, Array3, ArrayD, ArrayView2, Axis, Ix2, Ix3};
use num_traits::AsPrimitive;

use crate::error::FrameError;

/// NTSC luma weights applied to (R, G, B)
pub const LUMA_WEIGHTS: [f64; 3] = [0.2989, 0.5870, 0.1140];

/// A single frame delivered by the acquisition loop
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Single-channel intensity, shape (rows, cols)
    Mono(Array2<f64>),
    /// Three-channel RGB, shape (rows, cols, 3)
    Color(Array3<f64>),
}

impl Frame {
    /// Wrap a single-channel intensity grid.
    pub fn mono(data: Array2<f64>) -> Self {
        Frame::Mono(data)
    }

    /// Wrap an RGB grid, rejecting anything without exactly three channels.
    pub fn color(data: Array3<f64>) -> Result<Self, FrameError> {
        if data.dim().2 != 3 {
            return Err(FrameError::UnsupportedShape(data.shape().to_vec()));
        }
        Ok(Frame::Color(data))
    }

    /// Accept an array of unknown dimensionality.
    pub fn from_dyn(data: ArrayD<f64>) -> Result<Self, FrameError> {
        let shape = data.shape().to_vec();
        match data.ndim() {
            2 => data
                .into_dimensionality::<Ix2>()
                .map(Frame::Mono)
                .map_err(|_| FrameError::UnsupportedShape(shape)),
            3 => data
                .into_dimensionality::<Ix3>()
                .map_err(|_| FrameError::UnsupportedShape(shape))
                .and_then(Frame::color),
            _ => Err(FrameError::UnsupportedShape(shape)),
        }
    }

    /// Convert raw camera samples (u8, u16, f32, ...) into a mono frame.
    pub fn mono_from<T>(view: ArrayView2<T>) -> Self
    where
        T: AsPrimitive<f64>,
    {
        Frame::Mono(view.mapv(|v| v.as_()))
    }

    /// Convert a decoded image into a frame.
    ///
    /// Luma images stay single-channel; every other pixel layout is
    /// converted to RGB and any alpha channel is dropped. Sample values keep
    /// the native range of the image (0-255 for 8-bit, 0-65535 for 16-bit).
    pub fn from_image(img: &DynamicImage) -> Self {
        let (width, height) = (img.width() as usize, img.height() as usize);
        match img {
            DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) => {
                let luma = img.to_luma8();
                Frame::Mono(Array2::from_shape_fn((height, width), |(y, x)| {
                    luma.get_pixel(x as u32, y as u32).0[0] as f64
                }))
            }
            DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA16(_) => {
                let luma = img.to_luma16();
                Frame::Mono(Array2::from_shape_fn((height, width), |(y, x)| {
                    luma.get_pixel(x as u32, y as u32).0[0] as f64
                }))
            }
            DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgba16(_) => {
                let rgb = img.to_rgb16();
                Frame::Color(Array3::from_shape_fn((height, width, 3), |(y, x, c)| {
                    rgb.get_pixel(x as u32, y as u32).0[c] as f64
                }))
            }
            DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
                let rgb = img.to_rgb32f();
                Frame::Color(Array3::from_shape_fn((height, width, 3), |(y, x, c)| {
                    rgb.get_pixel(x as u32, y as u32).0[c] as f64
                }))
            }
            _ => {
                let rgb = img.to_rgb8();
                Frame::Color(Array3::from_shape_fn((height, width, 3), |(y, x, c)| {
                    rgb.get_pixel(x as u32, y as u32).0[c] as f64
                }))
            }
        }
    }

    /// Frame size as (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        match self {
            Frame::Mono(data) => data.dim(),
            Frame::Color(data) => {
                let (rows, cols, _) = data.dim();
                (rows, cols)
            }
        }
    }

    /// Whether the frame carries color channels
    pub fn is_color(&self) -> bool {
        matches!(self, Frame::Color(_))
    }

    /// Reduce the frame to a scalar intensity field.
    ///
    /// Color frames are collapsed with [`LUMA_WEIGHTS`], summed left to right
    /// so results are reproducible bit for bit. Mono frames are copied. A
    /// color grid built directly through [`Frame::Color`] without exactly
    /// three channels is rejected.
    pub fn to_intensity(&self) -> Result<Array2<f64>, FrameError> {
        match self {
            Frame::Mono(data) => Ok(data.clone()),
            Frame::Color(data) => {
                if data.dim().2 != 3 {
                    return Err(FrameError::UnsupportedShape(data.shape().to_vec()));
                }
                let [wr, wg, wb] = LUMA_WEIGHTS;
                let r = data.index_axis(Axis(2), 0);
                let g = data.index_axis(Axis(2), 1);
                let b = data.index_axis(Axis(2), 2);
                let mut luma = Array2::zeros(self.dim());
                ndarray::Zip::from(&mut luma)
                    .and(&r)
                    .and(&g)
                    .and(&b)
                    .for_each(|out, &r, &g, &b| *out = wr * r + wg * g + wb * b);
                Ok(luma)
            }
        }
    }
}
