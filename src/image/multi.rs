//! Owned multi-channel f32 image with interleaved samples.
//!
//! Layout is row-major with `channels` consecutive samples per pixel, so a
//! row holds `w * channels` values. The channel order is whatever the caller
//! loaded (RGB for the bundled tools); nothing in the crate depends on it
//! except the luminance weights.
use super::ImageF32;
use crate::block::Block;
use crate::error::RestoreError;

#[derive(Clone, Debug, PartialEq)]
pub struct MultiImageF32 {
    pub w: usize,
    pub h: usize,
    pub channels: usize,
    pub data: Vec<f32>,
}

impl MultiImageF32 {
    /// Zero-initialized `w × h × channels` buffer.
    pub fn new(w: usize, h: usize, channels: usize) -> Self {
        Self {
            w,
            h,
            channels,
            data: vec![0.0; w * h * channels],
        }
    }

    /// Wrap an interleaved buffer. Fails when the length does not match.
    pub fn from_vec(
        w: usize,
        h: usize,
        channels: usize,
        data: Vec<f32>,
    ) -> Result<Self, RestoreError> {
        if data.len() != w * h * channels {
            return Err(RestoreError::DimensionMismatch {
                what: "interleaved buffer length",
                expected: (w, h, channels),
                found: (data.len(), 1, 1),
            });
        }
        Ok(Self {
            w,
            h,
            channels,
            data,
        })
    }

    /// Build an image where every pixel holds `pixel`.
    pub fn from_pixel(w: usize, h: usize, pixel: &[f32]) -> Self {
        let mut data = Vec::with_capacity(w * h * pixel.len());
        for _ in 0..w * h {
            data.extend_from_slice(pixel);
        }
        Self {
            w,
            h,
            channels: pixel.len(),
            data,
        }
    }

    /// Interleave equally sized planes into one image.
    pub fn from_channels(planes: &[ImageF32]) -> Result<Self, RestoreError> {
        let first = planes
            .first()
            .ok_or_else(|| RestoreError::invalid("channel list", "at least one plane required"))?;
        let (w, h) = first.dims();
        for plane in planes {
            if plane.dims() != (w, h) {
                return Err(RestoreError::DimensionMismatch {
                    what: "channel plane size",
                    expected: (w, h, 1),
                    found: (plane.w, plane.h, 1),
                });
            }
        }
        let channels = planes.len();
        let mut out = Self::new(w, h, channels);
        for (c, plane) in planes.iter().enumerate() {
            for (dst, &v) in out.data.iter_mut().skip(c).step_by(channels).zip(&plane.data) {
                *dst = v;
            }
        }
        Ok(out)
    }

    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    /// `(w, h, channels)`, the shape reported in dimension errors.
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.w, self.h, self.channels)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0 || self.channels == 0
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let start = (y * self.w + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        let start = (y * self.w + x) * self.channels;
        &mut self.data[start..start + self.channels]
    }

    /// Copy one channel out as a plane.
    pub fn channel(&self, c: usize) -> ImageF32 {
        debug_assert!(c < self.channels);
        ImageF32 {
            w: self.w,
            h: self.h,
            stride: self.w,
            data: self
                .data
                .iter()
                .skip(c)
                .step_by(self.channels)
                .copied()
                .collect(),
        }
    }

    /// Split into one plane per channel.
    pub fn split_channels(&self) -> Vec<ImageF32> {
        (0..self.channels).map(|c| self.channel(c)).collect()
    }

    /// Copy the pixels covered by `block` into a new image.
    pub fn crop(&self, block: &Block) -> MultiImageF32 {
        let row_len = block.cols() * self.channels;
        let mut data = Vec::with_capacity(block.rows() * row_len);
        for y in block.row_start..block.row_end {
            let start = (y * self.w + block.col_start) * self.channels;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        MultiImageF32 {
            w: block.cols(),
            h: block.rows(),
            channels: self.channels,
            data,
        }
    }
}

impl From<ImageF32> for MultiImageF32 {
    fn from(plane: ImageF32) -> Self {
        MultiImageF32 {
            w: plane.w,
            h: plane.h,
            channels: 1,
            data: plane.data,
        }
    }
}

impl crate::image::traits::ImageView for MultiImageF32 {
    type Pixel = f32;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w * self.channels
    }
    #[inline]
    fn row(&self, y: usize) -> &[f32] {
        let stride = self.w * self.channels;
        &self.data[y * stride..(y + 1) * stride]
    }
}

impl crate::image::traits::ImageViewMut for MultiImageF32 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let stride = self.w * self.channels;
        &mut self.data[y * stride..(y + 1) * stride]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_and_merge_preserve_layout() {
        let img = MultiImageF32::from_vec(2, 1, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let planes = img.split_channels();
        assert_eq!(planes[1].data, vec![2.0, 5.0]);
        let merged = MultiImageF32::from_channels(&planes).unwrap();
        assert_eq!(merged, img);
    }

    #[test]
    fn crop_copies_sub_rectangle() {
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let img = MultiImageF32::from_vec(3, 2, 2, data).unwrap();
        let sub = img.crop(&Block::new(1, 2, 1, 3));
        assert_eq!(sub.shape(), (2, 1, 2));
        assert_eq!(sub.data, vec![8.0, 9.0, 10.0, 11.0]);
    }

    #[test]
    fn from_channels_rejects_mismatched_planes() {
        let planes = [ImageF32::new(2, 2), ImageF32::new(3, 2)];
        assert!(matches!(
            MultiImageF32::from_channels(&planes),
            Err(RestoreError::DimensionMismatch { .. })
        ));
    }
}
