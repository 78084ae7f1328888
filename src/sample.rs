//! Strided pixel sampling.
//!
//! [`Sampler::samples`] walks the pixels in raster order with a single stride.
//! [`Sampler::grid_samples`] instead steps along each axis separately,
//! so that the samples are spread over every column and row band of the image.

use crate::{PixelBuffer, Quality};
use palette::Srgba;
use std::iter::FusedIterator;

/// A single sampled pixel and its location in the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Column of the pixel.
    pub x: u32,
    /// Row of the pixel.
    pub y: u32,
    /// The pixel value.
    pub color: Srgba<u8>,
}

/// Visits every `stride`-th pixel of a [`PixelBuffer`] in raster order.
///
/// The stride is chosen so that at most [`Quality::max_samples`] pixels are visited.
/// A [`PixelBuffer`] can never have a zero area, so sampling always yields at least one pixel.
#[derive(Debug, Clone, Copy)]
pub struct Sampler<'a> {
    buffer: PixelBuffer<'a>,
    stride: usize,
    target: usize,
}

impl<'a> Sampler<'a> {
    /// Creates a new [`Sampler`] over `buffer` for the given `quality`.
    #[must_use]
    pub fn new(buffer: PixelBuffer<'a>, quality: Quality) -> Self {
        Self::with_max_samples(buffer, quality.max_samples())
    }

    /// Creates a new [`Sampler`] visiting at most `max_samples` pixels (but always at least one).
    #[must_use]
    pub fn with_max_samples(buffer: PixelBuffer<'a>, max_samples: u32) -> Self {
        let total = buffer.pixels().len();
        let target = (max_samples as usize).max(1);
        let stride = total.div_ceil(target).max(1);
        Self { buffer, stride, target }
    }

    /// The number of pixels skipped between two consecutive samples, plus one.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// The buffer being sampled.
    #[must_use]
    pub const fn buffer(&self) -> PixelBuffer<'a> {
        self.buffer
    }

    /// The number of samples that [`Sampler::samples`] will produce.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_samples(&self) -> u32 {
        self.buffer.pixels().len().div_ceil(self.stride) as u32
    }

    /// Returns a fresh iterator over the samples.
    ///
    /// Each call starts again from the first pixel.
    #[must_use]
    pub fn samples(&self) -> Samples<'a> {
        Samples {
            pixels: self.buffer.pixels(),
            width: self.buffer.width() as usize,
            stride: self.stride,
            next: 0,
        }
    }

    /// Returns an iterator over the samples on a regular grid, row by row.
    ///
    /// The steps along each axis are chosen so that about the same number of pixels
    /// are visited as by [`Sampler::samples`], but are never larger than `max_step_x`
    /// and `max_step_y`. The axis with the tighter limit is fixed first and the other axis
    /// gets the remaining budget, so at most `max(target, steps along the limited axis)`
    /// samples are produced.
    #[must_use]
    pub fn grid_samples(&self, max_step_x: u32, max_step_y: u32) -> GridSamples<'a> {
        let width = self.buffer.width();
        let height = self.buffer.height();

        let (step_x, step_y) = if max_step_x <= max_step_y {
            grid_steps(width, height, max_step_x, max_step_y, self.stride, self.target)
        } else {
            let (y, x) =
                grid_steps(height, width, max_step_y, max_step_x, self.stride, self.target);
            (x, y)
        };

        GridSamples {
            pixels: self.buffer.pixels(),
            width,
            height,
            step_x,
            step_y,
            x: 0,
            y: 0,
        }
    }

    /// Collects just the sampled colors.
    #[must_use]
    pub fn colors(&self) -> Vec<Srgba<u8>> {
        self.buffer.pixels().iter().step_by(self.stride).copied().collect()
    }
}

/// Steps along the `first` and `second` axes: the first is bounded by `max_first`
/// and an even split of `stride`, the second fits the rest of the `target` budget.
fn grid_steps(
    first: u32,
    second: u32,
    max_first: u32,
    max_second: u32,
    stride: usize,
    target: usize,
) -> (u32, u32) {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let even = (stride as f64).sqrt().ceil() as u32;
    let step_first = even.min(max_first).max(1);

    let lines = first.div_ceil(step_first) as usize;
    let budget = (target / lines).max(1);
    #[allow(clippy::cast_possible_truncation)]
    let step_second = (second as usize).div_ceil(budget) as u32;

    (step_first, step_second.min(max_second).max(1))
}

/// The iterator returned by [`Sampler::samples`].
#[derive(Debug, Clone)]
pub struct Samples<'a> {
    pixels: &'a [Srgba<u8>],
    width: usize,
    stride: usize,
    next: usize,
}

impl Iterator for Samples<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.next;
        let color = *self.pixels.get(i)?;
        self.next = i + self.stride;

        #[allow(clippy::cast_possible_truncation)]
        Some(Sample {
            x: (i % self.width) as u32,
            y: (i / self.width) as u32,
            color,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.pixels.len().saturating_sub(self.next).div_ceil(self.stride);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Samples<'_> {}

impl FusedIterator for Samples<'_> {}

/// The iterator returned by [`Sampler::grid_samples`].
#[derive(Debug, Clone)]
pub struct GridSamples<'a> {
    pixels: &'a [Srgba<u8>],
    width: u32,
    height: u32,
    step_x: u32,
    step_y: u32,
    x: u32,
    y: u32,
}

impl GridSamples<'_> {
    /// The steps between samples along the x and y axes.
    #[must_use]
    pub const fn steps(&self) -> (u32, u32) {
        (self.step_x, self.step_y)
    }
}

impl Iterator for GridSamples<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.height {
            return None;
        }

        let (x, y) = (self.x, self.y);
        let color = *self.pixels.get(y as usize * self.width as usize + x as usize)?;

        self.x += self.step_x;
        if self.x >= self.width {
            self.x = 0;
            self.y += self.step_y;
        }

        Some(Sample { x, y, color })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.y >= self.height {
            return (0, Some(0));
        }
        let per_row = self.width.div_ceil(self.step_x) as usize;
        let rows = (self.height - self.y).div_ceil(self.step_y) as usize;
        let done = (self.x / self.step_x) as usize;
        let remaining = per_row * rows - done;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridSamples<'_> {}

impl FusedIterator for GridSamples<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;

    #[test]
    fn small_images_are_fully_sampled() {
        let pixels = flat_pixels(16, 16, RED);
        let buffer = buffer_of(16, 16, &pixels);
        let sampler = Sampler::new(buffer, Quality::Low);
        assert_eq!(sampler.stride(), 1);
        assert_eq!(sampler.num_samples(), 256);
        assert_eq!(sampler.samples().count(), 256);
    }

    #[test]
    fn samples_are_bounded_by_quality() {
        let pixels = flat_pixels(100, 25, RED);
        let buffer = buffer_of(100, 25, &pixels);

        let sampler = Sampler::new(buffer, Quality::Low);
        assert_eq!(sampler.stride(), 3);
        assert_eq!(sampler.num_samples(), 834);
        assert!(sampler.num_samples() <= Quality::Low.max_samples());
        assert_eq!(sampler.samples().len(), 834);

        let sampler = Sampler::new(buffer, Quality::Highest);
        assert_eq!(sampler.stride(), 1);
        assert_eq!(sampler.num_samples(), 2500);
    }

    #[test]
    fn samples_are_restartable_and_in_raster_order() {
        let pixels = flat_pixels(3, 2, RED);
        let buffer = buffer_of(3, 2, &pixels);
        let sampler = Sampler::with_max_samples(buffer, 3);
        assert_eq!(sampler.stride(), 2);

        let first = sampler.samples().map(|s| (s.x, s.y)).collect::<Vec<_>>();
        let second = sampler.samples().map(|s| (s.x, s.y)).collect::<Vec<_>>();
        assert_eq!(first, vec![(0, 0), (2, 0), (1, 1)]);
        assert_eq!(first, second);
        assert_eq!(sampler.colors().len(), 3);
    }

    #[test]
    fn grid_samples_cover_every_column_band() {
        let pixels = flat_pixels(1000, 1000, RED);
        let buffer = buffer_of(1000, 1000, &pixels);
        let sampler = Sampler::new(buffer, Quality::Low);
        // the raster stride is a multiple of the width, so every sample is in column 0
        assert_eq!(sampler.stride(), 1000);
        assert!(sampler.samples().all(|s| s.x == 0));

        let grid = sampler.grid_samples(125, u32::MAX);
        assert_eq!(grid.steps(), (32, 33));
        let samples = grid.clone().collect::<Vec<_>>();
        assert_eq!(samples.len(), grid.len());
        assert!(samples.len() <= Quality::Low.max_samples() as usize);

        let mut bands = [false; 8];
        for sample in &samples {
            bands[(sample.x / 125) as usize] = true;
        }
        assert!(bands.iter().all(|&hit| hit));
    }

    #[test]
    fn grid_steps_respect_the_limits() {
        let pixels = flat_pixels(40, 400, BLUE);
        let buffer = buffer_of(40, 400, &pixels);
        let sampler = Sampler::with_max_samples(buffer, 100);

        let grid = sampler.grid_samples(u32::MAX, 5);
        let (step_x, step_y) = grid.steps();
        assert_eq!(step_y, 5);
        assert!(step_x >= 1);
        assert_eq!(grid.len(), grid.count());

        let full = Sampler::new(buffer, Quality::Highest).grid_samples(u32::MAX, u32::MAX);
        assert_eq!(full.steps(), (1, 1));
        assert_eq!(full.count(), 16_000);
    }

    #[test]
    fn single_pixel() {
        let pixels = flat_pixels(1, 1, BLUE);
        let buffer = buffer_of(1, 1, &pixels);
        let sampler = Sampler::with_max_samples(buffer, 0);
        let expected = vec![Sample { x: 0, y: 0, color: BLUE }];
        assert_eq!(sampler.samples().collect::<Vec<_>>(), expected);
        assert_eq!(sampler.grid_samples(1, 1).collect::<Vec<_>>(), expected);
    }
}
