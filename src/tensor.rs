/*
 * // Copyright (c) the scatlet developers 08/2026. All rights reserved.
 * //
 * // Redistribution and use in source and binary forms, with or without modification,
 * // are permitted provided that the following conditions are met:
 * //
 * // 1.  Redistributions of source code must retain the above copyright notice, this
 * // list of conditions and the following disclaimer.
 * //
 * // 2.  Redistributions in binary form must reproduce the above copyright notice,
 * // this list of conditions and the following disclaimer in the documentation
 * // and/or other materials provided with the distribution.
 * //
 * // 3.  Neither the name of the copyright holder nor the names of its
 * // contributors may be used to endorse or promote products derived from
 * // this software without specific prior written permission.
 * //
 * // THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * // AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * // IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * // DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * // FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * // DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * // SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * // CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * // OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * // OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use crate::err::{ScatError, try_vec};
use std::fmt::Debug;

/// A real image batch stored flat in row-major order,
/// `[batch, channel, height, width]`.
#[derive(Debug, Clone)]
pub struct ImageTensor<T> {
    /// Flat samples, `batch * channels * height * width` long.
    pub data: Vec<T>,
    pub batch: usize,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl<T: Copy + Default + Debug> ImageTensor<T> {
    /// Wraps an existing buffer, validating that its length matches the
    /// declared dimensions.
    pub fn new(
        data: Vec<T>,
        batch: usize,
        channels: usize,
        height: usize,
        width: usize,
    ) -> Result<Self, ScatError> {
        if batch == 0 || channels == 0 || height == 0 || width == 0 {
            return Err(ScatError::ZeroedBaseSize);
        }
        let expected = batch
            .checked_mul(channels)
            .and_then(|v| v.checked_mul(height))
            .and_then(|v| v.checked_mul(width))
            .ok_or(ScatError::OutOfMemory(usize::MAX))?;
        if data.len() != expected {
            return Err(ScatError::InputSizeMismatch(expected, data.len()));
        }
        Ok(Self {
            data,
            batch,
            channels,
            height,
            width,
        })
    }

    /// Allocates a zero-filled tensor of the given dimensions.
    pub fn zeros(
        batch: usize,
        channels: usize,
        height: usize,
        width: usize,
    ) -> Result<Self, ScatError> {
        if batch == 0 || channels == 0 || height == 0 || width == 0 {
            return Err(ScatError::ZeroedBaseSize);
        }
        let total = batch
            .checked_mul(channels)
            .and_then(|v| v.checked_mul(height))
            .and_then(|v| v.checked_mul(width))
            .ok_or(ScatError::OutOfMemory(usize::MAX))?;
        let data = try_vec![T::default(); total];
        Ok(Self {
            data,
            batch,
            channels,
            height,
            width,
        })
    }

    #[inline]
    pub(crate) fn plane_len(&self) -> usize {
        self.height * self.width
    }

    /// One `height x width` spatial plane.
    #[inline]
    pub fn plane(&self, batch: usize, channel: usize) -> &[T] {
        let stride = self.plane_len();
        let offset = (batch * self.channels + channel) * stride;
        &self.data[offset..offset + stride]
    }

    /// Mutable view of one spatial plane.
    #[inline]
    pub fn plane_mut(&mut self, batch: usize, channel: usize) -> &mut [T] {
        let stride = self.plane_len();
        let offset = (batch * self.channels + channel) * stride;
        &mut self.data[offset..offset + stride]
    }
}

/// Directional sub-band stack, `[batch, band, channel, height, width]`.
///
/// Used both for the six magnitude bands of the decomposer output and for
/// the saved pre-magnitude responses.
#[derive(Debug, Clone)]
pub struct BandTensor<T> {
    pub data: Vec<T>,
    pub batch: usize,
    pub bands: usize,
    pub channels: usize,
    pub height: usize,
    pub width: usize,
}

impl<T: Copy + Default + Debug> BandTensor<T> {
    pub fn zeros(
        batch: usize,
        bands: usize,
        channels: usize,
        height: usize,
        width: usize,
    ) -> Result<Self, ScatError> {
        if batch == 0 || bands == 0 || channels == 0 || height == 0 || width == 0 {
            return Err(ScatError::ZeroedBaseSize);
        }
        let total = batch
            .checked_mul(bands)
            .and_then(|v| v.checked_mul(channels))
            .and_then(|v| v.checked_mul(height))
            .and_then(|v| v.checked_mul(width))
            .ok_or(ScatError::OutOfMemory(usize::MAX))?;
        let data = try_vec![T::default(); total];
        Ok(Self {
            data,
            batch,
            bands,
            channels,
            height,
            width,
        })
    }

    #[inline]
    pub(crate) fn plane_len(&self) -> usize {
        self.height * self.width
    }

    #[inline]
    pub fn plane(&self, batch: usize, band: usize, channel: usize) -> &[T] {
        let stride = self.plane_len();
        let offset = ((batch * self.bands + band) * self.channels + channel) * stride;
        &self.data[offset..offset + stride]
    }

    #[inline]
    pub fn plane_mut(&mut self, batch: usize, band: usize, channel: usize) -> &mut [T] {
        let stride = self.plane_len();
        let offset = ((batch * self.bands + band) * self.channels + channel) * stride;
        &mut self.data[offset..offset + stride]
    }
}

/// Pre-flatten output of one decomposition stage: the pooled lowpass block
/// plus the directional magnitude stack.
///
/// The sub-band axis has width `1 + bands` in the standard layout; in
/// combine-colour mode the lowpass block keeps its 3 colour channels while
/// the magnitude stack collapses to a single greyscale channel per band, and
/// the sub-band axis width is 2 (lowpass block, magnitude block).
#[derive(Debug, Clone)]
pub struct ScatCoeffs<T> {
    /// `[batch, channel, height, width]` pooled lowpass.
    pub lowpass: ImageTensor<T>,
    /// `[batch, band, channel, height, width]` smoothed magnitudes.
    pub magnitudes: BandTensor<T>,
    /// Whether the magnitude stack was pooled across colour channels.
    pub combined_colour: bool,
}

impl<T: Copy + Default + Debug> ScatCoeffs<T> {
    /// Width of the sub-band axis before flattening: 7 in the standard
    /// layout, 2 in combine-colour mode.
    pub fn subband_width(&self) -> usize {
        if self.combined_colour {
            2
        } else {
            1 + self.magnitudes.bands
        }
    }

    /// Number of channels the assembler will produce for this bundle.
    pub fn flat_channels(&self) -> usize {
        self.lowpass.channels + self.magnitudes.bands * self.magnitudes.channels
    }
}
