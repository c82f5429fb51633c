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

//! Flattening of stage coefficients into a single real channel axis.
//!
//! The layout is sub-band major: the pooled lowpass channels come first,
//! followed by the six magnitude bands in orientation order, each band
//! contributing its magnitude channels. A standard stage over `C` channels
//! flattens to `7 C`; a combine-colour stage flattens to `3 + 6`.
//!
//! Flattening is a pure permutation-copy, so the gradient path is the same
//! copy in the other direction.

use crate::decompose::ORIENTATIONS;
use crate::err::ScatError;
use crate::tensor::{BandTensor, ImageTensor, ScatCoeffs};
use std::fmt::Debug;

/// Flattens a coefficient bundle into `[batch, flat_channels, h, w]`.
pub(crate) fn assemble<T: Copy + Default + Debug>(
    coeffs: &ScatCoeffs<T>,
) -> Result<ImageTensor<T>, ScatError> {
    let low = &coeffs.lowpass;
    let mag = &coeffs.magnitudes;
    let mut out = ImageTensor::zeros(low.batch, coeffs.flat_channels(), low.height, low.width)?;
    for b in 0..low.batch {
        for c in 0..low.channels {
            out.plane_mut(b, c).copy_from_slice(low.plane(b, c));
        }
        for band in 0..mag.bands {
            for c in 0..mag.channels {
                let flat = low.channels + band * mag.channels + c;
                out.plane_mut(b, flat).copy_from_slice(mag.plane(b, band, c));
            }
        }
    }
    Ok(out)
}

/// Splits a flat gradient back into per-bundle gradients, undoing
/// [`assemble`]. `lowpass_channels` and `mag_channels` describe the bundle
/// the flat tensor was assembled from.
pub(crate) fn split<T: Copy + Default + Debug>(
    flat: &ImageTensor<T>,
    lowpass_channels: usize,
    mag_channels: usize,
    combined_colour: bool,
) -> Result<ScatCoeffs<T>, ScatError> {
    let expected = lowpass_channels + ORIENTATIONS * mag_channels;
    if flat.channels != expected {
        return Err(ScatError::GradientShapeMismatch(
            expected * flat.height * flat.width * flat.batch,
            flat.data.len(),
        ));
    }
    let mut lowpass = ImageTensor::zeros(flat.batch, lowpass_channels, flat.height, flat.width)?;
    let mut magnitudes =
        BandTensor::zeros(flat.batch, ORIENTATIONS, mag_channels, flat.height, flat.width)?;
    for b in 0..flat.batch {
        for c in 0..lowpass_channels {
            lowpass.plane_mut(b, c).copy_from_slice(flat.plane(b, c));
        }
        for band in 0..ORIENTATIONS {
            for c in 0..mag_channels {
                let src = lowpass_channels + band * mag_channels + c;
                magnitudes
                    .plane_mut(b, band, c)
                    .copy_from_slice(flat.plane(b, src));
            }
        }
    }
    Ok(ScatCoeffs {
        lowpass,
        magnitudes,
        combined_colour,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(batch: usize, channels: usize, mag_channels: usize) -> ScatCoeffs<f64> {
        let mut lowpass = ImageTensor::zeros(batch, channels, 2, 2).unwrap();
        let mut magnitudes = BandTensor::zeros(batch, ORIENTATIONS, mag_channels, 2, 2).unwrap();
        for (i, v) in lowpass.data.iter_mut().enumerate() {
            *v = i as f64;
        }
        for (i, v) in magnitudes.data.iter_mut().enumerate() {
            *v = 1000.0 + i as f64;
        }
        ScatCoeffs {
            lowpass,
            magnitudes,
            combined_colour: mag_channels != channels,
        }
    }

    #[test]
    fn test_subband_major_order() {
        let coeffs = bundle(1, 2, 2);
        let flat = assemble(&coeffs).unwrap();
        assert_eq!(flat.channels, 14);
        // Lowpass block first.
        assert_eq!(flat.plane(0, 0), coeffs.lowpass.plane(0, 0));
        assert_eq!(flat.plane(0, 1), coeffs.lowpass.plane(0, 1));
        // Then band 0 channel 0, band 0 channel 1, band 1 channel 0 ...
        assert_eq!(flat.plane(0, 2), coeffs.magnitudes.plane(0, 0, 0));
        assert_eq!(flat.plane(0, 3), coeffs.magnitudes.plane(0, 0, 1));
        assert_eq!(flat.plane(0, 4), coeffs.magnitudes.plane(0, 1, 0));
        assert_eq!(flat.plane(0, 13), coeffs.magnitudes.plane(0, 5, 1));
    }

    #[test]
    fn test_combine_colour_flattens_to_nine() {
        let coeffs = bundle(2, 3, 1);
        let flat = assemble(&coeffs).unwrap();
        assert_eq!(flat.channels, 9);
        assert_eq!(flat.plane(1, 2), coeffs.lowpass.plane(1, 2));
        assert_eq!(flat.plane(1, 3), coeffs.magnitudes.plane(1, 0, 0));
        assert_eq!(flat.plane(1, 8), coeffs.magnitudes.plane(1, 5, 0));
    }

    #[test]
    fn test_split_inverts_assemble() {
        let coeffs = bundle(2, 3, 3);
        let flat = assemble(&coeffs).unwrap();
        let back = split(&flat, 3, 3, false).unwrap();
        assert_eq!(back.lowpass.data, coeffs.lowpass.data);
        assert_eq!(back.magnitudes.data, coeffs.magnitudes.data);
    }

    #[test]
    fn test_split_rejects_wrong_channel_count() {
        let flat = ImageTensor::<f64>::zeros(1, 10, 2, 2).unwrap();
        assert!(matches!(
            split(&flat, 3, 1, true),
            Err(ScatError::GradientShapeMismatch(_, _))
        ));
    }
}
