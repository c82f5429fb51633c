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

//! Prepared analysis banks.
//!
//! The static family tables are f64; a [`FilterBank`] holds them converted
//! to the working sample type, with the lowpass rescaled to unit DC gain so
//! that every decomposition stage preserves the image mean. Quarter-shift
//! families tabulate only their lowpass; the bandpass is derived here by the
//! alternating flip.

use crate::ScatSample;
use crate::biort::BiortFamily;
use crate::err::ScatError;
use crate::qshift::QshiftFamily;

/// An analysis filter triple prepared for one decomposition stage.
#[derive(Clone, Debug)]
pub(crate) struct FilterBank<T> {
    lowpass: Vec<T>,
    bandpass: Vec<T>,
    diagonal: Option<Vec<T>>,
}

/// Rejects family pairs that disagree on the diagonal bandpass.
///
/// A `Bp` first stage feeds six rotationally balanced orientations into the
/// second stage; a plain second stage would silently undo that, so mixed
/// pairs are refused up front.
pub(crate) fn validate_pairing(
    biort: BiortFamily,
    qshift: QshiftFamily,
) -> Result<(), ScatError> {
    if biort.has_diagonal() != qshift.has_diagonal() {
        return Err(ScatError::IncompatibleFamilies(biort.name(), qshift.name()));
    }
    Ok(())
}

fn unit_dc(taps: &[f64]) -> Vec<f64> {
    let sum: f64 = taps.iter().sum();
    taps.iter().map(|t| t / sum).collect()
}

/// Alternating flip: `h1[n] = (-1)^n h0[N-1-n]`. For an even-length
/// quarter-shift lowpass this yields the matching bandpass of the dual tree.
fn alternating_flip(taps: &[f64]) -> Vec<f64> {
    taps.iter()
        .rev()
        .enumerate()
        .map(|(n, t)| if n % 2 == 0 { *t } else { -*t })
        .collect()
}

fn convert<T: ScatSample>(taps: &[f64]) -> Vec<T> {
    taps.iter().map(|t| T::from_f64(*t)).collect()
}

impl<T: ScatSample> FilterBank<T> {
    pub(crate) fn from_biort(family: BiortFamily) -> FilterBank<T> {
        FilterBank {
            lowpass: convert(&unit_dc(family.lowpass_taps())),
            bandpass: convert(family.bandpass_taps()),
            diagonal: family.diagonal_taps().map(convert),
        }
    }

    pub(crate) fn from_qshift(family: QshiftFamily) -> FilterBank<T> {
        let lowpass = family.lowpass_taps();
        FilterBank {
            lowpass: convert(&unit_dc(lowpass)),
            bandpass: convert(&alternating_flip(lowpass)),
            diagonal: family.diagonal_taps().map(convert),
        }
    }

    pub(crate) fn lowpass(&self) -> &[T] {
        &self.lowpass
    }

    pub(crate) fn bandpass(&self) -> &[T] {
        &self.bandpass
    }

    /// The diagonal bandpass, falling back to the ordinary bandpass for
    /// families without one.
    pub(crate) fn diagonal(&self) -> &[T] {
        self.diagonal.as_deref().unwrap_or(&self.bandpass)
    }
}
