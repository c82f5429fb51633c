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

use crate::err::ScatError;

/// Odd-length biorthogonal analysis families used by the first
/// decomposition stage.
///
/// Each family carries an explicit lowpass/bandpass analysis pair. The `Bp`
/// variant additionally carries a third, half-band-modulated bandpass used
/// on the diagonal orientation pair, making the six directional responses
/// rotationally balanced; it must be paired with a quarter-shift family that
/// carries the same variant.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum BiortFamily {
    /// LeGall/CDF 5-3 analysis pair. Short taps, fastest option.
    LeGall53,
    /// Cohen-Daubechies-Feauveau 9-7 analysis pair.
    Cdf97,
    /// CDF 9-7 pair plus the modulated diagonal bandpass.
    Cdf97Bp,
}

const LEGALL53_LOWPASS: [f64; 5] = [-0.125, 0.25, 0.75, 0.25, -0.125];

const LEGALL53_BANDPASS: [f64; 3] = [-0.5, 1.0, -0.5];

const CDF97_LOWPASS: [f64; 9] = [
    0.03782845550726404,
    -0.023849465019556843,
    -0.11062440441843718,
    0.37740285561283066,
    0.85269867900889385,
    0.37740285561283066,
    -0.11062440441843718,
    -0.023849465019556843,
    0.03782845550726404,
];

const CDF97_BANDPASS: [f64; 7] = [
    0.06453888262893856,
    -0.04068941760955867,
    -0.41809227322221221,
    0.78848561640566439,
    -0.41809227322221221,
    -0.04068941760955867,
    0.06453888262893856,
];

/// The 9-7 lowpass modulated by a half-band sign flip. The four lowpass
/// zeros at the Nyquist frequency become zeros at DC, giving a bandpass
/// response used on the diagonal pair.
const CDF97_DIAGONAL: [f64; 9] = [
    0.03782845550726404,
    0.023849465019556843,
    -0.11062440441843718,
    -0.37740285561283066,
    0.85269867900889385,
    -0.37740285561283066,
    -0.11062440441843718,
    0.023849465019556843,
    0.03782845550726404,
];

impl BiortFamily {
    /// Parses a family from its canonical name.
    pub fn from_name(name: &str) -> Result<Self, ScatError> {
        match name {
            "legall_5_3" => Ok(BiortFamily::LeGall53),
            "cdf_9_7" => Ok(BiortFamily::Cdf97),
            "cdf_9_7_bp" => Ok(BiortFamily::Cdf97Bp),
            other => Err(ScatError::UnknownFilterFamily(other.to_owned())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BiortFamily::LeGall53 => "legall_5_3",
            BiortFamily::Cdf97 => "cdf_9_7",
            BiortFamily::Cdf97Bp => "cdf_9_7_bp",
        }
    }

    /// Whether the family carries the diagonal bandpass.
    pub fn has_diagonal(self) -> bool {
        matches!(self, BiortFamily::Cdf97Bp)
    }

    pub(crate) fn lowpass_taps(self) -> &'static [f64] {
        match self {
            BiortFamily::LeGall53 => LEGALL53_LOWPASS.as_slice(),
            BiortFamily::Cdf97 | BiortFamily::Cdf97Bp => CDF97_LOWPASS.as_slice(),
        }
    }

    pub(crate) fn bandpass_taps(self) -> &'static [f64] {
        match self {
            BiortFamily::LeGall53 => LEGALL53_BANDPASS.as_slice(),
            BiortFamily::Cdf97 | BiortFamily::Cdf97Bp => CDF97_BANDPASS.as_slice(),
        }
    }

    pub(crate) fn diagonal_taps(self) -> Option<&'static [f64]> {
        match self {
            BiortFamily::Cdf97Bp => Some(CDF97_DIAGONAL.as_slice()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for family in [BiortFamily::LeGall53, BiortFamily::Cdf97, BiortFamily::Cdf97Bp] {
            assert_eq!(BiortFamily::from_name(family.name()).unwrap(), family);
        }
        assert!(matches!(
            BiortFamily::from_name("haar"),
            Err(ScatError::UnknownFilterFamily(_))
        ));
    }

    #[test]
    fn test_bandpass_kills_dc() {
        for family in [BiortFamily::LeGall53, BiortFamily::Cdf97] {
            let sum: f64 = family.bandpass_taps().iter().sum();
            assert!(sum.abs() < 1e-7, "{}: {sum}", family.name());
        }
        let diag_sum: f64 = BiortFamily::Cdf97Bp.diagonal_taps().unwrap().iter().sum();
        assert!(diag_sum.abs() < 1e-4);
    }

    #[test]
    fn test_lowpass_passes_dc() {
        let legall: f64 = BiortFamily::LeGall53.lowpass_taps().iter().sum();
        assert!((legall - 1.0).abs() < 1e-12);
        let cdf: f64 = BiortFamily::Cdf97.lowpass_taps().iter().sum();
        assert!((cdf - std::f64::consts::SQRT_2).abs() < 1e-7);
    }
}
