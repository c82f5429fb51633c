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

/// Even-length quarter-shift families used by the second decomposition
/// stage.
///
/// Only the lowpass is tabulated; the matching bandpass is derived at bank
/// construction time by the alternating flip, which keeps the two trees in
/// approximate quadrature. As with [`crate::biort::BiortFamily`], the `Bp`
/// variant carries a modulated diagonal bandpass and must be paired with a
/// biorthogonal family of the same variant.
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum QshiftFamily {
    /// 10-tap quarter-shift lowpass.
    Qshift10,
    /// 14-tap quarter-shift lowpass, flatter passband.
    Qshift14,
    /// 14-tap pair plus the modulated diagonal bandpass.
    Qshift14Bp,
}

const QSHIFT10_LOWPASS: [f64; 10] = [
    0.03516384000000,
    0.0,
    -0.08832942000000,
    0.23389032000000,
    0.76027237000000,
    0.58751830000000,
    0.0,
    -0.11430184000000,
    0.0,
    0.0,
];

const QSHIFT14_LOWPASS: [f64; 14] = [
    0.00325314000000,
    -0.00388321000000,
    0.03466035000000,
    -0.03887280000000,
    -0.11720389000000,
    0.27529538000000,
    0.75614564000000,
    0.56881042000000,
    0.01186609000000,
    -0.10671180000000,
    0.02382538000000,
    0.01702522000000,
    -0.00543948000000,
    -0.00455690000000,
];

/// The 14-tap lowpass under a half-band sign flip, used on the diagonal
/// orientation pair. Its DC gain is the lowpass response at the Nyquist
/// frequency, which the table suppresses below 1e-6.
const QSHIFT14_DIAGONAL: [f64; 14] = [
    0.00325314000000,
    0.00388321000000,
    0.03466035000000,
    0.03887280000000,
    -0.11720389000000,
    -0.27529538000000,
    0.75614564000000,
    -0.56881042000000,
    0.01186609000000,
    0.10671180000000,
    0.02382538000000,
    -0.01702522000000,
    -0.00543948000000,
    0.00455690000000,
];

impl QshiftFamily {
    /// Parses a family from its canonical name.
    pub fn from_name(name: &str) -> Result<Self, ScatError> {
        match name {
            "qshift_10" => Ok(QshiftFamily::Qshift10),
            "qshift_14" => Ok(QshiftFamily::Qshift14),
            "qshift_14_bp" => Ok(QshiftFamily::Qshift14Bp),
            other => Err(ScatError::UnknownFilterFamily(other.to_owned())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            QshiftFamily::Qshift10 => "qshift_10",
            QshiftFamily::Qshift14 => "qshift_14",
            QshiftFamily::Qshift14Bp => "qshift_14_bp",
        }
    }

    /// Whether the family carries the diagonal bandpass.
    pub fn has_diagonal(self) -> bool {
        matches!(self, QshiftFamily::Qshift14Bp)
    }

    pub(crate) fn lowpass_taps(self) -> &'static [f64] {
        match self {
            QshiftFamily::Qshift10 => QSHIFT10_LOWPASS.as_slice(),
            QshiftFamily::Qshift14 | QshiftFamily::Qshift14Bp => QSHIFT14_LOWPASS.as_slice(),
        }
    }

    pub(crate) fn diagonal_taps(self) -> Option<&'static [f64]> {
        match self {
            QshiftFamily::Qshift14Bp => Some(QSHIFT14_DIAGONAL.as_slice()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for family in [
            QshiftFamily::Qshift10,
            QshiftFamily::Qshift14,
            QshiftFamily::Qshift14Bp,
        ] {
            assert_eq!(QshiftFamily::from_name(family.name()).unwrap(), family);
        }
        assert!(matches!(
            QshiftFamily::from_name("qshift_6"),
            Err(ScatError::UnknownFilterFamily(_))
        ));
    }

    #[test]
    fn test_lowpass_passes_dc() {
        for family in [QshiftFamily::Qshift10, QshiftFamily::Qshift14] {
            let sum: f64 = family.lowpass_taps().iter().sum();
            assert!(
                (sum - std::f64::consts::SQRT_2).abs() < 1e-7,
                "{}: {sum}",
                family.name()
            );
        }
    }

    #[test]
    fn test_diagonal_kills_dc() {
        let sum: f64 = QshiftFamily::Qshift14Bp.diagonal_taps().unwrap().iter().sum();
        assert!(sum.abs() < 1e-5);
    }
}
