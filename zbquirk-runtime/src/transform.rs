//! Inbound report value transforms
//!
//! Pure functions of the raw value and static parameters; no transform
//! here needs the previous value. Each preserves the wire shape of the
//! attribute it rewrites.

use zbquirk_model::AttributeValue;

/// A calibration or unit-conversion transform applied to one attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportTransform {
    /// Correct a miscalibrated log-lux illuminance reading
    IlluminanceLogLux,
    /// Multiply the raw value (battery percentage arrives halved)
    Scale { factor: u32 },
}

impl ReportTransform {
    pub fn apply(&self, value: AttributeValue) -> AttributeValue {
        let Some(raw) = value.as_u64() else {
            tracing::debug!(?value, "transform skipped: negative raw value");
            return value;
        };
        let transformed = match self {
            ReportTransform::IlluminanceLogLux => correct_illuminance(raw),
            ReportTransform::Scale { factor } => raw.saturating_mul(u64::from(*factor)),
        };
        value.with_u64(transformed)
    }
}

/// Recalibrate a log-lux encoded illuminance measurement
///
/// The sensor reports `v` with `lux = 10^((v-1)/10000)` but its optics
/// read consistently off; the correction is piecewise (linear in the two
/// lower bands, quadratic above 2500 lux), clamped to at least 1 lux, and
/// re-encoded the same way. Rounding is half away from zero.
fn correct_illuminance(raw: u64) -> u64 {
    let lux = 10f64.powf((raw as f64 - 1.0) / 10_000.0);

    let corrected = if lux <= 2_200.0 {
        -7.969_192 + 0.015_198_8 * lux
    } else if lux <= 2_500.0 {
        -1_069.189_434 + 0.495_066_3 * lux
    } else {
        78_029.216_28 - 61.735_75 * lux + 0.012_235_67 * lux * lux
    };
    let corrected = corrected.max(1.0);

    let encoded = (10_000.0 * corrected.log10() + 1.0).round();
    encoded as u64
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    // Fixtures cover all three correction bands and both clamp cases.
    #[rstest]
    #[case(1, 1)] // 1 lux corrects below the floor
    #[case(20_000, 1)] // ~100 lux still clamps to 1
    #[case(30_001, 8_592)] // 1000 lux, linear band
    #[case(33_424, 14_059)] // just under the 2200 lux breakpoint
    #[case(33_980, 22_263)] // middle band
    #[case(34_000, 21_989)] // just past the 2500 lux breakpoint
    #[case(34_500, 30_868)] // quadratic band
    #[case(35_000, 37_118)]
    #[case(40_000, 58_350)]
    fn test_illuminance_fixtures(#[case] raw: u16, #[case] expected: u16) {
        let out = ReportTransform::IlluminanceLogLux.apply(AttributeValue::U16(raw));
        assert_eq!(out, AttributeValue::U16(expected));
    }

    #[test]
    fn test_illuminance_preserves_shape() {
        let out = ReportTransform::IlluminanceLogLux.apply(AttributeValue::U16(20_000));
        assert!(matches!(out, AttributeValue::U16(_)));
    }

    #[test]
    fn test_scale_doubles_battery() {
        let out = ReportTransform::Scale { factor: 2 }.apply(AttributeValue::U8(50));
        assert_eq!(out, AttributeValue::U8(100));
    }

    #[test]
    fn test_scale_saturates_in_shape() {
        let out = ReportTransform::Scale { factor: 2 }.apply(AttributeValue::U8(200));
        assert_eq!(out, AttributeValue::U8(u8::MAX));
    }

    #[test]
    fn test_negative_value_passes_through() {
        let out = ReportTransform::Scale { factor: 2 }.apply(AttributeValue::I32(-5));
        assert_eq!(out, AttributeValue::I32(-5));
    }
}
