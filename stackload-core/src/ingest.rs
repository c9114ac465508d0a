//! Lenient handling of values arriving from table editors and imports.
//!
//! Cells in bundle and vehicle rows may hold numbers, numeric strings, blanks
//! or `null`. Ingestion never fails on a malformed cell: anything that is not a
//! finite, non-negative number coerces to `0.0`, and rows whose dimensions end
//! up at zero are dropped later by the consolidator and the normalizer.

/// Clamp a raw measurement into a usable value.
///
/// Returns `0.0` for non-finite and negative input.
///
/// # Examples
/// ```
/// use stackload_core::sanitise_measure;
///
/// assert_eq!(sanitise_measure(12.5), 12.5);
/// assert_eq!(sanitise_measure(-3.0), 0.0);
/// assert_eq!(sanitise_measure(f64::NAN), 0.0);
/// ```
#[must_use]
pub const fn sanitise_measure(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parse a spreadsheet-style cell into a number, treating junk as zero.
///
/// # Examples
/// ```
/// use stackload_core::parse_measure;
///
/// assert_eq!(parse_measure(" 42 "), 42.0);
/// assert_eq!(parse_measure(""), 0.0);
/// assert_eq!(parse_measure("n/a"), 0.0);
/// ```
#[must_use]
pub fn parse_measure(raw: &str) -> f64 {
    raw.trim().parse::<f64>().map_or(0.0, sanitise_measure)
}

#[cfg(feature = "serde")]
pub(crate) mod lenient {
    //! `deserialize_with` helpers accepting whatever a cell happens to hold.

    use std::fmt;

    use serde::Deserializer;
    use serde::de::{self, Visitor};

    use super::{parse_measure, sanitise_measure};

    struct MeasureVisitor;

    impl<'de> Visitor<'de> for MeasureVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a number, a numeric string, a blank cell or null")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            Ok(sanitise_measure(value))
        }

        #[expect(
            clippy::cast_precision_loss,
            reason = "cell values beyond 2^53 are not meaningful measurements"
        )]
        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(sanitise_measure(value as f64))
        }

        #[expect(
            clippy::cast_precision_loss,
            reason = "cell values beyond 2^53 are not meaningful measurements"
        )]
        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(sanitise_measure(value as f64))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            Ok(parse_measure(value))
        }

        fn visit_bool<E: de::Error>(self, _value: bool) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_unit<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_none<E: de::Error>(self) -> Result<f64, E> {
            Ok(0.0)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<f64, D::Error> {
            deserializer.deserialize_any(Self)
        }
    }

    struct LabelVisitor;

    impl<'de> Visitor<'de> for LabelVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a string, a number or null")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<String, E> {
            Ok(value.to_owned())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<String, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<String, E> {
            Ok(value.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<String, D::Error> {
            deserializer.deserialize_any(Self)
        }
    }

    /// Deserialise a measurement cell, coercing malformed input to zero.
    pub(crate) fn measure<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MeasureVisitor)
    }

    /// Deserialise a free-text cell; numbers keep their textual form.
    pub(crate) fn label<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LabelVisitor)
    }
}
