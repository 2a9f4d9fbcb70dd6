use crate::error::MaskError;

/// A field value as handed over by the caller, before conforming.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Number(f64),
    /// No value at all; treated as the empty string.
    Missing,
}

impl RawValue {
    /// Renders the value as the text that gets conformed.
    ///
    /// Integral numbers drop the fractional part (`5.0` becomes `"5"`),
    /// very large or small magnitudes use exponent form (`1e-7`, `1e+21`).
    /// NaN and infinities are not numbers a field can hold and fail with
    /// [`MaskError::InvalidInput`].
    pub fn into_text(self) -> Result<String, MaskError> {
        match self {
            RawValue::Text(text) => Ok(text),
            RawValue::Number(n) if n.is_nan() => Err(MaskError::InvalidInput("NaN".to_string())),
            RawValue::Number(n) if n.is_infinite() => {
                let rendered = if n > 0.0 { "Infinity" } else { "-Infinity" };
                Err(MaskError::InvalidInput(rendered.to_string()))
            }
            RawValue::Number(n) => Ok(format_number(n)),
            RawValue::Missing => Ok(String::new()),
        }
    }
}

fn format_number(n: f64) -> String {
    let magnitude = n.abs();
    if magnitude == 0.0 {
        // covers -0.0
        "0".to_string()
    } else if !(1e-6..1e21).contains(&magnitude) {
        let rendered = format!("{n:e}");
        match rendered.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => rendered,
        }
    } else if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<&String> for RawValue {
    fn from(value: &String) -> Self {
        RawValue::Text(value.clone())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for RawValue {
                fn from(value: $t) -> Self {
                    RawValue::Text(value.to_string())
                }
            }
        )*
    };
}

impl_from_integer!(i32, i64, u32, u64, usize);

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawValue::Missing, Into::into)
    }
}

impl TryFrom<&serde_json::Value> for RawValue {
    type Error = MaskError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::String(text) => Ok(RawValue::Text(text.clone())),
            Value::Number(number) => Ok(match number.as_i64() {
                Some(n) => RawValue::Text(n.to_string()),
                None => match number.as_u64() {
                    Some(n) => RawValue::Text(n.to_string()),
                    None => RawValue::Number(number.as_f64().unwrap_or(f64::NAN)),
                },
            }),
            Value::Null => Ok(RawValue::Missing),
            other => Err(MaskError::InvalidInput(other.to_string())),
        }
    }
}

impl TryFrom<serde_json::Value> for RawValue {
    type Error = MaskError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        RawValue::try_from(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(RawValue::from("(555)"), "(555)")]
    #[case(RawValue::from(5551234_i64), "5551234")]
    #[case(RawValue::from(0_u32), "0")]
    #[case(RawValue::from(42.0_f64), "42")]
    #[case(RawValue::from(-3.5_f64), "-3.5")]
    #[case(RawValue::from(None::<&str>), "")]
    #[case(RawValue::from(Some("12")), "12")]
    #[case(RawValue::Missing, "")]
    fn renders_text(#[case] value: RawValue, #[case] expected: &str) {
        assert_eq!(value.into_text().unwrap(), expected);
    }

    #[rstest]
    #[case(1e-7, "1e-7")]
    #[case(2.5e-9, "2.5e-9")]
    #[case(1e21, "1e+21")]
    #[case(0.000001, "0.000001")]
    #[case(-0.0, "0")]
    #[case(123456.75, "123456.75")]
    fn renders_numbers_like_a_script_runtime(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(RawValue::from(value).into_text().unwrap(), expected);
    }

    #[rstest]
    #[case(f64::NAN, "NaN")]
    #[case(f64::INFINITY, "Infinity")]
    #[case(f64::NEG_INFINITY, "-Infinity")]
    fn rejects_non_finite_numbers(#[case] value: f64, #[case] rendered: &str) {
        let err = RawValue::from(value).into_text().unwrap_err();
        assert_eq!(err, MaskError::InvalidInput(rendered.to_string()));
    }

    #[rstest]
    #[case(json!("abc"), "abc")]
    #[case(json!(123), "123")]
    #[case(json!(0), "0")]
    #[case(json!(1.5), "1.5")]
    #[case(json!(2.0), "2")]
    #[case(json!(null), "")]
    fn converts_json_scalars(#[case] value: serde_json::Value, #[case] expected: &str) {
        let raw = RawValue::try_from(&value).unwrap();
        assert_eq!(raw.into_text().unwrap(), expected);
    }

    #[rstest]
    #[case(json!(true))]
    #[case(json!([1, 2]))]
    #[case(json!({"phone": "555"}))]
    fn rejects_other_json_types(#[case] value: serde_json::Value) {
        let err = RawValue::try_from(value.clone()).unwrap_err();
        assert_eq!(err, MaskError::InvalidInput(value.to_string()));
        assert!(err.to_string().contains("needs to be a string or a number"));
    }
}
