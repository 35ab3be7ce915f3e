use serde_json::Number;

use crate::ir::Schema;

/// Integral vs fractional, decided on the exact source text of the number
/// (`serde_json` is built with `arbitrary_precision`), never through `f64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumC {
    Integral,
    Fractional,
}

impl NumC {
    pub fn of(n: &Number) -> Self {
        if n.is_i64() || n.is_u64() {
            return NumC::Integral;
        }
        Self::of_text(&n.to_string())
    }

    /// `1.0`, `1.50e1` and `100e-2` are integral; `0.5` and `1e-2` are not.
    pub fn of_text(text: &str) -> Self {
        let unsigned = text.trim_start_matches(['-', '+']);
        let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
            Some(i) => (&unsigned[..i], parse_exponent(&unsigned[i + 1..])),
            None => (unsigned, 0),
        };
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

        let digits = format!("{int_part}{frac_part}");
        let significant = digits.trim_end_matches('0');
        if significant.trim_start_matches('0').is_empty() {
            return NumC::Integral;
        }
        let point = (int_part.len() as i64).saturating_add(exponent);
        if (significant.len() as i64) <= point {
            NumC::Integral
        } else {
            NumC::Fractional
        }
    }

    pub fn schema(self) -> Schema {
        match self {
            NumC::Integral => Schema::Int,
            NumC::Fractional => Schema::Decimal,
        }
    }
}

// Out-of-range exponents saturate in the direction of their sign.
fn parse_exponent(text: &str) -> i64 {
    text.parse::<i64>().unwrap_or(if text.starts_with('-') { i64::MIN / 2 } else { i64::MAX / 2 })
}
