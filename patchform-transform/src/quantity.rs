//! Kubernetes-style resource quantities (`500m`, `2Gi`, `1.5k`, `3e2`).

use crate::error::{TransformError, TransformResult};

/// Parse a quantity string into its numeric value.
pub fn parse_quantity(input: &str) -> TransformResult<f64> {
    let fail = |reason: &str| TransformError::Parse {
        input: input.to_string(),
        target: "quantity",
        reason: reason.to_string(),
    };

    let split = input
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '+' || c == '-'))))
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    let (number, suffix) = input.split_at(split);

    if !number.bytes().any(|b| b.is_ascii_digit()) {
        return Err(fail("missing numeric part"));
    }
    let value: f64 = number.parse().map_err(|_| fail("invalid number"))?;

    let scaled = match suffix {
        "" => value,
        "Ki" => value * 1024f64,
        "Mi" => value * 1024f64.powi(2),
        "Gi" => value * 1024f64.powi(3),
        "Ti" => value * 1024f64.powi(4),
        "Pi" => value * 1024f64.powi(5),
        "Ei" => value * 1024f64.powi(6),
        "n" => scale(value, -9),
        "u" => scale(value, -6),
        "m" => scale(value, -3),
        "k" => scale(value, 3),
        "M" => scale(value, 6),
        "G" => scale(value, 9),
        "T" => scale(value, 12),
        "P" => scale(value, 15),
        "E" => scale(value, 18),
        exp if exp.starts_with(['e', 'E']) => {
            let power: i32 = exp[1..]
                .parse()
                .map_err(|_| fail("invalid exponent"))?;
            scale(value, power)
        }
        _ => return Err(fail("unknown suffix")),
    };

    if scaled.is_finite() {
        Ok(scaled)
    } else {
        Err(fail("out of range"))
    }
}

/// Multiply by a power of ten, dividing for negative powers to keep values
/// such as `1000m` exact.
fn scale(value: f64, power: i32) -> f64 {
    if power < 0 {
        value / 10f64.powi(-power)
    } else {
        value * 10f64.powi(power)
    }
}
