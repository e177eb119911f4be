//! Commission calculation for prospects.
//!
//! # Invariants
//! - `difference == current - previous` for every input.
//! - Unparsable inputs count as zero; parsing never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static FLOAT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float prefix regex")
});

/// Commissions derived from the four premium/percentage inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Commissions {
    #[serde(rename = "comissaoAnterior")]
    pub previous: f64,
    #[serde(rename = "comissaoAtual")]
    pub current: f64,
    #[serde(rename = "diferencaComissao")]
    pub difference: f64,
}

/// Parses the leading decimal number of `value`, ignoring trailing text.
///
/// `" 12.5kg"` yields `12.5`; `"abc"` and `""` yield `None`.
pub fn parse_float_prefix(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    FLOAT_PREFIX_RE
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|number| number.is_finite())
}

/// Turns a human percentage such as `"7"` or `"7%"` into a rate (`0.07`).
///
/// Only the first `%` is removed. Non-numeric input yields `0.0`.
pub fn parse_percentage(value: &str) -> f64 {
    let stripped = value.replacen('%', "", 1);
    parse_float_prefix(&stripped).map_or(0.0, |number| number / 100.0)
}

pub fn calculate_commissions(
    previous_premium: f64,
    previous_percent: &str,
    current_premium: f64,
    current_percent: &str,
) -> Commissions {
    let previous = finite_or_zero(previous_premium) * parse_percentage(previous_percent);
    let current = finite_or_zero(current_premium) * parse_percentage(current_percent);
    Commissions {
        previous,
        current,
        difference: current - previous,
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{calculate_commissions, parse_float_prefix, parse_percentage};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn renewal_with_higher_rate_gains_commission() {
        let commissions = calculate_commissions(5000.0, "5", 5000.0, "7");
        assert_close(commissions.previous, 250.0);
        assert_close(commissions.current, 350.0);
        assert_close(commissions.difference, 100.0);
    }

    #[test]
    fn percentage_accepts_suffix_and_prefix_numbers() {
        assert_close(parse_percentage("7%"), 0.07);
        assert_close(parse_percentage(" 12.5 %"), 0.125);
        assert_close(parse_percentage("10abc"), 0.10);
        assert_close(parse_percentage("-3"), -0.03);
    }

    #[test]
    fn non_numeric_percent_zeroes_only_that_side() {
        let commissions = calculate_commissions(4000.0, "n/a", 4000.0, "12");
        assert_eq!(commissions.previous, 0.0);
        assert_close(commissions.current, 480.0);
        assert_eq!(commissions.difference, commissions.current - commissions.previous);

        let empty = calculate_commissions(1000.0, "", 1000.0, "%");
        assert_eq!(empty.previous, 0.0);
        assert_eq!(empty.current, 0.0);
    }

    #[test]
    fn difference_is_exact_subtraction() {
        let cases = [
            (1234.56, "3.3", 987.65, "9.9"),
            (0.1, "33.3", 0.2, "66.6"),
            (1e9, "0.01", 3.0, "x"),
            (f64::NAN, "5", f64::INFINITY, "5"),
        ];
        for (pp, ppc, cp, cpc) in cases {
            let c = calculate_commissions(pp, ppc, cp, cpc);
            assert_eq!(c.difference, c.current - c.previous);
        }
    }

    #[test]
    fn float_prefix_rejects_non_numbers() {
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("1e2x"), Some(100.0));
    }
}
