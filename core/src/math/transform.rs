/// Natural log with the resistivity sentinel convention the model was trained on.
///
/// Zero readings are treated as missing before taking the log and the missing
/// result is then written as `0.0`. Because the fill happens after the log,
/// negative and already-missing readings end up as `0.0` too. A result of
/// `0.0` is therefore ambiguous with a true reading of `1.0`.
pub fn log_or_zero(value: f64) -> f64 {
    if value > 0.0 {
        value.ln()
    } else {
        0.0
    }
}

pub fn log_or_zero_column(values: &[f64]) -> Vec<f64> {
    values.iter().copied().map(log_or_zero).collect()
}
