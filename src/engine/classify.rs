use crate::error::EngineError;

/// Classifies a numeric value against an ordered threshold table.
///
/// `thresholds` is a sequence of `(lower_bound, label)` pairs sorted
/// descending by bound, e.g. `[(90.0, "A"), (80.0, "B"), ..., (0.0, "F")]`.
/// The first bound `<=` value wins, so a value sitting exactly on a bound
/// takes that bound's label.
///
/// # Errors
///
/// Returns [`EngineError::InvalidThreshold`] when no bound covers the
/// value; the caller is expected to end the table with a catch-all bound.
pub fn classify<'a>(value: f64, thresholds: &'a [(f64, String)]) -> Result<&'a str, EngineError> {
    thresholds
        .iter()
        .find(|(bound, _)| *bound <= value)
        .map(|(_, label)| label.as_str())
        .ok_or(EngineError::InvalidThreshold { value })
}
