//! Argument parsers for `MIN:MAX` style values

use pv_smoke::{SpawnInterval, VelocityRange};

/// Split `"a:b"` into two numbers
fn parse_pair(value: &str) -> Result<(f64, f64), String> {
    let (a, b) = value
        .split_once(':')
        .ok_or_else(|| format!("expected MIN:MAX, got '{value}'"))?;
    let a = a
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid number '{a}': {e}"))?;
    let b = b
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid number '{b}': {e}"))?;
    if !(a.is_finite() && b.is_finite()) {
        return Err(format!("bounds must be finite, got '{value}'"));
    }
    Ok((a, b))
}

/// Parse a note spawn interval given as `X_START:X_END`
pub fn parse_interval(value: &str) -> Result<SpawnInterval, String> {
    let (start, end) = parse_pair(value)?;
    Ok(SpawnInterval::new(start, end))
}

/// Parse a velocity range given as `MIN:MAX` in pixels per second
pub fn parse_velocity(value: &str) -> Result<VelocityRange, String> {
    let (min, max) = parse_pair(value)?;
    Ok(VelocityRange::new(min, max))
}
