//! Parsing of resource quantities (`250m`, `1.5`, `128Mi`, `1G`, `1Ei`).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid quantity '{0}'")]
pub struct QuantityError(pub String);

/// CPU quantity in millicores.
pub fn parse_cpu_millis(raw: &str) -> Result<u64, QuantityError> {
    let raw = raw.trim();
    let invalid = || QuantityError(raw.to_string());
    // Sub-millicore precision rounds up, as the API server does.
    let millis = match raw.strip_suffix('m') {
        Some(millis) => millis.parse::<f64>().map_err(|_| invalid())?,
        None => raw.parse::<f64>().map_err(|_| invalid())? * 1000.0,
    };
    if !millis.is_finite() || millis < 0.0 {
        return Err(invalid());
    }
    let millis = (millis * 1000.0).round() / 1000.0;
    Ok(millis.ceil() as u64)
}

/// Memory quantity in bytes.
pub fn parse_memory_bytes(raw: &str) -> Result<u64, QuantityError> {
    const SUFFIXES: [(&str, u64); 12] = [
        ("Ki", 1 << 10),
        ("Mi", 1 << 20),
        ("Gi", 1 << 30),
        ("Ti", 1 << 40),
        ("Pi", 1 << 50),
        ("Ei", 1 << 60),
        ("k", 1_000),
        ("M", 1_000_000),
        ("G", 1_000_000_000),
        ("T", 1_000_000_000_000),
        ("P", 1_000_000_000_000_000),
        ("E", 1_000_000_000_000_000_000),
    ];

    let raw = raw.trim();
    let invalid = || QuantityError(raw.to_string());
    let (number, factor) = SUFFIXES
        .iter()
        .find_map(|(suffix, factor)| raw.strip_suffix(suffix).map(|n| (n, *factor)))
        .unwrap_or((raw, 1));

    let value: f64 = number.parse().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok((value * factor as f64).round() as u64)
}
