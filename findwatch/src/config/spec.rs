//! Value specifications shared by the config file keys and the per-entity
//! setting keys.

/// Validation rule for a string value.
pub(crate) trait ValueSpecification {
    /// Returns Ok(()) if valid, Err(reason) if invalid.
    fn is_satisfied_by(&self, value: &str) -> Result<(), String>;
}

/// Accepts anything.
pub(crate) struct AnyStringSpec;

impl ValueSpecification for AnyStringSpec {
    fn is_satisfied_by(&self, _value: &str) -> Result<(), String> {
        Ok(())
    }
}

/// Value must be one of a fixed set of options (case-insensitive).
pub(crate) struct OneOfSpec {
    options: &'static [&'static str],
}

impl OneOfSpec {
    pub(crate) fn new(options: &'static [&'static str]) -> Self {
        Self { options }
    }
}

impl ValueSpecification for OneOfSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        let lower = value.trim().to_lowercase();
        if self.options.iter().any(|opt| *opt == lower) {
            Ok(())
        } else {
            Err(format!("must be one of: {}", self.options.join(", ")))
        }
    }
}

/// Positive integer (tick counts, milliseconds).
pub(crate) struct PositiveIntegerSpec;

impl ValueSpecification for PositiveIntegerSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        match value.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err("must be a positive integer".to_string()),
        }
    }
}

/// Finite, non-negative distance in meters.
pub(crate) struct DistanceSpec;

impl ValueSpecification for DistanceSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        parse_distance(value).map(|_| ())
    }
}

/// Boolean in any of the accepted spellings.
pub(crate) struct BooleanSpec;

impl ValueSpecification for BooleanSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        parse_bool(value).map(|_| ())
    }
}

/// Optional non-negative index (empty clears).
pub(crate) struct OptionalIndexSpec;

impl ValueSpecification for OptionalIndexSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        parse_optional_index(value).map(|_| ())
    }
}

/// Non-empty path.
pub(crate) struct PathSpec;

impl ValueSpecification for PathSpec {
    fn is_satisfied_by(&self, value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            Err("must be a valid path".to_string())
        } else {
            Ok(())
        }
    }
}

/// Parse true/false, yes/no, 1/0, on/off.
pub(crate) fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err("must be true/false, yes/no, 1/0, or on/off".to_string()),
    }
}

/// Parse a finite, non-negative number of meters.
pub(crate) fn parse_distance(value: &str) -> Result<f64, String> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Ok(n),
        _ => Err("must be a non-negative number of meters".to_string()),
    }
}

/// Parse an optional index; the empty string means none.
pub(crate) fn parse_optional_index(value: &str) -> Result<Option<usize>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<usize>()
        .map(Some)
        .map_err(|_| "must be a device index or empty".to_string())
}
