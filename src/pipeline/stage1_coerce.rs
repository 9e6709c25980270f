use crate::model::profile::MISSING_TOKENS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Missing,
    Number(f64),
}

/// Placeholder check on the raw cell text, before any decoration is stripped.
pub fn is_missing(raw: Option<&str>) -> bool {
    match raw {
        None => true,
        Some(s) => MISSING_TOKENS.contains(&s),
    }
}

pub fn classify_cell(raw: Option<&str>) -> CellValue {
    if is_missing(raw) {
        CellValue::Missing
    } else {
        CellValue::Number(parse_to_number(raw))
    }
}

/// Total conversion of display text ("$1,250.5", "87.3%") to a number.
/// Placeholders and anything unparseable resolve to 0.
pub fn parse_to_number(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let cleaned = raw.replace(['%', ',', '$'], "");
    let cleaned = cleaned.trim();
    if MISSING_TOKENS.contains(&cleaned) {
        return 0.0;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_coerce.rs"]
mod tests;
