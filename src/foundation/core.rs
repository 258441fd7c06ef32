pub use kurbo::{Point, Rect, Size, Vec2};

/// Format a JSON scalar the way it reads in a node label.
///
/// Integral numbers print without a fractional part, so `1000.0` and `1000` both read `1000`.
/// Strings print verbatim; anything else falls back to its JSON text.
pub(crate) fn display_scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64().unwrap_or(0.0);
                if f.fract() == 0.0 && f.abs() < 1e15 {
                    format!("{}", f as i64)
                } else {
                    format!("{f}")
                }
            }
        }
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Vertical center of a rectangle's left edge.
pub(crate) fn left_center(r: Rect) -> Point {
    Point::new(r.x0, r.center().y)
}

/// Vertical center of a rectangle's right edge.
pub(crate) fn right_center(r: Rect) -> Point {
    Point::new(r.x1, r.center().y)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
