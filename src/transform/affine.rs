//! Affine transform helpers.
//!
//! Matrices are [`kurbo::Affine`] values with coefficients `[a, b, c, d, e, f]` acting on column
//! vectors:
//!
//! ```text
//! | a  c  e |
//! | b  d  f |
//! | 0  0  1 |
//! ```
//!
//! This is the same layout as the CSS `matrix(a, b, c, d, e, f)` function, so values read from an
//! element can be inverted and written back without reordering. `compose(a, b)` applies `b` first.

use crate::{
    foundation::core::{Affine, ElementId},
    foundation::error::{RegionError, RegionResult},
    foundation::math::{EPSILON, SINGULAR_DET, approx_eq_f64},
    scene::Scene,
};

#[inline]
pub fn identity() -> Affine {
    Affine::IDENTITY
}

#[inline]
pub fn compose(a: Affine, b: Affine) -> Affine {
    a * b
}

/// Invert `m`, refusing singular matrices instead of producing NaN/inf coefficients.
pub fn invert(m: Affine) -> RegionResult<Affine> {
    let det = m.determinant();
    if !det.is_finite() || det.abs() <= SINGULAR_DET {
        return Err(RegionError::NonInvertibleMatrix { det });
    }
    let inv = m.inverse();
    if !inv.as_coeffs().iter().all(|v| v.is_finite()) {
        return Err(RegionError::NonInvertibleMatrix { det });
    }
    Ok(inv)
}

/// Coefficient-wise comparison with a tolerance scaled by magnitude.
pub fn approx_eq(a: Affine, b: Affine) -> bool {
    a.as_coeffs()
        .iter()
        .zip(b.as_coeffs().iter())
        .all(|(&x, &y)| approx_eq_f64(x, y, EPSILON * x.abs().max(y.abs()).max(1.0)))
}

pub fn is_identity(m: Affine) -> bool {
    approx_eq(m, Affine::IDENTITY)
}

/// Serialize as a CSS `matrix(...)` function.
pub fn to_transform_string(m: Affine) -> String {
    let [a, b, c, d, e, f] = m.as_coeffs().map(positive_zero);
    format!("matrix({a}, {b}, {c}, {d}, {e}, {f})")
}

/// Parse a computed transform value: `none` or `matrix(a, b, c, d, e, f)`.
pub fn parse_transform_string(s: &str) -> RegionResult<Affine> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("none") {
        return Ok(Affine::IDENTITY);
    }

    let inner = s
        .strip_prefix("matrix(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| RegionError::validation(format!("unsupported transform value '{s}'")))?;

    let mut coeffs = [0.0f64; 6];
    let mut n = 0usize;
    for part in inner.split(',') {
        if n == 6 {
            return Err(RegionError::validation(
                "matrix() takes exactly 6 coefficients",
            ));
        }
        let v: f64 = part.trim().parse().map_err(|_| {
            RegionError::validation(format!("invalid matrix coefficient '{}'", part.trim()))
        })?;
        if !v.is_finite() {
            return Err(RegionError::validation("matrix coefficients must be finite"));
        }
        coeffs[n] = v;
        n += 1;
    }
    if n != 6 {
        return Err(RegionError::validation(
            "matrix() takes exactly 6 coefficients",
        ));
    }
    Ok(Affine::new(coeffs))
}

/// Read the effective (computed) transform of a rendered element.
///
/// Goes through the element's computed transform string, the same route a browser host takes
/// via `getComputedStyle`.
pub fn read_effective_transform(scene: &Scene, id: ElementId) -> RegionResult<Affine> {
    parse_transform_string(&scene.computed_transform(id)?)
}

fn positive_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
