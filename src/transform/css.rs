//! CSS-like transform-function lists.
//!
//! Element transforms are stored unresolved (percentages stay percentages) and only turned into
//! a matrix against the element's own box, the way a browser computes `transform`.

use std::fmt;

use crate::{
    foundation::core::{Affine, Size, Vec2},
    transform::affine,
};

/// A length that is either absolute or relative to the element's own box.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    pub fn resolve(self, basis: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Percent(p) => basis * p / 100.0,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

/// One transform function.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "fn", rename_all = "snake_case")]
pub enum TransformFn {
    Translate { x: Length, y: Length },
    TranslateX { x: Length },
    TranslateY { y: Length },
    /// Clockwise in screen space (y grows downward).
    Rotate { deg: f64 },
    Scale { x: f64, y: f64 },
    Matrix { m: Affine },
}

impl TransformFn {
    pub fn to_affine(&self, size: Size) -> Affine {
        match *self {
            Self::Translate { x, y } => Affine::translate(Vec2::new(
                x.resolve(size.width),
                y.resolve(size.height),
            )),
            Self::TranslateX { x } => Affine::translate(Vec2::new(x.resolve(size.width), 0.0)),
            Self::TranslateY { y } => Affine::translate(Vec2::new(0.0, y.resolve(size.height))),
            Self::Rotate { deg } => Affine::rotate(deg.to_radians()),
            Self::Scale { x, y } => Affine::scale_non_uniform(x, y),
            Self::Matrix { m } => m,
        }
    }
}

impl fmt::Display for TransformFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Translate { x, y } => write!(f, "translate({x}, {y})"),
            Self::TranslateX { x } => write!(f, "translateX({x})"),
            Self::TranslateY { y } => write!(f, "translateY({y})"),
            Self::Rotate { deg } => write!(f, "rotate({deg}deg)"),
            Self::Scale { x, y } => write!(f, "scale({x}, {y})"),
            Self::Matrix { m } => f.write_str(&affine::to_transform_string(m)),
        }
    }
}

/// Ordered list of transform functions; an empty list is `none`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TransformList(pub Vec<TransformFn>);

impl TransformList {
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn matrix(m: Affine) -> Self {
        Self(vec![TransformFn::Matrix { m }])
    }

    /// Identity written out explicitly, as `matrix(1, 0, 0, 1, 0, 0)`.
    pub fn identity_matrix() -> Self {
        Self::matrix(Affine::IDENTITY)
    }

    #[must_use]
    pub fn then(mut self, f: TransformFn) -> Self {
        self.0.push(f);
        self
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    pub fn functions(&self) -> &[TransformFn] {
        &self.0
    }

    /// Resolve to a single matrix against `size`; functions compose left to right.
    pub fn resolve(&self, size: Size) -> Affine {
        self.0
            .iter()
            .fold(Affine::IDENTITY, |acc, f| affine::compose(acc, f.to_affine(size)))
    }
}

impl fmt::Display for TransformList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        for (i, func) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{func}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/css.rs"]
mod tests;
