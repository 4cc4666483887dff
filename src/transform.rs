//! Transform helpers: affine matrix math and CSS-like transform-function lists.

pub mod affine;
pub mod css;
