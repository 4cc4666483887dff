use crate::{
    foundation::error::{RegionError, RegionResult},
    transform::css::{Length, TransformFn, TransformList},
    transition::random::AngleSource,
};

/// Rotation angles (degrees) a `rotate` transition picks from.
pub const ROTATE_ANGLES_DEG: [f64; 5] = [20.0, 40.0, 60.0, 80.0, 90.0];

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
/// Visual style of a view swap.
pub enum TransitionKind {
    /// Incoming view enters from the right.
    Slide,
    /// Incoming view enters from the bottom-right, tilted by one of [`ROTATE_ANGLES_DEG`].
    Rotate,
    /// Incoming view enters from below.
    Drop,
    /// No offset; the swap is a plain show.
    #[default]
    Identity,
}

impl TransitionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slide => "slide",
            Self::Rotate => "rotate",
            Self::Drop => "drop",
            Self::Identity => "identity",
        }
    }

    /// Strict parse; unknown names are errors.
    pub fn parse(kind: &str) -> RegionResult<Self> {
        let kind = kind.trim().to_ascii_lowercase();
        if kind.is_empty() {
            return Err(RegionError::validation("transition kind must be non-empty"));
        }

        match kind.as_str() {
            "slide" => Ok(Self::Slide),
            "rotate" => Ok(Self::Rotate),
            "drop" => Ok(Self::Drop),
            "identity" | "none" => Ok(Self::Identity),
            _ => Err(RegionError::validation(format!(
                "unknown transition kind '{kind}'"
            ))),
        }
    }

    /// Lenient parse used for signals: missing or unknown kinds fall back to `Identity`.
    pub fn parse_or_identity(kind: Option<&str>) -> Self {
        match kind.map(Self::parse) {
            Some(Ok(k)) => k,
            Some(Err(err)) => {
                tracing::debug!(%err, "treating transition kind as identity");
                Self::Identity
            }
            None => Self::Identity,
        }
    }

    pub fn is_animated(self) -> bool {
        self != Self::Identity
    }

    /// Off-screen placement for the incoming view, or `None` for `Identity`.
    pub fn offset_transform(self, angles: &mut dyn AngleSource) -> Option<TransformList> {
        let full = Length::Percent(100.0);
        match self {
            Self::Slide => Some(TransformList::none().then(TransformFn::TranslateX { x: full })),
            Self::Rotate => {
                let deg = ROTATE_ANGLES_DEG[angles.pick(ROTATE_ANGLES_DEG.len())
                    .min(ROTATE_ANGLES_DEG.len() - 1)];
                Some(
                    TransformList::none()
                        .then(TransformFn::TranslateX { x: full })
                        .then(TransformFn::TranslateY { y: full })
                        .then(TransformFn::Rotate { deg }),
                )
            }
            Self::Drop => Some(TransformList::none().then(TransformFn::TranslateY { y: full })),
            Self::Identity => None,
        }
    }
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransitionKind {
    type Err = RegionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transition/kind.rs"]
mod tests;
