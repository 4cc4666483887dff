use std::time::Duration;

use crate::foundation::error::{RegionError, RegionResult};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Region wiring and behavior knobs.
///
/// Every field has a default, so `{}` is a valid JSON config.
pub struct RegionConfig {
    /// `#id` of the container the region owns.
    pub container_selector: String,
    /// `#id` of the background layer panned alongside the container.
    pub background_selector: String,
    /// Class that enables animated transforms on the container and background.
    pub animated_class: String,
    /// Name of the transition-end event the region listens for.
    pub transition_end_event: String,
    /// Finalize a swap after this long if transition-end never arrives. `None` waits forever.
    pub transition_timeout_ms: Option<u64>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            container_selector: "#world-content".to_string(),
            background_selector: "#world-bg".to_string(),
            animated_class: "animated".to_string(),
            transition_end_event: "transitionend".to_string(),
            transition_timeout_ms: None,
        }
    }
}

impl RegionConfig {
    pub fn from_json_str(s: &str) -> RegionResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| RegionError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> RegionResult<()> {
        for (field, sel) in [
            ("container_selector", &self.container_selector),
            ("background_selector", &self.background_selector),
        ] {
            if sel.len() < 2 || !sel.starts_with('#') {
                return Err(RegionError::validation(format!(
                    "{field} must be an '#id' selector, got '{sel}'"
                )));
            }
        }
        if self.container_selector == self.background_selector {
            return Err(RegionError::validation(
                "container and background must be different elements",
            ));
        }
        if self.animated_class.is_empty() || self.animated_class.contains(char::is_whitespace) {
            return Err(RegionError::validation(
                "animated_class must be a single non-empty class name",
            ));
        }
        if self.transition_end_event.trim().is_empty() {
            return Err(RegionError::validation(
                "transition_end_event must be non-empty",
            ));
        }
        if self.transition_timeout_ms == Some(0) {
            return Err(RegionError::validation(
                "transition_timeout_ms must be > 0 when set",
            ));
        }
        Ok(())
    }

    pub fn transition_timeout(&self) -> Option<Duration> {
        self.transition_timeout_ms.map(Duration::from_millis)
    }
}

/// Transition-end event name for a (possibly vendor-prefixed) `transition` property name.
pub fn transition_end_event_for(transition_property: &str) -> Option<&'static str> {
    match transition_property {
        "WebkitTransition" => Some("webkitTransitionEnd"),
        "MozTransition" => Some("transitionend"),
        "OTransition" => Some("oTransitionEnd"),
        "msTransition" => Some("MSTransitionEnd"),
        "transition" => Some("transitionend"),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
