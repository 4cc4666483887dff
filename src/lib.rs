//! Panning region transitions.
//!
//! A [`Region`] shows one view at a time inside a container element. Instead of swapping views
//! in place, [`Region::transition_to_view`] parks the incoming view one box-length off-screen
//! (right for `slide`, below for `drop`, below-right and tilted for `rotate`) and pans the
//! container (and a background layer) by the inverse of that placement. When the host reports
//! transition-end, the old view is closed and everything is reset to identity.
//!
//! # Pieces
//!
//! - [`Scene`]: element tree standing in for the DOM (sizes, transforms, classes, listeners).
//! - [`transform`]: affine matrix helpers and CSS-like transform lists with `%` lengths.
//! - [`View`] / [`SlideView`]: renderable units with a render / show / close lifecycle.
//! - [`Region`]: the transition engine.
//! - [`Stage`] / [`SlideController`]: a ready-made shell wiring the above together.
//!
//! # Driving a swap
//!
//! ```
//! use panning_region::{RegionConfig, Size, Stage, TransitionKind};
//!
//! let mut stage = Stage::new(Size::new(800.0, 600.0), RegionConfig::default(), 1)?;
//! stage.show(TransitionKind::Identity)?;
//! stage.show(TransitionKind::Slide)?;
//! assert!(stage.region().is_transitioning());
//! assert!(stage.transition_end()?);
//! # Ok::<(), panning_region::RegionError>(())
//! ```
#![forbid(unsafe_code)]

mod app;
mod config;
mod events;
mod foundation;
mod region;
mod scene;
mod transition;
mod view;

/// Affine and CSS-like transform helpers.
pub mod transform;

pub use app::{DEFAULT_IMAGES, SlideController, Stage};
pub use config::{RegionConfig, transition_end_event_for};
pub use events::{Emitter, MAX_PENDING_EVENTS, SubscriptionId};
pub use foundation::core::{Affine, ElementId, ListenerId, Point, Size, Vec2, ViewId};
pub use foundation::error::{RegionError, RegionResult};
pub use foundation::math::Rng64;
pub use region::{Region, RegionEvent};
pub use scene::{Element, MAX_SCENE_CHANGES, Scene, SceneChange};
pub use transition::kind::{ROTATE_ANGLES_DEG, TransitionKind};
pub use transition::random::{AngleSource, FixedAngle, SeededAngles, ThreadAngles};
pub use transition::session::{SessionPhase, TransitionSession};
pub use view::slide::{NEXT_BUTTONS, SlideModel, SlideView};
pub use view::{RenderStatus, View, ViewEvent, ViewState};
