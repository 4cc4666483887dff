//! Renderable units shown inside a region.

pub(crate) mod slide;

use crate::{
    events::Emitter,
    foundation::core::{ElementId, ViewId},
    foundation::error::RegionResult,
    scene::Scene,
    transition::kind::TransitionKind,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Unrendered,
    Rendered,
    Closed,
}

/// Outcome of [`View::render`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStatus {
    /// The element is ready to be measured and transformed.
    Complete,
    /// Render-complete will be signalled later through [`crate::Region::render_complete`].
    Pending,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", content = "kind", rename_all = "snake_case")]
/// Signals a view publishes.
pub enum ViewEvent {
    Render,
    Show,
    Close,
    /// The user asked for the next view, with the requested transition.
    Next(TransitionKind),
}

/// Contract between a region and the views it displays.
///
/// A view owns one element in the scene. It goes `Unrendered -> Rendered` on render and
/// `Rendered -> Closed` on close; closing releases the element.
pub trait View: Send {
    fn id(&self) -> ViewId;

    fn element(&self) -> ElementId;

    fn state(&self) -> ViewState;

    fn is_closed(&self) -> bool {
        self.state() == ViewState::Closed
    }

    fn render(&mut self, scene: &mut Scene) -> RegionResult<RenderStatus>;

    /// Close the view and release its element. Closing twice is a no-op.
    fn close(&mut self, scene: &mut Scene);

    fn events(&mut self) -> &mut Emitter<ViewEvent>;

    /// Called by the region once the view is visible.
    fn on_show(&mut self) {
        self.events().emit(ViewEvent::Show);
    }

    /// Route a click on `target`; returns `true` if the view handled it.
    fn handle_click(&mut self, _scene: &Scene, _target: ElementId) -> bool {
        false
    }
}

impl std::fmt::Debug for dyn View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("id", &self.id())
            .field("element", &self.element())
            .field("state", &self.state())
            .finish()
    }
}
