//! The transition engine.
//!
//! A [`Region`] owns one container element and the view currently shown in it. Showing a view
//! normally just swaps it in. [`Region::transition_to_view`] instead places the incoming view
//! off-screen (to the right, below, or below-right and tilted) inside the container, then sets
//! the container's transform to the inverse of the incoming view's matrix. With the animated class
//! on, the host animates that change, which reads as the content panning the new view into place.
//! The background layer gets the same inverse so it pans in step.
//!
//! When the host reports transition-end the outgoing view is closed, the animated classes are
//! removed and every transform involved is reset to identity, leaving the scene ready for the
//! next swap. Only one swap is in flight per region.

use std::time::Instant;

use crate::{
    config::RegionConfig,
    events::Emitter,
    foundation::core::{Affine, ElementId, ViewId},
    foundation::error::{RegionError, RegionResult},
    scene::Scene,
    transform::{affine, css::TransformList},
    transition::{
        kind::TransitionKind,
        random::{AngleSource, ThreadAngles},
        session::{SessionPhase, TransitionSession},
    },
    view::{RenderStatus, View},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
/// Signals a region publishes.
pub enum RegionEvent {
    /// An animated swap is about to start; `outgoing` is still current.
    WillTransition { outgoing: ViewId },
    /// Transforms are applied and the host should now animate toward `target`.
    Animating {
        incoming: ViewId,
        kind: TransitionKind,
        target: Affine,
    },
    /// `view` is now current and visible.
    Show { view: ViewId },
    /// `view` was closed and released.
    Close { view: ViewId },
}

pub struct Region {
    config: RegionConfig,
    container: ElementId,
    background: ElementId,
    current: Option<Box<dyn View>>,
    session: Option<TransitionSession>,
    angles: Box<dyn AngleSource>,
    events: Emitter<RegionEvent>,
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Region")
            .field("container", &self.container)
            .field("background", &self.background)
            .field("current", &self.current)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Region {
    /// Bind a region to the container and background named by `config`.
    pub fn new(scene: &Scene, config: RegionConfig) -> RegionResult<Self> {
        config.validate()?;
        let container = scene.query(&config.container_selector)?;
        let background = scene.query(&config.background_selector)?;
        Ok(Self {
            config,
            container,
            background,
            current: None,
            session: None,
            angles: Box::new(ThreadAngles),
            events: Emitter::new(),
        })
    }

    /// Replace the random source used to pick `rotate` angles.
    #[must_use]
    pub fn with_angle_source(mut self, angles: impl AngleSource + 'static) -> Self {
        self.angles = Box::new(angles);
        self
    }

    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn background(&self) -> ElementId {
        self.background
    }

    pub fn current_view(&self) -> Option<&dyn View> {
        self.current.as_deref()
    }

    pub fn current_view_mut(&mut self) -> Option<&mut (dyn View + 'static)> {
        self.current.as_deref_mut()
    }

    pub fn session(&self) -> Option<&TransitionSession> {
        self.session.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.session.is_some()
    }

    pub fn events(&mut self) -> &mut Emitter<RegionEvent> {
        &mut self.events
    }

    /// Show `view` immediately, closing whatever was current.
    #[tracing::instrument(skip_all, fields(view = %view.id()))]
    pub fn show(&mut self, scene: &mut Scene, mut view: Box<dyn View>) -> RegionResult<()> {
        if view.is_closed() {
            return Err(RegionError::ViewClosed(view.id().to_string()));
        }
        self.abandon_session(scene)?;

        // A plain show does not wait for render-complete.
        if let Err(err) = view.render(scene) {
            discard(scene, view);
            return Err(err);
        }
        self.close(scene);
        scene.append_child(self.container, view.element())?;

        let id = view.id();
        self.current = Some(view);
        self.announce_show(id);
        Ok(())
    }

    /// Close and release the current view, if any.
    pub fn close(&mut self, scene: &mut Scene) {
        let Some(mut view) = self.current.take() else {
            return;
        };
        let id = view.id();
        let already_closed = view.is_closed();
        view.close(scene);
        // Views are expected to release their element; make sure of it.
        scene.remove(view.element());
        if already_closed {
            tracing::debug!(view = %id, "released view closed elsewhere");
            return;
        }
        tracing::debug!(view = %id, "closed view");
        self.events.emit(RegionEvent::Close { view: id });
    }

    /// Swap `view` in with the transition named by `kind`.
    ///
    /// Falls back to [`Region::show`] when nothing open is showing or `kind` has no offset.
    #[tracing::instrument(skip_all, fields(view = %view.id(), kind = %kind))]
    pub fn transition_to_view(
        &mut self,
        scene: &mut Scene,
        mut view: Box<dyn View>,
        kind: TransitionKind,
    ) -> RegionResult<()> {
        if view.is_closed() {
            return Err(RegionError::ViewClosed(view.id().to_string()));
        }

        let outgoing = match self.current.as_deref() {
            Some(current) if !current.is_closed() => current.id(),
            _ => return self.show(scene, view),
        };
        if !kind.is_animated() {
            tracing::debug!("identity transition, showing directly");
            return self.show(scene, view);
        }

        self.abandon_session(scene)?;
        scene.off(self.container, &self.config.transition_end_event)?;

        let status = match view.render(scene) {
            Ok(status) => status,
            Err(err) => {
                discard(scene, view);
                return Err(err);
            }
        };
        self.events.emit(RegionEvent::WillTransition { outgoing });
        self.session = Some(TransitionSession::new(view, Some(outgoing), kind));
        match status {
            RenderStatus::Complete => self.begin_swap(scene),
            RenderStatus::Pending => {
                tracing::debug!("waiting for render-complete");
                Ok(())
            }
        }
    }

    /// Render-complete signal for a view that reported [`RenderStatus::Pending`].
    ///
    /// Returns `false` if `view` is not the one this region is waiting on.
    pub fn render_complete(&mut self, scene: &mut Scene, view: ViewId) -> RegionResult<bool> {
        let waiting = self.session.as_ref().is_some_and(|s| {
            s.phase() == SessionPhase::AwaitingRender && s.incoming() == view
        });
        if !waiting {
            return Ok(false);
        }
        self.begin_swap(scene)?;
        Ok(true)
    }

    /// Transition-end signal on the container.
    ///
    /// Returns `true` if it completed the pending swap. Signals that reach no live listener of
    /// this region (none registered, already consumed) change nothing.
    pub fn transition_end(&mut self, scene: &mut Scene) -> RegionResult<bool> {
        let Some(listener) = self.session.as_ref().and_then(TransitionSession::listener) else {
            return Ok(false);
        };
        let reached = scene
            .dispatch(self.container, &self.config.transition_end_event)
            .contains(&listener);
        if !reached {
            return Ok(false);
        }
        let Some(session) = self.session.take() else {
            return Ok(false);
        };
        self.finish_swap(scene, session)?;
        Ok(true)
    }

    /// Finalize a swap whose transition-end is overdue.
    ///
    /// Only has an effect when `transition_timeout_ms` is configured.
    pub fn poll_deadline(&mut self, scene: &mut Scene, now: Instant) -> RegionResult<bool> {
        if !self.session.as_ref().is_some_and(|s| s.is_overdue(now)) {
            return Ok(false);
        }
        let Some(session) = self.session.take() else {
            return Ok(false);
        };
        tracing::warn!(
            incoming = %session.incoming(),
            "transition-end never arrived, finalizing swap"
        );
        self.finish_swap(scene, session)?;
        Ok(true)
    }

    fn begin_swap(&mut self, scene: &mut Scene) -> RegionResult<()> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        // At most one transition-end listener may be live on the container.
        scene.off(self.container, &self.config.transition_end_event)?;

        let kind = session.kind();
        let Some(offset) = kind.offset_transform(self.angles.as_mut()) else {
            tracing::debug!("no offset for identity transition, showing directly");
            return self.show(scene, session.incoming);
        };

        let view_el = session.incoming.element();
        scene.set_transform(view_el, offset)?;
        scene.append_child(self.container, view_el)?;

        let container_m = affine::read_effective_transform(scene, self.container)?;
        let background_m = affine::read_effective_transform(scene, self.background)?;
        let view_m = affine::read_effective_transform(scene, view_el)?;
        tracing::debug!(
            container = %affine::to_transform_string(container_m),
            background = %affine::to_transform_string(background_m),
            view = %affine::to_transform_string(view_m),
            "measured transforms"
        );
        if !affine::is_identity(container_m) {
            tracing::warn!("container does not start at identity; the pan will be offset");
        }

        // The container starts at identity, so the inverse of the view's matrix is exactly the
        // container transform that brings the view into the visible box.
        let Some(target) = pan_target(view_m) else {
            return self.show_without_pan(scene, session);
        };

        // The class goes on first so the transform change animates instead of snapping.
        let class = &self.config.animated_class;
        scene.add_class(self.container, class)?;
        scene.add_class(self.background, class)?;
        scene.set_transform(self.container, TransformList::matrix(target))?;
        scene.set_transform(self.background, TransformList::matrix(target))?;

        let listener = scene.on(self.container, &self.config.transition_end_event)?;
        let deadline = self
            .config
            .transition_timeout()
            .map(|timeout| Instant::now() + timeout);
        session.start_animating(listener, target, deadline);

        let incoming = session.incoming();
        self.session = Some(session);
        self.events.emit(RegionEvent::Animating {
            incoming,
            kind,
            target,
        });
        Ok(())
    }

    /// Undo the off-screen placement and show the incoming view directly.
    fn show_without_pan(
        &mut self,
        scene: &mut Scene,
        session: TransitionSession,
    ) -> RegionResult<()> {
        let view_el = session.incoming.element();
        if scene.contains(view_el) {
            scene.detach(view_el)?;
            scene.set_transform(view_el, TransformList::none())?;
        }
        self.show(scene, session.incoming)
    }

    fn finish_swap(&mut self, scene: &mut Scene, session: TransitionSession) -> RegionResult<()> {
        if let Some(listener) = session.listener() {
            scene.off_listener(self.container, listener)?;
        }

        self.close(scene);
        let view_el = session.incoming.element();
        let id = session.incoming();
        self.current = Some(session.incoming);

        let class = &self.config.animated_class;
        scene.remove_class(self.container, class)?;
        scene.remove_class(self.background, class)?;

        scene.set_transform(self.container, TransformList::identity_matrix())?;
        scene.set_transform(view_el, TransformList::identity_matrix())?;
        scene.set_transform(self.background, TransformList::identity_matrix())?;

        tracing::debug!(view = %id, "swap complete");
        self.announce_show(id);
        Ok(())
    }

    /// Drop a swap that never completed, restoring the container and background.
    fn abandon_session(&mut self, scene: &mut Scene) -> RegionResult<()> {
        let Some(mut stale) = self.session.take() else {
            return Ok(());
        };
        tracing::warn!(
            incoming = %stale.incoming(),
            "superseding a transition that never completed"
        );

        if let Some(listener) = stale.listener() {
            scene.off_listener(self.container, listener)?;
        }
        stale.incoming.close(scene);
        scene.remove(stale.incoming.element());

        if stale.phase() == SessionPhase::Animating {
            let class = &self.config.animated_class;
            scene.remove_class(self.container, class)?;
            scene.remove_class(self.background, class)?;
            scene.set_transform(self.container, TransformList::identity_matrix())?;
            scene.set_transform(self.background, TransformList::identity_matrix())?;
        }
        Ok(())
    }

    fn announce_show(&mut self, id: ViewId) {
        if let Some(view) = self.current.as_deref_mut() {
            view.on_show();
        }
        self.events.emit(RegionEvent::Show { view: id });
    }
}

/// Release a view the region never took ownership of.
fn discard(scene: &mut Scene, mut view: Box<dyn View>) {
    tracing::warn!(view = %view.id(), "render failed, discarding view");
    view.close(scene);
    scene.remove(view.element());
}

/// Container transform that brings a view with matrix `view_m` into the visible box.
///
/// The container starts at identity, so this is just the inverse of the view's matrix.
fn pan_target(view_m: Affine) -> Option<Affine> {
    match affine::invert(view_m) {
        Ok(m) => Some(m),
        Err(err) => {
            tracing::warn!(%err, "cannot pan to incoming view, showing directly");
            None
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/region.rs"]
mod tests;
