use std::time::Instant;

use crate::{
    foundation::core::{Affine, ElementId, ListenerId, ViewId},
    transition::kind::TransitionKind,
    view::View,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the incoming view's render-complete signal.
    AwaitingRender,
    /// Transforms applied; waiting for transition-end on the container.
    Animating,
}

/// Bookkeeping for one in-flight swap.
#[derive(Debug)]
pub struct TransitionSession {
    pub(crate) incoming: Box<dyn View>,
    outgoing: Option<ViewId>,
    kind: TransitionKind,
    phase: SessionPhase,
    listener: Option<ListenerId>,
    target: Option<Affine>,
    deadline: Option<Instant>,
}

impl TransitionSession {
    pub(crate) fn new(
        incoming: Box<dyn View>,
        outgoing: Option<ViewId>,
        kind: TransitionKind,
    ) -> Self {
        Self {
            incoming,
            outgoing,
            kind,
            phase: SessionPhase::AwaitingRender,
            listener: None,
            target: None,
            deadline: None,
        }
    }

    pub(crate) fn start_animating(
        &mut self,
        listener: ListenerId,
        target: Affine,
        deadline: Option<Instant>,
    ) {
        self.phase = SessionPhase::Animating;
        self.listener = Some(listener);
        self.target = Some(target);
        self.deadline = deadline;
    }

    pub fn incoming(&self) -> ViewId {
        self.incoming.id()
    }

    pub fn incoming_element(&self) -> ElementId {
        self.incoming.element()
    }

    pub fn outgoing(&self) -> Option<ViewId> {
        self.outgoing
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn listener(&self) -> Option<ListenerId> {
        self.listener
    }

    /// Matrix the container and background are animating toward.
    pub fn target(&self) -> Option<Affine> {
        self.target
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_overdue(&self, now: Instant) -> bool {
        self.phase == SessionPhase::Animating && self.deadline.is_some_and(|d| d <= now)
    }
}
