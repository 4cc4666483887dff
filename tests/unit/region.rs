use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use super::*;
use crate::{
    foundation::core::{Size, Vec2},
    scene::SceneChange,
    transform::css::TransformFn,
    transition::random::FixedAngle,
    view::{ViewEvent, ViewState},
};

const VIEWPORT: Size = Size {
    width: 800.0,
    height: 600.0,
};

struct StubView {
    id: ViewId,
    element: ElementId,
    state: ViewState,
    deferred: bool,
    fails: bool,
    closes: Arc<AtomicUsize>,
    events: Emitter<ViewEvent>,
}

impl StubView {
    fn new(scene: &mut Scene) -> (Box<dyn View>, ViewId, ElementId, Arc<AtomicUsize>) {
        Self::build(scene, false, false)
    }

    fn deferred(scene: &mut Scene) -> (Box<dyn View>, ViewId, ElementId, Arc<AtomicUsize>) {
        Self::build(scene, true, false)
    }

    fn failing(scene: &mut Scene) -> (Box<dyn View>, ViewId, ElementId, Arc<AtomicUsize>) {
        Self::build(scene, false, true)
    }

    fn build(
        scene: &mut Scene,
        deferred: bool,
        fails: bool,
    ) -> (Box<dyn View>, ViewId, ElementId, Arc<AtomicUsize>) {
        let element = scene.create_element("div", VIEWPORT);
        let closes = Arc::new(AtomicUsize::new(0));
        let id = ViewId::next();
        let stub = Self {
            id,
            element,
            state: ViewState::Unrendered,
            deferred,
            fails,
            closes: Arc::clone(&closes),
            events: Emitter::new(),
        };
        (Box::new(stub), id, element, closes)
    }
}

impl View for StubView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn element(&self) -> ElementId {
        self.element
    }

    fn state(&self) -> ViewState {
        self.state
    }

    fn render(&mut self, _scene: &mut Scene) -> RegionResult<RenderStatus> {
        if self.fails {
            return Err(RegionError::validation("template missing"));
        }
        self.state = ViewState::Rendered;
        self.events.emit(ViewEvent::Render);
        Ok(if self.deferred {
            RenderStatus::Pending
        } else {
            RenderStatus::Complete
        })
    }

    fn close(&mut self, scene: &mut Scene) {
        if self.state == ViewState::Closed {
            return;
        }
        self.closes.fetch_add(1, Ordering::SeqCst);
        scene.remove(self.element);
        self.state = ViewState::Closed;
    }

    fn events(&mut self) -> &mut Emitter<ViewEvent> {
        &mut self.events
    }
}

fn setup(config: RegionConfig) -> (Scene, Region) {
    let mut scene = Scene::new(VIEWPORT);
    let bg = scene.create_element("div", VIEWPORT);
    scene.set_dom_id(bg, "world-bg").unwrap();
    scene.append_child(scene.root(), bg).unwrap();
    let content = scene.create_element("div", VIEWPORT);
    scene.set_dom_id(content, "world-content").unwrap();
    scene.append_child(scene.root(), content).unwrap();

    let region = Region::new(&scene, config)
        .unwrap()
        .with_angle_source(FixedAngle(2));
    (scene, region)
}

fn effective(scene: &Scene, id: ElementId) -> Affine {
    affine::read_effective_transform(scene, id).unwrap()
}

fn class_changes(changes: &[SceneChange]) -> usize {
    changes
        .iter()
        .filter(|c| {
            matches!(
                c,
                SceneChange::ClassAdded { .. } | SceneChange::ClassRemoved { .. }
            )
        })
        .count()
}

#[test]
fn new_requires_both_elements() {
    let scene = Scene::new(VIEWPORT);
    assert!(matches!(
        Region::new(&scene, RegionConfig::default()),
        Err(RegionError::UnknownElement(_))
    ));
}

#[test]
fn first_transition_is_a_plain_show() {
    for kind in [
        TransitionKind::Slide,
        TransitionKind::Rotate,
        TransitionKind::Drop,
        TransitionKind::Identity,
    ] {
        let (mut scene, mut region) = setup(RegionConfig::default());
        scene.take_changes();
        let (a, a_id, a_el, _) = StubView::new(&mut scene);

        region.transition_to_view(&mut scene, a, kind).unwrap();

        assert_eq!(region.current_view().map(|v| v.id()), Some(a_id));
        assert!(!region.is_transitioning());
        assert_eq!(
            scene.element(a_el).unwrap().parent(),
            Some(region.container())
        );
        assert_eq!(class_changes(&scene.take_changes()), 0);
        assert_eq!(
            region.events().drain(),
            vec![RegionEvent::Show { view: a_id }]
        );
    }
}

#[test]
fn closed_current_view_falls_back_to_show() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, _, _, a_closes) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();
    if let Some(current) = region.current_view_mut() {
        current.close(&mut scene);
    }
    scene.take_changes();

    let (b, b_id, _, _) = StubView::new(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Slide)
        .unwrap();
    assert_eq!(region.current_view().map(|v| v.id()), Some(b_id));
    assert_eq!(class_changes(&scene.take_changes()), 0);
    assert_eq!(a_closes.load(Ordering::SeqCst), 1);
}

#[test]
fn closed_incoming_view_is_rejected() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (mut a, _, _, _) = StubView::new(&mut scene);
    a.close(&mut scene);
    assert!(matches!(
        region.transition_to_view(&mut scene, a, TransitionKind::Drop),
        Err(RegionError::ViewClosed(_))
    ));
    assert!(region.current_view().is_none());
}

#[test]
fn slide_places_incoming_one_width_to_the_right() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, _, _, _) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();

    let (b, b_id, b_el, _) = StubView::deferred(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Slide)
        .unwrap();
    assert_eq!(
        region.session().map(|s| s.phase()),
        Some(SessionPhase::AwaitingRender)
    );
    assert!(scene.transform(b_el).unwrap().is_none());

    assert!(region.render_complete(&mut scene, b_id).unwrap());
    assert_eq!(
        effective(&scene, b_el),
        Affine::translate(Vec2::new(800.0, 0.0))
    );
    assert_eq!(
        effective(&scene, region.container()),
        Affine::translate(Vec2::new(-800.0, 0.0))
    );
}

#[test]
fn render_complete_for_other_views_is_ignored() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, a_id, _, _) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();
    let (b, _, _, _) = StubView::deferred(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Drop)
        .unwrap();

    assert!(!region.render_complete(&mut scene, a_id).unwrap());
    assert_eq!(
        region.session().map(|s| s.phase()),
        Some(SessionPhase::AwaitingRender)
    );
}

#[test]
fn class_is_added_before_transform_changes() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, _, _, _) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();
    scene.take_changes();

    let (b, _, _, _) = StubView::new(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Drop)
        .unwrap();

    let changes = scene.take_changes();
    for el in [region.container(), region.background()] {
        let class_at = changes
            .iter()
            .position(|c| matches!(c, SceneChange::ClassAdded { element, .. } if *element == el))
            .unwrap();
        let transform_at = changes
            .iter()
            .position(|c| matches!(c, SceneChange::TransformSet { element, .. } if *element == el))
            .unwrap();
        assert!(class_at < transform_at);
    }
}

#[test]
fn rotate_pans_by_inverse_of_tilted_offset() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, _, _, _) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();

    let (b, _, b_el, _) = StubView::new(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Rotate)
        .unwrap();

    // FixedAngle(2) picks 60deg.
    let offset = Affine::translate(Vec2::new(800.0, 600.0)) * Affine::rotate(60f64.to_radians());
    assert!(affine::approx_eq(effective(&scene, b_el), offset));
    let pan = effective(&scene, region.container());
    assert!(affine::approx_eq(pan * offset, Affine::IDENTITY));
    assert!(affine::approx_eq(effective(&scene, region.background()), pan));
}

#[test]
fn transition_end_finalizes_exactly_once() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, a_id, a_el, a_closes) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();
    region.events().drain();

    let (b, b_id, b_el, b_closes) = StubView::new(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Slide)
        .unwrap();
    assert_eq!(scene.listener_count(region.container(), "transitionend"), 1);

    assert!(region.transition_end(&mut scene).unwrap());
    assert!(!region.transition_end(&mut scene).unwrap());

    assert_eq!(a_closes.load(Ordering::SeqCst), 1);
    assert_eq!(b_closes.load(Ordering::SeqCst), 0);
    assert!(!scene.contains(a_el));
    assert_eq!(region.current_view().map(|v| v.id()), Some(b_id));
    assert!(!region.is_transitioning());
    assert_eq!(scene.listener_count(region.container(), "transitionend"), 0);

    for el in [region.container(), region.background(), b_el] {
        assert_eq!(effective(&scene, el), Affine::IDENTITY);
        assert!(!scene.has_class(el, "animated"));
    }

    let events = region.events().drain();
    assert!(matches!(events[0], RegionEvent::WillTransition { outgoing } if outgoing == a_id));
    assert!(matches!(events[1], RegionEvent::Animating { incoming, .. } if incoming == b_id));
    assert_eq!(events[2], RegionEvent::Close { view: a_id });
    assert_eq!(events[3], RegionEvent::Show { view: b_id });
    assert_eq!(events.len(), 4);

    let view_events = region.current_view_mut().unwrap().events().drain();
    assert_eq!(view_events, vec![ViewEvent::Render, ViewEvent::Show]);
}

#[test]
fn transition_end_without_session_is_a_noop() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    assert!(!region.transition_end(&mut scene).unwrap());

    let (a, _, _, _) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();
    let (b, _, _, _) = StubView::deferred(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Slide)
        .unwrap();
    // Still waiting for render; no listener registered yet.
    assert!(!region.transition_end(&mut scene).unwrap());
    assert!(region.is_transitioning());
}

#[test]
fn repeated_calls_never_leave_two_listeners() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, a_id, _, a_closes) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();

    let (b, _, b_el, b_closes) = StubView::new(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Slide)
        .unwrap();
    assert_eq!(scene.listener_count(region.container(), "transitionend"), 1);

    let (c, c_id, _, _) = StubView::new(&mut scene);
    region
        .transition_to_view(&mut scene, c, TransitionKind::Drop)
        .unwrap();
    assert_eq!(scene.listener_count(region.container(), "transitionend"), 1);

    // The superseded incoming view was released; the outgoing one is untouched.
    assert_eq!(b_closes.load(Ordering::SeqCst), 1);
    assert!(!scene.contains(b_el));
    assert_eq!(a_closes.load(Ordering::SeqCst), 0);
    assert_eq!(region.current_view().map(|v| v.id()), Some(a_id));

    assert!(region.transition_end(&mut scene).unwrap());
    assert_eq!(region.current_view().map(|v| v.id()), Some(c_id));
    assert_eq!(a_closes.load(Ordering::SeqCst), 1);
}

#[test]
fn stray_listeners_are_cleared_before_registering() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, _, _, _) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();
    scene.on(region.container(), "transitionend").unwrap();

    let (b, _, _, _) = StubView::new(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Slide)
        .unwrap();
    assert_eq!(scene.listener_count(region.container(), "transitionend"), 1);
}

#[test]
fn identity_with_open_view_swaps_without_animation() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, _, _, a_closes) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();
    scene.take_changes();

    let (b, b_id, _, _) = StubView::new(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Identity)
        .unwrap();
    assert_eq!(region.current_view().map(|v| v.id()), Some(b_id));
    assert_eq!(a_closes.load(Ordering::SeqCst), 1);
    assert_eq!(class_changes(&scene.take_changes()), 0);
    assert_eq!(scene.listener_count(region.container(), "transitionend"), 0);
}

#[test]
fn pan_target_rejects_singular_matrices() {
    let offset = Affine::translate(Vec2::new(0.0, 600.0));
    assert_eq!(
        pan_target(offset),
        Some(Affine::translate(Vec2::new(0.0, -600.0)))
    );
    assert_eq!(pan_target(Affine::scale(0.0)), None);
    assert_eq!(
        pan_target(Affine::new([1.0, 2.0, 2.0, 4.0, 0.0, 0.0])),
        None
    );
}

#[test]
fn failed_pan_shows_incoming_directly() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, a_id, _, a_closes) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();
    region.events().drain();
    scene.take_changes();

    // State right after the off-screen placement, before any class or container change.
    let (b, b_id, b_el, _) = StubView::new(&mut scene);
    scene
        .set_transform(
            b_el,
            TransformList::none().then(TransformFn::Scale { x: 0.0, y: 0.0 }),
        )
        .unwrap();
    scene.append_child(region.container(), b_el).unwrap();
    assert_eq!(pan_target(effective(&scene, b_el)), None);

    let session = TransitionSession::new(b, Some(a_id), TransitionKind::Slide);
    region.show_without_pan(&mut scene, session).unwrap();

    assert_eq!(region.current_view().map(|v| v.id()), Some(b_id));
    assert_eq!(a_closes.load(Ordering::SeqCst), 1);
    assert!(scene.transform(b_el).unwrap().is_none());
    assert_eq!(
        scene.element(b_el).unwrap().parent(),
        Some(region.container())
    );
    assert_eq!(effective(&scene, region.container()), Affine::IDENTITY);
    assert_eq!(class_changes(&scene.take_changes()), 0);
    assert_eq!(
        region.events().drain(),
        vec![
            RegionEvent::Close { view: a_id },
            RegionEvent::Show { view: b_id }
        ]
    );
}

#[test]
fn timeout_finalizes_stalled_swap() {
    let config = RegionConfig {
        transition_timeout_ms: Some(250),
        ..RegionConfig::default()
    };
    let (mut scene, mut region) = setup(config);
    let (a, _, _, a_closes) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();

    let (b, b_id, _, _) = StubView::new(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Drop)
        .unwrap();

    let deadline = region.session().and_then(TransitionSession::deadline).unwrap();
    assert!(!region.poll_deadline(&mut scene, deadline - Duration::from_millis(1)).unwrap());
    assert!(region.poll_deadline(&mut scene, deadline).unwrap());

    assert_eq!(region.current_view().map(|v| v.id()), Some(b_id));
    assert_eq!(a_closes.load(Ordering::SeqCst), 1);
    assert_eq!(scene.listener_count(region.container(), "transitionend"), 0);
    assert!(!region.transition_end(&mut scene).unwrap());
}

#[test]
fn without_timeout_a_missing_transition_end_keeps_waiting() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, a_id, _, a_closes) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();
    let (b, _, _, _) = StubView::new(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Drop)
        .unwrap();

    let far_future = Instant::now() + Duration::from_secs(3600);
    assert!(!region.poll_deadline(&mut scene, far_future).unwrap());
    assert!(region.is_transitioning());
    assert_eq!(region.current_view().map(|v| v.id()), Some(a_id));
    assert_eq!(a_closes.load(Ordering::SeqCst), 0);
}

#[test]
fn failed_render_keeps_current_view() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, a_id, a_el, a_closes) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();
    region.events().drain();

    let (b, _, b_el, b_closes) = StubView::failing(&mut scene);
    assert!(matches!(
        region.show(&mut scene, b),
        Err(RegionError::Validation(_))
    ));
    assert_eq!(region.current_view().map(|v| v.id()), Some(a_id));
    assert_eq!(a_closes.load(Ordering::SeqCst), 0);
    assert!(scene.contains(a_el));
    assert!(!scene.contains(b_el));
    assert_eq!(b_closes.load(Ordering::SeqCst), 1);

    let (c, _, c_el, _) = StubView::failing(&mut scene);
    assert!(
        region
            .transition_to_view(&mut scene, c, TransitionKind::Slide)
            .is_err()
    );
    assert_eq!(region.current_view().map(|v| v.id()), Some(a_id));
    assert!(!region.is_transitioning());
    assert!(!scene.contains(c_el));
    assert!(region.events().drain().is_empty());
}

#[test]
fn externally_closed_outgoing_view_is_not_announced_twice() {
    let (mut scene, mut region) = setup(RegionConfig::default());
    let (a, _, _, a_closes) = StubView::new(&mut scene);
    region.show(&mut scene, a).unwrap();

    let (b, b_id, _, _) = StubView::new(&mut scene);
    region
        .transition_to_view(&mut scene, b, TransitionKind::Drop)
        .unwrap();
    if let Some(view) = region.current_view_mut() {
        view.close(&mut scene);
    }
    region.events().drain();

    assert!(region.transition_end(&mut scene).unwrap());
    assert_eq!(a_closes.load(Ordering::SeqCst), 1);
    assert_eq!(
        region.events().drain(),
        vec![RegionEvent::Show { view: b_id }]
    );
}
