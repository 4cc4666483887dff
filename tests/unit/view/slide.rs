use super::*;

fn model() -> SlideModel {
    SlideModel {
        title: "Panning Region".to_string(),
        subtitle: "Slides".to_string(),
        image: "https://example.invalid/a.jpg".to_string(),
    }
}

#[test]
fn render_builds_template_and_emits_render() {
    let mut scene = Scene::new(Size::new(800.0, 600.0));
    let mut view = SlideView::new(&mut scene, model(), Size::new(800.0, 600.0));
    assert_eq!(view.state(), ViewState::Unrendered);

    assert_eq!(view.render(&mut scene).unwrap(), RenderStatus::Complete);
    assert_eq!(view.state(), ViewState::Rendered);
    assert_eq!(view.events().drain(), vec![ViewEvent::Render]);

    let el = scene.element(view.element()).unwrap();
    assert_eq!(el.children().len(), 6);
    assert!(el.has_class("slide"));
    for (class, _) in NEXT_BUTTONS {
        assert!(scene.find_by_class(view.element(), class).is_some());
    }

    // Re-rendering replaces the template instead of appending to it.
    view.render(&mut scene).unwrap();
    assert_eq!(scene.element(view.element()).unwrap().children().len(), 6);
}

#[test]
fn button_clicks_emit_next_with_kind() {
    let mut scene = Scene::new(Size::new(800.0, 600.0));
    let mut view = SlideView::new(&mut scene, model(), Size::new(800.0, 600.0));
    view.render(&mut scene).unwrap();
    view.events().drain();

    let drop_btn = scene.find_by_class(view.element(), "next-drop").unwrap();
    assert!(view.handle_click(&scene, drop_btn));
    assert!(!view.handle_click(&scene, view.element()));
    assert_eq!(
        view.events().drain(),
        vec![ViewEvent::Next(TransitionKind::Drop)]
    );
}

#[test]
fn close_releases_element_once_and_blocks_render() {
    let mut scene = Scene::new(Size::new(800.0, 600.0));
    let mut view = SlideView::new(&mut scene, model(), Size::new(800.0, 600.0));
    view.render(&mut scene).unwrap();
    view.events().drain();

    view.close(&mut scene);
    view.close(&mut scene);
    assert!(view.is_closed());
    assert!(!scene.contains(view.element()));
    assert_eq!(view.events().drain(), vec![ViewEvent::Close]);
    assert!(matches!(
        view.render(&mut scene),
        Err(RegionError::ViewClosed(_))
    ));
}
