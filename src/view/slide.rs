use crate::{
    events::Emitter,
    foundation::core::{ElementId, Size, ViewId},
    foundation::error::{RegionError, RegionResult},
    scene::Scene,
    transition::kind::TransitionKind,
    view::{RenderStatus, View, ViewEvent, ViewState},
};

/// Buttons rendered on every slide, by class, with the transition each one requests.
pub const NEXT_BUTTONS: [(&str, TransitionKind); 3] = [
    ("next-slide", TransitionKind::Slide),
    ("next-rotate", TransitionKind::Rotate),
    ("next-drop", TransitionKind::Drop),
];

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Content of one slide.
pub struct SlideModel {
    pub title: String,
    pub subtitle: String,
    /// Image URL.
    pub image: String,
}

#[derive(Debug)]
/// Full-size slide with a title, subtitle, image and three "next" buttons.
pub struct SlideView {
    id: ViewId,
    element: ElementId,
    model: SlideModel,
    state: ViewState,
    buttons: Vec<(ElementId, TransitionKind)>,
    events: Emitter<ViewEvent>,
}

impl SlideView {
    pub fn new(scene: &mut Scene, model: SlideModel, size: Size) -> Self {
        let element = scene.create_element("div", size);
        // Class insertion on a fresh element cannot fail.
        let _ = scene.add_class(element, "slide");
        Self {
            id: ViewId::next(),
            element,
            model,
            state: ViewState::Unrendered,
            buttons: Vec::new(),
            events: Emitter::new(),
        }
    }

    pub fn model(&self) -> &SlideModel {
        &self.model
    }

    /// Emit `Next(kind)`, as a click on the matching button would.
    pub fn request_next(&mut self, kind: TransitionKind) {
        self.events.emit(ViewEvent::Next(kind));
    }

    fn render_template(&mut self, scene: &mut Scene) -> RegionResult<()> {
        scene.clear_children(self.element)?;
        self.buttons.clear();

        let title = scene.create_element("h1", Size::default());
        scene.set_text(title, self.model.title.clone())?;
        scene.append_child(self.element, title)?;

        let subtitle = scene.create_element("h2", Size::default());
        scene.set_text(subtitle, self.model.subtitle.clone())?;
        scene.append_child(self.element, subtitle)?;

        let image = scene.create_element("img", Size::default());
        scene.set_attr(image, "src", self.model.image.clone())?;
        scene.append_child(self.element, image)?;

        for (class, kind) in NEXT_BUTTONS {
            let button = scene.create_element("button", Size::default());
            scene.add_class(button, class)?;
            scene.set_text(button, kind.as_str())?;
            scene.append_child(self.element, button)?;
            self.buttons.push((button, kind));
        }
        Ok(())
    }
}

impl View for SlideView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn element(&self) -> ElementId {
        self.element
    }

    fn state(&self) -> ViewState {
        self.state
    }

    fn render(&mut self, scene: &mut Scene) -> RegionResult<RenderStatus> {
        if self.state == ViewState::Closed {
            return Err(RegionError::ViewClosed(self.id.to_string()));
        }
        self.render_template(scene)?;
        self.state = ViewState::Rendered;
        self.events.emit(ViewEvent::Render);
        Ok(RenderStatus::Complete)
    }

    fn close(&mut self, scene: &mut Scene) {
        if self.state == ViewState::Closed {
            return;
        }
        scene.remove(self.element);
        self.buttons.clear();
        self.state = ViewState::Closed;
        self.events.emit(ViewEvent::Close);
    }

    fn events(&mut self) -> &mut Emitter<ViewEvent> {
        &mut self.events
    }

    fn handle_click(&mut self, scene: &Scene, target: ElementId) -> bool {
        if self.state != ViewState::Rendered {
            return false;
        }
        let hit = self
            .buttons
            .iter()
            .find(|(button, _)| *button == target || scene.is_descendant_of(target, *button))
            .map(|&(_, kind)| kind);
        match hit {
            Some(kind) => {
                self.request_next(kind);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/slide.rs"]
mod tests;
