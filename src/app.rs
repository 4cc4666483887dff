//! Application shell: one scene, one region, one controller.
//!
//! [`Stage`] lays out a background layer and a content container filling the viewport, binds a
//! [`Region`] to them, and lets a [`SlideController`] answer "next" signals from the current slide
//! with fresh slides.

use std::time::Instant;

use crate::{
    config::RegionConfig,
    foundation::core::{ElementId, Size, ViewId},
    foundation::error::{RegionError, RegionResult},
    foundation::math::Rng64,
    region::Region,
    scene::Scene,
    transition::{kind::TransitionKind, random::SeededAngles},
    view::{
        View, ViewEvent,
        slide::{SlideModel, SlideView},
    },
};

/// Images the demo slideshow picks from.
pub const DEFAULT_IMAGES: [&str; 6] = [
    "http://www.beebeography.com/Nature/i-rP8JSCv/0/M/DSC_8183-M.jpg",
    "http://www.beebeography.com/Nature/i-tKvpZDG/0/M/DSC_8216_Fotor-M.jpg",
    "http://www.beebeography.com/Nature/i-Pk9nCCz/0/M/2013-11-09-radner-lake-trees-01-M.jpg",
    "http://www.beebeography.com/Journal/i-hwfrBnq/1/M/2008-10-11_IMG_8087-M.jpg",
    "http://www.beebeography.com/Journal/i-N3c4dBs/0/M/2008-09-28_IMG_7877-M.jpg",
    "http://www.beebeography.com/Journal/i-tkW5Bbc/0/M/IMG_6293-M.jpg",
];

#[derive(Clone, Debug)]
/// Builds slides with a random image.
pub struct SlideController {
    title: String,
    subtitle: String,
    images: Vec<String>,
    rng: Rng64,
}

impl SlideController {
    pub fn new(seed: u64) -> Self {
        Self {
            title: "Panning Region".to_string(),
            subtitle: "Powered by inverse transforms".to_string(),
            images: DEFAULT_IMAGES.iter().map(|s| s.to_string()).collect(),
            rng: Rng64::new(seed),
        }
    }

    pub fn with_images(mut self, images: Vec<String>) -> RegionResult<Self> {
        if images.is_empty() {
            return Err(RegionError::validation("image list must be non-empty"));
        }
        self.images = images;
        Ok(self)
    }

    pub fn next_model(&mut self) -> SlideModel {
        let image = self.images[self.rng.next_index(self.images.len())].clone();
        SlideModel {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            image,
        }
    }

    /// Create the next slide and hand it to `region` with `kind`.
    pub fn show(
        &mut self,
        scene: &mut Scene,
        region: &mut Region,
        size: Size,
        kind: TransitionKind,
    ) -> RegionResult<ViewId> {
        let view = SlideView::new(scene, self.next_model(), size);
        let id = view.id();
        tracing::debug!(view = %id, %kind, image = %view.model().image, "next slide");
        region.transition_to_view(scene, Box::new(view), kind)?;
        Ok(id)
    }
}

#[derive(Debug)]
pub struct Stage {
    scene: Scene,
    region: Region,
    controller: SlideController,
    viewport: Size,
}

impl Stage {
    pub fn new(viewport: Size, config: RegionConfig, seed: u64) -> RegionResult<Self> {
        if !viewport.is_finite() || viewport.width <= 0.0 || viewport.height <= 0.0 {
            return Err(RegionError::validation(
                "viewport must have a positive, finite size",
            ));
        }
        config.validate()?;

        let mut scene = Scene::new(viewport);
        let root = scene.root();
        for selector in [&config.background_selector, &config.container_selector] {
            let el = scene.create_element("div", viewport);
            scene.set_dom_id(el, selector.trim_start_matches('#'))?;
            scene.append_child(root, el)?;
        }

        let region = Region::new(&scene, config)?
            .with_angle_source(SeededAngles::new(seed ^ 0xA5A5_A5A5_A5A5_A5A5));
        Ok(Self {
            scene,
            region,
            controller: SlideController::new(seed),
            viewport,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn region_mut(&mut self) -> &mut Region {
        &mut self.region
    }

    pub fn controller_mut(&mut self) -> &mut SlideController {
        &mut self.controller
    }

    /// Show a new slide with `kind`.
    pub fn show(&mut self, kind: TransitionKind) -> RegionResult<ViewId> {
        self.controller
            .show(&mut self.scene, &mut self.region, self.viewport, kind)
    }

    /// Deliver a click on `target` to the current view, then act on any "next" it raised.
    pub fn click(&mut self, target: ElementId) -> RegionResult<Option<ViewId>> {
        let handled = match self.region.current_view_mut() {
            Some(view) => view.handle_click(&self.scene, target),
            None => false,
        };
        if !handled {
            return Ok(None);
        }
        self.pump()
    }

    /// Click the current slide's button carrying `class` (`next-slide`, `next-rotate`, ...).
    pub fn click_button(&mut self, class: &str) -> RegionResult<Option<ViewId>> {
        let Some(view) = self.region.current_view() else {
            return Ok(None);
        };
        let Some(button) = self.scene.find_by_class(view.element(), class) else {
            return Err(RegionError::validation(format!(
                "current view has no '.{class}' button"
            )));
        };
        self.click(button)
    }

    /// Act on the most recent "next" signal queued by the current view.
    pub fn pump(&mut self) -> RegionResult<Option<ViewId>> {
        let next = match self.region.current_view_mut() {
            Some(view) => view
                .events()
                .drain()
                .into_iter()
                .filter_map(|e| match e {
                    ViewEvent::Next(kind) => Some(kind),
                    _ => None,
                })
                .last(),
            None => None,
        };
        match next {
            Some(kind) => self.show(kind).map(Some),
            None => Ok(None),
        }
    }

    pub fn render_complete(&mut self, view: ViewId) -> RegionResult<bool> {
        self.region.render_complete(&mut self.scene, view)
    }

    pub fn transition_end(&mut self) -> RegionResult<bool> {
        self.region.transition_end(&mut self.scene)
    }

    pub fn poll_deadline(&mut self, now: Instant) -> RegionResult<bool> {
        self.region.poll_deadline(&mut self.scene, now)
    }
}

#[cfg(test)]
#[path = "../tests/unit/app.rs"]
mod tests;
