//! Retained element tree standing in for the DOM.
//!
//! The scene owns every element: its box size, unresolved transform list, class set, attributes
//! and registered event listeners. Every mutation the region cares about is appended to a change
//! journal so hosts can mirror it onto a real surface (or tests can assert on it).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::{
    foundation::core::{ElementId, ListenerId, Size},
    foundation::error::{RegionError, RegionResult},
    transform::{affine, css::TransformList},
};

/// Maximum number of undrained journal entries; older ones are dropped first.
pub const MAX_SCENE_CHANGES: usize = 1024;

#[derive(Clone, Debug)]
struct Listener {
    id: ListenerId,
    event: String,
}

#[derive(Clone, Debug)]
/// One node of the scene.
pub struct Element {
    id: ElementId,
    tag: String,
    dom_id: Option<String>,
    size: Size,
    transform: TransformList,
    classes: BTreeSet<String>,
    attrs: BTreeMap<String, String>,
    text: Option<String>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    listeners: Vec<Listener>,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn dom_id(&self) -> Option<&str> {
        self.dom_id.as_deref()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn transform(&self) -> &TransformList {
        &self.transform
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
/// Journal entry describing one scene mutation.
pub enum SceneChange {
    Attached {
        parent: ElementId,
        child: ElementId,
    },
    Detached {
        parent: ElementId,
        child: ElementId,
    },
    Removed {
        element: ElementId,
    },
    TransformSet {
        element: ElementId,
        transform: String,
    },
    ClassAdded {
        element: ElementId,
        class: String,
    },
    ClassRemoved {
        element: ElementId,
        class: String,
    },
    ListenerAdded {
        element: ElementId,
        event: String,
        listener: ListenerId,
    },
    ListenerRemoved {
        element: ElementId,
        event: String,
        listener: ListenerId,
    },
}

#[derive(Debug)]
/// Element arena rooted at a `body` element sized to the viewport.
pub struct Scene {
    elements: BTreeMap<ElementId, Element>,
    root: ElementId,
    next_element: u64,
    next_listener: u64,
    changes: VecDeque<SceneChange>,
}

impl Scene {
    pub fn new(viewport: Size) -> Self {
        let mut scene = Self {
            elements: BTreeMap::new(),
            root: ElementId(0),
            next_element: 0,
            next_listener: 0,
            changes: VecDeque::new(),
        };
        scene.root = scene.create_element("body", viewport);
        scene
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: impl Into<String>, size: Size) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element += 1;
        self.elements.insert(
            id,
            Element {
                id,
                tag: tag.into(),
                dom_id: None,
                size,
                transform: TransformList::none(),
                classes: BTreeSet::new(),
                attrs: BTreeMap::new(),
                text: None,
                parent: None,
                children: Vec::new(),
                listeners: Vec::new(),
            },
        );
        id
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn element(&self, id: ElementId) -> RegionResult<&Element> {
        self.elements
            .get(&id)
            .ok_or_else(|| RegionError::unknown_element(id))
    }

    fn element_mut(&mut self, id: ElementId) -> RegionResult<&mut Element> {
        self.elements
            .get_mut(&id)
            .ok_or_else(|| RegionError::unknown_element(id))
    }

    pub fn set_dom_id(&mut self, id: ElementId, dom_id: impl Into<String>) -> RegionResult<()> {
        let dom_id = dom_id.into();
        if self
            .elements
            .values()
            .any(|e| e.id != id && e.dom_id.as_deref() == Some(dom_id.as_str()))
        {
            return Err(RegionError::validation(format!(
                "duplicate element id '#{dom_id}'"
            )));
        }
        self.element_mut(id)?.dom_id = Some(dom_id);
        Ok(())
    }

    /// Resolve an `#id` selector.
    pub fn query(&self, selector: &str) -> RegionResult<ElementId> {
        let dom_id = selector
            .trim()
            .strip_prefix('#')
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                RegionError::validation(format!("unsupported selector '{selector}'"))
            })?;
        self.elements
            .values()
            .find(|e| e.dom_id.as_deref() == Some(dom_id))
            .map(|e| e.id)
            .ok_or_else(|| RegionError::unknown_element(selector))
    }

    /// First element carrying `class` in the subtree under `scope` (depth-first, `scope` included).
    pub fn find_by_class(&self, scope: ElementId, class: &str) -> Option<ElementId> {
        let el = self.elements.get(&scope)?;
        if el.has_class(class) {
            return Some(scope);
        }
        el.children
            .iter()
            .find_map(|&child| self.find_by_class(child, class))
    }

    pub fn is_descendant_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut cur = self.elements.get(&id).and_then(|e| e.parent);
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.elements.get(&p).and_then(|e| e.parent);
        }
        false
    }

    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> RegionResult<()> {
        self.element(parent)?;
        self.element(child)?;
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(RegionError::validation(format!(
                "appending {child} under {parent} would create a cycle"
            )));
        }
        self.detach(child)?;
        self.element_mut(parent)?.children.push(child);
        self.element_mut(child)?.parent = Some(parent);
        self.record(SceneChange::Attached { parent, child });
        Ok(())
    }

    /// Unlink `id` from its parent, keeping it (and its subtree) alive.
    pub fn detach(&mut self, id: ElementId) -> RegionResult<()> {
        let Some(parent) = self.element_mut(id)?.parent.take() else {
            return Ok(());
        };
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.retain(|&c| c != id);
        }
        self.record(SceneChange::Detached { parent, child: id });
        Ok(())
    }

    /// Drop `id` and its whole subtree. Returns `false` if it was already gone.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if !self.contains(id) || id == self.root {
            return false;
        }
        // Detach cannot fail here: `id` exists.
        let _ = self.detach(id);

        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(el) = self.elements.remove(&cur) {
                stack.extend(el.children);
            }
        }
        self.record(SceneChange::Removed { element: id });
        true
    }

    pub fn set_size(&mut self, id: ElementId, size: Size) -> RegionResult<()> {
        self.element_mut(id)?.size = size;
        Ok(())
    }

    pub fn set_transform(&mut self, id: ElementId, transform: TransformList) -> RegionResult<()> {
        let text = transform.to_string();
        self.element_mut(id)?.transform = transform;
        self.record(SceneChange::TransformSet {
            element: id,
            transform: text,
        });
        Ok(())
    }

    pub fn transform(&self, id: ElementId) -> RegionResult<&TransformList> {
        Ok(&self.element(id)?.transform)
    }

    /// Computed-style value of `transform`: `none` or a resolved `matrix(...)`.
    pub fn computed_transform(&self, id: ElementId) -> RegionResult<String> {
        let el = self.element(id)?;
        if el.transform.is_none() {
            return Ok("none".to_string());
        }
        Ok(affine::to_transform_string(el.transform.resolve(el.size)))
    }

    /// Returns `true` if the class was not already present.
    pub fn add_class(&mut self, id: ElementId, class: &str) -> RegionResult<bool> {
        let added = self.element_mut(id)?.classes.insert(class.to_string());
        if added {
            self.record(SceneChange::ClassAdded {
                element: id,
                class: class.to_string(),
            });
        }
        Ok(added)
    }

    /// Returns `true` if the class was present.
    pub fn remove_class(&mut self, id: ElementId, class: &str) -> RegionResult<bool> {
        let removed = self.element_mut(id)?.classes.remove(class);
        if removed {
            self.record(SceneChange::ClassRemoved {
                element: id,
                class: class.to_string(),
            });
        }
        Ok(removed)
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.elements.get(&id).is_some_and(|e| e.has_class(class))
    }

    pub fn set_attr(
        &mut self,
        id: ElementId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> RegionResult<()> {
        self.element_mut(id)?.attrs.insert(name.into(), value.into());
        Ok(())
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) -> RegionResult<()> {
        self.element_mut(id)?.text = Some(text.into());
        Ok(())
    }

    /// Remove (and drop) every child of `id`.
    pub fn clear_children(&mut self, id: ElementId) -> RegionResult<()> {
        let children = std::mem::take(&mut self.element_mut(id)?.children);
        for child in children {
            if let Some(el) = self.elements.get_mut(&child) {
                el.parent = None;
            }
            self.remove(child);
        }
        Ok(())
    }

    /// Register a listener for `event` on `id`.
    pub fn on(&mut self, id: ElementId, event: &str) -> RegionResult<ListenerId> {
        let listener = ListenerId(self.next_listener);
        self.element_mut(id)?.listeners.push(Listener {
            id: listener,
            event: event.to_string(),
        });
        self.next_listener += 1;
        self.record(SceneChange::ListenerAdded {
            element: id,
            event: event.to_string(),
            listener,
        });
        Ok(listener)
    }

    /// Remove every listener for `event` on `id`; returns how many were removed.
    pub fn off(&mut self, id: ElementId, event: &str) -> RegionResult<usize> {
        let el = self.element_mut(id)?;
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut el.listeners)
            .into_iter()
            .partition(|l| l.event == event);
        el.listeners = kept;
        let n = gone.len();
        for l in gone {
            self.record(SceneChange::ListenerRemoved {
                element: id,
                event: l.event,
                listener: l.id,
            });
        }
        Ok(n)
    }

    /// Remove one specific listener; returns `false` if it was not registered.
    pub fn off_listener(&mut self, id: ElementId, listener: ListenerId) -> RegionResult<bool> {
        let el = self.element_mut(id)?;
        let Some(pos) = el.listeners.iter().position(|l| l.id == listener) else {
            return Ok(false);
        };
        let l = el.listeners.remove(pos);
        self.record(SceneChange::ListenerRemoved {
            element: id,
            event: l.event,
            listener,
        });
        Ok(true)
    }

    pub fn listener_count(&self, id: ElementId, event: &str) -> usize {
        self.elements
            .get(&id)
            .map_or(0, |e| e.listeners.iter().filter(|l| l.event == event).count())
    }

    pub fn has_listener(&self, id: ElementId, listener: ListenerId) -> bool {
        self.elements
            .get(&id)
            .is_some_and(|e| e.listeners.iter().any(|l| l.id == listener))
    }

    /// Listeners that an `event` fired on `id` would reach, in registration order.
    pub fn dispatch(&self, id: ElementId, event: &str) -> Vec<ListenerId> {
        self.elements.get(&id).map_or_else(Vec::new, |e| {
            e.listeners
                .iter()
                .filter(|l| l.event == event)
                .map(|l| l.id)
                .collect()
        })
    }

    /// Undrained journal entries, oldest first.
    pub fn changes(&self) -> impl Iterator<Item = &SceneChange> {
        self.changes.iter()
    }

    pub fn take_changes(&mut self) -> Vec<SceneChange> {
        self.changes.drain(..).collect()
    }

    fn record(&mut self, change: SceneChange) {
        if self.changes.len() == MAX_SCENE_CHANGES {
            self.changes.pop_front();
            tracing::trace!("scene journal full, dropping oldest change");
        }
        self.changes.push_back(change);
    }
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
