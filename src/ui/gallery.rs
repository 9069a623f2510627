use std::cell::RefCell;
use std::rc::Rc;

use super::events::{EventKind, EventSource, PageEvent, Subscription};
use super::state::Latch;

pub const DEFAULT_REVEAL_THRESHOLD: f64 = 400.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ItemId(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GalleryItem {
    pub id: ItemId,
    pub src: &'static str,
    pub alt: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Where a click on the open lightbox landed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OverlayTarget {
    Backdrop,
    Image,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RevealPhase {
    Hidden,
    Revealed,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GalleryConfig {
    pub reveal_threshold: f64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            reveal_threshold: DEFAULT_REVEAL_THRESHOLD,
        }
    }
}

/// What a view needs to render the gallery after a change.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GalleryView {
    pub phase: RevealPhase,
    pub selected: Option<ItemId>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Gallery {
    items: Vec<GalleryItem>,
    reveal_threshold: f64,
    revealed: Latch,
    selected: Option<ItemId>,
}

impl Gallery {
    pub fn new(items: Vec<GalleryItem>, config: GalleryConfig) -> Self {
        Self {
            items,
            reveal_threshold: config.reveal_threshold,
            revealed: Latch::new(),
            selected: None,
        }
    }

    /// Returns true when this offset is the one that revealed the gallery.
    pub fn on_scroll(&mut self, offset_y: f64) -> bool {
        offset_y >= self.reveal_threshold && self.revealed.trip()
    }

    pub fn reveal_phase(&self) -> RevealPhase {
        if self.revealed.is_set() {
            RevealPhase::Revealed
        } else {
            RevealPhase::Hidden
        }
    }

    /// Replaces any current selection. Ids not in the gallery are ignored.
    pub fn select(&mut self, id: ItemId) -> bool {
        if !self.items.iter().any(|item| item.id == id) {
            return false;
        }
        let changed = self.selected != Some(id);
        self.selected = Some(id);
        changed
    }

    pub fn click_overlay(&mut self, target: OverlayTarget) -> bool {
        match target {
            OverlayTarget::Backdrop => self.clear(),
            OverlayTarget::Image => false,
        }
    }

    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn overlay(&self) -> Option<&GalleryItem> {
        let id = self.selected?;
        self.items.iter().find(|item| item.id == id)
    }

    pub fn view(&self) -> GalleryView {
        GalleryView {
            phase: self.reveal_phase(),
            selected: self.selected,
        }
    }
}

/// Drives a [`Gallery`] from scroll events. The scroll listener stays attached
/// until the controller is dropped, whether or not the gallery was revealed.
pub struct GalleryController {
    gallery: Rc<RefCell<Gallery>>,
    on_change: Rc<dyn Fn(GalleryView)>,
    _scroll: Subscription,
}

impl GalleryController {
    pub fn mount(
        source: Rc<dyn EventSource>,
        items: Vec<GalleryItem>,
        config: GalleryConfig,
        on_change: impl Fn(GalleryView) + 'static,
    ) -> Self {
        let gallery = Rc::new(RefCell::new(Gallery::new(items, config)));
        let on_change: Rc<dyn Fn(GalleryView)> = Rc::new(on_change);

        let scroll = Subscription::new(source, EventKind::Scroll, {
            let gallery = Rc::clone(&gallery);
            let on_change = Rc::clone(&on_change);
            Box::new(move |event| {
                if let PageEvent::Scroll { offset_y } = event {
                    let revealed = gallery.borrow_mut().on_scroll(*offset_y);
                    if revealed {
                        let view = gallery.borrow().view();
                        on_change(view);
                    }
                }
            })
        });

        Self {
            gallery,
            on_change,
            _scroll: scroll,
        }
    }

    pub fn view(&self) -> GalleryView {
        self.gallery.borrow().view()
    }

    pub fn overlay(&self) -> Option<GalleryItem> {
        self.gallery.borrow().overlay().copied()
    }

    pub fn select(&self, id: ItemId) {
        let changed = self.gallery.borrow_mut().select(id);
        if changed {
            self.notify();
        }
    }

    pub fn click_overlay(&self, target: OverlayTarget) {
        let changed = self.gallery.borrow_mut().click_overlay(target);
        if changed {
            self.notify();
        }
    }

    pub fn unmount(self) {}

    fn notify(&self) {
        let view = self.gallery.borrow().view();
        (self.on_change)(view);
    }
}
