use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum EventKind {
    Scroll,
    Resize,
    Intersection,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum PageEvent {
    Scroll { offset_y: f64 },
    Resize { width: f64 },
    Intersection { intersecting: bool },
}

impl PageEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Scroll { .. } => EventKind::Scroll,
            Self::Resize { .. } => EventKind::Resize,
            Self::Intersection { .. } => EventKind::Intersection,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

pub type Handler = Box<dyn FnMut(&PageEvent)>;

/// Something page controllers can subscribe to for scroll, resize and
/// sentinel-visibility events.
///
/// The browser implementation lives in the front end; tests use
/// [`SyntheticEventSource`].
pub trait EventSource {
    fn listen(&self, kind: EventKind, handler: Handler) -> ListenerId;

    /// Unknown or already-removed ids are ignored.
    fn unlisten(&self, id: ListenerId);

    fn active_listeners(&self) -> usize;
}

/// A registered listener that is removed from its source when dropped.
pub struct Subscription {
    source: Rc<dyn EventSource>,
    id: Option<ListenerId>,
}

impl Subscription {
    pub fn new(source: Rc<dyn EventSource>, kind: EventKind, handler: Handler) -> Self {
        let id = source.listen(kind, handler);
        Self {
            source,
            id: Some(id),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.source.unlisten(id);
        }
    }
}

struct Registered {
    id: ListenerId,
    kind: EventKind,
    handler: Rc<RefCell<Handler>>,
}

#[derive(Default)]
pub struct SyntheticEventSource {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<Registered>>,
}

impl SyntheticEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `event` to every listener of its kind in registration order and
    /// returns how many handlers ran.
    pub fn dispatch(&self, event: PageEvent) -> usize {
        let kind = event.kind();
        let targets: Vec<(ListenerId, Rc<RefCell<Handler>>)> = self
            .listeners
            .borrow()
            .iter()
            .filter(|entry| entry.kind == kind)
            .map(|entry| (entry.id, Rc::clone(&entry.handler)))
            .collect();

        let mut delivered = 0;
        for (id, handler) in targets {
            // an earlier handler in this round may have unsubscribed this one
            if !self.is_registered(id) {
                continue;
            }
            if let Ok(mut handler) = handler.try_borrow_mut() {
                (*handler)(&event);
                delivered += 1;
            }
        }
        delivered
    }

    pub fn listeners_of(&self, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    fn is_registered(&self, id: ListenerId) -> bool {
        self.listeners.borrow().iter().any(|entry| entry.id == id)
    }
}

impl EventSource for SyntheticEventSource {
    fn listen(&self, kind: EventKind, handler: Handler) -> ListenerId {
        let id = ListenerId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.listeners.borrow_mut().push(Registered {
            id,
            kind,
            handler: Rc::new(RefCell::new(handler)),
        });
        id
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|entry| entry.id != id);
    }

    fn active_listeners(&self) -> usize {
        self.listeners.borrow().len()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn counting_handler(counter: &Rc<Cell<usize>>) -> Handler {
        let counter = Rc::clone(counter);
        Box::new(move |_| counter.set(counter.get() + 1))
    }

    #[test]
    fn dispatch_reaches_only_matching_kind() {
        let source = SyntheticEventSource::new();
        let scrolls = Rc::new(Cell::new(0));
        let resizes = Rc::new(Cell::new(0));
        source.listen(EventKind::Scroll, counting_handler(&scrolls));
        source.listen(EventKind::Resize, counting_handler(&resizes));

        assert_eq!(source.dispatch(PageEvent::Scroll { offset_y: 12.0 }), 1);
        assert_eq!(scrolls.get(), 1);
        assert_eq!(resizes.get(), 0);
    }

    #[test]
    fn dropping_subscription_releases_listener_once() {
        let concrete = Rc::new(SyntheticEventSource::new());
        let source: Rc<dyn EventSource> = concrete.clone();
        let hits = Rc::new(Cell::new(0));

        let subscription = Subscription::new(
            Rc::clone(&source),
            EventKind::Resize,
            counting_handler(&hits),
        );
        assert_eq!(concrete.active_listeners(), 1);

        drop(subscription);
        assert_eq!(concrete.active_listeners(), 0);
        assert_eq!(concrete.dispatch(PageEvent::Resize { width: 500.0 }), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn listener_ids_are_not_reused() {
        let source = SyntheticEventSource::new();
        let first = source.listen(EventKind::Scroll, Box::new(|_| {}));
        source.unlisten(first);
        let second = source.listen(EventKind::Scroll, Box::new(|_| {}));

        assert_ne!(first, second);
        source.unlisten(first);
        assert_eq!(source.active_listeners(), 1);
    }

    #[test]
    fn handler_may_drop_a_later_subscription_mid_dispatch() {
        let concrete = Rc::new(SyntheticEventSource::new());
        let source: Rc<dyn EventSource> = concrete.clone();
        let later_hits = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let _first = Subscription::new(Rc::clone(&source), EventKind::Scroll, {
            let slot = Rc::clone(&slot);
            Box::new(move |_| {
                slot.borrow_mut().take();
            })
        });
        *slot.borrow_mut() = Some(Subscription::new(
            Rc::clone(&source),
            EventKind::Scroll,
            counting_handler(&later_hits),
        ));

        assert_eq!(concrete.dispatch(PageEvent::Scroll { offset_y: 1.0 }), 1);
        assert_eq!(later_hits.get(), 0);
        assert_eq!(concrete.active_listeners(), 1);
    }
}
