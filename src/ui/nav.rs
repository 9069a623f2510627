use std::cell::RefCell;
use std::rc::Rc;

use super::events::{EventKind, EventSource, PageEvent, Subscription};
use super::state::Toggle;

pub const DEFAULT_BREAKPOINT: f64 = 768.0;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ViewportClass {
    Narrow,
    Wide,
}

impl ViewportClass {
    pub fn classify(width: f64, breakpoint: f64) -> Self {
        if width < breakpoint {
            Self::Narrow
        } else {
            Self::Wide
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HeaderStyle {
    Transparent,
    Opaque,
}

impl HeaderStyle {
    pub fn as_class(self) -> &'static str {
        match self {
            Self::Transparent => "is-transparent",
            Self::Opaque => "is-opaque",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LinksLayout {
    Horizontal,
    Collapsed,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
}

impl NavLink {
    pub fn is_current(&self, current_path: &str) -> bool {
        let trimmed = current_path.trim_end_matches('/');
        let current = if trimmed.is_empty() { "/" } else { trimmed };
        current == self.path
    }
}

pub const BACK_LINK: NavLink = NavLink {
    label: "Back",
    path: "/",
};

pub const NAV_LINKS: [NavLink; 5] = [
    NavLink {
        label: "About Me",
        path: "/about_me",
    },
    NavLink {
        label: "Experience",
        path: "/experience",
    },
    NavLink {
        label: "Projects",
        path: "/projects",
    },
    NavLink {
        label: "Résumé",
        path: "/resume",
    },
    NavLink {
        label: "Contact",
        path: "/contact",
    },
];

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct NavConfig {
    pub breakpoint: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            breakpoint: DEFAULT_BREAKPOINT,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct NavState {
    breakpoint: f64,
    intersecting: Toggle,
    viewport: ViewportClass,
    menu_open: Toggle,
}

impl NavState {
    pub fn new(initial_width: f64, config: NavConfig) -> Self {
        Self {
            breakpoint: config.breakpoint,
            intersecting: Toggle::new(true),
            viewport: ViewportClass::classify(initial_width, config.breakpoint),
            menu_open: Toggle::new(false),
        }
    }

    pub fn on_intersection(&mut self, intersecting: bool) -> bool {
        self.intersecting.set(intersecting)
    }

    pub fn on_resize(&mut self, width: f64) -> bool {
        let next = ViewportClass::classify(width, self.breakpoint);
        if next == self.viewport {
            return false;
        }

        self.viewport = next;
        if next == ViewportClass::Wide {
            self.menu_open.set(false);
        }
        true
    }

    /// Does nothing in wide mode, where there is no menu button.
    pub fn toggle_menu(&mut self) -> bool {
        if self.viewport == ViewportClass::Wide {
            return false;
        }
        self.menu_open.flip();
        true
    }

    pub fn follow_link(&mut self, link: &NavLink) -> &'static str {
        self.menu_open.set(false);
        link.path
    }

    pub fn header_style(&self) -> HeaderStyle {
        if self.intersecting.is_on() {
            HeaderStyle::Transparent
        } else {
            HeaderStyle::Opaque
        }
    }

    pub fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    pub fn links_layout(&self) -> LinksLayout {
        match self.viewport {
            ViewportClass::Wide => LinksLayout::Horizontal,
            ViewportClass::Narrow => LinksLayout::Collapsed,
        }
    }

    pub fn menu_visible(&self) -> bool {
        self.viewport == ViewportClass::Narrow && self.menu_open.is_on()
    }
}

/// Keeps a [`NavState`] in step with resize and sentinel-visibility events
/// until it is dropped.
pub struct NavController {
    state: Rc<RefCell<NavState>>,
    on_change: Rc<dyn Fn(NavState)>,
    _subscriptions: [Subscription; 2],
}

impl NavController {
    pub fn mount(
        source: Rc<dyn EventSource>,
        config: NavConfig,
        initial_width: f64,
        on_change: impl Fn(NavState) + 'static,
    ) -> Self {
        let state = Rc::new(RefCell::new(NavState::new(initial_width, config)));
        let on_change: Rc<dyn Fn(NavState)> = Rc::new(on_change);

        let resize = Subscription::new(Rc::clone(&source), EventKind::Resize, {
            let state = Rc::clone(&state);
            let on_change = Rc::clone(&on_change);
            Box::new(move |event| {
                if let PageEvent::Resize { width } = event {
                    let changed = state.borrow_mut().on_resize(*width);
                    if changed {
                        let snapshot = *state.borrow();
                        on_change(snapshot);
                    }
                }
            })
        });

        let intersection = Subscription::new(source, EventKind::Intersection, {
            let state = Rc::clone(&state);
            let on_change = Rc::clone(&on_change);
            Box::new(move |event| {
                if let PageEvent::Intersection { intersecting } = event {
                    let changed = state.borrow_mut().on_intersection(*intersecting);
                    if changed {
                        let snapshot = *state.borrow();
                        on_change(snapshot);
                    }
                }
            })
        });

        Self {
            state,
            on_change,
            _subscriptions: [resize, intersection],
        }
    }

    pub fn state(&self) -> NavState {
        *self.state.borrow()
    }

    pub fn toggle_menu(&self) {
        let changed = self.state.borrow_mut().toggle_menu();
        if changed {
            self.notify();
        }
    }

    pub fn follow_link(&self, link: &NavLink) -> &'static str {
        let path = self.state.borrow_mut().follow_link(link);
        self.notify();
        path
    }

    pub fn unmount(self) {}

    fn notify(&self) {
        let snapshot = *self.state.borrow();
        (self.on_change)(snapshot);
    }
}
