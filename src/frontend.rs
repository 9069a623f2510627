use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{window, Element, Event, IntersectionObserver, IntersectionObserverEntry, MouseEvent};
use yew::prelude::*;

use crate::content::{self, Page, EXPERIENCES, MUSEUM_HOTSPOT, PROFILE, RESUME_PATH, SKILLS};
use crate::ui::events::{EventKind, EventSource, Handler, ListenerId, PageEvent};
use crate::ui::gallery::{GalleryConfig, GalleryController, GalleryView, OverlayTarget, RevealPhase};
use crate::ui::nav::{LinksLayout, NavConfig, NavController, NavState, BACK_LINK, NAV_LINKS};
use crate::ui::tooltip::Tooltip;

const TOOLTIP_LABEL_WIDTH: f64 = 300.0;
const TOOLTIP_LABEL_HEIGHT: f64 = 40.0;

fn viewport_size() -> (f64, f64) {
    let Some(win) = window() else {
        return (1280.0, 720.0);
    };

    let width = win
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0);
    let height = win
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0);

    (width, height)
}

fn scroll_offset() -> f64 {
    window().and_then(|w| w.scroll_y().ok()).unwrap_or(0.0)
}

fn current_path() -> String {
    window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn prefers_reduced_motion() -> bool {
    window()
        .and_then(|w| {
            w.match_media("(prefers-reduced-motion: reduce)")
                .ok()
                .flatten()
        })
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

enum Registration {
    Window {
        event: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    },
    Observer {
        observer: IntersectionObserver,
        _callback: Closure<dyn FnMut(Array)>,
    },
    // no sentinel to observe; kept so ids and counts stay consistent
    Inert,
}

impl Registration {
    fn release(self) {
        match self {
            Self::Window { event, callback } => {
                if let Some(win) = window() {
                    let removed = win
                        .remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
                    // still attached; the closure must outlive the listener
                    if removed.is_err() {
                        callback.forget();
                    }
                }
            }
            Self::Observer { observer, .. } => observer.disconnect(),
            Self::Inert => {}
        }
    }
}

/// Browser-backed event source: window scroll and resize listeners, plus an
/// `IntersectionObserver` on an optional sentinel element.
struct DomEventSource {
    sentinel: Option<Element>,
    next_id: Cell<u64>,
    registrations: RefCell<HashMap<ListenerId, Registration>>,
}

impl DomEventSource {
    fn new(sentinel: Option<Element>) -> Self {
        Self {
            sentinel,
            next_id: Cell::new(0),
            registrations: RefCell::new(HashMap::new()),
        }
    }

    fn window_listener(event: &'static str, mut handler: Handler) -> Registration {
        let callback = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let page_event = match event {
                "resize" => PageEvent::Resize {
                    width: viewport_size().0,
                },
                _ => PageEvent::Scroll {
                    offset_y: scroll_offset(),
                },
            };
            handler(&page_event);
        });

        let Some(win) = window() else {
            return Registration::Inert;
        };
        if win
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .is_err()
        {
            return Registration::Inert;
        }

        Registration::Window { event, callback }
    }

    fn sentinel_observer(&self, mut handler: Handler) -> Registration {
        let Some(sentinel) = self.sentinel.as_ref() else {
            return Registration::Inert;
        };

        let callback = Closure::<dyn FnMut(Array)>::new(move |entries: Array| {
            let Ok(entry) = entries.get(0).dyn_into::<IntersectionObserverEntry>() else {
                return;
            };
            handler(&PageEvent::Intersection {
                intersecting: entry.is_intersecting(),
            });
        });

        let Ok(observer) = IntersectionObserver::new(callback.as_ref().unchecked_ref()) else {
            return Registration::Inert;
        };
        observer.observe(sentinel);

        Registration::Observer {
            observer,
            _callback: callback,
        }
    }
}

impl EventSource for DomEventSource {
    fn listen(&self, kind: EventKind, handler: Handler) -> ListenerId {
        let id = ListenerId::new(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        let registration = match kind {
            EventKind::Scroll => Self::window_listener("scroll", handler),
            EventKind::Resize => Self::window_listener("resize", handler),
            EventKind::Intersection => self.sentinel_observer(handler),
        };
        self.registrations.borrow_mut().insert(id, registration);
        id
    }

    fn unlisten(&self, id: ListenerId) {
        let removed = self.registrations.borrow_mut().remove(&id);
        if let Some(registration) = removed {
            registration.release();
        }
    }

    fn active_listeners(&self) -> usize {
        self.registrations.borrow().len()
    }
}

#[derive(Properties, PartialEq)]
struct NavigationProps {
    current_path: AttrValue,
}

#[function_component(Navigation)]
fn navigation(props: &NavigationProps) -> Html {
    let sentinel = use_node_ref();
    let nav_state = use_state(|| NavState::new(viewport_size().0, NavConfig::default()));
    let controller = use_mut_ref(|| None::<NavController>);

    {
        let sentinel = sentinel.clone();
        let nav_state = nav_state.clone();
        let controller = controller.clone();
        use_effect_with((), move |_| {
            let source: Rc<dyn EventSource> = Rc::new(DomEventSource::new(sentinel.cast::<Element>()));
            let mounted = NavController::mount(source, NavConfig::default(), viewport_size().0, {
                let nav_state = nav_state.clone();
                move |next| nav_state.set(next)
            });
            nav_state.set(mounted.state());
            *controller.borrow_mut() = Some(mounted);

            move || {
                controller.borrow_mut().take();
            }
        });
    }

    let on_toggle_menu = {
        let controller = controller.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(controller) = controller.borrow().as_ref() {
                controller.toggle_menu();
            }
        })
    };

    let inline_links = NAV_LINKS.iter().map(|link| {
        html! {
            <a
                class="nav-link"
                href={link.path}
                aria-current={link.is_current(&props.current_path).then_some("page")}
            >
                {link.label}
            </a>
        }
    });

    let dropdown_links = NAV_LINKS.iter().map(|link| {
        let onclick = {
            let controller = controller.clone();
            let link = *link;
            Callback::from(move |_: MouseEvent| {
                if let Some(controller) = controller.borrow().as_ref() {
                    controller.follow_link(&link);
                }
            })
        };
        html! {
            <li>
                <a
                    class="nav-link"
                    href={link.path}
                    aria-current={link.is_current(&props.current_path).then_some("page")}
                    {onclick}
                >
                    {link.label}
                </a>
            </li>
        }
    });

    let controls = match nav_state.links_layout() {
        LinksLayout::Horizontal => html! {
            <div class="nav-links">{ for inline_links }</div>
        },
        LinksLayout::Collapsed => html! {
            <button
                class="menu-toggle"
                type="button"
                aria-label="Toggle navigation menu"
                aria-expanded={nav_state.menu_visible().to_string()}
                onclick={on_toggle_menu}
            >
                <span aria-hidden="true">{"☰"}</span>
            </button>
        },
    };

    let dropdown = if nav_state.menu_visible() {
        html! {
            <div class="nav-dropdown">
                <ul>{ for dropdown_links }</ul>
            </div>
        }
    } else {
        html! {}
    };

    html! {
        <header class="site-nav">
            <div ref={sentinel} class="nav-sentinel" aria-hidden="true"></div>
            <div class={classes!("nav-bar", nav_state.header_style().as_class())}>
                <div class="nav-inner">
                    <a class="nav-back" href={BACK_LINK.path} aria-label="Back to home">{"←"}</a>
                    {controls}
                </div>
                {dropdown}
            </div>
        </header>
    }
}

#[function_component(PhotoGallery)]
fn photo_gallery() -> Html {
    let items = content::gallery_items();
    let view = use_state(|| GalleryView {
        phase: RevealPhase::Hidden,
        selected: None,
    });
    let controller = use_mut_ref(|| None::<GalleryController>);
    let animate = use_state(|| !prefers_reduced_motion());

    {
        let view = view.clone();
        let controller = controller.clone();
        use_effect_with((), move |_| {
            let source: Rc<dyn EventSource> = Rc::new(DomEventSource::new(None));
            let mounted = GalleryController::mount(
                source,
                content::gallery_items(),
                GalleryConfig::default(),
                {
                    let view = view.clone();
                    move |next| view.set(next)
                },
            );
            *controller.borrow_mut() = Some(mounted);

            move || {
                controller.borrow_mut().take();
            }
        });
    }

    let thumbnails = items.iter().map(|item| {
        let onclick = {
            let controller = controller.clone();
            let id = item.id;
            Callback::from(move |_: MouseEvent| {
                if let Some(controller) = controller.borrow().as_ref() {
                    controller.select(id);
                }
            })
        };
        html! {
            <button class="gallery-thumb" type="button" {onclick}>
                <img
                    src={item.src}
                    alt={item.alt}
                    width={item.width.to_string()}
                    height={item.height.to_string()}
                    loading="lazy"
                />
            </button>
        }
    });

    let open = controller
        .borrow()
        .as_ref()
        .and_then(GalleryController::overlay);
    let overlay = open.map(|item| {
        let on_backdrop = {
            let controller = controller.clone();
            Callback::from(move |_: MouseEvent| {
                if let Some(controller) = controller.borrow().as_ref() {
                    controller.click_overlay(OverlayTarget::Backdrop);
                }
            })
        };
        let on_image = {
            let controller = controller.clone();
            Callback::from(move |event: MouseEvent| {
                event.stop_propagation();
                if let Some(controller) = controller.borrow().as_ref() {
                    controller.click_overlay(OverlayTarget::Image);
                }
            })
        };
        html! {
            <div class="lightbox" role="dialog" aria-modal="true" onclick={on_backdrop}>
                <img class="lightbox-image" src={item.src} alt={item.alt} onclick={on_image} />
            </div>
        }
    });

    let phase_class = match view.phase {
        RevealPhase::Hidden => "is-hidden",
        RevealPhase::Revealed => "is-revealed",
    };

    html! {
        <section class="gallery-section" aria-labelledby="gallery-heading">
            <h2 id="gallery-heading">{"📸 Some Moments"}</h2>
            <div class={classes!("gallery-grid", phase_class, (*animate).then_some("animated"))}>
                { for thumbnails }
            </div>
            { overlay.unwrap_or_default() }
        </section>
    }
}

enum TooltipAction {
    Enter(f64, f64),
    Move(f64, f64),
    Leave,
}

#[derive(Default, PartialEq)]
struct TooltipModel(Tooltip);

impl Reducible for TooltipModel {
    type Action = TooltipAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = self.0;
        match action {
            TooltipAction::Enter(x, y) => next.pointer_enter(x, y),
            TooltipAction::Move(x, y) => {
                if !next.pointer_move(x, y) {
                    return self;
                }
            }
            TooltipAction::Leave => next.pointer_leave(),
        }
        Rc::new(Self(next))
    }
}

#[function_component(HeroHotspot)]
fn hero_hotspot() -> Html {
    let tooltip = use_reducer(TooltipModel::default);
    let hotspot = &MUSEUM_HOTSPOT;

    let onmouseenter = {
        let tooltip = tooltip.dispatcher();
        Callback::from(move |event: MouseEvent| {
            tooltip.dispatch(TooltipAction::Enter(
                f64::from(event.client_x()),
                f64::from(event.client_y()),
            ));
        })
    };

    let onmousemove = {
        let tooltip = tooltip.dispatcher();
        Callback::from(move |event: MouseEvent| {
            tooltip.dispatch(TooltipAction::Move(
                f64::from(event.client_x()),
                f64::from(event.client_y()),
            ));
        })
    };

    let onmouseleave = {
        let tooltip = tooltip.dispatcher();
        Callback::from(move |_: MouseEvent| tooltip.dispatch(TooltipAction::Leave))
    };

    let hotspot_style = format!(
        "left: {:.2}%; top: {:.2}%; width: {:.2}%; height: {:.2}%;",
        hotspot.left_pct, hotspot.top_pct, hotspot.width_pct, hotspot.height_pct
    );

    let label = tooltip
        .0
        .label_position_within(viewport_size(), (TOOLTIP_LABEL_WIDTH, TOOLTIP_LABEL_HEIGHT))
        .map(|(x, y)| {
            let style = format!("left: {x:.2}px; top: {y:.2}px; pointer-events: none;");
            html! {
                <span class="hotspot-label" style={style} aria-hidden="true">{hotspot.label}</span>
            }
        });

    html! {
        <figure class="hero">
            <img class="hero-image" src={hotspot.image} alt={hotspot.image_alt} />
            <a
                class="hotspot"
                href={hotspot.href}
                target="_blank"
                rel="noopener noreferrer"
                style={hotspot_style}
                aria-label={hotspot.label}
                {onmouseenter}
                {onmousemove}
                {onmouseleave}
            ></a>
            { label.unwrap_or_default() }
        </figure>
    }
}

#[function_component(AboutMe)]
fn about_me() -> Html {
    html! {
        <main id="content" class="page about">
            <div class="profile-photo">
                <img src={PROFILE.photo} alt={PROFILE.name} />
            </div>
            <section class="about-copy">
                <h1>{PROFILE.greeting}</h1>
                <p>{PROFILE.intro}</p>
                <ul class="degrees">
                    { for PROFILE.degrees.iter().map(|degree| html! { <li>{*degree}</li> }) }
                </ul>
                { for PROFILE.paragraphs.iter().map(|paragraph| html! { <p>{*paragraph}</p> }) }
            </section>
            <HeroHotspot />
            <PhotoGallery />
        </main>
    }
}

#[function_component(ExperiencePage)]
fn experience_page() -> Html {
    html! {
        <main id="content" class="page experience">
            <h1>{"💼 Experience"}</h1>
            <div class="experience-list">
                { for EXPERIENCES.iter().map(|exp| html! {
                    <article class="experience-card">
                        <div class="experience-details">
                            <h2>{exp.company}</h2>
                            <h3>{exp.role}</h3>
                            <p class="muted">{exp.date}</p>
                            <ul>
                                { for exp.points.iter().map(|point| html! {
                                    <li><span class="check" aria-hidden="true">{"✔"}</span>{*point}</li>
                                }) }
                            </ul>
                        </div>
                        <img class="experience-image" src={exp.image} alt={exp.company} width="300" height="200" />
                    </article>
                }) }
            </div>
            <section class="skills" aria-labelledby="skills-heading">
                <h2 id="skills-heading">{"Skills, Tools, and Technologies"}</h2>
                <p class="muted">
                    {"These are some tools and technologies that I have experience with in various capacities, \
                      whether professional, academic, or personal."}
                </p>
                <ul class="skill-grid">
                    { for SKILLS.iter().map(|skill| html! {
                        <li class="skill">
                            <img src={skill.icon_url()} alt={skill.name} width="60" height="60" />
                            <span>{skill.name}</span>
                        </li>
                    }) }
                </ul>
            </section>
        </main>
    }
}

#[function_component(ResumePage)]
fn resume_page() -> Html {
    html! {
        <main id="content" class="page resume">
            <h1>{"📄 My Résumé"}</h1>
            <div class="resume-frame">
                <iframe src={RESUME_PATH} title="Resume PDF"></iframe>
            </div>
        </main>
    }
}

#[function_component(Home)]
fn home() -> Html {
    html! {
        <main id="content" class="page home">
            <h1 class="home-title">{PROFILE.name}</h1>
            <nav class="home-links" aria-label="Sections">
                { for NAV_LINKS.iter().map(|link| html! {
                    <a class="nav-link" href={link.path}>{link.label}</a>
                }) }
            </nav>
        </main>
    }
}

#[function_component(NotFound)]
fn not_found() -> Html {
    html! {
        <main id="content" class="page not-found">
            <h1>{"Nothing here yet"}</h1>
            <p class="muted"><a href={BACK_LINK.path}>{"Back to the start"}</a></p>
        </main>
    }
}

#[function_component(App)]
fn app() -> Html {
    let path = current_path();
    let page = Page::from_path(&path);

    let body = match page {
        Page::Home => html! { <Home /> },
        Page::AboutMe => html! { <AboutMe /> },
        Page::Experience => html! { <ExperiencePage /> },
        Page::Resume => html! { <ResumePage /> },
        Page::NotFound => html! { <NotFound /> },
    };

    html! {
        <>
            <a class="skip-link" href="#content">{"Skip to main content"}</a>
            if page != Page::Home {
                <Navigation current_path={AttrValue::from(path)} />
            }
            {body}
        </>
    }
}

pub fn run() {
    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
