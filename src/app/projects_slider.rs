use leptos::{either::*, ev, html, prelude::*, task::spawn_local};
use thiserror::Error;

use crate::projects::{CategoryGroup, ContentRecord, ProjectsEnvelope, PROJECTS_ENDPOINT};
use crate::settings::{SectionSettings, PROJECTS_KEYS};
use crate::slider::{
    shows_navigation, CardAction, DismissTrigger, FetchGuard, LoadState, Overlay,
    ScrollDirection, ScrollRegistry, PLACEHOLDER_IMAGE,
};

use super::editable::{EditableBackground, EditableText};
use super::editor::{use_inline_editor, use_section_settings};

type StripRef = NodeRef<html::Div>;

const CARD_CLASS: &str = "block flex-none w-[300px] snap-start rounded-lg overflow-hidden border border-muted/30 bg-brightBlack/20 hover:bg-brightBlack/40 transition-colors duration-200 cursor-pointer text-left";
const NAV_BUTTON_CLASS: &str = "w-9 h-9 rounded-full border border-muted/40 hover:bg-brightBlack/40 text-xl leading-none";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("couldn't resolve the page origin")]
    Location,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

async fn fetch_envelope() -> Result<ProjectsEnvelope, FetchError> {
    let origin = window()
        .location()
        .origin()
        .map_err(|_| FetchError::Location)?;
    let res = reqwest::get(format!("{origin}{PROJECTS_ENDPOINT}")).await?;
    Ok(res.json::<ProjectsEnvelope>().await?)
}

async fn load_projects() -> LoadState {
    match fetch_envelope().await {
        Ok(envelope) => {
            if let ProjectsEnvelope::Failure { error } = &envelope {
                log::error!("project proxy failed: {error}");
            }
            LoadState::from_envelope(&envelope)
        }
        Err(e) => {
            log::error!("failed to load projects: {e}");
            LoadState::Empty
        }
    }
}

fn scroll_strip(
    registry: StoredValue<ScrollRegistry<StripRef>>,
    category: &str,
    direction: ScrollDirection,
) {
    let strip = registry.with_value(|r| r.get(category).copied());
    // native scroll bounds apply, no clamping here
    if let Some(el) = strip.and_then(|s| s.get_untracked()) {
        let opts = web_sys::ScrollToOptions::new();
        opts.set_left(direction.delta());
        opts.set_behavior(web_sys::ScrollBehavior::Smooth);
        el.scroll_by_with_scroll_to_options(&opts);
    }
}

#[component]
pub fn ProjectsSlider() -> impl IntoView {
    let editor = use_inline_editor();
    let section = use_section_settings(
        PROJECTS_KEYS,
        SectionSettings::new("Projects", "A few things I've designed and built."),
    );
    let load_state = RwSignal::new(LoadState::Loading);
    let overlay = RwSignal::new(Overlay::default());
    let registry = StoredValue::new(ScrollRegistry::<StripRef>::default());
    let guard = FetchGuard::default();

    // runs on mount and again whenever edit mode flips
    Effect::new({
        let guard = guard.clone();
        move |_| {
            editor.edit_mode.track();
            let ticket = guard.begin();
            load_state.set(LoadState::Loading);
            registry.update_value(|r| r.clear());

            let guard = guard.clone();
            spawn_local(async move {
                let state = load_projects().await;
                if guard.is_current(ticket) {
                    load_state.set(state);
                }
            });
        }
    });

    let escape = window_event_listener(ev::keydown, move |ev| {
        if ev.key() == "Escape" {
            overlay.maybe_update(|o| o.close(DismissTrigger::Escape));
        }
    });
    on_cleanup(move || {
        guard.invalidate();
        escape.remove();
    });

    view! {
        <section id="projects" class="w-full">
            <EditableBackground section>
                <div class="max-w-6xl mx-auto px-4 py-16 section-content">
                    <h2 class="text-3xl font-bold text-center mb-2">
                        <EditableText
                            value=section.title()
                            on_change=move |title: String| section.set_title(title)
                        />
                    </h2>
                    <p class="text-center text-muted mb-10">
                        <EditableText
                            value=section.subtitle()
                            on_change=move |subtitle: String| section.set_subtitle(subtitle)
                        />
                    </p>
                    {move || match load_state.get() {
                        LoadState::Loading => {
                            EitherOf3::A(
                                view! {
                                    <div class="flex justify-center py-12">
                                        <div
                                            class="w-10 h-10 rounded-full border-4 border-muted/30 border-t-cyan animate-spin"
                                            role="status"
                                            aria-label="Loading projects"
                                        ></div>
                                    </div>
                                },
                            )
                        }
                        LoadState::Empty => {
                            EitherOf3::B(
                                view! {
                                    <p class="text-center text-muted py-12">
                                        "No projects to show yet."
                                    </p>
                                },
                            )
                        }
                        LoadState::Populated(groups) => {
                            EitherOf3::C(
                                groups
                                    .into_iter()
                                    .map(|group| {
                                        view! { <CategoryStrip group registry overlay /> }
                                    })
                                    .collect_view(),
                            )
                        }
                    }}
                </div>
            </EditableBackground>
            <ImageOverlay overlay />
        </section>
    }
}

#[component]
fn CategoryStrip(
    group: CategoryGroup,
    registry: StoredValue<ScrollRegistry<StripRef>>,
    overlay: RwSignal<Overlay>,
) -> impl IntoView {
    let strip = StripRef::new();
    registry.update_value(|r| r.register(group.name.clone(), strip));

    let nav = shows_navigation(&group).then(|| {
        let left = group.name.clone();
        let right = group.name.clone();
        view! {
            <div class="flex gap-2">
                <button
                    class=NAV_BUTTON_CLASS
                    aria-label="Scroll left"
                    on:click=move |_| scroll_strip(registry, &left, ScrollDirection::Left)
                >
                    "‹"
                </button>
                <button
                    class=NAV_BUTTON_CLASS
                    aria-label="Scroll right"
                    on:click=move |_| scroll_strip(registry, &right, ScrollDirection::Right)
                >
                    "›"
                </button>
            </div>
        }
    });

    view! {
        <div class="mb-10">
            <div class="flex items-center justify-between mb-4">
                <h3 class="text-xl font-bold text-cyan">{group.name.clone()}</h3>
                {nav}
            </div>
            <div node_ref=strip class="flex gap-5 overflow-x-auto snap-x pb-4">
                {group
                    .projects
                    .into_iter()
                    .map(|record| view! { <ProjectCard record overlay /> })
                    .collect_view()}
            </div>
        </div>
    }
}

#[component]
fn ProjectCard(record: ContentRecord, overlay: RwSignal<Overlay>) -> impl IntoView {
    let action = CardAction::for_record(&record);
    let body = view! {
        <img
            src=record.image
            alt=record.name.clone()
            loading="lazy"
            class="w-full h-44 object-cover"
            on:error=|ev| {
                let img = event_target::<web_sys::HtmlImageElement>(&ev);
                if !img.src().ends_with(PLACEHOLDER_IMAGE) {
                    img.set_src(PLACEHOLDER_IMAGE);
                }
            }
        />
        <div class="p-4">
            <h4 class="font-bold mb-1">{record.name}</h4>
            <p class="text-sm text-muted">{record.skills}</p>
        </div>
    };

    match action {
        CardAction::Open(link) => {
            Either::Left(
                view! {
                    <a href=link target="_blank" rel="noopener noreferrer" class=CARD_CLASS>
                        {body}
                    </a>
                },
            )
        }
        CardAction::Preview(image) => {
            Either::Right(
                view! {
                    <div
                        role="button"
                        class=CARD_CLASS
                        on:click=move |_| overlay.update(|o| o.open(image.clone()))
                    >
                        {body}
                    </div>
                },
            )
        }
    }
}

#[component]
fn ImageOverlay(overlay: RwSignal<Overlay>) -> impl IntoView {
    let dismiss = move |trigger: DismissTrigger| {
        overlay.maybe_update(|o| o.close(trigger));
    };
    move || {
        let state = overlay.get();
        state.image().map(|image| {
            let content = if state.is_unavailable() {
                Either::Left(
                    view! {
                        <div class="flex items-center justify-center w-96 h-64 rounded-md bg-brightBlack/40 text-muted">
                            "Image unavailable"
                        </div>
                    },
                )
            } else {
                Either::Right(
                    view! {
                        <img
                            src=image.to_string()
                            alt="Project preview"
                            class="max-h-[85vh] max-w-full object-contain rounded-md"
                            on:error=move |_| overlay.update(|o| o.mark_unavailable())
                        />
                    },
                )
            };
            view! {
                <div
                    class="fixed inset-0 z-50 flex items-center justify-center bg-black/80 p-4"
                    on:click=move |_| dismiss(DismissTrigger::Backdrop)
                >
                    <div class="relative" on:click=|ev| ev.stop_propagation()>
                        <button
                            class="absolute -top-10 right-0 text-3xl text-white"
                            aria-label="Close"
                            on:click=move |_| dismiss(DismissTrigger::CloseButton)
                        >
                            "×"
                        </button>
                        {content}
                    </div>
                </div>
            }
        })
    }
}
