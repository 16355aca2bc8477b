use leptos::{either::*, prelude::*};

use super::editor::{use_inline_editor, EditableSection};

const INPUT_CLASS: &str = "w-full px-3 py-1 rounded-md border border-muted bg-background/80 text-foreground focus:outline-none focus:ring-2 focus:ring-cyan";

/// Text that turns into an input while edit mode is on. Every keystroke is
/// written through.
#[component]
pub fn EditableText(
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_change: Callback<String>,
    #[prop(optional)] multiline: bool,
) -> impl IntoView {
    let editor = use_inline_editor();
    move || {
        if !editor.edit_mode.get() {
            return EitherOf3::A(value.get());
        }
        if multiline {
            EitherOf3::B(view! {
                <textarea
                    class=INPUT_CLASS
                    rows="3"
                    prop:value=move || value.get()
                    on:input=move |ev| on_change.run(event_target_value(&ev))
                ></textarea>
            })
        } else {
            EitherOf3::C(view! {
                <input
                    type="text"
                    class=INPUT_CLASS
                    prop:value=move || value.get()
                    on:input=move |ev| on_change.run(event_target_value(&ev))
                />
            })
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Wraps a section with its background media and color layer.
#[component]
pub fn EditableBackground(section: EditableSection, children: Children) -> impl IntoView {
    let background = move || section.settings.get().background;
    view! {
        <div class="relative overflow-hidden">
            {move || {
                let bg = background();
                match (bg.video_url.clone(), bg.image_style()) {
                    (Some(src), _) => {
                        EitherOf3::A(
                            view! {
                                <video
                                    class="absolute inset-0 w-full h-full object-cover"
                                    src=src
                                    autoplay=true
                                    prop:muted=true
                                    prop:loop=true
                                ></video>
                            },
                        )
                    }
                    (None, Some(style)) => {
                        EitherOf3::B(view! { <div class="absolute inset-0" style=style></div> })
                    }
                    (None, None) => EitherOf3::C(()),
                }
            }}
            <div
                class="absolute inset-0 pointer-events-none"
                style=move || background().color_layer_style()
            ></div>
            <div class="relative">{children()}</div>
            <BackgroundForm section />
        </div>
    }
}

#[component]
fn BackgroundForm(section: EditableSection) -> impl IntoView {
    let editor = use_inline_editor();
    let background = move || section.settings.get().background;
    move || {
        editor.edit_mode.get().then(|| {
            view! {
                <div class="relative grid grid-cols-1 sm:grid-cols-4 gap-2 m-4 p-3 rounded-md bg-black/60 text-sm">
                    <label>
                        "Image URL"
                        <input
                            type="url"
                            class=INPUT_CLASS
                            prop:value=move || background().image_url.unwrap_or_default()
                            on:input=move |ev| {
                                let url = non_empty(event_target_value(&ev));
                                section.update_background(|bg| bg.image_url = url);
                            }
                        />
                    </label>
                    <label>
                        "Video URL"
                        <input
                            type="url"
                            class=INPUT_CLASS
                            prop:value=move || background().video_url.unwrap_or_default()
                            on:input=move |ev| {
                                let url = non_empty(event_target_value(&ev));
                                section.update_background(|bg| bg.video_url = url);
                            }
                        />
                    </label>
                    <label>
                        "Color"
                        <input
                            type="color"
                            class="w-full h-8"
                            prop:value=move || background().color
                            on:input=move |ev| {
                                let color = event_target_value(&ev);
                                section.update_background(|bg| bg.color = color);
                            }
                        />
                    </label>
                    <label>
                        "Opacity"
                        <input
                            type="range"
                            min="0"
                            max="1"
                            step="0.05"
                            class="w-full"
                            prop:value=move || background().opacity.to_string()
                            on:input=move |ev| {
                                if let Ok(opacity) = event_target_value(&ev).parse::<f64>() {
                                    section
                                        .update_background(|bg| bg.opacity = opacity.clamp(0.0, 1.0));
                                }
                            }
                        />
                    </label>
                </div>
            }
        })
    }
}
