use leptos::prelude::*;
use leptos_router::components::A;

use super::editor::use_inline_editor;

const NAV_LINKS: [(&str, &str); 3] = [
    ("#about", "About"),
    ("#projects", "Projects"),
    ("#contact", "Contact"),
];

#[component]
pub fn Header() -> impl IntoView {
    let editor = use_inline_editor();

    view! {
        <header class="sticky top-0 z-40 shadow-lg bg-background/90 backdrop-blur-sm">
            <div class="mx-auto max-w-6xl px-4 sm:px-6 lg:px-8 py-4 flex flex-wrap items-center justify-between gap-4">
                <A href="/" attr:class="text-2xl font-bold">
                    <span class="text-green">"➜"</span>
                    " "
                    <span class="text-cyan">"portfolio"</span>
                </A>
                <nav class="flex items-center gap-6">
                    {NAV_LINKS
                        .into_iter()
                        .map(|(href, label)| {
                            view! {
                                <a href=href class="hover:text-cyan transition-colors duration-200">
                                    {label}
                                </a>
                            }
                        })
                        .collect_view()}
                    <button
                        class=move || {
                            if editor.edit_mode.get() {
                                "px-3 py-1 rounded-md border border-yellow text-yellow bg-yellow/10"
                            } else {
                                "px-3 py-1 rounded-md border border-muted/40 hover:border-cyan"
                            }
                        }
                        aria-pressed=move || editor.edit_mode.get().to_string()
                        on:click=move |_| editor.toggle()
                    >
                        {move || if editor.edit_mode.get() { "Done editing" } else { "Edit page" }}
                    </button>
                </nav>
            </div>
        </header>
    }
}
