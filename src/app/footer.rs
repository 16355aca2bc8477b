use chrono::DateTime;
use leptos::prelude::*;

const BUILD_TIME: &str = env!("BUILD_TIME");

#[component]
pub fn Footer() -> impl IntoView {
    // derived from the build so server and client render the same text
    let built = DateTime::parse_from_rfc3339(BUILD_TIME).ok();
    let year = built
        .map(|d| d.format("%Y").to_string())
        .unwrap_or_default();
    let updated = built
        .map(|d| d.format("%b %e, %Y").to_string())
        .unwrap_or_default();

    view! {
        <footer class="w-full border-t border-muted/30 mt-8">
            <div class="max-w-6xl mx-auto px-4 py-6 flex flex-col sm:flex-row justify-between gap-2 text-sm text-muted">
                <span>"© " {year} " Portfolio. All rights reserved."</span>
                <span>"Last updated " {updated}</span>
            </div>
        </footer>
    }
}
