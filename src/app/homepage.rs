use leptos::prelude::*;
use leptos_meta::Title;

use crate::settings::{SectionSettings, ABOUT_KEYS, HERO_KEYS};

use super::editable::{EditableBackground, EditableText};
use super::editor::use_section_settings;
use super::projects_slider::ProjectsSlider;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <Title text="Home" />
        <Hero />
        <About />
        <ProjectsSlider />
        <Contact />
    }
}

#[component]
fn Hero() -> impl IntoView {
    let section = use_section_settings(
        HERO_KEYS,
        SectionSettings::new("Designer & Developer", "I build fast, friendly things for the web."),
    );
    view! {
        <section id="hero" class="w-full">
            <EditableBackground section>
                <div class="min-h-[60vh] flex flex-col justify-center items-center text-center px-4 py-24">
                    <h1 class="text-4xl lg:text-6xl font-bold mb-6">
                        <EditableText
                            value=section.title()
                            on_change=move |title: String| section.set_title(title)
                        />
                    </h1>
                    <p class="text-lg lg:text-xl max-w-2xl text-muted">
                        <EditableText
                            value=section.subtitle()
                            on_change=move |subtitle: String| section.set_subtitle(subtitle)
                            multiline=true
                        />
                    </p>
                    <a
                        href="#projects"
                        class="mt-10 px-6 py-3 rounded-md border border-cyan/30 bg-cyan/20 hover:bg-cyan/30 text-cyan font-medium transition-all duration-200"
                    >
                        "See my work"
                    </a>
                </div>
            </EditableBackground>
        </section>
    }
}

#[component]
fn About() -> impl IntoView {
    let section = use_section_settings(
        ABOUT_KEYS,
        SectionSettings::new(
            "About",
            "Product-minded engineer working across design, frontend and backend.",
        ),
    );
    view! {
        <section id="about" class="w-full">
            <EditableBackground section>
                <div class="max-w-4xl mx-auto px-4 py-16 section-content">
                    <h2 class="text-3xl font-bold text-center mb-2">
                        <EditableText
                            value=section.title()
                            on_change=move |title: String| section.set_title(title)
                        />
                    </h2>
                    <p class="text-center text-muted mb-8">
                        <EditableText
                            value=section.subtitle()
                            on_change=move |subtitle: String| section.set_subtitle(subtitle)
                            multiline=true
                        />
                    </p>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-8">
                        <p class="text-base leading-relaxed">
                            "I like small teams, short feedback loops and shipping things people actually use. "
                            "Most of my work lives somewhere between a design file and a production server."
                        </p>
                        <div class="bg-brightBlack/30 p-4 rounded-md border-l-4 border-purple">
                            <p class="text-sm font-medium text-green mb-2">"What I do:"</p>
                            <ul class="text-sm space-y-1">
                                <li>"Brand and marketing sites"</li>
                                <li>"Web applications and dashboards"</li>
                                <li>"Design systems and component libraries"</li>
                                <li>"Content pipelines backed by headless CMSs"</li>
                            </ul>
                        </div>
                    </div>
                </div>
            </EditableBackground>
        </section>
    }
}

#[component]
fn Contact() -> impl IntoView {
    view! {
        <section id="contact" class="flex justify-center items-center w-full px-4 py-16 section-content">
            <div class="w-full max-w-2xl text-center">
                <h2 class="text-3xl font-bold mb-8">"Let's Connect"</h2>
                <div class="bg-brightBlack/30 p-6 rounded-lg border border-muted/30">
                    <p class="text-lg mb-4 text-cyan font-medium">
                        "Have a project in mind?"
                    </p>
                    <p class="mb-6">
                        "Whether it's a new site, a redesign or a second pair of eyes on your frontend, I'd love to hear from you."
                    </p>
                    <div class="flex flex-col sm:flex-row items-center justify-center gap-4">
                        <a
                            href="mailto:hello@example.com"
                            class="bg-cyan/20 hover:bg-cyan/30 text-cyan px-6 py-3 rounded-md font-medium transition-all duration-200 border border-cyan/30"
                        >
                            "📧 hello@example.com"
                        </a>
                        <div class="flex gap-3">
                            <a
                                href="https://github.com/"
                                target="_blank"
                                rel="noopener noreferrer"
                                class="text-white hover:text-brightWhite text-2xl"
                                aria-label="GitHub Profile"
                            >
                                <i class="devicon-github-plain"></i>
                            </a>
                            <a
                                href="https://linkedin.com/"
                                target="_blank"
                                rel="noopener noreferrer"
                                class="text-blue hover:text-brightBlue text-2xl"
                                aria-label="LinkedIn Profile"
                            >
                                <i class="devicon-linkedin-plain"></i>
                            </a>
                        </div>
                    </div>
                </div>
            </div>
        </section>
    }
}
