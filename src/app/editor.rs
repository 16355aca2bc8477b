use leptos::prelude::*;

#[cfg(feature = "hydrate")]
use codee::string::JsonSerdeWasmCodec;
#[cfg(feature = "hydrate")]
use leptos_use::storage::use_local_storage;

use crate::settings::{
    BackgroundSettings, SectionSettings, StorageKeys, StoredBackground, StoredSettings,
};

/// Page-wide edit mode toggle.
#[derive(Debug, Clone, Copy)]
pub struct InlineEditor {
    pub edit_mode: RwSignal<bool>,
}

impl InlineEditor {
    pub fn toggle(&self) {
        self.edit_mode.update(|mode| *mode = !*mode);
    }
}

pub fn provide_inline_editor() {
    provide_context(InlineEditor {
        edit_mode: RwSignal::new(false),
    });
}

pub fn use_inline_editor() -> InlineEditor {
    expect_context::<InlineEditor>()
}

/// Persisted title, subtitle and background of one page section.
#[derive(Clone, Copy)]
pub struct EditableSection {
    pub settings: Signal<SectionSettings>,
    set_stored: WriteSignal<StoredSettings>,
    set_background: WriteSignal<Option<StoredBackground>>,
}

impl EditableSection {
    pub fn set_title(&self, title: String) {
        self.set_stored.update(|s| s.title = Some(title));
    }

    pub fn set_subtitle(&self, subtitle: String) {
        self.set_stored.update(|s| s.subtitle = Some(subtitle));
    }

    /// Writes the background to both its own key and the settings copy.
    pub fn set_background(&self, background: &BackgroundSettings) {
        let stored = StoredBackground::from(background);
        self.set_stored
            .update(|s| s.background = Some(stored.clone()));
        self.set_background.set(Some(stored));
    }

    pub fn update_background(&self, f: impl FnOnce(&mut BackgroundSettings)) {
        let mut background = self.settings.get_untracked().background;
        f(&mut background);
        self.set_background(&background);
    }

    pub fn title(&self) -> Signal<String> {
        let settings = self.settings;
        Signal::derive(move || settings.get().title)
    }

    pub fn subtitle(&self) -> Signal<String> {
        let settings = self.settings;
        Signal::derive(move || settings.get().subtitle)
    }
}

pub fn use_section_settings(keys: StorageKeys, defaults: SectionSettings) -> EditableSection {
    #[cfg(feature = "hydrate")]
    let (stored, set_stored, _) =
        use_local_storage::<StoredSettings, JsonSerdeWasmCodec>(keys.settings);
    #[cfg(feature = "hydrate")]
    let (background, set_background, _) =
        use_local_storage::<Option<StoredBackground>, JsonSerdeWasmCodec>(keys.background);

    // nothing to read from on the server
    #[cfg(not(feature = "hydrate"))]
    let (stored, set_stored) = {
        let _ = keys;
        signal(StoredSettings::default())
    };
    #[cfg(not(feature = "hydrate"))]
    let (background, set_background) = signal(None::<StoredBackground>);

    let settings = Signal::derive(move || {
        let background = background.get();
        stored.with(|s| s.resolve(&defaults, background.as_ref()))
    });

    EditableSection {
        settings,
        set_stored,
        set_background,
    }
}
