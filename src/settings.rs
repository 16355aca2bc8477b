use serde::{Deserialize, Serialize};

/// Local storage keys for one editable section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageKeys {
    pub settings: &'static str,
    pub background: &'static str,
}

pub const HERO_KEYS: StorageKeys = StorageKeys {
    settings: "hero_settings",
    background: "hero_background",
};
pub const ABOUT_KEYS: StorageKeys = StorageKeys {
    settings: "about_settings",
    background: "about_background",
};
pub const PROJECTS_KEYS: StorageKeys = StorageKeys {
    settings: "projects_settings",
    background: "projects_background",
};

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundSettings {
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub color: String,
    pub opacity: f64,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            image_url: None,
            video_url: None,
            color: "#0f172a".to_string(),
            opacity: 0.6,
        }
    }
}

impl BackgroundSettings {
    pub fn color_layer_style(&self) -> String {
        format!("background-color: {}; opacity: {};", self.color, self.opacity)
    }

    pub fn image_style(&self) -> Option<String> {
        self.image_url
            .as_ref()
            .map(|url| format!("background-image: url('{url}'); background-size: cover; background-position: center;"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionSettings {
    pub title: String,
    pub subtitle: String,
    pub background: BackgroundSettings,
}

impl SectionSettings {
    pub fn new(title: &str, subtitle: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            background: BackgroundSettings::default(),
        }
    }
}

/// Background as persisted. Every field is optional so older or partial
/// entries still decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredBackground {
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub color: Option<String>,
    pub opacity: Option<f64>,
}

impl StoredBackground {
    fn resolve(&self, defaults: &BackgroundSettings) -> BackgroundSettings {
        BackgroundSettings {
            image_url: non_empty(&self.image_url).or_else(|| defaults.image_url.clone()),
            video_url: non_empty(&self.video_url).or_else(|| defaults.video_url.clone()),
            color: non_empty(&self.color).unwrap_or_else(|| defaults.color.clone()),
            opacity: self
                .opacity
                .filter(|o| o.is_finite())
                .unwrap_or(defaults.opacity)
                .clamp(0.0, 1.0),
        }
    }
}

impl From<&BackgroundSettings> for StoredBackground {
    fn from(bg: &BackgroundSettings) -> Self {
        Self {
            image_url: bg.image_url.clone(),
            video_url: bg.video_url.clone(),
            color: Some(bg.color.clone()),
            opacity: Some(bg.opacity.clamp(0.0, 1.0)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredSettings {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub background: Option<StoredBackground>,
}

impl StoredSettings {
    /// Merges what was saved over the section defaults. The dedicated
    /// background entry wins over the copy embedded in the settings entry.
    pub fn resolve(
        &self,
        defaults: &SectionSettings,
        background: Option<&StoredBackground>,
    ) -> SectionSettings {
        let background = background
            .or(self.background.as_ref())
            .map(|bg| bg.resolve(&defaults.background))
            .unwrap_or_else(|| defaults.background.clone());
        SectionSettings {
            title: self.title.clone().unwrap_or_else(|| defaults.title.clone()),
            subtitle: self
                .subtitle
                .clone()
                .unwrap_or_else(|| defaults.subtitle.clone()),
            background,
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}
