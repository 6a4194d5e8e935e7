use std::path::Path;

use crate::error::{read_to_string, VaultError};

/// One gallery item as supplied by the host. Order determines ring placement.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceItem {
    /// Image resource reference (path or URL), resolved by the host
    pub image: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

impl SourceItem {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            label: None,
            audio: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_audio(mut self, audio: impl Into<String>) -> Self {
        self.audio = Some(audio.into());
        self
    }
}

/// Parse a JSON array of source items.
pub fn manifest_from_json_str(json: &str) -> Result<Vec<SourceItem>, VaultError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_manifest(path: impl AsRef<Path>) -> Result<Vec<SourceItem>, VaultError> {
    manifest_from_json_str(&read_to_string(path.as_ref())?)
}

/// Built-in gallery used when no manifest is configured.
pub fn demo_manifest() -> Vec<SourceItem> {
    const NAMES: [&str; 8] = [
        "DOGE", "PEPE", "NYAN", "TROLLFACE", "STONKS", "HARAMBE", "RICKROLL", "",
    ];
    NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let item = SourceItem::new(format!("memes/{i}.png")).with_label(*name);
            // Every third card stays silent.
            if i % 3 == 2 {
                item
            } else {
                item.with_audio(format!("sounds/{i}.ogg"))
            }
        })
        .collect()
}

/// Load the manifest named by `VAULT_MANIFEST`, or the demo gallery when unset.
pub fn manifest_from_env() -> Result<Vec<SourceItem>, VaultError> {
    match std::env::var_os("VAULT_MANIFEST") {
        Some(path) => {
            tracing::info!("Loading vault manifest from {:?}", path);
            load_manifest(path)
        }
        None => Ok(demo_manifest()),
    }
}
