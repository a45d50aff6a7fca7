use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Locations of the static tables. Relative file names resolve against `dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_dir")]
    pub dir: String,
    #[serde(default = "default_tags")]
    pub tags: String,
    #[serde(default = "default_cmudict")]
    pub cmudict: String,
    #[serde(default = "default_templates")]
    pub templates: String,
    #[serde(default = "default_embeddings")]
    pub embeddings: String,
    #[serde(default = "default_definitions")]
    pub definitions: String,
    #[serde(default = "default_first_lines")]
    pub first_lines: String,
}

fn default_dir() -> String {
    "~/.limericks/data".into()
}

fn default_tags() -> String {
    "tags.json".into()
}

fn default_cmudict() -> String {
    "cmudict-0.7b.txt".into()
}

fn default_templates() -> String {
    "templates.json".into()
}

fn default_embeddings() -> String {
    "embeddings.txt".into()
}

fn default_definitions() -> String {
    "definitions.json".into()
}

fn default_first_lines() -> String {
    "first_lines.json".into()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            tags: default_tags(),
            cmudict: default_cmudict(),
            templates: default_templates(),
            embeddings: default_embeddings(),
            definitions: default_definitions(),
            first_lines: default_first_lines(),
        }
    }
}

impl DataConfig {
    /// `~`-expanded path of `file`, joined onto `dir` unless absolute.
    pub fn resolve(&self, file: &str) -> PathBuf {
        let file = PathBuf::from(shellexpand::tilde(file).as_ref());
        if file.is_absolute() {
            return file;
        }
        PathBuf::from(shellexpand::tilde(&self.dir).as_ref()).join(file)
    }
}
