use serde::{Deserialize, Serialize};

/// Document format used for mapping files without a recognised extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingFormat {
    #[default]
    Yaml,
    Json,
}

impl MappingFormat {
    /// Pick the format from a file extension, falling back to `self`
    pub fn for_extension(self, extension: Option<&str>) -> Self {
        match extension.map(str::to_ascii_lowercase).as_deref() {
            Some("json") => MappingFormat::Json,
            Some("yaml") | Some("yml") => MappingFormat::Yaml,
            _ => self,
        }
    }
}

/// Tool settings from `Action Transfer.yaml` and `ACTION_TRANSFER_*` variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Prefix stripped from source bone names before landmark detection
    pub prefix_src: String,

    /// Prefix stripped from target bone names before landmark detection
    pub prefix_tgt: String,

    pub mapping_format: MappingFormat,

    pub log_dir: String,

    pub debug_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix_src: String::new(),
            prefix_tgt: String::new(),
            mapping_format: MappingFormat::Yaml,
            log_dir: "logs".to_string(),
            debug_mode: false,
        }
    }
}
