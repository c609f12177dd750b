//! Reading and writing mapping documents.
//!
//! A document has exactly three fields:
//!
//! ```yaml
//! prefix_src: "mixamorig:"
//! prefix_tgt: ""
//! bones:
//!   mixamorig:Hips: pelvis
//!   mixamorig:Spine: spine_01
//!   mixamorig:Tail: ""
//! ```
//!
//! `bones` keeps entry order, and unresolved entries are written with an empty
//! target. YAML is the default; JSON is used for `.json` paths.

use crate::error::PersistenceError;
use crate::models::{MappingConfig, MappingFormat};
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;

/// On-disk shape of a [`MappingConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingDocument {
    pub prefix_src: String,
    pub prefix_tgt: String,
    #[serde(deserialize_with = "unique_bones")]
    pub bones: IndexMap<String, String>,
}

/// Deserialize `bones`, rejecting a repeated source key instead of keeping the last one
fn unique_bones<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct BonesVisitor;

    impl<'de> Visitor<'de> for BonesVisitor {
        type Value = IndexMap<String, String>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of source bone names to target bone names")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut bones = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((source, target)) = access.next_entry::<String, String>()? {
                if bones.contains_key(&source) {
                    return Err(de::Error::custom(format!(
                        "duplicate source bone '{}'",
                        source
                    )));
                }
                bones.insert(source, target);
            }
            Ok(bones)
        }
    }

    deserializer.deserialize_map(BonesVisitor)
}

/// Convert a mapping into its document form
pub fn save(config: &MappingConfig) -> MappingDocument {
    MappingDocument {
        prefix_src: config.prefix_src.clone(),
        prefix_tgt: config.prefix_tgt.clone(),
        bones: config
            .entries()
            .iter()
            .map(|e| (e.source().to_string(), e.target().to_string()))
            .collect(),
    }
}

/// Build a mapping from a document, in document order
pub fn load(document: MappingDocument, origin: &str) -> Result<MappingConfig, PersistenceError> {
    MappingConfig::from_pairs(document.prefix_src, document.prefix_tgt, document.bones).map_err(
        |e| PersistenceError::Malformed {
            origin: origin.to_string(),
            message: e.to_string(),
        },
    )
}

pub fn to_string(config: &MappingConfig, format: MappingFormat) -> Result<String, PersistenceError> {
    let document = save(config);
    match format {
        MappingFormat::Yaml => serde_yaml_ng::to_string(&document)
            .map_err(|e| PersistenceError::Serialize(e.to_string())),
        MappingFormat::Json => serde_json::to_string_pretty(&document)
            .map_err(|e| PersistenceError::Serialize(e.to_string())),
    }
}

/// Parse document text. `origin` names the source in error messages.
pub fn from_str(
    text: &str,
    format: MappingFormat,
    origin: &str,
) -> Result<MappingConfig, PersistenceError> {
    let malformed = |message: String| PersistenceError::Malformed {
        origin: origin.to_string(),
        message,
    };
    let document: MappingDocument = match format {
        MappingFormat::Yaml => serde_yaml_ng::from_str(text).map_err(|e| malformed(e.to_string()))?,
        MappingFormat::Json => serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?,
    };
    load(document, origin)
}

/// Write `config` to `path`. The format follows the extension, else `fallback`.
pub fn save_to_path(
    config: &MappingConfig,
    path: &Utf8Path,
    fallback: MappingFormat,
) -> Result<(), PersistenceError> {
    let format = fallback.for_extension(path.extension());
    let text = to_string(config, format)?;
    fs::write(path, text).map_err(|source| PersistenceError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Saved mapping with {} entries to {}", config.len(), path);
    Ok(())
}

/// Replace `config` with the mapping stored at `path`.
///
/// `config` is only modified once the whole document has been read and parsed.
pub fn load_from_path(
    config: &mut MappingConfig,
    path: &Utf8Path,
    fallback: MappingFormat,
) -> Result<(), PersistenceError> {
    let bytes = fs::read(path).map_err(|source| PersistenceError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    // The file exists from here on, so bad contents are malformed rather than missing
    let text = String::from_utf8(bytes).map_err(|e| PersistenceError::Malformed {
        origin: path.to_string(),
        message: e.to_string(),
    })?;

    let format = fallback.for_extension(path.extension());
    let loaded = from_str(&text, format, path.as_str())?;

    config.clear();
    config.replace_with(loaded);

    tracing::info!("Loaded mapping with {} entries from {}", config.len(), path);
    Ok(())
}
