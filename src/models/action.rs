use crate::error::StructuralError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// `<prefix>"<bone>"<suffix>` with no other quote anywhere in the path
static DATA_PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?P<prefix>[^"]*)"(?P<bone>[^"]*)"(?P<suffix>[^"]*)$"#)
        .expect("Invalid data path regex")
});

/// A curve data path decoded into its three parts.
///
/// `pose.bones["Hand_L"].location` decodes to prefix `pose.bones[`, bone `Hand_L`
/// and suffix `].location`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPath<'a> {
    pub prefix: &'a str,
    pub bone: &'a str,
    pub suffix: &'a str,
}

impl<'a> DataPath<'a> {
    /// Decode a data path, failing unless it has exactly one quoted bone name
    pub fn parse(path: &'a str) -> Result<Self, StructuralError> {
        let caps = DATA_PATH_PATTERN
            .captures(path)
            .ok_or_else(|| StructuralError::MalformedDataPath {
                path: path.to_string(),
                parts: path.matches('"').count() + 1,
            })?;

        // All three groups are mandatory in the pattern
        let group = |name: &str| caps.name(name).map_or("", |m| m.as_str());
        Ok(Self {
            prefix: group("prefix"),
            bone: group("bone"),
            suffix: group("suffix"),
        })
    }

    /// Re-encode the path with a different bone name
    pub fn with_bone(&self, bone: &str) -> String {
        format!("{}\"{}\"{}", self.prefix, bone, self.suffix)
    }
}

impl fmt::Display for DataPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\"{}\"{}", self.prefix, self.bone, self.suffix)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: f32,
    pub value: f32,
}

/// One animated channel of an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FCurve {
    pub data_path: String,
    #[serde(default)]
    pub array_index: u32,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

impl FCurve {
    pub fn new(data_path: impl Into<String>, array_index: u32) -> Self {
        Self {
            data_path: data_path.into(),
            array_index,
            keyframes: Vec::new(),
        }
    }

    pub fn with_keyframes(mut self, keyframes: Vec<Keyframe>) -> Self {
        self.keyframes = keyframes;
        self
    }

    pub fn decode_path(&self) -> Result<DataPath<'_>, StructuralError> {
        DataPath::parse(&self.data_path)
    }
}

/// A named set of curves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub curves: Vec<FCurve>,
}

impl Action {
    pub fn new(name: impl Into<String>, curves: Vec<FCurve>) -> Self {
        Self {
            name: name.into(),
            curves,
        }
    }

    /// Copy this action under a new name; the original is never modified by a transfer
    pub fn duplicate(&self, new_name: impl Into<String>) -> Self {
        Self {
            name: new_name.into(),
            curves: self.curves.clone(),
        }
    }
}
