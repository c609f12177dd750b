use crate::models::{Action, ActionSlot, Skeleton};
use anyhow::{Context, Result, anyhow};
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct BoneDocument {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ArmatureDocument {
    bones: Vec<BoneDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    active_action: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SceneDocument {
    #[serde(default)]
    armatures: IndexMap<String, ArmatureDocument>,
    #[serde(default)]
    actions: Vec<Action>,
}

/// Armatures and actions read from a scene file.
///
/// This is the stand-in for a host application's data: the CLI loads a scene,
/// runs session operations against it and writes it back.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub armatures: IndexMap<String, Skeleton>,
    pub actions: IndexMap<String, Action>,
}

impl Scene {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let doc: SceneDocument =
            serde_yaml_ng::from_str(text).context("Failed to parse scene YAML")?;

        let mut armatures = IndexMap::new();
        for (name, armature) in doc.armatures {
            let mut skeleton = Skeleton::from_named_bones(
                name.clone(),
                armature
                    .bones
                    .iter()
                    .map(|b| (b.name.as_str(), b.parent.as_deref())),
            )
            .with_context(|| format!("Invalid armature '{}'", name))?;
            if let Some(duplicate) = skeleton.first_duplicate_name() {
                tracing::warn!(
                    "Armature '{}' has more than one bone named '{}'; it cannot be collected",
                    name,
                    duplicate
                );
            }
            if let Some(action) = &armature.active_action {
                skeleton.set_active_action(action);
            }
            armatures.insert(name, skeleton);
        }

        let actions = doc
            .actions
            .into_iter()
            .map(|action| (action.name.clone(), action))
            .collect();

        Ok(Self { armatures, actions })
    }

    pub fn to_yaml(&self) -> Result<String> {
        let armatures = self
            .armatures
            .iter()
            .map(|(name, skeleton)| {
                let bones = skeleton
                    .named_bones()
                    .map(|(bone, parent)| BoneDocument {
                        name: bone.to_string(),
                        parent: parent.map(str::to_string),
                    })
                    .collect();
                let doc = ArmatureDocument {
                    bones,
                    active_action: skeleton.active_action(),
                };
                (name.clone(), doc)
            })
            .collect();

        let doc = SceneDocument {
            armatures,
            actions: self.actions.values().cloned().collect(),
        };
        serde_yaml_ng::to_string(&doc).context("Failed to serialize scene to YAML")
    }

    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file: {}", path))?;
        let scene = Self::from_yaml(&text)
            .with_context(|| format!("Failed to load scene: {}", path))?;
        tracing::info!(
            "Loaded scene from {} ({} armatures, {} actions)",
            path,
            scene.armatures.len(),
            scene.actions.len()
        );
        Ok(scene)
    }

    pub fn save(&self, path: &Utf8Path) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path, yaml).with_context(|| format!("Failed to write scene file: {}", path))?;
        tracing::info!("Saved scene to {}", path);
        Ok(())
    }

    pub fn skeleton(&self, name: &str) -> Result<&Skeleton> {
        self.armatures
            .get(name)
            .ok_or_else(|| anyhow!("Armature '{}' not found in scene", name))
    }

    pub fn skeleton_mut(&mut self, name: &str) -> Result<&mut Skeleton> {
        self.armatures
            .get_mut(name)
            .ok_or_else(|| anyhow!("Armature '{}' not found in scene", name))
    }

    pub fn action(&self, name: &str) -> Result<&Action> {
        self.actions
            .get(name)
            .ok_or_else(|| anyhow!("Action '{}' not found in scene", name))
    }

    /// Add an action, replacing any action with the same name
    pub fn insert_action(&mut self, action: Action) {
        self.actions.insert(action.name.clone(), action);
    }
}
