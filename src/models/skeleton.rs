use crate::error::StructuralError;
use std::fmt;

/// Index of a bone inside one skeleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub usize);

impl fmt::Display for BoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only view of one skeleton's bone tree.
///
/// Ids are dense: every id in `0..bone_count()` is valid. An id outside that
/// range panics, as slice indexing does.
pub trait BoneGraph {
    /// Display name of the skeleton, used in error messages
    fn graph_name(&self) -> &str;

    fn bone_count(&self) -> usize;

    fn bone_name(&self, id: BoneId) -> &str;

    fn parent(&self, id: BoneId) -> Option<BoneId>;

    fn bone_ids(&self) -> impl Iterator<Item = BoneId> {
        (0..self.bone_count()).map(BoneId)
    }

    /// True if `ancestor` is a strict ancestor of `bone`
    fn is_ancestor(&self, ancestor: BoneId, bone: BoneId) -> bool {
        let mut current = self.parent(bone);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn find_bone(&self, name: &str) -> Option<BoneId> {
        self.bone_ids().find(|&id| self.bone_name(id) == name)
    }

    fn contains_bone(&self, name: &str) -> bool {
        self.find_bone(name).is_some()
    }
}

/// The active-action reference of a skeleton object
#[cfg_attr(test, mockall::automock)]
pub trait ActionSlot {
    fn active_action(&self) -> Option<String>;

    fn set_active_action(&mut self, action: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Bone {
    name: String,
    parent: Option<BoneId>,
}

/// Arena-backed bone tree.
///
/// A bone can only be parented to a bone added before it, so the tree never
/// contains cycles. Names are not required to be unique here; collection rejects
/// repeated names when it builds a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    name: String,
    bones: Vec<Bone>,
    active_action: Option<String>,
}

impl Skeleton {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bones: Vec::new(),
            active_action: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a bone under `parent` (or as a root) and return its id.
    ///
    /// `parent` must be an id previously returned by this skeleton.
    pub fn add_bone(
        &mut self,
        name: impl Into<String>,
        parent: Option<BoneId>,
    ) -> Result<BoneId, StructuralError> {
        let name = name.into();
        if let Some(p) = parent.filter(|p| p.0 >= self.bones.len()) {
            return Err(StructuralError::UnknownParentId { bone: name, parent: p });
        }
        self.bones.push(Bone { name, parent });
        Ok(BoneId(self.bones.len() - 1))
    }

    /// Build from `(name, parent name)` pairs where parents are listed before
    /// their children. A parent name resolves to the first bone with that name.
    pub fn from_named_bones<'p, I, S>(
        name: impl Into<String>,
        bones: I,
    ) -> Result<Self, StructuralError>
    where
        I: IntoIterator<Item = (S, Option<&'p str>)>,
        S: Into<String>,
    {
        let mut skeleton = Self::new(name);
        for (bone, parent) in bones {
            let bone: String = bone.into();
            let parent_id = match parent {
                Some(parent) => Some(skeleton.find_bone(parent).ok_or_else(|| {
                    StructuralError::UnknownParent {
                        bone: bone.clone(),
                        parent: parent.to_string(),
                    }
                })?),
                None => None,
            };
            skeleton.add_bone(bone, parent_id)?;
        }
        Ok(skeleton)
    }

    /// `(name, parent name)` pairs in bone order
    pub fn named_bones(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.bones.iter().map(|bone| {
            (
                bone.name.as_str(),
                bone.parent.map(|p| self.bones[p.0].name.as_str()),
            )
        })
    }

    /// First name that occurs more than once, if any
    pub fn first_duplicate_name(&self) -> Option<&str> {
        self.bones.iter().enumerate().find_map(|(idx, bone)| {
            self.bones[..idx]
                .iter()
                .any(|earlier| earlier.name == bone.name)
                .then_some(bone.name.as_str())
        })
    }
}

impl BoneGraph for Skeleton {
    fn graph_name(&self) -> &str {
        &self.name
    }

    fn bone_count(&self) -> usize {
        self.bones.len()
    }

    fn bone_name(&self, id: BoneId) -> &str {
        &self.bones[id.0].name
    }

    fn parent(&self, id: BoneId) -> Option<BoneId> {
        self.bones[id.0].parent
    }
}

impl ActionSlot for Skeleton {
    fn active_action(&self) -> Option<String> {
        self.active_action.clone()
    }

    fn set_active_action(&mut self, action: &str) {
        self.active_action = Some(action.to_string());
    }
}
