use crate::error::StructuralError;
use std::fmt;

/// Which half of a mapping entry a check or lookup refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Target => write!(f, "target"),
        }
    }
}

/// One source bone and the target bone it is renamed to.
///
/// The source is never empty. An empty target means the bone is unresolved and
/// curves animating it are dropped on transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoneMapEntry {
    source: String,
    target: String,
}

impl BoneMapEntry {
    /// Create an unresolved entry for `source`
    pub fn new(source: impl Into<String>) -> Result<Self, StructuralError> {
        Self::with_target(source, String::new())
    }

    pub fn with_target(
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<Self, StructuralError> {
        let source = source.into();
        if source.is_empty() {
            return Err(StructuralError::EmptySource);
        }
        Ok(Self {
            source,
            target: target.into(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn set_target(&mut self, target: impl Into<String>) {
        self.target = target.into();
    }

    /// The target name, or `None` while the entry is unresolved
    pub fn resolved_target(&self) -> Option<&str> {
        if self.target.is_empty() {
            None
        } else {
            Some(&self.target)
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.target.is_empty()
    }

    /// The name on the given side of the entry
    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::Source => &self.source,
            Side::Target => &self.target,
        }
    }
}

/// Ordered source to target bone correspondence plus the naming prefixes of both
/// skeletons.
///
/// Source names are unique: [`add_or_get`](Self::add_or_get) reuses an existing entry
/// and [`push_source`](Self::push_source) rejects a repeated name. Entry order is
/// significant and survives a save/load round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingConfig {
    entries: Vec<BoneMapEntry>,
    pub prefix_src: String,
    pub prefix_tgt: String,
}

impl MappingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefixes(prefix_src: impl Into<String>, prefix_tgt: impl Into<String>) -> Self {
        Self {
            entries: Vec::new(),
            prefix_src: prefix_src.into(),
            prefix_tgt: prefix_tgt.into(),
        }
    }

    /// Build a mapping from ordered `(source, target)` pairs, rejecting empty or
    /// repeated sources
    pub fn from_pairs<I, S, T>(
        prefix_src: impl Into<String>,
        prefix_tgt: impl Into<String>,
        pairs: I,
    ) -> Result<Self, StructuralError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut config = Self::with_prefixes(prefix_src, prefix_tgt);
        for (source, target) in pairs {
            let entry = BoneMapEntry::with_target(source, target)?;
            if config.find(entry.source()).is_some() {
                return Err(StructuralError::DuplicateSource(entry.source));
            }
            config.entries.push(entry);
        }
        Ok(config)
    }

    pub fn entries(&self) -> &[BoneMapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, source: &str) -> Option<&BoneMapEntry> {
        self.entries.iter().find(|e| e.source == source)
    }

    pub fn find_mut(&mut self, source: &str) -> Option<&mut BoneMapEntry> {
        self.entries.iter_mut().find(|e| e.source == source)
    }

    /// Return the entry for `source`, appending an unresolved one if none exists
    pub fn add_or_get(&mut self, source: &str) -> Result<&mut BoneMapEntry, StructuralError> {
        match self.entries.iter().position(|e| e.source == source) {
            Some(idx) => Ok(&mut self.entries[idx]),
            None => {
                self.entries.push(BoneMapEntry::new(source)?);
                let last = self.entries.len() - 1;
                Ok(&mut self.entries[last])
            }
        }
    }

    /// Append an unresolved entry for `source`; a repeated name is an error
    pub fn push_source(&mut self, source: &str) -> Result<(), StructuralError> {
        if self.find(source).is_some() {
            return Err(StructuralError::DuplicateSource(source.to_string()));
        }
        self.entries.push(BoneMapEntry::new(source)?);
        Ok(())
    }

    /// Manual edit of an existing entry's target
    pub fn set_target(&mut self, source: &str, target: &str) -> Result<(), StructuralError> {
        let entry = self
            .find_mut(source)
            .ok_or_else(|| StructuralError::UnknownSource(source.to_string()))?;
        entry.set_target(target);
        Ok(())
    }

    /// Resolved target for `source`, `None` if missing or unresolved
    pub fn target_of(&self, source: &str) -> Option<&str> {
        self.find(source).and_then(BoneMapEntry::resolved_target)
    }

    /// Non-empty names on one side, in entry order
    pub fn names(&self, side: Side) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .map(move |e| e.name(side))
            .filter(|name| !name.is_empty())
    }

    pub fn resolved_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_resolved()).count()
    }

    /// True when every entry has a target (and there is at least one entry)
    pub fn is_complete(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(BoneMapEntry::is_resolved)
    }

    /// Remove all entries. Prefixes are user input and are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Swap in another mapping wholesale
    pub fn replace_with(&mut self, other: MappingConfig) {
        *self = other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_rejects_empty_source() {
        assert_eq!(BoneMapEntry::new(""), Err(StructuralError::EmptySource));
        assert!(BoneMapEntry::new("Hips").is_ok());
    }

    #[test]
    fn test_add_or_get_reuses_existing_entry() {
        let mut config = MappingConfig::new();
        config.add_or_get("Hips").unwrap().set_target("pelvis");
        config.add_or_get("Spine").unwrap();

        let entry = config.add_or_get("Hips").unwrap();
        assert_eq!(entry.target(), "pelvis");
        assert_eq!(config.len(), 2);
        assert_eq!(config.entries()[0].source(), "Hips");
        assert_eq!(config.entries()[1].source(), "Spine");
    }

    #[test]
    fn test_push_source_rejects_duplicate() {
        let mut config = MappingConfig::new();
        config.push_source("Hips").unwrap();
        assert_eq!(
            config.push_source("Hips"),
            Err(StructuralError::DuplicateSource("Hips".to_string()))
        );
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn test_from_pairs_keeps_order_and_rejects_duplicates() {
        let config =
            MappingConfig::from_pairs("a_", "b_", [("Z", "z"), ("A", ""), ("M", "m")]).unwrap();
        let sources: Vec<_> = config.entries().iter().map(|e| e.source()).collect();
        assert_eq!(sources, vec!["Z", "A", "M"]);
        assert_eq!(config.prefix_src, "a_");

        let dup = MappingConfig::from_pairs("", "", [("A", "x"), ("A", "y")]);
        assert_eq!(dup, Err(StructuralError::DuplicateSource("A".to_string())));
    }

    #[test]
    fn test_names_skip_empty_targets() {
        let config = MappingConfig::from_pairs("", "", [("A", "a"), ("B", ""), ("C", "c")]).unwrap();
        assert_eq!(config.names(Side::Target).collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(config.names(Side::Source).count(), 3);
        assert_eq!(config.resolved_count(), 2);
        assert!(!config.is_complete());
        assert_eq!(config.target_of("B"), None);
        assert_eq!(config.target_of("C"), Some("c"));
    }

    #[test]
    fn test_set_target_requires_existing_entry() {
        let mut config = MappingConfig::new();
        assert_eq!(
            config.set_target("Hips", "pelvis"),
            Err(StructuralError::UnknownSource("Hips".to_string()))
        );
        config.push_source("Hips").unwrap();
        config.set_target("Hips", "pelvis").unwrap();
        assert!(config.is_complete());
    }

    #[test]
    fn test_clear_keeps_prefixes() {
        let mut config = MappingConfig::from_pairs("src_", "tgt_", [("A", "a")]).unwrap();
        config.clear();
        assert!(config.is_empty());
        assert_eq!(config.prefix_src, "src_");
        assert_eq!(config.prefix_tgt, "tgt_");
    }
}
