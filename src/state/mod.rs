// Session state
//
// A Session owns the MappingConfig of one mapping session and exposes the operations
// a host calls: collect, validate, save, load, transfer, clear. Mutations go through
// update()/try_update(), which diff the state and report SessionChange events so the
// host can refresh whatever it displays.

use crate::error::{StateError, TransferError};
use crate::models::{Action, ActionSlot, BoneGraph, MappingConfig, MappingFormat, Settings, Side};
use crate::services::{self, InferenceStats, TransferOutcome};
use camino::Utf8Path;

/// Change events produced when session state is modified
#[derive(Clone, Debug, PartialEq)]
pub enum SessionChange {
    /// Entries were added, removed or retargeted
    EntriesChanged { entries: usize, resolved: usize },

    /// All entries were removed
    MappingCleared,

    /// A mapping file replaced the session's mapping
    MappingLoaded { path: String, entries: usize },

    /// Source or target prefix changed
    PrefixesChanged {
        prefix_src: String,
        prefix_tgt: String,
    },

    /// The action picked for transfer changed
    ActionSelected { action: Option<String> },
}

/// Everything a session mutates
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub mapping: MappingConfig,
    pub selected_action: Option<String>,
}

/// Owner of one mapping session.
///
/// Operations run to completion one at a time (`&mut self`); a failed operation
/// leaves the state as it was.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,

    /// Format for mapping paths without a recognised extension
    format: MappingFormat,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with the default prefixes and format from `settings`
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            state: SessionState {
                mapping: MappingConfig::with_prefixes(&settings.prefix_src, &settings.prefix_tgt),
                selected_action: None,
            },
            format: settings.mapping_format,
        }
    }

    /// Start a session around an existing mapping
    pub fn with_mapping(mapping: MappingConfig) -> Self {
        Self {
            state: SessionState {
                mapping,
                selected_action: None,
            },
            format: MappingFormat::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mapping(&self) -> &MappingConfig {
        &self.state.mapping
    }

    pub fn selected_action(&self) -> Option<&str> {
        self.state.selected_action.as_deref()
    }

    /// Apply an infallible mutation and report what changed
    pub fn update<F>(&mut self, update_fn: F) -> Vec<SessionChange>
    where
        F: FnOnce(&mut SessionState),
    {
        let old_state = self.state.clone();
        update_fn(&mut self.state);
        Self::detect_changes(&old_state, &self.state)
    }

    /// Apply a fallible mutation to a copy and commit it only on success
    pub fn try_update<F, T, E>(&mut self, update_fn: F) -> Result<(T, Vec<SessionChange>), E>
    where
        F: FnOnce(&mut SessionState) -> Result<T, E>,
    {
        let mut next = self.state.clone();
        let value = update_fn(&mut next)?;
        let changes = Self::detect_changes(&self.state, &next);
        self.state = next;
        Ok((value, changes))
    }

    fn detect_changes(old: &SessionState, new: &SessionState) -> Vec<SessionChange> {
        let mut changes = Vec::new();

        if old.mapping.entries() != new.mapping.entries() {
            if new.mapping.is_empty() {
                changes.push(SessionChange::MappingCleared);
            } else {
                changes.push(SessionChange::EntriesChanged {
                    entries: new.mapping.len(),
                    resolved: new.mapping.resolved_count(),
                });
            }
        }

        if old.mapping.prefix_src != new.mapping.prefix_src
            || old.mapping.prefix_tgt != new.mapping.prefix_tgt
        {
            changes.push(SessionChange::PrefixesChanged {
                prefix_src: new.mapping.prefix_src.clone(),
                prefix_tgt: new.mapping.prefix_tgt.clone(),
            });
        }

        if old.selected_action != new.selected_action {
            changes.push(SessionChange::ActionSelected {
                action: new.selected_action.clone(),
            });
        }

        changes
    }

    // Invocation surface

    /// Collect from one skeleton (entries only) or two (source, then target, with
    /// hierarchy inference). Any other count is a [`StateError`].
    pub fn collect<G: BoneGraph>(&mut self, skeletons: &[&G]) -> Result<Vec<SessionChange>, TransferError> {
        match skeletons {
            [single] => self.collect_from_single(*single),
            [source, target] => self.collect_from_pair(*source, *target).map(|(_, changes)| changes),
            _ => Err(StateError::InvalidSelection(skeletons.len()).into()),
        }
    }

    pub fn collect_from_single<G: BoneGraph>(
        &mut self,
        skeleton: &G,
    ) -> Result<Vec<SessionChange>, TransferError> {
        let ((), changes) = self.try_update(|state| {
            services::collect_from_single(&mut state.mapping, skeleton)
        })?;
        Ok(changes)
    }

    pub fn collect_from_pair<S: BoneGraph, T: BoneGraph>(
        &mut self,
        source: &S,
        target: &T,
    ) -> Result<(InferenceStats, Vec<SessionChange>), TransferError> {
        let result = self.try_update(|state| {
            services::collect_from_pair(&mut state.mapping, source, target)
        })?;
        Ok(result)
    }

    /// Check the mapping against both skeletons and the action
    pub fn validate<S: BoneGraph, T: BoneGraph>(
        &self,
        source: &S,
        target: &T,
        action: &Action,
    ) -> Result<(), TransferError> {
        let mapping = &self.state.mapping;
        services::check_against(mapping, source, Side::Source)?;
        services::check_against(mapping, target, Side::Target)?;
        services::check_action(mapping, action)?;
        tracing::info!(
            "Mapping valid for '{}' -> '{}' with action '{}'",
            source.graph_name(),
            target.graph_name(),
            action.name
        );
        Ok(())
    }

    pub fn save(&self, path: &Utf8Path) -> Result<(), TransferError> {
        services::save_to_path(&self.state.mapping, path, self.format)?;
        Ok(())
    }

    /// Replace the mapping with the one stored at `path`
    pub fn load(&mut self, path: &Utf8Path) -> Result<Vec<SessionChange>, TransferError> {
        let format = self.format;
        let ((), mut changes) = self.try_update(|state| {
            services::load_from_path(&mut state.mapping, path, format)
        })?;
        changes.push(SessionChange::MappingLoaded {
            path: path.to_string(),
            entries: self.state.mapping.len(),
        });
        Ok(changes)
    }

    /// Transfer `action` through the current mapping onto `destination`
    pub fn transfer<D>(
        &self,
        action: &Action,
        destination: Option<&mut D>,
    ) -> Result<TransferOutcome, TransferError>
    where
        D: BoneGraph + ActionSlot,
    {
        services::transfer_action(&self.state.mapping, action, destination)
    }

    /// Drop every entry; prefixes and the selected action stay
    pub fn clear(&mut self) -> Vec<SessionChange> {
        self.update(|state| state.mapping.clear())
    }

    // User edits

    pub fn set_target(&mut self, source: &str, target: &str) -> Result<Vec<SessionChange>, TransferError> {
        let ((), changes) = self.try_update(|state| state.mapping.set_target(source, target))?;
        Ok(changes)
    }

    pub fn set_prefixes(&mut self, prefix_src: &str, prefix_tgt: &str) -> Vec<SessionChange> {
        self.update(|state| {
            state.mapping.prefix_src = prefix_src.to_string();
            state.mapping.prefix_tgt = prefix_tgt.to_string();
        })
    }

    pub fn select_action(&mut self, action: Option<&str>) -> Vec<SessionChange> {
        self.update(|state| state.selected_action = action.map(str::to_string))
    }

    /// An action is selected and every entry has a target
    pub fn is_transfer_ready(&self) -> bool {
        self.state.selected_action.is_some() && self.state.mapping.is_complete()
    }

    /// Like [`is_transfer_ready`](Self::is_transfer_ready) but with the reason it is not
    pub fn check_transfer_ready(&self) -> Result<(), TransferError> {
        if self.state.selected_action.is_none() {
            return Err(StateError::NoActionSelected.into());
        }
        services::check_complete(&self.state.mapping)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StructuralError, ValidationError};
    use crate::models::Skeleton;

    fn rig(name: &str, bones: &[(&str, Option<&str>)]) -> Skeleton {
        Skeleton::from_named_bones(name, bones.iter().copied()).unwrap()
    }

    #[test]
    fn test_collect_single_emits_entries_changed() {
        let mut session = Session::new();
        let src = rig("Src", &[("Hips", None), ("Head", Some("Hips"))]);

        let changes = session.collect(&[&src]).unwrap();

        assert_eq!(
            changes,
            vec![SessionChange::EntriesChanged {
                entries: 2,
                resolved: 0
            }]
        );
    }

    #[test]
    fn test_collect_rejects_bad_cardinality() {
        let mut session = Session::new();
        let a = rig("A", &[("Hips", None)]);
        let err = session.collect::<Skeleton>(&[]).unwrap_err();
        assert!(matches!(err, TransferError::State(StateError::InvalidSelection(0))));
        let err = session.collect(&[&a, &a, &a]).unwrap_err();
        assert!(matches!(err, TransferError::State(StateError::InvalidSelection(3))));
    }

    #[test]
    fn test_failed_collect_leaves_state() {
        let mut session = Session::with_mapping(
            MappingConfig::from_pairs("", "", [("Keep", "me")]).unwrap(),
        );
        let mut dup = Skeleton::new("Dup");
        dup.add_bone("Hips", None).unwrap();
        dup.add_bone("Hips", None).unwrap();

        let err = session.collect(&[&dup]).unwrap_err();
        assert!(matches!(
            err,
            TransferError::Structural(StructuralError::DuplicateSource(_))
        ));
        assert_eq!(session.mapping().target_of("Keep"), Some("me"));
    }

    #[test]
    fn test_clear_and_edits() {
        let mut session = Session::with_mapping(
            MappingConfig::from_pairs("", "", [("Hips", "")]).unwrap(),
        );

        let changes = session.set_target("Hips", "pelvis").unwrap();
        assert_eq!(
            changes,
            vec![SessionChange::EntriesChanged {
                entries: 1,
                resolved: 1
            }]
        );

        let changes = session.set_prefixes("src_", "");
        assert!(matches!(changes[0], SessionChange::PrefixesChanged { .. }));
        // Same prefixes again: nothing changed
        assert!(session.set_prefixes("src_", "").is_empty());

        assert_eq!(session.clear(), vec![SessionChange::MappingCleared]);
        assert_eq!(session.mapping().prefix_src, "src_");
    }

    #[test]
    fn test_transfer_readiness() {
        let mut session = Session::with_mapping(
            MappingConfig::from_pairs("", "", [("Hips", "pelvis"), ("Tail", "")]).unwrap(),
        );
        assert!(matches!(
            session.check_transfer_ready(),
            Err(TransferError::State(StateError::NoActionSelected))
        ));

        session.select_action(Some("Walk"));
        assert!(!session.is_transfer_ready());
        assert!(matches!(
            session.check_transfer_ready(),
            Err(TransferError::Validation(ValidationError::Incomplete { unresolved: 1, total: 2 }))
        ));

        session.set_target("Tail", "tail_01").unwrap();
        assert!(session.is_transfer_ready());
    }

    #[test]
    fn test_from_settings_uses_prefixes() {
        let settings = Settings {
            prefix_src: "mixamorig:".to_string(),
            prefix_tgt: "DEF-".to_string(),
            ..Settings::default()
        };
        let session = Session::from_settings(&settings);
        assert_eq!(session.mapping().prefix_src, "mixamorig:");
        assert_eq!(session.mapping().prefix_tgt, "DEF-");
        assert!(session.mapping().is_empty());
    }
}
