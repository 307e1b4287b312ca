//! # Parameter Resolver
//!
//! Turns sparse overrides into the complete parameter set a generator sees.
//!
//! ## Precedence (lowest to highest)
//!
//! ```text
//! 1. engine defaults        (GlobalParams from the config)
//! 2. built-in record values (SceneParams::defaults_for)
//! 3. scene declared values  (Scene::defaults in the registry)
//! 4. session memory         (SessionMemory snapshot for the scene)
//! 5. live updates           (ParameterResolver::update, active scene only)
//! ```
//!
//! Live updates belong to the active scene. Switching scenes drops them;
//! whatever should survive the switch has to be saved to session memory
//! first.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::global::{GlobalKey, GlobalOverrides, GlobalParams};
use super::scene::{FieldUpdate, SceneParams, SceneRecord};
use super::session::{ParamSnapshot, SessionMemory};
use super::value::{canonical_name, ParamValue};
use crate::error::SceneResult;
use crate::registry::SceneKind;

/// Where an update landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Stored as a global parameter.
    Global(GlobalKey),
    /// Stored as a field of the active scene's record.
    Scene,
    /// Stored as an engine-wide effect setting.
    Effect,
    /// Not a known name; kept verbatim in the active scene's bucket.
    Extra,
    /// Known name, wrong type. Nothing changed.
    Rejected,
}

/// The complete parameter set for one frame of one scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedParams {
    /// The scene these parameters were resolved for.
    pub scene: SceneKind,
    /// Global parameters.
    pub globals: GlobalParams,
    /// The scene's typed record.
    pub scene_params: SceneParams,
    /// Names neither namespace recognises, kept as given.
    pub extra: BTreeMap<String, ParamValue>,
}

impl ResolvedParams {
    /// Engine defaults plus the scene's built-in record.
    #[must_use]
    pub fn defaults(scene: SceneKind, globals: GlobalParams) -> Self {
        Self {
            scene,
            globals,
            scene_params: SceneParams::defaults_for(scene),
            extra: BTreeMap::new(),
        }
    }

    /// Looks up a value in the global namespace, then the scene record,
    /// then the extra bucket.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        if let Some(key) = GlobalKey::from_name(name) {
            return Some(ParamValue::Number(self.globals.get(key)));
        }
        self.scene_params
            .get(&canonical_name(name))
            .or_else(|| self.extra.get(name).cloned())
    }

    /// The typed record for scene kind `R`, or its defaults if these
    /// parameters belong to another scene.
    #[must_use]
    pub fn record<R: SceneRecord>(&self) -> R {
        R::extract(&self.scene_params).copied().unwrap_or_default()
    }

    /// Writes one named value into the right namespace.
    pub fn apply(&mut self, name: &str, value: &ParamValue) -> UpdateOutcome {
        if let Some(key) = GlobalKey::from_name(name) {
            return match value.as_number() {
                Some(n) if n.is_finite() => {
                    self.globals.set(key, n);
                    UpdateOutcome::Global(key)
                }
                _ => UpdateOutcome::Rejected,
            };
        }

        match self.scene_params.set(&canonical_name(name), value) {
            FieldUpdate::Applied => UpdateOutcome::Scene,
            FieldUpdate::TypeMismatch => UpdateOutcome::Rejected,
            FieldUpdate::Unknown => {
                self.extra.insert(name.to_owned(), value.clone());
                UpdateOutcome::Extra
            }
        }
    }
}

/// Merges the parameter tiers for the active scene.
#[derive(Clone, Debug)]
pub struct ParameterResolver {
    engine_defaults: GlobalParams,
    active: SceneKind,
    live_globals: GlobalOverrides,
    /// Validated scene-record fields, by canonical name.
    live_scene: BTreeMap<String, ParamValue>,
    /// Unrecognised names, as given.
    live_extra: BTreeMap<String, ParamValue>,
}

impl Default for ParameterResolver {
    fn default() -> Self {
        Self::new(GlobalParams::default(), SceneKind::default())
    }
}

impl ParameterResolver {
    /// Creates a resolver with the given engine defaults and active scene.
    #[must_use]
    pub fn new(engine_defaults: GlobalParams, active: SceneKind) -> Self {
        Self {
            engine_defaults,
            active,
            live_globals: GlobalOverrides::default(),
            live_scene: BTreeMap::new(),
            live_extra: BTreeMap::new(),
        }
    }

    /// The active scene.
    #[inline]
    #[must_use]
    pub fn active_scene(&self) -> SceneKind {
        self.active
    }

    /// Engine-wide defaults (lowest tier).
    #[inline]
    #[must_use]
    pub fn engine_defaults(&self) -> &GlobalParams {
        &self.engine_defaults
    }

    /// Number of live overrides currently held for the active scene.
    #[must_use]
    pub fn live_overrides(&self) -> usize {
        self.live_globals.len() + self.live_scene.len() + self.live_extra.len()
    }

    /// Records a live update for the active scene.
    ///
    /// Global names go to the global overrides; scene-record names are
    /// type-checked against the active scene; anything else is kept
    /// verbatim. A value of the wrong type is logged and dropped.
    pub fn update(&mut self, name: &str, value: ParamValue) -> UpdateOutcome {
        if let Some(key) = GlobalKey::from_name(name) {
            return match value.as_number() {
                Some(n) if n.is_finite() => {
                    debug!(param = key.name(), value = n, "global parameter updated");
                    self.live_globals.set(key, n);
                    UpdateOutcome::Global(key)
                }
                _ => {
                    warn!(param = name, got = value.kind_name(), "rejected non-numeric global parameter");
                    UpdateOutcome::Rejected
                }
            };
        }

        let field = canonical_name(name);
        let mut candidate = SceneParams::defaults_for(self.active);
        match candidate.set(&field, &value) {
            FieldUpdate::Applied => {
                debug!(scene = self.active.id(), param = %field, %value, "scene parameter updated");
                self.live_scene.insert(field, value);
                UpdateOutcome::Scene
            }
            FieldUpdate::TypeMismatch => {
                warn!(
                    scene = self.active.id(),
                    param = %field,
                    got = value.kind_name(),
                    "rejected scene parameter of the wrong type"
                );
                UpdateOutcome::Rejected
            }
            FieldUpdate::Unknown => {
                debug!(scene = self.active.id(), param = name, "unrecognised parameter kept");
                self.live_extra.insert(name.to_owned(), value);
                UpdateOutcome::Extra
            }
        }
    }

    /// Current value of a parameter for the active scene.
    ///
    /// `None` if the name is in neither namespace and was never set.
    #[must_use]
    pub fn get(&self, name: &str, session: &SessionMemory) -> Option<ParamValue> {
        self.resolve(self.active, session).get(name)
    }

    /// Full parameter set for `kind`. Live overrides count only when
    /// `kind` is the active scene.
    #[must_use]
    pub fn resolve(&self, kind: SceneKind, session: &SessionMemory) -> ResolvedParams {
        let mut resolved = ResolvedParams::defaults(kind, self.engine_defaults);

        for (name, value) in kind.scene().defaults {
            resolved.apply(name, &value.to_value());
        }

        if let Some(snapshot) = session.snapshot(kind) {
            for (name, value) in snapshot {
                resolved.apply(name, value);
            }
        }

        if kind == self.active {
            self.live_globals.apply_to(&mut resolved.globals);
            for (name, value) in &self.live_scene {
                resolved.apply(name, value);
            }
            for (name, value) in &self.live_extra {
                resolved.extra.insert(name.clone(), value.clone());
            }
        }

        resolved
    }

    /// Full parameter set for a scene identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SceneError::UnknownScene`] if `id` is not registered.
    pub fn resolve_for_scene(&self, id: &str, session: &SessionMemory) -> SceneResult<ResolvedParams> {
        let kind = SceneKind::parse(id)?;
        Ok(self.resolve(kind, session))
    }

    /// Snapshots the scene's enabled parameters, plus any unrecognised
    /// names it carries, into session memory.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SceneError::UnknownScene`] if `id` is not registered.
    pub fn save_session(&self, id: &str, session: &mut SessionMemory) -> SceneResult<()> {
        let kind = SceneKind::parse(id)?;
        let resolved = self.resolve(kind, session);

        let mut snapshot: ParamSnapshot = kind
            .scene()
            .enabled
            .iter()
            .filter_map(|name| resolved.get(name).map(|value| ((*name).to_owned(), value)))
            .collect();
        snapshot.extend(resolved.extra);

        info!(scene = id, params = snapshot.len(), "session saved");
        session.store(kind, snapshot);
        Ok(())
    }

    /// Makes another scene active.
    ///
    /// An unknown identifier leaves everything unchanged. Selecting a
    /// different scene drops the live overrides of the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SceneError::UnknownScene`] if `id` is not registered.
    pub fn select_scene(&mut self, id: &str) -> SceneResult<SceneKind> {
        let kind = SceneKind::parse(id)?;
        if kind != self.active {
            info!(from = self.active.id(), to = kind.id(), "scene selected");
            self.clear_live();
            self.active = kind;
        }
        Ok(kind)
    }

    /// Drops every live override.
    pub fn clear_live(&mut self) {
        self.live_globals.clear();
        self.live_scene.clear();
        self.live_extra.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use crate::params::scene::{CafeWallParams, NeckerCubeParams, RotationMode};

    fn cafe_resolver() -> ParameterResolver {
        ParameterResolver::new(GlobalParams::default(), SceneKind::CafeWall)
    }

    #[test]
    fn test_live_update_wins() {
        let mut resolver = cafe_resolver();
        let session = SessionMemory::new();

        assert_eq!(resolver.update("size", 2.0.into()), UpdateOutcome::Global(GlobalKey::Size));

        let params = resolver.resolve_for_scene("cafeWall", &session).unwrap();
        assert_eq!(params.globals.size, 2.0);
    }

    #[test]
    fn test_session_restores_after_switch() {
        let mut resolver = cafe_resolver();
        let mut session = SessionMemory::new();

        resolver.update("size", 2.0.into());
        resolver.save_session("cafeWall", &mut session).unwrap();

        resolver.select_scene("pulfrich").unwrap();
        assert_eq!(resolver.live_overrides(), 0);
        resolver.select_scene("cafeWall").unwrap();

        let params = resolver.resolve_for_scene("cafeWall", &session).unwrap();
        assert_eq!(params.globals.size, 2.0);
    }

    #[test]
    fn test_switch_without_save_forgets() {
        let mut resolver = cafe_resolver();
        let session = SessionMemory::new();

        resolver.update("size", 2.0.into());
        resolver.select_scene("pulfrich").unwrap();
        resolver.select_scene("cafeWall").unwrap();

        let params = resolver.resolve(SceneKind::CafeWall, &session);
        assert_eq!(params.globals.size, 1.0);
    }

    #[test]
    fn test_live_overrides_only_for_active_scene() {
        let mut resolver = cafe_resolver();
        let session = SessionMemory::new();

        resolver.update("size", 3.0.into());
        assert_eq!(resolver.resolve(SceneKind::Pulfrich, &session).globals.size, 1.0);
    }

    #[test]
    fn test_scene_declared_default_beats_engine_default() {
        let resolver = ParameterResolver::new(GlobalParams::default(), SceneKind::MotionAftereffect);
        let session = SessionMemory::new();

        // The aftereffect stripes declare a slower animation speed.
        let params = resolver.resolve(SceneKind::MotionAftereffect, &session);
        assert_eq!(params.globals.animation_speed, 0.5);
    }

    #[test]
    fn test_session_beats_scene_default_and_live_beats_session() {
        let mut resolver = cafe_resolver();
        let mut session = SessionMemory::new();

        let mut snapshot = ParamSnapshot::new();
        snapshot.insert("mortar".to_owned(), false.into());
        snapshot.insert("spacing".to_owned(), 2.0.into());
        session.store(SceneKind::CafeWall, snapshot);

        let params = resolver.resolve(SceneKind::CafeWall, &session);
        assert!(!params.record::<CafeWallParams>().mortar);
        assert_eq!(params.globals.spacing, 2.0);

        resolver.update("mortar", true.into());
        let params = resolver.resolve(SceneKind::CafeWall, &session);
        assert!(params.record::<CafeWallParams>().mortar);
    }

    #[test]
    fn test_scene_parameter_typed() {
        let mut resolver = ParameterResolver::new(GlobalParams::default(), SceneKind::NeckerCube);
        let session = SessionMemory::new();

        assert_eq!(resolver.update("rotationMode", "single".into()), UpdateOutcome::Scene);
        assert_eq!(resolver.update("rotation_mode", 4.0.into()), UpdateOutcome::Rejected);

        let record = resolver.resolve(SceneKind::NeckerCube, &session).record::<NeckerCubeParams>();
        assert_eq!(record.rotation_mode, RotationMode::Single);
    }

    #[test]
    fn test_rejected_global_leaves_value() {
        let mut resolver = cafe_resolver();
        let session = SessionMemory::new();

        assert_eq!(resolver.update("size", "big".into()), UpdateOutcome::Rejected);
        assert_eq!(resolver.update("density", f64::INFINITY.into()), UpdateOutcome::Rejected);
        assert_eq!(resolver.get("size", &session), Some(ParamValue::Number(1.0)));
        assert_eq!(resolver.live_overrides(), 0);
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let mut resolver = cafe_resolver();
        let mut session = SessionMemory::new();

        assert_eq!(resolver.update("glowColor", "amber".into()), UpdateOutcome::Extra);
        assert_eq!(resolver.get("glowColor", &session), Some(ParamValue::from("amber")));

        resolver.save_session("cafeWall", &mut session).unwrap();
        let saved = session.snapshot(SceneKind::CafeWall).unwrap();
        assert_eq!(saved.get("glowColor"), Some(&ParamValue::from("amber")));
    }

    #[test]
    fn test_unresolved_parameter_is_none() {
        let resolver = cafe_resolver();
        assert_eq!(resolver.get("doesNotExist", &SessionMemory::new()), None);
    }

    #[test]
    fn test_other_scene_field_is_extra() {
        let mut resolver = cafe_resolver();
        assert_eq!(resolver.update("taper", 0.9.into()), UpdateOutcome::Extra);
    }

    #[test]
    fn test_unknown_scene_leaves_state() {
        let mut resolver = cafe_resolver();
        resolver.update("size", 2.0.into());

        assert_eq!(
            resolver.select_scene("doesNotExist"),
            Err(SceneError::UnknownScene("doesNotExist".to_owned()))
        );
        assert_eq!(resolver.active_scene(), SceneKind::CafeWall);
        assert_eq!(resolver.live_overrides(), 1);

        let mut session = SessionMemory::new();
        assert!(resolver.save_session("doesNotExist", &mut session).is_err());
        assert!(session.is_empty());
        assert!(resolver.resolve_for_scene("doesNotExist", &session).is_err());
    }

    #[test]
    fn test_save_snapshots_enabled_only() {
        let resolver = cafe_resolver();
        let mut session = SessionMemory::new();
        resolver.save_session("cafeWall", &mut session).unwrap();

        let saved = session.snapshot(SceneKind::CafeWall).unwrap();
        for name in SceneKind::CafeWall.scene().enabled {
            assert!(saved.contains_key(*name), "{name} missing from snapshot");
        }
        assert!(!saved.contains_key("amplitude"));
    }

    #[test]
    fn test_reselect_same_scene_keeps_live() {
        let mut resolver = cafe_resolver();
        resolver.update("size", 2.0.into());
        resolver.select_scene("cafeWall").unwrap();
        assert_eq!(resolver.live_overrides(), 1);
    }
}
