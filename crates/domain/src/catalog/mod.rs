//! Static game content: the mission storyline and one scene per mission.

mod missions;
mod scenes;

use crate::entities::{Mission, SceneDefinition};
use crate::error::DomainError;

/// Ordered missions plus their scenes.
///
/// # Invariants
///
/// - At least one mission and one scene exist, so index lookups always
///   resolve to something.
#[derive(Debug, Clone)]
pub struct Catalog {
    missions: Vec<Mission>,
    scenes: Vec<SceneDefinition>,
}

impl Catalog {
    pub fn new(missions: Vec<Mission>, scenes: Vec<SceneDefinition>) -> Result<Self, DomainError> {
        if missions.is_empty() {
            return Err(DomainError::validation("catalog needs at least one mission"));
        }
        if scenes.is_empty() {
            return Err(DomainError::validation("catalog needs at least one scene"));
        }
        Ok(Self { missions, scenes })
    }

    /// The content shipped with the game.
    pub fn standard() -> Self {
        Self {
            missions: missions::standard_missions(),
            scenes: scenes::standard_scenes(),
        }
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn mission_count(&self) -> usize {
        self.missions.len()
    }

    /// Clamp an arbitrary index to the last valid mission.
    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.missions.len() - 1)
    }

    /// Mission at `index`, or the last mission when out of range.
    pub fn mission(&self, index: usize) -> &Mission {
        &self.missions[self.clamp_index(index)]
    }

    pub fn is_last_mission(&self, index: usize) -> bool {
        index + 1 >= self.missions.len()
    }

    /// Scene for the mission at `index`; unknown indices fall back to the first scene.
    pub fn scene(&self, index: usize) -> &SceneDefinition {
        self.scenes.get(index).unwrap_or(&self.scenes[0])
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::WeatherEffect;

    #[test]
    fn standard_catalog_pairs_missions_with_scenes() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.mission_count(), 5);
        assert_eq!(catalog.mission(0).title, "First Encounter");
        assert_eq!(catalog.scene(2).weather, WeatherEffect::Rain);
        assert_eq!(catalog.scene(4).weather, WeatherEffect::Fireflies);
    }

    #[test]
    fn out_of_range_mission_clamps_to_last() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.clamp_index(99), 4);
        assert_eq!(catalog.mission(99).title, "Stargazing Confession");
        assert!(catalog.is_last_mission(4));
        assert!(!catalog.is_last_mission(3));
    }

    #[test]
    fn out_of_range_scene_falls_back_to_first() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.scene(42), catalog.scene(0));
    }

    #[test]
    fn every_scene_offers_universal_actions_and_spawns_clear() {
        let catalog = Catalog::standard();
        for index in 0..catalog.mission_count() {
            let scene = catalog.scene(index);
            for id in ["smile", "compliment", "joke"] {
                assert!(scene.find_action(id).is_some(), "scene {index} lacks {id}");
            }
            assert_eq!(scene.actions.len(), 7);
            assert!(!scene.blocks(scene.player_spawn, 0.02), "scene {index} spawn blocked");
        }
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = Catalog::new(Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
