//! Level definitions and the level catalog
//!
//! Levels are authored as [`LevelDef`] (serde-friendly) and compiled into
//! immutable [`Level`] values. Compilation validates everything the tick
//! relies on, so malformed data is rejected here instead of at tick time.

use std::path::Path;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Platform;
use super::state::{Adversary, AdversaryId, Body, PatrolDirection};
use crate::SimError;
use crate::consts::*;
use crate::tuning::Tuning;

fn default_adversary_size() -> Vec2 {
    Vec2::splat(ADVERSARY_SIZE)
}

/// Initial placement of one adversary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdversarySpawn {
    /// Top-left corner
    pub pos: Vec2,
    #[serde(default = "default_adversary_size")]
    pub size: Vec2,
    #[serde(default)]
    pub direction: PatrolDirection,
    pub patrol_start: f32,
    pub patrol_end: f32,
}

impl AdversarySpawn {
    /// Default-sized adversary heading right
    pub fn new(pos: Vec2, patrol_start: f32, patrol_end: f32) -> Self {
        Self {
            pos,
            size: default_adversary_size(),
            direction: PatrolDirection::Right,
            patrol_start,
            patrol_end,
        }
    }

    pub fn heading(mut self, direction: PatrolDirection) -> Self {
        self.direction = direction;
        self
    }
}

/// Authored level data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    pub name: String,
    /// Player spawn (top-left corner)
    pub spawn: Vec2,
    pub platforms: Vec<Platform>,
    pub adversaries: Vec<AdversarySpawn>,
}

/// A validated, immutable level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    /// Position in the catalog
    pub index: usize,
    pub name: String,
    pub spawn: Vec2,
    /// Checked in this order for landing
    pub platforms: Vec<Platform>,
    /// Initial adversaries; each round clones its own copies
    pub adversaries: Vec<Adversary>,
}

fn positive_size(size: Vec2) -> bool {
    size.is_finite() && size.x > 0.0 && size.y > 0.0
}

/// Some platform lies under the patrol span, at or below the spawn's feet
fn patrol_is_supported(spawn: &AdversarySpawn, platforms: &[Platform]) -> bool {
    let left = spawn.patrol_start;
    let right = spawn.patrol_end + spawn.size.x;
    let bottom = spawn.pos.y + spawn.size.y;

    platforms.iter().any(|p| {
        let aabb = p.aabb();
        aabb.left() < right && aabb.right() > left && aabb.top() >= bottom
    })
}

impl Level {
    /// Validate a definition and build the level at catalog position `index`
    pub fn compile(index: usize, def: &LevelDef, tuning: &Tuning) -> Result<Self, SimError> {
        let name = def.name.as_str();
        if name.trim().is_empty() {
            return Err(SimError::invalid_level(
                &format!("#{}", index + 1),
                "level name is empty",
            ));
        }

        if !def.spawn.is_finite()
            || def.spawn.x < 0.0
            || def.spawn.x > tuning.field_width - PLAYER_SIZE
        {
            return Err(SimError::invalid_level(
                name,
                format!("player spawn {} is outside the playfield", def.spawn),
            ));
        }

        for (i, platform) in def.platforms.iter().enumerate() {
            if !platform.pos.is_finite() || !positive_size(platform.size) {
                return Err(SimError::invalid_level(
                    name,
                    format!("platform {i} has a non-positive or non-finite size"),
                ));
            }
        }

        let mut adversaries = Vec::with_capacity(def.adversaries.len());
        for (i, spawn) in def.adversaries.iter().enumerate() {
            if !spawn.pos.is_finite() || !positive_size(spawn.size) {
                return Err(SimError::invalid_level(
                    name,
                    format!("adversary {i} has a non-positive or non-finite size"),
                ));
            }
            if !spawn.patrol_start.is_finite()
                || !spawn.patrol_end.is_finite()
                || spawn.patrol_start > spawn.patrol_end
            {
                return Err(SimError::invalid_level(
                    name,
                    format!(
                        "adversary {i} patrol start {} is after patrol end {}",
                        spawn.patrol_start, spawn.patrol_end
                    ),
                ));
            }
            if spawn.pos.x < spawn.patrol_start || spawn.pos.x > spawn.patrol_end {
                return Err(SimError::invalid_level(
                    name,
                    format!(
                        "adversary {i} spawns at x={} outside its patrol [{}, {}]",
                        spawn.pos.x, spawn.patrol_start, spawn.patrol_end
                    ),
                ));
            }
            if spawn.patrol_start < 0.0 || spawn.patrol_end + spawn.size.x > tuning.field_width {
                return Err(SimError::invalid_level(
                    name,
                    format!(
                        "adversary {i} patrol [{}, {}] leaves the playfield",
                        spawn.patrol_start, spawn.patrol_end
                    ),
                ));
            }
            if !patrol_is_supported(spawn, &def.platforms) {
                return Err(SimError::invalid_level(
                    name,
                    format!("adversary {i} has no platform below its patrol"),
                ));
            }

            adversaries.push(Adversary {
                id: AdversaryId(i as u32),
                body: Body::new(spawn.pos, spawn.size),
                direction: spawn.direction,
                patrol_start: spawn.patrol_start,
                patrol_end: spawn.patrol_end,
            });
        }

        Ok(Self {
            index,
            name: def.name.clone(),
            spawn: def.spawn,
            platforms: def.platforms.clone(),
            adversaries,
        })
    }
}

/// Ordered, non-empty sequence of levels
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<Arc<Level>>,
}

impl LevelCatalog {
    /// Build a catalog, validating every definition
    pub fn new(defs: &[LevelDef], tuning: &Tuning) -> Result<Self, SimError> {
        if defs.is_empty() {
            return Err(SimError::EmptyCatalog);
        }

        let levels = defs
            .iter()
            .enumerate()
            .map(|(i, def)| Level::compile(i, def, tuning).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { levels })
    }

    /// The hand-authored levels shipped with the game
    pub fn builtin(tuning: &Tuning) -> Result<Self, SimError> {
        Self::new(&builtin_levels(), tuning)
    }

    /// Parse a JSON array of level definitions
    pub fn from_json(json: &str, tuning: &Tuning) -> Result<Self, SimError> {
        let defs: Vec<LevelDef> = serde_json::from_str(json)?;
        Self::new(&defs, tuning)
    }

    /// Load a JSON catalog file
    pub fn load(path: impl AsRef<Path>, tuning: &Tuning) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json, tuning)?;
        log::info!("Loaded {} levels from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn get(&self, index: usize) -> Result<Arc<Level>, SimError> {
        self.levels
            .get(index)
            .cloned()
            .ok_or(SimError::InvalidLevelIndex {
                index,
                count: self.levels.len(),
            })
    }

    /// First level (a catalog is never empty)
    pub fn first(&self) -> Arc<Level> {
        Arc::clone(&self.levels[0])
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false for a constructed catalog
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn has_next(&self, index: usize) -> bool {
        index + 1 < self.levels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Level>> {
        self.levels.iter()
    }
}

fn ground() -> Platform {
    Platform::new(0.0, FIELD_HEIGHT - 50.0, FIELD_WIDTH, PLATFORM_THICKNESS)
}

fn ledge(x: f32, y: f32, width: f32) -> Platform {
    Platform::new(x, y, width, PLATFORM_THICKNESS)
}

/// Adversary whose feet start at `bottom_y`; it falls onto the first platform below
fn patrol(x: f32, bottom_y: f32, start: f32, end: f32, dir: PatrolDirection) -> AdversarySpawn {
    AdversarySpawn::new(Vec2::new(x, bottom_y - ADVERSARY_SIZE), start, end).heading(dir)
}

/// Built-in level definitions
pub fn builtin_levels() -> Vec<LevelDef> {
    use PatrolDirection::{Left, Right};

    let spawn = Vec2::new(50.0, FIELD_HEIGHT - 100.0);

    vec![
        LevelDef {
            name: "Garden Steps".into(),
            spawn,
            platforms: vec![
                ground(),
                ledge(100.0, 450.0, 150.0),
                ledge(350.0, 380.0, 200.0),
                ledge(600.0, 310.0, 150.0),
                ledge(250.0, 240.0, 180.0),
                ledge(500.0, 170.0, 150.0),
            ],
            adversaries: vec![
                patrol(150.0, 435.0, 100.0, 220.0, Right),
                patrol(400.0, 365.0, 350.0, 520.0, Left),
                patrol(630.0, 295.0, 600.0, 720.0, Right),
                patrol(280.0, 225.0, 250.0, 400.0, Left),
                patrol(540.0, 155.0, 500.0, 620.0, Right),
            ],
        },
        LevelDef {
            name: "Twin Towers".into(),
            spawn,
            platforms: vec![
                ground(),
                ledge(60.0, 460.0, 140.0),
                ledge(600.0, 460.0, 140.0),
                ledge(160.0, 370.0, 140.0),
                ledge(500.0, 370.0, 140.0),
                ledge(300.0, 280.0, 200.0),
                ledge(120.0, 190.0, 160.0),
                ledge(520.0, 190.0, 160.0),
            ],
            adversaries: vec![
                patrol(380.0, 550.0, 300.0, 500.0, Right),
                patrol(180.0, 370.0, 160.0, 265.0, Left),
                patrol(560.0, 370.0, 500.0, 605.0, Right),
                patrol(380.0, 280.0, 300.0, 465.0, Left),
                patrol(150.0, 190.0, 120.0, 245.0, Right),
                patrol(600.0, 190.0, 520.0, 645.0, Left),
            ],
        },
        LevelDef {
            name: "Sky Ladder".into(),
            spawn,
            platforms: vec![
                ground(),
                ledge(180.0, 470.0, 120.0),
                ledge(360.0, 400.0, 120.0),
                ledge(540.0, 330.0, 120.0),
                ledge(360.0, 260.0, 120.0),
                ledge(180.0, 190.0, 120.0),
                ledge(0.0, 120.0, 140.0),
                ledge(560.0, 140.0, 200.0),
            ],
            adversaries: vec![
                patrol(250.0, 550.0, 200.0, 450.0, Right),
                patrol(600.0, 550.0, 480.0, 720.0, Left),
                patrol(380.0, 400.0, 360.0, 445.0, Right),
                patrol(560.0, 330.0, 540.0, 625.0, Left),
                patrol(200.0, 190.0, 180.0, 265.0, Right),
                patrol(640.0, 140.0, 560.0, 725.0, Left),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::step_adversary;

    fn simple_def() -> LevelDef {
        LevelDef {
            name: "Flat".into(),
            spawn: Vec2::new(50.0, 510.0),
            platforms: vec![ground()],
            adversaries: vec![AdversarySpawn::new(Vec2::new(300.0, 515.0), 250.0, 400.0)],
        }
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = LevelCatalog::builtin(&Tuning::default()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
        for (i, level) in catalog.iter().enumerate() {
            assert_eq!(level.index, i);
            assert!(!level.adversaries.is_empty());
        }
    }

    #[test]
    fn test_first_level_layout() {
        let catalog = LevelCatalog::builtin(&Tuning::default()).unwrap();
        let level = catalog.first();
        assert_eq!(level.spawn, Vec2::new(50.0, 500.0));
        assert_eq!(level.platforms.len(), 6);
        assert_eq!(level.adversaries.len(), 5);
        assert_eq!(level.platforms[0], Platform::new(0.0, 550.0, 800.0, 20.0));
    }

    #[test]
    fn test_ids_follow_definition_order() {
        let level = LevelCatalog::builtin(&Tuning::default()).unwrap().first();
        let ids: Vec<u32> = level.adversaries.iter().map(|a| a.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_out_of_range_index() {
        let catalog = LevelCatalog::builtin(&Tuning::default()).unwrap();
        let err = catalog.get(3).unwrap_err();
        assert!(matches!(err, SimError::InvalidLevelIndex { index: 3, count: 3 }));
        assert!(catalog.has_next(1));
        assert!(!catalog.has_next(2));
    }

    #[test]
    fn test_reject_inverted_patrol() {
        let mut def = simple_def();
        def.adversaries[0].patrol_start = 450.0;
        def.adversaries[0].patrol_end = 250.0;

        let err = LevelCatalog::new(&[def], &Tuning::default()).unwrap_err();
        assert!(matches!(err, SimError::InvalidLevel { .. }));
    }

    #[test]
    fn test_reject_spawn_outside_patrol() {
        let mut def = simple_def();
        def.adversaries[0].pos.x = 100.0;
        assert!(LevelCatalog::new(&[def], &Tuning::default()).is_err());
    }

    #[test]
    fn test_reject_bad_sizes_and_spawn() {
        let mut def = simple_def();
        def.platforms.push(Platform::new(0.0, 100.0, 0.0, 20.0));
        assert!(LevelCatalog::new(&[def], &Tuning::default()).is_err());

        let mut def = simple_def();
        def.spawn.x = 790.0;
        assert!(LevelCatalog::new(&[def], &Tuning::default()).is_err());

        let mut def = simple_def();
        def.name = "  ".into();
        assert!(LevelCatalog::new(&[def], &Tuning::default()).is_err());
    }

    #[test]
    fn test_reject_offfield_patrol() {
        let mut def = simple_def();
        def.adversaries[0] = AdversarySpawn::new(Vec2::new(1500.0, 100.0), 1400.0, 1600.0);
        let err = LevelCatalog::new(&[def], &Tuning::default()).unwrap_err();
        assert!(matches!(err, SimError::InvalidLevel { .. }));

        let mut def = simple_def();
        def.adversaries[0] = AdversarySpawn::new(Vec2::new(0.0, 515.0), -20.0, 100.0);
        assert!(LevelCatalog::new(&[def], &Tuning::default()).is_err());

        // Right edge of the body must stay inside the field
        let mut def = simple_def();
        def.adversaries[0] = AdversarySpawn::new(Vec2::new(700.0, 515.0), 700.0, 780.0);
        assert!(LevelCatalog::new(&[def], &Tuning::default()).is_err());

        let mut def = simple_def();
        def.adversaries[0] = AdversarySpawn::new(Vec2::new(700.0, 515.0), 700.0, 765.0);
        assert!(LevelCatalog::new(&[def], &Tuning::default()).is_ok());
    }

    #[test]
    fn test_reject_unsupported_patrol() {
        // Ledge sits above the adversary's feet, nothing below
        let mut def = simple_def();
        def.platforms = vec![ledge(0.0, 300.0, 800.0)];
        def.adversaries[0].pos.y = 400.0;
        let err = LevelCatalog::new(&[def], &Tuning::default()).unwrap_err();
        assert!(matches!(err, SimError::InvalidLevel { .. }));

        // Ledge below, but off to the side of the patrol span
        let mut def = simple_def();
        def.platforms = vec![ledge(500.0, 550.0, 100.0)];
        assert!(LevelCatalog::new(&[def], &Tuning::default()).is_err());

        // Ledge covering only part of the span is enough
        let mut def = simple_def();
        def.platforms = vec![ledge(380.0, 550.0, 100.0)];
        assert!(LevelCatalog::new(&[def], &Tuning::default()).is_ok());
    }

    #[test]
    fn test_first_level_adversaries_settle_on_ledges() {
        let tuning = Tuning::default();
        let level = LevelCatalog::builtin(&tuning).unwrap().first();

        for adversary in &level.adversaries {
            let mut a = adversary.clone();
            for _ in 0..30 {
                a = step_adversary(&a, &level.platforms, &tuning);
            }
            let bottom = a.body.bottom();
            assert_eq!(a.body.vel.y, 0.0);
            assert!(level.platforms.iter().any(|p| p.pos.y == bottom));
        }
    }

    #[test]
    fn test_empty_catalog() {
        let err = LevelCatalog::new(&[], &Tuning::default()).unwrap_err();
        assert!(matches!(err, SimError::EmptyCatalog));
    }

    #[test]
    fn test_json_catalog() {
        let json = r#"[
            {
                "name": "From JSON",
                "spawn": [50.0, 510.0],
                "platforms": [{ "pos": [0.0, 550.0], "size": [800.0, 20.0] }],
                "adversaries": [
                    { "pos": [300.0, 515.0], "patrol_start": 250.0, "patrol_end": 400.0 },
                    { "pos": [500.0, 515.0], "direction": "Left",
                      "patrol_start": 450.0, "patrol_end": 600.0 }
                ]
            }
        ]"#;

        let catalog = LevelCatalog::from_json(json, &Tuning::default()).unwrap();
        let level = catalog.get(0).unwrap();
        assert_eq!(level.name, "From JSON");
        assert_eq!(level.adversaries[0].body.size, Vec2::splat(ADVERSARY_SIZE));
        assert_eq!(level.adversaries[0].direction, PatrolDirection::Right);
        assert_eq!(level.adversaries[1].direction, PatrolDirection::Left);
    }

    #[test]
    fn test_json_roundtrip_of_builtin_defs() {
        let json = serde_json::to_string(&builtin_levels()).unwrap();
        let catalog = LevelCatalog::from_json(&json, &Tuning::default()).unwrap();
        assert_eq!(catalog.len(), 3);
    }
}
