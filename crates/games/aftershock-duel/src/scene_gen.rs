use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::world::{BodySpec, ObjectId, ObjectKind, Transform, UNTAGGED, WorldObject};

/// Tag on room grouping nodes. Not a hazard tag.
pub const GROUP_TAG: &str = "Group";

const FURNITURE: [&str; 5] = ["Chair", "Table", "Sofa", "Bookshelf", "Bed"];
const DECORATION: [&str; 4] = ["Vase", "Painting", "Clock", "Plant"];
const PROPS: [&str; 4] = ["Box", "Barrel", "Lamp", "Bucket"];

/// Arena generation parameters, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Half the side length of the square house footprint.
    pub half_extent: f32,
    pub wall_height: f32,
    pub room_count: u32,
    pub prop_count: u32,
    /// Chance a prop is left untagged.
    pub untagged_chance: f64,
    /// Chance a prop declares its own rigid body.
    pub body_chance: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_extent: 8.0,
            wall_height: 3.0,
            room_count: 3,
            prop_count: 18,
            untagged_chance: 0.2,
            body_chance: 0.35,
        }
    }
}

struct Builder {
    objects: Vec<WorldObject>,
    next_id: ObjectId,
}

impl Builder {
    fn push(
        &mut self,
        name: String,
        tag: &str,
        kind: ObjectKind,
        parent: Option<ObjectId>,
        translation: Vec3,
    ) -> &mut WorldObject {
        let id = self.next_id;
        self.next_id += 1;
        self.objects.push(WorldObject {
            id,
            name,
            tag: tag.to_string(),
            kind,
            parent,
            transform: Transform::from_translation(translation),
            body: None,
        });
        let last = self.objects.len() - 1;
        &mut self.objects[last]
    }
}

/// Generate a deterministic house arena from a seed.
///
/// The house root, walls, floor and roof are structural and never hazard
/// targets. Props are scattered across rooms and parented to them.
pub fn generate_arena(seed: u64, config: &ArenaConfig) -> Vec<WorldObject> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut b = Builder {
        objects: Vec::new(),
        next_id: 1,
    };
    let h = config.half_extent.max(1.0);

    let house = b
        .push("FullHouse".into(), UNTAGGED, ObjectKind::Prop, None, Vec3::ZERO)
        .id;
    b.push("Ground".into(), UNTAGGED, ObjectKind::Prop, None, Vec3::ZERO);
    b.push("Floor".into(), UNTAGGED, ObjectKind::Prop, Some(house), Vec3::ZERO);
    for (name, at) in [
        ("WallNorth", Vec3::new(0.0, 0.0, h)),
        ("WallSouth", Vec3::new(0.0, 0.0, -h)),
        ("WallEast", Vec3::new(h, 0.0, 0.0)),
        ("WallWest", Vec3::new(-h, 0.0, 0.0)),
    ] {
        b.push(name.into(), UNTAGGED, ObjectKind::Prop, Some(house), at);
    }
    b.push(
        "Roof".into(),
        UNTAGGED,
        ObjectKind::Prop,
        Some(house),
        Vec3::Y * config.wall_height,
    );

    b.push(
        "MainCamera".into(),
        UNTAGGED,
        ObjectKind::Camera,
        None,
        Vec3::new(0.0, h * 1.5, -h * 1.5),
    );
    b.push("Sun".into(), UNTAGGED, ObjectKind::Light, None, Vec3::Y * 10.0);
    b.push("Player1".into(), "Player", ObjectKind::Player, None, Vec3::new(-3.0, 0.0, 0.0));
    b.push("Player2".into(), "Player", ObjectKind::Player, None, Vec3::new(3.0, 0.0, 0.0));

    // Rooms split the footprint into strips along x.
    let room_count = config.room_count.max(1);
    let strip = 2.0 * h / room_count as f32;
    let rooms: Vec<(ObjectId, f32)> = (0..room_count)
        .map(|i| {
            let center_x = -h + strip * (i as f32 + 0.5);
            let room = b.push(
                format!("Room{}", i + 1),
                GROUP_TAG,
                ObjectKind::Prop,
                Some(house),
                Vec3::new(center_x, 0.0, 0.0),
            );
            (room.id, center_x)
        })
        .collect();

    let inner = (strip * 0.5 - 0.5).max(0.1);
    for i in 0..config.prop_count {
        let (tag, names): (&str, &[&str]) = match rng.random_range(0..3) {
            0 => ("Furniture", &FURNITURE[..]),
            1 => ("Decoration", &DECORATION[..]),
            _ => ("Prop", &PROPS[..]),
        };
        let base = names[rng.random_range(0..names.len())];
        let tag = if rng.random_bool(config.untagged_chance.clamp(0.0, 1.0)) {
            UNTAGGED
        } else {
            tag
        };
        let (room, center_x) = rooms[rng.random_range(0..rooms.len())];
        let at = Vec3::new(
            center_x + rng.random_range(-inner..=inner),
            if tag == "Decoration" {
                rng.random_range(0.0..1.5)
            } else {
                0.0
            },
            rng.random_range(-(h - 0.5)..=(h - 0.5)),
        );
        let rotation = Quat::from_rotation_y(rng.random_range(0.0..TAU));
        let body = if rng.random_bool(config.body_chance.clamp(0.0, 1.0)) {
            Some(BodySpec {
                mass: rng.random_range(0.5..20.0),
            })
        } else {
            None
        };
        let prop = b.push(format!("{base}{}", i + 1), tag, ObjectKind::Prop, Some(room), at);
        prop.transform.rotation = rotation;
        prop.body = body;
    }

    tracing::debug!(seed, objects = b.objects.len(), "arena generated");
    b.objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hazard::TargetFilter;

    #[test]
    fn deterministic_generation() {
        let config = ArenaConfig::default();
        assert_eq!(generate_arena(42, &config), generate_arena(42, &config));
    }

    #[test]
    fn different_seeds_differ() {
        let config = ArenaConfig::default();
        assert_ne!(generate_arena(1, &config), generate_arena(2, &config));
    }

    #[test]
    fn ids_are_unique() {
        let objects = generate_arena(7, &ArenaConfig::default());
        let mut ids: Vec<ObjectId> = objects.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), objects.len());
    }

    #[test]
    fn every_prop_is_a_target_and_nothing_else() {
        let config = ArenaConfig::default();
        let filter = TargetFilter::default();
        for seed in 0..20 {
            let objects = generate_arena(seed, &config);
            let targets = objects.iter().filter(|o| filter.accepts(o)).count();
            assert_eq!(targets as u32, config.prop_count, "seed {seed}");
        }
    }

    #[test]
    fn props_stay_inside_the_house() {
        let config = ArenaConfig::default();
        let filter = TargetFilter::default();
        for seed in 0..20 {
            for o in generate_arena(seed, &config).iter().filter(|o| filter.accepts(o)) {
                let p = o.transform.translation;
                assert!(p.x.abs() < config.half_extent, "{} at {p}", o.name);
                assert!(p.z.abs() < config.half_extent, "{} at {p}", o.name);
                assert!(p.y >= 0.0);
            }
        }
    }

    #[test]
    fn some_props_declare_bodies() {
        let objects = generate_arena(3, &ArenaConfig::default());
        assert!(objects.iter().any(|o| o.body.is_some()));
        assert!(objects.iter().any(|o| o.kind == ObjectKind::Prop && o.body.is_none()));
    }
}
