//! Pointer picking against the card ring.
//!
//! Every hit-testable piece of a card is a [`HitPart`] that carries the id of
//! the card that owns it, so the nearest hit resolves to a card directly
//! instead of walking a scene hierarchy. Parts are tested in card-local space:
//! the world ray is mapped through the vault yaw, the card placement, basis and
//! scale. The local direction is left unnormalized so hit distances stay in
//! world units and can be compared across cards.

use std::ops::Range;

use crate::camera::Ray;
use crate::config::CardGeometry;
use crate::entity::{Entity, EntityId, EntityRegistry};
use crate::vec3::{add, along, dot, length, rotate_y, scale, sub, vec3, Vec3};

/// Which piece of a card was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    Pane,
    FrontImage,
    BackImage,
    FrontHolo,
    BackHolo,
    Bracket,
}

/// Card-local hit geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitShape {
    /// Box centred on the card origin. Only its outer faces are hit.
    Box { half: Vec3 },
    /// Square in the XY plane at height `z`, visible only from the side
    /// `facing` points to (+1.0 = +Z, -1.0 = -Z).
    Quad { z: f64, facing: f64, half: f64 },
    /// Line segment, hit within the line pick threshold.
    Segment { a: Vec3, b: Vec3 },
}

impl HitShape {
    /// Distance from the card origin to the farthest point of the shape.
    fn extent(&self) -> f64 {
        match *self {
            HitShape::Box { half } => length(half),
            HitShape::Quad { z, half, .. } => (2.0 * half * half + z * z).sqrt(),
            HitShape::Segment { a, b } => length(a).max(length(b)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitPart {
    pub owner: EntityId,
    pub kind: PartKind,
    pub shape: HitShape,
}

/// Nearest intersection resolved to its owning card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub entity: EntityId,
    pub kind: PartKind,
    /// Distance along the world ray
    pub distance: f64,
}

/// The hit-testable parts of one card: glass pane, front and back image
/// planes, front and back holo overlays and four corner brackets.
pub fn card_parts(owner: EntityId, card: &CardGeometry) -> Vec<HitPart> {
    let image_half = card.image_size * 0.5;
    let mut parts = vec![
        HitPart {
            owner,
            kind: PartKind::Pane,
            shape: HitShape::Box {
                half: vec3(
                    card.pane_size * 0.5,
                    card.pane_size * 0.5,
                    card.pane_depth * 0.5,
                ),
            },
        },
        HitPart {
            owner,
            kind: PartKind::FrontImage,
            shape: HitShape::Quad {
                z: card.image_offset,
                facing: 1.0,
                half: image_half,
            },
        },
        HitPart {
            owner,
            kind: PartKind::BackImage,
            shape: HitShape::Quad {
                z: -card.image_offset,
                facing: -1.0,
                half: image_half,
            },
        },
        HitPart {
            owner,
            kind: PartKind::FrontHolo,
            shape: HitShape::Quad {
                z: card.holo_offset,
                facing: 1.0,
                half: image_half,
            },
        },
        HitPart {
            owner,
            kind: PartKind::BackHolo,
            shape: HitShape::Quad {
                z: -card.holo_offset,
                facing: -1.0,
                half: image_half,
            },
        },
    ];

    let h = card.bracket_size * 0.5;
    let arm = card.bracket_arm;
    for (cx, cy) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
        let p0 = vec3(cx * (h - arm), cy * h, 0.0);
        let p1 = vec3(cx * h, cy * h, 0.0);
        let p2 = vec3(cx * h, cy * (h - arm), 0.0);
        for (a, b) in [(p0, p1), (p1, p2)] {
            parts.push(HitPart {
                owner,
                kind: PartKind::Bracket,
                shape: HitShape::Segment { a, b },
            });
        }
    }
    parts
}

/// Flat list of hit parts grouped by owner, with a per-owner bounding radius.
#[derive(Debug, Clone, Default)]
pub struct HitIndex {
    parts: Vec<HitPart>,
    /// (owner, part range, card-local bounding radius)
    spans: Vec<(EntityId, Range<usize>, f64)>,
}

impl HitIndex {
    /// Index the standard card composition for every registered card.
    pub fn build(registry: &EntityRegistry, card: &CardGeometry) -> Self {
        let parts = registry
            .ids()
            .flat_map(|id| card_parts(id, card))
            .collect();
        Self::from_parts(parts)
    }

    /// Index an arbitrary set of parts.
    pub fn from_parts(mut parts: Vec<HitPart>) -> Self {
        parts.sort_by_key(|p| p.owner);
        let mut spans: Vec<(EntityId, Range<usize>, f64)> = Vec::new();
        for (i, part) in parts.iter().enumerate() {
            let extent = part.shape.extent();
            let same_owner =
                matches!(spans.last(), Some((owner, _, _)) if *owner == part.owner);
            if same_owner {
                if let Some((_, range, radius)) = spans.last_mut() {
                    range.end = i + 1;
                    *radius = radius.max(extent);
                }
            } else {
                spans.push((part.owner, i..i + 1, extent));
            }
        }
        Self { parts, spans }
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn parts(&self) -> &[HitPart] {
        &self.parts
    }

    /// Parts owned by one card.
    pub fn parts_of(&self, id: EntityId) -> &[HitPart] {
        self.spans
            .iter()
            .find(|(owner, _, _)| *owner == id)
            .map(|(_, range, _)| &self.parts[range.clone()])
            .unwrap_or(&[])
    }
}

/// Nearest card under the ray, or `None`.
///
/// `vault_yaw` is the ring rotation this frame; `line_threshold` is the
/// bracket pick distance in world units. Cards with non-finite animation state
/// are skipped.
pub fn pick(
    ray: &Ray,
    registry: &EntityRegistry,
    index: &HitIndex,
    vault_yaw: f64,
    line_threshold: f64,
) -> Option<Hit> {
    pick_inner(ray, registry, index, vault_yaw, line_threshold, true)
}

fn pick_inner(
    ray: &Ray,
    registry: &EntityRegistry,
    index: &HitIndex,
    vault_yaw: f64,
    line_threshold: f64,
    bounding_prepass: bool,
) -> Option<Hit> {
    let mut best: Option<Hit> = None;

    for (owner, range, radius) in &index.spans {
        let Some(entity) = registry.get(*owner) else {
            continue;
        };
        if !entity.is_sane() || entity.scale() <= 0.0 {
            continue;
        }

        if bounding_prepass {
            let centre = rotate_y(entity.position(), vault_yaw);
            let world_radius = entity.scale() * radius + line_threshold;
            if !ray_hits_sphere(ray, centre, world_radius) {
                continue;
            }
        }

        let local = to_card_local(ray, entity, vault_yaw);
        for part in &index.parts[range.clone()] {
            let t = match part.shape {
                HitShape::Box { half } => intersect_box(&local, half),
                HitShape::Quad { z, facing, half } => intersect_quad(&local, z, facing, half),
                HitShape::Segment { a, b } => {
                    intersect_segment(&local, a, b, line_threshold / entity.scale())
                }
            };
            if let Some(t) = t {
                if best.map_or(true, |b| t < b.distance) {
                    best = Some(Hit {
                        entity: part.owner,
                        kind: part.kind,
                        distance: t,
                    });
                }
            }
        }
    }
    best
}

/// Map a world ray into card-local space without renormalizing the direction.
fn to_card_local(ray: &Ray, entity: &Entity, vault_yaw: f64) -> Ray {
    let [bx, by, bz] = entity.basis();
    let inv_scale = 1.0 / entity.scale();
    let project = |v: Vec3| vec3(dot(v, bx), dot(v, by), dot(v, bz));

    let origin = sub(rotate_y(ray.origin, -vault_yaw), entity.position());
    let dir = rotate_y(ray.dir, -vault_yaw);
    Ray {
        origin: scale(project(origin), inv_scale),
        dir: scale(project(dir), inv_scale),
    }
}

fn ray_hits_sphere(ray: &Ray, centre: Vec3, radius: f64) -> bool {
    let oc = sub(ray.origin, centre);
    let b = dot(oc, ray.dir);
    let c = dot(oc, oc) - radius * radius;
    if c <= 0.0 {
        return true;
    }
    b < 0.0 && b * b - c >= 0.0
}

fn intersect_quad(ray: &Ray, z: f64, facing: f64, half: f64) -> Option<f64> {
    // Single-sided: the ray must travel against the quad normal.
    if ray.dir.z * facing >= 0.0 {
        return None;
    }
    let t = (z - ray.origin.z) / ray.dir.z;
    if t <= 0.0 {
        return None;
    }
    let p = along(ray.origin, ray.dir, t);
    (p.x.abs() <= half && p.y.abs() <= half).then_some(t)
}

fn intersect_box(ray: &Ray, half: Vec3) -> Option<f64> {
    let mut t_near = f64::NEG_INFINITY;
    let mut t_far = f64::INFINITY;
    for axis in 0..3 {
        let o = ray.origin.axis(axis);
        let d = ray.dir.axis(axis);
        let h = half.axis(axis);
        if d.abs() < 1e-12 {
            if o.abs() > h {
                return None;
            }
            continue;
        }
        let t1 = (-h - o) / d;
        let t2 = (h - o) / d;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
    }
    // Entry face only: an origin inside the box sees back faces and misses.
    (t_near <= t_far && t_near > 0.0).then_some(t_near)
}

/// Closest approach between the ray and segment `a..b`. `threshold` is card-local.
fn intersect_segment(ray: &Ray, a: Vec3, b: Vec3, threshold: f64) -> Option<f64> {
    let e = sub(b, a);
    let r = sub(ray.origin, a);
    let dd = dot(ray.dir, ray.dir);
    let ee = dot(e, e);
    let de = dot(ray.dir, e);
    let dr = dot(ray.dir, r);
    let er = dot(e, r);

    if dd < 1e-18 {
        return None;
    }

    // t parametrises the ray, s the segment.
    let (t, s) = if ee < 1e-18 {
        ((-dr / dd).max(0.0), 0.0)
    } else {
        let denom = dd * ee - de * de;
        let t = if denom > 1e-18 {
            ((de * er - dr * ee) / denom).max(0.0)
        } else {
            0.0
        };
        let s = (de * t + er) / ee;
        if s < 0.0 {
            ((-dr / dd).max(0.0), 0.0)
        } else if s > 1.0 {
            (((de - dr) / dd).max(0.0), 1.0)
        } else {
            (t, s)
        }
    };

    if t <= 0.0 {
        return None;
    }
    let on_ray = along(ray.origin, ray.dir, t);
    let on_segment = add(a, scale(e, s));
    (length(sub(on_ray, on_segment)) <= threshold).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VaultConfig;
    use crate::source::SourceItem;
    use crate::vec3::normalize;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn registry(n: usize) -> (EntityRegistry, VaultConfig) {
        let config = VaultConfig::default();
        let sources: Vec<SourceItem> = (0..n)
            .map(|i| SourceItem::new(format!("{i}.png")).with_label(format!("CARD_{i}")))
            .collect();
        (EntityRegistry::from_sources(&sources, &config), config)
    }

    /// Ray travelling along -X at the height of the card ring.
    fn ray_from_outside_card0(config: &VaultConfig) -> Ray {
        Ray {
            origin: vec3(30.0, config.base_y, 0.0),
            dir: vec3(-1.0, 0.0, 0.0),
        }
    }

    #[test]
    fn card_has_all_parts() {
        let parts = card_parts(EntityId(3), &CardGeometry::default());
        assert_eq!(parts.len(), 5 + 8);
        assert!(parts.iter().all(|p| p.owner == EntityId(3)));
        assert_eq!(
            parts.iter().filter(|p| p.kind == PartKind::Bracket).count(),
            8
        );
    }

    #[test]
    fn back_plane_hit_resolves_to_owner() {
        let (reg, config) = registry(2);
        let back_only: Vec<HitPart> = card_parts(EntityId(0), &config.card)
            .into_iter()
            .filter(|p| p.kind == PartKind::BackImage)
            .collect();
        let index = HitIndex::from_parts(back_only);

        let hit = pick(&ray_from_outside_card0(&config), &reg, &index, 0.0, 1.0).unwrap();
        assert_eq!(hit.entity, EntityId(0));
        assert_eq!(hit.kind, PartKind::BackImage);
        assert!((hit.distance - (15.0 - config.card.image_offset)).abs() < 1e-9);
    }

    #[test]
    fn nearest_part_wins_from_behind() {
        let (reg, config) = registry(2);
        let index = HitIndex::build(&reg, &config.card);
        let hit = pick(&ray_from_outside_card0(&config), &reg, &index, 0.0, 1.0).unwrap();
        assert_eq!(hit.entity, EntityId(0));
        assert_eq!(hit.kind, PartKind::BackHolo);
    }

    #[test]
    fn nearest_card_wins_when_ray_crosses_two() {
        let (reg, config) = registry(2);
        let index = HitIndex::build(&reg, &config.card);
        let ray = Ray {
            origin: vec3(-30.0, config.base_y, 0.0),
            dir: vec3(1.0, 0.0, 0.0),
        };
        assert_eq!(pick(&ray, &reg, &index, 0.0, 1.0).unwrap().entity, EntityId(1));
    }

    #[test]
    fn front_plane_is_seen_from_the_ring_centre() {
        let (reg, config) = registry(1);
        let front_only: Vec<HitPart> = card_parts(EntityId(0), &config.card)
            .into_iter()
            .filter(|p| p.kind == PartKind::FrontImage)
            .collect();
        let index = HitIndex::from_parts(front_only);

        let from_centre = Ray {
            origin: vec3(0.0, config.base_y, 0.0),
            dir: vec3(1.0, 0.0, 0.0),
        };
        assert!(pick(&from_centre, &reg, &index, 0.0, 1.0).is_some());
        // Single-sided: the same plane is invisible from outside the ring.
        assert!(pick(&ray_from_outside_card0(&config), &reg, &index, 0.0, 1.0).is_none());
    }

    #[test]
    fn vault_yaw_moves_the_cards() {
        let (reg, config) = registry(1);
        let index = HitIndex::build(&reg, &config.card);
        let ray = ray_from_outside_card0(&config);
        assert!(pick(&ray, &reg, &index, 0.0, 1.0).is_some());
        assert!(pick(&ray, &reg, &index, std::f64::consts::FRAC_PI_2, 1.0).is_none());

        // A quarter turn carries card 0 from +X to -Z.
        let turned = Ray {
            origin: vec3(0.0, config.base_y, -30.0),
            dir: vec3(0.0, 0.0, 1.0),
        };
        assert!(pick(&turned, &reg, &index, std::f64::consts::FRAC_PI_2, 1.0).is_some());
    }

    #[test]
    fn bracket_threshold_extends_pick_area() {
        let (reg, config) = registry(1);
        let index = HitIndex::build(&reg, &config.card);
        // Local +X is world +Z for card 0; local +Y is world +Y.
        let near_corner = Ray {
            origin: vec3(30.0, config.base_y + 2.5, 2.5),
            dir: vec3(-1.0, 0.0, 0.0),
        };
        let hit = pick(&near_corner, &reg, &index, 0.0, 1.0).unwrap();
        assert_eq!(hit.kind, PartKind::Bracket);

        let far = Ray {
            origin: vec3(30.0, config.base_y + 3.5, 3.5),
            dir: vec3(-1.0, 0.0, 0.0),
        };
        assert!(pick(&far, &reg, &index, 0.0, 1.0).is_none());
        assert!(pick(&near_corner, &reg, &index, 0.0, 0.0).is_none());
    }

    #[test]
    fn scaled_card_is_bigger_target() {
        let (mut reg, config) = registry(1);
        let index = HitIndex::build(&reg, &config.card);
        let edge = Ray {
            origin: vec3(30.0, config.base_y, 2.2),
            dir: vec3(-1.0, 0.0, 0.0),
        };
        assert!(pick(&edge, &reg, &index, 0.0, 0.0).is_none());
        reg.get_mut(EntityId(0)).unwrap().scale = 1.25;
        assert!(pick(&edge, &reg, &index, 0.0, 0.0).is_some());
    }

    #[test]
    fn ray_pointing_away_misses() {
        let (reg, config) = registry(4);
        let index = HitIndex::build(&reg, &config.card);
        let ray = Ray {
            origin: vec3(0.0, 40.0, 0.0),
            dir: vec3(0.0, 1.0, 0.0),
        };
        assert!(pick(&ray, &reg, &index, 0.3, 1.0).is_none());
    }

    #[test]
    fn corrupt_card_is_skipped() {
        let (mut reg, config) = registry(2);
        let index = HitIndex::build(&reg, &config.card);
        reg.get_mut(EntityId(0)).unwrap().y_offset = f64::NAN;
        let hit = pick(&ray_from_outside_card0(&config), &reg, &index, 0.0, 1.0);
        // Card 0 is skipped; the ray continues on to card 1 across the ring.
        assert_eq!(hit.map(|h| h.entity), Some(EntityId(1)));
    }

    #[test]
    fn empty_registry_never_picks() {
        let (reg, config) = registry(0);
        let index = HitIndex::build(&reg, &config.card);
        assert!(index.is_empty());
        assert!(pick(&ray_from_outside_card0(&config), &reg, &index, 0.0, 1.0).is_none());
    }

    #[test]
    fn parts_of_returns_owner_span() {
        let (reg, config) = registry(3);
        let index = HitIndex::build(&reg, &config.card);
        assert_eq!(index.len(), 3 * 13);
        assert!(index
            .parts_of(EntityId(1))
            .iter()
            .all(|p| p.owner == EntityId(1)));
        assert!(index.parts_of(EntityId(9)).is_empty());
    }

    #[test]
    fn bounding_prepass_matches_brute_force() {
        let (mut reg, config) = registry(8);
        for (i, e) in reg.iter_mut().enumerate() {
            e.scale = 1.0 + 0.03 * i as f64;
            e.y_offset = 0.4 * (i as f64).sin();
        }
        let index = HitIndex::build(&reg, &config.card);
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut hits = 0;
        for _ in 0..3000 {
            let origin = vec3(
                rng.gen_range(-30.0..30.0),
                rng.gen_range(-5.0..8.0),
                rng.gen_range(-30.0..30.0),
            );
            let target = vec3(
                rng.gen_range(-16.0..16.0),
                rng.gen_range(-2.0..4.0),
                rng.gen_range(-16.0..16.0),
            );
            let ray = Ray {
                origin,
                dir: normalize(sub(target, origin)),
            };
            let yaw = rng.gen_range(0.0..6.28);
            let fast = pick_inner(&ray, &reg, &index, yaw, 1.0, true);
            let slow = pick_inner(&ray, &reg, &index, yaw, 1.0, false);
            assert_eq!(fast, slow);
            hits += fast.is_some() as usize;
        }
        assert!(hits > 0);
    }
}
