//! Scene state and the voxel placer.
//!
//! The scene is append-only for the life of a session: voxels are created by
//! [`VoxelPlacer::place`] and never moved, merged or removed.

use glam::{IVec3, Vec3};
use tracing::warn;

/// Round to the nearest integer with ties toward +∞ (`2.5 → 3`, `-2.5 → -2`).
///
/// `v - floor(v)` is exact, unlike `v + 0.5`, which can itself round up.
pub fn round_half_up(v: f32) -> i32 {
    let f = v.floor();
    (if v - f >= 0.5 { f + 1.0 } else { f }) as i32
}

// ════════════════════════════════════════════════════════════════════════════
// Voxel
// ════════════════════════════════════════════════════════════════════════════

/// A cube placed at an integer grid position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voxel {
    pub position: IVec3,
    /// Edge length in world units.
    pub size:     f32,
    /// Packed `0xAARRGGBB`.
    pub color:    u32,
}

// ════════════════════════════════════════════════════════════════════════════
// Environment — fixed scene furniture
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color:     u32,
    pub intensity: f32,
    /// The light shines from here toward the origin.
    pub position:  Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from the scene toward the light.
    pub fn direction(&self) -> Vec3 {
        self.position.normalize_or_zero()
    }
}

/// Square reference grid on the XZ plane, centred on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridHelper {
    pub size:      f32,
    pub divisions: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    pub light:       DirectionalLight,
    pub grid:        GridHelper,
    pub clear_color: u32,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            light: DirectionalLight {
                color:     0xFFFFFFFF,
                intensity: 1.0,
                position:  Vec3::new(5.0, 5.0, 5.0),
            },
            grid:        GridHelper { size: 10.0, divisions: 10 },
            clear_color: 0xFF111111,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Scene
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct Scene {
    voxels:      Vec<Voxel>,
    environment: Environment,
    /// Optional hard cap on voxel count; `None` = unbounded.
    capacity:    Option<usize>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn with_capacity_limit(limit: usize) -> Self {
        Scene { capacity: Some(limit), ..Scene::default() }
    }

    pub fn voxels(&self) -> &[Voxel] { &self.voxels }
    pub fn len(&self) -> usize { self.voxels.len() }
    pub fn is_empty(&self) -> bool { self.voxels.is_empty() }
    pub fn environment(&self) -> &Environment { &self.environment }
    pub fn capacity(&self) -> Option<usize> { self.capacity }

    fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.voxels.len() >= cap)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// VoxelPlacer
// ════════════════════════════════════════════════════════════════════════════

pub const DEFAULT_VOXEL_SIZE:  f32 = 1.0;
pub const DEFAULT_VOXEL_COLOR: u32 = 0xFF00FF00;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelPlacer {
    pub size:  f32,
    pub color: u32,
}

impl Default for VoxelPlacer {
    fn default() -> Self {
        VoxelPlacer { size: DEFAULT_VOXEL_SIZE, color: DEFAULT_VOXEL_COLOR }
    }
}

impl VoxelPlacer {
    /// Round `world` per axis and append a new voxel there.
    ///
    /// Existing voxels at the same position are not checked: placing twice
    /// yields two entries.  Returns `None` only when the scene has a capacity
    /// limit and it has been reached.
    pub fn place(&self, scene: &mut Scene, world: Vec3) -> Option<Voxel> {
        if scene.is_full() {
            warn!(
                capacity = scene.capacity.unwrap_or_default(),
                "scene full, dropping placement at ({:.2}, {:.2}, {:.2})",
                world.x, world.y, world.z
            );
            return None;
        }
        let voxel = Voxel {
            position: IVec3::new(
                round_half_up(world.x),
                round_half_up(world.y),
                round_half_up(world.z),
            ),
            size:  self.size,
            color: self.color,
        };
        scene.voxels.push(voxel);
        Some(voxel)
    }
}
