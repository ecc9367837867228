//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No asset, audio or storage dependencies

pub mod adversary;
pub mod animation;
pub mod body;
pub mod effects;
pub mod geometry;
pub mod interaction;
pub mod mask;
pub mod observe;
pub mod player;
pub mod state;
pub mod tick;
pub mod track;
pub mod world;

pub use adversary::{Attacker, MobStatus, Pursuer, PursuerStatus, RoamingMob, Species, SpeciesInfo};
pub use animation::{AnimationProvider, Animator, Category, Frame, SolidMasks};
pub use body::KinematicBody;
pub use effects::{Effect, EffectTimers};
pub use geometry::Rect;
pub use interaction::{DeathOutcome, resolve_interactions, resolve_stomp, trigger_death};
pub use mask::CollisionMask;
pub use observe::{OBSERVATION_SIZE, Observation, Surroundings, observation, scan_surroundings};
pub use player::{PlayerController, PlayerStatus};
pub use state::{DeathCause, Foe, GameEvent, GamePhase, GameState, RunStats};
pub use tick::{Action, TickInput, tick};
pub use track::{Biome, Chunk, Pattern, SpawnContext, TrackGenerator, biome_at};
pub use world::{Collectible, CollectibleKind, Decoration, DecorKind, Hazard, HazardKind, Segment, SegmentKind, World};
