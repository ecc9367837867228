//! Per-frame interaction resolution
//!
//! Runs after all physics. This is the only place that destroys entities or
//! changes player resources in response to contact. Rules are applied in a
//! fixed order and the first applicable rule wins for each pair:
//!
//! 1. Roaming mobs: stomp, else contact (shield kill or damage)
//! 2. Attackers: stomp, else contact (shield kill or strike)
//! 3. Hazards: shield smash or side-contact slow
//! 4. Collectibles inside the collection margin
//! 5. Pursuer contact: knockback or capture
//! 6. Attackers running into hearts
//! 7. Standing death conditions (health, withdrawal, death plane)
//!
//! A death trigger (or a shield spent to cancel one) ends the pass.

use glam::Vec2;

use super::adversary::RoamingMob;
use super::animation::{AnimationProvider, Category};
use super::body::KinematicBody;
use super::geometry::Rect;
use super::mask::{masks_collide, placed_rect};
use super::player::PlayerController;
use super::state::{DeathCause, Foe, GameEvent, GameState};
use super::world::{CollectibleKind, SegmentKind};
use crate::consts::{AERIAL_CONTACT_INSET, COLLECT_MARGIN, SHIELD_KILL_SCORE};

/// A grounded player this close below a mob's center still counts as landing on it
pub const LANDED_SLACK: f32 = 35.0;
/// Hazard overlap deeper than this below its top is a side hit
pub const HAZARD_SIDE_TOLERANCE: f32 = 20.0;

/// Result of a death trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathOutcome {
    /// The run is over
    Triggered,
    /// A shield was spent instead
    ShieldSaved,
    /// A shield was already spent this frame; the trigger is ignored
    Absorbed,
    /// Death was already triggered earlier
    AlreadyTriggered,
}

/// Arbitrate a lethal condition.
///
/// The first trigger in a frame either ends the run or spends the shield.
/// Further triggers in the same frame after a shield save are absorbed.
pub fn trigger_death(state: &mut GameState, cause: DeathCause) -> DeathOutcome {
    if state.death_triggered {
        return DeathOutcome::AlreadyTriggered;
    }
    if state.shield_saved_frame == Some(state.frame) {
        return DeathOutcome::Absorbed;
    }
    if state.player.consume_shield() {
        state.shield_saved_frame = Some(state.frame);
        lift_death_condition(state, cause);
        state.events.push(GameEvent::ShieldSaved);
        log::debug!("Shield absorbed {} at frame {}", cause.as_str(), state.frame);
        return DeathOutcome::ShieldSaved;
    }

    state.death_triggered = true;
    state.death_cause = Some(cause);
    state.player.body.set_direction(0);
    if cause == DeathCause::Arrested {
        state.pursuer.capture();
    } else {
        state.pursuer.halt();
    }
    state.events.push(GameEvent::DeathTriggered(cause));
    log::info!(
        "Death triggered: {} at distance {} (frame {})",
        cause.as_str(),
        state.distance,
        state.frame
    );
    DeathOutcome::Triggered
}

/// Undo the condition a shield just cancelled so it does not fire again next frame
fn lift_death_condition(state: &mut GameState, cause: DeathCause) {
    match cause {
        DeathCause::Wasted | DeathCause::Overdose => state.player.shield_rescue(),
        DeathCause::Fell => {
            let player = &mut state.player.body;
            let cx = player.rect.center_x();
            let landing = state
                .world
                .segments
                .iter()
                .filter(|s| s.kind == SegmentKind::Ground && s.rect.right() > cx)
                .min_by(|a, b| a.rect.left().total_cmp(&b.rect.left()));
            if let Some(seg) = landing {
                let x = cx.max(seg.rect.left() + player.rect.w / 2.0);
                player.rect.set_midbottom(Vec2::new(x, seg.rect.top()));
                player.velocity_y = 0.0;
                player.grounded = true;
            }
        }
        DeathCause::Arrested => state.pursuer.knock_back(),
    }
}

/// Whether the player lands on `target` this frame
pub fn stomp_applies(player: &PlayerController, target: &Rect, stomp_line: f32) -> bool {
    let body = &player.body;
    let descending = body.velocity_y > 0.0
        || (body.grounded && body.rect.bottom() <= target.center_y() + LANDED_SLACK);
    descending && body.rect.overlaps(target) && body.rect.bottom() < stomp_line
}

/// Apply the stomp rule to one mob. Destroyed or missing mobs are ignored,
/// so resolving the same mob twice has no further effect.
pub fn resolve_stomp(state: &mut GameState, mob_id: u32) -> bool {
    let Some(mob) = state.world.mobs.iter_mut().find(|m| m.id == mob_id) else {
        return false;
    };
    if !mob.alive || !stomp_applies(&state.player, &mob.body.rect, mob.stomp_line()) {
        return false;
    }
    mob.alive = false;
    let foe = Foe::Mob(mob.species);
    state.player.bounce();
    state.stats.record_kill(foe);
    state.events.push(GameEvent::Stomped(foe));
    true
}

/// Inset-rectangle contact used for aerial foes
pub fn aerial_contact(player: &Rect, other: &Rect) -> bool {
    player
        .inflate(-AERIAL_CONTACT_INSET, -AERIAL_CONTACT_INSET)
        .overlaps(other)
}

/// Pixel contact between two animated bodies, falling back to the hitboxes
/// when either side has no frame to sample
pub fn mask_contact(
    animations: &dyn AnimationProvider,
    a: (Category, &str, &KinematicBody),
    b: (Category, &str, &KinematicBody),
) -> bool {
    let (a_cat, a_status, a_body) = a;
    let (b_cat, b_status, b_body) = b;
    let a_frame = a_body.animator.current(animations.frames(a_cat, a_status));
    let b_frame = b_body.animator.current(animations.frames(b_cat, b_status));
    match (a_frame, b_frame) {
        (Some(fa), Some(fb)) => {
            let a_rect = placed_rect(&a_body.rect, &fa.mask, fa.offset);
            let b_rect = placed_rect(&b_body.rect, &fb.mask, fb.offset);
            masks_collide(&a_rect, &fa.mask, &b_rect, &fb.mask)
        }
        _ => a_body.rect.overlaps(&b_body.rect),
    }
}

fn mob_contact(animations: &dyn AnimationProvider, player: &PlayerController, mob: &RoamingMob) -> bool {
    if mob.is_aerial() {
        aerial_contact(&player.body.rect, &mob.body.rect)
    } else {
        mask_contact(
            animations,
            (Category::Player, player.status.as_str(), &player.body),
            (Category::Mob(mob.species), mob.status().as_str(), &mob.body),
        )
    }
}

fn shield_kill(state: &mut GameState, foe: Foe) {
    state.bonus_score += SHIELD_KILL_SCORE;
    state.stats.record_kill(foe);
    state.events.push(GameEvent::ShieldKill(foe));
}

/// Apply one point of damage. Returns true if the frame ended in a death trigger.
fn damage_player(state: &mut GameState) -> bool {
    let before = state.player.health;
    let lethal = state.player.take_damage(1);
    if state.player.health < before {
        state.events.push(GameEvent::Damaged(state.player.health));
    }
    lethal && trigger_death(state, DeathCause::Wasted) != DeathOutcome::Absorbed
}

fn resolve_mobs(state: &mut GameState, animations: &dyn AnimationProvider) -> bool {
    for i in 0..state.world.mobs.len() {
        if !state.world.mobs[i].alive {
            continue;
        }
        let id = state.world.mobs[i].id;
        if resolve_stomp(state, id) {
            continue;
        }
        let mob = &state.world.mobs[i];
        if !mob_contact(animations, &state.player, mob) {
            continue;
        }
        let foe = Foe::Mob(mob.species);
        if state.player.has_shield() {
            state.world.mobs[i].alive = false;
            shield_kill(state, foe);
            continue;
        }
        if damage_player(state) {
            return true;
        }
    }
    false
}

fn resolve_attackers(state: &mut GameState) -> bool {
    for i in 0..state.world.attackers.len() {
        let attacker = &state.world.attackers[i];
        if !attacker.alive {
            continue;
        }

        if !attacker.is_flashing() && stomp_applies(&state.player, &attacker.body.rect, attacker.stomp_line()) {
            state.world.attackers[i].alive = false;
            state.player.bounce();
            state.stats.record_kill(Foe::Attacker);
            state.events.push(GameEvent::Stomped(Foe::Attacker));
            continue;
        }

        if !aerial_contact(&state.player.body.rect, &attacker.body.rect) {
            continue;
        }
        if state.player.has_shield() {
            state.world.attackers[i].alive = false;
            shield_kill(state, Foe::Attacker);
            continue;
        }
        if !attacker.can_engage() || state.player.is_invincible() || state.player.god_mode {
            continue;
        }

        state.world.attackers[i].strike();
        state.events.push(GameEvent::AttackerStruck);
        if damage_player(state) {
            return true;
        }
    }
    false
}

fn resolve_hazards(state: &mut GameState) {
    let rect = state.player.body.rect;
    for hazard in state.world.hazards.iter_mut() {
        if !hazard.alive || !rect.overlaps(&hazard.rect) {
            continue;
        }
        if state.player.has_shield() {
            hazard.alive = false;
            state.events.push(GameEvent::HazardSmashed);
            continue;
        }
        if rect.bottom() > hazard.rect.top() + HAZARD_SIDE_TOLERANCE && state.player.apply_slow() {
            state.events.push(GameEvent::Slowed);
        }
    }
}

fn resolve_collectibles(state: &mut GameState) {
    let reach = state
        .player
        .body
        .rect
        .inflate(COLLECT_MARGIN * 2.0, COLLECT_MARGIN * 2.0);
    for item in state.world.collectibles.iter_mut() {
        if !item.alive || !reach.overlaps(&item.rect) {
            continue;
        }
        item.alive = false;
        match item.kind {
            CollectibleKind::Weed => state.player.collect_weed(state.tuning.weed_relief),
            CollectibleKind::Heart => {
                state.player.heal();
                state.stats.hearts += 1;
            }
            kind => state.player.activate_powerup(kind),
        }
        state.events.push(GameEvent::Collected(item.kind));
    }
}

fn resolve_pursuer(state: &mut GameState, animations: &dyn AnimationProvider) -> bool {
    if state.player.god_mode || state.pursuer.captured {
        return false;
    }
    let touching = mask_contact(
        animations,
        (Category::Player, state.player.status.as_str(), &state.player.body),
        (Category::Pursuer, state.pursuer.status.as_str(), &state.pursuer.body),
    );
    if !touching {
        return false;
    }
    if state.player.has_shield() {
        state.pursuer.knock_back();
        state.events.push(GameEvent::PursuerRepelled);
        false
    } else if !state.player.is_invincible() {
        trigger_death(state, DeathCause::Arrested) != DeathOutcome::Absorbed
    } else {
        false
    }
}

fn resolve_heart_snatch(state: &mut GameState) {
    for attacker in state.world.attackers.iter_mut().filter(|a| a.alive) {
        let heart = state
            .world
            .collectibles
            .iter_mut()
            .find(|c| c.alive && c.kind == CollectibleKind::Heart && c.rect.overlaps(&attacker.body.rect));
        if let Some(heart) = heart {
            heart.alive = false;
            attacker.alive = false;
            state.events.push(GameEvent::AttackerDowned);
        }
    }
}

/// Reconcile the player against everything it touches this frame
pub fn resolve_interactions(state: &mut GameState, animations: &dyn AnimationProvider) {
    if state.death_triggered {
        return;
    }
    if resolve_mobs(state, animations) || resolve_attackers(state) {
        return;
    }
    resolve_hazards(state);
    resolve_collectibles(state);
    if resolve_pursuer(state, animations) {
        return;
    }
    resolve_heart_snatch(state);
    if let Some(cause) = state.player.death_cause() {
        trigger_death(state, cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FLOOR_Y, SIM_DT};
    use crate::sim::adversary::{Attacker, Species};
    use crate::sim::animation::SolidMasks;
    use crate::sim::effects::Effect;
    use crate::sim::world::{Collectible, Hazard, HazardKind};
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Fresh state without spawn invincibility and with the pursuer far behind
    fn state() -> GameState {
        let mut state = GameState::new(1, Tuning::default());
        state.player.timers.clear_all();
        state.pursuer.body.rect.set_midbottom(Vec2::new(-2000.0, FLOOR_Y));
        state
    }

    fn spawn_rat(state: &mut GameState, x: f32, bottom: f32) -> u32 {
        let mut rng = Pcg32::seed_from_u64(3);
        let id = state.world.next_entity_id();
        state
            .world
            .mobs
            .push(RoamingMob::spawn(id, Species::Rat, x, bottom, -1, &mut rng));
        id
    }

    /// Player falling onto a rat standing at its feet
    fn falling_onto_rat(state: &mut GameState) -> u32 {
        let cx = state.player.body.rect.center_x();
        let id = spawn_rat(state, cx, FLOOR_Y);
        state.player.body.rect.set_bottom(FLOOR_Y - 25.0);
        state.player.body.velocity_y = 400.0;
        state.player.body.grounded = false;
        id
    }

    #[test]
    fn test_stomp_is_idempotent() {
        let mut state = state();
        let id = falling_onto_rat(&mut state);
        assert!(resolve_stomp(&mut state, id));
        assert_eq!(state.player.combo, 1);
        assert!(!resolve_stomp(&mut state, id));
        assert_eq!(state.player.combo, 1);
        assert_eq!(state.stats.rats, 1);
        assert!(!resolve_stomp(&mut state, 9999));
    }

    #[test]
    fn test_stomp_beats_contact_damage() {
        let mut state = state();
        falling_onto_rat(&mut state);
        resolve_interactions(&mut state, &SolidMasks::new());
        assert_eq!(state.player.health, state.player.max_health);
        assert_eq!(state.player.body.velocity_y, crate::consts::BOUNCE_FORCE);
        assert!(state.events.contains(&GameEvent::Stomped(Foe::Mob(Species::Rat))));
    }

    #[test]
    fn test_side_contact_damages_once() {
        let mut state = state();
        let cx = state.player.body.rect.center_x();
        spawn_rat(&mut state, cx + 10.0, FLOOR_Y);
        spawn_rat(&mut state, cx - 10.0, FLOOR_Y);
        resolve_interactions(&mut state, &SolidMasks::new());
        // The second rat hits an already invincible player
        assert_eq!(state.player.health, state.player.max_health - 1);
        assert!(state.player.is_invincible());
        assert_eq!(state.player.combo, 0);
        assert!(!state.death_triggered);
    }

    #[test]
    fn test_shield_kills_mob_for_bonus() {
        let mut state = state();
        state.player.activate_powerup(CollectibleKind::Shield);
        let cx = state.player.body.rect.center_x();
        spawn_rat(&mut state, cx + 10.0, FLOOR_Y);
        resolve_interactions(&mut state, &SolidMasks::new());
        assert_eq!(state.bonus_score, SHIELD_KILL_SCORE);
        assert!(!state.world.mobs[0].alive);
        assert_eq!(state.player.health, state.player.max_health);
        assert!(state.player.has_shield());
    }

    #[test]
    fn test_shield_consumed_exactly_once() {
        let mut state = state();
        state.player.activate_powerup(CollectibleKind::Shield);
        assert_eq!(trigger_death(&mut state, DeathCause::Overdose), DeathOutcome::ShieldSaved);
        assert_eq!(trigger_death(&mut state, DeathCause::Fell), DeathOutcome::Absorbed);
        assert!(!state.death_triggered);
        assert!(!state.player.has_shield());
        assert_eq!(
            state.events.iter().filter(|e| **e == GameEvent::ShieldSaved).count(),
            1
        );
        // A new frame without a shield is fatal
        state.frame += 1;
        assert_eq!(trigger_death(&mut state, DeathCause::Fell), DeathOutcome::Triggered);
        assert_eq!(trigger_death(&mut state, DeathCause::Wasted), DeathOutcome::AlreadyTriggered);
        assert_eq!(state.death_cause, Some(DeathCause::Fell));
    }

    #[test]
    fn test_lethal_withdrawal_with_shield_survives_frame() {
        let mut state = state();
        state.player.activate_powerup(CollectibleKind::Shield);
        state.player.withdrawal = state.player.max_withdrawal;
        state.player.body.rect.set_top(crate::consts::DEATH_Y + 5.0);
        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(!state.death_triggered);
        assert!(!state.player.has_shield());
        assert!(state.player.is_invincible());
    }

    #[test]
    fn test_shield_save_lifts_the_condition() {
        let mut state = state();
        state.player.activate_powerup(CollectibleKind::Shield);
        state.player.withdrawal = state.player.max_withdrawal;
        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(!state.death_triggered);
        assert!(state.player.withdrawal < state.player.max_withdrawal);

        state.frame += 1;
        state.events.clear();
        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(!state.death_triggered);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_shield_save_from_fall_lands_on_next_ground() {
        let mut state = state();
        state.player.activate_powerup(CollectibleKind::Shield);
        state.player.body.rect.set_top(crate::consts::DEATH_Y + 5.0);
        assert_eq!(trigger_death(&mut state, DeathCause::Fell), DeathOutcome::ShieldSaved);
        assert_eq!(state.player.body.rect.bottom(), FLOOR_Y);
        assert!(state.player.body.grounded);
        assert_eq!(state.player.death_cause(), None);
    }

    #[test]
    fn test_attacker_hit_and_retreat() {
        let mut state = state();
        state.player.health = 3;
        let player_rect = state.player.body.rect;
        let id = state.world.next_entity_id();
        let attacker = Attacker::spawn(id, player_rect.center_x(), player_rect.center_y(), 1);
        state.world.attackers.push(attacker);

        resolve_interactions(&mut state, &SolidMasks::new());
        assert_eq!(state.player.health, 2);
        let attacker = &state.world.attackers[0];
        assert!(attacker.retreating);
        assert!(attacker.is_flashing());
        assert!(state.events.contains(&GameEvent::AttackerStruck));

        let mut last_y = attacker.body.rect.y;
        let mut frames = 0;
        loop {
            state.world.attackers[0].update(SIM_DT, &player_rect);
            let y = state.world.attackers[0].body.rect.y;
            assert!(y < last_y);
            last_y = y;
            state.world.cull(0.0);
            frames += 1;
            if state.world.attackers.is_empty() {
                break;
            }
            assert!(frames < 600, "attacker never left");
        }
    }

    #[test]
    fn test_shield_destroys_attacker() {
        let mut state = state();
        state.player.activate_powerup(CollectibleKind::Shield);
        let rect = state.player.body.rect;
        let id = state.world.next_entity_id();
        state
            .world
            .attackers
            .push(Attacker::spawn(id, rect.center_x(), rect.center_y(), 2));
        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(!state.world.attackers[0].alive);
        assert_eq!(state.stats.attackers, 1);
        assert_eq!(state.player.health, state.player.max_health);
    }

    #[test]
    fn test_pursuer_capture_and_knockback() {
        let mut state = state();
        let mid = state.player.body.rect.midbottom();
        state.pursuer.body.rect.set_midbottom(mid);
        state.player.activate_powerup(CollectibleKind::Shield);
        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(!state.death_triggered);
        assert!(state.events.contains(&GameEvent::PursuerRepelled));
        assert_eq!(state.pursuer.speed, 0.0);

        let mut state = self::state();
        let mid = state.player.body.rect.midbottom();
        state.pursuer.body.rect.set_midbottom(mid);
        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(state.death_triggered);
        assert_eq!(state.death_cause, Some(DeathCause::Arrested));
        assert!(state.pursuer.captured);
    }

    #[test]
    fn test_flashing_attacker_not_stompable() {
        let mut state = state();
        let rect = state.player.body.rect;
        state.player.body.velocity_y = 400.0;
        state.player.body.grounded = false;
        let id = state.world.next_entity_id();
        let mut attacker = Attacker::spawn(id, rect.center_x(), rect.bottom() + 12.0, 3);
        attacker.attack_cooldown = 1.0;
        state.world.attackers.push(attacker.clone());

        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(state.world.attackers[0].alive);
        assert_eq!(state.player.combo, 0);
        assert_eq!(state.player.health, state.player.max_health);
        assert!(state.events.is_empty());

        let mut state = self::state();
        state.player.body.velocity_y = 400.0;
        state.player.body.grounded = false;
        attacker.attack_cooldown = 0.0;
        state.world.attackers.push(attacker);
        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(!state.world.attackers[0].alive);
        assert_eq!(state.player.combo, 1);
        assert!(state.events.contains(&GameEvent::Stomped(Foe::Attacker)));
    }

    #[test]
    fn test_pursuer_ignores_invincible_player() {
        let mut state = state();
        let mid = state.player.body.rect.midbottom();
        state.pursuer.body.rect.set_midbottom(mid);
        state.player.timers.set(Effect::Invincible, 1.0);
        assert!(!state.player.has_shield());

        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(!state.death_triggered);
        assert!(!state.pursuer.captured);
        assert_eq!(state.death_cause, None);
        assert!(!state.events.contains(&GameEvent::PursuerRepelled));
    }

    #[test]
    fn test_collection_margin() {
        let mut state = state();
        let rect = state.player.body.rect;
        state.player.withdrawal = 50.0;
        let id = state.world.next_entity_id();
        // Weed hovering just past the right edge, inside the margin
        let mut weed = Collectible::new(id, CollectibleKind::Weed, 0.0, FLOOR_Y);
        weed.rect.set_left(rect.right() + COLLECT_MARGIN - 1.0);
        weed.rect.set_bottom(rect.bottom());
        state.world.collectibles.push(weed);
        let id = state.world.next_entity_id();
        let mut far = Collectible::new(id, CollectibleKind::Weed, 0.0, FLOOR_Y);
        far.rect.set_left(rect.right() + COLLECT_MARGIN + 1.0);
        state.world.collectibles.push(far);

        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(!state.world.collectibles[0].alive);
        assert!(state.world.collectibles[1].alive);
        assert_eq!(state.player.weed_count, 1);
        assert!((state.player.withdrawal - 35.0).abs() < 1e-4);
    }

    #[test]
    fn test_heart_heals_up_to_max() {
        let mut state = state();
        state.player.health = state.player.max_health;
        let center = state.player.body.rect.midbottom();
        let id = state.world.next_entity_id();
        state
            .world
            .collectibles
            .push(Collectible::new(id, CollectibleKind::Heart, center.x, center.y));
        resolve_interactions(&mut state, &SolidMasks::new());
        assert_eq!(state.player.health, state.player.max_health);
        assert_eq!(state.stats.hearts, 1);
    }

    #[test]
    fn test_hazard_side_contact_slows() {
        let mut state = state();
        state.player.combo = 3;
        let rect = state.player.body.rect;
        let id = state.world.next_entity_id();
        let mut hazard = Hazard::new(id, HazardKind::Bin, 0.0, FLOOR_Y);
        hazard.rect.set_left(rect.right() - 5.0);
        state.world.hazards.push(hazard);
        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(state.player.is_slowed());
        assert_eq!(state.player.combo, 0);
        assert!(state.events.contains(&GameEvent::Slowed));
    }

    #[test]
    fn test_attacker_downed_by_heart() {
        let mut state = state();
        let id = state.world.next_entity_id();
        state.world.attackers.push(Attacker::spawn(id, 3000.0, 300.0, 1));
        let id = state.world.next_entity_id();
        let mut heart = Collectible::new(id, CollectibleKind::Heart, 0.0, 0.0);
        heart.rect.set_center(Vec2::new(3000.0, 300.0));
        state.world.collectibles.push(heart);
        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(!state.world.attackers[0].alive);
        assert!(!state.world.collectibles[0].alive);
    }

    #[test]
    fn test_nothing_after_death() {
        let mut state = state();
        state.death_triggered = true;
        let cx = state.player.body.rect.center_x();
        spawn_rat(&mut state, cx, FLOOR_Y);
        resolve_interactions(&mut state, &SolidMasks::new());
        assert!(state.world.mobs[0].alive);
        assert!(state.events.is_empty());
    }
}
