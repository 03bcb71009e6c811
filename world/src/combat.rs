//! Resolution of a single action against a single target.

use rand::{seq::SliceRandom, Rng};
use snow_day_core::Tuning;

use crate::{effects::EffectTimeline, Actor, Target};

/// Complaints a target makes when struck.
pub(crate) const HURT_LINES: [&str; 10] = [
    "Ow! Stop twerking!",
    "I'm on a Zoom call!",
    "Not now, kids!",
    "My back! Owww!",
    "Go play in the snow!",
    "I have a deadline!",
    "That's... my spine!",
    "Why are you like this?!",
    "HR is watching!",
    "This is NOT a dance floor!",
];

/// What a target says when it gives up.
pub(crate) const DEFEAT_LINES: [&str; 3] = [
    "Fine! I'll play with you!",
    "Okay okay, you win!",
    "Alright, snow day it is!",
];

const DAMAGE_LABEL_ELEVATION: u32 = 40;
const KNOCKOUT_LABEL_ELEVATION: u32 = 50;
const KNOCKOUT_LABEL: &str = "K.O.!!";

/// Result of one resolved action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Strike {
    pub(crate) damage: u32,
    pub(crate) health: u32,
    pub(crate) defeated: bool,
}

/// Applies one action of `actor` against `target`.
///
/// Eligibility (revealed, undefeated, adjacent) is checked by the caller.
/// The caller also rejects actors whose pose began on an earlier frame; a
/// pose begun this frame does not block, so one input can hit several targets.
pub(crate) fn resolve_action<R>(
    actor: &mut Actor,
    target: &mut Target,
    tuning: &Tuning,
    rng: &mut R,
    effects: &mut EffectTimeline,
) -> Strike
where
    R: Rng,
{
    debug_assert!(!target.defeated, "defeated targets cannot be struck");

    actor.begin_action(tuning.action_duration);

    let damage = rng.gen_range(tuning.damage_min..=tuning.damage_max);
    let health = target.take_damage(damage);
    target.shake_timer = tuning.shake_duration;
    let hurt = HURT_LINES.choose(rng).copied().unwrap_or_default();
    target.say(hurt, tuning.speech_duration);
    effects.emit(
        target.cell,
        DAMAGE_LABEL_ELEVATION,
        format!("-{damage} TWERK!"),
        tuning.effect_lifetime,
    );

    let defeated = health == 0 && !target.defeated;
    if defeated {
        target.defeated = true;
        let line = DEFEAT_LINES.choose(rng).copied().unwrap_or_default();
        target.say(line, tuning.speech_duration);
        effects.emit(
            target.cell,
            KNOCKOUT_LABEL_ELEVATION,
            KNOCKOUT_LABEL.to_owned(),
            tuning.effect_lifetime,
        );
    }

    Strike {
        damage,
        health,
        defeated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use snow_day_core::{ActorId, CellCoord, TargetId};

    fn revealed_mom(health: u32) -> Target {
        let mut target = Target::new(TargetId::Mom, CellCoord::new(5, 16), 100);
        target.revealed = true;
        target.health = health;
        target
    }

    #[test]
    fn damage_stays_within_the_configured_range() {
        let tuning = Tuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut effects = EffectTimeline::default();
        for _ in 0..200 {
            let mut actor = Actor::new(ActorId::Rho, CellCoord::new(4, 15));
            let mut target = revealed_mom(100);
            let strike = resolve_action(&mut actor, &mut target, &tuning, &mut rng, &mut effects);
            assert!((8..=15).contains(&strike.damage), "damage {}", strike.damage);
            assert_eq!(target.health, 100 - strike.damage);
            assert!(!strike.defeated);
        }
    }

    #[test]
    fn strike_starts_the_action_and_shakes_the_target() {
        let tuning = Tuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut effects = EffectTimeline::default();
        let mut actor = Actor::new(ActorId::Rhaki, CellCoord::new(4, 15));
        let mut target = revealed_mom(100);

        let strike = resolve_action(&mut actor, &mut target, &tuning, &mut rng, &mut effects);

        assert!(actor.action_active);
        assert_eq!(actor.action_timer, 45);
        assert_eq!(actor.action_frame, 0);
        assert_eq!(target.shake_timer, 20);
        let speech = target.speech.expect("target complains");
        assert!(HURT_LINES.contains(&speech.text));
        assert_eq!(speech.remaining, 180);
        let labels = effects.snapshots();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].label, format!("-{} TWERK!", strike.damage));
        assert_eq!(labels[0].origin, target.cell);
        assert_eq!(labels[0].remaining, 60);
    }

    #[test]
    fn roll_covering_remaining_health_defeats_the_target() {
        let tuning = Tuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut effects = EffectTimeline::default();
        let mut actor = Actor::new(ActorId::Rho, CellCoord::new(4, 15));
        let mut target = revealed_mom(10);

        let strike = resolve_action(&mut actor, &mut target, &tuning, &mut rng, &mut effects);

        assert!(
            strike.damage >= 10,
            "seed 3 must roll at least 10, rolled {}",
            strike.damage
        );
        assert_eq!(target.health, 0);
        assert!(target.defeated);
        assert!(strike.defeated);
        assert_eq!(effects.len(), 2);
        let speech = target.speech.expect("target gives up");
        assert!(DEFEAT_LINES.contains(&speech.text));
        assert_eq!(effects.snapshots()[1].label, "K.O.!!");
        assert!(effects.snapshots()[1].elevation > effects.snapshots()[0].elevation);
    }

    #[test]
    fn any_roll_defeats_a_target_below_minimum_damage() {
        let tuning = Tuning::default();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut effects = EffectTimeline::default();
        let mut actor = Actor::new(ActorId::Rho, CellCoord::new(4, 15));
        let mut target = revealed_mom(8);

        let strike = resolve_action(&mut actor, &mut target, &tuning, &mut rng, &mut effects);

        assert_eq!(strike.health, 0);
        assert!(strike.defeated);
        assert!(target.defeated);
        assert_eq!(effects.len(), 2);
    }
}
