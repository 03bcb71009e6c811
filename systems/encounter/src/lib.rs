#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Encounter system that finds hidden targets and engages adjacent ones.

use snow_day_core::{
    ActorId, ActorSnapshot, ActorView, Command, EngagementPolicy, Event, FrameInput, GamePhase,
    TargetId, TargetSnapshot, TargetView, Tuning,
};

/// Pure system that emits reveal and action commands from proximity and input.
#[derive(Debug)]
pub struct Encounter {
    reveal_radius: u32,
    engage_radius: u32,
    policy: EngagementPolicy,
    phase: GamePhase,
}

impl Encounter {
    /// Creates an encounter system using the provided tuning.
    #[must_use]
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            reveal_radius: tuning.reveal_radius,
            engage_radius: tuning.engage_radius,
            policy: tuning.engagement,
            phase: GamePhase::Title,
        }
    }

    /// Consumes world events, the frame input and immutable views to emit commands.
    ///
    /// Engagements are emitted first so that a target revealed on this frame
    /// cannot be struck until the next one. Actors are visited in
    /// [`ActorId::ALL`] order and targets in [`TargetId::ALL`] order.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: &FrameInput,
        actor_view: &ActorView,
        target_view: &TargetView,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::PhaseChanged { phase } = event {
                self.phase = *phase;
            }
        }

        if self.phase != GamePhase::Playing {
            return;
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        self.engage(input, actor_view, target_view, out);
        self.reveal(actor_view, target_view, out);
    }

    /// Reports whether the actor may strike the target right now.
    #[must_use]
    pub fn can_engage(&self, actor: &ActorSnapshot, target: &TargetSnapshot) -> bool {
        target.revealed
            && !target.defeated
            && actor.cell.chebyshev_distance(target.cell) <= self.engage_radius
    }

    /// Reports whether the actor is close enough to find the target.
    #[must_use]
    pub fn within_reveal_range(&self, actor: &ActorSnapshot, target: &TargetSnapshot) -> bool {
        actor.cell.chebyshev_distance(target.cell) <= self.reveal_radius
    }

    fn engage(
        &self,
        input: &FrameInput,
        actor_view: &ActorView,
        target_view: &TargetView,
        out: &mut Vec<Command>,
    ) {
        for actor_id in ActorId::ALL {
            let Some(actor) = actor_view.get(actor_id) else {
                continue;
            };
            if actor.action_active || !input.controls(actor_id).act {
                continue;
            }

            for target_id in TargetId::ALL {
                let Some(target) = target_view.get(target_id) else {
                    continue;
                };
                if !self.can_engage(actor, target) {
                    continue;
                }
                log::debug!("{} engages {}", actor_id.name(), target_id.name());
                out.push(Command::ResolveAction {
                    actor: actor_id,
                    target: target_id,
                });
                if self.policy == EngagementPolicy::FirstInRange {
                    break;
                }
            }
        }
    }

    fn reveal(&self, actor_view: &ActorView, target_view: &TargetView, out: &mut Vec<Command>) {
        for target_id in TargetId::ALL {
            let Some(target) = target_view.get(target_id) else {
                continue;
            };
            if target.revealed {
                continue;
            }
            let finder = ActorId::ALL.into_iter().find(|actor_id| {
                actor_view
                    .get(*actor_id)
                    .is_some_and(|actor| self.within_reveal_range(actor, target))
            });
            if let Some(by) = finder {
                out.push(Command::RevealTarget {
                    target: target_id,
                    by,
                });
            }
        }
    }
}
