#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that turns held direction keys into actor steps.

use snow_day_core::{ActorView, Command, Event, FrameInput, GamePhase};

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement {
    phase: GamePhase,
}

impl Movement {
    /// Consumes world events, the frame input and the actor view to emit step commands.
    ///
    /// Steps are only proposed on frames that advanced time while playing. Each
    /// actor whose cooldown elapsed proposes at most one step, in the direction
    /// chosen by [`snow_day_core::Direction::PRIORITY`].
    pub fn handle(
        &mut self,
        events: &[Event],
        input: &FrameInput,
        actor_view: &ActorView,
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

        for actor in actor_view.iter() {
            if actor.move_cooldown > 0 {
                continue;
            }
            if let Some(direction) = input.controls(actor.id).first_direction() {
                out.push(Command::StepActor {
                    actor: actor.id,
                    direction,
                });
            }
        }
    }
}
