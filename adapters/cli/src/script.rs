//! Scripted input sequences for headless runs.
//!
//! A script holds one step per line: an optional tick count followed by the
//! tokens held during those ticks. `confirm` and `quit` fire on the first tick
//! of their line only; `#` starts a comment.
//!
//! ```text
//! confirm
//! 16 rho.right rhaki.down
//! 45 rho.act
//! quit
//! ```

use snow_day_core::{ActorId, Direction, FrameInput};
use thiserror::Error;

/// Parsed input script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Script {
    steps: Vec<ScriptStep>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ScriptStep {
    ticks: u32,
    input: FrameInput,
}

impl Script {
    /// Parses a script from its textual form.
    pub(crate) fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }
            steps.push(parse_step(line, content)?);
        }
        Ok(Self { steps })
    }

    /// Total number of ticks the script lasts.
    pub(crate) fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|step| u64::from(step.ticks)).sum()
    }

    /// Expands the script into one input per tick.
    pub(crate) fn player(&self) -> ScriptPlayer {
        ScriptPlayer {
            steps: self.steps.clone().into_iter(),
            current: None,
        }
    }
}

fn parse_step(line: usize, content: &str) -> Result<ScriptStep, ScriptError> {
    let mut tokens = content.split_whitespace().peekable();
    let mut ticks = 1;
    if let Some(&first) = tokens.peek() {
        if first.starts_with(|c: char| c.is_ascii_digit()) {
            ticks = first.parse().map_err(|_| ScriptError::InvalidTicks {
                line,
                value: first.to_owned(),
            })?;
            if ticks == 0 {
                return Err(ScriptError::ZeroTicks { line });
            }
            let _ = tokens.next();
        }
    }

    let mut input = FrameInput::default();
    for token in tokens {
        match token {
            "confirm" => input.confirm = true,
            "quit" => input.quit = true,
            "wait" => {}
            other => press(line, other, &mut input)?,
        }
    }
    Ok(ScriptStep { ticks, input })
}

fn press(line: usize, token: &str, input: &mut FrameInput) -> Result<(), ScriptError> {
    let (name, control) = token
        .split_once('.')
        .ok_or_else(|| ScriptError::UnknownToken {
            line,
            token: token.to_owned(),
        })?;
    let actor = ActorId::ALL
        .into_iter()
        .find(|actor| actor.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| ScriptError::UnknownActor {
            line,
            name: name.to_owned(),
        })?;

    let controls = input.controls_mut(actor);
    match control.to_ascii_lowercase().as_str() {
        "act" => controls.act = true,
        "up" => controls.press(Direction::Up),
        "down" => controls.press(Direction::Down),
        "left" => controls.press(Direction::Left),
        "right" => controls.press(Direction::Right),
        other => {
            return Err(ScriptError::UnknownControl {
                line,
                control: other.to_owned(),
            })
        }
    }
    Ok(())
}

/// Iterator yielding the input of every scripted tick.
#[derive(Debug)]
pub(crate) struct ScriptPlayer {
    steps: std::vec::IntoIter<ScriptStep>,
    current: Option<(ScriptStep, u32)>,
}

impl Iterator for ScriptPlayer {
    type Item = FrameInput;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((step, played)) = self.current.as_mut() {
                if *played < step.ticks {
                    let mut input = step.input;
                    if *played > 0 {
                        input.confirm = false;
                        input.quit = false;
                    }
                    *played += 1;
                    return Some(input);
                }
            }
            self.current = Some((self.steps.next()?, 0));
        }
    }
}

/// Reasons a script may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    /// The leading tick count is not a number.
    #[error("line {line}: `{value}` is not a valid tick count")]
    InvalidTicks {
        /// Line of the offending step.
        line: usize,
        /// Text that failed to parse.
        value: String,
    },
    /// A step lasting zero ticks would never be played.
    #[error("line {line}: tick count must be positive")]
    ZeroTicks {
        /// Line of the offending step.
        line: usize,
    },
    /// The token is neither a keyword nor an `actor.control` pair.
    #[error("line {line}: unknown token `{token}`")]
    UnknownToken {
        /// Line of the offending step.
        line: usize,
        /// Offending token.
        token: String,
    },
    /// The actor name does not match any actor.
    #[error("line {line}: unknown actor `{name}`")]
    UnknownActor {
        /// Line of the offending step.
        line: usize,
        /// Offending actor name.
        name: String,
    },
    /// The control is not one of `up`, `down`, `left`, `right`, `act`.
    #[error("line {line}: unknown control `{control}`")]
    UnknownControl {
        /// Line of the offending step.
        line: usize,
        /// Offending control name.
        control: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_expand_into_ticks() {
        let script = Script::parse("3 rho.right rhaki.act\nwait").expect("valid script");
        assert_eq!(script.total_ticks(), 4);

        let inputs: Vec<FrameInput> = script.player().collect();
        assert_eq!(inputs.len(), 4);
        for input in &inputs[..3] {
            assert!(input.controls(ActorId::Rho).right);
            assert!(input.controls(ActorId::Rhaki).act);
        }
        assert_eq!(inputs[3], FrameInput::default());
    }

    #[test]
    fn confirm_and_quit_fire_once_per_line() {
        let script = Script::parse("2 confirm rho.up\n3 quit").expect("valid script");
        let inputs: Vec<FrameInput> = script.player().collect();
        let confirms = inputs.iter().filter(|input| input.confirm).count();
        let quits = inputs.iter().filter(|input| input.quit).count();
        assert_eq!((confirms, quits), (1, 1));
        assert!(inputs[0].confirm);
        assert!(inputs[1].controls(ActorId::Rho).up);
        assert!(inputs[2].quit);
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let script = Script::parse("# intro\n\n  Rho.Left # go west\n").expect("valid script");
        let inputs: Vec<FrameInput> = script.player().collect();
        assert_eq!(inputs.len(), 1);
        assert!(inputs[0].controls(ActorId::Rho).left);
    }

    #[test]
    fn malformed_lines_report_their_position() {
        assert_eq!(
            Script::parse("wait\n0 wait"),
            Err(ScriptError::ZeroTicks { line: 2 })
        );
        assert_eq!(
            Script::parse("9x rho.up"),
            Err(ScriptError::InvalidTicks {
                line: 1,
                value: "9x".to_owned()
            })
        );
        assert_eq!(
            Script::parse("jump"),
            Err(ScriptError::UnknownToken {
                line: 1,
                token: "jump".to_owned()
            })
        );
        assert_eq!(
            Script::parse("mom.act"),
            Err(ScriptError::UnknownActor {
                line: 1,
                name: "mom".to_owned()
            })
        );
        assert_eq!(
            Script::parse("rhaki.dance"),
            Err(ScriptError::UnknownControl {
                line: 1,
                control: "dance".to_owned()
            })
        );
    }

    #[test]
    fn house_tour_parses() {
        let script = Script::parse(include_str!("../../../demos/house_tour.script"))
            .expect("bundled script is valid");
        assert_eq!(script.total_ticks(), 1 + 16 + 16 + 24 + 16 + 104 + 16 + 600 + 200 + 1 + 1);
    }
}
