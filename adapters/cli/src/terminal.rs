//! Rendering backend that prints text frames to a writer.

use std::io::Write;

use anyhow::Result;
use snow_day_core::FrameInput;
use snow_day_rendering::{FrameOutcome, Presentation, RenderingBackend, Scene};

use crate::script::ScriptPlayer;

/// Backend that feeds scripted input and prints selected frames.
#[derive(Debug)]
pub(crate) struct TerminalBackend<W> {
    out: W,
    inputs: ScriptPlayer,
    show_every: Option<u64>,
    max_ticks: Option<u64>,
    echo: bool,
}

impl<W> TerminalBackend<W>
where
    W: Write,
{
    /// Creates a backend writing to `out`.
    ///
    /// Frames are printed whenever the phase changes and, when `show_every`
    /// is set, on every multiple of that tick count. `echo` disables printing
    /// entirely when false.
    pub(crate) fn new(
        out: W,
        inputs: ScriptPlayer,
        show_every: Option<u64>,
        max_ticks: Option<u64>,
        echo: bool,
    ) -> Self {
        Self {
            out,
            inputs,
            show_every,
            max_ticks,
            echo,
        }
    }

    fn present(&mut self, frame: u64, scene: &Scene) -> Result<()> {
        if !self.echo {
            return Ok(());
        }
        writeln!(self.out, "--- frame {frame} ({:?}) ---", scene.phase)?;
        write!(self.out, "{scene}")?;
        Ok(())
    }
}

impl<W> RenderingBackend for TerminalBackend<W>
where
    W: Write,
{
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(FrameInput, &mut Scene) -> FrameOutcome,
    {
        let Presentation {
            window_title,
            mut scene,
            ..
        } = presentation;
        if self.echo {
            writeln!(self.out, "== {window_title} ==")?;
        }
        self.present(0, &scene)?;

        let mut frame = 0_u64;
        while let Some(input) = self.inputs.next() {
            if self.max_ticks.is_some_and(|max| frame >= max) {
                log::info!("stopping after {frame} ticks");
                break;
            }
            frame += 1;

            let previous_phase = scene.phase;
            let outcome = update_scene(input, &mut scene);
            let due = self
                .show_every
                .is_some_and(|every| every > 0 && frame % every == 0);
            if due || scene.phase != previous_phase {
                self.present(frame, &scene)?;
            }
            if outcome == FrameOutcome::Exit {
                log::debug!("scene requested exit at frame {frame}");
                break;
            }
        }

        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::Script;
    use snow_day_core::GamePhase;

    fn blank_scene(phase: GamePhase) -> Scene {
        Scene {
            phase,
            map: Vec::new(),
            overlay: Vec::new(),
        }
    }

    #[test]
    fn prints_phase_changes_and_stops_on_exit() {
        let script = Script::parse("5 wait").expect("valid script");
        let mut out = Vec::new();
        let backend = TerminalBackend::new(&mut out, script.player(), None, None, true);
        let mut frames = 0;
        backend
            .run(
                Presentation::new("test", blank_scene(GamePhase::Title)),
                |_, scene| {
                    frames += 1;
                    if frames == 2 {
                        scene.phase = GamePhase::Playing;
                    }
                    if frames == 3 {
                        FrameOutcome::Exit
                    } else {
                        FrameOutcome::Continue
                    }
                },
            )
            .expect("run succeeds");

        assert_eq!(frames, 3);
        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.starts_with("== test =="));
        assert!(text.contains("--- frame 0 (Title) ---"));
        assert!(text.contains("--- frame 2 (Playing) ---"));
        assert!(!text.contains("--- frame 3"));
    }

    #[test]
    fn tick_limit_cuts_the_script_short() {
        let script = Script::parse("100 wait").expect("valid script");
        let mut frames = 0;
        TerminalBackend::new(Vec::new(), script.player(), Some(1), Some(10), false)
            .run(
                Presentation::new("test", blank_scene(GamePhase::Title)),
                |_, _| {
                    frames += 1;
                    FrameOutcome::Continue
                },
            )
            .expect("run succeeds");
        assert_eq!(frames, 10);
    }
}
