/**
 * A single simulation run: the generation pair, the selected rule, and the
 * play/stop state a front end drives it with.
 */

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use anyhow::Result;
use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};

use crate::generation::Generations;
use crate::grid::{Coord, Grid, IntoCell};
use crate::rule::{always_dead, random_fill, LifeLike, Rule};

/// Cloneable cancellation flag. Raising it ends [`Session::run`] before its
/// next generation; it can be raised from another thread or a signal handler.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Why [`Session::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The requested number of generations was reached.
    Finished,
    /// The stop handle was raised or `stop()` was called.
    Stopped,
    /// The grid stopped changing.
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Generations to advance; `None` runs until stopped.
    pub limit: Option<u64>,
    /// Pause after each rendered frame.
    pub interval: Duration,
    pub stop_when_stable: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            limit: None,
            interval: Duration::from_millis(100),
            stop_when_stable: false,
        }
    }
}

pub struct Session {
    generations: Generations,
    rule: LifeLike,
    playing: bool,
    stop: StopHandle,
}

impl Session {
    pub fn new(width: usize, height: usize, rule: LifeLike) -> Self {
        Self::from_grid(Grid::new(width, height), rule)
    }

    pub fn from_grid(grid: Grid, rule: LifeLike) -> Self {
        info!(
            "New session: {}x{} grid, rule {}",
            grid.width(),
            grid.height(),
            rule
        );
        Self {
            generations: Generations::from_grid(grid),
            rule,
            playing: false,
            stop: StopHandle::default(),
        }
    }

    pub fn grid(&self) -> &Grid {
        self.generations.present()
    }

    pub fn generation(&self) -> u64 {
        self.generations.generation()
    }

    pub fn rule(&self) -> LifeLike {
        self.rule
    }

    pub fn set_rule(&mut self, rule: LifeLike) {
        self.rule = rule;
    }

    pub fn is_stable(&self) -> bool {
        self.generations.is_stable()
    }

    /// Advances one generation under the session's rule.
    pub fn step(&mut self) -> Result<()> {
        let mut rule = self.rule;
        self.generations.step(&mut rule)
    }

    /// Advances one generation under an ad-hoc rule.
    pub fn step_with<R: Rule + ?Sized>(&mut self, rule: &mut R) -> Result<()> {
        self.generations.step(rule)
    }

    /// Kills every cell by stepping with a rule that always answers dead.
    pub fn clear(&mut self) -> Result<()> {
        self.step_with(&mut always_dead)
    }

    /// Refills the grid so each cell is alive with probability `density`.
    pub fn randomize(&mut self, density: f64) -> Result<()> {
        self.step_with(&mut random_fill(density, StdRng::from_entropy()))
    }

    /// Like [`Session::randomize`], but reproducible for a given seed.
    pub fn randomize_seeded(&mut self, density: f64, seed: u64) -> Result<()> {
        self.step_with(&mut random_fill(density, StdRng::seed_from_u64(seed)))
    }

    pub fn toggle(&mut self, coord: Coord) {
        self.generations.present_mut().toggle(coord);
    }

    pub fn set(&mut self, coord: Coord, value: impl IntoCell) {
        self.generations.present_mut().set(coord, value);
    }

    /// Direct access to the present grid, e.g. for stamping patterns.
    pub fn grid_mut(&mut self) -> &mut Grid {
        self.generations.present_mut()
    }

    pub fn play(&mut self) {
        self.playing = true;
        self.stop.reset();
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.stop.stop();
    }

    pub fn toggle_playing(&mut self) {
        if self.playing {
            self.stop();
        } else {
            self.play();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing && !self.stop.is_stopped()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Plays the simulation: step, hand the new grid to `on_frame`, sleep,
    /// repeat. The stop handle is checked before every generation and is not
    /// cleared here; only [`Session::play`] clears it.
    pub fn run<F>(&mut self, options: RunOptions, mut on_frame: F) -> Result<RunOutcome>
    where
        F: FnMut(&Grid, u64) -> Result<()>,
    {
        // A stop raised before the run starts still applies.
        self.playing = true;
        let start = self.generation();
        let started_at = Instant::now();

        let result = self.run_loop(options, start, &mut on_frame);
        self.playing = false;

        let steps = self.generation() - start;
        let elapsed = started_at.elapsed().as_secs_f64();
        match &result {
            Ok(outcome) => debug!(
                "Run ended ({:?}) after {} generations in {:.2}s",
                outcome, steps, elapsed
            ),
            Err(err) => debug!("Run failed after {} generations: {:#}", steps, err),
        }
        result
    }

    fn run_loop<F>(
        &mut self,
        options: RunOptions,
        start: u64,
        on_frame: &mut F,
    ) -> Result<RunOutcome>
    where
        F: FnMut(&Grid, u64) -> Result<()>,
    {
        loop {
            if self.stop.is_stopped() {
                return Ok(RunOutcome::Stopped);
            }
            if let Some(limit) = options.limit {
                if self.generation() - start >= limit {
                    return Ok(RunOutcome::Finished);
                }
            }

            self.step()?;
            on_frame(self.grid(), self.generation())?;

            if options.stop_when_stable && self.is_stable() {
                return Ok(RunOutcome::Stable);
            }
            if !options.interval.is_zero() {
                thread::sleep(options.interval);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{BLINKER, BLOCK};

    fn no_wait(limit: Option<u64>) -> RunOptions {
        RunOptions {
            limit,
            interval: Duration::ZERO,
            stop_when_stable: false,
        }
    }

    #[test]
    fn step_uses_the_session_rule() -> Result<()> {
        let mut session = Session::new(3, 3, LifeLike::conway());
        for col in 0..3 {
            session.set(Coord::new(1, col), true);
        }
        session.step()?;
        assert_eq!(session.grid().cells(), &[0, 1, 0, 0, 1, 0, 0, 1, 0]);
        assert_eq!(session.generation(), 1);
        Ok(())
    }

    #[test]
    fn clear_kills_everything() -> Result<()> {
        let grid = Grid::with_cells(2, 2, vec![1; 4]);
        let mut session = Session::from_grid(grid, LifeLike::conway());
        session.clear()?;
        assert_eq!(session.grid().population(), 0);
        Ok(())
    }

    #[test]
    fn randomize_extremes() -> Result<()> {
        let mut session = Session::new(4, 4, LifeLike::conway());
        session.randomize(1.0)?;
        assert_eq!(session.grid().population(), 16);
        session.randomize(0.0)?;
        assert_eq!(session.grid().population(), 0);
        Ok(())
    }

    #[test]
    fn seeded_randomize_is_reproducible() -> Result<()> {
        let mut a = Session::new(16, 16, LifeLike::conway());
        let mut b = Session::new(16, 16, LifeLike::conway());
        a.randomize_seeded(0.5, 42)?;
        b.randomize_seeded(0.5, 42)?;
        assert_eq!(a.grid(), b.grid());
        let pop = a.grid().population();
        assert!(pop > 0 && pop < 256);
        Ok(())
    }

    #[test]
    fn toggle_edits_the_present_grid() {
        let mut session = Session::new(3, 3, LifeLike::conway());
        session.toggle(Coord::new(1, 1));
        assert!(session.grid().is_alive(Coord::new(1, 1)));
        session.toggle(Coord::new(9, 9));
        assert_eq!(session.grid().population(), 1);
    }

    #[test]
    fn play_and_stop() {
        let mut session = Session::new(3, 3, LifeLike::conway());
        assert!(!session.is_playing());
        session.toggle_playing();
        assert!(session.is_playing());
        session.toggle_playing();
        assert!(!session.is_playing());
        session.play();
        session.stop_handle().stop();
        assert!(!session.is_playing());
    }

    #[test]
    fn run_stops_at_the_limit() -> Result<()> {
        let mut grid = Grid::new(5, 5);
        BLINKER.place(&mut grid, Coord::new(2, 1));
        let mut session = Session::from_grid(grid, LifeLike::conway());

        let mut frames = Vec::new();
        let outcome = session.run(no_wait(Some(3)), |grid, generation| {
            frames.push((generation, grid.population()));
            Ok(())
        })?;

        assert_eq!(outcome, RunOutcome::Finished);
        assert_eq!(frames, vec![(1, 3), (2, 3), (3, 3)]);
        assert!(!session.is_playing());
        Ok(())
    }

    #[test]
    fn run_ends_when_stable() -> Result<()> {
        let mut grid = Grid::new(4, 4);
        BLOCK.place(&mut grid, Coord::new(1, 1));
        let mut session = Session::from_grid(grid, LifeLike::conway());
        let options = RunOptions {
            stop_when_stable: true,
            ..no_wait(Some(10))
        };
        let outcome = session.run(options, |_, _| Ok(()))?;
        assert_eq!(outcome, RunOutcome::Stable);
        assert_eq!(session.generation(), 1);
        Ok(())
    }

    #[test]
    fn stop_handle_cancels_run() -> Result<()> {
        let mut session = Session::new(4, 4, LifeLike::conway());
        let handle = session.stop_handle();
        let outcome = session.run(no_wait(None), |_, generation| {
            if generation == 5 {
                handle.stop();
            }
            Ok(())
        })?;
        assert_eq!(outcome, RunOutcome::Stopped);
        assert_eq!(session.generation(), 5);
        Ok(())
    }

    #[test]
    fn frame_errors_propagate() {
        let mut session = Session::new(2, 2, LifeLike::conway());
        let result = session.run(no_wait(None), |_, _| anyhow::bail!("render failed"));
        assert!(result.is_err());
        assert_eq!(session.generation(), 1);
        assert!(!session.is_playing());

        session.toggle_playing();
        assert!(session.is_playing());
    }

    #[test]
    fn stop_before_run_is_honored() -> Result<()> {
        let mut session = Session::new(3, 3, LifeLike::conway());
        session.stop_handle().stop();
        let outcome = session.run(no_wait(Some(3)), |_, _| Ok(()))?;
        assert_eq!(outcome, RunOutcome::Stopped);
        assert_eq!(session.generation(), 0);

        session.play();
        let outcome = session.run(no_wait(Some(3)), |_, _| Ok(()))?;
        assert_eq!(outcome, RunOutcome::Finished);
        assert_eq!(session.generation(), 3);
        Ok(())
    }

    #[test]
    fn randomize_with_nan_density_leaves_grid_dead() -> Result<()> {
        let grid = Grid::with_cells(2, 2, vec![1; 4]);
        let mut session = Session::from_grid(grid, LifeLike::conway());
        session.randomize(f64::NAN)?;
        assert_eq!(session.grid().population(), 0);
        session.randomize_seeded(f64::NAN, 3)?;
        assert_eq!(session.grid().population(), 0);
        Ok(())
    }
}
