//! Background execution of generation, solving and blocked checks around one shared
//! labyrinth.
//!
//! Every worker takes the labyrinth lock for the whole duration of its algorithm, so
//! at most one of them mutates the grid at a time. Long step-by-step runs therefore
//! block readers; observers that need live progress should [`Session::subscribe`]
//! instead of polling [`Session::read`].

use std::{
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
        mpsc::Receiver,
    },
    thread::JoinHandle,
};

use crate::{
    error::{LabyrinthError, Result},
    maze::{Direction, GenerationOutcome, GridEvent, Labyrinth, Position},
    stepping::CancelToken,
};

/// A background worker with its own cancellation token.
pub struct Task<T> {
    cancel: CancelToken,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Task<T> {
    pub fn spawn(f: impl FnOnce(&CancelToken) -> T + Send + 'static) -> Self {
        let cancel = CancelToken::new();
        let worker_cancel = cancel.clone();
        let handle = std::thread::spawn(move || f(&worker_cancel));
        Task { cancel, handle }
    }
}

impl<T> Task<T> {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the worker to return.
    pub fn join(self) -> Result<T> {
        self.handle
            .join()
            .map_err(|_| LabyrinthError::WorkerPanicked)
    }

    /// Request cancellation, then wait until the worker acknowledges it by returning.
    pub fn cancel_and_join(self) -> Result<T> {
        self.cancel();
        self.join()
    }
}

fn lock(labyrinth: &Mutex<Labyrinth>) -> Result<MutexGuard<'_, Labyrinth>> {
    labyrinth.lock().map_err(|_| LabyrinthError::LockPoisoned)
}

/// Drives a [`Labyrinth`] from a controller thread while its algorithms run in the
/// background.
pub struct Session {
    labyrinth: Arc<Mutex<Labyrinth>>,
    searching: Arc<AtomicBool>,
    generation: Option<Task<Result<GenerationOutcome>>>,
    solve: Option<Task<Result<Option<Vec<Position>>>>>,
    blocked_check: Option<Task<Result<Option<bool>>>>,
}

impl Session {
    pub fn new(labyrinth: Labyrinth) -> Self {
        let searching = labyrinth.solving().searching_flag();
        Session {
            labyrinth: Arc::new(Mutex::new(labyrinth)),
            searching,
            generation: None,
            solve: None,
            blocked_check: None,
        }
    }

    /// Run `f` on the labyrinth, waiting for any worker holding it.
    pub fn read<R>(&self, f: impl FnOnce(&Labyrinth) -> R) -> Result<R> {
        Ok(f(&*lock(&self.labyrinth)?))
    }

    /// See [`Labyrinth::subscribe`].
    pub fn subscribe(&self) -> Result<Receiver<GridEvent>> {
        Ok(lock(&self.labyrinth)?.subscribe())
    }

    fn is_generating(&self) -> bool {
        self.generation
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Stop every running worker, then start a fresh generation in the background.
    pub fn start_generation(&mut self, seed: i64, step_by_step: bool) -> Result<()> {
        self.stop_workers()?;
        tracing::debug!("[session] starting generation (seed {seed}, step by step {step_by_step})");
        let labyrinth = Arc::clone(&self.labyrinth);
        self.generation = Some(Task::spawn(move |cancel| -> Result<GenerationOutcome> {
            Ok(lock(&labyrinth)?.generate_with(seed, step_by_step, cancel))
        }));
        Ok(())
    }

    /// Cancel the running generation and wait for it to return.
    /// Returns `None` if no generation was started since the last wait.
    pub fn stop_generation(&mut self) -> Result<Option<GenerationOutcome>> {
        match self.generation.take() {
            Some(task) => task.cancel_and_join()?.map(Some),
            None => Ok(None),
        }
    }

    /// Wait for the running generation to return.
    pub fn wait_generation(&mut self) -> Result<Option<GenerationOutcome>> {
        match self.generation.take() {
            Some(task) => task.join()?.map(Some),
            None => Ok(None),
        }
    }

    pub fn is_generation_finished(&self) -> Result<bool> {
        if self.is_generating() {
            return Ok(false);
        }
        self.read(Labyrinth::is_generation_finished)
    }

    /// Move the player and re-check in the background whether it is blocked.
    ///
    /// Ignored while generating or once the goal is reached. Any in-flight blocked
    /// check is cancelled and joined first.
    pub fn move_player(&mut self, direction: Direction) -> Result<bool> {
        if self.is_generating() {
            return Ok(false);
        }
        if let Some(task) = self.blocked_check.take() {
            task.cancel_and_join()??;
        }

        let moved = {
            let mut labyrinth = lock(&self.labyrinth)?;
            if !labyrinth.is_generation_finished() || labyrinth.goal_achieved() {
                return Ok(false);
            }
            labyrinth.move_player(direction)
        };

        if moved {
            let labyrinth = Arc::clone(&self.labyrinth);
            self.blocked_check = Some(Task::spawn(move |cancel| -> Result<Option<bool>> {
                Ok(lock(&labyrinth)?.check_blocked(cancel))
            }));
        }
        Ok(moved)
    }

    /// Wait for the pending blocked check. `None` if there was none or it was cancelled.
    pub fn wait_blocked_check(&mut self) -> Result<Option<bool>> {
        match self.blocked_check.take() {
            Some(task) => task.join()?,
            None => Ok(None),
        }
    }

    pub fn is_blocked(&self) -> Result<bool> {
        self.read(Labyrinth::is_blocked)
    }

    pub fn is_searching_path(&self) -> bool {
        self.searching.load(Ordering::Acquire)
            || self.solve.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Start searching a path from the player to the goal in the background.
    /// Returns `false` without starting anything while a generation or a search is
    /// in flight.
    pub fn spawn_solve(&mut self) -> bool {
        if self.is_generating() || self.is_searching_path() {
            return false;
        }
        let labyrinth = Arc::clone(&self.labyrinth);
        self.solve = Some(Task::spawn(move |cancel| -> Result<Option<Vec<Position>>> {
            Ok(lock(&labyrinth)?.get_path_with(cancel))
        }));
        true
    }

    /// Wait for the background search started by [`Session::spawn_solve`].
    pub fn wait_solve(&mut self) -> Result<Option<Vec<Position>>> {
        match self.solve.take() {
            Some(task) => task.join()?,
            None => Ok(None),
        }
    }

    /// Allow or forbid the solver. Forbidding it cancels an in-flight search.
    pub fn set_auto_player(&mut self, auto_player: bool) -> Result<()> {
        if !auto_player {
            if let Some(task) = self.solve.take() {
                task.cancel_and_join()??;
            }
        }
        lock(&self.labyrinth)?.set_auto_player(auto_player);
        Ok(())
    }

    fn stop_workers(&mut self) -> Result<()> {
        let blocked_check = self.blocked_check.take();
        let solve = self.solve.take();
        let generation = self.generation.take();

        // A worker queued on the lock only returns after the current holder does, so
        // every token must be cancelled before the first join.
        blocked_check.iter().for_each(Task::cancel);
        solve.iter().for_each(Task::cancel);
        generation.iter().for_each(Task::cancel);

        let joined = [
            blocked_check.map(|task| task.join().map(drop)),
            solve.map(|task| task.join().map(drop)),
            generation.map(|task| task.join().map(drop)),
        ];
        joined.into_iter().flatten().collect()
    }

    /// Cancel every worker and wait for all of them.
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::debug!("[session] shutting down");
        self.stop_workers()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            tracing::warn!("[session] {err} while shutting down");
        }
    }
}
