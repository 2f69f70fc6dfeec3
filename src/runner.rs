//! Drives an automaton from a single execution context: a worker thread that
//! paces generations and publishes snapshots, or a synchronous headless loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::PAUSED_POLL_MS;
use crate::simulation::{CellularAutomaton, Dimensions};

/// Shared stop signal for a generation loop.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Holds a loop to a target number of iterations per second.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    last_frame: Instant,
}

impl FramePacer {
    /// `fps == 0` means unpaced.
    pub fn new(fps: u32) -> Self {
        let interval = if fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(1_000_000_000 / u64::from(fps))
        };
        Self {
            interval,
            last_frame: Instant::now(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleeps until the next frame is due.
    pub fn wait(&mut self) {
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.interval {
            thread::sleep(self.interval - elapsed);
        }
        self.last_frame = Instant::now();
    }
}

/// Owned copy of the grid taken between two generations.
#[derive(Clone, Debug)]
pub struct FrameSnapshot {
    pub generation: u64,
    pub population: usize,
    pub dimensions: Dimensions,
    /// Row-major, 0 = dead, 1 = alive
    pub states: Vec<u32>,
}

impl FrameSnapshot {
    pub fn capture<A: CellularAutomaton + ?Sized>(automaton: &A) -> Self {
        let state = automaton.current_state();
        Self {
            generation: automaton.generation(),
            population: state.population(),
            dimensions: state.dimensions(),
            states: state.to_states(),
        }
    }
}

/// Single-frame mailbox between the worker and the renderer. Publishing
/// overwrites any frame not yet taken, so a reader always sees the newest
/// generation.
#[derive(Debug, Default)]
struct LatestFrame {
    slot: Mutex<Option<FrameSnapshot>>,
    ready: Condvar,
}

impl LatestFrame {
    fn publish(&self, frame: FrameSnapshot) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(frame);
        self.ready.notify_all();
    }

    fn take(&self) -> Option<FrameSnapshot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    fn take_timeout(&self, timeout: Duration) -> Option<FrameSnapshot> {
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut slot, _) = self
            .ready
            .wait_timeout_while(slot, timeout, |frame| frame.is_none())
            .unwrap_or_else(PoisonError::into_inner);
        slot.take()
    }
}

/// Commands sent from the UI to the simulation thread
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimCommand {
    Pause,
    Resume,
    /// Advance a single generation while paused
    Step,
}

/// Handle for controlling the simulation thread
pub struct SimulationHandle {
    thread: Option<JoinHandle<()>>,
    command_tx: Sender<SimCommand>,
    frames: Arc<LatestFrame>,
    token: CancellationToken,
    paused: bool,
}

impl SimulationHandle {
    /// Moves `automaton` onto a new thread and starts advancing it at `fps`
    /// generations per second until `token` is cancelled.
    pub fn spawn<A>(automaton: A, fps: u32, token: CancellationToken) -> Self
    where
        A: CellularAutomaton + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel();
        let frames = Arc::new(LatestFrame::default());
        let thread_token = token.clone();
        let thread_frames = Arc::clone(&frames);

        let thread = thread::spawn(move || {
            run_simulation(automaton, fps, thread_token, command_rx, &thread_frames);
        });

        Self {
            thread: Some(thread),
            command_tx,
            frames,
            token,
            paused: false,
        }
    }

    pub fn send(&mut self, command: SimCommand) {
        match command {
            SimCommand::Pause => self.paused = true,
            SimCommand::Resume => self.paused = false,
            SimCommand::Step => {}
        }
        let _ = self.command_tx.send(command);
    }

    pub fn toggle_pause(&mut self) {
        let command = if self.paused {
            SimCommand::Resume
        } else {
            SimCommand::Pause
        };
        self.send(command);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Newest snapshot published since the last call, if any (non-blocking)
    pub fn try_recv_snapshot(&self) -> Option<FrameSnapshot> {
        self.frames.take()
    }

    /// Waits up to `timeout` for a snapshot newer than the last one taken.
    pub fn recv_snapshot_timeout(&self, timeout: Duration) -> Option<FrameSnapshot> {
        self.frames.take_timeout(timeout)
    }

    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Cancels the loop and waits for the thread to exit.
    pub fn shutdown(&mut self) {
        self.token.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Simulation thread panicked");
            }
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_simulation<A: CellularAutomaton>(
    mut automaton: A,
    fps: u32,
    token: CancellationToken,
    command_rx: Receiver<SimCommand>,
    frames: &LatestFrame,
) {
    let dimensions = automaton.dimensions();
    log::info!(
        "Simulation thread started: {}x{} grid, {} fps",
        dimensions.width(),
        dimensions.height(),
        fps
    );

    let mut pacer = FramePacer::new(fps);
    let mut paused = false;
    frames.publish(FrameSnapshot::capture(&automaton));

    while !token.is_cancelled() {
        let mut step_once = false;
        loop {
            match command_rx.try_recv() {
                Ok(SimCommand::Pause) => paused = true,
                Ok(SimCommand::Resume) => paused = false,
                Ok(SimCommand::Step) => step_once = true,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    token.cancel();
                    break;
                }
            }
        }

        if paused && !step_once {
            thread::sleep(Duration::from_millis(PAUSED_POLL_MS));
            continue;
        }

        pacer.wait();
        if token.is_cancelled() {
            break;
        }

        automaton.advance_generation();
        frames.publish(FrameSnapshot::capture(&automaton));
    }

    log::info!(
        "Simulation stopped after {} generations",
        automaton.generation()
    );
}

/// Advances `automaton` on the calling thread until `generations` have run or
/// `token` is cancelled. Returns the number of generations advanced.
pub fn run_headless<A: CellularAutomaton + ?Sized>(
    automaton: &mut A,
    generations: u64,
    mut pacer: Option<FramePacer>,
    token: &CancellationToken,
) -> u64 {
    let mut advanced = 0;
    while advanced < generations && !token.is_cancelled() {
        if let Some(pacer) = pacer.as_mut() {
            pacer.wait();
        }
        automaton.advance_generation();
        advanced += 1;
        log::info!(
            "Generation {}: population {}",
            automaton.generation(),
            automaton.population()
        );
    }
    advanced
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{ConwayLife, Pattern};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_token_is_shared_between_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_unpaced_pacer_does_not_sleep() {
        let mut pacer = FramePacer::new(0);
        assert_eq!(pacer.interval(), Duration::ZERO);
        let start = Instant::now();
        for _ in 0..100 {
            pacer.wait();
        }
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(FramePacer::new(20).interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_headless_runs_requested_generations() {
        let mut life = ConwayLife::conway(16, 16, 0.3, Some(4)).unwrap();
        let token = CancellationToken::new();
        assert_eq!(run_headless(&mut life, 25, None, &token), 25);
        assert_eq!(life.generation(), 25);
    }

    #[test]
    fn test_headless_stops_when_cancelled() {
        let mut life = ConwayLife::conway(16, 16, 0.3, Some(4)).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(run_headless(&mut life, 25, None, &token), 0);
        assert_eq!(life.generation(), 0);
    }

    #[test]
    fn test_thread_publishes_steady_state_snapshots() {
        let life = ConwayLife::conway(24, 24, 0.35, Some(8)).unwrap();
        let mut handle = SimulationHandle::spawn(life, 0, CancellationToken::new());

        let first = handle.recv_snapshot_timeout(TIMEOUT).expect("first snapshot");
        assert_eq!(first.states.len(), 24 * 24);

        let mut last_generation = first.generation;
        for _ in 0..5 {
            let frame = handle.recv_snapshot_timeout(TIMEOUT).expect("snapshot");
            assert!(frame.generation > last_generation);
            assert!(frame.states.iter().all(|&s| s == 0 || s == 1));
            assert_eq!(frame.population, frame.states.iter().filter(|&&s| s == 1).count());
            last_generation = frame.generation;
        }

        handle.shutdown();
        assert!(handle.is_finished());
    }

    #[test]
    fn test_paused_thread_steps_on_request() {
        let mut life = ConwayLife::conway(8, 8, 0.0, Some(0)).unwrap();
        life.place(&Pattern::blinker(), (2, 3)).unwrap();
        let mut handle = SimulationHandle::spawn(life, 0, CancellationToken::new());
        handle.send(SimCommand::Pause);
        assert!(handle.is_paused());

        thread::sleep(Duration::from_millis(50));
        let paused = handle.try_recv_snapshot().expect("frame at pause");
        thread::sleep(Duration::from_millis(50));
        assert!(handle.try_recv_snapshot().is_none());

        handle.send(SimCommand::Step);
        let stepped = handle.recv_snapshot_timeout(TIMEOUT).expect("stepped snapshot");
        assert_eq!(stepped.generation, paused.generation + 1);
        assert_eq!(stepped.population, 3);
    }

    #[test]
    fn test_external_cancel_stops_thread() {
        let token = CancellationToken::new();
        let life = ConwayLife::conway(8, 8, 0.2, Some(3)).unwrap();
        let mut handle = SimulationHandle::spawn(life, 0, token.clone());
        token.cancel();
        let deadline = Instant::now() + TIMEOUT;
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(handle.is_finished());
        handle.shutdown();
    }

    #[test]
    fn test_unpaced_thread_pauses_on_newest_frame() {
        let life = ConwayLife::conway(16, 16, 0.35, Some(21)).unwrap();
        let mut handle = SimulationHandle::spawn(life, 0, CancellationToken::new());

        // Let the worker run far ahead of a reader that never looks.
        thread::sleep(Duration::from_millis(100));
        handle.send(SimCommand::Pause);
        thread::sleep(Duration::from_millis(50));
        let paused = handle.try_recv_snapshot().expect("frame at pause");
        assert!(paused.generation > 0);

        handle.send(SimCommand::Step);
        let stepped = handle.recv_snapshot_timeout(TIMEOUT).expect("stepped snapshot");
        assert_eq!(stepped.generation, paused.generation + 1);
    }

    #[test]
    fn test_latest_frame_keeps_only_newest() {
        let life = ConwayLife::conway(4, 4, 0.0, Some(0)).unwrap();
        let frames = LatestFrame::default();
        assert!(frames.take().is_none());
        assert!(frames.take_timeout(Duration::from_millis(10)).is_none());

        let mut frame = FrameSnapshot::capture(&life);
        for generation in 0..5 {
            frame.generation = generation;
            frames.publish(frame.clone());
        }
        assert_eq!(frames.take().map(|f| f.generation), Some(4));
        assert!(frames.take().is_none());
    }
}
