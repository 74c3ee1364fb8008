//! Subscription-owning engine around the stabilizer core.
//!
//! One worker thread is the single logical scheduling queue: it drains
//! lock/unlock requests, polls the gravity source at its fixed interval,
//! and services the unlock animation clock at its own cadence while a
//! release is in flight. Both tick sources live on that one queue, so the
//! pipeline state needs no locking; only the diagnostics counter is shared
//! (behind a mutex) as the snapshot boundary for other threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::StabilizerConfig;
use crate::diagnostics::{DiagnosticsSnapshot, RotationCounter};
use crate::error::StabilizerError;
use crate::sensor::GravitySource;
use crate::transform::{AffineTransform, SurfaceGeometry, TransformBuilder};
use crate::{Stabilizer, StabilizerEvent};

/// Control requests routed onto the worker's scheduling queue.
#[derive(Debug, Clone, Copy)]
enum Command {
    Lock,
    Unlock,
}

/// Transform consumer invoked synchronously inside the tick handler.
///
/// Callers must not block in it; it shares the queue with both tick
/// sources.
pub type TransformSink = Box<dyn FnMut(&AffineTransform) + Send>;

/// Gravity-referenced stabilization engine for one video surface.
///
/// Single-shot lifecycle: construct, `start()`, `stop()`. The gravity
/// source moves into the worker on `start()`, so running again takes a new
/// engine.
pub struct StabilizationEngine<S: GravitySource + 'static> {
    source: Option<S>,
    stabilizer: Option<Stabilizer>,
    config: StabilizerConfig,
    builder: TransformBuilder,
    counter: Arc<Mutex<RotationCounter>>,
    running: Arc<AtomicBool>,
    commands: Option<Sender<Command>>,
    worker: Option<JoinHandle<()>>,
}

impl<S: GravitySource + 'static> StabilizationEngine<S> {
    /// Create an engine for a gravity source and surface geometry.
    ///
    /// Configuration and dimensions are validated here, before any sensor
    /// work begins.
    pub fn new(
        source: S,
        config: StabilizerConfig,
        geometry: SurfaceGeometry,
    ) -> Result<Self, StabilizerError> {
        let stabilizer = Stabilizer::new(config.clone(), geometry)?;
        let counter = stabilizer.diagnostics_counter();
        let builder = TransformBuilder::new(geometry)?;
        Ok(Self {
            source: Some(source),
            stabilizer: Some(stabilizer),
            config,
            builder,
            counter,
            running: Arc::new(AtomicBool::new(false)),
            commands: None,
            worker: None,
        })
    }

    /// Start sensor delivery and transform emission.
    ///
    /// A source that cannot start surfaces its error here, once; the
    /// engine stays usable for another attempt.
    pub fn start<F>(&mut self, on_transform: F) -> Result<(), StabilizerError>
    where
        F: FnMut(&AffineTransform) + Send + 'static,
    {
        if self.running.load(Ordering::SeqCst) {
            return Err(StabilizerError::AlreadyRunning);
        }
        let mut source = self.source.take().ok_or(StabilizerError::SourceExhausted)?;
        let stabilizer = self
            .stabilizer
            .take()
            .ok_or(StabilizerError::SourceExhausted)?;

        if let Err(error) = source.start() {
            self.source = Some(source);
            self.stabilizer = Some(stabilizer);
            return Err(error.into());
        }

        let (sender, receiver) = mpsc::channel();
        self.commands = Some(sender);
        self.running.store(true, Ordering::SeqCst);

        let running = self.running.clone();
        let animation_interval = Duration::from_secs_f64(1.0 / self.config.animation_rate_hz);
        let sink: TransformSink = Box::new(on_transform);

        log::info!(
            "Starting stabilization (sensor every {:?}, animation every {:?})",
            source.sample_interval(),
            animation_interval
        );
        self.worker = Some(thread::spawn(move || {
            run_queue(source, stabilizer, receiver, running, animation_interval, sink);
        }));
        Ok(())
    }

    /// Halt sensor delivery synchronously.
    ///
    /// Joins the worker, so no transform callback fires after this
    /// returns; an in-flight unlock animation is cancelled with it.
    pub fn stop(&mut self) {
        if self.worker.is_none() {
            return;
        }
        log::info!("Stopping stabilization");
        self.running.store(false, Ordering::SeqCst);
        self.commands = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("stabilizer worker panicked before join");
            }
        }
    }

    /// Request a lock of the displayed angle.
    pub fn lock(&self) {
        self.send(Command::Lock);
    }

    /// Request a spring-eased release back to live tracking.
    pub fn unlock(&self) {
        self.send(Command::Unlock);
    }

    fn send(&self, command: Command) {
        match &self.commands {
            Some(sender) => {
                if sender.send(command).is_err() {
                    log::warn!("{command:?} dropped: worker already exited");
                }
            }
            None => log::warn!("{command:?} ignored: engine not running"),
        }
    }

    /// Whether the worker is delivering ticks.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Baseline transform with no rotation, available before `start()`.
    pub fn zero_rotation_transform(&self) -> AffineTransform {
        self.builder.zero_rotation()
    }

    /// Snapshot and reset the rotation diagnostics.
    pub fn take_diagnostics(&self) -> DiagnosticsSnapshot {
        self.counter.lock().unwrap().take()
    }
}

impl<S: GravitySource + 'static> Drop for StabilizationEngine<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The worker loop: one cooperative queue for commands, sensor ticks, and
/// animation ticks.
fn run_queue<S: GravitySource>(
    mut source: S,
    mut stabilizer: Stabilizer,
    commands: Receiver<Command>,
    running: Arc<AtomicBool>,
    animation_interval: Duration,
    mut sink: TransformSink,
) {
    // Sleep in short slices so a stop request is observed promptly.
    const MAX_SLEEP: Duration = Duration::from_millis(5);

    let sample_interval = source.sample_interval();
    let epoch = Instant::now();
    let mut next_sample = epoch;
    // Armed only while an unlock animation is in flight.
    let mut next_animation: Option<Instant> = None;

    while running.load(Ordering::SeqCst) {
        // Control requests share the queue with both tick sources.
        loop {
            match commands.try_recv() {
                Ok(command) => {
                    let now = epoch.elapsed().as_secs_f64();
                    let event = match command {
                        Command::Lock => StabilizerEvent::Lock,
                        Command::Unlock => StabilizerEvent::Unlock { now },
                    };
                    stabilizer.process_event(event);
                    next_animation = if stabilizer.lock_state().is_unlocking() {
                        // First animation tick fires immediately, sampling
                        // the curve at its exact start.
                        Some(next_animation.unwrap_or_else(Instant::now))
                    } else {
                        None
                    };
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        let tick_time = Instant::now();

        if tick_time >= next_sample {
            // A None sample is skipped for the tick, never read as zero.
            if let Some(sample) = source.poll() {
                if let Some(transform) = stabilizer.process_event(StabilizerEvent::Sample(sample))
                {
                    sink(&transform);
                }
            }
            next_sample += sample_interval;
            if next_sample <= tick_time {
                // Fell behind: realign instead of bursting missed ticks.
                next_sample = tick_time + sample_interval;
            }
        }

        if let Some(due) = next_animation {
            if tick_time >= due {
                let now = epoch.elapsed().as_secs_f64();
                if let Some(transform) =
                    stabilizer.process_event(StabilizerEvent::AnimationTick { now })
                {
                    sink(&transform);
                }
                next_animation = if stabilizer.lock_state().is_unlocking() {
                    Some(due + animation_interval)
                } else {
                    // Window closed: release the animation tick source.
                    None
                };
            }
        }

        let mut deadline = next_sample;
        if let Some(due) = next_animation {
            deadline = deadline.min(due);
        }
        let after_ticks = Instant::now();
        if deadline > after_ticks {
            thread::sleep((deadline - after_ticks).min(MAX_SLEEP));
        }
    }

    source.stop();
}
