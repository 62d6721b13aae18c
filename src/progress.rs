use std::{
    sync::mpsc::{SyncSender, TrySendError},
    time::Duration,
};

use crate::maze::{Coord, Maze, TerrainMap};

/// Borrowed view of the session state at the moment of a repaint.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub maze: &'a Maze,
    pub terrain: Option<&'a TerrainMap>,
    pub path: &'a [Coord],
}

impl Frame<'_> {
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            maze: self.maze.clone(),
            terrain: self.terrain.cloned(),
            path: self.path.to_vec(),
        }
    }
}

/// Owned copy of a [`Frame`], for sending across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub maze: Maze,
    pub terrain: Option<TerrainMap>,
    pub path: Vec<Coord>,
}

/// Receiver side of generation and search progress, owned by the presentation layer.
pub trait ProgressSink: Send + Sync {
    /// The state changed; read it now. Implementations may coalesce repaints.
    fn repaint(&self, frame: &Frame<'_>);
    /// A human readable status block. Never coalesced.
    fn status(&self, text: &str);
}

/// Events delivered by a [`ChannelSink`].
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Repaint(Snapshot),
    Status(String),
}

/// Forwards progress over a bounded channel.
///
/// Repaints are dropped while the channel is full, statuses block until delivered.
pub struct ChannelSink {
    tx: SyncSender<EngineEvent>,
}

impl ChannelSink {
    pub fn new(tx: SyncSender<EngineEvent>) -> Self {
        ChannelSink { tx }
    }
}

impl ProgressSink for ChannelSink {
    fn repaint(&self, frame: &Frame<'_>) {
        match self.tx.try_send(EngineEvent::Repaint(frame.to_snapshot())) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::trace!("Repaint dropped, event channel is full");
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::trace!("Repaint dropped, event receiver is gone");
            }
        }
    }

    fn status(&self, text: &str) {
        if self.tx.send(EngineEvent::Status(text.to_string())).is_err() {
            tracing::debug!("Status dropped, event receiver is gone: {:?}", text);
        }
    }
}

/// Ignores repaints and writes statuses to the log. Used by headless runs.
#[derive(Debug, Default)]
pub struct LogSink;

impl ProgressSink for LogSink {
    fn repaint(&self, _frame: &Frame<'_>) {}

    fn status(&self, text: &str) {
        for line in text.lines() {
            tracing::info!("{}", line);
        }
    }
}

/// Rate-limited event counter: lets one repaint through every `every` steps and
/// sleeps for `delay` after each one to pace the visualization.
#[derive(Debug, Clone)]
pub struct Pacer {
    every: usize,
    delay: Duration,
    steps: usize,
}

impl Pacer {
    /// `every` of 0 is treated as 1.
    pub fn new(every: usize, delay: Duration) -> Self {
        Pacer {
            every: every.max(1),
            delay,
            steps: 0,
        }
    }

    /// Counts one step. Returns `true` when a repaint is due.
    pub fn tick(&mut self) -> bool {
        self.steps += 1;
        self.steps % self.every == 0
    }

    /// Sleeps for the configured delay, if any.
    pub fn pause(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }

    /// Counts one step and, if a repaint is due, emits it through `sink` and pauses.
    pub fn step(&mut self, sink: &dyn ProgressSink, frame: &Frame<'_>) {
        if self.tick() {
            sink.repaint(frame);
            self.pause();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pacer_lets_every_nth_step_through() {
        let mut pacer = Pacer::new(3, Duration::ZERO);
        let due = (0..9).filter(|_| pacer.tick()).count();
        assert_eq!(due, 3);

        let mut every_step = Pacer::new(0, Duration::ZERO);
        assert!(every_step.tick());
        assert!(every_step.tick());
    }

    #[test]
    fn test_channel_sink_coalesces_repaints_but_keeps_statuses() {
        let (tx, rx) = std::sync::mpsc::sync_channel(1);
        let sink = ChannelSink::new(tx);
        let maze = Maze::new(2, 2);
        let frame = Frame {
            maze: &maze,
            terrain: None,
            path: &[],
        };
        sink.repaint(&frame);
        // Channel is full now, this one is dropped
        sink.repaint(&frame);
        assert!(matches!(rx.recv(), Ok(EngineEvent::Repaint(_))));

        sink.status("done");
        match rx.recv() {
            Ok(EngineEvent::Status(text)) => assert_eq!(text, "done"),
            other => panic!("Expected a status event, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }
}
