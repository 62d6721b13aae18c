use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    thread::JoinHandle,
};

use rand::rngs::StdRng;

use crate::{
    config::EngineConfig,
    generators::{assign_terrain, get_rng, inject_loops, randomized_prim},
    maze::{Coord, CostProvider, Maze, TerrainMap, UniformCost},
    progress::{Frame, Pacer, ProgressSink, Snapshot},
    solvers::{SearchStats, Solver, solve_maze},
};

/// A unit of work run on a worker thread.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Job {
    GenerateStandard,
    GenerateWeighted,
    Solve(Solver),
}

/// State shared between the engine and its worker. Only the active worker mutates it.
struct Session {
    maze: Maze,
    /// Present only in weighted terrain mode
    terrain: Option<TerrainMap>,
    path: Vec<Coord>,
    stats: Option<SearchStats>,
    rng: StdRng,
}

/// Clears the busy flag when the worker is done, even if it panicked.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sequences maze generation and solving on background workers.
///
/// At most one worker runs at a time. A request made while a worker is active is
/// dropped and the entry point returns `false`. Progress and status text go to the
/// [`ProgressSink`]; the final status of a run is sent once the maze is no longer
/// being mutated, and the engine stays busy until it has been delivered. Statuses
/// of consecutive runs therefore never interleave.
pub struct Engine {
    config: Arc<EngineConfig>,
    session: Arc<Mutex<Session>>,
    busy: Arc<AtomicBool>,
    sink: Arc<dyn ProgressSink>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// Locks the session. A worker that panicked mid-run leaves a structurally valid
/// maze behind, so a poisoned lock is still usable.
fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Engine {
    /// Creates an engine with an all-walls maze of the configured size.
    ///
    /// Panics if either configured dimension is 0.
    pub fn new(config: EngineConfig, sink: Arc<dyn ProgressSink>) -> Self {
        let session = Session {
            maze: Maze::new(config.rows, config.cols),
            terrain: None,
            path: Vec::new(),
            stats: None,
            rng: get_rng(config.seed),
        };
        Engine {
            config: Arc::new(config),
            session: Arc::new(Mutex::new(session)),
            busy: Arc::new(AtomicBool::new(false)),
            sink,
            worker: Mutex::new(None),
        }
    }

    /// Whether a worker is currently running.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Rebuilds the maze with Prim's algorithm, without terrain.
    pub fn generate_standard(&self) -> bool {
        self.submit(Job::GenerateStandard)
    }

    /// Builds a perfect maze, assigns terrain costs and injects extra connections.
    pub fn generate_weighted_terrain(&self) -> bool {
        self.submit(Job::GenerateWeighted)
    }

    /// Runs BFS (`use_bfs`) or DFS from start to end.
    pub fn solve_unweighted(&self, use_bfs: bool) -> bool {
        self.submit(Job::Solve(if use_bfs { Solver::Bfs } else { Solver::Dfs }))
    }

    /// Runs A* (`use_astar`) or Dijkstra from start to end, using terrain costs in
    /// weighted terrain mode and a cost of 1 per step otherwise.
    pub fn solve_weighted(&self, use_astar: bool) -> bool {
        self.submit(Job::Solve(if use_astar {
            Solver::AStar
        } else {
            Solver::Dijkstra
        }))
    }

    /// Clears the search marks and the path of the previous solve. Solves do this
    /// themselves; this is for callers that want a clean view. No-op if busy.
    pub fn reset_solver(&self) -> bool {
        if !self.try_claim() {
            return false;
        }
        let _guard = BusyGuard(self.busy.clone());
        let mut session = lock(&self.session);
        session.maze.reset_search_state();
        session.path.clear();
        let session = &*session;
        self.sink.repaint(&Frame {
            maze: &session.maze,
            terrain: session.terrain.as_ref(),
            path: &session.path,
        });
        true
    }

    /// Blocks until the active worker, if any, has finished.
    pub fn join(&self) {
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle
            && handle.join().is_err()
        {
            tracing::error!("Engine worker panicked");
        }
    }

    /// Copy of the current maze, terrain and path. Blocks while a worker is running.
    pub fn snapshot(&self) -> Snapshot {
        let session = lock(&self.session);
        Snapshot {
            maze: session.maze.clone(),
            terrain: session.terrain.clone(),
            path: session.path.clone(),
        }
    }

    /// Statistics of the most recent solve on the current maze. Blocks while a worker
    /// is running.
    pub fn last_stats(&self) -> Option<SearchStats> {
        lock(&self.session).stats.clone()
    }

    fn try_claim(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn submit(&self, job: Job) -> bool {
        if !self.try_claim() {
            tracing::debug!("Engine is busy, dropping request {:?}", job);
            return false;
        }
        tracing::info!("Starting {:?}", job);

        let config = self.config.clone();
        let session = self.session.clone();
        let busy = self.busy.clone();
        let sink = self.sink.clone();
        let handle = std::thread::spawn(move || {
            let _guard = BusyGuard(busy);
            let status = {
                let mut session = lock(&session);
                match job {
                    Job::GenerateStandard => generate(&mut session, &config, sink.as_ref(), false),
                    Job::GenerateWeighted => generate(&mut session, &config, sink.as_ref(), true),
                    Job::Solve(solver) => solve(&mut session, &config, sink.as_ref(), solver),
                }
                // Session lock is released here, the busy flag only after the final status
            };
            tracing::info!("Finished {:?}", job);
            sink.status(&status);
        });
        let previous = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        // The previous worker already released the busy flag, so it is only exiting
        if let Some(previous) = previous
            && previous.join().is_err()
        {
            tracing::error!("Engine worker panicked");
        }
        true
    }
}

/// Builds a new maze in the session. Returns the final status text.
fn generate(
    session: &mut Session,
    config: &EngineConfig,
    sink: &dyn ProgressSink,
    weighted: bool,
) -> String {
    sink.status("Generating Maze...");
    let Session {
        maze,
        terrain,
        path,
        stats,
        rng,
    } = session;
    *terrain = None;
    *stats = None;
    path.clear();

    let mut pacer = Pacer::new(config.generation_batch, config.generation_delay);
    randomized_prim(maze, rng, &mut |maze: &Maze| {
        pacer.step(
            sink,
            &Frame {
                maze,
                terrain: None,
                path: &[],
            },
        )
    });

    let status = if weighted {
        let mut map = TerrainMap::new(maze.rows(), maze.cols());
        let endpoints = [maze.start(), maze.end()];
        assign_terrain(&mut map, rng, &config.terrain, &endpoints);
        let removed = inject_loops(maze, rng, config.loop_count, &mut |maze: &Maze| {
            pacer.step(
                sink,
                &Frame {
                    maze,
                    terrain: Some(&map),
                    path: &[],
                },
            )
        });
        tracing::info!(
            "Generated {}x{} terrain maze with {} extra passages",
            maze.rows(),
            maze.cols(),
            removed
        );
        *terrain = Some(map);
        "Terrain Generated with Loops.\nMultiple paths available for comparison."
    } else {
        tracing::info!("Generated {}x{} maze", maze.rows(), maze.cols());
        "Maze Generated.\nReady to solve."
    };

    sink.repaint(&Frame {
        maze: &*maze,
        terrain: terrain.as_ref(),
        path: path.as_slice(),
    });
    status.to_string()
}

/// Runs one search over the session's maze and reveals the path. Returns the final
/// status text.
fn solve(
    session: &mut Session,
    config: &EngineConfig,
    sink: &dyn ProgressSink,
    solver: Solver,
) -> String {
    sink.status(&format!("Running {}...", solver));
    let Session {
        maze,
        terrain,
        path,
        stats,
        ..
    } = session;
    maze.reset_search_state();
    path.clear();
    *stats = None;

    let terrain = terrain.as_ref();
    let costs: &dyn CostProvider = match terrain {
        Some(map) if solver.is_weighted() => map,
        _ => &UniformCost,
    };
    let (mut pacer, mut path_pacer) = if solver.is_weighted() {
        (
            Pacer::new(config.weighted_search_batch, config.weighted_search_delay),
            Pacer::new(1, config.weighted_path_delay),
        )
    } else {
        (
            Pacer::new(config.search_batch, config.search_delay),
            Pacer::new(1, config.path_delay),
        )
    };

    let mut outcome = solve_maze(maze, solver, costs, &mut |maze: &Maze| {
        pacer.step(
            sink,
            &Frame {
                maze,
                terrain,
                path: &[],
            },
        )
    });
    outcome.stats.terrain_mode = solver.is_weighted() && terrain.is_some();

    for &coord in &outcome.path {
        path.push(coord);
        path_pacer.step(
            sink,
            &Frame {
                maze: &*maze,
                terrain,
                path: path.as_slice(),
            },
        );
    }

    tracing::info!(
        "{}: found={} visited={} cost={:?}",
        solver,
        outcome.stats.found,
        outcome.stats.nodes_visited,
        outcome.stats.total_cost
    );
    let status = outcome.stats.to_string();
    *stats = Some(outcome.stats);
    status
}
