use std::{
    io::{Stdout, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, RecvTimeoutError},
    },
    time::Duration,
};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    app::cell::GridCell,
    maze::{Direction, Grid},
    progress::{EngineEvent, Snapshot},
};

/// Converts a snapshot into the character layout drawn on screen: a
/// `(2 * rows + 1) x (2 * cols + 1)` grid where odd positions are maze cells and the
/// positions between them are walls or passages.
pub fn layout(snapshot: &Snapshot) -> Grid<GridCell> {
    let maze = &snapshot.maze;
    let mut grid = Grid::new(maze.rows() * 2 + 1, maze.cols() * 2 + 1, GridCell::Wall);
    let to_grid = |(r, c): (usize, usize)| (r * 2 + 1, c * 2 + 1);

    for coord in maze.coords() {
        let cell = match (&snapshot.terrain, maze.is_search_visited(coord)) {
            (_, true) => GridCell::Visited,
            (Some(terrain), false) => GridCell::Ground(terrain.get(coord)),
            (None, false) => GridCell::Open,
        };
        let (gr, gc) = to_grid(coord);
        grid[(gr, gc)] = cell;
        if maze.is_in_bounds(Direction::East.step(coord)) && !maze.has_wall(coord, Direction::East)
        {
            grid[(gr, gc + 1)] = GridCell::Open;
        }
        if maze.is_in_bounds(Direction::South.step(coord))
            && !maze.has_wall(coord, Direction::South)
        {
            grid[(gr + 1, gc)] = GridCell::Open;
        }
    }

    // Entrance and exit on the outer boundary
    let (start, end) = (maze.start(), maze.end());
    if !maze.has_wall(start, Direction::West) {
        grid[(to_grid(start).0, 0)] = GridCell::Open;
    }
    if !maze.has_wall(end, Direction::East) {
        let last_col = grid.cols() - 1;
        grid[(to_grid(end).0, last_col)] = GridCell::Open;
    }

    for (i, &coord) in snapshot.path.iter().enumerate() {
        let (gr, gc) = to_grid(coord);
        grid[(gr, gc)] = GridCell::Route;
        if let Some(&prev) = i.checked_sub(1).and_then(|p| snapshot.path.get(p)) {
            let (pr, pc) = to_grid(prev);
            grid[((gr + pr) / 2, (gc + pc) / 2)] = GridCell::Route;
        }
    }

    grid[to_grid(start)] = GridCell::Start;
    grid[to_grid(end)] = GridCell::Goal;
    grid
}

/// Lines of the status panel: at most `NUM_LOG_ROWS - 1` lines, each cut to `width`
/// columns. The last panel row is kept for the key help.
fn status_lines(status: &str, width: usize) -> Vec<&str> {
    status
        .lines()
        .take(Renderer::NUM_LOG_ROWS as usize - 1)
        .map(|line| line.unicode_truncate(width).0)
        .collect()
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// Most recent snapshot, redrawn when the terminal is resized
    snapshot: Option<Snapshot>,
    /// Most recent status text
    status: String,
    /// Terminal size at the last full redraw
    term_size: (u16, u16),
}

impl Renderer {
    /// Number of rows below the maze reserved for status text and key help
    pub const NUM_LOG_ROWS: u16 = 9;
    /// How often to check the stop flag while no events arrive
    const RECV_TIMEOUT: Duration = Duration::from_millis(100);
    const KEY_HELP: &str =
        "g: generate  t: terrain  b: BFS  d: DFS  j: Dijkstra  a: A*  r: reset  Esc/q: quit";

    pub fn new() -> Self {
        Self {
            stdout: std::io::stdout(),
            snapshot: None,
            status: String::new(),
            term_size: (0, 0),
        }
    }

    /// Draws the latest snapshot. Shows a notice instead if the terminal is too small.
    fn draw_snapshot(&mut self) -> std::io::Result<()> {
        let size = terminal::size()?;
        if size != self.term_size {
            self.term_size = size;
            self.stdout.queue(terminal::Clear(ClearType::All))?;
        }
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };
        let grid = layout(snapshot);
        let (term_width, term_height) = size;
        let needed_width = grid.cols() as u16 * GridCell::CELL_WIDTH;
        let needed_height = grid.rows() as u16 + Renderer::NUM_LOG_ROWS;
        if term_width < needed_width || term_height < needed_height {
            let msg = format!(
                "Terminal size is too small ({}x{}) for the maze ({}x{}). Please resize the terminal.",
                term_width, term_height, needed_width, needed_height
            );
            let (msg, _) = msg.unicode_truncate(term_width as usize);
            queue!(
                self.stdout,
                cursor::MoveTo(0, 0),
                terminal::Clear(ClearType::CurrentLine),
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
            )?;
            return self.stdout.flush();
        }

        for row in 0..grid.rows() {
            self.stdout.queue(cursor::MoveTo(0, row as u16))?;
            for col in 0..grid.cols() {
                self.stdout.queue(style::Print(grid[(row, col)]))?;
            }
        }
        self.stdout.flush()
    }

    /// Draws the status text and key help below the maze, truncated to the terminal width.
    fn draw_status(&mut self) -> std::io::Result<()> {
        let top = self
            .snapshot
            .as_ref()
            .map(|s| s.maze.rows() as u16 * 2 + 1)
            .unwrap_or(0);
        let width = self.term_size.0 as usize;
        queue!(
            self.stdout,
            cursor::MoveTo(0, top),
            terminal::Clear(ClearType::FromCursorDown)
        )?;
        for (i, line) in status_lines(&self.status, width).into_iter().enumerate() {
            queue!(
                self.stdout,
                cursor::MoveTo(0, top + i as u16),
                style::PrintStyledContent(line.with(Color::Green))
            )?;
        }
        let (help, _) = Renderer::KEY_HELP.unicode_truncate(width);
        queue!(
            self.stdout,
            cursor::MoveTo(0, top + Renderer::NUM_LOG_ROWS - 1),
            style::PrintStyledContent(help.with(Color::DarkGrey).attribute(Attribute::Dim))
        )?;
        self.stdout.flush()
    }

    /// Render loop. Draws engine events until `should_stop` is set or every sender is gone.
    /// Queued repaints are coalesced: only the newest one is drawn.
    pub fn render(
        &mut self,
        event_rx: Receiver<EngineEvent>,
        should_stop: &AtomicBool,
    ) -> std::io::Result<()> {
        self.term_size = terminal::size()?;
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::Hide)?;
        self.draw_status()?;

        loop {
            if should_stop.load(Ordering::Acquire) {
                tracing::debug!("[render] should_stop flag set, exiting render thread");
                break;
            }
            let first = match event_rx.recv_timeout(Renderer::RECV_TIMEOUT) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => {
                    // Pick up terminal resizes while idle
                    if terminal::size()? != self.term_size {
                        self.draw_snapshot()?;
                        self.draw_status()?;
                    }
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("[render] event channel closed, exiting render thread");
                    break;
                }
            };

            let mut repaint = false;
            let mut status_changed = false;
            for event in std::iter::once(first).chain(event_rx.try_iter()) {
                match event {
                    EngineEvent::Repaint(snapshot) => {
                        self.snapshot = Some(snapshot);
                        repaint = true;
                    }
                    EngineEvent::Status(text) => {
                        tracing::debug!("[render] status: {:?}", text);
                        self.status = text;
                        status_changed = true;
                    }
                }
            }
            if repaint {
                self.draw_snapshot()?;
            }
            if repaint || status_changed {
                self.draw_status()?;
            }
        }
        Ok(())
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Maze, Terrain, TerrainMap};

    fn snapshot(maze: Maze) -> Snapshot {
        Snapshot {
            maze,
            terrain: None,
            path: Vec::new(),
        }
    }

    #[test]
    fn test_status_lines_fit_panel() {
        let report = "Algorithm: A* (A-Star)\n----------------\nStatus: Finished";
        assert_eq!(
            status_lines(report, 80),
            vec!["Algorithm: A* (A-Star)", "----------------", "Status: Finished"]
        );
        assert_eq!(status_lines(report, 9), vec!["Algorithm", "---------", "Status: F"]);
        assert!(status_lines(report, 0).iter().all(|line| line.is_empty()));

        let long = (0..20).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        assert_eq!(
            status_lines(&long, 80).len(),
            Renderer::NUM_LOG_ROWS as usize - 1
        );
    }

    #[test]
    fn test_layout_of_closed_maze() {
        let grid = layout(&snapshot(Maze::new(2, 3)));
        assert_eq!((grid.rows(), grid.cols()), (5, 7));
        assert_eq!(grid[(1, 1)], GridCell::Start);
        assert_eq!(grid[(3, 5)], GridCell::Goal);
        assert_eq!(grid[(1, 3)], GridCell::Open);
        // Walls between cells and on the boundary
        assert_eq!(grid[(1, 2)], GridCell::Wall);
        assert_eq!(grid[(2, 1)], GridCell::Wall);
        assert_eq!(grid[(1, 0)], GridCell::Wall);
    }

    #[test]
    fn test_layout_shows_passages_path_and_terrain() {
        let mut maze = Maze::new(2, 2);
        maze.remove_wall_between((0, 0), (0, 1));
        maze.remove_wall_between((0, 1), (1, 1));
        maze.open_boundary((0, 0), Direction::West);
        maze.open_boundary((1, 1), Direction::East);
        maze.mark_search_visited((1, 0));
        let mut terrain = TerrainMap::new(2, 2);
        terrain.set((0, 1), Terrain::Mud);

        let mut snap = snapshot(maze);
        snap.terrain = Some(terrain);
        let grid = layout(&snap);
        assert_eq!(grid[(1, 0)], GridCell::Open);
        assert_eq!(grid[(3, 4)], GridCell::Open);
        assert_eq!(grid[(1, 2)], GridCell::Open);
        assert_eq!(grid[(1, 3)], GridCell::Ground(Terrain::Mud));
        assert_eq!(grid[(3, 1)], GridCell::Visited);

        snap.path = vec![(0, 0), (0, 1), (1, 1)];
        let grid = layout(&snap);
        assert_eq!(grid[(1, 2)], GridCell::Route);
        assert_eq!(grid[(1, 3)], GridCell::Route);
        assert_eq!(grid[(2, 3)], GridCell::Route);
        assert_eq!(grid[(1, 1)], GridCell::Start);
        assert_eq!(grid[(3, 3)], GridCell::Goal);
    }
}
