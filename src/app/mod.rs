mod cell;
mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, KeyCode},
    queue,
    terminal::{self, ClearType},
};

use crate::{
    app::renderer::Renderer,
    config::EngineConfig,
    engine::Engine,
    progress::{ChannelSink, EngineEvent},
};

/// What a key press asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq)]
enum UserAction {
    Generate,
    GenerateTerrain,
    Bfs,
    Dfs,
    Dijkstra,
    AStar,
    Reset,
    Quit,
}

impl UserAction {
    fn from_key(code: KeyCode) -> Option<Self> {
        let action = match code {
            KeyCode::Char('g') => UserAction::Generate,
            KeyCode::Char('t') => UserAction::GenerateTerrain,
            KeyCode::Char('b') => UserAction::Bfs,
            KeyCode::Char('d') => UserAction::Dfs,
            KeyCode::Char('j') => UserAction::Dijkstra,
            KeyCode::Char('a') => UserAction::AStar,
            KeyCode::Char('r') => UserAction::Reset,
            KeyCode::Esc | KeyCode::Char('q') => UserAction::Quit,
            _ => return None,
        };
        Some(action)
    }
}

pub struct App {
    config: EngineConfig,
    /// How often the input loop wakes up to check whether the renderer died
    input_poll_timeout: Duration,
}

impl App {
    /// Maximum number of events buffered between the engine and the render thread.
    /// Repaints beyond this are dropped until the renderer catches up.
    const MAX_EVENTS_IN_CHANNEL_BUFFER: usize = 4;

    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            input_poll_timeout: Duration::from_millis(100),
        }
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Main application loop. Starts the render thread, generates a first maze and
    /// dispatches key presses to the engine until the user quits.
    pub fn run(&self) -> std::io::Result<()> {
        let (event_tx, event_rx) =
            std::sync::mpsc::sync_channel::<EngineEvent>(App::MAX_EVENTS_IN_CHANNEL_BUFFER);
        let engine = Engine::new(self.config.clone(), Arc::new(ChannelSink::new(event_tx)));

        // Set by the main thread on quit, or by the render thread when it fails
        let should_stop = Arc::new(AtomicBool::new(false));
        let should_stop_for_render = should_stop.clone();
        let render_thread_handle = std::thread::spawn(move || {
            let result = Renderer::new().render(event_rx, &should_stop_for_render);
            should_stop_for_render.store(true, Ordering::Release);
            result
        });

        engine.generate_standard();
        self.input_loop(&engine, &should_stop)?;

        should_stop.store(true, Ordering::Release);
        // A running worker is abandoned: its events go nowhere once the renderer is gone
        if engine.is_busy() {
            tracing::info!("Quitting while the engine is busy");
        }
        render_thread_handle
            .join()
            .expect("Render thread panicked")
    }

    /// Reads key presses and forwards them to the engine. Returns on quit or when the
    /// render thread has stopped.
    fn input_loop(&self, engine: &Engine, should_stop: &AtomicBool) -> std::io::Result<()> {
        tracing::info!("Started input loop");
        loop {
            if should_stop.load(Ordering::Acquire) {
                tracing::debug!("[input loop] render thread stopped, exiting");
                return Ok(());
            }
            if !event::poll(self.input_poll_timeout)? {
                continue;
            }
            let code = match event::read()? {
                event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                    key_event.code
                }
                _ => continue,
            };
            let Some(action) = UserAction::from_key(code) else {
                continue;
            };

            let accepted = match action {
                UserAction::Generate => engine.generate_standard(),
                UserAction::GenerateTerrain => engine.generate_weighted_terrain(),
                UserAction::Bfs => engine.solve_unweighted(true),
                UserAction::Dfs => engine.solve_unweighted(false),
                UserAction::Dijkstra => engine.solve_weighted(false),
                UserAction::AStar => engine.solve_weighted(true),
                UserAction::Reset => engine.reset_solver(),
                UserAction::Quit => {
                    tracing::info!("[input loop] quit requested");
                    return Ok(());
                }
            };
            if !accepted {
                tracing::debug!("[input loop] engine busy, ignored {:?}", action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_bindings() {
        assert_eq!(
            UserAction::from_key(KeyCode::Char('g')),
            Some(UserAction::Generate)
        );
        assert_eq!(
            UserAction::from_key(KeyCode::Char('t')),
            Some(UserAction::GenerateTerrain)
        );
        assert_eq!(UserAction::from_key(KeyCode::Char('b')), Some(UserAction::Bfs));
        assert_eq!(UserAction::from_key(KeyCode::Char('d')), Some(UserAction::Dfs));
        assert_eq!(
            UserAction::from_key(KeyCode::Char('j')),
            Some(UserAction::Dijkstra)
        );
        assert_eq!(UserAction::from_key(KeyCode::Char('a')), Some(UserAction::AStar));
        assert_eq!(UserAction::from_key(KeyCode::Esc), Some(UserAction::Quit));
        assert_eq!(UserAction::from_key(KeyCode::Char('q')), Some(UserAction::Quit));
        assert_eq!(UserAction::from_key(KeyCode::Enter), None);
    }
}
