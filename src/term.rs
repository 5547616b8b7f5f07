//! Terminal collaborators: key input, frame pacing, screen setup, and the
//! interactive tick loop that ties them to a [`Game`].

use std::collections::VecDeque;
use std::io::{self, Write, stdout};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Print, ResetColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::Rng;

use crate::error::GameError;
use crate::game::{ESC, Game, Mode, Tick};

/// A non-blocking source of lowercase key characters.
pub trait KeySource {
    /// The next pending key, or `None` if nothing was pressed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input device cannot be read.
    fn poll_key(&mut self) -> io::Result<Option<char>>;
}

/// Keys read from the terminal through crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn poll_key(&mut self) -> io::Result<Option<char>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(map_key(key));
                }
            }
        }
        Ok(None)
    }
}

/// Keys queued up front; an empty queue reads as no key.
impl KeySource for VecDeque<Option<char>> {
    fn poll_key(&mut self) -> io::Result<Option<char>> {
        Ok(self.pop_front().flatten())
    }
}

/// Normalise a key event: letters are lowercased, Escape and Ctrl-C both
/// become [`ESC`]. Keys with no character are dropped.
#[must_use]
pub fn map_key(key: KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char('c' | 'C') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(ESC),
        KeyCode::Char(c) => Some(c.to_ascii_lowercase()),
        KeyCode::Esc => Some(ESC),
        _ => None,
    }
}

/// Sleeps out the remainder of each frame.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    period: Duration,
    last: Instant,
}

impl FramePacer {
    /// Pace at `fps` frames per second; zero is treated as one.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / fps.max(1),
            last: Instant::now(),
        }
    }

    /// Length of one frame.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Block until one period has passed since the previous call.
    pub fn wait(&mut self) {
        let elapsed = self.last.elapsed();
        if elapsed < self.period {
            thread::sleep(self.period - elapsed);
        }
        self.last = Instant::now();
    }
}

/// Raw mode on the alternate screen with a hidden cursor, restored on drop.
#[derive(Debug)]
pub struct TerminalSession {
    _guard: (),
}

impl TerminalSession {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal refuses raw mode or the alternate
    /// screen.
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self { _guard: () })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(stdout(), ResetColor, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// The two hint lines shown under the map in `mode`.
#[must_use]
pub fn hint_lines(mode: Mode, level: u32) -> [String; 2] {
    match mode {
        Mode::Running => [
            "`wasd`-> move    `j`-> attack    `:`-> pause    `Esc`-> quit".to_string(),
            format!("Level {level}"),
        ],
        Mode::Paused => [
            "`q`,`Esc`-> quit    `r`-> start new    `c`-> continue".to_string(),
            format!("Level {level}    [NOTE] `r` starts over on a new map once you have played"),
        ],
        Mode::Resolved(_) => [String::new(), String::new()],
    }
}

/// Write the hint lines for `mode` below a map of `map_height` rows.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_hints<W: Write>(out: &mut W, map_height: i32, mode: Mode, level: u32) -> io::Result<()> {
    let first_row = u16::try_from(map_height + 2).unwrap_or(u16::MAX);
    queue!(out, ResetColor)?;
    for (row, line) in (first_row..).zip(hint_lines(mode, level)) {
        queue!(out, MoveTo(0, row), Clear(ClearType::CurrentLine), Print(line))?;
    }
    out.flush()
}

/// Run ticks until the level resolves or the player quits.
///
/// Each tick reads at most one key, advances `game`, flushes the changed
/// cells to `out`, and refreshes the hint lines whenever the mode changes.
/// Pause-menu restarts are handled here and do not return.
///
/// # Errors
///
/// Returns an error if input or output fails, or a restart cannot populate
/// the new map.
pub fn drive<R, K, W>(game: &mut Game<R>, keys: &mut K, out: &mut W, pacer: &mut FramePacer) -> Result<Tick, GameError>
where
    R: Rng,
    K: KeySource,
    W: Write,
{
    let mut shown: Option<Mode> = None;
    loop {
        let key = keys.poll_key()?;
        let tick = game.update(key)?;
        game.buffer_mut().flush(out)?;
        if tick == Tick::Restarted {
            shown = None;
        }
        if shown != Some(game.mode()) {
            write_hints(out, game.config().map_height, game.mode(), game.level())?;
            shown = Some(game.mode());
        }
        match tick {
            Tick::Continue | Tick::Restarted => pacer.wait(),
            Tick::Resolved(_) | Tick::Quit => return Ok(tick),
        }
    }
}
