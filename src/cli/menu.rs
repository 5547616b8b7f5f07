//! Between-level screens: the level result and the buff selection.

use super::CliError;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
};
use std::io::stdout;
use tankgrid::game::{BuffOffer, ESC, Outcome};
use tankgrid::term::map_key;

/// What the player picked on a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Choice<T> {
    /// Carry on with this value.
    Pick(T),
    /// Leave the game.
    Quit,
}

/// Decode a key on the result screen.
pub(crate) const fn result_key(key: char) -> Option<Choice<()>> {
    match key {
        'r' | 'c' => Some(Choice::Pick(())),
        'q' | ESC => Some(Choice::Quit),
        _ => None,
    }
}

/// Decode a key on the buff screen into an offer index.
pub(crate) fn offer_key(key: char) -> Option<Choice<usize>> {
    match key {
        'a'..='d' => Some(Choice::Pick(key as usize - 'a' as usize)),
        '1'..='4' => Some(Choice::Pick(key as usize - '1' as usize)),
        'q' | ESC => Some(Choice::Quit),
        _ => None,
    }
}

/// Table cells for one offer: the player's half, then the enemy's.
pub(crate) fn offer_cells(offer: &BuffOffer) -> [String; 2] {
    let hidden = || "[HIDDEN BUFF]".to_string();
    [
        offer.shown_player().map_or_else(hidden, |b| b.to_string()),
        offer.shown_enemy().map_or_else(hidden, |b| b.to_string()),
    ]
}

/// Show the result of a level and wait for continue or quit.
///
/// # Errors
///
/// Returns an error if the terminal fails.
pub(crate) fn result_screen(outcome: Outcome, level: u32) -> Result<Choice<()>, CliError> {
    let (title, color) = match outcome {
        Outcome::Won => ("Win!", Color::Green),
        Outcome::Lost => ("Lose...", Color::Red),
    };
    let lines = vec![
        Line::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from(format!("Level {level}")),
        Line::from(""),
        Line::from("Press `r` or `c` to continue, `q` or `Esc` to quit"),
    ];

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;
    terminal.draw(|f| {
        let widget = Paragraph::new(lines.clone()).block(Block::default().borders(Borders::ALL).title(" tankgrid "));
        f.render_widget(widget, f.area());
    })?;

    wait_for(result_key)
}

/// Show the four buff offers and wait for a choice.
///
/// # Errors
///
/// Returns an error if the terminal fails.
pub(crate) fn buff_screen(offers: &[BuffOffer], level: u32) -> Result<Choice<usize>, CliError> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;
    terminal.draw(|f| render_offers(f, offers, level))?;

    loop {
        match wait_for(offer_key)? {
            Choice::Pick(index) if index >= offers.len() => {}
            choice => return Ok(choice),
        }
    }
}

fn render_offers(f: &mut Frame, offers: &[BuffOffer], level: u32) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Min(4),
        ])
        .split(f.area());

    let heading = Paragraph::new(
        "Select a pair of BUFFs. You get your BUFF, but the enemy also gets theirs.",
    )
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).title(format!(" Level {level} ")));
    f.render_widget(heading, chunks[0]);

    let rows = offers.iter().enumerate().map(|(i, offer)| {
        let [player, enemy] = offer_cells(offer);
        let label = char::from(b'a' + u8::try_from(i).unwrap_or(0));
        Row::new(vec![format!("{label}({})", i + 1), player, enemy])
    });
    let table = Table::new(
        rows,
        [Constraint::Length(6), Constraint::Percentage(47), Constraint::Percentage(47)],
    )
    .header(
        Row::new(vec!["", "Your BUFF", "Enemy BUFF"]).style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(table, chunks[1]);

    let footer = Paragraph::new(vec![
        Line::from("Every stat has a limit, so balancing the buffs matters."),
        Line::from("Press `a`-`d` (or `1`-`4`) to choose one, `q` or `Esc` to quit."),
    ])
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[2]);
}

/// Block until `decode` accepts a key.
fn wait_for<T>(decode: impl Fn(char) -> Option<Choice<T>>) -> Result<Choice<T>, CliError> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(choice) = map_key(key).and_then(&decode) {
                return Ok(choice);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tankgrid::game::{Buff, BuffAmount, BuffKind, Visibility};

    #[test]
    fn test_result_keys() {
        assert_eq!(result_key('r'), Some(Choice::Pick(())));
        assert_eq!(result_key('c'), Some(Choice::Pick(())));
        assert_eq!(result_key(ESC), Some(Choice::Quit));
        assert_eq!(result_key('x'), None);
    }

    #[test]
    fn test_offer_keys() {
        assert_eq!(offer_key('a'), Some(Choice::Pick(0)));
        assert_eq!(offer_key('d'), Some(Choice::Pick(3)));
        assert_eq!(offer_key('3'), Some(Choice::Pick(2)));
        assert_eq!(offer_key('q'), Some(Choice::Quit));
        assert_eq!(offer_key('e'), None);
        assert_eq!(offer_key('5'), None);
    }

    #[test]
    fn test_hidden_halves() {
        let offer = BuffOffer {
            player: Buff::new(BuffKind::Speed, BuffAmount::Fixed(1)),
            enemy: Buff::new(BuffKind::Hp, BuffAmount::Random),
            visibility: Visibility::EnemyOnly,
        };
        assert_eq!(offer_cells(&offer), ["[HIDDEN BUFF]".to_string(), "Add [RANDOM] HP".to_string()]);
    }
}
