use super::events::{Event, Events};
use super::theme::Theme;
use crate::connectfour::model::{Redispatch, Snapshot};
use crate::core::client::{ConnectionState, TurnClient};
use crate::core::dispatch::{UiContext, UiQueue};
use crate::core::entities::{Cell, Status};
use crate::core::errors::{AppError, GameError};
use crate::core::helpers::{get_column_label, lock, parse_input_column};
use log::{info, warn};
use std::io::{self, Write};
use std::sync::Arc;
use termion::color;

#[derive(Debug, PartialEq, Eq)]
enum Control {
    Continue,
    Quit,
}

pub fn render<W: Write>(snapshot: &Snapshot, theme: &Theme, out: &mut W) -> io::Result<()> {
    let dimensions = snapshot.board.dimensions();

    write!(out, "{}{}", termion::clear::All, termion::cursor::Goto(1, 1))?;

    let header: Vec<String> = (0..dimensions.columns)
        .map(|col| format!("{:>2}", get_column_label(col)))
        .collect();
    writeln!(out, " {}", header.join(""))?;

    for row in snapshot.board.rows() {
        write!(out, "{}|{}", color::Fg(theme.grid_color), color::Fg(color::Reset))?;
        for cell in row {
            match cell {
                Cell::Empty => write!(
                    out,
                    " {}{}{}",
                    color::Fg(theme.grid_color),
                    theme.empty_char,
                    color::Fg(color::Reset)
                )?,
                Cell::PlayerOne => write!(
                    out,
                    " {}{}{}",
                    color::Fg(theme.player_one_color),
                    theme.piece_char,
                    color::Fg(color::Reset)
                )?,
                Cell::PlayerTwo => write!(
                    out,
                    " {}{}{}",
                    color::Fg(theme.player_two_color),
                    theme.piece_char,
                    color::Fg(color::Reset)
                )?,
            }
        }
        writeln!(out, " {}|{}", color::Fg(theme.grid_color), color::Fg(color::Reset))?;
    }

    match snapshot.status {
        Status::InProgress => {
            let turn_label = if snapshot.my_turn {
                "YOUR TURN"
            } else {
                "NOT YOUR TURN"
            };
            writeln!(out, "{}   moves left: {}", turn_label, snapshot.moves_left)?;
            if snapshot.my_turn {
                write!(out, "column (1-{}, q to quit): ", dimensions.columns)?;
            }
        }
        Status::Error => writeln!(
            out,
            "GAME OVER: {}",
            snapshot.error_reason.as_deref().unwrap_or("error")
        )?,
        status => writeln!(out, "GAME OVER: {}", status)?,
    }

    out.flush()
}

fn render_to_stdout(snapshot: &Snapshot, theme: &Theme) {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = render(snapshot, theme, &mut out) {
        warn!("can't draw the board: {}", e);
    }
}

fn handle_input(client: &TurnClient, input: &str, columns: usize) -> Result<Control, GameError> {
    let input = input.trim();

    if input == "q" || input == "quit" {
        return Ok(Control::Quit);
    }

    let column = match parse_input_column(input, columns) {
        Some(column) => column,
        None => {
            println!("enter a column between 1 and {}", columns);
            return Ok(Control::Continue);
        }
    };

    match client.send_move(column) {
        Ok(()) => Ok(Control::Continue),
        Err(e) if !e.is_fatal() => {
            println!("{}", e);
            Ok(Control::Continue)
        }
        Err(e) => Err(e),
    }
}

/// Runs the UI loop on the calling thread until the game ends, the user quits
/// or stdin closes.
pub fn run(
    client: &mut TurnClient,
    context: UiContext,
    queue: UiQueue,
    theme: Theme,
) -> Result<(), AppError> {
    let theme = Arc::new(theme);
    let model = client.model();

    let (columns, initial) = {
        let mut model = lock(&model);
        let view_theme = theme.clone();
        model.subscribe(Box::new(Redispatch::new(context, move |snapshot: Snapshot| {
            render_to_stdout(&snapshot, &view_theme)
        })));

        (model.dimensions().columns, model.snapshot())
    };
    render_to_stdout(&initial, &theme);

    let events = Events::new();

    let outcome = loop {
        queue.run_pending();

        let over = lock(&model).status().is_terminal();
        if over || client.state() == ConnectionState::Closed {
            break Ok(());
        }

        match events.next() {
            Event::Tick => {}
            Event::InputClosed => {
                info!("stdin closed, leaving the game");
                break Ok(());
            }
            Event::Input(line) => match handle_input(client, &line, columns) {
                Ok(Control::Continue) => {}
                Ok(Control::Quit) => break Ok(()),
                Err(e) => break Err(AppError::from(e)),
            },
        }
    };

    client.close();
    queue.run_pending();

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectfour::model::BoardModel;
    use crate::core::entities::{Dimensions, Player};
    use std::sync::Mutex;

    fn rendered(model: &BoardModel) -> String {
        let mut out = Vec::new();
        render(&model.snapshot(), &Theme::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn shows_turn_and_moves_left() {
        let mut model = BoardModel::new(Dimensions::default());
        model.set_my_turn(true);
        assert!(rendered(&model).contains("YOUR TURN   moves left: 42"));

        model.apply_move(3, Player::PlayerOne).unwrap();
        let text = rendered(&model);
        assert!(text.contains("NOT YOUR TURN   moves left: 41"));
        assert!(text.contains(" 1 2 3 4 5 6 7"));
    }

    #[test]
    fn shows_error_reason() {
        let mut model = BoardModel::new(Dimensions::new(2, 2));
        model.set_error("connection lost");
        assert!(rendered(&model).contains("GAME OVER: connection lost"));

        let mut model = BoardModel::new(Dimensions::new(2, 2));
        model.set_status(Status::IWon);
        assert!(rendered(&model).contains("GAME OVER: you won"));
    }

    #[test]
    fn input_handling() {
        let client = TurnClient::new(Arc::new(Mutex::new(BoardModel::new(
            Dimensions::default(),
        ))));

        assert_eq!(handle_input(&client, "q\n", 7).unwrap(), Control::Quit);
        assert_eq!(handle_input(&client, "9", 7).unwrap(), Control::Continue);
        assert!(handle_input(&client, "2", 7).unwrap_err().is_fatal());
    }
}
