//! Line protocol spoken with the game server.
//!
//! One message per `\n`-terminated line, tokens separated by a space:
//!
//! ```text
//! server -> client   CONNECT | MAKE_MOVE | MOVE_MADE <col>
//!                    GAME_WON | GAME_LOST | GAME_TIED | ERROR <reason...>
//! client -> server   MOVE <col>
//! ```

use crate::core::entities::Status;
use crate::core::errors::GameError;
use std::fmt;

pub const CONNECT: &str = "CONNECT";
pub const MAKE_MOVE: &str = "MAKE_MOVE";
pub const MOVE_MADE: &str = "MOVE_MADE";
pub const GAME_WON: &str = "GAME_WON";
pub const GAME_LOST: &str = "GAME_LOST";
pub const GAME_TIED: &str = "GAME_TIED";
pub const ERROR: &str = "ERROR";
pub const MOVE: &str = "MOVE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    Connected,
    YourTurn,
    OpponentMoved(usize),
    GameOver(Status),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    Move(usize),
}

impl ServerMessage {
    /// Decodes one line; a trailing `\r\n` or `\n` is ignored. `Ok(None)` for
    /// blank lines.
    pub fn decode(line: &str) -> Result<Option<Self>, GameError> {
        let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');

        if line.trim().is_empty() {
            return Ok(None);
        }

        let (keyword, rest) = match line.find(' ') {
            Some(pos) => (&line[..pos], Some(&line[pos + 1..])),
            None => (line, None),
        };

        let message = match (keyword, rest) {
            (CONNECT, None) => ServerMessage::Connected,
            (MAKE_MOVE, None) => ServerMessage::YourTurn,
            (MOVE_MADE, Some(arg)) => ServerMessage::OpponentMoved(parse_column(arg)?),
            (GAME_WON, None) => ServerMessage::GameOver(Status::IWon),
            (GAME_LOST, None) => ServerMessage::GameOver(Status::ILost),
            (GAME_TIED, None) => ServerMessage::GameOver(Status::Tie),
            (ERROR, reason) => ServerMessage::Error(reason.unwrap_or("").to_string()),
            _ => {
                return Err(GameError::Protocol(format!(
                    "unexpected message '{}'",
                    line
                )))
            }
        };

        Ok(Some(message))
    }
}

impl ClientMessage {
    pub fn encode(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientMessage::Move(col) => write!(f, "{} {}", MOVE, col),
        }
    }
}

fn parse_column(arg: &str) -> Result<usize, GameError> {
    arg.parse()
        .map_err(|_| GameError::Protocol(format!("invalid column '{}'", arg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(line: &str) -> ServerMessage {
        ServerMessage::decode(line).unwrap().unwrap()
    }

    #[test]
    fn decodes_server_messages() {
        assert_eq!(decode("CONNECT"), ServerMessage::Connected);
        assert_eq!(decode("MAKE_MOVE\n"), ServerMessage::YourTurn);
        assert_eq!(decode("MOVE_MADE 4\r\n"), ServerMessage::OpponentMoved(4));
        assert_eq!(decode("GAME_WON"), ServerMessage::GameOver(Status::IWon));
        assert_eq!(decode("GAME_LOST"), ServerMessage::GameOver(Status::ILost));
        assert_eq!(decode("GAME_TIED"), ServerMessage::GameOver(Status::Tie));
    }

    #[test]
    fn error_keeps_whole_reason() {
        assert_eq!(
            decode("ERROR opponent left the game"),
            ServerMessage::Error("opponent left the game".to_string())
        );
        assert_eq!(decode("ERROR"), ServerMessage::Error(String::new()));
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(ServerMessage::decode("").unwrap(), None);
        assert_eq!(ServerMessage::decode("  \r\n").unwrap(), None);
    }

    #[test]
    fn malformed_lines_fail() {
        for line in [
            "HELLO",
            "MOVE_MADE",
            "MOVE_MADE x",
            "MOVE_MADE -1",
            "MOVE_MADE 1 2",
            "MAKE_MOVE now",
            "make_move",
        ] {
            assert!(
                matches!(ServerMessage::decode(line), Err(GameError::Protocol(_))),
                "'{}' should not decode",
                line
            );
        }
    }

    #[test]
    fn encodes_move() {
        assert_eq!(ClientMessage::Move(2).encode(), "MOVE 2\n");
    }
}
