use super::errors::GameError;
use super::helpers::lock;
use crate::connectfour::model::BoardModel;
use crate::connectfour::protocol::{ClientMessage, ServerMessage};
use log::{debug, error, info, warn};
use std::io::{BufRead, BufReader, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_LINE_LEN: usize = 1024;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
    Closed,
}

struct Link {
    state: ConnectionState,
    stream: Option<TcpStream>,
}

impl Link {
    /// Returns false when the link was already closed.
    fn close(&mut self) -> bool {
        if self.state == ConnectionState::Closed {
            return false;
        }

        if let Some(stream) = self.stream.take() {
            // unblocks the reader thread
            let _ = stream.shutdown(Shutdown::Both);
        }
        self.state = ConnectionState::Closed;

        true
    }

    /// True once our side has begun closing, even before `state` says so.
    fn closing(&self, requested: &AtomicBool) -> bool {
        requested.load(Ordering::SeqCst) || self.state == ConnectionState::Closed
    }
}

enum Flow {
    Continue,
    Stop,
}

/// Network side of a session: sends local moves and feeds server messages
/// into the shared [`BoardModel`] from a background thread.
pub struct TurnClient {
    model: Arc<Mutex<BoardModel>>,
    link: Arc<Mutex<Link>>,
    close_requested: Arc<AtomicBool>,
    connect_timeout: Duration,
    listener: Option<JoinHandle<()>>,
}

impl TurnClient {
    pub fn new(model: Arc<Mutex<BoardModel>>) -> Self {
        TurnClient {
            model,
            link: Arc::new(Mutex::new(Link {
                state: ConnectionState::Disconnected,
                stream: None,
            })),
            close_requested: Arc::new(AtomicBool::new(false)),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            listener: None,
        }
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn model(&self) -> Arc<Mutex<BoardModel>> {
        self.model.clone()
    }

    pub fn state(&self) -> ConnectionState {
        lock(&self.link).state
    }

    pub fn connect(&mut self, host: &str, port: u16) -> Result<(), GameError> {
        match self.state() {
            ConnectionState::Disconnected => {}
            ConnectionState::Connected => {
                return Err(GameError::Connection("already connected".to_string()))
            }
            ConnectionState::Closed => return Err(GameError::ClosedConnection),
        }

        let stream = open_stream(host, port, self.connect_timeout)?;

        let mut link = lock(&self.link);
        if link.state == ConnectionState::Closed {
            let _ = stream.shutdown(Shutdown::Both);
            return Err(GameError::ClosedConnection);
        }
        link.stream = Some(stream);
        link.state = ConnectionState::Connected;

        info!("connected to {}:{}", host, port);

        Ok(())
    }

    /// Spawns the receive loop. There is at most one per session.
    pub fn start_listener(&mut self) -> Result<(), GameError> {
        if self.listener.is_some() {
            return Err(GameError::Connection(
                "receive loop already running".to_string(),
            ));
        }

        let reader = {
            let link = lock(&self.link);
            match (link.state, &link.stream) {
                (ConnectionState::Connected, Some(stream)) => stream
                    .try_clone()
                    .map_err(|e| GameError::Connection(e.to_string()))?,
                (ConnectionState::Disconnected, _) => {
                    return Err(GameError::Connection("not connected".to_string()))
                }
                _ => return Err(GameError::ClosedConnection),
            }
        };

        let model = self.model.clone();
        let link = self.link.clone();
        let close_requested = self.close_requested.clone();
        let handle = thread::Builder::new()
            .name("receive-loop".to_string())
            .spawn(move || receive_loop(reader, model, link, close_requested))
            .map_err(|e| GameError::Connection(format!("can't start receive loop: {}", e)))?;

        self.listener = Some(handle);

        Ok(())
    }

    /// Sends a move and applies it locally once it is on the wire.
    pub fn send_move(&self, column: usize) -> Result<(), GameError> {
        let mut link = lock(&self.link);

        match link.state {
            ConnectionState::Connected => {}
            ConnectionState::Disconnected => {
                return Err(GameError::Connection("not connected".to_string()))
            }
            ConnectionState::Closed => return Err(GameError::ClosedConnection),
        }

        // held until the move is applied so a fast reply can't overtake it
        let mut model = lock(&self.model);

        if model.status().is_terminal() {
            return Err(GameError::GameOver(model.status()));
        }
        if !model.is_my_turn() {
            return Err(GameError::NotMyTurn);
        }
        model.can_drop(column)?;

        let message = ClientMessage::Move(column);
        let written = match link.stream.as_mut() {
            Some(stream) => stream
                .write_all(message.encode().as_bytes())
                .and_then(|_| stream.flush()),
            None => return Err(GameError::ClosedConnection),
        };

        if let Err(e) = written {
            error!("can't send '{}': {}", message, e);

            model.set_error("connection lost");
            drop(model);
            link.close();

            return Err(GameError::Connection(format!("can't send move: {}", e)));
        }

        debug!("sent: {}", message);

        let player = model.next_player();
        model.apply_move(column, player)?;

        Ok(())
    }

    /// Releases the connection and waits for the receive loop. Idempotent.
    pub fn close(&mut self) {
        // seen by the receive loop even while it holds the link
        self.close_requested.store(true, Ordering::SeqCst);

        if lock(&self.link).close() {
            info!("connection closed");
        }

        if let Some(handle) = self.listener.take() {
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                warn!("receive loop panicked");
            }
        }
    }
}

impl Drop for TurnClient {
    fn drop(&mut self) {
        self.close();
    }
}

fn open_stream(host: &str, port: u16, timeout: Duration) -> Result<TcpStream, GameError> {
    let addrs = (host, port).to_socket_addrs().map_err(|e| {
        GameError::Connection(format!("can't resolve '{}:{}': {}", host, port, e))
    })?;

    let mut last_error = None;

    for addr in addrs {
        debug!("connecting to {}", addr);

        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => {
                if let Err(e) = stream.set_nodelay(true) {
                    warn!("can't disable nagle on {}: {}", addr, e);
                }
                return Ok(stream);
            }
            Err(e) => {
                warn!("can't connect to {}: {}", addr, e);
                last_error = Some(e);
            }
        }
    }

    Err(GameError::Connection(match last_error {
        Some(e) => format!("can't connect to '{}:{}': {}", host, port, e),
        None => format!("no address found for '{}:{}'", host, port),
    }))
}

fn receive_loop(
    stream: TcpStream,
    model: Arc<Mutex<BoardModel>>,
    link: Arc<Mutex<Link>>,
    close_requested: Arc<AtomicBool>,
) {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();

    loop {
        line.clear();

        let read = reader
            .by_ref()
            .take(MAX_LINE_LEN as u64)
            .read_line(&mut line);

        match read {
            Ok(0) => {
                end_of_stream(&model, &link, &close_requested, "server closed the connection");
                break;
            }
            Ok(n) if n >= MAX_LINE_LEN && !line.ends_with('\n') => {
                let reason = format!(
                    "protocol error: message longer than {} bytes",
                    MAX_LINE_LEN
                );
                fail(&model, &link, &close_requested, &reason);
                break;
            }
            Ok(_) if !line.ends_with('\n') => {
                warn!("discarding partial message '{}'", line);
                end_of_stream(&model, &link, &close_requested, "connection dropped mid-message");
                break;
            }
            Ok(_) => {
                let mut link = lock(&link);
                if link.closing(&close_requested) {
                    debug!("dropping '{}' after close", line.trim_end());
                    break;
                }

                debug!("received: {}", line.trim_end());

                match handle_line(&line, &model) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Stop) => {
                        link.close();
                        break;
                    }
                    Err(e) => {
                        error!("{}", e);
                        lock(&model).set_error(&e.to_string());
                        link.close();
                        break;
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                debug!("undecodable message: {}", e);
                fail(
                    &model,
                    &link,
                    &close_requested,
                    "protocol error: message is not valid UTF-8",
                );
                break;
            }
            Err(e) => {
                end_of_stream(&model, &link, &close_requested, &e.to_string());
                break;
            }
        }
    }

    debug!("receive loop stopped");
}

fn handle_line(line: &str, model: &Mutex<BoardModel>) -> Result<Flow, GameError> {
    let message = match ServerMessage::decode(line)? {
        Some(message) => message,
        None => return Ok(Flow::Continue),
    };

    let mut model = lock(model);

    match message {
        ServerMessage::Connected => info!("server accepted the session"),
        ServerMessage::YourTurn => model.set_my_turn(true),
        ServerMessage::OpponentMoved(column) => {
            if model.is_my_turn() {
                return Err(GameError::Protocol(format!(
                    "opponent moved into column {} during our turn",
                    column
                )));
            }
            let player = model.next_player();
            model.apply_move(column, player)?;
        }
        ServerMessage::GameOver(status) => model.set_status(status),
        ServerMessage::Error(reason) => {
            model.set_error(&reason);
            return Ok(Flow::Stop);
        }
    }

    Ok(Flow::Continue)
}

/// Marks the session as failed and closes it, unless we are already closing.
fn fail(
    model: &Mutex<BoardModel>,
    link: &Mutex<Link>,
    close_requested: &AtomicBool,
    reason: &str,
) {
    let mut link = lock(link);
    if link.closing(close_requested) {
        return;
    }

    error!("{}", reason);
    lock(model).set_error(reason);
    link.close();
}

fn end_of_stream(
    model: &Mutex<BoardModel>,
    link: &Mutex<Link>,
    close_requested: &AtomicBool,
    reason: &str,
) {
    let mut link = lock(link);

    // the shutdown came from our side
    if link.closing(close_requested) {
        return;
    }

    info!("connection ended: {}", reason);

    {
        let mut model = lock(model);
        if !model.status().is_terminal() {
            model.set_error("connection lost");
        }
    }

    link.close();
}
