use log::warn;
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub enum Event {
    Input(String),
    Tick,
    InputClosed,
}

/// Reads stdin lines on their own thread and hands them to the UI loop. A
/// `Tick` comes back when nothing was typed within the tick rate, so the loop
/// can drain its run queue.
pub struct Events {
    rx: mpsc::Receiver<Event>,
    tick_rate: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub tick_rate: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            tick_rate: Duration::from_millis(100),
        }
    }
}

impl Events {
    pub fn new() -> Events {
        Events::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Events {
        let (tx, rx) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("stdin".to_string())
            .spawn(move || {
                let stdin = io::stdin();
                for line in stdin.lock().lines() {
                    match line {
                        Ok(line) => {
                            if tx.send(Event::Input(line)).is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            warn!("can't read stdin: {}", e);
                            break;
                        }
                    }
                }
                let _ = tx.send(Event::InputClosed);
            });

        if let Err(e) = spawned {
            warn!("can't start the stdin reader: {}", e);
        }

        Events::from_channel(rx, config)
    }

    fn from_channel(rx: mpsc::Receiver<Event>, config: Config) -> Events {
        Events {
            rx,
            tick_rate: config.tick_rate,
        }
    }

    pub fn next(&self) -> Event {
        match self.rx.recv_timeout(self.tick_rate) {
            Ok(event) => event,
            Err(mpsc::RecvTimeoutError::Timeout) => Event::Tick,
            Err(mpsc::RecvTimeoutError::Disconnected) => Event::InputClosed,
        }
    }
}
