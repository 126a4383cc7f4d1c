use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use nix::sys::signal::{SigSet, Signal};
use termion::event::Key;
use termion::input::TermRead;

use crate::config::Config;

pub enum Event {
    Input(Key),
    Tick,
    Resize,
}

/// Feeds key presses, clock ticks and terminal resizes into one channel.
///
/// Dropping the dispatcher detaches its threads. The tick and resize threads
/// stop at their next wake-up, the input thread with the next key press.
pub struct Dispatcher {
    rx: mpsc::Receiver<Event>,
    stop: Arc<AtomicBool>,
    _input_handle: thread::JoinHandle<()>,
    _tick_handle: thread::JoinHandle<()>,
    _resize_handle: Option<thread::JoinHandle<()>>,
}

impl Dispatcher {
    /// Starts the event threads.
    ///
    /// `signals` is blocked on the calling thread before anything is spawned,
    /// so call this before starting other threads.
    pub fn from_config(config: &Config, signals: SigSet) -> Dispatcher {
        let tick_rate = config.tick_rate();
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));

        let resize_handle = match signals.thread_block() {
            Ok(()) => Some(Self::spawn_resize(signals, tx.clone(), stop.clone())),
            Err(e) => {
                log::warn!("Unable to watch terminal size: {}", e);
                None
            }
        };

        let input_handle = {
            let tx = tx.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                let stdin = io::stdin();
                for key in stdin.lock().keys() {
                    if stop.load(Ordering::Relaxed) {
                        return;
                    }
                    match key {
                        Ok(key) => {
                            if tx.send(Event::Input(key)).is_err() {
                                return;
                            }
                        }
                        Err(e) => log::warn!("Failed to read input: {}", e),
                    }
                }
            })
        };

        let tick_handle = Self::spawn_ticker(tick_rate, tx, stop.clone());

        Dispatcher {
            rx,
            stop,
            _input_handle: input_handle,
            _tick_handle: tick_handle,
            _resize_handle: resize_handle,
        }
    }

    fn spawn_ticker(
        tick_rate: Duration,
        tx: mpsc::Sender<Event>,
        stop: Arc<AtomicBool>,
    ) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            while !stop.load(Ordering::Relaxed) {
                if tx.send(Event::Tick).is_err() {
                    return;
                }
                thread::sleep(tick_rate);
            }
        })
    }

    fn spawn_resize(
        signals: SigSet,
        tx: mpsc::Sender<Event>,
        stop: Arc<AtomicBool>,
    ) -> thread::JoinHandle<()> {
        thread::spawn(move || loop {
            match signals.wait() {
                Ok(Signal::SIGWINCH) => {
                    if stop.load(Ordering::Relaxed) || tx.send(Event::Resize).is_err() {
                        return;
                    }
                }
                Ok(signal) => log::debug!("Ignoring signal {}", signal),
                Err(e) => {
                    log::warn!("Stopped watching terminal size: {}", e);
                    return;
                }
            }
        })
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }

}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
