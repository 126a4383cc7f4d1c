extern crate heron as lib;

use chrono::{NaiveDate, TimeZone};
use flexi_logger::{FileSpec, Logger};
use lib::config::{Config, TimezoneSpec};
use lib::events::Dispatcher;
use lib::provider::JsonFileSource;
use lib::ui::App;
use lib::view::ViewState;
use nix::sys::{signal, termios};
use std::fmt::Display;
use std::io;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "hn", about = "Heron - live class calendar for the terminal.")]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only show calendar non-interactively"
    )]
    pub show: bool,

    #[structopt(
        long = "events",
        help = "path to a json file of scheduled classes",
        parse(from_os_str)
    )]
    pub events: Option<PathBuf>,

    #[structopt(long = "day", help = "open the day view of YYYY-MM-DD")]
    pub day: Option<NaiveDate>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn run<Tz: TimeZone>(args: Args, config: Config, tz: Tz) -> Result<(), Box<dyn std::error::Error>>
where
    Tz::Offset: Display,
{
    let path = args
        .events
        .or_else(|| config.events.clone())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "no events file, pass --events or set `events` in the config",
            )
        })?;
    let source = JsonFileSource::new(&path);

    let mut app = App::new(&config, &source, tz);
    if let Some(day) = args.day {
        app = app.with_view(ViewState::on_day(day));
    }

    if args.show {
        if let Ok(size) = termion::terminal_size() {
            app = app.with_size(size);
        }
        let stdout = io::stdout();
        app.show(&mut stdout.lock())?;
        return Ok(());
    }

    let mut signals_to_wait = signal::SigSet::empty();
    signals_to_wait.add(signal::SIGWINCH);
    let dispatcher = Dispatcher::from_config(&config, signals_to_wait);

    app.run(dispatcher)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let logger = match &args.log_file {
        Some(log_file) => Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message(),
        // stderr shares the screen with the calendar
        None => Logger::try_with_env_or_str("warn")?,
    };

    logger.start()?;

    const STDIN: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(STDIN).ok());

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            if let Some(attr) = attr.as_ref() {
                let _ = termios::tcsetattr(STDIN, termios::SetArg::TCSANOW, attr);
            }
        }

        println!("Heron ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    match config.timezone.clone() {
        TimezoneSpec::Local => run(args, config, chrono::Local),
        TimezoneSpec::Iana(tz) => run(args, config, tz),
    }
}
