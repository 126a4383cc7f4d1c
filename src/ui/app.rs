use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;
use std::io::{self, Write};
use std::process::Command;
use std::rc::Rc;

use termion::raw::IntoRawMode;
use termion::screen::AlternateScreen;

use super::context::{Action, Context};
use super::day::DayView;
use super::month::MonthView;
use crate::agenda::Agenda;
use crate::config::Config;
use crate::events::{Dispatcher, Event};
use crate::provider::{load_events, EventSource};
use crate::view::{Mode, ViewState};

const STATUS_LINES: usize = 1;
const DEFAULT_SIZE: (u16, u16) = (80, 24);

/// One activation of the calendar: a single fetch, then the draw loop.
pub struct App<'c, Tz: TimeZone> {
    config: &'c Config,
    context: Context<Tz>,
    tz: Tz,
    size: (u16, u16),
}

impl<'c, Tz: TimeZone> App<'c, Tz>
where
    Tz::Offset: Display,
{
    pub fn new(config: &'c Config, source: &dyn EventSource, tz: Tz) -> Self {
        let now = Utc::now().with_timezone(&tz);

        let (events, notice) = match load_events(source, config.batch.as_deref(), &tz) {
            Ok(events) => (events, None),
            Err(e) => {
                log::error!("Could not load classes from {}: {}", source.name(), e);
                (Vec::new(), Some(format!("Could not load classes: {}", e)))
            }
        };

        let agenda = Agenda::new(Rc::from(events), tz.clone());
        let mut context = Context::new(config, agenda, now);
        context.notice = notice;

        App {
            config,
            context,
            tz,
            size: DEFAULT_SIZE,
        }
    }

    pub fn with_view(mut self, view: ViewState) -> Self {
        self.context = self.context.with_view(view);
        self
    }

    pub fn with_size(mut self, size: (u16, u16)) -> Self {
        self.size = size;
        self
    }

    pub fn context(&self) -> &Context<Tz> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context<Tz> {
        &mut self.context
    }

    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    fn status_line(&self) -> String {
        if let Some(notice) = &self.context.notice {
            return notice.clone();
        }

        let mut hints = vec!["t today", "p/n back/next"];
        match self.context.view.mode() {
            Mode::Month => hints.extend(&["hjkl move", "enter open day"]),
            Mode::Day => hints.extend(&["1-9 join", "j/k scroll", "m month"]),
        }
        if self.context.affordances.can_add_class {
            hints.push("a add class");
        }
        hints.push("q quit");
        hints.join("  ")
    }

    /// Lays out the current view for a terminal of `size` columns and rows.
    ///
    /// Hour rows of the day view are measured for the time indicator whenever
    /// their geometry is unknown.
    pub fn frame(&mut self) -> Vec<String> {
        let (width, height) = (self.size.0 as usize, self.size.1 as usize);
        let body_height = height.saturating_sub(STATUS_LINES);
        let ctx = &mut self.context;

        let mut lines = match ctx.view.mode() {
            Mode::Month => {
                MonthView::from_context(ctx).render(&ctx.agenda, &ctx.theme, ctx.now())
            }
            Mode::Day => {
                let mut frame =
                    DayView::from_context(ctx, body_height).render(&ctx.agenda, &ctx.theme, ctx.now());

                if ctx.indicator.needs_measure() && ctx.indicator.measure(&frame.layout).is_some() {
                    frame = DayView::from_context(ctx, body_height).render(
                        &ctx.agenda,
                        &ctx.theme,
                        ctx.now(),
                    );
                }

                ctx.scroll = ctx.scroll.min(frame.lines.len().saturating_sub(body_height));
                frame.lines.into_iter().skip(ctx.scroll).collect()
            }
        };

        lines.truncate(body_height);
        lines.resize(body_height, String::new());
        lines.push(self.status_line());

        lines
            .into_iter()
            .map(|line| line.chars().take(width).collect())
            .collect()
    }

    fn draw<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let lines = self.frame();
        write!(out, "{}", termion::clear::All)?;
        for (idx, line) in lines.iter().enumerate() {
            write!(out, "{}{}", termion::cursor::Goto(1, idx as u16 + 1), line)?;
        }
        out.flush()
    }

    fn open(&mut self, url: &str) {
        log::info!("Opening {}", url);
        if let Err(e) = Command::new(&self.config.open_command).arg(url).spawn() {
            log::warn!("Failed to run {}: {}", self.config.open_command, e);
            self.context.notice = Some(format!("Could not open {}", url));
        }
    }

    /// Prints the current view once.
    pub fn show<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        for line in self.frame() {
            writeln!(out, "{}", line.trim_end())?;
        }
        out.flush()
    }

    pub fn run(&mut self, dispatcher: Dispatcher) -> Result<(), Box<dyn std::error::Error>> {
        let stdout = io::stdout().into_raw_mode()?;
        let mut screen = AlternateScreen::from(stdout);
        write!(screen, "{}", termion::cursor::Hide)?;

        self.size = termion::terminal_size().unwrap_or(DEFAULT_SIZE);
        self.draw(&mut screen)?;

        while let Ok(event) = dispatcher.next() {
            match event {
                Event::Tick => {
                    let now = self.now();
                    self.context.update(now);
                }
                Event::Resize => {
                    self.size = termion::terminal_size().unwrap_or(self.size);
                    log::debug!("Terminal resized to {:?}", self.size);
                    self.context.indicator.invalidate();
                }
                Event::Input(key) => match self.context.handle_key(key) {
                    Action::Quit => break,
                    Action::Open(url) => self.open(&url),
                    Action::Redraw | Action::None => {}
                },
            }

            self.draw(&mut screen)?;
        }

        write!(screen, "{}", termion::cursor::Show)?;
        screen.flush()?;
        Ok(())
    }
}
