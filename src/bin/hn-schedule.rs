extern crate heron as lib;

use chrono::{TimeZone, Utc};
use flexi_logger::{Duplicate, FileSpec, Logger};
use lib::config::TimezoneSpec;
use lib::schedule::{LiveClass, LiveClassDraft, ValidationError};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "hn-schedule",
    about = "Validates a new live class and prints what to submit for it."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(long = "title", default_value = "", help = "title of the class")]
    pub title: String,

    #[structopt(long = "description", default_value = "", help = "what the class is about")]
    pub description: String,

    #[structopt(long = "link", default_value = "", help = "meeting link or code")]
    pub link: String,

    #[structopt(
        long = "start",
        default_value = "",
        help = "start as YYYY-MM-DDTHH:MM or RFC 3339"
    )]
    pub start: String,

    #[structopt(long = "end", help = "end, one hour after the start if omitted")]
    pub end: Option<String>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

impl Args {
    fn draft(&self) -> LiveClassDraft {
        LiveClassDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            link: self.link.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
        }
    }
}

fn validate<Tz: TimeZone>(draft: &LiveClassDraft, tz: &Tz) -> Result<LiveClass, ValidationError> {
    let now = Utc::now().with_timezone(tz);
    draft.validate(&now)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    let mut logger = Logger::try_with_env_or_str("info")?.duplicate_to_stderr(Duplicate::Warn);

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let logger = logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;

    let draft = args.draft();
    let validated = match &config.timezone {
        TimezoneSpec::Local => validate(&draft, &chrono::Local),
        TimezoneSpec::Iana(tz) => validate(&draft, tz),
    };

    let class = match validated {
        Ok(class) => class,
        Err(e) => {
            log::info!("Rejected draft '{}': {:?}", draft.title, e);
            eprintln!("{}", e);
            logger.flush();
            std::process::exit(1);
        }
    };

    println!("{}", serde_json::to_string_pretty(&class.payload())?);
    println!(
        "{}",
        class.google_calendar_link(config.timezone.name().as_deref())
    );

    Ok(())
}
