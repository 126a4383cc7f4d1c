use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::provider::{Error, ErrorKind, Result};
use crate::ui::Theme;

const CONFIG_PATH_ENV_VAR: &str = "HERON_CONFIG_FILE";

pub fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("heron").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".heron.toml"));
    }

    locations
}

/// Loads `path` if given, otherwise the first existing default location.
///
/// Without any config file the defaults are used.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path);
    }

    match find_configfile_locations().into_iter().find(|p| p.is_file()) {
        Some(path) => Config::from_file(&path),
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeserializeFromStr)]
pub enum TimezoneSpec {
    Local,
    Iana(chrono_tz::Tz),
}

impl Default for TimezoneSpec {
    fn default() -> Self {
        TimezoneSpec::Local
    }
}

impl FromStr for TimezoneSpec {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowercase = s.to_lowercase();

        if matches!(lowercase.as_str(), "localtime" | "local") {
            Ok(TimezoneSpec::Local)
        } else if let Ok(tz) = s.parse::<chrono_tz::Tz>() {
            Ok(TimezoneSpec::Iana(tz))
        } else {
            Err(Error::new(
                ErrorKind::ConfigParse,
                &format!("Timezone '{}' not recognized", s),
            ))
        }
    }
}

impl TimezoneSpec {
    /// IANA identifier, if one is known. For the local zone `$TZ` is consulted.
    pub fn name(&self) -> Option<String> {
        match self {
            TimezoneSpec::Iana(tz) => Some(tz.name().to_owned()),
            TimezoneSpec::Local => env::var("TZ")
                .ok()
                .and_then(|tz| tz.parse::<chrono_tz::Tz>().ok())
                .map(|tz| tz.name().to_owned()),
        }
    }
}

/// Which dashboard the calendar is embedded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    Admin,
    Student,
}

impl Default for Surface {
    fn default() -> Self {
        Surface::Student
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Affordances {
    pub can_add_class: bool,
    pub show_group_label: bool,
}

impl Surface {
    pub fn affordances(&self) -> Affordances {
        match self {
            Surface::Admin => Affordances {
                can_add_class: true,
                show_group_label: false,
            },
            Surface::Student => Affordances {
                can_add_class: false,
                show_group_label: true,
            },
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Milliseconds between clock updates.
    pub tick_rate: u64,
    pub timezone: TimezoneSpec,
    pub surface: Surface,
    pub batch: Option<String>,
    pub events: Option<PathBuf>,
    pub open_command: String,
    pub max_row_height: u16,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tick_rate: 1000,
            timezone: TimezoneSpec::default(),
            surface: Surface::default(),
            batch: None,
            events: None,
            open_command: "xdg-open".to_owned(),
            max_row_height: 3,
            theme: Theme::default(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        log::debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path)?;
        content
            .parse::<Config>()
            .map_err(|e| Error::new(ErrorKind::ConfigParse, &format!("{}: {}", path.display(), e)))
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate.max(1))
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config.tick_rate(), Duration::from_secs(1));
        assert_eq!(config.timezone, TimezoneSpec::Local);
        assert_eq!(config.surface, Surface::Student);
        assert_eq!(config.batch, None);
        assert_eq!(config.open_command, "xdg-open");
    }

    #[test]
    fn reads_all_keys() {
        let config: Config = r#"
            tick_rate = 250
            timezone = "Asia/Kolkata"
            surface = "admin"
            batch = "b-42"
            events = "/srv/classes.json"
            open_command = "firefox"
            max_row_height = 2

            [theme]
            today_char = "+"
        "#
        .parse()
        .unwrap();

        assert_eq!(config.tick_rate(), Duration::from_millis(250));
        assert_eq!(
            config.timezone,
            TimezoneSpec::Iana(chrono_tz::Asia::Kolkata)
        );
        assert_eq!(config.timezone.name().as_deref(), Some("Asia/Kolkata"));
        assert_eq!(config.surface, Surface::Admin);
        assert_eq!(config.batch.as_deref(), Some("b-42"));
        assert_eq!(config.events, Some(PathBuf::from("/srv/classes.json")));
        assert_eq!(config.max_row_height, 2);
        assert_eq!(config.theme.today_char, '+');
        assert_eq!(config.theme.focus_open, Theme::default().focus_open);
    }

    #[test]
    fn rejects_unknown_timezone() {
        assert!("Mars/Olympus".parse::<TimezoneSpec>().is_err());
        assert_eq!("LOCAL".parse::<TimezoneSpec>().unwrap(), TimezoneSpec::Local);

        let err = "timezone = \"Mars/Olympus\"".parse::<Config>().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigParse));
    }

    #[test]
    fn surfaces_differ_in_affordances() {
        assert!(Surface::Admin.affordances().can_add_class);
        assert!(!Surface::Student.affordances().can_add_class);
        assert!(Surface::Student.affordances().show_group_label);
    }

    #[test]
    fn explicit_missing_file_fails() {
        let err = load_suitable_config(Some(Path::new("/nonexistent/heron.toml"))).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IOError(_)));
    }
}
