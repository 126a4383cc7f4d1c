pub mod app;
pub mod context;
pub mod day;
pub mod event;
pub mod month;

pub use app::App;
pub use context::{Action, Context, Theme};
pub use day::DayView;
pub use month::MonthView;
