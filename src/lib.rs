pub mod agenda;
pub mod config;
pub mod datetime;
pub mod events;
pub mod indicator;
pub mod join;
pub mod link;
pub mod provider;
pub mod schedule;
pub mod ui;
pub mod view;
