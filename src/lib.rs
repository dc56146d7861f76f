//! Fleetboard: an analytics dashboard over the Illinois public passenger
//! vehicle table.
//!
//! The pipeline is `data::loader` → [`data::model::FleetDataset`] →
//! [`data::filter::FilterSelection`] → [`dashboard::render`]. The desktop
//! surface (`app`, `ui`) and the HTTP surface (`web`) both sit on top of it.

pub mod app;
pub mod charts;
pub mod color;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod insights;
pub mod state;
pub mod ui;
pub mod web;
