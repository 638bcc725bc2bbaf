//! Studyplan Server
//!
//! REST backend for study program scheduling metadata: programs, modules,
//! lecturers, rooms, groups, constraints, offerings and the calendar.

pub mod api;
pub mod assessment;
pub mod auth;
pub mod availabilities;
pub mod config;
pub mod constraints;
pub mod db;
pub mod error;
pub mod groups;
pub mod lecturers;
pub mod modules;
pub mod offerings;
pub mod permissions;
pub mod programs;
pub mod rooms;
pub mod schedule;
pub mod specializations;
