//! Coaching-platform backend: signup/login, coach onboarding, course
//! booking, credit packages and skill tags over a uniform JSON envelope.

pub mod admin;
pub mod app;
pub mod auth;
pub mod coaches;
pub mod config;
pub mod courses;
pub mod credit_packages;
pub mod error;
pub mod extract;
pub mod response;
pub mod skills;
pub mod state;
pub mod users;
pub mod validation;
