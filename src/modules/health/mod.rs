// Health module: liveness and readiness checks

pub mod controllers;

pub use controllers::configure;
