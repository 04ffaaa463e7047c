pub mod audit_controller;

pub use audit_controller::configure;
