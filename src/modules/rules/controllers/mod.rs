pub mod rule_controller;

pub use rule_controller::configure;
