pub mod price_list_controller;

pub use price_list_controller::configure;
