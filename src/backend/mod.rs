//! Link controller abstraction layer

pub mod link_controller;
pub mod psk;
pub mod simulated_backend;
pub mod wifi_ctrl_backend;

pub use link_controller::LinkController;
pub use simulated_backend::SimulatedLink;
pub use wifi_ctrl_backend::WifiCtrlLink;
