pub mod config;
pub mod detector;
pub mod errors;
pub mod image_loader;
pub mod logging;
pub mod metrics;
pub mod server;
pub mod state;
pub mod ws;

pub use config::ViewerConfig;
pub use detector::{Detector, SidecarDetector};
pub use errors::ViewerError;
pub use state::AppState;
