pub mod sensor_app;
pub mod state;
pub mod handlers;
pub mod ui;

pub use sensor_app::SensorCubeApp;
