pub mod status_bar;
pub mod readings_panel;
pub mod cube_panel;

pub use status_bar::render_status_bar;
pub use readings_panel::render_readings_panel;
pub use cube_panel::render_cube_panel;
