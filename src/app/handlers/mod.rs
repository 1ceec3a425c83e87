pub mod readings;

pub use readings::StreamEventHandler;
