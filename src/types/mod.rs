pub mod reading;
pub mod orientation;
pub mod stream_event;

pub use reading::{FieldValue, Reading};
pub use orientation::{OrientationUpdate, QuaternionMode, TiltUnits};
pub use stream_event::{ReadyState, SseMessage, StreamEvent};
