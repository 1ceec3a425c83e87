use chrono::Local;
use glam::DQuat;
use log::{debug, info, warn};

use crate::app::state::AppState;
use crate::types::{OrientationUpdate, QuaternionMode, ReadyState, Reading, StreamEvent};
use crate::viewport::{Renderer, ViewportContext};

pub struct StreamEventHandler;

impl StreamEventHandler {
    /// 按到达顺序处理通道中积压的全部事件，返回处理数量
    pub fn handle_stream_events<R: Renderer>(state: &mut AppState<R>) -> usize {
        let mut handled = 0;
        while let Ok(event) = state.event_receiver.try_recv() {
            Self::handle_event(state, event);
            handled += 1;
        }
        handled
    }

    pub fn handle_event<R: Renderer>(state: &mut AppState<R>, event: StreamEvent) {
        state.connection.events_received += 1;

        match event {
            StreamEvent::Open => {
                state.connection.ready_state = ReadyState::Open;
                state.connection.last_error = None;
                info!("Events Connected");
            }
            StreamEvent::Error { ready_state, message } => {
                // 连接仍处于打开状态时不算断开
                if ready_state != ReadyState::Open {
                    warn!("Events Disconnected: {}", message);
                }
                state.connection.ready_state = ready_state;
                state.connection.last_error = Some(message);
            }
            StreamEvent::Message(message) => {
                state.connection.last_event_id = message.last_event_id;
                if message.event == state.policy.event_name {
                    Self::handle_readings(state, &message.data);
                } else {
                    debug!("Ignoring '{}' event: {}", message.event, message.data);
                }
            }
        }
    }

    fn handle_readings<R: Renderer>(state: &mut AppState<R>, payload: &str) {
        let reading = match Reading::from_json(payload) {
            Ok(reading) => reading,
            Err(e) => {
                state.connection.decode_failures += 1;
                warn!("Invalid readings payload: {}", e);
                return;
            }
        };

        for (id, value) in reading.plain_fields() {
            state.display.set_text(id, value.to_string());
        }

        let units = state.policy.tilt_units;
        for (id, value) in reading.angle_fields() {
            state.display.set_text(id, units.format_angle(value));
        }

        match OrientationUpdate::from_reading(&reading, units) {
            Some(update) => Self::apply_orientation(&mut state.viewport, update, state.policy.quaternion_mode),
            None => debug!("Reading carries no complete orientation, cube unchanged"),
        }

        state.viewport.render();

        state.connection.readings_applied += 1;
        state.connection.last_reading_at = Some(Local::now());
    }

    /// 欧拉角总是绝对设置：x ← pitch，y ← yaw，z ← roll
    pub fn apply_orientation<R: Renderer>(
        viewport: &mut ViewportContext<R>,
        update: OrientationUpdate,
        mode: QuaternionMode,
    ) {
        let cube = viewport.cube_mut();
        match update {
            OrientationUpdate::Euler { yaw, pitch, roll } => cube.set_rotation(pitch, yaw, roll),
            OrientationUpdate::Quaternion { x, y, z, w } => {
                let quaternion = DQuat::from_xyzw(x, y, z, w);
                match mode {
                    QuaternionMode::Absolute => cube.set_quaternion(quaternion),
                    QuaternionMode::Cumulative => cube.apply_quaternion(quaternion),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::Sender;
    use glam::DVec3;
    use crate::app::state::ReadingPolicy;
    use crate::config::{default_display_slots, ReadingsConfig};
    use crate::display::DisplayBoard;
    use crate::types::orientation::DEG_TO_RAD;
    use crate::types::{SseMessage, TiltUnits};
    use crate::viewport::context::tests::{recording_viewport, RecordingRenderer};

    fn state_with(config: ReadingsConfig) -> (Sender<StreamEvent>, AppState<RecordingRenderer>) {
        let (sender, receiver) = crossbeam_channel::bounded(16);
        let state = AppState::new(
            receiver,
            recording_viewport(800.0, 600.0),
            DisplayBoard::new(&default_display_slots()),
            ReadingPolicy::new("readings", &config),
        );
        (sender, state)
    }

    fn state() -> (Sender<StreamEvent>, AppState<RecordingRenderer>) {
        state_with(ReadingsConfig::default())
    }

    fn readings(data: &str) -> StreamEvent {
        message("readings", data)
    }

    fn message(event: &str, data: &str) -> StreamEvent {
        StreamEvent::Message(SseMessage {
            event: event.to_string(),
            data: data.to_string(),
            last_event_id: None,
        })
    }

    fn renders(state: &AppState<RecordingRenderer>) -> usize {
        // 初始化时已经绘制过一帧
        state.viewport.renderer().renders - 1
    }

    #[test]
    fn test_end_to_end_reading() {
        let (_sender, mut state) = state();

        StreamEventHandler::handle_event(&mut state, readings(
            r#"{"temp":"23.4","gyroX":1,"gyroY":2,"gyroZ":3,"acclX":0,"acclY":0,"acclZ":9.8,"tiltY":0.1,"tiltR":0.2,"tiltP":0.3}"#,
        ));

        assert_eq!(state.display.text("temp"), Some("23.4"));
        assert_eq!(state.display.text("gyroX"), Some("1"));
        assert_eq!(state.display.text("gyroZ"), Some("3"));
        assert_eq!(state.display.text("acclZ"), Some("9.8"));
        assert_eq!(state.display.text("tiltY"), Some("5.73"));
        assert_eq!(state.display.text("tiltR"), Some("11.46"));
        assert_eq!(state.display.text("tiltP"), Some("17.19"));
        assert_eq!(state.display.text("magnX"), None);

        assert_eq!(state.viewport.scene.cube.rotation(), DVec3::new(0.3, 0.1, 0.2));
        assert_eq!(renders(&state), 1);
        assert_eq!(state.viewport.renderer().last_rotation, Some(DVec3::new(0.3, 0.1, 0.2)));
        assert_eq!(state.connection.readings_applied, 1);
        assert!(state.connection.last_reading_at.is_some());
    }

    #[test]
    fn test_right_angle_displayed() {
        let (_sender, mut state) = state();
        StreamEventHandler::handle_event(&mut state, readings(r#"{"tiltY":0,"tiltR":1.5708,"tiltP":0}"#));
        assert_eq!(state.display.text("tiltR"), Some("90.00"));
    }

    #[test]
    fn test_degree_units_scale_rotation_and_show_raw_text() {
        let config = ReadingsConfig {
            tilt_units: TiltUnits::Degrees,
            ..ReadingsConfig::default()
        };
        let (_sender, mut state) = state_with(config);

        StreamEventHandler::handle_event(&mut state, readings(r#"{"tiltYaw":90,"tiltRoll":-45,"tiltPitch":10.5}"#));

        assert_eq!(state.display.text("tiltYaw"), Some("90"));
        assert_eq!(state.display.text("tiltPitch"), Some("10.5"));
        assert_eq!(
            state.viewport.scene.cube.rotation(),
            DVec3::new(10.5 * DEG_TO_RAD, 90.0 * DEG_TO_RAD, -45.0 * DEG_TO_RAD)
        );
        assert_eq!(renders(&state), 1);
    }

    #[test]
    fn test_absolute_quaternion_replaces_orientation() {
        let (_sender, mut state) = state();
        StreamEventHandler::handle_event(&mut state, readings(r#"{"tiltY":0.4,"tiltR":0.2,"tiltP":0.1}"#));
        StreamEventHandler::handle_event(&mut state, readings(
            r#"{"tiltY":0.4,"tiltR":0.2,"tiltP":0.1,"quatX":0,"quatY":0,"quatZ":0.6,"quatW":0.8}"#,
        ));

        assert_eq!(state.viewport.scene.cube.quaternion(), DQuat::from_xyzw(0.0, 0.0, 0.6, 0.8));
        assert_eq!(renders(&state), 2);
    }

    #[test]
    fn test_cumulative_quaternion_composes_with_prior() {
        let config = ReadingsConfig {
            quaternion_mode: QuaternionMode::Cumulative,
            ..ReadingsConfig::default()
        };
        let (_sender, mut state) = state_with(config);
        let step = DQuat::from_rotation_z(0.3);
        let payload = format!(
            r#"{{"quatX":{},"quatY":{},"quatZ":{},"quatW":{}}}"#,
            step.x, step.y, step.z, step.w
        );

        StreamEventHandler::handle_event(&mut state, readings(&payload));
        StreamEventHandler::handle_event(&mut state, readings(&payload));

        let expected = DQuat::from_rotation_z(0.6);
        assert!(state.viewport.scene.cube.quaternion().abs_diff_eq(expected, 1e-9));
    }

    #[test]
    fn test_other_events_never_write_or_render() {
        let (_sender, mut state) = state();

        StreamEventHandler::handle_event(&mut state, StreamEvent::Open);
        StreamEventHandler::handle_event(&mut state, message("message", "hello!"));
        StreamEventHandler::handle_event(&mut state, message("status", r#"{"temp":"99"}"#));
        StreamEventHandler::handle_event(&mut state, StreamEvent::Error {
            ready_state: ReadyState::Connecting,
            message: "reset by peer".into(),
        });

        assert_eq!(state.display.filled(), 0);
        assert_eq!(renders(&state), 0);
        assert_eq!(state.connection.events_received, 4);
        assert_eq!(state.connection.readings_applied, 0);
    }

    #[test]
    fn test_last_event_id_tracked_for_every_message() {
        let (_sender, mut state) = state();

        fn with_id(event: &str, id: Option<&str>) -> StreamEvent {
            StreamEvent::Message(SseMessage {
                event: event.to_string(),
                data: "{}".to_string(),
                last_event_id: id.map(str::to_string),
            })
        }
        let first = with_id("readings", Some("41"));
        let second = with_id("status", Some("42"));
        let third = with_id("readings", None);

        StreamEventHandler::handle_event(&mut state, first);
        assert_eq!(state.connection.last_event_id.as_deref(), Some("41"));
        StreamEventHandler::handle_event(&mut state, second);
        assert_eq!(state.connection.last_event_id.as_deref(), Some("42"));
        StreamEventHandler::handle_event(&mut state, third);
        assert_eq!(state.connection.last_event_id, None);
    }

    #[test]
    fn test_connection_state_transitions() {
        let (_sender, mut state) = state();
        assert_eq!(state.connection.ready_state, ReadyState::Connecting);

        StreamEventHandler::handle_event(&mut state, StreamEvent::Open);
        assert_eq!(state.connection.ready_state, ReadyState::Open);

        StreamEventHandler::handle_event(&mut state, StreamEvent::Error {
            ready_state: ReadyState::Closed,
            message: "Unexpected status: 404".into(),
        });
        assert_eq!(state.connection.ready_state, ReadyState::Closed);
        assert_eq!(state.connection.last_error.as_deref(), Some("Unexpected status: 404"));
    }

    #[test]
    fn test_malformed_payload_dropped() {
        let (_sender, mut state) = state();

        StreamEventHandler::handle_event(&mut state, readings(r#"{"temp":"23.4","tiltY":"#));

        assert_eq!(state.display.filled(), 0);
        assert_eq!(renders(&state), 0);
        assert_eq!(state.connection.decode_failures, 1);

        // 后续事件不受影响
        StreamEventHandler::handle_event(&mut state, readings(r#"{"temp":"20.0"}"#));
        assert_eq!(state.display.text("temp"), Some("20.0"));
    }

    #[test]
    fn test_missing_orientation_keeps_rotation_but_renders() {
        let (_sender, mut state) = state();
        StreamEventHandler::handle_event(&mut state, readings(r#"{"tiltY":0.1,"tiltR":0.2,"tiltP":0.3}"#));
        StreamEventHandler::handle_event(&mut state, readings(r#"{"temp":"21.0","tiltY":0.9}"#));

        assert_eq!(state.viewport.scene.cube.rotation(), DVec3::new(0.3, 0.1, 0.2));
        assert_eq!(state.display.text("tiltY"), Some(crate::utils::radians_to_degrees_text(0.9, 2).as_str()));
        assert_eq!(renders(&state), 2);
    }

    #[test]
    fn test_drain_processes_in_arrival_order() {
        let (sender, mut state) = state();
        sender.send(StreamEvent::Open).unwrap();
        sender.send(readings(r#"{"tiltY":0.1,"tiltR":0.1,"tiltP":0.1}"#)).unwrap();
        sender.send(readings(r#"{"tiltY":0.5,"tiltR":0.6,"tiltP":0.7}"#)).unwrap();

        let handled = StreamEventHandler::handle_stream_events(&mut state);

        assert_eq!(handled, 3);
        assert_eq!(renders(&state), 2);
        assert_eq!(state.viewport.scene.cube.rotation(), DVec3::new(0.7, 0.5, 0.6));
        assert_eq!(StreamEventHandler::handle_stream_events(&mut state), 0);
    }
}
