use crate::engine::tracking::provider::TrackingStatusEvent;
use crate::tools::actions::{ActionSource, ResetMeasurementsEvent, UnitSelectionEvent};
use crate::tools::measure::MeasurementEvent;
use crate::tools::measure::session::MeasurementSession;
use crate::tools::measure::unit::DistanceUnit;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Action requested by an incoming message, applied through the usual events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcAction {
    SelectUnit(DistanceUnit),
    Reset,
}

/// Result of handling one request.
#[derive(Debug, Default)]
pub struct RpcDispatch {
    pub response: Option<RpcResponse>,
    pub action: Option<RpcAction>,
}

/// Resource managing bidirectional RPC communication with the embedding page.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the embedding page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the embedding page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }
}

/// Plugin establishing the postMessage bridge for iframe deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    forward_measurement_events,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(err) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", err);
            return;
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing an incoming RPC message from the embedding page.
#[derive(Event)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    session: Res<MeasurementSession>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut unit_events: EventWriter<UnitSelectionEvent>,
    mut reset_events: EventWriter<ResetMeasurementsEvent>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {}", parse_error);
                continue;
            }
        };
        debug!("Processing RPC method: {}", request.method);

        let dispatch = handle_rpc_request(&request, &session);
        match dispatch.action {
            Some(RpcAction::SelectUnit(unit)) => {
                unit_events.write(UnitSelectionEvent {
                    unit,
                    source: ActionSource::Rpc,
                });
            }
            Some(RpcAction::Reset) => {
                reset_events.write(ResetMeasurementsEvent {
                    source: ActionSource::Rpc,
                });
            }
            None => {}
        }
        if let Some(response) = dispatch.response {
            rpc_interface.queue_response(response);
        }
    }
}

/// Handle an individual RPC request. Requests without an ID still run their
/// action but get no response.
pub fn handle_rpc_request(request: &RpcRequest, session: &MeasurementSession) -> RpcDispatch {
    let (result, action) = match request.method.as_str() {
        "set_unit" => match handle_set_unit(&request.params) {
            Ok((value, unit)) => (Ok(value), Some(RpcAction::SelectUnit(unit))),
            Err(error) => (Err(error), None),
        },
        "reset_measurements" => (
            Ok(serde_json::json!({ "success": true, "cleared": session.lines().len() })),
            Some(RpcAction::Reset),
        ),
        "get_measurements" => (handle_get_measurements(session), None),
        "get_unit" => (
            Ok(serde_json::json!({ "unit": session.unit().as_str() })),
            None,
        ),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            let response = request.id.clone().map(|id| {
                create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                )
            });
            return RpcDispatch {
                response,
                action: None,
            };
        }
    };

    let response = request.id.clone().map(|id| match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        },
    });

    RpcDispatch { response, action }
}

/// Handle unit selection with parameter validation.
fn handle_set_unit(
    params: &serde_json::Value,
) -> Result<(serde_json::Value, DistanceUnit), RpcError> {
    #[derive(serde::Deserialize)]
    struct SetUnitParams {
        unit: String,
    }

    let unit_params = serde_json::from_value::<SetUnitParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'unit' parameter"))?;

    let unit = DistanceUnit::from_string(&unit_params.unit)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown unit: {}", unit_params.unit)))?;

    Ok((
        serde_json::json!({
            "success": true,
            "unit": unit.as_str()
        }),
        unit,
    ))
}

fn handle_get_measurements(session: &MeasurementSession) -> Result<serde_json::Value, RpcError> {
    let measurements = serde_json::to_value(session.snapshots())
        .map_err(|e| RpcError::internal_error(&e.to_string()))?;
    Ok(serde_json::json!({
        "unit": session.unit().as_str(),
        "measurements": measurements
    }))
}

/// Mirror session and tracking changes to the embedding page.
fn forward_measurement_events(
    mut measurement_events: EventReader<MeasurementEvent>,
    mut status_events: EventReader<TrackingStatusEvent>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in measurement_events.read() {
        let (method, params) = notification_for(event);
        rpc_interface.send_notification(method, params);
    }
    for event in status_events.read() {
        rpc_interface.send_notification(
            "tracking_status",
            serde_json::json!({ "message": event.status.to_string() }),
        );
    }
}

fn notification_for(event: &MeasurementEvent) -> (&'static str, serde_json::Value) {
    match event {
        MeasurementEvent::Started(line) => (
            "measure_started",
            serde_json::json!({ "id": line.id, "position": line.start }),
        ),
        MeasurementEvent::Updated(line) => (
            "measure_updated",
            serde_json::json!({
                "id": line.id,
                "start": line.start,
                "end": line.end,
                "distance": line.distance,
                "label": line.label,
            }),
        ),
        MeasurementEvent::Completed(line) => (
            "measure_completed",
            serde_json::json!({
                "id": line.id,
                "start": line.start,
                "end": line.end,
                "distance": line.distance,
                "unit": line.unit.as_str(),
                "label": line.label,
            }),
        ),
        MeasurementEvent::Cleared { count } => {
            ("measure_clear", serde_json::json!({ "count": count }))
        }
        MeasurementEvent::UnitChanged { unit } => {
            ("unit_changed", serde_json::json!({ "unit": unit.as_str() }))
        }
    }
}

/// Send queued notifications and responses to the embedding page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::measure::testing::RecordingSurface;

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(serde_json::json!(1)),
        }
    }

    #[test]
    fn set_unit_dispatches_action() {
        let session = MeasurementSession::default();
        let dispatch = handle_rpc_request(
            &request("set_unit", serde_json::json!({ "unit": "inch" })),
            &session,
        );

        assert_eq!(dispatch.action, Some(RpcAction::SelectUnit(DistanceUnit::Inch)));
        let response = dispatch.response.unwrap();
        assert!(response.error.is_none());
        assert_eq!(response.result.unwrap()["unit"], "inch");
    }

    #[test]
    fn unknown_unit_is_invalid_params() {
        let session = MeasurementSession::default();
        let dispatch = handle_rpc_request(
            &request("set_unit", serde_json::json!({ "unit": "parsec" })),
            &session,
        );

        assert!(dispatch.action.is_none());
        assert_eq!(dispatch.response.unwrap().error.unwrap().code, -32602);
    }

    #[test]
    fn unknown_method_is_not_found() {
        let session = MeasurementSession::default();
        let dispatch = handle_rpc_request(&request("fly", serde_json::Value::Null), &session);
        assert_eq!(dispatch.response.unwrap().error.unwrap().code, -32601);
    }

    #[test]
    fn notification_without_id_gets_no_response() {
        let session = MeasurementSession::default();
        let mut reset = request("reset_measurements", serde_json::Value::Null);
        reset.id = None;

        let dispatch = handle_rpc_request(&reset, &session);
        assert_eq!(dispatch.action, Some(RpcAction::Reset));
        assert!(dispatch.response.is_none());
    }

    #[test]
    fn get_measurements_lists_finished_lines() {
        let mut surface = RecordingSurface::default();
        let mut session = MeasurementSession::new(DistanceUnit::Meter);
        session.touch_down();
        session.tick(Some(Vec3::ZERO), &mut surface);
        session.tick(Some(Vec3::new(0.0, 0.0, 2.0)), &mut surface);
        session.touch_up();

        let dispatch = handle_rpc_request(
            &request("get_measurements", serde_json::Value::Null),
            &session,
        );
        let result = dispatch.response.unwrap().result.unwrap();
        assert_eq!(result["unit"], "meter");
        assert_eq!(result["measurements"][0]["label"], "2.00 m");
        assert_eq!(result["measurements"][0]["unit"], "meter");
    }

    #[test]
    fn completed_notification_carries_label() {
        let mut surface = RecordingSurface::default();
        let mut session = MeasurementSession::default();
        session.touch_down();
        session.tick(Some(Vec3::ZERO), &mut surface);
        session.tick(Some(Vec3::X), &mut surface);
        let snapshot = session.touch_up().unwrap();

        let (method, params) = notification_for(&MeasurementEvent::Completed(snapshot));
        assert_eq!(method, "measure_completed");
        assert_eq!(params["label"], "100.00 cm");
        assert_eq!(params["unit"], "centimeter");
    }

    #[test]
    fn parses_request_without_params() {
        let request: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"get_unit","id":3}"#).unwrap();
        let dispatch = handle_rpc_request(&request, &MeasurementSession::default());
        assert_eq!(dispatch.response.unwrap().result.unwrap()["unit"], "centimeter");
    }
}
