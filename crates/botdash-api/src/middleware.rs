use std::any::Any;

use axum::{
    Json,
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
};
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};

use botdash_types::api::ErrorResponse;

use crate::state::AppState;

/// Text of a panic payload raised by `panic!` with a literal or a formatted message.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Catch panics escaping a handler, record them as "Error" log entries and
/// answer with a generic 500.
pub fn fault_boundary(state: AppState) -> CatchPanicLayer<FaultRecorder> {
    CatchPanicLayer::custom(FaultRecorder { state })
}

#[derive(Clone)]
pub struct FaultRecorder {
    state: AppState,
}

impl ResponseForPanic for FaultRecorder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        self.state.record_fault("http handler", &panic_message(err.as_ref()));

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                message: "Internal server error".to_string(),
                errors: Vec::new(),
            }),
        )
            .into_response()
    }
}
