use std::{convert::Infallible, time::Duration};

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::Stream;
use tokio::sync::broadcast::error::RecvError;

use crate::AppState;

pub const ALERT_TRIGGERED_EVENT: &str = "alertTriggered";

/// GET /events: one `alertTriggered` event per alert transition, with the
/// updated alert record as JSON data.
pub async fn sse_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events_tx.subscribe();

    let stream = futures_util::stream::unfold(rx, |mut rx| async {
        let evt = match rx.recv().await {
            Ok(alert) => Event::default()
                .event(ALERT_TRIGGERED_EVENT)
                .json_data(&alert)
                .unwrap_or_else(|_| Event::default().event("ping").data("encode")),
            Err(RecvError::Lagged(n)) => {
                tracing::warn!("SSE subscriber lagged, {} events dropped", n);
                Event::default().event("ping").data("lagged")
            }
            Err(RecvError::Closed) => return None,
        };

        Some((Ok(evt), rx))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(20))
            .text("keep-alive"),
    )
}
