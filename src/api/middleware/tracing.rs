//! Request logging.
//!
//! Each request gets an `http` span carrying the method, the matched route
//! template (`/{short_code}`, `/api/stats/{short_code}`, ...) and the raw path,
//! so redirects for different codes aggregate under one route while the code
//! itself stays visible. Responses are logged at `INFO` with latency in
//! milliseconds; 5xx responses are additionally reported as failures.
//!
//! ```text
//! INFO http{method=GET route=/{short_code} path=/Ab3dE9z}: finished processing request latency=1 ms status=301
//! ```

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

type MakeSpanFn = fn(&Request<Body>) -> Span;

pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeSpanFn> {
    TraceLayer::new_for_http()
        .make_span_with(request_span as MakeSpanFn)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

fn request_span(request: &Request<Body>) -> Span {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or("unmatched");

    tracing::info_span!(
        "http",
        method = %request.method(),
        route,
        path = %request.uri().path(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::span::Attributes;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    #[derive(Default)]
    struct Fields(Vec<(String, String)>);

    impl Visit for Fields {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.0.push((field.name().to_string(), format!("{:?}", value)));
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            self.0.push((field.name().to_string(), value.to_string()));
        }
    }

    struct SpanRecorder(Arc<Mutex<Fields>>);

    impl<S> tracing_subscriber::Layer<S> for SpanRecorder
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &tracing::Id, _ctx: Context<'_, S>) {
            attrs.record(&mut *self.0.lock().unwrap());
        }
    }

    fn recorded_fields(request: &Request<Body>) -> Vec<(String, String)> {
        let fields = Arc::new(Mutex::new(Fields::default()));
        let subscriber = tracing_subscriber::registry().with(SpanRecorder(fields.clone()));
        tracing::subscriber::with_default(subscriber, || {
            let _span = request_span(request);
        });
        std::mem::take(&mut fields.lock().unwrap().0)
    }

    #[test]
    fn test_span_without_matched_route() {
        let request = Request::get("/Ab3dE9z").body(Body::empty()).unwrap();

        let fields = recorded_fields(&request);

        assert!(fields.contains(&("method".to_string(), "GET".to_string())));
        assert!(fields.contains(&("route".to_string(), "unmatched".to_string())));
        assert!(fields.contains(&("path".to_string(), "/Ab3dE9z".to_string())));
    }
}
