//! Request and response capture.
//!
//! Bodies are drained into memory so they can be rendered for the log, then
//! handed on as an equivalent body: same bytes, same trailers and, if the
//! original stream failed, the same failure after the bytes read so far.

use crate::ExchangeError;
use axum::{
    body::Body,
    http::{request::Parts, HeaderMap, Request},
};
use bytes::{Bytes, BytesMut};
use http_body::Frame;
use http_body_util::{BodyExt, StreamBody};
use reqlog_config::LoggingOptions;
use reqlog_core::SensitiveDataMasker;
use std::borrow::Cow;
use std::fmt::Write;

/// Placeholder logged instead of the response body when body logging is off.
pub const RESPONSE_BODY_DISABLED: &str = "Response body logging disabled";

/// In-memory stand-in for a body stream.
///
/// Filled once from the original body, read as often as needed, and turned
/// back into a body exactly once by [`CapturingSink::into_body`].
#[derive(Debug, Default)]
pub struct CapturingSink {
    data: Bytes,
    trailers: Option<HeaderMap>,
    error: Option<ExchangeError>,
}

impl CapturingSink {
    /// Reads `body` to its end, or up to the first failing frame.
    pub async fn drain(mut body: Body) -> Self {
        let mut data = BytesMut::new();
        let mut trailers = None;
        let mut error = None;

        while let Some(frame) = body.frame().await {
            match frame {
                Ok(frame) => match frame.into_data() {
                    Ok(chunk) => data.extend_from_slice(&chunk),
                    Err(frame) => {
                        if let Ok(map) = frame.into_trailers() {
                            trailers = Some(map);
                        }
                    }
                },
                Err(e) => {
                    error = Some(ExchangeError::from_boxed(e.into_inner()));
                    break;
                }
            }
        }

        Self {
            data: data.freeze(),
            trailers,
            error,
        }
    }

    /// Bytes read before the end of the stream or the first error.
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }

    /// Body decoded as UTF-8, invalid sequences replaced.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Failure that ended the stream early, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ExchangeError> {
        self.error.as_ref()
    }

    /// Rebuilds a body replaying the captured stream.
    #[must_use]
    pub fn into_body(self) -> Body {
        match (self.trailers, self.error) {
            (None, None) if self.data.is_empty() => Body::empty(),
            (None, None) => Body::from(self.data),
            (trailers, error) => {
                let mut frames: Vec<Result<Frame<Bytes>, ExchangeError>> = Vec::with_capacity(3);
                if !self.data.is_empty() {
                    frames.push(Ok(Frame::data(self.data)));
                }
                if let Some(map) = trailers {
                    frames.push(Ok(Frame::trailers(map)));
                }
                if let Some(err) = error {
                    frames.push(Err(err));
                }
                let stream = StreamBody::new(futures::stream::iter(frames));
                Body::new(stream)
            }
        }
    }
}

/// Renders the request for the log and returns it with an equivalent body.
///
/// Sections appear in header, query, body order; disabled ones are left out.
pub async fn capture_request(
    request: Request<Body>,
    options: &LoggingOptions,
    masker: &SensitiveDataMasker,
) -> (String, Request<Body>) {
    let (parts, body) = request.into_parts();
    let mut rendered = render_request_head(&parts, options, masker);

    if !options.log_request_body {
        return (rendered, Request::from_parts(parts, body));
    }

    let sink = CapturingSink::drain(body).await;
    let mut text = mask_if_enabled(&sink.text(), options, masker);
    if let Some(err) = sink.error() {
        let _ = write!(text, " [request body read failed: {}]", err);
    }
    let _ = writeln!(rendered, "Body: {}", text);

    (rendered, Request::from_parts(parts, sink.into_body()))
}

/// Renders the buffered response body for the log.
#[must_use]
pub fn capture_response(
    sink: &CapturingSink,
    options: &LoggingOptions,
    masker: &SensitiveDataMasker,
) -> String {
    if !options.log_response_body {
        return RESPONSE_BODY_DISABLED.to_string();
    }

    mask_if_enabled(&sink.text(), options, masker)
}

fn render_request_head(
    parts: &Parts,
    options: &LoggingOptions,
    masker: &SensitiveDataMasker,
) -> String {
    let mut rendered = String::new();

    if options.log_headers {
        for name in parts.headers.keys() {
            let value = if options.mask_sensitive_data && masker.is_sensitive(name.as_str()) {
                Cow::Borrowed(reqlog_core::MASKED_VALUE)
            } else {
                let values: Vec<Cow<'_, str>> = parts
                    .headers
                    .get_all(name)
                    .iter()
                    .map(|value| String::from_utf8_lossy(value.as_bytes()))
                    .collect();
                Cow::Owned(values.join(","))
            };
            let _ = write!(rendered, "Header: {}={} ", name, value);
        }
    }

    if options.log_query_string {
        if let Some(query) = parts.uri.query().filter(|query| !query.is_empty()) {
            let _ = write!(rendered, "QueryString: ?{} ", query);
        }
    }

    rendered
}

fn mask_if_enabled(text: &str, options: &LoggingOptions, masker: &SensitiveDataMasker) -> String {
    if options.mask_sensitive_data {
        masker.mask(text)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Method};

    fn masker(options: &LoggingOptions) -> SensitiveDataMasker {
        SensitiveDataMasker::new(&options.sensitive_fields)
    }

    fn failing_body(prefix: &'static str) -> Body {
        let frames: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(prefix.as_bytes())),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer reset")),
        ];
        Body::from_stream(futures::stream::iter(frames))
    }

    async fn collect(body: Body) -> Bytes {
        body.collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_sink_replays_bytes() {
        let sink = CapturingSink::drain(Body::from("hello world")).await;
        assert_eq!(sink.text(), "hello world");
        assert!(sink.error().is_none());
        assert_eq!(collect(sink.into_body()).await, "hello world");
    }

    #[tokio::test]
    async fn test_sink_empty_body() {
        let sink = CapturingSink::drain(Body::empty()).await;
        assert!(sink.bytes().is_empty());
        assert!(collect(sink.into_body()).await.is_empty());
    }

    #[tokio::test]
    async fn test_sink_keeps_partial_bytes_and_error() {
        let sink = CapturingSink::drain(failing_body("partial")).await;
        assert_eq!(sink.text(), "partial");
        assert!(sink.error().unwrap().to_string().contains("peer reset"));

        let mut body = sink.into_body();
        let first = body.frame().await.unwrap().unwrap();
        assert_eq!(first.into_data().unwrap(), "partial");
        assert!(body.frame().await.unwrap().is_err());
    }

    #[tokio::test]
    async fn test_sink_lossy_utf8() {
        let sink = CapturingSink::drain(Body::from(vec![b'o', b'k', 0xff])).await;
        assert_eq!(sink.text(), "ok\u{fffd}");
        assert_eq!(collect(sink.into_body()).await.as_ref(), &[b'o', b'k', 0xff]);
    }

    #[tokio::test]
    async fn test_capture_request_sections_in_order() {
        let options = LoggingOptions::default();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/orders?x=1&y=2")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"id":7}"#))
            .unwrap();

        let (rendered, request) = capture_request(request, &options, &masker(&options)).await;

        assert_eq!(
            rendered,
            "Header: content-type=application/json QueryString: ?x=1&y=2 Body: {\"id\":7}\n"
        );
        assert_eq!(collect(request.into_body()).await, r#"{"id":7}"#);
    }

    #[tokio::test]
    async fn test_capture_request_joins_repeated_headers() {
        let options = LoggingOptions {
            log_query_string: false,
            log_request_body: false,
            ..LoggingOptions::default()
        };
        let mut request = Request::new(Body::empty());
        request.headers_mut().append("accept", HeaderValue::from_static("text/html"));
        request.headers_mut().append("accept", HeaderValue::from_static("application/json"));

        let (rendered, _) = capture_request(request, &options, &masker(&options)).await;
        assert_eq!(rendered, "Header: accept=text/html,application/json ");
    }

    #[tokio::test]
    async fn test_capture_request_all_sections_disabled() {
        let options = LoggingOptions {
            log_headers: false,
            log_query_string: false,
            log_request_body: false,
            ..LoggingOptions::default()
        };
        let request = Request::builder()
            .uri("/orders?x=1")
            .header("x-test", "1")
            .body(Body::from("payload"))
            .unwrap();

        let (rendered, request) = capture_request(request, &options, &masker(&options)).await;
        assert!(rendered.is_empty());
        assert_eq!(collect(request.into_body()).await, "payload");
    }

    #[tokio::test]
    async fn test_capture_request_masks_body_and_sensitive_headers() {
        let options = LoggingOptions {
            mask_sensitive_data: true,
            log_query_string: false,
            ..LoggingOptions::default()
        };
        let request = Request::builder()
            .uri("/login")
            .header("authorization", "Bearer secret")
            .body(Body::from(r#"{"password":"secret","user":"ada"}"#))
            .unwrap();

        let (rendered, request) = capture_request(request, &options, &masker(&options)).await;

        assert!(rendered.contains("Header: authorization=***MASKED*** "));
        assert!(rendered.contains(r#"Body: {"password":"***MASKED***","user":"ada"}"#));
        assert!(!rendered.contains("secret"));
        assert_eq!(
            collect(request.into_body()).await,
            r#"{"password":"secret","user":"ada"}"#
        );
    }

    #[tokio::test]
    async fn test_capture_request_body_read_failure_is_recoverable() {
        let options = LoggingOptions {
            log_headers: false,
            ..LoggingOptions::default()
        };
        let request = Request::new(failing_body("{\"par"));

        let (rendered, request) = capture_request(request, &options, &masker(&options)).await;

        assert!(rendered.starts_with("Body: {\"par [request body read failed:"));
        assert!(request.into_body().collect().await.is_err());
    }

    #[tokio::test]
    async fn test_empty_query_is_omitted() {
        let options = LoggingOptions {
            log_headers: false,
            log_request_body: false,
            ..LoggingOptions::default()
        };
        let request = Request::builder().uri("/orders?").body(Body::empty()).unwrap();
        let (rendered, _) = capture_request(request, &options, &masker(&options)).await;
        assert!(rendered.is_empty());
    }

    #[tokio::test]
    async fn test_capture_response_disabled_placeholder() {
        let options = LoggingOptions {
            log_response_body: false,
            ..LoggingOptions::default()
        };
        let sink = CapturingSink::drain(Body::from("secret")).await;
        assert_eq!(
            capture_response(&sink, &options, &masker(&options)),
            RESPONSE_BODY_DISABLED
        );
        assert_eq!(collect(sink.into_body()).await, "secret");
    }

    #[tokio::test]
    async fn test_capture_response_masks_without_touching_buffer() {
        let options = LoggingOptions {
            mask_sensitive_data: true,
            ..LoggingOptions::default()
        };
        let sink = CapturingSink::drain(Body::from(r#"{"token":"abc","ok":true}"#)).await;

        let rendered = capture_response(&sink, &options, &masker(&options));

        assert_eq!(rendered, r#"{"token":"***MASKED***","ok":true}"#);
        assert_eq!(collect(sink.into_body()).await, r#"{"token":"abc","ok":true}"#);
    }

    #[tokio::test]
    async fn test_capture_response_plain_text_passthrough() {
        let options = LoggingOptions {
            mask_sensitive_data: true,
            ..LoggingOptions::default()
        };
        let sink = CapturingSink::drain(Body::from("not json")).await;
        assert_eq!(capture_response(&sink, &options, &masker(&options)), "not json");
    }
}
