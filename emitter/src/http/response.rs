use bytes::Bytes;
use http::{StatusCode, Version};

use crate::body::MemoryBody;

use super::HeaderFields;

/// A finished response waiting to be emitted.
///
/// Everything but the body is plain data; the body is the only part whose
/// state (its read position) changes while the response is being sent.
#[derive(Debug, Clone)]
pub struct Response<B> {
    version: String,
    status: StatusCode,
    reason: String,
    headers: HeaderFields,
    body: B,
}

impl<B> Response<B> {
    pub fn new(body: B) -> Self {
        Self {
            version: "1.1".to_string(),
            status: StatusCode::OK,
            reason: canonical_reason(StatusCode::OK),
            headers: HeaderFields::new(),
            body,
        }
    }

    /// Sets the status code and resets the reason phrase to its canonical
    /// text (empty for unregistered codes).
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self.reason = canonical_reason(status);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason_phrase(&self) -> &str {
        &self.reason
    }

    pub fn headers(&self) -> &HeaderFields {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderFields {
        &mut self.headers
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn into_body(self) -> B {
        self.body
    }

    pub fn map_body<T>(self, f: impl FnOnce(B) -> T) -> Response<T> {
        Response {
            version: self.version,
            status: self.status,
            reason: self.reason,
            headers: self.headers,
            body: f(self.body),
        }
    }
}

impl<B> From<http::Response<B>> for Response<B> {
    fn from(response: http::Response<B>) -> Self {
        let (parts, body) = response.into_parts();
        let version = match parts.version {
            Version::HTTP_09 => "0.9",
            Version::HTTP_10 => "1.0",
            Version::HTTP_2 => "2.0",
            Version::HTTP_3 => "3.0",
            _ => "1.1",
        };

        Self {
            version: version.to_string(),
            status: parts.status,
            reason: canonical_reason(parts.status),
            headers: HeaderFields::from(&parts.headers),
            body,
        }
    }
}

fn canonical_reason(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

pub trait IntoResponse {
    fn into_response(self) -> Response<MemoryBody>;
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response<MemoryBody> {
        Response::new(MemoryBody::default())
            .with_status(self)
            .with_header("Content-Length", "0")
    }
}

impl IntoResponse for Bytes {
    fn into_response(self) -> Response<MemoryBody> {
        with_content(self, mime::APPLICATION_OCTET_STREAM.as_ref())
    }
}

impl IntoResponse for Vec<u8> {
    fn into_response(self) -> Response<MemoryBody> {
        IntoResponse::into_response(Bytes::from(self))
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response<MemoryBody> {
        with_content(Bytes::from(self), mime::TEXT_PLAIN_UTF_8.as_ref())
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response<MemoryBody> {
        with_content(Bytes::from_static(self.as_bytes()), mime::TEXT_PLAIN_UTF_8.as_ref())
    }
}

pub struct Json<T>(pub T);
impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response<MemoryBody> {
        match serde_json::to_vec(&self.0) {
            Ok(json) => with_content(Bytes::from(json), mime::APPLICATION_JSON.as_ref()),
            Err(err) => {
                tracing::error!(%err, "failed to serialize json response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

impl<B: IntoResponse> IntoResponse for (StatusCode, B) {
    fn into_response(self) -> Response<MemoryBody> {
        let response = self.1.into_response();
        response.with_status(self.0)
    }
}

fn with_content(body: Bytes, content_type: &str) -> Response<MemoryBody> {
    let body_len = body.len();

    Response::new(MemoryBody::new(body))
        .with_header("Content-Type", content_type)
        .with_header("Content-Length", body_len.to_string())
}

#[cfg(test)]
mod tests {
    use http::header::SET_COOKIE;

    use crate::body::BodyStream;

    use super::*;

    #[test]
    fn defaults_to_ok_over_http_11() {
        let response = Response::new(());
        assert_eq!(response.version(), "1.1");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.reason_phrase(), "OK");
        assert!(response.headers().is_empty());
    }

    #[test]
    fn status_resets_reason() {
        let response = Response::new(())
            .with_reason("Fine")
            .with_status(StatusCode::NOT_FOUND);
        assert_eq!(response.reason_phrase(), "Not Found");

        let response = response.with_status(StatusCode::from_u16(599).unwrap());
        assert_eq!(response.reason_phrase(), "");
    }

    #[test]
    fn converts_http_response() {
        let response = http::Response::builder()
            .status(StatusCode::CREATED)
            .version(Version::HTTP_10)
            .header("Location", "/people/1")
            .header(SET_COOKIE, "a=1")
            .header(SET_COOKIE, "b=2")
            .body(())
            .unwrap();

        let response = Response::from(response);
        assert_eq!(response.version(), "1.0");
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.reason_phrase(), "Created");
        assert_eq!(response.headers().get("location"), Some("/people/1"));
        assert_eq!(response.headers().get_all("set-cookie"), ["a=1", "b=2"]);
    }

    #[test]
    fn json_sets_content_headers() {
        let mut response = (StatusCode::ACCEPTED, Json(vec![1, 2, 3])).into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers().get("Content-Type"), Some("application/json"));
        assert_eq!(response.headers().get("Content-Length"), Some("7"));
        assert_eq!(&response.body_mut().read(64).unwrap()[..], b"[1,2,3]");
    }

    #[test]
    fn status_only_is_empty() {
        let response = StatusCode::NO_CONTENT.into_response();
        assert_eq!(response.headers().get("content-length"), Some("0"));
        assert_eq!(response.body().size(), Some(0));
    }
}
