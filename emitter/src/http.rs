pub const LINE_DELIMITER: &[u8] = b"\r\n";

mod headers;
mod response;

pub use headers::HeaderFields;
pub use response::{IntoResponse, Json, Response};
