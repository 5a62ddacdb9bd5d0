//! Messages exchanged between the host UI and a page's reader.
//!
//! Requests are JSON objects tagged by `action`:
//!
//! | request                  | response                              |
//! |--------------------------|---------------------------------------|
//! | `{"action":"toggle"}`    | `{"success":true,"isEnabled":<bool>}` |
//! | `{"action":"getState"}`  | `{"isEnabled":<bool>}`                |
//! | anything else            | `{"success":false}`                   |
//!
//! # Example
//!
//! ```rust
//! use readmode_core::{Page, ReaderMode, protocol::handle_json};
//!
//! let mut reader = ReaderMode::new(Page::parse("<article><p>Hi</p></article>", None));
//! assert_eq!(handle_json(&mut reader, r#"{"action":"getState"}"#), r#"{"isEnabled":false}"#);
//! assert_eq!(handle_json(&mut reader, r#"{"action":"toggle"}"#), r#"{"success":true,"isEnabled":true}"#);
//! ```

use serde::{Deserialize, Serialize};

use crate::reader::ReaderMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    Toggle,
    GetState,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
}

impl Response {
    pub fn failure() -> Self {
        Self { success: Some(false), is_enabled: None }
    }
}

/// Applies one request to `reader`.
pub fn handle_message(reader: &mut ReaderMode, request: &Request) -> Response {
    match request {
        Request::Toggle => {
            let is_enabled = reader.toggle();
            Response { success: Some(true), is_enabled: Some(is_enabled) }
        }
        Request::GetState => Response { success: None, is_enabled: Some(reader.is_enabled()) },
        Request::Unknown => Response::failure(),
    }
}

/// Decodes a JSON request, applies it and encodes the response.
///
/// Input that is not a request object is answered with `{"success":false}`.
pub fn handle_json(reader: &mut ReaderMode, message: &str) -> String {
    let response = match serde_json::from_str::<Request>(message) {
        Ok(request) => handle_message(reader, &request),
        Err(e) => {
            tracing::debug!(error = %e, "rejecting malformed message");
            Response::failure()
        }
    };

    serde_json::to_string(&response).unwrap_or_else(|_| r#"{"success":false}"#.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Page;
    use rstest::rstest;

    fn reader() -> ReaderMode {
        ReaderMode::new(Page::parse("<main><h1>T</h1><p>text</p></main>", None))
    }

    #[test]
    fn test_toggle_reports_new_state() {
        let mut reader = reader();
        assert_eq!(
            handle_message(&mut reader, &Request::Toggle),
            Response { success: Some(true), is_enabled: Some(true) }
        );
        assert_eq!(
            handle_message(&mut reader, &Request::Toggle),
            Response { success: Some(true), is_enabled: Some(false) }
        );
    }

    #[test]
    fn test_get_state_does_not_change_state() {
        let mut reader = reader();
        handle_message(&mut reader, &Request::Toggle);
        assert_eq!(handle_json(&mut reader, r#"{"action":"getState"}"#), r#"{"isEnabled":true}"#);
        assert!(reader.is_enabled());
    }

    #[test]
    fn test_toggle_without_content_stays_off() {
        let mut reader = ReaderMode::new(Page::parse("<span>nothing</span>", None));
        assert_eq!(handle_json(&mut reader, r#"{"action":"toggle"}"#), r#"{"success":true,"isEnabled":false}"#);
    }

    #[rstest]
    #[case(r#"{"action":"explode"}"#)]
    #[case(r#"{"action":"toggle""#)]
    #[case(r#"{"kind":"toggle"}"#)]
    #[case(r#"[1,2]"#)]
    #[case("")]
    fn test_unrecognized_messages_fail(#[case] message: &str) {
        let mut reader = reader();
        assert_eq!(handle_json(&mut reader, message), r#"{"success":false}"#);
        assert!(!reader.is_enabled());
    }

    #[test]
    fn test_request_decoding() {
        let toggle: Request = serde_json::from_str(r#"{"action":"toggle","extra":1}"#).unwrap();
        assert_eq!(toggle, Request::Toggle);
        let state: Request = serde_json::from_str(r#"{"action":"getState"}"#).unwrap();
        assert_eq!(state, Request::GetState);
    }
}
