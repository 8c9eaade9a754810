use crate::error::ClientError;
use crate::prediction::Diagnosis;
use crate::upload::PickedImage;

/// Picked image, in-flight flag, and the one result region of a scan screen.
///
/// Only one of `result` and `error` is ever set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSession {
    picked: Option<PickedImage>,
    busy: bool,
    result: Option<Diagnosis>,
    error: Option<String>,
    failure_prefix: Option<&'static str>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends `prefix` to request failures, not to validation errors.
    pub fn with_failure_prefix(prefix: &'static str) -> Self {
        Self {
            failure_prefix: Some(prefix),
            ..Self::default()
        }
    }

    /// A new pick discards whatever the previous upload produced.
    pub fn pick(&mut self, image: PickedImage) {
        self.picked = Some(image);
        self.result = None;
        self.error = None;
    }

    /// The input no longer holds a usable file: forget the pick and whatever
    /// it produced, so a submit reports that nothing is selected.
    pub fn clear_pick(&mut self) {
        self.picked = None;
        self.result = None;
        self.error = None;
    }

    /// Clears the result region and returns the image to send, or `None`
    /// when nothing is picked or an upload is already running.
    pub fn begin_upload(&mut self) -> Option<&PickedImage> {
        if self.busy || self.picked.is_none() {
            return None;
        }
        self.busy = true;
        self.result = None;
        self.error = None;
        self.picked.as_ref()
    }

    pub fn finish(&mut self, outcome: Result<Diagnosis, ClientError>) {
        self.busy = false;
        match outcome {
            Ok(diagnosis) => {
                log::info!("prediction: {}", diagnosis.label);
                self.result = Some(diagnosis);
                self.error = None;
            }
            Err(err) => {
                log::warn!("prediction failed: {}", err);
                self.result = None;
                self.error = Some(match (self.failure_prefix, err.is_validation()) {
                    (Some(prefix), false) => format!("{}{}", prefix, err.user_message()),
                    _ => err.user_message(),
                });
            }
        }
    }

    /// Shows an error without touching the busy flag, for checks that run
    /// before an upload starts.
    pub fn reject(&mut self, err: ClientError) {
        self.result = None;
        self.error = Some(err.user_message());
    }

    pub fn picked(&self) -> Option<&PickedImage> {
        self.picked.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn can_upload(&self) -> bool {
        self.picked.is_some() && !self.busy
    }

    pub fn result(&self) -> Option<&Diagnosis> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, ValidationError};
    use crate::upload::validate_web_upload;

    fn leaf() -> PickedImage {
        PickedImage::from_base64(Some("leaf.jpg".into()), Some("image/jpeg".into()), "/9j/")
    }

    fn diagnosis(label: &str) -> Diagnosis {
        Diagnosis {
            label: label.into(),
            confidence_pct: Some(90.0),
            guidance: None,
        }
    }

    #[test]
    fn nothing_to_upload_without_a_pick() {
        let mut session = ScanSession::new();
        assert!(!session.can_upload());
        assert!(session.begin_upload().is_none());
        assert!(!session.is_busy());
    }

    #[test]
    fn success_replaces_previous_result() {
        let mut session = ScanSession::new();
        session.pick(leaf());
        session.begin_upload();
        session.finish(Ok(diagnosis("Corn___Common_rust")));

        assert!(session.begin_upload().is_some());
        assert_eq!(session.result(), None);
        session.finish(Ok(diagnosis("Corn___healthy")));

        assert_eq!(session.result().map(|d| d.label.as_str()), Some("Corn___healthy"));
        assert_eq!(session.error(), None);
        assert!(!session.is_busy());
    }

    #[test]
    fn failure_clears_result_and_shows_only_error() {
        let mut session = ScanSession::new();
        session.pick(leaf());
        session.begin_upload();
        session.finish(Ok(diagnosis("Apple___Apple_scab")));

        session.begin_upload();
        session.finish(Err(FetchError::Timeout(20).into()));

        assert_eq!(session.result(), None);
        assert_eq!(session.error(), Some("Request timed out after 20 s"));
    }

    #[test]
    fn failure_prefix_applies_to_request_errors_only() {
        let mut session = ScanSession::with_failure_prefix("Upload failed: ");
        session.pick(leaf());
        session.begin_upload();
        session.finish(Err(FetchError::Network("connection refused".into()).into()));
        assert_eq!(
            session.error(),
            Some("Upload failed: Network error: connection refused")
        );

        session.begin_upload();
        session.finish(Err(ValidationError::MissingPayload.into()));
        assert_eq!(
            session.error(),
            Some("No base64 data from picker. Try reselecting the image.")
        );
    }

    #[test]
    fn busy_session_refuses_a_second_upload() {
        let mut session = ScanSession::new();
        session.pick(leaf());
        assert!(session.begin_upload().is_some());
        assert!(session.begin_upload().is_none());
        assert!(!session.can_upload());
    }

    #[test]
    fn new_pick_clears_result_region() {
        let mut session = ScanSession::new();
        session.pick(leaf());
        session.reject(ValidationError::MissingPayload.into());
        assert!(session.error().is_some());

        session.pick(leaf());
        assert_eq!(session.error(), None);
        assert_eq!(session.result(), None);
    }

    #[test]
    fn cleared_pick_is_not_uploaded() {
        let mut session = ScanSession::new();
        session.pick(leaf());
        session.begin_upload();
        session.finish(Ok(diagnosis("Tomato___Late_blight")));

        session.clear_pick();
        assert_eq!(session.picked(), None);
        assert_eq!(session.result(), None);
        assert_eq!(session.error(), None);
        assert!(!session.can_upload());
        assert_eq!(
            validate_web_upload(session.picked()),
            Err(ValidationError::NoSelection)
        );
    }
}
