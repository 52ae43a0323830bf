//! Form field extraction for `POST /add`.
//!
//! # Responsibility
//! - Read text fields from `application/x-www-form-urlencoded` and
//!   `multipart/form-data` bodies.
//!
//! # Invariants
//! - Repeated keys keep every value; lookups return the first one.
//! - Multipart file parts are not form fields and are skipped.
//! - An unreadable body yields no fields; extraction never rejects.

use std::convert::Infallible;

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;
use log::debug;

const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Ordered text fields of a submitted form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(Vec<(String, String)>);

impl FormFields {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self(fields)
    }

    /// First value submitted under `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// First value under `key`, treating an empty value as absent.
    pub fn first_non_empty(&self, key: &str) -> Option<&str> {
        self.first(key).filter(|value| !value.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| {
                value
                    .trim_start()
                    .to_ascii_lowercase()
                    .starts_with(MULTIPART_FORM_DATA)
            });

        if is_multipart {
            return Ok(read_multipart(req, state).await);
        }

        match Form::<Vec<(String, String)>>::from_request(req, state).await {
            Ok(Form(fields)) => Ok(Self(fields)),
            Err(rejection) => {
                debug!(
                    "event=form_read module=http status=rejected kind=urlencoded reason={}",
                    rejection
                );
                Ok(Self::default())
            }
        }
    }
}

async fn read_multipart<S>(req: Request, state: &S) -> FormFields
where
    S: Send + Sync,
{
    let mut multipart = match Multipart::from_request(req, state).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!(
                "event=form_read module=http status=rejected kind=multipart reason={}",
                rejection
            );
            return FormFields::default();
        }
    };

    let mut fields = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                debug!(
                    "event=form_read module=http status=error kind=multipart error={}",
                    err
                );
                return FormFields::default();
            }
        };

        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match field.text().await {
            Ok(value) => fields.push((name, value)),
            Err(err) => {
                debug!(
                    "event=form_read module=http status=error kind=multipart field={} error={}",
                    name, err
                );
                return FormFields::default();
            }
        }
    }

    FormFields(fields)
}

#[cfg(test)]
mod tests {
    use super::FormFields;
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{header, Request};

    fn pairs(raw: &[(&str, &str)]) -> FormFields {
        FormFields::new(
            raw.iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn first_returns_earliest_value_for_repeated_keys() {
        let fields = pairs(&[("name", "Julia"), ("name", "Other"), ("state", "{}")]);
        assert_eq!(fields.first("name"), Some("Julia"));
        assert_eq!(fields.first("state"), Some("{}"));
        assert_eq!(fields.first("missing"), None);
    }

    #[test]
    fn first_non_empty_treats_empty_value_as_absent() {
        let fields = pairs(&[("name", ""), ("name", "Julia")]);
        assert_eq!(fields.first("name"), Some(""));
        assert_eq!(fields.first_non_empty("name"), None);
    }

    #[tokio::test]
    async fn multipart_file_parts_are_skipped() {
        let body = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"name\"\r\n\r\n\
            Julia\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"state\"; filename=\"state.json\"\r\n\
            Content-Type: application/json\r\n\r\n\
            {}\r\n\
            --XyZ--\r\n";
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XyZ")
            .body(Body::from(body))
            .unwrap();

        let fields = FormFields::from_request(request, &()).await.unwrap();
        assert_eq!(fields, pairs(&[("name", "Julia")]));
    }

    #[tokio::test]
    async fn malformed_multipart_yields_no_fields() {
        let request = Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "multipart/form-data")
            .body(Body::from("name=Julia"))
            .unwrap();

        let fields = FormFields::from_request(request, &()).await.unwrap();
        assert!(fields.is_empty());
    }
}
