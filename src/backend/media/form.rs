/**
 * Multipart Form Reader
 *
 * Collects a `multipart/form-data` body into its text fields and its file
 * parts. Endpoints that accept images (register, update-user, create post)
 * also accept plain JSON; [`is_multipart`] tells the two apart.
 */

use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header::CONTENT_TYPE, HeaderMap};
use axum::Json;
use serde::de::DeserializeOwned;

use crate::backend::error::{BackendError, BackendResult};

/// One uploaded file
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

/// Text fields and files of a multipart body, keyed by field name
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, String>,
    files: HashMap<String, ImageUpload>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    pub fn take_file(&mut self, name: &str) -> Option<ImageUpload> {
        self.files.remove(name)
    }
}

pub fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

/// Drain a multipart body
///
/// Parts with a file name are files, the rest are text. Empty file parts
/// (a file input left blank) are dropped.
pub async fn read_form(mut multipart: Multipart) -> BackendResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if let Some(file_name) = field.file_name().map(str::to_string) {
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            if bytes.is_empty() {
                continue;
            }
            form.files.insert(
                name,
                ImageUpload {
                    bytes: bytes.to_vec(),
                    content_type,
                    file_name: Some(file_name),
                },
            );
        } else {
            form.fields.insert(name, field.text().await?);
        }
    }

    Ok(form)
}

/// A request body sent either as JSON or as a multipart form
#[derive(Debug)]
pub enum Submission<T> {
    Json(T),
    Form(UploadForm),
}

impl<T, S> FromRequest<S> for Submission<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(request.headers()) {
            let multipart = Multipart::from_request(request, state).await?;
            Ok(Self::Form(read_form(multipart).await?))
        } else {
            let Json(body) = Json::<T>::from_request(request, state).await?;
            Ok(Self::Json(body))
        }
    }
}
