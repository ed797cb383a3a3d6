use std::path::Path;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::TryStreamExt;
use futures_util::stream::StreamExt;

use super::SubmissionService;
use super::create::submit_code;
use crate::config::AppConfig;
use crate::grading::MAX_CODE_LENGTH;
use crate::models::{ApiResponse, ErrorCode, FieldError};

// UTF-8 单个字符最多 4 字节
const MAX_UPLOAD_BYTES: usize = MAX_CODE_LENGTH * 4;

pub async fn upload_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let allowed_extensions = &AppConfig::get().upload.allowed_extensions;

    let mut assignment_id: Option<i64> = None;
    let mut file_bytes: Option<Vec<u8>> = None;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        match name.as_str() {
            "file" => {
                if file_bytes.is_some() {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::MultifileUploadNotAllowed,
                        "Only one file can be uploaded at a time",
                    )));
                }

                let original_name = content_disposition
                    .and_then(|cd| cd.get_filename())
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                let extension = Path::new(&original_name)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| format!(".{}", ext.to_lowercase()))
                    .unwrap_or_default();

                if !allowed_extensions
                    .iter()
                    .any(|t| t.to_lowercase() == extension)
                {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::FileTypeNotAllowed,
                        format!("File type not allowed, expected one of: {}", allowed_extensions.join(", ")),
                    )));
                }

                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    data.extend_from_slice(&chunk?);
                    if data.len() > MAX_UPLOAD_BYTES {
                        return Ok(code_error(format!(
                            "File is too large (maximum {MAX_CODE_LENGTH} characters)"
                        )));
                    }
                }
                file_bytes = Some(data);
            }
            "assignment_id" => {
                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    data.extend_from_slice(&chunk?);
                }
                let value = String::from_utf8_lossy(&data);
                match value.trim().parse::<i64>() {
                    Ok(id) if id > 0 => assignment_id = Some(id),
                    _ => {
                        return Ok(HttpResponse::BadRequest().json(
                            ApiResponse::validation_failed(vec![FieldError::new(
                                "assignment_id",
                                "Must be a positive integer",
                            )]),
                        ));
                    }
                }
            }
            _ => {}
        }
    }

    let Some(assignment_id) = assignment_id else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::validation_failed(vec![
            FieldError::new("assignment_id", "This field is required"),
        ])));
    };

    let Some(file_bytes) = file_bytes else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        )));
    };

    let code = match String::from_utf8(file_bytes) {
        Ok(code) => code,
        Err(_) => return Ok(code_error("File must be UTF-8 encoded text".to_string())),
    };

    submit_code(service, request, assignment_id, code).await
}

fn code_error(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::validation_failed(vec![FieldError::new(
        "code", message,
    )]))
}
