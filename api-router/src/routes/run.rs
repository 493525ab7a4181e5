use std::io::Write;

use axum::{
    extract::{Multipart, Request, State},
    http::header::CONTENT_TYPE,
    response::IntoResponse,
    Json, RequestExt,
};
use ingestion_pipeline::{load_document, DocumentSource};
use retrieval_pipeline::answer_retrieval::render_sources_block;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{error, info};

use crate::{api_state::ApiState, error::ApiError};

/// JSON request shape. `documents` carries the document URL; the original
/// service also accepted `document_url`, kept as an alias.
#[derive(Debug, Deserialize)]
struct JsonRunRequest {
    #[serde(default, alias = "document_url")]
    documents: Option<String>,
    #[serde(default)]
    questions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RunResponse {
    answers: Vec<String>,
}

/// Canonical parsed request, independent of the wire shape it arrived in.
struct RunRequest {
    source: DocumentSource,
    questions: Vec<String>,
}

/// Main document question-answering endpoint. Loads the referenced document,
/// builds a request-scoped index, and answers each question in input order.
/// A failing question degrades to an error string in its own answer slot;
/// the batch itself never fails because of one bad question.
pub async fn run_submission(
    State(state): State<ApiState>,
    request: Request,
) -> Result<impl IntoResponse, ApiError> {
    let parsed = parse_run_request(&state, request).await?;
    let question_count = parsed.questions.len();
    info!(
        document = %parsed.source.label(),
        question_count,
        "Received run request"
    );

    let passages = load_document(parsed.source, &state.http_client)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load document");
            ApiError::from(e)
        })?;
    info!(passage_count = passages.len(), "Document loaded");

    let index = state.query.build_index(passages).await.map_err(|e| {
        error!(error = %e, "Failed to create document index");
        ApiError::from(e)
    })?;

    let mut answers = Vec::with_capacity(question_count);
    for (i, question) in parsed.questions.iter().enumerate() {
        info!(
            question_index = i + 1,
            question_count, "Processing question"
        );
        match state.query.query(&index, question).await {
            Ok(outcome) => {
                let mut answer = outcome.answer;
                if state.config.include_source_excerpts {
                    answer.push_str(&render_sources_block(&outcome.sources));
                }
                answers.push(answer);
            }
            Err(e) => {
                error!(question_index = i + 1, error = %e, "Failed to process question");
                answers.push(format!("Error processing question: {e}"));
            }
        }
    }

    info!(question_count, "Completed run request");
    Ok(Json(RunResponse { answers }))
}

/// Single explicit parsing step: dispatches on content type and produces the
/// canonical request structure, before any network or filesystem work.
async fn parse_run_request(state: &ApiState, request: Request) -> Result<RunRequest, ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let (questions, document_url, upload) = if content_type.starts_with("application/json") {
        let body = axum::body::to_bytes(request.into_body(), state.config.max_body_bytes)
            .await
            .map_err(|e| ApiError::ValidationError(format!("Failed to read request body: {e}")))?;
        let json_request: JsonRunRequest = serde_json::from_slice(&body)
            .map_err(|e| ApiError::ValidationError(format!("Invalid JSON body: {e}")))?;
        (json_request.questions, json_request.documents, None)
    } else if content_type.starts_with("multipart/form-data") {
        let multipart = request
            .extract::<Multipart, _>()
            .await
            .map_err(|e| ApiError::ValidationError(format!("Invalid multipart body: {e}")))?;
        parse_multipart(multipart).await?
    } else {
        return Err(ApiError::ValidationError(
            "Content-Type must be application/json or multipart/form-data".to_string(),
        ));
    };

    canonicalize(questions, document_url, upload)
}

type MultipartParts = (Vec<String>, Option<String>, Option<(NamedTempFile, String)>);

/// Walks the multipart form. `questions` fields may repeat or carry one
/// JSON-encoded list; fields named with a `question` prefix are the legacy
/// one-question-per-field shape. An uploaded `file` is spooled to a scoped
/// temp file.
async fn parse_multipart(mut multipart: Multipart) -> Result<MultipartParts, ApiError> {
    let mut question_fields: Vec<String> = Vec::new();
    let mut prefixed_questions: Vec<String> = Vec::new();
    let mut document_url: Option<String> = None;
    let mut upload: Option<(NamedTempFile, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::ValidationError(format!("Invalid multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            "questions" => {
                let value = field.text().await.map_err(|e| {
                    ApiError::ValidationError(format!("Unreadable questions field: {e}"))
                })?;
                question_fields.push(value);
            }
            "document_url" => {
                let value = field.text().await.map_err(|e| {
                    ApiError::ValidationError(format!("Unreadable document_url field: {e}"))
                })?;
                document_url = Some(value);
            }
            "file" => {
                let file_name = field
                    .file_name()
                    .map_or_else(|| "upload.pdf".to_string(), str::to_owned);
                let data = field.bytes().await.map_err(|e| {
                    ApiError::ValidationError(format!("Failed to read uploaded file: {e}"))
                })?;

                let mut file = NamedTempFile::new().map_err(|e| {
                    error!(error = %e, "Failed to create temp file for upload");
                    ApiError::InternalError("Internal server error".to_string())
                })?;
                file.write_all(&data).map_err(|e| {
                    error!(error = %e, "Failed to spool upload to temp file");
                    ApiError::InternalError("Internal server error".to_string())
                })?;

                upload = Some((file, file_name));
            }
            other if other.starts_with("question") => {
                let value = field.text().await.map_err(|e| {
                    ApiError::ValidationError(format!("Unreadable question field: {e}"))
                })?;
                prefixed_questions.push(value);
            }
            _ => {}
        }
    }

    Ok((
        resolve_questions(question_fields, prefixed_questions),
        document_url,
        upload,
    ))
}

/// `questions` fields take precedence over `question`-prefixed ones; a single
/// `questions` field may carry a JSON-encoded list.
fn resolve_questions(mut question_fields: Vec<String>, prefixed: Vec<String>) -> Vec<String> {
    if question_fields.is_empty() {
        return prefixed;
    }

    if question_fields.len() == 1 {
        let raw = question_fields.remove(0);
        return match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(list) => list,
            Err(_) => vec![raw],
        };
    }

    question_fields
}

/// Validates the parsed parts into the canonical request. An upload wins over
/// a URL; a URL must use an http(s) scheme.
fn canonicalize(
    questions: Vec<String>,
    document_url: Option<String>,
    upload: Option<(NamedTempFile, String)>,
) -> Result<RunRequest, ApiError> {
    let questions: Vec<String> = questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if questions.is_empty() {
        return Err(ApiError::ValidationError(
            "Questions must be provided as a non-empty list".to_string(),
        ));
    }

    let source = if let Some((file, file_name)) = upload {
        DocumentSource::Upload { file, file_name }
    } else if let Some(url) = document_url
        .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
    {
        DocumentSource::Url(url)
    } else {
        return Err(ApiError::ValidationError(
            "No valid document provided. Provide either a file upload or a valid document URL."
                .to_string(),
        ));
    };

    Ok(RunRequest { source, questions })
}
