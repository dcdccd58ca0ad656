use super::{cache_control, invalid, CreatedResponse, RoastResponse};
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pasquda_app::application::db_err;
use pasquda_app::domain::RoastInput;
use pasquda_app::infrastructure::db::entities::RoastType;
use pasquda_app::infrastructure::db::NewRoast;
use pasquda_app::infrastructure::security::{
    client_key, InputValidator, RateLimiter, MAX_IMAGE_BASE64_LEN, MAX_PDF_BYTES,
    MAX_RESUME_TEXT_LEN, MIN_LINKEDIN_TEXT_LEN, MIN_RESUME_TEXT_LEN,
};
use pasquda_app::infrastructure::storage::UPLOADS_BUCKET;
use pasquda_app::AppContext;
use pasquda_errors::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const RECENT_LIMIT: u64 = 10;

#[derive(Deserialize)]
pub(crate) struct CreateRoastRequest {
    url: String,
    #[serde(default)]
    challenge_from: Option<Uuid>,
}

pub(crate) async fn create(
    State(context): State<AppContext>,
    headers: HeaderMap,
    Json(body): Json<CreateRoastRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    check_rate_limit(&context.rate_limiter, &headers)?;

    let url = InputValidator::validate_url(&body.url)?;
    let domain = InputValidator::extract_domain(&url);

    let id = context
        .roasts
        .create_pending(NewRoast {
            url: url.clone(),
            domain: domain.clone(),
            roast_type: RoastType::Website,
            challenge_from: body.challenge_from,
            content_text: None,
            content_file_url: None,
        })
        .await
        .map_err(db_err)?;

    spawn_roast(&context, id, RoastInput::Website { url, domain });
    Ok(Json(CreatedResponse { id }))
}

pub(crate) async fn get_by_id(
    State(context): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let roast = context
        .roasts
        .find_by_id(id)
        .await
        .map_err(db_err)?
        .ok_or(AppError::NotFound)?;

    let cache = cache_control(&roast.status);
    Ok((
        [(header::CACHE_CONTROL, cache)],
        Json(RoastResponse::from(roast)),
    )
        .into_response())
}

#[derive(Deserialize)]
pub(crate) struct LinkedInRequest {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    image_base64: Option<String>,
}

pub(crate) async fn create_linkedin(
    State(context): State<AppContext>,
    Json(body): Json<LinkedInRequest>,
) -> Result<Json<CreatedResponse>, AppError> {
    let text = body
        .text
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let image = body.image_base64.filter(|i| !i.is_empty());

    if text.is_none() && image.is_none() {
        return Err(invalid(
            "Paste your LinkedIn profile text or upload a screenshot.",
        ));
    }
    if let Some(t) = &text {
        if t.len() < MIN_LINKEDIN_TEXT_LEN {
            return Err(invalid(
                "That's not enough LinkedIn to roast. Paste the full profile, thought leader.",
            ));
        }
    }
    if let Some(img) = &image {
        if img.len() > MAX_IMAGE_BASE64_LEN {
            return Err(invalid(
                "That screenshot is too large. Your profile can't be THAT long.",
            ));
        }
    }

    let mut file_url = None;
    if let Some(img) = &image {
        let bytes = STANDARD
            .decode(img.as_bytes())
            .map_err(|_| invalid("That image doesn't decode. Upload a real screenshot."))?;
        // JPEG base64 payloads start with the SOI marker; everything else is
        // treated as PNG, matching the model request encoding.
        let (ext, content_type) = if img.starts_with("/9j/") {
            ("jpg", "image/jpeg")
        } else {
            ("png", "image/png")
        };
        let filename = format!("linkedin-{}.{ext}", chrono::Utc::now().timestamp_millis());
        file_url = Some(
            context
                .storage
                .upload(UPLOADS_BUCKET, &filename, bytes, content_type)
                .await?,
        );
    }

    let id = context
        .roasts
        .create_pending(NewRoast {
            url: "linkedin-profile".to_string(),
            domain: "LinkedIn Profile".to_string(),
            roast_type: RoastType::LinkedIn,
            challenge_from: None,
            content_text: text.clone(),
            content_file_url: file_url.clone(),
        })
        .await
        .map_err(db_err)?;

    spawn_roast(
        &context,
        id,
        RoastInput::LinkedIn {
            text,
            image_base64: image,
            file_url,
        },
    );
    Ok(Json(CreatedResponse { id }))
}

pub(crate) async fn create_resume(
    State(context): State<AppContext>,
    mut multipart: Multipart,
) -> Result<Json<CreatedResponse>, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| invalid("Please upload a PDF file."))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if field.content_type() != Some("application/pdf") {
            return Err(invalid(
                "Only PDFs are accepted. Nice try with whatever that was.",
            ));
        }
        let name = field.file_name().unwrap_or("resume.pdf").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| invalid("Could not read the uploaded file."))?;
        upload = Some((name, bytes.to_vec()));
    }

    let (file_name, bytes) = upload.ok_or_else(|| invalid("Please upload a PDF file."))?;
    if bytes.len() > MAX_PDF_BYTES {
        return Err(invalid(
            "That PDF is too large. Max 5MB. No resume needs to be that long.",
        ));
    }

    let pdf = bytes.clone();
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|_| invalid("Could not read that PDF. Is it actually a resume?"))?;

    let mut text = extracted.trim().to_string();
    if text.len() < MIN_RESUME_TEXT_LEN {
        return Err(invalid(
            "Could not find enough text in that PDF. Is it actually a resume?",
        ));
    }
    if text.len() > MAX_RESUME_TEXT_LEN {
        let mut cut = MAX_RESUME_TEXT_LEN;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }

    let filename = format!("resume-{}.pdf", chrono::Utc::now().timestamp_millis());
    let file_url = context
        .storage
        .upload(UPLOADS_BUCKET, &filename, bytes, "application/pdf")
        .await?;

    let id = context
        .roasts
        .create_pending(NewRoast {
            url: "resume-upload".to_string(),
            domain: display_name(&file_name),
            roast_type: RoastType::Resume,
            challenge_from: None,
            content_text: Some(text.clone()),
            content_file_url: Some(file_url.clone()),
        })
        .await
        .map_err(db_err)?;

    spawn_roast(&context, id, RoastInput::Resume { text, file_url });
    Ok(Json(CreatedResponse { id }))
}

#[derive(Serialize)]
pub(crate) struct ShareResponse {
    share_count: i32,
}

pub(crate) async fn share(
    State(context): State<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShareResponse>, AppError> {
    let share_count = context
        .roasts
        .increment_share_count(id)
        .await
        .map_err(db_err)?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ShareResponse { share_count }))
}

#[derive(Serialize)]
pub(crate) struct RecentEntry {
    domain: String,
    score: i32,
    grade: String,
}

#[derive(Serialize)]
pub(crate) struct RecentResponse {
    roasts: Vec<RecentEntry>,
    total: i64,
}

pub(crate) async fn recent(
    State(context): State<AppContext>,
) -> Result<Json<RecentResponse>, AppError> {
    let roasts = context
        .roasts
        .recent_completed(RECENT_LIMIT)
        .await
        .map_err(db_err)?;
    let total = context.roasts.total_roasts().await.map_err(db_err)?;

    Ok(Json(RecentResponse {
        roasts: roasts
            .into_iter()
            .map(|r| RecentEntry {
                domain: r.domain,
                score: r.score,
                grade: r.grade,
            })
            .collect(),
        total,
    }))
}

/// Only website roast submissions count against the per-IP budget; the
/// other submission routes and all reads are unlimited.
fn check_rate_limit(limiter: &RateLimiter, headers: &HeaderMap) -> Result<(), AppError> {
    let key = client_key(
        header_str(headers, "x-forwarded-for"),
        header_str(headers, "x-real-ip"),
    );
    if limiter.check(&key) {
        Ok(())
    } else {
        Err(AppError::RateLimited)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn spawn_roast(context: &AppContext, id: Uuid, input: RoastInput) {
    let pipeline = context.roast_pipeline.clone();
    tokio::spawn(async move { pipeline.run(id, input).await });
}

/// Display name shown on the roast record: the file name without its
/// extension, capped at 50 characters.
fn display_name(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(".pdf")
        .or_else(|| file_name.strip_suffix(".PDF"))
        .unwrap_or(file_name)
        .trim();
    if stem.is_empty() {
        return "Resume".to_string();
    }
    stem.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_keys_on_forwarded_ip() {
        let limiter = RateLimiter::new();
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.9".parse().unwrap());

        for _ in 0..5 {
            assert!(check_rate_limit(&limiter, &headers).is_ok());
        }
        assert!(matches!(
            check_rate_limit(&limiter, &headers),
            Err(AppError::RateLimited)
        ));

        let mut other = HeaderMap::new();
        other.insert("x-forwarded-for", "198.51.100.7".parse().unwrap());
        assert!(check_rate_limit(&limiter, &other).is_ok());
    }

    #[test]
    fn display_name_strips_extension_and_caps_length() {
        assert_eq!(display_name("jane-doe-resume.pdf"), "jane-doe-resume");
        assert_eq!(display_name("RESUME.PDF"), "RESUME");
        assert_eq!(display_name(".pdf"), "Resume");

        let long = format!("{}.pdf", "x".repeat(80));
        assert_eq!(display_name(&long).chars().count(), 50);
    }
}
