use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

pub type ServiceResult<T> = Result<T, AppError>;
pub type ServiceResponse<T> = ServiceResult<Json<T>>;

#[track_caller]
pub fn unexpected<T, E: Into<anyhow::Error>>(e: E) -> ServiceResult<T> {
    let caller = std::panic::Location::caller();
    error!("An unexpected error has occurred at {caller}: {}", e.into());
    Err(AppError::Unexpected)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    Unexpected,

    /// No original beatmap could be identified for a modified file.
    BeatmapsUnresolved,
    /// The catalog has no beatmap for the recovered id or hash.
    BeatmapsCatalogMiss,
    BeatmapsIneligibleStatus,
    BeatmapsDuplicateKey,
    BeatmapsFileUnavailable,

    PerformanceScoringFailed,

    ProfilesNotFound,
    ProfilesMissingName,
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    #[track_caller]
    fn from(e: E) -> Self {
        unexpected::<(), E>(e).unwrap_err()
    }
}

impl AppError {
    pub const fn code(&self) -> &'static str {
        match self {
            AppError::Unexpected => "unexpected",

            AppError::BeatmapsUnresolved => "beatmaps.unresolved",
            AppError::BeatmapsCatalogMiss => "beatmaps.catalog_miss",
            AppError::BeatmapsIneligibleStatus => "beatmaps.ineligible_status",
            AppError::BeatmapsDuplicateKey => "beatmaps.duplicate_key",
            AppError::BeatmapsFileUnavailable => "beatmaps.file_unavailable",

            AppError::PerformanceScoringFailed => "performance.scoring_failed",

            AppError::ProfilesNotFound => "profiles.not_found",
            AppError::ProfilesMissingName => "profiles.missing_name",
        }
    }

    pub const fn message(&self) -> &'static str {
        match self {
            AppError::Unexpected => "An unexpected error has occurred.",

            AppError::BeatmapsUnresolved => "The original beatmap could not be identified.",
            AppError::BeatmapsCatalogMiss => "Beatmap could not be found.",
            AppError::BeatmapsIneligibleStatus => "This beatmap has no leaderboard.",
            AppError::BeatmapsDuplicateKey => "This beatmap is already registered.",
            AppError::BeatmapsFileUnavailable => "The beatmap file could not be read.",

            AppError::PerformanceScoringFailed => "Failed calculating performance.",

            AppError::ProfilesNotFound => "profile can't be found!",
            AppError::ProfilesMissingName => {
                "please provide a profile name in parameters, e.g. ?u=profile name"
            }
        }
    }

    pub const fn http_status_code(&self) -> StatusCode {
        match self {
            AppError::ProfilesMissingName => StatusCode::BAD_REQUEST,

            AppError::BeatmapsUnresolved
            | AppError::BeatmapsCatalogMiss
            | AppError::BeatmapsFileUnavailable
            | AppError::ProfilesNotFound => StatusCode::NOT_FOUND,

            AppError::BeatmapsIneligibleStatus | AppError::BeatmapsDuplicateKey => {
                StatusCode::CONFLICT
            }

            AppError::Unexpected | AppError::PerformanceScoringFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub const fn response_parts(&self) -> (StatusCode, Json<ErrorResponse>) {
        let status = self.http_status_code();
        let response = ErrorResponse {
            status: "failed",
            code: self.code(),
            message: self.message(),
        };
        (status, Json(response))
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub code: &'static str,
    pub message: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.response_parts().into_response()
    }
}
