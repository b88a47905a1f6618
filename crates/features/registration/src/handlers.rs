use crate::error::{RegistrationError, RejectionReason};
use crate::gate::AdmissionGate;
use axum::Json;
use axum::extract::{FromRef, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use roster_derive::{api_handler, api_model};
use roster_domain::Registrant;
use roster_domain::constants::REGISTRATION_TAG;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

const REGISTERED_MESSAGE: &str = "User registered successfully";
const CAPACITY_MESSAGE: &str = "Registration limit reached. No more registrations allowed.";
const DUPLICATE_MESSAGE: &str = "Email already registered.";
const STORE_FAILURE_MESSAGE: &str = "Registration is temporarily unavailable. Please try again.";

#[api_model]
/// Registration form submission
pub struct RegisterRequest {
    /// Contact e-mail, unique per registrant (case-insensitive)
    pub email: String,
    pub full_name: String,
    pub phone_number: String,
    pub year_of_study: String,
    pub department: String,
    pub previous_experience: Option<String>,
    pub writing_samples: Option<String>,
    /// Why the applicant wants the role
    #[serde(alias = "motivation")]
    pub why_content_lead: String,
    #[serde(alias = "ideas")]
    pub new_ideas: String,
}

impl From<RegisterRequest> for Registrant {
    fn from(request: RegisterRequest) -> Self {
        Self {
            identifier: request.email,
            full_name: request.full_name,
            phone_number: request.phone_number,
            year_of_study: request.year_of_study,
            department: request.department,
            previous_experience: request.previous_experience,
            writing_samples: request.writing_samples,
            motivation: request.why_content_lead,
            ideas: request.new_ideas,
        }
    }
}

#[api_model]
/// Successful admission
pub struct RegisterResponse {
    pub message: String,
    /// Registrants admitted so far, including this one
    pub admitted: u64,
    /// Spots left after this admission
    pub remaining: u64,
}

#[api_model]
/// Rejected registration
pub struct RegisterRejection {
    /// `capacity_reached`, `duplicate_identifier` or `store_failure`
    pub error: String,
    pub message: String,
}

#[api_model]
/// Advisory registration counter
pub struct CountResponse {
    pub count: u64,
    pub capacity: u32,
    pub remaining: u64,
}

impl IntoResponse for RegistrationError {
    fn into_response(self) -> Response {
        let reason = self.reason();
        let (status, message) = match reason {
            RejectionReason::CapacityReached => (StatusCode::FORBIDDEN, CAPACITY_MESSAGE),
            RejectionReason::DuplicateIdentifier => (StatusCode::CONFLICT, DUPLICATE_MESSAGE),
            RejectionReason::StoreFailure => {
                (StatusCode::SERVICE_UNAVAILABLE, STORE_FAILURE_MESSAGE)
            }
        };

        let body =
            RegisterRejection { error: reason.code().to_owned(), message: message.to_owned() };
        let mut response = (status, Json(body)).into_response();
        if self.is_retryable() {
            response.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}

#[api_handler(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = CREATED, description = "Registrant admitted", body = RegisterResponse),
        (status = FORBIDDEN, description = "Capacity reached", body = RegisterRejection),
        (status = CONFLICT, description = "E-mail already registered", body = RegisterRejection),
        (status = UNPROCESSABLE_ENTITY, description = "Malformed submission"),
        (status = SERVICE_UNAVAILABLE, description = "Store failure, retry later", body = RegisterRejection),
    ),
    tag = REGISTRATION_TAG,
)]
pub async fn register_handler(
    State(gate): State<AdmissionGate>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, RegistrationError> {
    let admitted = gate.try_register(request.into()).await?;

    let body = RegisterResponse {
        message: REGISTERED_MESSAGE.to_owned(),
        admitted: admitted.admitted,
        remaining: admitted.remaining(),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

#[api_handler(
    get,
    path = "/api/registration-count",
    responses(
        (status = OK, description = "Advisory registration count", body = CountResponse),
        (status = SERVICE_UNAVAILABLE, description = "Store failure", body = RegisterRejection),
    ),
    tag = REGISTRATION_TAG,
)]
pub async fn count_handler(
    State(gate): State<AdmissionGate>,
) -> Result<impl IntoResponse, RegistrationError> {
    let count = gate.current_count().await?;
    let capacity = gate.capacity();

    let body =
        CountResponse { count, capacity, remaining: u64::from(capacity).saturating_sub(count) };
    Ok(([(header::CACHE_CONTROL, "no-store")], Json(body)))
}

/// Registration routes for any state that can hand out an [`AdmissionGate`].
pub fn registration_router<S>() -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
    AdmissionGate: FromRef<S>,
{
    OpenApiRouter::<S>::new()
        .routes(routes!(register_handler))
        .routes(routes!(count_handler))
}
