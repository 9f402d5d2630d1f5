//! HTTP adapter exposing loan plan creation as a JSON API.
//!
//! Decimal fields travel as strings in both directions so no precision is
//! lost to JSON numbers.

mod error;

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::payments::create_plan;
use crate::types::Payment;

pub use error::{ApiError, ErrorBody, ErrorResponse};

pub const CREATE_LOAN_PLAN_PATH: &str = "/loan-plan";
pub const HEALTH_PATH: &str = "/healthz";

/// Function creating a loan plan from already parsed request fields.
///
/// Injected into the router so handlers can be exercised with fakes.
pub type LoanPlanCreator =
    Arc<dyn Fn(Money, Rate, i32, DateTime<FixedOffset>) -> Result<Vec<Payment>> + Send + Sync>;

/// state shared by the handlers
#[derive(Clone)]
pub struct AppState {
    pub create_plan: LoanPlanCreator,
}

/// Request body of `POST /loan-plan`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateLoanPlanRequest {
    pub loan_amount: String,
    /// nominal annual rate as a percentage, e.g. `"5.0"`
    pub nominal_rate: String,
    pub duration: i32,
    /// RFC 3339 date-time; only its calendar date is used
    pub start_date: String,
}

/// One entry of the returned plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerPayment {
    pub date: String,
    pub borrower_payment_amount: String,
    pub interest: String,
    pub principal: String,
    pub initial_outstanding_principal: String,
    pub remaining_outstanding_principal: String,
}

/// Response body of `POST /loan-plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanPlanResponse {
    pub borrower_payments: Vec<BorrowerPayment>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

impl From<&Payment> for BorrowerPayment {
    fn from(p: &Payment) -> Self {
        Self {
            date: p.date.to_rfc3339_opts(SecondsFormat::Secs, true),
            borrower_payment_amount: money_to_string(p.payment_amount),
            interest: money_to_string(p.interest),
            principal: money_to_string(p.principal),
            initial_outstanding_principal: money_to_string(p.initial_outstanding_principal),
            remaining_outstanding_principal: money_to_string(p.remaining_outstanding_principal),
        }
    }
}

fn money_to_string(amount: Money) -> String {
    amount.normalize().to_string()
}

/// Creates the router with the given plan creator.
pub fn router<F>(create_plan: F) -> Router
where
    F: Fn(Money, Rate, i32, DateTime<FixedOffset>) -> Result<Vec<Payment>> + Send + Sync + 'static,
{
    let state = AppState {
        create_plan: Arc::new(create_plan),
    };

    Router::new()
        .route(
            CREATE_LOAN_PLAN_PATH,
            post(create_loan_plan).fallback(method_not_allowed),
        )
        .route(HEALTH_PATH, get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Creates the router backed by [`create_plan`].
pub fn default_router() -> Router {
    router(|amount, rate, months, start| create_plan(amount, rate, months, &start))
}

async fn create_loan_plan(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Json<CreateLoanPlanResponse>, ApiError> {
    let request: CreateLoanPlanRequest =
        serde_json::from_slice(&body).map_err(ApiError::InvalidBody)?;

    let loan_amount = Money::from_str_exact(&request.loan_amount)
        .map_err(|e| ApiError::invalid_field("loanAmount", e))?;
    let nominal_rate = Rate::from_percentage_str(&request.nominal_rate)
        .map_err(|e| ApiError::invalid_field("nominalRate", e))?;
    let start_date = DateTime::parse_from_rfc3339(&request.start_date)
        .map_err(|e| ApiError::invalid_field("startDate", e))?;

    debug!(
        loan_amount = %loan_amount,
        nominal_rate = %nominal_rate,
        duration = request.duration,
        start_date = %start_date,
        "creating loan plan"
    );

    let payments = (state.create_plan)(loan_amount, nominal_rate, request.duration, start_date)?;

    Ok(Json(CreateLoanPlanResponse {
        borrower_payments: payments.iter().map(BorrowerPayment::from).collect(),
    }))
}

async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method)
}

async fn health_check() -> Response {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    use crate::errors::LoanError;

    fn valid_request() -> CreateLoanPlanRequest {
        CreateLoanPlanRequest {
            loan_amount: "2000.0".to_string(),
            nominal_rate: "1.0".to_string(),
            duration: 2,
            start_date: "2018-01-01T00:00:00Z".to_string(),
        }
    }

    fn request(method: Method, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(CREATE_LOAN_PLAN_PATH)
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }

    fn json_request(body: &CreateLoanPlanRequest) -> Request<Body> {
        request(Method::POST, serde_json::to_vec(body).unwrap())
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Bytes) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body)
    }

    fn error_message(body: &[u8]) -> String {
        let parsed: ErrorResponse = serde_json::from_slice(body).unwrap();
        parsed.error.message
    }

    fn failing_router(err: LoanError) -> Router {
        router(move |_, _, _, _| Err(err.clone()))
    }

    #[tokio::test]
    async fn test_method_not_allowed_for_get() {
        let app = router(|_, _, _, _| Ok(Vec::new()));
        let (status, body) = send(app, request(Method::GET, Body::empty())).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert!(!error_message(&body).is_empty());
    }

    #[tokio::test]
    async fn test_bad_request_on_invalid_json() {
        let app = router(|_, _, _, _| Ok(Vec::new()));
        let (status, body) = send(app, request(Method::POST, "{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!error_message(&body).is_empty());
    }

    #[tokio::test]
    async fn test_bad_request_on_unparsable_fields() {
        let cases = [
            ("loanAmount", CreateLoanPlanRequest { loan_amount: "lots".into(), ..valid_request() }),
            ("nominalRate", CreateLoanPlanRequest { nominal_rate: "".into(), ..valid_request() }),
            ("startDate", CreateLoanPlanRequest { start_date: "2018-01-01".into(), ..valid_request() }),
        ];

        for (field, body) in cases {
            let app = router(|_, _, _, _| panic!("creator must not be called"));
            let (status, body) = send(app, json_request(&body)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "field {field}");
            assert!(error_message(&body).contains(field));
        }
    }

    #[tokio::test]
    async fn test_bad_request_if_parameters_are_invalid() {
        let err = LoanError::InvalidParameter {
            parameter: "durationInMonths",
            value: "0".to_string(),
            reason: "must be greater than zero",
        };
        let app = failing_router(err.clone());
        let (status, body) = send(app, json_request(&valid_request())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_message(&body), err.to_string());
    }

    #[tokio::test]
    async fn test_internal_server_error_on_calculation_error() {
        let app = failing_router(LoanError::Calculation {
            message: "injected failure".to_string(),
        });
        let (status, body) = send(app, json_request(&valid_request())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = error_message(&body);
        assert!(!message.is_empty());
        assert!(!message.contains("injected"));
    }

    #[tokio::test]
    async fn test_parsed_fields_reach_creator() {
        let app = router(|amount, rate, months, start| {
            assert_eq!(amount, Money::from(dec!(2000.0)));
            assert_eq!(rate, Rate::from_percentage(dec!(1.0)));
            assert_eq!(months, 2);
            assert_eq!(start.to_rfc3339(), "2018-01-01T00:00:00+00:00");
            Ok(Vec::new())
        });
        let (status, body) = send(app, json_request(&valid_request())).await;

        assert_eq!(status, StatusCode::OK);
        let parsed: CreateLoanPlanResponse = serde_json::from_slice(&body).unwrap();
        assert!(parsed.borrower_payments.is_empty());
    }

    #[tokio::test]
    async fn test_loan_plan_creation() {
        let (status, body) = send(default_router(), json_request(&valid_request())).await;
        assert_eq!(status, StatusCode::OK);

        let got: CreateLoanPlanResponse = serde_json::from_slice(&body).unwrap();
        let want = CreateLoanPlanResponse {
            borrower_payments: vec![
                BorrowerPayment {
                    date: "2018-01-01T00:00:00Z".to_string(),
                    borrower_payment_amount: "1001.25".to_string(),
                    interest: "1.67".to_string(),
                    principal: "999.58".to_string(),
                    initial_outstanding_principal: "2000".to_string(),
                    remaining_outstanding_principal: "1000.42".to_string(),
                },
                BorrowerPayment {
                    date: "2018-02-01T00:00:00Z".to_string(),
                    borrower_payment_amount: "1001.25".to_string(),
                    interest: "0.83".to_string(),
                    principal: "1000.42".to_string(),
                    initial_outstanding_principal: "1000.42".to_string(),
                    remaining_outstanding_principal: "0".to_string(),
                },
            ],
        };
        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn test_invalid_start_day_is_bad_request() {
        let body = CreateLoanPlanRequest {
            start_date: "2020-12-30T00:00:00Z".to_string(),
            ..valid_request()
        };
        let (status, body) = send(default_router(), json_request(&body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error_message(&body).contains("startDate"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let req = Request::builder()
            .uri(HEALTH_PATH)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(default_router(), req).await;

        assert_eq!(status, StatusCode::OK);
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["status"], "healthy");
        assert_eq!(parsed["version"], env!("CARGO_PKG_VERSION"));
    }
}
