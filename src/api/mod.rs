mod cli;
mod payload;

use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub use cli::{Cli, Command, ServeArgs, run_cli};
pub use payload::{
    AllocationPayload, ElssPayload, EmiPayload, GoalSavingsPayload, LumpSumPayload,
    RentVsBuyPayload, RetirementPayload, SipPayload, TaxBenefitPayload, calculate_allocation,
    calculate_elss, calculate_emi, calculate_goal_savings, calculate_lump_sum,
    calculate_rent_vs_buy, calculate_retirement, calculate_sip, calculate_tax_benefit,
    round_currency, round_percent, tax_sections,
};

#[derive(Debug, Serialize)]
struct Envelope<T> {
    message: &'static str,
    data: T,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct TaxSectionsQuery {
    age: Option<u32>,
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/calculators/emi", post(emi_handler))
        .route("/api/calculators/sip", post(sip_handler))
        .route("/api/calculators/goal-savings", post(goal_savings_handler))
        .route("/api/calculators/rent-vs-buy", post(rent_vs_buy_handler))
        .route(
            "/api/calculators/retirement-planning",
            post(retirement_handler),
        )
        .route("/api/calculators/tax-benefit", post(tax_benefit_handler))
        .route("/api/calculators/tax-sections", get(tax_sections_handler))
        .route("/api/calculators/elss-tax-savings", post(elss_handler))
        .route("/api/calculators/lump-sum", post(lump_sum_handler))
        .route("/api/calculators/allocation", post(allocation_handler))
        .fallback(not_found_handler)
}

pub async fn run_http_server(addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("TaxBae calculator API listening on http://{addr}");
    tracing::info!("Local access: http://127.0.0.1:{}/health", addr.port());

    axum::serve(listener, router()).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn emi_handler(Json(payload): Json<EmiPayload>) -> Response {
    tracing::debug!(?payload, "emi request");
    calculator_response("emi", "EMI calculated successfully", calculate_emi(&payload))
}

async fn sip_handler(Json(payload): Json<SipPayload>) -> Response {
    tracing::debug!(?payload, "sip request");
    calculator_response("sip", "SIP calculated successfully", calculate_sip(&payload))
}

async fn goal_savings_handler(Json(payload): Json<GoalSavingsPayload>) -> Response {
    tracing::debug!(?payload, "goal savings request");
    calculator_response(
        "goal-savings",
        "Goal-based savings calculated successfully",
        calculate_goal_savings(&payload),
    )
}

async fn rent_vs_buy_handler(Json(payload): Json<RentVsBuyPayload>) -> Response {
    tracing::debug!(?payload, "rent vs buy request");
    calculator_response(
        "rent-vs-buy",
        "Rent vs Buy analysis completed successfully",
        calculate_rent_vs_buy(&payload),
    )
}

async fn retirement_handler(Json(payload): Json<RetirementPayload>) -> Response {
    tracing::debug!(?payload, "retirement planning request");
    calculator_response(
        "retirement-planning",
        "Retirement planning calculated successfully",
        calculate_retirement(&payload),
    )
}

async fn tax_benefit_handler(Json(payload): Json<TaxBenefitPayload>) -> Response {
    tracing::debug!(?payload, "tax benefit request");
    calculator_response(
        "tax-benefit",
        "Tax benefit calculated successfully",
        calculate_tax_benefit(&payload),
    )
}

async fn tax_sections_handler(Query(query): Query<TaxSectionsQuery>) -> Response {
    calculator_response(
        "tax-sections",
        "Deduction sections retrieved successfully",
        tax_sections(query.age),
    )
}

async fn elss_handler(Json(payload): Json<ElssPayload>) -> Response {
    tracing::debug!(?payload, "elss request");
    calculator_response(
        "elss-tax-savings",
        "ELSS tax savings calculated successfully",
        calculate_elss(&payload),
    )
}

async fn lump_sum_handler(Json(payload): Json<LumpSumPayload>) -> Response {
    tracing::debug!(?payload, "lump sum request");
    calculator_response(
        "lump-sum",
        "Lump sum returns calculated successfully",
        calculate_lump_sum(&payload),
    )
}

async fn allocation_handler(Json(payload): Json<AllocationPayload>) -> Response {
    tracing::debug!(?payload, "allocation request");
    calculator_response(
        "allocation",
        "Portfolio allocation calculated successfully",
        calculate_allocation(&payload),
    )
}

fn calculator_response<T: Serialize>(
    calculator: &str,
    message: &'static str,
    result: Result<T, String>,
) -> Response {
    match result {
        Ok(data) => json_response(StatusCode::OK, Envelope { message, data }),
        Err(msg) => {
            tracing::warn!(calculator, error = %msg, "rejected calculator request");
            error_response(StatusCode::BAD_REQUEST, &msg)
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}
