use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::core::{
    CSV_CONTENT_TYPE, CSV_FILE_NAME, ChartPoint, FieldValue, FormState, Headline, InputIssue,
    Projection, SimulationParameters, Summary, YearlyRow, dividend_yield_percent,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct SimulatePayload {
    stock_type: Option<String>,
    initial: Option<FieldValue>,
    monthly: Option<FieldValue>,
    years: Option<FieldValue>,
    rate: Option<FieldValue>,
    share_price: Option<FieldValue>,
    rate_growth: Option<FieldValue>,
    div_yield: Option<FieldValue>,
    reinvest: Option<bool>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct DividendYieldQuery {
    dividend_per_share: Option<FieldValue>,
    share_price: Option<FieldValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct YearlyRowResponse {
    #[serde(flatten)]
    row: YearlyRow,
    contributions_display: String,
    dividends_display: String,
    balance_display: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateResponse {
    parameters: SimulationParameters,
    currency: String,
    issues: Vec<InputIssue>,
    summary: Summary,
    headline: Headline,
    chart: Vec<ChartPoint>,
    yearly_rows: Vec<YearlyRowResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DividendYieldResponse {
    yield_percent: f64,
    display: String,
    field_value: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/simulate",
            get(simulate_get_handler).post(simulate_post_handler),
        )
        .route(
            "/api/export",
            get(export_get_handler).post(export_post_handler),
        )
        .route("/api/dividend-yield", get(dividend_yield_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "SmartInvest HTTP API listening");
    tracing::info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn simulate_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

async fn simulate_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    simulate_handler_impl(payload)
}

fn simulate_handler_impl(payload: SimulatePayload) -> Response {
    let projection = Projection::from_form(&form_from_payload(payload));
    if !projection.input.issues.is_empty() {
        tracing::debug!(issues = ?projection.input.issues, "coerced form input");
    }
    json_response(StatusCode::OK, build_simulate_response(projection))
}

async fn export_get_handler(Query(payload): Query<SimulatePayload>) -> Response {
    export_handler_impl(payload)
}

async fn export_post_handler(Json(payload): Json<SimulatePayload>) -> Response {
    export_handler_impl(payload)
}

fn export_handler_impl(payload: SimulatePayload) -> Response {
    let projection = Projection::from_form(&form_from_payload(payload));
    let body = projection.csv();
    tracing::info!(
        rows = projection.rows.len(),
        bytes = body.len(),
        "exported yearly summary"
    );
    csv_response(body)
}

async fn dividend_yield_handler(Query(query): Query<DividendYieldQuery>) -> Response {
    match dividend_yield_from_query(&query) {
        Ok(body) => json_response(StatusCode::OK, body),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn csv_response(body: String) -> Response {
    with_cache_control((
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        body,
    ))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn form_from_json(json: &str) -> Result<FormState, String> {
    let payload = serde_json::from_str::<SimulatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    Ok(form_from_payload(payload))
}

fn form_from_payload(payload: SimulatePayload) -> FormState {
    let mut form = FormState::default();

    if let Some(v) = payload.stock_type {
        form.stock_type = v;
    }
    if let Some(v) = payload.initial {
        form.initial = v.into_text();
    }
    if let Some(v) = payload.monthly {
        form.monthly = v.into_text();
    }
    if let Some(v) = payload.years {
        form.years = v.into_text();
    }
    if let Some(v) = payload.rate {
        form.rate = v.into_text();
    }
    if let Some(v) = payload.share_price {
        form.share_price = v.into_text();
    }
    if let Some(v) = payload.rate_growth {
        form.rate_growth = v.into_text();
    }
    if let Some(v) = payload.div_yield {
        form.div_yield = v.into_text();
    }
    if let Some(v) = payload.reinvest {
        form.reinvest = v;
    }
    if let Some(v) = payload.currency {
        form.currency = v;
    }

    form
}

fn dividend_yield_from_query(query: &DividendYieldQuery) -> Result<DividendYieldResponse, String> {
    let dividend = query
        .dividend_per_share
        .as_ref()
        .map(FieldValue::to_number)
        .unwrap_or(0.0);
    let price = query
        .share_price
        .as_ref()
        .map(FieldValue::to_number)
        .unwrap_or(0.0);

    let yield_percent = dividend_yield_percent(dividend, price)
        .ok_or_else(|| "Enter the share price first".to_string())?;
    Ok(DividendYieldResponse {
        yield_percent,
        display: format!("{yield_percent:.2}%"),
        field_value: format!("{yield_percent:.1}"),
    })
}

fn build_simulate_response(projection: Projection) -> SimulateResponse {
    let is_dividend = projection.input.params.model.is_dividend();
    let currency = &projection.currency;
    let yearly_rows = projection
        .rows
        .iter()
        .map(|row| YearlyRowResponse {
            row: *row,
            contributions_display: currency.format(row.cumulative_contributions),
            dividends_display: if is_dividend {
                currency.format(row.cumulative_dividends)
            } else {
                "-".to_string()
            },
            balance_display: currency.format(row.year_end_balance),
        })
        .collect();

    SimulateResponse {
        parameters: projection.input.params,
        currency: projection.input.currency,
        issues: projection.input.issues,
        summary: projection.summary,
        headline: projection.headline,
        chart: projection.chart,
        yearly_rows,
    }
}
