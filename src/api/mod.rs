use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::core::{
    CarCostProfile, CategoryShare, ComparisonRow, ExpenseBreakdown, FoodProfile, LifestyleProfile,
    LineItem, NO_GYM, Neighborhood, PersonScaling, ReferenceData, RequiredIncome,
    SavingsProjection, SavingsStatus, Selection, SessionState, SpendingStyle, TransportMode,
    UnitType, UtilityProfile, apply_map_click, compare_neighborhoods, compute_expenses,
    project_savings, required_gross_income,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const DEFAULT_NEIGHBORHOOD: &str = "Downtown / Capitol Square";
const DEFAULT_TRANSPORT: &str = "Metro Bus (monthly pass)";
const DEFAULT_STREAMING: [&str; 2] = ["Netflix", "Spotify"];

const MAX_DINING_OUT: u32 = 20;
const MAX_PARKING: f64 = 250.0;
const MAX_HEALTHCARE: f64 = 800.0;
const MAX_OTHER_ENTERTAINMENT: f64 = 500.0;
const MAX_TAX_RATE: f64 = 40.0;
const MAX_GROSS_MONTHLY_INCOME: f64 = 50_000.0;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliUnitType {
    Studio,
    #[value(name = "1br", alias = "1BR")]
    OneBedroom,
    #[value(name = "2br", alias = "2BR")]
    TwoBedroom,
}

impl From<CliUnitType> for UnitType {
    fn from(value: CliUnitType) -> Self {
        match value {
            CliUnitType::Studio => UnitType::Studio,
            CliUnitType::OneBedroom => UnitType::OneBedroom,
            CliUnitType::TwoBedroom => UnitType::TwoBedroom,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliSpendingStyle {
    Frugal,
    Moderate,
    Comfortable,
}

impl From<CliSpendingStyle> for SpendingStyle {
    fn from(value: CliSpendingStyle) -> Self {
        match value {
            CliSpendingStyle::Frugal => SpendingStyle::Frugal,
            CliSpendingStyle::Moderate => SpendingStyle::Moderate,
            CliSpendingStyle::Comfortable => SpendingStyle::Comfortable,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
enum ApiUnitType {
    #[serde(rename = "studio", alias = "Studio")]
    Studio,
    #[serde(rename = "1BR", alias = "1br", alias = "one-bedroom", alias = "oneBedroom")]
    OneBedroom,
    #[serde(rename = "2BR", alias = "2br", alias = "two-bedroom", alias = "twoBedroom")]
    TwoBedroom,
}

impl From<ApiUnitType> for CliUnitType {
    fn from(value: ApiUnitType) -> Self {
        match value {
            ApiUnitType::Studio => CliUnitType::Studio,
            ApiUnitType::OneBedroom => CliUnitType::OneBedroom,
            ApiUnitType::TwoBedroom => CliUnitType::TwoBedroom,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiSpendingStyle {
    #[serde(alias = "Frugal")]
    Frugal,
    #[serde(alias = "Moderate")]
    Moderate,
    #[serde(alias = "Comfortable")]
    Comfortable,
}

impl From<ApiSpendingStyle> for CliSpendingStyle {
    fn from(value: ApiSpendingStyle) -> Self {
        match value {
            ApiSpendingStyle::Frugal => CliSpendingStyle::Frugal,
            ApiSpendingStyle::Moderate => CliSpendingStyle::Moderate,
            ApiSpendingStyle::Comfortable => CliSpendingStyle::Comfortable,
        }
    }
}

/// Streaming choices arrive as a JSON list in request bodies and as a
/// comma-separated string in query strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum ApiStreaming {
    List(Vec<String>),
    Csv(String),
}

impl ApiStreaming {
    fn into_names(self) -> Vec<String> {
        match self {
            ApiStreaming::List(names) => names,
            ApiStreaming::Csv(csv) => csv
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EstimatePayload {
    neighborhood: Option<String>,
    unit_type: Option<ApiUnitType>,
    spending_style: Option<ApiSpendingStyle>,
    transport: Option<String>,
    dining_out: Option<u32>,
    gym: Option<String>,
    streaming: Option<ApiStreaming>,
    healthcare: Option<f64>,
    parking: Option<f64>,
    other_entertainment: Option<f64>,

    gross_monthly_income: Option<f64>,
    tax_rate: Option<f64>,
    annual_cash_savings: Option<f64>,
    annual_retirement_savings: Option<f64>,

    map_click: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "madcost",
    about = "Monthly living expense estimator for Madison, WI",
    version
)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the JSON API and the dashboard
    Serve(ServeArgs),
    /// Print a monthly breakdown for one set of choices
    Estimate(EstimateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, env = "MADCOST_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,
    #[arg(long, env = "MADCOST_PORT", default_value_t = 8080)]
    pub port: u16,
}

#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    #[arg(long, default_value = DEFAULT_NEIGHBORHOOD)]
    neighborhood: String,
    #[arg(long, value_enum, default_value_t = CliUnitType::OneBedroom)]
    unit_type: CliUnitType,
    #[arg(long, value_enum, default_value_t = CliSpendingStyle::Moderate)]
    spending_style: CliSpendingStyle,
    #[arg(long, default_value = DEFAULT_TRANSPORT)]
    transport: String,
    #[arg(long, default_value_t = 4, help = "Meals out per month, 0 to 20")]
    dining_out: u32,
    #[arg(long, default_value = NO_GYM)]
    gym: String,
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_STREAMING.map(String::from),
        help = "Comma-separated streaming services"
    )]
    streaming: Vec<String>,
    #[arg(long, help = "Ignore --streaming and select no services")]
    no_streaming: bool,
    #[arg(long, default_value_t = 150.0, help = "Monthly healthcare cost in dollars")]
    healthcare: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly parking cost in dollars")]
    parking: f64,
    #[arg(long, default_value_t = 0.0, help = "Other monthly entertainment in dollars")]
    other_entertainment: f64,
    #[arg(long, default_value_t = 5_000.0, help = "Monthly gross income in dollars")]
    gross_monthly_income: f64,
    #[arg(long, default_value_t = 22.0, help = "Effective tax rate in percent")]
    tax_rate: f64,
    #[arg(long, default_value_t = 0.0, help = "Annual cash savings target in dollars")]
    annual_cash_savings: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual pre-tax retirement savings target in dollars"
    )]
    annual_retirement_savings: f64,
    #[arg(long, help = "Print the full estimate as JSON")]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Finances {
    gross_monthly_income: f64,
    tax_rate_percent: f64,
    annual_cash_savings: f64,
    annual_retirement_savings: f64,
}

#[derive(Debug)]
struct EstimateRequest {
    state: SessionState,
    finances: Finances,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EstimateResponse {
    selection: Selection,
    neighborhood_description: &'static str,
    transport_notes: &'static str,
    line_items: ExpenseBreakdown,
    total_monthly: f64,
    total_annual: f64,
    daily_average: f64,
    shares: Vec<CategoryShare>,
    chart_series: Vec<LineItem>,
    savings: SavingsProjection,
    required_income: RequiredIncome,
    comparison: Vec<ComparisonRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReferenceResponse<'a> {
    neighborhoods: &'a [Neighborhood],
    transport: &'a [TransportMode],
    car: CarCostProfile,
    utilities: UtilityProfile,
    food: FoodProfile,
    lifestyle: &'a LifestyleProfile,
    person_scaling: PersonScaling,
    unit_types: Vec<UnitType>,
    spending_styles: Vec<SpendingStyle>,
    defaults: Selection,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn ensure_amount(flag: &str, value: f64, max: f64) -> Result<(), String> {
    if !value.is_finite() || !(0.0..=max).contains(&value) {
        return Err(format!("{flag} must be between 0 and {max}"));
    }
    Ok(())
}

fn build_request(data: &ReferenceData, args: EstimateArgs) -> Result<EstimateRequest, String> {
    if args.dining_out > MAX_DINING_OUT {
        return Err(format!("--dining-out must be between 0 and {MAX_DINING_OUT}"));
    }

    ensure_amount("--healthcare", args.healthcare, MAX_HEALTHCARE)?;
    ensure_amount("--parking", args.parking, MAX_PARKING)?;
    ensure_amount(
        "--other-entertainment",
        args.other_entertainment,
        MAX_OTHER_ENTERTAINMENT,
    )?;
    ensure_amount("--tax-rate", args.tax_rate, MAX_TAX_RATE)?;
    ensure_amount(
        "--gross-monthly-income",
        args.gross_monthly_income,
        MAX_GROSS_MONTHLY_INCOME,
    )?;

    for (flag, value) in [
        ("--annual-cash-savings", args.annual_cash_savings),
        ("--annual-retirement-savings", args.annual_retirement_savings),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("{flag} must be >= 0"));
        }
    }

    let selection = Selection {
        neighborhood: args.neighborhood,
        unit_type: args.unit_type.into(),
        spending_style: args.spending_style.into(),
        transport: args.transport,
        dining_out_per_month: args.dining_out,
        gym: args.gym,
        streaming: if args.no_streaming {
            Vec::new()
        } else {
            args.streaming
        },
        healthcare: args.healthcare,
        parking: args.parking,
        other_entertainment: args.other_entertainment,
    };
    let state = SessionState::new(data, selection).map_err(|e| e.to_string())?;

    Ok(EstimateRequest {
        state,
        finances: Finances {
            gross_monthly_income: args.gross_monthly_income,
            tax_rate_percent: args.tax_rate,
            annual_cash_savings: args.annual_cash_savings,
            annual_retirement_savings: args.annual_retirement_savings,
        },
    })
}

fn run_estimate(data: &ReferenceData, request: EstimateRequest) -> Result<EstimateResponse, String> {
    let selection = request.state.into_selection();
    let inputs = selection.resolve(data).map_err(|e| e.to_string())?;
    let breakdown = compute_expenses(data, &inputs);
    let total_monthly = breakdown.total();

    let finances = request.finances;
    let required_income = required_gross_income(
        total_monthly,
        finances.annual_cash_savings,
        finances.annual_retirement_savings,
        finances.tax_rate_percent,
    )
    .map_err(|e| e.to_string())?;
    let savings = project_savings(
        finances.gross_monthly_income,
        finances.tax_rate_percent,
        total_monthly,
    );
    let comparison = compare_neighborhoods(
        data,
        &breakdown,
        &selection.neighborhood,
        inputs.unit_type,
        inputs.spending_style,
    );

    debug!(
        neighborhood = %selection.neighborhood,
        total_monthly,
        "computed estimate"
    );

    Ok(EstimateResponse {
        neighborhood_description: inputs.neighborhood.description,
        transport_notes: inputs.transport.notes,
        total_annual: breakdown.annual_total(),
        daily_average: breakdown.daily_average(),
        shares: breakdown.shares(),
        chart_series: breakdown.chart_series(),
        total_monthly,
        line_items: breakdown,
        savings,
        required_income,
        comparison,
        selection,
    })
}

pub fn run_cli_estimate(args: EstimateArgs) -> Result<(), String> {
    let data = ReferenceData::madison();
    let as_json = args.json;
    let request = build_request(data, args)?;
    let response = run_estimate(data, request)?;

    if as_json {
        let json = serde_json::to_string_pretty(&response)
            .map_err(|e| format!("Failed to serialize estimate: {e}"))?;
        println!("{json}");
    } else {
        print!("{}", render_breakdown(&response));
    }
    Ok(())
}

fn format_dollars(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn render_breakdown(response: &EstimateResponse) -> String {
    let selection = &response.selection;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} · {} · {} lifestyle · {}",
        selection.neighborhood,
        selection.unit_type.label(),
        selection.spending_style.label(),
        selection
            .transport
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
    );
    let _ = writeln!(out, "{}", response.neighborhood_description);
    let _ = writeln!(out, "Transport: {}", response.transport_notes);
    let _ = writeln!(out);
    for share in &response.shares {
        let _ = writeln!(
            out,
            "{:<22}{:>10}  ({:.0}%)",
            share.label,
            format_dollars(share.amount),
            share.percent
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Monthly total: {}  Annual: {}  Daily: {}",
        format_dollars(response.total_monthly),
        format_dollars(response.total_annual),
        format_dollars(response.daily_average)
    );
    let savings = &response.savings;
    let _ = writeln!(
        out,
        "Net income: {}  Savings: {}/mo, {}/yr ({:.1}% savings rate, {})",
        format_dollars(savings.net_monthly_income),
        format_dollars(savings.monthly_savings),
        format_dollars(savings.annual_savings),
        savings.savings_rate_percent,
        savings_status_label(savings)
    );
    let _ = writeln!(
        out,
        "Required gross income: {}/mo, {}/yr",
        format_dollars(response.required_income.required_monthly_gross),
        format_dollars(response.required_income.required_annual_gross)
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "  {:<30} {:>10} {:>10} {:>10}",
        "NEIGHBORHOOD", "RENT", "NON-RENT", "TOTAL"
    );
    for row in &response.comparison {
        let _ = writeln!(
            out,
            "{} {:<30} {:>10} {:>10} {:>10}",
            if row.selected { '*' } else { ' ' },
            row.neighborhood,
            format_dollars(row.rent),
            format_dollars(row.non_rent),
            format_dollars(row.estimated_total)
        );
    }
    out
}

fn savings_status_label(savings: &SavingsProjection) -> &'static str {
    match savings.status {
        SavingsStatus::Deficit => "expenses exceed net income",
        SavingsStatus::Low => "below 10%",
        SavingsStatus::OnTrack => "on track",
        SavingsStatus::Healthy => "solid",
    }
}

pub fn create_router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/reference", get(reference_handler))
        .route(
            "/api/estimate",
            get(estimate_get_handler).post(estimate_post_handler),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(config: ServeArgs) -> std::io::Result<()> {
    let addr = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(addr).await?;
    info!("Expense estimator API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{}/", config.port);

    axum::serve(listener, create_router()).await
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

async fn reference_handler() -> Response {
    let data = ReferenceData::madison();
    json_response(StatusCode::OK, reference_response(data))
}

async fn estimate_get_handler(
    payload: Result<Query<EstimatePayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => estimate_handler_impl(payload).await,
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn estimate_post_handler(
    payload: Result<Json<EstimatePayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => estimate_handler_impl(payload).await,
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn estimate_handler_impl(payload: EstimatePayload) -> Response {
    let data = ReferenceData::madison();
    let result = api_request_from_payload(data, payload)
        .and_then(|request| run_estimate(data, request));
    match result {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(msg) => error_response(StatusCode::BAD_REQUEST, &msg),
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

fn reference_response(data: &ReferenceData) -> ReferenceResponse<'_> {
    ReferenceResponse {
        neighborhoods: &data.neighborhoods,
        transport: &data.transport,
        car: data.car,
        utilities: data.utilities,
        food: data.food,
        lifestyle: &data.lifestyle,
        person_scaling: data.person_scaling,
        unit_types: UnitType::ALL.to_vec(),
        spending_styles: SpendingStyle::ALL.to_vec(),
        defaults: default_selection(),
    }
}

fn default_selection() -> Selection {
    let args = default_args_for_api();
    Selection {
        neighborhood: args.neighborhood,
        unit_type: args.unit_type.into(),
        spending_style: args.spending_style.into(),
        transport: args.transport,
        dining_out_per_month: args.dining_out,
        gym: args.gym,
        streaming: args.streaming,
        healthcare: args.healthcare,
        parking: args.parking,
        other_entertainment: args.other_entertainment,
    }
}

#[cfg(test)]
fn api_request_from_json(data: &ReferenceData, json: &str) -> Result<EstimateRequest, String> {
    let payload = serde_json::from_str::<EstimatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    api_request_from_payload(data, payload)
}

/// Selector values are applied first; a map click, when present, is applied
/// on top of them so it wins over the neighborhood selector.
fn api_request_from_payload(
    data: &ReferenceData,
    payload: EstimatePayload,
) -> Result<EstimateRequest, String> {
    let mut args = default_args_for_api();

    if let Some(v) = payload.neighborhood {
        args.neighborhood = v;
    }
    if let Some(v) = payload.unit_type {
        args.unit_type = v.into();
    }
    if let Some(v) = payload.spending_style {
        args.spending_style = v.into();
    }
    if let Some(v) = payload.transport {
        args.transport = v;
    }
    if let Some(v) = payload.dining_out {
        args.dining_out = v;
    }
    if let Some(v) = payload.gym {
        args.gym = v;
    }
    if let Some(v) = payload.streaming {
        args.streaming = v.into_names();
    }
    if let Some(v) = payload.healthcare {
        args.healthcare = v;
    }
    if let Some(v) = payload.parking {
        args.parking = v;
    }
    if let Some(v) = payload.other_entertainment {
        args.other_entertainment = v;
    }

    if let Some(v) = payload.gross_monthly_income {
        args.gross_monthly_income = v;
    }
    if let Some(v) = payload.tax_rate {
        args.tax_rate = v;
    }
    if let Some(v) = payload.annual_cash_savings {
        args.annual_cash_savings = v;
    }
    if let Some(v) = payload.annual_retirement_savings {
        args.annual_retirement_savings = v;
    }

    let mut request = build_request(data, args)?;
    if let Some(clicked) = payload.map_click {
        request.state =
            apply_map_click(request.state, data, &clicked).map_err(|e| e.to_string())?;
    }
    Ok(request)
}

fn default_args_for_api() -> EstimateArgs {
    EstimateArgs {
        neighborhood: DEFAULT_NEIGHBORHOOD.to_string(),
        unit_type: CliUnitType::OneBedroom,
        spending_style: CliSpendingStyle::Moderate,
        transport: DEFAULT_TRANSPORT.to_string(),
        dining_out: 4,
        gym: NO_GYM.to_string(),
        streaming: DEFAULT_STREAMING.map(String::from).to_vec(),
        no_streaming: false,
        healthcare: 150.0,
        parking: 0.0,
        other_entertainment: 0.0,
        gross_monthly_income: 5_000.0,
        tax_rate: 22.0,
        annual_cash_savings: 0.0,
        annual_retirement_savings: 0.0,
        json: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExpenseCategory, OWN_CAR};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_args() -> EstimateArgs {
        default_args_for_api()
    }

    fn data() -> &'static ReferenceData {
        ReferenceData::madison()
    }

    async fn get_body_json(response: Response) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    #[test]
    fn cli_defaults_match_api_defaults() {
        let cli = Cli::try_parse_from(["madcost", "estimate"]).expect("defaults parse");
        let Commands::Estimate(args) = cli.command else {
            panic!("expected estimate command");
        };
        let defaults = default_args_for_api();
        assert_eq!(args.neighborhood, defaults.neighborhood);
        assert_eq!(args.unit_type, defaults.unit_type);
        assert_eq!(args.spending_style, defaults.spending_style);
        assert_eq!(args.transport, defaults.transport);
        assert_eq!(args.dining_out, defaults.dining_out);
        assert_eq!(args.gym, defaults.gym);
        assert_eq!(args.streaming, defaults.streaming);
        assert_approx(args.healthcare, defaults.healthcare);
        assert_approx(args.tax_rate, defaults.tax_rate);
        assert_approx(args.gross_monthly_income, defaults.gross_monthly_income);
    }

    #[test]
    fn cli_parses_unit_aliases_and_streaming_list() {
        let cli = Cli::try_parse_from([
            "madcost",
            "estimate",
            "--unit-type",
            "2BR",
            "--spending-style",
            "comfortable",
            "--streaming",
            "Hulu,Disney+",
        ])
        .expect("flags parse");
        let Commands::Estimate(args) = cli.command else {
            panic!("expected estimate command");
        };
        assert_eq!(args.unit_type, CliUnitType::TwoBedroom);
        assert_eq!(args.spending_style, CliSpendingStyle::Comfortable);
        assert_eq!(args.streaming, vec!["Hulu".to_string(), "Disney+".to_string()]);
    }

    #[test]
    fn serve_reads_port_flag() {
        let cli = Cli::try_parse_from(["madcost", "serve", "--port", "9000"]).expect("flags parse");
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.port, 9000);
    }

    #[test]
    fn build_request_rejects_dining_out_above_twenty() {
        let mut args = sample_args();
        args.dining_out = 21;
        let err = build_request(data(), args).expect_err("must reject dining frequency");
        assert!(err.contains("--dining-out"));
    }

    #[test]
    fn build_request_rejects_negative_parking() {
        let mut args = sample_args();
        args.parking = -10.0;
        let err = build_request(data(), args).expect_err("must reject negative parking");
        assert!(err.contains("--parking"));
    }

    #[test]
    fn build_request_rejects_tax_rate_outside_slider_range() {
        let mut args = sample_args();
        args.tax_rate = 45.0;
        let err = build_request(data(), args).expect_err("must reject tax rate");
        assert!(err.contains("--tax-rate"));
    }

    #[test]
    fn build_request_rejects_non_finite_savings_target() {
        let mut args = sample_args();
        args.annual_cash_savings = f64::INFINITY;
        let err = build_request(data(), args).expect_err("must reject infinite target");
        assert!(err.contains("--annual-cash-savings"));
    }

    #[test]
    fn build_request_rejects_unknown_gym() {
        let mut args = sample_args();
        args.gym = "Crossfit Olympus".to_string();
        let err = build_request(data(), args).expect_err("must reject gym");
        assert!(err.contains("Crossfit Olympus"));
    }

    #[test]
    fn build_request_no_streaming_clears_services() {
        let mut args = sample_args();
        args.no_streaming = true;
        let request = build_request(data(), args).expect("valid request");
        assert!(request.state.selection().streaming.is_empty());
    }

    #[test]
    fn api_request_from_json_parses_web_keys() {
        let json = r#"{
          "neighborhood": "Monona",
          "unitType": "2BR",
          "spendingStyle": "frugal",
          "transport": "Own Car",
          "diningOut": 6,
          "gym": "Madison YMCA",
          "streaming": ["Hulu", "Max (HBO)"],
          "healthcare": 220,
          "parking": 40,
          "otherEntertainment": 35,
          "grossMonthlyIncome": 6200,
          "taxRate": 18,
          "annualCashSavings": 3000,
          "annualRetirementSavings": 6000
        }"#;
        let request = api_request_from_json(data(), json).expect("json should parse");
        let selection = request.state.selection();

        assert_eq!(selection.neighborhood, "Monona");
        assert_eq!(selection.unit_type, UnitType::TwoBedroom);
        assert_eq!(selection.spending_style, SpendingStyle::Frugal);
        assert_eq!(selection.transport, OWN_CAR);
        assert_eq!(selection.dining_out_per_month, 6);
        assert_eq!(selection.gym, "Madison YMCA");
        assert_eq!(
            selection.streaming,
            vec!["Hulu".to_string(), "Max (HBO)".to_string()]
        );
        assert_approx(selection.healthcare, 220.0);
        assert_approx(selection.parking, 40.0);
        assert_approx(selection.other_entertainment, 35.0);
        assert_approx(request.finances.gross_monthly_income, 6_200.0);
        assert_approx(request.finances.tax_rate_percent, 18.0);
        assert_approx(request.finances.annual_cash_savings, 3_000.0);
        assert_approx(request.finances.annual_retirement_savings, 6_000.0);
    }

    #[test]
    fn api_request_map_click_overrides_selector() {
        let json = r#"{ "neighborhood": "Monona", "mapClick": "Middleton" }"#;
        let request = api_request_from_json(data(), json).expect("json should parse");
        assert_eq!(request.state.selection().neighborhood, "Middleton");
    }

    #[test]
    fn api_request_rejects_unknown_map_click() {
        let json = r#"{ "mapClick": "Lake Mendota" }"#;
        let err = api_request_from_json(data(), json).expect_err("must reject click");
        assert!(err.contains("Lake Mendota"));
    }

    #[test]
    fn streaming_csv_is_split_and_trimmed() {
        let streaming = ApiStreaming::Csv("Netflix, Hulu,,Apple TV+".to_string());
        assert_eq!(
            streaming.into_names(),
            vec![
                "Netflix".to_string(),
                "Hulu".to_string(),
                "Apple TV+".to_string()
            ]
        );
    }

    #[test]
    fn run_estimate_matches_reference_example() {
        let mut args = sample_args();
        args.transport = OWN_CAR.to_string();
        args.tax_rate = 20.0;
        args.annual_cash_savings = 5_000.0;
        let request = build_request(data(), args).expect("valid request");
        let response = run_estimate(data(), request).expect("estimate");

        assert_approx(response.total_monthly, 2773.0);
        assert_approx(response.total_annual, 33_276.0);
        assert_approx(
            response.line_items.amount(ExpenseCategory::Transportation),
            245.0,
        );
        assert!((response.required_income.required_monthly_gross - 3987.08).abs() < 0.005);
        assert_eq!(response.comparison.len(), data().neighborhoods.len());
        assert_eq!(response.savings.status, SavingsStatus::Healthy);
    }

    #[test]
    fn estimate_response_serialization_contains_expected_fields() {
        let request = build_request(data(), sample_args()).expect("valid request");
        let response = run_estimate(data(), request).expect("estimate");
        let json = serde_json::to_string(&response).expect("response should serialize");
        for key in [
            "\"selection\"",
            "\"lineItems\"",
            "\"totalMonthly\"",
            "\"chartSeries\"",
            "\"requiredIncome\"",
            "\"requiredMonthlyGross\"",
            "\"savingsRatePercent\"",
            "\"comparison\"",
            "\"estimatedTotal\"",
            "\"regionId\"",
            "\"neighborhoodDescription\"",
            "\"transportNotes\"",
        ] {
            assert!(json.contains(key), "missing {key}");
        }
    }

    #[test]
    fn format_dollars_groups_thousands() {
        assert_eq!(format_dollars(0.0), "$0");
        assert_eq!(format_dollars(2773.0), "$2,773");
        assert_eq!(format_dollars(47_844.96), "$47,845");
        assert_eq!(format_dollars(1_234_567.0), "$1,234,567");
        assert_eq!(format_dollars(-1200.4), "-$1,200");
    }

    #[test]
    fn render_breakdown_lists_non_zero_categories() {
        let request = build_request(data(), sample_args()).expect("valid request");
        let response = run_estimate(data(), request).expect("estimate");
        let text = render_breakdown(&response);
        assert!(text.starts_with("Downtown / Capitol Square · 1BR · Moderate lifestyle · Metro Bus"));
        assert!(text.contains("Rent"));
        assert!(!text.contains("Gym / Fitness"));
        assert!(text.contains("Monthly total: $2,580"));
        assert!(text.contains("High walkability"));
        assert!(text.contains("Transport: Madison Metro unlimited monthly pass"));
    }

    #[test]
    fn render_breakdown_includes_annual_savings_and_comparison_table() {
        let request = build_request(data(), sample_args()).expect("valid request");
        let response = run_estimate(data(), request).expect("estimate");
        let text = render_breakdown(&response);

        let annual = format_dollars(response.savings.annual_savings);
        assert!(text.contains(&format!("{annual}/yr")));

        let monona = response
            .comparison
            .iter()
            .find(|row| row.neighborhood == "Monona")
            .expect("Monona row");
        let line = text
            .lines()
            .find(|line| line.contains("Monona"))
            .expect("Monona comparison line");
        assert!(line.starts_with("  Monona"));
        assert!(line.contains(&format_dollars(monona.rent)));
        assert!(line.contains(&format_dollars(monona.non_rent)));
        assert!(line.contains(&format_dollars(monona.estimated_total)));

        let selected = text
            .lines()
            .find(|line| line.starts_with('*'))
            .expect("selected row marked");
        assert!(selected.contains("Downtown / Capitol Square"));
    }

    #[tokio::test]
    async fn index_is_served_without_caching() {
        let response = create_router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );
    }

    #[tokio::test]
    async fn reference_endpoint_lists_tables() {
        let response = create_router()
            .oneshot(
                Request::builder()
                    .uri("/api/reference")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_body_json(response).await;
        let neighborhoods = json["neighborhoods"].as_array().expect("neighborhoods");
        assert_eq!(neighborhoods.len(), 7);
        assert_eq!(neighborhoods[0]["name"], "Downtown / Capitol Square");
        assert_eq!(neighborhoods[0]["rent"]["1BR"]["moderate"], 1500);
        assert_eq!(json["transport"][1]["cost"]["kind"], "ownCar");
        assert_eq!(json["unitTypes"][2], "2BR");
        assert_eq!(json["defaults"]["neighborhood"], DEFAULT_NEIGHBORHOOD);
    }

    #[tokio::test]
    async fn estimate_post_returns_breakdown() {
        let body = r#"{
          "transport": "Own Car",
          "streaming": ["Netflix", "Spotify"],
          "taxRate": 20,
          "annualCashSavings": 5000
        }"#;
        let response = create_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/estimate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_body_json(response).await;
        assert_eq!(json["totalMonthly"], 2773.0);
        assert_eq!(json["lineItems"][0]["label"], "Rent");
        assert_eq!(json["lineItems"][0]["amount"], 1500.0);
        let series = json["chartSeries"].as_array().expect("chart series");
        assert_eq!(series.last().expect("non-empty")["label"], "Rent");
    }

    #[tokio::test]
    async fn estimate_get_accepts_query_string() {
        let response = create_router()
            .oneshot(
                Request::builder()
                    .uri("/api/estimate?neighborhood=Monona&unitType=studio&streaming=Hulu,Spotify&diningOut=0")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_body_json(response).await;
        assert_eq!(json["selection"]["neighborhood"], "Monona");
        assert_eq!(json["selection"]["unitType"], "studio");
        let streaming = json["lineItems"]
            .as_array()
            .expect("line items")
            .iter()
            .find(|item| item["label"] == "Streaming")
            .expect("streaming item");
        assert_eq!(streaming["amount"], 29.0);
    }

    #[tokio::test]
    async fn estimate_with_unknown_neighborhood_is_bad_request() {
        let response = create_router()
            .oneshot(
                Request::builder()
                    .uri("/api/estimate?neighborhood=Atlantis")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_body_json(response).await;
        assert!(
            json["error"]
                .as_str()
                .expect("error message")
                .contains("Atlantis")
        );
    }

    #[tokio::test]
    async fn malformed_json_body_is_json_bad_request() {
        for body in [r#"{"diningOut": -1}"#, r#"{"unitType": "3BR"}"#] {
            let response = create_router()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/api/estimate")
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(body))
                        .expect("request"),
                )
                .await
                .expect("router responds");
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
            let json = get_body_json(response).await;
            assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
        }
    }

    #[tokio::test]
    async fn malformed_query_value_is_json_bad_request() {
        let response = create_router()
            .oneshot(
                Request::builder()
                    .uri("/api/estimate?diningOut=-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );
        let json = get_body_json(response).await;
        assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = create_router()
            .oneshot(
                Request::builder()
                    .uri("/api/nope")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
