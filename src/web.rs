use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ServeArgs;
use crate::form::{export_submission_to_csv, validate_submission, AvailabilitySubmissionRequest};
use crate::parser::load_availability;
use crate::plan::{build_event_plan, EventSnapshot, PlanCounts};
use crate::report::{
    accounting_report, activity_report, AcceptedVendor, BudgetLine, EquipmentCost, PublicFeedback, ReportEvent,
    SaleRecord,
};
use crate::schedule::{find_optimal_dates, CandidateRange, ScoredDate, VendorAvailability, VendorPriority};
use crate::staffing::{calculate_staffing, total_headcount, StaffingInput, StaffingRecommendation};
use crate::weather::{assess_forecast, ForecastResponse};

/// Longest candidate range the ranking endpoints accept, about ten years
pub const MAX_CANDIDATE_DAYS: usize = 3660;

/// Vendor availability held in memory, backed by the CSV at `data_path`
pub struct AppState {
    pub availability: Mutex<Vec<VendorAvailability>>,
    pub data_path: PathBuf,
    pub offset: FixedOffset,
}

impl AppState {
    pub fn new(availability: Vec<VendorAvailability>, data_path: PathBuf, offset: FixedOffset) -> Self {
        Self {
            availability: Mutex::new(availability),
            data_path,
            offset,
        }
    }

    fn availability(&self) -> Result<MutexGuard<'_, Vec<VendorAvailability>>> {
        self.availability
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("availability store poisoned"))
    }

    /// Current calendar day in the configured offset
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.offset).date_naive()
    }
}

#[derive(Deserialize)]
pub struct DateRangeQuery {
    start: NaiveDate,
    end: NaiveDate,
    limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct OptimalDatesRequest {
    vendors: Vec<VendorAvailability>,
    start: NaiveDate,
    end: NaiveDate,
    limit: Option<usize>,
}

#[derive(Serialize)]
pub struct OptimalDatesResponse {
    days_evaluated: usize,
    dates: Vec<ScoredDate>,
}

#[derive(Serialize)]
pub struct StaffingResponse {
    recommendations: Vec<StaffingRecommendation>,
    total_headcount: u32,
}

#[derive(Deserialize)]
pub struct PlanRequest {
    event: EventSnapshot,
    #[serde(default)]
    counts: PlanCounts,
}

#[derive(Deserialize)]
pub struct WeatherRequest {
    date: NaiveDate,
    forecast: ForecastResponse,
}

#[derive(Deserialize)]
pub struct AccountingReportRequest {
    event: ReportEvent,
    #[serde(default)]
    budgets: Vec<BudgetLine>,
    #[serde(default)]
    equipment: Vec<EquipmentCost>,
    #[serde(default)]
    sales: Vec<SaleRecord>,
    report_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct ActivityReportRequest {
    event: ReportEvent,
    #[serde(default)]
    vendors: Vec<AcceptedVendor>,
    #[serde(default)]
    confirmed_volunteers: u32,
    #[serde(default)]
    sales: Vec<SaleRecord>,
    #[serde(default)]
    feedback: Vec<PublicFeedback>,
    report_date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    tier_counts: BTreeMap<VendorPriority, u32>,
    date_popularity: BTreeMap<String, DateStats>,
}

#[derive(Serialize, Default)]
pub struct DateStats {
    must_have: u32,
    nice_to_have: u32,
    backup: u32,
}

fn bad_request(message: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({"success": false, "error": message.to_string()}))
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Option<HttpResponse> {
    let days = CandidateRange::new(start, end).len();
    (days > MAX_CANDIDATE_DAYS).then(|| {
        bad_request(format!(
            "Date range covers {} days; at most {} are allowed",
            days, MAX_CANDIDATE_DAYS
        ))
    })
}

fn ranked(vendors: &[VendorAvailability], start: NaiveDate, end: NaiveDate, limit: Option<usize>) -> OptimalDatesResponse {
    let mut dates = find_optimal_dates(vendors, &CandidateRange::new(start, end));
    let days_evaluated = dates.len();
    if let Some(limit) = limit {
        dates.truncate(limit);
    }
    OptimalDatesResponse { days_evaluated, dates }
}

// Vendor availability form
async fn submit_availability(
    req: web::Json<AvailabilitySubmissionRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let submission = match validate_submission(&req, state.offset) {
        Ok(s) => s,
        Err(e) => return Ok(bad_request(e)),
    };

    // Serialise writers to the CSV through the state lock
    let mut availability = state.availability()?;

    export_submission_to_csv(&submission, &state.data_path).map_err(|e| {
        warn!("failed to record submission: {}", e);
        actix_web::error::ErrorInternalServerError(format!("Failed to save submission: {}", e))
    })?;

    let entry = submission.into_availability();
    let key = entry.vendor_name.to_lowercase();
    match availability.iter_mut().find(|v| v.vendor_name.to_lowercase() == key) {
        Some(existing) => *existing = entry.clone(),
        None => availability.push(entry.clone()),
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "vendor": entry,
    })))
}

async fn list_availability(state: web::Data<AppState>) -> Result<HttpResponse> {
    let availability = state.availability()?;
    Ok(HttpResponse::Ok().json(&*availability))
}

// Ranking over the stored availability
async fn get_optimal_dates(
    query: web::Query<DateRangeQuery>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if let Some(rejection) = check_range(query.start, query.end) {
        return Ok(rejection);
    }
    let availability = state.availability()?;
    Ok(HttpResponse::Ok().json(ranked(&availability, query.start, query.end, query.limit)))
}

// Ranking over vendors supplied by the caller
async fn post_optimal_dates(req: web::Json<OptimalDatesRequest>) -> Result<HttpResponse> {
    if let Some(rejection) = check_range(req.start, req.end) {
        return Ok(rejection);
    }
    Ok(HttpResponse::Ok().json(ranked(&req.vendors, req.start, req.end, req.limit)))
}

async fn post_staffing(req: web::Json<StaffingInput>) -> Result<HttpResponse> {
    let recommendations = calculate_staffing(&req);
    let total_headcount = total_headcount(&recommendations);
    Ok(HttpResponse::Ok().json(StaffingResponse {
        recommendations,
        total_headcount,
    }))
}

async fn post_plan(req: web::Json<PlanRequest>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(build_event_plan(&req.event, &req.counts)))
}

async fn post_weather(req: web::Json<WeatherRequest>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(assess_forecast(&req.forecast.list, req.date)))
}

async fn post_accounting_report(
    req: web::Json<AccountingReportRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let report_date = req.report_date.unwrap_or_else(|| state.today());
    Ok(HttpResponse::Ok().json(accounting_report(
        &req.event,
        &req.budgets,
        &req.equipment,
        &req.sales,
        report_date,
    )))
}

async fn post_activity_report(
    req: web::Json<ActivityReportRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let report_date = req.report_date.unwrap_or_else(|| state.today());
    Ok(HttpResponse::Ok().json(activity_report(
        &req.event,
        &req.vendors,
        req.confirmed_volunteers,
        &req.sales,
        &req.feedback,
        report_date,
    )))
}

// Per-tier vendor counts and how many vendors of each tier can make each day
async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    let availability = state.availability()?;

    let mut tier_counts: BTreeMap<VendorPriority, u32> = VendorPriority::ALL.iter().map(|p| (*p, 0)).collect();
    let mut date_popularity: BTreeMap<String, DateStats> = BTreeMap::new();

    for vendor in availability.iter() {
        *tier_counts.entry(vendor.priority).or_insert(0) += 1;

        for day in &vendor.available_dates {
            let stats = date_popularity.entry(day.format("%Y-%m-%d").to_string()).or_default();
            match vendor.priority {
                VendorPriority::MustHave => stats.must_have += 1,
                VendorPriority::NiceToHave => stats.nice_to_have += 1,
                VendorPriority::Backup => stats.backup += 1,
            }
        }
    }

    Ok(HttpResponse::Ok().json(StatsResponse {
        tier_counts,
        date_popularity,
    }))
}

/// Registers the API routes; shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/availability")
            .route(web::post().to(submit_availability))
            .route(web::get().to(list_availability)),
    )
    .service(
        web::resource("/api/optimal-dates")
            .route(web::get().to(get_optimal_dates))
            .route(web::post().to(post_optimal_dates)),
    )
    .route("/api/staffing", web::post().to(post_staffing))
    .route("/api/plan", web::post().to(post_plan))
    .route("/api/weather", web::post().to(post_weather))
    .route("/api/reports/accounting", web::post().to(post_accounting_report))
    .route("/api/reports/activity", web::post().to(post_activity_report))
    .route("/api/stats", web::get().to(get_stats));
}

pub async fn start_server(args: ServeArgs, offset: FixedOffset) -> std::io::Result<()> {
    let availability = if args.data.exists() {
        load_availability(&args.data, offset).map_err(|e| std::io::Error::other(e.to_string()))?
    } else {
        warn!(path = %args.data.display(), "no availability file yet, starting empty");
        Vec::new()
    };

    let app_state = web::Data::new(AppState::new(availability, args.data.clone(), offset));

    info!(bind = %args.bind, port = args.port, "starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind((args.bind.as_str(), args.port))?
    .run()
    .await
}
