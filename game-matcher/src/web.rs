use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::config::MatchingConfig;
use crate::export::schedule_to_csv_string;
use crate::matching::{generate_matching, grade_label, grade_score, MatchingResult, ALL_GRADES};

// Last computed schedule, kept in memory only
#[derive(Default)]
pub struct AppState {
    pub last_result: Mutex<Option<MatchingResult>>,
}

impl AppState {
    fn result_slot(&self) -> Result<MutexGuard<'_, Option<MatchingResult>>> {
        self.last_result
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("schedule state poisoned"))
    }
}

#[derive(Serialize)]
pub struct GradeInfo {
    grade: &'static str,
    score: u32,
}

// Validate and compute a schedule
async fn create_matching(
    config: web::Json<MatchingConfig>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let config = config.into_inner();
    if let Err(e) = config.validate() {
        warn!(error = %e, "rejected matching request");
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e.to_string()
        })));
    }

    let result = generate_matching(&config);
    info!(games = result.total_games, "matching generated via api");

    let response = HttpResponse::Ok().json(&result);
    *state.result_slot()? = Some(result);
    Ok(response)
}

fn no_schedule() -> serde_json::Value {
    serde_json::json!({"error": "No schedule generated yet"})
}

async fn get_matching(state: web::Data<AppState>) -> Result<HttpResponse> {
    let slot = state.result_slot()?;
    match slot.as_ref() {
        Some(result) => Ok(HttpResponse::Ok().json(result)),
        None => Ok(HttpResponse::NotFound().json(no_schedule())),
    }
}

async fn export_matching(state: web::Data<AppState>) -> Result<HttpResponse> {
    let slot = state.result_slot()?;
    let Some(result) = slot.as_ref() else {
        return Ok(HttpResponse::NotFound().json(no_schedule()));
    };

    let body = schedule_to_csv_string(result)
        .map_err(|e| {
            actix_web::error::ErrorInternalServerError(format!("Failed to export CSV: {}", e))
        })?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(("Content-Disposition", "attachment; filename=\"schedule.csv\""))
        .body(body))
}

async fn get_grades() -> Result<HttpResponse> {
    let grades: Vec<GradeInfo> = ALL_GRADES
        .iter()
        .map(|&g| GradeInfo { grade: grade_label(g), score: grade_score(g) })
        .collect();
    Ok(HttpResponse::Ok().json(grades))
}

/// Registers the api routes, shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/matching", web::post().to(create_matching))
        .route("/api/matching", web::get().to(get_matching))
        .route("/api/matching/export.csv", web::get().to(export_matching))
        .route("/api/grades", web::get().to(get_grades));
}

pub async fn start_server(port: u16) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::default());

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
