use actix_files::Files;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::io;

use station_graph::import::parse_dataset;
use station_graph::models::{to_records, NextStationRecord};
use station_graph::topology;

#[derive(Serialize, Clone)]
#[serde(rename_all = "camelCase")]
struct RailwaySummary {
    railway_id: u32,
    station_count: usize,
    available: bool,
}

struct AppState {
    railways: Vec<RailwaySummary>,
    records: HashMap<u32, std::result::Result<Vec<NextStationRecord>, String>>,
}

/// Parse the dataset and run every railway once; the result is immutable
/// for the lifetime of the server.
fn load_state(path: &str) -> std::result::Result<AppState, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("failed to read {path}: {e}"))?;
    let net = parse_dataset(&content)?;

    let mut railways = Vec::new();
    let mut records = HashMap::new();
    for (id, result) in topology::analyze(&net) {
        let stations = net.stations_of(id);
        railways.push(RailwaySummary {
            railway_id: id,
            station_count: stations.len(),
            available: result.is_ok(),
        });
        records.insert(id, result.map(|infos| to_records(&infos, &stations)));
    }
    Ok(AppState { railways, records })
}

async fn list_railways(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(&state.railways))
}

async fn next_stations(state: web::Data<AppState>, path: web::Path<u32>) -> Result<HttpResponse> {
    let id = path.into_inner();
    match state.records.get(&id) {
        Some(Ok(records)) => Ok(HttpResponse::Ok().json(records)),
        Some(Err(diagnostic)) => Ok(HttpResponse::InternalServerError().body(diagnostic.clone())),
        None => Ok(HttpResponse::NotFound().body(format!("unknown railway id {id}"))),
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    // Get port from environment or default to 8080
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);
    let data_path = env::var("STATION_DATA").unwrap_or_else(|_| "./data/railways.txt".to_string());

    let state = load_state(&data_path)
        .map(web::Data::new)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    println!("Starting server on 0.0.0.0:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .route("/api/railways", web::get().to(list_railways))
            .route(
                "/api/railways/{id}/next-stations",
                web::get().to(next_stations),
            )
            .service(Files::new("/", "./static").index_file("index.html"))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
