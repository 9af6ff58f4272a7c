use crate::generator::profile::{build_well_log, GeneratorConfig};
use crate::presenter::model::PresentationModel;
use crate::workflow::runner::Runner;
use serde_json::{json, Value as JsonValue};
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use swcore::table::{from_json_records, DataTable};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

type SharedModel = Arc<RwLock<PresentationModel>>;

/// Bridge that hosts the presenter HTTP endpoint and runs incoming logs.
pub struct PresenterBridge {
    state: SharedModel,
}

impl PresenterBridge {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(PresentationModel::default())),
        }
    }

    /// Serve `/payload`, `/ingest` and `/ingest-config` on a background thread.
    pub fn serve(&self, runner: Arc<Runner>, addr: SocketAddr) {
        let state_for_filter = self.state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let get_route = warp::path("payload")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedModel| {
                let model = state.read().map(|guard| guard.clone()).unwrap_or_default();
                warp::reply::json(&model)
            });

        let post_route = warp::path("ingest")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .map(
                |records: Vec<JsonValue>, state: SharedModel, runner: Arc<Runner>| {
                    let (status, body) = match from_json_records(&records) {
                        Ok(table) => run_and_publish(&table, &state, &runner),
                        Err(err) => (
                            StatusCode::BAD_REQUEST,
                            json!({"status": "error", "error": err.to_string()}),
                        ),
                    };
                    warp::reply::with_status(warp::reply::json(&body), status)
                },
            );

        let generator_route = warp::path("ingest-config")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter)
            .and(runner_filter)
            .map(
                |config: GeneratorConfig, state: SharedModel, runner: Arc<Runner>| {
                    let (status, mut body) = match build_well_log(&config) {
                        Ok(table) => run_and_publish(&table, &state, &runner),
                        Err(err) => (
                            StatusCode::BAD_REQUEST,
                            json!({"status": "error", "error": format!("{err:#}")}),
                        ),
                    };
                    if let Some(name) = config.scenario.as_ref() {
                        log::info!("[presenter] scenario {} -> {}", name, status);
                    }
                    body["description"] = json!(config.description.clone().unwrap_or_default());
                    warp::reply::with_status(warp::reply::json(&body), status)
                },
            );

        thread::spawn(move || {
            let routes = get_route.or(post_route).or(generator_route);
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    log::error!("failed to build presenter runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                warp::serve(routes).run(addr).await;
            });
        });
    }

    pub fn publish(&self, model: &PresentationModel) {
        publish_into(&self.state, model);
    }

    pub fn publish_status(&self, message: &str) {
        println!("[presenter] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> PresentationModel {
        self.state.read().unwrap().clone()
    }
}

impl Default for PresenterBridge {
    fn default() -> Self {
        Self::new()
    }
}

fn publish_into(state: &SharedModel, model: &PresentationModel) {
    let mut guard = state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = model.clone();
    println!(
        "[presenter] predictions: {}, tracks: {}",
        guard.predictions.len(),
        guard.tracks.len()
    );
}

/// Run one table and publish the outcome; returns the HTTP status and body.
fn run_and_publish(
    table: &DataTable,
    state: &SharedModel,
    runner: &Runner,
) -> (StatusCode, JsonValue) {
    match runner.execute(table) {
        Ok(result) => {
            let model = PresentationModel::from_result(&result, &runner.metrics());
            publish_into(state, &model);
            match &model.error {
                None => (
                    StatusCode::OK,
                    json!({"status": "ok", "predictions": model.predictions.len()}),
                ),
                Some(error) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"status": "error", "error": error}),
                ),
            }
        }
        Err(err) => {
            log::warn!("ingest error: {:#}", err);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"status": "error", "error": format!("{err:#}")}),
            )
        }
    }
}
