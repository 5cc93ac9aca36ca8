//! Mock configuration server: serves the experiment list and the device
//! catalog YAML as JSON, mirroring the endpoints the mobile client pulls its
//! configuration from.

use std::{
    io::ErrorKind,
    path::{Path as FilePath, PathBuf},
    sync::Arc,
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const DEVICE_CONFIG_PATH: &str = "sample_device_config.yaml";

#[derive(Serialize)]
struct Experiment {
    id: &'static str,
    description: &'static str,
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let app = routes(Arc::new(PathBuf::from(DEVICE_CONFIG_PATH)));

    let listener = TcpListener::bind("0.0.0.0:5001").await.unwrap();
    info!("configuration server listening on 0.0.0.0:5001");
    axum::serve(listener, app).await.unwrap();
}

fn routes(config_path: Arc<PathBuf>) -> Router {
    Router::new()
        .route("/config/experiments", get(list_experiments))
        .route("/config/experiments/:id", get(experiment_config))
        .with_state(config_path)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn list_experiments() -> Json<Vec<Experiment>> {
    Json(vec![
        Experiment {
            id: "futsal_experiment_9199a",
            description: "futsal_experiment",
        },
        Experiment {
            id: "environment_experiment_9198b",
            description: "environment_experiment",
        },
    ])
}

// Every experiment id is currently backed by the same catalog file.
async fn experiment_config(
    State(config_path): State<Arc<PathBuf>>,
    Path(_id): Path<String>,
) -> Response {
    match load_device_config(&config_path) {
        Ok(config) => (StatusCode::OK, Json(config)).into_response(),
        Err(ConfigError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "File not found" })),
        )
            .into_response(),
        Err(ConfigError::Io(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Error reading file: {e}") })),
        )
            .into_response(),
        Err(ConfigError::Parse(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Error parsing YAML file: {e}") })),
        )
            .into_response(),
    }
}

#[derive(Debug)]
enum ConfigError {
    NotFound,
    Io(std::io::Error),
    Parse(serde_yml::Error),
}

fn load_device_config(path: &FilePath) -> Result<Value, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ConfigError::NotFound,
        _ => ConfigError::Io(e),
    })?;
    serde_yml::from_str(&raw).map_err(ConfigError::Parse)
}

#[cfg(test)]
mod tests {
    use std::{env, fs, path::PathBuf};

    use super::{load_device_config, ConfigError};

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("config-server-test-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_load_device_config_ok() {
        let path = temp_path("ok.yaml");
        fs::write(&path, "devices:\n  Dev:\n    shortName: D\n").unwrap();
        let config = load_device_config(&path).unwrap();
        assert_eq!(config["devices"]["Dev"]["shortName"], "D");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_device_config_missing_file() {
        let path = temp_path("missing.yaml");
        assert!(matches!(
            load_device_config(&path),
            Err(ConfigError::NotFound)
        ));
    }

    #[test]
    fn test_load_device_config_parse_error() {
        let path = temp_path("bad.yaml");
        fs::write(&path, "devices: [unclosed").unwrap();
        assert!(matches!(load_device_config(&path), Err(ConfigError::Parse(_))));
        fs::remove_file(&path).unwrap();
    }
}
