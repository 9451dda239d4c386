use std::process::ExitCode;

use tracing::{error, info};

use filedock::{Config, Database, UploadPolicy, UploadRequest, UploadResult, Uploader};

const USAGE: &str = "usage: filedock [--config PATH] FILE...";

struct Args {
    config_path: String,
    files: Vec<String>,
}

fn parse_args() -> Option<Args> {
    let mut config_path = "config.toml".to_string();
    let mut files = Vec::new();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => config_path = args.next()?,
            "-h" | "--help" => return None,
            _ => files.push(arg),
        }
    }

    if files.is_empty() {
        return None;
    }
    Some(Args { config_path, files })
}

#[tokio::main]
async fn main() -> ExitCode {
    let Some(args) = parse_args() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    // Load configuration
    let config = match Config::load_with_env(&args.config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", args.config_path);
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = filedock::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        filedock::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let db = match Database::open(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {e}");
            return ExitCode::FAILURE;
        }
    };

    let uploader = Uploader::new(UploadPolicy::from_config(&config.upload), db.pool().clone());
    if let Err(e) = uploader.storage().ensure_dir().await {
        error!("Failed to create upload directory: {e}");
        return ExitCode::FAILURE;
    }
    info!(
        "Uploading {} file(s) into {}",
        args.files.len(),
        uploader.policy().upload_dir().display()
    );

    let mut all_ok = true;
    for file in &args.files {
        let result = match UploadRequest::from_local_file(file).await {
            Ok(request) => uploader.upload(&request).await,
            Err(e) => {
                error!("Cannot read {file}: {e}");
                UploadResult {
                    success: false,
                    message: e.to_string(),
                    path: None,
                    kind: None,
                }
            }
        };

        all_ok &= result.success;
        match serde_json::to_string(&result) {
            Ok(line) => println!("{line}"),
            Err(e) => error!("Failed to serialize result: {e}"),
        }
    }

    db.close().await;

    if all_ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
