use std::process;

use log::error;

use knowledge_share::app;

#[actix_web::main]
async fn main() {
    let Err(err) = app::server().await else {
        return;
    };

    // Config and logger failures happen before env_logger is installed
    if app::precedes_logger(&err) {
        eprintln!("knowledge-share failed to start: {}", err);
    } else {
        error!("knowledge-share stopped: {}", err);
    }

    if let Some(code) = app::exit_code(&err) {
        process::exit(code);
    }
}
