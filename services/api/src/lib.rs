mod cli;
mod commands;
mod demo;
mod infra;
mod routes;
mod server;

use express_entry::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
