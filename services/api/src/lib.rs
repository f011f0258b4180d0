mod cli;
mod console;
mod infra;
mod routes;
mod server;

use ds_qualifier::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
