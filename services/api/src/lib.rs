mod cli;
mod infra;
mod routes;
mod server;

use tender_criteria::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
