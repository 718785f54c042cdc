mod cli;
mod infra;
mod routes;
mod server;

use bh_investment::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
