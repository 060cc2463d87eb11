use agenda_api::config::ApiConfig;
use agenda_db::{create_pool, schema::initialize_database};
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(&config.database_url)
        .await
        .wrap_err("Failed to connect to the database")?;

    // Tables are created idempotently, so a fresh database works out of the box
    initialize_database(&db_pool).await?;

    agenda_api::start_server(config, db_pool).await?;

    Ok(())
}
