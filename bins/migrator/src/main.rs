//! Database migration runner for PropFirmMentor.
//!
//! Usage:
//!   migrator up      - Apply the catalog schema
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop every table and re-apply
//!
//! Reads `DATABASE_URL` from the environment or `.env`.

use propfirm_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // The CLI installs its own tracing subscriber.
    cli::run_cli(Migrator).await;
}
