//! Database migration runner for Leavewise.
//!
//! Usage:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Roll back the leave schema
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop everything and re-apply

use leavewise_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // run_cli reads DATABASE_URL and installs its own subscriber
    cli::run_cli(Migrator).await;
}
