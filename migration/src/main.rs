// 独立迁移工具：aigrader-migrate up / down / status
#[tokio::main]
async fn main() {
    sea_orm_migration::cli::run_cli(migration::Migrator).await;
}
