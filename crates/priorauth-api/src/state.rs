use priorauth_infrastructure::Database;
use priorauth_shared::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: AppConfig,
}
