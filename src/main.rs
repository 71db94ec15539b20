use dailymeals::{stats, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "dailymeals=debug".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;
    let repo = state.repo();
    let today = state.clock.today();

    let logged = stats::today_meal_count(&repo, state.clock.as_ref()).await?;
    let streak = stats::current_streak(&repo, state.clock.as_ref()).await?;

    tracing::info!(
        %today,
        logged_meals = logged,
        streak_days = streak,
        remote = state.recognizer.uses_remote(),
        model = %state.config.recognition.model,
        "dailymeals ready"
    );

    Ok(())
}
