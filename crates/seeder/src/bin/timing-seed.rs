use chrono::Duration;
use clap::{Parser, Subcommand};
use seeder::{issue_token, load_fixtures, ttl_from_minutes};
use storage::{Database, repository::Repositories};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "timing-seed")]
#[command(about = "Race timing fixtures and judge tokens", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(long, env = "JWT_SECRET")]
    jwt_secret: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a sample competition with two judges and their teams
    Fixtures {
        #[arg(long, default_value = "ws://localhost:8000")]
        ws_base: String,
    },
    /// Print a signed access token for a judge
    Token {
        #[arg(long)]
        judge_id: i64,

        #[arg(long, default_value_t = 60)]
        ttl_minutes: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("timing_seed={},seeder={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::new(&cli.database_url).await?;
    db.run_migrations().await?;
    let repos = Repositories::postgres(&db);

    match cli.command {
        Commands::Fixtures { ws_base } => {
            handle_fixtures(&repos, &cli.jwt_secret, &ws_base).await?;
        }
        Commands::Token {
            judge_id,
            ttl_minutes,
        } => {
            handle_token(&repos, &cli.jwt_secret, judge_id, ttl_minutes).await?;
        }
    }

    Ok(())
}

async fn handle_fixtures(
    repos: &Repositories,
    secret: &str,
    ws_base: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let summary = load_fixtures(repos).await?;

    println!(
        "Competition {} ({}): {}",
        summary.competition.competition_id,
        summary.competition.category.label(),
        summary.competition.name
    );

    for (judge, teams) in &summary.judges {
        println!();
        println!(
            "Judge {} {} ({})",
            judge.judge_id,
            judge.username,
            judge.full_name()
        );
        for team in teams {
            println!("  team {} #{} {}", team.team_id, team.bib_number, team.name);
        }

        let token = issue_token(
            secret.as_bytes(),
            judge.judge_id,
            Some(&judge.username),
            Duration::minutes(60),
        )?;
        println!("  {}/ws/juez/{}/?token={}", ws_base, judge.judge_id, token);
    }

    Ok(())
}

async fn handle_token(
    repos: &Repositories,
    secret: &str,
    judge_id: i64,
    ttl_minutes: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let judge = repos.judges.find_by_id(judge_id).await?;
    if !judge.is_active {
        tracing::warn!(judge_id, "Judge is inactive; the token will be refused");
    }

    let token = issue_token(
        secret.as_bytes(),
        judge.judge_id,
        Some(&judge.username),
        ttl_from_minutes(ttl_minutes)?,
    )?;
    println!("{}", token);

    Ok(())
}
