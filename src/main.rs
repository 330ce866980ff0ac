use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use golf_tracker::api::state::AppState;
use golf_tracker::api::{build_router, cors_layer};
use golf_tracker::calculate::{
    build_overview, calculate_handicap_history_in_window, rounds_to_use,
};
use golf_tracker::config::AppConfig;
use golf_tracker::models::{
    HandicapStatus, NewReview, NewRound, PlayerId, PlayerStats, RoundId, Weather,
};
use golf_tracker::storage::{Repository, StorageConfig};

#[derive(Parser)]
#[command(name = "golf-tracker")]
#[command(about = "Golf round tracker with a simplified handicap index")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Register a player
    AddPlayer {
        name: String,

        #[arg(long)]
        favorite_course: Option<String>,
    },

    /// List players
    Players,

    /// Record a round
    AddRound {
        /// Player id
        #[arg(long)]
        player: String,

        /// Date played (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        #[arg(long)]
        course: String,

        #[arg(long)]
        tee: String,

        /// Course rating
        #[arg(long)]
        rating: f64,

        /// Slope rating
        #[arg(long)]
        slope: i32,

        /// Gross score
        #[arg(long)]
        score: i32,
    },

    /// List a player's rounds, newest first
    Rounds {
        #[arg(long)]
        player: String,
    },

    /// Show a player's handicap index
    Handicap {
        #[arg(long)]
        player: String,
    },

    /// Show a player's handicap trend
    History {
        #[arg(long)]
        player: String,

        /// Window in months (defaults to the configured window)
        #[arg(long)]
        months: Option<u32>,
    },

    /// Dashboard summary of every player
    Overview,

    /// Review a course
    AddReview {
        #[arg(long)]
        course: String,

        /// Difficulty, 1 to 5
        #[arg(long)]
        difficulty: u8,

        /// Overall rating, 1 to 5
        #[arg(long)]
        overall: u8,

        #[arg(long, default_value = "sunny")]
        weather: String,

        #[arg(long)]
        text: Option<String>,

        /// Round this review belongs to
        #[arg(long)]
        round: Option<String>,
    },

    /// Aggregate reviews for a course
    CourseStats {
        #[arg(long)]
        course: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::debug!(data_dir = %config.data_dir.display(), "Using data directory");

    let repo = Repository::new(StorageConfig::new(config.data_dir.clone()));

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            tracing::info!("Starting golf-tracker v{}", env!("CARGO_PKG_VERSION"));

            let state = AppState::new(repo, config.handicap.history_months);
            let app = build_router(state).layer(cors_layer(&config.server.cors_origin));

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::AddPlayer {
            name,
            favorite_course,
        } => {
            let player = repo.add_player(&name, favorite_course.as_deref())?;
            println!("Added player {} ({})", player.name, player.id);
        }
        Commands::Players => {
            let players = repo.list_players()?;
            if players.is_empty() {
                println!("No players yet");
            }
            for player in players {
                let rounds = repo.rounds_for_player(&player.id)?;
                let stats = PlayerStats::from_rounds(&rounds);
                println!(
                    "{:<18} {:<24} rounds: {:>3}  handicap: {}",
                    player.id, player.name, stats.total_rounds, stats.handicap
                );
            }
        }
        Commands::AddRound {
            player,
            date,
            course,
            tee,
            rating,
            slope,
            score,
        } => {
            let new = NewRound {
                player_id: PlayerId::from(player),
                date: NewRound::parse_date(&date)?,
                course,
                tee,
                rating,
                slope,
                score,
            };
            let round = repo.add_round(new)?;
            println!(
                "Recorded round {} (differential {:.1})",
                round.id,
                round.differential()
            );
        }
        Commands::Rounds { player } => {
            let id = PlayerId::from(player);
            let player = repo.get_player(&id)?;
            let rounds = repo.rounds_for_player(&id)?;
            println!("{} rounds for {}", rounds.len(), player.name);
            for round in rounds {
                let reviewed = repo.review_for_round(&round.id)?.is_some();
                println!(
                    "{}  {:<24} {:<8} {:>5.1}/{:<3} {:>3}  diff {:>5.1}{}",
                    round.date,
                    round.course,
                    round.tee,
                    round.rating,
                    round.slope,
                    round.score,
                    round.differential(),
                    if reviewed { "  *" } else { "" }
                );
            }
        }
        Commands::Handicap { player } => {
            let id = PlayerId::from(player);
            let player = repo.get_player(&id)?;
            let rounds = repo.rounds_for_player(&id)?;
            let status = HandicapStatus::from_rounds(&rounds);
            match (status.band(), rounds_to_use(rounds.len())) {
                (Some(band), Some(used)) => println!(
                    "{}: {} ({}), best {} of {} rounds",
                    player.name,
                    status,
                    band,
                    used,
                    rounds.len()
                ),
                _ => println!(
                    "{}: {} ({} of 3 rounds recorded)",
                    player.name,
                    status,
                    rounds.len()
                ),
            }
        }
        Commands::History { player, months } => {
            let months = months.unwrap_or(config.handicap.history_months);
            if months == 0 {
                bail!("--months must be at least 1");
            }
            let id = PlayerId::from(player);
            let player = repo.get_player(&id)?;
            let rounds = repo.rounds_for_player(&id)?;
            let today = Utc::now().date_naive();
            let points = calculate_handicap_history_in_window(&rounds, today, months);

            println!("{} over the last {} months", player.name, months);
            for point in points {
                println!(
                    "{}  {:>5.1}  ({} rounds)",
                    point.date, point.handicap, point.sample_size
                );
            }
        }
        Commands::Overview => {
            let players = repo.list_players()?;
            let rounds = repo.all_rounds()?;
            for row in build_overview(&players, &rounds) {
                let last = match (&row.last_date, &row.last_course, row.last_score) {
                    (Some(date), Some(course), Some(score)) => {
                        format!("{} at {} on {}", score, course, date)
                    }
                    _ => "no rounds".to_string(),
                };
                println!(
                    "{:<24} {:>5}  {:>3} rounds  last: {}",
                    row.player_name,
                    row.handicap.to_string(),
                    row.total_rounds,
                    last
                );
            }
        }
        Commands::AddReview {
            course,
            difficulty,
            overall,
            weather,
            text,
            round,
        } => {
            let weather: Weather = weather.parse()?;
            let review = repo.add_review(NewReview {
                round_id: round.map(RoundId::from),
                course_name: course,
                difficulty_rating: difficulty,
                weather,
                overall_rating: overall,
                review_text: text,
            })?;
            println!("Added review {} for {}", review.id, review.course_name);
        }
        Commands::CourseStats { course } => match repo.course_stats(&course)? {
            Some(stats) => {
                println!(
                    "{}: {} reviews, difficulty {:.1}, overall {:.1}",
                    stats.course_name, stats.total_reviews, stats.avg_difficulty, stats.avg_overall
                );
                for review in stats.reviews {
                    println!(
                        "  {}  {}/5  {}  {}",
                        review.created_at.date_naive(),
                        review.overall_rating,
                        review.weather,
                        review.review_text.unwrap_or_default()
                    );
                }
            }
            None => println!("No reviews for {}", course),
        },
    }

    Ok(())
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
