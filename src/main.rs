use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use venu_stats::cli_style::{
    get_styles, print_empty_list, print_error, print_key_value, print_key_value_highlight,
    print_list_item, print_section_footer, print_section_header, print_success, print_warning,
    TableBuilder,
};
use venu_stats::concert_events::{ConcertStore, ConcertUpdate, SqliteConcertStore};
use venu_stats::concert_stats::{
    create_candidate_generator, RecommendationStrategy, RecommendationValidator, RecordState,
    SqliteStatsStore, StatsStore, SummarySynthesizer,
};
use venu_stats::config::{self, AppConfig, FileConfig};
use venu_stats::media_albums::{AlbumStore, MediaAlbum, MediaType, SqliteAlbumStore};
use venu_stats::metadata::{MetadataResolver, MusicBrainzClient};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(path_buf))
}

/// Accepts `YYYY-MM-DD` (midnight UTC) or a full RFC 3339 timestamp.
fn parse_date(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD or RFC 3339", s))
}

#[derive(Parser)]
#[command(name = "venu-stats", version, styles = get_styles())]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory containing database files (stats.db, concerts.db, albums.db).
    /// Can also be specified in config file.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// How recommendations are proposed.
    #[clap(long, value_enum)]
    pub strategy: Option<RecommendationStrategy>,

    /// Client identifier sent to MusicBrainz, e.g. "my-app/1.0".
    #[clap(long)]
    pub musicbrainz_user_agent: Option<String>,

    /// Contact URL or email sent to MusicBrainz with the user agent.
    #[clap(long)]
    pub musicbrainz_contact: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_dir: args.db_dir.clone(),
            strategy: args.strategy,
            musicbrainz_user_agent: args.musicbrainz_user_agent.clone(),
            musicbrainz_contact: args.musicbrainz_contact.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    #[command(flatten)]
    Stats(StatsCommand),

    /// Manages concert events.
    #[command(subcommand)]
    Concert(ConcertCommand),

    /// Manages media albums.
    #[command(subcommand)]
    Album(AlbumCommand),
}

#[derive(Subcommand)]
enum StatsCommand {
    /// Creates an empty stats record for a user.
    InitUser { user: String },

    /// Logs a concert the user attended.
    Log {
        user: String,
        #[clap(long)]
        artist: String,
        #[clap(long)]
        venue: String,
        #[clap(long, value_parser = parse_date)]
        date: DateTime<Utc>,
    },

    /// Removes the oldest logged concert matching artist and venue.
    Remove {
        user: String,
        #[clap(long)]
        artist: String,
        #[clap(long)]
        venue: String,
    },

    /// Prints the user's attendance history.
    History { user: String },

    /// Generates the summary and artist recommendations for a user.
    Summarize { user: String },

    /// Shows the stored summary and recommendations.
    Show { user: String },
}

#[derive(Subcommand)]
enum ConcertCommand {
    /// Adds a concert.
    Add {
        user: String,
        #[clap(long)]
        artist: String,
        #[clap(long, value_parser = parse_date)]
        date: DateTime<Utc>,
        #[clap(long)]
        venue: String,
        #[clap(long)]
        city: String,
    },

    /// Edits the given fields of a concert.
    Edit {
        concert: String,
        #[clap(long)]
        artist: Option<String>,
        #[clap(long, value_parser = parse_date)]
        date: Option<DateTime<Utc>>,
        #[clap(long)]
        venue: Option<String>,
        #[clap(long)]
        city: Option<String>,
    },

    /// Deletes a concert owned by the user.
    Delete { user: String, concert: String },

    /// Lists the user's concerts.
    List { user: String },
}

#[derive(Subcommand)]
enum AlbumCommand {
    /// Creates the user's album for a concert.
    Create { user: String, concert: String },

    /// Adds a photo or video URL to an album.
    Upload {
        user: String,
        album: String,
        url: String,
        #[clap(long = "type", value_enum, default_value = "photo")]
        media_type: MediaType,
        /// Upload time, defaults to now.
        #[clap(long, value_parser = parse_date)]
        at: Option<DateTime<Utc>>,
    },

    /// Shows an album and its media.
    Show { album: String },

    /// Lists the user's albums for a concert.
    List { user: String, concert: String },
}

#[tokio::main]
async fn main() {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .init();

    if let Err(e) = run(cli_args).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli_args: CliArgs) -> Result<()> {
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let cli_config = config::CliConfig::from(&cli_args);
    let app_config = AppConfig::resolve(&cli_config, file_config)?;

    match cli_args.command {
        Command::Concert(command) => {
            let store = SqliteConcertStore::new(app_config.concerts_db_path())?;
            run_concert_command(&store, command)
        }
        Command::Album(command) => {
            let albums = SqliteAlbumStore::new(app_config.albums_db_path())?;
            let concerts = SqliteConcertStore::new(app_config.concerts_db_path())?;
            run_album_command(&albums, &concerts, command)
        }
        Command::Stats(command) => {
            let store: Arc<dyn StatsStore> =
                Arc::new(SqliteStatsStore::new(app_config.stats_db_path())?);
            run_stats_command(&app_config, store, command).await
        }
    }
}

fn build_synthesizer(config: &AppConfig, store: Arc<dyn StatsStore>) -> Result<SummarySynthesizer> {
    let mb = &config.musicbrainz;
    let resolver: Arc<dyn MetadataResolver> = Arc::new(MusicBrainzClient::new(
        &mb.base_url,
        &mb.user_agent,
        mb.timeout(),
        mb.min_request_interval(),
    )?);
    let generator = create_candidate_generator(
        config.recommendations.strategy,
        resolver.clone(),
        config.recommendations.tag_search_limit,
        &config.llm,
    )?;
    Ok(SummarySynthesizer::new(
        store,
        generator,
        RecommendationValidator::new(resolver),
    ))
}

async fn run_stats_command(
    config: &AppConfig,
    store: Arc<dyn StatsStore>,
    command: StatsCommand,
) -> Result<()> {
    match command {
        StatsCommand::InitUser { user } => {
            store.initialize_user(&user)?;
            print_success(&format!("Initialized stats for {}", user));
        }
        StatsCommand::Log {
            user,
            artist,
            venue,
            date,
        } => {
            let entry = store.append_entry(&user, &artist, &venue, date)?;
            print_success(&format!(
                "Logged {} at {} on {}",
                entry.artist,
                entry.venue,
                entry.date.format("%Y-%m-%d")
            ));
        }
        StatsCommand::Remove {
            user,
            artist,
            venue,
        } => {
            if store.remove_entry(&user, &artist, &venue)? {
                print_success(&format!("Removed {} at {}", artist, venue));
            } else {
                print_warning(&format!("No entry for {} at {}", artist, venue));
            }
        }
        StatsCommand::History { user } => {
            let history = store.get_history(&user)?;
            print_section_header(&format!("History of {}", user));
            if history.is_empty() {
                print_empty_list("No concerts logged yet");
            } else {
                let mut table = TableBuilder::new(&["#", "Date", "Artist", "Venue"]);
                for (i, entry) in history.iter().enumerate() {
                    table.add_row(vec![
                        (i + 1).to_string(),
                        entry.date.format("%Y-%m-%d").to_string(),
                        entry.artist.clone(),
                        entry.venue.clone(),
                    ]);
                }
                table.print();
            }
            print_section_footer();
        }
        StatsCommand::Summarize { user } => {
            let synthesizer = build_synthesizer(config, store)?;
            let outcome = synthesizer
                .generate_summary(&user)
                .await
                .with_context(|| format!("Summary for {} failed", user))?;
            print_section_header(&format!("Summary for {}", user));
            print_key_value_highlight("Summary", &outcome.summary);
            print_key_value("Strategy", synthesizer.strategy_name());
            print_key_value("Recommendations", "");
            for name in &outcome.recommendations {
                print_list_item(name);
            }
            print_section_footer();
        }
        StatsCommand::Show { user } => {
            let record = store.get_record(&user)?;
            let state = RecordState::of(record.as_ref());
            let Some(record) = record else {
                bail!("No stats record for {}", user);
            };
            print_section_header(&format!("Stats for {}", user));
            print_key_value("State", &state.to_string());
            print_key_value("Concerts logged", &record.history.len().to_string());
            print_key_value(
                "Updated",
                &record.updated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            );
            match &record.summary {
                Some(summary) => print_key_value_highlight("Summary", summary),
                None => print_key_value("Summary", "not generated yet"),
            }
            let recommendations = record.recommendations.unwrap_or_default();
            if !recommendations.is_empty() {
                print_key_value("Recommendations", "");
                for name in &recommendations {
                    print_list_item(name);
                }
            }
            print_section_footer();
        }
    }
    Ok(())
}

fn run_concert_command(store: &dyn ConcertStore, command: ConcertCommand) -> Result<()> {
    match command {
        ConcertCommand::Add {
            user,
            artist,
            date,
            venue,
            city,
        } => {
            let concert = store.add_concert(&user, &artist, date, &venue, &city)?;
            print_success(&format!("Added concert {}", concert.id));
        }
        ConcertCommand::Edit {
            concert,
            artist,
            date,
            venue,
            city,
        } => {
            let update = ConcertUpdate {
                artist,
                date,
                venue,
                city,
            };
            let edited = store.edit_concert_details(&concert, &update)?;
            print_success(&format!(
                "Updated {}: {} at {}, {} on {}",
                edited.id,
                edited.artist,
                edited.venue,
                edited.city,
                edited.date.format("%Y-%m-%d")
            ));
        }
        ConcertCommand::Delete { user, concert } => {
            store.delete_concert(&user, &concert)?;
            print_success(&format!("Deleted concert {}", concert));
        }
        ConcertCommand::List { user } => {
            let concerts = store.get_concerts_by_user(&user)?;
            print_section_header(&format!("Concerts of {}", user));
            if concerts.is_empty() {
                print_empty_list("No concerts");
            } else {
                let mut table = TableBuilder::new(&["Id", "Date", "Artist", "Venue", "City"]);
                for c in concerts {
                    table.add_row(vec![
                        c.id,
                        c.date.format("%Y-%m-%d").to_string(),
                        c.artist,
                        c.venue,
                        c.city,
                    ]);
                }
                table.print();
            }
            print_section_footer();
        }
    }
    Ok(())
}

fn print_album(album: &MediaAlbum) {
    print_section_header(&format!("Album {}", album.id));
    print_key_value("Owner", &album.owner);
    print_key_value("Concert", &album.concert);
    print_key_value(
        "Created",
        &album.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );
    if album.items.is_empty() {
        print_empty_list("No media yet");
    } else {
        let mut table = TableBuilder::new(&["Type", "Uploaded", "Url"]);
        for item in &album.items {
            table.add_row(vec![
                item.media_type.to_string(),
                item.upload_timestamp.format("%Y-%m-%d %H:%M").to_string(),
                item.url.clone(),
            ]);
        }
        table.print();
    }
    print_section_footer();
}

fn run_album_command(
    albums: &dyn AlbumStore,
    concerts: &dyn ConcertStore,
    command: AlbumCommand,
) -> Result<()> {
    match command {
        AlbumCommand::Create { user, concert } => {
            if concerts.get_concert(&concert)?.is_none() {
                bail!("Concert with ID '{}' not found", concert);
            }
            let album = albums.create_album(&user, &concert)?;
            print_success(&format!("Created album {}", album.id));
        }
        AlbumCommand::Upload {
            user,
            album,
            url,
            media_type,
            at,
        } => {
            let item =
                albums.upload_media(&user, &album, &url, at.unwrap_or_else(Utc::now), media_type)?;
            print_success(&format!("Added {} {}", item.media_type, item.id));
        }
        AlbumCommand::Show { album } => {
            print_album(&albums.get_media_album(&album)?);
        }
        AlbumCommand::List { user, concert } => {
            let found = albums.get_albums_by_user_and_concert(&user, &concert)?;
            if found.is_empty() {
                print_empty_list("No albums for this concert");
            }
            for album in &found {
                print_album(album);
            }
        }
    }
    Ok(())
}
