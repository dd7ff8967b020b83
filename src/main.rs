// src/main.rs
//
// Command line front end. Every command opens the database, logs in when a
// role is needed, runs one session operation and prints the result as JSON.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use uuid::Uuid;

use cinehub::application::session::parse_promo_scope;
use cinehub::application::{AppState, ErrorResponse, Session, SessionController};
use cinehub::config::AppConfig;
use cinehub::db::{get_connection, get_database_stats, verify_database_integrity};
use cinehub::domain::{CastRole, Role, TitleKind, TitleRef};
use cinehub::error::{AppError, AppResult};
use cinehub::services::{
    CreateAccountRequest, CreateEpisodeRequest, CreateFilmRequest, CreatePromoRequest,
    CreateSeriesRequest,
};

#[derive(Parser, Debug)]
#[command(name = "cinehub", version, about = "Cinema and media catalog manager")]
struct Cli {
    /// SQLite database file (defaults to the platform data directory)
    #[arg(long, global = true, env = "CINEHUB_DATABASE")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Login {
    /// Account username
    #[arg(long, short)]
    user: String,

    #[arg(long, env = "CINEHUB_PASSWORD", hide_env_values = true)]
    password: String,
}

/// Selects a film or a series by id
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct TitleArgs {
    #[arg(long)]
    film: Option<Uuid>,

    #[arg(long)]
    series: Option<Uuid>,
}

impl TitleArgs {
    fn title_ref(&self) -> AppResult<TitleRef> {
        self.film
            .map(TitleRef::film)
            .or_else(|| self.series.map(TitleRef::series))
            .ok_or_else(|| AppError::Other("pass --film or --series".to_string()))
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RankingKind {
    Reviewers,
    Directors,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the schema and the first administrator
    Init {
        #[arg(long, default_value = "admin")]
        admin_user: String,
        #[arg(long, env = "CINEHUB_PASSWORD", hide_env_values = true)]
        admin_password: String,
    },
    /// Database size, row counts and integrity
    Stats,
    /// Self-register a User account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CINEHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },

    // ---- browsing (any role) ----
    Films {
        #[command(flatten)]
        login: Login,
    },
    Series {
        #[command(flatten)]
        login: Login,
    },
    /// Show one film or series with cast, seasons and rating
    Show {
        #[command(flatten)]
        login: Login,
        #[command(flatten)]
        title: TitleArgs,
    },
    Search {
        #[command(flatten)]
        login: Login,
        query: String,
    },
    Genres {
        #[command(flatten)]
        login: Login,
    },
    ByGenre {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        genre: Uuid,
    },
    Cinemas {
        #[command(flatten)]
        login: Login,
    },
    /// Promos active today, optionally only those applying to one title
    Promos {
        #[command(flatten)]
        login: Login,
        #[arg(long, conflicts_with = "series")]
        film: Option<Uuid>,
        #[arg(long)]
        series: Option<Uuid>,
    },
    Reviews {
        #[command(flatten)]
        login: Login,
        #[command(flatten)]
        title: TitleArgs,
    },
    Rank {
        #[command(flatten)]
        login: Login,
        kind: RankingKind,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },

    // ---- user ----
    Review {
        #[command(flatten)]
        login: Login,
        #[command(flatten)]
        title: TitleArgs,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
    },
    /// Delete a review (own reviews, or any review as administrator)
    DeleteReview {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        id: Uuid,
    },
    MyReviews {
        #[command(flatten)]
        login: Login,
    },
    Request {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        title: String,
        #[arg(long)]
        kind: TitleKind,
        #[arg(long)]
        note: Option<String>,
    },
    MyRequests {
        #[command(flatten)]
        login: Login,
    },
    MyCards {
        #[command(flatten)]
        login: Login,
    },
    Passwd {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        new_password: String,
    },

    // ---- registrar ----
    CardRegister {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        username: String,
    },
    CardRenew {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        card: Uuid,
    },
    CinemaCards {
        #[command(flatten)]
        login: Login,
    },

    // ---- administrator ----
    AddCinema {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        address: Option<String>,
    },
    AddGenre {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        name: String,
    },
    AddPerson {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        name: String,
    },
    AddFilm {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        title: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        minutes: u32,
        #[arg(long)]
        synopsis: Option<String>,
        #[arg(long = "genre")]
        genres: Vec<Uuid>,
    },
    AddSeries {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        title: String,
        #[arg(long)]
        start_year: i32,
        #[arg(long)]
        end_year: Option<i32>,
        #[arg(long)]
        synopsis: Option<String>,
        #[arg(long = "genre")]
        genres: Vec<Uuid>,
    },
    AddSeason {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        series: Uuid,
        #[arg(long)]
        number: u32,
        #[arg(long)]
        year: Option<i32>,
    },
    AddEpisode {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        series: Uuid,
        #[arg(long)]
        season: u32,
        #[arg(long)]
        number: u32,
        #[arg(long)]
        title: String,
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Credit a person on a film, or on a season with --series and --season
    AddCast {
        #[command(flatten)]
        login: Login,
        #[arg(long, conflicts_with = "series")]
        film: Option<Uuid>,
        #[arg(long, requires = "season")]
        series: Option<Uuid>,
        #[arg(long)]
        season: Option<u32>,
        #[arg(long)]
        person: Uuid,
        /// actor, director or writer
        #[arg(long)]
        role: String,
        #[arg(long)]
        character: Option<String>,
    },
    SetGenres {
        #[command(flatten)]
        login: Login,
        #[command(flatten)]
        title: TitleArgs,
        #[arg(long = "genre")]
        genres: Vec<Uuid>,
    },
    DeleteTitle {
        #[command(flatten)]
        login: Login,
        #[command(flatten)]
        title: TitleArgs,
    },
    CreateAccount {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        role: Role,
        #[arg(long)]
        cinema: Option<Uuid>,
        #[arg(long)]
        username: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        account_password: String,
    },
    Accounts {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        role: Role,
    },
    CreatePromo {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        description: String,
        #[arg(long)]
        percentage: u8,
        /// Last valid day, YYYY-MM-DD
        #[arg(long)]
        expires: NaiveDate,
        /// global, genre:<id>, film:<id> or series:<id>
        #[arg(long, default_value = "global")]
        scope: String,
    },
    AllPromos {
        #[command(flatten)]
        login: Login,
    },
    DeletePromo {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        id: Uuid,
    },
    OpenRequests {
        #[command(flatten)]
        login: Login,
    },
    CloseRequest {
        #[command(flatten)]
        login: Login,
        #[arg(long)]
        id: Uuid,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let state = match open_state(cli.database) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("cinehub: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(state, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let response = ErrorResponse::from(e);
            match serde_json::to_string_pretty(&response) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("cinehub: {}", response.message),
            }
            ExitCode::FAILURE
        }
    }
}

fn open_state(database: Option<PathBuf>) -> anyhow::Result<Arc<AppState>> {
    let config = AppConfig::resolve(database).context("loading configuration")?;
    log::debug!("using database {}", config.database_path.display());

    let state = AppState::bootstrap(&config)
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    Ok(Arc::new(state))
}

fn print<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn login(state: &Arc<AppState>, login: &Login) -> AppResult<Session> {
    SessionController::login(state.clone(), &login.user, &login.password)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn run(state: Arc<AppState>, command: Command) -> AppResult<()> {
    match command {
        Command::Init {
            admin_user,
            admin_password,
        } => {
            match state
                .auth_service
                .ensure_administrator(&admin_user, &admin_password)?
            {
                Some(admin) => log::info!("created administrator '{}'", admin.username),
                None => log::info!("an administrator already exists"),
            }
            print(&serde_json::json!({ "initialized": true }))
        }
        Command::Stats => {
            let conn = get_connection(&state.pool)?;
            let integrity_ok = verify_database_integrity(&conn).is_ok();
            let stats = get_database_stats(&conn)?;
            print(&serde_json::json!({ "integrity_ok": integrity_ok, "stats": stats }))
        }
        Command::Register {
            username,
            full_name,
            email,
            password,
        } => {
            let account = state.auth_service.register_user(CreateAccountRequest {
                username,
                full_name,
                email,
                password,
            })?;
            print(&cinehub::dto::AccountDto::from(account))
        }

        Command::Films { login: l } => print(&login(&state, &l)?.browse().list_films()?),
        Command::Series { login: l } => print(&login(&state, &l)?.browse().list_series()?),
        Command::Show { login: l, title } => {
            let session = login(&state, &l)?;
            let browse = session.browse();
            let title = title.title_ref()?;
            let rating = browse.average_rating(title)?;
            let discount = browse.best_discount(title, today())?;
            match title.kind {
                TitleKind::Film => print(&serde_json::json!({
                    "film": browse.get_film(title.id)?,
                    "rating": rating,
                    "best_discount": discount,
                })),
                TitleKind::Series => print(&serde_json::json!({
                    "series": browse.get_series(title.id)?,
                    "rating": rating,
                    "best_discount": discount,
                })),
            }
        }
        Command::Search { login: l, query } => {
            print(&login(&state, &l)?.browse().search(&query)?)
        }
        Command::Genres { login: l } => print(&login(&state, &l)?.browse().list_genres()?),
        Command::ByGenre { login: l, genre } => {
            print(&login(&state, &l)?.browse().list_by_genre(genre)?)
        }
        Command::Cinemas { login: l } => print(&login(&state, &l)?.browse().list_cinemas()?),
        Command::Promos {
            login: l,
            film,
            series,
        } => {
            let session = login(&state, &l)?;
            let title = film.map(TitleRef::film).or(series.map(TitleRef::series));
            match title {
                Some(title) => print(&session.browse().promos_for_title(title, today())?),
                None => print(&session.browse().active_promos(today())?),
            }
        }
        Command::Reviews { login: l, title } => {
            print(&login(&state, &l)?.browse().reviews_for_title(title.title_ref()?)?)
        }
        Command::Rank {
            login: l,
            kind,
            limit,
        } => {
            let session = login(&state, &l)?;
            match kind {
                RankingKind::Reviewers => print(&session.browse().top_reviewers(limit)?),
                RankingKind::Directors => print(&session.browse().top_directors(limit)?),
            }
        }

        Command::Review {
            login: l,
            title,
            rating,
            comment,
        } => {
            let session = login(&state, &l)?;
            print(&session.as_user()?.post_review(title.title_ref()?, rating, comment)?)
        }
        Command::DeleteReview { login: l, id } => {
            match login(&state, &l)? {
                Session::Admin(admin) => admin.delete_review(id)?,
                Session::User(user) => user.delete_review(id)?,
                Session::Registrar(_) => {
                    return Err(AppError::Forbidden(
                        "registrars cannot delete reviews".to_string(),
                    ))
                }
            }
            print(&serde_json::json!({ "deleted": id }))
        }
        Command::MyReviews { login: l } => print(&login(&state, &l)?.as_user()?.my_reviews()?),
        Command::Request {
            login: l,
            title,
            kind,
            note,
        } => {
            let session = login(&state, &l)?;
            print(&session.as_user()?.submit_request(title, kind, note)?)
        }
        Command::MyRequests { login: l } => {
            print(&login(&state, &l)?.as_user()?.my_requests()?)
        }
        Command::MyCards { login: l } => print(&login(&state, &l)?.as_user()?.my_cards(today())?),
        Command::Passwd {
            login: l,
            new_password,
        } => {
            let session = login(&state, &l)?;
            session
                .as_user()?
                .change_password(&l.password, &new_password)?;
            print(&serde_json::json!({ "password_changed": true }))
        }

        Command::CardRegister { login: l, username } => {
            let session = login(&state, &l)?;
            print(&session.as_registrar()?.register_card(&username, today())?)
        }
        Command::CardRenew { login: l, card } => {
            let session = login(&state, &l)?;
            print(&session.as_registrar()?.renew_card(card, today())?)
        }
        Command::CinemaCards { login: l } => {
            print(&login(&state, &l)?.as_registrar()?.cinema_cards(today())?)
        }

        Command::AddCinema {
            login: l,
            name,
            city,
            address,
        } => {
            let session = login(&state, &l)?;
            print(&session.as_admin()?.add_cinema(name, city, address)?)
        }
        Command::AddGenre { login: l, name } => {
            print(&login(&state, &l)?.as_admin()?.add_genre(name)?)
        }
        Command::AddPerson { login: l, name } => {
            print(&login(&state, &l)?.as_admin()?.add_person(name)?)
        }
        Command::AddFilm {
            login: l,
            title,
            year,
            minutes,
            synopsis,
            genres,
        } => {
            let session = login(&state, &l)?;
            print(&session.as_admin()?.add_film(CreateFilmRequest {
                title,
                release_year: year,
                duration_minutes: minutes,
                synopsis,
                genre_ids: genres,
            })?)
        }
        Command::AddSeries {
            login: l,
            title,
            start_year,
            end_year,
            synopsis,
            genres,
        } => {
            let session = login(&state, &l)?;
            print(&session.as_admin()?.add_series(CreateSeriesRequest {
                title,
                start_year,
                end_year,
                synopsis,
                genre_ids: genres,
            })?)
        }
        Command::AddSeason {
            login: l,
            series,
            number,
            year,
        } => {
            let session = login(&state, &l)?;
            print(&session.as_admin()?.add_season(series, number, year)?)
        }
        Command::AddEpisode {
            login: l,
            series,
            season,
            number,
            title,
            minutes,
        } => {
            let session = login(&state, &l)?;
            print(&session.as_admin()?.add_episode(CreateEpisodeRequest {
                series_id: series,
                season_number: season,
                number,
                title,
                duration_minutes: minutes,
            })?)
        }
        Command::AddCast {
            login: l,
            film,
            series,
            season,
            person,
            role,
            character,
        } => {
            let session = login(&state, &l)?;
            let admin = session.as_admin()?;
            let role = CastRole::from_parts(role.trim(), character)?;
            match (film, series, season) {
                (Some(film_id), _, _) => print(&admin.add_film_cast_member(film_id, person, role)?),
                (None, Some(series_id), Some(season)) => print(
                    &admin.add_season_cast_member(series_id, season, person, role)?,
                ),
                _ => Err(AppError::Other(
                    "pass --film, or --series with --season".to_string(),
                )),
            }
        }
        Command::SetGenres {
            login: l,
            title,
            genres,
        } => {
            let session = login(&state, &l)?;
            session.as_admin()?.set_genres(title.title_ref()?, &genres)?;
            print(&serde_json::json!({ "genres": genres }))
        }
        Command::DeleteTitle { login: l, title } => {
            let session = login(&state, &l)?;
            let title = title.title_ref()?;
            session.as_admin()?.delete_title(title)?;
            print(&serde_json::json!({ "deleted": title }))
        }
        Command::CreateAccount {
            login: l,
            role,
            cinema,
            username,
            full_name,
            email,
            account_password,
        } => {
            let session = login(&state, &l)?;
            let request = CreateAccountRequest {
                username,
                full_name,
                email,
                password: account_password,
            };
            print(&session.as_admin()?.create_account(request, role, cinema)?)
        }
        Command::Accounts { login: l, role } => {
            print(&login(&state, &l)?.as_admin()?.list_accounts(role)?)
        }
        Command::CreatePromo {
            login: l,
            description,
            percentage,
            expires,
            scope,
        } => {
            let session = login(&state, &l)?;
            print(&session.as_admin()?.create_promo(CreatePromoRequest {
                description,
                percentage,
                expires_on: expires,
                scope: parse_promo_scope(&scope)?,
            })?)
        }
        Command::AllPromos { login: l } => print(&login(&state, &l)?.as_admin()?.list_promos()?),
        Command::DeletePromo { login: l, id } => {
            login(&state, &l)?.as_admin()?.delete_promo(id)?;
            print(&serde_json::json!({ "deleted": id }))
        }
        Command::OpenRequests { login: l } => {
            print(&login(&state, &l)?.as_admin()?.open_requests()?)
        }
        Command::CloseRequest { login: l, id } => {
            print(&login(&state, &l)?.as_admin()?.close_request(id)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_explicit_database_is_opened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cinehub.db");

        let cli = Cli::try_parse_from([
            "cinehub", "--database", path.to_str().unwrap(), "init", "--admin-password",
            "admin password",
        ])
        .unwrap();
        assert_eq!(cli.database.as_deref(), Some(path.as_path()));

        let state = open_state(cli.database).unwrap();
        run(state.clone(), cli.command).unwrap();

        assert!(path.exists());
        assert!(state.auth_service.login("admin", "admin password").is_ok());
    }

    #[test]
    fn test_review_requires_exactly_one_title() {
        let id = Uuid::new_v4();
        let raw = id.to_string();

        let both = Cli::try_parse_from([
            "cinehub", "review", "--user", "giulia", "--password", "x", "--rating", "4",
            "--film", raw.as_str(), "--series", raw.as_str(),
        ]);
        assert!(both.is_err());

        let cli = Cli::try_parse_from([
            "cinehub", "review", "--user", "giulia", "--password", "x", "--rating", "4",
            "--series", raw.as_str(),
        ])
        .unwrap();
        match cli.command {
            Command::Review { title, .. } => {
                assert_eq!(title.title_ref().unwrap(), TitleRef::series(id))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
