//! Populates the configured database with two teams and a hundred members.

use std::env;

use dotenvy::dotenv;

use member_search::db::{establish_connection_pool, run_migrations};
use member_search::domain::member::NewMember;
use member_search::domain::team::NewTeam;
use member_search::domain::types::{Age, TeamName, Username};
use member_search::models::config::ServerConfig;
use member_search::repository::errors::{RepositoryError, RepositoryResult};
use member_search::repository::{DieselRepository, MemberWriter, TeamWriter};

const MEMBER_COUNT: i32 = 100;

fn seed<R>(repo: &R) -> RepositoryResult<usize>
where
    R: TeamWriter + MemberWriter,
{
    let team_a = repo.create_team(&NewTeam::new(
        TeamName::new("teamA").map_err(RepositoryError::from)?,
    ))?;
    let team_b = repo.create_team(&NewTeam::new(
        TeamName::new("teamB").map_err(RepositoryError::from)?,
    ))?;

    for i in 0..MEMBER_COUNT {
        let team = if i % 2 == 0 { &team_a } else { &team_b };
        let username = Username::new(format!("member{i}")).map_err(RepositoryError::from)?;
        let age = Age::new(i).map_err(RepositoryError::from)?;
        repo.create_member(&NewMember::new(Some(username), age, Some(team.id)))?;
    }

    Ok(MEMBER_COUNT as usize)
}

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let server_config = match ServerConfig::load(&app_env) {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(err) => {
            log::error!("Failed to establish database connection: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_migrations(&pool) {
        log::error!("{err}");
        std::process::exit(1);
    }

    let repo = DieselRepository::new(pool);
    match seed(&repo) {
        Ok(count) => log::info!("Seeded {count} members into {}", server_config.database_url),
        Err(err) => {
            log::error!("Failed to seed members: {err}");
            std::process::exit(1);
        }
    }
}
