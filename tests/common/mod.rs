#![allow(dead_code)]

use member_search::db::{DbPool, establish_connection_pool, run_migrations};
use member_search::domain::member::NewMember;
use member_search::domain::team::NewTeam;
use member_search::domain::types::{Age, TeamName, Username};
use member_search::repository::{DieselRepository, MemberWriter, TeamWriter};
use tempfile::TempDir;

/// A migrated SQLite database living in its own temporary directory.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("create pool");
        run_migrations(&pool).expect("run migrations");
        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

/// Inserts `teamA` with member1/member2 (ages 10, 20) and `teamB` with
/// member3/member4 (ages 30, 40).
pub fn seed_fixture(repo: &DieselRepository) {
    let team_a = repo
        .create_team(&NewTeam::new(TeamName::new("teamA").unwrap()))
        .unwrap();
    let team_b = repo
        .create_team(&NewTeam::new(TeamName::new("teamB").unwrap()))
        .unwrap();

    for (i, team) in [(1, &team_a), (2, &team_a), (3, &team_b), (4, &team_b)] {
        repo.create_member(&NewMember::new(
            Some(Username::new(format!("member{i}")).unwrap()),
            Age::new(i * 10).unwrap(),
            Some(team.id),
        ))
        .unwrap();
    }
}
