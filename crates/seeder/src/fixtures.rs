use chrono::Utc;
use storage::{
    dto::{
        competition::CreateCompetitionRequest, judge::CreateJudgeRequest, team::CreateTeamRequest,
    },
    models::{Competition, CompetitionCategory, Judge, Team},
    repository::Repositories,
};
use validator::Validate;

use crate::Result;

struct JudgeFixture {
    username: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    phone: &'static str,
    teams: [(&'static str, i32); 3],
}

const JUDGES: [JudgeFixture; 2] = [
    JudgeFixture {
        username: "juez1",
        first_name: "Juan",
        last_name: "Pérez",
        phone: "0991234567",
        teams: [("Equipo Azul", 1), ("Equipo Rojo", 2), ("Equipo Verde", 3)],
    },
    JudgeFixture {
        username: "juez2",
        first_name: "María",
        last_name: "González",
        phone: "0997654321",
        teams: [
            ("Equipo Amarillo", 4),
            ("Equipo Naranja", 5),
            ("Equipo Morado", 6),
        ],
    },
];

#[derive(Debug)]
pub struct FixtureSummary {
    pub competition: Competition,
    pub judges: Vec<(Judge, Vec<Team>)>,
}

/// Create one competition with two judges owning three teams each
pub async fn load_fixtures(repos: &Repositories) -> Result<FixtureSummary> {
    let competition_req = CreateCompetitionRequest {
        name: "Carrera 5K Universidad 2025".to_string(),
        scheduled_at: Utc::now(),
        category: CompetitionCategory::Estudiantes,
        is_active: true,
    };
    competition_req.validate()?;
    let competition = repos.competitions.create(&competition_req).await?;
    tracing::info!(competition_id = competition.competition_id, "Competition created");

    let mut judges = Vec::with_capacity(JUDGES.len());
    for fixture in &JUDGES {
        let judge_req = CreateJudgeRequest {
            username: fixture.username.to_string(),
            first_name: fixture.first_name.to_string(),
            last_name: fixture.last_name.to_string(),
            email: format!("{}@example.com", fixture.username),
            phone: Some(fixture.phone.to_string()),
            competition_id: Some(competition.competition_id),
        };
        judge_req.validate()?;
        let judge = repos.judges.create(&judge_req).await?;
        tracing::info!(judge_id = judge.judge_id, username = %judge.username, "Judge created");

        let mut teams = Vec::with_capacity(fixture.teams.len());
        for (name, bib_number) in fixture.teams {
            let team_req = CreateTeamRequest {
                name: name.to_string(),
                bib_number,
                judge_id: judge.judge_id,
            };
            team_req.validate()?;
            let team = repos.teams.create(&team_req).await?;
            tracing::debug!(team_id = team.team_id, bib_number, "Team created");
            teams.push(team);
        }

        judges.push((judge, teams));
    }

    Ok(FixtureSummary {
        competition,
        judges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use storage::dto::team::TeamFilter;
    use storage::repository::InMemoryStore;

    #[tokio::test]
    async fn test_fixtures_assign_three_teams_per_judge() {
        let repos = Repositories::in_memory(Arc::new(InMemoryStore::new()));

        let summary = load_fixtures(&repos).await.unwrap();

        assert_eq!(summary.judges.len(), 2);
        for (judge, teams) in &summary.judges {
            assert_eq!(judge.competition_id, Some(summary.competition.competition_id));
            let owned = repos
                .teams
                .list(&TeamFilter::for_judge(judge.judge_id))
                .await
                .unwrap();
            assert_eq!(owned.len(), 3);
            assert_eq!(teams.len(), 3);
        }

        let assigned = repos
            .judges
            .list_by_competition(summary.competition.competition_id)
            .await
            .unwrap();
        assert_eq!(assigned.len(), 2);
    }

    #[tokio::test]
    async fn test_fixtures_refuse_duplicate_usernames() {
        let repos = Repositories::in_memory(Arc::new(InMemoryStore::new()));
        load_fixtures(&repos).await.unwrap();

        assert!(load_fixtures(&repos).await.is_err());
    }
}
