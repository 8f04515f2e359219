//! SQLite-backed document storage for templates and simulations.
//!
//! Each record keeps its scenario payload (and interaction history) as a JSON
//! column, so the tables behave like two independent document collections.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use phishsim_domain::{
    ScenarioPayload, ScenarioTemplate, Simulation, SimulationId, TemplateId, UserInteraction,
};

use crate::infrastructure::ports::{RepoError, SimulationRepo, TemplateRepo};

/// Open (or create) the database file and return a connection pool.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await
        .map_err(|e| RepoError::database("connect", e))
}

/// Ensure database schema (tables and the external-generation-id uniqueness
/// constraint).
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS scenario_templates (
            id TEXT PRIMARY KEY,
            external_generation_id TEXT NOT NULL UNIQUE,
            kind TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            goal TEXT,
            payload_json TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| RepoError::database("ensure_schema", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS simulations (
            id TEXT PRIMARY KEY,
            template_id TEXT NOT NULL REFERENCES scenario_templates(id),
            payload_json TEXT NOT NULL,
            interactions_json TEXT NOT NULL,
            phished INTEGER NOT NULL DEFAULT 0,
            score REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| RepoError::database("ensure_schema", e))?;

    Ok(())
}

/// SQLite implementation of template storage.
pub struct SqliteTemplateRepo {
    pool: SqlitePool,
}

impl SqliteTemplateRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateRepo for SqliteTemplateRepo {
    async fn get(&self, id: TemplateId) -> Result<Option<ScenarioTemplate>, RepoError> {
        let row = sqlx::query(
            "SELECT id, external_generation_id, category, description, goal, payload_json, created_at
             FROM scenario_templates WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("template_get", e))?;

        row.map(row_to_template).transpose()
    }

    async fn save(&self, template: &ScenarioTemplate) -> Result<(), RepoError> {
        let payload_json = serde_json::to_string(&template.payload)
            .map_err(RepoError::serialization)?;

        // Templates are immutable: plain INSERT, no upsert.
        sqlx::query(
            r#"
            INSERT INTO scenario_templates
                (id, external_generation_id, kind, category, description, goal, payload_json, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(template.id.to_string())
        .bind(&template.external_generation_id)
        .bind(template.kind().as_str())
        .bind(&template.category)
        .bind(&template.description)
        .bind(template.goal.as_deref())
        .bind(payload_json)
        .bind(template.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RepoError::ConstraintViolation(format!(
                    "duplicate external generation id: {}",
                    template.external_generation_id
                ))
            } else {
                RepoError::database("template_save", e)
            }
        })?;

        Ok(())
    }
}

/// SQLite implementation of simulation storage.
pub struct SqliteSimulationRepo {
    pool: SqlitePool,
}

impl SqliteSimulationRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SimulationRepo for SqliteSimulationRepo {
    async fn get(&self, id: SimulationId) -> Result<Option<Simulation>, RepoError> {
        let row = sqlx::query(
            "SELECT id, template_id, payload_json, interactions_json, phished, score, created_at
             FROM simulations WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("simulation_get", e))?;

        row.map(row_to_simulation).transpose()
    }

    async fn save(&self, simulation: &Simulation) -> Result<(), RepoError> {
        let payload_json = serde_json::to_string(&simulation.payload)
            .map_err(RepoError::serialization)?;
        let interactions_json = serde_json::to_string(&simulation.interactions)
            .map_err(RepoError::serialization)?;

        // Upsert: lifecycle updates rewrite the mutable columns.
        sqlx::query(
            r#"
            INSERT INTO simulations
                (id, template_id, payload_json, interactions_json, phished, score, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                interactions_json = excluded.interactions_json,
                phished = excluded.phished,
                score = excluded.score
            "#,
        )
        .bind(simulation.id.to_string())
        .bind(simulation.template_id.to_string())
        .bind(payload_json)
        .bind(interactions_json)
        .bind(simulation.phished)
        .bind(simulation.score)
        .bind(simulation.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("simulation_save", e))?;

        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Simulation>, RepoError> {
        let rows = sqlx::query(
            "SELECT id, template_id, payload_json, interactions_json, phished, score, created_at
             FROM simulations ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("simulation_list", e))?;

        rows.into_iter().map(row_to_simulation).collect()
    }
}

fn row_to_template(row: sqlx::sqlite::SqliteRow) -> Result<ScenarioTemplate, RepoError> {
    let payload: ScenarioPayload = serde_json::from_str(&row.get::<String, _>("payload_json"))
        .map_err(RepoError::serialization)?;

    Ok(ScenarioTemplate {
        id: TemplateId::from_uuid(parse_uuid(&row.get::<String, _>("id"))?),
        description: row.get("description"),
        external_generation_id: row.get("external_generation_id"),
        category: row.get("category"),
        goal: row.get("goal"),
        payload,
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
    })
}

fn row_to_simulation(row: sqlx::sqlite::SqliteRow) -> Result<Simulation, RepoError> {
    let payload: ScenarioPayload = serde_json::from_str(&row.get::<String, _>("payload_json"))
        .map_err(RepoError::serialization)?;
    let interactions: Vec<UserInteraction> =
        serde_json::from_str(&row.get::<String, _>("interactions_json"))
            .map_err(RepoError::serialization)?;

    Ok(Simulation {
        id: SimulationId::from_uuid(parse_uuid(&row.get::<String, _>("id"))?),
        template_id: TemplateId::from_uuid(parse_uuid(&row.get::<String, _>("template_id"))?),
        payload,
        interactions,
        phished: row.get("phished"),
        score: row.get("score"),
        created_at: parse_timestamp(&row.get::<String, _>("created_at"))?,
    })
}

fn parse_uuid(raw: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(raw).map_err(RepoError::serialization)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(RepoError::serialization)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.kind() == sqlx::error::ErrorKind::UniqueViolation)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use phishsim_domain::{MailPayload, ScenarioDescriptor, ScenarioLink};
    use serde_json::json;

    async fn test_pool() -> SqlitePool {
        // Each in-memory connection is its own database, so cap the pool at one.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        ensure_schema(&pool).await.expect("schema");
        pool
    }

    fn test_template(external_id: &str) -> ScenarioTemplate {
        ScenarioTemplate::new(
            ScenarioDescriptor {
                id: external_id.to_string(),
                description: "Software update lure".to_string(),
                goal: None,
            },
            Some("Urgency".to_string()),
            ScenarioPayload::Mail(MailPayload {
                sender: "it@corp.com".to_string(),
                recipient: "user@corp.com".to_string(),
                subject: "Update Required".to_string(),
                body: "Please update now.".to_string(),
                links: vec![ScenarioLink {
                    text: "Update now".to_string(),
                    url: "http://evil.example".to_string(),
                    is_phishing: true,
                }],
                attachments: vec![],
            }),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn template_round_trips() {
        let pool = test_pool().await;
        let repo = SqliteTemplateRepo::new(pool);

        let template = test_template("abc123");
        repo.save(&template).await.expect("save");

        let loaded = repo.get(template.id).await.expect("get").expect("present");
        assert_eq!(loaded.external_generation_id, "abc123");
        assert_eq!(loaded.category, "Urgency");
        assert_eq!(loaded.payload, template.payload);
    }

    #[tokio::test]
    async fn duplicate_external_generation_id_is_rejected() {
        let pool = test_pool().await;
        let repo = SqliteTemplateRepo::new(pool);

        repo.save(&test_template("dup-1")).await.expect("first save");
        let err = repo
            .save(&test_template("dup-1"))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn simulation_upsert_preserves_interactions_and_status() {
        let pool = test_pool().await;
        let templates = SqliteTemplateRepo::new(pool.clone());
        let simulations = SqliteSimulationRepo::new(pool);

        let template = test_template("sim-rt");
        templates.save(&template).await.expect("template save");

        let mut simulation = Simulation::new(&template, Utc::now());
        simulations.save(&simulation).await.expect("initial save");

        simulation.record_interaction(
            "clicked_link",
            json!({"url": "http://evil.example"}),
            Utc::now(),
        );
        simulation.apply_status(Some(&json!(true)), Some(&json!(42.5)));
        simulations.save(&simulation).await.expect("update save");

        let loaded = simulations
            .get(simulation.id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(loaded.interactions.len(), 1);
        assert_eq!(loaded.interactions[0].action, "clicked_link");
        assert!(loaded.phished);
        assert_eq!(loaded.score, 42.5);
        assert_eq!(loaded.payload, template.payload);
    }

    #[tokio::test]
    async fn list_all_returns_every_simulation() {
        let pool = test_pool().await;
        let templates = SqliteTemplateRepo::new(pool.clone());
        let simulations = SqliteSimulationRepo::new(pool);

        for i in 0..3 {
            let template = test_template(&format!("list-{i}"));
            templates.save(&template).await.expect("template save");
            simulations
                .save(&Simulation::new(&template, Utc::now()))
                .await
                .expect("simulation save");
        }

        let all = simulations.list_all().await.expect("list");
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn get_unknown_id_returns_none() {
        let pool = test_pool().await;
        let simulations = SqliteSimulationRepo::new(pool);
        let missing = simulations
            .get(SimulationId::new())
            .await
            .expect("get succeeds");
        assert!(missing.is_none());
    }
}
