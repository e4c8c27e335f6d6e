//! Data project store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/find/list/update/delete over `data_projects`.
//! - Persist the ordered experiment list alongside each project.
//!
//! # Invariants
//! - `update` only rewrites mutable columns (`name`, `description`).
//! - `update`/`delete` on a missing id return `RepoError::NotFound`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::data_project::{
    DataProject, DataProjectId, DataProjectValidationError, ExperimentId,
};
use crate::model::principal::PersonId;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    slug,
    url,
    name,
    description,
    owner_id,
    gitlab_group,
    gitlab_project,
    gitlab_id
FROM data_projects";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store failure for data project persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(DataProjectValidationError),
    Db(DbError),
    NotFound(DataProjectId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "data project not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted data project: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DataProjectValidationError> for RepoError {
    fn from(value: DataProjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for data projects.
pub trait DataProjectStore {
    fn create(&self, project: &DataProject) -> RepoResult<DataProjectId>;
    fn find_by_id(&self, id: DataProjectId) -> RepoResult<Option<DataProject>>;
    /// Returns every project owned by `owner_id`, in insertion order.
    fn find_all_by_owner(&self, owner_id: PersonId) -> RepoResult<Vec<DataProject>>;
    fn update(&self, project: &DataProject) -> RepoResult<()>;
    fn delete(&self, id: DataProjectId) -> RepoResult<()>;
}

impl<S: DataProjectStore + ?Sized> DataProjectStore for &S {
    fn create(&self, project: &DataProject) -> RepoResult<DataProjectId> {
        (**self).create(project)
    }

    fn find_by_id(&self, id: DataProjectId) -> RepoResult<Option<DataProject>> {
        (**self).find_by_id(id)
    }

    fn find_all_by_owner(&self, owner_id: PersonId) -> RepoResult<Vec<DataProject>> {
        (**self).find_all_by_owner(owner_id)
    }

    fn update(&self, project: &DataProject) -> RepoResult<()> {
        (**self).update(project)
    }

    fn delete(&self, id: DataProjectId) -> RepoResult<()> {
        (**self).delete(id)
    }
}

/// SQLite-backed data project store.
pub struct SqliteDataProjectStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDataProjectStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn load_experiments(&self, project_id: DataProjectId) -> RepoResult<Vec<ExperimentId>> {
        let mut stmt = self.conn.prepare(
            "SELECT experiment_id
             FROM data_project_experiments
             WHERE project_id = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([project_id.to_string()])?;
        let mut experiments = Vec::new();
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            experiments.push(parse_uuid(&text, "data_project_experiments.experiment_id")?);
        }
        Ok(experiments)
    }

    fn hydrate(&self, row: &Row<'_>) -> RepoResult<DataProject> {
        let mut project = parse_project_row(row)?;
        project.experiments = self.load_experiments(project.id)?;
        project.validate()?;
        Ok(project)
    }
}

impl DataProjectStore for SqliteDataProjectStore<'_> {
    fn create(&self, project: &DataProject) -> RepoResult<DataProjectId> {
        project.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO data_projects (
                id,
                slug,
                url,
                name,
                description,
                owner_id,
                gitlab_group,
                gitlab_project,
                gitlab_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                project.id.to_string(),
                project.slug.as_str(),
                project.url.as_str(),
                project.name.as_str(),
                project.description.as_str(),
                project.owner_id.to_string(),
                project.remote_namespace.as_str(),
                project.remote_project_name.as_str(),
                project.remote_id,
            ],
        )?;
        for (position, experiment_id) in project.experiments.iter().enumerate() {
            tx.execute(
                "INSERT INTO data_project_experiments (project_id, position, experiment_id)
                 VALUES (?1, ?2, ?3);",
                params![
                    project.id.to_string(),
                    position as i64,
                    experiment_id.to_string()
                ],
            )?;
        }
        tx.commit()?;

        Ok(project.id)
    }

    fn find_by_id(&self, id: DataProjectId) -> RepoResult<Option<DataProject>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(self.hydrate(row)?));
        }
        Ok(None)
    }

    fn find_all_by_owner(&self, owner_id: PersonId) -> RepoResult<Vec<DataProject>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} WHERE owner_id = ?1 ORDER BY rowid ASC;"
        ))?;
        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(self.hydrate(row)?);
        }
        Ok(projects)
    }

    fn update(&self, project: &DataProject) -> RepoResult<()> {
        project.validate()?;

        let changed = self.conn.execute(
            "UPDATE data_projects
             SET
                name = ?1,
                description = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3;",
            params![
                project.name.as_str(),
                project.description.as_str(),
                project.id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(project.id));
        }
        Ok(())
    }

    fn delete(&self, id: DataProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM data_projects WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<DataProject> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;

    Ok(DataProject {
        id: parse_uuid(&id_text, "data_projects.id")?,
        slug: row.get("slug")?,
        url: row.get("url")?,
        name: row.get("name")?,
        description: row.get("description")?,
        owner_id: parse_uuid(&owner_text, "data_projects.owner_id")?,
        remote_namespace: row.get("gitlab_group")?,
        remote_project_name: row.get("gitlab_project")?,
        remote_id: row.get("gitlab_id")?,
        experiments: Vec::new(),
    })
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
