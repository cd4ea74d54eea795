use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::{Facet, Gateway};
use crate::entity::{Action, NewAction, NewLink, NewRegulation, Regulation, RegulationLink};
use crate::error::{RegTrackerError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

const REGULATION_COLUMNS: &str =
    "id, title, source, jurisdiction, category, effective_date, received_at, summary, status";
const LINK_COLUMNS: &str = "id, regulation_id, url, link_type, title";
const ACTION_COLUMNS: &str =
    "id, regulation_id, title, description, status, assignee, due_date, completed_at";

/// SQLite-backed gateway
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Create a new tracker database. Fails if the file already exists.
    pub fn init(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(RegTrackerError::AlreadyInitialized(path.display().to_string()));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        debug!(path = %path.display(), "creating tracker database");
        Self::connect(path)
    }

    /// Open an existing tracker database
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RegTrackerError::NotInitialized(path.display().to_string()));
        }
        debug!(path = %path.display(), "opening tracker database");
        Self::connect(path)
    }

    fn connect(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn,
            path: path.to_path_buf(),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` as one transaction, rolling back every write if it fails.
    pub fn in_transaction<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        self.conn.execute_batch("BEGIN")?;
        match f(self) {
            Ok(value) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(value)
            }
            Err(e) => {
                self.conn.execute_batch("ROLLBACK")?;
                Err(e)
            }
        }
    }

    fn init_schema(&self) -> Result<()> {
        // Cascades only fire with foreign key enforcement on
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS regulations (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                source TEXT,
                jurisdiction TEXT,
                category TEXT,
                effective_date TEXT,
                received_at TEXT NOT NULL,
                summary TEXT,
                status TEXT NOT NULL DEFAULT 'Open'
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS regulation_links (
                id INTEGER PRIMARY KEY,
                regulation_id INTEGER NOT NULL
                    REFERENCES regulations(id) ON DELETE CASCADE,
                url TEXT NOT NULL,
                link_type TEXT,
                title TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS actions (
                id INTEGER PRIMARY KEY,
                regulation_id INTEGER NOT NULL
                    REFERENCES regulations(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'Planned',
                assignee TEXT,
                due_date TEXT,
                completed_at TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_links_regulation ON regulation_links(regulation_id)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_actions_regulation ON actions(regulation_id)",
            [],
        )?;

        Ok(())
    }

    fn ensure_regulation(&self, id: i64) -> Result<()> {
        let found: Option<i64> = self
            .conn
            .query_row("SELECT id FROM regulations WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;
        match found {
            Some(_) => Ok(()),
            None => Err(RegTrackerError::not_found("Regulation", id)),
        }
    }

    fn query_regulations(&self, sql: &str, id: Option<i64>) -> Result<Vec<Regulation>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = match id {
            Some(id) => stmt.query_map([id], RegulationRow::from_row)?,
            None => stmt.query_map([], RegulationRow::from_row)?,
        }
        .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(RegulationRow::into_regulation).collect()
    }

    fn query_actions(&self, sql: &str, id: i64) -> Result<Vec<Action>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map([id], ActionRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(ActionRow::into_action).collect()
    }
}

impl Gateway for SqliteStore {
    fn load_all_regulations(&self) -> Result<Vec<Regulation>> {
        self.query_regulations(
            &format!("SELECT {} FROM regulations ORDER BY id", REGULATION_COLUMNS),
            None,
        )
    }

    fn load_regulation(&self, id: i64) -> Result<Regulation> {
        self.query_regulations(
            &format!("SELECT {} FROM regulations WHERE id = ?1", REGULATION_COLUMNS),
            Some(id),
        )?
        .into_iter()
        .next()
        .ok_or_else(|| RegTrackerError::not_found("Regulation", id))
    }

    fn load_action(&self, id: i64) -> Result<Action> {
        self.query_actions(
            &format!("SELECT {} FROM actions WHERE id = ?1", ACTION_COLUMNS),
            id,
        )?
        .into_iter()
        .next()
        .ok_or_else(|| RegTrackerError::not_found("Action", id))
    }

    fn links_for(&self, regulation_id: i64) -> Result<Vec<RegulationLink>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM regulation_links WHERE regulation_id = ?1 ORDER BY id",
            LINK_COLUMNS
        ))?;

        let links = stmt
            .query_map([regulation_id], |row| {
                Ok(RegulationLink {
                    id: row.get(0)?,
                    regulation_id: row.get(1)?,
                    url: row.get(2)?,
                    link_type: row.get(3)?,
                    title: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(links)
    }

    fn actions_for(&self, regulation_id: i64) -> Result<Vec<Action>> {
        self.query_actions(
            &format!(
                "SELECT {} FROM actions WHERE regulation_id = ?1 ORDER BY id",
                ACTION_COLUMNS
            ),
            regulation_id,
        )
    }

    fn insert_regulation(&mut self, new: NewRegulation) -> Result<Regulation> {
        let now = Utc::now();
        let received_at = new.received_at.unwrap_or(now);

        self.conn.execute(
            "INSERT INTO regulations
             (title, source, jurisdiction, category, effective_date, received_at, summary, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                new.title,
                new.source,
                new.jurisdiction,
                new.category,
                new.effective_date.map(format_date),
                received_at.to_rfc3339(),
                new.summary,
                new.status.as_str(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        Ok(new.into_regulation(id, now))
    }

    fn save_regulation(&mut self, regulation: &Regulation) -> Result<Regulation> {
        let changed = self.conn.execute(
            "UPDATE regulations
             SET title = ?2, source = ?3, jurisdiction = ?4, category = ?5,
                 effective_date = ?6, received_at = ?7, summary = ?8, status = ?9
             WHERE id = ?1",
            params![
                regulation.id,
                regulation.title,
                regulation.source,
                regulation.jurisdiction,
                regulation.category,
                regulation.effective_date.map(format_date),
                regulation.received_at.to_rfc3339(),
                regulation.summary,
                regulation.status.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RegTrackerError::not_found("Regulation", regulation.id));
        }
        Ok(regulation.clone())
    }

    fn insert_link(&mut self, new: NewLink) -> Result<RegulationLink> {
        self.ensure_regulation(new.regulation_id)?;

        self.conn.execute(
            "INSERT INTO regulation_links (regulation_id, url, link_type, title)
             VALUES (?1, ?2, ?3, ?4)",
            params![new.regulation_id, new.url, new.link_type, new.title],
        )?;

        Ok(new.into_link(self.conn.last_insert_rowid()))
    }

    fn insert_action(&mut self, new: NewAction) -> Result<Action> {
        new.check_completion()?;
        self.ensure_regulation(new.regulation_id)?;

        self.conn.execute(
            "INSERT INTO actions
             (regulation_id, title, description, status, assignee, due_date, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                new.regulation_id,
                new.title,
                new.description,
                new.status.as_str(),
                new.assignee,
                new.due_date.map(format_date),
                new.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;

        Ok(new.into_action(self.conn.last_insert_rowid()))
    }

    fn save_action(&mut self, action: &Action) -> Result<Action> {
        action.check_completion()?;
        self.ensure_regulation(action.regulation_id)?;

        let changed = self.conn.execute(
            "UPDATE actions
             SET regulation_id = ?2, title = ?3, description = ?4, status = ?5,
                 assignee = ?6, due_date = ?7, completed_at = ?8
             WHERE id = ?1",
            params![
                action.id,
                action.regulation_id,
                action.title,
                action.description,
                action.status.as_str(),
                action.assignee,
                action.due_date.map(format_date),
                action.completed_at.map(|t| t.to_rfc3339()),
            ],
        )?;

        if changed == 0 {
            return Err(RegTrackerError::not_found("Action", action.id));
        }
        Ok(action.clone())
    }

    fn delete_action(&mut self, id: i64) -> Result<()> {
        let changed = self.conn.execute("DELETE FROM actions WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(RegTrackerError::not_found("Action", id));
        }
        Ok(())
    }

    fn delete_regulation(&mut self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM regulations WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(RegTrackerError::not_found("Regulation", id));
        }
        Ok(())
    }

    fn distinct_values(&self, facet: Facet) -> Result<Vec<String>> {
        let column = facet.column();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT DISTINCT {col} FROM regulations
             WHERE {col} IS NOT NULL AND {col} <> ''
             ORDER BY {col}",
            col = column
        ))?;

        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;

        Ok(values)
    }
}

/// Raw regulation columns before date and status validation.
struct RegulationRow {
    id: i64,
    title: String,
    source: Option<String>,
    jurisdiction: Option<String>,
    category: Option<String>,
    effective_date: Option<String>,
    received_at: String,
    summary: Option<String>,
    status: String,
}

impl RegulationRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            source: row.get(2)?,
            jurisdiction: row.get(3)?,
            category: row.get(4)?,
            effective_date: row.get(5)?,
            received_at: row.get(6)?,
            summary: row.get(7)?,
            status: row.get(8)?,
        })
    }

    fn into_regulation(self) -> Result<Regulation> {
        Ok(Regulation {
            id: self.id,
            title: self.title,
            source: self.source,
            jurisdiction: self.jurisdiction,
            category: self.category,
            effective_date: self.effective_date.as_deref().map(parse_date).transpose()?,
            received_at: parse_timestamp(&self.received_at)?,
            summary: self.summary,
            status: self.status.parse()?,
        })
    }
}

/// Raw action columns before date and status validation.
struct ActionRow {
    id: i64,
    regulation_id: i64,
    title: String,
    description: Option<String>,
    status: String,
    assignee: Option<String>,
    due_date: Option<String>,
    completed_at: Option<String>,
}

impl ActionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            regulation_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            status: row.get(4)?,
            assignee: row.get(5)?,
            due_date: row.get(6)?,
            completed_at: row.get(7)?,
        })
    }

    fn into_action(self) -> Result<Action> {
        let action = Action {
            id: self.id,
            regulation_id: self.regulation_id,
            title: self.title,
            description: self.description,
            status: self.status.parse()?,
            assignee: self.assignee,
            due_date: self.due_date.as_deref().map(parse_date).transpose()?,
            completed_at: self.completed_at.as_deref().map(parse_timestamp).transpose()?,
        };
        action.check_completion()?;
        Ok(action)
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| RegTrackerError::Persistence(format!("corrupt date '{}': {}", s, e)))
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RegTrackerError::Persistence(format!("corrupt timestamp '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ActionStatus, RegulationStatus};
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> SqliteStore {
        SqliteStore::init(&tmp.path().join("regtracker.db")).unwrap()
    }

    #[test]
    fn test_init_creates_db() {
        let tmp = TempDir::new().unwrap();
        let _store = store(&tmp);
        assert!(tmp.path().join("regtracker.db").exists());
    }

    #[test]
    fn test_init_twice_fails() {
        let tmp = TempDir::new().unwrap();
        let _store = store(&tmp);
        let err = SqliteStore::init(&tmp.path().join("regtracker.db"))
            .err()
            .unwrap();
        assert!(matches!(err, RegTrackerError::AlreadyInitialized(_)));
    }

    #[test]
    fn test_open_missing_fails() {
        let tmp = TempDir::new().unwrap();
        let err = SqliteStore::open(&tmp.path().join("missing.db")).err().unwrap();
        assert!(matches!(err, RegTrackerError::NotInitialized(_)));
    }

    #[test]
    fn test_regulation_persists_across_reopen() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("regtracker.db");

        let id = {
            let mut store = SqliteStore::init(&path).unwrap();
            let mut new = NewRegulation::new("EU MRV 2025 Amendments");
            new.source = Some("EU".to_string());
            new.effective_date = NaiveDate::from_ymd_opt(2025, 1, 1);
            new.status = RegulationStatus::InProgress;
            store.insert_regulation(new).unwrap().id
        };

        let store = SqliteStore::open(&path).unwrap();
        let reg = store.load_regulation(id).unwrap();
        assert_eq!(reg.title, "EU MRV 2025 Amendments");
        assert_eq!(reg.source.as_deref(), Some("EU"));
        assert_eq!(reg.effective_date, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(reg.status, RegulationStatus::InProgress);
    }

    #[test]
    fn test_action_roundtrip_and_update() {
        let tmp = TempDir::new().unwrap();
        let mut store = store(&tmp);
        let reg = store.insert_regulation(NewRegulation::new("R")).unwrap();

        let mut new = NewAction::new(reg.id, "Crew circular");
        new.due_date = NaiveDate::from_ymd_opt(2025, 8, 25);
        let mut action = store.insert_action(new).unwrap();

        action.status = ActionStatus::Done;
        action.completed_at = Some(Utc::now());
        store.save_action(&action).unwrap();

        let loaded = store.load_action(action.id).unwrap();
        assert_eq!(loaded.status, ActionStatus::Done);
        assert!(loaded.completed_at.is_some());
        assert_eq!(loaded.due_date, NaiveDate::from_ymd_opt(2025, 8, 25));
    }

    #[test]
    fn test_save_missing_regulation_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let mut store = store(&tmp);
        let reg = NewRegulation::new("ghost").into_regulation(42, Utc::now());
        assert!(matches!(
            store.save_regulation(&reg),
            Err(RegTrackerError::NotFound { id: 42, .. })
        ));
    }

    #[test]
    fn test_delete_regulation_cascades() {
        let tmp = TempDir::new().unwrap();
        let mut store = store(&tmp);
        let reg = store.insert_regulation(NewRegulation::new("R")).unwrap();
        store.insert_link(NewLink::new(reg.id, "https://example.com")).unwrap();
        let action = store.insert_action(NewAction::new(reg.id, "A")).unwrap();

        store.delete_regulation(reg.id).unwrap();

        assert!(store.links_for(reg.id).unwrap().is_empty());
        assert!(matches!(
            store.load_action(action.id),
            Err(RegTrackerError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_action() {
        let tmp = TempDir::new().unwrap();
        let mut store = store(&tmp);
        let reg = store.insert_regulation(NewRegulation::new("R")).unwrap();
        let action = store.insert_action(NewAction::new(reg.id, "A")).unwrap();

        store.delete_action(action.id).unwrap();
        assert!(store.actions_for(reg.id).unwrap().is_empty());
        assert!(matches!(
            store.delete_action(action.id),
            Err(RegTrackerError::NotFound { .. })
        ));
    }

    #[test]
    fn test_corrupt_status_is_rejected_on_load() {
        let tmp = TempDir::new().unwrap();
        let mut store = store(&tmp);
        let reg = store.insert_regulation(NewRegulation::new("R")).unwrap();
        store
            .conn
            .execute("UPDATE regulations SET status = 'Archived' WHERE id = ?1", [reg.id])
            .unwrap();

        assert!(matches!(
            store.load_regulation(reg.id),
            Err(RegTrackerError::InvalidStatus { .. })
        ));
    }

    #[test]
    fn test_completion_mismatch_is_rejected_on_load() {
        let tmp = TempDir::new().unwrap();
        let mut store = store(&tmp);
        let reg = store.insert_regulation(NewRegulation::new("R")).unwrap();
        let action = store.insert_action(NewAction::new(reg.id, "A")).unwrap();

        store
            .conn
            .execute(
                "UPDATE actions SET status = 'Done', completed_at = NULL WHERE id = ?1",
                [action.id],
            )
            .unwrap();
        assert!(matches!(
            store.load_action(action.id),
            Err(RegTrackerError::Persistence(_))
        ));

        store
            .conn
            .execute(
                "UPDATE actions SET status = 'Planned', completed_at = ?2 WHERE id = ?1",
                params![action.id, Utc::now().to_rfc3339()],
            )
            .unwrap();
        assert!(matches!(
            store.load_action(action.id),
            Err(RegTrackerError::Persistence(_))
        ));
    }

    #[test]
    fn test_completion_mismatch_is_rejected_on_write() {
        let tmp = TempDir::new().unwrap();
        let mut store = store(&tmp);
        let reg = store.insert_regulation(NewRegulation::new("R")).unwrap();

        let mut done_unstamped = NewAction::new(reg.id, "Done without stamp");
        done_unstamped.status = ActionStatus::Done;
        assert!(matches!(
            store.insert_action(done_unstamped),
            Err(RegTrackerError::Persistence(_))
        ));

        let mut planned_stamped = NewAction::new(reg.id, "Planned with stamp");
        planned_stamped.completed_at = Some(Utc::now());
        assert!(matches!(
            store.insert_action(planned_stamped),
            Err(RegTrackerError::Persistence(_))
        ));
        assert!(store.actions_for(reg.id).unwrap().is_empty());

        let mut action = store.insert_action(NewAction::new(reg.id, "A")).unwrap();
        action.status = ActionStatus::Done;
        assert!(matches!(
            store.save_action(&action),
            Err(RegTrackerError::Persistence(_))
        ));
        assert_eq!(
            store.load_action(action.id).unwrap().status,
            ActionStatus::Planned
        );
    }

    #[test]
    fn test_failed_transaction_rolls_back() {
        let tmp = TempDir::new().unwrap();
        let mut store = store(&tmp);

        let result: Result<()> = store.in_transaction(|s| {
            s.insert_regulation(NewRegulation::new("Half seeded"))?;
            Err(RegTrackerError::Persistence("disk full".to_string()))
        });
        assert!(result.is_err());
        assert!(store.load_all_regulations().unwrap().is_empty());

        let id = store
            .in_transaction(|s| s.insert_regulation(NewRegulation::new("Kept")))
            .unwrap()
            .id;
        assert_eq!(store.load_regulation(id).unwrap().title, "Kept");
    }

    #[test]
    fn test_distinct_values() {
        let tmp = TempDir::new().unwrap();
        let mut store = store(&tmp);
        for (source, category) in [("IMO", "Technical"), ("EU", "Environmental"), ("EU", "")] {
            let mut new = NewRegulation::new("R");
            new.source = Some(source.to_string());
            new.category = Some(category.to_string());
            store.insert_regulation(new).unwrap();
        }

        assert_eq!(store.distinct_values(Facet::Source).unwrap(), vec!["EU", "IMO"]);
        assert_eq!(
            store.distinct_values(Facet::Category).unwrap(),
            vec!["Environmental", "Technical"]
        );
    }
}
