//! Database schema and scenario storage

use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use crate::scenario::{Scenario, ScenarioField, ScenarioValue};

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Saved scenarios, immutable once written
        CREATE TABLE IF NOT EXISTS scenarios (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Named inputs and results of each scenario
        CREATE TABLE IF NOT EXISTS scenario_fields (
            scenario_id INTEGER NOT NULL REFERENCES scenarios(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            name TEXT NOT NULL,
            kind TEXT NOT NULL,
            value REAL,
            PRIMARY KEY (scenario_id, name)
        );

        CREATE INDEX IF NOT EXISTS idx_scenario_fields_scenario ON scenario_fields(scenario_id);
        "#,
    )?;
    Ok(())
}

/// Save a scenario. Fails if a scenario with the same name already exists.
pub fn save_scenario(conn: &mut Connection, scenario: &Scenario) -> Result<i64> {
    let tx = conn.transaction()?;

    let exists: Option<i64> = tx
        .query_row(
            "SELECT id FROM scenarios WHERE name = ?1",
            [&scenario.name],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Err(anyhow!(
            "Scenario '{}' already exists; saved scenarios cannot be changed",
            scenario.name
        ));
    }

    tx.execute("INSERT INTO scenarios (name) VALUES (?1)", [&scenario.name])?;
    let id = tx.last_insert_rowid();

    {
        let mut stmt = tx.prepare(
            "INSERT INTO scenario_fields (scenario_id, position, name, kind, value)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (position, field) in scenario.fields.iter().enumerate() {
            let (kind, value) = field.value.to_parts();
            stmt.execute((id, position as i64, &field.name, kind, value))?;
        }
    }

    tx.commit()?;
    info!(name = %scenario.name, fields = scenario.fields.len(), "saved scenario");
    Ok(id)
}

/// Load a scenario by name
pub fn load_scenario(conn: &Connection, name: &str) -> Result<Option<Scenario>> {
    let id: Option<i64> = conn
        .query_row("SELECT id FROM scenarios WHERE name = ?1", [name], |row| {
            row.get(0)
        })
        .optional()?;
    let Some(id) = id else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(
        "SELECT name, kind, value FROM scenario_fields
         WHERE scenario_id = ?1
         ORDER BY position",
    )?;

    let rows = stmt.query_map([id], |row| {
        let kind: String = row.get(1)?;
        let value: Option<f64> = row.get(2)?;
        Ok(ScenarioField {
            name: row.get(0)?,
            value: ScenarioValue::from_parts(&kind, value),
        })
    })?;

    let mut fields = Vec::new();
    for row in rows {
        fields.push(row?);
    }

    Ok(Some(Scenario {
        name: name.to_string(),
        fields,
    }))
}

/// List saved scenarios as (name, created_at), oldest first
pub fn list_scenarios(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn.prepare("SELECT name, created_at FROM scenarios ORDER BY id")?;

    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Delete a saved scenario and its fields. Returns false if it did not exist.
pub fn delete_scenario(conn: &mut Connection, name: &str) -> Result<bool> {
    let tx = conn.transaction()?;
    tx.execute(
        "DELETE FROM scenario_fields WHERE scenario_id IN (SELECT id FROM scenarios WHERE name = ?1)",
        [name],
    )?;
    let deleted = tx.execute("DELETE FROM scenarios WHERE name = ?1", [name])?;
    tx.commit()?;

    if deleted > 0 {
        info!(name, "deleted scenario");
    }
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn sample(name: &str) -> Scenario {
        Scenario::new(name)
            .with("Price per Order", ScenarioValue::Amount(450.0))
            .with("Breakeven Orders", ScenarioValue::Count(200))
            .with("Orders for Target", ScenarioValue::Infinite)
            .with("Breakeven Revenue", ScenarioValue::Undefined)
            .with("Breakeven Week", ScenarioValue::NotReached)
            .with("Contribution Margin %", ScenarioValue::Percent(13.3))
    }

    #[test]
    fn save_and_load_preserves_field_order() {
        let mut conn = open();
        save_scenario(&mut conn, &sample("baseline")).unwrap();

        let loaded = load_scenario(&conn, "baseline").unwrap().unwrap();
        assert_eq!(loaded, sample("baseline"));
    }

    #[test]
    fn saved_scenarios_are_immutable() {
        let mut conn = open();
        save_scenario(&mut conn, &sample("baseline")).unwrap();
        let changed = sample("baseline").with("Price per Order", ScenarioValue::Amount(1.0));
        assert!(save_scenario(&mut conn, &changed).is_err());

        let loaded = load_scenario(&conn, "baseline").unwrap().unwrap();
        assert_eq!(loaded.get("Price per Order"), Some(ScenarioValue::Amount(450.0)));
    }

    #[test]
    fn missing_scenario_is_none() {
        let conn = open();
        assert!(load_scenario(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn list_and_delete() {
        let mut conn = open();
        save_scenario(&mut conn, &sample("a")).unwrap();
        save_scenario(&mut conn, &sample("b")).unwrap();

        let names: Vec<String> = list_scenarios(&conn).unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);

        assert!(delete_scenario(&mut conn, "a").unwrap());
        assert!(!delete_scenario(&mut conn, "a").unwrap());
        assert!(load_scenario(&conn, "a").unwrap().is_none());
        assert_eq!(list_scenarios(&conn).unwrap().len(), 1);

        let orphans: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM scenario_fields
                 WHERE scenario_id NOT IN (SELECT id FROM scenarios)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn failed_delete_leaves_scenario_intact() {
        let mut conn = open();
        save_scenario(&mut conn, &sample("locked")).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER keep_scenarios BEFORE DELETE ON scenarios
             BEGIN SELECT RAISE(ABORT, 'scenario is locked'); END;",
        )
        .unwrap();

        assert!(delete_scenario(&mut conn, "locked").is_err());

        let loaded = load_scenario(&conn, "locked").unwrap().unwrap();
        assert_eq!(loaded, sample("locked"));
    }
}
