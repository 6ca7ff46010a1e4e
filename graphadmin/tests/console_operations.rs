// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Administrative operations against the in-memory engine

mod common;

use common::{connected_console, console, input, output_of, FakeEngine, FakeServer};
use graphadmin::workspace::{AMERICAS, EU_COUNTRIES, REGION_PARAM, WORKING_DATABASES};
use graphadmin::{Error, ParamValue};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

fn write_script(dir: &Path, name: &str, text: &str) {
    std::fs::write(dir.join(name), text).expect("write script");
}

fn write_setup_scripts(dir: &Path) {
    write_script(
        dir,
        "setup_db0.txt",
        "CREATE (:Supplier {companyName: 'Exotic Liquids'})\n\n\
         CREATE (:Category {categoryName: 'Beverages'})\n\n\
         MATCH (s:Supplier), (c:Category)\nCREATE (s)-[:SUPPLIES]->(:Product)-[:PART_OF]->(c)\n",
    );
    write_script(
        dir,
        "setup_db1.txt",
        "LOAD CSV WITH HEADERS FROM 'file:///customers.csv' AS row\nWITH row WHERE row.country IN $param\nCREATE (:Customer {country: row.country})\n\n\
         CREATE INDEX customer_country IF NOT EXISTS FOR (c:Customer) ON (c.country)\n",
    );
    write_script(
        dir,
        "setup_db2.txt",
        "LOAD CSV WITH HEADERS FROM 'file:///customers.csv' AS row\nWITH row WHERE row.country IN $param\nCREATE (:Customer {country: row.country})\n\n\
         LOAD CSV WITH HEADERS FROM 'file:///orders.csv' AS row\nCREATE (:Order {orderID: row.orderID})\n\n\
         MATCH (n) RETURN count(n)\n",
    );
}

fn region_list(values: &[&str]) -> ParamValue {
    ParamValue::TextList(values.iter().map(|v| v.to_string()).collect())
}

#[test]
fn test_create_then_list_includes_database() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    let mut console = connected_console(&engine, scripts.path());

    console.create_database(&mut input("sales\n")).unwrap();

    assert!(engine.databases().contains(&"sales".to_string()));
    let executed = engine.executed();
    assert_eq!(executed[0].text, "CREATE OR REPLACE DATABASE sales");
    assert_eq!(executed[1].text, "SHOW DATABASES");

    let output = output_of(&mut console);
    assert!(output.contains("Created database sales"));
    assert!(output.contains("Databases"));
    assert!(output.contains("sales"));
}

#[test]
fn test_create_rejects_invalid_name() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    let mut console = connected_console(&engine, scripts.path());

    console
        .create_database(&mut input("x; DROP DATABASE neo4j\n"))
        .unwrap();

    assert!(engine.executed().is_empty());
    assert!(output_of(&mut console).contains("Invalid database name"));
}

#[test]
fn test_drop_then_list_excludes_database() {
    let engine = FakeEngine::new();
    engine.add_database("sales");
    let scripts = TempDir::new().unwrap();
    let mut console = connected_console(&engine, scripts.path());

    console.drop_database(&mut input("sales\n")).unwrap();

    assert!(!engine.databases().contains(&"sales".to_string()));
    assert_eq!(engine.executed()[0].text, "DROP DATABASE sales IF EXISTS");
    assert!(output_of(&mut console).contains("Dropped database sales!"));
}

#[test]
fn test_drop_missing_database_succeeds() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    let mut console = connected_console(&engine, scripts.path());
    let before = engine.databases();

    console.drop_database(&mut input("ghost\n")).unwrap();

    assert_eq!(engine.databases(), before);
    assert!(output_of(&mut console).contains("Dropped database ghost!"));
}

#[test]
fn test_operations_require_connection() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    let mut console = console(&engine, scripts.path());

    assert!(matches!(console.show_databases(), Err(Error::NotInitialized)));
    assert!(matches!(console.drop_indexes(), Err(Error::NotInitialized)));
    assert!(matches!(
        console.setup_environment(),
        Err(Error::NotInitialized)
    ));
    assert!(engine.executed().is_empty());
}

#[test]
fn test_setup_environment_runs_every_block_in_order() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    write_setup_scripts(scripts.path());
    let mut console = connected_console(&engine, scripts.path());

    let reports = console.setup_environment().unwrap();

    assert_eq!(reports.len(), 3);
    let expected_counts = [3, 2, 3];
    for (report, (db, expected)) in reports
        .iter()
        .zip(WORKING_DATABASES.iter().zip(expected_counts))
    {
        assert_eq!(report.database, db.name);
        assert_eq!(report.statements_issued(), expected);
        assert_eq!(report.failed, 0);
        assert_eq!(
            report.total_elapsed(),
            report.statement_times.iter().sum::<Duration>()
        );
    }

    // Script blocks, then the verification query, in script order
    let db0: Vec<String> = engine
        .executed_on("db0")
        .into_iter()
        .map(|e| e.text)
        .collect();
    assert_eq!(db0.len(), 4);
    assert_eq!(db0[0], "CREATE (:Supplier {companyName: 'Exotic Liquids'})");
    assert_eq!(db0[1], "CREATE (:Category {categoryName: 'Beverages'})");
    assert_eq!(
        db0[2],
        "MATCH (s:Supplier), (c:Category)\nCREATE (s)-[:SUPPLIES]->(:Product)-[:PART_OF]->(c)"
    );
    assert_eq!(db0[3], WORKING_DATABASES[0].verification_query);

    for name in ["db0", "db1", "db2"] {
        assert!(engine.databases().contains(&name.to_string()));
    }

    let output = output_of(&mut console);
    assert!(output.contains("Setup db2..."));
    assert!(output.contains("Time elapsed in ms:"));
}

#[test]
fn test_setup_environment_binds_region_lists() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    write_setup_scripts(scripts.path());
    let mut console = connected_console(&engine, scripts.path());

    console.setup_environment().unwrap();

    let script_statements = |db: &str, count: usize| {
        let executed = engine.executed_on(db);
        executed[..count].to_vec()
    };

    for statement in script_statements("db0", 3) {
        assert!(statement.params.is_empty());
    }
    for statement in script_statements("db1", 2) {
        assert_eq!(statement.params.get(REGION_PARAM), Some(&region_list(EU_COUNTRIES)));
    }
    for statement in script_statements("db2", 3) {
        // Bound even for statements that never reference $param
        assert_eq!(statement.params.get(REGION_PARAM), Some(&region_list(AMERICAS)));
    }

    assert_eq!(
        region_list(EU_COUNTRIES),
        region_list(&[
            "Germany", "UK", "Sweden", "France", "Spain", "Switzerland", "Austria", "Italy",
            "Portugal", "Ireland", "Belgium", "Norway", "Denmark", "Finland",
        ])
    );
    assert_eq!(
        region_list(AMERICAS),
        region_list(&["Mexico", "Canada", "Argentina", "Brazil", "USA", "Venezuela"])
    );
}

#[test]
fn test_setup_continues_after_failed_statement() {
    let engine = FakeEngine::new();
    engine.fail_statements_containing("orders.csv");
    let scripts = TempDir::new().unwrap();
    write_setup_scripts(scripts.path());
    let mut console = connected_console(&engine, scripts.path());

    let reports = console.setup_environment().unwrap();
    let db2 = &reports[2];

    assert_eq!(db2.statements_issued(), 3);
    assert_eq!(db2.failed, 1);
    assert_eq!(db2.statement_times.len(), 2);

    // The statement after the failure still ran
    let db2_texts: Vec<String> = engine.executed_on("db2").into_iter().map(|e| e.text).collect();
    assert_eq!(db2_texts[2], "MATCH (n) RETURN count(n)");
    assert!(output_of(&mut console).contains("Query failed"));
}

#[test]
fn test_setup_skips_database_with_missing_script() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    write_setup_scripts(scripts.path());
    std::fs::remove_file(scripts.path().join("setup_db1.txt")).unwrap();
    let mut console = connected_console(&engine, scripts.path());

    let reports = console.setup_environment().unwrap();

    let names: Vec<&str> = reports.iter().map(|r| r.database.as_str()).collect();
    assert_eq!(names, vec!["db0", "db2"]);
    // Only the verification query reached db1
    assert_eq!(engine.executed_on("db1").len(), 1);
    assert!(output_of(&mut console).contains("setup_db1.txt"));
}

#[test]
fn test_distributed_query_runs_on_default_database() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    write_script(
        scripts.path(),
        "distributed_query.txt",
        "UNWIND ['fabric.db1', 'fabric.db2'] AS g\nCALL { USE graph.byName(g) MATCH (c:Customer) RETURN count(c) AS n }\nRETURN g, n\n",
    );
    write_script(
        scripts.path(),
        "distributed_query2.txt",
        "USE fabric.db0\nMATCH (p:Product) RETURN count(p) AS products\n",
    );
    let mut console = connected_console(&engine, scripts.path());

    let outcomes = console.distributed_query().unwrap();

    assert_eq!(outcomes.len(), 2);
    let executed = engine.executed();
    assert_eq!(executed.len(), 2);
    assert!(executed.iter().all(|e| e.database.is_none()));
    assert!(executed[0].text.starts_with("UNWIND"));
    assert!(executed[1].text.starts_with("USE fabric.db0"));
    assert_eq!(output_of(&mut console).matches("Time elapsed in ms:").count(), 2);
}

#[test]
fn test_count_nodes_runs_against_each_working_database() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    write_script(scripts.path(), "count_nodes.txt", "MATCH (n) RETURN count(n) AS nodes\n");
    let mut console = connected_console(&engine, scripts.path());

    console.count_nodes().unwrap();

    let executed = engine.executed();
    let databases: Vec<Option<&str>> = executed.iter().map(|e| e.database.as_deref()).collect();
    assert_eq!(databases, vec![Some("db0"), Some("db1"), Some("db2")]);
    assert!(executed
        .iter()
        .all(|e| e.text == "MATCH (n) RETURN count(n) AS nodes"));
}

#[test]
fn test_count_nodes_without_script_fails() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    let mut console = connected_console(&engine, scripts.path());

    assert!(matches!(console.count_nodes(), Err(Error::Script { .. })));
    assert!(engine.executed().is_empty());
}

#[test]
fn test_drop_indexes_uses_default_database() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    let mut console = connected_console(&engine, scripts.path());

    console.drop_indexes().unwrap();

    let executed = engine.executed();
    assert_eq!(executed.len(), 1);
    assert_eq!(executed[0].text, "CALL apoc.schema.assert({},{})");
    assert_eq!(executed[0].database, None);
}

#[test]
fn test_check_connection_reports_state() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    let mut console = console(&engine, scripts.path());

    assert!(!console.check_connection().unwrap());
    assert!(output_of(&mut console).contains("NOT CONNECTED"));

    console.connect().unwrap();
    assert!(console.check_connection().unwrap());
    assert!(output_of(&mut console).contains("Connected to bolt://localhost:11007"));
}

#[test]
fn test_shutdown_when_disconnected_skips_teardown() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    let server = FakeServer::default();
    let mut console = console(&engine, scripts.path()).with_server(Box::new(server.clone()));

    console.shutdown().unwrap();

    assert!(engine.executed().is_empty());
    assert_eq!(server.terminations(), 1);
}

#[test]
fn test_shutdown_when_connected_drops_working_databases() {
    let engine = FakeEngine::new();
    let scripts = TempDir::new().unwrap();
    let server = FakeServer::default();
    let mut console =
        connected_console(&engine, scripts.path()).with_server(Box::new(server.clone()));
    engine.fail_statements_containing("db1");

    console.shutdown().unwrap();

    let texts: Vec<String> = engine.executed().into_iter().map(|e| e.text).collect();
    assert_eq!(
        texts,
        vec![
            "DROP DATABASE db0 IF EXISTS",
            "DROP DATABASE db1 IF EXISTS",
            "DROP DATABASE db2 IF EXISTS",
        ]
    );
    assert_eq!(server.terminations(), 1);
    assert_eq!(engine.drivers_closed(), 1);
    assert!(output_of(&mut console).contains("Goodbye!"));
}
