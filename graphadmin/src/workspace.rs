// Copyright (c) 2024-2025 GraphAdmin Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! The fixed working databases and the scripts that populate them

/// Parameter name the region lists are bound to
pub const REGION_PARAM: &str = "param";

pub const EU_COUNTRIES: &[&str] = &[
    "Germany",
    "UK",
    "Sweden",
    "France",
    "Spain",
    "Switzerland",
    "Austria",
    "Italy",
    "Portugal",
    "Ireland",
    "Belgium",
    "Norway",
    "Denmark",
    "Finland",
];

pub const AMERICAS: &[&str] = &["Mexico", "Canada", "Argentina", "Brazil", "USA", "Venezuela"];

pub const COUNT_NODES_SCRIPT: &str = "count_nodes.txt";

pub const DISTRIBUTED_QUERY_SCRIPTS: [&str; 2] = ["distributed_query.txt", "distributed_query2.txt"];

pub const DROP_INDEXES: &str = "CALL apoc.schema.assert({},{})";

pub const SHOW_DATABASES: &str = "SHOW DATABASES";

/// One of the databases created by setup and dropped on exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingDatabase {
    pub name: &'static str,
    pub setup_script: &'static str,
    /// Region list bound as `$param` to every setup statement
    pub regions: Option<&'static [&'static str]>,
    pub verification_query: &'static str,
}

pub const WORKING_DATABASES: [WorkingDatabase; 3] = [
    WorkingDatabase {
        name: "db0",
        setup_script: "setup_db0.txt",
        regions: None,
        verification_query: "MATCH (s:Supplier)-[:SUPPLIES]->(p:Product)-[:PART_OF]->(c:Category) \
            RETURN s.companyName AS Supplier, p.productName AS Product, c.categoryName AS Category LIMIT 5",
    },
    WorkingDatabase {
        name: "db1",
        setup_script: "setup_db1.txt",
        regions: Some(EU_COUNTRIES),
        verification_query: "MATCH (c:Customer)-[:PURCHASED]->(o:Order)-[:ORDERS]->(p:Product) \
            RETURN c.companyName AS Customer, c.country AS CustomerCountry, o.orderID AS Order, \
            p.productID AS Product LIMIT 5",
    },
    WorkingDatabase {
        name: "db2",
        setup_script: "setup_db2.txt",
        regions: Some(AMERICAS),
        verification_query: "MATCH (c:Customer)-[:PURCHASED]->(o:Order)-[:ORDERS]->(p:Product) \
            RETURN c.companyName AS Customer, c.country AS CustomerCountry, o.orderID AS Order, \
            p.productID AS Product LIMIT 5",
    },
];

pub fn create_database(name: &str) -> String {
    format!("CREATE OR REPLACE DATABASE {}", name)
}

pub fn drop_database(name: &str) -> String {
    format!("DROP DATABASE {} IF EXISTS", name)
}
