use crate::schema::TableSchema;

/// Generate CREATE TABLE SQL for a table schema
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let sql_type = col.col_type.sql();
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
        let definition = if sql_type.is_empty() {
            format!("    {}{}", col.name, null_constraint)
        } else {
            format!("    {} {}{}", col.name, sql_type, null_constraint)
        };
        columns.push(definition);
    }

    if !schema.primary_key.is_empty() {
        columns.push(format!("    PRIMARY KEY ({})", schema.primary_key.join(", ")));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for the declared indexes
pub fn generate_indexes(schema: &TableSchema) -> Vec<String> {
    schema
        .indexes
        .iter()
        .map(|index| {
            format!(
                "CREATE INDEX IF NOT EXISTS idx_{}_{} ON {}({})",
                schema.name,
                index.columns.join("_"),
                schema.name,
                index.columns.join(", ")
            )
        })
        .collect()
}

/// `INSERT OR REPLACE` over every column of the table
pub fn generate_upsert(schema: &TableSchema) -> String {
    let columns = schema.column_names();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
        schema.name,
        columns.join(", "),
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{FIXTURE, STANDINGS};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&STANDINGS);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS standings"));
        assert!(sql.contains("competition_id INTEGER NOT NULL"));
        assert!(sql.contains("    goal_difference,"));
        assert!(sql.contains("top_team_scorer_goals INTEGER"));
        assert!(sql.contains("PRIMARY KEY (competition_id, season, team)"));
    }

    #[test]
    fn test_generate_indexes() {
        let indexes = generate_indexes(&STANDINGS);
        assert_eq!(
            indexes,
            vec!["CREATE INDEX IF NOT EXISTS idx_standings_team_id ON standings(team_id)"]
        );
    }

    #[test]
    fn test_generate_upsert() {
        let sql = generate_upsert(&FIXTURE);
        assert!(sql.starts_with("INSERT OR REPLACE INTO fixture (competition_id, "));
        assert!(sql.ends_with("?20)"));
    }
}
