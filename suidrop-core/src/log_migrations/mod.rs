//! Log database migrations - embedded SQL files
//!
//! Migrations are compiled into the binary with include_str! and applied in
//! order by `LoggingService`.

/// All log migrations as (filename, sql_content).
///
/// When adding a migration, create `NNN_description.sql` and append it here.
pub const LOG_MIGRATIONS: &[(&str, &str)] = &[
    ("000_migrations.sql", include_str!("000_migrations.sql")),
    (
        "001_initial_schema.sql",
        include_str!("001_initial_schema.sql"),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_sorted_and_unique() {
        let names: Vec<&str> = LOG_MIGRATIONS.iter().map(|(n, _)| *n).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_bootstrap_migration_first() {
        assert_eq!(LOG_MIGRATIONS[0].0, "000_migrations.sql");
        assert!(LOG_MIGRATIONS[0].1.contains("sys_migrations"));
    }
}
