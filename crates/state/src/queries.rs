//! Runtime SQL queries for check results

use chrono::{DateTime, Utc};
use sheetcheck_errors::{Error, StorageError, VersionError};
use sheetcheck_hash::Fingerprint;
use sheetcheck_types::{CheckResult, EntityId, VersionRecord};
use sqlx::sqlite::SqliteRow;
use sqlx::{query, Pool, Row, Sqlite, Transaction};

const RESULT_COLUMNS: &str = "entity, document, fingerprint, version, check_name, passed, value, \
     description, processed_at, business_case, reporting_year";

/// Insert one result unless its natural key already exists
///
/// Returns the number of rows inserted (0 or 1).
pub async fn insert_result(
    tx: &mut Transaction<'_, Sqlite>,
    result: &CheckResult,
) -> Result<u64, sqlx::Error> {
    let done = query(
        "INSERT OR IGNORE INTO check_results
         (entity, document, fingerprint, version, check_name, passed, value,
          description, processed_at, business_case, reporting_year)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(result.entity.as_str())
    .bind(&result.document)
    .bind(result.fingerprint.to_hex())
    .bind(i64::from(result.version))
    .bind(&result.check)
    .bind(result.passed)
    .bind(result.value)
    .bind(&result.description)
    .bind(result.processed_at.timestamp_millis())
    .bind(result.business_case.as_deref())
    .bind(result.reporting_year)
    .execute(&mut **tx)
    .await?;

    Ok(done.rows_affected())
}

/// Distinct version records across all stored results
pub async fn version_history(pool: &Pool<Sqlite>) -> Result<Vec<VersionRecord>, Error> {
    let rows = query(
        "SELECT DISTINCT entity, document, fingerprint, version
         FROM check_results
         ORDER BY entity, document, version",
    )
    .fetch_all(pool)
    .await
    .map_err(query_failed)?;

    rows.iter()
        .map(|row| {
            let entity: String = row.get("entity");
            let document: String = row.get("document");
            let fingerprint = parse_fingerprint(row, &entity, &document)?;
            let version = parse_version(row, &entity, &document)?;
            Ok(VersionRecord {
                entity: EntityId::new(entity),
                document,
                fingerprint,
                version,
            })
        })
        .collect()
}

/// Results for an entity, optionally limited to one version
pub async fn results_for_entity(
    pool: &Pool<Sqlite>,
    entity: &EntityId,
    version: Option<u32>,
) -> Result<Vec<CheckResult>, Error> {
    let sql = format!(
        "SELECT {RESULT_COLUMNS} FROM check_results
         WHERE entity = ?1 AND (?2 IS NULL OR version = ?2)
         ORDER BY document, version, id"
    );
    let rows = query(&sql)
        .bind(entity.as_str())
        .bind(version.map(i64::from))
        .fetch_all(pool)
        .await
        .map_err(query_failed)?;

    rows.iter().map(row_to_result).collect()
}

/// Total number of stored results
pub async fn count_results(pool: &Pool<Sqlite>) -> Result<u64, Error> {
    let row = query("SELECT COUNT(*) AS n FROM check_results")
        .fetch_one(pool)
        .await
        .map_err(query_failed)?;
    let n: i64 = row.get("n");
    Ok(u64::try_from(n).unwrap_or(0))
}

/// Distinct entities with stored results
pub async fn entities(pool: &Pool<Sqlite>) -> Result<Vec<EntityId>, Error> {
    let rows = query("SELECT DISTINCT entity FROM check_results ORDER BY entity")
        .fetch_all(pool)
        .await
        .map_err(query_failed)?;
    Ok(rows
        .iter()
        .map(|row| EntityId::new(row.get::<String, _>("entity")))
        .collect())
}

fn row_to_result(row: &SqliteRow) -> Result<CheckResult, Error> {
    let entity: String = row.get("entity");
    let document: String = row.get("document");
    let fingerprint = parse_fingerprint(row, &entity, &document)?;
    let version = parse_version(row, &entity, &document)?;
    let millis: i64 = row.get("processed_at");
    let processed_at = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
        invalid_record(&entity, &document, format!("invalid timestamp {millis}"))
    })?;

    Ok(CheckResult {
        entity: EntityId::new(entity),
        document,
        fingerprint,
        version,
        check: row.get("check_name"),
        passed: row.get("passed"),
        value: row.get("value"),
        description: row.get("description"),
        processed_at,
        business_case: row.get("business_case"),
        reporting_year: row.get("reporting_year"),
    })
}

fn parse_fingerprint(row: &SqliteRow, entity: &str, document: &str) -> Result<Fingerprint, Error> {
    let hex: String = row.get("fingerprint");
    Fingerprint::from_hex(&hex)
        .map_err(|e| invalid_record(entity, document, format!("bad fingerprint: {e}")))
}

fn parse_version(row: &SqliteRow, entity: &str, document: &str) -> Result<u32, Error> {
    let version: i64 = row.get("version");
    u32::try_from(version)
        .map_err(|_| invalid_record(entity, document, format!("bad version {version}")))
}

fn invalid_record(entity: &str, document: &str, message: String) -> Error {
    VersionError::InvalidRecord {
        entity: entity.to_string(),
        document: document.to_string(),
        message,
    }
    .into()
}

fn query_failed(e: sqlx::Error) -> Error {
    StorageError::QueryFailed {
        message: e.to_string(),
    }
    .into()
}
