use std::time::Duration;

use sqlite_middleware::prelude::*;

const ROWS: i64 = 10_000;

fn seed(conn: &mut SqliteConnection) -> Result<(), SqliteMiddlewareError> {
    conn.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL);")?;
    let insert = conn.prepare(
        &Query::new("INSERT INTO users (id, name) VALUES (?1, ?2)").with_command(Command::Insert),
    )?;
    conn.execute_batch("BEGIN")?;
    for id in 1..=ROWS {
        conn.execute(&insert, &[RowValues::Int(id), RowValues::Text(format!("User-{id}"))])?;
    }
    conn.execute_batch("COMMIT")?;
    let mut insert = insert;
    conn.close(&mut insert)
}

fn assert_in_insertion_order(result: &QueryResult) {
    let rows = result.rows.as_ref().expect("select yields rows");
    assert_eq!(rows.len(), ROWS as usize);
    assert_eq!(result.num_rows, ROWS as usize);
    for (i, row) in rows.iter().enumerate() {
        let expected = i as i64 + 1;
        assert_eq!(row.values()[0], RowValues::Int(expected), "row {expected}");
        assert_eq!(
            row.values()[1],
            RowValues::Text(format!("User-{expected}")),
            "row {expected}"
        );
    }
}

#[test]
fn large_select_keeps_insertion_order_despite_short_timeout() -> Result<(), SqliteMiddlewareError>
{
    let mut conn = SqliteConnection::connect(
        &ConnectOptions::memory().with_timeout(Duration::from_millis(1)),
    )?;
    seed(&mut conn)?;

    let select = Query::new("SELECT * FROM users");
    let opts = ExecuteOptions::with_timeout(Duration::from_millis(1));
    let result = conn.run(|conn| conn.execute_with_options(&select, &[], &opts))?;
    assert_in_insertion_order(&result);
    Ok(())
}

#[test]
fn large_select_through_prepared_reference() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("large.db").to_string_lossy().into_owned();
    let mut conn = SqliteConnection::connect(&ConnectOptions::new(path.as_str()))?;
    seed(&mut conn)?;

    let mut select = conn.prepare(&Query::new("SELECT id, name FROM users ORDER BY id"))?;
    assert_in_insertion_order(&conn.execute(&select, &[])?);
    conn.close(&mut select)?;
    Ok(())
}
