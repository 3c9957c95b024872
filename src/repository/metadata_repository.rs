use rusqlite::Connection;

/// retrieves the schema version stored in the Metadata table. Errors if the table does
/// not exist yet, which the caller treats as "database not created"
pub fn get_version(con: &Connection) -> Result<String, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/metadata/get_version.sql"))?;
    pst.query_row([], |row| row.get(0))
}
