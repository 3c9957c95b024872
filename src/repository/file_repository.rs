use chrono::Duration;
use rusqlite::types::Value;
use rusqlite::Connection;

use crate::model::repository::{FileRecord, TAG_PLACEHOLDER_PREFIX};
use crate::model::request::search_requests::ViewFilter;
use crate::search::rank::RECENT_WINDOW_DAYS;
use crate::search::{normalize, SearchSpec};

/// matches the text format the rusqlite chrono feature writes NaiveDateTime with, so
/// string comparison in sql stays consistent with stored values
static DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn create_file(file: &FileRecord, con: &Connection) -> Result<u32, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/file/create_file.sql"))?;
    let id = pst.insert(rusqlite::params![
        file.workspace_id,
        file.project_id,
        file.folder_id,
        file.name,
        file.original_name,
        file.category,
        tags_json(&file.tags)?,
        tag_index(&file.tags),
        file.is_favorite,
        file.file_size,
        file.file_path,
        file.modified_date,
        file.thumbnail,
    ])? as u32;
    Ok(id)
}

pub fn get_file(id: u32, con: &Connection) -> Result<FileRecord, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/file/get_file_by_id.sql"))?;
    pst.query_row(rusqlite::params![id], file_record_mapper)
}

/// writes every mutable column back. `original_name` deliberately isn't one of them
pub fn update_file(file: &FileRecord, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/file/update_file.sql"))?;
    pst.execute(rusqlite::params![
        file.project_id,
        file.folder_id,
        file.name,
        tags_json(&file.tags)?,
        tag_index(&file.tags),
        file.is_favorite,
        file.file_path,
        file.modified_date,
        file.thumbnail,
        file.id,
    ])?;
    Ok(())
}

/// copies `name` over `originalName` for one record. Only ever called on tag
/// placeholder records, whose two name fields both hold the `.tag-` marker and have to
/// move together on rename; real uploads keep their original name forever
pub fn sync_placeholder_original_name(id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/file/sync_placeholder_original_name.sql"
    ))?;
    pst.execute(rusqlite::params![id])?;
    Ok(())
}

pub fn delete_file(id: u32, con: &Connection) -> Result<(), rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/file/delete_file_by_id.sql"))?;
    pst.execute(rusqlite::params![id])?;
    Ok(())
}

/// every record in the workspace, placeholders included; the tag aggregation pulls its
/// vocabulary from this
pub fn get_files_for_workspace(
    workspace_id: u32,
    con: &Connection,
) -> Result<Vec<FileRecord>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!(
        "../assets/queries/file/get_files_for_workspace.sql"
    ))?;
    let rows = pst.query_map(rusqlite::params![workspace_id], file_record_mapper)?;
    rows.collect()
}

/// all records whose tag array contains `tag` under normalized comparison. `tag` must
/// already be normalized
pub fn get_files_with_tag(
    workspace_id: u32,
    tag: &str,
    con: &Connection,
) -> Result<Vec<FileRecord>, rusqlite::Error> {
    let mut pst = con.prepare(include_str!("../assets/queries/file/get_files_with_tag.sql"))?;
    let rows = pst.query_map(
        rusqlite::params![workspace_id, format!(",{tag},")],
        file_record_mapper,
    )?;
    rows.collect()
}

/// the remote filter stage: one query combining the ORed text patterns with the ANDed
/// hard filters, pre-sorted newest first and capped at `limit`. Final order is decided
/// client-side by [crate::search::rank::rank]
pub fn search_files(
    workspace_id: u32,
    spec: Option<&SearchSpec>,
    selected_tags: &[String],
    view: ViewFilter,
    limit: u32,
    con: &Connection,
) -> Result<Vec<FileRecord>, rusqlite::Error> {
    let (where_clause, mut params) = search_clauses(workspace_id, spec, selected_tags, view);
    let sql = format!(
        "select id, workspaceId, projectId, folderId, name, originalName, type, tags, isFavorite, \
         fileSize, filePath, modifiedDate, thumbnail from FileRecords where {where_clause} \
         order by modifiedDate desc, id desc limit ?"
    );
    params.push(Value::from(limit as i64));
    let mut pst = con.prepare(sql.as_str())?;
    let rows = pst.query_map(rusqlite::params_from_iter(params), file_record_mapper)?;
    rows.collect()
}

/// the true match count for the same filters, reported independently of the cap so the
/// UI can show "top 150 of N"
pub fn count_search_files(
    workspace_id: u32,
    spec: Option<&SearchSpec>,
    selected_tags: &[String],
    view: ViewFilter,
    con: &Connection,
) -> Result<u32, rusqlite::Error> {
    let (where_clause, params) = search_clauses(workspace_id, spec, selected_tags, view);
    let sql = format!("select count(*) from FileRecords where {where_clause}");
    let mut pst = con.prepare(sql.as_str())?;
    pst.query_row(rusqlite::params_from_iter(params), |row| row.get(0))
}

fn search_clauses(
    workspace_id: u32,
    spec: Option<&SearchSpec>,
    selected_tags: &[String],
    view: ViewFilter,
) -> (String, Vec<Value>) {
    // mirrors FileRecord::is_tag_placeholder: prefix alone is not enough, a real
    // non-empty file is allowed to be named `.tag-whatever`
    let mut clauses: Vec<String> = vec![
        "workspaceId = ?".to_string(),
        "not (name like ? and fileSize = 0)".to_string(),
    ];
    let mut params: Vec<Value> = vec![
        Value::from(workspace_id as i64),
        Value::from(format!("{TAG_PLACEHOLDER_PREFIX}%")),
    ];
    match view {
        ViewFilter::All => {}
        ViewFilter::Favorites => clauses.push("isFavorite = 1".to_string()),
        ViewFilter::Recent => {
            let cutoff =
                chrono::offset::Local::now().naive_local() - Duration::days(RECENT_WINDOW_DAYS);
            clauses.push("modifiedDate >= ?".to_string());
            params.push(Value::from(cutoff.format(DATE_FORMAT).to_string()));
        }
    }
    // selected tags are a hard intersection filter, one containment check per tag
    for tag in selected_tags.iter() {
        clauses.push("instr(tagIndex, ?) > 0".to_string());
        params.push(Value::from(format!(",{tag},")));
    }
    // the text condition: any pattern against either name field, or any query word
    // appearing inside any tag
    if let Some(spec) = spec {
        let mut text_conditions: Vec<&str> = Vec::new();
        for pattern in spec.patterns.iter() {
            let param = escape_pattern(pattern);
            text_conditions.push(r"lower(name) like ? escape '\'");
            params.push(Value::from(param.clone()));
            text_conditions.push(r"lower(originalName) like ? escape '\'");
            params.push(Value::from(param));
        }
        for word in spec.words.iter() {
            text_conditions.push(r"tagIndex like ? escape '\'");
            params.push(Value::from(format!("%{}%", escape_like(word))));
        }
        clauses.push(format!("({})", text_conditions.join(" or ")));
    }
    (clauses.join(" and "), params)
}

/// the denormalized search column: every tag normalized, comma-wrapped, so exact
/// containment is a single instr() and word containment a single like
fn tag_index(tags: &[String]) -> String {
    let mut index = String::from(",");
    for tag in tags.iter() {
        let normalized = normalize(tag);
        if normalized.is_empty() {
            continue;
        }
        index.push_str(&normalized);
        index.push(',');
    }
    index
}

fn tags_json(tags: &[String]) -> Result<String, rusqlite::Error> {
    serde_json::to_string(tags)
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// escapes like-wildcards in user text so `100%.pdf` searches for a literal percent
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\\' || c == '%' || c == '_' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// rewrites a `%text%` pattern from the query builder with its inner text escaped
fn escape_pattern(pattern: &str) -> String {
    let inner = &pattern[1..pattern.len() - 1];
    format!("%{}%", escape_like(inner))
}

fn file_record_mapper(row: &rusqlite::Row) -> Result<FileRecord, rusqlite::Error> {
    let category: String = row.get(6)?;
    let tags_json: String = row.get(7)?;
    let tags: Vec<String> = serde_json::from_str(tags_json.as_str()).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(FileRecord {
        id: row.get(0)?,
        workspace_id: row.get(1)?,
        project_id: row.get(2)?,
        folder_id: row.get(3)?,
        name: row.get(4)?,
        original_name: row.get(5)?,
        category: category.as_str().into(),
        tags,
        is_favorite: row.get(8)?,
        file_size: row.get(9)?,
        file_path: row.get(10)?,
        modified_date: row.get(11)?,
        thumbnail: row.get(12)?,
    })
}


#[cfg(test)]
mod get_files_with_tag_tests {
    use crate::repository::{file_repository, open_connection};
    use crate::test::{cleanup, create_file_db_entry, refresh_db};

    #[test]
    fn matches_tags_case_insensitively() {
        refresh_db();
        let first = create_file_db_entry(1, "a", &["Design"]);
        let second = create_file_db_entry(1, "b", &["design"]);
        create_file_db_entry(1, "c", &["finance"]);
        let con = open_connection();
        let res = file_repository::get_files_with_tag(1, "design", &con).unwrap();
        con.close().unwrap();
        let ids: Vec<u32> = res.iter().map(|f| f.id.unwrap()).collect();
        assert_eq!(vec![first, second], ids);
        cleanup();
    }

    #[test]
    fn does_not_match_tag_substrings() {
        refresh_db();
        create_file_db_entry(1, "a", &["redesigned"]);
        let con = open_connection();
        let res = file_repository::get_files_with_tag(1, "design", &con).unwrap();
        con.close().unwrap();
        assert!(res.is_empty());
        cleanup();
    }

    #[test]
    fn scoped_to_workspace() {
        refresh_db();
        create_file_db_entry(1, "a", &["design"]);
        create_file_db_entry(2, "b", &["design"]);
        let con = open_connection();
        let res = file_repository::get_files_with_tag(2, "design", &con).unwrap();
        con.close().unwrap();
        assert_eq!(1, res.len());
        assert_eq!("b", res[0].name);
        cleanup();
    }
}
