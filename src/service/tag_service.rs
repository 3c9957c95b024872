use std::backtrace::Backtrace;
use std::collections::HashMap;

use chrono::NaiveDateTime;
use itertools::Itertools;

use crate::events;
use crate::model::error::tag_errors::{
    CreateTagError, DeleteTagError, GetTagStatsError, MergeTagError, RenameTagError,
};
use crate::model::file_types::FileCategory;
use crate::model::repository::{FileRecord, TAG_PLACEHOLDER_PREFIX};
use crate::model::request::tag_requests::{
    CreateTagRequest, MergeTagRequest, RenameTagRequest, TagFilter, TagSort,
};
use crate::model::response::{TagMutationApi, TagStatApi};
use crate::repository::{file_repository, open_connection};
use crate::search::normalize;

/// pseudo-tag representing files with no tags at all. Only ever appears in stats output,
/// it is never written into a tag array
pub const EMPTY_TAG: &str = "(empty)";

/// fixed display palette; [tag_color] picks from it by hash
static TAG_PALETTE: [&str; 12] = [
    "#e6194b", "#3cb44b", "#b8a118", "#4363d8", "#f58231", "#911eb4", "#2bb5b5", "#f032e6",
    "#7a9e10", "#9a6324", "#008080", "#6a5acd",
];

/// deterministic color for a tag, stable across sessions and machines. Case and
/// surrounding whitespace don't change the color
pub fn tag_color(tag: &str) -> String {
    let mut hash: u32 = 0;
    for c in normalize(tag).chars() {
        hash = hash.wrapping_mul(31).wrapping_add(c as u32);
    }
    TAG_PALETTE[(hash % TAG_PALETTE.len() as u32) as usize].to_string()
}

/// every distinct tag across the passed files, first-seen casing, sorted by normalized
/// title. Placeholder records count toward the vocabulary like any other record
pub fn collect_tags(files: &[FileRecord]) -> Vec<String> {
    files
        .iter()
        .flat_map(|f| f.tags.iter())
        .filter(|tag| !normalize(tag).is_empty())
        .unique_by(|tag| normalize(tag))
        .cloned()
        .sorted_by_key(|tag| normalize(tag))
        .collect()
}

/// aggregates tag usage over a set of file records. Placeholder records register a tag
/// in the vocabulary without contributing to its count or file list; untagged real files
/// roll up under [EMPTY_TAG] when `include_empty` is set
pub fn tag_stats(
    files: &[FileRecord],
    sort: TagSort,
    filter: TagFilter,
    include_empty: bool,
) -> Vec<TagStatApi> {
    struct Acc {
        title: String,
        count: u32,
        files: Vec<u32>,
        latest: NaiveDateTime,
    }
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut accs: Vec<Acc> = Vec::new();
    let mut register = |norm: String, title: &str, file: &FileRecord, counted: bool| {
        let i = *index.entry(norm).or_insert_with(|| {
            accs.push(Acc {
                title: title.to_string(),
                count: 0,
                files: Vec::new(),
                latest: file.modified_date,
            });
            accs.len() - 1
        });
        if counted {
            accs[i].count += 1;
            accs[i].files.push(file.id.unwrap_or(0));
            if file.modified_date > accs[i].latest {
                accs[i].latest = file.modified_date;
            }
        }
    };
    for file in files {
        let placeholder = file.is_tag_placeholder();
        let mut tagged = false;
        for tag in file.tags.iter() {
            let norm = normalize(tag);
            if norm.is_empty() {
                continue;
            }
            tagged = true;
            register(norm, tag, file, !placeholder);
        }
        if !tagged && !placeholder && include_empty {
            register(EMPTY_TAG.to_string(), EMPTY_TAG, file, true);
        }
    }
    let mut stats: Vec<TagStatApi> = accs
        .iter()
        .filter(|acc| match filter {
            TagFilter::All => true,
            TagFilter::Used => acc.count > 0,
            TagFilter::Unused => acc.count == 0,
        })
        .map(|acc| TagStatApi {
            tag: acc.title.clone(),
            count: acc.count,
            files: acc.files.clone(),
            color: tag_color(&acc.title),
        })
        .collect();
    match sort {
        TagSort::Name => stats.sort_by_key(|stat| normalize(&stat.tag)),
        TagSort::Count => stats.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| normalize(&a.tag).cmp(&normalize(&b.tag)))
        }),
        TagSort::Recent => {
            let latest: HashMap<String, NaiveDateTime> = accs
                .iter()
                .map(|acc| (normalize(&acc.title), acc.latest))
                .collect();
            stats.sort_by(|a, b| {
                latest[&normalize(&b.tag)]
                    .cmp(&latest[&normalize(&a.tag)])
                    .then_with(|| normalize(&a.tag).cmp(&normalize(&b.tag)))
            });
        }
    }
    stats
}

/// names-only vocabulary listing for tag pickers; same source data as the stats, none
/// of the aggregation
pub fn get_tag_names(workspace_id: u32) -> Result<Vec<String>, GetTagStatsError> {
    let con = open_connection();
    let files = match file_repository::get_files_for_workspace(workspace_id, &con) {
        Ok(files) => files,
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to load files for workspace {workspace_id} tag names. Exception is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(GetTagStatsError::DbError);
        }
    };
    con.close().unwrap();
    Ok(collect_tags(&files))
}

pub fn get_tag_stats(
    workspace_id: u32,
    sort: TagSort,
    filter: TagFilter,
    include_empty: bool,
) -> Result<Vec<TagStatApi>, GetTagStatsError> {
    let con = open_connection();
    let files = match file_repository::get_files_for_workspace(workspace_id, &con) {
        Ok(files) => files,
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to load files for workspace {workspace_id} tag stats. Exception is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(GetTagStatsError::DbError);
        }
    };
    con.close().unwrap();
    Ok(tag_stats(&files, sort, filter, include_empty))
}

/// registers a tag with no files yet by inserting a hidden placeholder record that
/// carries it. The placeholder keeps the tag in the vocabulary until it is deleted or
/// merged away
pub fn create_tag(request: CreateTagRequest) -> Result<TagStatApi, CreateTagError> {
    let title = request.title.trim().to_string();
    let norm = normalize(&title);
    if norm.is_empty() || norm == EMPTY_TAG {
        return Err(CreateTagError::InvalidTitle);
    }
    let con = open_connection();
    match file_repository::get_files_with_tag(request.workspace_id, &norm, &con) {
        Ok(files) if !files.is_empty() => {
            con.close().unwrap();
            return Err(CreateTagError::AlreadyExists);
        }
        Ok(_) => {}
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to check for existing tag {norm:?}. Exception is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(CreateTagError::DbError);
        }
    };
    let placeholder = FileRecord {
        id: None,
        workspace_id: request.workspace_id,
        project_id: None,
        folder_id: None,
        name: format!("{TAG_PLACEHOLDER_PREFIX}{norm}"),
        original_name: format!("{TAG_PLACEHOLDER_PREFIX}{norm}"),
        category: FileCategory::Other,
        tags: vec![title.clone()],
        is_favorite: false,
        file_size: 0,
        file_path: None,
        thumbnail: None,
        modified_date: chrono::offset::Local::now().naive_local(),
    };
    match file_repository::create_file(&placeholder, &con) {
        Ok(_) => {}
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to register tag {norm:?}. Exception is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(CreateTagError::DbError);
        }
    };
    con.close().unwrap();
    events::publish_collection_changed(request.workspace_id);
    Ok(TagStatApi {
        color: tag_color(&title),
        tag: title,
        count: 0,
        files: Vec::new(),
    })
}

/// retitles a tag on every record that carries it, one record at a time. The batch is
/// not transactional; a mid-batch failure is reported with how far it got and rerunning
/// the same rename finishes the rest
pub fn rename_tag(request: RenameTagRequest) -> Result<TagMutationApi, RenameTagError> {
    let old_norm = normalize(&request.old_title);
    let new_title = request.new_title.trim().to_string();
    let new_norm = normalize(&new_title);
    // the (empty) pseudo-tag is display-only and never a legal title
    if new_norm.is_empty() || new_norm == EMPTY_TAG {
        return Err(RenameTagError::InvalidTitle);
    }
    if old_norm == new_norm {
        return Ok(TagMutationApi { updated: 0 });
    }
    let con = open_connection();
    let files = match file_repository::get_files_with_tag(request.workspace_id, &old_norm, &con) {
        Ok(files) if files.is_empty() => {
            con.close().unwrap();
            return Err(RenameTagError::TagNotFound);
        }
        Ok(files) => files,
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to load files carrying tag {old_norm:?}. Exception is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(RenameTagError::DbError);
        }
    };
    match file_repository::get_files_with_tag(request.workspace_id, &new_norm, &con) {
        Ok(files) if !files.is_empty() => {
            con.close().unwrap();
            return Err(RenameTagError::TargetExists);
        }
        Ok(_) => {}
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to check for existing tag {new_norm:?}. Exception is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(RenameTagError::DbError);
        }
    };
    let total = files.iter().filter(|f| !f.is_tag_placeholder()).count() as u32;
    let mut updated: u32 = 0;
    for mut file in files {
        let placeholder = file.is_tag_placeholder();
        file.tags = file
            .tags
            .iter()
            .map(|tag| {
                if normalize(tag) == old_norm {
                    new_title.clone()
                } else {
                    tag.clone()
                }
            })
            .unique_by(|tag| normalize(tag))
            .collect();
        if placeholder {
            file.name = format!("{TAG_PLACEHOLDER_PREFIX}{new_norm}");
        }
        file.modified_date = chrono::offset::Local::now().naive_local();
        if let Err(e) = file_repository::update_file(&file, &con) {
            con.close().unwrap();
            log::error!(
                "Failed to rename tag {old_norm:?} on file {:?}. Exception is {e:?}\n{}",
                file.id,
                Backtrace::force_capture()
            );
            return Err(RenameTagError::PartialFailure { updated, total });
        }
        if placeholder {
            // update_file never writes originalName, so move it separately
            if let Err(e) =
                file_repository::sync_placeholder_original_name(file.id.unwrap_or(0), &con)
            {
                con.close().unwrap();
                log::error!(
                    "Failed to move registration record for tag {old_norm:?}. Exception is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return Err(RenameTagError::PartialFailure { updated, total });
            }
        }
        if !placeholder {
            updated += 1;
        }
    }
    con.close().unwrap();
    events::publish_collection_changed(request.workspace_id);
    Ok(TagMutationApi { updated })
}

/// folds every use of the source tag into the target tag. Merging is idempotent; once
/// the source is gone a rerun updates nothing and succeeds
pub fn merge_tag(request: MergeTagRequest) -> Result<TagMutationApi, MergeTagError> {
    let source_norm = normalize(&request.source);
    let target_title = request.target.trim().to_string();
    let target_norm = normalize(&target_title);
    if source_norm.is_empty() || target_norm.is_empty() || target_norm == EMPTY_TAG {
        return Err(MergeTagError::InvalidTitle);
    }
    if source_norm == target_norm {
        return Ok(TagMutationApi { updated: 0 });
    }
    let con = open_connection();
    let files = match file_repository::get_files_with_tag(request.workspace_id, &source_norm, &con)
    {
        Ok(files) => files,
        Err(e) => {
            con.close().unwrap();
            log::error!(
                "Failed to load files carrying tag {source_norm:?}. Exception is {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(MergeTagError::DbError);
        }
    };
    let total = files.iter().filter(|f| !f.is_tag_placeholder()).count() as u32;
    let mut updated: u32 = 0;
    for mut file in files {
        let placeholder = file.is_tag_placeholder();
        file.tags.retain(|tag| normalize(tag) != source_norm);
        // the source's registration record loses its last tag and goes away entirely
        if placeholder && file.tags.is_empty() {
            if let Err(e) = file_repository::delete_file(file.id.unwrap_or(0), &con) {
                con.close().unwrap();
                log::error!(
                    "Failed to drop registration record for tag {source_norm:?}. Exception is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return Err(MergeTagError::PartialFailure { updated, total });
            }
            continue;
        }
        if !file.tags.iter().any(|tag| normalize(tag) == target_norm) {
            file.tags.push(target_title.clone());
        }
        file.modified_date = chrono::offset::Local::now().naive_local();
        if let Err(e) = file_repository::update_file(&file, &con) {
            con.close().unwrap();
            log::error!(
                "Failed to merge tag {source_norm:?} into {target_norm:?} on file {:?}. Exception is {e:?}\n{}",
                file.id,
                Backtrace::force_capture()
            );
            return Err(MergeTagError::PartialFailure { updated, total });
        }
        if !placeholder {
            updated += 1;
        }
    }
    con.close().unwrap();
    events::publish_collection_changed(request.workspace_id);
    Ok(TagMutationApi { updated })
}

/// removes a tag from every record in the workspace. Passing [EMPTY_TAG] (or a
/// whitespace-only title) instead strips blank entries out of every tag array
pub fn delete_tag(workspace_id: u32, title: &str) -> Result<TagMutationApi, DeleteTagError> {
    let norm = normalize(title);
    let con = open_connection();
    let files = if norm.is_empty() || norm == EMPTY_TAG {
        match file_repository::get_files_for_workspace(workspace_id, &con) {
            Ok(files) => files
                .into_iter()
                .filter(|f| f.tags.iter().any(|tag| normalize(tag).is_empty()))
                .collect::<Vec<FileRecord>>(),
            Err(e) => {
                con.close().unwrap();
                log::error!(
                    "Failed to load files for workspace {workspace_id}. Exception is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return Err(DeleteTagError::DbError);
            }
        }
    } else {
        match file_repository::get_files_with_tag(workspace_id, &norm, &con) {
            Ok(files) => files,
            Err(e) => {
                con.close().unwrap();
                log::error!(
                    "Failed to load files carrying tag {norm:?}. Exception is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return Err(DeleteTagError::DbError);
            }
        }
    };
    let total = files.iter().filter(|f| !f.is_tag_placeholder()).count() as u32;
    let mut updated: u32 = 0;
    for mut file in files {
        let placeholder = file.is_tag_placeholder();
        file.tags.retain(|tag| {
            let tag_norm = normalize(tag);
            !tag_norm.is_empty() && tag_norm != norm
        });
        if placeholder && file.tags.is_empty() {
            if let Err(e) = file_repository::delete_file(file.id.unwrap_or(0), &con) {
                con.close().unwrap();
                log::error!(
                    "Failed to drop registration record for tag {norm:?}. Exception is {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return Err(DeleteTagError::PartialFailure { updated, total });
            }
            continue;
        }
        file.modified_date = chrono::offset::Local::now().naive_local();
        if let Err(e) = file_repository::update_file(&file, &con) {
            con.close().unwrap();
            log::error!(
                "Failed to remove tag {norm:?} from file {:?}. Exception is {e:?}\n{}",
                file.id,
                Backtrace::force_capture()
            );
            return Err(DeleteTagError::PartialFailure { updated, total });
        }
        if !placeholder {
            updated += 1;
        }
    }
    con.close().unwrap();
    events::publish_collection_changed(workspace_id);
    Ok(TagMutationApi { updated })
}

#[cfg(test)]
mod tag_color_tests {
    use crate::service::tag_service::tag_color;

    #[test]
    fn color_is_deterministic() {
        assert_eq!(tag_color("design"), tag_color("design"));
    }

    #[test]
    fn casing_and_whitespace_do_not_change_the_color() {
        assert_eq!(tag_color("design"), tag_color("  Design "));
    }

    #[test]
    fn color_is_a_palette_entry() {
        let color = tag_color("whatever");
        assert!(color.starts_with('#'));
        assert_eq!(7, color.len());
    }
}

#[cfg(test)]
mod collect_tags_tests {
    use crate::search::rank::score_tests_support::file;
    use crate::service::tag_service::collect_tags;

    #[test]
    fn collects_first_seen_casing_sorted() {
        let files = vec![
            file(1, "a", "a.txt", vec!["Zebra", "Design"]),
            file(2, "b", "b.txt", vec!["design", "apple"]),
        ];
        assert_eq!(
            vec!["apple".to_string(), "Design".to_string(), "Zebra".to_string()],
            collect_tags(&files)
        );
    }
}

#[cfg(test)]
mod tag_stats_tests {
    use crate::model::request::tag_requests::{TagFilter, TagSort};
    use crate::search::rank::score_tests_support::file;
    use crate::service::tag_service::{tag_stats, EMPTY_TAG};

    #[test]
    fn counts_files_per_normalized_tag() {
        let files = vec![
            file(1, "a", "a.txt", vec!["Design"]),
            file(2, "b", "b.txt", vec!["design", "wip"]),
        ];
        let stats = tag_stats(&files, TagSort::Name, TagFilter::All, false);
        assert_eq!(2, stats.len());
        assert_eq!("Design", stats[0].tag);
        assert_eq!(2, stats[0].count);
        assert_eq!(vec![1, 2], stats[0].files);
        assert_eq!("wip", stats[1].tag);
        assert_eq!(1, stats[1].count);
    }

    #[test]
    fn placeholders_register_without_counting() {
        let mut placeholder = file(1, ".tag-archived", ".tag-archived", vec!["Archived"]);
        placeholder.file_size = 0;
        let files = vec![placeholder, file(2, "a", "a.txt", vec!["wip"])];
        let stats = tag_stats(&files, TagSort::Name, TagFilter::All, false);
        assert_eq!(2, stats.len());
        assert_eq!("Archived", stats[0].tag);
        assert_eq!(0, stats[0].count);
        assert!(stats[0].files.is_empty());
    }

    #[test]
    fn unused_filter_keeps_only_registered_tags() {
        let mut placeholder = file(1, ".tag-archived", ".tag-archived", vec!["Archived"]);
        placeholder.file_size = 0;
        let files = vec![placeholder, file(2, "a", "a.txt", vec!["wip"])];
        let unused = tag_stats(&files, TagSort::Name, TagFilter::Unused, false);
        assert_eq!(1, unused.len());
        assert_eq!("Archived", unused[0].tag);
        let used = tag_stats(&files, TagSort::Name, TagFilter::Used, false);
        assert_eq!(1, used.len());
        assert_eq!("wip", used[0].tag);
    }

    #[test]
    fn untagged_files_roll_up_under_the_empty_pseudo_tag() {
        let files = vec![
            file(1, "a", "a.txt", vec![]),
            file(2, "b", "b.txt", vec!["wip"]),
        ];
        let stats = tag_stats(&files, TagSort::Count, TagFilter::All, true);
        let empty = stats.iter().find(|s| s.tag == EMPTY_TAG).unwrap();
        assert_eq!(1, empty.count);
        assert_eq!(vec![1], empty.files);
        let without = tag_stats(&files, TagSort::Count, TagFilter::All, false);
        assert!(without.iter().all(|s| s.tag != EMPTY_TAG));
    }

    #[test]
    fn count_sort_is_descending_with_name_tiebreak() {
        let files = vec![
            file(1, "a", "a.txt", vec!["beta", "alpha"]),
            file(2, "b", "b.txt", vec!["beta"]),
        ];
        let stats = tag_stats(&files, TagSort::Count, TagFilter::All, false);
        let tags: Vec<&str> = stats.iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(vec!["beta", "alpha"], tags);
    }

    #[test]
    fn recent_sort_follows_the_newest_carrying_file() {
        let mut older = file(1, "a", "a.txt", vec!["stale"]);
        older.modified_date -= chrono::Duration::days(30);
        let files = vec![older, file(2, "b", "b.txt", vec!["fresh"])];
        let stats = tag_stats(&files, TagSort::Recent, TagFilter::All, false);
        let tags: Vec<&str> = stats.iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(vec!["fresh", "stale"], tags);
    }
}




#[cfg(test)]
mod merge_tag_tests {
    use crate::model::request::tag_requests::MergeTagRequest;
    use crate::service::file_service::get_file;
    use crate::service::tag_service::merge_tag;
    use crate::test::{cleanup, create_file_db_entry, refresh_db};

    fn request(source: &str, target: &str) -> MergeTagRequest {
        MergeTagRequest {
            workspace_id: 1,
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn merge_replaces_source_with_target() {
        refresh_db();
        let only_source = create_file_db_entry(1, "a", &["draft"]);
        let has_both = create_file_db_entry(1, "b", &["draft", "Final"]);
        let res = merge_tag(request("draft", "Final")).unwrap();
        assert_eq!(2, res.updated);
        assert_eq!(vec!["Final".to_string()], get_file(only_source).unwrap().tags);
        assert_eq!(vec!["Final".to_string()], get_file(has_both).unwrap().tags);
        cleanup();
    }

    #[test]
    fn merge_is_idempotent() {
        refresh_db();
        create_file_db_entry(1, "a", &["draft"]);
        merge_tag(request("draft", "Final")).unwrap();
        let rerun = merge_tag(request("draft", "Final")).unwrap();
        assert_eq!(0, rerun.updated);
        cleanup();
    }

    #[test]
    fn merge_into_itself_is_a_noop() {
        refresh_db();
        let id = create_file_db_entry(1, "a", &["draft"]);
        let res = merge_tag(request("draft", "DRAFT")).unwrap();
        assert_eq!(0, res.updated);
        assert_eq!(vec!["draft".to_string()], get_file(id).unwrap().tags);
        cleanup();
    }

    #[test]
    fn merge_drops_the_source_registration_record() {
        refresh_db();
        crate::service::tag_service::create_tag(
            crate::model::request::tag_requests::CreateTagRequest {
                workspace_id: 1,
                title: "draft".to_string(),
            },
        )
        .unwrap();
        create_file_db_entry(1, "a", &["draft"]);
        merge_tag(request("draft", "Final")).unwrap();
        let stats = crate::service::tag_service::get_tag_stats(
            1,
            crate::model::request::tag_requests::TagSort::Name,
            crate::model::request::tag_requests::TagFilter::All,
            false,
        )
        .unwrap();
        let tags: Vec<&str> = stats.iter().map(|s| s.tag.as_str()).collect();
        assert_eq!(vec!["Final"], tags);
        cleanup();
    }
}
