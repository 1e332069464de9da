use anyhow::Result;

use super::memory_db;
use crate::service::{self, NewRow, RowChanges, SortColumn, SortDirection};

fn row(name: &str, version: i32) -> NewRow {
    NewRow {
        name: name.to_string(),
        description: format!("{name} v{version}"),
        tags: "test".into(),
        is_active: true,
        version,
    }
}

#[tokio::test]
async fn insert_and_find_by_name_orders_versions() -> Result<()> {
    let db = memory_db().await?;
    service::insert(&db, row("svc-a", 2)).await?;
    service::insert(&db, row("svc-a", 1)).await?;
    service::insert(&db, row("svc-b", 1)).await?;

    let rows = service::find_by_name(&db, "svc-a").await?;
    assert_eq!(rows.iter().map(|r| r.version).collect::<Vec<_>>(), vec![1, 2]);
    assert!(rows.iter().all(|r| r.deleted_at.is_none()));

    assert!(service::find_by_name(&db, "missing").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn duplicate_name_version_is_rejected() -> Result<()> {
    let db = memory_db().await?;
    service::insert(&db, row("svc-a", 1)).await?;
    let dup = service::insert(&db, row("svc-a", 1)).await;
    assert!(matches!(dup, Err(crate::errors::ModelError::Db(_))));
    Ok(())
}

#[tokio::test]
async fn update_in_place_touches_only_given_fields() -> Result<()> {
    let db = memory_db().await?;
    let created = service::insert(&db, row("svc-a", 1)).await?;

    let changes = RowChanges { description: Some("patched".into()), tags: None, is_active: Some(false) };
    let updated = service::update_by_name_and_version(&db, "svc-a", 1, &changes).await?.expect("row exists");
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.description, "patched");
    assert_eq!(updated.tags, "test");
    assert!(!updated.is_active);

    let none = service::update_by_name_and_version(&db, "svc-a", 9, &changes).await?;
    assert!(none.is_none());
    Ok(())
}

#[tokio::test]
async fn soft_delete_hides_from_listings_but_not_from_name_lookup() -> Result<()> {
    let db = memory_db().await?;
    service::insert(&db, row("svc-a", 1)).await?;
    service::insert(&db, row("svc-a", 2)).await?;
    service::insert(&db, row("svc-b", 1)).await?;

    assert_eq!(service::soft_delete_by_name(&db, "svc-a").await?, 2);
    assert_eq!(service::soft_delete_by_name(&db, "svc-a").await?, 0);

    let active = service::list_active(&db).await?;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "svc-b");

    let rows = service::find_by_name(&db, "svc-a").await?;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.deleted_at.is_some() && !r.is_active));

    assert_eq!(service::count_distinct_names(&db, "%").await?, 1);
    Ok(())
}

#[tokio::test]
async fn grouped_page_counts_versions_and_pages() -> Result<()> {
    let db = memory_db().await?;
    for v in 1..=3 {
        service::insert(&db, row("alpha", v)).await?;
    }
    service::insert(&db, row("beta", 1)).await?;
    for v in 1..=2 {
        service::insert(&db, row("gamma", v)).await?;
    }

    assert_eq!(service::count_distinct_names(&db, "%").await?, 3);
    assert_eq!(service::count_distinct_names(&db, "%a%").await?, 3);
    assert_eq!(service::count_distinct_names(&db, "al%").await?, 1);
    assert_eq!(service::count_distinct_names(&db, "nothing%").await?, 0);

    let page = service::paged_grouped_by_name(&db, "%", SortColumn::Version, SortDirection::Desc, 2, 0).await?;
    assert_eq!(page.len(), 2);
    assert_eq!((page[0].name.as_str(), page[0].count), ("alpha", 3));
    assert_eq!((page[1].name.as_str(), page[1].count), ("gamma", 2));

    let page2 = service::paged_grouped_by_name(&db, "%", SortColumn::Version, SortDirection::Desc, 2, 2).await?;
    assert_eq!(page2.len(), 1);
    assert_eq!(page2[0].name, "beta");

    let by_name = service::paged_grouped_by_name(&db, "%", SortColumn::Name, SortDirection::Asc, 10, 0).await?;
    let names: Vec<_> = by_name.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    Ok(())
}

#[tokio::test]
async fn default_sort_puts_most_recently_created_name_first() -> Result<()> {
    let db = memory_db().await?;
    let pause = || tokio::time::sleep(std::time::Duration::from_millis(20));
    service::insert(&db, row("alpha", 1)).await?;
    pause().await;
    service::insert(&db, row("beta", 1)).await?;
    pause().await;
    // a new version moves alpha's MAX(created_at) past beta
    service::insert(&db, row("alpha", 2)).await?;

    let page = service::paged_grouped_by_name(&db, "%", SortColumn::default(), SortDirection::default(), 10, 0).await?;
    let names: Vec<_> = page.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta"]);

    pause().await;
    service::insert(&db, row("gamma", 1)).await?;
    let page = service::paged_grouped_by_name(&db, "%", SortColumn::CreatedAt, SortDirection::Desc, 10, 0).await?;
    let names: Vec<_> = page.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["gamma", "alpha", "beta"]);

    let oldest_first = service::paged_grouped_by_name(&db, "%", SortColumn::CreatedAt, SortDirection::Asc, 1, 0).await?;
    assert_eq!(oldest_first[0].name, "beta");
    Ok(())
}

#[tokio::test]
async fn ping_succeeds_on_open_connection() -> Result<()> {
    let db = memory_db().await?;
    service::ping(&db).await?;
    Ok(())
}
