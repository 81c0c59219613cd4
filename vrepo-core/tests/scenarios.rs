//! End-to-end scenarios against a real temp directory tree.

use std::fs;

use pretty_assertions::assert_eq;
use vrepo_core::{AddResource, FilesystemResource, LinkResource, MemoryStore, Repository, RepositoryConfig};

fn repo_with<'s>(store: &'s mut MemoryStore, base: &std::path::Path) -> Repository<'s> {
    Repository::new(store, RepositoryConfig::new(base))
}

#[test]
fn s1_and_s2_css_mapping_and_listing() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("fs/css")).expect("mkdir");
    fs::write(dir.path().join("fs/css/main.css"), b"body{}").expect("write");

    let mut store = MemoryStore::new();
    let mut repo = repo_with(&mut store, dir.path());

    repo.add(
        "/app/css",
        AddResource::Filesystem(FilesystemResource::new(dir.path().join("fs/css"))),
    )
    .expect("add");

    let resource = repo.get("/app/css/main.css").expect("get");
    assert_eq!(resource.fs_path.unwrap(), dir.path().join("fs/css/main.css"));

    let children = repo.list_children("/app/css").expect("list");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].virtual_path, "/app/css/main.css");
}

#[test]
fn s3_more_specific_mapping_overrides_shallower_one() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("fs/app/config")).expect("mkdir");
    fs::write(dir.path().join("fs/app/config/a.yml"), b"base: true").expect("write");
    fs::create_dir_all(dir.path().join("fs/override")).expect("mkdir");
    fs::write(dir.path().join("fs/override/a.yml"), b"override: true").expect("write");

    let mut store = MemoryStore::new();
    let mut repo = repo_with(&mut store, dir.path());

    repo.add_fs_path("/app", dir.path().join("fs/app")).expect("add");
    repo.add_fs_path("/app/config", dir.path().join("fs/override"))
        .expect("add override");

    let resource = repo.get("/app/config/a.yml").expect("get");
    assert_eq!(resource.fs_path.unwrap(), dir.path().join("fs/override/a.yml"));
}

#[test]
fn s4_link_resolves_to_target() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("fs/css")).expect("mkdir");
    fs::write(dir.path().join("fs/css/main.css"), b"body{}").expect("write");

    let mut store = MemoryStore::new();
    let mut repo = repo_with(&mut store, dir.path());

    repo.add_fs_path("/app/css", dir.path().join("fs/css")).expect("add");
    repo.add(
        "/link/x",
        AddResource::Link(LinkResource::new("/app/css/main.css")),
    )
    .expect("add link");

    let resource = repo.get("/link/x").expect("get");
    assert_eq!(resource.fs_path.unwrap(), dir.path().join("fs/css/main.css"));
}

#[test]
fn s5_recursive_glob_sorted() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("fs/sub")).expect("mkdir");
    fs::write(dir.path().join("fs/main.css"), b"a").expect("write");
    fs::write(dir.path().join("fs/sub/nested.css"), b"b").expect("write");
    fs::write(dir.path().join("fs/sub/notes.txt"), b"c").expect("write");

    let mut store = MemoryStore::new();
    let mut repo = repo_with(&mut store, dir.path());
    repo.add_fs_path("/app", dir.path().join("fs")).expect("add");

    let matches = repo.find("/app/**/*.css", "glob").expect("find");
    let paths: Vec<&str> = matches.iter().map(|r| r.virtual_path.as_str()).collect();
    assert_eq!(paths, vec!["/app/main.css", "/app/sub/nested.css"]);
}

#[test]
fn s6_remove_rejects_non_mapping_then_removes_mapping() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("fs/css")).expect("mkdir");
    fs::write(dir.path().join("fs/css/main.css"), b"body{}").expect("write");

    let mut store = MemoryStore::new();
    let mut repo = repo_with(&mut store, dir.path());
    repo.add_fs_path("/app/css", dir.path().join("fs/css")).expect("add");

    let err = repo.remove("/app/css/main.css").unwrap_err();
    assert!(matches!(err, vrepo_core::RepositoryError::UnsupportedOperation { .. }));
    assert!(repo.get("/app/css/main.css").is_ok());

    let removed = repo.remove("/app/css").expect("remove");
    assert!(removed >= 1);
    assert!(repo.get("/app/css/main.css").is_err());
}

#[test]
fn root_removal_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = MemoryStore::new();
    let mut repo = repo_with(&mut store, dir.path());
    assert!(repo.remove("/").is_err());
    assert!(repo.remove("//").is_err());
}
