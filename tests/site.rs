//! End-to-end tests over a filesystem corpus.

use std::fs;
use std::path::Path;

use vellum::{Site, SiteConfig};

fn write_post(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn site_at(dir: &Path) -> Site {
    let config = SiteConfig {
        content_dir: dir.to_path_buf(),
        ..SiteConfig::default()
    };
    Site::open(config).unwrap()
}

fn seed_corpus(dir: &Path) {
    write_post(
        dir,
        "first-post.md",
        "---\ntitle: First Post\ndate: 2024-01-01\ndescription: the middle one\n---\n\n# First\n",
    );
    write_post(
        dir,
        "second-post.md",
        "---\ntitle: Second Post\ndate: 2025-06-01\ndescription: the newest one\n---\n\n# Second\n",
    );
    write_post(
        dir,
        "third-post.md",
        "---\ntitle: Third Post\ndate: 2023-03-01\ndescription: the oldest one\n---\n\n# Third\n",
    );
}

#[test]
fn listing_is_sorted_newest_first() {
    let dir = tempfile::tempdir().unwrap();
    seed_corpus(dir.path());

    let posts = site_at(dir.path()).list_documents(None).unwrap();
    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Second Post", "First Post", "Third Post"]);
}

#[test]
fn listing_limit_is_a_prefix_of_the_full_listing() {
    let dir = tempfile::tempdir().unwrap();
    seed_corpus(dir.path());
    let site = site_at(dir.path());

    let full = site.list_documents(None).unwrap();
    let limited = site.list_documents(Some(1)).unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].slug, full[0].slug);
    assert_eq!(limited[0].title, "Second Post");

    assert_eq!(site.list_documents(Some(0)).unwrap().len(), full.len());
    assert_eq!(site.list_documents(Some(99)).unwrap().len(), full.len());
}

#[test]
fn invalid_documents_drop_out_of_the_listing() {
    let dir = tempfile::tempdir().unwrap();
    seed_corpus(dir.path());
    write_post(
        dir.path(),
        "untitled.md",
        "---\ndate: 2026-01-01\ndescription: no title\n---\nbody",
    );
    write_post(dir.path(), "bare.md", "no front matter at all");
    fs::write(dir.path().join("binary.md"), [0xff, 0xfe, 0x00]).unwrap();

    let site = site_at(dir.path());
    let posts = site.list_documents(None).unwrap();
    assert_eq!(posts.len(), 3);
    assert!(posts.iter().all(|p| p.slug != "untitled"));

    // The same documents load as NotFound individually.
    assert!(site.load_document("untitled").is_err());
    assert!(site.load_document("bare").is_err());
    assert!(site.load_document("binary").is_err());
}

#[test]
fn load_document_produces_html_headings_and_toc() {
    let dir = tempfile::tempdir().unwrap();
    write_post(
        dir.path(),
        "guide.md",
        "---\ntitle: Guide\ndate: 2024-05-05\ndescription: a guide\n---\n\n\
         ## Setup\n\nwords\n\n### Linux\n\nmore words\n\n## Usage\n\nthe end\n",
    );

    let doc = site_at(dir.path()).load_document("guide").unwrap();
    assert_eq!(doc.front_matter.title, "Guide");
    assert_eq!(doc.front_matter.description.as_deref(), Some("a guide"));

    assert!(doc.html.contains("<h2 id=\"setup\">Setup</h2>"));
    assert!(doc.html.contains("<h3 id=\"linux\">Linux</h3>"));

    let ids: Vec<&str> = doc.headings.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, ["setup", "linux", "usage"]);

    assert_eq!(doc.toc.len(), 2);
    assert_eq!(doc.toc[0].children.len(), 1);
    assert_eq!(doc.toc[0].children[0].id, "linux");
}

#[test]
fn duplicate_headings_get_suffixed_ids() {
    let dir = tempfile::tempdir().unwrap();
    write_post(
        dir.path(),
        "dup.md",
        "---\ntitle: Dup\ndate: 2024-01-01\ndescription: d\n---\n\n## Intro\n\n## Intro\n",
    );

    let doc = site_at(dir.path()).load_document("dup").unwrap();
    let ids: Vec<&str> = doc.headings.iter().map(|h| h.id.as_str()).collect();
    assert_eq!(ids, ["intro", "intro-1"]);
    assert_eq!(doc.toc.len(), 2);
    assert!(doc.toc.iter().all(|n| n.children.is_empty()));
}

#[test]
fn unknown_code_language_never_fails_the_document() {
    let dir = tempfile::tempdir().unwrap();
    write_post(
        dir.path(),
        "snippets.md",
        "---\ntitle: Snippets\ndate: 2024-01-01\ndescription: d\n---\n\n\
         ```zzz_not_a_language\nweird code\n```\n\nstill here\n",
    );

    let doc = site_at(dir.path()).load_document("snippets").unwrap();
    assert!(doc.html.contains("weird code"));
    assert!(doc.html.contains("still here"));
}

#[test]
fn rendering_is_deterministic_across_loads() {
    let dir = tempfile::tempdir().unwrap();
    write_post(
        dir.path(),
        "stable.md",
        "---\ntitle: Stable\ndate: 2024-01-01\ndescription: d\n---\n\n\
         ## A\n\n## A\n\n```rust\nlet x = 1;\n```\n",
    );

    let site = site_at(dir.path());
    let first = site.load_document("stable").unwrap();
    let second = site.load_document("stable").unwrap();
    assert_eq!(first.html, second.html);
    assert_eq!(first.headings, second.headings);
}

#[test]
fn missing_slug_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    seed_corpus(dir.path());

    let site = site_at(dir.path());
    assert!(site.load_document("missing-slug").is_err());
    assert!(site.load_document("../first-post").is_err());
}

#[test]
fn description_can_be_relaxed_by_config() {
    let dir = tempfile::tempdir().unwrap();
    write_post(
        dir.path(),
        "terse.md",
        "---\ntitle: Terse\ndate: 2024-01-01\n---\nbody",
    );

    // Required by default: the document is invisible.
    let strict = site_at(dir.path());
    assert!(strict.list_documents(None).unwrap().is_empty());
    assert!(strict.load_document("terse").is_err());

    // Relaxed: only title and date are enforced.
    let config = SiteConfig {
        content_dir: dir.path().to_path_buf(),
        required_fields: ["title", "date"].into_iter().map(String::from).collect(),
        ..SiteConfig::default()
    };
    let relaxed = Site::open(config).unwrap();
    assert_eq!(relaxed.list_documents(None).unwrap().len(), 1);
    assert!(relaxed.load_document("terse").is_ok());
}

#[test]
fn highlight_css_is_available_for_the_page_layer() {
    let dir = tempfile::tempdir().unwrap();
    seed_corpus(dir.path());

    let css = site_at(dir.path()).highlight_css().unwrap();
    assert!(!css.is_empty());
}
