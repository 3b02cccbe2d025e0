//! Benchmarks for store and backup operations.
//!
//! Run with: cargo bench --bench store_benchmarks

use corpus_vault::backup::{BackupFormat, BackupManager};
use corpus_vault::domain::{AppNote, Container, NoteQuery, Tag, group_tags};
use corpus_vault::infra::BlobStore;
use corpus_vault::store::{CorpusRepository, NotesRepository, SqliteStore};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::io::Cursor;
use tempfile::TempDir;

// =============================================================================
// Test Data Generation
// =============================================================================

const SCHOLARS: &[&str] = &["Ibn Taymiyyah", "Al-Nawawi", "Ibn Kathir", "Al-Ghazali"];

const CATEGORIES: &[&str] = &["Aqeedah", "Fiqh", "Tafsir", "Hadith"];

const TAGS: &[&str] = &["aqeedah", "fiqh", "salah", "zakat", "sawm", "hajj", "adab"];

/// Sample words for generating note bodies
const WORDS: &[&str] = &[
    "tawheed", "mercy", "patience", "prayer", "knowledge", "intention", "sincerity",
    "remembrance", "gratitude", "repentance", "justice", "charity", "fasting", "worship",
];

fn generate_note(index: usize) -> AppNote {
    let scholar = SCHOLARS[index % SCHOLARS.len()];
    let category = CATEGORIES[index % CATEGORIES.len()];
    let container = if index % 5 == 0 {
        Container::general()
    } else {
        Container::category(scholar, category).unwrap()
    };

    let body: Vec<&str> = (0..50).map(|j| WORDS[(index + j) % WORDS.len()]).collect();
    AppNote::builder(&format!("Note {} - {}", index, WORDS[index % WORDS.len()]))
        .body(&format!("**{}**\n\n{}", WORDS[index % WORDS.len()], body.join(" ")))
        .citation(&format!("Quran {}:{}", index % 114 + 1, index % 20 + 1))
        .pinned(index % 10 == 0)
        .container(container)
        .build()
}

/// Set up a store with N notes, the full hierarchy, and two tags per note
fn setup_store_with_notes(count: usize) -> SqliteStore {
    let mut store = SqliteStore::open_in_memory().expect("Failed to open store");
    for scholar in SCHOLARS {
        let s = store.add_scholar(scholar, None, None).unwrap();
        for category in CATEGORIES {
            store.add_category(&s.id, category).unwrap();
        }
    }
    for i in 0..count {
        let note = generate_note(i);
        store.upsert(&note).unwrap();
        let tags = [
            Tag::new(TAGS[i % TAGS.len()]).unwrap(),
            Tag::new(TAGS[(i + 2) % TAGS.len()]).unwrap(),
        ];
        store.set_tags(note.id(), &tags).unwrap();
    }
    store
}

// =============================================================================
// Write Benchmarks
// =============================================================================

fn bench_upsert(c: &mut Criterion) {
    let mut group = c.benchmark_group("upsert");

    for size in [100, 500, 1000] {
        let notes: Vec<AppNote> = (0..size).map(generate_note).collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("notes", size), &size, |b, _| {
            b.iter(|| {
                let mut store = SqliteStore::open_in_memory().unwrap();
                for note in &notes {
                    store.upsert(note).unwrap();
                }
            });
        });
    }

    group.finish();
}

// =============================================================================
// Query Benchmarks
// =============================================================================

fn bench_list_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_all");

    for size in [100, 500, 1000] {
        let store = setup_store_with_notes(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("notes", size), &size, |b, _| {
            b.iter(|| store.list_all().unwrap());
        });
    }

    group.finish();
}

fn bench_list_by_container(c: &mut Criterion) {
    let store = setup_store_with_notes(1000);
    let container = Container::category("Ibn Taymiyyah", "Aqeedah").unwrap();

    c.bench_function("list_by_container", |b| {
        b.iter(|| store.list_by_container(&container).unwrap())
    });
}

fn bench_search(c: &mut Criterion) {
    let store = setup_store_with_notes(1000);
    let notes = store.list_all().unwrap();
    let tags_by_note = group_tags(&store.all_note_tag_names().unwrap());

    let mut group = c.benchmark_group("search");

    group.bench_function("body_term", |b| {
        let query = NoteQuery::new("patience");
        b.iter(|| query.filter(&notes, &tags_by_note))
    });

    group.bench_function("citation", |b| {
        let query = NoteQuery::new("quran 2:");
        b.iter(|| query.filter(&notes, &tags_by_note))
    });

    group.bench_function("tag", |b| {
        let query = NoteQuery::new("zakat");
        b.iter(|| query.filter(&notes, &tags_by_note))
    });

    group.finish();
}

fn bench_stats(c: &mut Criterion) {
    let store = setup_store_with_notes(1000);

    c.bench_function("stats", |b| b.iter(|| store.stats().unwrap()));
}

// =============================================================================
// Backup Benchmarks
// =============================================================================

fn bench_export_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_json");

    for size in [100, 1000] {
        let mut store = setup_store_with_notes(size);
        let dir = TempDir::new().unwrap();
        let blobs = BlobStore::new(dir.path().join("attachments"));
        let manager = BackupManager::new(&mut store, &blobs);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("notes", size), &size, |b, _| {
            b.iter(|| {
                manager
                    .export_to(Cursor::new(Vec::new()), BackupFormat::Json)
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_import_json(c: &mut Criterion) {
    let mut source = setup_store_with_notes(1000);
    let dir = TempDir::new().unwrap();
    let blobs = BlobStore::new(dir.path().join("attachments"));

    let mut bytes = Cursor::new(Vec::new());
    BackupManager::new(&mut source, &blobs)
        .export_to(&mut bytes, BackupFormat::Json)
        .unwrap();
    let bytes = bytes.into_inner();

    c.bench_function("import_json_1000", |b| {
        b.iter(|| {
            let mut store = SqliteStore::open_in_memory().unwrap();
            BackupManager::new(&mut store, &blobs)
                .import_from(bytes.as_slice())
                .unwrap()
        })
    });
}

// =============================================================================
// Criterion Groups
// =============================================================================

criterion_group!(write_benches, bench_upsert);

criterion_group!(
    query_benches,
    bench_list_all,
    bench_list_by_container,
    bench_search,
    bench_stats,
);

criterion_group!(backup_benches, bench_export_json, bench_import_json);

criterion_main!(write_benches, query_benches, backup_benches);
