use super::*;
use crate::domain::{AppNote, Container, NoteDisplayMode, NoteId, Tag};
use crate::infra::BlobStore;
use crate::store::{CorpusRepository, NotesRepository, PrefsRepository, SqliteStore};
use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::Cursor;
use tempfile::{TempDir, tempdir};

struct Vault {
    dir: TempDir,
    store: SqliteStore,
    blobs: BlobStore,
}

impl Vault {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let store = SqliteStore::open(&dir.path().join("vault.db")).unwrap();
        let blobs = BlobStore::new(dir.path().join("attachments"));
        Self {
            dir,
            store,
            blobs,
        }
    }

    fn manager(&mut self) -> BackupManager<'_> {
        BackupManager::new(&mut self.store, &self.blobs)
    }

    fn export(&mut self, format: BackupFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        self.manager().export_to(&mut out, format).unwrap();
        out.into_inner()
    }
}

/// Ibn Taymiyyah > Aqeedah with a pinned "Tawheed" note, a tag, and a PDF.
fn seeded() -> (Vault, NoteId) {
    let mut vault = Vault::new();
    let scholar = vault
        .store
        .add_scholar("Ibn Taymiyyah", Some("classical"), Some("Hanbali"))
        .unwrap();
    let category = vault.store.add_category(&scholar.id, "Aqeedah").unwrap();
    vault
        .store
        .add_subcategory(&scholar.id, &category.name, "Asma wa Sifat")
        .unwrap();

    let note = AppNote::builder("Tawheed")
        .body("The **oneness** of Allah")
        .citation("Quran 2:153")
        .container(category.container(&scholar).unwrap())
        .build();
    vault.store.upsert(&note).unwrap();
    vault.store.toggle_pin(note.id()).unwrap();
    vault
        .store
        .add_tag(note.id(), &Tag::new("aqeedah").unwrap())
        .unwrap();

    let src = vault.dir.path().join("Majmu al-Fatawa.pdf");
    fs::write(&src, b"%PDF-1.7 fatawa").unwrap();
    let (attachment, _) = vault.blobs.import_file(note.id(), &src).unwrap();
    vault.store.add_attachment(&attachment).unwrap();
    vault.store.set_display_mode(NoteDisplayMode::Book).unwrap();

    let id = note.id().clone();
    (vault, id)
}

fn normalized(store: &SqliteStore) -> crate::domain::Dataset {
    let mut snapshot = store.snapshot().unwrap();
    snapshot.normalize();
    snapshot
}

// ===========================================
// Round Trips
// ===========================================

#[test]
fn zip_round_trip_restores_everything() {
    let (mut source, _) = seeded();
    let bytes = source.export(BackupFormat::Zip);

    let mut target = Vault::new();
    let summary = target.manager().import_from(bytes.as_slice()).unwrap();

    assert_eq!(summary.format, BackupFormat::Zip);
    assert_eq!(summary.files_restored, 1);
    assert!(summary.warnings.is_empty(), "{:?}", summary.warnings);
    assert_eq!(normalized(&target.store), normalized(&source.store));

    let attachment = &target.store.all_attachments().unwrap()[0];
    assert_eq!(
        target.blobs.read(&attachment.storage_path).unwrap(),
        b"%PDF-1.7 fatawa"
    );
}

#[test]
fn export_wipe_import_scenario() {
    let (mut vault, note_id) = seeded();
    let bytes = vault.export(BackupFormat::Zip);

    vault.store.wipe().unwrap();
    assert!(vault.store.list_scholars().unwrap().is_empty());

    vault.manager().import_from(bytes.as_slice()).unwrap();

    let scholars = vault.store.list_scholars().unwrap();
    assert_eq!(scholars.len(), 1);
    assert_eq!(scholars[0].name, "Ibn Taymiyyah");
    let categories = vault.store.list_categories(&scholars[0].id).unwrap();
    assert_eq!(categories[0].name, "Aqeedah");

    let note = vault.store.get_note(&note_id).unwrap().unwrap();
    assert_eq!(note.title(), "Tawheed");
    assert_eq!(note.citation(), "Quran 2:153");
    assert!(note.is_pinned());
    assert_eq!(
        note.container(),
        &Container::category("Ibn Taymiyyah", "Aqeedah").unwrap()
    );
    assert_eq!(vault.store.display_mode().unwrap(), NoteDisplayMode::Book);
}

#[test]
fn json_round_trip_restores_rows() {
    let (mut source, _) = seeded();
    let bytes = source.export(BackupFormat::Json);
    assert_eq!(bytes.first(), Some(&b'{'));

    let mut target = Vault::new();
    let summary = target.manager().import_from(bytes.as_slice()).unwrap();

    assert_eq!(summary.format, BackupFormat::Json);
    assert_eq!(summary.files_restored, 0);
    assert_eq!(summary.warnings.len(), 1, "attachment file is not in a JSON backup");
    assert_eq!(normalized(&target.store), normalized(&source.store));
}

#[test]
fn json_import_keeps_files_already_on_disk() {
    let (mut vault, _) = seeded();
    let bytes = vault.export(BackupFormat::Json);

    let summary = vault.manager().import_from(bytes.as_slice()).unwrap();
    assert_eq!(summary.files_restored, 1);
    let attachment = &vault.store.all_attachments().unwrap()[0];
    assert!(vault.blobs.exists(&attachment.storage_path));
}

#[test]
fn import_replaces_existing_data() {
    let (mut source, _) = seeded();
    let bytes = source.export(BackupFormat::Zip);

    let mut target = Vault::new();
    target.store.add_scholar("Al-Nawawi", None, None).unwrap();
    target.blobs.put("stray", b"old").unwrap();

    target.manager().import_from(bytes.as_slice()).unwrap();

    let names: Vec<String> = target
        .store
        .list_scholars()
        .unwrap()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Ibn Taymiyyah"]);
    assert!(!target.blobs.exists("stray"));
}

#[test]
fn path_round_trip_is_atomic() {
    let (mut vault, _) = seeded();
    let dir = tempdir().unwrap();
    let name = default_file_name(BackupFormat::Zip, Utc::now());
    let path = dir.path().join(&name);

    let summary = vault.manager().export_to_path(&path, BackupFormat::Zip).unwrap();
    assert_eq!(summary.counts.notes, 1);
    assert_eq!(summary.files, 1);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1, "no temp files left");

    vault.store.wipe().unwrap();
    vault.manager().import_from_path(&path).unwrap();
    assert_eq!(vault.store.list_all().unwrap().len(), 1);
}

// ===========================================
// Failures Leave Data Untouched
// ===========================================

fn assert_import_fails_cleanly(bytes: &[u8]) -> BackupError {
    let (mut vault, _) = seeded();
    let before = normalized(&vault.store);
    let attachment = vault.store.all_attachments().unwrap().remove(0);

    let err = vault.manager().import_from(bytes).unwrap_err();

    assert_eq!(normalized(&vault.store), before);
    assert_eq!(
        vault.blobs.read(&attachment.storage_path).unwrap(),
        b"%PDF-1.7 fatawa"
    );
    err
}

#[test]
fn newer_format_version_is_rejected() {
    let err = assert_import_fails_cleanly(br#"{"formatVersion": 99, "notes": []}"#);
    assert!(matches!(err, BackupError::UnsupportedVersion { found: 99, .. }));
}

#[test]
fn broken_reference_is_rejected() {
    let doc = br#"{
        "formatVersion": 1,
        "categories": [{"id": "x_fiqh", "scholarId": "x", "name": "Fiqh"}]
    }"#;
    let err = assert_import_fails_cleanly(doc);
    assert!(matches!(err, BackupError::Invalid(_)));
}

#[test]
fn hash_mismatch_is_rejected() {
    let (mut source, _) = seeded();
    let bytes = source.export(BackupFormat::Zip);
    let decoded = decode(&bytes).unwrap();

    // Rebuild the archive with tampered file bytes but the original checksum
    let mut writer = ZipBackupWriter::new(Cursor::new(Vec::new()));
    for entry in &decoded.document.attachments {
        let path = entry.archive_path.clone().unwrap();
        writer.add_file(&path, b"tampered").unwrap();
    }
    let tampered = writer.finish(&decoded.document).unwrap().into_inner();

    let err = assert_import_fails_cleanly(&tampered);
    assert!(matches!(err, BackupError::HashMismatch { .. }));
}

/// Exports `vault` as JSON, edits the document, and re-encodes it.
fn edited_json(vault: &mut Vault, edit: impl FnOnce(&mut serde_json::Value)) -> Vec<u8> {
    let bytes = vault.export(BackupFormat::Json);
    let mut doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    edit(&mut doc);
    serde_json::to_vec(&doc).unwrap()
}

#[test]
fn storage_path_outside_store_is_rejected() {
    let (mut source, _) = seeded();
    let bytes = edited_json(&mut source, |doc| {
        doc["attachments"][0]["storagePath"] = "../escape".into();
    });

    let err = assert_import_fails_cleanly(&bytes);
    match err {
        BackupError::Invalid(problems) => {
            assert!(problems.iter().any(|p| p.contains("../escape")), "{:?}", problems)
        }
        other => panic!("expected Invalid, got {:?}", other),
    }
}

#[test]
fn attachments_sharing_a_file_are_rejected() {
    let (mut source, _) = seeded();
    let second = AppNote::builder("Salah").build();
    source.store.upsert(&second).unwrap();
    let src = source.dir.path().join("Riyad as-Salihin.pdf");
    fs::write(&src, b"%PDF-1.7 riyad").unwrap();
    let (attachment, _) = source.blobs.import_file(second.id(), &src).unwrap();
    source.store.add_attachment(&attachment).unwrap();

    let bytes = edited_json(&mut source, |doc| {
        let shared = doc["attachments"][0]["storagePath"].clone();
        doc["attachments"][1]["storagePath"] = shared;
    });

    let err = assert_import_fails_cleanly(&bytes);
    match err {
        BackupError::Invalid(problems) => assert!(
            problems.iter().any(|p| p.contains("shares attachment file")),
            "{:?}",
            problems
        ),
        other => panic!("expected Invalid, got {:?}", other),
    }
}

#[test]
fn corrupt_zip_is_rejected() {
    let (mut source, _) = seeded();
    let bytes = source.export(BackupFormat::Zip);
    let err = assert_import_fails_cleanly(&bytes[..bytes.len() / 3]);
    assert!(matches!(err, BackupError::Zip(_) | BackupError::MissingEntry(_)));
}

#[test]
fn garbage_is_rejected() {
    let err = assert_import_fails_cleanly(b"definitely not a backup");
    assert!(matches!(err, BackupError::Json(_)));
    assert!(
        status_message(BackupOperation::Import, &Err::<(), _>(err))
            .starts_with("Import failed: ")
    );
}

#[test]
fn zip_export_fails_when_file_missing() {
    let (mut vault, _) = seeded();
    let attachment = vault.store.all_attachments().unwrap().remove(0);
    vault.blobs.remove(&attachment.storage_path).unwrap();

    let mut out = Cursor::new(Vec::new());
    let err = vault
        .manager()
        .export_to(&mut out, BackupFormat::Zip)
        .unwrap_err();
    assert!(matches!(err, BackupError::MissingBlob { .. }));
}

// ===========================================
// Legacy Documents
// ===========================================

#[test]
fn legacy_json_without_version_imports() {
    let legacy = br#"{
        "scholars": [{"id": "ibn_kathir", "name": "Ibn Kathir"}],
        "categories": [{"id": "ibn_kathir_tafsir", "scholarId": "ibn_kathir", "name": "Tafsir"}],
        "notes": [{
            "id": "1718035200000",
            "title": "Ayat al-Kursi",
            "preview": "Greatest verse",
            "isPinned": true,
            "container": "Ibn Kathir > Tafsir",
            "updatedAt": "2024-06-10T16:00:00Z"
        }],
        "noteTags": [{"noteId": "1718035200000", "tagName": "Tafsir"}]
    }"#;

    let mut vault = Vault::new();
    let summary = vault.manager().import_from(&legacy[..]).unwrap();
    assert_eq!(summary.counts.notes, 1);

    let id: NoteId = "1718035200000".parse().unwrap();
    let note = vault.store.get_note(&id).unwrap().unwrap();
    assert_eq!(note.body(), "Greatest verse");
    assert_eq!(
        note.updated_at(),
        DateTime::parse_from_rfc3339("2024-06-10T16:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    );
    assert_eq!(
        vault.store.tags_for(&id).unwrap(),
        vec![Tag::new("tafsir").unwrap()]
    );
}

#[test]
fn orphaned_containers_import_with_warning() {
    let doc = br#"{
        "notes": [{
            "id": "n1",
            "title": "Lost",
            "container": "Nobody > Nothing",
            "updatedAt": "2024-06-10T16:00:00Z"
        }]
    }"#;
    let mut vault = Vault::new();
    let summary = vault.manager().import_from(&doc[..]).unwrap();
    assert_eq!(summary.warnings.len(), 1);
    assert_eq!(vault.store.list_all().unwrap().len(), 1);
}

#[test]
fn default_file_name_uses_millis() {
    let now = DateTime::parse_from_rfc3339("2024-06-10T16:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    assert_eq!(
        default_file_name(BackupFormat::Zip, now),
        "corpus-vault-backup-1718035200000.zip"
    );
    assert_eq!(
        default_file_name(BackupFormat::Json, now),
        "corpus-vault-backup-1718035200000.json"
    );
}

#[test]
fn exported_json_is_readable_document() {
    let (mut vault, _) = seeded();
    let json = vault.export(BackupFormat::Json);

    let doc: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(doc["formatVersion"], FORMAT_VERSION);
    assert_eq!(doc["app"], APP_NAME);
    assert_eq!(doc["notes"][0]["citation"], "Quran 2:153");
    assert_eq!(doc["prefs"]["displayMode"], "book");
    assert!(doc["attachments"][0].get("sha256").is_none());
}
