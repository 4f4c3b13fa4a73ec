use friendstore_core::{
    handlers, Backend, JsonFileSource, PersistError, PersistResult, RecordMap, RecordSource,
    ServiceError, SqliteSource, StatusCode, StoreConfig, UserService, MAX_AGE,
};
use serde_json::json;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Source that loads fine but refuses every save.
struct ReadOnlySource {
    records: RecordMap,
}

impl RecordSource for ReadOnlySource {
    fn backend(&self) -> &'static str {
        "read_only"
    }

    fn load_all(&mut self) -> PersistResult<RecordMap> {
        Ok(self.records.clone())
    }

    fn save_all(&mut self, _records: &RecordMap) -> PersistResult<()> {
        Err(PersistError::Io {
            path: PathBuf::from("read-only"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only source"),
        })
    }
}

fn body(name: &str, friends: &[&str]) -> serde_json::Value {
    json!({
        "name": name,
        "email": format!("{}@brandosando.net", name.to_lowercase()),
        "friends": friends,
    })
}

#[test]
fn json_file_service_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");

    let (ado, viv) = {
        let mut service = UserService::open(JsonFileSource::new(&path)).unwrap();
        let viv = service.create(Some(&body("Viv", &[]))).unwrap();
        let ado = service.create(Some(&body("Ado", &[viv.as_str()]))).unwrap();
        (ado, viv)
    };

    let service = UserService::open(JsonFileSource::new(&path)).unwrap();
    assert_eq!(service.store().len(), 2);
    assert_eq!(service.get(ado.as_str()).unwrap().friends, vec![viv]);
}

#[test]
fn json_file_reflects_cascade_delete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");

    let mut service = UserService::open(JsonFileSource::new(&path)).unwrap();
    let viv = service.create(Some(&body("Viv", &[]))).unwrap();
    let ado = service
        .create(Some(&body("Ado", &[viv.as_str(), viv.as_str()])))
        .unwrap();
    assert_eq!(service.delete(viv.as_str()).unwrap(), 2);

    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk[ado.as_str()]["friends"], json!([]));
    assert!(on_disk.get(viv.as_str()).is_none());
}

#[test]
fn malformed_json_file_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");
    fs::write(&path, "{ not json").unwrap();

    let err = UserService::open(JsonFileSource::new(&path)).err().unwrap();
    assert!(matches!(err, ServiceError::Persist(PersistError::Json(_))));
}

#[test]
fn dangling_edges_in_loaded_data_are_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("database.json");
    fs::write(
        &path,
        json!({
            "a": {"name": "Ado", "email": "ado@b.net", "friends": ["ghost", "b"]},
            "b": {"name": "Viv", "email": "viv@b.net", "friends": []}
        })
        .to_string(),
    )
    .unwrap();

    let service = UserService::open(JsonFileSource::new(&path)).unwrap();
    assert_eq!(service.store().dangling_references().len(), 1);

    let found = service.graph_search("a", 3).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id.as_str(), "b");
}

#[test]
fn sqlite_config_service_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        data_path: dir.path().join("records.sqlite3"),
        backend: Backend::Sqlite,
        ..StoreConfig::default()
    };

    let id = {
        let mut service = config.open_service().unwrap();
        let id = service.create(Some(&body("Ado", &[]))).unwrap();
        service
            .update(id.as_str(), Some(&body("Ado", &[id.as_str()])))
            .unwrap();
        id
    };

    let service = config.open_service().unwrap();
    let loaded = service.get(id.as_str()).unwrap();
    assert_eq!(loaded.friends, vec![id.clone()]);
    assert_eq!(loaded.email, "ado@brandosando.net");
}

#[test]
fn sqlite_source_can_back_a_service_directly() {
    let mut service = UserService::open(SqliteSource::open_in_memory().unwrap()).unwrap();
    let id = service.create(Some(&body("Vin", &[]))).unwrap();

    let rows: i64 = service
        .source()
        .connection()
        .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
    assert!(service.store().contains(id.as_str()));
}

#[test]
fn sqlite_stores_every_age_the_validator_accepts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.sqlite3");

    let id = {
        let mut service = UserService::open(SqliteSource::open(&path).unwrap()).unwrap();
        let mut wax = body("Wax", &[]);
        wax["age"] = json!(MAX_AGE);
        let created = handlers::post(&mut service, Some(&wax));
        assert_eq!(created.status, StatusCode::Created);

        wax["age"] = json!(u64::MAX);
        let rejected = handlers::post(&mut service, Some(&wax));
        assert_eq!(rejected.status, StatusCode::BadRequest);
        assert!(rejected.message().unwrap().contains("an integer"));
        assert_eq!(service.store().len(), 1);

        created.payload.as_str().unwrap().to_string()
    };

    let service = UserService::open(SqliteSource::open(&path).unwrap()).unwrap();
    assert_eq!(service.get(&id).unwrap().age, Some(MAX_AGE));
}

#[test]
fn failed_save_rolls_back_every_mutation() {
    let mut seeded = UserService::open(friendstore_core::MemorySource::new()).unwrap();
    let viv = seeded.create(Some(&body("Viv", &[]))).unwrap();
    let ado = seeded.create(Some(&body("Ado", &[viv.as_str()]))).unwrap();
    let before = seeded.list();

    let mut service = UserService::open(ReadOnlySource {
        records: before.clone(),
    })
    .unwrap();

    let err = service.create(Some(&body("Wax", &[]))).unwrap_err();
    assert!(matches!(err, ServiceError::Persist(_)));

    let err = service
        .update(ado.as_str(), Some(&body("Siri", &[])))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Persist(_)));

    let err = service.delete(viv.as_str()).unwrap_err();
    assert!(matches!(err, ServiceError::Persist(_)));

    assert_eq!(service.list(), before);
}
