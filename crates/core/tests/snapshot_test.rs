use statboard::prelude::*;
use statboard::{SnapshotConfig, StatsDBBuilder};
use tempfile::NamedTempFile;

fn write(uuid: &str) -> UpdatePlayerRequest {
    let mut stats = StatsDocument::scaffold();
    stats.group_mut(StatGroup::Mined).insert("minecraft:stone", 12);
    UpdatePlayerRequest {
        server: ServerIdentifier::new("survival", 4),
        uuid: uuid.into(),
        name: format!("player-{}", uuid),
        stats,
        advancements: vec![AdvancementInput::new("minecraft:story/root", true)],
    }
}

#[test]
fn test_snapshot_persistence() {
    let _ = env_logger::builder().is_test(true).try_init();
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path();

    let written = {
        let db = StatsDBBuilder::new().snapshot_path(path).build().unwrap();
        let record = db.upsert_player(write("u1")).unwrap();
        db.sync().unwrap();
        record
    };

    {
        let db = StatsDBBuilder::new().snapshot_path(path).build().unwrap();
        let restored = db
            .get_player(&ServerIdentifier::new("survival", 4), "u1")
            .unwrap()
            .unwrap();
        assert_eq!(restored, written);
    }
}

#[test]
fn test_snapshot_auto_save() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path();

    {
        let config = Config::default().with_snapshot(SnapshotConfig {
            auto_snapshot_ops: Some(5),
        });
        let db = StatsDBBuilder::new()
            .snapshot_path(path)
            .config(config)
            .build()
            .unwrap();

        for i in 0..10 {
            db.upsert_player(write(&format!("u{}", i))).unwrap();
        }

        // read the file while the writer is still alive
        let reader = StatsDBBuilder::new().snapshot_path(path).build().unwrap();
        assert_eq!(reader.stats().unwrap().document_count, 10);
        reader.close().unwrap();
    }
}

#[test]
fn test_snapshot_drop_saves() {
    let temp = NamedTempFile::new().unwrap();
    let path = temp.path();

    {
        let db = StatsDBBuilder::new().snapshot_path(path).build().unwrap();
        db.upsert_player(write("dropped")).unwrap();
    }

    {
        let db = StatsDBBuilder::new().snapshot_path(path).build().unwrap();
        let server = ServerIdentifier::new("survival", 4);
        assert!(db.get_player(&server, "dropped").unwrap().is_some());
    }
}

#[test]
fn test_corrupt_length_fails_open() {
    use std::io::Write;

    let mut temp = NamedTempFile::new().unwrap();
    temp.write_all(b"STATBOARD_SNAPSHOT").unwrap();
    temp.write_all(&[1]).unwrap();
    temp.write_all(&[0u8; 16]).unwrap();
    temp.write_all(&u64::MAX.to_le_bytes()).unwrap();
    temp.flush().unwrap();

    let result = StatsDBBuilder::new().snapshot_path(temp.path()).build();
    assert!(matches!(result, Err(StatsError::InvalidFormat)));
}
