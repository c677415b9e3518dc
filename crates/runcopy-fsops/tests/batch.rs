use std::fs;
use std::path::Path;

use anyhow::Result;
use runcopy_config::{CopyPolicy, HashAlgorithm};
use runcopy_fsops::{
    BatchCopier, BatchRequest, COMPLETION_MARKER_NAME, Checksummer, DigestSource, ErrorKind,
    FileDigest, FsOpsError, FsOpsResult, compute_checksum, copy_run,
};
use runcopy_test_support::{RunFixture, entry_names};
use serde_json::{Value, json};

fn seeded_fixture() -> Result<RunFixture> {
    let fixture = RunFixture::new()?;
    fixture.write_source("a.txt", "alpha")?;
    fixture.write_source("b.txt", "bravo")?;
    fixture.write_descriptor("meta.json", &json!({"test_sequence_id": "run7"}))?;
    Ok(fixture)
}

#[test]
fn run_copies_every_file_into_numbered_folder() -> Result<()> {
    let fixture = seeded_fixture()?;
    fs::create_dir(fixture.source().join("nested"))?;
    fs::write(fixture.source().join("nested").join("skip.txt"), "skip")?;

    let first = copy_run(fixture.source(), fixture.destination(), &CopyPolicy::default())?;

    assert_eq!(first.run_id.as_str(), "run7");
    assert_eq!(first.destination, fixture.destination().join("run7_1"));
    assert_eq!(
        entry_names(&first.destination)?,
        vec!["a.txt", "b.txt", "meta.json"]
    );
    assert_eq!(fs::read_to_string(first.destination.join("a.txt"))?, "alpha");
    assert_eq!(first.files.len(), 3);
    assert_eq!(first.algorithm, HashAlgorithm::Sha256);
    assert!(first.completion_marker.is_none());
    for file in &first.files {
        assert_eq!(
            file.digest,
            compute_checksum(&file.source, HashAlgorithm::Sha256)?
        );
    }

    let second = copy_run(fixture.source(), fixture.destination(), &CopyPolicy::default())?;
    assert_eq!(second.destination, fixture.destination().join("run7_2"));
    assert_eq!(
        entry_names(fixture.destination())?,
        vec!["run7_1", "run7_2"]
    );
    Ok(())
}

#[test]
fn run_continues_numbering_after_existing_folders() -> Result<()> {
    let fixture = seeded_fixture()?;
    fixture.existing_destination("run7_4")?;
    fixture.existing_destination("run70_9")?;

    let report = copy_run(fixture.source(), fixture.destination(), &CopyPolicy::default())?;
    assert_eq!(report.destination, fixture.destination().join("run7_5"));
    Ok(())
}

#[test]
fn descriptor_problems_abort_before_any_copy() -> Result<()> {
    let missing_field = RunFixture::new()?;
    missing_field.write_source("a.txt", "alpha")?;
    missing_field.write_descriptor("meta.json", &json!({"other": "x"}))?;

    let no_descriptor = RunFixture::new()?;
    no_descriptor.write_source("a.txt", "alpha")?;

    let conflicting = RunFixture::new()?;
    conflicting.write_descriptor("one.json", &json!({"test_sequence_id": "a"}))?;
    conflicting.write_descriptor("two.json", &json!({"test_sequence_id": "b"}))?;

    for (fixture, kind) in [
        (&missing_field, ErrorKind::MissingField),
        (&no_descriptor, ErrorKind::NotFound),
        (&conflicting, ErrorKind::Conflict),
    ] {
        let err = copy_run(fixture.source(), fixture.destination(), &CopyPolicy::default())
            .err()
            .ok_or_else(|| anyhow::anyhow!("expected {kind:?} failure"))?;
        assert_eq!(err.kind(), kind);
        assert!(entry_names(fixture.destination())?.is_empty());
    }
    Ok(())
}

#[test]
fn nested_identifier_and_custom_field_are_honoured() -> Result<()> {
    let fixture = RunFixture::new()?;
    fixture.write_source("data.bin", [0_u8, 1, 2, 3])?;
    fixture.write_descriptor(
        "meta.json",
        &json!({"header": {"tags": [{"kind": "x"}, {"sequence": 12}]}}),
    )?;
    let policy = CopyPolicy {
        identifier_field: "sequence".into(),
        ..CopyPolicy::default()
    };

    let report = copy_run(fixture.source(), fixture.destination(), &policy)?;
    assert_eq!(report.destination, fixture.destination().join("12_1"));
    Ok(())
}

#[test]
fn completion_marker_lists_verified_files() -> Result<()> {
    let fixture = seeded_fixture()?;
    let policy = CopyPolicy {
        write_completion_marker: true,
        hash_algorithm: HashAlgorithm::Sha512,
        ..CopyPolicy::default()
    };

    let report = copy_run(fixture.source(), fixture.destination(), &policy)?;

    let marker_path = report.destination.join(COMPLETION_MARKER_NAME);
    assert_eq!(report.completion_marker.as_deref(), Some(marker_path.as_path()));
    let marker: Value = serde_json::from_slice(&fs::read(&marker_path)?)?;
    assert_eq!(marker["run_id"], "run7");
    assert_eq!(marker["algorithm"], "sha512");
    assert_eq!(marker["files"].as_array().map(Vec::len), Some(3));
    assert_eq!(report.files[0].digest.len(), HashAlgorithm::Sha512.hex_len());
    Ok(())
}

#[test]
fn source_named_like_the_marker_is_refused_when_marker_enabled() -> Result<()> {
    let fixture = seeded_fixture()?;
    fixture.write_source(COMPLETION_MARKER_NAME, "operator notes")?;
    let policy = CopyPolicy {
        write_completion_marker: true,
        ..CopyPolicy::default()
    };

    let err = copy_run(fixture.source(), fixture.destination(), &policy)
        .err()
        .ok_or_else(|| anyhow::anyhow!("expected reserved name failure"))?;
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(matches!(
        err,
        FsOpsError::InvalidInput {
            field: "source_file",
            reason: "reserved_name",
            ..
        }
    ));
    assert!(entry_names(fixture.destination())?.is_empty());

    let report = copy_run(fixture.source(), fixture.destination(), &CopyPolicy::default())?;
    assert_eq!(
        fs::read_to_string(report.destination.join(COMPLETION_MARKER_NAME))?,
        "operator notes"
    );
    assert!(report.completion_marker.is_none());
    Ok(())
}

#[test]
fn exclusive_reservation_creates_missing_root() -> Result<()> {
    let fixture = seeded_fixture()?;
    let root = fixture.root().join("fresh");
    let policy = CopyPolicy {
        exclusive_reservation: true,
        ..CopyPolicy::default()
    };

    let report = copy_run(fixture.source(), &root, &policy)?;
    assert_eq!(report.destination, root.join("run7_1"));
    assert_eq!(entry_names(&report.destination)?.len(), 3);
    Ok(())
}

/// Reports a bogus digest for copies of `name` written under `destination`.
struct CorruptOne<'a> {
    inner: Checksummer,
    destination: &'a Path,
    name: &'a str,
}

impl DigestSource for CorruptOne<'_> {
    fn digest(&self, path: &Path) -> FsOpsResult<FileDigest> {
        let mut digest = self.inner.digest_file(path)?;
        if path.starts_with(self.destination) && path.ends_with(self.name) {
            digest.hex = "f".repeat(digest.hex.len());
        }
        Ok(digest)
    }
}

#[test]
fn integrity_failure_stops_batch_without_rollback() -> Result<()> {
    let fixture = seeded_fixture()?;
    fixture.write_source("c.txt", "charlie")?;
    let policy = CopyPolicy {
        write_completion_marker: true,
        ..CopyPolicy::default()
    };
    let copier = BatchCopier::with_digests(
        &policy,
        CorruptOne {
            inner: Checksummer::default(),
            destination: fixture.destination(),
            name: "b.txt",
        },
    );
    let descriptor = fixture.source().join("meta.json");

    let result = copier.run(BatchRequest {
        source_dir: fixture.source(),
        destination_root: fixture.destination(),
        descriptor_path: &descriptor,
    });

    match result {
        Err(FsOpsError::IntegrityMismatch {
            source_path,
            destination_path,
            ..
        }) => {
            assert_eq!(source_path, fixture.source().join("b.txt"));
            assert_eq!(destination_path, fixture.destination().join("run7_1").join("b.txt"));
        }
        other => anyhow::bail!("expected integrity mismatch, got {other:?}"),
    }
    assert_eq!(
        entry_names(&fixture.destination().join("run7_1"))?,
        vec!["a.txt"]
    );
    Ok(())
}
