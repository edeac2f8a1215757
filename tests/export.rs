mod common;

use common::{parse_icns, parse_ico, payload};
use iconpack::export::{self, DirectorySource, ExportOptions, ImageSource};
use iconpack::{ContainerKind, Error, UnregisteredPolicy};
use std::fs;
use std::path::Path;

fn populate(dir: &Path, files: &[(&str, Vec<u8>)]) {
    for (name, data) in files {
        fs::write(dir.join(name), data).unwrap();
    }
}

#[test]
fn directory_source_discovers_apps_and_sizes() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path(),
             &[("cs_16.png", payload(1, 3)),
               ("cs_1024.png", payload(2, 3)),
               ("pe_32.png", payload(3, 3)),
               ("notes.txt", b"hello".to_vec()),
               ("cs.svg", b"<svg/>".to_vec())]);
    fs::create_dir(dir.path().join("old_64.png")).unwrap();

    let source = DirectorySource::new(dir.path());
    assert_eq!(source.apps().unwrap(), vec!["cs".to_string(), "pe".to_string()]);
    assert_eq!(source.sizes("cs").unwrap(), vec![16, 1024]);
    assert_eq!(source.sizes("nobody").unwrap(), Vec::<u32>::new());
    assert_eq!(source.image("pe", 32).unwrap(), Some(payload(3, 3)));
    assert_eq!(source.image("pe", 64).unwrap(), None);
}

#[test]
fn export_writes_both_containers_per_app() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    populate(input.path(),
             &[("cs_16.png", payload(1, 10)),
               ("cs_32.png", payload(2, 20)),
               ("cs_48.png", payload(3, 30)),
               ("cs_1024.png", payload(4, 40)),
               ("pe_256.png", payload(5, 50))]);
    let source = DirectorySource::new(input.path());
    let apps = source.apps().unwrap();
    let destination = output.path().join("icons");
    let options = ExportOptions::new(&destination);

    let written = export::export_all(&source, &apps, &options).unwrap();
    assert_eq!(written,
               vec![destination.join("cs.icns"),
                    destination.join("cs.ico"),
                    destination.join("pe.icns"),
                    destination.join("pe.ico")]);

    let cs_icns = parse_icns(&fs::read(destination.join("cs.icns")).unwrap());
    let ostypes: Vec<[u8; 4]> = cs_icns.iter().map(|&(ostype, _)| ostype).collect();
    assert_eq!(ostypes, vec![*b"icp4", *b"icp5", *b"ic10"]);
    assert_eq!(cs_icns[2].1, payload(4, 40));

    let cs_ico = parse_ico(&fs::read(destination.join("cs.ico")).unwrap());
    let widths: Vec<u8> = cs_ico.iter().map(|entry| entry.width).collect();
    assert_eq!(widths, vec![16, 32, 48]);

    let pe_ico = parse_ico(&fs::read(destination.join("pe.ico")).unwrap());
    assert_eq!(pe_ico.len(), 1);
    assert_eq!(pe_ico[0].width, 0);
    assert_eq!(pe_ico[0].data, payload(5, 50));
}

#[test]
fn export_only_one_kind_atomically() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path(), &[("cc_64.png", payload(1, 8))]);
    let source = DirectorySource::new(dir.path());
    let mut options = ExportOptions::new(dir.path());
    options.kinds = vec![ContainerKind::Ico];
    options.atomic = true;

    let written = export::export_app(&source, "cc", &options).unwrap();
    assert_eq!(written, vec![dir.path().join("cc.ico")]);
    assert!(!dir.path().join("cc.icns").exists());
    // The input image plus the icon file; no temporary files remain.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn strict_export_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path(),
             &[("cf_16.png", payload(1, 8)), ("cf_20.png", payload(2, 8))]);
    let source = DirectorySource::new(dir.path());
    let mut options = ExportOptions::new(dir.path());
    options.policy = UnregisteredPolicy::Reject;

    match export::export_app(&source, "cf", &options) {
        Err(Error::UnregisteredSize { kind: ContainerKind::Icns, size: 20 }) => {}
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(!dir.path().join("cf.icns").exists());
    assert!(!dir.path().join("cf.ico").exists());
}

#[test]
fn strict_export_accepts_sizes_one_container_supports() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path(),
             &[("cf_24.png", payload(1, 8)), ("cf_512.png", payload(2, 8))]);
    let source = DirectorySource::new(dir.path());
    let mut options = ExportOptions::new(dir.path());
    options.policy = UnregisteredPolicy::Reject;

    export::export_app(&source, "cf", &options).unwrap();
    let icns = parse_icns(&fs::read(dir.path().join("cf.icns")).unwrap());
    assert_eq!(icns.len(), 1);
    assert_eq!(&icns[0].0, b"ic09");
    let ico = parse_ico(&fs::read(dir.path().join("cf.ico")).unwrap());
    assert_eq!(ico.len(), 1);
    assert_eq!(ico[0].width, 24);
}

#[test]
fn lenient_export_skips_unsupported_sizes() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path(), &[("pe_20.png", payload(1, 8))]);
    let source = DirectorySource::new(dir.path());
    let options = ExportOptions::new(dir.path());

    export::export_app(&source, "pe", &options).unwrap();
    assert_eq!(fs::read(dir.path().join("pe.icns")).unwrap(),
               b"icns\0\0\0\x08".to_vec());
    assert_eq!(fs::read(dir.path().join("pe.ico")).unwrap(),
               b"\0\0\x01\0\0\0".to_vec());
}

#[test]
fn zero_padded_sizes_are_not_listed() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path(), &[("cs_016.png", payload(1, 8))]);
    let source = DirectorySource::new(dir.path());
    assert_eq!(source.apps().unwrap(), Vec::<String>::new());
    assert_eq!(source.sizes("cs").unwrap(), Vec::<u32>::new());
}

#[test]
fn every_listed_size_is_readable() {
    let dir = tempfile::tempdir().unwrap();
    populate(dir.path(),
             &[("cs_016.png", payload(1, 8)),
               ("cs_16.png", payload(2, 8)),
               ("cs_0032.png", payload(3, 8)),
               ("cs_48.png", payload(4, 8))]);
    let source = DirectorySource::new(dir.path());
    let sizes = source.sizes("cs").unwrap();
    assert_eq!(sizes, vec![16, 48]);
    for &size in &sizes {
        assert!(source.image("cs", size).unwrap().is_some());
    }

    let options = ExportOptions::new(dir.path());
    export::export_app(&source, "cs", &options).unwrap();
    let ico = parse_ico(&fs::read(dir.path().join("cs.ico")).unwrap());
    assert_eq!(ico.len(), 2);
    assert_eq!(ico[0].data, payload(2, 8));
    assert_eq!(ico[1].data, payload(4, 8));
}
