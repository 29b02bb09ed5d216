use std::fs;

use jolt_class_file::{ClassFileError, ParseConfig};
use jolt_loader::{load_class, load_classes, ClassRegistry, Classpath, LoaderError};
use tempfile::TempDir;

fn class_image(name: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    let u2 = |buf: &mut Vec<u8>, v: u16| buf.extend_from_slice(&v.to_be_bytes());
    let utf8 = |buf: &mut Vec<u8>, s: &str| {
        buf.push(1);
        buf.extend_from_slice(&(s.len() as u16).to_be_bytes());
        buf.extend_from_slice(s.as_bytes());
    };

    buf.extend_from_slice(&0xCAFEBABEu32.to_be_bytes());
    u2(&mut buf, 0); // minor
    u2(&mut buf, 55); // major
    u2(&mut buf, 5); // constant_pool_count
    utf8(&mut buf, name); // 1
    buf.push(7);
    u2(&mut buf, 1); // 2: class -> 1
    utf8(&mut buf, "java/lang/Object"); // 3
    buf.push(7);
    u2(&mut buf, 3); // 4: class -> 3
    u2(&mut buf, 0x0021); // flags
    u2(&mut buf, 2); // this_class
    u2(&mut buf, 4); // super_class
    u2(&mut buf, 0); // interfaces
    u2(&mut buf, 0); // fields
    u2(&mut buf, 0); // methods
    u2(&mut buf, 0); // attributes
    buf
}

fn stage(classes: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in classes {
        let path = dir.path().join(format!("{}.class", name));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, class_image(name)).unwrap();
    }
    dir
}

#[test]
fn locate_finds_a_staged_class() {
    let dir = stage(&["com/example/Greeter"]);
    let classpath = Classpath::new([dir.path()]);

    let bytes = classpath.locate("com/example/Greeter").unwrap();
    assert_eq!(&bytes[..4], &[0xCA, 0xFE, 0xBA, 0xBE]);
}

#[test]
fn locate_reports_a_missing_class() {
    let dir = stage(&[]);
    let classpath = Classpath::new([dir.path()]);

    assert!(matches!(
        classpath.locate("does/not/Exist"),
        Err(LoaderError::NotFound(name)) if name == "does/not/Exist"
    ));
}

#[test]
fn locate_searches_roots_in_order() {
    let first = stage(&["Shared"]);
    let second = stage(&["Shared", "OnlyInSecond"]);
    let classpath = Classpath::new([first.path(), second.path()]);

    assert!(classpath.locate("Shared").is_ok());
    assert!(classpath.locate("OnlyInSecond").is_ok());
}

#[test]
fn load_class_registers_a_validated_class() {
    let dir = stage(&["com/example/Greeter"]);
    let classpath = Classpath::new([dir.path()]);
    let registry = ClassRegistry::new();

    let class = load_class(
        &classpath,
        &registry,
        "com/example/Greeter",
        ParseConfig::default(),
    )
    .unwrap();

    assert_eq!(class.class_name().unwrap(), "com/example/Greeter");
    assert!(registry.contains("com/example/Greeter"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn load_class_rejects_a_corrupt_class_file() {
    let dir = stage(&[]);
    fs::write(dir.path().join("Broken.class"), [0xCA, 0xFE, 0xDE, 0xAD]).unwrap();
    let classpath = Classpath::new([dir.path()]);
    let registry = ClassRegistry::new();

    let err = load_class(&classpath, &registry, "Broken", ParseConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        LoaderError::ClassFile(ClassFileError::BadMagic(0xCAFEDEAD))
    ));
    assert!(registry.is_empty());
}

#[test]
fn the_fleet_loads_every_staged_class() {
    let names = [
        "com/example/A",
        "com/example/B",
        "com/example/sub/C",
        "D",
        "E",
    ];
    let dir = stage(&names);
    let classpath = Classpath::new([dir.path()]);
    let registry = ClassRegistry::new();
    let names = names.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    let failures = load_classes(&classpath, &registry, &names, ParseConfig::default());

    assert!(failures.is_empty());
    assert_eq!(registry.len(), names.len());
    for name in &names {
        assert_eq!(registry.get(name).unwrap().class_name().unwrap(), *name);
    }
}

#[test]
fn a_failing_class_does_not_affect_the_rest_of_the_fleet() {
    let dir = stage(&["Good", "AlsoGood"]);
    fs::write(dir.path().join("Bad.class"), b"not a class file").unwrap();
    let classpath = Classpath::new([dir.path()]);
    let registry = ClassRegistry::new();
    let names = ["Good", "Bad", "AlsoGood"]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();

    let failures = load_classes(&classpath, &registry, &names, ParseConfig::default());

    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "Bad");
    assert!(registry.contains("Good"));
    assert!(registry.contains("AlsoGood"));
    assert!(!registry.contains("Bad"));
}
