use embellish::license::{known_licenses, resolve, resolve_for_year, template_for};
use embellish::{EmbellishError, PackageData};

fn package(json: &str) -> PackageData {
    PackageData::from_json(json, "package.json").unwrap()
}

#[test]
fn renders_year_and_author() {
    let data = package(r#"{"name":"demo","author":"Jane Doe","license":"MIT"}"#);
    let text = resolve_for_year(&data, 2024).unwrap().unwrap();
    assert!(text.starts_with("Copyright (c) 2024 Jane Doe\n"));
    assert!(text.contains("Permission is hereby granted"));
    assert!(!text.contains("{{"));
}

#[test]
fn holder_override_wins() {
    let data = package(
        r#"{"name":"demo","author":"Jane Doe","license":"isc","embellish":{"licenseHolder":"Demo Org"}}"#,
    );
    let text = resolve_for_year(&data, 2030).unwrap().unwrap();
    assert!(text.starts_with("Copyright (c) 2030 Demo Org"));
}

#[test]
fn blank_override_falls_back_to_author() {
    let data = package(
        r#"{"name":"demo","author":"Jane Doe","license":"mit","embellish":{"licenseHolder":""}}"#,
    );
    assert_eq!(data.license_holder(), Some("Jane Doe"));
}

#[test]
fn no_license_or_holder_means_no_text() {
    let data = package(r#"{"name":"demo","author":"Jane Doe"}"#);
    assert_eq!(resolve(&data).unwrap(), None);

    let data = package(r#"{"name":"demo","author":"","license":"mit"}"#);
    assert_eq!(resolve(&data).unwrap(), None);
}

#[test]
fn unknown_license_is_fatal() {
    let data = package(r#"{"name":"demo","author":"Jane Doe","license":"made-up-license"}"#);
    match resolve(&data) {
        Err(EmbellishError::UnknownLicense(name)) => assert_eq!(name, "made-up-license"),
        other => panic!("expected unknown license error, got {:?}", other),
    }
}

#[test]
fn every_bundled_template_renders_the_holder() {
    for id in known_licenses() {
        assert!(template_for(&id.to_uppercase()).is_some(), "{id}");
        let data = package(&format!(
            r#"{{"name":"demo","author":"Jane Doe","license":"{id}"}}"#
        ));
        let text = resolve_for_year(&data, 2024).unwrap().unwrap();
        if id != "unlicense" {
            assert!(text.contains("2024") && text.contains("Jane Doe"), "{id}");
        }
    }
}
