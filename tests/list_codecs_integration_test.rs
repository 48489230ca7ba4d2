use codec_lister::registry::snapshot::{FeatureKind, SnapshotFeature, SnapshotPlugin};
use codec_lister::{
    Config, KlassMatcher, Listing, OutputFormat, Snapshot, list_codecs, write_report,
};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tempfile::tempdir;

fn factory(name: &str, klass: &str) -> SnapshotFeature {
    SnapshotFeature {
        name: name.to_string(),
        kind: FeatureKind::ElementFactory,
        klass: Some(klass.to_string()),
        metadata: BTreeMap::new(),
        error: None,
        detached: false,
    }
}

fn plugin(name: &str, filename: Option<&str>, features: Vec<SnapshotFeature>) -> SnapshotPlugin {
    SnapshotPlugin {
        name: name.to_string(),
        filename: filename.map(PathBuf::from),
        features,
    }
}

fn render(listing: &Listing) -> String {
    let mut out = Vec::new();
    write_report(listing, OutputFormat::Text, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn list(snapshot: &Snapshot) -> String {
    render(&list_codecs(snapshot, &KlassMatcher::default()))
}

#[test]
fn test_registry_without_codecs_prints_nothing() {
    let snapshot = Snapshot {
        plugins: vec![plugin(
            "alsa",
            Some("/usr/lib/gstreamer-1.0/libgstalsa.so"),
            vec![factory("alsasink", "Sink/Audio"), factory("alsasrc", "Source/Audio")],
        )],
    };

    assert_eq!(list(&snapshot), "");
    assert_eq!(list(&Snapshot::default()), "");
}

#[test]
fn test_decoder_line_has_name_and_path() {
    let snapshot = Snapshot {
        plugins: vec![plugin(
            "vpx",
            Some("/usr/lib/gstreamer-1.0/libgstvpx.so"),
            vec![factory("vp9dec", "Codec/Decoder/Video")],
        )],
    };

    let output = list(&snapshot);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("vp9dec "));
    assert!(lines[0].contains(" - codec/decoder/video "));
    assert!(lines[0].ends_with(" - /usr/lib/gstreamer-1.0/libgstvpx.so"));
}

#[test]
fn test_class_match_is_case_insensitive() {
    let snapshot = Snapshot {
        plugins: vec![plugin(
            "shouty",
            Some("/opt/libshouty.so"),
            vec![factory("loudenc", "ENCODER")],
        )],
    };

    let listing = list_codecs(&snapshot, &KlassMatcher::default());
    let entries: Vec<_> = listing.entries().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "loudenc");
    assert_eq!(entries[0].klass, "encoder");
}

#[test]
fn test_non_codec_classes_are_skipped() {
    let snapshot = Snapshot {
        plugins: vec![plugin(
            "mixed",
            Some("/opt/libmixed.so"),
            vec![
                factory("pulsesink", "Sink/Audio"),
                factory("x264enc", "Codec/Encoder/Video"),
                factory("videoconvert", "Filter/Converter/Video"),
            ],
        )],
    };

    let output = list(&snapshot);
    assert!(!output.contains("pulsesink"));
    assert!(!output.contains("videoconvert"));
    assert!(output.contains("x264enc"));
}

#[test]
fn test_unresolved_plugin_prints_unknown() {
    let mut detached = factory("ghostdec", "Codec/Decoder/Audio");
    detached.detached = true;

    let snapshot = Snapshot {
        plugins: vec![
            plugin("ghost", Some("/opt/libghost.so"), vec![detached]),
            plugin("nofile", None, vec![factory("memdec", "Codec/Decoder/Audio")]),
        ],
    };

    let output = list(&snapshot);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("ghostdec"));
    assert!(lines[0].ends_with(" - unknown"));
    assert!(lines[1].ends_with(" - unknown"));
}

#[test]
fn test_failing_feature_does_not_stop_enumeration() {
    let mut broken = factory("brokendec", "Codec/Decoder/Video");
    broken.error = Some("metadata unavailable".to_string());

    let snapshot = Snapshot {
        plugins: vec![
            plugin(
                "first",
                Some("/opt/libfirst.so"),
                vec![broken, factory("okdec", "Codec/Decoder/Video")],
            ),
            plugin(
                "second",
                Some("/opt/libsecond.so"),
                vec![factory("okenc", "Codec/Encoder/Audio")],
            ),
        ],
    };

    let output = list(&snapshot);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Error with feature brokendec: metadata unavailable");
    assert!(lines[1].starts_with("okdec"));
    assert!(lines[2].starts_with("okenc"));
}

#[test]
fn test_metadata_fallback_and_non_factories() {
    let mut metadata_only = factory("legacydec", "");
    metadata_only.klass = None;
    metadata_only
        .metadata
        .insert("klass".to_string(), "Codec/Decoder/Image".to_string());

    let mut typefind = factory("decoder-typefind", "Codec/Decoder/Video");
    typefind.kind = FeatureKind::TypeFind;

    let mut empty = factory("emptyclass", "");
    empty.klass = Some(String::new());

    let snapshot = Snapshot {
        plugins: vec![plugin(
            "legacy",
            Some("/opt/liblegacy.so"),
            vec![metadata_only, typefind, empty],
        )],
    };

    let listing = list_codecs(&snapshot, &KlassMatcher::default());
    let names: Vec<&str> = listing.entries().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, vec!["legacydec"]);
    assert_eq!(listing.failures().count(), 0);
}

#[test]
fn test_custom_keywords() {
    let snapshot = Snapshot {
        plugins: vec![plugin(
            "videoparsers",
            Some("/opt/libvideoparsers.so"),
            vec![
                factory("h264parse", "Codec/Parser/Converter/Video"),
                factory("avdec_h264", "Codec/Decoder/Video"),
            ],
        )],
    };

    let listing = list_codecs(&snapshot, &KlassMatcher::new(&["Parser"]));
    let names: Vec<&str> = listing.entries().map(|entry| entry.name.as_str()).collect();
    assert_eq!(names, vec!["h264parse"]);
}

#[test]
fn test_json_report() {
    let mut broken = factory("brokenenc", "Codec/Encoder/Audio");
    broken.error = Some("boom".to_string());

    let snapshot = Snapshot {
        plugins: vec![plugin(
            "lame",
            Some("/opt/libgstlame.so"),
            vec![factory("lamemp3enc", "Codec/Encoder/Audio"), broken],
        )],
    };
    let listing = list_codecs(&snapshot, &KlassMatcher::default());

    let mut out = Vec::new();
    write_report(&listing, OutputFormat::Json, &mut out).unwrap();
    let body: JsonValue = serde_json::from_slice(&out).unwrap();

    assert_eq!(body["codecs"][0]["name"], "lamemp3enc");
    assert_eq!(body["codecs"][0]["klass"], "codec/encoder/audio");
    assert_eq!(body["codecs"][0]["plugin_path"], "/opt/libgstlame.so");
    assert_eq!(body["errors"][0]["feature"], "brokenenc");
    assert_eq!(body["errors"][0]["message"], "boom");
}

#[test]
fn test_run_with_snapshot_and_save() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.json");
    let output = dir.path().join("output.json");

    let snapshot = Snapshot {
        plugins: vec![plugin(
            "vpx",
            Some("/usr/lib/gstreamer-1.0/libgstvpx.so"),
            vec![factory("vp8enc", "Codec/Encoder/Video")],
        )],
    };
    snapshot.save(&input).unwrap();

    let config = Config {
        snapshot: Some(input),
        save_snapshot: Some(output.clone()),
        ..Default::default()
    };
    let mut out = Vec::new();
    codec_lister::run(config, &mut out).unwrap();

    let report = String::from_utf8(out).unwrap();
    assert_eq!(
        report,
        "vp8enc               - codec/encoder/video       - /usr/lib/gstreamer-1.0/libgstvpx.so\n"
    );

    let saved = Snapshot::load(&output).unwrap();
    assert_eq!(saved, snapshot);
}

#[test]
fn test_run_with_json_format() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.json");

    let snapshot = Snapshot {
        plugins: vec![plugin(
            "opus",
            None,
            vec![factory("opusdec", "Codec/Decoder/Audio")],
        )],
    };
    snapshot.save(&input).unwrap();

    let config = Config {
        format: OutputFormat::Json,
        snapshot: Some(input),
        ..Default::default()
    };
    let mut out = Vec::new();
    codec_lister::run(config, &mut out).unwrap();

    let body: JsonValue = serde_json::from_slice(&out).unwrap();
    assert_eq!(body["codecs"][0]["name"], "opusdec");
    assert_eq!(body["codecs"][0]["plugin_path"], JsonValue::Null);
}

#[test]
fn test_run_with_missing_snapshot_fails() {
    let dir = tempdir().unwrap();
    let config = Config {
        snapshot: Some(dir.path().join("missing.json")),
        ..Default::default()
    };

    let mut out = Vec::new();
    let error = codec_lister::run(config, &mut out).unwrap_err();
    assert!(out.is_empty());
    assert!(matches!(error, codec_lister::Error::SnapshotRead { .. }));
}
