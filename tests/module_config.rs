use std::sync::Mutex;
use std::time::Duration;

use tempfile::NamedTempFile;

use person_detection_sensor::{CameraSource, Detection, ModuleConfig, PersonDetector};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "PERSON_DETECTOR_CONFIG",
        "PERSON_DETECTOR_CAMERA",
        "PERSON_DETECTOR_VISION",
        "PERSON_DETECTOR_POLL_MS",
    ] {
        std::env::remove_var(key);
    }
}

fn write_temp(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("temp config");
    std::io::Write::write_all(&mut file, contents.as_bytes()).expect("write config");
    file
}

#[test]
fn defaults_without_a_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = ModuleConfig::load().expect("load config");
    assert_eq!(cfg.sensor_name, "person-detector");
    assert_eq!(cfg.camera_name, "camera");
    assert_eq!(cfg.vision_service, "vision");
    assert_eq!(cfg.poll_interval, Duration::from_secs(1));
    assert!(matches!(cfg.camera, CameraSource::Stub(ref stub) if stub.width == 640 && stub.height == 480));
    assert!(cfg.detections.is_empty());
}

#[test]
fn loads_json_config_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_temp(
        ".json",
        r#"{
            "sensor_name": "porch",
            "camera_name": "cam1",
            "vision_service": "vis1",
            "poll_interval_ms": 250,
            "camera": {"source": "stub", "width": 32, "height": 24},
            "vision": {"detections": [{"class_name": "Person", "confidence": 0.9}, {"class_name": "dog"}]}
        }"#,
    );

    std::env::set_var("PERSON_DETECTOR_CONFIG", file.path());
    std::env::set_var("PERSON_DETECTOR_CAMERA", "cam9");
    std::env::set_var("PERSON_DETECTOR_POLL_MS", "500");

    let cfg = ModuleConfig::load().expect("load config");

    assert_eq!(cfg.sensor_name, "porch");
    assert_eq!(cfg.camera_name, "cam9");
    assert_eq!(cfg.vision_service, "vis1");
    assert_eq!(cfg.poll_interval, Duration::from_millis(500));
    assert!(matches!(cfg.camera, CameraSource::Stub(ref stub) if stub.width == 32 && stub.height == 24));
    assert_eq!(
        cfg.detections,
        vec![Detection::new("Person", 0.9), Detection::new("dog", 0.0)]
    );

    let component = cfg.component_config();
    assert_eq!(component.model, PersonDetector::model());
    assert_eq!(
        PersonDetector::validate_config(&component).unwrap(),
        vec!["vis1".to_string(), "cam9".to_string()]
    );

    clear_env();
}

#[test]
fn loads_toml_config() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let file = write_temp(
        ".toml",
        r#"
camera_name = "cam1"
vision_service = "vis1"

[camera]
source = "none"

[[vision.detections]]
class_name = "cat"
confidence = 0.7
"#,
    );

    let cfg = ModuleConfig::load_from(Some(file.path())).expect("load config");
    assert!(matches!(cfg.camera, CameraSource::Disabled));
    assert_eq!(cfg.detections, vec![Detection::new("cat", 0.7)]);

    let deps = cfg.dependencies().expect("dependencies");
    assert_eq!(deps.len(), 1);
    assert!(deps.vision("vis1").is_some());
    assert!(deps.camera("cam1").is_none());
}

#[test]
fn rejects_invalid_settings() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let zero_poll = write_temp(".json", r#"{"poll_interval_ms": 0}"#);
    assert!(ModuleConfig::load_from(Some(zero_poll.path())).is_err());

    let bad_source = write_temp(".json", r#"{"camera": {"source": "rtsp"}}"#);
    assert!(ModuleConfig::load_from(Some(bad_source.path())).is_err());

    let file_without_path = write_temp(".json", r#"{"camera": {"source": "file"}}"#);
    assert!(ModuleConfig::load_from(Some(file_without_path.path())).is_err());

    let huge_stub = write_temp(
        ".json",
        r#"{"camera": {"source": "stub", "width": 4294967295, "height": 4294967295}}"#,
    );
    assert!(ModuleConfig::load_from(Some(huge_stub.path())).is_err());

    let empty_name = write_temp(".json", r#"{"camera_name": " "}"#);
    assert!(ModuleConfig::load_from(Some(empty_name.path())).is_err());

    std::env::set_var("PERSON_DETECTOR_POLL_MS", "soon");
    assert!(ModuleConfig::load_from(None).is_err());

    clear_env();
}
