//! Vision-detection capability.
//!
//! Inference happens in the injected service. The sensor only inspects the
//! labels that come back.

mod stub;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::camera::Image;
use crate::Extra;

pub use stub::StubVision;

/// Label that counts as a person, compared after lower-casing.
pub const PERSON_LABEL: &str = "person";

/// One labelled object returned by a vision service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class_name: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub x_min: Option<i64>,
    #[serde(default)]
    pub y_min: Option<i64>,
    #[serde(default)]
    pub x_max: Option<i64>,
    #[serde(default)]
    pub y_max: Option<i64>,
}

impl Detection {
    pub fn new(class_name: impl Into<String>, confidence: f64) -> Self {
        Self {
            class_name: class_name.into(),
            confidence,
            x_min: None,
            y_min: None,
            x_max: None,
            y_max: None,
        }
    }

    pub fn with_box(mut self, x_min: i64, y_min: i64, x_max: i64, y_max: i64) -> Self {
        self.x_min = Some(x_min);
        self.y_min = Some(y_min);
        self.x_max = Some(x_max);
        self.y_max = Some(y_max);
        self
    }

    /// True when the label is "person", ignoring case. Confidence is not consulted.
    pub fn is_person(&self) -> bool {
        self.class_name.to_lowercase() == PERSON_LABEL
    }
}

/// True when at least one detection is a person.
pub fn contains_person(detections: &[Detection]) -> bool {
    detections.iter().any(Detection::is_person)
}

/// Vision service capability trait.
#[async_trait]
pub trait VisionService: Send + Sync {
    /// Run object detection on one image.
    async fn get_detections(
        &self,
        image: &Image,
        extra: Option<&Extra>,
        timeout: Option<Duration>,
    ) -> Result<Vec<Detection>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn person_label_is_case_insensitive() {
        assert!(Detection::new("Person", 0.9).is_person());
        assert!(Detection::new("PERSON", 0.1).is_person());
        assert!(!Detection::new("persons", 0.9).is_person());
        assert!(!Detection::new(" person", 0.9).is_person());
        assert!(!Detection::new("dog", 0.9).is_person());
    }

    #[test]
    fn any_person_counts_regardless_of_confidence() {
        let detections = vec![
            Detection::new("cat", 0.99),
            Detection::new("person", 0.0).with_box(0, 0, 10, 10),
        ];
        assert!(contains_person(&detections));
        assert!(!contains_person(&[Detection::new("cat", 0.7)]));
        assert!(!contains_person(&[]));
    }

    #[test]
    fn detection_deserializes_with_only_a_label() {
        let det: Detection = serde_json::from_str(r#"{"class_name": "person"}"#).unwrap();
        assert_eq!(det, Detection::new("person", 0.0));
    }
}
