//! External detector seam and label normalization.
//!
//! The pipeline does not run inference itself; detections arrive through
//! the [`Detector`] trait from whatever model or service the deployment
//! uses. Raw model labels are normalized to canonical report categories
//! before geocoding so the map speaks one vocabulary.

use std::collections::{HashMap, HashSet};

use crate::core::types::{Detection, GrayFrame};

/// Source of per-frame object detections.
///
/// Implementations wrap an inference backend; `&mut self` leaves room for
/// internal buffers and warm-up state.
pub trait Detector {
    /// Detect objects in one frame.
    fn detect(&mut self, frame: &GrayFrame) -> Vec<Detection>;
}

/// Label map for the RDD2022 road damage classes.
pub fn default_label_map() -> HashMap<String, String> {
    HashMap::from([
        ("D00".to_string(), "longitudinal_crack".to_string()),
        ("D10".to_string(), "transverse_crack".to_string()),
        ("D20".to_string(), "alligator_crack".to_string()),
        ("D40".to_string(), "pothole".to_string()),
    ])
}

/// Normalize a raw detector label to a canonical category.
///
/// Exact entries in `labels` win; otherwise the label falls through
/// case-insensitive keyword rules for common report categories. Labels
/// matching nothing pass through unchanged.
pub fn map_label(label: &str, labels: &HashMap<String, String>) -> String {
    if let Some(mapped) = labels.get(label) {
        return mapped.clone();
    }

    let lower = label.to_lowercase();
    if lower.contains("pothole") {
        "potholes".to_string()
    } else if lower.contains("ice") {
        "ice_patches".to_string()
    } else if lower.contains("sidewalk") || lower.contains("snow") || lower.contains("blocked") {
        "blocked_sidewalks".to_string()
    } else if lower.contains("trash") || lower.contains("garbage") {
        "garbage_left_out".to_string()
    } else if lower.contains("person") || lower.contains("pedestrian") {
        "foot_traffic".to_string()
    } else {
        label.to_string()
    }
}

/// Fill each detection's category from its raw label.
pub fn assign_categories(detections: &mut [Detection], labels: &HashMap<String, String>) {
    for detection in detections.iter_mut() {
        detection.category = Some(map_label(&detection.label, labels));
    }
}

/// Keep only detections whose effective label is in `allowed`.
///
/// Comparison is case-insensitive. An empty `allowed` list keeps
/// everything.
pub fn filter_by_category(detections: Vec<Detection>, allowed: &[&str]) -> Vec<Detection> {
    if allowed.is_empty() {
        return detections;
    }
    let allowed: HashSet<String> = allowed.iter().map(|c| c.to_lowercase()).collect();
    detections
        .into_iter()
        .filter(|d| allowed.contains(&d.effective_label().to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BoundingBox;

    fn detection(label: &str) -> Detection {
        Detection::new(label, 0.9, BoundingBox::new(0.0, 0.0, 10.0, 10.0))
    }

    #[test]
    fn test_road_damage_codes_map_exactly() {
        let labels = default_label_map();
        assert_eq!(map_label("D00", &labels), "longitudinal_crack");
        assert_eq!(map_label("D10", &labels), "transverse_crack");
        assert_eq!(map_label("D20", &labels), "alligator_crack");
        assert_eq!(map_label("D40", &labels), "pothole");
    }

    #[test]
    fn test_keyword_fallbacks() {
        let labels = default_label_map();
        assert_eq!(map_label("pothole ahead", &labels), "potholes");
        assert_eq!(map_label("black ice", &labels), "ice_patches");
        assert_eq!(map_label("snow pile", &labels), "blocked_sidewalks");
        assert_eq!(map_label("blocked path", &labels), "blocked_sidewalks");
        assert_eq!(map_label("trash bag", &labels), "garbage_left_out");
        assert_eq!(map_label("garbage can", &labels), "garbage_left_out");
        assert_eq!(map_label("pedestrian", &labels), "foot_traffic");
        assert_eq!(map_label("person walking", &labels), "foot_traffic");
    }

    #[test]
    fn test_keyword_matching_is_case_insensitive() {
        let labels = default_label_map();
        assert_eq!(map_label("Pothole", &labels), "potholes");
        assert_eq!(map_label("ICE PATCH", &labels), "ice_patches");
    }

    #[test]
    fn test_unknown_labels_pass_through() {
        let labels = default_label_map();
        assert_eq!(map_label("fire hydrant", &labels), "fire hydrant");
        assert_eq!(map_label("", &labels), "");
    }

    #[test]
    fn test_assign_categories() {
        let labels = default_label_map();
        let mut detections = vec![detection("D40"), detection("black ice"), detection("dog")];
        assign_categories(&mut detections, &labels);
        assert_eq!(detections[0].category.as_deref(), Some("pothole"));
        assert_eq!(detections[1].category.as_deref(), Some("ice_patches"));
        assert_eq!(detections[2].category.as_deref(), Some("dog"));
    }

    #[test]
    fn test_filter_keeps_allowed_categories() {
        let labels = default_label_map();
        let mut detections = vec![detection("D40"), detection("black ice"), detection("dog")];
        assign_categories(&mut detections, &labels);

        let kept = filter_by_category(detections, &["pothole", "ICE_PATCHES"]);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].label, "D40");
        assert_eq!(kept[1].label, "black ice");
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let detections = vec![detection("a"), detection("b")];
        assert_eq!(filter_by_category(detections, &[]).len(), 2);
    }

    #[test]
    fn test_detector_trait_is_object_safe() {
        struct Canned(Vec<Detection>);
        impl Detector for Canned {
            fn detect(&mut self, _frame: &GrayFrame) -> Vec<Detection> {
                self.0.clone()
            }
        }

        let mut boxed: Box<dyn Detector> = Box::new(Canned(vec![detection("D40")]));
        let out = boxed.detect(&GrayFrame::new(8, 8));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "D40");
    }
}
