//! Data models for detections and processing results

pub mod pii_entity;

pub use pii_entity::{
    placeholder_name_for_tag, Detection, DetectionBackend, DetectionMethod, DetectionResult,
    PiiType,
};
