// Public entities for the VitalTrends API
// This module contains data structures that are shared across the application boundary

// Vital-sign readings, requests and chart payloads
pub mod vital_signs;

// Common entities for error handling
pub mod common;
