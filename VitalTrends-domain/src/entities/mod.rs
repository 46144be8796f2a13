// Domain entities for vital-sign readings
pub mod vital_signs;

pub use vital_signs::{ReadingTimestamp, VitalSign, VitalSignsReading};
