use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// One time-of-day row of the court grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Time label as shown by the booking system, e.g. `18:00`.
    pub time: String,
    /// Availability per court; index `i` is court `i + 1`.
    pub free: Vec<bool>,
}

/// All slots returned for one queried date, in service order.
pub type SlotList = Vec<Slot>;

impl Slot {
    pub fn new(time: impl Into<String>, free: Vec<bool>) -> Self {
        Self {
            time: time.into(),
            free,
        }
    }

    pub fn court_count(&self) -> usize {
        self.free.len()
    }

    /// Status of each court in court order.
    pub fn statuses(&self) -> impl Iterator<Item = CourtStatus> + '_ {
        self.free.iter().copied().map(CourtStatus::from_free)
    }
}

/// Booking status of a single court at a single time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, strum_macros::Display,
)]
pub enum CourtStatus {
    Free,
    Booked,
}

impl CourtStatus {
    pub fn from_free(free: bool) -> Self {
        if free {
            CourtStatus::Free
        } else {
            CourtStatus::Booked
        }
    }

    pub fn is_free(self) -> bool {
        self == CourtStatus::Free
    }

    pub fn color(self) -> ChipColor {
        match self {
            CourtStatus::Free => ChipColor::Success,
            CourtStatus::Booked => ChipColor::Error,
        }
    }
}

/// Color of a status chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ChipColor {
    Success,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_deserializes_from_service_json() {
        let slots: SlotList =
            serde_json::from_str(r#"[{"time":"09:00","free":[true,false]}]"#).unwrap();

        assert_eq!(slots, vec![Slot::new("09:00", vec![true, false])]);
        assert_eq!(slots[0].court_count(), 2);
        assert_eq!(
            slots[0].statuses().collect::<Vec<_>>(),
            vec![CourtStatus::Free, CourtStatus::Booked]
        );
    }

    #[test]
    fn test_slot_without_free_is_rejected() {
        let result = serde_json::from_str::<SlotList>(r#"[{"time":"09:00"}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_court_status_labels_and_colors() {
        assert_eq!(CourtStatus::Free.to_string(), "Free");
        assert_eq!(CourtStatus::Booked.to_string(), "Booked");
        assert_eq!(CourtStatus::Free.color().to_string(), "success");
        assert_eq!(CourtStatus::Booked.color().to_string(), "error");
        assert_eq!("Booked".parse::<CourtStatus>().unwrap(), CourtStatus::Booked);
    }
}
