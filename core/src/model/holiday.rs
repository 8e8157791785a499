use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HolidayType {
    #[default]
    Public,
    Company,
    Optional,
    #[serde(other)]
    Other,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub kind: HolidayType,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>, kind: HolidayType) -> Self {
        Self {
            date,
            name: name.into(),
            kind,
        }
    }
}

/// First holiday defined for `date`, if any.
pub fn find_holiday(holidays: &[Holiday], date: NaiveDate) -> Option<&Holiday> {
    holidays.iter().find(|h| h.date == date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_holiday_first_match_wins() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let holidays = vec![
            Holiday::new(d, "Company Day", HolidayType::Company),
            Holiday::new(d, "Duplicate", HolidayType::Public),
        ];
        assert_eq!(find_holiday(&holidays, d).unwrap().name, "Company Day");
        assert!(find_holiday(&holidays, d.succ_opt().unwrap()).is_none());
    }

    #[test]
    fn test_unknown_kind_deserializes_as_other() {
        let h: Holiday = serde_json::from_str(r#"{"date":"2024-03-08","name":"X","kind":"regional"}"#).unwrap();
        assert_eq!(h.kind, HolidayType::Other);
        let h: Holiday = serde_json::from_str(r#"{"date":"2024-03-08","name":"X"}"#).unwrap();
        assert_eq!(h.kind, HolidayType::Public);
    }
}
