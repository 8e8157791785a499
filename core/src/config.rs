use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::time::{parse_clock_time, parse_weekday_str};
use crate::usecase::reconstruct::MonthReconstructor;
use crate::usecase::timeline::TimelineWindow;

pub const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_DIR_NAME: &str = ".punchcard";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Weekly rest days by name, e.g. ["Sat", "Sun"].
    pub weekend: Vec<String>,
    /// Check-ins after shift start plus grace are late.
    pub shift_start: String,
    pub grace_minutes: u32,
    pub timeline_start_hour: f64,
    pub timeline_span_hours: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weekend: vec!["Sat".to_string(), "Sun".to_string()],
            shift_start: "09:00".to_string(),
            grace_minutes: 0,
            timeline_start_hour: 8.0,
            timeline_span_hours: 12.0,
        }
    }
}

impl Config {
    /// Reads `config.json` from `data_dir`, falling back to defaults when absent.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.weekend_days()?;
        self.late_after()?;
        if self.timeline_span_hours.is_nan() || self.timeline_span_hours <= 0.0 {
            return Err(anyhow!("timeline_span_hours must be positive"));
        }
        Ok(())
    }

    pub fn weekend_days(&self) -> Result<Vec<Weekday>> {
        self.weekend.iter().map(|d| parse_weekday_str(d)).collect()
    }

    pub fn shift_start_time(&self) -> Result<NaiveTime> {
        parse_clock_time(&self.shift_start)
    }

    /// Latest check-in time that is still on time. Must fall on the same day.
    pub fn late_after(&self) -> Result<NaiveTime> {
        let grace = chrono::Duration::minutes(self.grace_minutes as i64);
        let (late_after, wrapped) = self.shift_start_time()?.overflowing_add_signed(grace);
        if wrapped != 0 {
            return Err(anyhow!(
                "shift_start {} plus {} grace minutes runs past midnight",
                self.shift_start,
                self.grace_minutes
            ));
        }
        Ok(late_after)
    }

    pub fn timeline(&self) -> TimelineWindow {
        TimelineWindow::new(self.timeline_start_hour, self.timeline_span_hours)
    }

    pub fn reconstructor(&self) -> Result<MonthReconstructor> {
        Ok(MonthReconstructor::new(self.weekend_days()?))
    }
}

/// `dir` when given, else `~/.punchcard`. The directory is created if missing.
pub fn resolve_data_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    let path = match dir {
        Some(dir) => dir,
        None => {
            let home_dir = dirs::home_dir()
                .ok_or_else(|| anyhow!("Could not determine home directory"))?;
            home_dir.join(DEFAULT_DIR_NAME)
        }
    };
    fs::create_dir_all(&path)?;
    Ok(path)
}
