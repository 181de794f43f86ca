use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Risk from the day's highest chance of rain, in percent
    pub fn from_precipitation(max_pop_percent: f64) -> Self {
        if max_pop_percent > 70.0 {
            RiskLevel::High
        } else if max_pop_percent > 40.0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// 5-day / 3-hour forecast response, only the fields we read
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastEntry {
    /// "YYYY-MM-DD HH:MM:SS" in UTC
    pub dt_txt: String,
    /// Probability of precipitation, 0.0 to 1.0
    #[serde(default)]
    pub pop: Option<f64>,
    #[serde(default)]
    pub main: Option<ForecastMain>,
    #[serde(default)]
    pub weather: Vec<ForecastCondition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastMain {
    #[serde(default)]
    pub temp: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastCondition {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherForecast {
    pub summary: String,
    pub risk_level: RiskLevel,
    pub temperature: Option<i64>,
    pub precipitation_probability: Option<i64>,
}

/// Rounds halves towards positive infinity, so -2.5 becomes -2
fn round_half_up(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Summarises the forecast entries that fall on `date`
pub fn assess_forecast(entries: &[ForecastEntry], date: NaiveDate) -> WeatherForecast {
    let prefix = date.format("%Y-%m-%d").to_string();
    let day: Vec<&ForecastEntry> = entries.iter().filter(|e| e.dt_txt.starts_with(&prefix)).collect();

    if day.is_empty() {
        debug!(%date, "no forecast entries for day");
        return WeatherForecast {
            summary: "out of forecast range".to_string(),
            risk_level: RiskLevel::Low,
            temperature: None,
            precipitation_probability: None,
        };
    }

    let max_pop = day
        .iter()
        .map(|e| e.pop.unwrap_or(0.0) * 100.0)
        .fold(0.0_f64, f64::max);
    let avg_temp = day
        .iter()
        .map(|e| e.main.as_ref().and_then(|m| m.temp).unwrap_or(0.0))
        .sum::<f64>()
        / day.len() as f64;
    let conditions = day[0]
        .weather
        .first()
        .and_then(|w| w.description.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let temperature = round_half_up(avg_temp);
    let precipitation = round_half_up(max_pop);

    WeatherForecast {
        summary: format!(
            "{} (chance of rain up to {}%, around {}°C)",
            conditions, precipitation, temperature
        ),
        risk_level: RiskLevel::from_precipitation(max_pop),
        temperature: Some(temperature),
        precipitation_probability: Some(precipitation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dt: &str, pop: f64, temp: f64, description: &str) -> ForecastEntry {
        ForecastEntry {
            dt_txt: dt.to_string(),
            pop: Some(pop),
            main: Some(ForecastMain { temp: Some(temp) }),
            weather: vec![ForecastCondition {
                description: Some(description.to_string()),
            }],
        }
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(RiskLevel::from_precipitation(40.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_precipitation(40.5), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_precipitation(70.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_precipitation(71.0), RiskLevel::High);
    }

    #[test]
    fn uses_only_entries_for_the_day() {
        let entries = vec![
            entry("2026-04-01 09:00:00", 0.2, 14.0, "light rain"),
            entry("2026-04-01 12:00:00", 0.8, 18.0, "rain"),
            entry("2026-04-02 12:00:00", 0.0, 30.0, "clear sky"),
        ];
        let forecast = assess_forecast(&entries, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());

        assert_eq!(forecast.risk_level, RiskLevel::High);
        assert_eq!(forecast.precipitation_probability, Some(80));
        assert_eq!(forecast.temperature, Some(16));
        assert!(forecast.summary.starts_with("light rain"));
    }

    #[test]
    fn day_outside_forecast_is_low_risk() {
        let entries = vec![entry("2026-04-01 09:00:00", 0.9, 14.0, "storm")];
        let forecast = assess_forecast(&entries, NaiveDate::from_ymd_opt(2026, 4, 20).unwrap());
        assert_eq!(forecast.risk_level, RiskLevel::Low);
        assert_eq!(forecast.temperature, None);
        assert_eq!(forecast.summary, "out of forecast range");
    }

    #[test]
    fn negative_halves_round_up() {
        let entries = vec![
            entry("2026-01-10 03:00:00", 0.0, -3.0, "snow"),
            entry("2026-01-10 06:00:00", 0.0, -2.0, "snow"),
        ];
        let forecast = assess_forecast(&entries, NaiveDate::from_ymd_opt(2026, 1, 10).unwrap());
        // mean of -2.5
        assert_eq!(forecast.temperature, Some(-2));
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-0.4), 0);
        assert_eq!(round_half_up(-3.5), -3);
    }

    #[test]
    fn parses_forecast_json() {
        let json = r#"{"list":[{"dt_txt":"2026-04-01 09:00:00","pop":0.5,"main":{"temp":12.4},"weather":[{"description":"clouds"}]}]}"#;
        let response: ForecastResponse = serde_json::from_str(json).unwrap();
        let forecast = assess_forecast(&response.list, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        assert_eq!(forecast.risk_level, RiskLevel::Medium);
        assert_eq!(forecast.temperature, Some(12));
    }
}
