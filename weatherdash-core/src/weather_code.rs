//! WMO weather interpretation codes, as used by Open-Meteo.
//!
//! See <https://open-meteo.com/en/docs> ("WMO Weather interpretation codes").

/// Label used for any code that is not in [`WEATHER_CODES`], and for missing codes.
pub const UNKNOWN_WEATHER: &str = "Unknown weather";

/// Every code the dashboard knows a label for. Lookup is by exact match only.
pub const WEATHER_CODES: &[(i32, &str)] = &[
    (0, "☀️ Clear sky"),
    (1, "🌤️ Mainly clear"),
    (2, "⛅ Partly cloudy"),
    (3, "☁️ Overcast"),
    (45, "🌫️ Fog"),
    (48, "🌫️ Depositing rime fog"),
    (51, "🌧️ Light drizzle"),
    (53, "🌧️ Moderate drizzle"),
    (55, "🌧️ Dense drizzle"),
    (56, "❄️ Light freezing drizzle"),
    (57, "❄️ Dense freezing drizzle"),
    (61, "☔ Slight rain"),
    (63, "☔ Moderate rain"),
    (65, "☔ Heavy rain"),
    (66, "🌨️ Light freezing rain"),
    (67, "🌨️ Heavy freezing rain"),
    (71, "❄️ Slight snowfall"),
    (73, "❄️ Moderate snowfall"),
    (75, "❄️ Heavy snowfall"),
    (77, "🌨️ Snow grains"),
    (80, "☔️ Slight rain showers"),
    (81, "☔️ Moderate rain showers"),
    (82, "☔️ Violent rain showers"),
    (85, "🌨️ Slight snow showers"),
    (86, "🌨️ Heavy snow showers"),
    (95, "⚡️ Thunderstorm"),
    (96, "⚡️ Thunderstorm with slight hail"),
    (99, "⚡️ Thunderstorm with heavy hail"),
];

/// Map a weather code to its display label. Never fails.
pub fn classify(code: Option<i32>) -> &'static str {
    code.and_then(|code| {
        WEATHER_CODES
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, label)| *label)
    })
    .unwrap_or(UNKNOWN_WEATHER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_their_label() {
        for (code, label) in WEATHER_CODES {
            assert_eq!(classify(Some(*code)), *label);
        }
    }

    #[test]
    fn table_has_no_duplicate_codes() {
        let mut codes: Vec<i32> = WEATHER_CODES.iter().map(|(c, _)| *c).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), WEATHER_CODES.len());
    }

    #[test]
    fn codes_outside_the_table_fall_back() {
        for code in [-1, 4, 44, 50, 60, 79, 83, 90, 97, 98, 100, i32::MAX, i32::MIN] {
            assert_eq!(classify(Some(code)), UNKNOWN_WEATHER, "code {code}");
        }
    }

    #[test]
    fn no_range_matching_between_neighbours() {
        // 52 sits between two drizzle codes but is not a code itself.
        assert_eq!(classify(Some(52)), UNKNOWN_WEATHER);
    }

    #[test]
    fn missing_code_falls_back() {
        assert_eq!(classify(None), UNKNOWN_WEATHER);
    }

    #[test]
    fn sample_labels() {
        assert_eq!(classify(Some(0)), "☀️ Clear sky");
        assert_eq!(classify(Some(63)), "☔ Moderate rain");
        assert_eq!(classify(Some(99)), "⚡️ Thunderstorm with heavy hail");
    }
}
