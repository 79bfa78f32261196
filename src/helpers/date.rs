//! Date helper functions

use chrono::{DateTime, Locale, NaiveDate, TimeZone};
use chrono_tz::Tz;

use crate::config::SiteConfig;

#[derive(Debug, thiserror::Error)]
pub enum DateFormatError {
    #[error("unknown locale {0:?}")]
    UnknownLocale(String),

    #[error("unknown time zone {0:?}")]
    UnknownTimezone(String),
}

/// Renders publication timestamps for display, e.g. `15 mar 2021`
#[derive(Debug, Clone)]
pub struct PostDateFormatter {
    locale: Locale,
    timezone: Tz,
    /// chrono strftime pattern
    pattern: String,
    missing_label: String,
}

impl PostDateFormatter {
    /// `pattern` uses date-fns tokens (`d MMM yyyy`); `locale` accepts both
    /// `pt_BR` and `pt-BR`.
    pub fn new(
        locale: &str,
        timezone: &str,
        pattern: &str,
        missing_label: &str,
    ) -> Result<Self, DateFormatError> {
        let locale = Locale::try_from(locale.replace('-', "_").as_str())
            .map_err(|_| DateFormatError::UnknownLocale(locale.to_string()))?;
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| DateFormatError::UnknownTimezone(timezone.to_string()))?;

        Ok(Self {
            locale,
            timezone,
            pattern: date_fns_to_chrono_format(pattern),
            missing_label: missing_label.to_string(),
        })
    }

    pub fn from_config(config: &SiteConfig) -> Result<Self, DateFormatError> {
        Self::new(
            &config.locale,
            &config.timezone,
            &config.date_format,
            &config.missing_date_label,
        )
    }

    /// Format a nullable timestamp. Missing or unparseable input renders the
    /// configured "no date" label.
    pub fn format(&self, timestamp: Option<&str>) -> String {
        let Some(raw) = timestamp.filter(|s| !s.trim().is_empty()) else {
            return self.missing_label.clone();
        };

        match parse_timestamp(raw, self.timezone) {
            Some(date) => date
                .format_localized(&self.pattern, self.locale)
                .to_string(),
            None => {
                tracing::warn!("Unparseable publication date {:?}", raw);
                self.missing_label.clone()
            }
        }
    }

    pub fn missing_label(&self) -> &str {
        &self.missing_label
    }
}

impl Default for PostDateFormatter {
    fn default() -> Self {
        Self {
            locale: Locale::pt_BR,
            timezone: chrono_tz::America::Sao_Paulo,
            pattern: "%-d %b %Y".to_string(),
            missing_label: "Sem data".to_string(),
        }
    }
}

/// Parse the timestamp shapes the repository emits into `zone`: `+0000`
/// offsets, RFC 3339, or a bare date. A bare date is a calendar day in
/// `zone` and keeps its day.
pub fn parse_timestamp(raw: &str, zone: Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if let Ok(date) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(date.with_timezone(&zone));
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&zone));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    // Noon, since DST transitions can skip local midnight
    zone.from_local_datetime(&day.and_hms_opt(12, 0, 0)?)
        .earliest()
}

/// Convert a date-fns format string to chrono format
fn date_fns_to_chrono_format(format: &str) -> String {
    let chars: Vec<char> = format.chars().collect();
    let mut result = String::with_capacity(format.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // 'quoted text' is literal
        if c == '\'' {
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                push_literal(&mut result, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        let token: String = std::iter::repeat(c).take(run).collect();
        let converted = match token.as_str() {
            "yyyy" => Some("%Y"),
            "yy" => Some("%y"),
            "MMMM" => Some("%B"),
            "MMM" => Some("%b"),
            "MM" => Some("%m"),
            "M" => Some("%-m"),
            "dd" => Some("%d"),
            "d" => Some("%-d"),
            "EEEE" => Some("%A"),
            "EEE" => Some("%a"),
            "HH" => Some("%H"),
            "mm" => Some("%M"),
            "ss" => Some("%S"),
            _ => None,
        };

        match converted {
            Some(spec) => result.push_str(spec),
            None => token.chars().for_each(|ch| push_literal(&mut result, ch)),
        }
        i += run;
    }

    result
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
