use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the forms backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub formatting: FormattingConfig,
    pub email: EmailConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            formatting: FormattingConfig::load()?,
            email: EmailConfig::load()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Display-formatting settings for rendered notification bodies.
///
/// The defaults produce the South African English presentation the site has
/// always used ("Thursday, 25 September 2025", 12-hour clock, UTC+2
/// timestamps). Swapping the patterns and offset retargets every rendered
/// body without touching the formatters.
#[derive(Debug, Clone)]
pub struct FormattingConfig {
    pub date_format: String,
    pub time_format: String,
    pub timestamp_format: String,
    pub utc_offset: FixedOffset,
    pub reference_prefix: String,
}

impl FormattingConfig {
    fn load() -> Result<Self, ConfigError> {
        let date_format =
            env::var("APP_DATE_FORMAT").unwrap_or_else(|_| DEFAULT_DATE_FORMAT.to_string());
        let time_format =
            env::var("APP_TIME_FORMAT").unwrap_or_else(|_| DEFAULT_TIME_FORMAT.to_string());
        let timestamp_format = env::var("APP_TIMESTAMP_FORMAT")
            .unwrap_or_else(|_| DEFAULT_TIMESTAMP_FORMAT.to_string());

        let offset_hours = env::var("APP_UTC_OFFSET")
            .unwrap_or_else(|_| DEFAULT_UTC_OFFSET_HOURS.to_string())
            .parse::<i32>()
            .map_err(|_| ConfigError::InvalidUtcOffset)?;
        let utc_offset = FixedOffset::east_opt(offset_hours * 3600)
            .ok_or(ConfigError::InvalidUtcOffset)?;

        let reference_prefix = env::var("APP_BOOKING_REFERENCE_PREFIX")
            .unwrap_or_else(|_| DEFAULT_REFERENCE_PREFIX.to_string());

        let config = Self {
            date_format,
            time_format,
            timestamp_format,
            utc_offset,
            reference_prefix,
        };
        config.validate_patterns()?;
        Ok(config)
    }

    /// Chrono panics when a `format()` result carrying a bad specifier is
    /// displayed, so operator-supplied patterns are exercised once up front.
    fn validate_patterns(&self) -> Result<(), ConfigError> {
        use std::fmt::Write as _;

        let probe_date = NaiveDate::from_ymd_opt(2000, 1, 2).expect("probe date");
        let probe_time = NaiveTime::from_hms_opt(3, 4, 5).expect("probe time");
        let probe_instant = probe_date.and_time(probe_time).and_utc();

        let mut scratch = String::new();
        for (name, rendered) in [
            ("APP_DATE_FORMAT", probe_date.format(&self.date_format)),
            ("APP_TIME_FORMAT", probe_time.format(&self.time_format)),
            (
                "APP_TIMESTAMP_FORMAT",
                probe_instant
                    .with_timezone(&self.utc_offset)
                    .format(&self.timestamp_format),
            ),
        ] {
            scratch.clear();
            write!(scratch, "{rendered}").map_err(|_| ConfigError::InvalidPattern {
                name: name.to_string(),
            })?;
        }
        Ok(())
    }

    pub fn render_date(&self, date: NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }

    pub fn render_time(&self, time: NaiveTime) -> String {
        time.format(&self.time_format).to_string()
    }

    pub fn render_timestamp(&self, instant: DateTime<Utc>) -> String {
        instant
            .with_timezone(&self.utc_offset)
            .format(&self.timestamp_format)
            .to_string()
    }
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            utc_offset: FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600)
                .expect("default offset in range"),
            reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
        }
    }
}

const DEFAULT_DATE_FORMAT: &str = "%A, %-d %B %Y";
const DEFAULT_TIME_FORMAT: &str = "%I:%M %p";
const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y/%m/%d, %H:%M:%S";
const DEFAULT_UTC_OFFSET_HOURS: i32 = 2;
const DEFAULT_REFERENCE_PREFIX: &str = "AAS";

/// Outbound email settings, consumed only by the dispatcher implementations.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
    pub internal_recipients: Vec<String>,
    pub simulated_delay_ms: u64,
}

impl EmailConfig {
    fn load() -> Result<Self, ConfigError> {
        let smtp_host = env::var("SMTP_HOST").unwrap_or_default();
        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidSmtpPort)?;
        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        let smtp_password = env::var("SMTP_PASSWORD").unwrap_or_default();
        let from_address =
            env::var("EMAIL_FROM").unwrap_or_else(|_| "no-reply@apexadvisory.co.za".to_string());

        let internal_recipients = env::var("EMAIL_INTERNAL_RECIPIENTS")
            .unwrap_or_else(|_| "consulting@apexadvisory.co.za,info@apexadvisory.co.za".to_string())
            .split(',')
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty())
            .collect();

        let simulated_delay_ms = env::var("EMAIL_SIMULATED_DELAY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidDelay)?;

        Ok(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_address,
            internal_recipients,
            simulated_delay_ms,
        })
    }

    /// An empty SMTP host keeps the service on the simulated dispatcher.
    pub fn smtp_configured(&self) -> bool {
        !self.smtp_host.is_empty()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidUtcOffset,
    InvalidPattern { name: String },
    InvalidSmtpPort,
    InvalidDelay,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUtcOffset => {
                write!(f, "APP_UTC_OFFSET must be a whole number of hours within UTC±23")
            }
            ConfigError::InvalidPattern { name } => {
                write!(f, "{name} is not a valid chrono format pattern")
            }
            ConfigError::InvalidSmtpPort => write!(f, "SMTP_PORT must be a valid u16"),
            ConfigError::InvalidDelay => {
                write!(f, "EMAIL_SIMULATED_DELAY_MS must be a valid u64")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
