use crate::output::MaskedIdentity;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Main configuration structure for Forum-Rounds
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub traversal: TraversalConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub login: LoginConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default, rename = "account")]
    pub accounts: Vec<Account>,
}

/// Forum addresses
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Page opened before logging in
    #[serde(rename = "home-url")]
    pub home_url: String,

    /// Syndication feed listing the latest topics
    #[serde(rename = "feed-url")]
    pub feed_url: String,

    /// CSS selector that marks a topic page as rendered
    #[serde(rename = "ready-selector", default = "default_ready_selector")]
    pub ready_selector: String,
}

/// What to do with a topic's reply pages when the topic page itself is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopicFailurePolicy {
    /// Still visit reply pages 2..N
    #[default]
    Continue,
    /// Move on to the next topic
    SkipReplies,
}

/// Retry and pacing configuration for page visits
#[derive(Debug, Clone, Deserialize)]
pub struct TraversalConfig {
    /// Attempts per page before it is skipped
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Pause after a refresh before the next attempt (milliseconds)
    #[serde(rename = "retry-cooldown-ms", default = "default_retry_cooldown_ms")]
    pub retry_cooldown_ms: u64,

    /// Pause after every successful visit (milliseconds)
    #[serde(rename = "settle-delay-ms", default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Readiness wait per attempt (milliseconds)
    #[serde(rename = "visit-timeout-ms", default = "default_visit_timeout_ms")]
    pub visit_timeout_ms: u64,

    #[serde(rename = "on-topic-exhausted", default)]
    pub on_topic_exhausted: TopicFailurePolicy,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_cooldown_ms: default_retry_cooldown_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            visit_timeout_ms: default_visit_timeout_ms(),
            on_topic_exhausted: TopicFailurePolicy::default(),
        }
    }
}

impl TraversalConfig {
    pub fn retry_cooldown(&self) -> Duration {
        Duration::from_millis(self.retry_cooldown_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn visit_timeout(&self) -> Duration {
        Duration::from_millis(self.visit_timeout_ms)
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Chrome/Chromium executable (auto-detected when absent)
    #[serde(rename = "chrome-path", default)]
    pub chrome_path: Option<String>,

    /// User-Agent override for every page
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,

    #[serde(rename = "window-width", default = "default_window_width")]
    pub window_width: u32,

    #[serde(rename = "window-height", default = "default_window_height")]
    pub window_height: u32,

    /// CDP request timeout (milliseconds)
    #[serde(rename = "launch-timeout-ms", default = "default_launch_timeout_ms")]
    pub launch_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_path: None,
            user_agent: None,
            window_width: default_window_width(),
            window_height: default_window_height(),
            launch_timeout_ms: default_launch_timeout_ms(),
        }
    }
}

/// Selectors driving the login form
#[derive(Debug, Clone, Deserialize)]
pub struct LoginConfig {
    #[serde(rename = "open-button", default = "default_open_button")]
    pub open_button: String,

    #[serde(rename = "username-field", default = "default_username_field")]
    pub username_field: String,

    #[serde(rename = "password-field", default = "default_password_field")]
    pub password_field: String,

    #[serde(rename = "submit-button", default = "default_submit_button")]
    pub submit_button: String,

    /// Element only present once logged in
    #[serde(rename = "logged-in-marker", default = "default_logged_in_marker")]
    pub logged_in_marker: String,

    /// Wait per login step (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_login_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            open_button: default_open_button(),
            username_field: default_username_field(),
            password_field: default_password_field(),
            submit_button: default_submit_button(),
            logged_in_marker: default_logged_in_marker(),
            timeout_ms: default_login_timeout_ms(),
        }
    }
}

impl LoginConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Feed fetching and reply-count extraction
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Text that follows the post count inside the marker element
    #[serde(rename = "reply-count-delimiter", default = "default_reply_count_delimiter")]
    pub reply_count_delimiter: String,

    /// Element of the item description that holds the post count
    #[serde(rename = "count-marker", default = "default_count_marker")]
    pub count_marker: String,

    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(rename = "user-agent", default = "default_feed_user_agent")]
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            reply_count_delimiter: default_reply_count_delimiter(),
            count_marker: default_count_marker(),
            request_timeout_ms: default_request_timeout_ms(),
            user_agent: default_feed_user_agent(),
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Offset from UTC used for log timestamps
    #[serde(rename = "utc-offset-hours", default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

/// Credentials for one forum account
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The username in its loggable form
    pub fn masked(&self) -> MaskedIdentity {
        MaskedIdentity::new(&self.username)
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.masked().as_str())
            .field("password", &"<redacted>")
            .finish()
    }
}

fn default_ready_selector() -> String {
    "article".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_cooldown_ms() -> u64 {
    2_000
}

fn default_settle_delay_ms() -> u64 {
    3_000
}

fn default_visit_timeout_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    800
}

fn default_launch_timeout_ms() -> u64 {
    30_000
}

fn default_open_button() -> String {
    ".login-button .d-button-label".to_string()
}

fn default_username_field() -> String {
    "#login-account-name".to_string()
}

fn default_password_field() -> String {
    "#login-account-password".to_string()
}

fn default_submit_button() -> String {
    "#login-button".to_string()
}

fn default_logged_in_marker() -> String {
    "#current-user".to_string()
}

fn default_login_timeout_ms() -> u64 {
    10_000
}

fn default_reply_count_delimiter() -> String {
    " 个帖子 - ".to_string()
}

fn default_count_marker() -> String {
    "small".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_feed_user_agent() -> String {
    concat!("forum-rounds/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_utc_offset_hours() -> i32 {
    8
}
