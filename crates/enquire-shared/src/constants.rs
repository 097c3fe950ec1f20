/// Broadcast group every privileged notification socket joins
pub const ADMIN_GROUP: &str = "admin_notifications";

/// Maximum characters kept in a notification message preview
pub const PREVIEW_CHARS: usize = 100;

/// Inquiries per page in the staff listing
pub const INQUIRIES_PER_PAGE: u32 = 10;

/// Placeholder written to logs instead of any password value
pub const REDACTED: &str = "***";

/// Logged field values are cut to this many characters
pub const LOG_VALUE_CHARS: usize = 50;

// Field length bounds (inclusive, in characters)
pub const NAME_LEN: (usize, usize) = (2, 100);
pub const USERNAME_LEN: (usize, usize) = (3, 30);
pub const LOCATION_LEN: (usize, usize) = (2, 100);
pub const SUBJECT_LEN: (usize, usize) = (5, 200);
pub const MESSAGE_LEN: (usize, usize) = (10, 2000);
pub const PHONE_DIGITS: (usize, usize) = (10, 15);

pub const EMAIL_MAX_LEN: usize = 254;
pub const EMAIL_LOCAL_MAX_LEN: usize = 64;

pub const SUBJECT_MIN_WORDS: usize = 2;
pub const MESSAGE_MIN_WORDS: usize = 3;
pub const MESSAGE_MAX_LINKS: usize = 3;

/// Repetition is only judged once a text has more tokens than this
pub const REPETITION_MIN_TOKENS: usize = 10;
/// Share of all tokens a single word may occupy
pub const REPETITION_MAX_SHARE: f64 = 0.3;

/// Placeholder person names
pub const PLACEHOLDER_NAMES: &[&str] = &[
    "test",
    "testing",
    "john doe",
    "jane doe",
    "test user",
    "asdf",
    "qwerty",
    "admin",
];

pub const RESERVED_USERNAMES: &[&str] = &[
    "admin",
    "root",
    "user",
    "test",
    "guest",
    "administrator",
    "api",
    "www",
    "mail",
    "email",
    "support",
    "help",
    "info",
    "contact",
    "service",
    "system",
    "null",
    "undefined",
    "none",
    "delete",
    "remove",
];

/// Substrings a username may not contain
pub const INAPPROPRIATE_USERNAME_PARTS: &[&str] = &[
    "admin",
    "moderator",
    "staff",
    "official",
    "spam",
    "fake",
    "scam",
    "phishing",
];

/// Fake and disposable email domains
pub const SUSPICIOUS_EMAIL_DOMAINS: &[&str] = &[
    "test.com",
    "example.com",
    "fake.com",
    "notreal.com",
    "mailinator.com",
    "guerrillamail.com",
    "10minutemail.com",
    "tempmail.com",
];

/// Role mailboxes discouraged for newsletter sign-up
pub const ROLE_EMAIL_LOCALS: &[&str] = &[
    "admin",
    "info",
    "support",
    "sales",
    "marketing",
    "noreply",
    "no-reply",
];

pub const WEAK_PASSWORD_PATTERNS: &[&str] =
    &["password", "123456", "qwerty", "admin", "letmein", "welcome"];

pub const KEYBOARD_PATTERNS: &[&str] = &["qwerty", "asdf", "1234", "abcd"];

/// Symbols that satisfy the "special character" criterion
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Spam markers in subjects, compared upper-case
pub const SUBJECT_SPAM_TOKENS: &[&str] = &[
    "!!!",
    "URGENT",
    "FREE",
    "WINNER",
    "$$$",
    "CLICK HERE",
    "ACT NOW",
];

/// Spam markers in message bodies, compared lower-case
pub const MESSAGE_SPAM_TOKENS: &[&str] = &[
    "viagra",
    "casino",
    "lottery",
    "winner",
    "prize",
    "click here",
];

pub const FAKE_PHONE_NUMBERS: &[&str] = &[
    "0000000000",
    "1111111111",
    "1234567890",
    "9999999999",
    "5555555555",
];

pub const PHONE_MIN_DISTINCT_DIGITS: usize = 4;

/// Shorteners and loopback hosts, matched as host substrings
pub const SUSPICIOUS_HOSTS: &[&str] = &["bit.ly", "tinyurl", "localhost", "127.0.0.1"];

pub const PLACEHOLDER_HOST: &str = "example.com";

pub const PLACEHOLDER_LOCATIONS: &[&str] = &[
    "test", "testing", "xyz", "abc", "none", "n/a", "unknown", "nowhere",
];
