//! Shared constants for end-to-end tests

/// User with a stats record and history
pub const TEST_USER: &str = "alice";

/// User that owns nothing
pub const OTHER_USER: &str = "bob";

/// Client id sent to the mocked MusicBrainz
pub const TEST_USER_AGENT: &str = "venu-stats-tests/1.0 (tests@venu.example)";

pub const METALLICA_MBID: &str = "65f4f0c5-ef9e-490c-aee3-909e7ae6b2ab";
pub const RADIOHEAD_MBID: &str = "a74b1b7f-71a5-4011-9441-d0b5e4122711";
pub const NIRVANA_MBID: &str = "5b11f4ce-a62d-471e-81fc-a69a8278c7da";

/// Gemini key accepted by the mocked endpoint
pub const GEMINI_TEST_KEY: &str = "test-gemini-key";
