/// Shown when the extraction service could not be reached at all.
pub const CONNECT_FAILURE_MESSAGE: &str =
    "Could not connect to the server. Make sure the server is running.";

/// Shown when the service answered with a failure status but no `error` field.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Shown when the service succeeded but found nothing and sent no `message`.
pub const NO_IFRAMES_MESSAGE: &str = "No iframes found on this page. The site may use JavaScript protection or iframes may load only after user interaction.";

/// Outcome of a single remote extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeResult {
    /// The call completed with a success status. `urls` may be empty.
    Success {
        urls: Vec<String>,
        message: Option<String>,
    },
    /// Transport failure or failure status, already phrased for the user.
    Failure(String),
}

impl ScrapeResult {
    pub fn success(urls: Vec<String>, message: Option<String>) -> Self {
        Self::Success { urls, message }
    }

    /// No response could be obtained.
    pub fn transport_failure() -> Self {
        Self::Failure(CONNECT_FAILURE_MESSAGE.to_string())
    }

    /// A response arrived but its status signals failure.
    pub fn remote_failure(error: Option<String>) -> Self {
        Self::Failure(non_blank(error).unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()))
    }
}

/// The one view that is visible. Activating a variant replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayState {
    #[default]
    Idle,
    Loading,
    Error(String),
    Empty(String),
    Results(Vec<String>),
}

impl DisplayState {
    /// Classifies a finished call. A success without items is `Empty`, never `Results`.
    pub fn from_result(result: ScrapeResult) -> Self {
        match result {
            ScrapeResult::Failure(message) => DisplayState::Error(message),
            ScrapeResult::Success { urls, message } if urls.is_empty() => DisplayState::Empty(
                non_blank(message).unwrap_or_else(|| NO_IFRAMES_MESSAGE.to_string()),
            ),
            ScrapeResult::Success { urls, .. } => DisplayState::Results(urls),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DisplayState::Idle => "idle",
            DisplayState::Loading => "loading",
            DisplayState::Error(_) => "error",
            DisplayState::Empty(_) => "empty",
            DisplayState::Results(_) => "results",
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}
