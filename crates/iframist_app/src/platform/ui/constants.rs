pub const APP_TITLE: &str = " iframist ";
pub const INPUT_TITLE: &str = " URL ";
pub const BUSY_INDICATOR: &str = "◌";

pub const IDLE_HINT: &str = "Enter a URL and press Enter to list its embedded iframe URLs.";
pub const LOADING_HINT: &str = "Scraping page, this can take a while on first use…";
pub const ERROR_TITLE: &str = " Error ";
pub const EMPTY_TITLE: &str = " No iframes found ";
pub const RESULTS_TITLE: &str = " Results ";

pub const HELP_INPUT: &str = "Enter: scrape · Tab: results · Esc: quit";
pub const HELP_RESULTS: &str = "↑/↓: select · Enter/c: copy · a: copy all · Tab: input · Esc: quit";
