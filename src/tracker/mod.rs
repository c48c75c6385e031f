pub mod browser;
pub mod parser;
pub mod provider;
pub mod rest;
pub mod webdriver;

pub use browser::BrowserIssueCounter;
pub use parser::parse_issue_count;
pub use provider::IssueCounter;
pub use rest::JiraRestClient;
