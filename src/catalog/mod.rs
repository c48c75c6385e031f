mod apache;

pub use apache::APACHE_PROJECTS;

use crate::models::ProjectDescriptor;

pub const DEFAULT_BASE_URL: &str = "https://github.com/apache";

/// Pair every known project with its repository URL under `base_url`,
/// keeping declaration order.
pub fn projects(base_url: &str) -> Vec<ProjectDescriptor> {
    APACHE_PROJECTS
        .iter()
        .map(|name| ProjectDescriptor::new(name, base_url))
        .collect()
}
