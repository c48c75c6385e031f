/// A project to collect metrics for, paired with where its source lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    pub name: String,
    pub source_url: String,
}

impl ProjectDescriptor {
    pub fn new(name: &str, base_url: &str) -> Self {
        Self {
            name: name.to_string(),
            source_url: format!("{}/{}.git", base_url.trim_end_matches('/'), name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_url_from_base() {
        let project = ProjectDescriptor::new("commons-io", "https://github.com/apache/");
        assert_eq!(project.name, "commons-io");
        assert_eq!(project.source_url, "https://github.com/apache/commons-io.git");
    }
}
