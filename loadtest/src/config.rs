use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub remote: String,

    #[serde(with = "humantime_serde")]
    pub duration: Duration,

    pub workloads: Vec<Workload>,
}

#[derive(Debug, Deserialize)]
pub struct Workload {
    pub name: String,
    pub profile: Profile,
    pub concurrency: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Browse,
    Match,
}

impl From<Profile> for loadtest::Profile {
    fn from(profile: Profile) -> Self {
        match profile {
            Profile::Browse => loadtest::Profile::Browse,
            Profile::Match => loadtest::Profile::Match,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_config() {
        let yaml = r#"
remote: https://api.checklistbank.org
duration: 5m
workloads:
  - name: browse
    profile: browse
    concurrency: 8
    seed: 42
  - name: match
    profile: match
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.remote, "https://api.checklistbank.org");
        assert_eq!(config.duration, Duration::from_secs(300));
        assert_eq!(config.workloads.len(), 2);

        let browse = &config.workloads[0];
        assert!(matches!(browse.profile, Profile::Browse));
        assert_eq!(browse.concurrency, Some(8));
        assert_eq!(browse.seed, Some(42));

        let matching = &config.workloads[1];
        assert!(matches!(matching.profile, Profile::Match));
        assert_eq!(matching.concurrency, None);
        assert_eq!(matching.seed, None);
    }
}
