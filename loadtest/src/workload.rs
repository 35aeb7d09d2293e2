//! A module for defining a [`Workload`] of simulated users browsing or
//! querying the dataset service.

use std::thread::available_parallelism;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use rand_distr::weighted::WeightedIndex;

use crate::generate;

/// Browse action weights, in the order assembly, dataset, passer, taxon, logo.
const BROWSE_WEIGHTS: [u32; 5] = [3, 1, 2, 10, 1];

/// Default number of simulated users for the match profile.
const MATCH_CONCURRENCY: usize = 25;

/// A builder for creating a [`Workload`].
#[derive(Debug)]
pub struct WorkloadBuilder {
    name: String,
    profile: Profile,
    concurrency: usize,
    seed: u64,
}

impl WorkloadBuilder {
    /// The maximum number of concurrently simulated users within this workload.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Seeds the workload RNG for a reproducible request sequence.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Creates the workload instance.
    pub fn build(self) -> Workload {
        let rng = SmallRng::seed_from_u64(self.seed);
        let kind = match self.profile {
            Profile::Browse => WorkloadKind::Browse {
                actions: WeightedIndex::new(BROWSE_WEIGHTS).unwrap(),
            },
            Profile::Match => WorkloadKind::Match,
        };

        Workload {
            name: self.name,
            concurrency: self.concurrency,
            rng,
            kind,
        }
    }
}

/// The task profile a [`Workload`] draws its actions from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Profile {
    /// Dataset browsing: a weighted mix of dataset, taxon and image lookups.
    Browse,
    /// Name matching: scientific name queries against the names index.
    Match,
}

/// Specification of a simulated user population and the actions it performs.
#[derive(Debug)]
pub struct Workload {
    /// Name of the workload for identification in the report.
    pub(crate) name: String,
    /// The number of concurrently simulated users.
    pub(crate) concurrency: usize,

    /// The RNG driving action selection and parameter generation.
    rng: SmallRng,
    kind: WorkloadKind,
}

#[derive(Debug)]
enum WorkloadKind {
    Browse { actions: WeightedIndex<u32> },
    Match,
}

impl Workload {
    /// Constructs a new workload builder with the given name and profile.
    pub fn builder(name: impl Into<String>, profile: Profile) -> WorkloadBuilder {
        let concurrency = match profile {
            Profile::Browse => available_parallelism().unwrap().get(),
            Profile::Match => MATCH_CONCURRENCY,
        };

        WorkloadBuilder {
            name: name.into(),
            profile,
            concurrency,
            seed: rand::random(),
        }
    }

    pub(crate) fn next_action(&mut self) -> Action {
        match &self.kind {
            WorkloadKind::Browse { actions } => match actions.sample(&mut self.rng) {
                0 => Action::Assembly,
                1 => Action::Dataset,
                2 => Action::Passer,
                3 => Action::Taxon {
                    id: generate::taxon_id(&mut self.rng),
                },
                _ => Action::Logo,
            },
            WorkloadKind::Match => Action::Match {
                scientific_name: generate::scientific_name(&mut self.rng).to_owned(),
                authorship: generate::authorship(&mut self.rng).to_owned(),
                bust: generate::cache_buster(&mut self.rng),
            },
        }
    }

    /// Think time this simulated user pauses before its next action.
    ///
    /// Browsing users pause for a whole number of seconds between 1 and 5;
    /// matching users fire back-to-back.
    pub(crate) fn next_wait(&mut self) -> Option<Duration> {
        match self.kind {
            WorkloadKind::Browse { .. } => {
                Some(Duration::from_secs(self.rng.random_range(1..=5)))
            }
            WorkloadKind::Match => None,
        }
    }
}

/// An action performed by a simulated user.
#[derive(Debug, Eq, PartialEq)]
pub enum Action {
    /// Fetch the source composition of the COL project.
    Assembly,
    /// Fetch the metadata of the latest release.
    Dataset,
    /// Fetch the house sparrow record and its info page.
    Passer,
    /// Look up a freshly generated taxon identifier.
    Taxon {
        /// The generated identifier, see [`generate::taxon_id`].
        id: String,
    },
    /// Fetch the dataset logo in its original size.
    Logo,
    /// Match a scientific name and authorship against the names index.
    Match {
        /// The sampled scientific name.
        scientific_name: String,
        /// The sampled authorship, independent of the name.
        authorship: String,
        /// Cache-busting value so the query reaches the origin service.
        bust: u64,
    },
}

impl Action {
    /// The name under which this action appears in the report.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Assembly => "assembly",
            Action::Dataset => "dataset",
            Action::Passer => "passer",
            Action::Taxon { .. } => "taxon",
            Action::Logo => "logo",
            Action::Match { .. } => "match",
        }
    }

    /// The GET requests this action performs, in order.
    pub fn requests(&self) -> Vec<GetRequest> {
        match self {
            Action::Assembly => vec![GetRequest::new("/dataset/3/assembly")],
            Action::Dataset => vec![GetRequest::new("/dataset/3LR")],
            Action::Passer => vec![
                GetRequest::new("/dataset/3LR/taxon/4DXXM"),
                GetRequest::new("/dataset/3LR/taxon/4DXXM/info"),
            ],
            Action::Taxon { id } => vec![GetRequest::new(format!("/dataset/3LR/taxon/{id}"))],
            Action::Logo => vec![GetRequest::new("/image/2232/logo").query("size", "ORIGINAL")],
            Action::Match {
                scientific_name,
                authorship,
                bust,
            } => vec![
                GetRequest::new("/dataset/9910/match/nameusage")
                    .query("scientificName", scientific_name)
                    .query("authorship", authorship)
                    .query("bust", bust.to_string()),
            ],
        }
    }
}

/// A single planned GET request against the service under test.
#[derive(Debug, Eq, PartialEq)]
pub struct GetRequest {
    /// Request path below the API root, starting with a slash.
    pub path: String,
    /// Query parameters, in the order they are appended.
    pub query: Vec<(&'static str, String)>,
}

impl GetRequest {
    fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }
}
