use flipbook_core::{
    ArrowKey, DeviceClass, FlipEventAdapter, NavigationTrigger, PageCatalog, PageWindow,
    RecordingHistory, WindowPolicy,
};
use std::fmt;
use std::str::FromStr;

/// One scripted navigation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Left,
    Right,
    /// Widget flip to a page (flip-start then flip-end)
    Goto(usize),
    Hash(String),
    /// Deferred preload of the neighbouring spreads
    Preload,
    /// Load every page
    All,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "left" => return Ok(Step::Left),
            "right" => return Ok(Step::Right),
            "preload" => return Ok(Step::Preload),
            "all" => return Ok(Step::All),
            _ => {}
        }

        if let Some(page) = s.strip_prefix("goto:") {
            return page
                .parse()
                .map(Step::Goto)
                .map_err(|_| format!("Invalid page in '{}'", s));
        }
        if let Some(hash) = s.strip_prefix("hash:") {
            return Ok(Step::Hash(hash.to_string()));
        }
        Err(format!(
            "Unknown step '{}' (expected left, right, goto:N, hash:H, preload or all)",
            s
        ))
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Left => write!(f, "left"),
            Step::Right => write!(f, "right"),
            Step::Goto(page) => write!(f, "goto:{}", page),
            Step::Hash(hash) => write!(f, "hash:{}", hash),
            Step::Preload => write!(f, "preload"),
            Step::All => write!(f, "all"),
        }
    }
}

/// State after one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub page: usize,
    pub hash: Option<String>,
    /// 1-based page numbers currently loaded
    pub loaded: String,
    pub loaded_count: usize,
    pub added: usize,
    pub removed: usize,
}

/// Navigation over an in-memory catalog, no assets involved
pub struct Simulation {
    adapter: FlipEventAdapter<PageWindow, RecordingHistory>,
}

impl Simulation {
    pub fn new(
        catalog: PageCatalog,
        policy: WindowPolicy,
        device: DeviceClass,
        deep_linking: bool,
    ) -> Self {
        let adapter = FlipEventAdapter::new(
            PageWindow::new(catalog),
            RecordingHistory::default(),
            policy,
            device,
        )
        .with_deep_linking(deep_linking);
        Self { adapter }
    }

    /// Turn off unloading of pages that leave the window
    pub fn with_eviction(mut self, enabled: bool) -> Self {
        self.adapter.set_eviction(enabled);
        self
    }

    pub fn mount(&mut self, deep_link: Option<String>) -> StepReport {
        let outcome = self.adapter.handle(NavigationTrigger::Mount { deep_link });
        let (added, removed) = outcome.map_or((0, 0), |r| (r.loaded, r.unloaded));
        self.report(added, removed)
    }

    pub fn step(&mut self, step: &Step) -> StepReport {
        let triggers = match step {
            Step::Left => vec![NavigationTrigger::Key(ArrowKey::Left)],
            Step::Right => vec![NavigationTrigger::Key(ArrowKey::Right)],
            Step::Goto(page) => vec![
                NavigationTrigger::FlipStart { page: *page },
                NavigationTrigger::FlipEnd { page: *page },
            ],
            Step::Hash(hash) => vec![NavigationTrigger::HashChange { hash: hash.clone() }],
            Step::Preload => {
                let added = self.adapter.apply_deferred_preload();
                return self.report(added, 0);
            }
            Step::All => {
                let added = self.adapter.load_everything();
                return self.report(added, 0);
            }
        };

        let (mut added, mut removed) = (0, 0);
        for trigger in triggers {
            if let Some(reconciliation) = self.adapter.handle(trigger) {
                added += reconciliation.loaded;
                removed += reconciliation.unloaded;
            }
        }
        self.report(added, removed)
    }

    pub fn hashes_written(&self) -> usize {
        self.adapter.history().hashes.len()
    }

    fn report(&mut self, added: usize, removed: usize) -> StepReport {
        // Change records are only needed by a renderer
        self.adapter.store_mut().take_changes();

        let window = self.adapter.store();
        StepReport {
            page: self.adapter.current_page(),
            hash: self.adapter.history().current().map(str::to_string),
            loaded: format_pages(window.loaded_indices()),
            loaded_count: window.loaded_count(),
            added,
            removed,
        }
    }
}

/// Compress 0-based indices into 1-based page ranges, e.g. "1-3, 7"
pub fn format_pages(indices: impl IntoIterator<Item = usize>) -> String {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for index in indices {
        let page = index + 1;
        match ranges.last_mut() {
            Some((_, end)) if *end + 1 == page => *end = page,
            _ => ranges.push((page, page)),
        }
    }

    if ranges.is_empty() {
        return "none".to_string();
    }

    ranges
        .iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{}-{}", start, end)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
