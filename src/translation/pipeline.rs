//! Translation plans: the ordered engine calls one unit of text goes through.

use crate::engine::TranslationEngine;
use crate::error::EngineError;
use crate::language::{Strategy, Universe};
use tracing::debug;

/// One engine call in a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    pub universe: Universe,
    pub from: String,
    pub to: String,
}

/// Sequence of legs run back to back, each feeding its output to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationPlan {
    legs: Vec<Leg>,
}

impl TranslationPlan {
    /// `None` when the strategy is `Unsupported`.
    pub fn for_strategy(strategy: &Strategy, from: &str, to: &str) -> Option<Self> {
        let legs = match *strategy {
            Strategy::Direct { engine } => vec![Leg {
                universe: engine,
                from: from.to_string(),
                to: to.to_string(),
            }],
            Strategy::Bridge {
                first,
                pivot,
                second,
            } => vec![
                Leg {
                    universe: first,
                    from: from.to_string(),
                    to: pivot.to_string(),
                },
                Leg {
                    universe: second,
                    from: pivot.to_string(),
                    to: to.to_string(),
                },
            ],
            Strategy::Unsupported => return None,
        };
        Some(Self { legs })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Pairs the offline engine must have installed before the plan runs.
    pub fn offline_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.legs
            .iter()
            .filter(|leg| leg.universe == Universe::Offline)
            .map(|leg| (leg.from.as_str(), leg.to.as_str()))
    }

    /// Translate `text` through every leg in order. The first failing leg
    /// ends the run; later legs are never called.
    pub async fn run(&self, text: &str, engines: &EngineSet<'_>) -> Result<String, EngineError> {
        let mut current = text.to_string();
        for leg in &self.legs {
            let engine = engines.get(leg.universe);
            debug!("{}: {}->{}", engine.name(), leg.from, leg.to);
            current = engine.translate(&current, &leg.from, &leg.to).await?;
        }
        Ok(current)
    }
}

/// The engine serving each universe.
pub struct EngineSet<'a> {
    pub offline: &'a dyn TranslationEngine,
    pub cloud: &'a dyn TranslationEngine,
}

impl EngineSet<'_> {
    pub fn get(&self, universe: Universe) -> &dyn TranslationEngine {
        match universe {
            Universe::Offline => self.offline,
            Universe::Cloud => self.cloud,
        }
    }
}
