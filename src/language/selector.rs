//! Strategy selection for a resolved (source, target) code pair.

use crate::language::registry::{LanguageRegistry, Universe, PIVOT_CODE};

/// How a pair of codes gets translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Both codes live in one universe; a single engine call.
    Direct { engine: Universe },
    /// Source and target live in different universes; hop through the pivot.
    Bridge {
        first: Universe,
        pivot: &'static str,
        second: Universe,
    },
    /// Neither universe, alone or bridged, covers the pair.
    Unsupported,
}

/// Pick a strategy for `source -> target`.
///
/// Total over arbitrary codes and case-insensitive. The offline engine is
/// checked first so pairs covered by both universes never hit the network.
pub fn select(registry: &LanguageRegistry, source: &str, target: &str) -> Strategy {
    let in_offline = |code: &str| registry.supports(Universe::Offline, code);
    let in_cloud = |code: &str| registry.supports(Universe::Cloud, code);

    if in_offline(source) && in_offline(target) {
        Strategy::Direct {
            engine: Universe::Offline,
        }
    } else if in_cloud(source) && in_cloud(target) {
        Strategy::Direct {
            engine: Universe::Cloud,
        }
    } else if in_offline(source) && in_cloud(target) {
        Strategy::Bridge {
            first: Universe::Offline,
            pivot: PIVOT_CODE,
            second: Universe::Cloud,
        }
    } else if in_cloud(source) && in_offline(target) {
        Strategy::Bridge {
            first: Universe::Cloud,
            pivot: PIVOT_CODE,
            second: Universe::Offline,
        }
    } else {
        Strategy::Unsupported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> &'static LanguageRegistry {
        LanguageRegistry::get()
    }

    const OFFLINE: Strategy = Strategy::Direct {
        engine: Universe::Offline,
    };
    const CLOUD: Strategy = Strategy::Direct {
        engine: Universe::Cloud,
    };

    #[test]
    fn test_offline_pair_is_direct_offline() {
        assert_eq!(select(registry(), "fr", "de"), OFFLINE);
    }

    #[test]
    fn test_cloud_pair_is_direct_cloud() {
        assert_eq!(select(registry(), "hi", "gom"), CLOUD);
    }

    #[test]
    fn test_shared_source_with_cloud_only_target_is_direct_cloud() {
        // "en" is in both universes but "hi" is cloud-only.
        assert_eq!(select(registry(), "en", "hi"), CLOUD);
        assert_eq!(select(registry(), "hi", "en"), CLOUD);
    }

    #[test]
    fn test_offline_preferred_when_both_universes_cover_pair() {
        assert_eq!(select(registry(), "en", "en"), OFFLINE);
        assert_eq!(select(registry(), "en", "de"), OFFLINE);
    }

    #[test]
    fn test_offline_to_cloud_bridges_through_pivot() {
        assert_eq!(
            select(registry(), "ja", "ml"),
            Strategy::Bridge {
                first: Universe::Offline,
                pivot: "en",
                second: Universe::Cloud,
            }
        );
    }

    #[test]
    fn test_cloud_to_offline_bridges_through_pivot() {
        assert_eq!(
            select(registry(), "ta", "fr"),
            Strategy::Bridge {
                first: Universe::Cloud,
                pivot: "en",
                second: Universe::Offline,
            }
        );
    }

    #[test]
    fn test_unknown_codes_are_unsupported() {
        assert_eq!(select(registry(), "xx", "yy"), Strategy::Unsupported);
        assert_eq!(select(registry(), "fr", "yy"), Strategy::Unsupported);
        assert_eq!(select(registry(), "xx", "hi"), Strategy::Unsupported);
    }

    #[test]
    fn test_select_is_case_insensitive() {
        assert_eq!(select(registry(), "FR", "De"), OFFLINE);
        assert_eq!(select(registry(), "HI", "TA"), CLOUD);
    }

    #[test]
    fn test_select_is_total_over_known_codes() {
        let registry = registry();
        let codes: Vec<_> = registry
            .codes(Universe::Offline)
            .iter()
            .chain(registry.codes(Universe::Cloud).iter())
            .copied()
            .collect();

        for source in &codes {
            for target in &codes {
                let strategy = select(registry, source, target);
                assert_ne!(strategy, Strategy::Unsupported, "{source} -> {target}");
                assert_eq!(strategy, select(registry, source, target));
                if registry.supports(Universe::Offline, source)
                    && registry.supports(Universe::Offline, target)
                {
                    assert_eq!(strategy, OFFLINE);
                }
            }
        }
    }
}
