use std::sync::Arc;

use serde::Serialize;

use super::loader::SceneLoader;
use super::types::Scene;
use crate::scan::ScanWindow;

/// How [`SceneCache::get_or_load`] produced its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheDecision {
    /// New window, the loader returned a scene.
    Loaded,
    /// Same window as last time, the cached scene was returned as is.
    Reused,
    /// No data for the window, the last good scene stands in.
    Fallback,
    /// No data for the window and no earlier scene to fall back on.
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct SceneLookup {
    pub scene: Option<Arc<Scene>>,
    pub decision: CacheDecision,
}

#[derive(Debug)]
struct CacheEntry {
    window: ScanWindow,
    scene: Option<Arc<Scene>>,
}

/// Single-slot scene memo with a fallback to the last good scene.
///
/// Two slots in practice: the outcome of the most recently requested window
/// (successful or not), which stops repeated loads while consecutive frames
/// share a window, and the last scene that loaded at all. A failed load only
/// replaces the first, so it never destroys a usable fallback.
#[derive(Debug, Default)]
pub struct SceneCache {
    current: Option<CacheEntry>,
    last_good: Option<Arc<Scene>>,
    loads: usize,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load<L>(&mut self, window: &ScanWindow, loader: &mut L) -> SceneLookup
    where
        L: SceneLoader + ?Sized,
    {
        if let Some(entry) = self.current.as_ref().filter(|e| e.window == *window) {
            return match &entry.scene {
                Some(scene) => SceneLookup {
                    scene: Some(scene.clone()),
                    decision: CacheDecision::Reused,
                },
                None => self.fallback(),
            };
        }

        self.loads += 1;
        let scene = match loader.load(window) {
            Ok(scene) => Some(Arc::new(scene)),
            Err(e) => {
                log::warn!("Scene load failed for {}: {}", window, e);
                None
            }
        };

        if let Some(scene) = &scene {
            self.last_good = Some(scene.clone());
        }
        self.current = Some(CacheEntry {
            window: *window,
            scene: scene.clone(),
        });

        match scene {
            Some(scene) => SceneLookup {
                scene: Some(scene),
                decision: CacheDecision::Loaded,
            },
            None => self.fallback(),
        }
    }

    fn fallback(&self) -> SceneLookup {
        match &self.last_good {
            Some(scene) => SceneLookup {
                scene: Some(scene.clone()),
                decision: CacheDecision::Fallback,
            },
            None => SceneLookup {
                scene: None,
                decision: CacheDecision::Unavailable,
            },
        }
    }

    #[cfg(test)]
    pub(crate) fn current_window(&self) -> Option<&ScanWindow> {
        self.current.as_ref().map(|e| &e.window)
    }

    #[cfg(test)]
    pub(crate) fn last_good(&self) -> Option<&Arc<Scene>> {
        self.last_good.as_ref()
    }

    /// Number of loader invocations so far.
    pub fn loads(&self) -> usize {
        self.loads
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;
    use crate::test_util::{at, MockLoader};

    fn window(h: u32, m: u32) -> ScanWindow {
        ScanWindow {
            start: at(h, m, 0),
            duration: TimeDelta::minutes(10),
        }
    }

    #[test]
    fn test_same_window_loads_once() {
        let mut loader = MockLoader::default();
        let mut cache = SceneCache::new();
        let w = window(12, 20);

        let decisions: Vec<_> = (0..5)
            .map(|_| cache.get_or_load(&w, &mut loader).decision)
            .collect();

        assert_eq!(1, loader.calls.len());
        assert_eq!(1, cache.loads());
        assert_eq!(CacheDecision::Loaded, decisions[0]);
        assert!(decisions[1..].iter().all(|d| *d == CacheDecision::Reused));
        assert_eq!(Some(&w), cache.current_window());
    }

    #[test]
    fn test_new_window_loads_again() {
        let mut loader = MockLoader::default();
        let mut cache = SceneCache::new();

        cache.get_or_load(&window(12, 20), &mut loader);
        let r = cache.get_or_load(&window(12, 30), &mut loader);

        assert_eq!(CacheDecision::Loaded, r.decision);
        assert_eq!(at(12, 30, 0), r.scene.unwrap().window.start);
        assert_eq!(vec![at(12, 20, 0), at(12, 30, 0)], loader.calls);
    }

    #[test]
    fn test_failed_window_falls_back_to_last_good() {
        let mut loader = MockLoader::missing(&[at(12, 30, 0)]);
        let mut cache = SceneCache::new();

        cache.get_or_load(&window(12, 20), &mut loader);
        let r = cache.get_or_load(&window(12, 30), &mut loader);

        assert_eq!(CacheDecision::Fallback, r.decision);
        assert_eq!(at(12, 20, 0), r.scene.unwrap().window.start);
        assert_eq!(at(12, 20, 0), cache.last_good().unwrap().window.start);

        // the failure is cached too
        let r = cache.get_or_load(&window(12, 30), &mut loader);
        assert_eq!(CacheDecision::Fallback, r.decision);
        assert_eq!(2, loader.calls.len());
    }

    #[test]
    fn test_failed_window_without_prior_scene() {
        let mut loader = MockLoader::missing(&[at(12, 20, 0)]);
        let mut cache = SceneCache::new();

        let r = cache.get_or_load(&window(12, 20), &mut loader);
        assert_eq!(CacheDecision::Unavailable, r.decision);
        assert!(r.scene.is_none());

        let r = cache.get_or_load(&window(12, 30), &mut loader);
        assert_eq!(CacheDecision::Loaded, r.decision);
    }

    #[test]
    fn test_success_after_failure_replaces_fallback() {
        let mut loader = MockLoader::missing(&[at(12, 30, 0)]);
        let mut cache = SceneCache::new();

        cache.get_or_load(&window(12, 20), &mut loader);
        cache.get_or_load(&window(12, 30), &mut loader);
        cache.get_or_load(&window(12, 40), &mut loader);

        assert_eq!(at(12, 40, 0), cache.last_good().unwrap().window.start);
    }

    #[test]
    fn test_single_slot_reloads_old_window() {
        let mut loader = MockLoader::default();
        let mut cache = SceneCache::new();

        cache.get_or_load(&window(12, 20), &mut loader);
        cache.get_or_load(&window(12, 30), &mut loader);
        let r = cache.get_or_load(&window(12, 20), &mut loader);

        assert_eq!(CacheDecision::Loaded, r.decision);
        assert_eq!(3, cache.loads());
    }

    #[test]
    fn test_closure_loader() {
        let mut cache = SceneCache::new();
        let mut loader = |w: &ScanWindow| -> Result<Scene, crate::scene::LoadError> {
            Err(crate::scene::LoadError::NoData(w.start))
        };

        let r = cache.get_or_load(&window(1, 0), &mut loader);
        assert_eq!(CacheDecision::Unavailable, r.decision);
    }
}
