//! Per-frame hook registration.
//!
//! The host calls [`FrameHooks::dispatch`] from its viewport draw callback.
//! [`HookToggle`] keeps at most one hook registered and makes enable/disable
//! idempotent.

use crate::driver::RenderView;

/// Callback run once per drawn frame.
pub type FrameHook = Box<dyn FnMut(&mut dyn RenderView)>;

/// Handle identifying a subscribed hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// A source of per-frame ticks that hooks can subscribe to.
pub trait FrameTicker {
    /// Registers `hook`, returning its handle.
    fn subscribe(&mut self, hook: FrameHook) -> HookId;

    /// Removes the hook. Returns false if it was not registered.
    fn unsubscribe(&mut self, id: HookId) -> bool;
}

/// Ordered list of frame hooks.
#[derive(Default)]
pub struct FrameHooks {
    next_id: u64,
    hooks: Vec<(HookId, FrameHook)>,
}

impl FrameHooks {
    /// Creates an empty hook list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every hook once, in subscription order.
    pub fn dispatch(&mut self, view: &mut dyn RenderView) {
        for (_, hook) in &mut self.hooks {
            hook(&mut *view);
        }
    }

    /// Returns the number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl FrameTicker for FrameHooks {
    fn subscribe(&mut self, hook: FrameHook) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.hooks.push((id, hook));
        id
    }

    fn unsubscribe(&mut self, id: HookId) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(hook_id, _)| *hook_id != id);
        self.hooks.len() != before
    }
}

/// Tracks a single optional hook registration.
#[derive(Debug, Default)]
pub struct HookToggle {
    handle: Option<HookId>,
}

impl HookToggle {
    /// Creates a toggle with nothing registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the hook built by `make_hook` unless one is already registered.
    ///
    /// Returns true if a new hook was registered.
    pub fn enable<T: FrameTicker + ?Sized>(
        &mut self,
        ticker: &mut T,
        make_hook: impl FnOnce() -> FrameHook,
    ) -> bool {
        if self.handle.is_some() {
            return false;
        }
        self.handle = Some(ticker.subscribe(make_hook()));
        true
    }

    /// Removes the registered hook, if any.
    ///
    /// Returns true if a hook was removed.
    pub fn disable<T: FrameTicker + ?Sized>(&mut self, ticker: &mut T) -> bool {
        match self.handle.take() {
            Some(id) => ticker.unsubscribe(id),
            None => false,
        }
    }

    /// Returns whether a hook is currently registered.
    pub fn is_enabled(&self) -> bool {
        self.handle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::ShadingMode;
    use crate::exposure::ExposureState;
    use crate::metering::{FrameBuffer, MeteringMode};
    use glam::DVec3;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Blank;

    impl FrameBuffer for Blank {
        fn width(&self) -> u32 {
            1
        }

        fn height(&self) -> u32 {
            1
        }

        fn read_pixel(&self, _x: u32, _y: u32) -> DVec3 {
            DVec3::ZERO
        }
    }

    struct BlankView(ExposureState);

    impl RenderView for BlankView {
        fn shading_mode(&self) -> ShadingMode {
            ShadingMode::Rendered
        }

        fn frame(&self) -> &dyn FrameBuffer {
            &Blank
        }

        fn metering_mode(&self) -> MeteringMode {
            MeteringMode::CenterSpot
        }

        fn exposure_state(&self) -> &ExposureState {
            &self.0
        }

        fn exposure_state_mut(&mut self) -> &mut ExposureState {
            &mut self.0
        }
    }

    fn counting_hook(counter: &Rc<Cell<u32>>) -> FrameHook {
        let counter = Rc::clone(counter);
        Box::new(move |_: &mut dyn RenderView| counter.set(counter.get() + 1))
    }

    #[test]
    fn test_dispatch_runs_each_hook() {
        let mut hooks = FrameHooks::new();
        let count = Rc::new(Cell::new(0));
        hooks.subscribe(counting_hook(&count));
        hooks.subscribe(counting_hook(&count));
        hooks.dispatch(&mut BlankView(ExposureState::default()));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let mut hooks = FrameHooks::new();
        let count = Rc::new(Cell::new(0));
        let id = hooks.subscribe(counting_hook(&count));
        assert!(hooks.unsubscribe(id));
        assert!(!hooks.unsubscribe(id));
        hooks.dispatch(&mut BlankView(ExposureState::default()));
        assert_eq!(count.get(), 0);
        assert!(hooks.is_empty());
    }

    #[test]
    fn test_toggle_is_idempotent() {
        let mut hooks = FrameHooks::new();
        let mut toggle = HookToggle::new();
        let count = Rc::new(Cell::new(0));

        assert!(!toggle.disable(&mut hooks));
        assert!(toggle.enable(&mut hooks, || counting_hook(&count)));
        assert!(!toggle.enable(&mut hooks, || counting_hook(&count)));
        assert_eq!(hooks.len(), 1);
        assert!(toggle.is_enabled());

        let mut view = BlankView(ExposureState::default());
        hooks.dispatch(&mut view);
        assert!(toggle.disable(&mut hooks));
        assert!(!toggle.disable(&mut hooks));
        hooks.dispatch(&mut view);
        assert_eq!(count.get(), 1);
    }
}
