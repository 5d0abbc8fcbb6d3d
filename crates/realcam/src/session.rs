//! Viewport session: settings, frame hooks and the auto exposure toggle.

use realcam_core::{
    camera_fields, tone_curves, CameraFields, CameraSettings, ExposureController, ExposureState,
    FrameBuffer, FrameHooks, HookToggle, MeteringLoop, MeteringMode, RenderView, ShadingMode,
};

use crate::Result;

/// Per-viewport camera controls.
///
/// The host calls [`ViewportSession::draw_frame`] from its viewport draw
/// callback. Auto exposure runs as a frame hook while `enable_ae` is set.
pub struct ViewportSession {
    settings: CameraSettings,
    controller: ExposureController,
    hooks: FrameHooks,
    auto_exposure: HookToggle,
}

impl ViewportSession {
    /// Creates a session, registering auto exposure if the settings ask for it.
    ///
    /// # Errors
    ///
    /// Returns an error if a setting is out of range, or if auto exposure is
    /// requested before [`crate::init()`].
    pub fn new(settings: CameraSettings) -> Result<Self> {
        settings.validate()?;
        let enable_ae = settings.enable_ae;
        let mut session = Self {
            settings,
            controller: ExposureController::default(),
            hooks: FrameHooks::new(),
            auto_exposure: HookToggle::new(),
        };
        if enable_ae {
            session.set_auto_exposure(true)?;
        }
        Ok(session)
    }

    /// Replaces the exposure controller used when auto exposure is next enabled.
    #[must_use]
    pub fn with_controller(mut self, controller: ExposureController) -> Self {
        self.controller = controller;
        self
    }

    /// Current settings.
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    /// Sets the metering mode, EV compensation and grid counts.
    ///
    /// The enable flags are left as they are; use [`Self::set_auto_exposure`]
    /// and [`Self::set_camera_enabled`] to toggle them.
    ///
    /// # Errors
    ///
    /// Returns an error if a setting is out of range.
    pub fn update_settings(&mut self, settings: CameraSettings) -> Result<()> {
        settings.validate()?;
        self.settings = CameraSettings {
            enabled: self.settings.enabled,
            enable_ae: self.settings.enable_ae,
            ..settings
        };
        Ok(())
    }

    /// Enables or disables auto exposure. Both directions are idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error when enabling before [`crate::init()`].
    pub fn set_auto_exposure(&mut self, enabled: bool) -> Result<()> {
        if enabled {
            let curves = tone_curves()?;
            let controller = self.controller;
            if self.auto_exposure.enable(&mut self.hooks, || {
                MeteringLoop::new(curves)
                    .with_controller(controller)
                    .into_hook()
            }) {
                log::info!("auto exposure enabled");
            }
        } else if self.auto_exposure.disable(&mut self.hooks) {
            log::info!("auto exposure disabled");
        }
        self.settings.enable_ae = enabled;
        Ok(())
    }

    /// Returns whether the auto exposure hook is registered.
    pub fn is_auto_exposure_enabled(&self) -> bool {
        self.auto_exposure.is_enabled()
    }

    /// Toggles the physical camera controls and returns the renderer fields
    /// to apply at the given frame rate.
    pub fn set_camera_enabled(&mut self, enabled: bool, fps: f64) -> CameraFields {
        self.settings.enabled = enabled;
        camera_fields(&self.settings, fps)
    }

    /// Sets the aperture in f-stops. Returns the renderer fields to apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the aperture is out of range.
    pub fn set_aperture(&mut self, aperture: f64, fps: f64) -> Result<CameraFields> {
        let settings = CameraSettings {
            aperture,
            ..self.settings.clone()
        };
        settings.validate()?;
        self.settings = settings;
        Ok(camera_fields(&self.settings, fps))
    }

    /// Sets the shutter speed in seconds. Returns the renderer fields to apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutter speed is out of range.
    pub fn set_shutter_speed(&mut self, shutter_speed: f64, fps: f64) -> Result<CameraFields> {
        let settings = CameraSettings {
            shutter_speed,
            ..self.settings.clone()
        };
        settings.validate()?;
        self.settings = settings;
        Ok(camera_fields(&self.settings, fps))
    }

    /// Frame hooks, for hosts registering their own per-frame work.
    pub fn hooks_mut(&mut self) -> &mut FrameHooks {
        &mut self.hooks
    }

    /// Per-frame draw callback.
    ///
    /// Metering mode and EV compensation are taken from the session settings.
    /// Only `state.exposure` is written back.
    pub fn draw_frame(
        &mut self,
        shading: ShadingMode,
        frame: &dyn FrameBuffer,
        state: &mut ExposureState,
    ) {
        let mut view = SessionView {
            shading,
            frame,
            mode: self.settings.metering_mode(),
            state: state.with_ev_compensation(self.settings.ev_compensation),
        };
        self.hooks.dispatch(&mut view);
        state.exposure = view.state.exposure;
    }

    /// Per-frame draw callback for hosts providing their own [`RenderView`].
    pub fn draw_view(&mut self, view: &mut dyn RenderView) {
        self.hooks.dispatch(view);
    }
}

struct SessionView<'a> {
    shading: ShadingMode,
    frame: &'a dyn FrameBuffer,
    mode: MeteringMode,
    state: ExposureState,
}

impl RenderView for SessionView<'_> {
    fn shading_mode(&self) -> ShadingMode {
        self.shading
    }

    fn frame(&self) -> &dyn FrameBuffer {
        self.frame
    }

    fn metering_mode(&self) -> MeteringMode {
        self.mode
    }

    fn exposure_state(&self) -> &ExposureState {
        &self.state
    }

    fn exposure_state_mut(&mut self) -> &mut ExposureState {
        &mut self.state
    }
}
