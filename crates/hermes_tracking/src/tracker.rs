use std::sync::Arc;

use tracing::{debug, instrument};

use crate::{
    error::{Result, TrackingError},
    geometry::point::Point,
    params::TrackerParams,
    progress::{
        calculator::ProgressCalculator,
        state::{ProgressField, ProgressState},
    },
    route::route::Route,
    snap::snap,
};

type ProgressHandler = Box<dyn FnMut(&ProgressState, &[ProgressField]) + Send + 'static>;

/// Follows an agent along a route, one location sample at a time.
///
/// Updates must be serialized by the caller, the tracker holds no lock.
pub struct RouteTracker {
    route: Arc<Route>,
    params: TrackerParams,
    calculator: ProgressCalculator,
    state: Option<ProgressState>,
    /// The held state is the preview placeholder and was never computed.
    is_placeholder: bool,
    on_progress_handlers: Vec<ProgressHandler>,
}

impl RouteTracker {
    pub fn new(route: Arc<Route>, params: TrackerParams) -> Result<Self> {
        if route.is_empty() {
            return Err(TrackingError::EmptyRoute);
        }

        Ok(RouteTracker {
            calculator: ProgressCalculator::new(&params),
            route,
            params,
            state: None,
            is_placeholder: false,
            on_progress_handlers: Vec::new(),
        })
    }

    /// A tracker showing [`ProgressState::placeholder`] until the first update.
    pub fn with_placeholder(route: Arc<Route>, params: TrackerParams) -> Result<Self> {
        let mut tracker = RouteTracker::new(route, params)?;
        tracker.state = Some(ProgressState::placeholder());
        tracker.is_placeholder = true;

        Ok(tracker)
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    /// `None` until the first location was tracked.
    pub fn state(&self) -> Option<&ProgressState> {
        self.state.as_ref()
    }

    /// Called after every update that changed at least one field.
    pub fn on_progress<F>(&mut self, callback: F)
    where
        F: FnMut(&ProgressState, &[ProgressField]) + Send + 'static,
    {
        self.on_progress_handlers.push(Box::new(callback));
    }

    /// Snaps `location` to the route, computes the new progress and replaces
    /// the held state. Errors leave the held state untouched.
    #[instrument(level = "debug", skip_all, fields(x = location.x(), y = location.y()))]
    pub fn update(&mut self, location: &Point) -> Result<&ProgressState> {
        let snapped = snap(&self.route, location)?;
        debug!(
            leg = %snapped.leg_index,
            segment = %snapped.segment_index,
            distance = snapped.distance(),
            "Snapped location"
        );

        let previous = if self.is_placeholder {
            None
        } else {
            self.state.as_ref()
        };

        let state = self.calculator.calculate(&self.route, &snapped, previous)?;
        let changed_fields = state.changed_fields(self.state.as_ref());

        if !changed_fields.is_empty() {
            for handler in self.on_progress_handlers.iter_mut() {
                handler(&state, &changed_fields);
            }
        }

        self.is_placeholder = false;
        Ok(self.state.insert(state))
    }
}
