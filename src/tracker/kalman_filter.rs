//! Motion-state estimators for bounding box tracking using ndarray and a
//! manual/nalgebra-based inverse.
//!
//! Two interchangeable variants implement the same predict/update contract:
//! four independent scalar filters (one per box component) and a joint
//! 7-state constant-velocity filter over center, area and aspect ratio.

use ndarray::{Array1, Array2};

use crate::tracker::rect::Rect;

/// Selects which motion filter a tracking profile uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionModel {
    /// Four independent 1-D constant-position filters over center-x,
    /// center-y, width and height, with a finite-difference velocity
    /// extrapolation on predict.
    #[default]
    Scalar,
    /// One joint constant-velocity linear-Gaussian filter over
    /// `[cx, cy, area, aspect, vcx, vcy, varea]`.
    Joint,
}

impl MotionModel {
    /// Build a filter of this variant seeded from an initial box.
    pub fn create(
        &self,
        seed: &Rect,
        process_noise: f64,
        measurement_noise: f64,
    ) -> Box<dyn MotionFilter> {
        match self {
            MotionModel::Scalar => {
                Box::new(ScalarKalmanFilter::new(seed, process_noise, measurement_noise))
            }
            MotionModel::Joint => Box::new(JointKalmanFilter::new(seed)),
        }
    }
}

/// Common predict/update contract shared by both filter variants.
///
/// Callers must reject degenerate observations (zero width or height) before
/// they reach the filter; no validation happens here.
pub trait MotionFilter: std::fmt::Debug {
    /// Time update: advance the belief one frame and return the predicted box.
    fn predict(&mut self) -> Rect;

    /// Measurement update: correct the belief with an observed box and return
    /// the filtered box.
    fn update(&mut self, observation: &Rect) -> Rect;

    /// Current belief as a box (latest predicted or corrected state).
    fn state_rect(&self) -> Rect;
}

/// Initial variance, large enough that the first correction trusts the
/// observation almost completely.
const INITIAL_VARIANCE: f64 = 10.0;

/// One 1-D constant-position filter with a scalar Riccati gain update.
#[derive(Debug, Clone, Copy)]
struct ScalarAxis {
    x: f64,
    x_prev: f64,
    p: f64,
}

impl ScalarAxis {
    fn new(x: f64) -> Self {
        Self {
            x,
            x_prev: x,
            p: INITIAL_VARIANCE,
        }
    }

    /// Extrapolate using the last state delta: `x + (x - x_prev)`.
    ///
    /// This is a finite-difference velocity approximation rather than an
    /// explicit velocity state; the noise constants are tuned against this
    /// exact formula, so it must not be replaced with a textbook model.
    fn predict(&mut self, q: f64) -> f64 {
        let dx = self.x - self.x_prev;
        self.x_prev = self.x;
        self.x += dx;
        self.p += q;
        self.x
    }

    /// Scalar Kalman correction: `K = P/(P+R)`, `P' = R*P/(P+R)`.
    fn update(&mut self, z: f64, r: f64) -> f64 {
        let k = self.p / (self.p + r);
        self.x += k * (z - self.x);
        self.p = r * self.p / (self.p + r);
        self.x
    }
}

/// Independent per-component filter: center-x, center-y, width and height are
/// each tracked by their own [`ScalarAxis`].
#[derive(Debug, Clone)]
pub struct ScalarKalmanFilter {
    process_noise: f64,
    measurement_noise: f64,
    cx: ScalarAxis,
    cy: ScalarAxis,
    width: ScalarAxis,
    height: ScalarAxis,
}

impl ScalarKalmanFilter {
    pub fn new(seed: &Rect, process_noise: f64, measurement_noise: f64) -> Self {
        let (cx, cy) = seed.center();
        Self {
            process_noise,
            measurement_noise,
            cx: ScalarAxis::new(cx as f64),
            cy: ScalarAxis::new(cy as f64),
            width: ScalarAxis::new(seed.width as f64),
            height: ScalarAxis::new(seed.height as f64),
        }
    }
}

impl MotionFilter for ScalarKalmanFilter {
    fn predict(&mut self) -> Rect {
        let q = self.process_noise;
        let cx = self.cx.predict(q);
        let cy = self.cy.predict(q);
        let w = self.width.predict(q);
        let h = self.height.predict(q);
        Rect::from_xywh(cx as f32, cy as f32, w as f32, h as f32)
    }

    fn update(&mut self, observation: &Rect) -> Rect {
        let r = self.measurement_noise;
        let (ocx, ocy) = observation.center();
        let cx = self.cx.update(ocx as f64, r);
        let cy = self.cy.update(ocy as f64, r);
        let w = self.width.update(observation.width as f64, r);
        let h = self.height.update(observation.height as f64, r);
        Rect::from_xywh(cx as f32, cy as f32, w as f32, h as f32)
    }

    fn state_rect(&self) -> Rect {
        Rect::from_xywh(
            self.cx.x as f32,
            self.cy.x as f32,
            self.width.x as f32,
            self.height.x as f32,
        )
    }
}

/// Joint 7-state constant-velocity filter.
///
/// The state space `[cx, cy, area, aspect, vcx, vcy, varea]` contains the
/// box center position, area and aspect ratio (w/h) plus the
/// velocities of all but the aspect ratio, which is assumed constant. The
/// observed box (cx, cy, area, aspect) is a direct linear observation of the
/// first four components.
#[derive(Debug, Clone)]
pub struct JointKalmanFilter {
    motion_mat: Array2<f64>,
    update_mat: Array2<f64>,
    process_cov: Array2<f64>,
    measurement_cov: Array2<f64>,
    mean: Array1<f64>,
    covariance: Array2<f64>,
}

const STATE_DIM: usize = 7;
const OBS_DIM: usize = 4;

impl JointKalmanFilter {
    pub fn new(seed: &Rect) -> Self {
        // position += velocity
        let mut motion_mat = Array2::eye(STATE_DIM);
        for i in 0..3 {
            motion_mat[[i, OBS_DIM + i]] = 1.0;
        }

        let mut update_mat = Array2::zeros((OBS_DIM, STATE_DIM));
        for i in 0..OBS_DIM {
            update_mat[[i, i]] = 1.0;
        }

        // Process noise is larger on the velocity terms: acceleration is the
        // unmodeled quantity. Measurement noise trusts position over
        // area/aspect.
        let q_diag = [1.0, 1.0, 1.0, 1e-2, 10.0, 10.0, 10.0];
        let mut process_cov = Array2::zeros((STATE_DIM, STATE_DIM));
        for i in 0..STATE_DIM {
            process_cov[[i, i]] = q_diag[i];
        }

        let r_diag = [1.0, 1.0, 10.0, 10.0];
        let mut measurement_cov = Array2::zeros((OBS_DIM, OBS_DIM));
        for i in 0..OBS_DIM {
            measurement_cov[[i, i]] = r_diag[i];
        }

        let obs = observation_vector(seed);
        let mut mean = Array1::zeros(STATE_DIM);
        for i in 0..OBS_DIM {
            mean[i] = obs[i];
        }

        let covariance = Array2::eye(STATE_DIM) * INITIAL_VARIANCE;

        Self {
            motion_mat,
            update_mat,
            process_cov,
            measurement_cov,
            mean,
            covariance,
        }
    }

    /// Helper to invert the 4x4 innovation covariance using nalgebra
    /// (pure Rust, no BLAS/LAPACK).
    fn invert_4x4(m: &Array2<f64>) -> Array2<f64> {
        let mut nm = nalgebra::Matrix4::zeros();
        for i in 0..OBS_DIM {
            for j in 0..OBS_DIM {
                nm[(i, j)] = m[[i, j]];
            }
        }
        // The innovation covariance is positive definite by construction
        // (R has strictly positive diagonal), so the inverse exists.
        let inv = nm
            .try_inverse()
            .unwrap_or_else(nalgebra::Matrix4::identity);
        let mut res = Array2::zeros((OBS_DIM, OBS_DIM));
        for i in 0..OBS_DIM {
            for j in 0..OBS_DIM {
                res[[i, j]] = inv[(i, j)];
            }
        }
        res
    }
}

impl MotionFilter for JointKalmanFilter {
    fn predict(&mut self) -> Rect {
        self.mean = self.motion_mat.dot(&self.mean);
        self.covariance = self
            .motion_mat
            .dot(&self.covariance)
            .dot(&self.motion_mat.t())
            + &self.process_cov;
        self.state_rect()
    }

    fn update(&mut self, observation: &Rect) -> Rect {
        let z = observation_vector(observation);

        // S = H * P * H^T + R
        let projected_mean = self.update_mat.dot(&self.mean);
        let projected_cov = self
            .update_mat
            .dot(&self.covariance)
            .dot(&self.update_mat.t())
            + &self.measurement_cov;

        // K = P * H^T * S^-1
        let s_inv = Self::invert_4x4(&projected_cov);
        let kalman_gain = self.covariance.dot(&self.update_mat.t()).dot(&s_inv);

        let innovation = z - projected_mean;
        self.mean = &self.mean + &kalman_gain.dot(&innovation);
        self.covariance = &self.covariance
            - &kalman_gain.dot(&projected_cov).dot(&kalman_gain.t());

        self.state_rect()
    }

    fn state_rect(&self) -> Rect {
        rect_from_state(&self.mean)
    }
}

fn observation_vector(rect: &Rect) -> Array1<f64> {
    let (cx, cy) = rect.center();
    Array1::from_vec(vec![
        cx as f64,
        cy as f64,
        rect.area() as f64,
        rect.aspect_ratio() as f64,
    ])
}

/// Reconstruct a box from the (cx, cy, area, aspect) state head.
///
/// Width and height are clamped to a minimum of 1: downstream consumers
/// assume strictly positive boxes, and area or aspect can drift through zero
/// under extreme shrinking motion.
fn rect_from_state(mean: &Array1<f64>) -> Rect {
    let area = mean[2].max(1.0);
    let aspect = mean[3].max(1e-4);
    let width = (area * aspect).sqrt().max(1.0);
    let height = (area / width).max(1.0);
    Rect::from_xywh(mean[0] as f32, mean[1] as f32, width as f32, height as f32)
}
