use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::rational::{to_f64, DEFAULT_MAX_DENOMINATOR};
use crate::core::{SimConfig, Simulation};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

#[allow(clippy::too_many_arguments)]
fn config_from_args(
    mass_small: i64,
    mass_large: i64,
    velocity_small: i64,
    velocity_large: i64,
    position_small: i64,
    position_large: i64,
    max_denominator: Option<u64>,
    record_trace: bool,
) -> SimConfig {
    SimConfig::from_integers(
        mass_small,
        mass_large,
        velocity_small,
        velocity_large,
        position_small,
        position_large,
    )
    .with_max_denominator(max_denominator)
    .with_trace(record_trace)
}

/// Python-facing wrapper around the two-block collision simulation.
///
/// - __new__(mass_small=1, mass_large=10000, velocity_small=0, velocity_large=-1,
///           position_small=1, position_large=2, max_denominator=2**32, record_trace=False)
/// - run() -> int
/// - step() -> bool
/// - collision_count (property)
/// - get_state() -> (x_small, x_large, v_small, v_large)
/// - get_trace() -> np.ndarray, shape (N, 5)
#[pyclass]
pub struct BlockSim {
    sim: Simulation,
}

#[pymethods]
impl BlockSim {
    /// Initialize a run from integer initial conditions.
    ///
    /// Masses are forced positive; a zero mass or `max_denominator=0` raises ValueError.
    /// Pass `max_denominator=None` for fully exact arithmetic.
    #[new]
    #[pyo3(signature = (
        mass_small=1,
        mass_large=10_000,
        velocity_small=0,
        velocity_large=-1,
        position_small=1,
        position_large=2,
        max_denominator=Some(DEFAULT_MAX_DENOMINATOR),
        record_trace=false
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        mass_small: i64,
        mass_large: i64,
        velocity_small: i64,
        velocity_large: i64,
        position_small: i64,
        position_large: i64,
        max_denominator: Option<u64>,
        record_trace: bool,
    ) -> PyResult<Self> {
        let config = config_from_args(
            mass_small,
            mass_large,
            velocity_small,
            velocity_large,
            position_small,
            position_large,
            max_denominator,
            record_trace,
        );
        let sim = Simulation::from_config(&config).map_err(py_err)?;
        Ok(Self { sim })
    }

    /// Run to completion and return the total collision count (releases the GIL).
    fn run(&mut self, py: Python<'_>) -> PyResult<u64> {
        py.detach(|| self.sim.run()).map_err(py_err)
    }

    /// Process a single collision; False once no collision is reachable.
    fn step(&mut self) -> PyResult<bool> {
        Ok(self.sim.step().map_err(py_err)?.is_some())
    }

    #[getter]
    fn collision_count(&self) -> u64 {
        self.sim.collision_count()
    }

    #[getter]
    fn finished(&self) -> bool {
        self.sim.is_finished()
    }

    /// Current (x_small, x_large, v_small, v_large) as floats.
    fn get_state(&self) -> (f64, f64, f64, f64) {
        let (s, l) = (self.sim.small(), self.sim.large());
        (
            to_f64(&s.position),
            to_f64(&l.position),
            to_f64(&s.velocity),
            to_f64(&l.velocity),
        )
    }

    /// Recorded collisions as a float64 array of shape (N, 5):
    /// columns are time, x_small, x_large, v_small, v_large.
    fn get_trace(&self, py: Python<'_>) -> PyResult<Py<PyArray2<f64>>> {
        let trace = self.sim.trace();
        let mut arr = Array2::<f64>::zeros((trace.len(), 5));
        for (i, ev) in trace.iter().enumerate() {
            arr[[i, 0]] = to_f64(&ev.time);
            arr[[i, 1]] = to_f64(&ev.small_position);
            arr[[i, 2]] = to_f64(&ev.large_position);
            arr[[i, 3]] = to_f64(&ev.small_velocity);
            arr[[i, 4]] = to_f64(&ev.large_velocity);
        }
        Ok(arr.into_pyarray(py).unbind())
    }
}

/// Count collisions for the given integer initial conditions.
#[pyfunction]
#[pyo3(signature = (
    mass_small=1,
    mass_large=10_000,
    velocity_small=0,
    velocity_large=-1,
    position_small=1,
    position_large=2,
    max_denominator=Some(DEFAULT_MAX_DENOMINATOR)
))]
#[allow(clippy::too_many_arguments)]
fn simulate(
    py: Python<'_>,
    mass_small: i64,
    mass_large: i64,
    velocity_small: i64,
    velocity_large: i64,
    position_small: i64,
    position_large: i64,
    max_denominator: Option<u64>,
) -> PyResult<u64> {
    let config = config_from_args(
        mass_small,
        mass_large,
        velocity_small,
        velocity_large,
        position_small,
        position_large,
        max_denominator,
        false,
    );
    py.detach(|| -> crate::error::Result<u64> { Simulation::from_config(&config)?.run() })
        .map_err(py_err)
}

/// floor(pi * 10^digits) via a unit mass against a mass of 100^digits.
#[pyfunction]
fn count_for_digits(py: Python<'_>, digits: u32) -> PyResult<u64> {
    py.detach(|| crate::count_for_digits(digits)).map_err(py_err)
}

/// The blockpi Python module entry point.
#[pymodule]
fn blockpi(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<BlockSim>()?;
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    m.add_function(wrap_pyfunction!(count_for_digits, m)?)?;
    Ok(())
}
