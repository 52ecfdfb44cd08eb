//! Cloth: a grid of Verlet bodies joined by structural and shear constraints.

use crate::body::{Body, BodyHandle};
use crate::constraint::DistanceConstraint;
use crate::error::{PhysicsError, Result};
use crate::float::Float;
use crate::simulation::Simulation;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// Configuration for a cloth grid.
#[derive(Clone, Debug)]
pub struct ClothConfig<F: Float> {
    pub cols: usize,
    pub rows: usize,
    pub spacing: F,
    pub stiffness: F,
    /// Diagonal constraints at this stiffness; `None` leaves them out.
    pub shear_stiffness: Option<F>,
    pub particle_mass: F,
    pub particle_radius: F,
    pub friction: F,
    /// Pin every Nth top-row particle plus the last one. 0 pins nothing.
    pub pin_every: usize,
}

impl<F: Float> Default for ClothConfig<F> {
    fn default() -> Self {
        ClothConfig {
            cols: 20,
            rows: 15,
            spacing: F::from_f32(15.0),
            stiffness: F::from_f64(0.8),
            shear_stiffness: None,
            particle_mass: F::from_f64(0.1),
            particle_radius: F::from_f32(3.0),
            friction: F::from_f64(0.02),
            pin_every: 4,
        }
    }
}

/// Handles of a cloth grid. Particle at (col, row) sits at
/// `origin + (col, row) * spacing`.
#[derive(Clone, Debug)]
pub struct Cloth {
    handles: AllocVec<BodyHandle>,
    cols: usize,
    rows: usize,
}

impl Cloth {
    /// Register the grid's bodies row by row, then its constraints.
    ///
    /// Creates:
    /// - Structural: horizontal + vertical neighbours (rest = spacing)
    /// - Shear (optional): both diagonals (rest = spacing * sqrt(2))
    pub fn build<F: Float>(sim: &mut Simulation<F>, origin: Vec2<F>, config: &ClothConfig<F>) -> Result<Self> {
        let (cols, rows) = (config.cols, config.rows);
        if cols < 2 || rows < 2 {
            return Err(PhysicsError::InvalidGridDimensions { cols, rows });
        }
        let spacing = config.spacing;
        let diag_length = (spacing * spacing + spacing * spacing).sqrt();

        let template = Body::verlet(origin, config.particle_radius)?
            .with_mass(config.particle_mass)?
            .with_friction(config.friction)?;
        DistanceConstraint::new(BodyHandle::from_raw(0), spacing, config.stiffness)?;
        if let Some(shear) = config.shear_stiffness {
            DistanceConstraint::new(BodyHandle::from_raw(0), diag_length, shear)?;
        }

        let mut handles = AllocVec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let offset = Vec2::new(F::from_f32(col as f32), F::from_f32(row as f32)).scale(spacing);
                let mut body = template.clone();
                body.override_position(origin + offset);
                body.pinned = row == 0
                    && config.pin_every > 0
                    && (col % config.pin_every == 0 || col == cols - 1);
                handles.push(sim.add_body(body)?);
            }
        }

        let cloth = Cloth { handles, cols, rows };
        for row in 0..rows {
            for col in 0..cols {
                let here = cloth.cell(col, row)?;
                if col + 1 < cols {
                    sim.add_constraint(here, cloth.cell(col + 1, row)?, spacing, config.stiffness)?;
                }
                if row + 1 < rows {
                    sim.add_constraint(here, cloth.cell(col, row + 1)?, spacing, config.stiffness)?;
                }
                if let Some(shear) = config.shear_stiffness {
                    if col + 1 < cols && row + 1 < rows {
                        sim.add_constraint(here, cloth.cell(col + 1, row + 1)?, diag_length, shear)?;
                    }
                    if col > 0 && row + 1 < rows {
                        sim.add_constraint(here, cloth.cell(col - 1, row + 1)?, diag_length, shear)?;
                    }
                }
            }
        }
        Ok(cloth)
    }

    /// Handle of the particle at (col, row), `None` outside the grid.
    pub fn handle(&self, col: usize, row: usize) -> Option<BodyHandle> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.handles.get(row * self.cols + col).copied()
    }

    fn cell(&self, col: usize, row: usize) -> Result<BodyHandle> {
        self.handle(col, row).ok_or(PhysicsError::CellOutOfRange {
            col,
            row,
            cols: self.cols,
            rows: self.rows,
        })
    }

    pub fn handles(&self) -> &[BodyHandle] {
        &self.handles
    }

    pub fn cols(&self) -> usize { self.cols }
    pub fn rows(&self) -> usize { self.rows }
    pub fn particle_count(&self) -> usize { self.handles.len() }

    /// Cut every constraint touching the particle at (col, row).
    pub fn tear_at<F: Float>(&self, sim: &mut Simulation<F>, col: usize, row: usize) -> Result<usize> {
        sim.detach(self.cell(col, row)?)
    }

    pub fn position_at<F: Float>(&self, sim: &Simulation<F>, col: usize, row: usize) -> Result<Vec2<F>> {
        sim.position(self.cell(col, row)?)
    }
}
